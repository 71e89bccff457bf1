use intern_arc::{global::hash_interner, InternedHash};
use serde::{Deserialize, Serialize};
use std::{fmt, ops::Deref};
use tsify::{declare, Tsify};

use crate::types::graph::{Graph, NodeId};

// Interned string newtype. Cloning and comparing are pointer cheap; serialized as a plain string.
macro_rules! interned_str {
    ($name:ident) => {
        #[derive(Tsify, Clone, PartialEq, PartialOrd, Ord, Eq, Hash, Deserialize)]
        #[serde(from = "&str")]
        #[tsify(from_wasm_abi)]
        pub struct $name(InternedHash<str>);

        impl $name {
            pub fn new(text: &str) -> Self {
                Self(hash_interner().intern_ref(text))
            }
        }

        impl From<&str> for $name {
            fn from(text: &str) -> Self {
                Self::new(text)
            }
        }

        impl Deref for $name {
            type Target = str;

            fn deref(&self) -> &str {
                &self.0
            }
        }

        impl Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_tuple(stringify!($name)).field(&&**self).finish()
            }
        }
    };
}

// Display name of a node, e.g. "A" or "q_3"
interned_str!(Label);
// Transition symbol of an automaton
interned_str!(Symbol);

/// Edge weight. An unweighted edge counts as [`DEFAULT_WEIGHT`].
pub type Weight = i64;

pub const DEFAULT_WEIGHT: Weight = 1;

/// Largest weight magnitude the algorithms accept. Path and tree sums over
/// anything that fits in memory stay far below `Weight::MAX`.
pub const MAX_WEIGHT: Weight = 1 << 32;

#[declare]
pub type WeightedGraph = Graph<Weight>;
#[declare]
pub type Automaton = Graph<Symbol>;

/// Layout coordinates. Ignored by every algorithm.
#[derive(Tsify, Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[tsify(into_wasm_abi, from_wasm_abi)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

#[derive(Tsify, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[tsify(into_wasm_abi, from_wasm_abi)]
pub struct Alphabet(pub Vec<Symbol>);

impl Alphabet {
    pub fn symbols(&self) -> &[Symbol] {
        &self.0
    }

    pub fn position(&self, symbol: &Symbol) -> Option<usize> {
        self.0.iter().position(|s| s == symbol)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> FromIterator<&'a str> for Alphabet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        Alphabet(iter.into_iter().map(Symbol::new).collect())
    }
}

#[derive(Tsify, Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[tsify(into_wasm_abi, from_wasm_abi)]
pub struct EdgePair(pub NodeId, pub NodeId);

#[derive(Tsify, Serialize)]
#[serde(tag = "type")]
#[tsify(into_wasm_abi)]
pub enum CheckResult {
    OK,
    ERROR { errors: Vec<String> },
}

#[derive(Tsify, Serialize, Deserialize)]
#[serde(tag = "type")]
#[tsify(into_wasm_abi)]
pub enum DataResult<T> {
    OK { data: T },
    ERROR { errors: Vec<String> },
}

impl<T> From<crate::errors::Result<T>> for DataResult<T> {
    fn from(result: crate::errors::Result<T>) -> Self {
        match result {
            Ok(data) => DataResult::OK { data },
            Err(error) => DataResult::ERROR {
                errors: vec![error.to_string()],
            },
        }
    }
}
