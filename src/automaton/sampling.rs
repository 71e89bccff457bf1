use serde::{Deserialize, Serialize};
use tsify::Tsify;

use crate::automaton::check_alphabet;
use crate::errors::{Error, Result};
use crate::random::RandomSource;
use crate::types::{
    graph::{Graph, Node},
    typescript_types::{Alphabet, Automaton},
};

#[derive(Tsify, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase", default)]
#[tsify(into_wasm_abi, from_wasm_abi)]
pub struct NfaOptions {
    pub states: usize,
    pub alphabet: Alphabet,
    /// Chance of every single (state, symbol, target) transition.
    pub transition_chance: f64,
    pub accepting_chance: f64,
    /// Chance of a state other than `q0` being a start state as well.
    pub extra_start_chance: f64,
}

impl Default for NfaOptions {
    fn default() -> Self {
        Self {
            states: 4,
            alphabet: Alphabet::from_iter(["a", "b"]),
            transition_chance: 0.3,
            accepting_chance: 0.3,
            extra_start_chance: 0.0,
        }
    }
}

fn check_chance(name: &str, chance: f64) -> Result<()> {
    if (0.0..=1.0).contains(&chance) {
        Ok(())
    } else {
        Err(Error::InvalidOptions(format!("{name} must be in [0, 1]")))
    }
}

fn check_states(states: usize) -> Result<()> {
    if states == 0 {
        return Err(Error::InvalidOptions(String::from("at least one state is needed")));
    }
    Ok(())
}

impl NfaOptions {
    pub fn validate(&self) -> Result<()> {
        check_states(self.states)?;
        check_alphabet(&self.alphabet)?;
        check_chance("transition chance", self.transition_chance)?;
        check_chance("accepting chance", self.accepting_chance)?;
        check_chance("extra start chance", self.extra_start_chance)
    }
}

/// Random nfa over `options.alphabet` with states `q0, q1, ...` and `q0` as a start state.
pub fn random_nfa(random: &mut impl RandomSource, options: &NfaOptions) -> Result<Automaton> {
    let _span = tracing::info_span!("random_nfa", states = options.states).entered();
    options.validate()?;

    let mut nfa: Automaton = Graph::new(true, false);
    for i in 0..options.states {
        let is_start = i == 0 || random.bool(options.extra_start_chance);
        let is_end = random.bool(options.accepting_chance);
        nfa.add_node(Node::state(&format!("q{i}"), is_start, is_end));
    }
    for source in nfa.node_ids() {
        for symbol in options.alphabet.symbols() {
            for target in nfa.node_ids() {
                if random.bool(options.transition_chance) {
                    nfa.add_edge(source, target, Some(symbol.clone()))?;
                }
            }
        }
    }

    tracing::debug!(transitions = nfa.edge_count(), "sampled nfa");
    Ok(nfa)
}

/// Random total dfa: one uniformly drawn target for every state and symbol, `q0` is the start.
pub fn random_dfa(
    random: &mut impl RandomSource,
    states: usize,
    alphabet: &Alphabet,
    accepting_chance: f64,
) -> Result<Automaton> {
    let _span = tracing::info_span!("random_dfa", states).entered();
    check_states(states)?;
    check_alphabet(alphabet)?;
    check_chance("accepting chance", accepting_chance)?;

    let mut dfa: Automaton = Graph::new(true, false);
    for i in 0..states {
        let is_end = random.bool(accepting_chance);
        dfa.add_node(Node::state(&format!("q{i}"), i == 0, is_end));
    }
    for source in dfa.node_ids() {
        for symbol in alphabet.symbols() {
            let target = random.index(states);
            dfa.add_edge(source, target, Some(symbol.clone()))?;
        }
    }
    Ok(dfa)
}
