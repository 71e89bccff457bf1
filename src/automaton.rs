use std::collections::{BTreeSet, HashSet};

use itertools::Itertools;

use crate::errors::{Error, Result};
use crate::types::{
    graph::NodeId,
    typescript_types::{Alphabet, Automaton, Symbol},
};

pub mod minimize;
pub mod powerset;
pub mod sampling;

pub use minimize::{minimize_dfa, refinement_rounds, Partition};
pub use powerset::convert_nfa_to_dfa;
pub use sampling::{random_dfa, random_nfa, NfaOptions};

impl Automaton {
    pub fn start_states(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.node_ids().filter(|n| self.nodes()[*n].is_start)
    }

    pub fn is_accepting(&self, state: NodeId) -> bool {
        self.node(state).map_or(false, |n| n.is_end)
    }

    /// Targets of the transitions leaving `state` on `symbol`.
    pub fn successors<'a>(&'a self, state: NodeId, symbol: &'a Symbol) -> impl Iterator<Item = NodeId> + 'a {
        self.edges_from(state)
            .iter()
            .filter(move |e| e.value.as_ref() == Some(symbol))
            .map(|e| e.target)
    }

    /// Run `word` on the automaton, tracking every state it could be in.
    pub fn accepts(&self, word: &[Symbol]) -> bool {
        let mut current: BTreeSet<NodeId> = self.start_states().collect();
        for symbol in word {
            current = current
                .iter()
                .flat_map(|state| self.successors(*state, symbol))
                .collect();
            if current.is_empty() {
                return false;
            }
        }
        current.into_iter().any(|state| self.is_accepting(state))
    }

    /// Label of `state`, `q{state}` when it has none.
    pub fn state_name(&self, state: NodeId) -> String {
        match self.node(state).and_then(|n| n.label.as_ref()) {
            Some(label) => label.to_string(),
            None => format!("q{state}"),
        }
    }

    /// One name per state to build set names from. These are the state names when
    /// they are distinct, non-empty and free of `,`; otherwise plain indices for every
    /// state. Either way distinct sets get distinct [`set_name`]s.
    pub(crate) fn member_names(&self) -> Vec<String> {
        let names: Vec<String> = self.node_ids().map(|s| self.state_name(s)).collect();
        if names.iter().all_unique() && names.iter().all(|n| !n.is_empty() && !n.contains(',')) {
            names
        } else {
            tracing::debug!("state names clash, naming sets by index");
            self.node_ids().map(|s| s.to_string()).collect()
        }
    }
}

/// `{a,b,c}` from `names` of `states`.
pub(crate) fn set_name(names: &[String], states: impl IntoIterator<Item = NodeId>) -> String {
    format!("{{{}}}", states.into_iter().map(|s| names[s].as_str()).join(","))
}

pub(crate) fn check_alphabet(alphabet: &Alphabet) -> Result<()> {
    if alphabet.is_empty() {
        return Err(Error::EmptyAlphabet);
    }
    let mut seen = HashSet::new();
    for symbol in alphabet.symbols() {
        if !seen.insert(symbol) {
            return Err(Error::DuplicateSymbol(symbol.clone()));
        }
    }
    Ok(())
}

// Shared preconditions of conversion and minimization.
pub(crate) fn check_automaton(automaton: &Automaton, alphabet: &Alphabet) -> Result<()> {
    check_alphabet(alphabet)?;
    if automaton.node_count() == 0 {
        return Err(Error::EmptyGraph);
    }
    if !automaton.is_directed() {
        return Err(Error::UndirectedAutomaton);
    }
    for (id, edge) in automaton.edge_references() {
        match &edge.value {
            None => return Err(Error::MissingSymbol(id)),
            Some(symbol) if alphabet.position(symbol).is_none() => {
                return Err(Error::SymbolNotInAlphabet(id, symbol.clone()))
            }
            Some(_) => (),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils;
    use crate::types::graph::{Graph, Node};
    use maplit::btreeset;

    fn word(symbols: &str) -> Vec<Symbol> {
        symbols.chars().map(|c| Symbol::new(&c.to_string())).collect()
    }

    #[test]
    fn nfa_acceptance() {
        test_utils::setup_logger();
        // accepts exactly the words ending in 0
        let nfa = test_utils::get_ends_in_zero_nfa();
        assert!(nfa.accepts(&word("0")));
        assert!(nfa.accepts(&word("1100")));
        assert!(!nfa.accepts(&word("")));
        assert!(!nfa.accepts(&word("01")));
        // no transitions on 2 at all
        assert!(!nfa.accepts(&word("20")));
    }

    #[test]
    fn successors_and_accepting_states() {
        let nfa = test_utils::get_ends_in_zero_nfa();
        let accepting: BTreeSet<_> = nfa.node_ids().filter(|s| nfa.is_accepting(*s)).collect();
        assert_eq!(accepting, btreeset! {1});
        assert_eq!(
            nfa.successors(0, &Symbol::new("0")).collect::<BTreeSet<_>>(),
            btreeset! {0, 1}
        );
        assert_eq!(nfa.successors(1, &Symbol::new("0")).count(), 0);
    }

    #[test]
    fn empty_word_with_accepting_start() {
        let mut automaton: Automaton = Graph::new(true, false);
        automaton.add_node(Node::state("q0", true, true));
        assert!(automaton.accepts(&[]));
    }

    #[test]
    fn alphabet_checks() {
        assert_eq!(check_alphabet(&Alphabet(vec![])), Err(Error::EmptyAlphabet));
        assert_eq!(
            check_alphabet(&Alphabet::from_iter(["a", "b", "a"])),
            Err(Error::DuplicateSymbol(Symbol::new("a")))
        );
        assert_eq!(check_alphabet(&Alphabet::from_iter(["a", "b"])), Ok(()));
    }

    #[test]
    fn automaton_checks() {
        let alphabet = Alphabet::from_iter(["0", "1"]);
        let mut undirected: Automaton = Graph::new(false, false);
        undirected.add_node(Node::state("q0", true, false));
        assert_eq!(check_automaton(&undirected, &alphabet), Err(Error::UndirectedAutomaton));

        let mut automaton: Automaton = Graph::new(true, false);
        let q0 = automaton.add_node(Node::state("q0", true, false));
        let blank = automaton.add_edge(q0, q0, None).unwrap();
        assert_eq!(check_automaton(&automaton, &alphabet), Err(Error::MissingSymbol(blank)));

        let mut automaton: Automaton = Graph::new(true, false);
        let q0 = automaton.add_node(Node::state("q0", true, false));
        let foreign = automaton.add_edge(q0, q0, Some(Symbol::new("x"))).unwrap();
        assert_eq!(
            check_automaton(&automaton, &alphabet),
            Err(Error::SymbolNotInAlphabet(foreign, Symbol::new("x")))
        );
    }

    #[test]
    fn names() {
        let mut automaton: Automaton = Graph::new(true, false);
        automaton.add_node(Node::state("s", true, false));
        automaton.add_node(Node::default());
        assert_eq!(automaton.state_name(1), "q1");
        let names = automaton.member_names();
        assert_eq!(set_name(&names, [0, 1]), "{s,q1}");
        assert_eq!(set_name(&names, []), "{}");
    }

    #[test]
    fn clashing_names_fall_back_to_indices() {
        // the unlabelled state defaults to q1, the label of state 0
        let mut automaton: Automaton = Graph::new(true, false);
        automaton.add_node(Node::state("q1", true, false));
        automaton.add_node(Node::default());
        assert_eq!(automaton.member_names(), vec!["0", "1"]);

        let mut commas: Automaton = Graph::new(true, false);
        commas.add_node(Node::state("a,b", true, false));
        commas.add_node(Node::state("c", false, false));
        assert_eq!(commas.member_names(), vec!["0", "1"]);
    }
}
