use std::collections::{BTreeMap, VecDeque};

use bitvec::prelude::*;

use crate::automaton::{check_automaton, set_name};
use crate::errors::{Error, Result};
use crate::types::{
    graph::{Graph, Node, NodeId},
    typescript_types::{Alphabet, Automaton},
};

// Set of nfa states. Canonical: equal sets have equal bit patterns.
type StateSet = BitVec;

// Subset construction, Hopcroft, Motwani and Ullman section 2.3.5.
// Only reachable state sets are created. The empty set becomes a rejecting trap state,
// so every state of the result has exactly one transition per symbol.
pub fn convert_nfa_to_dfa(nfa: &Automaton, alphabet: &Alphabet) -> Result<Automaton> {
    let _span = tracing::info_span!("convert_nfa_to_dfa").entered();
    check_automaton(nfa, alphabet)?;

    let state_count = nfa.node_count();
    let mut initial: StateSet = bitvec![0; state_count];
    for state in nfa.start_states() {
        initial.set(state, true);
    }
    if initial.not_any() {
        return Err(Error::NoStartState);
    }

    // targets[state][symbol] lists the nfa transitions, symbols indexed as in the alphabet
    let mut targets: Vec<Vec<Vec<NodeId>>> = vec![vec![Vec::new(); alphabet.len()]; state_count];
    for (_, edge) in nfa.edge_references() {
        if let Some(symbol) = edge.value.as_ref().and_then(|s| alphabet.position(s)) {
            targets[edge.source][symbol].push(edge.target);
        }
    }

    let mut dfa: Automaton = Graph::new(true, false);
    let mut dfa_nodes: BTreeMap<StateSet, NodeId> = BTreeMap::new();
    let mut queue: VecDeque<(StateSet, NodeId)> = VecDeque::new();

    let names = nfa.member_names();
    let start = dfa.add_node(dfa_state(nfa, &names, &initial, true));
    dfa_nodes.insert(initial.clone(), start);
    queue.push_back((initial, start));

    while let Some((states, source)) = queue.pop_front() {
        for (i, symbol) in alphabet.symbols().iter().enumerate() {
            let mut next: StateSet = bitvec![0; state_count];
            for state in states.iter_ones() {
                for target in &targets[state][i] {
                    next.set(*target, true);
                }
            }
            let target = match dfa_nodes.get(&next) {
                Some(target) => *target,
                None => {
                    let target = dfa.add_node(dfa_state(nfa, &names, &next, false));
                    tracing::debug!(state = %dfa.state_name(target), "new state set");
                    dfa_nodes.insert(next.clone(), target);
                    queue.push_back((next, target));
                    target
                }
            };
            dfa.add_edge(source, target, Some(symbol.clone()))?;
        }
    }

    tracing::debug!(nfa_states = state_count, dfa_states = dfa.node_count(), "converted");
    dfa.validate()?;
    Ok(dfa)
}

fn dfa_state(nfa: &Automaton, names: &[String], states: &StateSet, is_start: bool) -> Node {
    Node::state(
        &set_name(names, states.iter_ones()),
        is_start,
        states.iter_ones().any(|s| nfa.is_accepting(s)),
    )
}
