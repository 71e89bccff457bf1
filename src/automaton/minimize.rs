use std::collections::VecDeque;

use itertools::Itertools;

use crate::automaton::{check_automaton, set_name};
use crate::errors::{Error, Result};
use crate::types::{
    graph::{Graph, Node, NodeId},
    typescript_types::{Alphabet, Automaton, Label},
};

/// Blocks of equivalent states. Every block is sorted ascending.
pub type Partition = Vec<Vec<NodeId>>;

// Transition table of the reachable part of a dfa.
// table[state][i] is the target on the i-th alphabet symbol, empty for unreachable states.
struct Reachable {
    start: NodeId,
    states: Vec<NodeId>,
    table: Vec<Vec<NodeId>>,
}

fn reachable_part(dfa: &Automaton, alphabet: &Alphabet) -> Result<Reachable> {
    check_automaton(dfa, alphabet)?;
    let starts: Vec<NodeId> = dfa.start_states().collect();
    let start = match starts.len() {
        0 => return Err(Error::NoStartState),
        1 => starts[0],
        _ => return Err(Error::MultipleStartStates(starts)),
    };

    let mut seen = vec![false; dfa.node_count()];
    let mut table = vec![Vec::new(); dfa.node_count()];
    let mut queue = VecDeque::from([start]);
    seen[start] = true;
    while let Some(state) = queue.pop_front() {
        for symbol in alphabet.symbols() {
            let mut targets = dfa.successors(state, symbol);
            let target = match (targets.next(), targets.next()) {
                (None, _) => return Err(Error::MissingTransition(state, symbol.clone())),
                (Some(target), None) => target,
                (Some(_), Some(_)) => return Err(Error::NonDeterministic(state, symbol.clone())),
            };
            table[state].push(target);
            if !seen[target] {
                seen[target] = true;
                queue.push_back(target);
            }
        }
    }

    let states = dfa.node_ids().filter(|s| seen[*s]).collect();
    Ok(Reachable {
        start,
        states,
        table,
    })
}

/// Every partition Moore's algorithm goes through, starting with accepting versus
/// rejecting states. The last partition is stable and defines the minimal dfa.
pub fn refinement_rounds(dfa: &Automaton, alphabet: &Alphabet) -> Result<Vec<Partition>> {
    let _span = tracing::info_span!("refinement_rounds").entered();
    let reachable = reachable_part(dfa, alphabet)?;
    Ok(refine(dfa, &reachable))
}

fn refine(dfa: &Automaton, reachable: &Reachable) -> Vec<Partition> {
    let (accepting, rejecting): (Vec<NodeId>, Vec<NodeId>) = reachable
        .states
        .iter()
        .copied()
        .partition(|s| dfa.is_accepting(*s));
    let mut partition: Partition = [accepting, rejecting]
        .into_iter()
        .filter(|block| !block.is_empty())
        .collect();
    let mut rounds = vec![partition.clone()];
    let mut block_of = vec![0; dfa.node_count()];

    let mut changed = true;
    while changed {
        changed = false;
        for (i, block) in partition.iter().enumerate() {
            for state in block {
                block_of[*state] = i;
            }
        }

        let mut next: Partition = Vec::with_capacity(partition.len());
        for block in &partition {
            // sub-blocks by signature, in order of first appearance
            let mut groups: Vec<(Vec<usize>, Vec<NodeId>)> = Vec::new();
            for state in block {
                let signature: Vec<usize> = reachable.table[*state]
                    .iter()
                    .map(|target| block_of[*target])
                    .collect();
                match groups.iter_mut().find(|(s, _)| *s == signature) {
                    Some((_, members)) => members.push(*state),
                    None => groups.push((signature, vec![*state])),
                }
            }
            changed |= groups.len() > 1;
            next.extend(groups.into_iter().map(|(_, members)| members));
        }

        if changed {
            tracing::debug!(blocks = next.len(), "refined");
            partition = next;
            rounds.push(partition.clone());
        }
    }
    rounds
}

/// Minimal dfa equivalent to `dfa`. Unreachable states are dropped, equivalent states merged.
pub fn minimize_dfa(dfa: &Automaton, alphabet: &Alphabet) -> Result<Automaton> {
    let _span = tracing::info_span!("minimize_dfa").entered();
    let reachable = reachable_part(dfa, alphabet)?;
    let mut blocks = refine(dfa, &reachable).pop().unwrap_or_default();
    blocks.sort_by_key(|block| block[0]);

    let mut block_of = vec![0; dfa.node_count()];
    for (i, block) in blocks.iter().enumerate() {
        for state in block {
            block_of[*state] = i;
        }
    }

    let member_names = dfa.member_names();
    let mut names: Vec<String> = blocks
        .iter()
        .map(|block| match block.as_slice() {
            [state] => dfa.state_name(*state),
            _ => set_name(&member_names, block.iter().copied()),
        })
        .collect();
    if !names.iter().all_unique() {
        tracing::debug!("block names clash, naming every block as a set");
        names = blocks
            .iter()
            .map(|block| set_name(&member_names, block.iter().copied()))
            .collect();
    }

    let mut minimal: Automaton = Graph::new(true, dfa.is_weighted());
    for (block, name) in blocks.iter().zip(&names) {
        let first = &dfa.nodes()[block[0]];
        minimal.add_node(Node {
            label: Some(Label::new(name)),
            position: first.position,
            is_start: block.contains(&reachable.start),
            is_end: first.is_end,
            group: None,
        });
    }
    for (i, block) in blocks.iter().enumerate() {
        let targets = &reachable.table[block[0]];
        for (symbol, target) in alphabet.symbols().iter().zip(targets) {
            minimal.add_edge(i, block_of[*target], Some(symbol.clone()))?;
        }
    }

    tracing::debug!(before = dfa.node_count(), after = minimal.node_count(), "minimized");
    minimal.validate()?;
    Ok(minimal)
}
