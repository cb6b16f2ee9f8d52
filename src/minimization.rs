//! Minimization of deterministic automata through partition refinement.
//!
//! The states are first split into accepting and rejecting ones. Then blocks are refined
//! repeatedly: two states of a block stay together only if, for every symbol, they lead into
//! the same blocks of the current partition. Once a round leaves the partition unchanged,
//! every block consists of states that accept the same language and is merged into a
//! single state.

use itertools::Itertools;
use tracing::{debug, trace};

use crate::{
    math::{OrderedMap, OrderedSet, Partition},
    prelude::*,
};

/// For each symbol (in canonical order), the blocks of the current partition that are
/// reached on it. A missing transition gives an empty entry.
type Signature = Vec<OrderedSet<usize>>;

/// Computes the coarsest partition of the states of `aut` that separates accepting from
/// rejecting states and is stable under all transitions.
pub(crate) fn partition_refinement(aut: &Automaton) -> Partition<String> {
    let index = aut.successor_index();
    let (accepting, rejecting): (Vec<&State>, Vec<&State>) = aut.states().partition(|q| q.is_final);
    let mut partition = Partition::new([
        accepting.iter().map(|q| q.name.clone()).collect_vec(),
        rejecting.iter().map(|q| q.name.clone()).collect_vec(),
    ]);

    let mut round = 0;
    loop {
        round += 1;
        let class_of: OrderedMap<&str, usize> = partition
            .iter()
            .enumerate()
            .flat_map(|(i, block)| block.iter().map(move |q| (q.as_str(), i)))
            .collect();

        let mut refined = Vec::with_capacity(partition.size());
        for block in &partition {
            if block.len() == 1 {
                refined.push(block.clone());
                continue;
            }

            let mut groups: OrderedMap<Signature, OrderedSet<String>> = OrderedMap::new();
            for q in block {
                let signature: Signature = aut
                    .alphabet()
                    .iter()
                    .map(|sym| {
                        index
                            .get(&(q.as_str(), sym))
                            .into_iter()
                            .flatten()
                            .filter_map(|target| class_of.get(target).copied())
                            .collect()
                    })
                    .collect();
                groups.entry(signature).or_default().insert(q.clone());
            }
            refined.extend(groups.into_values());
        }

        let refined = Partition::from(refined);
        trace!("refinement round {round} yields {} blocks", refined.size());
        if refined == partition {
            debug!(
                "partition refinement stabilized after {round} rounds with {} blocks",
                refined.size()
            );
            return refined;
        }
        partition = refined;
    }
}

impl Automaton {
    /// Returns the minimal deterministic automaton accepting the same language as `self`.
    /// Each block of equivalent states is represented by its lexicographically smallest
    /// member, a block is initial (resp. final) if one of its members is. States that are not
    /// reachable are merged like all other states but not removed.
    ///
    /// Fails with a precondition error if `self` is not deterministic.
    ///
    /// ```
    /// use automata_lab::prelude::*;
    ///
    /// let aut = Automaton::builder("redundant")
    ///     .initial_states(["p"])
    ///     .final_states(["q", "r"])
    ///     .with_transitions([("p", 'a', "q"), ("q", 'a', "r"), ("r", 'a', "q")])
    ///     .build()
    ///     .unwrap();
    /// let min = aut.minimize().unwrap();
    /// assert_eq!(min.state_names().collect::<Vec<_>>(), vec!["p", "q"]);
    /// assert!(min.recognizes("aaa"));
    /// ```
    pub fn minimize(&self) -> Result<Automaton, AutomatonError> {
        self.require(Requirement::Deterministic, "minimization")?;

        let partition = partition_refinement(self);
        let representative: OrderedMap<&str, &str> = partition
            .iter()
            .filter_map(|block| block.first().map(|rep| (block, rep.as_str())))
            .flat_map(|(block, rep)| block.iter().map(move |q| (q.as_str(), rep)))
            .collect();

        let mut out = Automaton::with_alphabet(
            format!("{}_minimal", self.name()),
            self.alphabet().clone(),
        );
        for block in &partition {
            let Some(rep) = block.first() else { continue };
            let members = block.iter().filter_map(|q| self.state(q)).collect_vec();
            out.add_state(
                rep.as_str(),
                members.iter().any(|q| q.is_initial),
                members.iter().any(|q| q.is_final),
            );
        }
        for block in &partition {
            let Some(rep) = block.first() else { continue };
            for sym in self.alphabet() {
                if let Some(target) = self.successor(rep, sym) {
                    out.add_transition(rep.as_str(), sym, representative[target])?;
                }
            }
        }

        debug!(
            "minimized {} from {} to {} states",
            self.name(),
            self.size(),
            out.size()
        );
        Ok(out)
    }

    /// Checks whether minimizing `self` keeps the number of states. This compares state counts
    /// only and does not check that the result is isomorphic to `self`.
    pub fn is_minimal(&self) -> Result<bool, AutomatonError> {
        Ok(self.minimize()?.size() == self.size())
    }
}
