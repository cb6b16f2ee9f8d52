use bit_set::BitSet;
use itertools::Itertools;
use tracing::debug;

use crate::prelude::*;

impl Automaton {
    /// Returns a complete copy of `self`. Every state that lacks a transition for some symbol
    /// receives one leading into the sink state [`Automaton::SINK`], which loops on every
    /// symbol. If `self` is already complete, the copy is returned unchanged, so completing
    /// twice adds nothing the second time. The sink is not added if a state with its name
    /// already exists, in that case the existing state takes its role.
    ///
    /// Fails with a precondition error if `self` is not deterministic.
    ///
    /// ```
    /// use automata_lab::prelude::*;
    ///
    /// let partial = Automaton::builder("partial")
    ///     .initial_states(["q0"])
    ///     .final_states(["q1"])
    ///     .with_transitions([("q0", 'a', "q1"), ("q0", 'b', "q0"), ("q1", 'a', "q1")])
    ///     .build()
    ///     .unwrap();
    /// assert!(!partial.is_complete());
    ///
    /// let complete = partial.complete().unwrap();
    /// assert!(complete.is_complete());
    /// assert_eq!(complete.successor("q1", &'b'.into()), Some(Automaton::SINK));
    /// ```
    pub fn complete(&self) -> Result<Automaton, AutomatonError> {
        self.require(Requirement::Deterministic, "completion")?;

        let mut out = self.clone();
        out.rename(format!("{}_complete", self.name()));

        // in case we are already complete, we can return without changes
        if self.is_complete() {
            debug!("{} is already complete", self.name());
            return Ok(out);
        }

        let symbols = self.alphabet().iter().cloned().collect_vec();
        out.add_state(Automaton::SINK, false, false);

        let mut seen = BitSet::with_capacity(symbols.len());
        let names = out.state_names().map(str::to_string).collect_vec();
        let mut added = 0;
        for state in names {
            seen.clear();
            for edge in out.edges_from(&state) {
                if let Ok(pos) = symbols.binary_search(&edge.symbol) {
                    seen.insert(pos);
                }
            }
            for missing in (0..symbols.len()).filter(|i| !seen.contains(*i)) {
                if out.add_transition(state.as_str(), &symbols[missing], Automaton::SINK)? {
                    added += 1;
                }
            }
        }
        debug!(
            "completed {} with {added} transitions into {}",
            self.name(),
            Automaton::SINK
        );

        Ok(out)
    }

    /// Returns an automaton with the same states and transitions as `self`, where accepting
    /// and rejecting states are swapped. The result accepts exactly the words over the
    /// alphabet that `self` rejects, which is why `self` has to be deterministic and complete.
    /// Otherwise a precondition error is returned (determinism is checked first).
    pub fn complement(&self) -> Result<Automaton, AutomatonError> {
        self.require(Requirement::Deterministic, "complement")?;
        self.require(Requirement::Complete, "complement")?;

        let mut out = Automaton::with_alphabet(
            format!("{}_complement", self.name()),
            self.alphabet().clone(),
        );
        for q in self.states() {
            out.add_state(q.name.as_str(), q.is_initial, !q.is_final);
        }
        for t in self.transitions() {
            out.add_transition(t.source.as_str(), &t.symbol, t.destination.as_str())?;
        }
        debug!("complemented {} with {} states", self.name(), out.size());
        Ok(out)
    }
}
