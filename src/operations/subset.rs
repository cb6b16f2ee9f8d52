use std::collections::VecDeque;

use itertools::Itertools;
use tracing::{debug, trace};

use crate::{
    math::{OrderedSet, Set},
    prelude::*,
};

/// Gives the canonical name of a composite state of the subset construction: the names of the
/// contained states in ascending order, separated by commas and enclosed in braces. The name
/// does not depend on the order in which the members are given. Commas, braces and backslashes
/// inside member names are escaped with a backslash, so different sets never share a name.
///
/// ```
/// use automata_lab::operations::composite_name;
/// assert_eq!(composite_name(["q2", "q1", "q2"]), "{q1,q2}");
/// assert_eq!(composite_name(Vec::<&str>::new()), "{}");
/// assert_eq!(composite_name(["a,b"]), r"{a\,b}");
/// ```
pub fn composite_name<S, I>(members: I) -> String
where
    S: AsRef<str>,
    I: IntoIterator<Item = S>,
{
    let members: OrderedSet<String> = members
        .into_iter()
        .map(|m| m.as_ref().to_string())
        .collect();
    format!(
        "{{{}}}",
        members
            .iter()
            .map(|m| super::escape(m, &[',', '{', '}']))
            .join(",")
    )
}

impl Automaton {
    /// Applies the subset construction to `self`, producing a deterministic automaton which
    /// operates on sets of states. The initial composite state is the set of all initial
    /// states, and the composite states reachable from it are explored breadth-first. A
    /// composite state is final if at least one of its members is final. Sets that would be
    /// empty are not created, which means the result need not be complete.
    ///
    /// Epsilon transitions are treated like transitions on ordinary symbols, no epsilon closure
    /// is computed.
    ///
    /// ```
    /// use automata_lab::prelude::*;
    ///
    /// let nfa = Automaton::builder("nfa")
    ///     .initial_states(["q0"])
    ///     .final_states(["q2"])
    ///     .with_states(["q1"])
    ///     .with_transitions([("q0", 'a', "q1"), ("q0", 'a', "q2")])
    ///     .build()
    ///     .unwrap();
    /// let dfa = nfa.determinize();
    /// assert!(dfa.is_deterministic());
    /// assert!(dfa.contains_state("{q0}"));
    /// assert!(dfa.contains_state("{q1,q2}"));
    /// ```
    pub fn determinize(&self) -> Automaton {
        let index = self.successor_index();
        let mut out = Automaton::with_alphabet(
            format!("{}_deterministic", self.name()),
            self.alphabet().clone(),
        );

        let is_final =
            |set: &OrderedSet<&str>| -> bool { set.iter().any(|q| self.is_final(q)) };

        let initial: OrderedSet<&str> = self.initial_states().map(|q| q.name.as_str()).collect();
        out.add_state(composite_name(&initial), true, is_final(&initial));

        let mut seen: Set<OrderedSet<&str>> = Set::default();
        seen.insert(initial.clone());
        let mut queue = VecDeque::from([initial]);

        while let Some(current) = queue.pop_front() {
            let current_name = composite_name(&current);
            trace!("processing composite state {current_name}");

            for sym in self.alphabet() {
                let next: OrderedSet<&str> = current
                    .iter()
                    .filter_map(|q| index.get(&(*q, sym)))
                    .flatten()
                    .copied()
                    .collect();
                if next.is_empty() {
                    continue;
                }

                let next_name = composite_name(&next);
                if !seen.contains(&next) {
                    out.add_state(next_name.as_str(), false, is_final(&next));
                    seen.insert(next.clone());
                    queue.push_back(next);
                }
                out.add_transition(current_name.as_str(), sym, next_name)
                    .expect("composite states are added before they are used");
            }
        }

        debug!(
            "subset construction turned {} states into {}",
            self.size(),
            out.size()
        );
        out
    }
}
