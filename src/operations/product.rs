use std::collections::VecDeque;

use itertools::Itertools;
use tracing::{debug, trace};

use crate::{math::Set, prelude::*};

/// Name of the product state built from the state `left` of the first and the state `right`
/// of the second automaton. Underscores and backslashes in either name are escaped with a
/// backslash, so different pairs never share a name.
///
/// ```
/// use automata_lab::operations::pair_name;
/// assert_eq!(pair_name("q0", "e"), "q0_e");
/// assert_ne!(pair_name("a_b", "c"), pair_name("a", "b_c"));
/// ```
pub fn pair_name(left: &str, right: &str) -> String {
    format!(
        "{}_{}",
        super::escape(left, &['_']),
        super::escape(right, &['_'])
    )
}

impl Automaton {
    /// Computes the product of `self` and `other` restricted to the pairs of states that are
    /// reachable from the pair of initial states, where a pair is final if one of its
    /// components is final. The alphabet is the union of both alphabets.
    ///
    /// A pair only has a successor on a symbol if both components have one, so for the result
    /// to accept the union of the two languages, both operands should be deterministic and
    /// complete over the same alphabet. On nondeterministic operands, the first matching
    /// transition is used. The initial state of each operand is the one given by
    /// [`Automaton::initial_state`], if one of them has no initial state a precondition error
    /// is returned.
    pub fn union(&self, other: &Automaton) -> Result<Automaton, AutomatonError> {
        let missing_initial = || AutomatonError::Precondition {
            operation: "union",
            requirement: Requirement::InitialState,
        };
        let left = self.initial_state().ok_or_else(missing_initial)?;
        let right = other.initial_state().ok_or_else(missing_initial)?;

        let alphabet: Alphabet = self.alphabet().union(other.alphabet()).cloned().collect();
        let mut out = Automaton::with_alphabet(
            format!("union_{}_{}", self.name(), other.name()),
            alphabet.clone(),
        );

        let start = (left.name.as_str(), right.name.as_str());
        out.add_state(
            pair_name(start.0, start.1),
            true,
            left.is_final || right.is_final,
        );
        let mut seen = Set::default();
        seen.insert(start);
        let mut queue = VecDeque::from([start]);

        while let Some((p, q)) = queue.pop_front() {
            trace!("exploring pair ({p}, {q})");
            for sym in &alphabet {
                let (Some(p_next), Some(q_next)) = (self.successor(p, sym), other.successor(q, sym))
                else {
                    continue;
                };
                if seen.insert((p_next, q_next)) {
                    out.add_state(
                        pair_name(p_next, q_next),
                        false,
                        self.is_final(p_next) || other.is_final(q_next),
                    );
                    queue.push_back((p_next, q_next));
                }
                out.add_transition(pair_name(p, q), sym, pair_name(p_next, q_next))?;
            }
        }

        debug!(
            "union of {} and {} has {} reachable states",
            self.name(),
            other.name(),
            out.size()
        );
        Ok(out)
    }

    /// Computes the full cross product of `self` and `other`, where a pair of states is
    /// initial if both components are initial and final if both components are final. For
    /// every two transitions of `self` and `other` that share their symbol, the product
    /// contains a transition between the corresponding pairs. Unreachable pairs are kept.
    ///
    /// Both automata must have the same alphabet, otherwise an
    /// [`AutomatonError::AlphabetMismatch`] is returned.
    ///
    /// ```
    /// use automata_lab::prelude::*;
    ///
    /// let ab = Automaton::with_alphabet("ab", alphabet(['a', 'b']));
    /// let ac = Automaton::with_alphabet("ac", alphabet(['a', 'c']));
    /// assert!(matches!(
    ///     ab.intersection(&ac),
    ///     Err(AutomatonError::AlphabetMismatch { .. })
    /// ));
    /// ```
    pub fn intersection(&self, other: &Automaton) -> Result<Automaton, AutomatonError> {
        if self.alphabet() != other.alphabet() {
            return Err(AutomatonError::AlphabetMismatch {
                left: self.alphabet().iter().cloned().collect(),
                right: other.alphabet().iter().cloned().collect(),
            });
        }

        let mut out = Automaton::with_alphabet(
            format!("intersection_{}_{}", self.name(), other.name()),
            self.alphabet().clone(),
        );
        for (p, q) in self.states().cartesian_product(other.states().collect_vec()) {
            out.add_state(
                pair_name(&p.name, &q.name),
                p.is_initial && q.is_initial,
                p.is_final && q.is_final,
            );
        }
        for (s, t) in self.transitions().iter().cartesian_product(other.transitions()) {
            if s.symbol == t.symbol {
                out.add_transition(
                    pair_name(&s.source, &t.source),
                    &s.symbol,
                    pair_name(&s.destination, &t.destination),
                )?;
            }
        }

        debug!(
            "intersection of {} and {} has {} states and {} transitions",
            self.name(),
            other.name(),
            out.size(),
            out.transitions().len()
        );
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use crate::{fixtures::*, prelude::*};

    #[test]
    fn scenario_four_alphabet_mismatch() {
        let left = Automaton::builder("left")
            .initial_states(["p"])
            .with_transitions([("p", 'a', "p"), ("p", 'b', "p")])
            .build()
            .unwrap();
        let right = Automaton::builder("right")
            .initial_states(["q"])
            .with_transitions([("q", 'a', "q"), ("q", 'c', "q")])
            .build()
            .unwrap();
        assert_eq!(
            left.intersection(&right),
            Err(AutomatonError::AlphabetMismatch {
                left: vec!['a'.into(), 'b'.into()],
                right: vec!['a'.into(), 'c'.into()],
            })
        );
    }

    #[test_log::test]
    fn intersection_is_the_full_product() {
        let aut = scenario_one().intersection(&even_bs()).unwrap();
        assert_eq!(aut.size(), 4);
        assert_eq!(aut.transitions().len(), 8);
        assert!(aut.is_deterministic());
        assert_eq!(
            aut.initial_states().map(|q| q.name.as_str()).collect::<Vec<_>>(),
            vec!["q0_e"]
        );
        assert_eq!(
            aut.final_states().map(|q| q.name.as_str()).collect::<Vec<_>>(),
            vec!["q1_e"]
        );
        for w in ["", "a", "ba", "bba", "abba", "bab", "b"] {
            assert_eq!(
                aut.recognizes(w),
                scenario_one().recognizes(w) && even_bs().recognizes(w),
                "on {w}"
            );
        }
    }

    #[test]
    fn intersection_keeps_unreachable_pairs() {
        let one = Automaton::builder("one")
            .initial_states(["p"])
            .with_states(["dead"])
            .with_transitions([("p", 'a', "p")])
            .build()
            .unwrap();
        let two = Automaton::builder("two")
            .initial_states(["q"])
            .final_states(["q"])
            .with_transitions([("q", 'a', "q")])
            .build()
            .unwrap();
        let product = one.intersection(&two).unwrap();
        assert!(product.contains_state("dead_q"));
        assert_eq!(product.size(), 2);
    }

    #[test_log::test]
    fn union_of_complete_dfas() {
        let aut = scenario_one().union(&even_bs()).unwrap();
        assert_eq!(aut.name(), "union_scenario_one_even_bs");
        assert!(aut.is_deterministic());
        assert!(aut.is_complete());
        for w in ["", "a", "b", "bb", "ab", "bab", "abb", "babb"] {
            assert_eq!(
                aut.recognizes(w),
                scenario_one().recognizes(w) || even_bs().recognizes(w),
                "on {w}"
            );
        }
    }

    #[test]
    fn union_only_follows_common_successors() {
        // scenario three has no b-transition from q1, so neither has the product
        let aut = scenario_three().union(&even_bs()).unwrap();
        assert_eq!(aut.successor("q1_e", &'b'.into()), None);
        assert!(!aut.recognizes("ab"));
        assert!(even_bs().recognizes("abb"));
        assert!(!aut.recognizes("abb"));
    }

    #[test]
    fn union_explores_only_reachable_pairs() {
        let one = Automaton::builder("one")
            .initial_states(["p"])
            .with_states(["dead"])
            .with_transitions([("p", 'a', "p"), ("dead", 'a', "dead")])
            .build()
            .unwrap();
        let aut = one.union(&even_bs()).unwrap();
        assert!(!aut.state_names().any(|q| q.starts_with("dead")));
    }

    #[test]
    fn underscores_do_not_merge_pairs() {
        let left = Automaton::builder("left")
            .initial_states(["a_b"])
            .final_states(["a"])
            .with_transitions([("a_b", 'x', "a"), ("a", 'x', "a")])
            .build()
            .unwrap();
        let right = Automaton::builder("right")
            .initial_states(["c"])
            .with_states(["b_c"])
            .with_transitions([("c", 'x', "b_c"), ("b_c", 'x', "b_c")])
            .build()
            .unwrap();

        let product = left.intersection(&right).unwrap();
        assert_eq!(product.size(), 4);
        assert!(product.is_deterministic());
        assert!(product.contains_state(r"a\_b_c"));
        assert!(product.contains_state(r"a_b\_c"));

        let union = left.union(&right).unwrap();
        assert!(union.is_deterministic());
        assert_eq!(union.size(), 2);
        assert!(union.recognizes("x"));
        assert!(!union.recognizes(""));
    }

    #[test]
    fn union_needs_initial_states() {
        let mut none = Automaton::new("none");
        none.add_state("q", false, true);
        assert_eq!(
            none.union(&even_bs()),
            Err(AutomatonError::Precondition {
                operation: "union",
                requirement: Requirement::InitialState
            })
        );
    }
}
