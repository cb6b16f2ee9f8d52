//! Questions about the words an automaton accepts. Apart from [`Automaton::recognizes`],
//! everything in here enumerates words up to a given length, so the cost grows exponentially
//! with that length. Callers are expected to keep the bound small.

use itertools::Itertools;
use tracing::{debug, trace};

use crate::{
    math::{OrderedSet, Set},
    prelude::*,
};

/// Enumerates all words over `alphabet` of length at most `max_length`, ordered by length
/// first and lexicographically within the same length. The empty word comes first.
///
/// ```
/// use automata_lab::{language::words_up_to, prelude::*};
///
/// let words = words_up_to(&alphabet(['a', 'b']), 2).map(|w| w.to_string()).collect::<Vec<_>>();
/// assert_eq!(words, vec!["", "a", "b", "aa", "ab", "ba", "bb"]);
/// ```
pub fn words_up_to(alphabet: &Alphabet, max_length: usize) -> impl Iterator<Item = Word> + '_ {
    std::iter::once(Word::empty()).chain((1..=max_length).flat_map(move |length| {
        std::iter::repeat(alphabet.iter())
            .take(length)
            .multi_cartesian_product()
            .map(|symbols| symbols.into_iter().cloned().collect::<Word>())
    }))
}

impl Automaton {
    /// Runs `word` from the initial state (see [`Automaton::initial_state`]) and returns
    /// whether the run ends in a final state. The run rejects as soon as it reads a symbol
    /// outside of the alphabet or a state has no transition for the current symbol.
    ///
    /// If a state has several transitions for a symbol, only the first one (in insertion
    /// order) is followed. On nondeterministic automata this may reject words that the
    /// automaton accepts, so those should be determinized first.
    pub fn recognizes<W: Into<Word>>(&self, word: W) -> bool {
        let word = word.into();
        let Some(mut current) = self.initial_state().map(|q| q.name.as_str()) else {
            trace!("{} has no initial state, rejecting {word:?}", self.name());
            return false;
        };

        for sym in word.symbols() {
            if !self.alphabet().contains(sym) {
                trace!("symbol {sym} is not in the alphabet of {}", self.name());
                return false;
            }
            match self.successor(current, sym) {
                Some(next) => current = next,
                None => return false,
            }
        }
        self.is_final(current)
    }

    /// Collects all words of length at most `max_length` that lead from some initial state
    /// to some final state. All transitions are explored breadth-first, so unlike
    /// [`Automaton::recognizes`] this takes nondeterminism into account. The words are
    /// returned in lexicographic order and without duplicates.
    ///
    /// This is a brute-force enumeration, its cost grows with the number of paths through
    /// the automaton.
    pub fn accepted_words(&self, max_length: usize) -> Vec<Word> {
        let mut accepted = OrderedSet::new();
        let mut frontier: Set<(&str, Word)> = self
            .initial_states()
            .map(|q| (q.name.as_str(), Word::empty()))
            .collect();

        for depth in 0..=max_length {
            for (q, w) in &frontier {
                if self.is_final(q) {
                    accepted.insert(w.clone());
                }
            }
            if depth == max_length || frontier.is_empty() {
                break;
            }
            frontier = frontier
                .iter()
                .flat_map(|(q, w)| {
                    self.edges_from(*q)
                        .map(move |t| (t.destination.as_str(), w.extended(&t.symbol)))
                })
                .collect();
            trace!("{} paths of length {}", frontier.len(), depth + 1);
        }

        debug!(
            "{} accepts {} words of length at most {max_length}",
            self.name(),
            accepted.len()
        );
        accepted.into_iter().collect()
    }

    /// Returns all nonempty words over the alphabet of length at most `max_length` that are
    /// not among [`Automaton::accepted_words`], ordered by length and then lexicographically.
    /// Meant for demonstration and testing, as all words up to the bound are generated.
    pub fn rejected_words(&self, max_length: usize) -> Vec<Word> {
        if self.alphabet().is_empty() {
            return vec![];
        }
        let accepted: OrderedSet<Word> = self.accepted_words(max_length).into_iter().collect();
        words_up_to(self.alphabet(), max_length)
            .filter(|w| !w.is_empty() && !accepted.contains(w))
            .collect()
    }

    /// Compares `self` and `other` on every word of length at most `max_length` over the
    /// union of their alphabets, using [`Automaton::recognizes`] on both sides.
    ///
    /// If the alphabets differ, words containing a symbol that only one of the automata knows
    /// are rejected by the other one. So two automata over different alphabets are reported
    /// as not equivalent as soon as one of them accepts such a word within the bound, and as
    /// equivalent otherwise.
    ///
    /// This is only an approximation of language equivalence: automata that agree on all
    /// words up to the bound but differ on a longer word are reported as equivalent.
    pub fn is_equivalent_bounded(&self, other: &Automaton, max_length: usize) -> bool {
        let alphabet: Alphabet = self.alphabet().union(other.alphabet()).cloned().collect();
        let counterexample = words_up_to(&alphabet, max_length)
            .find(|w| self.recognizes(w) != other.recognizes(w));
        if let Some(w) = &counterexample {
            debug!("{} and {} disagree on {w:?}", self.name(), other.name());
        }
        counterexample.is_none()
    }
}

#[cfg(test)]
mod tests {
    use crate::{fixtures::*, prelude::*};

    use super::words_up_to;

    fn strings(words: Vec<Word>) -> Vec<String> {
        words.into_iter().map(|w| w.to_string()).collect()
    }

    #[test_log::test]
    fn scenario_one_recognition() {
        let aut = scenario_one();
        assert!(aut.recognizes("a"));
        assert!(!aut.recognizes("b"));
        assert!(!aut.recognizes("aab"));
        assert!(aut.recognizes("aba"));
        assert!(!aut.recognizes(""));
    }

    #[test]
    fn unknown_symbols_are_rejected() {
        let aut = scenario_one();
        assert!(!aut.recognizes("ac"));
        assert!(!aut.recognizes("c"));
    }

    #[test]
    fn missing_transitions_reject() {
        let aut = scenario_three();
        assert!(aut.recognizes("ba"));
        assert!(!aut.recognizes("ab"));
    }

    #[test]
    fn recognition_follows_the_first_transition() {
        let nfa = scenario_two();
        // the first a-transition leads to q1, which is not final
        assert!(!nfa.recognizes("a"));
        assert!(nfa.determinize().recognizes("a"));
    }

    #[test]
    fn without_initial_state_nothing_is_recognized() {
        let mut aut = Automaton::new("no_start");
        aut.add_state("q", false, true);
        assert!(!aut.recognizes(""));
        assert!(aut.accepted_words(3).is_empty());
    }

    #[test]
    fn words_over_symbols() {
        let aut = Automaton::builder("multi")
            .initial_states(["p"])
            .final_states(["q"])
            .with_transitions([("p", "ab", "q")])
            .build()
            .unwrap();
        let word: Word = ["ab"].into_iter().collect();
        assert!(aut.recognizes(&word));
        assert!(!aut.recognizes("ab"));
    }

    #[test_log::test]
    fn accepted_words_explore_all_paths() {
        let nfa = scenario_two();
        assert_eq!(strings(nfa.accepted_words(3)), vec!["a", "aba"]);
        assert_eq!(strings(nfa.accepted_words(0)), Vec::<String>::new());

        let aut = even_bs();
        assert_eq!(
            strings(aut.accepted_words(2)),
            vec!["", "a", "aa", "bb"]
        );
    }

    #[test]
    fn rejected_words_are_sorted_by_length() {
        let aut = scenario_one();
        assert_eq!(strings(aut.rejected_words(2)), vec!["b", "ab", "bb"]);
        assert!(Automaton::new("empty").rejected_words(3).is_empty());
    }

    #[test]
    fn accepted_and_rejected_words_partition_all_words() {
        let aut = contains_aa_redundant();
        let accepted = aut.accepted_words(4);
        let rejected = aut.rejected_words(4);
        let all = words_up_to(aut.alphabet(), 4).count();
        // the empty word is rejected but never listed
        assert_eq!(accepted.len() + rejected.len() + 1, all);
        assert!(accepted.iter().all(|w| !rejected.contains(w)));
    }

    #[test]
    fn bounded_equivalence() {
        let aut = contains_aa_redundant();
        let min = aut.minimize().unwrap();
        assert!(aut.is_equivalent_bounded(&min, 6));
        assert!(!scenario_one().is_equivalent_bounded(&even_bs(), 2));
    }

    #[test]
    fn bounded_equivalence_is_an_approximation() {
        let long = Automaton::builder("aaa")
            .initial_states(["0"])
            .final_states(["3"])
            .with_states(["1", "2"])
            .with_transitions([("0", 'a', "1"), ("1", 'a', "2"), ("2", 'a', "3")])
            .build()
            .unwrap();
        let mut nothing = Automaton::with_alphabet("nothing", alphabet(['a']));
        nothing.add_state("0", true, false);

        assert!(long.is_equivalent_bounded(&nothing, 2));
        assert!(!long.is_equivalent_bounded(&nothing, 3));
    }

    #[test]
    fn differing_alphabets_only_matter_through_accepted_words() {
        let mut a_only = Automaton::with_alphabet("a_only", alphabet(['a']));
        a_only.add_state("p", true, false);
        a_only.add_transition("p", 'a', "p").unwrap();
        let mut b_only = Automaton::with_alphabet("b_only", alphabet(['b']));
        b_only.add_state("q", true, false);
        b_only.add_transition("q", 'b', "q").unwrap();
        // neither accepts anything, so the foreign symbols make no difference
        assert!(a_only.is_equivalent_bounded(&b_only, 3));
    }

    #[test]
    fn bounded_equivalence_uses_both_alphabets() {
        let mut only_a = Automaton::with_alphabet("only_a", alphabet(['a']));
        only_a.add_state("p", true, true);
        only_a.add_transition("p", 'a', "p").unwrap();
        let mut a_and_b = only_a.clone();
        a_and_b.add_transition("p", 'b', "p").unwrap();
        assert!(!only_a.is_equivalent_bounded(&a_and_b, 1));
    }
}
