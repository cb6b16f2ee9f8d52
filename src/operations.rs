//! Transformations that build a new [`crate::Automaton`] from one or two given automata.
//! None of them modifies its inputs.

mod completion;

mod subset;
pub use subset::composite_name;

mod product;
pub use product::pair_name;

/// Prefixes every backslash and every character of `reserved` in `name` with a backslash, so
/// that names joined by one of the reserved characters can be told apart again.
pub(crate) fn escape(name: &str, reserved: &[char]) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        if c == '\\' || reserved.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use crate::{fixtures::*, prelude::*};

    #[test_log::test]
    fn complete_then_complement_then_determinize() {
        let partial = scenario_three();
        let complement = partial.complete().unwrap().complement().unwrap();
        let det = complement.determinize();
        assert!(det.is_deterministic());
        for w in ["a", "b", "ab", "ba", "aab", "bba"] {
            assert_eq!(!partial.recognizes(w), det.recognizes(w), "on {w}");
        }
    }

    #[test]
    fn escaping_reserved_characters() {
        assert_eq!(super::escape("q0", &[',']), "q0");
        assert_eq!(super::escape("a,b", &[',']), "a\\,b");
        assert_eq!(super::escape("a\\_b", &['_']), "a\\\\\\_b");
    }

    #[test]
    fn operations_leave_inputs_untouched() {
        let nfa = scenario_two();
        let copy = nfa.clone();
        let _ = nfa.determinize();
        let _ = nfa.union(&even_bs());
        assert_eq!(nfa, copy);

        let dfa = scenario_three();
        let copy = dfa.clone();
        let _ = dfa.complete();
        let _ = dfa.complete().and_then(|c| c.complement());
        assert_eq!(dfa, copy);
    }
}
