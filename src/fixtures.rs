//! Automata shared by the unit tests of several modules.

use crate::prelude::*;

/// Accepts exactly the words over `{a, b}` that end in `a`.
pub(crate) fn scenario_one() -> Automaton {
    Automaton::builder("scenario_one")
        .initial_states(["q0"])
        .final_states(["q1"])
        .with_transitions([
            ("q0", 'a', "q1"),
            ("q0", 'b', "q0"),
            ("q1", 'a', "q1"),
            ("q1", 'b', "q0"),
        ])
        .build()
        .unwrap()
}

/// Nondeterministically guesses on `a` whether to go to `q1` or `q2`.
pub(crate) fn scenario_two() -> Automaton {
    Automaton::builder("scenario_two")
        .initial_states(["q0"])
        .final_states(["q2"])
        .with_states(["q1"])
        .with_transitions([("q0", 'a', "q1"), ("q0", 'a', "q2"), ("q1", 'b', "q0")])
        .build()
        .unwrap()
}

/// Deterministic but partial, `q1` has no transition on `b`.
pub(crate) fn scenario_three() -> Automaton {
    Automaton::builder("scenario_three")
        .initial_states(["q0"])
        .final_states(["q1"])
        .with_transitions([("q0", 'a', "q1"), ("q0", 'b', "q0"), ("q1", 'a', "q1")])
        .build()
        .unwrap()
}

/// Accepts the words over `{a, b}` with an even number of `b`s.
pub(crate) fn even_bs() -> Automaton {
    Automaton::builder("even_bs")
        .initial_states(["e"])
        .final_states(["e"])
        .with_transitions([("e", 'a', "e"), ("e", 'b', "o"), ("o", 'a', "o"), ("o", 'b', "e")])
        .build()
        .unwrap()
}

/// A complete DFA over `{a, b}` accepting exactly the words containing `aa`, with two
/// redundant copies of the accepting sink.
pub(crate) fn contains_aa_redundant() -> Automaton {
    Automaton::builder("contains_aa")
        .initial_states(["0"])
        .final_states(["2", "3", "4"])
        .with_states(["1"])
        .with_transitions([
            ("0", 'a', "1"),
            ("0", 'b', "0"),
            ("1", 'a', "2"),
            ("1", 'b', "0"),
            ("2", 'a', "3"),
            ("2", 'b', "4"),
            ("3", 'a', "4"),
            ("3", 'b', "2"),
            ("4", 'a', "2"),
            ("4", 'b', "3"),
        ])
        .build()
        .unwrap()
}
