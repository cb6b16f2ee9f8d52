//! Generation of random automata over the alphabet `a, b, c, ...`. States are named `q0`,
//! `q1`, ... and `q0` is always the only initial state. All generators draw from the given
//! [`fastrand::Rng`], so seeding it makes the output reproducible.

use tracing::debug;

use crate::prelude::*;

/// The first `symbols` lowercase letters, starting at `a`.
pub fn letters(symbols: usize) -> Alphabet {
    ('a'..='z').take(symbols).map(Symbol::from).collect()
}

fn state_name(i: usize) -> String {
    format!("q{i}")
}

/// Uses a sprout-like algorithm to generate a random complete DFA. `symbols` determines the
/// size of the alphabet, see [`letters`], and `probability` is the probability with which a
/// transition goes back to an existing state. Values below `0.01` are raised to `0.01`, as the
/// generation would not terminate otherwise. The algorithm is as follows:
/// 1. Start with a single state.
/// 2. For each symbol, go through the existing states in order and with probability
///    `probability` add a transition back to that state.
/// 3. If no existing state was chosen, the transition leads to a new state.
/// 4. Repeat until all states and symbols have been treated.
///
/// Every state is final with probability one half. As no state is ever created without a
/// transition into it, the result is connected and all its states are reachable.
pub fn random_dfa(rng: &mut fastrand::Rng, symbols: usize, probability: f64) -> Automaton {
    let probability = probability.max(0.01);
    let alphabet = letters(symbols);
    let mut aut = Automaton::with_alphabet("random_dfa", alphabet.clone());
    aut.add_state(state_name(0), true, rng.bool());

    let mut current = 0;
    while current < aut.size() {
        'symbols: for sym in &alphabet {
            for target in 0..=current {
                if rng.f64() < probability {
                    add(&mut aut, current, sym, target);
                    continue 'symbols;
                }
            }
            let target = aut.size();
            aut.add_state(state_name(target), false, rng.bool());
            add(&mut aut, current, sym, target);
        }
        current += 1;
    }

    debug!("generated random DFA with {} states", aut.size());
    aut
}

/// Generates a random complete DFA with exactly `size` states (at least one), by drawing the
/// target of every transition uniformly. Depending on the draw, some states may be unreachable.
pub fn random_dfa_sized(rng: &mut fastrand::Rng, symbols: usize, size: usize) -> Automaton {
    let size = size.max(1);
    let alphabet = letters(symbols);
    let mut aut = Automaton::with_alphabet("random_dfa", alphabet.clone());
    for i in 0..size {
        aut.add_state(state_name(i), i == 0, rng.bool());
    }
    for q in 0..size {
        for sym in &alphabet {
            add(&mut aut, q, sym, rng.usize(..size));
        }
    }
    aut
}

/// Generates a random NFA with `size` states (at least one) in which every possible transition
/// is present with probability `density`.
pub fn random_nfa(rng: &mut fastrand::Rng, symbols: usize, size: usize, density: f64) -> Automaton {
    let size = size.max(1);
    let alphabet = letters(symbols);
    let mut aut = Automaton::with_alphabet("random_nfa", alphabet.clone());
    for i in 0..size {
        aut.add_state(state_name(i), i == 0, rng.bool());
    }
    for q in 0..size {
        for sym in &alphabet {
            for p in 0..size {
                if rng.f64() < density {
                    add(&mut aut, q, sym, p);
                }
            }
        }
    }
    debug!(
        "generated random NFA with {} states and {} transitions",
        aut.size(),
        aut.transitions().len()
    );
    aut
}

fn add(aut: &mut Automaton, source: usize, symbol: &Symbol, target: usize) {
    let added = aut.add_transition(state_name(source), symbol, state_name(target));
    debug_assert!(added.is_ok(), "both endpoints exist before the transition is added");
}
