use crate::{
    alphabet::Symbol,
    math::{OrderedMap, OrderedSet},
};

use super::{Automaton, AutomatonError};

/// Helper for constructing an [`Automaton`] in one go. States are collected from
/// [`AutomatonBuilder::with_states`], [`AutomatonBuilder::initial_states`] and
/// [`AutomatonBuilder::final_states`]. Transitions are added through
/// [`Automaton::add_transition`] when calling [`AutomatonBuilder::build`], so referring to a
/// state that was never declared makes `build` fail.
///
/// # Example
///
/// We want an automaton with states `q0` (initial) and `q1` (final) over the alphabet
/// `{a, b}`, which accepts all words ending in `a`.
/// ```
/// use automata_lab::prelude::*;
///
/// let aut = Automaton::builder("ends_in_a")
///     .initial_states(["q0"])
///     .final_states(["q1"])
///     .with_transitions([("q0", 'a', "q1"), ("q0", 'b', "q0"), ("q1", 'a', "q1"), ("q1", 'b', "q0")])
///     .build()
///     .unwrap();
/// assert_eq!(aut.size(), 2);
/// assert!(aut.recognizes("bba"));
/// ```
#[derive(Debug, Clone)]
pub struct AutomatonBuilder {
    name: String,
    symbols: OrderedSet<Symbol>,
    states: OrderedMap<String, (bool, bool)>,
    transitions: Vec<(String, Symbol, String)>,
}

impl AutomatonBuilder {
    /// Creates a builder for an automaton with the given name.
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            symbols: OrderedSet::new(),
            states: OrderedMap::new(),
            transitions: vec![],
        }
    }

    /// By default, the alphabet consists of the symbols appearing on transitions. This
    /// forces additional symbols to be part of the alphabet.
    pub fn with_alphabet_symbols<S, I>(mut self, symbols: I) -> Self
    where
        S: Into<Symbol>,
        I: IntoIterator<Item = S>,
    {
        self.symbols.extend(symbols.into_iter().map(Into::into));
        self
    }

    /// Declares states that are neither initial nor final (unless marked so elsewhere).
    pub fn with_states<S, I>(mut self, names: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = S>,
    {
        for name in names {
            self.states.entry(name.into()).or_insert((false, false));
        }
        self
    }

    /// Declares the given states and marks them initial.
    pub fn initial_states<S, I>(mut self, names: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = S>,
    {
        for name in names {
            self.states.entry(name.into()).or_insert((false, false)).0 = true;
        }
        self
    }

    /// Declares the given states and marks them final.
    pub fn final_states<S, I>(mut self, names: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = S>,
    {
        for name in names {
            self.states.entry(name.into()).or_insert((false, false)).1 = true;
        }
        self
    }

    /// Adds a list of transitions given as `(source, symbol, destination)` triples.
    pub fn with_transitions<S, Y, D, I>(mut self, transitions: I) -> Self
    where
        S: Into<String>,
        Y: Into<Symbol>,
        D: Into<String>,
        I: IntoIterator<Item = (S, Y, D)>,
    {
        self.transitions.extend(
            transitions
                .into_iter()
                .map(|(s, y, d)| (s.into(), y.into(), d.into())),
        );
        self
    }

    /// Builds the automaton, failing with [`AutomatonError::UnknownState`] if a transition
    /// refers to a state that was not declared.
    pub fn build(self) -> Result<Automaton, AutomatonError> {
        let mut aut = Automaton::with_alphabet(self.name, self.symbols);
        for (name, (is_initial, is_final)) in self.states {
            aut.add_state(name, is_initial, is_final);
        }
        for (source, symbol, destination) in self.transitions {
            aut.add_transition(source, symbol, destination)?;
        }
        Ok(aut)
    }
}
