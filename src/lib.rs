//! Library for experimenting with finite automata over named states.
//!
//! The central type is [`Automaton`], which owns a set of states identified by their names, a
//! list of labeled transitions between them and an alphabet. An automaton may be
//! nondeterministic, it can have several initial states and transitions labeled with an
//! epsilon marker (see [`alphabet::Symbol::is_epsilon`]).
//!
//! On top of that the crate implements the classical constructions, each of which produces a
//! new automaton and leaves its inputs untouched:
//! - completion with a sink state and complementation of deterministic automata,
//! - the subset construction, which turns any automaton into a deterministic one,
//! - union and intersection through product constructions,
//! - minimization via partition refinement (behind the `minimize` feature).
//!
//! Further, words can be run through an automaton and accepted or rejected words can be
//! enumerated up to a given length. Automata can be stored as JSON, either directly (see
//! [`representation`]) or in a directory-backed [`library::AutomatonLibrary`], and exported
//! in the DOT format of graphviz (see [`dot`]).
#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

/// The prelude is supposed to make using this package easier. Including everything, i.e.
/// `use automata_lab::prelude::*;` should be enough to use the package.
pub mod prelude {
    pub use super::{
        alphabet::{alphabet, Alphabet, Symbol},
        automaton::{Automaton, AutomatonBuilder, AutomatonError, Requirement, State, Transition},
        language::words_up_to,
        library::{AutomatonLibrary, LibraryError},
        representation::{AutomatonRecord, RepresentationError},
        word::Word,
    };
}

/// This module contains some definitions of mathematical objects which are used throughout the crate and
/// do not really fit to the top level.
pub mod math;

/// Module that contains definitions for dealing with symbols and alphabets.
pub mod alphabet;

/// Finite words over symbols.
pub mod word;

/// Defines automata, their states and transitions together with the basic queries.
pub mod automaton;
pub use automaton::{Automaton, AutomatonError};

pub mod operations;

/// Contains the minimization of deterministic automata. This is feature gated behind the `minimize` feature.
#[cfg(feature = "minimize")]
pub mod minimization;

pub mod language;

pub mod representation;

pub mod library;

pub mod dot;

/// Implements the generation of random automata.
#[cfg(feature = "random")]
pub mod random;

#[cfg(test)]
pub(crate) mod fixtures;
