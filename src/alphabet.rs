use std::fmt::{Debug, Display};

use serde::{Deserialize, Serialize};

use crate::math::OrderedSet;

/// A symbol labels the transitions of an automaton. Symbols are opaque tokens which by
/// convention consist of a single character, but nothing in the crate relies on that.
///
/// Symbols are ordered by their textual representation, and whenever an operation needs to
/// go through the alphabet in a fixed order (subset construction, minimization signatures,
/// enumeration of words), it uses this order.
#[derive(Clone, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    /// The conventional marker for epsilon transitions. The empty string is treated the same way.
    pub const EPSILON: &'static str = "ε";

    /// Creates a new symbol from its textual representation.
    pub fn new<S: Into<String>>(repr: S) -> Self {
        Self(repr.into())
    }

    /// Returns the symbol that is used to mark epsilon transitions.
    pub fn epsilon() -> Self {
        Self(Self::EPSILON.to_string())
    }

    /// Returns true if `self` marks an epsilon transition, i.e. if it is empty or equal to
    /// [`Symbol::EPSILON`]. Epsilon transitions make an automaton nondeterministic, but are
    /// otherwise treated like any other symbol.
    pub fn is_epsilon(&self) -> bool {
        self.0.is_empty() || self.0 == Self::EPSILON
    }

    /// Gives the textual representation of the symbol.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Debug for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Symbol {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for Symbol {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<char> for Symbol {
    fn from(value: char) -> Self {
        Self(value.to_string())
    }
}

impl From<&Symbol> for Symbol {
    fn from(value: &Symbol) -> Self {
        value.clone()
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// An alphabet is simply a set of [`Symbol`]s. We use an ordered set, which means iterating
/// over an alphabet always yields the symbols in their canonical order.
pub type Alphabet = OrderedSet<Symbol>;

/// Builds an [`Alphabet`] from anything that can be turned into symbols.
///
/// ```
/// use automata_lab::alphabet::alphabet;
/// let sigma = alphabet(['b', 'a', 'b']);
/// assert_eq!(sigma.len(), 2);
/// assert_eq!(sigma.iter().next().unwrap().as_str(), "a");
/// ```
pub fn alphabet<S, I>(symbols: I) -> Alphabet
where
    S: Into<Symbol>,
    I: IntoIterator<Item = S>,
{
    symbols.into_iter().map(Into::into).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epsilon_markers() {
        assert!(Symbol::from("").is_epsilon());
        assert!(Symbol::epsilon().is_epsilon());
        assert!(Symbol::from('ε').is_epsilon());
        assert!(!Symbol::from('e').is_epsilon());
    }

    #[test]
    fn symbols_are_ordered_by_representation() {
        let sigma = alphabet(["c", "a", "ab", "b"]);
        let ordered: Vec<_> = sigma.iter().map(Symbol::as_str).collect();
        assert_eq!(ordered, vec!["a", "ab", "b", "c"]);
    }
}
