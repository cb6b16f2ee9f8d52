use std::fmt::{Debug, Display};

use itertools::Itertools;

use crate::alphabet::Symbol;

/// A finite word, that is a finite sequence of [`Symbol`]s.
///
/// Words are ordered lexicographically over their symbols. Converting a `&str` into a word
/// splits it into one-character symbols, which matches the usual convention of naming symbols
/// by single characters. Words over longer symbols can be collected from an iterator of symbols.
#[derive(Clone, Default, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Word(Vec<Symbol>);

impl Word {
    /// Returns the empty word.
    pub fn empty() -> Self {
        Self(vec![])
    }

    /// Returns the number of symbols in the word.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if and only if the word has no symbols.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the symbols of the word.
    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> + '_ {
        self.0.iter()
    }

    /// Returns a new word which is `self` extended by `symbol`.
    pub fn extended(&self, symbol: &Symbol) -> Self {
        let mut symbols = self.0.clone();
        symbols.push(symbol.clone());
        Self(symbols)
    }

    /// Compares two words first by length and then lexicographically.
    pub fn length_lexicographic_ord(&self, other: &Self) -> std::cmp::Ordering {
        self.len().cmp(&other.len()).then_with(|| self.cmp(other))
    }
}

impl Display for Word {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.iter().join(""))
    }
}

impl Debug for Word {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            write!(f, "ε")
        } else {
            write!(f, "\"{}\"", self)
        }
    }
}

impl From<&str> for Word {
    fn from(value: &str) -> Self {
        value.chars().map(Symbol::from).collect()
    }
}

impl From<String> for Word {
    fn from(value: String) -> Self {
        Word::from(value.as_str())
    }
}

impl From<&String> for Word {
    fn from(value: &String) -> Self {
        Word::from(value.as_str())
    }
}

impl From<Vec<Symbol>> for Word {
    fn from(value: Vec<Symbol>) -> Self {
        Self(value)
    }
}

impl From<&Word> for Word {
    fn from(value: &Word) -> Self {
        value.clone()
    }
}

impl<S: Into<Symbol>> FromIterator<S> for Word {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl PartialEq<&str> for Word {
    fn eq(&self, other: &&str) -> bool {
        *self == Word::from(*other)
    }
}
