use std::fmt::Display;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::trace;

use crate::{
    alphabet::{Alphabet, Symbol},
    math::{Map, OrderedMap, OrderedSet},
};

mod builder;
pub use builder::AutomatonBuilder;

/// A property that an operation may require of its input automaton.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Requirement {
    /// The automaton has no epsilon transitions and at most one transition per state and symbol.
    Deterministic,
    /// Every state has an outgoing transition for every symbol of the alphabet.
    Complete,
    /// The automaton has at least one initial state.
    InitialState,
}

impl Display for Requirement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Requirement::Deterministic => write!(f, "a deterministic automaton"),
            Requirement::Complete => write!(f, "a complete automaton"),
            Requirement::InitialState => write!(f, "an automaton with an initial state"),
        }
    }
}

/// Errors that are raised by the operations on an [`Automaton`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AutomatonError {
    /// The input does not have a property that the operation needs.
    #[error("{operation} requires {requirement}")]
    Precondition {
        /// Name of the operation that failed.
        operation: &'static str,
        /// The property that does not hold.
        requirement: Requirement,
    },
    /// A transition refers to a state that does not exist.
    #[error("unknown state \"{0}\"")]
    UnknownState(String),
    /// Two automata that should share their alphabet do not.
    #[error("alphabets differ: {left:?} and {right:?}")]
    AlphabetMismatch {
        /// Alphabet of the left operand.
        left: Vec<Symbol>,
        /// Alphabet of the right operand.
        right: Vec<Symbol>,
    },
}

/// A state of an [`Automaton`]. States are identified by their name, which is unique within
/// the automaton they belong to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct State {
    /// Name of the state.
    pub name: String,
    /// Whether runs may start in this state.
    pub is_initial: bool,
    /// Whether the state is accepting.
    pub is_final: bool,
}

impl State {
    /// Creates a new state.
    pub fn new<S: Into<String>>(name: S, is_initial: bool, is_final: bool) -> Self {
        Self {
            name: name.into(),
            is_initial,
            is_final,
        }
    }
}

/// A transition leads from the state named `source` to the state named `destination` when
/// reading `symbol`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Transition {
    /// Name of the state the transition leaves.
    pub source: String,
    /// The symbol labeling the transition.
    pub symbol: Symbol,
    /// Name of the state the transition enters.
    pub destination: String,
}

impl Transition {
    /// Creates a new transition.
    pub fn new<S, Y, D>(source: S, symbol: Y, destination: D) -> Self
    where
        S: Into<String>,
        Y: Into<Symbol>,
        D: Into<String>,
    {
        Self {
            source: source.into(),
            symbol: symbol.into(),
            destination: destination.into(),
        }
    }
}

impl Display for Transition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -{}-> {}", self.source, self.symbol, self.destination)
    }
}

/// A finite automaton over named states, which may be deterministic or not.
///
/// The automaton owns its states, its transitions and its alphabet. States can only be
/// referred to by name and every transition is guaranteed to connect two states that exist:
/// [`Automaton::add_transition`] rejects unknown endpoints and [`Automaton::remove_state`]
/// removes all transitions touching the removed state. Adding a transition also adds its
/// symbol to the alphabet, so the alphabet always covers all transition labels.
///
/// All derived automata (completion, complement, subset construction, products and the
/// minimized automaton) are built as new values, the automaton they are computed from is
/// left untouched.
///
/// # Example
/// ```
/// use automata_lab::prelude::*;
///
/// let mut aut = Automaton::new("ends_in_a");
/// aut.add_state("q0", true, false);
/// aut.add_state("q1", false, true);
/// aut.add_transition("q0", 'a', "q1").unwrap();
/// aut.add_transition("q0", 'b', "q0").unwrap();
/// aut.add_transition("q1", 'a', "q1").unwrap();
/// aut.add_transition("q1", 'b', "q0").unwrap();
///
/// assert!(aut.is_deterministic());
/// assert!(aut.is_complete());
/// assert!(aut.recognizes("ba"));
/// assert!(!aut.recognizes("ab"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Automaton {
    name: String,
    states: OrderedMap<String, State>,
    transitions: Vec<Transition>,
    alphabet: Alphabet,
}

impl Automaton {
    /// Name of the state that [`Automaton::complete`] adds as a sink.
    pub const SINK: &'static str = "SINK";

    /// Creates an empty automaton with the given name.
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            states: OrderedMap::new(),
            transitions: vec![],
            alphabet: Alphabet::new(),
        }
    }

    /// Creates an empty automaton over the given alphabet.
    pub fn with_alphabet<S: Into<String>>(name: S, alphabet: Alphabet) -> Self {
        Self {
            alphabet,
            ..Self::new(name)
        }
    }

    /// Returns a builder for an automaton with the given name, see [`AutomatonBuilder`].
    pub fn builder<S: Into<String>>(name: S) -> AutomatonBuilder {
        AutomatonBuilder::new(name)
    }

    /// The name of the automaton.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Changes the name of the automaton.
    pub fn rename<S: Into<String>>(&mut self, name: S) {
        self.name = name.into();
    }

    /// The alphabet of the automaton.
    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// Returns the number of states.
    pub fn size(&self) -> usize {
        self.states.len()
    }

    /// Iterates over all states, ordered by name.
    pub fn states(&self) -> impl Iterator<Item = &State> + '_ {
        self.states.values()
    }

    /// Iterates over the names of all states in ascending order.
    pub fn state_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.states.keys().map(String::as_str)
    }

    /// Looks up the state with the given name.
    pub fn state(&self, name: &str) -> Option<&State> {
        self.states.get(name)
    }

    /// Returns true if a state with the given name exists.
    pub fn contains_state(&self, name: &str) -> bool {
        self.states.contains_key(name)
    }

    /// All transitions in the order in which they were added.
    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    /// Iterates over the states that are flagged initial, ordered by name.
    pub fn initial_states(&self) -> impl Iterator<Item = &State> + '_ {
        self.states().filter(|q| q.is_initial)
    }

    /// Iterates over the states that are flagged final, ordered by name.
    pub fn final_states(&self) -> impl Iterator<Item = &State> + '_ {
        self.states().filter(|q| q.is_final)
    }

    /// Returns the initial state with the smallest name. Deterministic walks such as
    /// [`Automaton::recognizes`] start in this state.
    pub fn initial_state(&self) -> Option<&State> {
        self.initial_states().next()
    }

    /// Returns true if the state with the given name exists and is final.
    pub fn is_final(&self, name: &str) -> bool {
        self.states.get(name).is_some_and(|q| q.is_final)
    }

    /// Adds `symbol` to the alphabet, returns true if it was not present before.
    pub fn add_symbol<S: Into<Symbol>>(&mut self, symbol: S) -> bool {
        self.alphabet.insert(symbol.into())
    }

    /// Adds a state with the given flags. If a state with that name already exists, it is left
    /// unchanged and `false` is returned.
    pub fn add_state<S: Into<String>>(&mut self, name: S, is_initial: bool, is_final: bool) -> bool {
        let name = name.into();
        if self.states.contains_key(&name) {
            return false;
        }
        trace!("adding state {name} (initial: {is_initial}, final: {is_final})");
        self.states
            .insert(name.clone(), State::new(name, is_initial, is_final));
        true
    }

    /// Sets whether the given state is initial.
    pub fn set_initial(&mut self, name: &str, is_initial: bool) -> Result<(), AutomatonError> {
        self.states
            .get_mut(name)
            .map(|q| q.is_initial = is_initial)
            .ok_or_else(|| AutomatonError::UnknownState(name.to_string()))
    }

    /// Sets whether the given state is final.
    pub fn set_final(&mut self, name: &str, is_final: bool) -> Result<(), AutomatonError> {
        self.states
            .get_mut(name)
            .map(|q| q.is_final = is_final)
            .ok_or_else(|| AutomatonError::UnknownState(name.to_string()))
    }

    /// Removes the state with the given name together with every transition that
    /// leaves or enters it. Returns the removed state, if it existed.
    pub fn remove_state(&mut self, name: &str) -> Option<State> {
        let removed = self.states.remove(name)?;
        self.transitions
            .retain(|t| t.source != name && t.destination != name);
        trace!("removed state {name} and its transitions");
        Some(removed)
    }

    /// Adds a transition from `source` to `destination` on `symbol`. Both states must exist,
    /// otherwise [`AutomatonError::UnknownState`] is returned and nothing changes. The symbol
    /// is added to the alphabet. A transition that is already present is not added a second
    /// time, in which case `Ok(false)` is returned.
    pub fn add_transition<S, Y, D>(
        &mut self,
        source: S,
        symbol: Y,
        destination: D,
    ) -> Result<bool, AutomatonError>
    where
        S: Into<String>,
        Y: Into<Symbol>,
        D: Into<String>,
    {
        let transition = Transition::new(source, symbol, destination);
        for endpoint in [&transition.source, &transition.destination] {
            if !self.states.contains_key(endpoint) {
                return Err(AutomatonError::UnknownState(endpoint.clone()));
            }
        }
        if self.transitions.contains(&transition) {
            return Ok(false);
        }
        self.alphabet.insert(transition.symbol.clone());
        self.transitions.push(transition);
        Ok(true)
    }

    /// Removes the transition with the given source, symbol and destination. Returns true if
    /// such a transition existed.
    pub fn remove_transition<Y: Into<Symbol>>(
        &mut self,
        source: &str,
        symbol: Y,
        destination: &str,
    ) -> bool {
        let symbol = symbol.into();
        let before = self.transitions.len();
        self.transitions.retain(|t| {
            !(t.source == source && t.symbol == symbol && t.destination == destination)
        });
        before != self.transitions.len()
    }

    /// Iterates over the transitions leaving the given state.
    pub fn edges_from<'a>(&'a self, source: &'a str) -> impl Iterator<Item = &'a Transition> + 'a {
        self.transitions.iter().filter(move |t| t.source == source)
    }

    /// Iterates over the names of all states reached from `source` on `symbol`.
    pub fn successors<'a>(
        &'a self,
        source: &'a str,
        symbol: &'a Symbol,
    ) -> impl Iterator<Item = &'a str> + 'a {
        self.edges_from(source)
            .filter(move |t| &t.symbol == symbol)
            .map(|t| t.destination.as_str())
    }

    /// Returns the destination of the first transition (in insertion order) that leaves
    /// `source` on `symbol`. For deterministic automata this is the unique successor.
    pub fn successor(&self, source: &str, symbol: &Symbol) -> Option<&str> {
        self.transitions
            .iter()
            .find(|t| t.source == source && &t.symbol == symbol)
            .map(|t| t.destination.as_str())
    }

    /// Collects the successors of all states, indexed by state and symbol.
    pub(crate) fn successor_index(&self) -> Map<(&str, &Symbol), OrderedSet<&str>> {
        let mut index: Map<(&str, &Symbol), OrderedSet<&str>> = Map::default();
        for t in &self.transitions {
            index
                .entry((t.source.as_str(), &t.symbol))
                .or_default()
                .insert(t.destination.as_str());
        }
        index
    }

    /// Returns true if the automaton is deterministic. That is the case if no transition is
    /// labeled with an epsilon marker and no two transitions share both source and symbol.
    /// Note that the number of initial states plays no role here.
    pub fn is_deterministic(&self) -> bool {
        if self.transitions.iter().any(|t| t.symbol.is_epsilon()) {
            return false;
        }
        let mut seen = crate::math::Set::default();
        self.transitions
            .iter()
            .all(|t| seen.insert((t.source.as_str(), &t.symbol)))
    }

    /// Returns true if every state has at least one outgoing transition for every symbol
    /// of the alphabet.
    pub fn is_complete(&self) -> bool {
        self.states.keys().all(|q| {
            let seen: OrderedSet<&Symbol> = self.edges_from(q).map(|t| &t.symbol).collect();
            seen.len() == self.alphabet.len() && self.alphabet.iter().all(|a| seen.contains(a))
        })
    }

    /// Fails with a [`AutomatonError::Precondition`] for `operation` if `requirement`
    /// does not hold.
    pub(crate) fn require(
        &self,
        requirement: Requirement,
        operation: &'static str,
    ) -> Result<(), AutomatonError> {
        let holds = match requirement {
            Requirement::Deterministic => self.is_deterministic(),
            Requirement::Complete => self.is_complete(),
            Requirement::InitialState => self.initial_state().is_some(),
        };
        if holds {
            Ok(())
        } else {
            Err(AutomatonError::Precondition {
                operation,
                requirement,
            })
        }
    }

    /// Produces a textual summary listing the name, the initial and final states, all states,
    /// the alphabet and the transitions of the automaton.
    pub fn summary(&self) -> String {
        let mut out = format!("Automaton: {}\n", self.name);
        out.push_str(&format!(
            "Initial states: [{}]\n",
            self.initial_states().map(|q| &q.name).join(", ")
        ));
        out.push_str(&format!(
            "Final states: [{}]\n",
            self.final_states().map(|q| &q.name).join(", ")
        ));
        out.push_str(&format!("All states: [{}]\n", self.state_names().join(", ")));
        out.push_str(&format!("Alphabet: [{}]\n", self.alphabet.iter().join(", ")));
        out.push_str("Transitions:\n");
        for t in &self.transitions {
            out.push_str(&format!("  {t}\n"));
        }
        out
    }

    /// Builds a table with one row per state and one column per symbol, where each cell lists
    /// the successors of the state on the symbol. Initial states are prefixed with `->` and
    /// final states are marked with a trailing `*`.
    pub fn transition_table(&self) -> String {
        let index = self.successor_index();
        let mut builder = tabled::builder::Builder::default();
        builder.push_record(
            std::iter::once("State".to_string()).chain(self.alphabet.iter().map(|s| s.to_string())),
        );
        for q in self.states() {
            let mut row = vec![format!(
                "{}{}{}",
                if q.is_initial { "->" } else { "" },
                q.name,
                if q.is_final { "*" } else { "" }
            )];
            for sym in &self.alphabet {
                row.push(match index.get(&(q.name.as_str(), sym)) {
                    Some(targets) => targets.iter().join(","),
                    None => "-".to_string(),
                });
            }
            builder.push_record(row);
        }

        builder
            .build()
            .with(tabled::settings::Style::rounded())
            .to_string()
    }
}

impl Display for Automaton {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.summary())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::scenario_one;

    #[test_log::test]
    fn unknown_endpoints_are_rejected() {
        let mut aut = Automaton::new("A");
        aut.add_state("q0", true, false);
        assert_eq!(
            aut.add_transition("q0", 'a', "q1"),
            Err(AutomatonError::UnknownState("q1".into()))
        );
        assert_eq!(
            aut.add_transition("p", 'a', "q0"),
            Err(AutomatonError::UnknownState("p".into()))
        );
        assert!(aut.transitions().is_empty());
        assert!(aut.alphabet().is_empty());
    }

    #[test]
    fn duplicate_transitions_are_stored_once() {
        let mut aut = Automaton::new("A");
        aut.add_state("q0", true, true);
        assert_eq!(aut.add_transition("q0", 'a', "q0"), Ok(true));
        assert_eq!(aut.add_transition("q0", 'a', "q0"), Ok(false));
        assert_eq!(aut.transitions().len(), 1);
        assert!(aut.is_deterministic());
    }

    #[test]
    fn adding_a_state_twice_keeps_the_first() {
        let mut aut = Automaton::new("A");
        assert!(aut.add_state("q0", true, false));
        assert!(!aut.add_state("q0", false, true));
        assert_eq!(aut.state("q0"), Some(&State::new("q0", true, false)));
    }

    #[test_log::test]
    fn removing_a_state_cascades() {
        let mut aut = scenario_one();
        assert!(aut.remove_state("q1").is_some());
        assert_eq!(aut.size(), 1);
        assert_eq!(aut.transitions(), &[Transition::new("q0", 'b', "q0")]);
        assert!(aut.remove_state("q1").is_none());
        // the alphabet is left as it is
        assert_eq!(aut.alphabet().len(), 2);
    }

    #[test]
    fn remove_transition() {
        let mut aut = scenario_one();
        assert!(aut.remove_transition("q0", 'a', "q1"));
        assert!(!aut.remove_transition("q0", 'a', "q1"));
        assert!(!aut.is_complete());
    }

    #[test]
    fn scenario_one_checks() {
        let aut = scenario_one();
        assert!(aut.is_deterministic());
        assert!(aut.is_complete());
    }

    #[test]
    fn determinism_counts_literal_multiplicity() {
        let mut aut = Automaton::new("nfa");
        aut.add_state("q0", true, false);
        aut.add_state("q1", false, true);
        aut.add_state("q2", false, true);
        aut.add_transition("q0", 'a', "q1").unwrap();
        assert!(aut.is_deterministic());
        aut.add_transition("q0", 'a', "q2").unwrap();
        assert!(!aut.is_deterministic());
    }

    #[test]
    fn epsilon_transitions_are_nondeterministic() {
        for eps in ["", Symbol::EPSILON] {
            let mut aut = Automaton::new("eps");
            aut.add_state("q0", true, false);
            aut.add_state("q1", false, true);
            aut.add_transition("q0", eps, "q1").unwrap();
            assert!(!aut.is_deterministic());
        }
    }

    #[test]
    fn multiple_initial_states_do_not_matter_for_determinism() {
        let aut = Automaton::builder("two_initial")
            .initial_states(["p", "q"])
            .with_transitions([("p", 'a', "q"), ("q", 'a', "p")])
            .build()
            .unwrap();
        assert!(aut.is_deterministic());
        assert_eq!(aut.initial_state().map(|q| q.name.as_str()), Some("p"));
    }

    #[test]
    fn completeness_with_unused_symbols() {
        let mut aut = Automaton::with_alphabet("A", crate::alphabet::alphabet(['a', 'b']));
        aut.add_state("q0", true, true);
        aut.add_transition("q0", 'a', "q0").unwrap();
        assert!(!aut.is_complete());
        aut.add_transition("q0", 'b', "q0").unwrap();
        assert!(aut.is_complete());
    }

    #[test]
    fn set_flags() {
        let mut aut = scenario_one();
        aut.set_final("q0", true).unwrap();
        aut.set_initial("q1", true).unwrap();
        assert_eq!(aut.final_states().count(), 2);
        assert_eq!(aut.initial_states().count(), 2);
        assert!(aut.set_final("missing", true).is_err());
    }

    #[test]
    fn summary_lists_everything() {
        let aut = scenario_one();
        let expected = "Automaton: scenario_one\n\
                        Initial states: [q0]\n\
                        Final states: [q1]\n\
                        All states: [q0, q1]\n\
                        Alphabet: [a, b]\n\
                        Transitions:\n  \
                        q0 -a-> q1\n  \
                        q0 -b-> q0\n  \
                        q1 -a-> q1\n  \
                        q1 -b-> q0\n";
        assert_eq!(aut.summary(), expected);
        assert_eq!(aut.to_string(), expected);
    }

    #[test]
    fn transition_table_marks_states() {
        let table = scenario_one().transition_table();
        assert!(table.contains("->q0"));
        assert!(table.contains("q1*"));
        assert!(table.contains("State"));
    }

    #[test]
    fn precondition_errors_are_descriptive() {
        let err = AutomatonError::Precondition {
            operation: "complement",
            requirement: Requirement::Complete,
        };
        assert_eq!(err.to_string(), "complement requires a complete automaton");
    }
}
