//! The persisted form of an [`Automaton`]. An automaton is stored as a record with the fields
//! `name`, `alphabet`, `states` and `transitions`, which is what [`AutomatonRecord`]
//! (de)serializes. Reading a record replays the insertion of symbols, states and transitions,
//! so a record that refers to an undeclared state is rejected.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::prelude::*;

/// Errors raised when reading or writing the persisted form of an automaton.
#[derive(Debug, Error)]
pub enum RepresentationError {
    /// The input is not valid JSON or does not have the expected shape.
    #[error("could not (de)serialize automaton: {0}")]
    Json(#[from] serde_json::Error),
    /// The record describes an automaton that violates an invariant.
    #[error("invalid automaton record: {0}")]
    Automaton(#[from] AutomatonError),
}

/// Plain record holding everything needed to rebuild an [`Automaton`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutomatonRecord {
    /// Name of the automaton.
    pub name: String,
    /// The symbols of the alphabet.
    #[serde(default)]
    pub alphabet: Vec<Symbol>,
    /// All states with their flags.
    pub states: Vec<State>,
    /// All transitions.
    #[serde(default)]
    pub transitions: Vec<Transition>,
}

impl From<&Automaton> for AutomatonRecord {
    fn from(aut: &Automaton) -> Self {
        Self {
            name: aut.name().to_string(),
            alphabet: aut.alphabet().iter().cloned().collect(),
            states: aut.states().cloned().collect(),
            transitions: aut.transitions().to_vec(),
        }
    }
}

impl TryFrom<AutomatonRecord> for Automaton {
    type Error = AutomatonError;

    fn try_from(record: AutomatonRecord) -> Result<Self, Self::Error> {
        let mut aut = Automaton::new(record.name);
        for symbol in record.alphabet {
            aut.add_symbol(symbol);
        }
        for state in record.states {
            aut.add_state(state.name, state.is_initial, state.is_final);
        }
        for t in record.transitions {
            aut.add_transition(t.source, t.symbol, t.destination)?;
        }
        Ok(aut)
    }
}

impl Automaton {
    /// Converts `self` into its persisted form.
    pub fn to_record(&self) -> AutomatonRecord {
        self.into()
    }

    /// Rebuilds an automaton from its persisted form.
    pub fn from_record(record: AutomatonRecord) -> Result<Automaton, AutomatonError> {
        record.try_into()
    }

    /// Serializes `self` as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, RepresentationError> {
        Ok(serde_json::to_string_pretty(&self.to_record())?)
    }

    /// Reads an automaton from its JSON representation.
    pub fn from_json(json: &str) -> Result<Automaton, RepresentationError> {
        let record: AutomatonRecord = serde_json::from_str(json)?;
        let aut = Automaton::from_record(record)?;
        debug!(
            "read automaton {} with {} states and {} transitions",
            aut.name(),
            aut.size(),
            aut.transitions().len()
        );
        Ok(aut)
    }
}

#[cfg(test)]
mod tests {
    use crate::{fixtures::*, prelude::*};

    use super::{AutomatonRecord, RepresentationError};

    #[test_log::test]
    fn json_round_trip() {
        for aut in [scenario_one(), scenario_two(), contains_aa_redundant()] {
            let json = aut.to_json().unwrap();
            let back = Automaton::from_json(&json).unwrap();
            assert_eq!(back.name(), aut.name());
            assert_eq!(back.alphabet(), aut.alphabet());
            assert_eq!(back.states().collect::<Vec<_>>(), aut.states().collect::<Vec<_>>());
            let mut left = back.transitions().to_vec();
            let mut right = aut.transitions().to_vec();
            left.sort();
            right.sort();
            assert_eq!(left, right);
            assert!(aut.is_equivalent_bounded(&back, 5));
        }
    }

    #[test]
    fn field_names_are_stable() {
        let value = serde_json::to_value(scenario_three().to_record()).unwrap();
        assert_eq!(value["name"], "scenario_three");
        assert_eq!(value["alphabet"], serde_json::json!(["a", "b"]));
        assert_eq!(
            value["states"][0],
            serde_json::json!({"name": "q0", "is_initial": true, "is_final": false})
        );
        assert_eq!(
            value["transitions"][0],
            serde_json::json!({"source": "q0", "symbol": "a", "destination": "q1"})
        );
    }

    #[test]
    fn state_order_does_not_matter() {
        let json = r#"{
            "name": "shuffled",
            "alphabet": ["a"],
            "states": [
                {"name": "q1", "is_initial": false, "is_final": true},
                {"name": "q0", "is_initial": true, "is_final": false}
            ],
            "transitions": [{"source": "q0", "symbol": "a", "destination": "q1"}]
        }"#;
        let aut = Automaton::from_json(json).unwrap();
        assert_eq!(aut.state_names().collect::<Vec<_>>(), vec!["q0", "q1"]);
        assert!(aut.recognizes("a"));
    }

    #[test]
    fn alphabet_only_symbols_survive() {
        let record = AutomatonRecord {
            name: "lonely".into(),
            alphabet: vec!['z'.into()],
            states: vec![State::new("q", true, false)],
            transitions: vec![],
        };
        let aut = Automaton::from_record(record).unwrap();
        assert!(aut.alphabet().contains(&Symbol::from('z')));
        assert!(!aut.is_complete());
    }

    #[test]
    fn undeclared_states_are_rejected() {
        let json = r#"{
            "name": "broken",
            "alphabet": ["a"],
            "states": [{"name": "q0", "is_initial": true, "is_final": false}],
            "transitions": [{"source": "q0", "symbol": "a", "destination": "q9"}]
        }"#;
        assert!(matches!(
            Automaton::from_json(json),
            Err(RepresentationError::Automaton(AutomatonError::UnknownState(q))) if q == "q9"
        ));
        assert!(matches!(
            Automaton::from_json("{ not json"),
            Err(RepresentationError::Json(_))
        ));
    }
}
