//! Export of automata to the DOT format of graphviz. Drawing the graph is left to the external
//! `dot` program, which is only invoked with the `graphviz` feature. If it is not installed or
//! fails, no picture is produced, but none of the operations on automata are affected.

use std::fmt::Display;

use itertools::Itertools;
use thiserror::Error;

use crate::prelude::*;

/// Errors raised when handing a DOT representation to graphviz.
#[derive(Error, Debug)]
pub enum RenderError {
    /// Spawning or talking to the `dot` process failed.
    #[error("error when running dot: \"{0:?}\"")]
    Io(#[from] std::io::Error),
    /// The `dot` process exited unsuccessfully.
    #[error("child process had non-zero exit status \"{0}\"")]
    NonZeroExit(std::process::ExitStatus),
}

/// Enum that abstracts attributes of nodes in the DOT format.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum DotStateAttribute {
    /// The label of a node
    Label(String),
    /// The shape of a node
    Shape(String),
}

impl Display for DotStateAttribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DotStateAttribute::Label(s) => write!(f, "label={}", quote(s)),
            DotStateAttribute::Shape(s) => write!(f, "shape={}", quote(s)),
        }
    }
}

/// Enum that abstracts attributes of edges in the DOT format.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum DotTransitionAttribute {
    /// The label of an edge
    Label(String),
}

impl Display for DotTransitionAttribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DotTransitionAttribute::Label(lbl) => write!(f, "label={}", quote(lbl)),
        }
    }
}

/// Turns `name` into a quoted DOT identifier, so arbitrary state names can be used.
fn quote(name: &str) -> String {
    format!("\"{}\"", name.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Name of the invisible node from which an arrow points to the initial state with the
/// given position.
fn start_node(position: usize) -> String {
    quote(&format!("__start{position}"))
}

impl Automaton {
    fn dot_state_attributes(&self, state: &State) -> [DotStateAttribute; 2] {
        let shape = if state.is_final {
            "doublecircle"
        } else {
            "circle"
        };
        [
            DotStateAttribute::Shape(shape.into()),
            DotStateAttribute::Label(state.name.clone()),
        ]
    }

    /// Compute the graphviz representation, for more information on the DOT format,
    /// see the [graphviz documentation](https://graphviz.org/doc/info/lang.html).
    ///
    /// Final states are drawn as double circles, every initial state is entered by an arrow
    /// coming from an invisible node.
    pub fn dot_representation(&self) -> String {
        let header = [
            format!("digraph {} {{", quote(self.name())),
            "rankdir=LR".to_string(),
        ];

        let states = self.states().map(|q| {
            format!(
                "{} [{}]",
                quote(&q.name),
                self.dot_state_attributes(q).iter().join(", ")
            )
        });

        let arrows = self.initial_states().enumerate().flat_map(|(i, q)| {
            [
                format!("{} [label=\"\", shape=none]", start_node(i)),
                format!("{} -> {}", start_node(i), quote(&q.name)),
            ]
        });

        let transitions = self.transitions().iter().map(|t| {
            format!(
                "{} -> {} [{}]",
                quote(&t.source),
                quote(&t.destination),
                DotTransitionAttribute::Label(t.symbol.to_string())
            )
        });

        header
            .into_iter()
            .chain(states)
            .chain(arrows)
            .chain(transitions)
            .chain(std::iter::once("}".to_string()))
            .join("\n")
    }

    /// Renders the automaton visually (as PNG) and returns the bytes of the image. This pipes
    /// the DOT representation through the `dot` executable, which must be installed.
    #[cfg(feature = "graphviz")]
    pub fn render_graphviz(&self) -> Result<Vec<u8>, RenderError> {
        use std::io::{Read, Write};
        use tracing::trace;

        let dot = self.dot_representation();
        trace!("writing dot representation\n{}", dot);

        let mut child = std::process::Command::new("dot")
            .arg("-Tpng")
            .stdin(std::process::Stdio::piped())
            .stdout(std::process::Stdio::piped())
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(dot.as_bytes())?;
        }

        let mut output = Vec::new();
        if let Some(mut stdout) = child.stdout.take() {
            stdout.read_to_end(&mut output)?;
        }

        let status = child.wait()?;
        if !status.success() {
            return Err(RenderError::NonZeroExit(status));
        }

        Ok(output)
    }

    /// Like [`Automaton::render_graphviz`], but a failure only results in a warning being
    /// logged and `None` being returned.
    #[cfg(feature = "graphviz")]
    pub fn try_render(&self) -> Option<Vec<u8>> {
        match self.render_graphviz() {
            Ok(png) => Some(png),
            Err(e) => {
                tracing::warn!("could not render {}: {e}", self.name());
                None
            }
        }
    }
}
