use crate::collection::CollectionTypeDescription;
use std::fmt;

/// Which side of a connection a terminal sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Input,
    Output,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Input => "input",
            Direction::Output => "output",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The coarse kind of a terminal, used to decide when a redeclared terminal
/// must be replaced rather than updated in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KindTag {
    Data,
    Collection,
    Parameter,
}

/// What an input terminal consumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputKind {
    /// Individual datasets.
    Data,
    /// A collection whose bare shape is one of `collection_types`.
    Collection {
        collection_types: Vec<CollectionTypeDescription>,
    },
    /// A typed parameter value such as an integer.
    Parameter { parameter_type: String },
}

/// What an output terminal produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputKind {
    Data,
    /// `collection_type` is `Any` when the shape is only known at runtime.
    Collection {
        collection_type: CollectionTypeDescription,
    },
    Parameter { parameter_type: String },
}

impl InputKind {
    pub fn tag(&self) -> KindTag {
        match self {
            InputKind::Data => KindTag::Data,
            InputKind::Collection { .. } => KindTag::Collection,
            InputKind::Parameter { .. } => KindTag::Parameter,
        }
    }
}

impl OutputKind {
    pub fn tag(&self) -> KindTag {
        match self {
            OutputKind::Data => KindTag::Data,
            OutputKind::Collection { .. } => KindTag::Collection,
            OutputKind::Parameter { .. } => KindTag::Parameter,
        }
    }
}

/// Direction-specific state of a terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalRole {
    Input {
        kind: InputKind,
        /// Accepts any number of connections.
        multiple: bool,
    },
    Output {
        kind: OutputKind,
        /// Datatype the output is converted to after the step runs.
        force_datatype: Option<String>,
    },
}

impl TerminalRole {
    pub fn direction(&self) -> Direction {
        match self {
            TerminalRole::Input { .. } => Direction::Input,
            TerminalRole::Output { .. } => Direction::Output,
        }
    }

    pub fn tag(&self) -> KindTag {
        match self {
            TerminalRole::Input { kind, .. } => kind.tag(),
            TerminalRole::Output { kind, .. } => kind.tag(),
        }
    }
}
