use crate::node::NodeId;
use crate::terminal::{Direction, TerminalKey};
use thiserror::Error;

/// Errors raised while parsing a collection type such as `"list:paired"`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CollectionTypeError {
    #[error("Collection type must contain at least one segment")]
    Empty,

    #[error("Unknown collection segment '{segment}' in collection type '{collection_type}'")]
    UnknownSegment {
        segment: String,
        collection_type: String,
    },
}

/// Errors that can occur while loading a datatype hierarchy.
#[derive(Error, Debug, Clone)]
pub enum DatatypeError {
    #[error("Failed to parse datatypes mapping JSON: {0}")]
    JsonParseError(String),

    #[error("Failed to encode or decode datatypes mapping: {0}")]
    Encoding(String),
}

/// Errors that can occur while loading editor configuration.
#[derive(Error, Debug, Clone)]
pub enum ConfigError {
    #[error("Failed to parse editor configuration JSON: {0}")]
    JsonParseError(String),
}

/// Errors raised by workflow operations that address nodes or terminals.
///
/// Connection *decisions* are not errors; see `ConnectionAcceptable`. These
/// variants cover unknown identifiers and `connect` requests the caller did
/// not gate on `can_accept` first.
#[derive(Error, Debug, Clone)]
pub enum WorkflowError {
    #[error("Node {0} not found in workflow")]
    NodeNotFound(NodeId),

    #[error("Terminal {0} not found")]
    TerminalNotFound(TerminalKey),

    #[error("Terminal {key} is not an {expected} terminal")]
    DirectionMismatch {
        key: TerminalKey,
        expected: &'static str,
    },

    #[error("Cannot connect {output} to {input}: {reason}")]
    ConnectionRejected {
        output: TerminalKey,
        input: TerminalKey,
        reason: String,
    },

    #[error("Invalid declaration for terminal '{name}': {source}")]
    InvalidDeclaration {
        name: String,
        #[source]
        source: CollectionTypeError,
    },

    #[error("Terminal '{name}' is declared more than once among the {direction} terminals")]
    DuplicateTerminal { name: String, direction: Direction },
}

impl From<serde_json::Error> for DatatypeError {
    fn from(err: serde_json::Error) -> Self {
        DatatypeError::JsonParseError(err.to_string())
    }
}
