use crate::terminal::TerminalKey;
use std::fmt;

/// Identifier of a connector, unique within one workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectorId(pub u32);

impl fmt::Display for ConnectorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An edge from one output terminal to one input terminal.
///
/// A connector refers to its endpoints by key and owns neither of them; both
/// endpoint terminals list the connector's id in their connector lists for as
/// long as it is alive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connector {
    id: ConnectorId,
    output: TerminalKey,
    input: TerminalKey,
}

impl Connector {
    pub(crate) fn new(id: ConnectorId, output: TerminalKey, input: TerminalKey) -> Self {
        Self { id, output, input }
    }

    pub fn id(&self) -> ConnectorId {
        self.id
    }

    pub fn output_handle(&self) -> &TerminalKey {
        &self.output
    }

    pub fn input_handle(&self) -> &TerminalKey {
        &self.input
    }
}

impl fmt::Display for Connector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "connector {} ({} -> {})", self.id, self.output, self.input)
    }
}
