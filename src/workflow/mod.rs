//! The workflow arena: owns every node and connector and runs all operations
//! that span more than one terminal.
//!
//! Terminals and connectors never point at each other directly. A connector
//! stores the [`TerminalKey`] of each endpoint and each terminal stores the
//! [`ConnectorId`]s it takes part in, so removing either side can never leave
//! a dangling reference behind.

use crate::config::EditorConfig;
use crate::connector::{Connector, ConnectorId};
use crate::datatypes::DatatypeCompatibility;
use crate::error::WorkflowError;
use crate::node::{Node, NodeId};
use crate::terminal::{Direction, Terminal, TerminalKey};
use ahash::AHashMap;
use std::fmt;

pub mod acceptance;
pub mod builder;
pub mod connection;
pub mod events;
pub mod fields;
pub mod mapping;

pub use builder::WorkflowBuilder;
pub use events::{ChangeEvent, Subscriber};

use events::EventJournal;

/// All nodes and connectors of one editor canvas.
pub struct Workflow {
    nodes: AHashMap<NodeId, Node>,
    connectors: AHashMap<ConnectorId, Connector>,
    next_node_id: u32,
    next_connector_id: u32,
    datatypes: Box<dyn DatatypeCompatibility>,
    config: EditorConfig,
    events: EventJournal,
}

impl Workflow {
    /// A workflow with the default [`EditorConfig`].
    pub fn new(datatypes: impl DatatypeCompatibility + 'static) -> Self {
        WorkflowBuilder::new(datatypes).build()
    }

    pub fn builder(datatypes: impl DatatypeCompatibility + 'static) -> WorkflowBuilder {
        WorkflowBuilder::new(datatypes)
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn datatypes(&self) -> &dyn DatatypeCompatibility {
        self.datatypes.as_ref()
    }

    /// Adds an empty node; its terminals arrive with the first
    /// [`update_field_data`](Self::update_field_data).
    pub fn add_node(&mut self, node_type: &str, name: &str) -> NodeId {
        let id = NodeId(self.next_node_id);
        self.next_node_id += 1;
        self.nodes.insert(id, Node::new(id, node_type, name));
        log::debug!("Added {} node '{}' as {}", node_type, name, id);
        self.events.emit(ChangeEvent::NodeChanged(id));
        id
    }

    /// Removes a node after destroying all of its terminals and their
    /// connectors. Returns `false` if the node was already gone.
    pub fn remove_node(&mut self, id: NodeId) -> bool {
        let Some(node) = self.nodes.get(&id) else {
            return false;
        };
        let keys: Vec<TerminalKey> = node.terminals().map(|t| t.key().clone()).collect();
        for key in &keys {
            self.destroy_terminal(key);
        }
        self.nodes.remove(&id);
        log::info!("Removed node {}", id);
        self.events.emit(ChangeEvent::NodeRemoved(id));
        true
    }

    pub fn node(&self, id: NodeId) -> Result<&Node, WorkflowError> {
        self.nodes.get(&id).ok_or(WorkflowError::NodeNotFound(id))
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, WorkflowError> {
        self.nodes.get_mut(&id).ok_or(WorkflowError::NodeNotFound(id))
    }

    /// Nodes ordered by id.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        let mut nodes: Vec<&Node> = self.nodes.values().collect();
        nodes.sort_by_key(|n| n.id());
        nodes.into_iter()
    }

    pub fn terminal(&self, key: &TerminalKey) -> Result<&Terminal, WorkflowError> {
        self.node(key.node)?
            .terminal(key)
            .ok_or_else(|| WorkflowError::TerminalNotFound(key.clone()))
    }

    pub(crate) fn terminal_mut(&mut self, key: &TerminalKey) -> Result<&mut Terminal, WorkflowError> {
        self.node_mut(key.node)?
            .terminal_mut(key)
            .ok_or_else(|| WorkflowError::TerminalNotFound(key.clone()))
    }

    pub(crate) fn input_terminal(&self, key: &TerminalKey) -> Result<&Terminal, WorkflowError> {
        Self::expect_direction(key, Direction::Input)?;
        self.terminal(key)
    }

    pub(crate) fn output_terminal(&self, key: &TerminalKey) -> Result<&Terminal, WorkflowError> {
        Self::expect_direction(key, Direction::Output)?;
        self.terminal(key)
    }

    fn expect_direction(key: &TerminalKey, expected: Direction) -> Result<(), WorkflowError> {
        if key.direction == expected {
            Ok(())
        } else {
            Err(WorkflowError::DirectionMismatch {
                key: key.clone(),
                expected: expected.as_str(),
            })
        }
    }

    pub fn connector(&self, id: ConnectorId) -> Option<&Connector> {
        self.connectors.get(&id)
    }

    /// Connectors ordered by id.
    pub fn connectors(&self) -> impl Iterator<Item = &Connector> {
        let mut connectors: Vec<&Connector> = self.connectors.values().collect();
        connectors.sort_by_key(|c| c.id());
        connectors.into_iter()
    }

    pub fn connector_count(&self) -> usize {
        self.connectors.len()
    }

    /// Output terminals feeding `input`, in connection order.
    pub(crate) fn connected_outputs<'a>(&'a self, input: &'a Terminal) -> impl Iterator<Item = &'a Terminal> {
        input
            .connectors()
            .iter()
            .filter_map(|id| self.connectors.get(id))
            .filter_map(|connector| self.terminal(connector.output_handle()).ok())
    }

    /// Registers a callback that sees every change as it happens.
    pub fn subscribe(&mut self, subscriber: impl FnMut(&ChangeEvent) + 'static) {
        self.events.subscribe(Box::new(subscriber));
    }

    /// Takes every event emitted since the last drain.
    pub fn drain_events(&mut self) -> Vec<ChangeEvent> {
        self.events.drain()
    }

    pub fn pending_events(&self) -> &[ChangeEvent] {
        self.events.pending()
    }

    pub(crate) fn emit(&mut self, event: ChangeEvent) {
        self.events.emit(event);
    }
}

impl fmt::Debug for Workflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Workflow")
            .field("nodes", &self.nodes.len())
            .field("connectors", &self.connectors.len())
            .field("config", &self.config)
            .field("events", &self.events)
            .finish()
    }
}
