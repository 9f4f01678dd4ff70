//! Named connection points on a node.
//!
//! A [`Terminal`] is owned by its node and addressed from the outside by a
//! [`TerminalKey`] (node, direction, name). Keys rather than references are
//! stored in connectors, so replacing a terminal under the same name keeps
//! every connector pointing at the right place.

use crate::collection::{CollectionTypeDescription, NULL_COLLECTION_TYPE_DESCRIPTION};
use crate::connector::ConnectorId;
use crate::error::WorkflowError;
use crate::node::NodeId;
use std::fmt;

pub mod acceptance;
pub mod declaration;
pub mod kind;

pub use acceptance::*;
pub use declaration::*;
pub use kind::*;

/// Stable address of a terminal within a workflow.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TerminalKey {
    pub node: NodeId,
    pub direction: Direction,
    pub name: String,
}

impl TerminalKey {
    pub fn input(node: NodeId, name: &str) -> Self {
        Self {
            node,
            direction: Direction::Input,
            name: name.to_string(),
        }
    }

    pub fn output(node: NodeId, name: &str) -> Self {
        Self {
            node,
            direction: Direction::Output,
            name: name.to_string(),
        }
    }
}

impl fmt::Display for TerminalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}' of node {}", self.direction, self.name, self.node)
    }
}

/// A named input or output on a node.
#[derive(Debug, Clone)]
pub struct Terminal {
    key: TerminalKey,
    serial: u32,
    label: Option<String>,
    datatypes: Vec<String>,
    optional: bool,
    map_over: CollectionTypeDescription,
    connectors: Vec<ConnectorId>,
    role: TerminalRole,
}

impl Terminal {
    /// Builds an input terminal from its declaration.
    pub fn input(node: NodeId, serial: u32, decl: &InputDeclaration) -> Result<Self, WorkflowError> {
        let kind = decl
            .kind()
            .map_err(|source| WorkflowError::InvalidDeclaration {
                name: decl.name.clone(),
                source,
            })?;
        Ok(Self {
            key: TerminalKey::input(node, &decl.name),
            serial,
            label: decl.label.clone(),
            datatypes: decl.extensions.clone(),
            optional: decl.optional,
            map_over: NULL_COLLECTION_TYPE_DESCRIPTION,
            connectors: Vec::new(),
            role: TerminalRole::Input {
                kind,
                multiple: decl.effective_multiple(),
            },
        })
    }

    /// Builds an output terminal from its declaration.
    pub fn output(node: NodeId, serial: u32, decl: &OutputDeclaration) -> Result<Self, WorkflowError> {
        let kind = decl
            .kind()
            .map_err(|source| WorkflowError::InvalidDeclaration {
                name: decl.name.clone(),
                source,
            })?;
        Ok(Self {
            key: TerminalKey::output(node, &decl.name),
            serial,
            label: decl.label.clone(),
            datatypes: decl.extensions.clone(),
            optional: decl.optional,
            map_over: NULL_COLLECTION_TYPE_DESCRIPTION,
            connectors: Vec::new(),
            role: TerminalRole::Output {
                kind,
                force_datatype: decl.force_datatype.clone(),
            },
        })
    }

    pub fn key(&self) -> &TerminalKey {
        &self.key
    }

    pub fn name(&self) -> &str {
        &self.key.name
    }

    pub fn node(&self) -> NodeId {
        self.key.node
    }

    pub fn direction(&self) -> Direction {
        self.key.direction
    }

    /// Position of this terminal in its node's construction order. A
    /// replaced terminal always gets a fresh serial.
    pub fn serial(&self) -> u32 {
        self.serial
    }

    /// Identifier the presentation layer uses for the terminal's element.
    pub fn element_id(&self) -> String {
        format!(
            "node-{}-{}-{}",
            self.key.node, self.key.direction, self.key.name
        )
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn datatypes(&self) -> &[String] {
        &self.datatypes
    }

    pub fn optional(&self) -> bool {
        self.optional
    }

    /// `true` for inputs that accept many connections. Always `false` for outputs.
    pub fn multiple(&self) -> bool {
        matches!(self.role, TerminalRole::Input { multiple: true, .. })
    }

    pub fn role(&self) -> &TerminalRole {
        &self.role
    }

    pub fn kind_tag(&self) -> KindTag {
        self.role.tag()
    }

    pub fn input_kind(&self) -> Option<&InputKind> {
        match &self.role {
            TerminalRole::Input { kind, .. } => Some(kind),
            TerminalRole::Output { .. } => None,
        }
    }

    pub fn output_kind(&self) -> Option<&OutputKind> {
        match &self.role {
            TerminalRole::Output { kind, .. } => Some(kind),
            TerminalRole::Input { .. } => None,
        }
    }

    /// The datatype declared as forced on this output, if any.
    pub fn force_datatype(&self) -> Option<&str> {
        match &self.role {
            TerminalRole::Output { force_datatype, .. } => force_datatype.as_deref(),
            TerminalRole::Input { .. } => None,
        }
    }

    pub fn parameter_type(&self) -> Option<&str> {
        match &self.role {
            TerminalRole::Input {
                kind: InputKind::Parameter { parameter_type },
                ..
            }
            | TerminalRole::Output {
                kind: OutputKind::Parameter { parameter_type },
                ..
            } => Some(parameter_type),
            _ => None,
        }
    }

    /// Shape the output produces before any mapping, `Null` for non-collections.
    pub fn own_collection_type(&self) -> CollectionTypeDescription {
        match &self.role {
            TerminalRole::Output {
                kind: OutputKind::Collection { collection_type },
                ..
            } => collection_type.clone(),
            _ => NULL_COLLECTION_TYPE_DESCRIPTION,
        }
    }

    /// Shape a downstream input actually receives: the map-over wrapped
    /// around the terminal's own collection shape.
    pub fn effective_collection_type(&self) -> CollectionTypeDescription {
        self.map_over.append(&self.own_collection_type())
    }

    pub fn map_over(&self) -> &CollectionTypeDescription {
        &self.map_over
    }

    pub fn is_mapped_over(&self) -> bool {
        self.map_over.is_collection()
    }

    /// Connectors in connection order.
    pub fn connectors(&self) -> &[ConnectorId] {
        &self.connectors
    }

    pub fn is_connected(&self) -> bool {
        !self.connectors.is_empty()
    }

    /// Returns `true` when the value actually changed.
    pub(crate) fn set_map_over(&mut self, map_over: CollectionTypeDescription) -> bool {
        if self.map_over == map_over {
            return false;
        }
        self.map_over = map_over;
        true
    }

    pub(crate) fn add_connector(&mut self, connector: ConnectorId) {
        if !self.connectors.contains(&connector) {
            self.connectors.push(connector);
        }
    }

    /// Idempotent; returns `true` only when the connector was present.
    pub(crate) fn remove_connector(&mut self, connector: ConnectorId) -> bool {
        let before = self.connectors.len();
        self.connectors.retain(|c| *c != connector);
        before != self.connectors.len()
    }

    pub(crate) fn take_connectors(&mut self) -> Vec<ConnectorId> {
        std::mem::take(&mut self.connectors)
    }

    pub(crate) fn adopt_connectors(&mut self, connectors: Vec<ConnectorId>) {
        for connector in connectors {
            self.add_connector(connector);
        }
    }

    /// Refreshes metadata from a redeclaration of the same kind. The
    /// connectors and map-over are kept.
    pub(crate) fn update_input(&mut self, decl: &InputDeclaration) -> Result<(), WorkflowError> {
        let kind = decl
            .kind()
            .map_err(|source| WorkflowError::InvalidDeclaration {
                name: decl.name.clone(),
                source,
            })?;
        self.label = decl.label.clone();
        self.datatypes = decl.extensions.clone();
        self.optional = decl.optional;
        self.role = TerminalRole::Input {
            kind,
            multiple: decl.effective_multiple(),
        };
        Ok(())
    }

    pub(crate) fn update_output(&mut self, decl: &OutputDeclaration) -> Result<(), WorkflowError> {
        let kind = decl
            .kind()
            .map_err(|source| WorkflowError::InvalidDeclaration {
                name: decl.name.clone(),
                source,
            })?;
        self.label = decl.label.clone();
        self.datatypes = decl.extensions.clone();
        self.optional = decl.optional;
        self.role = TerminalRole::Output {
            kind,
            force_datatype: decl.force_datatype.clone(),
        };
        Ok(())
    }
}

impl fmt::Display for Terminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.key, self.datatypes.join(", "))?;
        if self.is_mapped_over() {
            write!(f, " mapped over {}", self.map_over)?;
        }
        Ok(())
    }
}
