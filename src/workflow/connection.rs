use super::{ChangeEvent, Workflow};
use crate::connector::{Connector, ConnectorId};
use crate::error::WorkflowError;
use crate::node::NodeId;
use crate::terminal::{Direction, TerminalKey};

impl Workflow {
    /// Connects `output` to `input`.
    ///
    /// The connection is validated with [`can_accept`](Self::can_accept)
    /// first; a rejection is returned as
    /// [`WorkflowError::ConnectionRejected`] and leaves the workflow
    /// untouched. On success the input's map-over is derived from the
    /// incoming shape and carried to the node's outputs.
    pub fn connect(&mut self, output: &TerminalKey, input: &TerminalKey) -> Result<ConnectorId, WorkflowError> {
        let decision = self.can_accept(output, input)?;
        if !decision.can_accept {
            return Err(WorkflowError::ConnectionRejected {
                output: output.clone(),
                input: input.clone(),
                reason: decision.reason.unwrap_or_default(),
            });
        }

        let incoming = self.output_terminal(output)?.effective_collection_type();
        let id = ConnectorId(self.next_connector_id);
        self.next_connector_id += 1;
        let connector = Connector::new(id, output.clone(), input.clone());
        log::info!("Created {}", connector);
        self.connectors.insert(id, connector);
        self.terminal_mut(output)?.add_connector(id);
        let input_terminal = self.terminal_mut(input)?;
        input_terminal.add_connector(id);
        debug_assert!(
            input_terminal.multiple() || input_terminal.connectors().len() == 1,
            "non-multiple input {} holds {} connectors",
            input,
            input_terminal.connectors().len()
        );

        let derived = Self::connection_map_over(self.input_terminal(input)?, &incoming);
        if derived.is_collection() {
            self.propagate_map_over(input, derived)?;
        }
        self.verify_mapping(input.node);

        self.emit(ChangeEvent::ConnectorCreated(id));
        self.notify_endpoints(output, input);
        Ok(id)
    }

    /// Destroys a connector, removing it from both endpoints and retracting
    /// the input's mapping if nothing needs it any more. Returns `false`
    /// if the connector was already gone.
    pub fn destroy_connector(&mut self, id: ConnectorId) -> bool {
        let Some(connector) = self.connectors.remove(&id) else {
            return false;
        };
        let output = connector.output_handle();
        let input = connector.input_handle();
        if let Ok(terminal) = self.terminal_mut(output) {
            terminal.remove_connector(id);
        }
        if let Ok(terminal) = self.terminal_mut(input) {
            terminal.remove_connector(id);
        }
        if let Err(err) = self.reset_mapping_if_needed(input) {
            log::debug!("Skipping mapping reset after destroying {}: {}", connector, err);
        }
        if let Err(err) = self.retract_output_mapping(output.node) {
            log::debug!("Skipping output reset after destroying {}: {}", connector, err);
        }
        log::info!("Destroyed {}", connector);

        self.emit(ChangeEvent::ConnectorDestroyed(id));
        self.notify_endpoints(output, input);
        true
    }

    /// Destroys every connector attached to a terminal; the terminal itself
    /// stays on its node.
    pub fn disconnect_terminal(&mut self, key: &TerminalKey) -> Result<usize, WorkflowError> {
        let connectors = self.terminal(key)?.connectors().to_vec();
        let destroyed = connectors
            .into_iter()
            .filter(|id| self.destroy_connector(*id))
            .count();
        Ok(destroyed)
    }

    /// Disconnects a terminal and removes it from its node. Returns `false`
    /// if it was already gone.
    pub fn destroy_terminal(&mut self, key: &TerminalKey) -> bool {
        if self.disconnect_terminal(key).is_err() {
            return false;
        }
        let Ok(node) = self.node_mut(key.node) else {
            return false;
        };
        if node.remove_terminal(key).is_none() {
            return false;
        }
        log::debug!("Destroyed {}", key);
        self.emit(ChangeEvent::TerminalDestroyed(key.clone()));
        self.emit(ChangeEvent::NodeChanged(key.node));
        true
    }

    /// Connectors between two nodes, upstream first.
    pub fn connectors_between(&self, from: NodeId, to: NodeId) -> Vec<ConnectorId> {
        self.connectors()
            .filter(|c| c.output_handle().node == from && c.input_handle().node == to)
            .map(Connector::id)
            .collect()
    }

    /// Every connector touching a node, whichever side it is on.
    pub fn node_connectors(&self, node: NodeId) -> Vec<ConnectorId> {
        self.connectors()
            .filter(|c| c.output_handle().node == node || c.input_handle().node == node)
            .map(Connector::id)
            .collect()
    }

    fn notify_endpoints(&mut self, output: &TerminalKey, input: &TerminalKey) {
        debug_assert_eq!(output.direction, Direction::Output);
        self.emit(ChangeEvent::TerminalChanged(output.clone()));
        self.emit(ChangeEvent::TerminalChanged(input.clone()));
        self.emit(ChangeEvent::NodeChanged(output.node));
        if input.node != output.node {
            self.emit(ChangeEvent::NodeChanged(input.node));
        }
    }
}
