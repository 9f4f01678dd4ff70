use super::{ChangeEvent, Workflow};
use crate::collection::{CollectionTypeDescription, NULL_COLLECTION_TYPE_DESCRIPTION};
use crate::error::WorkflowError;
use crate::node::NodeId;
use crate::terminal::{InputKind, Terminal, TerminalKey};

impl Workflow {
    /// Sets a terminal's map-over without validating it.
    pub fn set_map_over(
        &mut self,
        key: &TerminalKey,
        map_over: CollectionTypeDescription,
    ) -> Result<(), WorkflowError> {
        let terminal = self.terminal_mut(key)?;
        let previous = terminal.map_over().clone();
        if terminal.set_map_over(map_over.clone()) {
            log::debug!("{} map-over {} -> {}", key, previous, map_over);
            self.emit(ChangeEvent::TerminalChanged(key.clone()));
        }
        Ok(())
    }

    /// Maps an input over `map_over` and carries the mapping to every output
    /// of the same node.
    pub fn propagate_map_over(
        &mut self,
        input: &TerminalKey,
        map_over: CollectionTypeDescription,
    ) -> Result<(), WorkflowError> {
        self.input_terminal(input)?;
        self.set_map_over(input, map_over.clone())?;
        if !map_over.is_collection() {
            return Ok(());
        }
        for name in self.node(input.node)?.output_names() {
            self.set_map_over(&TerminalKey::output(input.node, &name), map_over.clone())?;
        }
        Ok(())
    }

    /// Forces a terminal's map-over back to `Null`.
    pub fn reset_mapping(&mut self, key: &TerminalKey) -> Result<(), WorkflowError> {
        self.set_map_over(key, NULL_COLLECTION_TYPE_DESCRIPTION)
    }

    /// Retracts an input's mapping once nothing on its node needs it.
    ///
    /// Inputs that still hold connectors, or whose node has another mapped
    /// input, stay mapped. Otherwise the input resets, and the node's
    /// outputs reset with it unless one of them is connected.
    ///
    /// The connected-input check goes beyond the plain four-step rule: a
    /// multiple input losing one of several connections stays mapped.
    pub fn reset_mapping_if_needed(&mut self, input: &TerminalKey) -> Result<(), WorkflowError> {
        let terminal = self.input_terminal(input)?;
        if !terminal.is_mapped_over() {
            return Ok(());
        }
        if terminal.is_connected() {
            log::debug!("{} keeps its mapping while connected", input);
            return Ok(());
        }
        let node = self.node(input.node)?;
        if node.has_other_mapped_over_input_terminals(&input.name) {
            return Ok(());
        }
        let outputs_connected = node.has_connected_output_terminals();
        let output_names = node.output_names();

        self.reset_mapping(input)?;
        if !outputs_connected {
            for name in output_names {
                self.reset_mapping(&TerminalKey::output(input.node, &name))?;
            }
        }
        Ok(())
    }

    /// Resets every output of a node that has neither a mapped input nor a
    /// connected output; nothing downstream depends on the mapping any more.
    pub(crate) fn retract_output_mapping(&mut self, node: NodeId) -> Result<(), WorkflowError> {
        let node_ref = self.node(node)?;
        if node_ref.has_mapped_over_input_terminals() || node_ref.has_connected_output_terminals() {
            return Ok(());
        }
        for name in node_ref.output_names() {
            self.reset_mapping(&TerminalKey::output(node, &name))?;
        }
        Ok(())
    }

    /// The map-over an input takes on when `incoming` is connected to it.
    pub(crate) fn connection_map_over(
        input: &Terminal,
        incoming: &CollectionTypeDescription,
    ) -> CollectionTypeDescription {
        match input.input_kind() {
            Some(InputKind::Collection { collection_types }) => {
                Self::collection_map_over(collection_types, incoming)
            }
            _ if input.multiple() => Self::multiple_map_over(incoming),
            _ => incoming.clone(),
        }
    }

    /// The mapping a freshly declared output should start with, taken from
    /// the node's first mapped input.
    pub(crate) fn node_map_over(&self, node: NodeId) -> CollectionTypeDescription {
        self.node(node)
            .ok()
            .and_then(|n| n.mapped_input_terminals().next().map(|t| t.map_over().clone()))
            .unwrap_or(NULL_COLLECTION_TYPE_DESCRIPTION)
    }

    /// Logs any mapped input whose node has a connected output out of step
    /// with it.
    pub(crate) fn verify_mapping(&self, node: NodeId) {
        let Ok(node) = self.node(node) else {
            return;
        };
        if node.is_mapping_consistent() {
            return;
        }
        for input in node.mapped_input_terminals() {
            for output in node.connected_output_terminals() {
                if !output.map_over().starts_with(input.map_over()) {
                    log::error!(
                        "Mapping invariant broken on node {}: {} is mapped over {} but connected {} is mapped over {}",
                        node.id(),
                        input.key(),
                        input.map_over(),
                        output.key(),
                        output.map_over()
                    );
                }
            }
        }
    }

    pub fn is_mapped_over(&self, key: &TerminalKey) -> Result<bool, WorkflowError> {
        Ok(self.terminal(key)?.is_mapped_over())
    }
}
