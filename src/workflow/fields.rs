use super::{ChangeEvent, Workflow};
use itertools::Itertools;
use crate::error::WorkflowError;
use crate::node::{NodeFieldData, NodeId};
use crate::terminal::{Direction, InputDeclaration, OutputDeclaration, Terminal, TerminalKey};

impl Workflow {
    /// Brings a node's terminals in line with a fresh field-data snapshot.
    ///
    /// Terminals that are no longer declared are destroyed, new ones are
    /// created, and redeclared ones are updated in place when their kind is
    /// unchanged or replaced when it is not. A replacement inherits the old
    /// terminal's connectors. Every surviving connector is re-validated
    /// against the new declaration and destroyed if it no longer fits.
    ///
    /// Declarations are validated before anything is touched, so an invalid
    /// snapshot, or one naming a terminal twice, leaves the node as it was.
    pub fn update_field_data(&mut self, node_id: NodeId, data: NodeFieldData) -> Result<(), WorkflowError> {
        self.node(node_id)?;
        for decl in &data.inputs {
            decl.kind().map_err(|source| WorkflowError::InvalidDeclaration {
                name: decl.name.clone(),
                source,
            })?;
        }
        for decl in &data.outputs {
            decl.kind().map_err(|source| WorkflowError::InvalidDeclaration {
                name: decl.name.clone(),
                source,
            })?;
        }
        if let Some(name) = data.inputs.iter().map(|d| &d.name).duplicates().next() {
            return Err(WorkflowError::DuplicateTerminal {
                name: name.clone(),
                direction: Direction::Input,
            });
        }
        if let Some(name) = data.outputs.iter().map(|d| &d.name).duplicates().next() {
            return Err(WorkflowError::DuplicateTerminal {
                name: name.clone(),
                direction: Direction::Output,
            });
        }

        let NodeFieldData {
            inputs,
            outputs,
            label,
            errors,
            annotation,
            post_job_actions,
        } = data;
        {
            let node = self.node_mut(node_id)?;
            node.label = label;
            node.errors = errors;
            node.annotation = annotation;
            node.post_job_actions = post_job_actions;
        }

        self.sync_inputs(node_id, &inputs)?;
        self.sync_outputs(node_id, &outputs)?;

        self.retract_output_mapping(node_id)?;
        self.verify_mapping(node_id);
        self.emit(ChangeEvent::NodeChanged(node_id));
        Ok(())
    }

    fn sync_inputs(&mut self, node_id: NodeId, inputs: &[InputDeclaration]) -> Result<(), WorkflowError> {
        let declared: Vec<String> = inputs.iter().map(|d| d.name.clone()).collect();
        for name in self.node(node_id)?.input_names() {
            if !declared.contains(&name) {
                self.destroy_terminal(&TerminalKey::input(node_id, &name));
            }
        }

        for decl in inputs {
            let key = TerminalKey::input(node_id, &decl.name);
            let new_tag = decl
                .kind()
                .map_err(|source| WorkflowError::InvalidDeclaration {
                    name: decl.name.clone(),
                    source,
                })?
                .tag();
            let existing_tag = self.node(node_id)?.input_terminal(&decl.name).map(Terminal::kind_tag);
            match existing_tag {
                Some(tag) if tag == new_tag => {
                    self.terminal_mut(&key)?.update_input(decl)?;
                }
                Some(tag) => {
                    log::debug!("Replacing {} ({:?} -> {:?})", key, tag, new_tag);
                    let node = self.node_mut(node_id)?;
                    let serial = node.next_serial();
                    let mut terminal = Terminal::input(node_id, serial, decl)?;
                    if let Some(old) = node.terminal_mut(&key) {
                        terminal.adopt_connectors(old.take_connectors());
                    }
                    node.insert_terminal(terminal);
                }
                None => {
                    let node = self.node_mut(node_id)?;
                    let serial = node.next_serial();
                    node.insert_terminal(Terminal::input(node_id, serial, decl)?);
                }
            }
            self.emit(ChangeEvent::TerminalChanged(key.clone()));
            self.revalidate_input(&key)?;
        }

        self.node_mut(node_id)?.set_order(Direction::Input, declared);
        Ok(())
    }

    fn sync_outputs(&mut self, node_id: NodeId, outputs: &[OutputDeclaration]) -> Result<(), WorkflowError> {
        let declared: Vec<String> = outputs.iter().map(|d| d.name.clone()).collect();
        for name in self.node(node_id)?.output_names() {
            if !declared.contains(&name) {
                self.destroy_terminal(&TerminalKey::output(node_id, &name));
            }
        }

        for decl in outputs {
            let key = TerminalKey::output(node_id, &decl.name);
            let new_tag = decl
                .kind()
                .map_err(|source| WorkflowError::InvalidDeclaration {
                    name: decl.name.clone(),
                    source,
                })?
                .tag();
            let existing_tag = self.node(node_id)?.output_terminal(&decl.name).map(Terminal::kind_tag);
            match existing_tag {
                Some(tag) if tag == new_tag => {
                    self.terminal_mut(&key)?.update_output(decl)?;
                }
                _ => {
                    // New outputs follow the node's mapping; replacements keep their own.
                    let node_map_over = self.node_map_over(node_id);
                    let node = self.node_mut(node_id)?;
                    let serial = node.next_serial();
                    let mut terminal = Terminal::output(node_id, serial, decl)?;
                    match node.terminal_mut(&key) {
                        Some(old) => {
                            log::debug!("Replacing {} ({:?} -> {:?})", key, old.kind_tag(), new_tag);
                            terminal.set_map_over(old.map_over().clone());
                            terminal.adopt_connectors(old.take_connectors());
                        }
                        None => {
                            terminal.set_map_over(node_map_over);
                        }
                    }
                    node.insert_terminal(terminal);
                }
            }
            self.emit(ChangeEvent::TerminalChanged(key.clone()));
            self.revalidate_output(&key)?;
        }

        self.node_mut(node_id)?.set_order(Direction::Output, declared);
        Ok(())
    }

    /// Re-checks every connector into `input`, destroying those that no
    /// longer fit and re-deriving the mapping from those that do.
    fn revalidate_input(&mut self, input: &TerminalKey) -> Result<(), WorkflowError> {
        let connectors = self.terminal(input)?.connectors().to_vec();
        for id in connectors {
            let Some(output) = self.connector(id).map(|c| c.output_handle().clone()) else {
                continue;
            };
            let decision = self.attachable(&output, input)?;
            if !decision.can_accept {
                log::info!(
                    "Dropping connector {} into redeclared {}: {}",
                    id,
                    input,
                    decision.reason.as_deref().unwrap_or("no longer attachable")
                );
                self.destroy_connector(id);
                continue;
            }
            let incoming = self.output_terminal(&output)?.effective_collection_type();
            let derived = Self::connection_map_over(self.input_terminal(input)?, &incoming);
            if derived.is_collection() {
                self.propagate_map_over(input, derived)?;
            }
        }
        Ok(())
    }

    /// Re-checks every connector out of `output` against its downstream input.
    fn revalidate_output(&mut self, output: &TerminalKey) -> Result<(), WorkflowError> {
        let connectors = self.terminal(output)?.connectors().to_vec();
        for id in connectors {
            let Some(input) = self.connector(id).map(|c| c.input_handle().clone()) else {
                continue;
            };
            let decision = self.attachable(output, &input)?;
            if !decision.can_accept {
                log::info!(
                    "Dropping connector {} from redeclared {}: {}",
                    id,
                    output,
                    decision.reason.as_deref().unwrap_or("no longer attachable")
                );
                self.destroy_connector(id);
            }
        }
        Ok(())
    }
}
