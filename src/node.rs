use crate::terminal::{
    Direction, InputDeclaration, OutputDeclaration, Terminal, TerminalKey,
};
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a node, unique within one workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

const CHANGE_DATATYPE_ACTION: &str = "ChangeDatatypeAction";

/// An action the host runs after a step completes. Only datatype changes
/// matter for connection decisions; everything else is carried opaquely.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PostJobAction {
    pub action_type: String,
    #[serde(default)]
    pub output_name: String,
    #[serde(default)]
    pub action_arguments: AHashMap<String, serde_json::Value>,
}

impl PostJobAction {
    pub fn change_datatype(output_name: &str, newtype: &str) -> Self {
        let mut action_arguments = AHashMap::new();
        action_arguments.insert(
            "newtype".to_string(),
            serde_json::Value::String(newtype.to_string()),
        );
        Self {
            action_type: CHANGE_DATATYPE_ACTION.to_string(),
            output_name: output_name.to_string(),
            action_arguments,
        }
    }

    /// The datatype this action converts `output_name` to, if it does.
    pub fn changed_datatype_for(&self, output_name: &str) -> Option<&str> {
        if self.action_type != CHANGE_DATATYPE_ACTION {
            return None;
        }
        if !self.output_name.is_empty() && self.output_name != output_name {
            return None;
        }
        self.action_arguments.get("newtype").and_then(|v| v.as_str())
    }
}

/// Field data the host sends whenever a step is (re)configured.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct NodeFieldData {
    #[serde(default)]
    pub inputs: Vec<InputDeclaration>,
    #[serde(default)]
    pub outputs: Vec<OutputDeclaration>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub errors: Option<String>,
    #[serde(default)]
    pub annotation: Option<String>,
    #[serde(default, alias = "postJobActions")]
    pub post_job_actions: AHashMap<String, PostJobAction>,
}

impl NodeFieldData {
    pub fn new(inputs: Vec<InputDeclaration>, outputs: Vec<OutputDeclaration>) -> Self {
        Self {
            inputs,
            outputs,
            ..Self::default()
        }
    }
}

/// A workflow step together with its input and output terminals.
#[derive(Debug, Clone)]
pub struct Node {
    id: NodeId,
    node_type: String,
    name: String,
    pub(crate) label: Option<String>,
    pub(crate) errors: Option<String>,
    pub(crate) annotation: Option<String>,
    pub(crate) post_job_actions: AHashMap<String, PostJobAction>,
    input_terminals: AHashMap<String, Terminal>,
    output_terminals: AHashMap<String, Terminal>,
    input_order: Vec<String>,
    output_order: Vec<String>,
    next_serial: u32,
}

impl Node {
    pub(crate) fn new(id: NodeId, node_type: &str, name: &str) -> Self {
        Self {
            id,
            node_type: node_type.to_string(),
            name: name.to_string(),
            label: None,
            errors: None,
            annotation: None,
            post_job_actions: AHashMap::new(),
            input_terminals: AHashMap::new(),
            output_terminals: AHashMap::new(),
            input_order: Vec::new(),
            output_order: Vec::new(),
            next_serial: 0,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn node_type(&self) -> &str {
        &self.node_type
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// The label if set, otherwise the step name.
    pub fn title(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }

    pub fn errors(&self) -> Option<&str> {
        self.errors.as_deref()
    }

    pub fn annotation(&self) -> Option<&str> {
        self.annotation.as_deref()
    }

    pub fn post_job_actions(&self) -> &AHashMap<String, PostJobAction> {
        &self.post_job_actions
    }

    pub fn input_terminal(&self, name: &str) -> Option<&Terminal> {
        self.input_terminals.get(name)
    }

    pub fn output_terminal(&self, name: &str) -> Option<&Terminal> {
        self.output_terminals.get(name)
    }

    pub fn terminal(&self, key: &TerminalKey) -> Option<&Terminal> {
        match key.direction {
            Direction::Input => self.input_terminal(&key.name),
            Direction::Output => self.output_terminal(&key.name),
        }
    }

    /// Input terminals in declaration order.
    pub fn input_terminals(&self) -> impl Iterator<Item = &Terminal> {
        self.input_order
            .iter()
            .filter_map(|name| self.input_terminals.get(name))
    }

    /// Output terminals in declaration order.
    pub fn output_terminals(&self) -> impl Iterator<Item = &Terminal> {
        self.output_order
            .iter()
            .filter_map(|name| self.output_terminals.get(name))
    }

    pub fn terminals(&self) -> impl Iterator<Item = &Terminal> {
        self.input_terminals().chain(self.output_terminals())
    }

    pub fn has_mapped_over_input_terminals(&self) -> bool {
        self.input_terminals().any(Terminal::is_mapped_over)
    }

    /// Like [`Node::has_mapped_over_input_terminals`] but ignoring one input.
    pub fn has_other_mapped_over_input_terminals(&self, except: &str) -> bool {
        self.input_terminals()
            .any(|t| t.name() != except && t.is_mapped_over())
    }

    pub fn has_connected_output_terminals(&self) -> bool {
        self.output_terminals().any(Terminal::is_connected)
    }

    pub fn has_connected_mapped_input_terminals(&self) -> bool {
        self.input_terminals()
            .any(|t| t.is_connected() && t.is_mapped_over())
    }

    pub fn mapped_input_terminals(&self) -> impl Iterator<Item = &Terminal> {
        self.input_terminals().filter(|t| t.is_mapped_over())
    }

    pub fn connected_output_terminals(&self) -> impl Iterator<Item = &Terminal> {
        self.output_terminals().filter(|t| t.is_connected())
    }

    /// The datatype an output is forced to, by declaration or by a
    /// post-job datatype change. The post-job action wins.
    pub fn forced_datatype(&self, output: &Terminal) -> Option<String> {
        self.post_job_actions
            .values()
            .find_map(|action| action.changed_datatype_for(output.name()))
            .or_else(|| output.force_datatype())
            .map(str::to_string)
    }

    /// `true` when every mapped input agrees with every connected output:
    /// each connected output's map-over equals, or extends, the input's.
    pub fn is_mapping_consistent(&self) -> bool {
        self.mapped_input_terminals().all(|input| {
            self.connected_output_terminals()
                .all(|output| output.map_over().starts_with(input.map_over()))
        })
    }

    pub(crate) fn next_serial(&mut self) -> u32 {
        let serial = self.next_serial;
        self.next_serial += 1;
        serial
    }

    pub(crate) fn terminal_mut(&mut self, key: &TerminalKey) -> Option<&mut Terminal> {
        match key.direction {
            Direction::Input => self.input_terminals.get_mut(&key.name),
            Direction::Output => self.output_terminals.get_mut(&key.name),
        }
    }

    pub(crate) fn output_names(&self) -> Vec<String> {
        self.output_order.clone()
    }

    pub(crate) fn input_names(&self) -> Vec<String> {
        self.input_order.clone()
    }

    /// Inserts or replaces a terminal, keeping its slot in declaration order.
    pub(crate) fn insert_terminal(&mut self, terminal: Terminal) -> Option<Terminal> {
        let name = terminal.name().to_string();
        let (table, order) = match terminal.direction() {
            Direction::Input => (&mut self.input_terminals, &mut self.input_order),
            Direction::Output => (&mut self.output_terminals, &mut self.output_order),
        };
        if !order.contains(&name) {
            order.push(name.clone());
        }
        table.insert(name, terminal)
    }

    pub(crate) fn remove_terminal(&mut self, key: &TerminalKey) -> Option<Terminal> {
        let (table, order) = match key.direction {
            Direction::Input => (&mut self.input_terminals, &mut self.input_order),
            Direction::Output => (&mut self.output_terminals, &mut self.output_order),
        };
        order.retain(|n| n != &key.name);
        table.remove(&key.name)
    }

    /// Reorders terminals to follow a fresh declaration.
    pub(crate) fn set_order(&mut self, direction: Direction, names: Vec<String>) {
        match direction {
            Direction::Input => self.input_order = names,
            Direction::Output => self.output_order = names,
        }
    }
}
