use super::Workflow;
use super::events::{ChangeEvent, EventJournal};
use crate::config::EditorConfig;
use crate::datatypes::DatatypeCompatibility;
use ahash::AHashMap;

/// Configures and creates a [`Workflow`].
pub struct WorkflowBuilder {
    datatypes: Box<dyn DatatypeCompatibility>,
    config: EditorConfig,
    journal: EventJournal,
}

impl WorkflowBuilder {
    pub fn new(datatypes: impl DatatypeCompatibility + 'static) -> Self {
        Self {
            datatypes: Box::new(datatypes),
            config: EditorConfig::default(),
            journal: EventJournal::default(),
        }
    }

    /// Replaces the whole acceptance policy.
    pub fn with_config(mut self, config: EditorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_universal_input_datatype(mut self, datatype: &str) -> Self {
        self.config.universal_input_datatype = datatype.to_string();
        self
    }

    pub fn with_wildcard_output_datatype(mut self, datatype: &str) -> Self {
        if !self.config.is_wildcard_output(datatype) {
            self.config
                .wildcard_output_datatypes
                .push(datatype.to_string());
        }
        self
    }

    pub fn with_parameter_alias(mut self, parameter_type: &str, effective_type: &str) -> Self {
        self.config
            .parameter_type_aliases
            .insert(parameter_type.to_string(), effective_type.to_string());
        self
    }

    /// Registers a callback that sees every change as it happens.
    pub fn with_subscriber(mut self, subscriber: impl FnMut(&ChangeEvent) + 'static) -> Self {
        self.journal.subscribe(Box::new(subscriber));
        self
    }

    pub fn build(self) -> Workflow {
        Workflow {
            nodes: AHashMap::new(),
            connectors: AHashMap::new(),
            next_node_id: 0,
            next_connector_id: 0,
            datatypes: self.datatypes,
            config: self.config,
            events: self.journal,
        }
    }
}
