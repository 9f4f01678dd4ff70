use super::Workflow;
use crate::collection::{CollectionSegment, CollectionTypeDescription, NULL_COLLECTION_TYPE_DESCRIPTION};
use crate::error::WorkflowError;
use crate::terminal::{ConnectionAcceptable, InputKind, KindTag, Terminal, TerminalKey};
use itertools::Itertools;

impl Workflow {
    /// Decides whether `output` may be connected to `input` right now.
    ///
    /// Runs the filled check first and then everything [`attachable`]
    /// checks. Nothing is mutated.
    ///
    /// [`attachable`]: Self::attachable
    pub fn can_accept(
        &self,
        output: &TerminalKey,
        input: &TerminalKey,
    ) -> Result<ConnectionAcceptable, WorkflowError> {
        let input_terminal = self.input_terminal(input)?;
        let output_terminal = self.output_terminal(output)?;
        let decision = self
            .check_filled(output_terminal, input_terminal)
            .and_then(|| self.check_attachable(output_terminal, input_terminal));
        log::debug!("{} -> {}: {}", output, input, decision);
        Ok(decision)
    }

    /// Like [`can_accept`](Self::can_accept) but ignoring connectors already
    /// on the input. Used to re-validate existing connectors.
    pub fn attachable(
        &self,
        output: &TerminalKey,
        input: &TerminalKey,
    ) -> Result<ConnectionAcceptable, WorkflowError> {
        let input_terminal = self.input_terminal(input)?;
        let output_terminal = self.output_terminal(output)?;
        Ok(self.check_attachable(output_terminal, input_terminal))
    }

    /// Whether an output of the given bare shape could ever attach to `input`,
    /// ignoring datatypes and optionality.
    pub fn attachable_collection_type(
        &self,
        collection_type: &CollectionTypeDescription,
        input: &TerminalKey,
    ) -> Result<ConnectionAcceptable, WorkflowError> {
        let input_terminal = self.input_terminal(input)?;
        Ok(self.check_shape(input_terminal, collection_type))
    }

    /// Shapes an unmapped input's incoming map-over must agree with.
    ///
    /// An input that is already mapped is constrained by its own map-over
    /// alone. Otherwise the node's other mapped inputs and its connected
    /// outputs each contribute their map-over.
    pub fn mapping_constraints(
        &self,
        input: &TerminalKey,
    ) -> Result<Vec<CollectionTypeDescription>, WorkflowError> {
        let input_terminal = self.input_terminal(input)?;
        Ok(self.constraints_for(input_terminal))
    }

    fn constraints_for(&self, input: &Terminal) -> Vec<CollectionTypeDescription> {
        if input.is_mapped_over() {
            return vec![input.map_over().clone()];
        }
        let Ok(node) = self.node(input.node()) else {
            return Vec::new();
        };
        node.input_terminals()
            .filter(|t| t.name() != input.name() && t.is_mapped_over())
            .chain(node.connected_output_terminals())
            .map(|t| t.map_over().clone())
            .unique()
            .collect()
    }

    fn check_filled(&self, output: &Terminal, input: &Terminal) -> ConnectionAcceptable {
        if !input.is_connected() {
            return ConnectionAcceptable::accept();
        }
        if !input.multiple() {
            return ConnectionAcceptable::reject(
                "Input already filled with another connection, delete it before connecting another output.",
            );
        }
        if self.connected_outputs(input).any(|o| o.key() == output.key()) {
            return ConnectionAcceptable::reject("This output is already connected to this input.");
        }
        let incoming = output.effective_collection_type();
        if self
            .connected_outputs(input)
            .all(|existing| existing.effective_collection_type() == incoming)
        {
            ConnectionAcceptable::accept()
        } else {
            ConnectionAcceptable::reject(
                "All connections to a multiple input must share one collection type, disconnect existing connections before attaching a different one.",
            )
        }
    }

    fn check_attachable(&self, output: &Terminal, input: &Terminal) -> ConnectionAcceptable {
        self.check_content(output, input)
            .and_then(|| Self::check_optional(output, input))
            .and_then(|| self.check_shape(input, &output.effective_collection_type()))
    }

    fn check_content(&self, output: &Terminal, input: &Terminal) -> ConnectionAcceptable {
        match (input.kind_tag(), output.kind_tag()) {
            (KindTag::Parameter, KindTag::Parameter) => self.check_parameter_type(output, input),
            (KindTag::Parameter, _) => {
                ConnectionAcceptable::reject("Cannot attach a data output to a parameter input.")
            }
            (_, KindTag::Parameter) => {
                ConnectionAcceptable::reject("Cannot attach a parameter output to a data input.")
            }
            _ => self.check_datatypes(output, input),
        }
    }

    fn check_parameter_type(&self, output: &Terminal, input: &Terminal) -> ConnectionAcceptable {
        let (Some(output_type), Some(input_type)) = (output.parameter_type(), input.parameter_type())
        else {
            return ConnectionAcceptable::reject("Parameter terminal without a parameter type.");
        };
        let effective_output = self.config.effective_parameter_type(output_type);
        let effective_input = self.config.effective_parameter_type(input_type);
        if effective_output == effective_input {
            ConnectionAcceptable::accept()
        } else {
            ConnectionAcceptable::reject(format!(
                "Effective output type {} does not match input type {}.",
                effective_output, effective_input
            ))
        }
    }

    fn check_datatypes(&self, output: &Terminal, input: &Terminal) -> ConnectionAcceptable {
        if input
            .datatypes()
            .iter()
            .any(|d| *d == self.config.universal_input_datatype)
        {
            return ConnectionAcceptable::accept();
        }
        let forced = self
            .node(output.node())
            .ok()
            .and_then(|node| node.forced_datatype(output));
        if output
            .datatypes()
            .iter()
            .map(String::as_str)
            .chain(forced.as_deref())
            .any(|d| self.config.is_wildcard_output(d))
        {
            return ConnectionAcceptable::accept();
        }
        if self
            .datatypes
            .is_compatible(output.datatypes(), input.datatypes(), forced.as_deref())
        {
            return ConnectionAcceptable::accept();
        }
        let effective = output
            .datatypes()
            .iter()
            .map(String::as_str)
            .chain(forced.as_deref())
            .unique()
            .join(", ");
        ConnectionAcceptable::reject(format!(
            "Effective output data type(s) [{}] do not appear to match input type(s) [{}].",
            effective,
            input.datatypes().join(", ")
        ))
    }

    fn check_optional(output: &Terminal, input: &Terminal) -> ConnectionAcceptable {
        // Multiple inputs accept optional outputs; cardinality is only known at runtime.
        if output.optional() && !input.optional() && !input.multiple() {
            ConnectionAcceptable::reject("Cannot connect an optional output to a non-optional input")
        } else {
            ConnectionAcceptable::accept()
        }
    }

    fn check_shape(&self, input: &Terminal, incoming: &CollectionTypeDescription) -> ConnectionAcceptable {
        match input.input_kind() {
            Some(InputKind::Collection { collection_types }) => {
                self.check_collection_shape(input, collection_types, incoming)
            }
            _ => self.check_dataset_shape(input, incoming),
        }
    }

    fn check_dataset_shape(&self, input: &Terminal, incoming: &CollectionTypeDescription) -> ConnectionAcceptable {
        let map_over = input.map_over();
        if !incoming.is_collection() {
            return if map_over.is_collection() {
                ConnectionAcceptable::reject(
                    "Cannot attach non-collection outputs to mapped over inputs, consider disconnecting inputs and outputs to reset this input's mapping.",
                )
            } else {
                ConnectionAcceptable::accept()
            };
        }

        if input.multiple() {
            if input.is_connected() && !self.has_collection_attached(input) {
                return ConnectionAcceptable::reject(
                    "Cannot attach collections to data parameters with individual data inputs already attached.",
                );
            }
            if !Self::ends_in_list(incoming) {
                return ConnectionAcceptable::reject(
                    "Cannot attach paired inputs to multiple data parameters, only lists may be treated this way.",
                );
            }
            let effective = Self::multiple_map_over(incoming);
            if !effective.is_collection() {
                return ConnectionAcceptable::accept();
            }
            return self.check_constraints(input, &effective);
        }

        if map_over.is_collection() {
            return if map_over.can_match(incoming) {
                ConnectionAcceptable::accept()
            } else {
                ConnectionAcceptable::reject(
                    "Can't map over this input with output collection type - this input is already mapped over a different collection type. Disconnect inputs (and potentially outputs) and retry.",
                )
            };
        }
        self.check_constraints(input, incoming)
    }

    fn check_collection_shape(
        &self,
        input: &Terminal,
        collection_types: &[CollectionTypeDescription],
        incoming: &CollectionTypeDescription,
    ) -> ConnectionAcceptable {
        if !incoming.is_collection() {
            return ConnectionAcceptable::reject("Cannot attach a non-collection output to a collection input.");
        }
        let map_over = input.map_over();
        if collection_types
            .iter()
            .any(|t| map_over.append(t).can_match(incoming))
        {
            return ConnectionAcceptable::accept();
        }
        if map_over.is_collection() {
            return ConnectionAcceptable::reject(
                "This input is already mapped over and cannot accept this collection type.",
            );
        }
        let effective = Self::collection_map_over(collection_types, incoming);
        if !effective.is_collection() {
            return ConnectionAcceptable::reject(format!(
                "Incompatible collection type {} for input accepting {}.",
                incoming,
                collection_types.iter().join(", ")
            ));
        }
        self.check_constraints(input, &effective)
    }

    fn check_constraints(&self, input: &Terminal, effective: &CollectionTypeDescription) -> ConnectionAcceptable {
        let constraints = self.constraints_for(input);
        if constraints.iter().all(|c| effective.can_match(c)) {
            return ConnectionAcceptable::accept();
        }
        let outputs_connected = self
            .node(input.node())
            .map(|node| node.has_connected_output_terminals())
            .unwrap_or(false);
        if outputs_connected {
            ConnectionAcceptable::reject(
                "Can't map over this input with output collection type - this step has outputs defined constraining the mapping of this tool. Disconnect outputs and retry.",
            )
        } else {
            ConnectionAcceptable::reject(
                "Can't map over this input with output collection type - other inputs have an incompatible map over collection type. Disconnect inputs (and potentially outputs) and retry.",
            )
        }
    }

    /// `true` when the first connection into `input` delivers a collection.
    fn has_collection_attached(&self, input: &Terminal) -> bool {
        self.connected_outputs(input)
            .next()
            .is_some_and(|o| o.effective_collection_type().is_collection())
    }

    fn ends_in_list(incoming: &CollectionTypeDescription) -> bool {
        matches!(incoming, CollectionTypeDescription::Any)
            || incoming.innermost() == Some(CollectionSegment::List)
    }

    /// The map-over left once a multiple input consumes the innermost list.
    pub(crate) fn multiple_map_over(incoming: &CollectionTypeDescription) -> CollectionTypeDescription {
        if incoming.innermost() == Some(CollectionSegment::List) {
            incoming.effective_map_over(&CollectionTypeDescription::list())
        } else {
            NULL_COLLECTION_TYPE_DESCRIPTION
        }
    }

    /// The map-over a collection input needs to receive `incoming`; `Null`
    /// when a declared type matches directly or none can be mapped over.
    pub(crate) fn collection_map_over(
        collection_types: &[CollectionTypeDescription],
        incoming: &CollectionTypeDescription,
    ) -> CollectionTypeDescription {
        if collection_types.iter().any(|t| t.can_match(incoming)) {
            return NULL_COLLECTION_TYPE_DESCRIPTION;
        }
        collection_types
            .iter()
            .find(|t| incoming.can_map_over(t))
            .map(|t| incoming.effective_map_over(t))
            .unwrap_or(NULL_COLLECTION_TYPE_DESCRIPTION)
    }
}
