//! Common test utilities for building workflows and step declarations.
use terminus::prelude::*;

/// Routes `log` output through the test harness. Safe to call repeatedly.
#[allow(dead_code)]
pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A small datatype hierarchy:
///
/// ```text
/// data
/// ├── txt
/// │   └── tabular
/// └── binary
///     └── bam
/// ```
#[allow(dead_code)]
pub fn datatypes() -> DatatypesMapping {
    DatatypesMapping::default()
        .with_datatype("data", "Data", &[])
        .with_datatype("txt", "Text", &["Data"])
        .with_datatype("tabular", "Tabular", &["Text", "Data"])
        .with_datatype("binary", "Binary", &["Data"])
        .with_datatype("bam", "Bam", &["Binary", "Data"])
}

#[allow(dead_code)]
pub fn workflow() -> Workflow {
    init_logger();
    Workflow::new(datatypes())
}

#[allow(dead_code)]
pub fn ctd(collection_type: &str) -> CollectionTypeDescription {
    CollectionTypeDescription::new(collection_type).unwrap()
}

/// Adds a tool step with the given declarations.
#[allow(dead_code)]
pub fn add_tool(
    workflow: &mut Workflow,
    name: &str,
    inputs: Vec<InputDeclaration>,
    outputs: Vec<OutputDeclaration>,
) -> NodeId {
    let node = workflow.add_node("tool", name);
    workflow
        .update_field_data(node, NodeFieldData::new(inputs, outputs))
        .unwrap();
    node
}

/// Adds an input step producing a single dataset and returns its output.
#[allow(dead_code)]
pub fn data_source(workflow: &mut Workflow, extensions: &[&str]) -> TerminalKey {
    let node = add_tool(
        workflow,
        "Input dataset",
        vec![],
        vec![OutputDeclaration::data("output", extensions)],
    );
    TerminalKey::output(node, "output")
}

/// Adds an input step producing an optional dataset and returns its output.
#[allow(dead_code)]
pub fn optional_source(workflow: &mut Workflow, extensions: &[&str]) -> TerminalKey {
    let node = add_tool(
        workflow,
        "Optional input dataset",
        vec![],
        vec![OutputDeclaration::data("output", extensions).optional()],
    );
    TerminalKey::output(node, "output")
}

/// Adds an input step producing a collection and returns its output.
#[allow(dead_code)]
pub fn collection_source(
    workflow: &mut Workflow,
    extensions: &[&str],
    collection_type: &str,
) -> TerminalKey {
    let node = add_tool(
        workflow,
        "Input dataset collection",
        vec![],
        vec![OutputDeclaration::collection(
            "output",
            extensions,
            collection_type,
        )],
    );
    TerminalKey::output(node, "output")
}

/// A one-in, one-out tool consuming and producing `txt`.
#[allow(dead_code)]
pub fn txt_tool(workflow: &mut Workflow, name: &str) -> NodeId {
    add_tool(
        workflow,
        name,
        vec![InputDeclaration::data("input1", &["txt"])],
        vec![OutputDeclaration::data("out_file1", &["txt"])],
    )
}

/// A tool with two `txt` inputs and one output.
#[allow(dead_code)]
pub fn two_input_tool(workflow: &mut Workflow) -> NodeId {
    add_tool(
        workflow,
        "Paste",
        vec![
            InputDeclaration::data("input1", &["txt"]),
            InputDeclaration::data("input2", &["txt"]),
        ],
        vec![OutputDeclaration::data("out_file1", &["txt"])],
    )
}

#[allow(dead_code)]
pub fn accepts(workflow: &Workflow, output: &TerminalKey, input: &TerminalKey) -> bool {
    workflow.can_accept(output, input).unwrap().can_accept
}

#[allow(dead_code)]
pub fn rejection(workflow: &Workflow, output: &TerminalKey, input: &TerminalKey) -> String {
    let decision = workflow.can_accept(output, input).unwrap();
    assert!(!decision.can_accept, "expected {} -> {} to be rejected", output, input);
    decision.reason.unwrap_or_default()
}

#[allow(dead_code)]
pub fn map_over(workflow: &Workflow, key: &TerminalKey) -> CollectionTypeDescription {
    workflow.terminal(key).unwrap().map_over().clone()
}
