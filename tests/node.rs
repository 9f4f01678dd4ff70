//! Tests for nodes and field-data driven terminal (re)construction.
mod common;
use common::*;
use terminus::prelude::*;
use terminus::terminal::KindTag;

#[test]
fn test_field_data_creates_terminals_in_order() {
    let mut wf = workflow();
    let tool = add_tool(
        &mut wf,
        "Paste",
        vec![
            InputDeclaration::data("input2", &["txt"]),
            InputDeclaration::data("input1", &["txt"]),
        ],
        vec![OutputDeclaration::data("out_file1", &["txt"])],
    );

    let node = wf.node(tool).unwrap();
    let names: Vec<&str> = node.input_terminals().map(Terminal::name).collect();
    assert_eq!(names, vec!["input2", "input1"]);
    let serials: Vec<u32> = node.terminals().map(Terminal::serial).collect();
    assert_eq!(serials, vec![0, 1, 2]);
    assert_eq!(
        node.input_terminal("input1").unwrap().element_id(),
        format!("node-{}-input-input1", tool)
    );
}

#[test]
fn test_field_data_from_host_json() {
    let mut wf = workflow();
    let tool = wf.add_node("tool", "cat1");
    let data: NodeFieldData = serde_json::from_str(
        r#"{
            "inputs": [
                {"name": "input1", "label": "Concatenate", "extensions": ["txt"], "multiple": false, "input_type": "dataset"},
                {"name": "queries", "extensions": "txt", "input_type": "dataset_collection", "collection_types": ["list", "paired"]},
                {"name": "lines", "input_type": "parameter", "type": "integer", "optional": true}
            ],
            "outputs": [
                {"name": "out_file1", "extensions": ["input"]},
                {"name": "split", "extensions": ["txt"], "collection": true, "collection_type": "list"}
            ],
            "label": "Concatenate datasets",
            "annotation": "joins inputs",
            "postJobActions": {
                "ChangeDatatypeActionout_file1": {
                    "action_type": "ChangeDatatypeAction",
                    "output_name": "out_file1",
                    "action_arguments": {"newtype": "tabular"}
                }
            }
        }"#,
    )
    .unwrap();

    wf.update_field_data(tool, data).unwrap();

    let node = wf.node(tool).unwrap();
    assert_eq!(node.title(), "Concatenate datasets");
    assert_eq!(node.annotation(), Some("joins inputs"));
    assert_eq!(node.input_terminal("input1").unwrap().label(), Some("Concatenate"));
    assert_eq!(node.input_terminal("queries").unwrap().kind_tag(), KindTag::Collection);
    let lines = node.input_terminal("lines").unwrap();
    assert_eq!(lines.kind_tag(), KindTag::Parameter);
    assert!(lines.optional());
    let out = node.output_terminal("out_file1").unwrap();
    assert_eq!(node.forced_datatype(out).as_deref(), Some("tabular"));
    assert_eq!(
        node.output_terminal("split").unwrap().own_collection_type(),
        ctd("list")
    );
}

#[test]
fn test_invalid_declaration_leaves_node_untouched() {
    let mut wf = workflow();
    let tool = txt_tool(&mut wf, "Cat");
    let data = NodeFieldData::new(
        vec![InputDeclaration::collection("f1", &["txt"], &["list:triple"])],
        vec![],
    );

    let err = wf.update_field_data(tool, data).unwrap_err();

    assert!(matches!(err, WorkflowError::InvalidDeclaration { ref name, .. } if name == "f1"));
    let node = wf.node(tool).unwrap();
    assert!(node.input_terminal("input1").is_some());
    assert!(node.input_terminal("f1").is_none());
}

#[test]
fn test_duplicate_terminal_names_are_rejected() {
    let mut wf = workflow();
    let tool = txt_tool(&mut wf, "Cat");
    let data = NodeFieldData::new(
        vec![
            InputDeclaration::data("input1", &["txt"]),
            InputDeclaration::data("input2", &["txt"]),
            InputDeclaration::data("input1", &["tabular"]),
        ],
        vec![OutputDeclaration::data("out_file1", &["txt"])],
    );

    let err = wf.update_field_data(tool, data).unwrap_err();

    assert!(matches!(
        err,
        WorkflowError::DuplicateTerminal { ref name, direction: Direction::Input } if name == "input1"
    ));
    let node = wf.node(tool).unwrap();
    assert_eq!(node.input_terminals().count(), 1);
    assert!(node.input_terminal("input2").is_none());

    let data = NodeFieldData::new(
        vec![InputDeclaration::data("input1", &["txt"])],
        vec![
            OutputDeclaration::data("out_file1", &["txt"]),
            OutputDeclaration::data("out_file1", &["txt"]),
        ],
    );
    assert!(matches!(
        wf.update_field_data(tool, data),
        Err(WorkflowError::DuplicateTerminal { direction: Direction::Output, .. })
    ));
    assert_eq!(wf.node(tool).unwrap().output_terminals().count(), 1);
}

#[test]
fn test_unknown_node_is_an_error() {
    let mut wf = workflow();
    assert!(matches!(
        wf.update_field_data(NodeId(7), NodeFieldData::default()),
        Err(WorkflowError::NodeNotFound(NodeId(7)))
    ));
}

mod redeclaration_tests {
    use super::*;

    #[test]
    fn test_same_kind_update_keeps_connector() {
        let mut wf = workflow();
        let source = data_source(&mut wf, &["tabular"]);
        let tool = txt_tool(&mut wf, "Cat");
        let input = TerminalKey::input(tool, "input1");
        let id = wf.connect(&source, &input).unwrap();
        let serial = wf.terminal(&input).unwrap().serial();

        wf.update_field_data(
            tool,
            NodeFieldData::new(
                vec![InputDeclaration::data("input1", &["tabular", "txt"])],
                vec![OutputDeclaration::data("out_file1", &["txt"])],
            ),
        )
        .unwrap();

        let terminal = wf.terminal(&input).unwrap();
        assert_eq!(terminal.connectors(), &[id]);
        assert_eq!(terminal.serial(), serial);
        assert_eq!(terminal.datatypes(), &["tabular".to_string(), "txt".to_string()]);
    }

    #[test]
    fn test_incompatible_update_destroys_connector() {
        let mut wf = workflow();
        let source = data_source(&mut wf, &["txt"]);
        let tool = txt_tool(&mut wf, "Cat");
        let input = TerminalKey::input(tool, "input1");
        let id = wf.connect(&source, &input).unwrap();

        wf.update_field_data(
            tool,
            NodeFieldData::new(
                vec![InputDeclaration::data("input1", &["bam"])],
                vec![OutputDeclaration::data("out_file1", &["txt"])],
            ),
        )
        .unwrap();

        assert!(wf.connector(id).is_none());
        assert!(!wf.terminal(&input).unwrap().is_connected());
        assert!(!wf.terminal(&source).unwrap().is_connected());
    }

    #[test]
    fn test_optional_flag_change_is_revalidated() {
        let mut wf = workflow();
        let source = optional_source(&mut wf, &["txt"]);
        let tool = add_tool(
            &mut wf,
            "Cat",
            vec![InputDeclaration::data("input1", &["txt"]).optional()],
            vec![],
        );
        let id = wf.connect(&source, &TerminalKey::input(tool, "input1")).unwrap();

        wf.update_field_data(
            tool,
            NodeFieldData::new(vec![InputDeclaration::data("input1", &["txt"])], vec![]),
        )
        .unwrap();

        assert!(wf.connector(id).is_none());
    }

    #[test]
    fn test_kind_change_transfers_connectors() {
        let mut wf = workflow();
        let list = collection_source(&mut wf, &["txt"], "list");
        let tool = txt_tool(&mut wf, "Cat");
        let input = TerminalKey::input(tool, "input1");
        let output = TerminalKey::output(tool, "out_file1");
        let id = wf.connect(&list, &input).unwrap();
        assert_eq!(map_over(&wf, &output), ctd("list"));
        let old_serial = wf.terminal(&input).unwrap().serial();

        wf.update_field_data(
            tool,
            NodeFieldData::new(
                vec![InputDeclaration::collection("input1", &["txt"], &["list"])],
                vec![OutputDeclaration::data("out_file1", &["txt"])],
            ),
        )
        .unwrap();

        let terminal = wf.terminal(&input).unwrap();
        assert_eq!(terminal.kind_tag(), KindTag::Collection);
        assert_ne!(terminal.serial(), old_serial);
        assert_eq!(terminal.connectors(), &[id]);
        assert_eq!(wf.connector(id).unwrap().input_handle(), &input);
        // The list now matches the collection input directly.
        assert_eq!(map_over(&wf, &input), NULL_COLLECTION_TYPE_DESCRIPTION);
        assert_eq!(map_over(&wf, &output), NULL_COLLECTION_TYPE_DESCRIPTION);
    }

    #[test]
    fn test_kind_change_drops_unfit_connectors() {
        let mut wf = workflow();
        let source = data_source(&mut wf, &["txt"]);
        let tool = txt_tool(&mut wf, "Cat");
        let input = TerminalKey::input(tool, "input1");
        let id = wf.connect(&source, &input).unwrap();

        wf.update_field_data(
            tool,
            NodeFieldData::new(
                vec![InputDeclaration::collection("input1", &["txt"], &["list"])],
                vec![],
            ),
        )
        .unwrap();

        assert!(wf.connector(id).is_none());
        assert!(!wf.terminal(&source).unwrap().is_connected());
    }

    #[test]
    fn test_output_kind_change_revalidates_downstream() {
        let mut wf = workflow();
        let producer = add_tool(
            &mut wf,
            "Producer",
            vec![],
            vec![OutputDeclaration::data("output", &["txt"])],
        );
        let output = TerminalKey::output(producer, "output");
        let plain = txt_tool(&mut wf, "Cat");
        let id = wf.connect(&output, &TerminalKey::input(plain, "input1")).unwrap();

        wf.update_field_data(
            producer,
            NodeFieldData::new(vec![], vec![OutputDeclaration::parameter("output", "integer")]),
        )
        .unwrap();

        assert_eq!(wf.terminal(&output).unwrap().kind_tag(), KindTag::Parameter);
        assert!(wf.connector(id).is_none());
    }

    #[test]
    fn test_undeclared_terminals_are_destroyed() {
        let mut wf = workflow();
        let source = data_source(&mut wf, &["txt"]);
        let tool = two_input_tool(&mut wf);
        wf.connect(&source, &TerminalKey::input(tool, "input2")).unwrap();

        wf.update_field_data(
            tool,
            NodeFieldData::new(
                vec![InputDeclaration::data("input1", &["txt"])],
                vec![OutputDeclaration::data("out_file1", &["txt"])],
            ),
        )
        .unwrap();

        let node = wf.node(tool).unwrap();
        assert!(node.input_terminal("input2").is_none());
        assert_eq!(node.input_terminals().count(), 1);
        assert!(!wf.terminal(&source).unwrap().is_connected());
        assert!(
            wf.pending_events()
                .contains(&ChangeEvent::TerminalDestroyed(TerminalKey::input(tool, "input2")))
        );
    }

    #[test]
    fn test_new_output_follows_node_mapping() {
        let mut wf = workflow();
        let list = collection_source(&mut wf, &["txt"], "list");
        let tool = txt_tool(&mut wf, "Cat");
        wf.connect(&list, &TerminalKey::input(tool, "input1")).unwrap();

        wf.update_field_data(
            tool,
            NodeFieldData::new(
                vec![InputDeclaration::data("input1", &["txt"])],
                vec![
                    OutputDeclaration::data("out_file1", &["txt"]),
                    OutputDeclaration::data("log", &["txt"]),
                ],
            ),
        )
        .unwrap();

        assert_eq!(map_over(&wf, &TerminalKey::output(tool, "log")), ctd("list"));
        assert!(wf.node(tool).unwrap().is_mapping_consistent());
    }
}

mod query_tests {
    use super::*;

    #[test]
    fn test_node_mapping_queries() {
        let mut wf = workflow();
        let list = collection_source(&mut wf, &["txt"], "list");
        let cat = txt_tool(&mut wf, "Cat");
        let sort = txt_tool(&mut wf, "Sort");
        wf.connect(&list, &TerminalKey::input(cat, "input1")).unwrap();

        let node = wf.node(cat).unwrap();
        assert!(node.has_mapped_over_input_terminals());
        assert!(!node.has_connected_output_terminals());
        assert_eq!(node.mapped_input_terminals().count(), 1);

        wf.connect(
            &TerminalKey::output(cat, "out_file1"),
            &TerminalKey::input(sort, "input1"),
        )
        .unwrap();
        let node = wf.node(cat).unwrap();
        assert!(node.has_connected_output_terminals());
        assert_eq!(
            node.connected_output_terminals()
                .map(Terminal::name)
                .collect::<Vec<_>>(),
            vec!["out_file1"]
        );
        assert!(!node.has_other_mapped_over_input_terminals("input1"));
    }

    #[test]
    fn test_title_falls_back_to_name() {
        let mut wf = workflow();
        let tool = txt_tool(&mut wf, "Cat");
        assert_eq!(wf.node(tool).unwrap().title(), "Cat");
        assert_eq!(wf.node(tool).unwrap().node_type(), "tool");
    }
}
