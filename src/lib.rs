//! # Terminus - Terminal Compatibility Engine for Workflow Editors
//!
//! **Terminus** decides which outputs of a visual workflow editor may be wired
//! to which inputs, and keeps track of how collections flow through each step.
//! A step that receives a list where it expects a single dataset is *mapped
//! over* that list: it runs once per element and its outputs become lists too.
//!
//! ## Core Workflow
//!
//! 1.  **Describe Your Datatypes**: Load a [`DatatypesMapping`](datatypes::DatatypesMapping)
//!     from the host, or implement [`DatatypeCompatibility`](datatypes::DatatypeCompatibility)
//!     for your own hierarchy.
//! 2.  **Build a Workflow**: Use `Workflow::builder` to pick the oracle and tune the
//!     acceptance policy.
//! 3.  **Declare Steps**: Add nodes and feed them [`NodeFieldData`](node::NodeFieldData)
//!     snapshots; terminals are created, updated and replaced from those.
//! 4.  **Connect**: Ask `can_accept` while the user drags, then `connect` on drop.
//!     Map-over propagation and retraction happen as connectors come and go.
//!
//! ## Quick Start
//!
//! ```rust
//! use terminus::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let datatypes = DatatypesMapping::default()
//!         .with_datatype("data", "Data", &[])
//!         .with_datatype("txt", "Text", &["Data"])
//!         .with_datatype("tabular", "Tabular", &["Text", "Data"]);
//!     let mut workflow = Workflow::builder(datatypes).build();
//!
//!     let upload = workflow.add_node("data_collection_input", "Input list");
//!     workflow.update_field_data(
//!         upload,
//!         NodeFieldData::new(vec![], vec![OutputDeclaration::collection("output", &["tabular"], "list")]),
//!     )?;
//!
//!     let cat = workflow.add_node("tool", "Concatenate");
//!     workflow.update_field_data(
//!         cat,
//!         NodeFieldData::new(
//!             vec![InputDeclaration::data("input1", &["txt"])],
//!             vec![OutputDeclaration::data("out_file1", &["txt"])],
//!         ),
//!     )?;
//!
//!     let output = TerminalKey::output(upload, "output");
//!     let input = TerminalKey::input(cat, "input1");
//!     assert!(workflow.can_accept(&output, &input)?.can_accept);
//!
//!     workflow.connect(&output, &input)?;
//!
//!     // The list maps the step over its elements, so its output is a list too.
//!     let out_file = workflow.terminal(&TerminalKey::output(cat, "out_file1"))?;
//!     assert_eq!(out_file.map_over().to_string(), "list");
//!     Ok(())
//! }
//! ```

pub mod collection;
pub mod config;
pub mod connector;
pub mod datatypes;
pub mod error;
pub mod node;
pub mod prelude;
pub mod terminal;
pub mod workflow;
