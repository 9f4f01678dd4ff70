//! Prelude module for convenient imports
//!
//! Re-exports the types most hosts need to declare steps, wire them together
//! and inspect the resulting mapping.
//!
//! # Example
//!
//! ```rust
//! use terminus::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let mut workflow = Workflow::new(ExactDatatypes);
//! let node = workflow.add_node("tool", "Sort");
//! workflow.update_field_data(
//!     node,
//!     NodeFieldData::new(vec![InputDeclaration::data("input", &["bed"])], vec![]),
//! )?;
//! assert!(!workflow.node(node)?.has_mapped_over_input_terminals());
//! # Ok(())
//! # }
//! # run_example().unwrap();
//! ```

// Collection shapes
pub use crate::collection::{
    ANY_COLLECTION_TYPE_DESCRIPTION, CollectionSegment, CollectionTypeDescription,
    NULL_COLLECTION_TYPE_DESCRIPTION,
};

// Datatype oracles
pub use crate::datatypes::{DatatypeCompatibility, DatatypesMapping, ExactDatatypes};

// Terminals, nodes and connectors
pub use crate::connector::{Connector, ConnectorId};
pub use crate::node::{Node, NodeFieldData, NodeId, PostJobAction};
pub use crate::terminal::{
    ConnectionAcceptable, Direction, InputDeclaration, OutputDeclaration, Terminal, TerminalKey,
};

// The workflow arena
pub use crate::config::EditorConfig;
pub use crate::workflow::{ChangeEvent, Workflow, WorkflowBuilder};

// Error types
pub use crate::error::{CollectionTypeError, ConfigError, DatatypeError, WorkflowError};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
