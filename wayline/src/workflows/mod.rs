//! Ready-made graphs and declarative graph definitions.
//!
//! - [`code_review`]: the code-review loop over the built-in analysis tools.
//! - [`definition`]: [`GraphDefinition`] (JSON) compiled against a [`ToolRegistry`](crate::tools::ToolRegistry).

pub mod code_review;
pub mod definition;

pub use code_review::ReviewOptions;
pub use definition::{BranchDefinition, EdgeDefinition, GraphDefinition, NodeDefinition};
