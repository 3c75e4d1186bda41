//! Tools: named JSON functions that nodes can call.
//!
//! [`ToolRegistry`] holds tools by name; [`ToolNode`] wraps one tool as a graph
//! node. The built-in code-analysis tools live in [`code_analysis`].

pub mod code_analysis;
mod registry;
mod r#trait;
mod tool_node;

pub use registry::ToolRegistry;
pub use r#trait::{Tool, ToolError, ToolSpec};
pub use tool_node::ToolNode;
