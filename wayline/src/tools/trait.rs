use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Tool description listed by the registry (name, human description, argument schema).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    /// JSON schema of the argument object.
    pub input_schema: Value,
}

/// Error returned by a tool or by registry lookup.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ToolError {
    #[error("tool not found: {name} (available: {available})")]
    NotFound { name: String, available: String },
    #[error("invalid arguments: {0}")]
    InvalidInput(String),
    #[error("tool execution failed: {0}")]
    Execution(String),
}

/// A named function over JSON: object in, object out.
///
/// Tools are registered with [`ToolRegistry`](super::ToolRegistry) and called by
/// [`ToolNode`](super::ToolNode) or by workflow nodes. They see only the argument
/// value, never the run.
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use serde_json::{json, Value};
/// use wayline::tools::{Tool, ToolError, ToolSpec};
///
/// struct Echo;
///
/// #[async_trait]
/// impl Tool for Echo {
///     fn name(&self) -> &str {
///         "echo"
///     }
///
///     fn spec(&self) -> ToolSpec {
///         ToolSpec {
///             name: "echo".to_string(),
///             description: "Returns its arguments".to_string(),
///             input_schema: json!({"type": "object"}),
///         }
///     }
///
///     async fn call(&self, args: Value) -> Result<Value, ToolError> {
///         Ok(args)
///     }
/// }
/// ```
#[async_trait]
pub trait Tool: Send + Sync {
    /// Unique name within a registry.
    fn name(&self) -> &str;

    fn spec(&self) -> ToolSpec;

    /// Runs the tool. `args` is a JSON object; the result should be one too when
    /// it is merged into state.
    async fn call(&self, args: Value) -> Result<Value, ToolError>;
}
