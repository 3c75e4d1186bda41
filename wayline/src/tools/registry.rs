use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;

use super::code_analysis;
use super::r#trait::{Tool, ToolError, ToolSpec};

/// Central registry of tools, keyed by name.
///
/// Registration happens while building the application; afterwards the registry is
/// shared read-only (usually as `Arc<ToolRegistry>`) between graphs and the HTTP layer.
///
/// # Examples
///
/// ```
/// use wayline::tools::ToolRegistry;
///
/// let registry = ToolRegistry::with_builtin();
/// assert!(registry.contains("check_complexity"));
/// assert_eq!(registry.list().len(), 4);
/// ```
#[derive(Default, Clone)]
pub struct ToolRegistry {
    tools: BTreeMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in code-analysis tools.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        for tool in code_analysis::builtin() {
            registry.register(tool);
        }
        registry
    }

    /// Registers a tool. A tool with the same name is replaced.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.name().to_string();
        tracing::debug!(tool = %name, "registering tool");
        self.tools.insert(name, tool);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Looks a tool up by name; the error lists what is available.
    pub fn get(&self, name: &str) -> Result<Arc<dyn Tool>, ToolError> {
        self.tools
            .get(name)
            .cloned()
            .ok_or_else(|| ToolError::NotFound {
                name: name.to_string(),
                available: self.available(),
            })
    }

    pub async fn call(&self, name: &str, args: Value) -> Result<Value, ToolError> {
        let tool = self.get(name)?;
        tool.call(args).await
    }

    /// Specs of every registered tool, ordered by name.
    pub fn list(&self) -> Vec<ToolSpec> {
        self.tools.values().map(|t| t.spec()).collect()
    }

    fn available(&self) -> String {
        if self.tools.is_empty() {
            return "none".to_string();
        }
        self.tools.keys().cloned().collect::<Vec<_>>().join(", ")
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.tools.keys().collect::<Vec<_>>())
            .finish()
    }
}
