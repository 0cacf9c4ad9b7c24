use crate::traits::{Tool, ToolResult, ToolSpec};
use std::sync::Arc;
use tracing::{error, warn};

/// The fixed set of tools advertised to the model. Populated at startup via
/// [`register`](Self::register), then shared read-only behind an `Arc`.
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    pub fn register(&mut self, tool: Box<dyn Tool>) {
        self.tools.push(Arc::from(tool));
    }

    pub fn specs(&self) -> Vec<ToolSpec> {
        self.tools.iter().map(|t| t.spec()).collect()
    }

    /// Looks up and invokes a tool. Lookup misses and invocation failures
    /// are recovered locally into an error `ToolResult` so the loop can
    /// report them back to the model instead of terminating.
    pub async fn execute(&self, name: &str, args: serde_json::Value) -> ToolResult {
        let tool = self.tools.iter().find(|t| t.name() == name);

        match tool {
            Some(tool) => match tool.execute(args).await {
                Ok(result) => result,
                Err(e) => {
                    error!("Error executing tool {}: {}", name, e);
                    ToolResult::error(format!("Error executing tool {}: {}", name, e))
                }
            },
            None => {
                warn!("Tool {} not found", name);
                ToolResult::error(format!("Tool '{}' not found", name))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &str {
            "echo"
        }

        fn description(&self) -> &str {
            "Echo the input back"
        }

        fn parameters_schema(&self) -> serde_json::Value {
            serde_json::json!({"type": "object", "properties": {}})
        }

        async fn execute(&self, args: serde_json::Value) -> anyhow::Result<ToolResult> {
            Ok(ToolResult::success(args.to_string()))
        }
    }

    struct FailingTool;

    #[async_trait]
    impl Tool for FailingTool {
        fn name(&self) -> &str {
            "boom"
        }

        fn description(&self) -> &str {
            "Always fails"
        }

        fn parameters_schema(&self) -> serde_json::Value {
            serde_json::json!({"type": "object", "properties": {}})
        }

        async fn execute(&self, _args: serde_json::Value) -> anyhow::Result<ToolResult> {
            anyhow::bail!("socket closed")
        }
    }

    #[tokio::test]
    async fn executes_registered_tool() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(EchoTool));

        let result = registry.execute("echo", serde_json::json!({"x": 1})).await;
        assert!(result.success);
        assert_eq!(result.output, r#"{"x":1}"#);
    }

    #[tokio::test]
    async fn lookup_miss_is_recovered() {
        let registry = ToolRegistry::new();

        let result = registry.execute("weather", serde_json::json!({})).await;
        assert!(!result.success);
        assert!(result.error.unwrap().contains("not found"));
    }

    #[tokio::test]
    async fn invocation_failure_is_recovered() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(FailingTool));

        let result = registry.execute("boom", serde_json::json!({})).await;
        assert!(!result.success);
        let error = result.error.unwrap();
        assert!(error.contains("Error executing tool boom"));
        assert!(error.contains("socket closed"));
    }

    #[test]
    fn specs_cover_all_tools() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(EchoTool));
        registry.register(Box::new(FailingTool));

        let specs = registry.specs();
        assert_eq!(specs.len(), 2);
        assert_eq!(specs[0].name, "echo");
        assert_eq!(specs[1].name, "boom");
    }
}
