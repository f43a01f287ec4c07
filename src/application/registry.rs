//! Name-keyed tool registry and dispatcher.
//!
//! Every workflow-visible operation follows one calling convention: a
//! single named-field JSON argument object in, one JSON value out (or a
//! typed error). That uniformity keeps the dispatch surface a single
//! generic pass-through. The registry is an explicit object constructed
//! at process start and passed by reference: never process-global state.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};

/// One callable workflow step.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Unique dispatch name.
    fn name(&self) -> &'static str;

    /// Short human-readable description for listings.
    fn description(&self) -> &'static str;

    /// Run the tool with a single argument object.
    async fn invoke(&self, args: Value) -> Result<Value>;
}

/// Registry of dispatchable tools.
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<&'static str, Box<dyn Tool>>,
}

impl ToolRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool under its unique name. A later registration with
    /// the same name replaces the earlier one.
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        self.tools.insert(tool.name(), tool);
    }

    /// Number of registered tools.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Registered tool names, sorted for stable listings.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.tools.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Look up a tool by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools.get(name).map(Box::as_ref)
    }

    /// Dispatch one invocation to the named tool.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownTool`] for unregistered names; otherwise
    /// whatever the tool itself returns.
    pub async fn dispatch(&self, name: &str, args: Value) -> Result<Value> {
        let tool = self.get(name).ok_or_else(|| Error::UnknownTool {
            name: name.to_string(),
        })?;
        debug!(tool = name, "Dispatching tool");
        tool.invoke(args).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &'static str {
            "echo"
        }

        fn description(&self) -> &'static str {
            "Echo the arguments back."
        }

        async fn invoke(&self, args: Value) -> Result<Value> {
            Ok(args)
        }
    }

    #[test]
    fn registry_starts_empty() {
        let registry = ToolRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
    }

    #[tokio::test]
    async fn registered_tool_dispatches() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(EchoTool));

        let result = registry.dispatch("echo", json!({"x": 1})).await.unwrap();
        assert_eq!(result, json!({"x": 1}));
    }

    #[tokio::test]
    async fn unknown_name_is_a_typed_error() {
        let registry = ToolRegistry::new();
        let err = registry.dispatch("nope", json!({})).await.unwrap_err();
        assert!(matches!(err, Error::UnknownTool { name } if name == "nope"));
    }

    #[test]
    fn names_are_sorted() {
        struct Named(&'static str);

        #[async_trait]
        impl Tool for Named {
            fn name(&self) -> &'static str {
                self.0
            }
            fn description(&self) -> &'static str {
                ""
            }
            async fn invoke(&self, _args: Value) -> Result<Value> {
                Ok(Value::Null)
            }
        }

        let mut registry = ToolRegistry::new();
        registry.register(Box::new(Named("zeta")));
        registry.register(Box::new(Named("alpha")));
        assert_eq!(registry.names(), vec!["alpha", "zeta"]);
    }
}
