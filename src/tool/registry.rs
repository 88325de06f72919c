// ABOUTME: Implements the Registry - an immutable name-to-tool lookup built
// ABOUTME: once per agent. Rejects duplicate names at construction.

use std::collections::HashMap;
use std::sync::Arc;

use super::Tool;
use crate::error::ToolError;
use crate::model::ToolDefinition;

/// A read-only registry of tools, safe to share across concurrent steps.
pub struct Registry<C> {
    tools: Arc<HashMap<String, Arc<dyn Tool<C>>>>,
}

impl<C: Send + Sync + 'static> Registry<C> {
    /// Build a registry from a list of tools.
    ///
    /// Fails with [`ToolError::DuplicateName`] if two tools share a name.
    pub fn build(
        tools: impl IntoIterator<Item = Arc<dyn Tool<C>>>,
    ) -> Result<Self, ToolError> {
        let mut by_name = HashMap::new();
        for tool in tools {
            let name = tool.name().to_string();
            if by_name.contains_key(&name) {
                return Err(ToolError::DuplicateName(name));
            }
            by_name.insert(name, tool);
        }
        Ok(Self {
            tools: Arc::new(by_name),
        })
    }

    /// Create an empty registry.
    pub fn empty() -> Self {
        Self {
            tools: Arc::new(HashMap::new()),
        }
    }

    /// Get a tool by name.
    pub fn lookup(&self, name: &str) -> Option<Arc<dyn Tool<C>>> {
        self.tools.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// List all tool names, sorted alphabetically.
    pub fn list(&self) -> Vec<String> {
        let mut names: Vec<_> = self.tools.keys().cloned().collect();
        names.sort();
        names
    }

    /// Get the number of registered tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Tool definitions for advertisement to the model, sorted by name.
    pub fn all_schemas(&self) -> Vec<ToolDefinition> {
        let mut definitions: Vec<_> = self.tools.values().map(|t| t.definition()).collect();
        definitions.sort_by(|a, b| a.name.cmp(&b.name));
        definitions
    }
}

impl<C: Send + Sync + 'static> Default for Registry<C> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<C> Clone for Registry<C> {
    fn clone(&self) -> Self {
        Self {
            tools: Arc::clone(&self.tools),
        }
    }
}
