//! Dependency graph export for debugging and documentation.
//!
//! [`DependencyGraph`] is a snapshot of the registry: one node per
//! providable type, one edge per constructor parameter. DOT and Mermaid
//! renderings are always available; JSON and YAML need the `graph-export`
//! feature.

use crate::internal::sync::TypeMap;
use crate::registration::{AnyArc, Registry};

#[cfg(feature = "graph-export")]
use serde::{Deserialize, Serialize};

/// A providable type.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "graph-export", derive(Serialize, Deserialize))]
pub struct GraphNode {
    /// Stable identifier, usable in DOT and Mermaid output
    pub id: String,
    /// Full type name
    pub type_name: String,
    /// Name of the constructor providing this type
    pub constructor: String,
    /// Whether an instance has been built already
    pub cached: bool,
}

/// "`from` needs `to`": `to` is a parameter of the constructor for `from`.
///
/// `to` may name a type with no node when it has no provider.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "graph-export", derive(Serialize, Deserialize))]
pub struct GraphEdge {
    /// Id of the dependent node
    pub from: String,
    /// Id of the dependency
    pub to: String,
}

/// Snapshot returned by [`Container::dependency_graph`](crate::Container::dependency_graph).
///
/// # Examples
///
/// ```
/// use ferrous_wire::Container;
/// use std::sync::Arc;
///
/// struct Database;
/// struct Repository(Arc<Database>);
///
/// let mut container = Container::new();
/// container.provide(|| Database)?;
/// container.provide(|db: Arc<Database>| Repository(db))?;
///
/// let graph = container.dependency_graph();
/// assert_eq!(graph.nodes.len(), 2);
/// assert_eq!(graph.edges.len(), 1);
/// assert!(graph.to_dot().starts_with("digraph DependencyGraph {"));
/// # Ok::<(), ferrous_wire::DiError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "graph-export", derive(Serialize, Deserialize))]
pub struct DependencyGraph {
    /// Nodes in provider registration order
    pub nodes: Vec<GraphNode>,
    /// Edges in parameter order
    pub edges: Vec<GraphEdge>,
}

impl DependencyGraph {
    pub(crate) fn build(registry: &Registry, cache: &TypeMap<AnyArc>) -> Self {
        let mut graph = DependencyGraph::default();

        for (_, provider) in registry.iter() {
            for output in provider.outputs.iter() {
                graph.nodes.push(GraphNode {
                    id: node_id(output.display_name()),
                    type_name: output.display_name().to_string(),
                    constructor: provider.name.to_string(),
                    cached: cache.contains_key(output),
                });

                for param in provider.params.iter() {
                    graph.edges.push(GraphEdge {
                        from: node_id(output.display_name()),
                        to: node_id(param.display_name()),
                    });
                }
            }
        }

        graph
    }

    /// Looks up a node by full type name.
    pub fn node(&self, type_name: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.type_name == type_name)
    }

    /// Renders the graph in Graphviz DOT format.
    ///
    /// Cached types are filled; types without a provider are drawn dashed.
    pub fn to_dot(&self) -> String {
        let mut output = String::new();
        output.push_str("digraph DependencyGraph {\n");
        output.push_str("  rankdir=TB;\n");
        output.push_str("  node [shape=box];\n\n");

        for node in &self.nodes {
            let fill = if node.cached { "lightblue" } else { "white" };
            output.push_str(&format!(
                "  \"{}\" [label=\"{}\", fillcolor={}, style=filled];\n",
                node.id,
                escape(&node.type_name),
                fill
            ));
        }
        for missing in self.unprovided() {
            output.push_str(&format!("  \"{}\" [style=dashed];\n", missing));
        }

        output.push('\n');
        for edge in &self.edges {
            output.push_str(&format!("  \"{}\" -> \"{}\";\n", edge.from, edge.to));
        }

        output.push_str("}\n");
        output
    }

    /// Renders the graph as a Mermaid flowchart.
    pub fn to_mermaid(&self) -> String {
        let mut output = String::new();
        output.push_str("graph TD\n");

        for node in &self.nodes {
            output.push_str(&format!("  {}[\"{}\"]\n", node.id, escape(&node.type_name)));
        }
        for edge in &self.edges {
            output.push_str(&format!("  {} --> {}\n", edge.from, edge.to));
        }

        output.push_str("\n  classDef cached fill:#e1f5fe\n");
        for node in self.nodes.iter().filter(|n| n.cached) {
            output.push_str(&format!("  class {} cached\n", node.id));
        }

        output
    }

    /// Serializes the graph as pretty-printed JSON.
    #[cfg(feature = "graph-export")]
    pub fn to_json(&self) -> crate::DiResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| crate::DiError::Export(e.to_string()))
    }

    /// Serializes the graph as YAML.
    #[cfg(feature = "graph-export")]
    pub fn to_yaml(&self) -> crate::DiResult<String> {
        serde_yaml::to_string(self).map_err(|e| crate::DiError::Export(e.to_string()))
    }

    /// Edge targets that have no node.
    fn unprovided(&self) -> Vec<&str> {
        let mut missing: Vec<&str> = self
            .edges
            .iter()
            .map(|e| e.to.as_str())
            .filter(|to| !self.nodes.iter().any(|n| n.id == *to))
            .collect();
        missing.sort_unstable();
        missing.dedup();
        missing
    }
}

/// Identifier safe for both DOT and Mermaid: alphanumerics and `_` only.
fn node_id(type_name: &str) -> String {
    type_name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

fn escape(label: &str) -> String {
    label.replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Container;
    use std::sync::Arc;

    struct Database;
    struct Cache;
    struct Repository;

    fn sample() -> Container {
        let mut container = Container::new();
        container
            .provide(|| Database)
            .unwrap()
            .provide(|_: Arc<Database>, _: Arc<Cache>| Repository)
            .unwrap();
        container
    }

    #[test]
    fn nodes_and_edges_follow_registrations() {
        let container = sample();
        container.resolve::<Database>().unwrap();

        let graph = container.dependency_graph();
        let db = graph.node(std::any::type_name::<Database>()).unwrap();
        let repo = graph.node(std::any::type_name::<Repository>()).unwrap();

        assert!(db.cached);
        assert!(!repo.cached);
        assert_eq!(graph.edges.len(), 2);
        assert_eq!(graph.edges[0].from, repo.id);
        assert_eq!(graph.edges[0].to, db.id);
    }

    #[test]
    fn dot_marks_unprovided_types() {
        let dot = sample().dependency_graph().to_dot();
        let cache_id = node_id(std::any::type_name::<Cache>());

        assert!(dot.contains(&format!("\"{}\" [style=dashed];", cache_id)));
        assert!(dot.trim_end().ends_with('}'));
    }

    #[test]
    fn mermaid_lists_edges() {
        let graph = sample().dependency_graph();
        let mermaid = graph.to_mermaid();

        assert!(mermaid.starts_with("graph TD\n"));
        assert_eq!(mermaid.matches("-->").count(), 2);
    }

    #[test]
    fn node_ids_are_identifier_safe() {
        assert_eq!(node_id("a::B<c::D>"), "a__B_c__D_");
    }

    #[cfg(feature = "graph-export")]
    #[test]
    fn serializes_to_json_and_yaml() {
        let graph = sample().dependency_graph();

        let json = graph.to_json().unwrap();
        let back: DependencyGraph = serde_json::from_str(&json).unwrap();
        assert_eq!(back, graph);

        assert!(graph.to_yaml().unwrap().contains("nodes:"));
    }
}
