use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use std::collections::HashMap;

/// Reverse reference map: referenced file -> files that reference it.
///
/// Keys are slash-separated relative paths. Parallel edges are never stored, so
/// out-degree is the number of distinct referencing files.
#[derive(Debug, Default)]
pub struct RelationshipMap {
    /// Directed graph (referenced -> referencing)
    graph: DiGraph<String, ()>,

    /// Relative path -> NodeIndex mapping for fast lookup
    index: HashMap<String, NodeIndex>,
}

impl RelationshipMap {
    pub fn new() -> Self {
        Self::default()
    }

    fn node(&mut self, path: &str) -> NodeIndex {
        if let Some(&idx) = self.index.get(path) {
            return idx;
        }
        let idx = self.graph.add_node(path.to_string());
        self.index.insert(path.to_string(), idx);
        idx
    }

    /// Record that `referencing` imports or includes `referenced`
    pub fn add_reference(&mut self, referenced: &str, referencing: &str) {
        let from = self.node(referenced);
        let to = self.node(referencing);
        self.graph.update_edge(from, to, ());
    }

    /// Number of distinct files referencing `path`
    pub fn fan_in(&self, path: &str) -> usize {
        self.index.get(path).map_or(0, |&idx| {
            self.graph
                .neighbors_directed(idx, Direction::Outgoing)
                .count()
        })
    }

    /// Files referencing `path`, sorted
    pub fn referrers(&self, path: &str) -> Vec<&str> {
        let Some(&idx) = self.index.get(path) else {
            return Vec::new();
        };
        let mut referrers: Vec<&str> = self
            .graph
            .neighbors_directed(idx, Direction::Outgoing)
            .filter_map(|n| self.graph.node_weight(n).map(String::as_str))
            .collect();
        referrers.sort_unstable();
        referrers
    }

    /// Number of files that appear in at least one edge
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.edge_count() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn counts_distinct_referrers() {
        let mut map = RelationshipMap::new();
        map.add_reference("utils.py", "main.py");
        map.add_reference("utils.py", "main.py");
        map.add_reference("utils.py", "app.py");

        assert_eq!(map.fan_in("utils.py"), 2);
        assert_eq!(map.referrers("utils.py"), vec!["app.py", "main.py"]);
        assert_eq!(map.fan_in("main.py"), 0);
        assert_eq!(map.fan_in("unknown.py"), 0);
        assert_eq!(map.edge_count(), 2);
        assert_eq!(map.node_count(), 3);
    }
}
