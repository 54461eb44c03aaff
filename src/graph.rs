//! The drawing-graph value: the nested node/cluster/edge structure produced
//! by the lowering engine and consumed by an external renderer.
//!
//! Ids are built by concatenating a scope-path prefix with either a
//! variable's numeric identity or a counter-based suffix; they are globally
//! unique within one drawing graph. The value is constructed in full by one
//! traversal and never mutated afterwards.

use serde::Serialize;

use crate::style::NodeClass;

/// A leaf box in the diagram.
#[derive(Debug, Clone, Serialize)]
pub struct Node {
    pub id: String,
    pub label: String,
    pub class: NodeClass,
}

impl Node {
    pub fn new(id: impl Into<String>, label: impl Into<String>, class: NodeClass) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            class,
        }
    }
}

/// A directed edge between two node or cluster ids.
#[derive(Debug, Clone, Serialize)]
pub struct Edge {
    pub from: String,
    pub to: String,
}

impl Edge {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// Alignment hint for a grouping sub-graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rank {
    Same,
    Min,
}

/// A labelled, styled sub-graph: one call/branch/loop scope, or an
/// argument/output grouping inside one.
#[derive(Debug, Clone, Serialize)]
pub struct Cluster {
    pub id: String,
    pub label: Option<String>,
    /// Drawn with a visible border and label when true (a graphviz
    /// `cluster_` sub-graph); plain alignment groupings are borderless.
    pub bordered: bool,
    pub dotted: bool,
    pub rank: Option<Rank>,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    pub children: Vec<Cluster>,
}

impl Cluster {
    /// A bordered scope cluster for one call/branch/loop.
    pub fn scope(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: Some(label.into()),
            bordered: true,
            dotted: true,
            rank: Some(Rank::Same),
            nodes: Vec::new(),
            edges: Vec::new(),
            children: Vec::new(),
        }
    }

    /// A borderless rank-alignment grouping.
    pub fn rank_group(id: impl Into<String>, rank: Rank) -> Self {
        Self {
            id: id.into(),
            label: None,
            bordered: false,
            dotted: false,
            rank: Some(rank),
            nodes: Vec::new(),
            edges: Vec::new(),
            children: Vec::new(),
        }
    }

    /// A dotted, labelled band grouping (fold argument/output partitions).
    pub fn band(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: Some(label.into()),
            bordered: true,
            dotted: true,
            rank: Some(Rank::Same),
            nodes: Vec::new(),
            edges: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn add(&mut self, item: GraphItem) {
        match item {
            GraphItem::Node(node) => self.nodes.push(node),
            GraphItem::Cluster(cluster) => self.children.push(cluster),
        }
    }

    /// Ids of the leaf nodes in this cluster and its descendants.
    pub fn node_ids(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.collect_node_ids(&mut out);
        out
    }

    fn collect_node_ids(&self, out: &mut Vec<String>) {
        for node in &self.nodes {
            out.push(node.id.clone());
        }
        for child in &self.children {
            child.collect_node_ids(out);
        }
    }

    fn collect_ids(&self, out: &mut Vec<String>) {
        out.push(self.id.clone());
        for node in &self.nodes {
            out.push(node.id.clone());
        }
        for child in &self.children {
            child.collect_ids(out);
        }
    }

    fn collect_edges<'a>(&'a self, out: &mut Vec<&'a Edge>) {
        out.extend(self.edges.iter());
        for child in &self.children {
            child.collect_edges(out);
        }
    }
}

/// Either a leaf node or a nested cluster; what one lowered equation
/// contributes to its enclosing scope.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GraphItem {
    Node(Node),
    Cluster(Cluster),
}

/// The drawing-graph value wrapping the lowered top-level equation.
#[derive(Debug, Clone, Serialize)]
pub struct DrawGraph {
    pub root: GraphItem,
}

impl DrawGraph {
    /// All node and cluster ids in the graph, in tree order.
    pub fn ids(&self) -> Vec<String> {
        let mut out = Vec::new();
        match &self.root {
            GraphItem::Node(node) => out.push(node.id.clone()),
            GraphItem::Cluster(cluster) => cluster.collect_ids(&mut out),
        }
        out
    }

    /// All edges in the graph, in tree order.
    pub fn edges(&self) -> Vec<&Edge> {
        let mut out = Vec::new();
        if let GraphItem::Cluster(cluster) = &self.root {
            cluster.collect_edges(&mut out);
        }
        out
    }
}
