//! Flattened JSON dump of a drawing graph, for debugging and tooling.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use serde::Serialize;

use crate::graph::{Cluster, DrawGraph, GraphItem};

#[derive(Debug, Serialize)]
pub struct GraphDump {
    pub nodes: Vec<NodeDump>,
    pub edges: Vec<EdgeDump>,
    pub clusters: Vec<ClusterDump>,
}

#[derive(Debug, Serialize)]
pub struct NodeDump {
    pub id: String,
    pub label: String,
    pub class: String,
    pub cluster: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct EdgeDump {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Serialize)]
pub struct ClusterDump {
    pub id: String,
    pub label: Option<String>,
    pub parent: Option<String>,
    pub bordered: bool,
}

pub fn build_graph_dump(graph: &DrawGraph) -> GraphDump {
    let mut dump = GraphDump {
        nodes: Vec::new(),
        edges: Vec::new(),
        clusters: Vec::new(),
    };
    match &graph.root {
        GraphItem::Node(node) => dump.nodes.push(NodeDump {
            id: node.id.clone(),
            label: node.label.clone(),
            class: node.class.as_str().to_string(),
            cluster: None,
        }),
        GraphItem::Cluster(cluster) => flatten_cluster(cluster, None, &mut dump),
    }
    dump
}

fn flatten_cluster(cluster: &Cluster, parent: Option<&str>, dump: &mut GraphDump) {
    dump.clusters.push(ClusterDump {
        id: cluster.id.clone(),
        label: cluster.label.clone(),
        parent: parent.map(str::to_string),
        bordered: cluster.bordered,
    });
    for node in &cluster.nodes {
        dump.nodes.push(NodeDump {
            id: node.id.clone(),
            label: node.label.clone(),
            class: node.class.as_str().to_string(),
            cluster: Some(cluster.id.clone()),
        });
    }
    for edge in &cluster.edges {
        dump.edges.push(EdgeDump {
            from: edge.from.clone(),
            to: edge.to.clone(),
        });
    }
    for child in &cluster.children {
        flatten_cluster(child, Some(&cluster.id), dump);
    }
}

pub fn write_graph_dump(path: &Path, graph: &DrawGraph) -> anyhow::Result<()> {
    let dump = build_graph_dump(graph);
    let file = File::create(path)?;
    serde_json::to_writer_pretty(BufWriter::new(file), &dump)?;
    Ok(())
}
