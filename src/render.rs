//! Serialises a drawing graph to Graphviz dot source.
//!
//! The emitted text is plain `digraph` syntax: bordered clusters become
//! `subgraph cluster_<id>` blocks, rank groupings become anonymous
//! subgraphs, and node attributes come from the static style table.

use crate::graph::{Cluster, DrawGraph, Edge, GraphItem, Node, Rank};
use crate::style::{CLUSTER_FONT_SIZE, FONT_NAME, NODE_FONT_SIZE};

pub fn to_dot(graph: &DrawGraph) -> String {
    let mut out = String::new();
    out.push_str("digraph {\n");
    match &graph.root {
        GraphItem::Node(node) => write_node(&mut out, node, 1),
        GraphItem::Cluster(cluster) => write_cluster(&mut out, cluster, 1),
    }
    out.push_str("}\n");
    out
}

fn write_cluster(out: &mut String, cluster: &Cluster, depth: usize) {
    let pad = "  ".repeat(depth);
    let name = if cluster.bordered {
        format!("cluster_{}", cluster.id)
    } else {
        cluster.id.clone()
    };
    out.push_str(&format!("{pad}subgraph \"{}\" {{\n", escape(&name)));

    let inner = "  ".repeat(depth + 1);
    if let Some(label) = &cluster.label {
        out.push_str(&format!("{inner}label=\"{}\";\n", escape(label)));
        out.push_str(&format!(
            "{inner}fontname=\"{FONT_NAME}\"; fontsize=\"{CLUSTER_FONT_SIZE}\"; labeljust=\"l\";\n"
        ));
    }
    if cluster.dotted {
        out.push_str(&format!("{inner}style=\"dotted\";\n"));
    }
    if let Some(rank) = cluster.rank {
        let rank = match rank {
            Rank::Same => "same",
            Rank::Min => "min",
        };
        out.push_str(&format!("{inner}rank=\"{rank}\";\n"));
    }

    for node in &cluster.nodes {
        write_node(out, node, depth + 1);
    }
    for child in &cluster.children {
        write_cluster(out, child, depth + 1);
    }
    for edge in &cluster.edges {
        write_edge(out, edge, depth + 1);
    }

    out.push_str(&format!("{pad}}}\n"));
}

fn write_node(out: &mut String, node: &Node, depth: usize) {
    let pad = "  ".repeat(depth);
    let attrs = node.class.attrs();
    let mut line = format!(
        "{pad}\"{}\" [label=\"{}\", shape=\"{}\", fontname=\"{FONT_NAME}\", fontsize=\"{NODE_FONT_SIZE}\"",
        escape(&node.id),
        escape(&node.label),
        attrs.shape,
    );
    if let Some(color) = attrs.color {
        line.push_str(&format!(", color=\"{color}\""));
    }
    if let Some(style) = attrs.line_style {
        line.push_str(&format!(", style=\"{style}\""));
    }
    line.push_str("];\n");
    out.push_str(&line);
}

fn write_edge(out: &mut String, edge: &Edge, depth: usize) {
    let pad = "  ".repeat(depth);
    out.push_str(&format!(
        "{pad}\"{}\" -> \"{}\";\n",
        escape(&edge.from),
        escape(&edge.to)
    ));
}

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}
