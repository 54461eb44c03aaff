//! traceviz renders a traced numerical-computation program — a closed IR of
//! typed variables and equations, with nested sub-programs for calls,
//! conditionals and loops — as a nested box-and-arrow drawing graph.
//!
//! The crate consumes an already-traced [`ir::Program`] and produces an
//! abstract [`graph::DrawGraph`]; obtaining the IR from a host framework and
//! rasterising the result are left to external collaborators. [`to_dot`]
//! serialises a drawing graph to Graphviz source for such a collaborator.

pub mod draw;
pub mod graph;
pub mod graph_dump;
pub mod ir;
pub mod labels;
pub mod render;
pub mod style;

mod builder;
mod lower;

pub use draw::{DrawError, DrawOptions, draw_graph};
pub use graph::{Cluster, DrawGraph, Edge, GraphItem, Node};
pub use render::to_dot;
