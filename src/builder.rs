//! Node and sub-cluster factories: argument and output wiring for one scope.
//!
//! These helpers are pure apart from the label allocator and unique-id
//! counter passed in by the caller. Argument/output pairing with the parent
//! scope is positional throughout; variables marked unused (trailing
//! underscore) are skipped without disturbing the pairing.

use std::collections::HashSet;

use crate::graph::{Cluster, Edge, Node, Rank};
use crate::ir::{Atom, Literal, Var, VarId};
use crate::labels::LabelMap;
use crate::style::NodeClass;

/// Id of the node representing `var` inside `scope`.
pub(crate) fn var_node_id(scope: &str, var: &Var) -> String {
    format!("{scope}_{}", var.id.0)
}

pub(crate) fn var_label(var: &Var, show_types: bool, labels: &mut LabelMap) -> String {
    let label = labels.label_for(var.id);
    match (&var.ty, show_types) {
        (Some(ty), true) => format!("{label}: {ty}"),
        _ => label.to_string(),
    }
}

pub(crate) fn literal_label(lit: &Literal, show_types: bool) -> String {
    match (&lit.ty, show_types) {
        (Some(ty), true) => format!("{}: {ty}", lit.value),
        _ => lit.value.clone(),
    }
}

pub(crate) fn arg_node(
    id: &str,
    var: &Var,
    show_types: bool,
    labels: &mut LabelMap,
) -> Node {
    Node::new(id, var_label(var, show_types, labels), NodeClass::InArg)
}

pub(crate) fn const_node(
    id: &str,
    var: &Var,
    show_types: bool,
    labels: &mut LabelMap,
) -> Node {
    Node::new(id, var_label(var, show_types, labels), NodeClass::ConstArg)
}

pub(crate) fn literal_node(id: &str, lit: &Literal, show_types: bool) -> Node {
    Node::new(id, literal_label(lit, show_types), NodeClass::Literal)
}

pub(crate) fn var_node(
    id: &str,
    var: &Var,
    show_types: bool,
    labels: &mut LabelMap,
) -> Node {
    Node::new(id, var_label(var, show_types, labels), NodeClass::Var)
}

pub(crate) fn out_node(
    id: &str,
    var: &Var,
    show_types: bool,
    labels: &mut LabelMap,
) -> Node {
    Node::new(id, var_label(var, show_types, labels), NodeClass::OutArg)
}

/// Builds the argument sub-cluster for a scope, plus the edges the parent
/// scope must add to feed it.
///
/// Literal operands have no producer in the parent scope: they get a local
/// literal node feeding the argument instead of an inbound edge. Const vars
/// are rendered with no inbound edge at all.
#[allow(clippy::too_many_arguments)]
pub(crate) fn arguments(
    scope_id: &str,
    parent_id: &str,
    constvars: &[Var],
    invars: &[Var],
    parent_inputs: &[Atom],
    show_types: bool,
    labels: &mut LabelMap,
    n: &mut usize,
) -> (Cluster, Vec<Edge>) {
    let mut args = Cluster::rank_group(format!("{scope_id}_args"), Rank::Same);
    let mut edges = Vec::new();

    for var in constvars {
        let const_id = var_node_id(scope_id, var);
        args.nodes.push(const_node(&const_id, var, show_types, labels));
    }

    for (var, parent) in invars.iter().zip(parent_inputs) {
        if var.is_unused() {
            continue;
        }
        let arg_id = var_node_id(scope_id, var);
        match parent {
            Atom::Lit(lit) => {
                let lit_id = format!("{scope_id}_lit{n}");
                *n += 1;
                args.nodes.push(literal_node(&lit_id, lit, show_types));
                args.nodes.push(arg_node(&arg_id, var, show_types, labels));
                args.edges.push(Edge::new(lit_id, arg_id));
            }
            Atom::Var(p_var) => {
                args.nodes.push(arg_node(&arg_id, var, show_types, labels));
                edges.push(Edge::new(var_node_id(parent_id, p_var), arg_id));
            }
        }
    }

    (args, edges)
}

/// Argument sub-cluster for a bounded-fold construct: inputs partitioned
/// into consts/carry/iterate bands by the construct's declared counts.
#[allow(clippy::too_many_arguments)]
pub(crate) fn fold_arguments(
    scope_id: &str,
    parent_id: &str,
    invars: &[Var],
    parent_inputs: &[Atom],
    num_consts: usize,
    num_carry: usize,
    show_types: bool,
    labels: &mut LabelMap,
    n: &mut usize,
) -> (Cluster, Vec<Edge>) {
    let mut args = Cluster::rank_group(format!("{scope_id}_args"), Rank::Min);
    let mut consts = Cluster::band(format!("{scope_id}_consts"), "consts");
    let mut carry = Cluster::band(format!("{scope_id}_carry"), "carry");
    let mut iterate = Cluster::band(format!("{scope_id}_iter"), "iterate");
    let mut edges = Vec::new();

    for (i, (var, parent)) in invars.iter().zip(parent_inputs).enumerate() {
        if var.is_unused() {
            continue;
        }
        let arg_id = var_node_id(scope_id, var);
        let band = if i < num_consts {
            &mut consts
        } else if i < num_consts + num_carry {
            &mut carry
        } else {
            &mut iterate
        };
        band.nodes.push(arg_node(&arg_id, var, show_types, labels));
        match parent {
            Atom::Lit(lit) => {
                let lit_id = format!("{scope_id}_lit{n}");
                *n += 1;
                args.nodes.push(literal_node(&lit_id, lit, show_types));
                args.edges.push(Edge::new(lit_id, arg_id));
            }
            Atom::Var(p_var) => {
                edges.push(Edge::new(var_node_id(parent_id, p_var), arg_id));
            }
        }
    }

    args.children.push(consts);
    args.children.push(carry);
    args.children.push(iterate);
    (args, edges)
}

/// What a scope's output sub-cluster hands back to the caller.
pub(crate) struct Outputs {
    /// The sub-cluster holding the output nodes.
    pub cluster: Cluster,
    /// Edges from each output node to the parent-scope receiving variable.
    pub out_edges: Vec<Edge>,
    /// Companion var-styled nodes the parent scope must add so it can draw
    /// the received values.
    pub parent_nodes: Vec<Node>,
    /// Pass-through identity edges (input node to suffixed output node),
    /// added inside the scope itself.
    pub id_edges: Vec<Edge>,
}

/// Builds the output sub-cluster for a scope.
///
/// An output variable that is also one of the scope's declared inputs gets a
/// distinct `_out`-suffixed id joined to the input node by an identity edge,
/// so a pass-through is always drawn explicitly rather than aliased.
pub(crate) fn outputs(
    scope_id: &str,
    parent_id: &str,
    invars: &[Var],
    outvars: &[Var],
    parent_outvars: &[Var],
    show_types: bool,
    labels: &mut LabelMap,
) -> Outputs {
    let mut cluster = Cluster::rank_group(format!("{scope_id}_outs"), Rank::Same);
    let mut out_edges = Vec::new();
    let mut parent_nodes = Vec::new();
    let mut id_edges = Vec::new();
    let in_ids: HashSet<VarId> = invars.iter().map(|v| v.id).collect();

    for (var, p_var) in outvars.iter().zip(parent_outvars) {
        let base_id = var_node_id(scope_id, var);
        let out_id = if in_ids.contains(&var.id) {
            let out_id = format!("{base_id}_out");
            id_edges.push(Edge::new(&base_id, &out_id));
            out_id
        } else {
            base_id
        };
        cluster.nodes.push(out_node(&out_id, var, show_types, labels));
        let parent_var_id = var_node_id(parent_id, p_var);
        out_edges.push(Edge::new(&out_id, &parent_var_id));
        parent_nodes.push(var_node(&parent_var_id, p_var, show_types, labels));
    }

    Outputs {
        cluster,
        out_edges,
        parent_nodes,
        id_edges,
    }
}

/// Output sub-cluster for a bounded-fold construct: outputs partitioned into
/// carry and accumulate bands by the declared carry count.
pub(crate) fn fold_outputs(
    scope_id: &str,
    parent_id: &str,
    invars: &[Var],
    outvars: &[Var],
    parent_outvars: &[Var],
    num_carry: usize,
    show_types: bool,
    labels: &mut LabelMap,
) -> Outputs {
    let mut cluster = Cluster::rank_group(format!("{scope_id}_outs"), Rank::Same);
    let mut carry = Cluster::band(format!("{scope_id}_outs_carry"), "carry");
    let mut accumulate = Cluster::band(format!("{scope_id}_outs_acc"), "accumulate");
    let mut out_edges = Vec::new();
    let mut parent_nodes = Vec::new();
    let mut id_edges = Vec::new();
    let in_ids: HashSet<VarId> = invars.iter().map(|v| v.id).collect();

    for (i, (var, p_var)) in outvars.iter().zip(parent_outvars).enumerate() {
        let base_id = var_node_id(scope_id, var);
        let out_id = if in_ids.contains(&var.id) {
            let out_id = format!("{base_id}_out");
            id_edges.push(Edge::new(&base_id, &out_id));
            out_id
        } else {
            base_id
        };
        let band = if i < num_carry {
            &mut carry
        } else {
            &mut accumulate
        };
        band.nodes.push(out_node(&out_id, var, show_types, labels));
        let parent_var_id = var_node_id(parent_id, p_var);
        out_edges.push(Edge::new(&out_id, &parent_var_id));
        parent_nodes.push(var_node(&parent_var_id, p_var, show_types, labels));
    }

    cluster.children.push(carry);
    cluster.children.push(accumulate);
    Outputs {
        cluster,
        out_edges,
        parent_nodes,
        id_edges,
    }
}
