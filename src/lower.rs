//! The recursive lowering engine: walks one equation at a time and emits a
//! nested drawing-graph structure with edges wired across nesting
//! boundaries.
//!
//! All traversal state lives in [`LowerCtx`]: the unique-id counter and the
//! display-label allocator, threaded by mutable borrow through every
//! recursive call. Sibling equations are lowered strictly in sequence, so no
//! two lowerings ever observe the same counter value and generated ids never
//! collide.
//!
//! Malformed IR (input/output lists that do not match a sub-function's
//! declared signature) is a tracer bug and is not defensively handled here;
//! a length mismatch panics on indexing, and the caller receives no partial
//! graph.

use std::collections::HashSet;

use crate::builder::{
    arg_node, arguments, fold_arguments, fold_outputs, literal_node, out_node,
    outputs, var_node, var_node_id,
};
use crate::graph::{Cluster, Edge, GraphItem, Node, Rank};
use crate::ir::{Atom, Equation, Params, SubFn, Var, contains_transparent};
use crate::labels::LabelMap;
use crate::style::NodeClass;

/// Traversal state threaded through the recursion.
pub(crate) struct LowerCtx {
    /// Monotonically increasing unique-id counter.
    pub n: usize,
    /// Shared display-label table, one per drawing graph.
    pub labels: LabelMap,
    pub collapse_primitives: bool,
    pub show_types: bool,
}

impl LowerCtx {
    pub fn new(collapse_primitives: bool, show_types: bool) -> Self {
        Self {
            n: 0,
            labels: LabelMap::new(),
            collapse_primitives,
            show_types,
        }
    }

    fn next_id(&mut self, stem: &str) -> String {
        let id = format!("{stem}_{}", self.n);
        self.n += 1;
        id
    }
}

/// What one lowered equation hands back to its enclosing scope.
pub(crate) struct Lowered {
    /// The node or cluster representing the equation.
    pub item: GraphItem,
    /// Edges the parent must add to feed the equation's arguments.
    pub in_edges: Vec<Edge>,
    /// Nodes the parent must add: literal operands and produced variables.
    pub parent_nodes: Vec<Node>,
    /// Edges the parent must add from the equation's outputs to the
    /// parent-scope variables receiving them.
    pub out_edges: Vec<Edge>,
}

/// Lowers one equation into a node or nested cluster, dispatching on the
/// equation's structural params.
pub(crate) fn lower_eqn(eqn: &Equation, parent_id: &str, ctx: &mut LowerCtx) -> Lowered {
    match &eqn.params {
        Params::Call { name, body } => {
            if contains_transparent(&body.eqns) || !ctx.collapse_primitives {
                lower_call(name, body, eqn, parent_id, ctx)
            } else {
                // Shallow body: collapse the whole call to a single node.
                lower_op_node(name, NodeClass::Function, eqn, parent_id, ctx)
            }
        }
        Params::Switch { branches } => lower_switch(branches, eqn, parent_id, ctx),
        Params::Fold {
            body,
            num_consts,
            num_carry,
            length,
        } => lower_fold(body, *num_consts, *num_carry, *length, eqn, parent_id, ctx),
        Params::Loop { cond, body } => lower_loop(cond, body, eqn, parent_id, ctx),
        Params::None => {
            lower_op_node(&eqn.primitive, NodeClass::Primitive, eqn, parent_id, ctx)
        }
    }
}

/// A single styled node for a primitive operation or a collapsed call,
/// wired directly in the caller's scope.
fn lower_op_node(
    name: &str,
    class: NodeClass,
    eqn: &Equation,
    parent_id: &str,
    ctx: &mut LowerCtx,
) -> Lowered {
    let node_id = ctx.next_id(name);
    let node = Node::new(&node_id, name, class);

    let mut in_edges = Vec::new();
    let mut parent_nodes = Vec::new();
    let mut out_edges = Vec::new();

    for atom in &eqn.inputs {
        match atom {
            Atom::Lit(lit) => {
                // Each literal use gets its own node, never shared.
                let lit_id = ctx.next_id(&format!("{parent_id}_lit"));
                parent_nodes.push(literal_node(&lit_id, lit, ctx.show_types));
                in_edges.push(Edge::new(lit_id, &node_id));
            }
            Atom::Var(var) => {
                in_edges.push(Edge::new(var_node_id(parent_id, var), &node_id));
            }
        }
    }

    for var in &eqn.outputs {
        let out_id = var_node_id(parent_id, var);
        parent_nodes.push(var_node(&out_id, var, ctx.show_types, &mut ctx.labels));
        out_edges.push(Edge::new(&node_id, out_id));
    }

    Lowered {
        item: GraphItem::Node(node),
        in_edges,
        parent_nodes,
        out_edges,
    }
}

/// Rule 1: a call expanded into a fully nested scope cluster.
pub(crate) fn lower_call(
    name: &str,
    body: &SubFn,
    eqn: &Equation,
    parent_id: &str,
    ctx: &mut LowerCtx,
) -> Lowered {
    let scope_id = ctx.next_id(name);
    let mut cluster = Cluster::scope(&scope_id, name);

    let show_types = ctx.show_types;
    let (args, arg_edges) = arguments(
        &scope_id,
        parent_id,
        &body.constvars,
        &body.invars,
        &eqn.inputs,
        show_types,
        &mut ctx.labels,
        &mut ctx.n,
    );
    cluster.children.push(args);

    for sub_eqn in &body.eqns {
        let lowered = lower_eqn(sub_eqn, &scope_id, ctx);
        cluster.add(lowered.item);
        cluster.edges.extend(lowered.in_edges);
        cluster.nodes.extend(lowered.parent_nodes);
        cluster.edges.extend(lowered.out_edges);
    }

    let outs = outputs(
        &scope_id,
        parent_id,
        &body.invars,
        &body.outvars,
        &eqn.outputs,
        show_types,
        &mut ctx.labels,
    );
    // An outvar produced by a body equation already has a var node in the
    // scope; the out-styled node in the output grouping takes over its id.
    let placed: HashSet<String> = outs.cluster.node_ids().into_iter().collect();
    cluster.nodes.retain(|node| !placed.contains(&node.id));
    cluster.children.push(outs.cluster);
    cluster.edges.extend(outs.id_edges);

    Lowered {
        item: GraphItem::Cluster(cluster),
        in_edges: arg_edges,
        parent_nodes: outs.parent_nodes,
        out_edges: outs.out_edges,
    }
}

/// Rule 3: an N-way switch cluster. The first input drives the dispatch;
/// the remaining operands are shared by all branches, which converge onto
/// one set of output nodes.
fn lower_switch(
    branches: &[SubFn],
    eqn: &Equation,
    parent_id: &str,
    ctx: &mut LowerCtx,
) -> Lowered {
    let scope_id = ctx.next_id(&format!("{parent_id}_switch"));
    let mut cluster = Cluster::scope(&scope_id, "switch");

    let mut in_edges = Vec::new();
    let mut parent_nodes = Vec::new();

    let mut inputs = Cluster::rank_group(format!("{scope_id}_inputs"), Rank::Same);
    let index_id = format!("{scope_id}_idx");
    inputs
        .nodes
        .push(Node::new(&index_id, "idx", NodeClass::SwitchIndex));
    match &eqn.inputs[0] {
        Atom::Lit(lit) => {
            let lit_id = ctx.next_id(&format!("{parent_id}_lit"));
            parent_nodes.push(literal_node(&lit_id, lit, ctx.show_types));
            in_edges.push(Edge::new(lit_id, &index_id));
        }
        Atom::Var(var) => {
            in_edges.push(Edge::new(var_node_id(parent_id, var), &index_id));
        }
    }

    // Shared operand nodes; branches address them positionally.
    let operands = &eqn.inputs[1..];
    let mut operand_ids: Vec<Option<String>> = Vec::with_capacity(operands.len());
    let mut operand_vars: Vec<Var> = Vec::new();
    for atom in operands {
        match atom {
            Atom::Var(var) => {
                let arg_id = var_node_id(&scope_id, var);
                inputs
                    .nodes
                    .push(arg_node(&arg_id, var, ctx.show_types, &mut ctx.labels));
                in_edges.push(Edge::new(var_node_id(parent_id, var), &arg_id));
                operand_ids.push(Some(arg_id));
                operand_vars.push(var.clone());
            }
            Atom::Lit(lit) => {
                let lit_id = ctx.next_id(&format!("{scope_id}_lit"));
                inputs.nodes.push(literal_node(&lit_id, lit, ctx.show_types));
                operand_ids.push(Some(lit_id));
            }
        }
    }
    cluster.children.push(inputs);

    // Every branch's outputs converge on the construct's own output nodes.
    let target_ids: Vec<String> = eqn
        .outputs
        .iter()
        .map(|var| var_node_id(&scope_id, var))
        .collect();

    for (i, branch) in branches.iter().enumerate() {
        lower_region(
            &format!("branch{i}"),
            &format!("Branch {i}"),
            branch,
            &scope_id,
            &operand_ids,
            &target_ids,
            &mut cluster,
            ctx,
        );
    }

    let outs = outputs(
        &scope_id,
        parent_id,
        &operand_vars,
        &eqn.outputs,
        &eqn.outputs,
        ctx.show_types,
        &mut ctx.labels,
    );
    cluster.children.push(outs.cluster);
    cluster.edges.extend(outs.id_edges);
    parent_nodes.extend(outs.parent_nodes);

    Lowered {
        item: GraphItem::Cluster(cluster),
        in_edges,
        parent_nodes,
        out_edges: outs.out_edges,
    }
}

/// Rule 4: a bounded fold cluster, labelled with its iteration count, with
/// banded argument and output sub-clusters and the body lowered once.
fn lower_fold(
    body: &SubFn,
    num_consts: usize,
    num_carry: usize,
    length: usize,
    eqn: &Equation,
    parent_id: &str,
    ctx: &mut LowerCtx,
) -> Lowered {
    let scope_id = ctx.next_id(&format!("{parent_id}_fold"));
    let label = format!("{} ({length} iterations)", eqn.primitive);
    let mut cluster = Cluster::scope(&scope_id, label);

    let show_types = ctx.show_types;
    let (args, arg_edges) = fold_arguments(
        &scope_id,
        parent_id,
        &body.invars,
        &eqn.inputs,
        num_consts,
        num_carry,
        show_types,
        &mut ctx.labels,
        &mut ctx.n,
    );
    cluster.children.push(args);

    for sub_eqn in &body.eqns {
        let lowered = lower_eqn(sub_eqn, &scope_id, ctx);
        cluster.add(lowered.item);
        cluster.edges.extend(lowered.in_edges);
        cluster.nodes.extend(lowered.parent_nodes);
        cluster.edges.extend(lowered.out_edges);
    }

    let outs = fold_outputs(
        &scope_id,
        parent_id,
        &body.invars,
        &body.outvars,
        &eqn.outputs,
        num_carry,
        show_types,
        &mut ctx.labels,
    );
    let placed: HashSet<String> = outs.cluster.node_ids().into_iter().collect();
    cluster.nodes.retain(|node| !placed.contains(&node.id));
    cluster.children.push(outs.cluster);
    cluster.edges.extend(outs.id_edges);

    Lowered {
        item: GraphItem::Cluster(cluster),
        in_edges: arg_edges,
        parent_nodes: outs.parent_nodes,
        out_edges: outs.out_edges,
    }
}

/// Rule 5: a pre/post-test loop cluster with one argument node per
/// loop-invariant input and independent `cond`/`body` regions. The body's
/// declared outputs are wired back onto the loop's own output nodes; the
/// condition region feeds nothing outside itself.
fn lower_loop(
    cond: &SubFn,
    body: &SubFn,
    eqn: &Equation,
    parent_id: &str,
    ctx: &mut LowerCtx,
) -> Lowered {
    let scope_id = ctx.next_id(&format!("{parent_id}_loop"));
    let mut cluster = Cluster::scope(&scope_id, &eqn.primitive);

    let show_types = ctx.show_types;
    let (args, arg_edges) = arguments(
        &scope_id,
        parent_id,
        &[],
        &body.invars,
        &eqn.inputs,
        show_types,
        &mut ctx.labels,
        &mut ctx.n,
    );
    cluster.children.push(args);

    // Both sub-programs take the loop inputs positionally; unused loop
    // inputs have no argument node to wire from.
    let operand_ids: Vec<Option<String>> = body
        .invars
        .iter()
        .map(|var| (!var.is_unused()).then(|| var_node_id(&scope_id, var)))
        .collect();

    lower_region(
        "cond",
        "cond",
        cond,
        &scope_id,
        &operand_ids,
        &[],
        &mut cluster,
        ctx,
    );

    let target_ids: Vec<String> = eqn
        .outputs
        .iter()
        .map(|var| var_node_id(&scope_id, var))
        .collect();
    lower_region(
        "body",
        "body",
        body,
        &scope_id,
        &operand_ids,
        &target_ids,
        &mut cluster,
        ctx,
    );

    let outs = outputs(
        &scope_id,
        parent_id,
        &body.invars,
        &eqn.outputs,
        &eqn.outputs,
        show_types,
        &mut ctx.labels,
    );
    cluster.children.push(outs.cluster);
    cluster.edges.extend(outs.id_edges);

    Lowered {
        item: GraphItem::Cluster(cluster),
        in_edges: arg_edges,
        parent_nodes: outs.parent_nodes,
        out_edges: outs.out_edges,
    }
}

/// Lowers a branch or loop sub-program as a region of a construct cluster.
///
/// Region arguments are wired positionally from the construct's own operand
/// node ids (so every edge endpoint exists in the graph) and declared
/// outputs are wired onto `target_ids`. A zero-equation sub-program renders
/// as an identity pass-through; a shallow one collapses to a single node
/// when collapsing is enabled; anything else expands like a call.
#[allow(clippy::too_many_arguments)]
fn lower_region(
    id_stub: &str,
    label: &str,
    subfn: &SubFn,
    construct_id: &str,
    operand_ids: &[Option<String>],
    target_ids: &[String],
    cluster: &mut Cluster,
    ctx: &mut LowerCtx,
) {
    let region_id = format!("{construct_id}_{id_stub}");

    if subfn.eqns.is_empty() {
        lower_identity_region(&region_id, label, subfn, operand_ids, target_ids, cluster, ctx);
        return;
    }

    if !contains_transparent(&subfn.eqns) && ctx.collapse_primitives {
        // Collapsed region: one function-styled node wired straight into the
        // construct scope.
        cluster
            .nodes
            .push(Node::new(&region_id, label, NodeClass::Function));
        for (var, operand) in subfn.invars.iter().zip(operand_ids) {
            if var.is_unused() {
                continue;
            }
            if let Some(operand_id) = operand {
                cluster.edges.push(Edge::new(operand_id, &region_id));
            }
        }
        for target in target_ids {
            cluster.edges.push(Edge::new(&region_id, target));
        }
        return;
    }

    let mut region = Cluster::scope(&region_id, label);

    let mut args = Cluster::rank_group(format!("{region_id}_args"), Rank::Same);
    for (var, operand) in subfn.invars.iter().zip(operand_ids) {
        if var.is_unused() {
            continue;
        }
        let arg_id = var_node_id(&region_id, var);
        args.nodes
            .push(arg_node(&arg_id, var, ctx.show_types, &mut ctx.labels));
        if let Some(operand_id) = operand {
            cluster.edges.push(Edge::new(operand_id, arg_id));
        }
    }
    region.children.push(args);

    for sub_eqn in &subfn.eqns {
        let lowered = lower_eqn(sub_eqn, &region_id, ctx);
        region.add(lowered.item);
        region.edges.extend(lowered.in_edges);
        region.nodes.extend(lowered.parent_nodes);
        region.edges.extend(lowered.out_edges);
    }

    let mut outs = Cluster::rank_group(format!("{region_id}_outs"), Rank::Same);
    let in_ids: HashSet<crate::ir::VarId> = subfn.invars.iter().map(|v| v.id).collect();
    for (j, var) in subfn.outvars.iter().enumerate() {
        let base_id = var_node_id(&region_id, var);
        let out_id = if in_ids.contains(&var.id) {
            let out_id = format!("{base_id}_out");
            region.edges.push(Edge::new(&base_id, &out_id));
            out_id
        } else {
            base_id
        };
        outs.nodes
            .push(out_node(&out_id, var, ctx.show_types, &mut ctx.labels));
        if let Some(target) = target_ids.get(j) {
            cluster.edges.push(Edge::new(&out_id, target));
        }
    }
    let placed: HashSet<String> = outs.node_ids().into_iter().collect();
    region.nodes.retain(|node| !placed.contains(&node.id));
    region.children.push(outs);

    cluster.children.push(region);
}

/// A zero-equation region: declared outputs are declared inputs passed
/// through unchanged.
fn lower_identity_region(
    region_id: &str,
    label: &str,
    subfn: &SubFn,
    operand_ids: &[Option<String>],
    target_ids: &[String],
    cluster: &mut Cluster,
    ctx: &mut LowerCtx,
) {
    let operand_for = |var: &Var| -> Option<&String> {
        subfn
            .invars
            .iter()
            .position(|invar| invar.id == var.id)
            .and_then(|k| operand_ids.get(k))
            .and_then(|id| id.as_ref())
    };

    if ctx.collapse_primitives {
        cluster.nodes.push(Node::new(
            region_id,
            format!("{label}: Id"),
            NodeClass::Function,
        ));
        for (var, operand) in subfn.invars.iter().zip(operand_ids) {
            if var.is_unused() {
                continue;
            }
            if let Some(operand_id) = operand {
                cluster.edges.push(Edge::new(operand_id, region_id));
            }
        }
        for target in target_ids {
            cluster.edges.push(Edge::new(region_id, target));
        }
        return;
    }

    let mut region = Cluster::scope(region_id, format!("{label}: Id"));
    for (var, target) in subfn.outvars.iter().zip(target_ids) {
        let node_id = var_node_id(region_id, var);
        region
            .nodes
            .push(var_node(&node_id, var, ctx.show_types, &mut ctx.labels));
        if let Some(operand_id) = operand_for(var) {
            cluster.edges.push(Edge::new(operand_id, &node_id));
        }
        cluster.edges.push(Edge::new(&node_id, target));
    }
    cluster.children.push(region);
}
