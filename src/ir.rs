//! In-memory representation of a traced program: a closed tree of typed
//! equations, with nested sub-functions for calls, branches and loops.
//!
//! The IR is produced by an external tracer and consumed read-only by the
//! lowering engine. It is assumed well-formed: input/output lists at a call
//! site match the declared signature of its sub-function, and every variable
//! read in a scope is either produced earlier in that scope or declared as
//! one of its inputs.

/// Opaque variable identity.
///
/// Printed variable names are not unique across nested scopes, so identity
/// comparisons (label allocation, pass-through checks) always go through
/// this id, never through the name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(pub u32);

/// A typed variable binding.
#[derive(Debug, Clone)]
pub struct Var {
    pub id: VarId,
    /// Printed form from the tracer, used for display conventions only.
    pub name: String,
    /// Abstract type/shape descriptor, e.g. `f32[8]`.
    pub ty: Option<String>,
}

impl Var {
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id: VarId(id),
            name: name.into(),
            ty: None,
        }
    }

    pub fn with_ty(id: u32, name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            id: VarId(id),
            name: name.into(),
            ty: Some(ty.into()),
        }
    }

    /// Upstream tracers mark a declared parameter that is never read with a
    /// trailing underscore on its printed name. Such parameters are skipped
    /// when argument nodes and edges are emitted; the marker carries no
    /// further meaning.
    pub fn is_unused(&self) -> bool {
        self.name.ends_with('_')
    }
}

/// An embedded constant input. Literals have no defining equation and no
/// shared identity: every use renders as its own node.
#[derive(Debug, Clone)]
pub struct Literal {
    pub value: String,
    pub ty: Option<String>,
}

impl Literal {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            ty: None,
        }
    }

    pub fn with_ty(value: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            ty: Some(ty.into()),
        }
    }
}

/// An input binding of an equation: a variable reference or a literal.
#[derive(Debug, Clone)]
pub enum Atom {
    Var(Var),
    Lit(Literal),
}

impl Atom {
    pub fn as_var(&self) -> Option<&Var> {
        match self {
            Atom::Var(var) => Some(var),
            Atom::Lit(_) => None,
        }
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Atom::Lit(_))
    }
}

/// A nested sub-program: the body of a call, a branch of a switch, or the
/// condition/body of a loop construct.
#[derive(Debug, Clone, Default)]
pub struct SubFn {
    pub invars: Vec<Var>,
    /// Captured constants of a closed sub-program. Rendered as const-styled
    /// argument nodes with no inbound edge.
    pub constvars: Vec<Var>,
    pub outvars: Vec<Var>,
    pub eqns: Vec<Equation>,
}

/// Structural parameters of an equation.
///
/// Dispatch in the lowering engine is a closed match over this variant, not
/// over the primitive name string: an equation whose params carry no
/// sub-function is always treated as a plain operation, whatever its
/// `primitive` field says.
#[derive(Debug, Clone)]
pub enum Params {
    /// Plain primitive operation.
    None,
    /// A call wrapping a nested sub-program.
    Call { name: String, body: SubFn },
    /// N-way conditional dispatch on an index operand (the first input).
    Switch { branches: Vec<SubFn> },
    /// Fixed-iteration-count fold carrying state and accumulating
    /// per-iteration outputs. Inputs are ordered consts, carry, iterate;
    /// outputs are ordered carry, accumulate.
    Fold {
        body: SubFn,
        num_consts: usize,
        num_carry: usize,
        length: usize,
    },
    /// Unbounded loop governed by a condition and a body sub-program, both
    /// taking the loop inputs positionally.
    Loop { cond: SubFn, body: SubFn },
}

/// Dispatch category of an equation, derived from its params.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EqnKind {
    PlainOp,
    Call,
    Switch,
    Fold,
    Loop,
}

/// One step of the program: an operation with its input and output bindings.
#[derive(Debug, Clone)]
pub struct Equation {
    pub primitive: String,
    pub inputs: Vec<Atom>,
    pub outputs: Vec<Var>,
    pub params: Params,
}

impl Equation {
    pub fn plain(
        primitive: impl Into<String>,
        inputs: Vec<Atom>,
        outputs: Vec<Var>,
    ) -> Self {
        Self {
            primitive: primitive.into(),
            inputs,
            outputs,
            params: Params::None,
        }
    }

    pub fn kind(&self) -> EqnKind {
        match self.params {
            Params::None => EqnKind::PlainOp,
            Params::Call { .. } => EqnKind::Call,
            Params::Switch { .. } => EqnKind::Switch,
            Params::Fold { .. } => EqnKind::Fold,
            Params::Loop { .. } => EqnKind::Loop,
        }
    }

    /// True if this equation wraps nested sub-functions and therefore renders
    /// as a nested structure rather than a single node.
    pub fn is_transparent(&self) -> bool {
        self.kind() != EqnKind::PlainOp
    }
}

/// True if any equation in the list wraps a nested sub-function. A body for
/// which this is false is "shallow" and eligible for collapsing.
pub fn contains_transparent(eqns: &[Equation]) -> bool {
    eqns.iter().any(Equation::is_transparent)
}

/// A closed top-level program, as handed over by the tracer. Expected to
/// consist of exactly one top-level equation wrapping the traced callable.
#[derive(Debug, Clone, Default)]
pub struct Program {
    pub eqns: Vec<Equation>,
}

impl Program {
    pub fn new(eqns: Vec<Equation>) -> Self {
        Self { eqns }
    }
}
