//! Top-level assembly: lowers a program's single top-level equation into a
//! [`DrawGraph`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::graph::DrawGraph;
use crate::ir::{Params, Program};
use crate::lower::{LowerCtx, lower_call, lower_eqn};

/// Rendering policy for [`draw_graph`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawOptions {
    /// Collapse nested calls whose bodies contain only plain operations into
    /// a single node.
    pub collapse_primitives: bool,
    /// Append type/shape descriptors to node labels.
    pub show_types: bool,
}

impl Default for DrawOptions {
    fn default() -> Self {
        Self {
            collapse_primitives: true,
            show_types: true,
        }
    }
}

#[derive(Debug, Error)]
pub enum DrawError {
    /// The tracer is expected to wrap the whole traced callable in one
    /// top-level equation.
    #[error("program has no top-level equation")]
    EmptyProgram,
}

/// Builds the drawing graph for a traced program.
///
/// The single top-level equation is lowered with an empty scope prefix and a
/// counter starting at zero. A top-level call is always expanded, whatever
/// the collapsing policy says: a fully collapsed root would reduce the whole
/// diagram to one box. Boundary edges returned by the root lowering have no
/// enclosing scope to land in and are discarded.
///
/// The input program is never mutated; the returned value is built fresh on
/// every call.
pub fn draw_graph(program: &Program, options: DrawOptions) -> Result<DrawGraph, DrawError> {
    let eqn = program.eqns.first().ok_or(DrawError::EmptyProgram)?;
    let mut ctx = LowerCtx::new(options.collapse_primitives, options.show_types);
    let lowered = match &eqn.params {
        Params::Call { name, body } => lower_call(name, body, eqn, "", &mut ctx),
        _ => lower_eqn(eqn, "", &mut ctx),
    };
    Ok(DrawGraph { root: lowered.item })
}
