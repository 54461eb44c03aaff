//! Static styling table for drawing-graph nodes and clusters.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

pub const FONT_NAME: &str = "Courier";
pub const NODE_FONT_SIZE: &str = "10";
pub const CLUSTER_FONT_SIZE: &str = "12";

/// Visual category of a drawing-graph node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeClass {
    /// Scope input argument.
    InArg,
    /// Captured constant of a closed sub-program.
    ConstArg,
    /// Embedded literal constant.
    Literal,
    /// Scope output.
    OutArg,
    /// Variable internal to a scope.
    Var,
    /// Plain primitive operation.
    Primitive,
    /// Collapsed function call.
    Function,
    /// Index operand of a switch construct.
    SwitchIndex,
}

impl NodeClass {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeClass::InArg => "in_arg",
            NodeClass::ConstArg => "const_arg",
            NodeClass::Literal => "literal",
            NodeClass::OutArg => "out_arg",
            NodeClass::Var => "var",
            NodeClass::Primitive => "primitive",
            NodeClass::Function => "function",
            NodeClass::SwitchIndex => "switch_index",
        }
    }

    pub fn attrs(self) -> &'static StyleAttrs {
        &NODE_STYLES[&self]
    }
}

/// Graphviz attributes for one node category.
#[derive(Debug, Clone, Copy)]
pub struct StyleAttrs {
    pub shape: &'static str,
    pub color: Option<&'static str>,
    pub line_style: Option<&'static str>,
}

static NODE_STYLES: Lazy<BTreeMap<NodeClass, StyleAttrs>> = Lazy::new(|| {
    BTreeMap::from([
        (
            NodeClass::InArg,
            StyleAttrs {
                shape: "box",
                color: Some("green"),
                line_style: None,
            },
        ),
        (
            NodeClass::ConstArg,
            StyleAttrs {
                shape: "box",
                color: Some("darkgreen"),
                line_style: None,
            },
        ),
        (
            NodeClass::Literal,
            StyleAttrs {
                shape: "box",
                color: Some("orange"),
                line_style: None,
            },
        ),
        (
            NodeClass::OutArg,
            StyleAttrs {
                shape: "box",
                color: Some("red"),
                line_style: None,
            },
        ),
        (
            NodeClass::Var,
            StyleAttrs {
                shape: "box",
                color: Some("blue"),
                line_style: None,
            },
        ),
        (
            NodeClass::Primitive,
            StyleAttrs {
                shape: "box",
                color: Some("grey"),
                line_style: None,
            },
        ),
        (
            NodeClass::Function,
            StyleAttrs {
                shape: "rectangle",
                color: None,
                line_style: Some("dotted"),
            },
        ),
        (
            NodeClass::SwitchIndex,
            StyleAttrs {
                shape: "box",
                color: Some("grey"),
                line_style: None,
            },
        ),
    ])
});
