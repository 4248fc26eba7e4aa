//! Error types for the scene simulator.
//!
//! Every failure is raised synchronously at the violated precondition
//! and is gated by [`Config::simulate_errors`](crate::Config); with the
//! flag off, the same operations silently no-op. Messages mirror the
//! strings the simulated host produces so tests can assert on them.

use crate::{Guid, StyleId};
use thiserror::Error;

/// All possible errors from the scene simulator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    // Structural errors
    #[error("empty child")]
    EmptyChild,

    #[error("the root node cannot have children of type other than PAGE")]
    InvalidRootChild,

    #[error("node already inside parent")]
    NodeAlreadyInsideParent,

    // Instance immutability
    #[error("can't remove item inside an instance")]
    RemoveInsideInstance,

    #[error("can't change layout inside an instance")]
    LayoutInsideInstance,

    // Tombstoned entities
    #[error("the node with id {0} does not exist")]
    RemovedNode(Guid),

    #[error("the style with id {0} does not exist")]
    RemovedStyle(StyleId),

    // Text ranges
    #[error("range out of bounds: index {index} exceeds length {len}")]
    RangeOutOfBounds { index: usize, len: usize },

    #[error("empty range selected: 'end' must be greater than 'start'")]
    EmptyRange,

    // Layout
    #[error("in {op}: expected \"{arg}\" to have value >= 0.01")]
    DimensionTooSmall { op: &'static str, arg: &'static str },

    // Fonts
    #[error("font is not loaded {family} {style}")]
    UnloadedFont { family: String, style: String },

    // Frozen properties
    #[error("cannot add property {0}, object is not extensible")]
    FrozenProperty(&'static str),

    // Grouping
    #[error("first argument must be an array of at least one node")]
    EmptyNodeList,

    // Page backgrounds
    #[error("in set_backgrounds: page backgrounds must be a single solid paint")]
    InvalidBackground,
}

/// Result type for simulator operations.
pub type Result<T> = std::result::Result<T, Error>;
