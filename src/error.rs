//! Error types returned by forest construction and traversal.
use std::fmt::Debug;
use thiserror::Error;

use crate::NodeIndex;

/// Errors raised when a traversal precondition does not hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TreeError {
    /// The node is a root or was dropped during construction.
    #[error("node {0:?} has no parent")]
    NoParent(NodeIndex),
}

/// Anomalies rejected by a strict [`ConvertOptions`](crate::ConvertOptions).
///
/// None of these are produced with the default options, which drop or ignore
/// the offending records instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConvertError<Id: Debug> {
    #[error("record {id:?} references parent {parent:?} which is not part of the input")]
    DanglingParent { id: Id, parent: Id },
    #[error("record id {0:?} occurs more than once")]
    DuplicateId(Id),
    #[error("record {0:?} is part of a parent cycle")]
    Cycle(Id),
}
