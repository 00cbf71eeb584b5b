//! Parent/child links between node indices.
//!
/// Every node has an ordered collection of child nodes. A node that has not
/// been attached to a parent is implicitly a root of its own tree; whether it
/// is listed as a root of a [`Forest`](crate::Forest) is decided by the forest.
mod linked;

pub use linked::{AttachError, Children, LinkedHierarchy};
