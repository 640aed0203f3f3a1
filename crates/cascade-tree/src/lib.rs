//! # cascade-tree
//!
//! Hierarchical configuration node trees.
//!
//! This crate provides the node data model shared by layered-configuration
//! sources: a mutable tree of named nodes with ordered children, ordered
//! attributes, dynamically typed scalar values, and an opaque per-node
//! reference payload for embedders. Trees are walked through a two-phase
//! visitor with early termination.
//!
//! ## Design
//!
//! - [`Node`] is a cheap-to-clone handle; clones share identity, while
//!   [`Node::deep_clone`] copies a subtree.
//! - Attributes and elements share one node shape, distinguished by
//!   [`NodeKind`]; attachment keeps the kind consistent with the sequence
//!   that owns the node.
//! - Combiner output trees are *view nodes*: synthetic nodes that link
//!   back to their source node(s) through a [`ViewOrigin`] and delegate
//!   value lookups to them.
//! - Everything is synchronous and single-threaded; handles are `Rc`-based
//!   and deliberately not `Send`.
//!
//! ## Example
//!
//! ```rust
//! use cascade_tree::{Node, NodeValue};
//!
//! let root: Node = Node::new("connection");
//! root.append_child(&Node::with_value("host", "localhost"));
//! root.append_child(&Node::with_value("port", 5432i64));
//!
//! assert_eq!(root.child_count(), 2);
//! assert_eq!(
//!     root.children_named("host")[0].value(),
//!     Some(NodeValue::Str("localhost".into()))
//! );
//! ```

mod error;
mod node;
mod render;
mod value;
mod visitor;

pub use error::{Result, TreeError};
pub use node::{Node, NodeKind, ViewOrigin};
pub use render::render_tree;
pub use value::NodeValue;
pub use visitor::NodeVisitor;
