//! # cascade-combine
//!
//! Combining hierarchical configuration node trees.
//!
//! Two independently built [`cascade_tree::Node`] trees — say, one parsed
//! from a defaults file and one from user overrides — are merged into a
//! single view tree by a [`NodeCombiner`]. The output consists of
//! synthetic view nodes linking back into the sources; the inputs are
//! never mutated and stay usable for further combinations, including with
//! a different combiner.
//!
//! Three policies are provided:
//!
//! - [`UnionCombiner`] keeps the data of both sides.
//! - [`OverrideCombiner`] lets the left tree win wherever the sides
//!   collide.
//! - [`MergeCombiner`] folds same-named substructure together additively.
//!
//! Names registered through `add_list_node` are exempt from matching:
//! every occurrence from both sides survives as a separate sibling, which
//! is how repeated configuration elements keep their list semantics.
//!
//! ## Example
//!
//! ```rust
//! use cascade_combine::{NodeCombiner, OverrideCombiner};
//! use cascade_tree::Node;
//!
//! let defaults: Node = Node::new("config");
//! defaults.append_child(&Node::with_value("host", "localhost"));
//! defaults.append_child(&Node::with_value("timeout", 30i64));
//!
//! let overrides: Node = Node::new("config");
//! overrides.append_child(&Node::with_value("host", "db.example.com"));
//!
//! let combiner = OverrideCombiner::new();
//! let combined = combiner.combine(&overrides, &defaults).unwrap();
//!
//! // the override wins, the gap is filled from the defaults
//! assert_eq!(
//!     combined.children_named("host")[0].value().unwrap().as_str(),
//!     Some("db.example.com")
//! );
//! assert_eq!(combined.child_count_named("timeout"), 1);
//! ```

mod combiner;
mod precedence;
mod union;

pub use combiner::{CombineError, NodeCombiner, MAX_COMBINE_DEPTH};
pub use precedence::{MergeCombiner, OverrideCombiner};
pub use union::UnionCombiner;
