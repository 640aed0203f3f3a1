//! Combiner contract, list-node registry, and shared merge helpers.

use cascade_tree::{Node, ViewOrigin};
use indexmap::IndexSet;
use thiserror::Error;

/// Maximum recursion depth for a combine operation.
pub const MAX_COMBINE_DEPTH: usize = 256;

/// Errors that can occur while combining two node trees.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CombineError {
    /// Combination descended deeper than [`MAX_COMBINE_DEPTH`] levels.
    ///
    /// Well-formed (finite, acyclic) inputs never reach this; it exists so
    /// a caller who hands in a tree with a cycle gets an error instead of
    /// a stack overflow.
    #[error("node nesting too deep (max depth: {max_depth}) at path: {}", path.join("/"))]
    NestingTooDeep {
        /// Maximum allowed depth
        max_depth: usize,
        /// Node names from the roots down to where the limit was exceeded
        path: Vec<String>,
    },
}

/// An algorithm object that merges two node trees into one.
///
/// Implementations hold a registry of *list nodes*: names whose
/// occurrences are never matched across the two inputs and instead all
/// survive as separate siblings in the output. Repeated same-named
/// elements under such a name mean "append to a list", not "override a
/// singleton".
///
/// `combine` is pure with respect to its inputs: it reads both trees
/// freely and builds a fresh view tree, but never mutates either input.
/// The same source tree can therefore feed any number of combine
/// operations afterwards, including with a different combiner.
pub trait NodeCombiner<R: Clone> {
    /// Read-only view of the registered list-node names, in registration
    /// order.
    fn list_nodes(&self) -> &IndexSet<String>;

    /// Register a node name as list-like. Idempotent: registering a name
    /// twice has the same effect as registering it once.
    fn add_list_node(&mut self, name: &str);

    /// Whether `node` is treated as a list node. The default checks name
    /// membership in the registry; implementations may substitute a
    /// different predicate (for example an attribute-based marking)
    /// without touching callers.
    fn is_list_node(&self, node: &Node<R>) -> bool {
        self.list_nodes().contains(node.name().as_str())
    }

    /// Factory for the synthetic nodes a combine operation emits. The
    /// default returns a fresh detached node; implementations may
    /// substitute a richer variant.
    fn create_view_node(&self, name: &str) -> Node<R> {
        Node::new(name)
    }

    /// Combine two root nodes into a new view tree. The two roots are
    /// assumed name-compatible by convention; mismatched root names are
    /// not validated here.
    fn combine(&self, left: &Node<R>, right: &Node<R>) -> Result<Node<R>, CombineError>;
}

/// Fail fast once the pairwise descent exceeds [`MAX_COMBINE_DEPTH`].
pub(crate) fn ensure_depth(depth: usize, path: &[String]) -> Result<(), CombineError> {
    if depth > MAX_COMBINE_DEPTH {
        Err(CombineError::NestingTooDeep {
            max_depth: MAX_COMBINE_DEPTH,
            path: path.to_vec(),
        })
    } else {
        Ok(())
    }
}

/// A view node standing in for the matched pair `left`/`right`, named
/// after the left node. Value lookups on it delegate left first.
pub(crate) fn pair_view<R, C>(combiner: &C, left: &Node<R>, right: &Node<R>) -> Node<R>
where
    R: Clone,
    C: NodeCombiner<R> + ?Sized,
{
    let result = combiner.create_view_node(&left.name());
    result.set_origin(ViewOrigin::Pair(left.clone(), right.clone()));
    result
}

/// Merge attributes with left precedence per name: every left attribute
/// is projected, right attributes only for names the left side lacks.
/// Duplicate same-side names are preserved as-is.
pub(crate) fn append_attributes_left_wins<R>(result: &Node<R>, left: &Node<R>, right: &Node<R>) {
    for attribute in left.attributes() {
        result.append_attribute(&Node::view_of(&attribute));
    }
    for attribute in right.attributes() {
        if left.attribute_count_named(&attribute.name()) == 0 {
            result.append_attribute(&Node::view_of(&attribute));
        }
    }
}
