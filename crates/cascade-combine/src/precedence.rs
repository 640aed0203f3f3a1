//! Precedence-based combiners: the left tree wins on conflicts.
//!
//! [`OverrideCombiner`] merges two trees so the left side's data replaces
//! the right side's wherever the two collide, while still recursing into
//! matched children to combine nested structure. [`MergeCombiner`] is the
//! additive variant: it matches more aggressively (first unconsumed child
//! of the same name), so same-named substructure from both sides is folded
//! together instead of carried twice.

use cascade_tree::Node;
use indexmap::IndexSet;
use tracing::{debug, trace};

use crate::combiner::{
    append_attributes_left_wins, ensure_depth, pair_view, CombineError, NodeCombiner,
};

/// Combines two trees with the left side taking precedence.
///
/// A left child is matched against a right child when the name is not a
/// list node and occurs exactly once on each side; values play no role in
/// matching. Matched pairs are combined recursively, and the resulting
/// view answers value lookups with the left value first. Children whose
/// name is ambiguous on either side are carried through unmatched, as are
/// all list-node occurrences. Attributes merge with left precedence per
/// name.
#[derive(Debug, Clone, Default)]
pub struct OverrideCombiner {
    list_nodes: IndexSet<String>,
}

impl OverrideCombiner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a node name as list-like. Idempotent.
    pub fn add_list_node(&mut self, name: &str) {
        self.list_nodes.insert(name.to_string());
    }

    /// The registered list-node names, in registration order.
    pub fn list_nodes(&self) -> &IndexSet<String> {
        &self.list_nodes
    }

    fn combine_at<R: Clone>(
        &self,
        left: &Node<R>,
        right: &Node<R>,
        depth: usize,
        path: &mut Vec<String>,
    ) -> Result<Node<R>, CombineError> {
        ensure_depth(depth, path)?;
        trace!(node = %left.name(), depth, "override combine step");
        let result = pair_view(self, left, right);
        append_attributes_left_wins(&result, left, right);

        let right_children = right.children();
        let mut consumed = vec![false; right_children.len()];
        for child in left.children() {
            match self.find_partner(left, right, &child, &right_children, &consumed) {
                Some(index) => {
                    consumed[index] = true;
                    path.push(child.name());
                    let combined =
                        self.combine_at(&child, &right_children[index], depth + 1, path)?;
                    path.pop();
                    result.append_child(&combined);
                }
                None => result.append_child(&Node::view_of(&child)),
            }
        }

        // second pass: children unique to the right tree, and every
        // list-node occurrence it carries
        for (index, child) in right_children.iter().enumerate() {
            if !consumed[index] {
                result.append_child(&Node::view_of(child));
            }
        }

        Ok(result)
    }

    fn find_partner<R: Clone>(
        &self,
        left: &Node<R>,
        right: &Node<R>,
        child: &Node<R>,
        right_children: &[Node<R>],
        consumed: &[bool],
    ) -> Option<usize> {
        if self.is_list_node(child) {
            return None;
        }
        let name = child.name();
        if left.child_count_named(&name) != 1 || right.child_count_named(&name) != 1 {
            return None;
        }
        right_children
            .iter()
            .enumerate()
            .find(|(index, candidate)| !consumed[*index] && candidate.name_is(&name))
            .map(|(index, _)| index)
    }
}

impl<R: Clone> NodeCombiner<R> for OverrideCombiner {
    fn list_nodes(&self) -> &IndexSet<String> {
        &self.list_nodes
    }

    fn add_list_node(&mut self, name: &str) {
        self.list_nodes.insert(name.to_string());
    }

    fn combine(&self, left: &Node<R>, right: &Node<R>) -> Result<Node<R>, CombineError> {
        debug!(root = %left.name(), "combining trees (override)");
        self.combine_at(left, right, 0, &mut Vec::new())
    }
}

/// Combines two trees additively with the left side taking precedence.
///
/// Unlike [`OverrideCombiner`], a left child is matched against the
/// *first unconsumed* right child of the same name, even when the name is
/// ambiguous on either side — provided the two children's attributes
/// agree (every attribute name present on both must carry an equal value
/// on at least one counterpart). Right children whose attributes conflict
/// stay separate siblings. List nodes never match. Attributes merge with
/// left precedence per name, and value lookups on merged pairs answer
/// with the left value first.
#[derive(Debug, Clone, Default)]
pub struct MergeCombiner {
    list_nodes: IndexSet<String>,
}

impl MergeCombiner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a node name as list-like. Idempotent.
    pub fn add_list_node(&mut self, name: &str) {
        self.list_nodes.insert(name.to_string());
    }

    /// The registered list-node names, in registration order.
    pub fn list_nodes(&self) -> &IndexSet<String> {
        &self.list_nodes
    }

    fn combine_at<R: Clone>(
        &self,
        left: &Node<R>,
        right: &Node<R>,
        depth: usize,
        path: &mut Vec<String>,
    ) -> Result<Node<R>, CombineError> {
        ensure_depth(depth, path)?;
        trace!(node = %left.name(), depth, "merge combine step");
        let result = pair_view(self, left, right);
        append_attributes_left_wins(&result, left, right);

        let right_children = right.children();
        let mut consumed = vec![false; right_children.len()];
        for child in left.children() {
            match self.find_partner(&child, &right_children, &consumed) {
                Some(index) => {
                    consumed[index] = true;
                    path.push(child.name());
                    let combined =
                        self.combine_at(&child, &right_children[index], depth + 1, path)?;
                    path.pop();
                    result.append_child(&combined);
                }
                None => result.append_child(&Node::view_of(&child)),
            }
        }

        for (index, child) in right_children.iter().enumerate() {
            if !consumed[index] {
                result.append_child(&Node::view_of(child));
            }
        }

        Ok(result)
    }

    fn find_partner<R: Clone>(
        &self,
        child: &Node<R>,
        right_children: &[Node<R>],
        consumed: &[bool],
    ) -> Option<usize> {
        if self.is_list_node(child) {
            return None;
        }
        let name = child.name();
        right_children
            .iter()
            .enumerate()
            .find(|(index, candidate)| {
                !consumed[*index] && candidate.name_is(&name) && attributes_agree(child, *candidate)
            })
            .map(|(index, _)| index)
    }
}

impl<R: Clone> NodeCombiner<R> for MergeCombiner {
    fn list_nodes(&self) -> &IndexSet<String> {
        &self.list_nodes
    }

    fn add_list_node(&mut self, name: &str) {
        self.list_nodes.insert(name.to_string());
    }

    fn combine(&self, left: &Node<R>, right: &Node<R>) -> Result<Node<R>, CombineError> {
        debug!(root = %left.name(), "combining trees (merge)");
        self.combine_at(left, right, 0, &mut Vec::new())
    }
}

/// Whether every attribute name the two nodes share agrees on its value.
fn attributes_agree<R>(left: &Node<R>, right: &Node<R>) -> bool {
    for attribute in left.attributes() {
        let counterparts = right.attributes_named(&attribute.name());
        if !counterparts.is_empty()
            && !counterparts
                .iter()
                .any(|candidate| candidate.value() == attribute.value())
        {
            return false;
        }
    }
    true
}
