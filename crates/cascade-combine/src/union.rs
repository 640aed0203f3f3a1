//! Union combination of node trees.

use cascade_tree::Node;
use indexmap::IndexSet;
use tracing::{debug, trace};

use crate::combiner::{ensure_depth, pair_view, CombineError, NodeCombiner};

/// Combines two trees by keeping the data of both sides.
///
/// Same-named scalar children are never collapsed: when the two inputs
/// disagree, both versions survive as siblings in the output. Only
/// *structural* children — no value, name occurring exactly once on each
/// side, not registered as a list node — are matched and merged
/// recursively. Attributes from both sides are kept, except that a right
/// attribute whose name and value exactly duplicate a left one is emitted
/// only once.
#[derive(Debug, Clone, Default)]
pub struct UnionCombiner {
    list_nodes: IndexSet<String>,
}

impl UnionCombiner {
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
        trace!(node = %left.name(), depth, "union combine step");
        let result = pair_view(self, left, right);

        // attributes from both sides, dropping exact duplicates
        for attribute in left.attributes() {
            result.append_attribute(&Node::view_of(&attribute));
        }
        for attribute in right.attributes() {
            let duplicate = left
                .attributes_named(&attribute.name())
                .iter()
                .any(|candidate| candidate.value() == attribute.value());
            if !duplicate {
                result.append_attribute(&Node::view_of(&attribute));
            }
        }

        // left children first, merging structural matches as they appear
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

        // then everything only the right tree has, list-node occurrences
        // included
        for (index, child) in right_children.iter().enumerate() {
            if !consumed[index] {
                result.append_child(&Node::view_of(child));
            }
        }

        Ok(result)
    }

    /// A left child merges with a right child only when both are
    /// structural (no value), the name is not registered as a list node,
    /// and the name occurs exactly once on each side. Everything else is
    /// carried through unmatched.
    fn find_partner<R: Clone>(
        &self,
        left: &Node<R>,
        right: &Node<R>,
        child: &Node<R>,
        right_children: &[Node<R>],
        consumed: &[bool],
    ) -> Option<usize> {
        if self.is_list_node(child) || child.value().is_some() {
            return None;
        }
        let name = child.name();
        if left.child_count_named(&name) != 1 || right.child_count_named(&name) != 1 {
            return None;
        }
        right_children
            .iter()
            .enumerate()
            .find(|(index, candidate)| {
                !consumed[*index] && candidate.name_is(&name) && candidate.value().is_none()
            })
            .map(|(index, _)| index)
    }
}

impl<R: Clone> NodeCombiner<R> for UnionCombiner {
    fn list_nodes(&self) -> &IndexSet<String> {
        &self.list_nodes
    }

    fn add_list_node(&mut self, name: &str) {
        self.list_nodes.insert(name.to_string());
    }

    fn combine(&self, left: &Node<R>, right: &Node<R>) -> Result<Node<R>, CombineError> {
        debug!(root = %left.name(), "combining trees (union)");
        self.combine_at(left, right, 0, &mut Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cascade_tree::{NodeValue, ViewOrigin};
    use std::fmt::Write;

    fn leaf(name: &str, value: i64) -> Node<()> {
        Node::with_value(name, value)
    }

    /// Flattens a tree into a textual shape for before/after comparison.
    fn shape(node: &Node<()>) -> String {
        let mut out = String::new();
        describe(node, 0, &mut out);
        out
    }

    fn describe(node: &Node<()>, depth: usize, out: &mut String) {
        writeln!(
            out,
            "{}{} {:?} {:?}",
            "  ".repeat(depth),
            node.name(),
            node.kind(),
            node.value()
        )
        .unwrap();
        for attribute in node.attributes() {
            describe(&attribute, depth + 1, out);
        }
        for child in node.children() {
            describe(&child, depth + 1, out);
        }
    }

    #[test]
    fn test_structural_children_merge_recursively() {
        let left: Node = Node::new("config");
        let left_db: Node = Node::new("database");
        left_db.append_child(&Node::with_value("host", "localhost"));
        left.append_child(&left_db);

        let right: Node = Node::new("config");
        let right_db: Node = Node::new("database");
        right_db.append_child(&Node::with_value("port", 5432i64));
        right.append_child(&right_db);

        let combined = UnionCombiner::new().combine(&left, &right).unwrap();

        assert_eq!(combined.child_count_named("database"), 1);
        let database = combined.child(0).unwrap();
        assert_eq!(database.child_count_named("host"), 1);
        assert_eq!(database.child_count_named("port"), 1);
    }

    #[test]
    fn test_conflicting_scalar_children_both_survive() {
        let left: Node = Node::new("config");
        left.append_child(&leaf("timeout", 30));
        let right: Node = Node::new("config");
        right.append_child(&leaf("timeout", 60));

        let combined = UnionCombiner::new().combine(&left, &right).unwrap();

        let timeouts = combined.children_named("timeout");
        assert_eq!(timeouts.len(), 2);
        assert_eq!(timeouts[0].value(), Some(NodeValue::Int(30)));
        assert_eq!(timeouts[1].value(), Some(NodeValue::Int(60)));
    }

    #[test]
    fn test_list_nodes_preserve_every_occurrence_in_order() {
        let left: Node = Node::new("root");
        left.append_child(&leaf("item", 1));
        left.append_child(&leaf("item", 2));
        let right: Node = Node::new("root");
        right.append_child(&leaf("item", 3));
        right.append_child(&leaf("item", 4));
        right.append_child(&leaf("item", 5));

        let mut combiner = UnionCombiner::new();
        combiner.add_list_node("item");
        let combined = combiner.combine(&left, &right).unwrap();

        let items = combined.children_named("item");
        assert_eq!(items.len(), 5);
        let values: Vec<_> = items.iter().map(|item| item.value().unwrap()).collect();
        assert_eq!(
            values,
            vec![
                NodeValue::Int(1),
                NodeValue::Int(2),
                NodeValue::Int(3),
                NodeValue::Int(4),
                NodeValue::Int(5),
            ]
        );

        // each output item is a distinct view pointing at its source
        let left_items = left.children_named("item");
        match items[0].origin() {
            ViewOrigin::Single(source) => assert!(Node::ptr_eq(&source, &left_items[0])),
            _ => panic!("expected a single-source origin"),
        }
    }

    #[test]
    fn test_attribute_union_keeps_differing_values_only() {
        let left: Node = Node::new("config");
        left.append_attribute(&Node::with_value("env", "prod"));
        left.append_attribute(&Node::with_value("region", "eu"));
        let right: Node = Node::new("config");
        right.append_attribute(&Node::with_value("env", "prod"));
        right.append_attribute(&Node::with_value("region", "us"));

        let combined = UnionCombiner::new().combine(&left, &right).unwrap();

        // equal values collapse to one, differing values keep both
        assert_eq!(combined.attribute_count_named("env"), 1);
        assert_eq!(combined.attribute_count_named("region"), 2);
        let regions = combined.attributes_named("region");
        assert_eq!(regions[0].value(), Some(NodeValue::Str("eu".into())));
        assert_eq!(regions[1].value(), Some(NodeValue::Str("us".into())));
    }

    #[test]
    fn test_combined_root_carries_pair_origin() {
        let left: Node = Node::new("config");
        let right: Node = Node::new("config");

        let combined = UnionCombiner::new().combine(&left, &right).unwrap();

        match combined.origin() {
            ViewOrigin::Pair(first, second) => {
                assert!(Node::ptr_eq(&first, &left));
                assert!(Node::ptr_eq(&second, &right));
            }
            _ => panic!("expected a pair origin"),
        }
    }

    #[test]
    fn test_inputs_are_left_untouched() {
        let left: Node = Node::new("config");
        let section: Node = Node::new("section");
        section.append_child(&leaf("a", 1));
        section.append_attribute(&Node::with_value("id", "s"));
        left.append_child(&section);
        left.append_child(&leaf("item", 1));

        let right: Node = Node::new("config");
        let other: Node = Node::new("section");
        other.append_child(&leaf("b", 2));
        right.append_child(&other);
        right.append_child(&leaf("item", 2));

        let left_before = shape(&left);
        let right_before = shape(&right);

        let mut combiner = UnionCombiner::new();
        combiner.add_list_node("item");
        combiner.combine(&left, &right).unwrap();

        assert_eq!(shape(&left), left_before);
        assert_eq!(shape(&right), right_before);
        // source nodes still hang off their original parents
        assert!(Node::ptr_eq(&section.parent().unwrap(), &left));
        assert!(Node::ptr_eq(&other.parent().unwrap(), &right));
    }

    #[test]
    fn test_duplicate_names_on_one_side_are_not_merged() {
        let left: Node = Node::new("config");
        left.append_child(&Node::new("section"));
        left.append_child(&Node::new("section"));
        let right: Node = Node::new("config");
        right.append_child(&Node::new("section"));

        let combined = UnionCombiner::new().combine(&left, &right).unwrap();

        // ambiguous on the left side: everything carried through
        assert_eq!(combined.child_count_named("section"), 3);
    }
}
