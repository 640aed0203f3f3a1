//! Visitor-based traversal of node trees.
//!
//! [`Node::visit`] walks a tree depth-first and hands each node to a
//! [`NodeVisitor`] twice: once on entry, once after the node's subtree has
//! been walked. A visitor can cut the walk short through
//! [`NodeVisitor::terminate`], which the driver consults between every
//! pair of callbacks.

use crate::node::Node;

/// Two-phase depth-first visitor over a node tree.
///
/// All methods have defaults, so a visitor only implements the phases it
/// cares about. Visitors may mutate the tree they are walking; the
/// traversal driver snapshots each sibling sequence before recursing into
/// it.
pub trait NodeVisitor<R> {
    /// Called when `node` is reached, before any of its attributes or
    /// children.
    fn enter(&mut self, node: &Node<R>) {
        let _ = node;
    }

    /// Called after the whole subtree below `node` has been walked.
    fn leave(&mut self, node: &Node<R>) {
        let _ = node;
    }

    /// Signals that the walk should stop descending as soon as possible.
    /// Checked by the driver before each further sibling; nodes already
    /// entered still receive their [`NodeVisitor::leave`] call.
    fn terminate(&self) -> bool {
        false
    }
}

/// Stops at the first node in a subtree that carries a payload.
#[derive(Debug, Default)]
pub(crate) struct DefinedVisitor {
    found: bool,
}

impl DefinedVisitor {
    pub(crate) fn found(&self) -> bool {
        self.found
    }
}

impl<R> NodeVisitor<R> for DefinedVisitor {
    fn enter(&mut self, node: &Node<R>) {
        if node.value().is_some() || node.has_reference() {
            self.found = true;
        }
    }

    fn terminate(&self) -> bool {
        self.found
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records enter/leave events as `(phase, name)` pairs.
    #[derive(Default)]
    struct Recorder {
        events: Vec<(&'static str, String)>,
        stop_at: Option<String>,
    }

    impl Recorder {
        fn stopping_at(name: &str) -> Self {
            Recorder {
                events: Vec::new(),
                stop_at: Some(name.to_string()),
            }
        }

        fn entered(&self) -> Vec<String> {
            self.events
                .iter()
                .filter(|(phase, _)| *phase == "enter")
                .map(|(_, name)| name.clone())
                .collect()
        }

        fn left(&self) -> Vec<String> {
            self.events
                .iter()
                .filter(|(phase, _)| *phase == "leave")
                .map(|(_, name)| name.clone())
                .collect()
        }
    }

    impl NodeVisitor<()> for Recorder {
        fn enter(&mut self, node: &Node<()>) {
            self.events.push(("enter", node.name()));
        }

        fn leave(&mut self, node: &Node<()>) {
            self.events.push(("leave", node.name()));
        }

        fn terminate(&self) -> bool {
            match &self.stop_at {
                Some(stop) => self
                    .events
                    .iter()
                    .any(|(phase, name)| *phase == "enter" && name == stop),
                None => false,
            }
        }
    }

    fn sample_tree() -> Node<()> {
        // root (@x) { a, b { c } }
        let root: Node = Node::new("root");
        root.append_attribute(&Node::with_value("x", 1i64));
        root.append_child(&Node::new("a"));
        let b: Node = Node::new("b");
        b.append_child(&Node::new("c"));
        root.append_child(&b);
        root
    }

    #[test]
    fn test_every_node_is_visited_once_per_phase() {
        let root = sample_tree();
        let mut recorder = Recorder::default();
        root.visit(&mut recorder);

        assert_eq!(recorder.entered(), vec!["root", "x", "a", "b", "c"]);
        assert_eq!(recorder.left(), vec!["x", "a", "c", "b", "root"]);
    }

    #[test]
    fn test_enter_precedes_children_and_leave_follows_them() {
        let root = sample_tree();
        let mut recorder = Recorder::default();
        root.visit(&mut recorder);

        let position = |phase: &str, name: &str| {
            recorder
                .events
                .iter()
                .position(|(p, n)| *p == phase && n == name)
                .unwrap()
        };

        assert!(position("enter", "b") < position("enter", "c"));
        assert!(position("leave", "c") < position("leave", "b"));
        assert!(position("enter", "root") < position("enter", "x"));
        assert!(position("leave", "b") < position("leave", "root"));
    }

    #[test]
    fn test_termination_skips_everything_not_yet_reached() {
        // root { a, stop { hidden }, c }
        let root: Node = Node::new("root");
        root.append_child(&Node::new("a"));
        let stop: Node = Node::new("stop");
        stop.append_child(&Node::new("hidden"));
        root.append_child(&stop);
        root.append_child(&Node::new("c"));

        let mut recorder = Recorder::stopping_at("stop");
        root.visit(&mut recorder);

        assert_eq!(recorder.entered(), vec!["root", "a", "stop"]);
        // ancestors already entered still unwind through leave
        assert_eq!(recorder.left(), vec!["a", "stop", "root"]);
    }

    #[test]
    fn test_visitors_may_mutate_the_tree_being_walked() {
        struct Pruner {
            root: Node<()>,
            seen: Vec<String>,
        }

        impl NodeVisitor<()> for Pruner {
            fn enter(&mut self, node: &Node<()>) {
                self.seen.push(node.name());
                if node.name_is("a") {
                    self.root.remove_children_named("b");
                }
            }
        }

        let root: Node = Node::new("root");
        root.append_child(&Node::new("a"));
        root.append_child(&Node::new("b"));

        let mut pruner = Pruner {
            root: root.clone(),
            seen: Vec::new(),
        };
        root.visit(&mut pruner);

        // the snapshot taken before recursing still contains "b"
        assert_eq!(pruner.seen, vec!["root", "a", "b"]);
        // but the tree itself no longer does
        assert_eq!(root.child_count(), 1);
    }

    #[test]
    fn test_subtree_defined_ignores_bare_structure() {
        let root: Node = Node::new("root");
        let middle: Node = Node::new("middle");
        let leaf: Node = Node::new("leaf");
        middle.append_child(&leaf);
        root.append_child(&middle);

        assert!(!root.subtree_defined());

        leaf.set_value("payload");
        assert!(root.subtree_defined());
    }

    #[test]
    fn test_subtree_defined_sees_attribute_payloads() {
        let root: Node = Node::new("root");
        let child: Node = Node::new("child");
        child.append_attribute(&Node::with_value("id", "c1"));
        root.append_child(&child);

        assert!(root.subtree_defined());
    }
}
