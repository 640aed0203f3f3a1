//! Debug rendering of node trees.
//!
//! Renders a node tree into a [`termtree::Tree`] for terminal display.
//! Attributes are shown as `@name` leaves ahead of the child elements.

use termtree::Tree;

use crate::node::Node;

/// Render `node` and its subtree for terminal display. The returned tree
/// implements `Display` and draws with box-drawing characters.
pub fn render_tree<R>(node: &Node<R>) -> Tree<String> {
    let mut leaves: Vec<Tree<String>> = Vec::new();
    for attribute in node.attributes() {
        leaves.push(Tree::new(format!("@{}", label(&attribute))));
    }
    for child in node.children() {
        leaves.push(render_tree(&child));
    }
    Tree::new(label(node)).with_leaves(leaves)
}

fn label<R>(node: &Node<R>) -> String {
    match node.value() {
        Some(value) => format!("{}: {}", node.name(), value),
        None => node.name(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rendering_mentions_every_node_once() {
        let root: Node = Node::new("root");
        root.append_attribute(&Node::with_value("id", "r1"));
        let child: Node = Node::with_value("port", 8080i64);
        root.append_child(&child);
        root.append_child(&Node::new("empty"));

        let rendered = render_tree(&root).to_string();
        assert_eq!(rendered.matches("root").count(), 1);
        assert_eq!(rendered.matches("@id: r1").count(), 1);
        assert_eq!(rendered.matches("port: 8080").count(), 1);
        assert_eq!(rendered.matches("empty").count(), 1);
    }
}
