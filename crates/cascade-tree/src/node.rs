//! The hierarchical configuration node data model.
//!
//! A [`Node`] is a cheap-to-clone handle to a mutable tree node. Cloning a
//! handle shares identity with the original; [`Node::deep_clone`] copies
//! the subtree instead. Nodes carry a name, an optional scalar value, an
//! optional opaque reference payload, an ordered child list, and an
//! ordered attribute list. Attributes are themselves nodes whose
//! [`NodeKind`] is stamped `Attribute` when they are attached.
//!
//! Trees produced by combiners consist of *view nodes*: synthetic nodes
//! linked back to the source node(s) they project through a
//! [`ViewOrigin`]. A view node without an own value answers [`Node::value`]
//! by asking its origin, left source first.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{Result, TreeError};
use crate::value::NodeValue;
use crate::visitor::{DefinedVisitor, NodeVisitor};

/// Role of a node within the tree.
///
/// Attachment keeps the role consistent with the owning sequence:
/// [`Node::append_child`] stamps `Element`, [`Node::append_attribute`]
/// stamps `Attribute`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    /// A regular child element
    Element,

    /// An attribute, stored in its owner's attribute sequence
    Attribute,
}

/// Back-link from a view node to the source node(s) it stands in for.
///
/// The opaque per-node reference payload `R` is caller-owned and never
/// used for this; origin links are their own typed channel.
pub enum ViewOrigin<R> {
    /// Not a view; the node was built directly.
    None,

    /// Projection of a single source node.
    Single(Node<R>),

    /// Merge of a matched pair: left and right source node.
    Pair(Node<R>, Node<R>),
}

impl<R> Clone for ViewOrigin<R> {
    fn clone(&self) -> Self {
        match self {
            ViewOrigin::None => ViewOrigin::None,
            ViewOrigin::Single(source) => ViewOrigin::Single(source.clone()),
            ViewOrigin::Pair(left, right) => ViewOrigin::Pair(left.clone(), right.clone()),
        }
    }
}

impl<R: fmt::Debug> fmt::Debug for ViewOrigin<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewOrigin::None => write!(f, "None"),
            ViewOrigin::Single(source) => f.debug_tuple("Single").field(source).finish(),
            ViewOrigin::Pair(left, right) => {
                f.debug_tuple("Pair").field(left).field(right).finish()
            }
        }
    }
}

struct NodeInner<R> {
    name: String,
    value: Option<NodeValue>,
    reference: Option<R>,
    kind: NodeKind,
    parent: Weak<RefCell<NodeInner<R>>>,
    children: Vec<Node<R>>,
    attributes: Vec<Node<R>>,
    origin: ViewOrigin<R>,
}

/// A handle to a node in a hierarchical configuration tree.
///
/// The type parameter `R` is an opaque reference payload for embedders
/// (for example a handle into a DOM the tree was built from). The tree
/// never inspects it.
pub struct Node<R = ()>(Rc<RefCell<NodeInner<R>>>);

impl<R> Clone for Node<R> {
    fn clone(&self) -> Self {
        Node(Rc::clone(&self.0))
    }
}

impl<R: fmt::Debug> fmt::Debug for Node<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.0.borrow();
        f.debug_struct("Node")
            .field("name", &inner.name)
            .field("kind", &inner.kind)
            .field("value", &inner.value)
            .field("reference", &inner.reference)
            .field("attributes", &inner.attributes)
            .field("children", &inner.children)
            .finish()
    }
}

impl<R> Node<R> {
    /// Create a detached element node with no value, reference, children,
    /// or attributes. Such a node reports [`Node::is_defined`] `false`.
    pub fn new(name: impl Into<String>) -> Self {
        Node(Rc::new(RefCell::new(NodeInner {
            name: name.into(),
            value: None,
            reference: None,
            kind: NodeKind::Element,
            parent: Weak::new(),
            children: Vec::new(),
            attributes: Vec::new(),
            origin: ViewOrigin::None,
        })))
    }

    /// Create a detached node carrying a scalar value.
    pub fn with_value(name: impl Into<String>, value: impl Into<NodeValue>) -> Self {
        let node = Node::new(name);
        node.set_value(value);
        node
    }

    /// Build a view projection of `source`: one synthetic node per source
    /// node, each linked back to its original through a `Single` origin,
    /// with attributes and children projected recursively.
    ///
    /// The source tree is left untouched; in particular its parent links
    /// stay as they are, so a source node can be projected into any number
    /// of view trees at once.
    pub fn view_of(source: &Node<R>) -> Node<R> {
        let view = {
            let inner = source.0.borrow();
            Node(Rc::new(RefCell::new(NodeInner {
                name: inner.name.clone(),
                value: None,
                reference: None,
                kind: inner.kind,
                parent: Weak::new(),
                children: Vec::new(),
                attributes: Vec::new(),
                origin: ViewOrigin::Single(source.clone()),
            })))
        };
        for attribute in source.attributes() {
            view.append_attribute(&Node::view_of(&attribute));
        }
        for child in source.children() {
            view.append_child(&Node::view_of(&child));
        }
        view
    }

    /// Whether two handles refer to the same node.
    pub fn ptr_eq(a: &Node<R>, b: &Node<R>) -> bool {
        Rc::ptr_eq(&a.0, &b.0)
    }

    /// The node name. Multiple siblings may share a name.
    pub fn name(&self) -> String {
        self.0.borrow().name.clone()
    }

    /// Compare the node name against `name` without cloning.
    pub fn name_is(&self, name: &str) -> bool {
        self.0.borrow().name == name
    }

    pub fn set_name(&self, name: impl Into<String>) {
        self.0.borrow_mut().name = name.into();
    }

    /// The node's scalar value.
    ///
    /// A view node without an own value delegates to its origin: the
    /// single source for projections, the left source first and then the
    /// right for merged pairs.
    pub fn value(&self) -> Option<NodeValue> {
        let inner = self.0.borrow();
        if let Some(value) = &inner.value {
            return Some(value.clone());
        }
        match &inner.origin {
            ViewOrigin::None => None,
            ViewOrigin::Single(source) => source.value(),
            ViewOrigin::Pair(left, right) => left.value().or_else(|| right.value()),
        }
    }

    pub fn set_value(&self, value: impl Into<NodeValue>) {
        self.0.borrow_mut().value = Some(value.into());
    }

    pub fn clear_value(&self) {
        self.0.borrow_mut().value = None;
    }

    /// Whether an opaque reference payload is attached to this node.
    /// Origin links do not count; see [`Node::reference`].
    pub fn has_reference(&self) -> bool {
        self.0.borrow().reference.is_some()
    }

    pub fn set_reference(&self, reference: R) {
        self.0.borrow_mut().reference = Some(reference);
    }

    pub fn clear_reference(&self) {
        self.0.borrow_mut().reference = None;
    }

    pub fn kind(&self) -> NodeKind {
        self.0.borrow().kind
    }

    /// Whether this node plays the attribute role.
    pub fn is_attribute(&self) -> bool {
        self.0.borrow().kind == NodeKind::Attribute
    }

    /// The view origin of this node. `ViewOrigin::None` for nodes built
    /// directly rather than by a combiner.
    pub fn origin(&self) -> ViewOrigin<R> {
        self.0.borrow().origin.clone()
    }

    /// Link this node back to the source node(s) it projects. Intended
    /// for combiners assembling view trees.
    pub fn set_origin(&self, origin: ViewOrigin<R>) {
        self.0.borrow_mut().origin = origin;
    }

    /// The owning node, or `None` for detached nodes and roots.
    pub fn parent(&self) -> Option<Node<R>> {
        self.0.borrow().parent.upgrade().map(Node)
    }

    /// Snapshot of the child sequence, in insertion order.
    pub fn children(&self) -> Vec<Node<R>> {
        self.0.borrow().children.clone()
    }

    /// Snapshot of the children named `name`, preserving relative order.
    pub fn children_named(&self, name: &str) -> Vec<Node<R>> {
        self.0
            .borrow()
            .children
            .iter()
            .filter(|child| child.name_is(name))
            .cloned()
            .collect()
    }

    pub fn child_count(&self) -> usize {
        self.0.borrow().children.len()
    }

    pub fn child_count_named(&self, name: &str) -> usize {
        self.0
            .borrow()
            .children
            .iter()
            .filter(|child| child.name_is(name))
            .count()
    }

    /// The child at `index`, counted from zero.
    ///
    /// This is the data model's one hard failure: an index outside
    /// `[0, child_count)` is an error rather than a soft miss.
    pub fn child(&self, index: usize) -> Result<Node<R>> {
        let inner = self.0.borrow();
        inner
            .children
            .get(index)
            .cloned()
            .ok_or(TreeError::IndexOutOfBounds {
                list: "children",
                index,
                len: inner.children.len(),
            })
    }

    /// Append `child` to the end of the child sequence, stamping its kind
    /// `Element` and its parent to this node. Duplicate names are
    /// permitted; repeated same-named children are how list semantics are
    /// represented.
    pub fn append_child(&self, child: &Node<R>) {
        {
            let mut inner = child.0.borrow_mut();
            inner.kind = NodeKind::Element;
            inner.parent = Rc::downgrade(&self.0);
        }
        self.0.borrow_mut().children.push(child.clone());
    }

    /// Remove the first child identical to `child` (handle identity, not
    /// name equality). Returns whether anything was removed. The removed
    /// node's parent link is cleared; its own subtree is not touched.
    pub fn remove_child(&self, child: &Node<R>) -> bool {
        let position = self
            .0
            .borrow()
            .children
            .iter()
            .position(|candidate| Rc::ptr_eq(&candidate.0, &child.0));
        match position {
            Some(index) => {
                let removed = self.0.borrow_mut().children.remove(index);
                removed.0.borrow_mut().parent = Weak::new();
                true
            }
            None => false,
        }
    }

    /// Remove all children named `name`. Returns whether anything was
    /// removed. Does not recurse into grandchildren.
    pub fn remove_children_named(&self, name: &str) -> bool {
        let removed: Vec<Node<R>> = {
            let mut inner = self.0.borrow_mut();
            let all = std::mem::take(&mut inner.children);
            let (removed, kept) = all.into_iter().partition(|child| child.name_is(name));
            inner.children = kept;
            removed
        };
        for node in &removed {
            node.0.borrow_mut().parent = Weak::new();
        }
        !removed.is_empty()
    }

    /// Clear the entire child sequence unconditionally.
    pub fn clear_children(&self) {
        let all = std::mem::take(&mut self.0.borrow_mut().children);
        for node in &all {
            node.0.borrow_mut().parent = Weak::new();
        }
    }

    /// Snapshot of the attribute sequence, in insertion order.
    pub fn attributes(&self) -> Vec<Node<R>> {
        self.0.borrow().attributes.clone()
    }

    /// Snapshot of the attributes named `name`, preserving relative order.
    pub fn attributes_named(&self, name: &str) -> Vec<Node<R>> {
        self.0
            .borrow()
            .attributes
            .iter()
            .filter(|attribute| attribute.name_is(name))
            .cloned()
            .collect()
    }

    pub fn attribute_count(&self) -> usize {
        self.0.borrow().attributes.len()
    }

    pub fn attribute_count_named(&self, name: &str) -> usize {
        self.0
            .borrow()
            .attributes
            .iter()
            .filter(|attribute| attribute.name_is(name))
            .count()
    }

    /// The attribute at `index`, counted from zero. Fails hard outside
    /// `[0, attribute_count)`, mirroring [`Node::child`].
    pub fn attribute(&self, index: usize) -> Result<Node<R>> {
        let inner = self.0.borrow();
        inner
            .attributes
            .get(index)
            .cloned()
            .ok_or(TreeError::IndexOutOfBounds {
                list: "attributes",
                index,
                len: inner.attributes.len(),
            })
    }

    /// Append `attribute` to the attribute sequence, stamping its kind
    /// `Attribute` and its parent to this node. Attributes are keyed
    /// independently of children; the same name may appear in both.
    pub fn append_attribute(&self, attribute: &Node<R>) {
        {
            let mut inner = attribute.0.borrow_mut();
            inner.kind = NodeKind::Attribute;
            inner.parent = Rc::downgrade(&self.0);
        }
        self.0.borrow_mut().attributes.push(attribute.clone());
    }

    /// Remove the first attribute identical to `attribute`. Returns
    /// whether anything was removed.
    pub fn remove_attribute(&self, attribute: &Node<R>) -> bool {
        let position = self
            .0
            .borrow()
            .attributes
            .iter()
            .position(|candidate| Rc::ptr_eq(&candidate.0, &attribute.0));
        match position {
            Some(index) => {
                let removed = self.0.borrow_mut().attributes.remove(index);
                removed.0.borrow_mut().parent = Weak::new();
                true
            }
            None => false,
        }
    }

    /// Remove all attributes named `name`. Returns whether anything was
    /// removed.
    pub fn remove_attributes_named(&self, name: &str) -> bool {
        let removed: Vec<Node<R>> = {
            let mut inner = self.0.borrow_mut();
            let all = std::mem::take(&mut inner.attributes);
            let (removed, kept) = all.into_iter().partition(|attribute| attribute.name_is(name));
            inner.attributes = kept;
            removed
        };
        for node in &removed {
            node.0.borrow_mut().parent = Weak::new();
        }
        !removed.is_empty()
    }

    /// Clear the entire attribute sequence unconditionally.
    pub fn clear_attributes(&self) {
        let all = std::mem::take(&mut self.0.borrow_mut().attributes);
        for node in &all {
            node.0.borrow_mut().parent = Weak::new();
        }
    }

    /// Whether this node carries anything at all: a value, a reference,
    /// a child, or an attribute. A freshly constructed node is undefined
    /// and is the canonical placeholder for "no such key".
    pub fn is_defined(&self) -> bool {
        if self.value().is_some() {
            return true;
        }
        let inner = self.0.borrow();
        inner.reference.is_some() || !inner.children.is_empty() || !inner.attributes.is_empty()
    }

    /// Whether any node in this subtree carries a payload (a value or a
    /// reference). Bare structure does not count, so a skeleton of empty
    /// nodes reports `false`. The walk stops at the first hit.
    pub fn subtree_defined(&self) -> bool {
        let mut visitor = DefinedVisitor::default();
        self.visit(&mut visitor);
        visitor.found()
    }

    /// Walk this node and its subtree depth-first: attributes before
    /// children at every node, siblings in insertion order.
    ///
    /// `enter` is called when a node is reached and `leave` once its
    /// subtree has been walked. [`NodeVisitor::terminate`] is consulted
    /// before descending into each further sibling, so a visitor can stop
    /// the walk as soon as it has what it needs: nodes not yet reached are
    /// skipped entirely, while nodes already entered still receive their
    /// `leave` call as the stack unwinds.
    ///
    /// Sibling sequences are snapshotted before recursing, so visitors may
    /// mutate the tree they are walking.
    pub fn visit<V: NodeVisitor<R>>(&self, visitor: &mut V) {
        trace!(node = %self.0.borrow().name, "visit");
        visitor.enter(self);
        for attribute in self.attributes() {
            if visitor.terminate() {
                break;
            }
            attribute.visit(visitor);
        }
        for child in self.children() {
            if visitor.terminate() {
                break;
            }
            child.visit(visitor);
        }
        visitor.leave(self);
    }
}

impl<R: Clone> Node<R> {
    /// The opaque reference payload, cloned out. The tree never reads or
    /// fabricates this; it belongs entirely to the embedding format.
    pub fn reference(&self) -> Option<R> {
        self.0.borrow().reference.clone()
    }

    /// Deep-copy this node and its whole subtree, attributes included.
    /// Values and references are cloned by value; origin links in the
    /// copy keep pointing at the same source nodes. The copy is detached.
    pub fn deep_clone(&self) -> Node<R> {
        let copy = {
            let inner = self.0.borrow();
            Node(Rc::new(RefCell::new(NodeInner {
                name: inner.name.clone(),
                value: inner.value.clone(),
                reference: inner.reference.clone(),
                kind: inner.kind,
                parent: Weak::new(),
                children: Vec::new(),
                attributes: Vec::new(),
                origin: inner.origin.clone(),
            })))
        };
        for attribute in self.attributes() {
            copy.append_attribute(&attribute.deep_clone());
        }
        for child in self.children() {
            copy.append_child(&child.deep_clone());
        }
        copy
    }
}
