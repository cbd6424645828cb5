//! Component tree storage.
//!
//! Nodes live in a [`NodeArena`] and address each other by [`NodeId`]
//! index. Children are ordered id lists (or raw DSL text injected by a
//! custom-tag factory); the parent back-reference exists only so the
//! serializer can compute nesting depth.

use std::collections::BTreeMap;

use crate::value::Value;

/// Index of a node within its [`NodeArena`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NodeId(pub(crate) usize);

/// One ordered child slot: either another node or raw DSL text emitted
/// verbatim inside the parent block.
#[derive(Clone, Debug)]
pub enum Child {
    Node(NodeId),
    Raw(String),
}

/// A single UI component in the tree.
#[derive(Clone, Debug, Default)]
pub struct ComponentNode {
    /// Component kind, e.g. `Group`, `Label`, `Button`, `$Common.Dialog`.
    pub kind: String,
    /// Optional PascalCase id. `MIBRoot` is reserved for the runtime.
    pub id: Option<String>,
    /// Property map; last write wins per key.
    pub properties: BTreeMap<String, Value>,
    /// Visual style entries, rendered as a bare-token `Style` map.
    pub styles: BTreeMap<String, String>,
    /// Ordered children.
    pub children: Vec<Child>,
    /// Component-scoped DSL variables, emitted as `@name = value;` lines
    /// inside the block. Distinct from template variables.
    pub variables: BTreeMap<String, String>,
    /// DSL comments emitted at the top of the block.
    pub comments: Vec<String>,
    parent: Option<NodeId>,
}

impl ComponentNode {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ..Default::default()
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn set_property(&mut self, name: impl Into<String>, value: Value) {
        self.properties.insert(name.into(), value);
    }

    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    /// Merges one entry into the accumulated `Anchor` nested map.
    ///
    /// All box declarations (`top`, `width`, `margin-left`, ...) funnel
    /// through here so repeated declarations merge instead of replacing
    /// the whole map.
    pub fn set_anchor(&mut self, key: &str, value: Value) {
        let anchor = self
            .properties
            .entry("Anchor".to_string())
            .or_insert_with(|| Value::Map(BTreeMap::new()));
        if let Value::Map(entries) = anchor {
            entries.insert(key.to_string(), value);
        }
    }
}

/// Owning storage for a component tree.
#[derive(Clone, Debug, Default)]
pub struct NodeArena {
    nodes: Vec<ComponentNode>,
}

impl NodeArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node and returns its id. The node starts detached.
    pub fn alloc(&mut self, node: ComponentNode) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    pub fn get(&self, id: NodeId) -> &ComponentNode {
        &self.nodes[id.0]
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut ComponentNode {
        &mut self.nodes[id.0]
    }

    /// Appends `child` to `parent` and records the back-reference.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(Child::Node(child));
    }

    /// Inserts `child` as the first child of `parent`.
    pub fn add_first_child(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.insert(0, Child::Node(child));
    }

    /// Appends raw DSL text as a child of `parent`.
    pub fn add_raw(&mut self, parent: NodeId, text: impl Into<String>) {
        self.nodes[parent.0].children.push(Child::Raw(text.into()));
    }

    /// Nesting depth of a node; the root has depth zero.
    pub fn depth(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut current = self.nodes[id.0].parent;
        while let Some(parent) = current {
            depth += 1;
            current = self.nodes[parent.0].parent;
        }
        depth
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
