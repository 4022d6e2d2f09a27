//! # Orbit Tree
//!
//! Bodies are chained: a node's orbit is expressed in its parent's frame, whose
//! orbit is expressed in *its* parent's frame, up to the system root. The tree
//! owns every node in an arena and hands out [`NodeId`] handles. Children are an
//! ordered list of ids; the parent link is a plain id that never owns anything,
//! so the whole tree is dropped as one unit.
//!
//! ## Invariants
//! - exactly one root, created with the tree, which never gets a parent
//! - node names are unique within a tree
//! - every attached node has exactly one parent and appears in exactly that
//!   parent's child list; detached nodes have no parent
//! - no cycles
//!
//! `NodeId`s are only meaningful for the tree that produced them. Passing an id
//! from a different tree to the accessors below panics on an out-of-range index.

use crate::error::OrbitError;
use crate::orbit::TimedOrbit;
use crate::transform::ORIGIN;
use glam::{DVec3, DVec4};
use std::collections::HashMap;

/// Handle to a node inside an [`OrbitTree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// One named body or deferent.
#[derive(Clone, Debug)]
pub struct OrbitNode {
    name: String,
    orbit: TimedOrbit,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Arena-backed tree of timed orbits.
#[derive(Clone, Debug)]
pub struct OrbitTree {
    nodes: Vec<OrbitNode>,
    names: HashMap<String, NodeId>,
    root: NodeId,
}

impl OrbitTree {
    /// Create a tree holding only its root node.
    pub fn new(name: impl Into<String>, orbit: TimedOrbit) -> Self {
        let name = name.into();
        let root = NodeId(0);
        OrbitTree {
            nodes: vec![OrbitNode {
                name: name.clone(),
                orbit,
                parent: None,
                children: Vec::new(),
            }],
            names: HashMap::from([(name, root)]),
            root,
        }
    }

    /// Add a detached node; attach it with [`OrbitTree::set_children`].
    pub fn add_node(
        &mut self,
        name: impl Into<String>,
        orbit: TimedOrbit,
    ) -> Result<NodeId, OrbitError> {
        let name = name.into();
        if self.names.contains_key(&name) {
            return Err(OrbitError::DuplicateName(name));
        }
        let id = NodeId(self.nodes.len());
        self.nodes.push(OrbitNode {
            name: name.clone(),
            orbit,
            parent: None,
            children: Vec::new(),
        });
        self.names.insert(name, id);
        Ok(id)
    }

    /// Replace the children of `parent`.
    ///
    /// Previous children that are not in the new list are detached (their
    /// parent link is cleared). A child currently attached elsewhere is moved.
    pub fn set_children(
        &mut self,
        parent: NodeId,
        children: Vec<NodeId>,
    ) -> Result<&mut Self, OrbitError> {
        self.check_id(parent)?;
        for (i, &child) in children.iter().enumerate() {
            self.check_id(child)?;
            if child == self.root {
                return Err(OrbitError::InvalidAttachment(format!(
                    "root '{}' cannot become a child",
                    self.nodes[child.0].name
                )));
            }
            if children[..i].contains(&child) {
                return Err(OrbitError::InvalidAttachment(format!(
                    "'{}' listed twice",
                    self.nodes[child.0].name
                )));
            }
            if self.ancestors(parent).any(|a| a == child) {
                return Err(OrbitError::InvalidAttachment(format!(
                    "'{}' is an ancestor of '{}'",
                    self.nodes[child.0].name, self.nodes[parent.0].name
                )));
            }
        }

        let previous = std::mem::take(&mut self.nodes[parent.0].children);
        for old in previous {
            if !children.contains(&old) {
                self.nodes[old.0].parent = None;
            }
        }

        for &child in &children {
            match self.nodes[child.0].parent {
                Some(other) if other != parent => {
                    self.nodes[other.0].children.retain(|&c| c != child);
                }
                _ => {}
            }
            self.nodes[child.0].parent = Some(parent);
        }
        self.nodes[parent.0].children = children;
        Ok(self)
    }

    /// Name → node for everything reachable from the root, visited in preorder.
    pub fn map_names(&self) -> HashMap<String, NodeId> {
        self.preorder(self.root)
            .into_iter()
            .map(|id| (self.nodes[id.0].name.clone(), id))
            .collect()
    }

    /// Look up a node the root can reach. Detached nodes are not found: their
    /// angles no longer follow `set_time` and their chain stops short of the root.
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.names
            .get(name)
            .copied()
            .filter(|&id| self.is_attached(id))
    }

    /// True when the parent chain of `id` ends at the root.
    pub fn is_attached(&self, id: NodeId) -> bool {
        self.ancestors(id).last() == Some(self.root)
    }

    /// Set the simulation time on every node reachable from the root.
    pub fn set_time(&mut self, time: f64) -> &mut Self {
        self.set_subtree_time(self.root, time)
    }

    /// Set the simulation time on `id` and all of its descendants.
    pub fn set_subtree_time(&mut self, id: NodeId, time: f64) -> &mut Self {
        for node in self.preorder(id) {
            self.nodes[node.0].orbit.set_time(time);
        }
        self
    }

    /// Carry `v` from the frame of node `id` into root coordinates.
    ///
    /// For a detached node the chain ends at the top of its own subtree.
    pub fn transform(&self, id: NodeId, v: DVec4) -> DVec4 {
        self.ancestors(id)
            .fold(v, |v, node| self.nodes[node.0].orbit.transform(v))
    }

    /// Carry `v` from root coordinates into the frame of node `id`.
    pub fn itransform(&self, id: NodeId, v: DVec4) -> DVec4 {
        let chain: Vec<NodeId> = self.ancestors(id).collect();
        chain
            .into_iter()
            .rev()
            .fold(v, |v, node| self.nodes[node.0].orbit.itransform(v))
    }

    /// Current position of node `id` in root coordinates.
    pub fn pos(&self, id: NodeId) -> DVec3 {
        self.transform(id, ORIGIN).truncate()
    }

    pub fn position_of(&self, name: &str) -> Option<DVec3> {
        self.find(name).map(|id| self.pos(id))
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of nodes owned by the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn name(&self, id: NodeId) -> &str {
        &self.nodes[id.0].name
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub fn orbit(&self, id: NodeId) -> &TimedOrbit {
        &self.nodes[id.0].orbit
    }

    /// `id`, then its parent, and so on up to the top of its tree.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(Some(id), move |n| self.nodes[n.0].parent)
    }

    /// Subtree of `id` in preorder (node, then each child in order).
    pub fn preorder(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(self.nodes[node.0].children.iter().rev());
        }
        out
    }

    fn check_id(&self, id: NodeId) -> Result<(), OrbitError> {
        if id.0 < self.nodes.len() {
            Ok(())
        } else {
            Err(OrbitError::InvalidAttachment(format!(
                "unknown node {:?}",
                id
            )))
        }
    }
}
