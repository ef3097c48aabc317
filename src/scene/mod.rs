//! Transform hierarchy the rig reads and writes.
//!
//! Nodes live in a flat arena and reference their parent by [`NodeId`].
//! Every node stores its transform relative to its parent; world-space
//! values are composed on demand by walking up the parent chain. The graph
//! never removes nodes, so ids stay valid for its whole lifetime.

mod transform;

use std::fmt;

use glam::{Quat, Vec3};
use rustc_hash::FxHashMap;
pub use transform::Transform;

use crate::error::RigError;

/// Handle to a node in a [`SceneGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone)]
struct Node {
    name: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    local: Transform,
}

/// Arena-backed tree of rigid transforms.
#[derive(Debug, Clone, Default)]
pub struct SceneGraph {
    nodes: Vec<Node>,
    /// First node registered under each name.
    names: FxHashMap<String, NodeId>,
}

impl SceneGraph {
    /// Create an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // -- Construction --

    /// Add a top-level node whose local transform is its world transform.
    pub fn add_root(&mut self, name: &str, local: Transform) -> NodeId {
        self.insert(name, None, local)
    }

    /// Add a node under `parent`.
    ///
    /// # Errors
    ///
    /// Returns [`RigError::UnknownNode`] if `parent` is not in this graph.
    pub fn add_child(
        &mut self,
        parent: NodeId,
        name: &str,
        local: Transform,
    ) -> Result<NodeId, RigError> {
        let _ = self.node(parent)?;
        let id = self.insert(name, Some(parent), local);
        self.nodes[parent.0].children.push(id);
        Ok(id)
    }

    fn insert(
        &mut self,
        name: &str,
        parent: Option<NodeId>,
        local: Transform,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            name: name.to_owned(),
            parent,
            children: Vec::new(),
            local,
        });
        let _ = self.names.entry(name.to_owned()).or_insert(id);
        id
    }

    fn node(&self, id: NodeId) -> Result<&Node, RigError> {
        self.nodes.get(id.0).ok_or(RigError::UnknownNode(id))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, RigError> {
        self.nodes.get_mut(id.0).ok_or(RigError::UnknownNode(id))
    }

    // -- Queries --

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Look up a node by name (first registration wins).
    #[must_use]
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.names.get(name).copied()
    }

    /// Name the node was registered with.
    ///
    /// # Errors
    ///
    /// Returns [`RigError::UnknownNode`] for foreign ids.
    pub fn name(&self, id: NodeId) -> Result<&str, RigError> {
        Ok(self.node(id)?.name.as_str())
    }

    /// Parent of a node, `None` for roots.
    ///
    /// # Errors
    ///
    /// Returns [`RigError::UnknownNode`] for foreign ids.
    pub fn parent(&self, id: NodeId) -> Result<Option<NodeId>, RigError> {
        Ok(self.node(id)?.parent)
    }

    /// Direct children of a node, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`RigError::UnknownNode`] for foreign ids.
    pub fn children(&self, id: NodeId) -> Result<&[NodeId], RigError> {
        Ok(&self.node(id)?.children)
    }

    /// Transform relative to the parent.
    ///
    /// # Errors
    ///
    /// Returns [`RigError::UnknownNode`] for foreign ids.
    pub fn local(&self, id: NodeId) -> Result<Transform, RigError> {
        Ok(self.node(id)?.local)
    }

    /// World-space transform, composed from the root down.
    ///
    /// # Errors
    ///
    /// Returns [`RigError::UnknownNode`] for foreign ids.
    pub fn world(&self, id: NodeId) -> Result<Transform, RigError> {
        let node = self.node(id)?;
        let mut world = node.local;
        let mut cursor = node.parent;
        while let Some(parent_id) = cursor {
            let parent = self.node(parent_id)?;
            world = parent.local.mul_transform(&world);
            cursor = parent.parent;
        }
        Ok(world)
    }

    /// World-space position.
    ///
    /// # Errors
    ///
    /// Returns [`RigError::UnknownNode`] for foreign ids.
    pub fn world_position(&self, id: NodeId) -> Result<Vec3, RigError> {
        Ok(self.world(id)?.translation)
    }

    fn parent_world(&self, id: NodeId) -> Result<Transform, RigError> {
        match self.node(id)?.parent {
            Some(parent) => self.world(parent),
            None => Ok(Transform::IDENTITY),
        }
    }

    // -- Mutation --

    /// Mutable access to the parent-relative transform.
    ///
    /// # Errors
    ///
    /// Returns [`RigError::UnknownNode`] for foreign ids.
    pub fn local_mut(
        &mut self,
        id: NodeId,
    ) -> Result<&mut Transform, RigError> {
        Ok(&mut self.node_mut(id)?.local)
    }

    /// Replace the parent-relative transform.
    ///
    /// # Errors
    ///
    /// Returns [`RigError::UnknownNode`] for foreign ids.
    pub fn set_local(
        &mut self,
        id: NodeId,
        local: Transform,
    ) -> Result<(), RigError> {
        *self.local_mut(id)? = local;
        Ok(())
    }

    /// Move a node so that its world position becomes `position`.
    ///
    /// # Errors
    ///
    /// Returns [`RigError::UnknownNode`] for foreign ids.
    pub fn set_world_position(
        &mut self,
        id: NodeId,
        position: Vec3,
    ) -> Result<(), RigError> {
        let local = self.parent_world(id)?.inverse().transform_point(position);
        self.local_mut(id)?.translation = local;
        Ok(())
    }

    /// Rotate a node so that its world orientation becomes `rotation`.
    ///
    /// # Errors
    ///
    /// Returns [`RigError::UnknownNode`] for foreign ids.
    pub fn set_world_rotation(
        &mut self,
        id: NodeId,
        rotation: Quat,
    ) -> Result<(), RigError> {
        let parent = self.parent_world(id)?;
        self.local_mut(id)?.rotation =
            (parent.rotation.inverse() * rotation).normalize();
        Ok(())
    }
}
