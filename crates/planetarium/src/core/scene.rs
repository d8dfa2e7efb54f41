use std::collections::HashMap;

use crate::api::types::NodeId;
use crate::components::node::SceneNode;
use crate::extensions::transform::Transform;

/// Node storage plus the parent/child hierarchy.
///
/// Always holds the world root and the camera node. A node may be detached
/// (present but parentless) while it is being moved between parents.
#[derive(Debug, Clone)]
pub struct SceneGraph {
    nodes: HashMap<NodeId, SceneNode>,
    next_id: u32,
}

impl SceneGraph {
    pub fn new() -> Self {
        let mut graph = Self {
            nodes: HashMap::with_capacity(128),
            next_id: NodeId::CAMERA.0 + 1,
        };
        graph.install_roots();
        graph
    }

    fn install_roots(&mut self) {
        let root = SceneNode::new(NodeId::ROOT).with_name("root");
        let mut camera = SceneNode::new(NodeId::CAMERA).with_name("camera");
        camera.parent = Some(NodeId::ROOT);
        let mut root = root;
        root.children.push(NodeId::CAMERA);
        self.nodes.insert(NodeId::ROOT, root);
        self.nodes.insert(NodeId::CAMERA, camera);
    }

    /// Reserve the next node id.
    pub fn next_id(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Insert `node` as the last child of `parent`. The node's id is
    /// replaced with a fresh one. Returns `None` if `parent` is unknown.
    pub fn add_child(&mut self, parent: NodeId, mut node: SceneNode) -> Option<NodeId> {
        if !self.nodes.contains_key(&parent) {
            return None;
        }
        let id = self.next_id();
        node.id = id;
        node.parent = None;
        node.children.clear();
        self.nodes.insert(id, node);
        self.attach(id, parent);
        Some(id)
    }

    pub fn get(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(&id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(&id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(&id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(&id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Position of `id` among its parent's children.
    pub fn index_in_parent(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|&c| c == id)
    }

    /// Detach `id` from its parent, keeping it and its subtree in storage.
    /// Returns the former parent and child index.
    pub fn detach(&mut self, id: NodeId) -> Option<(NodeId, usize)> {
        let parent = self.parent(id)?;
        let index = self.index_in_parent(id)?;
        if let Some(p) = self.nodes.get_mut(&parent) {
            p.children.remove(index);
        }
        if let Some(n) = self.nodes.get_mut(&id) {
            n.parent = None;
        }
        Some((parent, index))
    }

    /// Make `id` the last child of `parent`, detaching it first if needed.
    pub fn attach(&mut self, id: NodeId, parent: NodeId) -> bool {
        let len = self.children(parent).len();
        self.insert_child(id, parent, len)
    }

    /// Make `id` a child of `parent` at `index` (clamped to the child count).
    /// Refuses to create a cycle.
    pub fn insert_child(&mut self, id: NodeId, parent: NodeId, index: usize) -> bool {
        if !self.nodes.contains_key(&id) || !self.nodes.contains_key(&parent) {
            return false;
        }
        if id == parent || self.is_ancestor(id, parent) {
            log::warn!("refusing to parent node {:?} under its own descendant {:?}", id, parent);
            return false;
        }
        self.detach(id);
        if let Some(p) = self.nodes.get_mut(&parent) {
            let index = index.min(p.children.len());
            p.children.insert(index, id);
        }
        if let Some(n) = self.nodes.get_mut(&id) {
            n.parent = Some(parent);
        }
        true
    }

    /// Whether `ancestor` is on the parent chain of `id`.
    pub fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = self.parent(id);
        while let Some(p) = current {
            if p == ancestor {
                return true;
            }
            current = self.parent(p);
        }
        false
    }

    /// Whether `id` is reachable from the world root.
    pub fn is_in_world(&self, id: NodeId) -> bool {
        id == NodeId::ROOT || self.is_ancestor(NodeId::ROOT, id)
    }

    /// Remove `id` and every descendant from storage.
    pub fn remove_subtree(&mut self, id: NodeId) -> usize {
        if id == NodeId::ROOT || id == NodeId::CAMERA {
            return 0;
        }
        self.detach(id);
        let doomed = self.descendants(id);
        for d in &doomed {
            self.nodes.remove(d);
        }
        doomed.len()
    }

    /// `id` followed by all its descendants, depth first.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        if !self.nodes.contains_key(&id) {
            return out;
        }
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            out.push(current);
            for &child in self.children(current).iter().rev() {
                stack.push(child);
            }
        }
        out
    }

    /// Clones of `id` and its descendants, depth first.
    pub fn snapshot(&self, id: NodeId) -> Vec<SceneNode> {
        self.descendants(id)
            .into_iter()
            .filter_map(|d| self.nodes.get(&d).cloned())
            .collect()
    }

    /// First node with the given name anywhere in storage.
    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        self.find_in_subtree(NodeId::ROOT, name)
    }

    /// First node named `name` in the subtree rooted at `root`, depth first.
    pub fn find_in_subtree(&self, root: NodeId, name: &str) -> Option<NodeId> {
        self.descendants(root)
            .into_iter()
            .find(|id| self.nodes.get(id).map(|n| n.name == name).unwrap_or(false))
    }

    /// Direct child of `parent` named `name`.
    pub fn find_child(&self, parent: NodeId, name: &str) -> Option<NodeId> {
        self.children(parent)
            .iter()
            .copied()
            .find(|id| self.nodes.get(id).map(|n| n.name == name).unwrap_or(false))
    }

    pub fn name(&self, id: NodeId) -> Option<&str> {
        self.nodes.get(&id).map(|n| n.name.as_str())
    }

    /// Transform of `id` relative to the world root.
    pub fn world_transform(&self, id: NodeId) -> Option<Transform> {
        let mut chain = Vec::new();
        let mut current = Some(id);
        while let Some(c) = current {
            let node = self.nodes.get(&c)?;
            chain.push(node.transform);
            current = node.parent;
        }
        Some(
            chain
                .iter()
                .rev()
                .fold(Transform::IDENTITY, |acc, local| acc.compose(local)),
        )
    }

    /// Number of nodes, including root and camera.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Drop everything except the root and camera. The camera keeps its
    /// transform; ids are not reused.
    pub fn clear(&mut self) {
        let camera = self.nodes.get(&NodeId::CAMERA).map(|c| c.transform);
        self.nodes.clear();
        self.install_roots();
        if let (Some(transform), Some(node)) = (camera, self.nodes.get_mut(&NodeId::CAMERA)) {
            node.transform = transform;
        }
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}
