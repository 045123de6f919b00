//! Scene graph and hierarchical scene organization.
//!
//! A [`Hierarchy`] is an arena of named nodes. Each node stores its local
//! transform and a cached world transform, like the `(local, world)` pairs of
//! an instanced node. Parents are registered before their children, so one
//! pass in registration order updates every world transform.

use std::collections::HashMap;

use crate::{
    data_structures::{drawable::Drawable, transform::Transform},
    error::HierarchyError,
    render::{RenderPass, Renderer},
};

#[derive(Clone, Debug)]
pub struct Node {
    name: String,
    parent: Option<usize>,
    pub drawable: Drawable,
    pub local: Transform,
    world: Transform,
}

impl Node {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<usize> {
        self.parent
    }
}

#[derive(Clone, Debug, Default)]
pub struct Hierarchy {
    nodes: Vec<Node>,
    index: HashMap<String, usize>,
    stale: bool,
}

impl Hierarchy {
    pub fn new() -> Self {
        Self::default()
    }

    /**
     * Registers `drawable` under `name`.
     *
     * `parent` must already be registered. The node starts with `local` as its
     * local transform. Returns the position of the node in draw order.
     */
    pub fn add(
        &mut self,
        drawable: Drawable,
        name: &str,
        parent: Option<&str>,
        local: Transform,
    ) -> Result<usize, HierarchyError> {
        if self.index.contains_key(name) {
            return Err(HierarchyError::DuplicateNode(name.to_string()));
        }
        let parent = match parent {
            Some(parent) => Some(self.index.get(parent).copied().ok_or_else(|| {
                HierarchyError::UnknownParent {
                    node: name.to_string(),
                    parent: parent.to_string(),
                }
            })?),
            None => None,
        };

        let idx = self.nodes.len();
        self.nodes.push(Node {
            name: name.to_string(),
            parent,
            drawable,
            local,
            world: local,
        });
        self.index.insert(name.to_string(), idx);
        self.stale = true;
        Ok(idx)
    }

    pub fn node(&self, name: &str) -> Result<&Node, HierarchyError> {
        self.index
            .get(name)
            .map(|idx| &self.nodes[*idx])
            .ok_or_else(|| HierarchyError::UnknownNode(name.to_string()))
    }

    /// Mutable access to a node. World transforms must be recomputed afterwards.
    pub fn node_mut(&mut self, name: &str) -> Result<&mut Node, HierarchyError> {
        let idx = *self
            .index
            .get(name)
            .ok_or_else(|| HierarchyError::UnknownNode(name.to_string()))?;
        self.stale = true;
        Ok(&mut self.nodes[idx])
    }

    /// Shorthand for the local transform of `name`.
    pub fn local_mut(&mut self, name: &str) -> Result<&mut Transform, HierarchyError> {
        Ok(&mut self.node_mut(name)?.local)
    }

    pub fn recompute_global_transforms(&mut self) {
        for idx in 0..self.nodes.len() {
            let world = match self.nodes[idx].parent {
                Some(parent) => &self.nodes[parent].world * &self.nodes[idx].local,
                None => self.nodes[idx].local,
            };
            self.nodes[idx].world = world;
        }
        self.stale = false;
    }

    pub fn is_stale(&self) -> bool {
        self.stale
    }

    pub fn global_transform(&self, name: &str) -> Result<Transform, HierarchyError> {
        let node = self.node(name)?;
        if self.stale {
            return Err(HierarchyError::StaleTransforms);
        }
        Ok(node.world)
    }

    /// Submits every non empty node, in registration order.
    pub fn draw_all<R: Renderer + ?Sized>(
        &self,
        renderer: &mut R,
        pass: RenderPass,
    ) -> Result<(), HierarchyError> {
        if self.stale {
            return Err(HierarchyError::StaleTransforms);
        }
        for node in self.nodes.iter().filter(|n| !n.drawable.is_empty()) {
            renderer.draw(&node.drawable, &node.world, pass);
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(|n| n.name.as_str())
    }

    /// Nodes in registration order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }
}
