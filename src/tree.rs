//! Tree mutation: append, insert, and remove.
//!
//! All three operations validate before they mutate, so a failed call
//! leaves the tree untouched. Re-parenting is built into append and
//! insert: an item that already has a parent is detached from it first.
//!
//! One documented asymmetry is preserved from the host: `insert_child`
//! rejects an item already inside the target parent, while
//! `append_child` tolerates it by re-parenting (a move to the end).

use crate::error::{Error, Result};
use crate::node::{NodeKind, NodeRef};
use crate::session::Session;

impl Session {
    /// Append `item` to the end of `parent`'s children.
    ///
    /// A `None` item models the host's null child and fails with
    /// [`Error::EmptyChild`] under error simulation (otherwise it
    /// no-ops).
    pub fn append_child(
        &mut self,
        parent: NodeRef,
        item: impl Into<Option<NodeRef>>,
    ) -> Result<()> {
        let Some(item) = item.into() else {
            if self.config.simulate_errors {
                return Err(Error::EmptyChild);
            }
            return Ok(());
        };
        self.check_root_child(parent, item)?;
        self.attach(parent, item, None);
        Ok(())
    }

    /// Splice `item` into `parent`'s children at `index`, shifting
    /// later siblings right. Indices past the end append.
    pub fn insert_child(
        &mut self,
        parent: NodeRef,
        index: usize,
        item: impl Into<Option<NodeRef>>,
    ) -> Result<()> {
        let Some(item) = item.into() else {
            if self.config.simulate_errors {
                return Err(Error::EmptyChild);
            }
            return Ok(());
        };
        if self.config.simulate_errors && self.node(item).parent == Some(parent) {
            return Err(Error::NodeAlreadyInsideParent);
        }
        self.check_root_child(parent, item)?;
        self.attach(parent, item, Some(index));
        Ok(())
    }

    /// Tombstone a node and detach it from its parent.
    ///
    /// Nodes inside an instance subtree are structurally immutable;
    /// removing one fails under error simulation. The tombstone is set
    /// before that check, matching the host.
    pub fn remove(&mut self, node: NodeRef) -> Result<()> {
        self.node_mut(node).removed = true;
        if self.config.simulate_errors && self.is_inside_instance(node) {
            return Err(Error::RemoveInsideInstance);
        }
        self.detach(node);
        Ok(())
    }

    /// Whether any ancestor of `node` is an instance.
    pub(crate) fn is_inside_instance(&self, node: NodeRef) -> bool {
        let mut current = self.node(node).parent;
        while let Some(ancestor) = current {
            if self.node(ancestor).kind == NodeKind::Instance {
                return true;
            }
            current = self.node(ancestor).parent;
        }
        false
    }

    fn check_root_child(&self, parent: NodeRef, item: NodeRef) -> Result<()> {
        if self.config.simulate_errors
            && self.node(parent).kind == NodeKind::Document
            && self.node(item).kind != NodeKind::Page
        {
            return Err(Error::InvalidRootChild);
        }
        Ok(())
    }

    /// Detach `node` from its parent, if any, clearing both sides of
    /// the edge.
    pub(crate) fn detach(&mut self, node: NodeRef) {
        if let Some(parent) = self.node(node).parent {
            self.node_mut(parent).children.retain(|&child| child != node);
            self.node_mut(node).parent = None;
        }
    }

    /// Attach `node` under `parent`, detaching it from any previous
    /// parent first. `index` of `None` appends.
    pub(crate) fn attach(&mut self, parent: NodeRef, node: NodeRef, index: Option<usize>) {
        self.detach(node);
        self.node_mut(node).parent = Some(parent);
        let children = &mut self.node_mut(parent).children;
        match index {
            Some(index) => {
                let index = index.min(children.len());
                children.insert(index, node);
            }
            None => children.push(node),
        }
    }
}
