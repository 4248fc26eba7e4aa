//! Grouping and boolean operations.
//!
//! Both produce a fresh container node, move the inputs into it in the
//! given order, and splice the container into `parent` (at `index`, or
//! appended). Boolean containers additionally record which operation
//! they apply.

use crate::error::{Error, Result};
use crate::node::{BooleanOperation, Node, NodeKind, NodeRef};
use crate::session::Session;

impl Session {
    /// Group `nodes` under a new `Group` inserted into `parent`.
    pub fn group(
        &mut self,
        nodes: &[NodeRef],
        parent: NodeRef,
        index: Option<usize>,
    ) -> Result<NodeRef> {
        self.wrap(NodeKind::Group, None, nodes, parent, index)
    }

    /// Combine `nodes` with a union operation.
    pub fn union(
        &mut self,
        nodes: &[NodeRef],
        parent: NodeRef,
        index: Option<usize>,
    ) -> Result<NodeRef> {
        self.boolean(BooleanOperation::Union, nodes, parent, index)
    }

    /// Combine `nodes` with an intersect operation.
    pub fn intersect(
        &mut self,
        nodes: &[NodeRef],
        parent: NodeRef,
        index: Option<usize>,
    ) -> Result<NodeRef> {
        self.boolean(BooleanOperation::Intersect, nodes, parent, index)
    }

    /// Combine `nodes` with a subtract operation.
    pub fn subtract(
        &mut self,
        nodes: &[NodeRef],
        parent: NodeRef,
        index: Option<usize>,
    ) -> Result<NodeRef> {
        self.boolean(BooleanOperation::Subtract, nodes, parent, index)
    }

    /// Combine `nodes` with an exclude operation.
    pub fn exclude(
        &mut self,
        nodes: &[NodeRef],
        parent: NodeRef,
        index: Option<usize>,
    ) -> Result<NodeRef> {
        self.boolean(BooleanOperation::Exclude, nodes, parent, index)
    }

    fn boolean(
        &mut self,
        operation: BooleanOperation,
        nodes: &[NodeRef],
        parent: NodeRef,
        index: Option<usize>,
    ) -> Result<NodeRef> {
        self.wrap(NodeKind::BooleanOperation, Some(operation), nodes, parent, index)
    }

    fn wrap(
        &mut self,
        kind: NodeKind,
        operation: Option<BooleanOperation>,
        nodes: &[NodeRef],
        parent: NodeRef,
        index: Option<usize>,
    ) -> Result<NodeRef> {
        if self.config.simulate_errors && nodes.is_empty() {
            return Err(Error::EmptyNodeList);
        }
        let id = self.allocator.allocate(false);
        let container = NodeRef(self.nodes.len());
        let mut record = Node::new(id, kind);
        record.boolean_operation = operation;
        self.nodes.push(record);

        for &node in nodes {
            self.attach(container, node, None);
        }
        self.attach(parent, container, index);
        Ok(container)
    }
}
