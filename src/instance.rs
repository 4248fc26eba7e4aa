//! Component instantiation and detachment.
//!
//! Instantiating a component deep-clones its subtree. Every clone gets
//! a fresh id from the session allocator, an `orig` back-reference to
//! the node it was cloned from, and empty plugin-data stores (plugin
//! data reads fall back through `orig`, see the plugin-data module).
//! The clone of the component itself becomes an `Instance` node with
//! `main_component` set; it starts detached and must be appended
//! somewhere to enter the document.

use crate::node::{Node, NodeKind, NodeRef};
use crate::session::Session;
use std::collections::BTreeMap;

impl Session {
    /// Instantiate `component`, returning the detached instance root.
    pub fn create_instance(&mut self, component: NodeRef) -> NodeRef {
        let instance = self.clone_into_table(component);
        {
            let node = self.node_mut(instance);
            node.kind = NodeKind::Instance;
            node.main_component = Some(component);
        }
        let children = self.node(component).children.clone();
        for child in children {
            let clone = self.clone_subtree(child);
            self.node_mut(clone).parent = Some(instance);
            self.node_mut(instance).children.push(clone);
        }
        instance
    }

    /// Detach an instance from its component, retyping it to a frame in
    /// place. The subtree and its ids are unchanged.
    pub fn detach_instance(&mut self, instance: NodeRef) -> NodeRef {
        let node = self.node_mut(instance);
        node.kind = NodeKind::Frame;
        node.main_component = None;
        instance
    }

    fn clone_subtree(&mut self, source: NodeRef) -> NodeRef {
        let clone = self.clone_into_table(source);
        let children = self.node(source).children.clone();
        for child in children {
            let child_clone = self.clone_subtree(child);
            self.node_mut(child_clone).parent = Some(clone);
            self.node_mut(clone).children.push(child_clone);
        }
        clone
    }

    /// Copy one node's record into the table under a fresh id, with
    /// empty plugin data and an `orig` back-reference. Children and
    /// parent start empty.
    fn clone_into_table(&mut self, source: NodeRef) -> NodeRef {
        let id = self.allocator.allocate(false);
        let mut record = Node {
            id,
            parent: None,
            children: Vec::new(),
            plugin_data: BTreeMap::new(),
            shared_plugin_data: BTreeMap::new(),
            relaunch_data: BTreeMap::new(),
            orig: Some(source),
            ..self.node(source).clone()
        };
        record.removed = false;
        let clone = NodeRef(self.nodes.len());
        self.nodes.push(record);
        clone
    }
}
