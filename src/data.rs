//! Plugin data: per-node string stores with clone inheritance.
//!
//! Every node carries a private plugin-data map plus namespaced shared
//! maps. Reads fall back through the `orig` chain, so an instance's
//! clones report their source's data until a local write shadows it.
//! Writing an empty string deletes the local key, which re-exposes any
//! inherited value rather than masking it.
//!
//! Reads and writes on a tombstoned node fail under error simulation
//! with the host's "does not exist" error.

use crate::error::{Error, Result};
use crate::node::NodeRef;
use crate::session::Session;

impl Session {
    /// Write a node's private plugin data. An empty value deletes the
    /// local key.
    pub fn set_plugin_data(
        &mut self,
        node: NodeRef,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<()> {
        self.check_alive(node)?;
        let key = key.into();
        let value = value.into();
        let data = &mut self.node_mut(node).plugin_data;
        if value.is_empty() {
            data.remove(&key);
        } else {
            data.insert(key, value);
        }
        Ok(())
    }

    /// Read a node's private plugin data, falling back through the
    /// clone chain. Missing keys read as the empty string.
    pub fn plugin_data(&self, node: NodeRef, key: &str) -> Result<String> {
        self.check_alive(node)?;
        Ok(self.lookup(node, |record| record.plugin_data.get(key).cloned()))
    }

    /// All private plugin-data keys visible on a node: local keys first,
    /// then inherited ones, deduplicated.
    pub fn plugin_data_keys(&self, node: NodeRef) -> Result<Vec<String>> {
        self.check_alive(node)?;
        let mut keys = Vec::new();
        let mut current = Some(node);
        while let Some(handle) = current {
            let record = self.node(handle);
            for key in record.plugin_data.keys() {
                if !keys.contains(key) {
                    keys.push(key.clone());
                }
            }
            current = record.orig;
        }
        Ok(keys)
    }

    /// Write a node's shared plugin data under a namespace. An empty
    /// value deletes the local key.
    pub fn set_shared_plugin_data(
        &mut self,
        node: NodeRef,
        namespace: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<()> {
        self.check_alive(node)?;
        let namespace = namespace.into();
        let key = key.into();
        let value = value.into();
        let shared = &mut self.node_mut(node).shared_plugin_data;
        if value.is_empty() {
            if let Some(data) = shared.get_mut(&namespace) {
                data.remove(&key);
                if data.is_empty() {
                    shared.remove(&namespace);
                }
            }
        } else {
            shared.entry(namespace).or_default().insert(key, value);
        }
        Ok(())
    }

    /// Read a node's shared plugin data, falling back through the clone
    /// chain. Missing keys read as the empty string.
    pub fn shared_plugin_data(&self, node: NodeRef, namespace: &str, key: &str) -> Result<String> {
        self.check_alive(node)?;
        Ok(self.lookup(node, |record| {
            record
                .shared_plugin_data
                .get(namespace)
                .and_then(|data| data.get(key))
                .cloned()
        }))
    }

    /// All shared plugin-data keys visible on a node under a namespace.
    pub fn shared_plugin_data_keys(&self, node: NodeRef, namespace: &str) -> Result<Vec<String>> {
        self.check_alive(node)?;
        let mut keys = Vec::new();
        let mut current = Some(node);
        while let Some(handle) = current {
            let record = self.node(handle);
            if let Some(data) = record.shared_plugin_data.get(namespace) {
                for key in data.keys() {
                    if !keys.contains(key) {
                        keys.push(key.clone());
                    }
                }
            }
            current = record.orig;
        }
        Ok(keys)
    }

    /// Replace a node's relaunch data, a command-to-description map.
    pub fn set_relaunch_data(
        &mut self,
        node: NodeRef,
        data: impl IntoIterator<Item = (String, String)>,
    ) -> Result<()> {
        self.check_alive(node)?;
        self.node_mut(node).relaunch_data = data.into_iter().collect();
        Ok(())
    }

    /// A node's relaunch data. No clone fallback; relaunch entries are
    /// strictly local.
    pub fn relaunch_data(&self, node: NodeRef) -> Result<Vec<(String, String)>> {
        self.check_alive(node)?;
        Ok(self
            .node(node)
            .relaunch_data
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect())
    }

    fn check_alive(&self, node: NodeRef) -> Result<()> {
        if self.config.simulate_errors && self.node(node).removed {
            return Err(Error::RemovedNode(self.node(node).id.clone()));
        }
        Ok(())
    }

    fn lookup(
        &self,
        node: NodeRef,
        read: impl Fn(&crate::node::Node) -> Option<String>,
    ) -> String {
        let mut current = Some(node);
        while let Some(handle) = current {
            let record = self.node(handle);
            if let Some(value) = read(record) {
                return value;
            }
            current = record.orig;
        }
        String::new()
    }
}
