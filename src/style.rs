//! Style entities and their flat registry.
//!
//! Styles live outside the node tree: a flat id-to-style map plus one
//! creation-ordered list per kind. Removal tombstones the style and
//! drops it from the kind list; the registry keeps the tombstone so
//! that later reads through a stale id can raise the host's
//! "does not exist" error.

use crate::fonts::FontName;
use crate::paint::Paint;
use crate::StyleId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The kinds of style the host distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StyleKind {
    Paint,
    Effect,
    Text,
    Grid,
}

/// A lightweight style entity with its own plugin-data store.
///
/// Unlike nodes, styles have no clone-inheritance: their plugin data is
/// a plain local map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Style {
    pub id: StyleId,
    pub kind: StyleKind,
    pub name: String,
    pub description: String,
    pub removed: bool,
    pub remote: bool,
    pub plugin_data: BTreeMap<String, String>,
    pub shared_plugin_data: BTreeMap<String, BTreeMap<String, String>>,
    /// Paint styles only.
    pub paints: Vec<Paint>,
    /// Text styles only.
    pub font_name: Option<FontName>,
}

impl Style {
    pub fn new(id: impl Into<StyleId>, kind: StyleKind) -> Self {
        Self {
            id: id.into(),
            kind,
            name: String::new(),
            description: String::new(),
            removed: false,
            remote: false,
            plugin_data: BTreeMap::new(),
            shared_plugin_data: BTreeMap::new(),
            paints: Vec::new(),
            font_name: (kind == StyleKind::Text).then(FontName::default_font),
        }
    }
}

/// Flat registry: id map plus per-kind creation-order lists.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleRegistry {
    styles: BTreeMap<StyleId, Style>,
    paint: Vec<StyleId>,
    effect: Vec<StyleId>,
    text: Vec<StyleId>,
    grid: Vec<StyleId>,
}

impl StyleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn kind_list_mut(&mut self, kind: StyleKind) -> &mut Vec<StyleId> {
        match kind {
            StyleKind::Paint => &mut self.paint,
            StyleKind::Effect => &mut self.effect,
            StyleKind::Text => &mut self.text,
            StyleKind::Grid => &mut self.grid,
        }
    }

    fn kind_list(&self, kind: StyleKind) -> &[StyleId] {
        match kind {
            StyleKind::Paint => &self.paint,
            StyleKind::Effect => &self.effect,
            StyleKind::Text => &self.text,
            StyleKind::Grid => &self.grid,
        }
    }

    /// Register a new style into both structures.
    pub fn insert(&mut self, style: Style) {
        self.kind_list_mut(style.kind).push(style.id.clone());
        self.styles.insert(style.id.clone(), style);
    }

    /// Look up a style, tombstoned or not.
    pub fn get(&self, id: &str) -> Option<&Style> {
        self.styles.get(id)
    }

    /// Mutable lookup, tombstoned or not.
    pub fn get_mut(&mut self, id: &str) -> Option<&mut Style> {
        self.styles.get_mut(id)
    }

    /// Look up a live style.
    pub fn get_active(&self, id: &str) -> Option<&Style> {
        self.styles.get(id).filter(|style| !style.removed)
    }

    /// Tombstone a style and drop it from its kind list.
    pub fn remove(&mut self, id: &str) {
        if let Some(style) = self.styles.get_mut(id) {
            style.removed = true;
            let kind = style.kind;
            self.kind_list_mut(kind).retain(|entry| entry != id);
        }
    }

    /// Live styles of one kind, in creation order.
    pub fn local(&self, kind: StyleKind) -> Vec<&Style> {
        self.kind_list(kind)
            .iter()
            .filter_map(|id| self.get_active(id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_lookup() {
        let mut registry = StyleRegistry::new();
        registry.insert(Style::new("S:abc,", StyleKind::Paint));

        assert!(registry.get("S:abc,").is_some());
        assert!(registry.get_active("S:abc,").is_some());
        assert_eq!(registry.local(StyleKind::Paint).len(), 1);
        assert!(registry.local(StyleKind::Effect).is_empty());
    }

    #[test]
    fn remove_tombstones_and_unlists() {
        let mut registry = StyleRegistry::new();
        registry.insert(Style::new("S:abc,", StyleKind::Paint));
        registry.insert(Style::new("S:def,", StyleKind::Paint));

        registry.remove("S:abc,");

        // Tombstone stays reachable through the raw lookup.
        assert!(registry.get("S:abc,").is_some_and(|style| style.removed));
        assert!(registry.get_active("S:abc,").is_none());

        let local = registry.local(StyleKind::Paint);
        assert_eq!(local.len(), 1);
        assert_eq!(local[0].id, "S:def,");
    }

    #[test]
    fn local_preserves_creation_order() {
        let mut registry = StyleRegistry::new();
        for id in ["S:c,", "S:a,", "S:b,"] {
            registry.insert(Style::new(id, StyleKind::Text));
        }

        let ids: Vec<_> = registry
            .local(StyleKind::Text)
            .iter()
            .map(|style| style.id.clone())
            .collect();
        assert_eq!(ids, vec!["S:c,", "S:a,", "S:b,"]);
    }

    #[test]
    fn text_styles_get_default_font() {
        let style = Style::new("S:t,", StyleKind::Text);
        assert_eq!(style.font_name, Some(FontName::default_font()));
        assert_eq!(Style::new("S:p,", StyleKind::Paint).font_name, None);
    }
}
