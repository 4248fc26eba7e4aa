//! The simulated document session.
//!
//! A [`Session`] owns everything the host would hold as process-wide
//! state: the node table, id allocator, font and style registries, the
//! message bus, and the image store. Constructing a session seeds the
//! document root (`"0:0"`) and a default current page (`"0:1"`); every
//! later node comes from one of the `create_*` factories.
//!
//! Tree mutation, traversal, cloning, plugin data, and grouping live in
//! sibling modules as further `impl Session` blocks.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::fonts::{Font, FontName, FontRegistry};
use crate::id::{IdAllocator, TokenGenerator, FIRST_PAGE_ID, ROOT_ID};
use crate::message::{EventChannel, ListenerId, MessageBus};
use crate::node::{Constraints, Node, NodeKind, NodeRef};
use crate::paint::Paint;
use crate::style::{Style, StyleKind, StyleRegistry};
use crate::{Guid, ImageHash, MessagePayload, StyleId};
use std::collections::BTreeMap;

/// Seed for the session's token generator. Fixed so that style ids and
/// image hashes are reproducible across runs.
const TOKEN_SEED: u64 = 0x5ce7e_51b;

/// An in-memory document with the host surface plugins exercise.
#[derive(Debug)]
pub struct Session {
    pub(crate) config: Config,
    pub(crate) allocator: IdAllocator,
    pub(crate) tokens: TokenGenerator,
    pub(crate) nodes: Vec<Node>,
    pub(crate) root: NodeRef,
    pub(crate) current_page: NodeRef,
    pub(crate) fonts: FontRegistry,
    pub(crate) styles: StyleRegistry,
    pub(crate) bus: MessageBus,
    pub(crate) images: BTreeMap<ImageHash, Vec<u8>>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl Session {
    /// Create a session with a seeded root and default page.
    pub fn new(config: Config) -> Self {
        let mut nodes = Vec::new();

        let root = NodeRef(0);
        nodes.push(Node::new(ROOT_ID, NodeKind::Document));

        let page = NodeRef(1);
        let mut page_node = Node::new(FIRST_PAGE_ID, NodeKind::Page);
        page_node.parent = Some(root);
        nodes.push(page_node);
        nodes[root.0].children.push(page);

        Self {
            config,
            allocator: IdAllocator::new(),
            tokens: TokenGenerator::new(TOKEN_SEED),
            nodes,
            root,
            current_page: page,
            fonts: FontRegistry::new(),
            styles: StyleRegistry::new(),
            bus: MessageBus::new(config.without_timeout),
            images: BTreeMap::new(),
        }
    }

    /// The active configuration.
    pub fn config(&self) -> Config {
        self.config
    }

    // ------------------------------------------------------------------
    // Node access
    // ------------------------------------------------------------------

    /// Borrow a node. The handle must come from this session.
    pub fn node(&self, node: NodeRef) -> &Node {
        &self.nodes[node.0]
    }

    /// Mutably borrow a node. The handle must come from this session.
    pub fn node_mut(&mut self, node: NodeRef) -> &mut Node {
        &mut self.nodes[node.0]
    }

    /// The document root.
    pub fn root(&self) -> NodeRef {
        self.root
    }

    /// The current page.
    pub fn current_page(&self) -> NodeRef {
        self.current_page
    }

    /// Switch the current page, notifying `currentpagechange` listeners.
    pub fn set_current_page(&mut self, page: NodeRef) {
        self.current_page = page;
        self.bus
            .emit(EventChannel::CurrentPageChange, MessagePayload::Null);
    }

    /// The current page's selection.
    pub fn selection(&self) -> Vec<NodeRef> {
        self.node(self.current_page)
            .page
            .as_ref()
            .map(|page| page.selection.clone())
            .unwrap_or_default()
    }

    /// Replace the current page's selection, notifying
    /// `selectionchange` listeners.
    pub fn set_selection(&mut self, nodes: Vec<NodeRef>) {
        let page = self.current_page;
        if let Some(attrs) = self.node_mut(page).page.as_mut() {
            attrs.selection = nodes;
        }
        self.bus
            .emit(EventChannel::SelectionChange, MessagePayload::Null);
    }

    /// Find a node by its string id, searching the root's subtree in
    /// document order. Detached subtrees are not searched.
    pub fn get_node_by_id(&self, id: &str) -> Option<NodeRef> {
        fn search(session: &Session, node: NodeRef, id: &str) -> Option<NodeRef> {
            if session.node(node).id == id {
                return Some(node);
            }
            for &child in &session.node(node).children {
                if let Some(found) = search(session, child, id) {
                    return Some(found);
                }
            }
            None
        }
        search(self, self.root, id)
    }

    /// Test hook: replace a node's id. Ordinary code never reassigns
    /// ids after creation.
    pub fn override_node_id(&mut self, node: NodeRef, id: impl Into<Guid>) {
        self.node_mut(node).id = id.into();
    }

    // ------------------------------------------------------------------
    // Factories
    // ------------------------------------------------------------------

    fn create_node(&mut self, kind: NodeKind, bump_major: bool, parent: NodeRef) -> NodeRef {
        let id = self.allocator.allocate(bump_major);
        let node = NodeRef(self.nodes.len());
        let mut record = Node::new(id, kind);
        record.parent = Some(parent);
        self.nodes.push(record);
        self.nodes[parent.0].children.push(node);
        node
    }

    /// Create a page under the root. Page creation bumps the major
    /// counter.
    pub fn create_page(&mut self) -> NodeRef {
        let root = self.root;
        self.create_node(NodeKind::Page, true, root)
    }

    /// Create a frame on the current page.
    pub fn create_frame(&mut self) -> NodeRef {
        let page = self.current_page;
        self.create_node(NodeKind::Frame, false, page)
    }

    /// Create a component on the current page.
    pub fn create_component(&mut self) -> NodeRef {
        let page = self.current_page;
        self.create_node(NodeKind::Component, false, page)
    }

    /// Create a rectangle on the current page.
    pub fn create_rectangle(&mut self) -> NodeRef {
        let page = self.current_page;
        self.create_node(NodeKind::Rectangle, false, page)
    }

    /// Create a text node on the current page.
    pub fn create_text(&mut self) -> NodeRef {
        let page = self.current_page;
        self.create_node(NodeKind::Text, false, page)
    }

    /// Create a shape-with-text on the current page.
    pub fn create_shape_with_text(&mut self) -> NodeRef {
        let page = self.current_page;
        self.create_node(NodeKind::ShapeWithText, false, page)
    }

    /// Create a sticky on the current page.
    pub fn create_sticky(&mut self) -> NodeRef {
        let page = self.current_page;
        self.create_node(NodeKind::Sticky, false, page)
    }

    /// Create a connector on the current page.
    pub fn create_connector(&mut self) -> NodeRef {
        let page = self.current_page;
        self.create_node(NodeKind::Connector, false, page)
    }

    /// Register image bytes and return their content hash.
    pub fn create_image(&mut self, bytes: Vec<u8>) -> ImageHash {
        let hash = self.tokens.image_hash();
        self.images.insert(hash.clone(), bytes);
        hash
    }

    /// Bytes previously registered under a content hash.
    pub fn image_bytes(&self, hash: &str) -> Option<&[u8]> {
        self.images.get(hash).map(Vec::as_slice)
    }

    // ------------------------------------------------------------------
    // Page backgrounds
    // ------------------------------------------------------------------

    /// A page's backgrounds, defaulting to the host's light-gray solid.
    pub fn backgrounds(&self, page: NodeRef) -> Vec<Paint> {
        self.node(page)
            .page
            .as_ref()
            .and_then(|attrs| attrs.backgrounds.clone())
            .unwrap_or_else(|| vec![Paint::default_background()])
    }

    /// Assign a page's backgrounds; must be exactly one solid paint.
    pub fn set_backgrounds(&mut self, page: NodeRef, paints: Vec<Paint>) -> Result<()> {
        if self.config.simulate_errors && (paints.len() != 1 || !paints[0].is_solid()) {
            return Err(Error::InvalidBackground);
        }
        if let Some(attrs) = self.node_mut(page).page.as_mut() {
            attrs.backgrounds = Some(paints);
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Layout
    // ------------------------------------------------------------------

    /// Assign layout constraints. Group nodes reject the property
    /// outright; the host treats it as non-extensible there.
    pub fn set_constraints(&mut self, node: NodeRef, constraints: Constraints) -> Result<()> {
        if self.node(node).kind == NodeKind::Group {
            if self.config.simulate_errors {
                return Err(Error::FrozenProperty("constraints"));
            }
            return Ok(());
        }
        if let Some(layout) = self.node_mut(node).layout.as_mut() {
            layout.constraints = Some(constraints);
        }
        Ok(())
    }

    /// Resize a node, enforcing the 0.01 minimum and instance
    /// immutability.
    pub fn resize(&mut self, node: NodeRef, width: f64, height: f64) -> Result<()> {
        if self.config.simulate_errors {
            if self.is_inside_instance(node) {
                return Err(Error::LayoutInsideInstance);
            }
            if width < 0.01 {
                return Err(Error::DimensionTooSmall {
                    op: "resize",
                    arg: "width",
                });
            }
            if height < 0.01 {
                return Err(Error::DimensionTooSmall {
                    op: "resize",
                    arg: "height",
                });
            }
        }
        self.apply_size(node, width, height);
        Ok(())
    }

    /// Resize without any validation, mirroring the host's
    /// `resizeWithoutConstraints`.
    pub fn resize_without_constraints(&mut self, node: NodeRef, width: f64, height: f64) {
        self.apply_size(node, width, height);
    }

    /// Scale a node's size by a factor, enforcing the 0.01 minimum.
    pub fn rescale(&mut self, node: NodeRef, scale: f64) -> Result<()> {
        if self.config.simulate_errors && scale < 0.01 {
            return Err(Error::DimensionTooSmall {
                op: "rescale",
                arg: "scale",
            });
        }
        if let Some(layout) = self.node_mut(node).layout.as_mut() {
            layout.width *= scale;
            layout.height *= scale;
        }
        Ok(())
    }

    fn apply_size(&mut self, node: NodeRef, width: f64, height: f64) {
        if let Some(layout) = self.node_mut(node).layout.as_mut() {
            layout.width = width;
            layout.height = height;
        }
    }

    // ------------------------------------------------------------------
    // Fonts
    // ------------------------------------------------------------------

    /// Load a font into the session; idempotent.
    pub fn load_font(&mut self, font: FontName) {
        self.fonts.load(font);
    }

    /// Whether a font has been loaded.
    pub fn is_font_loaded(&self, font: &FontName) -> bool {
        self.fonts.is_loaded(font)
    }

    /// The catalog of available fonts.
    pub fn available_fonts(&self) -> Vec<Font> {
        self.fonts.available()
    }

    // ------------------------------------------------------------------
    // Styles
    // ------------------------------------------------------------------

    fn create_style(&mut self, kind: StyleKind) -> StyleId {
        let id = self.tokens.style_id();
        self.styles.insert(Style::new(id.clone(), kind));
        id
    }

    /// Create and register a paint style.
    pub fn create_paint_style(&mut self) -> StyleId {
        self.create_style(StyleKind::Paint)
    }

    /// Create and register an effect style.
    pub fn create_effect_style(&mut self) -> StyleId {
        self.create_style(StyleKind::Effect)
    }

    /// Create and register a text style.
    pub fn create_text_style(&mut self) -> StyleId {
        self.create_style(StyleKind::Text)
    }

    /// Create and register a grid style.
    pub fn create_grid_style(&mut self) -> StyleId {
        self.create_style(StyleKind::Grid)
    }

    /// Look up a live style by id.
    pub fn get_style_by_id(&self, id: &str) -> Option<&Style> {
        self.styles.get_active(id)
    }

    /// Mutably borrow a style, tombstoned or not.
    pub fn style_mut(&mut self, id: &str) -> Option<&mut Style> {
        self.styles.get_mut(id)
    }

    /// Live paint styles in creation order.
    pub fn local_paint_styles(&self) -> Vec<&Style> {
        self.styles.local(StyleKind::Paint)
    }

    /// Live effect styles in creation order.
    pub fn local_effect_styles(&self) -> Vec<&Style> {
        self.styles.local(StyleKind::Effect)
    }

    /// Live text styles in creation order.
    pub fn local_text_styles(&self) -> Vec<&Style> {
        self.styles.local(StyleKind::Text)
    }

    /// Live grid styles in creation order.
    pub fn local_grid_styles(&self) -> Vec<&Style> {
        self.styles.local(StyleKind::Grid)
    }

    /// Tombstone a style and drop it from its kind list.
    pub fn remove_style(&mut self, id: &str) {
        self.styles.remove(id);
    }

    /// Set a style's local plugin data.
    pub fn set_style_plugin_data(&mut self, id: &str, key: impl Into<String>, value: impl Into<String>) {
        if let Some(style) = self.styles.get_mut(id) {
            style.plugin_data.insert(key.into(), value.into());
        }
    }

    /// Read a style's local plugin data.
    pub fn style_plugin_data(&self, id: &str, key: &str) -> Result<Option<String>> {
        let Some(style) = self.styles.get(id) else {
            return Ok(None);
        };
        if self.config.simulate_errors && style.removed {
            return Err(Error::RemovedStyle(style.id.clone()));
        }
        Ok(style.plugin_data.get(key).cloned())
    }

    /// All local plugin-data keys on a style.
    pub fn style_plugin_data_keys(&self, id: &str) -> Result<Vec<String>> {
        let Some(style) = self.styles.get(id) else {
            return Ok(Vec::new());
        };
        if self.config.simulate_errors && style.removed {
            return Err(Error::RemovedStyle(style.id.clone()));
        }
        Ok(style.plugin_data.keys().cloned().collect())
    }

    // ------------------------------------------------------------------
    // Messaging
    // ------------------------------------------------------------------

    /// Register an event listener.
    pub fn on(
        &mut self,
        channel: EventChannel,
        callback: impl FnMut(&MessagePayload) + 'static,
    ) -> ListenerId {
        self.bus.on(channel, callback)
    }

    /// Register a listener removed after its first dispatch.
    pub fn once(
        &mut self,
        channel: EventChannel,
        callback: impl FnMut(&MessagePayload) + 'static,
    ) -> ListenerId {
        self.bus.once(channel, callback)
    }

    /// Remove a listener.
    pub fn off(&mut self, channel: EventChannel, id: ListenerId) {
        self.bus.off(channel, id);
    }

    /// Install the outbound delivery function the harness provides.
    pub fn set_ui_sink(&mut self, sink: impl FnMut(&MessagePayload) + 'static) {
        self.bus.set_ui_sink(sink);
    }

    /// Send a message from the plugin to the UI.
    pub fn post_message(&mut self, payload: MessagePayload) {
        self.bus.emit_ui(payload);
    }

    /// Send a message from the UI to the plugin's `message` listeners.
    pub fn post_message_to_plugin(&mut self, payload: MessagePayload) {
        self.bus.emit(EventChannel::Message, payload);
    }

    /// Deliver all queued messages.
    pub fn flush_messages(&mut self) {
        self.bus.flush();
    }

    /// Number of deliveries waiting for a flush.
    pub fn pending_messages(&self) -> usize {
        self.bus.pending()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn seeded_ids() {
        let session = Session::default();
        assert_eq!(session.node(session.root()).id, "0:0");
        assert_eq!(session.node(session.current_page()).id, "0:1");
        assert_eq!(
            session.node(session.root()).children,
            vec![session.current_page()]
        );
    }

    #[test]
    fn node_ids_are_deterministic() {
        let mut session = Session::default();
        let rect1 = session.create_rectangle();
        let rect2 = session.create_rectangle();
        assert_eq!(session.node(rect1).id, "1:2");
        assert_eq!(session.node(rect2).id, "1:3");
    }

    #[test]
    fn page_ids_increment() {
        let mut session = Session::default();
        let page2 = session.create_page();
        let page3 = session.create_page();
        let page4 = session.create_page();
        assert_eq!(session.node(page2).id, "1:1");
        assert_eq!(session.node(page3).id, "2:1");
        assert_eq!(session.node(page4).id, "3:1");
    }

    #[test]
    fn node_ids_after_page_increment() {
        let mut session = Session::default();
        let rect1 = session.create_rectangle();
        let rect2 = session.create_rectangle();
        let page2 = session.create_page();
        let rect3 = session.create_rectangle();
        let rect4 = session.create_rectangle();

        assert_eq!(session.node(rect1).id, "1:2");
        assert_eq!(session.node(rect2).id, "1:3");
        assert_eq!(session.node(page2).id, "1:1");
        assert_eq!(session.node(rect3).id, "2:5");
        assert_eq!(session.node(rect4).id, "2:6");
    }

    #[test]
    fn factories_attach_to_current_page() {
        let mut session = Session::default();
        let frame = session.create_frame();
        assert_eq!(session.node(frame).parent, Some(session.current_page()));
        assert!(session
            .node(session.current_page())
            .children
            .contains(&frame));
    }

    #[test]
    fn get_node_by_id_finds_nested_nodes() {
        let mut session = Session::default();
        let frame = session.create_frame();
        let rect = session.create_rectangle();
        session.append_child(frame, rect).unwrap();
        session.override_node_id(rect, "9:9");

        assert_eq!(session.get_node_by_id("9:9"), Some(rect));
        assert_eq!(session.get_node_by_id("0:0"), Some(session.root()));
        assert_eq!(session.get_node_by_id("nope"), None);
    }

    #[test]
    fn get_node_by_id_returns_first_match_in_document_order() {
        let mut session = Session::default();
        let rect1 = session.create_rectangle();
        let rect2 = session.create_rectangle();
        session.override_node_id(rect1, "2:2");
        session.override_node_id(rect2, "2:2");

        assert_eq!(session.get_node_by_id("2:2"), Some(rect1));
    }

    #[test]
    fn style_id_shape() {
        let mut session = Session::default();
        let id = session.create_paint_style();
        assert_eq!(id.len(), 43);
        assert!(session.get_style_by_id(&id).is_some());
        assert_eq!(session.local_paint_styles().len(), 1);
    }

    #[test]
    fn removed_style_reads_fail() {
        let mut session = Session::new(Config::strict());
        let id = session.create_paint_style();
        session.set_style_plugin_data(&id, "key", "value");
        session.remove_style(&id);

        assert_eq!(
            session.style_plugin_data(&id, "key"),
            Err(Error::RemovedStyle(id.clone()))
        );
        assert!(session.local_paint_styles().is_empty());
    }

    #[test]
    fn image_roundtrip() {
        let mut session = Session::default();
        let hash = session.create_image(vec![1, 2, 3]);
        assert_eq!(hash.len(), 40);
        assert_eq!(session.image_bytes(&hash), Some(&[1u8, 2, 3][..]));
        assert_eq!(session.image_bytes("missing"), None);
    }

    #[test]
    fn backgrounds_default_to_solid_gray() {
        let mut session = Session::default();
        let page = session.create_page();
        let backgrounds = session.backgrounds(page);
        assert_eq!(backgrounds.len(), 1);
        assert!(backgrounds[0].is_solid());
    }

    #[test]
    fn backgrounds_must_be_single_solid() {
        let mut session = Session::new(Config::strict());
        let page = session.create_page();

        assert_eq!(
            session.set_backgrounds(page, vec![]),
            Err(Error::InvalidBackground)
        );
        let solid = Paint::default_background();
        assert_eq!(
            session.set_backgrounds(page, vec![solid.clone(), solid.clone()]),
            Err(Error::InvalidBackground)
        );
        assert_eq!(
            session.set_backgrounds(
                page,
                vec![Paint::GradientLinear {
                    gradient_stops: vec![]
                }]
            ),
            Err(Error::InvalidBackground)
        );

        session.set_backgrounds(page, vec![solid.clone()]).unwrap();
        assert_eq!(session.backgrounds(page), vec![solid]);
    }

    #[test]
    fn group_constraints_are_frozen() {
        let mut session = Session::new(Config::strict());
        let rect = session.create_rectangle();
        let page = session.current_page();
        let group = session.group(&[rect], page, None).unwrap();

        let constraints = Constraints {
            horizontal: "MIN".into(),
            vertical: "MIN".into(),
        };
        assert_eq!(
            session.set_constraints(group, constraints.clone()),
            Err(Error::FrozenProperty("constraints"))
        );

        // Permissive mode ignores the assignment instead.
        let mut permissive = Session::default();
        let rect = permissive.create_rectangle();
        let page = permissive.current_page();
        let group = permissive.group(&[rect], page, None).unwrap();
        permissive.set_constraints(group, constraints).unwrap();
    }

    #[test]
    fn resize_validates_dimensions() {
        let mut session = Session::new(Config::strict());
        let rect = session.create_rectangle();

        assert_eq!(
            session.resize(rect, 0.001, 10.0),
            Err(Error::DimensionTooSmall {
                op: "resize",
                arg: "width"
            })
        );
        session.resize(rect, 20.0, 30.0).unwrap();
        let layout = session.node(rect).layout.as_ref().unwrap();
        assert_eq!((layout.width, layout.height), (20.0, 30.0));
    }

    #[test]
    fn rescale_multiplies_size() {
        let mut session = Session::new(Config::strict());
        let rect = session.create_rectangle();
        session.resize(rect, 10.0, 40.0).unwrap();
        session.rescale(rect, 2.0).unwrap();

        let layout = session.node(rect).layout.as_ref().unwrap();
        assert_eq!((layout.width, layout.height), (20.0, 80.0));

        assert_eq!(
            session.rescale(rect, 0.0),
            Err(Error::DimensionTooSmall {
                op: "rescale",
                arg: "scale"
            })
        );
    }

    #[test]
    fn resize_inside_instance_fails() {
        let mut session = Session::new(Config::strict());
        let component = session.create_component();
        let rect = session.create_rectangle();
        session.append_child(component, rect).unwrap();

        let instance = session.create_instance(component);
        let cloned_rect = session.node(instance).children[0];
        assert_eq!(
            session.resize(cloned_rect, 10.0, 10.0),
            Err(Error::LayoutInsideInstance)
        );

        // resizeWithoutConstraints skips all validation.
        session.resize_without_constraints(cloned_rect, 10.0, 10.0);
    }

    #[test]
    fn current_page_change_event_fires() {
        let mut session = Session::new(Config {
            without_timeout: true,
            ..Config::default()
        });
        let fired = Rc::new(RefCell::new(0));
        let counter = fired.clone();
        session.on(EventChannel::CurrentPageChange, move |_| {
            *counter.borrow_mut() += 1;
        });

        let page = session.create_page();
        session.set_current_page(page);
        assert_eq!(*fired.borrow(), 1);
        assert_eq!(session.current_page(), page);
    }

    #[test]
    fn selection_change_event_is_queued_without_timeout_flag() {
        let mut session = Session::default();
        let fired = Rc::new(RefCell::new(0));
        let counter = fired.clone();
        session.on(EventChannel::SelectionChange, move |_| {
            *counter.borrow_mut() += 1;
        });

        let rect = session.create_rectangle();
        session.set_selection(vec![rect]);
        assert_eq!(*fired.borrow(), 0);
        assert_eq!(session.pending_messages(), 1);

        session.flush_messages();
        assert_eq!(*fired.borrow(), 1);
        assert_eq!(session.selection(), vec![rect]);
    }

    #[test]
    fn plugin_and_ui_messages_roundtrip() {
        let mut session = Session::default();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let inbound = seen.clone();
        session.on(EventChannel::Message, move |payload| {
            inbound.borrow_mut().push(payload.clone());
        });
        let outbound = seen.clone();
        session.set_ui_sink(move |payload| {
            outbound.borrow_mut().push(payload.clone());
        });

        session.post_message_to_plugin(json!("to-plugin"));
        session.post_message(json!("to-ui"));
        session.flush_messages();

        assert_eq!(*seen.borrow(), vec![json!("to-plugin"), json!("to-ui")]);
    }
}
