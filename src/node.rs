//! Node entity model: kinds, capabilities, and the node record itself.
//!
//! The host expresses shared behavior through mixins copied onto each
//! node class at runtime. Here the same capability table is static: a
//! [`NodeKind`] answers which capabilities it carries, and
//! [`Node::new`] materializes exactly the payloads those capabilities
//! need. Capability sets never change for the life of a node, with the
//! single exception of instance detachment, which retypes the kind tag
//! in place.

use crate::fonts::FontName;
use crate::paint::Paint;
use crate::Guid;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Non-owning handle to a node in a session's node table.
///
/// Handles are only meaningful for the [`Session`](crate::Session) that
/// produced them. Ownership of a node is strictly its parent's
/// `children` vector; `parent`, `orig`, and `main_component` are plain
/// back-references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeRef(pub(crate) usize);

/// The closed set of node kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeKind {
    Document,
    Page,
    Frame,
    Group,
    BooleanOperation,
    Component,
    Instance,
    Rectangle,
    Text,
    ShapeWithText,
    Sticky,
    Connector,
}

impl NodeKind {
    /// Whether nodes of this kind hold ordered children.
    pub fn is_container(self) -> bool {
        matches!(
            self,
            NodeKind::Document
                | NodeKind::Page
                | NodeKind::Frame
                | NodeKind::Group
                | NodeKind::BooleanOperation
                | NodeKind::Component
                | NodeKind::Instance
        )
    }

    /// Whether nodes of this kind carry position and size.
    pub fn has_layout(self) -> bool {
        !matches!(self, NodeKind::Document | NodeKind::Page | NodeKind::Connector)
    }

    /// Whether nodes of this kind carry fills and strokes.
    pub fn has_geometry(self) -> bool {
        matches!(
            self,
            NodeKind::Frame
                | NodeKind::Component
                | NodeKind::Rectangle
                | NodeKind::Text
                | NodeKind::ShapeWithText
        )
    }

    /// Whether nodes of this kind can be exported.
    pub fn has_export(self) -> bool {
        !matches!(self, NodeKind::Document | NodeKind::Connector)
    }

    /// Whether nodes of this kind own a text sublayer.
    pub fn has_text(self) -> bool {
        matches!(
            self,
            NodeKind::Text | NodeKind::ShapeWithText | NodeKind::Sticky | NodeKind::Connector
        )
    }
}

/// Layout constraints relative to the containing frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Constraints {
    pub horizontal: String,
    pub vertical: String,
}

/// Position and size payload for layout-capable kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layout {
    pub x: f64,
    pub y: f64,
    pub rotation: f64,
    pub width: f64,
    pub height: f64,
    pub constraints: Option<Constraints>,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            rotation: 0.0,
            width: 100.0,
            height: 100.0,
            constraints: None,
        }
    }
}

/// Fill and stroke payload for geometry-capable kinds.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Geometry {
    pub fills: Vec<Paint>,
    pub strokes: Vec<Paint>,
    pub stroke_weight: f64,
}

/// How a text node resizes to fit its characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TextAutoResize {
    None,
    WidthAndHeight,
    Height,
    Truncate,
}

/// Text payload shared by text nodes and text sublayers.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextAttrs {
    /// `None` reads as the default font.
    pub font_name: Option<FontName>,
    pub characters: String,
    pub auto_resize: Option<TextAutoResize>,
}

impl TextAttrs {
    /// The effective font: the explicit one, or the host default.
    pub fn effective_font(&self) -> FontName {
        self.font_name.clone().unwrap_or_else(FontName::default_font)
    }
}

/// Page-only payload.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageAttrs {
    pub selection: Vec<NodeRef>,
    /// `None` reads as the default light-gray solid.
    pub backgrounds: Option<Vec<Paint>>,
}

/// One entry in an export-capable node's export settings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportSetting {
    pub format: String,
    pub suffix: String,
}

/// The boolean operation a `BooleanOperation` node applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BooleanOperation {
    Union,
    Intersect,
    Subtract,
    Exclude,
}

/// A node in the simulated document tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Globally unique within the session; assigned once at creation.
    pub id: Guid,
    pub kind: NodeKind,
    pub name: String,
    /// Tombstone flag set by `remove`; the node stays in the table.
    pub removed: bool,
    pub parent: Option<NodeRef>,
    /// Sole ownership edge; order is authoritative sibling order.
    pub children: Vec<NodeRef>,
    /// Local plugin data overrides. BTreeMap keeps key enumeration
    /// deterministic.
    pub plugin_data: BTreeMap<String, String>,
    pub shared_plugin_data: BTreeMap<String, BTreeMap<String, String>>,
    pub relaunch_data: BTreeMap<String, String>,
    /// The node this one was cloned from, if any.
    pub orig: Option<NodeRef>,
    /// For instances, the component they were instantiated from.
    pub main_component: Option<NodeRef>,
    pub layout: Option<Layout>,
    pub geometry: Option<Geometry>,
    pub text: Option<TextAttrs>,
    pub page: Option<PageAttrs>,
    /// Export-capable kinds only; empty until a test assigns settings.
    pub export_settings: Option<Vec<ExportSetting>>,
    pub boolean_operation: Option<BooleanOperation>,
}

impl Node {
    /// Create a node of the given kind with the capability payloads the
    /// kind's static table calls for.
    pub fn new(id: impl Into<Guid>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            kind,
            name: String::new(),
            removed: false,
            parent: None,
            children: Vec::new(),
            plugin_data: BTreeMap::new(),
            shared_plugin_data: BTreeMap::new(),
            relaunch_data: BTreeMap::new(),
            orig: None,
            main_component: None,
            layout: kind.has_layout().then(Layout::default),
            geometry: kind.has_geometry().then(Geometry::default),
            text: kind.has_text().then(TextAttrs::default),
            page: (kind == NodeKind::Page).then(PageAttrs::default),
            export_settings: kind.has_export().then(Vec::new),
            boolean_operation: None,
        }
    }
}
