//! # scene-sim
//!
//! A deterministic, in-memory scene-graph simulator for exercising
//! design-plugin code without a real host. A [`Session`] owns a node
//! tree seeded with a document root and one page, and exposes the host
//! surface plugins call: node factories, tree mutation, traversal,
//! component instantiation, layered plugin data, grouping and boolean
//! operations, text editing, style and font registries, and a message
//! bus with an explicit flush instead of timers.
//!
//! Everything is synchronous and allocation-only; there is no IO, no
//! clock, and no randomness, so a given call sequence always produces
//! the same ids, hashes, and event order.
//!
//! ## Example
//!
//! ```
//! use scene_sim::{Config, Session};
//!
//! let mut session = Session::new(Config::default());
//! let frame = session.create_frame();
//! let rect = session.create_rectangle();
//! session.append_child(frame, rect)?;
//!
//! assert_eq!(session.node(rect).id, "1:3");
//! assert_eq!(session.node(rect).parent, Some(frame));
//! # Ok::<(), scene_sim::Error>(())
//! ```
//!
//! ## Error simulation
//!
//! With [`Config::simulate_errors`] set, operations fail the way the
//! real host does (invalid root children, edits inside instances,
//! unloaded fonts, out-of-range text edits). With it clear, the same
//! calls silently no-op, which matches the permissive default.

pub mod config;
pub mod data;
pub mod error;
pub mod fonts;
pub mod group;
pub mod id;
pub mod instance;
pub mod message;
pub mod node;
pub mod paint;
pub mod query;
pub mod session;
pub mod style;
pub mod text;
pub mod tree;

pub use config::Config;
pub use error::{Error, Result};
pub use fonts::{Font, FontName, FontRegistry};
pub use id::{IdAllocator, TokenGenerator, FIRST_PAGE_ID, ROOT_ID};
pub use message::{EventChannel, ListenerId, MessageBus};
pub use node::{
    BooleanOperation, Constraints, ExportSetting, Geometry, Layout, Node, NodeKind, NodeRef,
    PageAttrs, TextAttrs, TextAutoResize,
};
pub use paint::{Color, GradientStop, Paint};
pub use session::Session;
pub use style::{Style, StyleKind, StyleRegistry};
pub use text::InsertPosition;

/// A node id string such as `"1:2"`.
pub type Guid = String;

/// A style id string such as `"S:<40 hex-ish chars>,"`.
pub type StyleId = String;

/// A 40-character image content hash.
pub type ImageHash = String;

/// Payload carried by events and UI messages.
pub type MessagePayload = serde_json::Value;
