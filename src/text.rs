//! Text editing on text-capable nodes.
//!
//! Character mutation mirrors the host contract: every edit requires
//! the node's effective font to have been loaded first, and range
//! arguments are validated against the character count (not byte
//! length) before anything changes. Sticky, shape-with-text, and
//! connector nodes edit their text sublayer through the same calls.

use crate::error::{Error, Result};
use crate::fonts::FontName;
use crate::node::{NodeRef, TextAutoResize};
use crate::session::Session;

/// Which neighbor's styling inserted characters inherit. The model
/// tracks styling at node granularity, so this only mirrors the host
/// signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InsertPosition {
    #[default]
    Before,
    After,
}

impl Session {
    /// A node's characters. Non-text nodes read as empty.
    pub fn characters(&self, node: NodeRef) -> String {
        self.node(node)
            .text
            .as_ref()
            .map(|text| text.characters.clone())
            .unwrap_or_default()
    }

    /// Replace a node's characters wholesale.
    pub fn set_characters(&mut self, node: NodeRef, characters: impl Into<String>) -> Result<()> {
        self.check_font(node)?;
        if let Some(text) = self.node_mut(node).text.as_mut() {
            text.characters = characters.into();
        }
        Ok(())
    }

    /// A node's effective font.
    pub fn font_name(&self, node: NodeRef) -> FontName {
        self.node(node)
            .text
            .as_ref()
            .map(|text| text.effective_font())
            .unwrap_or_else(FontName::default_font)
    }

    /// Assign a node's font. The new font must already be loaded.
    pub fn set_font_name(&mut self, node: NodeRef, font: FontName) -> Result<()> {
        if self.config.simulate_errors && !self.fonts.is_loaded(&font) {
            return Err(Error::UnloadedFont {
                family: font.family,
                style: font.style,
            });
        }
        if let Some(text) = self.node_mut(node).text.as_mut() {
            text.font_name = Some(font);
        }
        Ok(())
    }

    /// How the node resizes to fit its characters, if set.
    pub fn text_auto_resize(&self, node: NodeRef) -> Option<TextAutoResize> {
        self.node(node).text.as_ref().and_then(|text| text.auto_resize)
    }

    /// Set how the node resizes to fit its characters.
    pub fn set_text_auto_resize(&mut self, node: NodeRef, mode: TextAutoResize) {
        if let Some(text) = self.node_mut(node).text.as_mut() {
            text.auto_resize = Some(mode);
        }
    }

    /// Splice `characters` in at character index `start`.
    pub fn insert_characters(
        &mut self,
        node: NodeRef,
        start: usize,
        characters: &str,
        _position: InsertPosition,
    ) -> Result<()> {
        self.check_font(node)?;
        let len = self.char_len(node);
        if self.config.simulate_errors && start > len {
            return Err(Error::RangeOutOfBounds { index: start, len });
        }
        if let Some(text) = self.node_mut(node).text.as_mut() {
            let byte = byte_index(&text.characters, start);
            text.characters.insert_str(byte, characters);
        }
        Ok(())
    }

    /// Delete the character range `[start, end)`.
    pub fn delete_characters(&mut self, node: NodeRef, start: usize, end: usize) -> Result<()> {
        self.check_font(node)?;
        let len = self.char_len(node);
        if self.config.simulate_errors {
            if end > len {
                return Err(Error::RangeOutOfBounds { index: end, len });
            }
            if start > end {
                return Err(Error::RangeOutOfBounds { index: start, len: end });
            }
        }
        if let Some(text) = self.node_mut(node).text.as_mut() {
            let from = byte_index(&text.characters, start.min(end));
            let to = byte_index(&text.characters, end);
            text.characters.replace_range(from..to, "");
        }
        Ok(())
    }

    /// The font covering the character range `[start, end)`. The model
    /// has one font per node, so any non-empty in-bounds range reports
    /// the node font.
    pub fn get_range_font_name(&self, node: NodeRef, start: usize, end: usize) -> Result<FontName> {
        if self.config.simulate_errors {
            let len = self.char_len(node);
            if end > len || start > end {
                return Err(Error::RangeOutOfBounds { index: end, len });
            }
            if start == end {
                return Err(Error::EmptyRange);
            }
        }
        Ok(self.font_name(node))
    }

    fn check_font(&self, node: NodeRef) -> Result<()> {
        if !self.config.simulate_errors {
            return Ok(());
        }
        let font = self.font_name(node);
        if self.fonts.is_loaded(&font) {
            return Ok(());
        }
        Err(Error::UnloadedFont {
            family: font.family,
            style: font.style,
        })
    }

    fn char_len(&self, node: NodeRef) -> usize {
        self.node(node)
            .text
            .as_ref()
            .map(|text| text.characters.chars().count())
            .unwrap_or(0)
    }
}

fn byte_index(characters: &str, char_index: usize) -> usize {
    characters
        .char_indices()
        .nth(char_index)
        .map(|(byte, _)| byte)
        .unwrap_or(characters.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn strict_with_font() -> (Session, NodeRef) {
        let mut session = Session::new(Config::strict());
        session.load_font(FontName::default_font());
        let text = session.create_text();
        (session, text)
    }

    #[test]
    fn edits_require_a_loaded_font() {
        let mut session = Session::new(Config::strict());
        let text = session.create_text();

        assert_eq!(
            session.set_characters(text, "hello"),
            Err(Error::UnloadedFont {
                family: "Inter".into(),
                style: "Regular".into(),
            })
        );

        session.load_font(FontName::default_font());
        session.set_characters(text, "hello").unwrap();
        assert_eq!(session.characters(text), "hello");
    }

    #[test]
    fn permissive_mode_skips_the_font_gate() {
        let mut session = Session::default();
        let text = session.create_text();
        session.set_characters(text, "hello").unwrap();
        assert_eq!(session.characters(text), "hello");
    }

    #[test]
    fn set_font_name_requires_the_new_font() {
        let (mut session, text) = strict_with_font();
        let bold = FontName::new("Roboto", "Bold");

        assert_eq!(
            session.set_font_name(text, bold.clone()),
            Err(Error::UnloadedFont {
                family: "Roboto".into(),
                style: "Bold".into(),
            })
        );

        session.load_font(bold.clone());
        session.set_font_name(text, bold.clone()).unwrap();
        assert_eq!(session.font_name(text), bold);
    }

    #[test]
    fn insert_splices_at_char_index() {
        let (mut session, text) = strict_with_font();
        session.set_characters(text, "held").unwrap();

        session
            .insert_characters(text, 2, "llo wor", InsertPosition::Before)
            .unwrap();
        assert_eq!(session.characters(text), "hello world");

        assert_eq!(
            session.insert_characters(text, 99, "!", InsertPosition::After),
            Err(Error::RangeOutOfBounds { index: 99, len: 11 })
        );
    }

    #[test]
    fn delete_removes_half_open_range() {
        let (mut session, text) = strict_with_font();
        session.set_characters(text, "hello world").unwrap();

        session.delete_characters(text, 5, 11).unwrap();
        assert_eq!(session.characters(text), "hello");

        // Deleting [0, 0) is a no-op, not an error.
        session.delete_characters(text, 0, 0).unwrap();
        assert_eq!(session.characters(text), "hello");

        assert_eq!(
            session.delete_characters(text, 0, 99),
            Err(Error::RangeOutOfBounds { index: 99, len: 5 })
        );
        assert_eq!(
            session.delete_characters(text, 3, 1),
            Err(Error::RangeOutOfBounds { index: 3, len: 1 })
        );
    }

    #[test]
    fn indices_count_characters_not_bytes() {
        let (mut session, text) = strict_with_font();
        session.set_characters(text, "héllo").unwrap();

        session.delete_characters(text, 1, 2).unwrap();
        assert_eq!(session.characters(text), "hllo");

        session
            .insert_characters(text, 1, "é", InsertPosition::Before)
            .unwrap();
        assert_eq!(session.characters(text), "héllo");
    }

    #[test]
    fn range_font_lookup_validates_the_range() {
        let (mut session, text) = strict_with_font();
        session.set_characters(text, "hello").unwrap();

        assert_eq!(
            session.get_range_font_name(text, 0, 5).unwrap(),
            FontName::default_font()
        );
        assert_eq!(
            session.get_range_font_name(text, 2, 2),
            Err(Error::EmptyRange)
        );
        assert_eq!(
            session.get_range_font_name(text, 0, 6),
            Err(Error::RangeOutOfBounds { index: 6, len: 5 })
        );
    }

    #[test]
    fn sublayer_kinds_edit_through_the_same_calls() {
        let mut session = Session::new(Config::strict());
        session.load_font(FontName::default_font());

        for node in [
            session.create_sticky(),
            session.create_shape_with_text(),
            session.create_connector(),
        ] {
            session.set_characters(node, "note").unwrap();
            assert_eq!(session.characters(node), "note");
        }

        // Rectangles have no text sublayer; reads are empty and writes
        // are ignored.
        let rect = session.create_rectangle();
        session.set_characters(rect, "ignored").unwrap();
        assert_eq!(session.characters(rect), "");
    }

    #[test]
    fn auto_resize_modes_stick() {
        let (mut session, text) = strict_with_font();
        assert_eq!(session.text_auto_resize(text), None);
        session.set_text_auto_resize(text, TextAutoResize::WidthAndHeight);
        assert_eq!(
            session.text_auto_resize(text),
            Some(TextAutoResize::WidthAndHeight)
        );
    }
}
