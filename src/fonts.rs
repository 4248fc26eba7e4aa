//! Font registry consumed by text-bearing nodes.
//!
//! The registry tracks which fonts a test has "loaded"; when error
//! simulation is on, character and resize mutations on text require the
//! node's font to be loaded first.

use serde::{Deserialize, Serialize};

/// A font family and style pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontName {
    pub family: String,
    pub style: String,
}

impl FontName {
    pub fn new(family: impl Into<String>, style: impl Into<String>) -> Self {
        Self {
            family: family.into(),
            style: style.into(),
        }
    }

    /// The font assigned to text nodes that never had one set.
    pub fn default_font() -> Self {
        Self::new("Inter", "Regular")
    }
}

/// An entry in the available-fonts catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Font {
    pub font_name: FontName,
}

/// Mutable set of loaded fonts plus the fixed catalog of available ones.
#[derive(Debug, Clone, Default)]
pub struct FontRegistry {
    loaded: Vec<FontName>,
}

impl FontRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a font has been loaded into the session.
    pub fn is_loaded(&self, font: &FontName) -> bool {
        self.loaded.contains(font)
    }

    /// Load a font; loading an already-loaded font is a no-op.
    pub fn load(&mut self, font: FontName) {
        if !self.is_loaded(&font) {
            self.loaded.push(font);
        }
    }

    /// Fonts loaded so far, in load order.
    pub fn loaded(&self) -> &[FontName] {
        &self.loaded
    }

    /// The full catalog of fonts the simulated host advertises.
    pub fn available(&self) -> Vec<Font> {
        let mut fonts = Vec::new();
        let families: [(&str, &[&str]); 3] = [
            (
                "Inter",
                &[
                    "Thin",
                    "Extra Light",
                    "Light",
                    "Regular",
                    "Medium",
                    "Semi Bold",
                    "Bold",
                    "Extra Bold",
                    "Black",
                    "Thin Italic",
                    "Extra Light Italic",
                    "Light Italic",
                    "Regular Italic",
                    "Medium Italic",
                    "Semi Bold Italic",
                    "Bold Italic",
                    "Extra Bold Italic",
                    "Black Italic",
                ],
            ),
            (
                "Roboto",
                &[
                    "Thin",
                    "Light",
                    "Regular",
                    "Medium",
                    "Bold",
                    "Black",
                    "Thin Italic",
                    "Light Italic",
                    "Regular Italic",
                    "Medium Italic",
                    "Bold Italic",
                    "Black Italic",
                ],
            ),
            (
                "Helvetica",
                &[
                    "Light",
                    "Regular",
                    "Bold",
                    "Light Oblique",
                    "Oblique",
                ],
            ),
        ];
        for (family, styles) in families {
            for style in styles {
                fonts.push(Font {
                    font_name: FontName::new(family, *style),
                });
            }
        }
        fonts
    }
}
