//! Paint and color types used by page backgrounds and geometry fills.

use serde::{Deserialize, Serialize};

/// An RGB color with components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Color {
    pub fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }
}

/// A paint applied to a fill, stroke, or page background.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum Paint {
    Solid {
        color: Color,
        #[serde(default = "default_visible")]
        visible: bool,
        #[serde(default = "default_opacity")]
        opacity: f64,
    },
    GradientLinear {
        gradient_stops: Vec<GradientStop>,
    },
}

fn default_visible() -> bool {
    true
}

fn default_opacity() -> f64 {
    1.0
}

/// A stop in a gradient paint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradientStop {
    pub position: f64,
    pub color: Color,
}

impl Paint {
    /// A fully opaque solid paint.
    pub fn solid(color: Color) -> Self {
        Paint::Solid {
            color,
            visible: true,
            opacity: 1.0,
        }
    }

    pub fn is_solid(&self) -> bool {
        matches!(self, Paint::Solid { .. })
    }

    /// The light-gray solid the host uses for fresh page backgrounds.
    pub fn default_background() -> Self {
        let component = 0.960_784_316_062_927_2;
        Paint::solid(Color::new(component, component, component))
    }
}
