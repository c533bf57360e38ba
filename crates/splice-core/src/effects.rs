//! # Effects
//!
//! Named visual effects attached to a layer. A layer's effect list is ordered and may hold
//! duplicates; names the editor doesn't know are kept as [`Effect::Unknown`] and render as
//! nothing.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Effect {
    Blur,
    Brightness,
    Contrast,
    Saturate,
    Grayscale,
    Sepia,
    Invert,
    HueRotate,
    Vignette,
    Glow,
    Unknown(String),
}

impl Effect {
    /// Parses an effect name. Never fails: unrecognised names become `Unknown`.
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "blur" => Effect::Blur,
            "brightness" => Effect::Brightness,
            "contrast" => Effect::Contrast,
            "saturate" | "saturation" => Effect::Saturate,
            "grayscale" | "greyscale" => Effect::Grayscale,
            "sepia" => Effect::Sepia,
            "invert" => Effect::Invert,
            "hue-rotate" | "hue" => Effect::HueRotate,
            "vignette" => Effect::Vignette,
            "glow" => Effect::Glow,
            _ => Effect::Unknown(name.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Effect::Blur => "blur",
            Effect::Brightness => "brightness",
            Effect::Contrast => "contrast",
            Effect::Saturate => "saturate",
            Effect::Grayscale => "grayscale",
            Effect::Sepia => "sepia",
            Effect::Invert => "invert",
            Effect::HueRotate => "hue-rotate",
            Effect::Vignette => "vignette",
            Effect::Glow => "glow",
            Effect::Unknown(name) => name,
        }
    }

    /// CSS filter function for the presentation layer.
    ///
    /// Vignette and glow are drawn as overlays rather than filters.
    pub fn css_filter(&self) -> Option<&'static str> {
        match self {
            Effect::Blur => Some("blur(4px)"),
            Effect::Brightness => Some("brightness(1.3)"),
            Effect::Contrast => Some("contrast(1.4)"),
            Effect::Saturate => Some("saturate(1.8)"),
            Effect::Grayscale => Some("grayscale(1)"),
            Effect::Sepia => Some("sepia(1)"),
            Effect::Invert => Some("invert(1)"),
            Effect::HueRotate => Some("hue-rotate(90deg)"),
            Effect::Vignette | Effect::Glow | Effect::Unknown(_) => None,
        }
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<&str> for Effect {
    fn from(name: &str) -> Self {
        Effect::parse(name)
    }
}

/// Joins the filters of an effect list into one CSS `filter` value.
pub fn css_filter_chain(effects: &[Effect]) -> Option<String> {
    let parts: Vec<&str> = effects.iter().filter_map(Effect::css_filter).collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" "))
    }
}
