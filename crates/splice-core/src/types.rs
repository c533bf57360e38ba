//! # Types Module
//!
//! Shared data types used across the editor.
//!
//! ## Responsibilities
//! - **Identifiers**: `LayerId` and `MediaId` opaque tokens.
//! - **Transform**: Static 2D placement of a layer (translation, scale, rotation).
//! - **BlendMode**: The fixed set of compositing rules.
//! - **LayerKind / MediaKind**: Closed classification enums.
//! - **Color**: Presentation-only color tags for the timeline UI.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Opaque identifier of a layer on the timeline.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LayerId(pub u64);

/// Opaque identifier of an asset owned by the media registry.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MediaId(pub u64);

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

fn next_id() -> u64 {
    NEXT_ID.fetch_add(1, Ordering::Relaxed)
}

impl LayerId {
    /// Allocates a fresh, process-unique layer id.
    pub fn fresh() -> Self {
        Self(next_id())
    }
}

impl MediaId {
    /// Allocates a fresh, process-unique media id.
    pub fn fresh() -> Self {
        Self(next_id())
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "layer-{}", self.0)
    }
}

impl fmt::Display for MediaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "media-{}", self.0)
    }
}

/// Classification of an uploaded asset.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Video,
    Image,
    Audio,
}

impl MediaKind {
    /// Classifies a MIME-like type string. Anything that isn't clearly an image
    /// or audio is treated as video.
    pub fn from_mime(mime: &str) -> Self {
        let mime = mime.trim().to_ascii_lowercase();
        if mime.starts_with("image/") {
            MediaKind::Image
        } else if mime.starts_with("audio/") {
            MediaKind::Audio
        } else {
            MediaKind::Video
        }
    }

    /// Classifies by file extension when no MIME type is available.
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "png" | "jpg" | "jpeg" | "gif" | "webp" | "bmp" | "tif" | "tiff" => MediaKind::Image,
            "wav" | "mp3" | "aac" | "m4a" | "flac" | "ogg" => MediaKind::Audio,
            _ => MediaKind::Video,
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MediaKind::Video => "video",
            MediaKind::Image => "image",
            MediaKind::Audio => "audio",
        };
        f.write_str(s)
    }
}

/// What a layer draws.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerKind {
    Video,
    Image,
    Text,
    Shape,
    Audio,
    Sticker,
    Overlay,
}

impl From<MediaKind> for LayerKind {
    fn from(kind: MediaKind) -> Self {
        match kind {
            MediaKind::Video => LayerKind::Video,
            MediaKind::Image => LayerKind::Image,
            MediaKind::Audio => LayerKind::Audio,
        }
    }
}

impl LayerKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "video" => Some(LayerKind::Video),
            "image" => Some(LayerKind::Image),
            "text" => Some(LayerKind::Text),
            "shape" => Some(LayerKind::Shape),
            "audio" => Some(LayerKind::Audio),
            "sticker" => Some(LayerKind::Sticker),
            "overlay" => Some(LayerKind::Overlay),
            _ => None,
        }
    }

    /// Audio layers are heard, not drawn.
    pub fn is_visual(&self) -> bool {
        !matches!(self, LayerKind::Audio)
    }
}

/// Compositing rule used when drawing a layer over what is already rendered.
///
/// Names follow CSS `mix-blend-mode`, which is what the presentation layer consumes.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlendMode {
    #[default]
    Normal,
    Multiply,
    Screen,
    Overlay,
    Darken,
    Lighten,
    ColorDodge,
    ColorBurn,
    HardLight,
    SoftLight,
    Difference,
    Exclusion,
    Hue,
    Saturation,
    Color,
    Luminosity,
}

impl BlendMode {
    pub const ALL: [BlendMode; 16] = [
        BlendMode::Normal,
        BlendMode::Multiply,
        BlendMode::Screen,
        BlendMode::Overlay,
        BlendMode::Darken,
        BlendMode::Lighten,
        BlendMode::ColorDodge,
        BlendMode::ColorBurn,
        BlendMode::HardLight,
        BlendMode::SoftLight,
        BlendMode::Difference,
        BlendMode::Exclusion,
        BlendMode::Hue,
        BlendMode::Saturation,
        BlendMode::Color,
        BlendMode::Luminosity,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BlendMode::Normal => "normal",
            BlendMode::Multiply => "multiply",
            BlendMode::Screen => "screen",
            BlendMode::Overlay => "overlay",
            BlendMode::Darken => "darken",
            BlendMode::Lighten => "lighten",
            BlendMode::ColorDodge => "color-dodge",
            BlendMode::ColorBurn => "color-burn",
            BlendMode::HardLight => "hard-light",
            BlendMode::SoftLight => "soft-light",
            BlendMode::Difference => "difference",
            BlendMode::Exclusion => "exclusion",
            BlendMode::Hue => "hue",
            BlendMode::Saturation => "saturation",
            BlendMode::Color => "color",
            BlendMode::Luminosity => "luminosity",
        }
    }

    /// Accepts both `color-dodge` and `color_dodge` spellings.
    pub fn parse(s: &str) -> Option<Self> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL.iter().copied().find(|m| m.as_str() == normalized)
    }
}

/// Static placement of a layer on the canvas.
///
/// `x`/`y` are offsets in canvas pixels from the centered position, `scale` is a
/// uniform multiplier and `rotation` is in degrees.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub x: f64,
    pub y: f64,
    pub scale: f64,
    pub rotation: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            scale: 1.0,
            rotation: 0.0,
        }
    }
}

/// Partial update for a [`Transform`]. `None` fields are left untouched.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TransformPatch {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub scale: Option<f64>,
    pub rotation: Option<f64>,
}

impl TransformPatch {
    pub fn apply(&self, target: &mut Transform) {
        if let Some(x) = self.x {
            target.x = x;
        }
        if let Some(y) = self.y {
            target.y = y;
        }
        if let Some(scale) = self.scale {
            target.scale = scale;
        }
        if let Some(rotation) = self.rotation {
            target.rotation = rotation;
        }
    }
}

/// Represents a RGB color tag shown on the timeline track (presentation only).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Palette used when tagging newly created layers.
    pub const PALETTE: [Color; 8] = [
        Color::rgb(0x3b, 0x82, 0xf6),
        Color::rgb(0x8b, 0x5c, 0xf6),
        Color::rgb(0xec, 0x48, 0x99),
        Color::rgb(0xef, 0x44, 0x44),
        Color::rgb(0xf5, 0x9e, 0x0b),
        Color::rgb(0x10, 0xb9, 0x81),
        Color::rgb(0x06, 0xb6, 0xd4),
        Color::rgb(0x84, 0xcc, 0x16),
    ];

    /// Picks a random palette entry.
    pub fn random_tag() -> Self {
        use rand::seq::SliceRandom;
        *Self::PALETTE
            .choose(&mut rand::thread_rng())
            .unwrap_or(&Self::PALETTE[0])
    }

    /// Helper to parse hex strings like "#RRGGBB" or "#RGB".
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        // Byte slicing below needs one byte per character.
        if !hex.is_ascii() {
            return None;
        }
        match hex.len() {
            6 => Some(Self::rgb(
                u8::from_str_radix(&hex[0..2], 16).ok()?,
                u8::from_str_radix(&hex[2..4], 16).ok()?,
                u8::from_str_radix(&hex[4..6], 16).ok()?,
            )),
            3 => {
                let r = u8::from_str_radix(&hex[0..1], 16).ok()?;
                let g = u8::from_str_radix(&hex[1..2], 16).ok()?;
                let b = u8::from_str_radix(&hex[2..3], 16).ok()?;
                Some(Self::rgb(r * 17, g * 17, b * 17))
            }
            _ => None,
        }
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}
