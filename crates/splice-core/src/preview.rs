//! # Preview Surface
//!
//! Resolves what the preview shows at the playhead: which layers are drawn, from which
//! source, with which transform, opacity, blend mode and filters.
//!
//! The result is plain data for the presentation layer; no pixels are produced here.
//! Numeric keyframes on `x`, `y`, `scale`, `rotation` and `opacity` override the layer's
//! static values.

use crate::animation::interpolate_number;
use crate::config::CanvasSize;
use crate::editor::EditorSession;
use crate::effects::css_filter_chain;
use crate::layer::Layer;
use crate::media::MediaRegistry;
use crate::types::{BlendMode, LayerId, LayerKind, MediaId, MediaKind};
use glam::{Affine2, Vec2};
use serde::{Deserialize, Serialize};

/// How the canvas is fitted into the viewport.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitMode {
    /// Whole canvas visible, letterboxed if aspect ratios differ.
    #[default]
    Contain,
    /// Viewport filled, canvas cropped if aspect ratios differ.
    Cover,
    /// Viewport filled, canvas stretched.
    Fill,
}

impl FitMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "contain" => Some(FitMode::Contain),
            "cover" => Some(FitMode::Cover),
            "fill" => Some(FitMode::Fill),
            _ => None,
        }
    }

    /// Scale taking the canvas into the viewport.
    pub fn scale(&self, canvas: CanvasSize, viewport: (f32, f32)) -> Vec2 {
        let sx = viewport.0 / canvas.width.max(1) as f32;
        let sy = viewport.1 / canvas.height.max(1) as f32;
        match self {
            FitMode::Contain => Vec2::splat(sx.min(sy)),
            FitMode::Cover => Vec2::splat(sx.max(sy)),
            FitMode::Fill => Vec2::new(sx, sy),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PreviewOptions {
    pub fit: FitMode,
    /// Viewport size in pixels; `None` renders at canvas size.
    pub viewport: Option<(f32, f32)>,
    /// Overrides the session's zoom percentage.
    pub zoom: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PreviewSource {
    Media {
        id: MediaId,
        kind: MediaKind,
        name: String,
        dimensions: Option<(u32, u32)>,
    },
    Text {
        content: String,
    },
    /// Shapes, stickers and overlays without backing media.
    Graphic {
        kind: LayerKind,
    },
    /// The layer names an asset the registry no longer holds.
    Missing {
        id: MediaId,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PreviewItem {
    pub layer: LayerId,
    pub name: String,
    pub source: PreviewSource,
    /// 0.0 to 1.0.
    pub opacity: f32,
    pub blend_mode: BlendMode,
    /// CSS `filter` value, if any effect maps to one.
    pub filter: Option<String>,
    /// Canvas-to-viewport affine of the layer's center, column-major `[a, b, c, d, e, f]`.
    pub transform: [f32; 6],
    /// Position inside the backing media, for media layers.
    pub media_time: Option<f64>,
}

impl PreviewItem {
    /// The transform as a CSS `matrix()` function.
    pub fn css_matrix(&self) -> String {
        let [a, b, c, d, e, f] = self.transform;
        format!("matrix({}, {}, {}, {}, {}, {})", a, b, c, d, e, f)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PreviewFrame {
    pub time: f64,
    /// Drawn size of the canvas in viewport pixels.
    pub size: (f32, f32),
    /// Bottom to top.
    pub items: Vec<PreviewItem>,
    /// Audio layers that are audible at this time.
    pub audible: Vec<LayerId>,
}

impl EditorSession {
    /// Builds the preview at the current playhead.
    pub fn render_preview(&self, options: &PreviewOptions) -> PreviewFrame {
        let zoom = options.zoom.unwrap_or(self.zoom());
        render_layers(
            self.visible_layers(),
            self.media(),
            self.current_time(),
            self.config().canvas,
            zoom,
            options,
        )
    }

    /// Dropping an asset on the preview adds it at the playhead, wherever it lands.
    pub fn drop_media(&mut self, media_id: MediaId) -> Option<LayerId> {
        self.add_layer_from_media(media_id, None)
    }
}

/// Pure mapping from active layers to preview items.
pub fn render_layers(
    layers: Vec<&Layer>,
    media: &MediaRegistry,
    time: f64,
    canvas: CanvasSize,
    zoom: f64,
    options: &PreviewOptions,
) -> PreviewFrame {
    let canvas_px = (canvas.width as f32, canvas.height as f32);
    let fit = match options.viewport {
        Some(viewport) => options.fit.scale(canvas, viewport),
        None => Vec2::ONE,
    };
    let view_scale = fit * (zoom as f32 / 100.0);
    let view = Affine2::from_scale(view_scale);

    let mut items = Vec::new();
    let mut audible = Vec::new();
    for layer in layers {
        if !layer.kind.is_visual() {
            audible.push(layer.id);
            continue;
        }
        items.push(render_item(layer, media, time, canvas_px, view));
    }

    PreviewFrame {
        time,
        size: (canvas_px.0 * view_scale.x, canvas_px.1 * view_scale.y),
        items,
        audible,
    }
}

fn render_item(layer: &Layer, media: &MediaRegistry, time: f64, canvas: (f32, f32), view: Affine2) -> PreviewItem {
    let keyed = |property: &str, fallback: f64| {
        interpolate_number(&layer.keyframes, time, property).unwrap_or(fallback)
    };
    let x = keyed("x", layer.transform.x) as f32;
    let y = keyed("y", layer.transform.y) as f32;
    let scale = keyed("scale", layer.transform.scale).max(0.0) as f32;
    let rotation = keyed("rotation", layer.transform.rotation) as f32;
    let opacity = keyed("opacity", layer.opacity).clamp(0.0, 100.0) as f32 / 100.0;

    let center = Vec2::new(canvas.0 / 2.0 + x, canvas.1 / 2.0 + y);
    let local = Affine2::from_scale_angle_translation(Vec2::splat(scale), rotation.to_radians(), center);

    let (source, media_time) = match layer.media_id {
        Some(id) => match media.get(id) {
            Some(asset) => {
                let media_time = match asset.kind {
                    MediaKind::Image => None,
                    MediaKind::Video | MediaKind::Audio => Some(layer.media_time(time)),
                };
                (
                    PreviewSource::Media {
                        id,
                        kind: asset.kind,
                        name: asset.name.clone(),
                        dimensions: asset.dimensions,
                    },
                    media_time,
                )
            }
            None => (PreviewSource::Missing { id }, None),
        },
        None => match &layer.content {
            Some(content) => (
                PreviewSource::Text {
                    content: content.clone(),
                },
                None,
            ),
            None => (PreviewSource::Graphic { kind: layer.kind }, None),
        },
    };

    PreviewItem {
        layer: layer.id,
        name: layer.name.clone(),
        source,
        opacity,
        blend_mode: layer.blend_mode,
        filter: css_filter_chain(&layer.effects),
        transform: (view * local).to_cols_array(),
        media_time,
    }
}
