use std::collections::{BTreeMap, BTreeSet};

use eframe::egui::Color32;
use palette::{FromColor, Hsl, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// `n` distinct colours with hues spread evenly around the wheel, starting
/// at `hue_offset` degrees.
pub fn generate_palette(n: usize, hue_offset: f32) -> Vec<Color32> {
    let step = 360.0 / n.max(1) as f32;
    (0..n)
        .map(|i| {
            let hsl = Hsl::new(hue_offset + i as f32 * step, 0.65, 0.55);
            let rgb: Srgb<u8> = Srgb::<f32>::from_color(hsl).into_format();
            Color32::from_rgb(rgb.red, rgb.green, rgb.blue)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: category label → Color32
// ---------------------------------------------------------------------------

/// Maps the labels of one category column (Region, Product) to distinct
/// colours. Built from the base table so a label keeps its colour while the
/// filter changes.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl ColorMap {
    pub fn new(labels: &BTreeSet<String>, hue_offset: f32) -> Self {
        let palette = generate_palette(labels.len(), hue_offset);
        let mapping = labels.iter().cloned().zip(palette).collect();

        ColorMap {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a label.
    pub fn color_for(&self, label: &str) -> Color32 {
        self.mapping
            .get(label)
            .copied()
            .unwrap_or(self.default_color)
    }
}
