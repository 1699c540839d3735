//! Record colors

use egui::Color32;
use pc_core::{ColorTable, Hsl};

/// Stroke color of the unfiltered context lines
pub const CONTEXT_RGB: [u8; 3] = [0, 100, 160];

/// Convert an HSL triple and an alpha in `[0, 1]` to a color
pub fn hsla(hsl: Hsl, alpha: f32) -> Color32 {
    let [r, g, b] = hsl.to_rgb();
    Color32::from_rgba_unmultiplied(r, g, b, alpha_byte(alpha))
}

/// Color of a record label at the given alpha
pub fn label_color(table: &ColorTable, label: Option<&str>, alpha: f32) -> Color32 {
    hsla(table.lookup(label), alpha)
}

/// Context line color at the given alpha
pub fn context_color(alpha: f32) -> Color32 {
    let [r, g, b] = CONTEXT_RGB;
    Color32::from_rgba_unmultiplied(r, g, b, alpha_byte(alpha))
}

fn alpha_byte(alpha: f32) -> u8 {
    (alpha.clamp(0.0, 1.0) * 255.0).round() as u8
}
