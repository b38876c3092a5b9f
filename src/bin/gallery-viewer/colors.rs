//! Color constants for the gallery and the viewer overlay.

use eframe::egui::Color32;

// Viewer overlay
pub const BACKDROP: Color32 = Color32::from_rgba_premultiplied(8, 8, 10, 242);
pub const CONTROL_FILL: Color32 = Color32::from_rgba_premultiplied(24, 24, 28, 220);
pub const HINT_FILL: Color32 = Color32::from_rgba_premultiplied(0, 0, 0, 180);
pub const HINT_TEXT: Color32 = Color32::from_rgba_premultiplied(235, 235, 235, 235);

// Gallery cards
pub const CARD_FILL: Color32 = Color32::from_rgb(30, 30, 34);
pub const CARD_PLACEHOLDER: Color32 = Color32::from_rgb(48, 48, 54);
pub const CARD_CAPTION: Color32 = Color32::from_rgb(160, 160, 168);

// Filter tabs and accents
pub const ACCENT: Color32 = Color32::from_rgb(255, 94, 120);
