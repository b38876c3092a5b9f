/// Width of one gallery card in pixels.
pub const CARD_WIDTH: f32 = 240.0;

/// Height of the thumbnail area of a card.
pub const CARD_IMAGE_HEIGHT: f32 = 180.0;

/// Gap between cards in the grid.
pub const CARD_SPACING: f32 = 16.0;

/// Longest side of decoded grid thumbnails.
pub const THUMBNAIL_MAX_SIDE: u32 = 512;

/// Margin between viewer controls and the window edge.
pub const OVERLAY_MARGIN: f32 = 16.0;

/// How long error toasts stay on screen, in seconds.
pub const ERROR_TOAST_SECONDS: f64 = 8.0;
