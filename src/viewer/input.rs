//! Platform-independent viewer input events.
//!
//! The UI layer translates raw pointer, touch and keyboard events into these
//! and feeds them to [`Viewer::handle`](super::Viewer::handle).

use super::KEY_PAN_STEP;
use super::transform::Point;

/// A single input event for an open viewer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewerInput {
    /// Wheel scroll. Positive `delta_y` scrolls down (zooms out).
    WheelZoom { delta_y: f32, cursor: Point },
    /// Primary button pressed, or a single finger touched down.
    DragStart { pointer: Point },
    /// Pointer or finger moved.
    DragMove { pointer: Point },
    /// Pointer released or all fingers lifted.
    DragEnd,
    /// A second finger touched down.
    PinchStart { a: Point, b: Point },
    /// Either finger of a two-finger gesture moved.
    PinchUpdate { a: Point, b: Point },
    Key(KeyCommand),
    /// Double click or double tap on the canvas.
    DoubleActivate,
    /// Click on the backdrop around the image.
    BackdropClick,
    /// One of the on-screen control buttons.
    Control(ViewerControl),
}

/// Keyboard shortcuts understood by the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    /// `+` or `=`
    ZoomIn,
    /// `-` or `_`
    ZoomOut,
    /// `0`
    Fit,
    /// `1`
    Actual,
    /// Arrow keys
    Pan(PanDirection),
    /// `Escape`
    Close,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanDirection {
    Up,
    Down,
    Left,
    Right,
}

impl PanDirection {
    /// Pan offset for one key press.
    ///
    /// The image moves toward the arrow's opposite side: `Up` reveals what is
    /// above, so the image shifts down.
    pub fn offset(self) -> (f32, f32) {
        match self {
            PanDirection::Up => (0.0, KEY_PAN_STEP),
            PanDirection::Down => (0.0, -KEY_PAN_STEP),
            PanDirection::Left => (KEY_PAN_STEP, 0.0),
            PanDirection::Right => (-KEY_PAN_STEP, 0.0),
        }
    }
}

/// On-screen control buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerControl {
    ZoomIn,
    ZoomOut,
    Fit,
    Actual,
    Close,
}
