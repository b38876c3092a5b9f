/// Window width below which the navigation links collapse behind a toggle.
pub const COMPACT_BREAKPOINT: f32 = 720.0;

/// Collapsible navigation menu.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NavMenu {
    open: bool,
}

impl NavMenu {
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    /// Following any link closes the menu.
    pub fn follow_link(&mut self) {
        self.open = false;
    }

    /// Value for the toggle's `aria-expanded` state.
    pub fn aria_expanded(&self) -> &'static str {
        if self.open { "true" } else { "false" }
    }

    pub fn is_compact(width: f32) -> bool {
        width < COMPACT_BREAKPOINT
    }
}
