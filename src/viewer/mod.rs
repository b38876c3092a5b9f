//! Zoom and pan image viewer.
//!
//! [`Viewer`] owns the transform state of one lightbox. The UI feeds it
//! [`ViewerInput`] events and draws [`Viewer::displayed_transform`] once per
//! frame. Image loading happens outside: [`Viewer::open`] hands out a
//! [`LoadTicket`] and the loader reports back through
//! [`Viewer::complete_load`].

pub mod hint;
pub mod input;
pub mod transform;
pub mod transition;

use std::time::{Duration, Instant};

use hint::HintTimer;
use log::{debug, info, warn};
use thiserror::Error;
use transform::{clamp_scale, fit_scale};
use transition::Transition;

pub use input::{KeyCommand, PanDirection, ViewerControl, ViewerInput};
pub use transform::{ImageSize, Point, Transform, Viewport};

pub const MIN_SCALE: f32 = 0.5;
pub const MAX_SCALE: f32 = 8.0;

/// Scale change for one zoom key press or button click.
pub const ZOOM_STEP: f32 = 0.25;

/// Scale change per wheel pixel.
pub const WHEEL_FACTOR: f32 = 0.002;

/// Pointer travel (per axis) before a press counts as a drag instead of a click.
pub const DRAG_THRESHOLD: f32 = 5.0;

/// Space kept free around the image when fitting to the viewport.
pub const FIT_PADDING: f32 = 40.0;

/// Pan distance for one arrow key press.
pub const KEY_PAN_STEP: f32 = 80.0;

/// How close to the fit scale counts as "fitted" for double-click toggling.
pub const FIT_TOLERANCE: f32 = 0.05;

pub const HINT_DURATION: Duration = Duration::from_millis(2500);
pub const TRANSITION_DURATION: Duration = Duration::from_millis(300);

/// Why an image could not be shown.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    #[error("image has no pixels")]
    EmptyImage,
    #[error("{0}")]
    Failed(String),
}

/// Handle for one in-flight image load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    pub generation: u64,
    pub source: String,
}

/// Result of reporting a finished load to the viewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The image is now displayed.
    Shown,
    /// This generation was already shown during the current open cycle.
    AlreadyShown,
    /// A newer open or a close superseded this load.
    Stale,
    /// The load failed; the viewer stayed as it was.
    Failed(LoadError),
}

/// Two-finger geometry latched on the previous touch update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinchState {
    pub distance: f32,
    pub midpoint: Point,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct DragOrigin {
    pointer: Point,
    pan: Point,
}

/// Everything the viewer knows about its transform and gestures.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerState {
    pub scale: f32,
    pub fit_scale: f32,
    pub pan_x: f32,
    pub pan_y: f32,
    /// Natural size of the displayed image
    pub image: Option<ImageSize>,
    pub is_open: bool,
    pub is_dragging: bool,
    /// Whether the current press moved past [`DRAG_THRESHOLD`]
    pub did_drag: bool,
    pub pinch: Option<PinchState>,
    drag_origin: Option<DragOrigin>,
}

impl Default for ViewerState {
    fn default() -> Self {
        Self {
            scale: 1.0,
            fit_scale: 1.0,
            pan_x: 0.0,
            pan_y: 0.0,
            image: None,
            is_open: false,
            is_dragging: false,
            did_drag: false,
            pinch: None,
            drag_origin: None,
        }
    }
}

impl ViewerState {
    pub fn transform(&self) -> Transform {
        Transform {
            scale: self.scale,
            pan_x: self.pan_x,
            pan_y: self.pan_y,
        }
    }

    fn set_transform(&mut self, transform: Transform) {
        self.scale = transform.scale;
        self.pan_x = transform.pan_x;
        self.pan_y = transform.pan_y;
    }
}

/// The image currently shown by the viewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenImage {
    pub source: String,
    pub alt: String,
    pub size: ImageSize,
}

#[derive(Debug, Clone)]
struct PendingOpen {
    generation: u64,
    source: String,
    alt: String,
}

/// Lightbox controller: state, lifecycle and input handling.
#[derive(Debug, Clone)]
pub struct Viewer {
    state: ViewerState,
    viewport: Viewport,
    generation: u64,
    pending: Option<PendingOpen>,
    /// Generation shown in the current open cycle, cleared on close.
    shown: Option<u64>,
    current: Option<OpenImage>,
    fit_on_next_frame: bool,
    scroll_locked: bool,
    hint: HintTimer,
    transition: Transition,
    displayed: Transform,
    zoom_label: String,
}

impl Viewer {
    pub fn new(viewport: Viewport) -> Self {
        let state = ViewerState::default();
        let transform = state.transform();
        Self {
            state,
            viewport,
            generation: 0,
            pending: None,
            shown: None,
            current: None,
            fit_on_next_frame: false,
            scroll_locked: false,
            hint: HintTimer::default(),
            transition: Transition::snap(transform),
            displayed: transform,
            zoom_label: format!("{}%", transform.zoom_percent()),
        }
    }

    pub fn state(&self) -> &ViewerState {
        &self.state
    }

    pub fn transform(&self) -> Transform {
        self.state.transform()
    }

    pub fn is_open(&self) -> bool {
        self.state.is_open
    }

    /// Whether the page behind the viewer must not scroll.
    pub fn scroll_locked(&self) -> bool {
        self.scroll_locked
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn zoom_label(&self) -> &str {
        &self.zoom_label
    }

    pub fn current_image(&self) -> Option<&OpenImage> {
        self.current.as_ref()
    }

    /// Whether a load is in flight.
    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn hint_visible(&self, now: Instant) -> bool {
        self.state.is_open && self.hint.is_visible(now)
    }

    pub fn hint_remaining(&self, now: Instant) -> Option<Duration> {
        self.hint.remaining(now)
    }

    /// Requests an image. Returns `None` when `source` is blank.
    ///
    /// The returned ticket supersedes any earlier one: only the newest
    /// generation can still open the viewer.
    pub fn open(&mut self, source: impl Into<String>, alt: impl Into<String>) -> Option<LoadTicket> {
        let source = source.into();
        if source.trim().is_empty() {
            debug!("Dropping viewer request without an image source");
            return None;
        }

        self.generation += 1;
        let generation = self.generation;
        if let Some(stale) = self.pending.replace(PendingOpen {
            generation,
            source: source.clone(),
            alt: alt.into(),
        }) {
            debug!(
                "Load of {} (generation {}) superseded",
                stale.source, stale.generation
            );
        }

        Some(LoadTicket { generation, source })
    }

    /// Reports the natural size of the image requested under `generation`.
    pub fn complete_load(
        &mut self,
        generation: u64,
        result: Result<ImageSize, LoadError>,
    ) -> LoadOutcome {
        let Some(pending) = self.pending.take_if(|p| p.generation == generation) else {
            if self.shown == Some(generation) {
                return LoadOutcome::AlreadyShown;
            }
            debug!("Ignoring stale image load (generation {generation})");
            return LoadOutcome::Stale;
        };

        let size = match result.and_then(|size| {
            if size.is_empty() {
                Err(LoadError::EmptyImage)
            } else {
                Ok(size)
            }
        }) {
            Ok(size) => size,
            Err(err) => {
                warn!("Failed to open {}: {err}", pending.source);
                return LoadOutcome::Failed(err);
            }
        };

        info!(
            "Viewing {} ({}x{})",
            pending.source, size.width, size.height
        );
        self.state.image = Some(size);
        self.current = Some(OpenImage {
            source: pending.source,
            alt: pending.alt,
            size,
        });
        self.show(generation);
        LoadOutcome::Shown
    }

    fn show(&mut self, generation: u64) {
        if self.shown == Some(generation) {
            return;
        }
        self.shown = Some(generation);
        self.state.is_open = true;
        self.scroll_locked = true;
        // Centering waits for the first frame that knows the viewport.
        self.fit_on_next_frame = true;
    }

    /// Per-frame hook: records the viewport, runs the deferred initial fit and
    /// expires the hint.
    pub fn begin_frame(&mut self, viewport: Viewport, now: Instant) {
        self.viewport = viewport;
        if self.fit_on_next_frame && self.state.is_open {
            self.fit_on_next_frame = false;
            self.zoom_to_fit(false);
            self.hint.show(now, HINT_DURATION);
        }
        self.hint.tick(now);
    }

    /// Hides the viewer and resets gesture state. Safe to call repeatedly.
    pub fn close(&mut self) {
        if self.state.is_open {
            debug!("Viewer closed");
        }
        self.state.is_open = false;
        self.state.is_dragging = false;
        self.state.did_drag = false;
        self.state.pinch = None;
        self.state.drag_origin = None;
        self.scroll_locked = false;
        self.shown = None;
        self.pending = None;
        self.fit_on_next_frame = false;
        self.hint.cancel();
    }

    /// Changes the scale by `delta` around `pivot`. Returns `false` when the
    /// clamped scale is unchanged.
    pub fn zoom_by(&mut self, delta: f32, pivot: Point) -> bool {
        let new_scale = clamp_scale(self.state.scale + delta);
        if new_scale == self.state.scale {
            return false;
        }
        let zoomed = self.state.transform().zoomed_about(new_scale, pivot);
        self.state.set_transform(zoomed);
        self.apply_transform(true);
        true
    }

    /// Fits the image inside the padded viewport (never above 1:1) and centers it.
    pub fn zoom_to_fit(&mut self, animate: bool) {
        let Some(image) = self.state.image else {
            return;
        };
        let fit = fit_scale(self.viewport, image);
        self.state.fit_scale = fit;
        self.state
            .set_transform(Transform::centered(self.viewport, image, fit));
        self.apply_transform(animate);
    }

    /// Shows the image at native size, centered.
    pub fn zoom_to_actual(&mut self) {
        let Some(image) = self.state.image else {
            return;
        };
        self.state
            .set_transform(Transform::centered(self.viewport, image, 1.0));
        self.apply_transform(true);
    }

    pub fn pan_by(&mut self, dx: f32, dy: f32) {
        self.state.pan_x += dx;
        self.state.pan_y += dy;
        self.apply_transform(true);
    }

    /// Dispatches one input event. Does nothing while the viewer is closed.
    pub fn handle(&mut self, input: ViewerInput) {
        if !self.state.is_open {
            return;
        }

        match input {
            ViewerInput::WheelZoom { delta_y, cursor } => {
                self.zoom_by(-delta_y * WHEEL_FACTOR, cursor);
            }
            ViewerInput::DragStart { pointer } => {
                self.state.is_dragging = true;
                self.state.did_drag = false;
                self.state.pinch = None;
                self.state.drag_origin = Some(DragOrigin {
                    pointer,
                    pan: Point::new(self.state.pan_x, self.state.pan_y),
                });
            }
            ViewerInput::DragMove { pointer } => self.drag_to(pointer),
            ViewerInput::DragEnd => {
                self.state.is_dragging = false;
                self.state.drag_origin = None;
                self.state.pinch = None;
            }
            ViewerInput::PinchStart { a, b } => {
                self.state.is_dragging = false;
                self.state.drag_origin = None;
                self.state.pinch = Some(PinchState {
                    distance: a.distance(b),
                    midpoint: a.midpoint(b),
                });
            }
            ViewerInput::PinchUpdate { a, b } => self.pinch_to(a, b),
            ViewerInput::Key(command) => self.run_key(command),
            ViewerInput::DoubleActivate => {
                if (self.state.scale - self.state.fit_scale).abs() < FIT_TOLERANCE {
                    self.zoom_to_actual();
                } else {
                    self.zoom_to_fit(true);
                }
            }
            ViewerInput::BackdropClick => {
                if !self.state.did_drag {
                    self.close();
                }
            }
            ViewerInput::Control(control) => self.run_control(control),
        }
    }

    fn drag_to(&mut self, pointer: Point) {
        if !self.state.is_dragging {
            return;
        }
        let Some(origin) = self.state.drag_origin else {
            return;
        };
        let dx = pointer.x - origin.pointer.x;
        let dy = pointer.y - origin.pointer.y;
        if dx.abs() > DRAG_THRESHOLD || dy.abs() > DRAG_THRESHOLD {
            self.state.did_drag = true;
        }
        self.state.pan_x = origin.pan.x + dx;
        self.state.pan_y = origin.pan.y + dy;
        self.apply_transform(false);
    }

    fn pinch_to(&mut self, a: Point, b: Point) {
        let current = PinchState {
            distance: a.distance(b),
            midpoint: a.midpoint(b),
        };
        let Some(last) = self.state.pinch.replace(current) else {
            return;
        };
        if last.distance <= 0.0 {
            return;
        }

        let new_scale = clamp_scale(self.state.scale * (current.distance / last.distance));
        let k = new_scale / self.state.scale;
        let mid = current.midpoint;

        // Zoom about the midpoint, then follow the midpoint's own travel.
        self.state.pan_x = mid.x - k * (mid.x - self.state.pan_x) + (mid.x - last.midpoint.x);
        self.state.pan_y = mid.y - k * (mid.y - self.state.pan_y) + (mid.y - last.midpoint.y);
        self.state.scale = new_scale;
        self.apply_transform(false);
    }

    fn run_key(&mut self, command: KeyCommand) {
        let center = self.viewport.center();
        match command {
            KeyCommand::ZoomIn => {
                self.zoom_by(ZOOM_STEP, center);
            }
            KeyCommand::ZoomOut => {
                self.zoom_by(-ZOOM_STEP, center);
            }
            KeyCommand::Fit => self.zoom_to_fit(true),
            KeyCommand::Actual => self.zoom_to_actual(),
            KeyCommand::Pan(direction) => {
                let (dx, dy) = direction.offset();
                self.pan_by(dx, dy);
            }
            KeyCommand::Close => self.close(),
        }
    }

    fn run_control(&mut self, control: ViewerControl) {
        let center = self.viewport.center();
        match control {
            ViewerControl::ZoomIn => {
                self.zoom_by(ZOOM_STEP, center);
            }
            ViewerControl::ZoomOut => {
                self.zoom_by(-ZOOM_STEP, center);
            }
            ViewerControl::Fit => self.zoom_to_fit(true),
            ViewerControl::Actual => self.zoom_to_actual(),
            ViewerControl::Close => self.close(),
        }
    }

    fn apply_transform(&mut self, animate: bool) {
        let target = self.state.transform();
        self.transition = if animate {
            Transition::animate(self.displayed, target, TRANSITION_DURATION)
        } else {
            Transition::snap(target)
        };
        self.zoom_label = format!("{}%", target.zoom_percent());
    }

    /// Transform to draw this frame, eased toward the applied transform.
    pub fn displayed_transform(&mut self, now: Instant) -> Transform {
        self.displayed = self.transition.sample(now);
        self.displayed
    }

    pub fn is_animating(&self, now: Instant) -> bool {
        self.transition.is_running(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close_to(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    fn open_viewer(width: u32, height: u32) -> Viewer {
        let mut viewer = Viewer::new(Viewport::new(1000.0, 800.0));
        let ticket = viewer.open("art/drift.png", "Drift").unwrap();
        assert_eq!(
            viewer.complete_load(ticket.generation, Ok(ImageSize::new(width, height))),
            LoadOutcome::Shown
        );
        viewer.begin_frame(Viewport::new(1000.0, 800.0), Instant::now());
        viewer
    }

    #[test]
    fn blank_source_is_dropped() {
        let mut viewer = Viewer::new(Viewport::new(1000.0, 800.0));
        assert!(viewer.open("   ", "").is_none());
        assert!(!viewer.is_loading());
    }

    #[test]
    fn viewer_stays_hidden_until_loaded() {
        let mut viewer = Viewer::new(Viewport::new(1000.0, 800.0));
        let ticket = viewer.open("art/drift.png", "Drift").unwrap();
        assert!(!viewer.is_open());
        assert!(viewer.is_loading());

        viewer.complete_load(ticket.generation, Ok(ImageSize::new(10, 10)));
        assert!(viewer.is_open());
        assert!(viewer.scroll_locked());
        assert_eq!(viewer.current_image().unwrap().alt, "Drift");
    }

    #[test]
    fn initial_fit_waits_for_first_frame() {
        let mut viewer = Viewer::new(Viewport::new(10.0, 10.0));
        let ticket = viewer.open("a.png", "").unwrap();
        viewer.complete_load(ticket.generation, Ok(ImageSize::new(2000, 1000)));
        assert_eq!(viewer.transform(), Transform::default());

        viewer.begin_frame(Viewport::new(1000.0, 800.0), Instant::now());
        let state = viewer.state();
        assert!(close_to(state.scale, 0.46));
        assert!(close_to(state.pan_x, 40.0));
        assert!(close_to(state.pan_y, 170.0));
        assert_eq!(viewer.zoom_label(), "46%");
    }

    #[test]
    fn superseded_load_is_stale() {
        let mut viewer = Viewer::new(Viewport::new(1000.0, 800.0));
        let first = viewer.open("a.png", "").unwrap();
        let second = viewer.open("b.png", "").unwrap();
        assert!(second.generation > first.generation);

        assert_eq!(
            viewer.complete_load(first.generation, Ok(ImageSize::new(10, 10))),
            LoadOutcome::Stale
        );
        assert!(!viewer.is_open());
        assert_eq!(
            viewer.complete_load(second.generation, Ok(ImageSize::new(10, 10))),
            LoadOutcome::Shown
        );
        assert_eq!(viewer.current_image().unwrap().source, "b.png");
    }

    #[test]
    fn duplicate_completion_is_ignored() {
        let mut viewer = Viewer::new(Viewport::new(1000.0, 800.0));
        let ticket = viewer.open("a.png", "").unwrap();
        viewer.complete_load(ticket.generation, Ok(ImageSize::new(10, 10)));
        assert_eq!(
            viewer.complete_load(ticket.generation, Ok(ImageSize::new(10, 10))),
            LoadOutcome::AlreadyShown
        );
    }

    #[test]
    fn close_cancels_in_flight_load() {
        let mut viewer = Viewer::new(Viewport::new(1000.0, 800.0));
        let ticket = viewer.open("a.png", "").unwrap();
        viewer.close();
        assert_eq!(
            viewer.complete_load(ticket.generation, Ok(ImageSize::new(10, 10))),
            LoadOutcome::Stale
        );
        assert!(!viewer.is_open());
    }

    #[test]
    fn failed_load_leaves_viewer_closed() {
        let mut viewer = Viewer::new(Viewport::new(1000.0, 800.0));
        let ticket = viewer.open("missing.png", "").unwrap();
        let outcome =
            viewer.complete_load(ticket.generation, Err(LoadError::Failed("404".to_owned())));
        assert_eq!(outcome, LoadOutcome::Failed(LoadError::Failed("404".to_owned())));
        assert!(!viewer.is_open());
        assert!(!viewer.scroll_locked());
    }

    #[test]
    fn zero_sized_image_is_rejected() {
        let mut viewer = Viewer::new(Viewport::new(1000.0, 800.0));
        let ticket = viewer.open("empty.png", "").unwrap();
        assert_eq!(
            viewer.complete_load(ticket.generation, Ok(ImageSize::new(0, 300))),
            LoadOutcome::Failed(LoadError::EmptyImage)
        );
        viewer.zoom_to_fit(false);
        assert_eq!(viewer.transform(), Transform::default());
    }

    #[test]
    fn handlers_are_inert_while_closed() {
        let mut viewer = open_viewer(2000, 1000);
        viewer.close();
        let before = viewer.state().clone();

        viewer.handle(ViewerInput::Key(KeyCommand::ZoomIn));
        viewer.handle(ViewerInput::Key(KeyCommand::Pan(PanDirection::Up)));
        viewer.handle(ViewerInput::WheelZoom {
            delta_y: -300.0,
            cursor: Point::new(10.0, 10.0),
        });
        viewer.handle(ViewerInput::DragStart {
            pointer: Point::new(0.0, 0.0),
        });
        viewer.handle(ViewerInput::DragMove {
            pointer: Point::new(50.0, 50.0),
        });
        assert_eq!(viewer.state(), &before);
    }

    #[test]
    fn wheel_zooms_at_cursor() {
        let mut viewer = open_viewer(2000, 1000);
        let cursor = Point::new(300.0, 200.0);
        let under_cursor = viewer.transform().to_image(cursor);

        viewer.handle(ViewerInput::WheelZoom {
            delta_y: -100.0,
            cursor,
        });
        assert!(close_to(viewer.state().scale, 0.66));
        let back = viewer.transform().to_viewport(under_cursor);
        assert!(close_to(back.x, cursor.x) && close_to(back.y, cursor.y));
    }

    #[test]
    fn clamped_zoom_is_a_no_op() {
        let mut viewer = open_viewer(100, 100);
        for _ in 0..40 {
            viewer.zoom_by(ZOOM_STEP, Point::new(0.0, 0.0));
        }
        assert_eq!(viewer.state().scale, MAX_SCALE);
        let before = viewer.transform();
        assert!(!viewer.zoom_by(ZOOM_STEP, Point::new(123.0, 45.0)));
        assert_eq!(viewer.transform(), before);
    }

    #[test]
    fn drag_pans_from_press_position() {
        let mut viewer = open_viewer(2000, 1000);
        let start = viewer.transform();

        viewer.handle(ViewerInput::DragStart {
            pointer: Point::new(100.0, 100.0),
        });
        viewer.handle(ViewerInput::DragMove {
            pointer: Point::new(130.0, 90.0),
        });
        viewer.handle(ViewerInput::DragMove {
            pointer: Point::new(160.0, 80.0),
        });
        let state = viewer.state();
        assert!(close_to(state.pan_x, start.pan_x + 60.0));
        assert!(close_to(state.pan_y, start.pan_y - 20.0));
        assert!(state.did_drag);

        viewer.handle(ViewerInput::DragEnd);
        assert!(!viewer.state().is_dragging);
        viewer.handle(ViewerInput::DragMove {
            pointer: Point::new(500.0, 500.0),
        });
        assert!(close_to(viewer.state().pan_x, start.pan_x + 60.0));
    }

    #[test]
    fn pinch_zooms_about_midpoint() {
        let mut viewer = open_viewer(2000, 1000);
        let a = Point::new(400.0, 400.0);
        let b = Point::new(600.0, 400.0);
        let mid = a.midpoint(b);
        let under_mid = viewer.transform().to_image(mid);

        viewer.handle(ViewerInput::PinchStart { a, b });
        viewer.handle(ViewerInput::PinchUpdate {
            a: Point::new(350.0, 400.0),
            b: Point::new(650.0, 400.0),
        });

        assert!(close_to(viewer.state().scale, 0.46 * 1.5));
        let back = viewer.transform().to_viewport(under_mid);
        assert!(close_to(back.x, mid.x) && close_to(back.y, mid.y));
    }

    #[test]
    fn pinch_follows_midpoint_travel() {
        let mut viewer = open_viewer(2000, 1000);
        let before = viewer.transform();

        viewer.handle(ViewerInput::PinchStart {
            a: Point::new(400.0, 400.0),
            b: Point::new(600.0, 400.0),
        });
        viewer.handle(ViewerInput::PinchUpdate {
            a: Point::new(420.0, 430.0),
            b: Point::new(620.0, 430.0),
        });

        let state = viewer.state();
        assert!(close_to(state.scale, before.scale));
        assert!(close_to(state.pan_x, before.pan_x + 20.0));
        assert!(close_to(state.pan_y, before.pan_y + 30.0));
    }

    #[test]
    fn keyboard_zoom_uses_viewport_center() {
        let mut viewer = open_viewer(2000, 1000);
        let center = viewer.viewport().center();
        let under_center = viewer.transform().to_image(center);

        viewer.handle(ViewerInput::Key(KeyCommand::ZoomIn));
        assert!(close_to(viewer.state().scale, 0.71));
        let back = viewer.transform().to_viewport(under_center);
        assert!(close_to(back.x, center.x) && close_to(back.y, center.y));

        // 0.71 - 0.25 lands below the floor.
        viewer.handle(ViewerInput::Key(KeyCommand::ZoomOut));
        assert_eq!(viewer.state().scale, MIN_SCALE);
    }

    #[test]
    fn fit_and_actual_keys() {
        let mut viewer = open_viewer(2000, 1000);
        viewer.handle(ViewerInput::Key(KeyCommand::Actual));
        assert_eq!(viewer.state().scale, 1.0);
        assert!(close_to(viewer.state().pan_x, -500.0));
        assert!(close_to(viewer.state().pan_y, -100.0));

        viewer.handle(ViewerInput::Key(KeyCommand::Fit));
        assert!(close_to(viewer.state().scale, 0.46));
    }

    #[test]
    fn arrow_keys_nudge_pan() {
        let mut viewer = open_viewer(2000, 1000);
        let start = viewer.transform();
        viewer.handle(ViewerInput::Key(KeyCommand::Pan(PanDirection::Down)));
        viewer.handle(ViewerInput::Key(KeyCommand::Pan(PanDirection::Right)));
        let state = viewer.state();
        assert!(close_to(state.pan_y, start.pan_y - 80.0));
        assert!(close_to(state.pan_x, start.pan_x - 80.0));
        assert_eq!(state.scale, start.scale);
    }

    #[test]
    fn escape_closes() {
        let mut viewer = open_viewer(2000, 1000);
        viewer.handle(ViewerInput::Key(KeyCommand::Close));
        assert!(!viewer.is_open());
        assert!(!viewer.scroll_locked());
    }

    #[test]
    fn controls_do_not_close_the_viewer() {
        let mut viewer = open_viewer(2000, 1000);
        viewer.handle(ViewerInput::Control(ViewerControl::ZoomIn));
        viewer.handle(ViewerInput::Control(ViewerControl::Actual));
        viewer.handle(ViewerInput::Control(ViewerControl::Fit));
        assert!(viewer.is_open());
        viewer.handle(ViewerInput::Control(ViewerControl::Close));
        assert!(!viewer.is_open());
    }

    #[test]
    fn close_during_drag_stops_panning() {
        let mut viewer = open_viewer(2000, 1000);
        viewer.handle(ViewerInput::DragStart {
            pointer: Point::new(0.0, 0.0),
        });
        viewer.close();
        assert!(!viewer.state().is_dragging);
        assert!(!viewer.state().did_drag);

        // Reopen: a stray move from the old gesture must not pan.
        let ticket = viewer.open("a.png", "").unwrap();
        viewer.complete_load(ticket.generation, Ok(ImageSize::new(2000, 1000)));
        viewer.begin_frame(Viewport::new(1000.0, 800.0), Instant::now());
        let fitted = viewer.transform();
        viewer.handle(ViewerInput::DragMove {
            pointer: Point::new(90.0, 90.0),
        });
        assert_eq!(viewer.transform(), fitted);
    }

    #[test]
    fn hint_shows_on_open_and_expires() {
        let mut viewer = Viewer::new(Viewport::new(1000.0, 800.0));
        let ticket = viewer.open("a.png", "").unwrap();
        viewer.complete_load(ticket.generation, Ok(ImageSize::new(10, 10)));
        let now = Instant::now();
        viewer.begin_frame(Viewport::new(1000.0, 800.0), now);
        assert!(viewer.hint_visible(now));

        let later = now + HINT_DURATION;
        viewer.begin_frame(Viewport::new(1000.0, 800.0), later);
        assert!(!viewer.hint_visible(later));
    }

    #[test]
    fn close_cancels_hint() {
        let mut viewer = open_viewer(10, 10);
        viewer.close();
        assert_eq!(viewer.hint_remaining(Instant::now()), None);
    }

    #[test]
    fn animated_zoom_eases_toward_target() {
        let mut viewer = open_viewer(2000, 1000);
        let now = Instant::now();
        assert!(close_to(viewer.displayed_transform(now).scale, 0.46));

        viewer.handle(ViewerInput::Key(KeyCommand::Actual));
        assert!(close_to(viewer.displayed_transform(now).scale, 0.46));
        assert!(viewer.is_animating(now));

        let done = now + TRANSITION_DURATION;
        assert_eq!(viewer.displayed_transform(done).scale, 1.0);
        assert!(!viewer.is_animating(done));
    }
}
