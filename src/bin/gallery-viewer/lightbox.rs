//! Full-window viewer overlay.
//!
//! Translates egui pointer, wheel and touch input into [`ViewerInput`] events
//! and draws the image with the viewer's current transform.

use crate::GalleryApp;
use crate::colors;
use crate::constants::OVERLAY_MARGIN;
use eframe::egui;
use gallery_viewer::viewer::{Point, Transform, ViewerControl, ViewerInput};
use std::time::Instant;

const HINT_TEXT: &str =
    "Scroll or pinch to zoom · Drag to pan · Double-click to toggle fit · Esc to close";

fn to_point(pos: egui::Pos2, origin: egui::Pos2) -> Point {
    Point::new(pos.x - origin.x, pos.y - origin.y)
}

/// Follows raw touch events to recognize two-finger gestures.
///
/// Single-finger drags arrive as pointer events, so only the pinch
/// transitions are reported here.
#[derive(Debug, Default)]
pub struct TouchTracker {
    active: Vec<(egui::TouchId, egui::Pos2)>,
}

impl TouchTracker {
    fn pair_ids(&self) -> Option<(egui::TouchId, egui::TouchId)> {
        match self.active.as_slice() {
            [(a, _), (b, _), ..] => Some((*a, *b)),
            _ => None,
        }
    }

    /// Feeds one touch event and returns the viewer input it implies.
    pub fn update(
        &mut self,
        id: egui::TouchId,
        phase: egui::TouchPhase,
        pos: egui::Pos2,
        origin: egui::Pos2,
    ) -> Option<ViewerInput> {
        let pair_before = self.pair_ids();

        match phase {
            egui::TouchPhase::Start => {
                if !self.active.iter().any(|(touch, _)| *touch == id) {
                    self.active.push((id, pos));
                }
            }
            egui::TouchPhase::Move => {
                if let Some(entry) = self.active.iter_mut().find(|(touch, _)| *touch == id) {
                    entry.1 = pos;
                }
            }
            egui::TouchPhase::End | egui::TouchPhase::Cancel => {
                self.active.retain(|(touch, _)| *touch != id);
            }
        }

        let pair_after = self.pair_ids();
        match (pair_before, pair_after) {
            (_, Some(_)) => {
                let a = to_point(self.active[0].1, origin);
                let b = to_point(self.active[1].1, origin);
                if pair_before == pair_after {
                    Some(ViewerInput::PinchUpdate { a, b })
                } else {
                    Some(ViewerInput::PinchStart { a, b })
                }
            }
            (Some(_), None) => Some(ViewerInput::DragEnd),
            (None, None) => None,
        }
    }
}

/// Snapshot of the pointer state the overlay cares about.
#[derive(Debug, Default)]
struct PointerFrame {
    hovered: bool,
    clicked: bool,
    double_clicked: bool,
    pressed: bool,
    released: bool,
    moving: bool,
    latest: Option<egui::Pos2>,
    press_origin: Option<egui::Pos2>,
    scroll_y: f32,
}

/// Maps this frame's pointer activity on the overlay to viewer inputs.
fn pointer_inputs(
    pointer: &PointerFrame,
    origin: egui::Pos2,
    image_rect: egui::Rect,
    dragging: bool,
) -> Vec<ViewerInput> {
    let mut inputs = Vec::new();
    let hovered = pointer.hovered;

    if hovered
        && pointer.scroll_y != 0.0
        && let Some(cursor) = pointer.latest
    {
        // egui reports wheel-up as positive
        inputs.push(ViewerInput::WheelZoom {
            delta_y: -pointer.scroll_y,
            cursor: to_point(cursor, origin),
        });
    }

    if hovered
        && pointer.pressed
        && let Some(pos) = pointer.press_origin.or(pointer.latest)
    {
        inputs.push(ViewerInput::DragStart {
            pointer: to_point(pos, origin),
        });
    } else if dragging
        && pointer.moving
        && let Some(pos) = pointer.latest
    {
        inputs.push(ViewerInput::DragMove {
            pointer: to_point(pos, origin),
        });
    }

    if pointer.released {
        inputs.push(ViewerInput::DragEnd);
    }

    if pointer.double_clicked {
        inputs.push(ViewerInput::DoubleActivate);
    } else if pointer.clicked
        && pointer.latest.is_some_and(|pos| !image_rect.contains(pos))
    {
        inputs.push(ViewerInput::BackdropClick);
    }

    inputs
}

fn image_rect(origin: egui::Pos2, transform: Transform, width: u32, height: u32) -> egui::Rect {
    egui::Rect::from_min_size(
        origin + egui::vec2(transform.pan_x, transform.pan_y),
        egui::vec2(width as f32, height as f32) * transform.scale,
    )
}

impl GalleryApp {
    /// Renders the viewer overlay when it is open.
    pub fn show_viewer(&mut self, ctx: &egui::Context, now: Instant) {
        let screen = ctx.content_rect();
        let origin = screen.min;

        let touches: Vec<_> = ctx.input(|i| {
            i.events
                .iter()
                .filter_map(|event| match event {
                    egui::Event::Touch { id, phase, pos, .. } => Some((*id, *phase, *pos)),
                    _ => None,
                })
                .collect()
        });
        for (id, phase, pos) in touches {
            if let Some(input) = self.touches.update(id, phase, pos, origin) {
                self.viewer.handle(input);
            }
        }

        if !self.viewer.is_open() {
            return;
        }
        let Some(texture_id) = self.viewer_texture.as_ref().map(|texture| texture.id()) else {
            return;
        };
        let Some(image) = self.viewer.current_image().cloned() else {
            return;
        };

        egui::Area::new(egui::Id::new("art_viewer"))
            .order(egui::Order::Foreground)
            .fixed_pos(origin)
            .show(ctx, |ui| {
                let (rect, response) =
                    ui.allocate_exact_size(screen.size(), egui::Sense::click_and_drag());

                let before = self.viewer.displayed_transform(now);
                let hit_rect = image_rect(rect.min, before, image.size.width, image.size.height);
                let pointer = ui.input(|i| PointerFrame {
                    hovered: response.hovered(),
                    clicked: response.clicked(),
                    double_clicked: response.double_clicked(),
                    pressed: i.pointer.primary_pressed(),
                    released: i.pointer.primary_released(),
                    moving: i.pointer.is_moving(),
                    latest: i.pointer.latest_pos(),
                    press_origin: i.pointer.press_origin(),
                    scroll_y: i.raw_scroll_delta.y,
                });
                let dragging = self.viewer.state().is_dragging;
                for input in pointer_inputs(&pointer, rect.min, hit_rect, dragging) {
                    self.viewer.handle(input);
                }

                if !self.viewer.is_open() {
                    return;
                }

                let transform = self.viewer.displayed_transform(now);
                let painter = ui.painter_at(rect);
                painter.rect_filled(rect, 0.0, colors::BACKDROP);
                painter.image(
                    texture_id,
                    image_rect(rect.min, transform, image.size.width, image.size.height),
                    egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                    egui::Color32::WHITE,
                );

                if response.hovered() {
                    let cursor = if self.viewer.state().is_dragging {
                        egui::CursorIcon::Grabbing
                    } else {
                        egui::CursorIcon::Grab
                    };
                    ui.ctx().set_cursor_icon(cursor);
                }
            });

        if self.viewer.is_open() {
            self.show_viewer_chrome(ctx, &image.alt, now);
        }
    }

    /// Close button, zoom controls, hint and caption drawn above the image.
    fn show_viewer_chrome(&mut self, ctx: &egui::Context, alt: &str, now: Instant) {
        let mut control = None;

        egui::Area::new(egui::Id::new("viewer_close"))
            .order(egui::Order::Tooltip)
            .anchor(
                egui::Align2::RIGHT_TOP,
                egui::vec2(-OVERLAY_MARGIN, OVERLAY_MARGIN),
            )
            .show(ctx, |ui| {
                if ui.button("× Close").on_hover_text("Esc").clicked() {
                    control = Some(ViewerControl::Close);
                }
            });

        let zoom_label = self.viewer.zoom_label().to_owned();
        egui::Area::new(egui::Id::new("viewer_controls"))
            .order(egui::Order::Tooltip)
            .anchor(egui::Align2::CENTER_BOTTOM, egui::vec2(0.0, -OVERLAY_MARGIN))
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style())
                    .fill(colors::CONTROL_FILL)
                    .show(ui, |ui| {
                        ui.horizontal(|ui| {
                            if ui.button(" - ").on_hover_text("Zoom out (-)").clicked() {
                                control = Some(ViewerControl::ZoomOut);
                            }
                            ui.label(egui::RichText::new(&zoom_label).monospace());
                            if ui.button(" + ").on_hover_text("Zoom in (+)").clicked() {
                                control = Some(ViewerControl::ZoomIn);
                            }
                            ui.separator();
                            if ui.button("Fit").on_hover_text("Fit to window (0)").clicked() {
                                control = Some(ViewerControl::Fit);
                            }
                            if ui.button("1:1").on_hover_text("Actual size (1)").clicked() {
                                control = Some(ViewerControl::Actual);
                            }
                        });
                    });
            });

        if self.viewer.hint_visible(now) {
            egui::Area::new(egui::Id::new("viewer_hint"))
                .order(egui::Order::Tooltip)
                .interactable(false)
                .anchor(egui::Align2::CENTER_TOP, egui::vec2(0.0, OVERLAY_MARGIN))
                .show(ctx, |ui| {
                    egui::Frame::popup(ui.style())
                        .fill(colors::HINT_FILL)
                        .show(ui, |ui| {
                            ui.label(egui::RichText::new(HINT_TEXT).color(colors::HINT_TEXT));
                        });
                });
        }

        if !alt.is_empty() {
            egui::Area::new(egui::Id::new("viewer_caption"))
                .order(egui::Order::Tooltip)
                .interactable(false)
                .anchor(
                    egui::Align2::LEFT_BOTTOM,
                    egui::vec2(OVERLAY_MARGIN, -OVERLAY_MARGIN),
                )
                .show(ctx, |ui| {
                    ui.label(egui::RichText::new(alt).color(colors::CARD_CAPTION));
                });
        }

        if let Some(control) = control {
            self.viewer.handle(ViewerInput::Control(control));
        }
    }
}
