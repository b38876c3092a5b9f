//! Gallery rendering: top bar with navigation, filter tabs and the card grid.

use crate::GalleryApp;
use crate::assets::AssetLoadState;
use crate::colors;
use crate::constants::{CARD_IMAGE_HEIGHT, CARD_SPACING, CARD_WIDTH};
use eframe::egui;
use gallery_viewer::nav::NavMenu;
use gallery_viewer::reveal::Bounds;
use gallery_viewer::viewer::{KeyCommand, PanDirection, ViewerInput};
use gallery_viewer::{ALL_CATEGORIES, NavTarget};
use std::time::Instant;

/// Height of the caption area under each thumbnail.
const CAPTION_HEIGHT: f32 = 52.0;

const CARD_RADIUS: f32 = 6.0;

const KEY_BINDINGS: &[(egui::Key, KeyCommand)] = &[
    (egui::Key::Plus, KeyCommand::ZoomIn),
    (egui::Key::Equals, KeyCommand::ZoomIn),
    (egui::Key::Minus, KeyCommand::ZoomOut),
    (egui::Key::Num0, KeyCommand::Fit),
    (egui::Key::Num1, KeyCommand::Actual),
    (egui::Key::ArrowUp, KeyCommand::Pan(PanDirection::Up)),
    (egui::Key::ArrowDown, KeyCommand::Pan(PanDirection::Down)),
    (egui::Key::ArrowLeft, KeyCommand::Pan(PanDirection::Left)),
    (egui::Key::ArrowRight, KeyCommand::Pan(PanDirection::Right)),
    (egui::Key::Escape, KeyCommand::Close),
];

impl GalleryApp {
    /// Handles viewer keyboard shortcuts. Keys do nothing while the viewer is closed.
    pub fn handle_keyboard_input(&mut self, ctx: &egui::Context) {
        if !self.viewer.is_open() {
            return;
        }

        let mut commands: Vec<KeyCommand> = ctx.input(|i| {
            KEY_BINDINGS
                .iter()
                .filter(|(key, _)| i.key_pressed(*key))
                .map(|(_, command)| *command)
                .collect()
        });
        // `+` and `=` can both fire for one physical key press
        commands.dedup();

        for command in commands {
            self.viewer.handle(ViewerInput::Key(command));
        }
    }

    /// Renders the top bar with the gallery title and navigation links.
    pub fn show_top_bar(&mut self, ctx: &egui::Context) {
        let compact = NavMenu::is_compact(ctx.content_rect().width());
        let mut followed: Option<NavTarget> = None;

        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                ui.heading(&self.gallery.title);
                if let Some(tagline) = &self.gallery.tagline
                    && !compact
                {
                    ui.weak(tagline);
                }

                if self.gallery.nav_links.is_empty() {
                    return;
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if compact {
                        let label = if self.nav.is_open() { "Close" } else { "Menu" };
                        let open = self.nav.is_open();
                        let response = ui.button(label);
                        response.widget_info(|| {
                            egui::WidgetInfo::selected(egui::WidgetType::Button, true, open, "Menu")
                        });
                        if response.clicked() {
                            self.nav.toggle();
                            log::debug!("Navigation expanded: {}", self.nav.aria_expanded());
                        }
                    } else {
                        for link in self.gallery.nav_links.iter().rev() {
                            if ui.link(&link.label).clicked() {
                                followed = Some(link.target.clone());
                            }
                        }
                    }
                });
            });

            if compact && self.nav.is_open() {
                ui.separator();
                for link in &self.gallery.nav_links {
                    if ui.selectable_label(false, &link.label).clicked() {
                        followed = Some(link.target.clone());
                    }
                }
            }
            ui.add_space(4.0);
        });

        if let Some(target) = followed {
            self.follow_nav(ctx, target);
        }
    }

    fn follow_nav(&mut self, ctx: &egui::Context, target: NavTarget) {
        self.nav.follow_link();
        match target {
            NavTarget::Category(slug) => self.select_category(&slug),
            NavTarget::Url(url) => ctx.open_url(egui::OpenUrl::new_tab(url)),
            NavTarget::Top => self.scroll_to_top = true,
        }
    }

    /// Renders the filter tabs. Returns the slug of a clicked tab.
    fn show_filter_tabs(&self, ui: &mut egui::Ui) -> Option<String> {
        if self.gallery.categories.is_empty() {
            return None;
        }

        // Before any selection every card is shown, which is what "All" means
        let showing_all = self.filter.is_active(ALL_CATEGORIES)
            || (self.filter.active().is_none()
                && self.filter.visible_indices().count() == self.gallery.artworks.len());

        let mut selected = None;
        ui.horizontal_wrapped(|ui| {
            if ui.selectable_label(showing_all, "All").clicked() {
                selected = Some(ALL_CATEGORIES.to_owned());
            }
            for category in &self.gallery.categories {
                if ui
                    .selectable_label(self.filter.is_active(&category.slug), &category.label)
                    .clicked()
                {
                    selected = Some(category.slug.clone());
                }
            }
        });
        selected
    }

    /// Renders the central panel: filter tabs and the card grid.
    pub fn show_gallery(&mut self, ctx: &egui::Context, now: Instant) {
        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(slug) = self.show_filter_tabs(ui) {
                self.select_category(&slug);
            }
            ui.add_space(8.0);

            if self.gallery.artworks.is_empty() {
                ui.centered_and_justified(|ui| {
                    ui.label(
                        "No artworks.\nPass --catalog or run `cargo run --bin build_catalog`.",
                    );
                });
                return;
            }

            let mut scroll = egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .enable_scrolling(!self.viewer.scroll_locked());
            if std::mem::take(&mut self.scroll_to_top) {
                scroll = scroll.vertical_scroll_offset(0.0);
            }

            let mut clicked = None;
            scroll.show(ui, |ui| {
                let clip = ui.clip_rect();
                ui.horizontal_wrapped(|ui| {
                    ui.spacing_mut().item_spacing = egui::vec2(CARD_SPACING, CARD_SPACING);
                    let visible: Vec<usize> = self.filter.visible_indices().collect();
                    for index in visible {
                        if self.show_card(ui, ctx, index, clip, now) {
                            clicked = Some(index);
                        }
                    }
                });
            });

            if let Some(index) = clicked {
                self.open_artwork(ctx, index);
            }
        });
    }

    /// Renders one card. Returns `true` when it was clicked.
    fn show_card(
        &mut self,
        ui: &mut egui::Ui,
        ctx: &egui::Context,
        index: usize,
        clip: egui::Rect,
        now: Instant,
    ) -> bool {
        let Some(style) = self.filter.card_style(index, now) else {
            return false;
        };
        let Some(artwork) = self.gallery.artworks.get(index) else {
            return false;
        };
        let src = artwork.src.clone();
        let title = artwork.title.clone();
        let details = card_details(artwork.year, artwork.medium.as_deref());
        let mut hover_text = artwork.viewer_alt().to_owned();

        let (rect, response) = ui.allocate_exact_size(
            egui::vec2(CARD_WIDTH, CARD_IMAGE_HEIGHT + CAPTION_HEIGHT),
            egui::Sense::click(),
        );

        self.reveal.observe(index);
        self.reveal.report(&index, bounds(rect), bounds(clip), now);
        let opacity = style.opacity * self.reveal.opacity(&index, now);

        self.request_thumbnail(ctx, &src);

        if opacity > 0.0 {
            let card_rect = rect.translate(egui::vec2(0.0, style.offset_y));
            let painter = ui.painter_at(card_rect);
            painter.rect_filled(card_rect, CARD_RADIUS, colors::CARD_FILL.gamma_multiply(opacity));

            let image_rect =
                egui::Rect::from_min_size(card_rect.min, egui::vec2(CARD_WIDTH, CARD_IMAGE_HEIGHT));
            match self.texture_cache.get(&src) {
                Some(texture) => {
                    painter.image(
                        texture.id(),
                        image_rect,
                        cover_uv(texture.size_vec2(), image_rect.size()),
                        egui::Color32::WHITE.gamma_multiply(opacity),
                    );
                }
                None => {
                    painter.rect_filled(
                        image_rect,
                        CARD_RADIUS,
                        colors::CARD_PLACEHOLDER.gamma_multiply(opacity),
                    );
                    if let Some(AssetLoadState::Error(msg)) = self.asset_cache.get(&src) {
                        hover_text = msg.clone();
                        painter.text(
                            image_rect.center(),
                            egui::Align2::CENTER_CENTER,
                            "Image unavailable",
                            egui::FontId::proportional(13.0),
                            colors::CARD_CAPTION.gamma_multiply(opacity),
                        );
                    }
                }
            }

            let text_pos = image_rect.left_bottom() + egui::vec2(8.0, 8.0);
            painter.text(
                text_pos,
                egui::Align2::LEFT_TOP,
                &title,
                egui::FontId::proportional(15.0),
                ui.visuals().strong_text_color().gamma_multiply(opacity),
            );
            if let Some(details) = &details {
                painter.text(
                    text_pos + egui::vec2(0.0, 20.0),
                    egui::Align2::LEFT_TOP,
                    details,
                    egui::FontId::proportional(12.0),
                    colors::CARD_CAPTION.gamma_multiply(opacity),
                );
            }

            if response.hovered() {
                painter.rect_stroke(
                    card_rect,
                    CARD_RADIUS,
                    egui::Stroke::new(1.5, colors::ACCENT.gamma_multiply(opacity)),
                    egui::StrokeKind::Inside,
                );
            }
        }

        response
            .on_hover_cursor(egui::CursorIcon::ZoomIn)
            .on_hover_text(hover_text)
            .clicked()
    }
}

/// "2023 · Risograph print", or whichever half is known.
fn card_details(year: Option<u16>, medium: Option<&str>) -> Option<String> {
    match (year, medium) {
        (Some(year), Some(medium)) => Some(format!("{year} · {medium}")),
        (Some(year), None) => Some(year.to_string()),
        (None, Some(medium)) => Some(medium.to_owned()),
        (None, None) => None,
    }
}

fn bounds(rect: egui::Rect) -> Bounds {
    Bounds::new(rect.min.x, rect.min.y, rect.max.x, rect.max.y)
}

/// UV rectangle that crops a texture to fill `target` without distortion.
fn cover_uv(texture: egui::Vec2, target: egui::Vec2) -> egui::Rect {
    let full = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
    if texture.x <= 0.0 || texture.y <= 0.0 || target.x <= 0.0 || target.y <= 0.0 {
        return full;
    }

    let texture_aspect = texture.x / texture.y;
    let target_aspect = target.x / target.y;
    if texture_aspect > target_aspect {
        let w = target_aspect / texture_aspect;
        egui::Rect::from_min_max(egui::pos2((1.0 - w) / 2.0, 0.0), egui::pos2((1.0 + w) / 2.0, 1.0))
    } else {
        let h = texture_aspect / target_aspect;
        egui::Rect::from_min_max(egui::pos2(0.0, (1.0 - h) / 2.0), egui::pos2(1.0, (1.0 + h) / 2.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cover_crops_wide_textures_horizontally() {
        let uv = cover_uv(egui::vec2(400.0, 100.0), egui::vec2(200.0, 100.0));
        assert!((uv.min.x - 0.25).abs() < 1e-6 && (uv.max.x - 0.75).abs() < 1e-6);
        assert_eq!((uv.min.y, uv.max.y), (0.0, 1.0));
    }

    #[test]
    fn cover_crops_tall_textures_vertically() {
        let uv = cover_uv(egui::vec2(100.0, 400.0), egui::vec2(100.0, 100.0));
        assert_eq!((uv.min.x, uv.max.x), (0.0, 1.0));
        assert!((uv.min.y - 0.375).abs() < 1e-6 && (uv.max.y - 0.625).abs() < 1e-6);
    }

    #[test]
    fn details_join_year_and_medium() {
        assert_eq!(
            card_details(Some(2023), Some("Risograph print")).as_deref(),
            Some("2023 · Risograph print")
        );
        assert_eq!(card_details(None, None), None);
    }
}
