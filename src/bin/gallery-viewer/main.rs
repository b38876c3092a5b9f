#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod assets;
mod catalog_watcher;
mod colors;
mod constants;
mod lightbox;
mod ui;

use assets::{AssetLoadState, DecodedImage, ImageLoadError, ImageLoader, load_catalog};
use catalog_watcher::CatalogWatcher;
use clap::Parser;
use constants::{ERROR_TOAST_SECONDS, THUMBNAIL_MAX_SIDE};
use eframe::egui::{self, TextureHandle, TextureOptions};
use egui_toast::{Toast, ToastKind, ToastOptions, Toasts};
use gallery_viewer::filter::{GalleryFilter, initial_category};
use gallery_viewer::nav::NavMenu;
use gallery_viewer::reveal::RevealTracker;
use gallery_viewer::viewer::{LoadError, LoadOutcome, Viewer, Viewport};
use gallery_viewer::{ALL_CATEGORIES, Gallery};
use lightbox::TouchTracker;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Instant;

/// Desktop gallery with a zoomable image viewer.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Catalog file (.ron or .json); the embedded demo gallery when omitted
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Filter tab selected on startup
    #[arg(long)]
    category: Option<String>,

    /// Deep link whose `category` query parameter selects the initial tab
    #[arg(long)]
    link: Option<String>,

    /// Reload the catalog when the file changes
    #[arg(long)]
    watch: bool,

    /// Show every card immediately instead of fading them in on scroll
    #[arg(long)]
    no_reveal: bool,
}

/// An image load started by [`Viewer::open`].
struct PendingViewerLoad {
    generation: u64,
    rx: mpsc::Receiver<Result<DecodedImage, ImageLoadError>>,
}

/// Main application state for the gallery.
pub struct GalleryApp {
    gallery: Gallery,
    catalog_path: Option<PathBuf>,
    filter: GalleryFilter,
    nav: NavMenu,
    reveal: RevealTracker<usize>,
    viewer: Viewer,
    loader: ImageLoader,
    viewer_loads: Vec<PendingViewerLoad>,
    /// Single texture reused for every image the viewer shows
    viewer_texture: Option<TextureHandle>,
    touches: TouchTracker,
    asset_cache: HashMap<String, AssetLoadState>,
    texture_cache: HashMap<String, TextureHandle>,
    toasts: Toasts,
    catalog_watcher: Option<CatalogWatcher>,
    scroll_to_top: bool,
}

impl GalleryApp {
    fn new(cc: &eframe::CreationContext<'_>, args: Args) -> std::io::Result<Self> {
        let toasts = Toasts::new()
            .anchor(egui::Align2::RIGHT_TOP, (-10.0, 10.0))
            .direction(egui::Direction::TopDown);

        let base_dir = args.catalog.as_deref().and_then(catalog_dir);
        let loader = ImageLoader::new(base_dir)?;

        let screen = cc.egui_ctx.content_rect();
        let reveal = if args.no_reveal {
            RevealTracker::unavailable()
        } else {
            RevealTracker::new()
        };

        let mut app = Self {
            gallery: empty_gallery(),
            catalog_path: args.catalog.clone(),
            filter: GalleryFilter::new(0),
            nav: NavMenu::default(),
            reveal,
            viewer: Viewer::new(Viewport::new(screen.width(), screen.height())),
            loader,
            viewer_loads: Vec::new(),
            viewer_texture: None,
            touches: TouchTracker::default(),
            asset_cache: HashMap::new(),
            texture_cache: HashMap::new(),
            toasts,
            catalog_watcher: None,
            scroll_to_top: false,
        };

        app.reload_catalog();

        let category = args
            .category
            .or_else(|| args.link.as_deref().and_then(initial_category));
        if let Some(category) = category {
            app.select_category(&category);
        }

        if args.watch {
            match &app.catalog_path {
                Some(path) => {
                    app.catalog_watcher = CatalogWatcher::new(cc.egui_ctx.clone(), path);
                    if app.catalog_watcher.is_none() {
                        log::info!("Catalog watcher not available - live reload disabled");
                    }
                }
                None => log::warn!("--watch needs --catalog; ignoring"),
            }
        }

        Ok(app)
    }

    /// (Re)reads the catalog, keeping the current filter tab when possible.
    fn reload_catalog(&mut self) {
        match load_catalog(self.catalog_path.as_deref()) {
            Ok(gallery) => {
                log::info!(
                    "Loaded gallery '{}' with {} artworks",
                    gallery.title,
                    gallery.artworks.len()
                );
                self.gallery = gallery;
            }
            Err(err) => {
                self.error_toast(err.to_string());
                self.gallery = empty_gallery();
            }
        }

        let active = self.filter.active().map(str::to_owned);
        self.filter = GalleryFilter::new(self.gallery.artworks.len());
        self.reveal.reset();
        // Thumbnails are keyed by source; drop the ones the new catalog no longer uses
        let sources: Vec<&str> = self.gallery.artworks.iter().map(|a| a.src.as_str()).collect();
        self.asset_cache.retain(|src, _| sources.contains(&src.as_str()));
        self.texture_cache.retain(|src, _| sources.contains(&src.as_str()));

        if let Some(active) = active {
            self.select_category(&active);
        }
    }

    /// Switches the filter tab.
    fn select_category(&mut self, category: &str) {
        let known = known_categories(&self.gallery);
        self.filter
            .select(category, &known, &self.gallery.artworks, Instant::now());
    }

    /// Opens the artwork at `index` in the viewer.
    ///
    /// Cards without an image source are ignored.
    fn open_artwork(&mut self, ctx: &egui::Context, index: usize) {
        let Some(artwork) = self.gallery.artworks.get(index) else {
            return;
        };
        let Some(source) = artwork.viewer_source() else {
            log::debug!("Artwork '{}' has no image source", artwork.title);
            return;
        };

        if let Some(ticket) = self.viewer.open(source, artwork.viewer_alt()) {
            let rx = self.loader.load(ctx, &ticket.source, None);
            self.viewer_loads.push(PendingViewerLoad {
                generation: ticket.generation,
                rx,
            });
        }
    }

    /// Hands finished viewer loads to the viewer and uploads the shown image.
    fn poll_viewer_loads(&mut self, ctx: &egui::Context) {
        let mut finished = Vec::new();
        self.viewer_loads.retain(|load| match load.rx.try_recv() {
            Ok(result) => {
                finished.push((load.generation, result));
                false
            }
            Err(mpsc::TryRecvError::Disconnected) => {
                finished.push((load.generation, Err(ImageLoadError::Disconnected)));
                false
            }
            Err(mpsc::TryRecvError::Empty) => true,
        });

        for (generation, result) in finished {
            let (outcome, decoded) = match result {
                Ok(decoded) => (
                    self.viewer.complete_load(generation, Ok(decoded.size())),
                    Some(decoded),
                ),
                Err(err) => (
                    self.viewer
                        .complete_load(generation, Err(LoadError::Failed(err.to_string()))),
                    None,
                ),
            };

            match (outcome, decoded) {
                (LoadOutcome::Shown, Some(decoded)) => self.upload_viewer_texture(ctx, &decoded),
                (LoadOutcome::Failed(err), _) => {
                    self.error_toast(format!("Could not open image: {err}"));
                }
                _ => {}
            }
        }
    }

    fn upload_viewer_texture(&mut self, ctx: &egui::Context, decoded: &DecodedImage) {
        let image = decoded.to_color_image();
        match &mut self.viewer_texture {
            Some(texture) => texture.set(image, TextureOptions::LINEAR),
            None => {
                self.viewer_texture = Some(ctx.load_texture("art_viewer", image, TextureOptions::LINEAR));
            }
        }
    }

    /// Starts loading the grid thumbnail for `src` unless it is already known.
    fn request_thumbnail(&mut self, ctx: &egui::Context, src: &str) {
        if src.trim().is_empty() || self.asset_cache.contains_key(src) {
            return;
        }
        let rx = self.loader.load(ctx, src, Some(THUMBNAIL_MAX_SIDE));
        self.asset_cache
            .insert(src.to_owned(), AssetLoadState::Loading(rx));
    }

    /// Polls all loading thumbnails and creates textures for ready ones.
    fn poll_thumbnails(&mut self, ctx: &egui::Context) {
        let mut updates: Vec<(String, AssetLoadState)> = Vec::new();
        let mut errors: Vec<String> = Vec::new();

        for (src, state) in &mut self.asset_cache {
            if let AssetLoadState::Loading(rx) = state {
                match rx.try_recv() {
                    Ok(Ok(decoded)) => {
                        updates.push((src.clone(), AssetLoadState::Ready(decoded)));
                    }
                    Ok(Err(err)) => {
                        let msg = err.to_string();
                        errors.push(msg.clone());
                        updates.push((src.clone(), AssetLoadState::Error(msg)));
                    }
                    Err(mpsc::TryRecvError::Disconnected) => {
                        let msg = format!("{src}: {}", ImageLoadError::Disconnected);
                        errors.push(msg.clone());
                        updates.push((src.clone(), AssetLoadState::Error(msg)));
                    }
                    Err(mpsc::TryRecvError::Empty) => {}
                }
            }
        }

        for (src, new_state) in updates {
            if let AssetLoadState::Ready(decoded) = &new_state {
                let texture = ctx.load_texture(&src, decoded.to_color_image(), TextureOptions::LINEAR);
                self.texture_cache.insert(src.clone(), texture);
            }
            self.asset_cache.insert(src, new_state);
        }

        for err in errors {
            self.error_toast(err);
        }
    }

    fn poll_catalog_watcher(&mut self) {
        let changed = self
            .catalog_watcher
            .as_mut()
            .is_some_and(|watcher| watcher.poll());
        if changed {
            if let Some(watcher) = &self.catalog_watcher {
                log::info!("Catalog changed: {}", watcher.path().display());
            }
            self.reload_catalog();
            self.toasts.add(Toast {
                kind: ToastKind::Info,
                text: "Catalog reloaded".into(),
                options: ToastOptions::default()
                    .duration_in_seconds(2.0)
                    .show_icon(true),
                ..Default::default()
            });
        }
    }

    fn error_toast(&mut self, text: String) {
        log::error!("{text}");
        self.toasts.add(Toast {
            kind: ToastKind::Error,
            text: text.into(),
            options: ToastOptions::default()
                .duration_in_seconds(ERROR_TOAST_SECONDS)
                .show_icon(true),
            ..Default::default()
        });
    }

    /// Keeps frames coming while something on screen is still moving.
    fn schedule_repaint(&self, ctx: &egui::Context, now: Instant) {
        if self.viewer.is_animating(now)
            || self.filter.is_animating(now)
            || self.reveal.is_animating(now)
        {
            ctx.request_repaint();
        } else if self.viewer.is_open()
            && let Some(remaining) = self.viewer.hint_remaining(now)
        {
            ctx.request_repaint_after(remaining);
        }
    }
}

impl eframe::App for GalleryApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();

        self.poll_viewer_loads(ctx);
        self.poll_thumbnails(ctx);
        self.poll_catalog_watcher();

        let screen = ctx.content_rect();
        self.viewer
            .begin_frame(Viewport::new(screen.width(), screen.height()), now);
        self.handle_keyboard_input(ctx);

        self.show_top_bar(ctx);
        self.show_gallery(ctx, now);
        self.show_viewer(ctx, now);

        self.schedule_repaint(ctx, now);

        // Show toasts
        self.toasts.show(ctx);
    }
}

/// Tab slugs the filter accepts: "all" plus every catalog category.
fn known_categories(gallery: &Gallery) -> Vec<&str> {
    std::iter::once(ALL_CATEGORIES)
        .chain(gallery.categories.iter().map(|c| c.slug.as_str()))
        .collect()
}

fn catalog_dir(path: &Path) -> Option<PathBuf> {
    path.parent().map(Path::to_path_buf)
}

fn empty_gallery() -> Gallery {
    Gallery {
        title: "Gallery".to_owned(),
        tagline: None,
        categories: Vec::new(),
        artworks: Vec::new(),
        nav_links: Vec::new(),
    }
}

fn main() -> eframe::Result {
    env_logger::init();
    let args = Args::parse();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([360.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Gallery",
        options,
        Box::new(|cc| Ok(Box::new(GalleryApp::new(cc, args)?))),
    )
}
