//! Catalog and image loading.
//!
//! Images come from three places: HTTP(S) URLs, files next to the catalog and
//! the assets embedded in the binary. Loading runs on a tokio runtime; results
//! come back over a channel and wake the UI with a repaint request.

use eframe::egui::{self, ColorImage};
use gallery_viewer::Gallery;
use gallery_viewer::raster;
use gallery_viewer::viewer::ImageSize;
use rust_embed::RustEmbed;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use thiserror::Error;

/// Embeds all assets from the assets/ directory into the binary.
/// In debug mode, assets are loaded from the filesystem for faster iteration.
/// In release mode, assets are compressed and embedded in the binary.
#[derive(RustEmbed)]
#[folder = "assets/"]
pub struct Assets;

/// Name of the catalog shipped inside the binary.
const EMBEDDED_CATALOG: &str = "gallery.ron";

const USER_AGENT: &str = concat!("gallery-viewer/", env!("CARGO_PKG_VERSION"));

/// Errors that can occur when loading the gallery catalog.
#[derive(Error, Debug)]
pub enum CatalogLoadError {
    #[error("{0} not found in embedded assets")]
    NotFound(&'static str),
    #[error("failed to read catalog '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid UTF-8 in catalog: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),
    #[error("failed to parse catalog: {0}")]
    Ron(#[from] ron::de::SpannedError),
    #[error("failed to parse catalog: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors that can occur when loading and decoding images.
#[derive(Error, Debug)]
pub enum ImageLoadError {
    #[error("asset not found: {0}")]
    AssetNotFound(String),
    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to fetch '{url}': {source}")]
    Http { url: String, source: reqwest::Error },
    #[error("failed to fetch '{url}': HTTP {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
    },
    #[error("failed to decode image '{path}': {source}")]
    Decode {
        path: String,
        source: image::ImageError,
    },
    #[error("failed to parse SVG '{path}': {source}")]
    Svg {
        path: String,
        source: resvg::usvg::Error,
    },
    #[error("SVG '{0}' has no drawable area")]
    EmptySvg(String),
    #[error("image loader stopped: {0}")]
    Join(#[from] tokio::task::JoinError),
    #[error("image loader channel disconnected")]
    Disconnected,
}

/// Decoded image data ready for texture creation.
pub struct DecodedImage {
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl DecodedImage {
    pub fn size(&self) -> ImageSize {
        ImageSize::new(self.width, self.height)
    }

    pub fn to_color_image(&self) -> ColorImage {
        ColorImage::from_rgba_unmultiplied(
            [self.width as usize, self.height as usize],
            &self.pixels,
        )
    }
}

/// State of an asset being loaded asynchronously.
pub enum AssetLoadState {
    /// Asset is being loaded on the runtime.
    Loading(mpsc::Receiver<Result<DecodedImage, ImageLoadError>>),
    /// Asset has been decoded and is ready for texture creation.
    Ready(DecodedImage),
    /// Loading failed; stores the error message (already displayed via toast).
    Error(String),
}

/// Where an image source string points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    Remote(String),
    File(PathBuf),
    Embedded(String),
}

impl ImageSource {
    /// Resolves `src` against the catalog directory, falling back to the
    /// embedded assets for relative paths that do not exist on disk.
    pub fn resolve(src: &str, base_dir: Option<&Path>) -> Self {
        let src = src.trim();
        if src.starts_with("http://") || src.starts_with("https://") {
            return Self::Remote(src.to_owned());
        }

        let path = Path::new(src.strip_prefix("file://").unwrap_or(src));
        if path.is_absolute() {
            return Self::File(path.to_path_buf());
        }
        if let Some(base) = base_dir {
            let candidate = base.join(path);
            if candidate.exists() {
                return Self::File(candidate);
            }
        }

        let embedded = src.trim_start_matches("./").replace('\\', "/");
        Self::Embedded(embedded)
    }
}

impl fmt::Display for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remote(url) => f.write_str(url),
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Embedded(name) => write!(f, "embedded:{name}"),
        }
    }
}

/// Loads images off the UI thread.
pub struct ImageLoader {
    runtime: tokio::runtime::Runtime,
    client: reqwest::Client,
    base_dir: Option<PathBuf>,
}

impl ImageLoader {
    pub fn new(base_dir: Option<PathBuf>) -> std::io::Result<Self> {
        Ok(Self {
            runtime: tokio::runtime::Runtime::new()?,
            client: reqwest::Client::new(),
            base_dir,
        })
    }

    /// Starts loading `src`, optionally downscaled so neither side exceeds
    /// `max_side`. The result arrives on the returned channel.
    pub fn load(
        &self,
        ctx: &egui::Context,
        src: &str,
        max_side: Option<u32>,
    ) -> mpsc::Receiver<Result<DecodedImage, ImageLoadError>> {
        let (tx, rx) = mpsc::channel();
        let source = ImageSource::resolve(src, self.base_dir.as_deref());
        let client = self.client.clone();
        let ctx = ctx.clone();

        self.runtime.spawn(async move {
            let result = fetch_and_decode(&client, source, max_side).await;
            let _ = tx.send(result);
            ctx.request_repaint();
        });

        rx
    }
}

async fn fetch_bytes(
    client: &reqwest::Client,
    source: &ImageSource,
) -> Result<Vec<u8>, ImageLoadError> {
    match source {
        ImageSource::Remote(url) => {
            let http_error = |source| ImageLoadError::Http {
                url: url.clone(),
                source,
            };
            let response = client
                .get(url)
                .header(reqwest::header::USER_AGENT, USER_AGENT)
                .send()
                .await
                .map_err(http_error)?;

            if !response.status().is_success() {
                return Err(ImageLoadError::HttpStatus {
                    url: url.clone(),
                    status: response.status(),
                });
            }

            Ok(response.bytes().await.map_err(http_error)?.to_vec())
        }
        ImageSource::File(path) => {
            tokio::fs::read(path)
                .await
                .map_err(|source| ImageLoadError::Io {
                    path: path.clone(),
                    source,
                })
        }
        ImageSource::Embedded(name) => Assets::get(name)
            .map(|file| file.data.into_owned())
            .ok_or_else(|| ImageLoadError::AssetNotFound(name.clone())),
    }
}

async fn fetch_and_decode(
    client: &reqwest::Client,
    source: ImageSource,
    max_side: Option<u32>,
) -> Result<DecodedImage, ImageLoadError> {
    let bytes = fetch_bytes(client, &source).await?;
    let label = source.to_string();
    tokio::task::spawn_blocking(move || decode_image(&label, &bytes, max_side)).await?
}

fn is_svg(label: &str, bytes: &[u8]) -> bool {
    if label.to_ascii_lowercase().ends_with(".svg") {
        return true;
    }
    let head = &bytes[..bytes.len().min(256)];
    let head = String::from_utf8_lossy(head);
    let head = head.trim_start();
    head.starts_with("<svg") || (head.starts_with("<?xml") && head.contains("<svg"))
}

/// Decodes raster or SVG bytes into straight RGBA.
pub fn decode_image(
    label: &str,
    bytes: &[u8],
    max_side: Option<u32>,
) -> Result<DecodedImage, ImageLoadError> {
    if is_svg(label, bytes) {
        return rasterize_svg(label, bytes, max_side);
    }

    let mut img = image::load_from_memory(bytes).map_err(|source| ImageLoadError::Decode {
        path: label.to_owned(),
        source,
    })?;
    if let Some(max) = max_side
        && (img.width() > max || img.height() > max)
    {
        img = img.thumbnail(max, max);
    }
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();

    Ok(DecodedImage {
        pixels: rgba.into_raw(),
        width,
        height,
    })
}

/// Renders an SVG at its intrinsic size, or smaller when `max_side` requires.
pub fn rasterize_svg(
    label: &str,
    bytes: &[u8],
    max_side: Option<u32>,
) -> Result<DecodedImage, ImageLoadError> {
    let tree = resvg::usvg::Tree::from_data(bytes, &resvg::usvg::Options::default()).map_err(
        |source| ImageLoadError::Svg {
            path: label.to_owned(),
            source,
        },
    )?;
    let rgba = raster::rasterize(&tree, max_side)
        .ok_or_else(|| ImageLoadError::EmptySvg(label.to_owned()))?;
    let (width, height) = rgba.dimensions();

    Ok(DecodedImage {
        pixels: rgba.into_raw(),
        width,
        height,
    })
}

/// Loads the gallery catalog from `path`, or the embedded one when `None`.
///
/// Files ending in `.json` are parsed as JSON, everything else as RON.
pub fn load_catalog(path: Option<&Path>) -> Result<Gallery, CatalogLoadError> {
    let Some(path) = path else {
        let file = Assets::get(EMBEDDED_CATALOG).ok_or(CatalogLoadError::NotFound(EMBEDDED_CATALOG))?;
        let ron_string = std::str::from_utf8(&file.data)?;
        return Ok(ron::from_str(ron_string)?);
    };

    let text = std::fs::read_to_string(path).map_err(|source| CatalogLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    if path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
    {
        Ok(serde_json::from_str(&text)?)
    } else {
        Ok(ron::from_str(&text)?)
    }
}
