//! Builds a gallery catalog from a directory of images.
//!
//! Expects `<input>/<category>/<image>`: every subdirectory becomes a filter
//! tab and every image inside it a card.

use clap::Parser;
use gallery_viewer::catalog::{category_label, category_slug, is_image_extension, title_from_stem};
use gallery_viewer::raster;
use gallery_viewer::{Artwork, Category, Gallery, NavLink, NavTarget};
use indicatif::{ProgressBar, ProgressStyle};
use resvg::usvg;
use ron::ser::PrettyConfig;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

const THUMBS_DIR: &str = ".thumbs";
const THUMBNAIL_MAX_SIDE: u32 = 640;
const DEFAULT_OUTPUT: &str = "gallery.ron";

#[derive(Parser, Debug)]
#[command(version, about = "Build a gallery catalog from <input>/<category>/<image> files")]
struct Args {
    /// Directory holding one subdirectory per category (defaults to the user's pictures)
    #[arg(long)]
    input: Option<PathBuf>,

    /// Catalog file to write; `.json` writes JSON, anything else RON
    #[arg(long)]
    output: Option<PathBuf>,

    /// Write PNG thumbnails under <input>/.thumbs and use them in the grid
    #[arg(long)]
    thumbnails: bool,

    /// Gallery title (defaults to the input directory name)
    #[arg(long)]
    title: Option<String>,

    /// Images processed at the same time
    #[arg(long, default_value_t = 8)]
    concurrency: usize,
}

#[derive(Error, Debug)]
enum CatalogError {
    #[error("failed to access '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to read image '{path}': {source}")]
    Image {
        path: PathBuf,
        source: image::ImageError,
    },
    #[error("failed to parse SVG '{path}': {source}")]
    Svg { path: PathBuf, source: usvg::Error },
    #[error("failed to serialize catalog: {0}")]
    Ron(#[from] ron::Error),
    #[error("failed to serialize catalog: {0}")]
    Json(#[from] serde_json::Error),
    #[error("image task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
    #[error("concurrency limiter closed: {0}")]
    Acquire(#[from] tokio::sync::AcquireError),
    #[error("invalid progress template: {0}")]
    Template(#[from] indicatif::style::TemplateError),
    #[error("{0}")]
    InvalidInput(String),
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> CatalogError + '_ {
    move |source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// One image waiting to be measured.
#[derive(Debug, Clone)]
struct ImageJob {
    category: String,
    path: PathBuf,
    /// Path relative to the input directory, with forward slashes
    relative: String,
}

/// Sorted, non-hidden entries of `dir`.
fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>, CatalogError> {
    let mut entries: Vec<PathBuf> = fs::read_dir(dir)
        .map_err(io_error(dir))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| !name.starts_with('.'))
        })
        .collect();
    entries.sort();
    Ok(entries)
}

/// Finds categories and their images under `input`.
fn collect_jobs(input: &Path) -> Result<(Vec<Category>, Vec<ImageJob>), CatalogError> {
    let mut categories = Vec::new();
    let mut jobs = Vec::new();

    for dir in sorted_entries(input)?.into_iter().filter(|path| path.is_dir()) {
        let Some(dir_name) = dir.file_name().and_then(|name| name.to_str()) else {
            continue;
        };
        let slug = category_slug(dir_name);
        if slug.is_empty() {
            log::warn!("Skipping directory without a usable name: {}", dir.display());
            continue;
        }

        let images: Vec<PathBuf> = sorted_entries(&dir)?
            .into_iter()
            .filter(|path| {
                path.is_file()
                    && path
                        .extension()
                        .and_then(|ext| ext.to_str())
                        .is_some_and(is_image_extension)
            })
            .collect();
        if images.is_empty() {
            log::info!("Skipping empty category '{dir_name}'");
            continue;
        }

        for path in images {
            let Some(file_name) = path.file_name().and_then(|name| name.to_str()) else {
                continue;
            };
            jobs.push(ImageJob {
                category: slug.clone(),
                relative: format!("{dir_name}/{file_name}"),
                path,
            });
        }

        categories.push(Category {
            label: category_label(dir_name),
            slug,
        });
    }

    Ok((categories, jobs))
}

fn is_svg(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"))
}

fn parse_svg(path: &Path) -> Result<usvg::Tree, CatalogError> {
    let data = fs::read(path).map_err(io_error(path))?;
    usvg::Tree::from_data(&data, &usvg::Options::default()).map_err(|source| CatalogError::Svg {
        path: path.to_path_buf(),
        source,
    })
}

/// Whether `output` exists and is at least as new as `source`.
fn is_up_to_date(source: &Path, output: &Path) -> bool {
    let modified = |path: &Path| fs::metadata(path).and_then(|meta| meta.modified()).ok();
    match (modified(source), modified(output)) {
        (Some(source), Some(output)) => output >= source,
        _ => false,
    }
}

fn write_thumbnail(job: &ImageJob, thumb_path: &Path) -> Result<(), CatalogError> {
    if is_up_to_date(&job.path, thumb_path) {
        return Ok(());
    }
    if let Some(parent) = thumb_path.parent() {
        fs::create_dir_all(parent).map_err(io_error(parent))?;
    }

    let thumbnail = if is_svg(&job.path) {
        let tree = parse_svg(&job.path)?;
        raster::rasterize(&tree, Some(THUMBNAIL_MAX_SIDE)).ok_or_else(|| {
            CatalogError::InvalidInput(format!("SVG has no drawable area: {}", job.path.display()))
        })?
    } else {
        image::open(&job.path)
            .map_err(|source| CatalogError::Image {
                path: job.path.clone(),
                source,
            })?
            .thumbnail(THUMBNAIL_MAX_SIDE, THUMBNAIL_MAX_SIDE)
            .to_rgba8()
    };

    thumbnail
        .save(thumb_path)
        .map_err(|source| CatalogError::Image {
            path: thumb_path.to_path_buf(),
            source,
        })
}

/// Measures one image and, when asked, writes its thumbnail.
fn build_artwork(
    job: ImageJob,
    input: &Path,
    prefix: Option<&Path>,
    thumbnails: bool,
) -> Result<Artwork, CatalogError> {
    let (width, height) = if is_svg(&job.path) {
        let size = parse_svg(&job.path)?.size();
        (size.width().round() as u32, size.height().round() as u32)
    } else {
        image::image_dimensions(&job.path).map_err(|source| CatalogError::Image {
            path: job.path.clone(),
            source,
        })?
    };

    let catalog_path = |relative: &str| match prefix {
        Some(prefix) => prefix.join(relative).to_string_lossy().into_owned(),
        None => relative.to_owned(),
    };

    let (src, full_src) = if thumbnails {
        let thumb_relative = match job.relative.rsplit_once('.') {
            Some((stem, _)) => format!("{THUMBS_DIR}/{stem}.png"),
            None => format!("{THUMBS_DIR}/{}.png", job.relative),
        };
        write_thumbnail(&job, &input.join(&thumb_relative))?;
        (catalog_path(&thumb_relative), Some(catalog_path(&job.relative)))
    } else {
        (catalog_path(&job.relative), None)
    };

    let stem = job
        .path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(job.relative.as_str());

    Ok(Artwork {
        title: title_from_stem(stem),
        category: job.category,
        src,
        full_src,
        alt: None,
        year: None,
        medium: None,
        size: Some([width, height]),
    })
}

/// Navigation with one entry per category plus a link back to the top.
fn nav_links(categories: &[Category]) -> Vec<NavLink> {
    categories
        .iter()
        .map(|category| NavLink {
            label: category.label.clone(),
            target: NavTarget::Category(category.slug.clone()),
        })
        .chain(std::iter::once(NavLink {
            label: "Top".to_owned(),
            target: NavTarget::Top,
        }))
        .collect()
}

#[tokio::main]
async fn main() -> Result<(), CatalogError> {
    env_logger::init();
    let args = Args::parse();

    let input = match args.input {
        Some(input) => input,
        None => dirs::picture_dir().ok_or_else(|| {
            CatalogError::InvalidInput("no --input given and no pictures directory found".into())
        })?,
    };
    if !input.is_dir() {
        return Err(CatalogError::InvalidInput(format!(
            "input is not a directory: {}",
            input.display()
        )));
    }
    if args.concurrency == 0 {
        return Err(CatalogError::InvalidInput(
            "--concurrency must be at least 1".into(),
        ));
    }

    let input = input.canonicalize().map_err(io_error(&input))?;
    let output = args.output.unwrap_or_else(|| input.join(DEFAULT_OUTPUT));

    // Sources are stored relative to the catalog when it sits in the input directory
    let output_dir = output
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
    let prefix = match output_dir.canonicalize() {
        Ok(dir) if dir == input => None,
        _ => Some(input.clone()),
    };

    println!("Scanning {}...", input.display());
    let (categories, jobs) = collect_jobs(&input)?;
    println!(
        "Found {} images in {} categories",
        jobs.len(),
        categories.len()
    );

    let progress = ProgressBar::new(jobs.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{msg} [{bar:40}] {pos}/{len}")?
            .progress_chars("=> "),
    );
    progress.set_message(if args.thumbnails {
        "Measuring and thumbnailing"
    } else {
        "Measuring"
    });

    let input = Arc::new(input);
    let prefix = Arc::new(prefix);
    let semaphore = Arc::new(Semaphore::new(args.concurrency));
    let mut join_set: JoinSet<Result<(usize, Result<Artwork, CatalogError>), CatalogError>> =
        JoinSet::new();

    for (index, job) in jobs.into_iter().enumerate() {
        let input = input.clone();
        let prefix = prefix.clone();
        let semaphore = semaphore.clone();
        let thumbnails = args.thumbnails;

        join_set.spawn(async move {
            let _permit = semaphore.acquire_owned().await?;
            let artwork = tokio::task::spawn_blocking(move || {
                build_artwork(job, &input, prefix.as_deref(), thumbnails)
            })
            .await?;
            Ok((index, artwork))
        });
    }

    let mut built: Vec<(usize, Artwork)> = Vec::new();
    let mut failed = 0usize;
    while let Some(result) = join_set.join_next().await {
        let (index, artwork) = result??;
        progress.inc(1);
        match artwork {
            Ok(artwork) => built.push((index, artwork)),
            Err(err) => {
                failed += 1;
                progress.suspend(|| log::warn!("Skipping image: {err}"));
            }
        }
    }
    progress.finish_and_clear();

    built.sort_by_key(|(index, _)| *index);
    let artworks: Vec<Artwork> = built.into_iter().map(|(_, artwork)| artwork).collect();
    println!("Catalogued {} artworks (skipped {failed})", artworks.len());

    let title = args.title.unwrap_or_else(|| {
        input
            .file_name()
            .and_then(|name| name.to_str())
            .map(category_label)
            .unwrap_or_else(|| "Gallery".to_owned())
    });

    let gallery = Gallery {
        title,
        tagline: None,
        nav_links: nav_links(&categories),
        categories,
        artworks,
    };

    let is_json = output
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let text = if is_json {
        serde_json::to_string_pretty(&gallery)?
    } else {
        let pretty_config = PrettyConfig::new()
            .depth_limit(4)
            .indentor("  ".to_string())
            .struct_names(true);
        ron::ser::to_string_pretty(&gallery, pretty_config)?
    };

    fs::write(&output, text).map_err(io_error(&output))?;
    println!("Wrote catalog to {}", output.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("build-catalog-{name}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    const SQUARE_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="200" height="100"><rect width="200" height="100" fill="#f06"/></svg>"##;

    #[test]
    fn collects_categories_in_name_order() {
        let dir = scratch_dir("collect");
        fs::create_dir_all(dir.join("prints")).unwrap();
        fs::create_dir_all(dir.join("Mixed Media")).unwrap();
        fs::create_dir_all(dir.join(".thumbs")).unwrap();
        fs::create_dir_all(dir.join("empty")).unwrap();
        fs::write(dir.join("prints/02_b.svg"), SQUARE_SVG).unwrap();
        fs::write(dir.join("prints/01_a.svg"), SQUARE_SVG).unwrap();
        fs::write(dir.join("prints/notes.txt"), "skip me").unwrap();
        fs::write(dir.join("Mixed Media/x.svg"), SQUARE_SVG).unwrap();

        let (categories, jobs) = collect_jobs(&dir).unwrap();
        let slugs: Vec<_> = categories.iter().map(|c| c.slug.as_str()).collect();
        assert_eq!(slugs, ["mixed-media", "prints"]);
        assert_eq!(categories[0].label, "Mixed Media");

        let relative: Vec<_> = jobs.iter().map(|j| j.relative.as_str()).collect();
        assert_eq!(relative, ["Mixed Media/x.svg", "prints/01_a.svg", "prints/02_b.svg"]);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn svg_artwork_gets_size_and_thumbnail() {
        let dir = scratch_dir("thumb");
        fs::create_dir_all(dir.join("prints")).unwrap();
        fs::write(dir.join("prints/03_static-bloom.svg"), SQUARE_SVG).unwrap();

        let (_, mut jobs) = collect_jobs(&dir).unwrap();
        let artwork = build_artwork(jobs.remove(0), &dir, None, true).unwrap();

        assert_eq!(artwork.title, "Static Bloom");
        assert_eq!(artwork.size, Some([200, 100]));
        assert_eq!(artwork.src, ".thumbs/prints/03_static-bloom.png");
        assert_eq!(artwork.full_src.as_deref(), Some("prints/03_static-bloom.svg"));
        assert_eq!(
            image::image_dimensions(dir.join(&artwork.src)).unwrap(),
            (200, 100)
        );

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn nav_ends_with_top_link() {
        let categories = [Category {
            slug: "prints".to_owned(),
            label: "Prints".to_owned(),
        }];
        let links = nav_links(&categories);
        assert_eq!(links[0].target, NavTarget::Category("prints".to_owned()));
        assert_eq!(links.last().unwrap().target, NavTarget::Top);
    }
}
