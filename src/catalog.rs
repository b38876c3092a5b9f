//! Helpers for building a [`Gallery`](crate::Gallery) from image files.

use std::sync::LazyLock;

use regex::Regex;

/// File extensions the catalog builder picks up.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "svg"];

/// Ordering prefix such as `01_`, `2-` or `003 ` at the start of a file stem.
static ORDER_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d+[\s_\-.]+").expect("static regex")
});

/// Runs of separators turned into single spaces.
static SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s_\-]+").expect("static regex"));

pub fn is_image_extension(ext: &str) -> bool {
    IMAGE_EXTENSIONS
        .iter()
        .any(|known| known.eq_ignore_ascii_case(ext))
}

/// Display title for a file stem: `03_static-bloom_v2` becomes `Static Bloom V2`.
///
/// Falls back to the stem itself when stripping leaves nothing.
pub fn title_from_stem(stem: &str) -> String {
    let without_order = ORDER_PREFIX.replace(stem, "");
    let spaced = SEPARATORS.replace_all(without_order.trim(), " ");
    let title = title_case(spaced.trim());
    if title.is_empty() {
        stem.to_owned()
    } else {
        title
    }
}

/// Tab label for a category directory name.
pub fn category_label(slug: &str) -> String {
    title_case(SEPARATORS.replace_all(slug, " ").trim())
}

/// Normalized slug for a category directory name: lowercase, dashes for separators.
pub fn category_slug(dir_name: &str) -> String {
    SEPARATORS
        .replace_all(dir_name.trim(), "-")
        .trim_matches('-')
        .to_lowercase()
}

fn title_case(text: &str) -> String {
    text.split(' ')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
