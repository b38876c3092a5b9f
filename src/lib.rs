use serde::{Deserialize, Serialize};

pub mod catalog;
pub mod easing;
pub mod filter;
pub mod nav;
pub mod raster;
pub mod reveal;
pub mod viewer;

/// Category slug that matches every artwork.
pub const ALL_CATEGORIES: &str = "all";

/// A complete gallery: categories, artworks and site navigation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gallery {
    /// Studio or site title shown in the top bar
    pub title: String,
    /// Optional subtitle shown under the title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tagline: Option<String>,
    /// Filter tabs, in display order
    #[serde(default)]
    pub categories: Vec<Category>,
    /// Gallery cards, in display order
    #[serde(default)]
    pub artworks: Vec<Artwork>,
    /// Entries of the navigation menu
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub nav_links: Vec<NavLink>,
}

/// A filter tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Identifier matched against `Artwork::category` (e.g. "prints")
    pub slug: String,
    /// Display label for the tab
    pub label: String,
}

/// A single gallery card.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artwork {
    /// Display title
    pub title: String,
    /// Category slug this card belongs to
    pub category: String,
    /// Image shown in the grid (usually a thumbnail)
    pub src: String,
    /// Full resolution image opened in the viewer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_src: Option<String>,
    /// Alternative text for the image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    /// Year of creation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<u16>,
    /// Medium description (e.g. "Risograph print")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medium: Option<String>,
    /// Natural pixel size [width, height] of the full image, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<[u32; 2]>,
}

impl Artwork {
    /// Source handed to the viewer: `full_src` when present, otherwise `src`.
    ///
    /// Returns `None` when neither is set to a non-blank value.
    pub fn viewer_source(&self) -> Option<&str> {
        self.full_src
            .as_deref()
            .filter(|src| !src.trim().is_empty())
            .or_else(|| Some(self.src.as_str()).filter(|src| !src.trim().is_empty()))
    }

    /// Alt text for the viewer, falling back to the title.
    pub fn viewer_alt(&self) -> &str {
        self.alt.as_deref().unwrap_or(&self.title)
    }
}

/// An entry in the navigation menu.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavLink {
    /// Display label
    pub label: String,
    /// What following the link does
    pub target: NavTarget,
}

/// Destination of a navigation link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NavTarget {
    /// Select a gallery filter tab
    Category(String),
    /// Open an external page in the browser
    Url(String),
    /// Scroll the gallery back to the top
    Top,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artwork(src: &str, full_src: Option<&str>) -> Artwork {
        Artwork {
            title: "Static Bloom".to_owned(),
            category: "prints".to_owned(),
            src: src.to_owned(),
            full_src: full_src.map(str::to_owned),
            alt: None,
            year: None,
            medium: None,
            size: None,
        }
    }

    #[test]
    fn viewer_source_prefers_full_resolution() {
        let art = artwork("thumbs/bloom.png", Some("full/bloom.png"));
        assert_eq!(art.viewer_source(), Some("full/bloom.png"));
    }

    #[test]
    fn viewer_source_falls_back_to_grid_image() {
        assert_eq!(
            artwork("thumbs/bloom.png", None).viewer_source(),
            Some("thumbs/bloom.png")
        );
        assert_eq!(
            artwork("thumbs/bloom.png", Some("  ")).viewer_source(),
            Some("thumbs/bloom.png")
        );
    }

    #[test]
    fn viewer_source_missing_is_none() {
        assert_eq!(artwork("", None).viewer_source(), None);
    }

    #[test]
    fn viewer_alt_defaults_to_title() {
        let mut art = artwork("a.png", None);
        assert_eq!(art.viewer_alt(), "Static Bloom");
        art.alt = Some("Pink noise on paper".to_owned());
        assert_eq!(art.viewer_alt(), "Pink noise on paper");
    }

    #[test]
    fn gallery_parses_from_ron() {
        let text = r#"
            Gallery(
                title: "Signal Erosion",
                categories: [Category(slug: "prints", label: "Prints")],
                artworks: [
                    Artwork(title: "Drift", category: "prints", src: "a.svg", size: Some((10, 20))),
                ],
                navLinks: [
                    NavLink(label: "Prints", target: Category("prints")),
                    NavLink(label: "Top", target: Top),
                ],
            )
        "#;
        let gallery: Gallery = ron::from_str(text).unwrap();
        assert_eq!(gallery.artworks[0].size, Some([10, 20]));
        assert_eq!(gallery.nav_links[1].target, NavTarget::Top);
        assert!(gallery.tagline.is_none());
    }
}
