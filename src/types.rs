//! Shared content types.
//!
//! These are the declarative data tables read from `content.toml` and handed
//! to both the page generator and the widget controller. They are immutable
//! once loaded.

use serde::{Deserialize, Serialize};

/// One entry of the navigation bar.
///
/// Links nest at most one level: a link with `children` renders as a
/// dropdown parent and is never itself absolute. Ids are unique across the
/// whole tree; the navbar addresses each link's element as
/// `menubar_link_<id>` and the mobile icon as `<icon_dir>/<id>.png`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NavLink {
    pub id: String,
    /// Document slug (without `.html`) or, for absolute links, a full URL.
    #[serde(default)]
    pub target: String,
    pub label: String,
    #[serde(default)]
    pub absolute: bool,
    #[serde(default)]
    pub new_tab: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NavLink>,
}

impl NavLink {
    pub fn is_dropdown(&self) -> bool {
        !self.children.is_empty()
    }

    /// The `href` this link renders with: absolute targets verbatim,
    /// document slugs suffixed with `.html`.
    pub fn href(&self) -> String {
        if self.absolute {
            self.target.clone()
        } else {
            format!("{}.html", self.target)
        }
    }

    /// Depth-first walk over this link and its children.
    pub fn walk(&self) -> impl Iterator<Item = &NavLink> {
        std::iter::once(self).chain(self.children.iter())
    }
}

/// Iterate every link in a navigation tree, parents before their children.
pub fn all_links(links: &[NavLink]) -> impl Iterator<Item = &NavLink> {
    links.iter().flat_map(NavLink::walk)
}

/// One carousel entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Slide {
    /// Image path relative to the image directory, without extension.
    pub image: String,
    pub caption: String,
}

/// A titled group of screenshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GallerySection {
    pub slug: String,
    pub label: String,
}

/// One screenshot. Belongs to exactly one section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GalleryImage {
    pub image: String,
    pub section: String,
    #[serde(default)]
    pub caption: String,
    /// Also show this screenshot in the landing page slideshow.
    #[serde(default)]
    pub slideshow: bool,
}

impl From<&GalleryImage> for Slide {
    fn from(img: &GalleryImage) -> Self {
        Slide {
            image: img.image.clone(),
            caption: img.caption.clone(),
        }
    }
}

/// A generated document (`<slug>.html`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Page {
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub blocks: Vec<Block>,
}

/// A unit of page content, rendered in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Block {
    /// Inline markdown.
    Markdown { text: String },
    /// The carousel over all slides.
    Slideshow,
    /// The sectioned screenshot gallery.
    Gallery,
    /// The newest `count` news items (or the configured default).
    LatestNews {
        #[serde(default)]
        count: Option<usize>,
    },
    /// Every news item, preceded by a count heading.
    AllNews,
}
