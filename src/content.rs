//! Site content tables.
//!
//! Everything the site shows lives in `content.toml` next to `config.toml`:
//!
//! ```toml
//! [[nav]]
//! id = "index"
//! target = "index"
//! label = "FreeRCT Home"
//!
//! [[nav]]
//! id = "community"
//! label = "Community"
//! children = [
//!     { id = "forum", target = "https://forum.example", label = "Forum", absolute = true, new_tab = true },
//! ]
//!
//! [[pages]]
//! slug = "index"
//! title = "FreeRCT Home"
//! [[pages.blocks]]
//! kind = "slideshow"
//! [[pages.blocks]]
//! kind = "latest_news"
//! count = 3
//!
//! [[slides]]
//! image = "20150609-freerct"
//! caption = "FreeRCT …"
//!
//! [[sections]]
//! slug = "0_1"
//! label = "FreeRCT 0.1"
//!
//! [[screenshots]]
//! image = "crowded"
//! section = "0_1"
//! slideshow = true
//!
//! [[news]]
//! date = "2021-09-14T10:00:00"
//! slug = "new_freerct_homepage"
//! title = "New FreeRCT Homepage"
//! body = "Development on the new website has started today."
//! ```
//!
//! Loading validates the tables up front: a broken navigation tree, an
//! empty slideshow or a screenshot in an undeclared section stops the
//! build instead of producing a half-working page.

use crate::news::NewsItem;
use crate::types::{Block, GalleryImage, GallerySection, NavLink, Page, Slide};
use crate::widgets::WidgetError;
use crate::widgets::navbar::validate_links;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;

pub const CONTENT_FILENAME: &str = "content.toml";

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("navigation error: {0}")]
    Navigation(#[from] WidgetError),
    #[error("screenshot '{image}' refers to unknown section '{section}'")]
    UnknownSection { image: String, section: String },
    #[error("duplicate {kind} '{slug}'")]
    Duplicate { kind: &'static str, slug: String },
    #[error("page '{0}' has a slideshow but there are no slides")]
    EmptySlideshow(String),
    #[error("page '{page}' has more than one {kind} block")]
    RepeatedBlock { page: String, kind: &'static str },
}

/// The parsed `content.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Content {
    pub nav: Vec<NavLink>,
    pub pages: Vec<Page>,
    pub slides: Vec<Slide>,
    pub sections: Vec<GallerySection>,
    pub screenshots: Vec<GalleryImage>,
    pub news: Vec<NewsItem>,
}

fn check_unique<'a>(
    kind: &'static str,
    slugs: impl IntoIterator<Item = &'a str>,
) -> Result<(), ContentError> {
    let mut seen = HashSet::new();
    for slug in slugs {
        if !seen.insert(slug) {
            return Err(ContentError::Duplicate {
                kind,
                slug: slug.to_string(),
            });
        }
    }
    Ok(())
}

impl Content {
    pub fn validate(&self) -> Result<(), ContentError> {
        validate_links(&self.nav)?;
        check_unique("page", self.pages.iter().map(|p| p.slug.as_str()))?;
        check_unique("section", self.sections.iter().map(|s| s.slug.as_str()))?;
        check_unique("news item", self.news.iter().map(|n| n.slug.as_str()))?;

        for img in &self.screenshots {
            if !self.sections.iter().any(|s| s.slug == img.section) {
                return Err(ContentError::UnknownSection {
                    image: img.image.clone(),
                    section: img.section.clone(),
                });
            }
        }

        let has_slides = !self.slides().is_empty();
        for page in &self.pages {
            // Widgets address their elements by class, so one of each per page.
            for (block, kind) in [(Block::Slideshow, "slideshow"), (Block::Gallery, "gallery")] {
                if page.blocks.iter().filter(|b| **b == block).count() > 1 {
                    return Err(ContentError::RepeatedBlock {
                        page: page.slug.clone(),
                        kind,
                    });
                }
            }
            if !has_slides && page.blocks.contains(&Block::Slideshow) {
                return Err(ContentError::EmptySlideshow(page.slug.clone()));
            }
        }

        for link in crate::types::all_links(&self.nav) {
            if !link.absolute
                && !link.is_dropdown()
                && !self.pages.iter().any(|p| p.slug == link.target)
            {
                tracing::warn!(link = %link.id, target = %link.target, "navigation target has no page");
            }
        }
        for section in &self.sections {
            if !self.screenshots.iter().any(|i| i.section == section.slug) {
                tracing::warn!(section = %section.slug, "gallery section has no screenshots");
            }
        }
        Ok(())
    }

    /// Slideshow order: the explicit slides, then every screenshot flagged
    /// for the slideshow.
    pub fn slides(&self) -> Vec<Slide> {
        self.slides
            .iter()
            .cloned()
            .chain(
                self.screenshots
                    .iter()
                    .filter(|i| i.slideshow)
                    .map(Slide::from),
            )
            .collect()
    }

    /// Screenshots grouped by section, in section order.
    pub fn gallery(&self) -> Vec<(&GallerySection, Vec<&GalleryImage>)> {
        self.sections
            .iter()
            .map(|section| {
                let images = self
                    .screenshots
                    .iter()
                    .filter(|i| i.section == section.slug)
                    .collect();
                (section, images)
            })
            .collect()
    }

    /// The flat gallery sequence the popups step through.
    pub fn gallery_sequence(&self) -> Vec<&GalleryImage> {
        self.gallery()
            .into_iter()
            .flat_map(|(_, images)| images)
            .collect()
    }
}

/// Parse and validate content from a TOML string.
pub fn parse_content(source: &str) -> Result<Content, ContentError> {
    let content: Content = toml::from_str(source)?;
    content.validate()?;
    Ok(content)
}

/// Load `content.toml` from the content root.
pub fn load_content(root: &Path) -> Result<Content, ContentError> {
    let source = fs::read_to_string(root.join(CONTENT_FILENAME))?;
    parse_content(&source)
}
