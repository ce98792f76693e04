//! Shared test utilities for the freerct-site test suite.
//!
//! Provides content builders, a manual scheduler and pre-populated
//! in-memory surfaces so widget tests can run whole event sequences without
//! a browser.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let config = sample_widget_config();
//! let surface = page_surface(&config);
//! let mut controller = Controller::new(&config, surface, ManualScheduler::default()).unwrap();
//! ```

use std::collections::BTreeSet;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;

use crate::content::Content;
use crate::types::NavLink;
use crate::widgets::carousel::{DOT_CLASS, IMAGE_CLASS, Scheduler, TEXT_CLASS, TimerToken};
use crate::widgets::controller::{SlideshowConfig, WidgetConfig};
use crate::widgets::gallery::{POPUP_CLASS, THUMBNAIL_CLASS};
use crate::widgets::navbar::{
    ActiveRules, BAR_ID, BOTTOM_SPACER_ID, LOGO_ID, LayoutParams, MENU_SPACER_ID, TOP_SPACER_ID,
    dropdown_element_id, link_element_id,
};
use crate::widgets::surface::MemorySurface;

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/content/` to a temp directory and return it.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/content");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// Load the fixture content tables. Panics on any error.
pub fn fixture_content() -> Content {
    let tmp = setup_fixtures();
    crate::content::load_content(tmp.path()).unwrap()
}

// =========================================================================
// Navigation builders
// =========================================================================

/// A relative leaf link.
pub fn leaf(id: &str, target: &str) -> NavLink {
    NavLink {
        id: id.to_string(),
        target: target.to_string(),
        label: id.to_string(),
        absolute: false,
        new_tab: false,
        children: vec![],
    }
}

/// Home, download, manual, screenshots, a community dropdown and an
/// external link.
pub fn sample_links() -> Vec<NavLink> {
    vec![
        leaf("index", "index"),
        leaf("download", "download"),
        leaf("manual", "manual"),
        leaf("screenshots", "screenshots"),
        NavLink {
            id: "community".to_string(),
            target: String::new(),
            label: "Community".to_string(),
            absolute: false,
            new_tab: false,
            children: vec![leaf("contribute", "contribute"), leaf("news", "news")],
        },
        NavLink {
            id: "github".to_string(),
            target: "https://github.com/FreeRCT/FreeRCT".to_string(),
            label: "GitHub".to_string(),
            absolute: true,
            new_tab: true,
            children: vec![],
        },
    ]
}

// =========================================================================
// Surfaces
// =========================================================================

/// Bar anchors plus one element per link and dropdown list.
pub fn navbar_surface(links: &[NavLink]) -> MemorySurface {
    let mut surface = MemorySurface::new()
        .with_id(BAR_ID)
        .with_id(LOGO_ID)
        .with_id(TOP_SPACER_ID)
        .with_id(MENU_SPACER_ID)
        .with_id(BOTTOM_SPACER_ID);
    for link in crate::types::all_links(links) {
        surface = surface.with_id(link_element_id(&link.id));
        if link.is_dropdown() {
            surface = surface.with_id(dropdown_element_id(&link.id));
        }
    }
    surface
}

/// `count` slides: image, caption and dot each.
pub fn carousel_surface(count: usize) -> MemorySurface {
    MemorySurface::new()
        .with_class(IMAGE_CLASS, count)
        .with_class(TEXT_CLASS, count)
        .with_class(DOT_CLASS, count)
}

/// `count` thumbnails and popups.
pub fn gallery_surface(count: usize) -> MemorySurface {
    MemorySurface::new()
        .with_class(THUMBNAIL_CLASS, count)
        .with_class(POPUP_CLASS, count)
}

/// Every element a page built from `config` would carry.
pub fn page_surface(config: &WidgetConfig) -> MemorySurface {
    let mut surface = navbar_surface(&config.links);
    if let Some(slideshow) = &config.slideshow {
        surface = surface
            .with_class(IMAGE_CLASS, slideshow.slide_count)
            .with_class(TEXT_CLASS, slideshow.slide_count)
            .with_class(DOT_CLASS, slideshow.slide_count);
    }
    if let Some(count) = config.gallery {
        surface = surface
            .with_class(THUMBNAIL_CLASS, count)
            .with_class(POPUP_CLASS, count);
    }
    surface
}

/// Ten slides, ten gallery images, the sample links.
pub fn sample_widget_config() -> WidgetConfig {
    WidgetConfig {
        links: sample_links(),
        layout: LayoutParams::default(),
        active: ActiveRules {
            base_paths: vec!["docs".to_string(), "FreeRCT".to_string()],
            landing_page: "index".to_string(),
        },
        icon_dir: "images/menu_icons".to_string(),
        slideshow: Some(SlideshowConfig {
            slide_count: 10,
            interval_ms: 5000,
        }),
        gallery: Some(10),
    }
}

// =========================================================================
// Scheduler
// =========================================================================

/// Records every schedule/cancel call; never fires on its own.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next: u64,
    pub scheduled: Vec<(TimerToken, Duration)>,
    pub cancelled: Vec<TimerToken>,
    pub expired: Vec<TimerToken>,
}

impl ManualScheduler {
    /// Tokens scheduled and neither cancelled nor expired.
    pub fn pending(&self) -> Vec<TimerToken> {
        let done: BTreeSet<_> = self.cancelled.iter().chain(&self.expired).collect();
        self.scheduled
            .iter()
            .map(|(t, _)| *t)
            .filter(|t| !done.contains(t))
            .collect()
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&mut self, delay: Duration) -> TimerToken {
        self.next += 1;
        let token = TimerToken(self.next);
        self.scheduled.push((token, delay));
        token
    }

    fn cancel(&mut self, token: TimerToken) {
        self.cancelled.push(token);
    }

    fn expired(&mut self, token: TimerToken) {
        self.expired.push(token);
    }
}
