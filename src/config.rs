//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. The file lives in
//! the content root next to `content.toml`; stock defaults are overridden by
//! whatever keys it sets.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [site]
//! title = "FreeRCT"
//! base_paths = ["docs", "FreeRCT"]   # Path segments the pages are served under
//! landing_page = "index"             # Slug active on the bare site root
//! logo = "images/logo.png"
//! icon_dir = "images/menu_icons"     # <icon_dir>/<link id>.png on mobile
//! image_dir = "images"               # Slides and screenshots: <image_dir>/<image>.png
//!
//! [navbar]
//! scroll_damping = 2.0               # Scroll pixels per pixel of bar travel
//! logo_padding = 8.0                 # Margin above and below the logo
//!
//! [navbar.bands.wide]
//! min_width = 1400
//! travel = 160.0
//! logo_max = 256.0
//! logo_min = 96.0
//! menu_spacer = 48.0
//! bottom_spacer = 24.0
//! font_size = 24.0
//!
//! # [navbar.bands.normal], [navbar.bands.narrow], [navbar.bands.mobile]
//!
//! [carousel]
//! interval_ms = 5000                 # Auto-advance delay
//!
//! [gallery]
//! heading_gap = "1rem"               # Extra space between menu bar and section heading
//!
//! [news]
//! latest_count = 3                   # Items on pages with a latest-news block
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse: override just the values you want.
//!
//! ```toml
//! # Only slow the slideshow down
//! [carousel]
//! interval_ms = 8000
//! ```
//!
//! Unknown keys are rejected to catch typos early.
//!
//! The navbar band table doubles as the stylesheet's breakpoints:
//! [`generate_band_css`] writes one media query per band so the page has the
//! right geometry before the widget script runs.

use crate::widgets::navbar::{ActiveRules, Band, LayoutParams};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

pub const CONFIG_FILENAME: &str = "config.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
///
/// All fields have sensible defaults. User config files need only specify
/// the values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Site identity and where it is served from.
    pub site: SiteSection,
    /// Adaptive menu bar geometry.
    pub navbar: LayoutParams,
    /// Landing page slideshow.
    pub carousel: CarouselConfig,
    /// Screenshot gallery.
    pub gallery: GalleryConfig,
    /// News listings.
    pub news: NewsConfig,
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.site.base_paths.is_empty() {
            return Err(ConfigError::Validation(
                "site.base_paths must not be empty".into(),
            ));
        }
        if self
            .site
            .base_paths
            .iter()
            .any(|p| p.is_empty() || p.contains('/'))
        {
            return Err(ConfigError::Validation(
                "site.base_paths entries must be single, non-empty path segments".into(),
            ));
        }
        if self.site.landing_page.is_empty() {
            return Err(ConfigError::Validation(
                "site.landing_page must not be empty".into(),
            ));
        }
        if self.carousel.interval_ms == 0 {
            return Err(ConfigError::Validation(
                "carousel.interval_ms must be positive".into(),
            ));
        }
        self.navbar.validate().map_err(ConfigError::Validation)?;
        Ok(())
    }

    /// Active-link rules for the navbar.
    pub fn active_rules(&self) -> ActiveRules {
        ActiveRules {
            base_paths: self.site.base_paths.clone(),
            landing_page: self.site.landing_page.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteSection {
    pub title: String,
    /// Path segments the generated documents may be served under.
    pub base_paths: Vec<String>,
    /// Page slug that is active when the URL ends at a base path.
    pub landing_page: String,
    pub logo: String,
    /// Directory of the per-link menu icons used in the mobile band.
    pub icon_dir: String,
    /// Directory holding slide and screenshot images.
    pub image_dir: String,
}

impl Default for SiteSection {
    fn default() -> Self {
        Self {
            title: "FreeRCT".to_string(),
            base_paths: vec!["docs".to_string(), "FreeRCT".to_string()],
            landing_page: "index".to_string(),
            logo: "images/logo.png".to_string(),
            icon_dir: "images/menu_icons".to_string(),
            image_dir: "images".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CarouselConfig {
    /// Milliseconds between automatic slide advances.
    pub interval_ms: u64,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            interval_ms: crate::widgets::carousel::DEFAULT_INTERVAL.as_millis() as u64,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GalleryConfig {
    /// CSS length added to the collapsed menu bar height when scrolling a
    /// section heading into view.
    pub heading_gap: String,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            heading_gap: "1rem".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NewsConfig {
    /// Items shown by a latest-news block that sets no count of its own.
    pub latest_count: usize,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self { latest_count: 3 }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the directory has no `config.toml`.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join(CONFIG_FILENAME);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given directory.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(root)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# FreeRCT Site Configuration
# ===========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Place this file in the content root, next to content.toml.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Site
# ---------------------------------------------------------------------------
[site]
title = "FreeRCT"

# Path segments the pages may be served under. A menu link is active when
# the page URL contains /<base>/<target>.html for one of these.
base_paths = ["docs", "FreeRCT"]

# Page slug that is active when the URL ends at /<base>/.
landing_page = "index"

logo = "images/logo.png"

# Menu icons shown instead of labels on narrow screens: <icon_dir>/<link id>.png
icon_dir = "images/menu_icons"

# Slides and screenshots are loaded from <image_dir>/<image>.png
image_dir = "images"

# ---------------------------------------------------------------------------
# Menu bar
# ---------------------------------------------------------------------------
[navbar]
# Scroll pixels per pixel the bar collapses. Higher is slower.
scroll_damping = 2.0

# Vertical margin above and below the logo, in pixels.
logo_padding = 8.0

# Breakpoint bands, widest first. min_width values must strictly decrease
# and the mobile band must start at 0. Lengths are CSS pixels. travel must
# equal logo_max - logo_min.
[navbar.bands.wide]
min_width = 1400
travel = 160.0
logo_max = 256.0
logo_min = 96.0
menu_spacer = 48.0
bottom_spacer = 24.0
font_size = 24.0

[navbar.bands.normal]
min_width = 1110
travel = 112.0
logo_max = 192.0
logo_min = 80.0
menu_spacer = 32.0
bottom_spacer = 16.0
font_size = 20.0

[navbar.bands.narrow]
min_width = 700
travel = 64.0
logo_max = 128.0
logo_min = 64.0
menu_spacer = 16.0
bottom_spacer = 12.0
font_size = 16.0

# Mobile is permanently collapsed and shows icons instead of labels.
[navbar.bands.mobile]
min_width = 0
travel = 0.0
logo_max = 48.0
logo_min = 48.0
menu_spacer = 8.0
bottom_spacer = 8.0
font_size = 16.0
collapsed = true

# ---------------------------------------------------------------------------
# Slideshow
# ---------------------------------------------------------------------------
[carousel]
# Milliseconds before the slideshow advances on its own.
interval_ms = 5000

# ---------------------------------------------------------------------------
# Screenshot gallery
# ---------------------------------------------------------------------------
[gallery]
# Space kept between the collapsed menu bar and a section heading when
# following a link to it (CSS length).
heading_gap = "1rem"

# ---------------------------------------------------------------------------
# News
# ---------------------------------------------------------------------------
[news]
# Items shown by a latest-news block without an explicit count.
latest_count = 3
"##
}

fn media_query(params: &LayoutParams, band: Band) -> Option<String> {
    let bands = &params.bands;
    // Upper bound is the next wider band's threshold.
    let upper = match band {
        Band::Wide => None,
        Band::Normal => Some(bands.wide.min_width),
        Band::Narrow => Some(bands.normal.min_width),
        Band::Mobile => Some(bands.narrow.min_width),
    };
    let lower = bands.spec(band).min_width;
    // Range syntax keeps adjacent bands gap-free at fractional widths.
    match (lower, upper) {
        (0, None) => None,
        (0, Some(hi)) => Some(format!("(width < {hi}px)")),
        (lo, None) => Some(format!("(width >= {lo}px)")),
        (lo, Some(hi)) => Some(format!("({lo}px <= width < {hi}px)")),
    }
}

/// Generate one media query per navbar band, exposing the band's initial
/// (unscrolled) geometry as CSS custom properties.
pub fn generate_band_css(params: &LayoutParams) -> String {
    let pad = params.logo_padding;
    Band::ALL
        .into_iter()
        .map(|band| {
            let spec = params.bands.spec(band);
            let logo = if spec.collapsed {
                spec.logo_min
            } else {
                spec.logo_max
            };
            let vars = format!(
                r#"    :root {{
        --menubar-height: {height}px;
        --menubar-collapsed-height: {collapsed}px;
        --menubar-top-spacer: {top}px;
        --menubar-offset: {offset}px;
        --menubar-logo-height: {logo}px;
        --menubar-logo-padding: {pad}px;
        --menubar-menu-spacer: {menu}px;
        --menubar-bottom-spacer: {bottom}px;
        --menubar-font-size: {font}px;
    }}"#,
                height = logo + 2.0 * pad,
                collapsed = spec.logo_min + 2.0 * pad,
                top = spec.logo_max + 2.0 * pad,
                offset = if spec.collapsed { 0.0 - spec.travel } else { 0.0 },
                menu = spec.menu_spacer,
                bottom = spec.bottom_spacer,
                font = spec.font_size,
            );
            match media_query(params, band) {
                Some(query) => format!("/* {band} */\n@media {query} {{\n{vars}\n}}"),
                None => format!("/* {band} */\n{vars}"),
            }
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Generate CSS custom properties from the gallery config.
pub fn generate_gallery_css(gallery: &GalleryConfig) -> String {
    format!(
        r#":root {{
    --gallery-heading-gap: {gap};
}}"#,
        gap = gallery.heading_gap,
    )
}
