//! Adaptive navigation bar.
//!
//! The bar's geometry is a pure function of viewport width and vertical
//! scroll offset:
//!
//! ```text
//! width ──classify──► Band ──lookup──► BandSpec
//! scroll ─────────────────────────────► progress = clamp(scroll / damping, 0, travel)
//!                                        t = progress / travel
//!                                        logo   = lerp(logo_max, logo_min, t)
//!                                        offset = lerp(0, -travel, t)
//! ```
//!
//! The bar sits at the bottom of the sticky top spacer. Each band's travel
//! equals `logo_max - logo_min`, so at any progress the spacer slides up by
//! exactly what the bar has shrunk and the bar fills what remains visible.
//!
//! Bands marked `collapsed` ignore scrolling and sit at the collapsed
//! endpoint (`t = 1`). In the [`Band::Mobile`] tier every link swaps its
//! label for an icon named after the link id; the label is made transparent
//! rather than removed so the click target keeps its size.
//!
//! The band table is also emitted as the stylesheet's media queries (see
//! [`crate::config::generate_band_css`]) so script and stylesheet switch
//! tiers at the same widths.

use super::WidgetError;
use super::surface::{Frame, RenderOp, Target, px};
use crate::types::{NavLink, all_links};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

pub const BAR_ID: &str = "menubar";
pub const LOGO_ID: &str = "menubar_logo";
pub const TOP_SPACER_ID: &str = "menubar_top_spacer";
pub const MENU_SPACER_ID: &str = "menubar_menu_spacer";
pub const BOTTOM_SPACER_ID: &str = "menubar_bottom_spacer";
pub const ACTIVE_CLASS: &str = "menubar_active";
pub const HIGHLIGHT_CLASS: &str = "menubar_highlight";

/// Element id of a link's anchor.
pub fn link_element_id(link_id: &str) -> String {
    format!("menubar_link_{link_id}")
}

/// Element id of a dropdown parent's child list.
pub fn dropdown_element_id(link_id: &str) -> String {
    format!("menubar_dropdown_{link_id}")
}

/// Viewport width tier. Ordered narrowest first.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Band {
    Mobile,
    Narrow,
    Normal,
    Wide,
}

impl Band {
    /// Widest first, the order thresholds are tested in.
    pub const ALL: [Band; 4] = [Band::Wide, Band::Normal, Band::Narrow, Band::Mobile];

    pub fn name(self) -> &'static str {
        match self {
            Band::Wide => "wide",
            Band::Normal => "normal",
            Band::Narrow => "narrow",
            Band::Mobile => "mobile",
        }
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Layout constants for one band. Lengths are CSS pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BandSpec {
    /// Smallest viewport width that falls into this band.
    pub min_width: u32,
    /// Scroll travel over which the bar collapses. Must equal
    /// `logo_max - logo_min` so the shrinking bar exactly fills the part of
    /// the top spacer still on screen.
    pub travel: f64,
    /// Logo height with the bar fully expanded.
    pub logo_max: f64,
    /// Logo height with the bar fully collapsed.
    pub logo_min: f64,
    pub menu_spacer: f64,
    pub bottom_spacer: f64,
    pub font_size: f64,
    /// Permanently collapsed: scrolling has no effect.
    #[serde(default)]
    pub collapsed: bool,
}

/// The ordered breakpoint table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BandTable {
    pub wide: BandSpec,
    pub normal: BandSpec,
    pub narrow: BandSpec,
    pub mobile: BandSpec,
}

impl Default for BandTable {
    fn default() -> Self {
        Self {
            wide: BandSpec {
                min_width: 1400,
                travel: 160.0,
                logo_max: 256.0,
                logo_min: 96.0,
                menu_spacer: 48.0,
                bottom_spacer: 24.0,
                font_size: 24.0,
                collapsed: false,
            },
            normal: BandSpec {
                min_width: 1110,
                travel: 112.0,
                logo_max: 192.0,
                logo_min: 80.0,
                menu_spacer: 32.0,
                bottom_spacer: 16.0,
                font_size: 20.0,
                collapsed: false,
            },
            narrow: BandSpec {
                min_width: 700,
                travel: 64.0,
                logo_max: 128.0,
                logo_min: 64.0,
                menu_spacer: 16.0,
                bottom_spacer: 12.0,
                font_size: 16.0,
                collapsed: false,
            },
            mobile: BandSpec {
                min_width: 0,
                travel: 0.0,
                logo_max: 48.0,
                logo_min: 48.0,
                menu_spacer: 8.0,
                bottom_spacer: 8.0,
                font_size: 16.0,
                collapsed: true,
            },
        }
    }
}

impl BandTable {
    pub fn spec(&self, band: Band) -> &BandSpec {
        match band {
            Band::Wide => &self.wide,
            Band::Normal => &self.normal,
            Band::Narrow => &self.narrow,
            Band::Mobile => &self.mobile,
        }
    }

    /// Classify a viewport width. Total: anything below the narrow
    /// threshold, including NaN, is mobile.
    pub fn classify(&self, width: f64) -> Band {
        Band::ALL
            .into_iter()
            .find(|&band| band != Band::Mobile && width >= f64::from(self.spec(band).min_width))
            .unwrap_or(Band::Mobile)
    }
}

/// Navbar layout parameters (`[navbar]` in `config.toml`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutParams {
    /// Scroll pixels per pixel of bar travel.
    pub scroll_damping: f64,
    /// Vertical margin around the logo.
    pub logo_padding: f64,
    pub bands: BandTable,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            scroll_damping: 2.0,
            logo_padding: 8.0,
            bands: BandTable::default(),
        }
    }
}

impl LayoutParams {
    pub fn validate(&self) -> Result<(), String> {
        if !(self.scroll_damping.is_finite() && self.scroll_damping > 0.0) {
            return Err("navbar.scroll_damping must be a positive number".into());
        }
        if !(self.logo_padding.is_finite() && self.logo_padding >= 0.0) {
            return Err("navbar.logo_padding must not be negative".into());
        }
        let b = &self.bands;
        if !(b.wide.min_width > b.normal.min_width && b.normal.min_width > b.narrow.min_width) {
            return Err("navbar.bands min_width must strictly decrease: wide > normal > narrow".into());
        }
        if b.narrow.min_width == 0 {
            return Err("navbar.bands.narrow.min_width must leave room for the mobile band".into());
        }
        if b.mobile.min_width != 0 {
            return Err("navbar.bands.mobile.min_width must be 0".into());
        }
        for band in Band::ALL {
            let spec = b.spec(band);
            let lengths = [
                spec.travel,
                spec.logo_max,
                spec.logo_min,
                spec.menu_spacer,
                spec.bottom_spacer,
                spec.font_size,
            ];
            if lengths.iter().any(|v| !v.is_finite() || *v < 0.0) {
                return Err(format!("navbar.bands.{band}: lengths must be non-negative"));
            }
            if spec.logo_min > spec.logo_max {
                return Err(format!("navbar.bands.{band}: logo_min exceeds logo_max"));
            }
            if !spec.collapsed && spec.travel <= 0.0 {
                return Err(format!(
                    "navbar.bands.{band}: travel must be positive unless the band is collapsed"
                ));
            }
            if (spec.travel - (spec.logo_max - spec.logo_min)).abs() > 1e-6 {
                return Err(format!(
                    "navbar.bands.{band}: travel ({}) must equal logo_max - logo_min ({})",
                    spec.travel,
                    spec.logo_max - spec.logo_min
                ));
            }
        }
        Ok(())
    }
}

/// Scroll progress for a band, clamped to `[0, travel]`.
pub fn scroll_progress(scroll_y: f64, spec: &BandSpec, damping: f64) -> f64 {
    if spec.collapsed {
        return spec.travel;
    }
    let raw = scroll_y / damping;
    if raw.is_nan() {
        0.0
    } else {
        raw.clamp(0.0, spec.travel)
    }
}

fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

/// Geometry of one layout pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NavBarLayout {
    pub band: Band,
    pub scroll_progress: f64,
    pub bar_height: f64,
    /// `top` of the spacer canvas behind the bar.
    pub bar_offset: f64,
    pub top_spacer_height: f64,
    pub logo_height: f64,
    pub logo_margin: f64,
    pub menu_spacer_width: f64,
    pub bottom_spacer_height: f64,
    pub link_font_size: f64,
    /// Links render as icons instead of text.
    pub icon_links: bool,
}

/// Compute the bar geometry for a viewport.
pub fn compute_layout(width: f64, scroll_y: f64, params: &LayoutParams) -> NavBarLayout {
    let band = params.bands.classify(width);
    let spec = params.bands.spec(band);
    let progress = scroll_progress(scroll_y, spec, params.scroll_damping);
    let t = if spec.collapsed || spec.travel <= 0.0 {
        1.0
    } else {
        progress / spec.travel
    };

    let logo_height = lerp(spec.logo_max, spec.logo_min, t);
    let logo_margin = params.logo_padding;

    NavBarLayout {
        band,
        scroll_progress: progress,
        bar_height: logo_height + 2.0 * logo_margin,
        bar_offset: lerp(0.0, -spec.travel, t),
        top_spacer_height: spec.logo_max + 2.0 * logo_margin,
        logo_height,
        logo_margin,
        menu_spacer_width: spec.menu_spacer,
        bottom_spacer_height: spec.bottom_spacer,
        link_font_size: spec.font_size,
        icon_links: band == Band::Mobile,
    }
}

/// Where the site may be served from, for active-link detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveRules {
    /// Path segments the documents live under, e.g. `docs` and `FreeRCT`.
    pub base_paths: Vec<String>,
    /// Slug of the landing page, active on the bare site root.
    pub landing_page: String,
}

fn url_path(url: &str) -> String {
    match url::Url::parse(url) {
        Ok(parsed) => parsed.path().to_string(),
        Err(_) => url
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .to_string(),
    }
}

/// Whether `link` points at the document at `url`. Absolute links never do.
pub fn is_active(url: &str, link: &NavLink, rules: &ActiveRules) -> bool {
    if link.absolute || link.target.is_empty() {
        return false;
    }
    let path = url_path(url);
    rules.base_paths.iter().any(|base| {
        path.contains(&format!("/{base}/{}.html", link.target))
            || (link.target == rules.landing_page && path.ends_with(&format!("/{base}/")))
    })
}

/// Ids of every link to mark active for `url`. A dropdown parent is active
/// when it or one of its children is.
pub fn active_link_ids<'a>(url: &str, links: &'a [NavLink], rules: &ActiveRules) -> Vec<&'a str> {
    let mut ids = Vec::new();
    for link in links {
        let active_children: Vec<&str> = link
            .children
            .iter()
            .filter(|c| is_active(url, c, rules))
            .map(|c| c.id.as_str())
            .collect();
        if is_active(url, link, rules) || !active_children.is_empty() {
            ids.push(link.id.as_str());
        }
        ids.extend(active_children);
    }
    ids
}

/// Check the structural rules of a navigation tree: unique ids, one
/// dropdown level, no absolute dropdown parents.
pub fn validate_links(links: &[NavLink]) -> Result<(), WidgetError> {
    let mut seen = HashSet::new();
    for link in links {
        if link.is_dropdown() && link.absolute {
            return Err(WidgetError::AbsoluteParent(link.id.clone()));
        }
        if let Some(child) = link.children.iter().find(|c| c.is_dropdown()) {
            return Err(WidgetError::NestedTooDeep(child.id.clone()));
        }
    }
    for link in all_links(links) {
        if !seen.insert(link.id.as_str()) {
            return Err(WidgetError::DuplicateLinkId(link.id.clone()));
        }
    }
    Ok(())
}

/// Navigation bar widget state.
#[derive(Debug, Clone)]
pub struct NavBar {
    links: Vec<NavLink>,
    params: LayoutParams,
    icon_dir: String,
    layout: Option<NavBarLayout>,
    open_dropdown: Option<String>,
}

impl NavBar {
    pub fn new(
        links: Vec<NavLink>,
        params: LayoutParams,
        icon_dir: impl Into<String>,
    ) -> Result<Self, WidgetError> {
        validate_links(&links)?;
        params.validate().map_err(WidgetError::Layout)?;
        Ok(Self {
            links,
            params,
            icon_dir: icon_dir.into(),
            layout: None,
            open_dropdown: None,
        })
    }

    /// The most recent layout pass, if any.
    pub fn layout(&self) -> Option<&NavBarLayout> {
        self.layout.as_ref()
    }

    /// Recompute geometry for the current viewport and produce the style
    /// writes for it. Each call supersedes the previous one entirely.
    pub fn relayout(&mut self, width: f64, scroll_y: f64) -> Frame {
        let layout = compute_layout(width, scroll_y, &self.params);
        tracing::trace!(
            band = %layout.band,
            progress = layout.scroll_progress,
            "navbar relayout"
        );

        let mut frame = vec![
            RenderOp::style(Target::id(BAR_ID), "height", px(layout.bar_height)),
            RenderOp::style(Target::id(LOGO_ID), "height", px(layout.logo_height)),
            RenderOp::style(
                Target::id(LOGO_ID),
                "margin",
                format!("{} 0", px(layout.logo_margin)),
            ),
            RenderOp::style(
                Target::id(TOP_SPACER_ID),
                "height",
                px(layout.top_spacer_height),
            ),
            RenderOp::style(Target::id(TOP_SPACER_ID), "top", px(layout.bar_offset)),
            RenderOp::style(
                Target::id(MENU_SPACER_ID),
                "width",
                px(layout.menu_spacer_width),
            ),
            RenderOp::style(
                Target::id(BOTTOM_SPACER_ID),
                "height",
                px(layout.bottom_spacer_height),
            ),
        ];

        for link in all_links(&self.links) {
            let target = Target::id(link_element_id(&link.id));
            frame.push(RenderOp::style(
                target.clone(),
                "font-size",
                px(layout.link_font_size),
            ));
            if layout.icon_links {
                frame.push(RenderOp::style(
                    target.clone(),
                    "background-image",
                    format!("url('{}/{}.png')", self.icon_dir, link.id),
                ));
                frame.push(RenderOp::style(target, "color", "transparent"));
            } else {
                frame.push(RenderOp::style(target.clone(), "background-image", ""));
                frame.push(RenderOp::style(target, "color", ""));
            }
        }

        self.layout = Some(layout);
        frame
    }

    /// Mark the links pointing at `url` active.
    pub fn mark_active(&self, url: &str, rules: &ActiveRules) -> Frame {
        let active = active_link_ids(url, &self.links, rules);
        all_links(&self.links)
            .map(|link| {
                RenderOp::class(
                    Target::id(link_element_id(&link.id)),
                    ACTIVE_CLASS,
                    active.contains(&link.id.as_str()),
                )
            })
            .collect()
    }

    fn dropdown(&self, link_id: &str) -> Option<&NavLink> {
        self.links
            .iter()
            .find(|l| l.id == link_id && l.is_dropdown())
    }

    fn dropdown_frame(link_id: &str, open: bool) -> Frame {
        vec![
            RenderOp::class(
                Target::id(link_element_id(link_id)),
                HIGHLIGHT_CLASS,
                open,
            ),
            RenderOp::style(
                Target::id(dropdown_element_id(link_id)),
                "display",
                if open { "block" } else { "none" },
            ),
        ]
    }

    /// Pointer entered a link. Only dropdown parents react.
    pub fn pointer_enter(&mut self, link_id: &str) -> Frame {
        if self.dropdown(link_id).is_none() {
            return Frame::new();
        }
        let mut frame = match self.open_dropdown.take() {
            Some(previous) if previous != link_id => Self::dropdown_frame(&previous, false),
            _ => Frame::new(),
        };
        frame.extend(Self::dropdown_frame(link_id, true));
        self.open_dropdown = Some(link_id.to_string());
        frame
    }

    /// Pointer left a link.
    pub fn pointer_leave(&mut self, link_id: &str) -> Frame {
        if self.open_dropdown.as_deref() != Some(link_id) {
            return Frame::new();
        }
        self.open_dropdown = None;
        Self::dropdown_frame(link_id, false)
    }

    pub fn open_dropdown(&self) -> Option<&str> {
        self.open_dropdown.as_deref()
    }
}
