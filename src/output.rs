//! CLI output formatting for every command.
//!
//! # Information-First Display
//!
//! Output is **information-centric, not file-centric**. The primary display
//! for every entity (link, page, section) is its semantic identity (title
//! and positional index), with output paths and counts shown as secondary
//! context.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! Navigation
//! 001 FreeRCT Home → index.html
//! 002 Community (dropdown)
//!     001 News Archive → news.html
//! 003 GitHub → https://github.com/FreeRCT/FreeRCT (new tab)
//!
//! Pages
//! 001 FreeRCT (index)
//!     slideshow, markdown, latest news
//!
//! Slideshow: 10 slides
//! Gallery
//! 001 FreeRCT 0.1 (5 images)
//! News: 3 items, newest 2021-09-14 22:00
//! ```
//!
//! ## Build
//!
//! ```text
//! 001 FreeRCT → index.html
//!     10 slides, 2 news items
//! 002 Screenshots → screenshots.html
//!     10 gallery images
//!
//! Generated 5 pages, 12 assets in dist
//! ```
//!
//! ## Layout
//!
//! ```text
//! Band: wide (width 1500, scroll 100)
//!     Scroll progress: 50 / 160
//!     Bar height: 208px
//!     ...
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::config::SiteConfig;
use crate::content::Content;
use crate::generate::BuildSummary;
use crate::news;
use crate::types::{Block, NavLink};
use crate::widgets::navbar::{Band, NavBarLayout};
use std::path::Path;

// ============================================================================
// Shared entity display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// `1 slide`, `3 slides`.
fn plural(n: usize, noun: &str) -> String {
    if n == 1 {
        format!("{n} {noun}")
    } else {
        format!("{n} {noun}s")
    }
}

/// Format an entity header: positional index + title, with optional detail.
///
/// ```text
/// 001 FreeRCT 0.1 (5 images)
/// 002 Community
/// ```
fn entity_header(index: usize, title: &str, detail: Option<&str>) -> String {
    match detail {
        Some(d) => format!("{} {} ({})", format_index(index), title, d),
        None => format!("{} {}", format_index(index), title),
    }
}

fn nav_line(index: usize, link: &NavLink) -> String {
    if link.is_dropdown() {
        return entity_header(index, &link.label, Some("dropdown"));
    }
    let line = format!("{} \u{2192} {}", entity_header(index, &link.label, None), link.href());
    if link.new_tab {
        format!("{line} (new tab)")
    } else {
        line
    }
}

fn block_name(block: &Block) -> &'static str {
    match block {
        Block::Markdown { .. } => "markdown",
        Block::Slideshow => "slideshow",
        Block::Gallery => "gallery",
        Block::LatestNews { .. } => "latest news",
        Block::AllNews => "all news",
    }
}

// ============================================================================
// Check output
// ============================================================================

/// Format the content inventory printed by `check`.
pub fn format_check_output(config: &SiteConfig, content: &Content) -> Vec<String> {
    let mut lines = vec!["Navigation".to_string()];
    for (i, link) in content.nav.iter().enumerate() {
        lines.push(nav_line(i + 1, link));
        for (j, child) in link.children.iter().enumerate() {
            lines.push(format!("{}{}", indent(1), nav_line(j + 1, child)));
        }
    }

    lines.push(String::new());
    lines.push("Pages".to_string());
    for (i, page) in content.pages.iter().enumerate() {
        lines.push(entity_header(i + 1, &page.title, Some(&page.slug)));
        if !page.blocks.is_empty() {
            let blocks: Vec<&str> = page.blocks.iter().map(block_name).collect();
            lines.push(format!("{}{}", indent(1), blocks.join(", ")));
        }
    }

    lines.push(String::new());
    lines.push(format!("Slideshow: {}", plural(content.slides().len(), "slide")));
    lines.push("Gallery".to_string());
    for (i, (section, images)) in content.gallery().iter().enumerate() {
        let count = plural(images.len(), "image");
        lines.push(entity_header(i + 1, &section.label, Some(&count)));
    }

    let newest = news::newest_first(&content.news);
    match newest.first() {
        Some(item) => lines.push(format!(
            "News: {}, newest {}",
            plural(content.news.len(), "item"),
            item.date.format("%Y-%m-%d %H:%M")
        )),
        None => lines.push("News: none".to_string()),
    }

    let bands: Vec<String> = Band::ALL
        .iter()
        .map(|&b| format!("{b} \u{2265} {}", config.navbar.bands.spec(b).min_width))
        .collect();
    lines.push(format!("Bands: {}", bands.join(", ")));
    lines
}

/// Print check output to stdout.
pub fn print_check_output(config: &SiteConfig, content: &Content) {
    for line in format_check_output(config, content) {
        println!("{}", line);
    }
}

// ============================================================================
// Build output
// ============================================================================

/// Format the per-page report of a build.
pub fn format_build_output(summary: &BuildSummary, output_dir: &Path) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, page) in summary.pages.iter().enumerate() {
        lines.push(format!(
            "{} \u{2192} {}.html",
            entity_header(i + 1, &page.title, None),
            page.slug
        ));
        let mut details = Vec::new();
        if page.slides > 0 {
            details.push(plural(page.slides, "slide"));
        }
        if page.gallery_images > 0 {
            details.push(plural(page.gallery_images, "gallery image"));
        }
        if page.news_items > 0 {
            details.push(plural(page.news_items, "news item"));
        }
        if !details.is_empty() {
            lines.push(format!("{}{}", indent(1), details.join(", ")));
        }
    }
    lines.push(String::new());
    lines.push(format!(
        "Generated {}, {} in {}",
        plural(summary.pages.len(), "page"),
        plural(summary.assets, "asset"),
        output_dir.display()
    ));
    lines
}

/// Print build output to stdout.
pub fn print_build_output(summary: &BuildSummary, output_dir: &Path) {
    for line in format_build_output(summary, output_dir) {
        println!("{}", line);
    }
}

// ============================================================================
// Layout and active-link output
// ============================================================================

/// Format the navbar geometry for one viewport.
pub fn format_layout(width: f64, scroll_y: f64, layout: &NavBarLayout, travel: f64) -> Vec<String> {
    vec![
        format!("Band: {} (width {width}, scroll {scroll_y})", layout.band),
        format!(
            "{}Scroll progress: {} / {travel}",
            indent(1),
            layout.scroll_progress
        ),
        format!("{}Bar height: {}px", indent(1), layout.bar_height),
        format!("{}Bar offset: {}px", indent(1), layout.bar_offset),
        format!("{}Top spacer: {}px", indent(1), layout.top_spacer_height),
        format!(
            "{}Logo: {}px (margin {}px)",
            indent(1),
            layout.logo_height,
            layout.logo_margin
        ),
        format!("{}Menu spacer: {}px", indent(1), layout.menu_spacer_width),
        format!("{}Bottom spacer: {}px", indent(1), layout.bottom_spacer_height),
        format!("{}Link font size: {}px", indent(1), layout.link_font_size),
        format!(
            "{}Links: {}",
            indent(1),
            if layout.icon_links { "icons" } else { "labels" }
        ),
    ]
}

/// Print layout output to stdout.
pub fn print_layout(width: f64, scroll_y: f64, layout: &NavBarLayout, travel: f64) {
    for line in format_layout(width, scroll_y, layout, travel) {
        println!("{}", line);
    }
}

/// Format which links are active for `url`.
pub fn format_active(url: &str, links: &[NavLink], active: &[&str]) -> Vec<String> {
    let mut lines = vec![format!("Active links for {url}")];
    let active_links: Vec<&NavLink> = crate::types::all_links(links)
        .filter(|l| active.contains(&l.id.as_str()))
        .collect();
    if active_links.is_empty() {
        lines.push(format!("{}(none)", indent(1)));
    }
    for link in active_links {
        lines.push(format!("{}{} ({})", indent(1), link.label, link.id));
    }
    lines
}

/// Print active-link output to stdout.
pub fn print_active(url: &str, links: &[NavLink], active: &[&str]) {
    for line in format_active(url, links, active) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::PageSummary;
    use crate::test_helpers::{fixture_content, sample_links};
    use crate::widgets::navbar::{LayoutParams, compute_layout};

    // =========================================================================
    // Helper tests
    // =========================================================================

    #[test]
    fn format_index_pads_to_three_digits() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(100), "100");
    }

    #[test]
    fn indent_levels() {
        assert_eq!(indent(0), "");
        assert_eq!(indent(2), "        ");
    }

    #[test]
    fn plural_forms() {
        assert_eq!(plural(1, "slide"), "1 slide");
        assert_eq!(plural(0, "slide"), "0 slides");
        assert_eq!(plural(10, "slide"), "10 slides");
    }

    #[test]
    fn entity_header_with_detail() {
        assert_eq!(
            entity_header(1, "FreeRCT 0.1", Some("5 images")),
            "001 FreeRCT 0.1 (5 images)"
        );
        assert_eq!(entity_header(2, "Community", None), "002 Community");
    }

    #[test]
    fn nav_line_variants() {
        let links = sample_links();
        assert_eq!(nav_line(1, &links[0]), "001 index \u{2192} index.html");
        assert_eq!(nav_line(5, &links[4]), "005 Community (dropdown)");
        assert_eq!(
            nav_line(6, &links[5]),
            "006 GitHub \u{2192} https://github.com/FreeRCT/FreeRCT (new tab)"
        );
    }

    // =========================================================================
    // Command output tests
    // =========================================================================

    #[test]
    fn check_output_lists_everything() {
        let content = fixture_content();
        let lines = format_check_output(&SiteConfig::default(), &content);
        assert_eq!(lines[0], "Navigation");
        assert!(lines.contains(&"004 Community (dropdown)".to_string()));
        assert!(lines.contains(&"Slideshow: 10 slides".to_string()));
        assert!(lines.contains(&"001 FreeRCT 0.1 (5 images)".to_string()));
        assert!(lines.contains(&"News: 3 items, newest 2021-09-14 22:00".to_string()));
        assert!(lines.iter().any(|l| l.starts_with("Bands: wide \u{2265} 1400")));
    }

    #[test]
    fn check_output_indents_dropdown_children() {
        let content = fixture_content();
        let lines = format_check_output(&SiteConfig::default(), &content);
        assert!(lines.contains(&"    001 News Archive \u{2192} news.html".to_string()));
    }

    #[test]
    fn check_output_lists_page_blocks() {
        let content = fixture_content();
        let lines = format_check_output(&SiteConfig::default(), &content);
        assert!(lines.contains(&"001 FreeRCT (index)".to_string()));
        assert!(lines.contains(&"    slideshow, markdown, latest news".to_string()));
    }

    #[test]
    fn build_output_reports_pages_and_totals() {
        let summary = BuildSummary {
            pages: vec![
                PageSummary {
                    slug: "index".into(),
                    title: "FreeRCT".into(),
                    slides: 10,
                    gallery_images: 0,
                    news_items: 1,
                },
                PageSummary {
                    slug: "download".into(),
                    title: "Get It!".into(),
                    slides: 0,
                    gallery_images: 0,
                    news_items: 0,
                },
            ],
            assets: 3,
        };
        let lines = format_build_output(&summary, Path::new("dist"));
        assert_eq!(
            lines,
            vec![
                "001 FreeRCT \u{2192} index.html",
                "    10 slides, 1 news item",
                "002 Get It! \u{2192} download.html",
                "",
                "Generated 2 pages, 3 assets in dist",
            ]
        );
    }

    #[test]
    fn layout_output_names_band_and_geometry() {
        let params = LayoutParams::default();
        let layout = compute_layout(1500.0, 100.0, &params);
        let lines = format_layout(1500.0, 100.0, &layout, params.bands.wide.travel);
        assert_eq!(lines[0], "Band: wide (width 1500, scroll 100)");
        assert_eq!(lines[1], "    Scroll progress: 50 / 160");
        assert!(lines.contains(&"    Links: labels".to_string()));
    }

    #[test]
    fn layout_output_mobile_uses_icons() {
        let params = LayoutParams::default();
        let layout = compute_layout(400.0, 0.0, &params);
        let lines = format_layout(400.0, 0.0, &layout, params.bands.mobile.travel);
        assert!(lines[0].starts_with("Band: mobile"));
        assert!(lines.contains(&"    Links: icons".to_string()));
    }

    #[test]
    fn active_output_lists_labels() {
        let links = sample_links();
        let lines = format_active("https://x/docs/news.html", &links, &["community", "news"]);
        assert_eq!(
            lines,
            vec![
                "Active links for https://x/docs/news.html",
                "    Community (community)",
                "    news (news)",
            ]
        );
    }

    #[test]
    fn active_output_without_match() {
        let lines = format_active("https://x/", &sample_links(), &[]);
        assert_eq!(lines[1], "    (none)");
    }
}
