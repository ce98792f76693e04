//! HTML site generation.
//!
//! Renders every page listed in `content.toml` to `<slug>.html` and copies
//! the content root's `assets/` directory alongside.
//!
//! ## Generated Pages
//!
//! Each page is the menu bar followed by the page's blocks in order:
//!
//! - **Markdown**: converted with pulldown-cmark
//! - **Slideshow**: all slides stacked, the first tagged `slideshow_first_slide`,
//!   prev/next arrows and one dot per slide
//! - **Gallery**: per section a linkified heading and a thumbnail grid, each
//!   thumbnail followed by its (hidden) popup
//! - **Latest news** / **All news**: newest first, linkified headings
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── index.html
//! ├── screenshots.html
//! ├── news.html
//! ├── ...                  # one file per [[pages]] entry
//! ├── images/              # copied from content/assets/
//! └── pkg/                 # wasm-pack output, copied from content/assets/pkg
//! ```
//!
//! ## Widgets
//!
//! Pages carry no inline handlers. Clickable elements are tagged with
//! `data-action` (and `data-index`) and the page embeds its
//! [`WidgetConfig`] as JSON in `<script id="widget_config">`. The wasm
//! module loaded from `pkg/freerct_site.js` reads both and drives the
//! widgets. Without it the page still renders: the first slide shows and
//! every popup stays hidden.
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.
//! Templates are type-safe Rust code with automatic XSS escaping.

use crate::config::{self, ConfigError, SiteConfig};
use crate::content::{self, Content, ContentError};
use crate::news::{self, NewsItem};
use crate::types::{Block, GalleryImage, GallerySection, NavLink, Page, Slide};
use crate::widgets::carousel::{DOT_CLASS, IMAGE_CLASS, TEXT_CLASS};
use crate::widgets::controller::{CONFIG_ELEMENT_ID, SlideshowConfig, WidgetConfig, action};
use crate::widgets::gallery::{POPUP_CLASS, THUMBNAIL_CLASS};
use crate::widgets::navbar::{
    ACTIVE_CLASS, BAR_ID, BOTTOM_SPACER_ID, LOGO_ID, MENU_SPACER_ID, TOP_SPACER_ID,
    active_link_ids, dropdown_element_id, link_element_id,
};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use pulldown_cmark::{Parser, html as md_html};
use std::fs;
use std::path::Path;
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Content(#[from] ContentError),
    #[error("asset walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("asset path error: {0}")]
    AssetPath(#[from] std::path::StripPrefixError),
}

/// Directory under the content root copied verbatim into the output.
pub const ASSETS_DIR: &str = "assets";
/// Module script emitted by `wasm-pack build --target web`.
pub const WASM_LOADER: &str = "pkg/freerct_site.js";

const CSS_STATIC: &str = include_str!("../static/style.css");

/// What one generated page contains.
#[derive(Debug, Clone, PartialEq)]
pub struct PageSummary {
    pub slug: String,
    pub title: String,
    pub slides: usize,
    pub gallery_images: usize,
    pub news_items: usize,
}

/// Result of a full build.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildSummary {
    pub pages: Vec<PageSummary>,
    pub assets: usize,
}

/// Load and validate `config.toml` and `content.toml` from a content root.
pub fn load_site(source: &Path) -> Result<(SiteConfig, Content), GenerateError> {
    let config = config::load_config(source)?;
    let content = content::load_content(source)?;
    tracing::debug!(
        pages = content.pages.len(),
        links = content.nav.len(),
        "loaded site"
    );
    Ok((config, content))
}

/// Load the content root at `source` and write the site to `output`.
pub fn build(source: &Path, output: &Path) -> Result<BuildSummary, GenerateError> {
    let (config, content) = load_site(source)?;
    generate(&config, &content, source, output)
}

pub fn generate(
    config: &SiteConfig,
    content: &Content,
    source: &Path,
    output: &Path,
) -> Result<BuildSummary, GenerateError> {
    let css = site_css(config);
    fs::create_dir_all(output)?;

    let mut summary = BuildSummary::default();
    for page in &content.pages {
        let widgets = widget_config(page, config, content);
        let markup = render_page(page, config, content, &widgets, &css)?;
        let filename = format!("{}.html", page.slug);
        fs::write(output.join(&filename), markup.into_string())?;
        tracing::info!(page = %filename, "generated");
        summary.pages.push(summarize(page, config, content));
    }

    let assets = source.join(ASSETS_DIR);
    if assets.is_dir() {
        summary.assets = copy_assets(&assets, output)?;
        tracing::info!(count = summary.assets, "copied assets");
    } else {
        tracing::warn!(path = %assets.display(), "no assets directory");
    }
    Ok(summary)
}

fn summarize(page: &Page, config: &SiteConfig, content: &Content) -> PageSummary {
    let mut summary = PageSummary {
        slug: page.slug.clone(),
        title: page.title.clone(),
        slides: 0,
        gallery_images: 0,
        news_items: 0,
    };
    for block in &page.blocks {
        match block {
            Block::Slideshow => summary.slides = content.slides().len(),
            Block::Gallery => summary.gallery_images = content.gallery_sequence().len(),
            Block::LatestNews { count } => {
                summary.news_items += latest_news(content, config, *count).len()
            }
            Block::AllNews => summary.news_items += content.news.len(),
            Block::Markdown { .. } => {}
        }
    }
    summary
}

/// Copy every file under `src` into `dst`, keeping relative paths.
fn copy_assets(src: &Path, dst: &Path) -> Result<usize, GenerateError> {
    let mut count = 0;
    for entry in WalkDir::new(src).min_depth(1) {
        let entry = entry?;
        let target = dst.join(entry.path().strip_prefix(src)?);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            fs::copy(entry.path(), &target)?;
            count += 1;
        }
    }
    Ok(count)
}

/// Breakpoint and gallery custom properties followed by the static styles.
pub fn site_css(config: &SiteConfig) -> String {
    format!(
        "{}\n\n{}\n\n{}",
        config::generate_band_css(&config.navbar),
        config::generate_gallery_css(&config.gallery),
        CSS_STATIC
    )
}

/// The widget configuration embedded in `page`.
pub fn widget_config(page: &Page, config: &SiteConfig, content: &Content) -> WidgetConfig {
    let slide_count = content.slides().len();
    let gallery_count = content.gallery_sequence().len();
    WidgetConfig {
        links: content.nav.clone(),
        layout: config.navbar.clone(),
        active: config.active_rules(),
        icon_dir: config.site.icon_dir.clone(),
        slideshow: (page.blocks.contains(&Block::Slideshow) && slide_count > 0).then(|| {
            SlideshowConfig {
                slide_count,
                interval_ms: config.carousel.interval_ms,
            }
        }),
        gallery: (page.blocks.contains(&Block::Gallery) && gallery_count > 0)
            .then_some(gallery_count),
    }
}

fn latest_news<'a>(
    content: &'a Content,
    config: &SiteConfig,
    count: Option<usize>,
) -> Vec<&'a NewsItem> {
    news::latest(&content.news, Some(count.unwrap_or(config.news.latest_count)))
}

/// Slug of the page listing all news, for heading links.
fn news_page(content: &Content) -> &str {
    content
        .pages
        .iter()
        .find(|p| p.blocks.contains(&Block::AllNews))
        .map(|p| p.slug.as_str())
        .unwrap_or("news")
}

fn markdown(source: &str) -> Markup {
    let parser = Parser::new(source);
    let mut body_html = String::new();
    md_html::push_html(&mut body_html, parser);
    PreEscaped(body_html)
}

fn image_src(config: &SiteConfig, image: &str) -> String {
    format!("{}/{}.png", config.site.image_dir, image)
}

// ============================================================================
// HTML Components
// ============================================================================

/// Renders the base HTML document structure
fn base_document(
    title: &str,
    icon: &str,
    css: &str,
    widgets: &WidgetConfig,
    content: Markup,
) -> Result<Markup, GenerateError> {
    // A `</script>` inside a label must not end the JSON block early.
    let config_json = serde_json::to_string(widgets)?.replace("</", "<\\/");
    Ok(html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                link rel="icon" href=(icon);
                style { (PreEscaped(css)) }
                script type="application/json" id=(CONFIG_ELEMENT_ID) { (PreEscaped(config_json)) }
                script type="module" {
                    (PreEscaped(format!("import init from \"./{WASM_LOADER}\";\ninit();")))
                }
            }
            body {
                (content)
            }
        }
    })
}

/// Renders the menu bar. `active` holds the ids marked active up front; the
/// widget re-derives them from the real URL on load.
pub fn render_navbar(links: &[NavLink], config: &SiteConfig, active: &[&str]) -> Markup {
    let landing = format!("{}.html", config.site.landing_page);
    html! {
        div id=(TOP_SPACER_ID) {
            nav id=(BAR_ID) {
                a.pictorial_link href=(landing) {
                    img id=(LOGO_ID) src=(config.site.logo) alt=(config.site.title);
                }
                div id=(MENU_SPACER_ID) {}
                ul.menubar_links {
                    @for link in links {
                        (render_nav_item(link, active))
                    }
                }
            }
        }
        div id=(BOTTOM_SPACER_ID) {}
    }
}

fn render_nav_link(link: &NavLink, active: &[&str]) -> Markup {
    let is_active = active.contains(&link.id.as_str());
    let href = (!link.target.is_empty()).then(|| link.href());
    html! {
        a id=(link_element_id(&link.id))
            class=[is_active.then_some(ACTIVE_CLASS)]
            href=[href]
            target=[link.new_tab.then_some("_blank")]
            rel=[link.new_tab.then_some("noopener")] {
            (link.label)
        }
    }
}

/// Renders a single menu entry. Dropdown parents carry `data-link-id` so
/// the pointer listeners can find them.
fn render_nav_item(link: &NavLink, active: &[&str]) -> Markup {
    html! {
        @if link.is_dropdown() {
            li.menubar_dropdown_parent data-link-id=(link.id) {
                (render_nav_link(link, active))
                ul.menubar_dropdown id=(dropdown_element_id(&link.id)) style="display:none" {
                    @for child in &link.children {
                        li { (render_nav_link(child, active)) }
                    }
                }
            }
        } @else {
            li { (render_nav_link(link, active)) }
        }
    }
}

fn render_slideshow(slides: &[Slide], config: &SiteConfig) -> Markup {
    html! {
        div.slideshow_main {
            div.slideshow_container {
                @for (i, slide) in slides.iter().enumerate() {
                    div.slideshow_slide.slideshow_first_slide[i == 0] {
                        img class=(IMAGE_CLASS) src=(image_src(config, &slide.image)) alt=(slide.caption);
                        div class=(TEXT_CLASS) { (slide.caption) }
                    }
                }
                a.slideshow_prev data-action=(action::SLIDE_PREV) { "\u{276E}" }
                a.slideshow_next data-action=(action::SLIDE_NEXT) { "\u{276F}" }
            }
            div.slideshow_dots {
                @for n in 1..=slides.len() {
                    span class=(DOT_CLASS) data-action=(action::SLIDE_DOT) data-index=(n) {}
                }
            }
        }
    }
}

fn render_popup(image: &GalleryImage, config: &SiteConfig) -> Markup {
    html! {
        div class=(POPUP_CLASS) style="display:none" {
            div.screenshot_gallery_popup_inner_wrapper {
                div.screenshot_gallery_popup_prev data-action=(action::POPUP_PREV) { "\u{276E}" }
                div.screenshot_gallery_popup_next data-action=(action::POPUP_NEXT) { "\u{276F}" }
                div.screenshot_gallery_popup_close data-action=(action::POPUP_CLOSE) { "\u{1F7A9}" }
                img.screenshot_gallery_popup_image
                    src=(image_src(config, &image.image))
                    alt=(image.caption)
                    data-action=(action::POPUP_IMAGE);
                @if !image.caption.is_empty() {
                    div.screenshot_gallery_popup_caption { (image.caption) }
                }
            }
        }
    }
}

/// Renders all gallery sections. Thumbnail indices run across sections,
/// matching the order popups are stepped through.
fn render_gallery(
    page_slug: &str,
    groups: &[(&GallerySection, Vec<&GalleryImage>)],
    config: &SiteConfig,
) -> Markup {
    let starts: Vec<usize> = groups
        .iter()
        .scan(0, |next, (_, images)| {
            let start = *next;
            *next += images.len();
            Some(start)
        })
        .collect();
    html! {
        @for ((section, images), start) in groups.iter().zip(starts) {
            h2.screenshot_gallery_heading id=(section.slug) {
                a.linkified_header href={ (page_slug) ".html#" (section.slug) } { (section.label) }
            }
            div.screenshot_gallery {
                @for (i, image) in images.iter().enumerate() {
                    img class=(THUMBNAIL_CLASS)
                        loading="lazy"
                        src=(image_src(config, &image.image))
                        alt=(image.caption)
                        data-action=(action::THUMBNAIL)
                        data-index=(start + i);
                    (render_popup(image, config))
                }
            }
        }
    }
}

fn render_news_item(item: &NewsItem, news_page: &str) -> Markup {
    html! {
        div.news id=(item.slug) {
            h3 {
                a.linkified_header href={ (news_page) ".html#" (item.slug) } { (item.title) }
            }
            (markdown(&item.body))
            p.news_timestamp { "~ " (news::format_timestamp(&item.date)) }
        }
    }
}

fn render_block(block: &Block, page: &Page, config: &SiteConfig, content: &Content) -> Markup {
    match block {
        Block::Markdown { text } => html! { div.markdown { (markdown(text)) } },
        Block::Slideshow => render_slideshow(&content.slides(), config),
        Block::Gallery => render_gallery(&page.slug, &content.gallery(), config),
        Block::LatestNews { count } => {
            let target = news_page(content);
            html! {
                @for item in latest_news(content, config, *count) {
                    (render_news_item(item, target))
                }
            }
        }
        Block::AllNews => {
            let target = news_page(content);
            html! {
                h2.news_count { (news::count_heading(content.news.len())) }
                @for item in news::newest_first(&content.news) {
                    (render_news_item(item, target))
                }
            }
        }
    }
}

// ============================================================================
// Page Renderers
// ============================================================================

pub fn render_page(
    page: &Page,
    config: &SiteConfig,
    content: &Content,
    widgets: &WidgetConfig,
    css: &str,
) -> Result<Markup, GenerateError> {
    let base = config
        .site
        .base_paths
        .first()
        .map(String::as_str)
        .unwrap_or_default();
    let here = format!("/{base}/{}.html", page.slug);
    let active = active_link_ids(&here, &content.nav, &config.active_rules());

    let title = if page.title == config.site.title {
        page.title.clone()
    } else {
        format!("{} | {}", page.title, config.site.title)
    };

    let body = html! {
        (render_navbar(&content.nav, config, &active))
        main.page_content {
            @for block in &page.blocks {
                (render_block(block, page, config, content))
            }
        }
    };
    base_document(&title, &config.site.logo, css, widgets, body)
}

// ============================================================================
// Tests
// ============================================================================
