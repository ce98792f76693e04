//! # freerct-site
//!
//! The FreeRCT homepage: a static site generator plus the three interactive
//! widgets its pages carry.
//!
//! - an **adaptive menu bar** that shrinks as the page scrolls and switches
//!   to icon links on narrow screens,
//! - an **auto-advancing slideshow** on the landing page,
//! - a **screenshot gallery** with a modal popup viewer.
//!
//! # Architecture
//!
//! ```text
//! content/config.toml  ─┐
//! content/content.toml ─┴─► generate ──► dist/*.html  (markup + widget config JSON)
//!                                          │
//!                        browser ──► web ──► widgets::Controller ──► Frame ──► Surface
//! ```
//!
//! The widgets are plain state machines. Every transition returns a
//! [`widgets::surface::Frame`]: the list of style and class writes that bring
//! the document in line with the new state. A [`widgets::surface::Surface`]
//! applies frames; in the browser that is the `web` adapter over `web-sys`,
//! in tests it is the in-memory [`widgets::surface::MemorySurface`]. Time
//! enters through the [`widgets::carousel::Scheduler`] trait, so the slideshow
//! timer is as testable as a click.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | `config.toml` loading, validation, merging, and breakpoint CSS |
//! | [`content`] | `content.toml` data tables (navigation, pages, slides, gallery, news) |
//! | [`types`] | Shared content types (`NavLink`, `Slide`, `GalleryImage`, `Page`) |
//! | [`news`] | News ordering, selection and headings |
//! | [`widgets`] | Menu bar, slideshow and gallery state machines and their controller |
//! | [`generate`] | Renders the HTML site from config and content using Maud |
//! | [`output`] | CLI output formatting |
//! | `web` | Browser adapter (feature `web`): DOM surface, timers, listeners |
//!
//! # Design Decisions
//!
//! ## One Breakpoint Table
//!
//! The menu bar's band thresholds and per-band sizes live in `[navbar.bands]`.
//! The same table feeds the layout math in [`widgets::navbar`] and the media
//! queries written by [`config::generate_band_css`], so stylesheet and script
//! never disagree about which band a width falls into.
//!
//! ## Markup Without Handlers
//!
//! Generated pages contain no inline JavaScript handlers. Clickable elements
//! carry `data-action`/`data-index` attributes; the adapter resolves a click
//! to a [`widgets::controller::ClickTarget`] and dispatches it. The pages
//! degrade to a static first slide and hidden popups without the wasm module.
//!
//! ## Maud Over Template Engines
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/): malformed markup
//! is a build error and all interpolation is auto-escaped.

pub mod config;
pub mod content;
pub mod generate;
pub mod news;
pub mod output;
pub mod types;
#[cfg(feature = "web")]
pub mod web;
pub mod widgets;

#[cfg(test)]
pub(crate) mod test_helpers;
