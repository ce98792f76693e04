//! Interactive page widgets.
//!
//! Each widget is a plain state struct whose methods map an input to a
//! [`Frame`](surface::Frame) of render ops; none of them touch a document.
//! The [`controller`] owns one instance of each widget a page uses and
//! applies their frames to a [`Surface`](surface::Surface).
//!
//! | Widget | State |
//! |--------|-------|
//! | [`navbar::NavBar`] | last layout pass, open dropdown |
//! | [`carousel::Carousel`] | current slide, pending advance timer |
//! | [`gallery::Gallery`] | open popup |

pub mod carousel;
pub mod controller;
pub mod gallery;
pub mod navbar;
pub mod surface;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum WidgetError {
    #[error("duplicate navigation link id '{0}'")]
    DuplicateLinkId(String),
    #[error("navigation link '{0}' has children and cannot be absolute")]
    AbsoluteParent(String),
    #[error("navigation link '{0}' is nested deeper than one dropdown level")]
    NestedTooDeep(String),
    #[error("invalid navbar layout: {0}")]
    Layout(String),
    #[error("slideshow has no slides")]
    NoSlides,
    #[error("gallery image {position} out of range (gallery has {count})")]
    ImageOutOfRange { position: usize, count: usize },
    #[error("surface error: {0}")]
    Surface(#[from] surface::SurfaceError),
}
