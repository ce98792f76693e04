//! Event dispatch for one page.
//!
//! A [`Controller`] owns the page's widgets, the surface they draw on and
//! the scheduler backing the slideshow timer. Events are handled one at a
//! time to completion: the widget(s) concerned compute a frame and the
//! whole frame is applied before `dispatch` returns. A later scroll or
//! resize simply overwrites the geometry of an earlier one.

use super::WidgetError;
use super::carousel::{Carousel, Scheduler, TimerToken};
use super::gallery::{Gallery, Key};
use super::navbar::{ActiveRules, LayoutParams, NavBar};
use super::surface::{Frame, Surface};
use crate::types::NavLink;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// `data-action` values the generated markup attaches to clickable
/// elements.
pub mod action {
    pub const SLIDE_PREV: &str = "slide-prev";
    pub const SLIDE_NEXT: &str = "slide-next";
    pub const SLIDE_DOT: &str = "slide-dot";
    pub const THUMBNAIL: &str = "thumbnail";
    pub const POPUP_IMAGE: &str = "popup-image";
    pub const POPUP_PREV: &str = "popup-prev";
    pub const POPUP_NEXT: &str = "popup-next";
    pub const POPUP_CLOSE: &str = "popup-close";
}

/// Element id of the embedded widget configuration.
pub const CONFIG_ELEMENT_ID: &str = "widget_config";

/// Everything the browser side needs to build a [`Controller`]. Embedded
/// in each page as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetConfig {
    pub links: Vec<NavLink>,
    pub layout: LayoutParams,
    pub active: ActiveRules,
    pub icon_dir: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slideshow: Option<SlideshowConfig>,
    /// Number of gallery images on the page, if it has a gallery.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gallery: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlideshowConfig {
    pub slide_count: usize,
    pub interval_ms: u64,
}

/// What a click landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    SlidePrev,
    SlideNext,
    /// 1-based slide index.
    SlideDot(usize),
    /// 0-based gallery position.
    Thumbnail(usize),
    PopupImage,
    PopupPrev,
    PopupNext,
    PopupClose,
    Elsewhere,
}

impl ClickTarget {
    /// Resolve the nearest `data-action` (and `data-index`) of a click.
    pub fn from_action(action: Option<&str>, index: Option<usize>) -> Self {
        match (action, index) {
            (Some(action::SLIDE_PREV), _) => ClickTarget::SlidePrev,
            (Some(action::SLIDE_NEXT), _) => ClickTarget::SlideNext,
            (Some(action::SLIDE_DOT), Some(i)) => ClickTarget::SlideDot(i),
            (Some(action::THUMBNAIL), Some(i)) => ClickTarget::Thumbnail(i),
            (Some(action::POPUP_IMAGE), _) => ClickTarget::PopupImage,
            (Some(action::POPUP_PREV), _) => ClickTarget::PopupPrev,
            (Some(action::POPUP_NEXT), _) => ClickTarget::PopupNext,
            (Some(action::POPUP_CLOSE), _) => ClickTarget::PopupClose,
            _ => ClickTarget::Elsewhere,
        }
    }
}

/// Page input, already translated from DOM events.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Load {
        width: f64,
        scroll_y: f64,
        url: String,
    },
    Scroll {
        width: f64,
        scroll_y: f64,
    },
    Resize {
        width: f64,
        scroll_y: f64,
    },
    Click(ClickTarget),
    KeyDown(Key),
    PointerEnter(String),
    PointerLeave(String),
    TimerFired(TimerToken),
}

pub struct Controller<S, T> {
    surface: S,
    scheduler: T,
    active: ActiveRules,
    navbar: NavBar,
    carousel: Option<Carousel>,
    gallery: Option<Gallery>,
}

impl<S: Surface, T: Scheduler> Controller<S, T> {
    pub fn new(config: &WidgetConfig, surface: S, scheduler: T) -> Result<Self, WidgetError> {
        let navbar = NavBar::new(
            config.links.clone(),
            config.layout.clone(),
            config.icon_dir.clone(),
        )?;
        let carousel = config
            .slideshow
            .as_ref()
            .map(|s| Carousel::new(s.slide_count, Duration::from_millis(s.interval_ms)))
            .transpose()?;
        let gallery = config.gallery.map(Gallery::new);
        Ok(Self {
            surface,
            scheduler,
            active: config.active.clone(),
            navbar,
            carousel,
            gallery,
        })
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn scheduler(&self) -> &T {
        &self.scheduler
    }

    pub fn navbar(&self) -> &NavBar {
        &self.navbar
    }

    pub fn carousel(&self) -> Option<&Carousel> {
        self.carousel.as_ref()
    }

    pub fn gallery(&self) -> Option<&Gallery> {
        self.gallery.as_ref()
    }

    /// Handle one event to completion.
    pub fn dispatch(&mut self, event: Event) -> Result<(), WidgetError> {
        let frame = self.frame_for(event)?;
        if !frame.is_empty() {
            self.surface.apply(&frame)?;
        }
        Ok(())
    }

    fn frame_for(&mut self, event: Event) -> Result<Frame, WidgetError> {
        let frame = match event {
            Event::Load {
                width,
                scroll_y,
                url,
            } => {
                tracing::debug!(%url, width, "page load");
                let mut frame = self.navbar.relayout(width, scroll_y);
                frame.extend(self.navbar.mark_active(&url, &self.active));
                if let Some(carousel) = self.carousel.as_mut() {
                    frame.extend(carousel.start(&mut self.scheduler));
                }
                if let Some(gallery) = self.gallery.as_mut() {
                    frame.extend(gallery.close());
                }
                frame
            }
            Event::Scroll { width, scroll_y } | Event::Resize { width, scroll_y } => {
                self.navbar.relayout(width, scroll_y)
            }
            Event::Click(target) => self.click(target)?,
            Event::KeyDown(key) => self
                .gallery
                .as_mut()
                .map(|g| g.key(key))
                .unwrap_or_default(),
            Event::PointerEnter(id) => self.navbar.pointer_enter(&id),
            Event::PointerLeave(id) => self.navbar.pointer_leave(&id),
            Event::TimerFired(token) => {
                self.scheduler.expired(token);
                match self.carousel.as_mut() {
                    Some(carousel) => carousel.timer_fired(token, &mut self.scheduler),
                    None => Frame::new(),
                }
            }
        };
        Ok(frame)
    }

    fn click(&mut self, target: ClickTarget) -> Result<Frame, WidgetError> {
        let scheduler = &mut self.scheduler;
        let frame = match target {
            ClickTarget::SlidePrev => self
                .carousel
                .as_mut()
                .map(|c| c.advance(-1, scheduler))
                .unwrap_or_default(),
            ClickTarget::SlideNext => self
                .carousel
                .as_mut()
                .map(|c| c.advance(1, scheduler))
                .unwrap_or_default(),
            ClickTarget::SlideDot(n) => self
                .carousel
                .as_mut()
                .map(|c| c.go_to(n, scheduler))
                .unwrap_or_default(),
            ClickTarget::Thumbnail(position) => match self.gallery.as_mut() {
                Some(gallery) => gallery.open(position)?,
                None => Frame::new(),
            },
            // Clicks on the popup image itself must not reach the backdrop
            ClickTarget::PopupImage => Frame::new(),
            ClickTarget::PopupPrev => self.gallery_step(-1),
            ClickTarget::PopupNext => self.gallery_step(1),
            ClickTarget::PopupClose => self
                .gallery
                .as_mut()
                .map(Gallery::close)
                .unwrap_or_default(),
            ClickTarget::Elsewhere => self
                .gallery
                .as_mut()
                .map(Gallery::backdrop_click)
                .unwrap_or_default(),
        };
        Ok(frame)
    }

    fn gallery_step(&mut self, delta: i64) -> Frame {
        self.gallery
            .as_mut()
            .map(|g| g.step(delta))
            .unwrap_or_default()
    }
}
