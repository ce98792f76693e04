//! Modal screenshot gallery.
//!
//! Thumbnails and popups are addressed by their position in the flat
//! gallery sequence: sections concatenated in configuration order, images
//! within a section in configuration order. Stepping wraps over that whole
//! sequence, not per section.

use super::WidgetError;
use super::surface::{Frame, RenderOp, Target};

pub const THUMBNAIL_CLASS: &str = "screenshot_gallery_image";
pub const POPUP_CLASS: &str = "screenshot_gallery_popup_outer_wrapper";

/// Keys the gallery understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    ArrowLeft,
    ArrowRight,
    Other,
}

impl Key {
    /// Map a `KeyboardEvent.key` value.
    pub fn from_name(name: &str) -> Self {
        match name {
            "Escape" | "Esc" => Key::Escape,
            "ArrowLeft" | "Left" => Key::ArrowLeft,
            "ArrowRight" | "Right" => Key::ArrowRight,
            _ => Key::Other,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Gallery {
    image_count: usize,
    open: Option<usize>,
}

impl Gallery {
    pub fn new(image_count: usize) -> Self {
        Self {
            image_count,
            open: None,
        }
    }

    /// Position of the open popup, if any.
    pub fn open_image(&self) -> Option<usize> {
        self.open
    }

    fn hide_all() -> RenderOp {
        RenderOp::style(Target::All(POPUP_CLASS), "display", "none")
    }

    /// Open the popup at `position`, closing whatever was open.
    pub fn open(&mut self, position: usize) -> Result<Frame, WidgetError> {
        if position >= self.image_count {
            return Err(WidgetError::ImageOutOfRange {
                position,
                count: self.image_count,
            });
        }
        Ok(self.show(position))
    }

    /// Show the popup at an in-range `position`.
    fn show(&mut self, position: usize) -> Frame {
        tracing::debug!(position, "gallery popup opened");
        self.open = Some(position);
        vec![
            Self::hide_all(),
            RenderOp::style(Target::nth(POPUP_CLASS, position), "display", "initial"),
        ]
    }

    /// Hide every popup. Calling it while closed changes nothing visible.
    pub fn close(&mut self) -> Frame {
        if self.open.take().is_some() {
            tracing::debug!("gallery popup closed");
        }
        vec![Self::hide_all()]
    }

    /// Open the image `delta` positions away from the open one, wrapping.
    /// Without an open popup this does nothing.
    pub fn step(&mut self, delta: i64) -> Frame {
        let Some(current) = self.open else {
            return Frame::new();
        };
        let count = self.image_count as i64;
        let next = (current as i64 + delta).rem_euclid(count) as usize;
        self.show(next)
    }

    /// Keyboard handling: Escape closes, arrows step, everything else and
    /// anything while closed is ignored.
    pub fn key(&mut self, key: Key) -> Frame {
        if self.open.is_none() {
            return Frame::new();
        }
        match key {
            Key::Escape => self.close(),
            Key::ArrowLeft => self.step(-1),
            Key::ArrowRight => self.step(1),
            Key::Other => Frame::new(),
        }
    }

    /// A click that landed outside the popup image.
    pub fn backdrop_click(&mut self) -> Frame {
        if self.open.is_none() {
            return Frame::new();
        }
        self.close()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::gallery_surface;
    use crate::widgets::surface::Surface;

    fn visible_popups(surface: &crate::widgets::surface::MemorySurface) -> Vec<usize> {
        surface
            .by_class(POPUP_CLASS)
            .iter()
            .enumerate()
            .filter(|(_, e)| e.style("display") == Some("initial"))
            .map(|(i, _)| i)
            .collect()
    }

    #[test]
    fn step_forward_opens_next_position() {
        let mut gallery = Gallery::new(10);
        gallery.open(2).unwrap();
        gallery.step(1);
        assert_eq!(gallery.open_image(), Some(3));
    }

    #[test]
    fn step_forward_from_last_wraps_to_first() {
        let mut gallery = Gallery::new(10);
        gallery.open(9).unwrap();
        gallery.step(1);
        assert_eq!(gallery.open_image(), Some(0));
    }

    #[test]
    fn step_backward_from_first_wraps_to_last() {
        let mut gallery = Gallery::new(10);
        gallery.open(0).unwrap();
        gallery.step(-1);
        assert_eq!(gallery.open_image(), Some(9));
    }

    #[test]
    fn step_while_closed_is_a_no_op() {
        let mut gallery = Gallery::new(10);
        assert!(gallery.step(-1).is_empty());
        assert_eq!(gallery.open_image(), None);
    }

    #[test]
    fn step_in_single_image_gallery_stays_put() {
        let mut gallery = Gallery::new(1);
        gallery.open(0).unwrap();
        gallery.step(1);
        assert_eq!(gallery.open_image(), Some(0));
    }

    #[test]
    fn opening_b_hides_a() {
        let mut surface = gallery_surface(10);
        let mut gallery = Gallery::new(10);

        surface.apply(&gallery.open(1).unwrap()).unwrap();
        assert_eq!(visible_popups(&surface), vec![1]);

        surface.apply(&gallery.open(6).unwrap()).unwrap();
        assert_eq!(visible_popups(&surface), vec![6]);
        assert_eq!(
            surface.by_class(POPUP_CLASS)[1].style("display"),
            Some("none")
        );
    }

    #[test]
    fn wrapping_step_renders_the_new_popup() {
        let mut surface = gallery_surface(10);
        let mut gallery = Gallery::new(10);
        surface.apply(&gallery.open(9).unwrap()).unwrap();

        let frame = gallery.step(1);
        assert!(!frame.is_empty());
        surface.apply(&frame).unwrap();
        assert_eq!(visible_popups(&surface), vec![0]);
    }

    #[test]
    fn open_out_of_range_is_an_error() {
        let mut gallery = Gallery::new(3);
        assert!(matches!(
            gallery.open(3),
            Err(WidgetError::ImageOutOfRange { position: 3, count: 3 })
        ));
        assert_eq!(gallery.open_image(), None);
    }

    #[test]
    fn close_is_idempotent() {
        let mut surface = gallery_surface(4);
        let mut gallery = Gallery::new(4);
        surface.apply(&gallery.open(2).unwrap()).unwrap();

        surface.apply(&gallery.close()).unwrap();
        surface.apply(&gallery.close()).unwrap();

        assert!(visible_popups(&surface).is_empty());
        assert_eq!(gallery.open_image(), None);
    }

    #[test]
    fn escape_closes_and_later_steps_do_nothing() {
        let mut gallery = Gallery::new(10);
        gallery.open(4).unwrap();

        assert!(!gallery.key(Key::Escape).is_empty());
        assert_eq!(gallery.open_image(), None);
        assert!(gallery.step(1).is_empty());
        assert!(gallery.key(Key::ArrowRight).is_empty());
    }

    #[test]
    fn escape_while_closed_is_a_no_op() {
        let mut gallery = Gallery::new(10);
        assert!(gallery.key(Key::Escape).is_empty());
    }

    #[test]
    fn arrow_keys_step() {
        let mut gallery = Gallery::new(5);
        gallery.open(0).unwrap();
        gallery.key(Key::ArrowLeft);
        assert_eq!(gallery.open_image(), Some(4));
        gallery.key(Key::ArrowRight);
        gallery.key(Key::ArrowRight);
        assert_eq!(gallery.open_image(), Some(1));
    }

    #[test]
    fn other_keys_are_ignored() {
        let mut gallery = Gallery::new(5);
        gallery.open(2).unwrap();
        assert!(gallery.key(Key::from_name("Enter")).is_empty());
        assert_eq!(gallery.open_image(), Some(2));
    }

    #[test]
    fn key_names_map() {
        assert_eq!(Key::from_name("Escape"), Key::Escape);
        assert_eq!(Key::from_name("ArrowLeft"), Key::ArrowLeft);
        assert_eq!(Key::from_name("ArrowRight"), Key::ArrowRight);
        assert_eq!(Key::from_name("a"), Key::Other);
    }

    #[test]
    fn backdrop_click_closes_only_when_open() {
        let mut gallery = Gallery::new(3);
        assert!(gallery.backdrop_click().is_empty());
        gallery.open(1).unwrap();
        assert!(!gallery.backdrop_click().is_empty());
        assert_eq!(gallery.open_image(), None);
    }
}
