//! Auto-advancing slideshow.
//!
//! States are the 1-based slide indices `1..=N`. Every transition, manual
//! or automatic, goes through [`Carousel::advance`], which wraps in both
//! directions, renders exactly one slide visible and re-arms the advance
//! timer. The carousel owns at most one pending timer: arming cancels the
//! previous one first, so manual navigation restarts the cadence instead of
//! racing it. A timer that fires after being superseded is recognised by
//! its token and ignored.

use super::WidgetError;
use super::surface::{Frame, RenderOp, Target};
use std::time::Duration;

pub const IMAGE_CLASS: &str = "slideshow_image";
pub const TEXT_CLASS: &str = "slideshow_text";
pub const DOT_CLASS: &str = "slideshow_dot";
pub const DOT_ACTIVE_CLASS: &str = "slideshow_dot_active";

pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(5000);

/// Identifies one scheduled one-shot timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerToken(pub u64);

/// Deferred one-shot callbacks. Expiry is reported back to the owner as
/// an event carrying the token.
pub trait Scheduler {
    fn schedule(&mut self, delay: Duration) -> TimerToken;

    fn cancel(&mut self, token: TimerToken);

    /// The timer for `token` has fired; release whatever backs it.
    fn expired(&mut self, _token: TimerToken) {}
}

/// Wrap `current + delta` into `1..=count`.
///
/// `count` must be non-zero.
pub fn wrap_index(current: usize, delta: i64, count: usize) -> usize {
    let n = count as i64;
    (current as i64 - 1 + delta).rem_euclid(n) as usize + 1
}

#[derive(Debug, Clone)]
pub struct Carousel {
    slide_count: usize,
    current: usize,
    interval: Duration,
    pending: Option<TimerToken>,
}

impl Carousel {
    pub fn new(slide_count: usize, interval: Duration) -> Result<Self, WidgetError> {
        if slide_count == 0 {
            return Err(WidgetError::NoSlides);
        }
        Ok(Self {
            slide_count,
            current: 1,
            interval,
            pending: None,
        })
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn pending_timer(&self) -> Option<TimerToken> {
        self.pending
    }

    /// Show the first slide and start the automatic cadence.
    pub fn start(&mut self, scheduler: &mut dyn Scheduler) -> Frame {
        self.show(1, scheduler)
    }

    /// Move `delta` slides, wrapping at both ends.
    pub fn advance(&mut self, delta: i64, scheduler: &mut dyn Scheduler) -> Frame {
        let next = wrap_index(self.current, delta, self.slide_count);
        self.show(next, scheduler)
    }

    /// Jump to slide `n` (1-based). Out-of-range values wrap like any other
    /// transition.
    pub fn go_to(&mut self, n: usize, scheduler: &mut dyn Scheduler) -> Frame {
        self.advance(n as i64 - self.current as i64, scheduler)
    }

    /// The advance timer fired. Stale tokens are ignored.
    pub fn timer_fired(&mut self, token: TimerToken, scheduler: &mut dyn Scheduler) -> Frame {
        if self.pending != Some(token) {
            tracing::debug!(?token, "ignoring superseded slideshow timer");
            return Frame::new();
        }
        self.pending = None;
        self.advance(1, scheduler)
    }

    fn show(&mut self, index: usize, scheduler: &mut dyn Scheduler) -> Frame {
        self.current = index;
        tracing::debug!(slide = index, of = self.slide_count, "slideshow transition");
        let frame = self.render();
        self.rearm(scheduler);
        frame
    }

    fn rearm(&mut self, scheduler: &mut dyn Scheduler) {
        if let Some(previous) = self.pending.take() {
            scheduler.cancel(previous);
        }
        self.pending = Some(scheduler.schedule(self.interval));
    }

    /// Opacity and dot state for the current slide, covering every slide so
    /// the frame fully determines what is visible.
    pub fn render(&self) -> Frame {
        let mut frame = Frame::with_capacity(self.slide_count * 3);
        for i in 0..self.slide_count {
            let visible = i + 1 == self.current;
            let opacity = if visible { "1" } else { "0" };
            frame.push(RenderOp::style(Target::nth(IMAGE_CLASS, i), "opacity", opacity));
            frame.push(RenderOp::style(Target::nth(TEXT_CLASS, i), "opacity", opacity));
            frame.push(RenderOp::class(
                Target::nth(DOT_CLASS, i),
                DOT_ACTIVE_CLASS,
                visible,
            ));
        }
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{ManualScheduler, carousel_surface};
    use crate::widgets::surface::Surface;

    fn started(count: usize) -> (Carousel, ManualScheduler) {
        let mut scheduler = ManualScheduler::default();
        let mut carousel = Carousel::new(count, DEFAULT_INTERVAL).unwrap();
        carousel.start(&mut scheduler);
        (carousel, scheduler)
    }

    #[test]
    fn wrap_index_wraps_both_ways() {
        assert_eq!(wrap_index(1, -1, 10), 10);
        assert_eq!(wrap_index(10, 1, 10), 1);
        assert_eq!(wrap_index(3, 0, 10), 3);
        assert_eq!(wrap_index(1, -21, 10), 10);
        assert_eq!(wrap_index(5, 27, 10), 2);
    }

    #[test]
    fn zero_slides_is_a_configuration_error() {
        assert!(matches!(
            Carousel::new(0, DEFAULT_INTERVAL),
            Err(WidgetError::NoSlides)
        ));
    }

    #[test]
    fn start_shows_first_slide_and_arms_timer() {
        let (carousel, scheduler) = started(10);
        assert_eq!(carousel.current(), 1);
        assert_eq!(scheduler.pending(), vec![carousel.pending_timer().unwrap()]);
        assert_eq!(scheduler.scheduled[0].1, Duration::from_millis(5000));
    }

    #[test]
    fn backwards_from_first_wraps_to_last() {
        let (mut carousel, mut scheduler) = started(10);
        carousel.advance(-1, &mut scheduler);
        assert_eq!(carousel.current(), 10);
    }

    #[test]
    fn forwards_from_last_wraps_to_first() {
        let (mut carousel, mut scheduler) = started(10);
        carousel.go_to(10, &mut scheduler);
        carousel.advance(1, &mut scheduler);
        assert_eq!(carousel.current(), 1);
    }

    #[test]
    fn go_to_then_advance() {
        let (mut carousel, mut scheduler) = started(10);
        carousel.go_to(5, &mut scheduler);
        assert_eq!(carousel.current(), 5);
        carousel.advance(1, &mut scheduler);
        assert_eq!(carousel.current(), 6);
    }

    #[test]
    fn go_to_out_of_range_wraps() {
        let (mut carousel, mut scheduler) = started(10);
        carousel.go_to(0, &mut scheduler);
        assert_eq!(carousel.current(), 10);
        carousel.go_to(11, &mut scheduler);
        assert_eq!(carousel.current(), 1);
    }

    #[test]
    fn exactly_one_slide_visible_after_every_transition() {
        let mut surface = carousel_surface(10);
        let (mut carousel, mut scheduler) = started(10);
        for delta in [1, 1, -3, 7, -1, 10, 2] {
            surface.apply(&carousel.advance(delta, &mut scheduler)).unwrap();

            let visible: Vec<usize> = surface
                .by_class(IMAGE_CLASS)
                .iter()
                .enumerate()
                .filter(|(_, e)| e.style("opacity") == Some("1"))
                .map(|(i, _)| i + 1)
                .collect();
            assert_eq!(visible, vec![carousel.current()]);

            let captions = surface
                .by_class(TEXT_CLASS)
                .iter()
                .filter(|e| e.style("opacity") == Some("1"))
                .count();
            assert_eq!(captions, 1);

            let active_dots: Vec<usize> = surface
                .by_class(DOT_CLASS)
                .iter()
                .enumerate()
                .filter(|(_, e)| e.has_class(DOT_ACTIVE_CLASS))
                .map(|(i, _)| i + 1)
                .collect();
            assert_eq!(active_dots, vec![carousel.current()]);
        }
    }

    #[test]
    fn manual_navigation_cancels_pending_timer_and_arms_one() {
        let (mut carousel, mut scheduler) = started(10);
        let first = carousel.pending_timer().unwrap();

        carousel.advance(1, &mut scheduler);

        assert_eq!(scheduler.cancelled, vec![first]);
        let second = carousel.pending_timer().unwrap();
        assert_ne!(first, second);
        assert_eq!(scheduler.pending(), vec![second]);
    }

    #[test]
    fn timer_fire_advances_and_rearms() {
        let (mut carousel, mut scheduler) = started(3);
        let token = carousel.pending_timer().unwrap();

        let frame = carousel.timer_fired(token, &mut scheduler);
        assert!(!frame.is_empty());
        assert_eq!(carousel.current(), 2);
        // The fired timer is not cancelled, a fresh one is armed
        assert!(scheduler.cancelled.is_empty());
        assert_eq!(scheduler.scheduled.len(), 2);
    }

    #[test]
    fn superseded_timer_is_ignored() {
        let (mut carousel, mut scheduler) = started(3);
        let stale = carousel.pending_timer().unwrap();
        carousel.advance(1, &mut scheduler);

        let frame = carousel.timer_fired(stale, &mut scheduler);
        assert!(frame.is_empty());
        assert_eq!(carousel.current(), 2);
    }

    #[test]
    fn single_slide_still_renders_and_rearms() {
        let (mut carousel, mut scheduler) = started(1);
        let before = carousel.pending_timer().unwrap();

        let frame = carousel.advance(1, &mut scheduler);

        assert_eq!(carousel.current(), 1);
        assert_eq!(frame.len(), 3);
        assert_ne!(carousel.pending_timer().unwrap(), before);
        assert_eq!(scheduler.pending().len(), 1);
    }
}
