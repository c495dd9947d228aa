use std::time::{Duration, Instant};

use tracing::trace;

use crate::library::Library;

pub const ROTATION_PERIOD: Duration = Duration::from_secs(5);
const MIN_PERIOD: Duration = Duration::from_millis(1);

#[derive(Clone, Debug, PartialEq)]
pub struct Quote {
    pub text: String,
    pub title: String,
}

/// Auto-rotating quote list. Holds at most one pending deadline, so arming the
/// timer again always replaces the previous one.
#[derive(Clone, Debug)]
pub struct QuoteCarousel {
    quotes: Vec<Quote>,
    active: usize,
    period: Duration,
    next_tick: Option<Instant>,
}

impl QuoteCarousel {
    pub fn new(library: &Library, period: Duration) -> Self {
        let quotes = library
            .quoted()
            .filter_map(|b| {
                b.quote().map(|q| Quote {
                    text: q.to_string(),
                    title: b.title.clone(),
                })
            })
            .collect();

        QuoteCarousel {
            quotes,
            active: 0,
            period: period.max(MIN_PERIOD),
            next_tick: None,
        }
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active(&self) -> Option<&Quote> {
        self.quotes.get(self.active)
    }

    pub fn is_running(&self) -> bool {
        self.next_tick.is_some()
    }

    /// Arm the rotation timer one full period from `now`.
    pub fn start(&mut self, now: Instant) {
        self.next_tick = Some(now + self.period);
    }

    pub fn stop(&mut self) {
        self.next_tick = None;
    }

    pub fn hover_enter(&mut self) {
        self.stop();
    }

    /// Resets the timer rather than continuing the interrupted period.
    pub fn hover_leave(&mut self, now: Instant) {
        self.start(now);
    }

    /// One timer firing.
    pub fn advance(&mut self) {
        if self.quotes.len() <= 1 {
            return;
        }
        self.active = (self.active + 1) % self.quotes.len();
    }

    /// Fire every deadline that has passed by `now`. Returns how many fired.
    pub fn poll(&mut self, now: Instant) -> usize {
        let mut fired = 0;
        while let Some(deadline) = self.next_tick {
            if now < deadline {
                break;
            }
            self.advance();
            self.next_tick = Some(deadline + self.period);
            fired += 1;
        }
        if fired > 0 {
            trace!(fired, active = self.active, "carousel rotated");
        }
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::BookRecord;

    fn library(quotes: usize) -> Library {
        let books = (0..quotes)
            .map(|i| BookRecord {
                title: format!("Book {i}"),
                synopsis: String::new(),
                external_link: String::new(),
                quote: Some(format!("quote {i}")),
            })
            .chain(std::iter::once(BookRecord {
                title: "Unquoted".into(),
                synopsis: String::new(),
                external_link: String::new(),
                quote: None,
            }))
            .collect();
        Library::new(books)
    }

    #[test]
    fn starts_at_first_quote() {
        let carousel = QuoteCarousel::new(&library(3), ROTATION_PERIOD);
        assert_eq!(carousel.len(), 3);
        assert_eq!(carousel.active_index(), 0);
        assert_eq!(carousel.active().unwrap().text, "quote 0");
        assert_eq!(carousel.active().unwrap().title, "Book 0");
        assert!(!carousel.is_running());
    }

    #[test]
    fn k_firings_land_on_k_mod_n() {
        let mut carousel = QuoteCarousel::new(&library(3), ROTATION_PERIOD);
        for k in 1..=10 {
            carousel.advance();
            assert_eq!(carousel.active_index(), k % 3);
        }
    }

    #[test]
    fn single_or_no_quote_never_moves() {
        for n in [0, 1] {
            let start = Instant::now();
            let mut carousel = QuoteCarousel::new(&library(n), ROTATION_PERIOD);
            carousel.start(start);
            carousel.poll(start + ROTATION_PERIOD * 7);
            assert_eq!(carousel.active_index(), 0);
        }
    }

    #[test]
    fn poll_fires_once_per_period() {
        let start = Instant::now();
        let mut carousel = QuoteCarousel::new(&library(4), ROTATION_PERIOD);
        carousel.start(start);

        assert_eq!(carousel.poll(start + Duration::from_millis(4_999)), 0);
        assert_eq!(carousel.active_index(), 0);
        assert_eq!(carousel.poll(start + ROTATION_PERIOD), 1);
        assert_eq!(carousel.active_index(), 1);
        assert_eq!(carousel.poll(start + ROTATION_PERIOD * 3), 2);
        assert_eq!(carousel.active_index(), 3);
        assert_eq!(carousel.poll(start + ROTATION_PERIOD * 4), 1);
        assert_eq!(carousel.active_index(), 0);
    }

    #[test]
    fn hover_suspends_and_leave_resets() {
        let start = Instant::now();
        let mut carousel = QuoteCarousel::new(&library(3), ROTATION_PERIOD);
        carousel.start(start);

        carousel.hover_enter();
        assert_eq!(carousel.poll(start + ROTATION_PERIOD * 5), 0);
        assert_eq!(carousel.active_index(), 0);

        let left = start + Duration::from_secs(30);
        carousel.hover_leave(left);
        assert_eq!(carousel.poll(left + Duration::from_secs(4)), 0);
        assert_eq!(carousel.poll(left + ROTATION_PERIOD), 1);
        assert_eq!(carousel.active_index(), 1);
    }

    #[test]
    fn zero_period_still_makes_progress() {
        let start = Instant::now();
        let mut carousel = QuoteCarousel::new(&library(3), Duration::ZERO);
        carousel.start(start);
        assert_eq!(carousel.poll(start), 0);
        assert_eq!(carousel.poll(start + Duration::from_millis(4)), 4);
        assert_eq!(carousel.active_index(), 1);
    }

    #[test]
    fn restarting_replaces_pending_timer() {
        let start = Instant::now();
        let mut carousel = QuoteCarousel::new(&library(3), ROTATION_PERIOD);
        carousel.start(start);
        carousel.start(start + Duration::from_secs(3));
        assert_eq!(carousel.poll(start + ROTATION_PERIOD), 0);
        assert_eq!(carousel.poll(start + Duration::from_secs(8)), 1);
    }
}
