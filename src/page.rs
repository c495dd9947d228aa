// Page state and the single place where events change it.

use std::fmt;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::canvas::Canvas;
use crate::cards::{Card, render_cards};
use crate::carousel::{Quote, QuoteCarousel, ROTATION_PERIOD};
use crate::library::Library;
use crate::particles::ParticleField;
use crate::search::{SearchOutcome, normalize, search};
use crate::typing::{HOLD_PERIOD, TypingPlaceholder};

pub const NO_RESULTS_MESSAGE: &str =
    "Our sensors swept the galaxy and found no records with that name.";
pub const LOAD_FAILED_MESSAGE: &str =
    "Connection to the Data Nebula failed. Please try again later.";
pub const DEFAULT_PLACEHOLDER: &str = "Search the nebula...";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageTimings {
    pub carousel_period: Duration,
    pub typing_start_delay: Duration,
    pub typing_period: Duration,
    pub typing_samples: usize,
    /// Delay between activation and the animation settling behind the page.
    pub backdrop_delay: Duration,
}

impl Default for PageTimings {
    fn default() -> Self {
        PageTimings {
            carousel_period: ROTATION_PERIOD,
            typing_start_delay: Duration::from_secs(3),
            typing_period: HOLD_PERIOD,
            typing_samples: 5,
            backdrop_delay: Duration::from_millis(1500),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IntroPhase {
    /// Full-screen animation with the enter hotspot.
    Intro,
    /// Activated; content fading in over the dispersing field.
    Revealed,
    /// The animation now sits behind the page.
    Backdrop,
}

#[derive(Debug)]
pub enum PageEvent {
    DatasetLoaded(Library),
    DatasetFailed(String),
    SearchInput(String),
    ClearSearch,
    InputFocus,
    InputBlur,
    PointerEnter,
    PointerLeave,
    Activate,
    TogglePause,
    CarouselHoverEnter,
    CarouselHoverLeave,
}

enum DataState {
    Loading,
    Ready(Library),
    Failed,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ResultArea {
    Loading,
    LoadFailed,
    Carousel(Option<Quote>),
    Cards(Vec<Card>),
    NoResults,
}

impl fmt::Display for ResultArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultArea::Loading => write!(f, "loading..."),
            ResultArea::LoadFailed => write!(f, "{LOAD_FAILED_MESSAGE}"),
            ResultArea::NoResults => write!(f, "{NO_RESULTS_MESSAGE}"),
            ResultArea::Carousel(None) => Ok(()),
            ResultArea::Carousel(Some(quote)) => write!(f, "“{}”\n  — {}", quote.text, quote.title),
            ResultArea::Cards(cards) => {
                for (i, card) in cards.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{card}")?;
                }
                Ok(())
            }
        }
    }
}

/// Snapshot of everything a front end needs to draw the page.
#[derive(Clone, Debug, PartialEq)]
pub struct PageView {
    pub phase: IntroPhase,
    pub content_visible: bool,
    /// `Some(paused)` once the pause control exists.
    pub pause_control: Option<bool>,
    pub query: String,
    pub input_focused: bool,
    pub placeholder: String,
    pub placeholder_faded: bool,
    pub clear_button_visible: bool,
    pub results: ResultArea,
}

/// What changed during a `poll`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PollReport {
    pub carousel_rotated: bool,
    pub placeholder_changed: bool,
    pub entered_backdrop: bool,
}

pub struct PageController {
    timings: PageTimings,
    data: DataState,
    field: ParticleField,
    carousel: Option<QuoteCarousel>,
    typing: Option<TypingPlaceholder>,
    next_typing_at: Option<Instant>,
    placeholder: String,
    placeholder_faded: bool,
    query: String,
    input_focused: bool,
    phase: IntroPhase,
    backdrop_at: Option<Instant>,
    pause_control: bool,
    rng: StdRng,
}

impl PageController {
    pub fn new(timings: PageTimings, field: ParticleField, rng: StdRng) -> Self {
        PageController {
            timings,
            data: DataState::Loading,
            field,
            carousel: None,
            typing: None,
            next_typing_at: None,
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            placeholder_faded: false,
            query: String::new(),
            input_focused: false,
            phase: IntroPhase::Intro,
            backdrop_at: None,
            pause_control: false,
            rng,
        }
    }

    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    pub fn phase(&self) -> IntroPhase {
        self.phase
    }

    pub fn carousel(&self) -> Option<&QuoteCarousel> {
        self.carousel.as_ref()
    }

    pub fn dispatch(&mut self, event: PageEvent, now: Instant) {
        debug!(?event, "page event");
        match event {
            PageEvent::DatasetLoaded(library) => self.on_loaded(library, now),
            PageEvent::DatasetFailed(_) => self.data = DataState::Failed,
            PageEvent::SearchInput(text) => self.query = text,
            PageEvent::ClearSearch => {
                self.query.clear();
                self.input_focused = true;
                self.placeholder_faded = true;
            }
            PageEvent::InputFocus => {
                self.input_focused = true;
                self.placeholder_faded = true;
            }
            PageEvent::InputBlur => {
                self.input_focused = false;
                if self.query.is_empty() {
                    self.placeholder_faded = false;
                }
            }
            PageEvent::PointerEnter => self.field.pointer_enter(),
            PageEvent::PointerLeave => self.field.pointer_leave(),
            PageEvent::Activate => self.on_activate(now),
            PageEvent::TogglePause => {
                if self.pause_control {
                    let paused = self.field.toggle_pause(now);
                    info!(paused, "animation toggled");
                }
            }
            PageEvent::CarouselHoverEnter => {
                if let Some(carousel) = self.carousel.as_mut() {
                    carousel.hover_enter();
                }
            }
            PageEvent::CarouselHoverLeave => {
                if let Some(carousel) = self.carousel.as_mut() {
                    carousel.hover_leave(now);
                }
            }
        }
    }

    fn on_loaded(&mut self, library: Library, now: Instant) {
        let mut carousel = QuoteCarousel::new(&library, self.timings.carousel_period);
        carousel.start(now);
        info!(books = library.len(), quotes = carousel.len(), "page ready");

        let seed = self.rng.gen_range(0..u64::MAX);
        self.typing = Some(TypingPlaceholder::new(
            library.sample_titles(self.timings.typing_samples),
            self.timings.typing_period,
            StdRng::seed_from_u64(seed),
        ));
        self.next_typing_at = Some(now + self.timings.typing_start_delay);
        self.carousel = Some(carousel);
        self.data = DataState::Ready(library);
    }

    fn on_activate(&mut self, now: Instant) {
        if !self.field.activate() {
            return;
        }
        info!("intro activated");
        self.phase = IntroPhase::Revealed;
        self.pause_control = true;
        self.backdrop_at = Some(now + self.timings.backdrop_delay);
    }

    /// Run every timer that is due at `now`.
    pub fn poll(&mut self, now: Instant) -> PollReport {
        let mut report = PollReport::default();

        if let Some(carousel) = self.carousel.as_mut() {
            let before = carousel.active_index();
            carousel.poll(now);
            report.carousel_rotated = carousel.active_index() != before;
        }

        while let Some(due) = self.next_typing_at {
            if now < due {
                break;
            }
            match self.typing.as_mut().and_then(|t| t.next()) {
                Some(step) => {
                    self.placeholder = step.placeholder;
                    self.next_typing_at = Some(due + step.delay);
                    report.placeholder_changed = true;
                }
                None => self.next_typing_at = None,
            }
        }

        if let Some(at) = self.backdrop_at {
            if now >= at {
                self.backdrop_at = None;
                self.phase = IntroPhase::Backdrop;
                report.entered_backdrop = true;
                debug!("animation moved behind page");
            }
        }

        report
    }

    /// Draw one animation frame. False while paused.
    pub fn render_frame(&mut self, now: Instant, canvas: &mut Canvas) -> bool {
        self.field.render(now, canvas)
    }

    pub fn results(&self) -> ResultArea {
        let library = match &self.data {
            DataState::Loading => return ResultArea::Loading,
            DataState::Failed => return ResultArea::LoadFailed,
            DataState::Ready(library) => library,
        };

        match search(library, &self.query) {
            SearchOutcome::Default => {
                ResultArea::Carousel(self.carousel.as_ref().and_then(|c| c.active().cloned()))
            }
            SearchOutcome::NoResults => ResultArea::NoResults,
            SearchOutcome::Matches(books) => ResultArea::Cards(render_cards(books)),
        }
    }

    pub fn view(&self) -> PageView {
        PageView {
            phase: self.phase,
            content_visible: self.phase != IntroPhase::Intro,
            pause_control: self.pause_control.then(|| self.field.is_paused()),
            query: self.query.clone(),
            input_focused: self.input_focused,
            placeholder: self.placeholder.clone(),
            placeholder_faded: self.placeholder_faded,
            clear_button_visible: !normalize(&self.query).is_empty(),
            results: self.results(),
        }
    }
}
