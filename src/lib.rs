pub mod error;
pub mod config;
pub mod math;
pub mod library;
pub mod search;
pub mod cards;
pub mod carousel;
pub mod typing;
pub mod canvas;
pub mod particles;
pub mod page;
pub mod visualizer;

pub use error::{NebulaError, Result};
pub use config::Config;
pub use math::{Point, degrees};
pub use library::{BookRecord, DataSource, Library};
pub use search::{SearchOutcome, normalize, search};
pub use cards::{Card, render_cards};
pub use carousel::{Quote, QuoteCarousel};
pub use typing::{TypingPlaceholder, TypingStep};
pub use canvas::Canvas;
pub use particles::{FrameClock, MotionMode, ParticleField, Star};
pub use page::{IntroPhase, PageController, PageEvent, PageTimings, PageView, PollReport, ResultArea};
pub use visualizer::{WindowSettings, spawn_visualizer};
