// Intro "black hole": a ring of stars orbiting the canvas center.
//
// Stars are plain records in an owned Vec, addressed by index. Their radial
// position is eased a little every frame toward a mode-dependent target while
// the rotation is a pure function of (pause-adjusted) elapsed time.

use std::time::{Duration, Instant};

use rand::Rng;
use tracing::debug;

use crate::canvas::{BACKGROUND, Canvas, STAR_COLOR, TRAIL_ALPHA};
use crate::math::{Point, degrees};

pub const MAX_ORBIT: f64 = 255.0;
pub const STAR_COUNT: usize = 2500;

/// Milliseconds per animation time unit.
const MS_PER_UNIT: f64 = 80.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MotionMode {
    /// Drift back to the base orbit.
    Idle,
    /// Pointer over the hotspot: pull into a tighter ring.
    Converge,
    /// Activated: fling outward at half rotation speed. Terminal.
    Disperse,
}

#[derive(Clone, Debug)]
pub struct Star {
    pub orbital: f64,
    pub speed: f64,
    pub start_rotation: f64,
    pub rotation: f64,
    pub x: f64,
    pub y: f64,
    pub y_origin: f64,
    pub hover_pos: f64,
    pub expanse_pos: f64,
    pub alpha: f32,
    prev_rotation: f64,
    prev_x: f64,
    prev_y: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub from: Point,
    pub to: Point,
    pub alpha: f32,
}

impl Star {
    pub fn spawn<R: Rng>(id: usize, center: Point, rng: &mut R) -> Self {
        let inner = rng.gen_range(0.0..1.0) * (MAX_ORBIT / 2.0) + 1.0;
        let outer = rng.gen_range(0.0..1.0) * (MAX_ORBIT / 2.0) + MAX_ORBIT;
        let orbital = (inner + outer) / 2.0;

        let speed = degrees((rng.gen_range(0.0..1.0_f64) * 2.5).floor() + 1.5);
        let start_rotation = degrees((rng.gen_range(0.0..1.0_f64) * 360.0).floor() + 1.0);
        let collapse_bonus = (orbital - MAX_ORBIT * 0.7).max(0.0);

        // Dispersal targets stack by creation order in bands of 100.
        let band = (id % 100) as f64 * -10.0;
        let jitter = (rng.gen_range(0.0..1.0_f64) * 20.0).floor() + 1.0;

        let y = center.y + orbital;
        Star {
            orbital,
            speed,
            start_rotation,
            rotation: 0.0,
            x: center.x,
            y,
            y_origin: y,
            hover_pos: center.y + MAX_ORBIT / 2.0 + collapse_bonus,
            expanse_pos: center.y + band + jitter,
            alpha: (1.0 - orbital / 255.0) as f32,
            prev_rotation: start_rotation,
            prev_x: center.x,
            prev_y: y,
        }
    }

    fn step(&mut self, mode: MotionMode, t: f64) {
        self.rotation = self.start_rotation + t * self.speed;

        match mode {
            MotionMode::Idle => {
                if self.y > self.y_origin {
                    self.y -= 2.5;
                }
                if self.y < self.y_origin - 4.0 {
                    self.y += (self.y_origin - self.y) / 10.0;
                }
            }
            MotionMode::Converge => {
                if self.y > self.hover_pos {
                    self.y += (self.hover_pos - self.y) / 5.0;
                }
                if self.y < self.hover_pos - 4.0 {
                    self.y += 2.5;
                }
            }
            MotionMode::Disperse => {
                self.rotation = self.start_rotation + t * self.speed / 2.0;
                if self.y > self.expanse_pos {
                    self.y += (self.expanse_pos - self.y).floor() / 80.0;
                }
            }
        }
    }

    /// Trail segment from the last drawn position to the current one.
    fn commit(&mut self, center: Point) -> Segment {
        let from = Point::new(self.prev_x, self.prev_y).rotate_about(center, self.prev_rotation);
        let to = Point::new(self.x, self.y).rotate_about(center, self.rotation);

        self.prev_rotation = self.rotation;
        self.prev_x = self.x;
        self.prev_y = self.y;

        Segment { from, to, alpha: self.alpha }
    }
}

/// Elapsed-time accounting that excludes paused intervals.
#[derive(Clone, Debug)]
pub struct FrameClock {
    start: Instant,
    paused_total: Duration,
    paused_at: Option<Instant>,
}

impl FrameClock {
    pub fn new(start: Instant) -> Self {
        FrameClock {
            start,
            paused_total: Duration::ZERO,
            paused_at: None,
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused_at.is_some()
    }

    pub fn pause(&mut self, now: Instant) -> bool {
        if self.paused_at.is_some() {
            return false;
        }
        self.paused_at = Some(now);
        true
    }

    pub fn resume(&mut self, now: Instant) -> bool {
        match self.paused_at.take() {
            Some(since) => {
                self.paused_total += now.saturating_duration_since(since);
                true
            }
            None => false,
        }
    }

    pub fn paused_total(&self) -> Duration {
        self.paused_total
    }

    /// Running time at `now`. Frozen while paused.
    pub fn elapsed(&self, now: Instant) -> Duration {
        let now = self.paused_at.unwrap_or(now);
        now.saturating_duration_since(self.start)
            .saturating_sub(self.paused_total)
    }

    pub fn time_units(&self, now: Instant) -> f64 {
        self.elapsed(now).as_secs_f64() * 1000.0 / MS_PER_UNIT
    }
}

pub struct ParticleField {
    stars: Vec<Star>,
    center: Point,
    mode: MotionMode,
    clock: FrameClock,
}

impl ParticleField {
    pub fn new<R: Rng>(width: usize, height: usize, count: usize, start: Instant, rng: &mut R) -> Self {
        let center = Point::new(width as f64 / 2.0, height as f64 / 2.0);
        let stars = (0..count).map(|id| Star::spawn(id, center, rng)).collect();
        debug!(count, width, height, "particle field created");

        ParticleField {
            stars,
            center,
            mode: MotionMode::Idle,
            clock: FrameClock::new(start),
        }
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    pub fn center(&self) -> Point {
        self.center
    }

    pub fn mode(&self) -> MotionMode {
        self.mode
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    pub fn is_activated(&self) -> bool {
        self.mode == MotionMode::Disperse
    }

    pub fn is_paused(&self) -> bool {
        self.clock.is_paused()
    }

    pub fn pointer_enter(&mut self) {
        if self.mode == MotionMode::Idle {
            self.mode = MotionMode::Converge;
        }
    }

    pub fn pointer_leave(&mut self) {
        if self.mode == MotionMode::Converge {
            self.mode = MotionMode::Idle;
        }
    }

    /// Switch to dispersal. Returns false if already activated.
    pub fn activate(&mut self) -> bool {
        if self.is_activated() {
            return false;
        }
        self.mode = MotionMode::Disperse;
        true
    }

    pub fn pause(&mut self, now: Instant) -> bool {
        self.clock.pause(now)
    }

    pub fn resume(&mut self, now: Instant) -> bool {
        self.clock.resume(now)
    }

    /// Returns whether the field is paused afterwards.
    pub fn toggle_pause(&mut self, now: Instant) -> bool {
        if self.clock.is_paused() {
            self.clock.resume(now);
        } else {
            self.clock.pause(now);
        }
        self.clock.is_paused()
    }

    /// Advance every star to `now` and hand each trail segment to `draw`.
    /// Does nothing while paused.
    pub fn frame<F>(&mut self, now: Instant, mut draw: F) -> bool
    where
        F: FnMut(Segment),
    {
        if self.clock.is_paused() {
            return false;
        }

        let t = self.clock.time_units(now);
        let mode = self.mode;
        let center = self.center;
        for star in &mut self.stars {
            star.step(mode, t);
            draw(star.commit(center));
        }
        true
    }

    /// Trail fade plus one frame of strokes.
    pub fn render(&mut self, now: Instant, canvas: &mut Canvas) -> bool {
        if self.clock.is_paused() {
            return false;
        }
        canvas.fade(BACKGROUND, TRAIL_ALPHA);
        self.frame(now, |seg| canvas.stroke_line(seg.from, seg.to, STAR_COLOR, seg.alpha))
    }
}
