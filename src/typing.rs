// Placeholder typing effect. The sequence is produced as an iterator of steps;
// whoever drives it owns the clock.

use std::time::Duration;

use rand::Rng;
use rand::rngs::StdRng;

pub const HOLD_PERIOD: Duration = Duration::from_millis(2000);
const NEXT_TEXT_DELAY: Duration = Duration::from_millis(500);
const CURSOR: char = '|';

#[derive(Clone, Debug, PartialEq)]
pub struct TypingStep {
    pub placeholder: String,
    pub delay: Duration,
}

pub struct TypingPlaceholder {
    texts: Vec<Vec<char>>,
    loop_num: usize,
    shown: usize,
    deleting: bool,
    period: Duration,
    rng: StdRng,
}

impl TypingPlaceholder {
    pub fn new(texts: Vec<String>, period: Duration, rng: StdRng) -> Self {
        TypingPlaceholder {
            texts: texts.into_iter().map(|t| t.chars().collect()).collect(),
            loop_num: 0,
            shown: 0,
            deleting: false,
            period,
            rng,
        }
    }

    pub fn current_text(&self) -> Option<String> {
        let full = self.texts.get(self.loop_num % self.texts.len().max(1))?;
        Some(full[..self.shown].iter().collect())
    }
}

impl Iterator for TypingPlaceholder {
    type Item = TypingStep;

    fn next(&mut self) -> Option<TypingStep> {
        if self.texts.is_empty() {
            return None;
        }

        let full = &self.texts[self.loop_num % self.texts.len()];

        if self.deleting {
            self.shown = self.shown.saturating_sub(1);
        } else {
            self.shown = (self.shown + 1).min(full.len());
        }

        let mut placeholder: String = full[..self.shown].iter().collect();
        placeholder.push(CURSOR);

        // 100..=200 ms per keystroke, deleting twice as fast.
        let mut delta_ms = 200.0 - self.rng.gen_range(0.0..100.0);
        if self.deleting {
            delta_ms /= 2.0;
        }
        let mut delay = Duration::from_secs_f64(delta_ms / 1000.0);

        if !self.deleting && self.shown == full.len() {
            delay = self.period;
            self.deleting = true;
        } else if self.deleting && self.shown == 0 {
            self.deleting = false;
            self.loop_num += 1;
            delay = NEXT_TEXT_DELAY;
        }

        Some(TypingStep { placeholder, delay })
    }
}
