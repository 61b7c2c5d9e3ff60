//! Rendering of a completed single prediction
//!
//! The price counts up from zero in fixed frames; the input echo is shown
//! exactly as the server returned it.

use crate::constants::{COUNTER_DURATION_MS, FRAME_INTERVAL_MS};
use crate::format::format_price;
use crate::models::PredictionResult;

/// Linear count-up animation that lands exactly on its end value
#[derive(Clone, Debug, PartialEq)]
pub struct CounterAnimation {
    current: f64,
    end: f64,
    increment: f64,
    finished: bool,
}

impl CounterAnimation {
    pub fn new(start: f64, end: f64, duration_ms: u64, frame_ms: u64) -> Self {
        let steps = duration_ms as f64 / frame_ms.max(1) as f64;
        CounterAnimation {
            current: start,
            end,
            increment: (end - start) / steps,
            finished: false,
        }
    }

    /// Advance one frame, returning the formatted value to display.
    /// Returns `None` once the end value has been shown.
    pub fn next_frame(&mut self) -> Option<String> {
        if self.finished {
            return None;
        }

        self.current += self.increment;
        let reached = if self.increment >= 0.0 {
            self.current >= self.end
        } else {
            self.current <= self.end
        };
        if reached || !self.current.is_finite() {
            self.current = self.end;
            self.finished = true;
        }

        Some(format_price(self.current))
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

/// What the result panel shows
#[derive(Clone, Debug, PartialEq)]
pub struct ResultView {
    /// Formatted price of the latest frame
    pub price_text: String,
    /// `(field, value)` rows in response order
    pub echo_rows: Vec<(String, String)>,
}

/// Drives the result panel
#[derive(Debug, Default)]
pub struct ResultRenderer {
    view: Option<ResultView>,
    animation: Option<CounterAnimation>,
}

impl ResultRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start showing a new result, replacing any previous one
    pub fn render(&mut self, result: &PredictionResult) {
        self.animation = Some(CounterAnimation::new(
            0.0,
            result.predicted_price(),
            COUNTER_DURATION_MS,
            FRAME_INTERVAL_MS,
        ));
        self.view = Some(ResultView {
            price_text: format_price(0.0),
            echo_rows: result.input_echo().to_vec(),
        });
    }

    /// Advance the counter by one frame; returns false when idle
    pub fn tick(&mut self) -> bool {
        let (Some(animation), Some(view)) = (self.animation.as_mut(), self.view.as_mut()) else {
            return false;
        };
        match animation.next_frame() {
            Some(text) => {
                view.price_text = text;
                true
            }
            None => {
                self.animation = None;
                false
            }
        }
    }

    pub fn clear(&mut self) {
        self.view = None;
        self.animation = None;
    }

    pub fn view(&self) -> Option<&ResultView> {
        self.view.as_ref()
    }

    pub fn is_animating(&self) -> bool {
        self.animation.as_ref().is_some_and(|a| !a.is_finished())
    }
}
