//! Open/closed state of the overlay and its slide animation.

use std::time::{Duration, Instant};

/// Slide duration between the two states.
pub const SLIDE_DURATION: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy)]
struct Transition {
    from: f64,
    started: Instant,
}

/// Two stable states, one toggle. `position` is presentational: 0.0 is fully
/// off-screen, 1.0 fully on-screen.
#[derive(Debug, Clone, Default)]
pub struct Overlay {
    is_open: bool,
    transition: Option<Transition>,
}

impl Overlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    /// Flip the state. A slide already in flight reverses from where it is.
    pub fn toggle(&mut self, now: Instant) {
        let from = self.position(now);
        self.is_open = !self.is_open;
        self.transition = Some(Transition { from, started: now });
    }

    pub fn position(&self, now: Instant) -> f64 {
        let target = if self.is_open { 1.0 } else { 0.0 };
        let Some(t) = self.transition else {
            return target;
        };
        let elapsed = now.saturating_duration_since(t.started);
        if elapsed >= SLIDE_DURATION {
            return target;
        }
        let progress = ease_in_out(elapsed.as_secs_f64() / SLIDE_DURATION.as_secs_f64());
        t.from + (target - t.from) * progress
    }

    pub fn is_animating(&self, now: Instant) -> bool {
        self.transition
            .is_some_and(|t| now.saturating_duration_since(t.started) < SLIDE_DURATION)
    }

    /// Forget a finished transition.
    pub fn settle(&mut self, now: Instant) {
        if !self.is_animating(now) {
            self.transition = None;
        }
    }
}

/// CSS `ease-in-out`: cubic-bezier(0.42, 0, 0.58, 1).
pub fn ease_in_out(t: f64) -> f64 {
    cubic_bezier(0.42, 0.0, 0.58, 1.0, t.clamp(0.0, 1.0))
}

fn cubic_bezier(x1: f64, y1: f64, x2: f64, y2: f64, x: f64) -> f64 {
    let bez = |a: f64, b: f64, s: f64| {
        let inv = 1.0 - s;
        3.0 * inv * inv * s * a + 3.0 * inv * s * s * b + s * s * s
    };
    let bez_slope = |a: f64, b: f64, s: f64| {
        let inv = 1.0 - s;
        3.0 * inv * inv * a + 6.0 * inv * s * (b - a) + 3.0 * s * s * (1.0 - b)
    };

    // Newton iterations on x(s) = x, bisection when the slope flattens.
    let mut s = x;
    for _ in 0..8 {
        let err = bez(x1, x2, s) - x;
        if err.abs() < 1e-7 {
            return bez(y1, y2, s);
        }
        let slope = bez_slope(x1, x2, s);
        if slope.abs() < 1e-6 {
            break;
        }
        s -= err / slope;
    }

    let (mut lo, mut hi) = (0.0, 1.0);
    s = x;
    for _ in 0..40 {
        let v = bez(x1, x2, s);
        if (v - x).abs() < 1e-7 {
            break;
        }
        if v < x {
            lo = s;
        } else {
            hi = s;
        }
        s = (lo + hi) / 2.0;
    }
    bez(y1, y2, s)
}
