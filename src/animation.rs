use std::time::Duration;

/// An integer counting from `start` to `target` with an exponential ease-out:
/// fast at first, settling onto the target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NumberAnimation {
    pub start: i64,
    pub target: i64,
    pub duration: Duration,
}

impl NumberAnimation {
    pub fn new(start: i64, target: i64, duration: Duration) -> Self {
        NumberAnimation {
            start,
            target,
            duration,
        }
    }

    pub fn progress(&self, elapsed: Duration) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0)
    }

    pub fn value_at(&self, elapsed: Duration) -> i64 {
        let progress = self.progress(elapsed);
        if progress >= 1.0 {
            return self.target;
        }
        let easing = 1.0 - 2f64.powf(-10.0 * progress);
        let difference = (self.target - self.start) as f64;
        (self.start as f64 + difference * easing).round() as i64
    }

    pub fn is_finished(&self, elapsed: Duration) -> bool {
        self.progress(elapsed) >= 1.0
    }

    /// The values shown when sampling every `frame_interval`, ending with the
    /// target.
    pub fn frames(&self, frame_interval: Duration) -> Frames {
        Frames {
            animation: *self,
            frame_interval,
            elapsed: Duration::ZERO,
            done: false,
        }
    }
}

pub struct Frames {
    animation: NumberAnimation,
    frame_interval: Duration,
    elapsed: Duration,
    done: bool,
}

impl Iterator for Frames {
    type Item = i64;

    fn next(&mut self) -> Option<i64> {
        if self.done {
            return None;
        }
        let value = self.animation.value_at(self.elapsed);
        if self.animation.is_finished(self.elapsed) || self.frame_interval.is_zero() {
            self.done = true;
            return Some(self.animation.target);
        }
        self.elapsed += self.frame_interval;
        Some(value)
    }
}

pub fn format_meters(value: i64) -> String {
    format!("{value} m")
}
