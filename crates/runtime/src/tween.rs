//! Scalar tweening.
//!
//! A [`Tweened`] value owns at most one running [`Tween`]. Starting a new
//! tween replaces the running one and begins from the current value.

use foundation::time::Time;

/// Default tween duration in seconds.
pub const DEFAULT_DURATION_S: f64 = 0.5;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Easing {
    Linear,
    /// Quadratic ease-out: `1 - (1 - t)^2`.
    #[default]
    Power1Out,
}

impl Easing {
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::Power1Out => 1.0 - (1.0 - t) * (1.0 - t),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Tween {
    pub from: f64,
    pub to: f64,
    pub start: Time,
    pub duration_s: f64,
    pub easing: Easing,
}

impl Tween {
    /// Value at `now`, and whether the tween has finished.
    pub fn sample(&self, now: Time) -> (f64, bool) {
        if self.duration_s <= 0.0 {
            return (self.to, true);
        }
        let t = now.since(self.start) / self.duration_s;
        if t >= 1.0 {
            return (self.to, true);
        }
        let k = self.easing.apply(t);
        (self.from + (self.to - self.from) * k, false)
    }
}

/// A scalar driven by tweens.
#[derive(Debug, Clone, PartialEq)]
pub struct Tweened {
    value: f64,
    active: Option<Tween>,
}

impl Tweened {
    pub fn new(value: f64) -> Self {
        Self {
            value,
            active: None,
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn target(&self) -> f64 {
        self.active.map(|t| t.to).unwrap_or(self.value)
    }

    pub fn is_animating(&self) -> bool {
        self.active.is_some()
    }

    /// Animate toward `to` starting at `now`.
    pub fn animate_to(&mut self, to: f64, duration_s: f64, easing: Easing, now: Time) {
        self.active = Some(Tween {
            from: self.value,
            to,
            start: now,
            duration_s: duration_s.max(0.0),
            easing,
        });
        if duration_s <= 0.0 {
            self.update(now);
        }
    }

    /// Advance to `now`. Returns the current value.
    pub fn update(&mut self, now: Time) -> f64 {
        if let Some(tween) = self.active {
            let (value, done) = tween.sample(now);
            self.value = value;
            if done {
                self.active = None;
            }
        }
        self.value
    }

    /// Drop any running tween, keeping the current value.
    pub fn stop(&mut self) {
        self.active = None;
    }
}
