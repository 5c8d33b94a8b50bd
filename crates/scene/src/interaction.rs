//! Press/release state machine for the globe.
//!
//! Pressing on the globe pushes the dots outward; releasing lets them settle.
//! A press always stays visible for at least `min_press_s`: a release that
//! arrives earlier is deferred until the guard timer fires. The machine owns
//! no clock. Every handler takes the current time and returns the effects the
//! host should apply.

use foundation::Time;
use runtime::{EventBus, TimerHandle, TimerQueue};

use crate::config::InteractionConfig;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Cursor {
    #[default]
    Default,
    Pointer,
    Grabbing,
}

impl Cursor {
    pub fn as_css(self) -> &'static str {
        match self {
            Cursor::Default => "default",
            Cursor::Pointer => "pointer",
            Cursor::Grabbing => "grabbing",
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Pressed,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Effect {
    /// Tween the extrusion uniform to `target`, starting at `at`.
    AnimateExtrusion {
        target: f64,
        duration_s: f64,
        at: Time,
    },
    SetCursor(Cursor),
}

#[derive(Debug)]
pub struct Interaction {
    cfg: InteractionConfig,
    phase: Phase,
    is_intersecting: bool,
    mouse_down: bool,
    min_press_elapsed: bool,
    grabbing: bool,
    cursor: Cursor,
    /// Payload is the time the guard is due.
    timers: TimerQueue<Time>,
    guard: Option<TimerHandle>,
    disposed: bool,
    events: EventBus,
}

impl Interaction {
    pub fn new(cfg: InteractionConfig) -> Self {
        Self {
            cfg,
            phase: Phase::Idle,
            is_intersecting: false,
            mouse_down: false,
            min_press_elapsed: true,
            grabbing: false,
            cursor: Cursor::Default,
            timers: TimerQueue::new(),
            guard: None,
            disposed: false,
            events: EventBus::new(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_intersecting(&self) -> bool {
        self.is_intersecting
    }

    pub fn mouse_down(&self) -> bool {
        self.mouse_down
    }

    pub fn min_press_elapsed(&self) -> bool {
        self.min_press_elapsed
    }

    pub fn grabbing(&self) -> bool {
        self.grabbing
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn guard_pending(&self) -> bool {
        self.guard.is_some_and(|h| self.timers.is_pending(h))
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn events(&mut self) -> &mut EventBus {
        &mut self.events
    }

    /// Pointer moved; `hit` says whether its ray meets the base sphere.
    pub fn pointer_move(&mut self, hit: bool, now: Time) -> Vec<Effect> {
        let mut effects = self.advance(now);
        if self.disposed {
            return effects;
        }
        self.is_intersecting = hit;
        if !self.grabbing {
            let cursor = self.hover_cursor();
            self.set_cursor(cursor, &mut effects);
        }
        effects
    }

    pub fn pointer_down(&mut self, now: Time) -> Vec<Effect> {
        let mut effects = self.advance(now);
        if self.disposed || !self.is_intersecting {
            return effects;
        }

        if let Some(old) = self.guard.take() {
            self.timers.cancel(old);
        }
        let due = now.after(self.cfg.min_press_s);
        self.guard = Some(self.timers.schedule(due, due));
        self.min_press_elapsed = false;
        self.mouse_down = true;
        self.grabbing = true;

        effects.push(Effect::AnimateExtrusion {
            target: self.cfg.pressed_extrusion,
            duration_s: self.cfg.press_duration_s,
            at: now,
        });
        self.set_cursor(Cursor::Grabbing, &mut effects);

        let rearmed = self.phase == Phase::Pressed;
        self.phase = Phase::Pressed;
        self.events.emit(
            "interaction.press",
            if rearmed { "guard re-armed" } else { "pressed" },
        );
        effects
    }

    pub fn pointer_up(&mut self, now: Time) -> Vec<Effect> {
        let mut effects = self.advance(now);
        if self.disposed || self.phase == Phase::Idle {
            return effects;
        }
        self.mouse_down = false;
        if self.min_press_elapsed {
            self.release(now, &mut effects);
        } else {
            self.events
                .emit("interaction.deferred", "release waits for minimum press");
        }
        effects
    }

    /// Fire due guard timers. Called every frame and before each pointer
    /// event.
    pub fn advance(&mut self, now: Time) -> Vec<Effect> {
        let mut effects = Vec::new();
        if self.disposed {
            return effects;
        }
        for (handle, due) in self.timers.poll(now) {
            if self.guard != Some(handle) {
                continue;
            }
            self.guard = None;
            self.min_press_elapsed = true;
            self.events.emit("interaction.guard", "minimum press elapsed");

            // A deferred release starts when the guard was due, not when it
            // was noticed.
            if self.phase == Phase::Pressed && !self.mouse_down {
                self.release(due, &mut effects);
            }
        }
        effects
    }

    /// Cancel the guard and ignore every later event.
    pub fn dispose(&mut self) {
        if let Some(handle) = self.guard.take() {
            self.timers.cancel(handle);
        }
        self.timers.clear();
        self.disposed = true;
        self.events.emit("interaction.dispose", "disposed");
    }

    fn release(&mut self, at: Time, effects: &mut Vec<Effect>) {
        self.phase = Phase::Idle;
        self.grabbing = false;
        effects.push(Effect::AnimateExtrusion {
            target: self.cfg.rest_extrusion,
            duration_s: self.cfg.release_duration_s,
            at,
        });
        let cursor = self.hover_cursor();
        self.set_cursor(cursor, effects);
        self.events.emit("interaction.release", "released");
    }

    fn hover_cursor(&self) -> Cursor {
        if self.is_intersecting {
            Cursor::Pointer
        } else {
            Cursor::Default
        }
    }

    fn set_cursor(&mut self, cursor: Cursor, effects: &mut Vec<Effect>) {
        if self.cursor != cursor {
            self.cursor = cursor;
            effects.push(Effect::SetCursor(cursor));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn machine() -> Interaction {
        Interaction::new(InteractionConfig::default())
    }

    fn extrusion_targets(effects: &[Effect]) -> Vec<(f64, f64, Time)> {
        effects
            .iter()
            .filter_map(|e| match *e {
                Effect::AnimateExtrusion {
                    target,
                    duration_s,
                    at,
                } => Some((target, duration_s, at)),
                Effect::SetCursor(_) => None,
            })
            .collect()
    }

    #[test]
    fn hover_toggles_pointer_cursor() {
        let mut m = machine();
        assert_eq!(
            m.pointer_move(true, Time(0.0)),
            vec![Effect::SetCursor(Cursor::Pointer)]
        );
        // Unchanged cursor is not re-emitted.
        assert!(m.pointer_move(true, Time(0.1)).is_empty());
        assert_eq!(
            m.pointer_move(false, Time(0.2)),
            vec![Effect::SetCursor(Cursor::Default)]
        );
    }

    #[test]
    fn press_off_globe_changes_nothing() {
        let mut m = machine();
        m.pointer_move(false, Time(0.0));
        assert!(m.pointer_down(Time(0.1)).is_empty());
        assert_eq!(m.phase(), Phase::Idle);
        assert_eq!(m.cursor(), Cursor::Default);
        assert!(!m.grabbing());
        assert!(!m.guard_pending());
    }

    #[test]
    fn press_extrudes_and_grabs() {
        let mut m = machine();
        m.pointer_move(true, Time(0.0));
        let effects = m.pointer_down(Time(1.0));
        assert_eq!(
            effects,
            vec![
                Effect::AnimateExtrusion {
                    target: 1.07,
                    duration_s: 0.5,
                    at: Time(1.0),
                },
                Effect::SetCursor(Cursor::Grabbing),
            ]
        );
        assert_eq!(m.phase(), Phase::Pressed);
        assert!(m.mouse_down());
        assert!(m.guard_pending());
    }

    #[test]
    fn quick_tap_holds_for_minimum_press() {
        let mut m = machine();
        m.pointer_move(true, Time(0.0));
        m.pointer_down(Time(1.0));

        // Released after 100ms: nothing visible happens yet.
        assert!(m.pointer_up(Time(1.1)).is_empty());
        assert_eq!(m.phase(), Phase::Pressed);
        assert!(!m.mouse_down());

        assert!(m.advance(Time(1.4)).is_empty());
        assert_eq!(m.phase(), Phase::Pressed);

        // Frame noticed the guard late; release still starts at 1.5s.
        let effects = m.advance(Time(1.516));
        assert_eq!(extrusion_targets(&effects), vec![(1.0, 0.15, Time(1.5))]);
        assert!(effects.contains(&Effect::SetCursor(Cursor::Pointer)));
        assert_eq!(m.phase(), Phase::Idle);
        assert!(!m.grabbing());
        assert!(!m.guard_pending());
    }

    #[test]
    fn slow_release_is_immediate() {
        let mut m = machine();
        m.pointer_move(true, Time(0.0));
        m.pointer_down(Time(0.0));
        assert!(m.advance(Time(0.6)).is_empty());
        assert!(m.min_press_elapsed());

        let effects = m.pointer_up(Time(2.0));
        assert_eq!(extrusion_targets(&effects), vec![(1.0, 0.15, Time(2.0))]);
        assert_eq!(m.phase(), Phase::Idle);
    }

    #[test]
    fn release_cursor_follows_intersection() {
        let mut m = machine();
        m.pointer_move(true, Time(0.0));
        m.pointer_down(Time(0.0));
        // Dragged off the globe while grabbing: cursor stays grabbing.
        assert!(m.pointer_move(false, Time(0.2)).is_empty());
        assert_eq!(m.cursor(), Cursor::Grabbing);

        let effects = m.pointer_up(Time(1.0));
        assert!(effects.contains(&Effect::SetCursor(Cursor::Default)));
    }

    #[test]
    fn pointer_up_while_idle_is_ignored() {
        let mut m = machine();
        m.pointer_move(true, Time(0.0));
        assert!(m.pointer_up(Time(0.1)).is_empty());
        assert_eq!(m.phase(), Phase::Idle);
    }

    #[test]
    fn second_press_rearms_guard() {
        let mut m = machine();
        m.pointer_move(true, Time(0.0));
        m.pointer_down(Time(0.0));
        m.pointer_up(Time(0.1));
        m.pointer_down(Time(0.25));

        // The first guard was cancelled, so nothing fires at 0.5s.
        assert!(m.advance(Time(0.55)).is_empty());
        assert_eq!(m.phase(), Phase::Pressed);

        m.pointer_up(Time(0.6));
        let effects = m.advance(Time(0.8));
        assert_eq!(extrusion_targets(&effects), vec![(1.0, 0.15, Time(0.75))]);
    }

    #[test]
    fn dispose_cancels_deferred_release() {
        let mut m = machine();
        m.pointer_move(true, Time(0.0));
        m.pointer_down(Time(0.0));
        m.pointer_up(Time(0.1));
        m.dispose();

        assert!(m.advance(Time(5.0)).is_empty());
        assert!(m.pointer_down(Time(5.0)).is_empty());
        assert!(!m.guard_pending());
        assert!(m.is_disposed());
    }

    #[test]
    fn transitions_are_recorded() {
        let mut m = machine();
        m.pointer_move(true, Time(0.0));
        m.pointer_down(Time(0.0));
        m.pointer_up(Time(0.1));
        m.advance(Time(0.5));
        assert_eq!(
            m.events().kinds(),
            vec![
                "interaction.press",
                "interaction.deferred",
                "interaction.guard",
                "interaction.release",
            ]
        );
    }

    #[test]
    fn cursor_css_names() {
        assert_eq!(Cursor::Default.as_css(), "default");
        assert_eq!(Cursor::Pointer.as_css(), "pointer");
        assert_eq!(Cursor::Grabbing.as_css(), "grabbing");
    }
}
