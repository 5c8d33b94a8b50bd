use std::cell::Cell;
use std::rc::Rc;

use crate::frame::{Frame, FrameClock};

/// Shared stop flag for a frame loop.
///
/// Clones observe the same flag. Cancellation is one-way.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Rc<Cell<bool>>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }

    /// Cancels the token when dropped unless [`CancelGuard::disarm`] is
    /// called first. Used to stop already-started work when setup bails out
    /// halfway.
    pub fn guard(&self) -> CancelGuard {
        CancelGuard {
            token: Some(self.clone()),
        }
    }
}

#[derive(Debug)]
pub struct CancelGuard {
    token: Option<CancelToken>,
}

impl CancelGuard {
    pub fn disarm(mut self) {
        self.token = None;
    }
}

impl Drop for CancelGuard {
    fn drop(&mut self) {
        if let Some(token) = self.token.take() {
            tracing::debug!("setup abandoned; cancelling");
            token.cancel();
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LoopState {
    /// The body ran; schedule another step.
    Continue,
    /// The token was cancelled; do not reschedule.
    Stopped,
}

/// A per-frame driver: advances the clock and runs the body until cancelled.
///
/// The host (e.g. `requestAnimationFrame`) calls [`FrameLoop::step`] once per
/// display refresh and stops rescheduling once it returns
/// [`LoopState::Stopped`].
pub struct FrameLoop<F>
where
    F: FnMut(Frame),
{
    clock: FrameClock,
    token: CancelToken,
    body: F,
}

impl<F> FrameLoop<F>
where
    F: FnMut(Frame),
{
    pub fn new(clock: FrameClock, token: CancelToken, body: F) -> Self {
        Self { clock, token, body }
    }

    pub fn token(&self) -> &CancelToken {
        &self.token
    }

    pub fn step(&mut self) -> LoopState {
        if self.token.is_cancelled() {
            tracing::debug!(frames = self.clock.current().index, "frame loop stopped");
            return LoopState::Stopped;
        }
        let frame = self.clock.tick();
        (self.body)(frame);
        LoopState::Continue
    }
}
