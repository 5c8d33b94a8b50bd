/// Per-frame metadata handed to the frame body.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frame {
    /// 0-based frame index.
    pub index: u64,
    /// Shader phase for this frame (the `u_time` uniform).
    pub phase: f64,
}

/// Monotonic shader phase advanced by a fixed increment once per rendered
/// frame.
///
/// The phase only feeds periodic functions on the GPU, so it is allowed to
/// grow without bound and does not depend on the display refresh rate.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameClock {
    index: u64,
    phase: f64,
    increment: f64,
}

impl FrameClock {
    pub fn new(start: f64, increment: f64) -> Self {
        Self {
            index: 0,
            phase: start,
            increment,
        }
    }

    /// The frame that would be rendered now, without advancing.
    pub fn current(&self) -> Frame {
        Frame {
            index: self.index,
            phase: self.phase,
        }
    }

    /// Advance by one frame and return it.
    pub fn tick(&mut self) -> Frame {
        self.index = self.index.wrapping_add(1);
        self.phase += self.increment;
        self.current()
    }
}
