//! Response-phase gate shared by the capture task and the session.
//!
//! The session is the only writer. The capture task reads the gate on every
//! poll to decide whether directional input is meaningful. While the session
//! renders or transitions between rounds the gate is `Busy`, so any input
//! captured meanwhile is reported as not ready and never reaches the level.

use core::sync::atomic::{AtomicU8, Ordering};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    /// No game in progress
    Idle,
    /// Game in progress, input is not accepted
    Busy,
    /// A level has been rendered and is being matched
    Accepting,
}

impl Phase {
    fn from_raw(raw: u8) -> Self {
        match raw {
            1 => Phase::Busy,
            2 => Phase::Accepting,
            _ => Phase::Idle,
        }
    }

    fn into_raw(self) -> u8 {
        match self {
            Phase::Idle => 0,
            Phase::Busy => 1,
            Phase::Accepting => 2,
        }
    }
}

#[derive(Debug)]
pub struct ResponsePhase(AtomicU8);

impl ResponsePhase {
    pub const fn new() -> Self {
        Self(AtomicU8::new(0))
    }

    #[inline]
    pub fn load(&self) -> Phase {
        Phase::from_raw(self.0.load(Ordering::Acquire))
    }

    #[inline]
    pub(crate) fn store(&self, phase: Phase) {
        self.0.store(phase.into_raw(), Ordering::Release);
    }

    #[inline]
    pub fn is_accepting(&self) -> bool {
        self.load() == Phase::Accepting
    }
}

impl Default for ResponsePhase {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_idle() {
        let phase = ResponsePhase::new();
        assert_eq!(phase.load(), Phase::Idle);
        assert!(!phase.is_accepting());
    }

    #[test]
    fn store_load() {
        let phase = ResponsePhase::new();
        phase.store(Phase::Busy);
        assert_eq!(phase.load(), Phase::Busy);
        phase.store(Phase::Accepting);
        assert!(phase.is_accepting());
        phase.store(Phase::Idle);
        assert_eq!(phase.load(), Phase::Idle);
    }
}
