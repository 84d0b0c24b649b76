// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Interface for an external interrupt/event controller.
//!
//! The controller owns a fixed set of interrupt lines. Each line has a
//! sensing mode (which edges raise a pending condition) and a mask bit
//! (whether a pending condition is forwarded to the processor). A single
//! client is notified whenever an unmasked line fires.
//!
//! A basic use case:
//!
//! ```ignore
//! exti.set_sensing_mode(13, SenseMode::Falling)?;
//! exti.set_client(Some(&button))?;
//! exti.enable_line(13)?;
//! ```

use core::convert::TryFrom;

use crate::ErrorCode;

/// Signal transition(s) on a line that raise a pending condition.
///
/// The discriminants are the raw mode selectors accepted by
/// [`SenseMode::try_from`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum SenseMode {
    /// Low-to-high transitions.
    Rising = 0,
    /// High-to-low transitions.
    Falling = 1,
    /// Both transitions.
    OnChange = 2,
}

impl SenseMode {
    /// Whether the rising-edge trigger is selected in this mode.
    pub const fn rising(self) -> bool {
        match self {
            SenseMode::Rising | SenseMode::OnChange => true,
            SenseMode::Falling => false,
        }
    }

    /// Whether the falling-edge trigger is selected in this mode.
    pub const fn falling(self) -> bool {
        match self {
            SenseMode::Falling | SenseMode::OnChange => true,
            SenseMode::Rising => false,
        }
    }

    /// Rebuild a mode from the two trigger selections. Returns `None` when
    /// neither edge is selected.
    pub const fn from_triggers(rising: bool, falling: bool) -> Option<SenseMode> {
        match (rising, falling) {
            (true, false) => Some(SenseMode::Rising),
            (false, true) => Some(SenseMode::Falling),
            (true, true) => Some(SenseMode::OnChange),
            (false, false) => None,
        }
    }
}

impl TryFrom<u8> for SenseMode {
    type Error = ErrorCode;

    fn try_from(mode: u8) -> Result<Self, Self::Error> {
        match mode {
            0 => Ok(SenseMode::Rising),
            1 => Ok(SenseMode::Falling),
            2 => Ok(SenseMode::OnChange),
            _ => Err(ErrorCode::INVAL),
        }
    }
}

/// Interface for the external interrupt controller.
///
/// Lines are identified by their integer index. Every operation validates its
/// arguments before touching hardware and returns `ErrorCode::INVAL` without
/// side effects when they are out of range.
pub trait ExternalInterrupt<'a> {
    /// Select the edges that raise a pending condition on `line`. The
    /// previous selection is replaced.
    fn set_sensing_mode(&self, line: u8, mode: SenseMode) -> Result<(), ErrorCode>;

    /// The edges currently selected on `line`, `None` if no edge is.
    fn sensing_mode(&self, line: u8) -> Result<Option<SenseMode>, ErrorCode>;

    /// Unmask `line` so its pending condition reaches the processor.
    fn enable_line(&self, line: u8) -> Result<(), ErrorCode>;

    /// Mask `line`.
    fn disable_line(&self, line: u8) -> Result<(), ErrorCode>;

    /// Whether `line` is unmasked.
    fn is_enabled(&self, line: u8) -> Result<bool, ErrorCode>;

    /// Request a software-triggered pending condition on `line`.
    ///
    /// Implementations may treat this as experimental. It validates `line`
    /// the same way `enable_line` does.
    fn software_trigger(&self, line: u8) -> Result<(), ErrorCode>;

    /// Register the client notified when an unmasked line fires.
    ///
    /// `None` is rejected with `ErrorCode::INVAL` and leaves the current
    /// client registered. A new client replaces the previous one.
    fn set_client(&self, client: Option<&'a dyn Client>) -> Result<(), ErrorCode>;
}

/// Interface for users of the external interrupt controller. In order to
/// receive interrupts, the user must implement this `Client` interface.
///
/// `fired` runs in interrupt context: it must not block and must not start
/// long computations.
pub trait Client {
    /// Called when an interrupt occurs.
    fn fired(&self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_mode_selectors() {
        assert_eq!(SenseMode::try_from(0), Ok(SenseMode::Rising));
        assert_eq!(SenseMode::try_from(1), Ok(SenseMode::Falling));
        assert_eq!(SenseMode::try_from(2), Ok(SenseMode::OnChange));
        for raw in 3..=u8::MAX {
            assert_eq!(SenseMode::try_from(raw), Err(ErrorCode::INVAL));
        }
    }

    #[test]
    fn triggers() {
        for mode in [SenseMode::Rising, SenseMode::Falling, SenseMode::OnChange] {
            assert_eq!(
                SenseMode::from_triggers(mode.rising(), mode.falling()),
                Some(mode)
            );
            assert_eq!(SenseMode::try_from(mode as u8), Ok(mode));
        }
        assert_eq!(SenseMode::from_triggers(false, false), None);
    }
}
