// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Interface for blocking SPI controller (master) communication.
//!
//! A controller is configured with a [`SpiConfig`] and then exchanges data
//! in full duplex: every unit written is paired with a unit read back at the
//! same index. Transfers block the caller until every unit has been
//! exchanged. There is no timeout; a peripheral that never signals
//! completion stalls the caller.

use core::convert::TryFrom;

use crate::ErrorCode;

/// Number of bits in one data frame.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DataFrame {
    /// 8-bit frames. This is DFF = 0.
    Bits8,
    /// 16-bit frames. This is DFF = 1.
    Bits16,
}

/// Clock polarity (CPOL) defines whether the SPI clock is high or low when
/// idle.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ClockPolarity {
    /// The clock is low when the SPI bus is not active. This is CPOL = 0.
    IdleLow,
    /// The clock is high when the SPI bus is not active. This is CPOL = 1.
    IdleHigh,
}

/// Clock phase (CPHA) defines whether to sample and send data on a leading or
/// trailing clock edge.
///
/// Consult a SPI reference on how CPHA interacts with CPOL.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ClockPhase {
    /// Sample on the leading clock edge. This is CPHA = 0. If CPOL is 0, then
    /// this samples on the rising edge of the clock. If CPOL is 1, then this
    /// samples on the falling edge of the clock.
    SampleLeading,
    /// Sample on the trailing clock edge. This is CPHA = 1. If CPOL is 0, then
    /// this samples on the falling edge of the clock. If CPOL is 1, then this
    /// samples on the rising edge of the clock.
    SampleTrailing,
}

/// Ratio between the peripheral clock and the SPI clock.
///
/// The discriminants are the 3-bit divider codes accepted by
/// [`BaudRate::try_from`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum BaudRate {
    Div2 = 0b000,
    Div4 = 0b001,
    Div8 = 0b010,
    Div16 = 0b011,
    Div32 = 0b100,
    Div64 = 0b101,
    Div128 = 0b110,
    Div256 = 0b111,
}

impl BaudRate {
    /// Decode the low three bits of `code`. Higher bits are ignored, so
    /// this suits values read back from a 3-bit register field.
    pub const fn from_code(code: u8) -> BaudRate {
        match code & 0b111 {
            0b000 => BaudRate::Div2,
            0b001 => BaudRate::Div4,
            0b010 => BaudRate::Div8,
            0b011 => BaudRate::Div16,
            0b100 => BaudRate::Div32,
            0b101 => BaudRate::Div64,
            0b110 => BaudRate::Div128,
            _ => BaudRate::Div256,
        }
    }

    /// The clock division ratio.
    pub const fn divisor(self) -> u32 {
        2 << (self as u32)
    }
}

impl TryFrom<u8> for BaudRate {
    type Error = ErrorCode;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        if code <= 0b111 {
            Ok(BaudRate::from_code(code))
        } else {
            Err(ErrorCode::INVAL)
        }
    }
}

/// Communication parameters of one SPI instance.
///
/// Every field is an enumerated value, so any `SpiConfig` that can be
/// constructed is a legal configuration.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SpiConfig {
    pub frame: DataFrame,
    pub polarity: ClockPolarity,
    pub phase: ClockPhase,
    pub baud_rate: BaudRate,
}

impl SpiConfig {
    pub const fn new(
        frame: DataFrame,
        polarity: ClockPolarity,
        phase: ClockPhase,
        baud_rate: BaudRate,
    ) -> SpiConfig {
        SpiConfig {
            frame,
            polarity,
            phase,
            baud_rate,
        }
    }
}

/// Interface for a blocking, full-duplex SPI controller.
///
/// Callers must serialize access to one controller: a transfer owns the
/// instance for its whole duration.
pub trait SpiMaster {
    /// Apply `config` and enable the controller in master mode. Applying the
    /// same configuration again leaves the controller in the same state.
    fn init(&self, config: SpiConfig);

    /// The configuration currently applied to the controller.
    fn configuration(&self) -> SpiConfig;

    /// Whether the controller is still shifting a frame out.
    fn is_busy(&self) -> bool;

    /// Exchange one unit: write `val` and return the unit read back.
    /// Blocks until the exchange completes.
    fn read_write_byte(&self, val: u8) -> u8;

    /// Exchange `len` units. `write_buffer[i]` is sent and the unit received
    /// in the same clock cycles is stored at `read_buffer[i]`.
    ///
    /// Blocks until all `len` units are exchanged. Returns
    /// `ErrorCode::INVAL` without touching the bus if `len` exceeds either
    /// buffer.
    fn read_write_bytes(
        &self,
        write_buffer: &[u8],
        read_buffer: &mut [u8],
        len: usize,
    ) -> Result<(), ErrorCode>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn divider_codes() {
        let expected = [2, 4, 8, 16, 32, 64, 128, 256];
        for (code, divisor) in expected.iter().enumerate() {
            let baud = BaudRate::try_from(code as u8).unwrap();
            assert_eq!(baud as u8, code as u8);
            assert_eq!(baud.divisor(), *divisor);
        }
        assert_eq!(BaudRate::try_from(8), Err(ErrorCode::INVAL));
        assert_eq!(BaudRate::from_code(0b1100), BaudRate::Div32);
    }
}
