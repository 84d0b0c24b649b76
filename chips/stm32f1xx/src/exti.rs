// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! External interrupt/event controller (EXTI).

use kernel::hil::exti::{Client, ExternalInterrupt, SenseMode};
use kernel::utilities::registers::interfaces::{ReadWriteable, Readable, Writeable};
use kernel::utilities::registers::{register_bitfields, register_structs, Field, ReadWrite};
use kernel::utilities::cells::OptionalCell;
use kernel::utilities::StaticRef;
use kernel::ErrorCode;
use log::{debug, trace, warn};

use crate::config::CONFIG;

/// Number of lines implemented by the mask, trigger and pending registers.
///
/// Lines 0 to 15 are wired to GPIO pins. Lines 16 to 19 are internal event
/// sources (PVD output, RTC alarm, USB wakeup and Ethernet wakeup).
pub const NUM_LINES: u8 = 20;

register_structs! {
    /// External interrupt/event controller
    pub ExtiRegisters {
        /// Interrupt mask register (EXTI_IMR)
        (0x00 => imr: ReadWrite<u32, LINES::Register>),
        // Event mask register (EXTI_EMR), not used by this driver
        (0x04 => _reserved0),
        /// Rising trigger selection register (EXTI_RTSR)
        (0x08 => rtsr: ReadWrite<u32, LINES::Register>),
        /// Falling trigger selection register (EXTI_FTSR)
        (0x0C => ftsr: ReadWrite<u32, LINES::Register>),
        /// Software interrupt event register (EXTI_SWIER)
        (0x10 => swier: ReadWrite<u32, LINES::Register>),
        /// Pending register (EXTI_PR)
        (0x14 => pr: ReadWrite<u32, LINES::Register>),
        (0x18 => @END),
    }
}

register_bitfields![u32,
    LINES [
        /// One bit per line, bits 20 to 31 are reserved
        LINE OFFSET(0) NUMBITS(20) []
    ]
];

/// The single-bit field for `line` in any of the per-line registers.
fn line_field(line: u8) -> Result<Field<u32, LINES::Register>, ErrorCode> {
    if line < NUM_LINES {
        Ok(Field::new(1, usize::from(line)))
    } else {
        warn!("exti: line {} does not exist", line);
        Err(ErrorCode::INVAL)
    }
}

/// Driver for the EXTI block.
///
/// The driver keeps the one client that is told about fired lines. Register
/// it with [`ExternalInterrupt::set_client`], and route the EXTI interrupt
/// vectors to [`Exti::handle_interrupt`].
pub struct Exti<'a> {
    registers: StaticRef<ExtiRegisters>,
    client: OptionalCell<&'a dyn Client>,
}

impl<'a> Exti<'a> {
    pub const fn new(base: StaticRef<ExtiRegisters>) -> Exti<'a> {
        Exti {
            registers: base,
            client: OptionalCell::empty(),
        }
    }

    /// Mask the statically configured line and apply its statically
    /// configured sensing mode.
    ///
    /// The line and mode come from the crate configuration and are checked at
    /// compile time, so this cannot fail.
    pub fn init(&self) {
        let line: Field<u32, LINES::Register> = Field::new(1, usize::from(CONFIG.exti_line));
        self.registers.imr.modify(line.val(0));
        self.select_triggers(line, CONFIG.exti_sense_mode);
        debug!(
            "exti: line {} masked, sensing {:?}",
            CONFIG.exti_line, CONFIG.exti_sense_mode
        );
    }

    fn select_triggers(&self, line: Field<u32, LINES::Register>, mode: SenseMode) {
        self.registers
            .rtsr
            .modify(line.val(u32::from(mode.rising())));
        self.registers
            .ftsr
            .modify(line.val(u32::from(mode.falling())));
    }

    pub fn is_pending(&self, line: u8) -> Result<bool, ErrorCode> {
        let line = line_field(line)?;
        Ok(self.registers.pr.is_set(line))
    }

    // Pending clear happens by writing 1
    pub fn clear_pending(&self, line: u8) -> Result<(), ErrorCode> {
        let line = line_field(line)?;
        self.registers.pr.write(line.val(1));
        Ok(())
    }

    /// Acknowledge pending lines and notify the client once for every
    /// pending line that is unmasked.
    ///
    /// Called from the EXTI interrupt vectors.
    pub fn handle_interrupt(&self) {
        // `EXTI_PR` is a read/clear-by-writing-1 register. Writing back the
        // value just read clears only those bits, so a line that becomes
        // pending in between stays pending for the next interrupt.
        let pending = self.registers.pr.get();
        self.registers.pr.set(pending);

        let mut fired = pending & self.registers.imr.read(LINES::LINE);
        while fired != 0 {
            let line = fired.trailing_zeros();
            fired &= fired - 1;

            trace!("exti: line {} fired", line);
            self.client.map(|client| client.fired());
        }
    }
}

#[cfg(test)]
impl Exti<'_> {
    /// Make `line` pending the way the hardware does when its edge arrives.
    pub(crate) fn raise(&self, line: u8) {
        self.registers.pr.set(self.registers.pr.get() | (1 << line));
    }
}

impl<'a> ExternalInterrupt<'a> for Exti<'a> {
    fn set_sensing_mode(&self, line: u8, mode: SenseMode) -> Result<(), ErrorCode> {
        let field = line_field(line)?;
        self.select_triggers(field, mode);
        debug!("exti: line {} sensing {:?}", line, mode);
        Ok(())
    }

    fn sensing_mode(&self, line: u8) -> Result<Option<SenseMode>, ErrorCode> {
        let line = line_field(line)?;
        Ok(SenseMode::from_triggers(
            self.registers.rtsr.is_set(line),
            self.registers.ftsr.is_set(line),
        ))
    }

    fn enable_line(&self, line: u8) -> Result<(), ErrorCode> {
        let field = line_field(line)?;
        self.registers.imr.modify(field.val(1));
        Ok(())
    }

    fn disable_line(&self, line: u8) -> Result<(), ErrorCode> {
        let field = line_field(line)?;
        self.registers.imr.modify(field.val(0));
        Ok(())
    }

    fn is_enabled(&self, line: u8) -> Result<bool, ErrorCode> {
        let line = line_field(line)?;
        Ok(self.registers.imr.is_set(line))
    }

    fn software_trigger(&self, line: u8) -> Result<(), ErrorCode> {
        line_field(line)?;
        // Software-triggered events are not supported yet: the request is
        // validated and otherwise ignored, `EXTI_SWIER` is never written.
        debug!("exti: software trigger on line {} ignored", line);
        Ok(())
    }

    fn set_client(&self, client: Option<&'a dyn Client>) -> Result<(), ErrorCode> {
        match client {
            Some(client) => {
                self.client.set(client);
                Ok(())
            }
            None => {
                warn!("exti: refusing to register an empty client");
                Err(ErrorCode::INVAL)
            }
        }
    }
}
