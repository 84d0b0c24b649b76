// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Serial peripheral interface (SPI) controller, polled full-duplex mode.

use core::convert::TryFrom;

use kernel::hil::spi::{BaudRate, ClockPhase, ClockPolarity, DataFrame, SpiConfig, SpiMaster};
use kernel::utilities::registers::interfaces::{ReadWriteable, Readable, Writeable};
use kernel::utilities::registers::{register_bitfields, register_structs, ReadWrite};
use kernel::utilities::StaticRef;
use kernel::ErrorCode;
use log::{debug, warn};

use crate::config::CONFIG;

register_structs! {
    /// Serial peripheral interface
    pub SpiRegisters {
        /// control register 1
        (0x00 => cr1: ReadWrite<u32, CR1::Register>),
        /// control register 2
        (0x04 => cr2: ReadWrite<u32, CR2::Register>),
        /// status register
        (0x08 => sr: ReadWrite<u32, SR::Register>),
        /// data register
        (0x0C => dr: ReadWrite<u32, DR::Register>),
        // CRC and I2S registers, not used by this driver
        (0x10 => _reserved0),
        (0x24 => @END),
    }
}

register_bitfields![u32,
    CR1 [
        /// Bidirectional data mode enable
        BIDIMODE OFFSET(15) NUMBITS(1) [],
        /// Output enable in bidirectional mode
        BIDIOE OFFSET(14) NUMBITS(1) [],
        /// Hardware CRC calculation enable
        CRCEN OFFSET(13) NUMBITS(1) [],
        /// CRC transfer next
        CRCNEXT OFFSET(12) NUMBITS(1) [],
        /// Data frame format
        DFF OFFSET(11) NUMBITS(1) [],
        /// Receive only
        RXONLY OFFSET(10) NUMBITS(1) [],
        /// Software slave management
        SSM OFFSET(9) NUMBITS(1) [],
        /// Internal slave select
        SSI OFFSET(8) NUMBITS(1) [],
        /// Frame format
        LSBFIRST OFFSET(7) NUMBITS(1) [],
        /// SPI enable
        SPE OFFSET(6) NUMBITS(1) [],
        /// Baud rate control
        BR OFFSET(3) NUMBITS(3) [],
        /// Master selection
        MSTR OFFSET(2) NUMBITS(1) [],
        /// Clock polarity
        CPOL OFFSET(1) NUMBITS(1) [],
        /// Clock phase
        CPHA OFFSET(0) NUMBITS(1) []
    ],
    CR2 [
        /// Tx buffer empty interrupt enable
        TXEIE OFFSET(7) NUMBITS(1) [],
        /// RX buffer not empty interrupt enable
        RXNEIE OFFSET(6) NUMBITS(1) [],
        /// Error interrupt enable
        ERRIE OFFSET(5) NUMBITS(1) [],
        /// SS output enable
        SSOE OFFSET(2) NUMBITS(1) [],
        /// Tx buffer DMA enable
        TXDMAEN OFFSET(1) NUMBITS(1) [],
        /// Rx buffer DMA enable
        RXDMAEN OFFSET(0) NUMBITS(1) []
    ],
    SR [
        /// Busy flag
        BSY OFFSET(7) NUMBITS(1) [],
        /// Overrun flag
        OVR OFFSET(6) NUMBITS(1) [],
        /// Mode fault
        MODF OFFSET(5) NUMBITS(1) [],
        /// CRC error flag
        CRCERR OFFSET(4) NUMBITS(1) [],
        /// Underrun flag
        UDR OFFSET(3) NUMBITS(1) [],
        /// Channel side
        CHSIDE OFFSET(2) NUMBITS(1) [],
        /// Transmit buffer empty
        TXE OFFSET(1) NUMBITS(1) [],
        /// Receive buffer not empty
        RXNE OFFSET(0) NUMBITS(1) []
    ],
    DR [
        /// Data register, the low 8 bits in 8-bit frame mode
        DR OFFSET(0) NUMBITS(16) []
    ]
];

/// The SPI instances of the chip.
///
/// The discriminants are the raw instance selectors accepted by
/// [`SpiId::try_from`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum SpiId {
    Spi1 = 0,
    Spi2 = 1,
    Spi3 = 2,
}

impl TryFrom<u8> for SpiId {
    type Error = ErrorCode;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        match id {
            0 => Ok(SpiId::Spi1),
            1 => Ok(SpiId::Spi2),
            2 => Ok(SpiId::Spi3),
            _ => Err(ErrorCode::INVAL),
        }
    }
}

pub struct Spi {
    registers: StaticRef<SpiRegisters>,
    id: SpiId,
}

impl Spi {
    pub const fn new(base: StaticRef<SpiRegisters>, id: SpiId) -> Spi {
        Spi {
            registers: base,
            id,
        }
    }

    pub fn id(&self) -> SpiId {
        self.id
    }

    /// Apply the statically configured default configuration.
    pub fn init_default(&self) {
        self.init(CONFIG.spi);
    }

    pub fn handle_interrupt(&self) {
        // The driver polls the status flags and never enables SPI
        // interrupts.
    }

    // CR1 fields other than SPE may only change while the peripheral is
    // disabled.
    fn set_cr<F>(&self, f: F)
    where
        F: FnOnce(),
    {
        self.registers.cr1.modify(CR1::SPE::CLEAR);
        f();
        self.registers.cr1.modify(CR1::SPE::SET);
    }

    /// Exchange one frame. Blocks until the received frame is available.
    fn exchange(&self, out: u16) -> u16 {
        // loop till TXE (Transmit Buffer Empty) becomes 1
        while !self.registers.sr.is_set(SR::TXE) {}

        self.registers.dr.write(DR::DR.val(u32::from(out)));

        // loop till RXNE becomes 1
        while !self.registers.sr.is_set(SR::RXNE) {}

        self.registers.dr.read(DR::DR) as u16
    }

    fn wait_idle(&self) {
        while self.is_busy() {}
    }

    /// Exchange `len` 16-bit frames, the counterpart of
    /// [`SpiMaster::read_write_bytes`] for a controller configured with
    /// [`DataFrame::Bits16`].
    pub fn read_write_words(
        &self,
        write_buffer: &[u16],
        read_buffer: &mut [u16],
        len: usize,
    ) -> Result<(), ErrorCode> {
        if len > write_buffer.len() || len > read_buffer.len() {
            warn!(
                "{:?}: transfer of {} words exceeds buffers ({}, {})",
                self.id,
                len,
                write_buffer.len(),
                read_buffer.len()
            );
            return Err(ErrorCode::INVAL);
        }

        for (out, read) in write_buffer[..len].iter().zip(read_buffer[..len].iter_mut()) {
            *read = self.exchange(*out);
        }
        self.wait_idle();
        Ok(())
    }
}

impl SpiMaster for Spi {
    fn init(&self, config: SpiConfig) {
        self.set_cr(|| {
            self.registers.cr1.modify(
                // 2 line unidirectional mode, full duplex
                CR1::BIDIMODE::CLEAR
                    + CR1::RXONLY::CLEAR
                    + CR1::CRCEN::CLEAR
                    + CR1::LSBFIRST::CLEAR
                    // Select as master with software slave management
                    + CR1::MSTR::SET
                    + CR1::SSM::SET
                    + CR1::SSI::SET
                    + match config.frame {
                        DataFrame::Bits8 => CR1::DFF::CLEAR,
                        DataFrame::Bits16 => CR1::DFF::SET,
                    }
                    // IdleLow  = CPOL = 0
                    // IdleHigh = CPOL = 1
                    + match config.polarity {
                        ClockPolarity::IdleLow => CR1::CPOL::CLEAR,
                        ClockPolarity::IdleHigh => CR1::CPOL::SET,
                    }
                    // SampleLeading  = CPHA = 0
                    // SampleTrailing = CPHA = 1
                    + match config.phase {
                        ClockPhase::SampleLeading => CR1::CPHA::CLEAR,
                        ClockPhase::SampleTrailing => CR1::CPHA::SET,
                    }
                    + CR1::BR.val(u32::from(config.baud_rate as u8)),
            );
            // Polled operation: no interrupts, no DMA requests
            self.registers.cr2.write(
                CR2::TXEIE::CLEAR
                    + CR2::RXNEIE::CLEAR
                    + CR2::ERRIE::CLEAR
                    + CR2::SSOE::CLEAR
                    + CR2::TXDMAEN::CLEAR
                    + CR2::RXDMAEN::CLEAR,
            );
        });
        debug!(
            "{:?}: configured {:?}, clock divided by {}",
            self.id,
            config,
            config.baud_rate.divisor()
        );
    }

    fn configuration(&self) -> SpiConfig {
        let cr1 = self.registers.cr1.extract();
        SpiConfig::new(
            if cr1.is_set(CR1::DFF) {
                DataFrame::Bits16
            } else {
                DataFrame::Bits8
            },
            if cr1.is_set(CR1::CPOL) {
                ClockPolarity::IdleHigh
            } else {
                ClockPolarity::IdleLow
            },
            if cr1.is_set(CR1::CPHA) {
                ClockPhase::SampleTrailing
            } else {
                ClockPhase::SampleLeading
            },
            BaudRate::from_code(cr1.read(CR1::BR) as u8),
        )
    }

    fn is_busy(&self) -> bool {
        self.registers.sr.is_set(SR::BSY)
    }

    fn read_write_byte(&self, val: u8) -> u8 {
        self.exchange(u16::from(val)) as u8
    }

    fn read_write_bytes(
        &self,
        write_buffer: &[u8],
        read_buffer: &mut [u8],
        len: usize,
    ) -> Result<(), ErrorCode> {
        if len > write_buffer.len() || len > read_buffer.len() {
            warn!(
                "{:?}: transfer of {} bytes exceeds buffers ({}, {})",
                self.id,
                len,
                write_buffer.len(),
                read_buffer.len()
            );
            return Err(ErrorCode::INVAL);
        }

        for (out, read) in write_buffer[..len].iter().zip(read_buffer[..len].iter_mut()) {
            *read = self.read_write_byte(*out);
        }
        self.wait_idle();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    use crate::test_registers;

    /// A controller whose data register echoes every frame written to it:
    /// TXE and RXNE always read as set and BSY as clear.
    fn loopback(id: SpiId) -> Spi {
        let spi = Spi::new(unsafe { test_registers::zeroed() }, id);
        spi.registers.sr.write(SR::TXE::SET + SR::RXNE::SET);
        spi
    }

    const SPI1_CONFIG: SpiConfig = SpiConfig::new(
        DataFrame::Bits8,
        ClockPolarity::IdleLow,
        ClockPhase::SampleLeading,
        BaudRate::Div32,
    );

    #[test]
    fn init_programs_control_register() {
        let spi = loopback(SpiId::Spi1);
        spi.init(SPI1_CONFIG);

        let cr1 = spi.registers.cr1.extract();
        assert!(cr1.is_set(CR1::SPE));
        assert!(cr1.is_set(CR1::MSTR));
        assert!(cr1.is_set(CR1::SSM));
        assert!(cr1.is_set(CR1::SSI));
        assert!(!cr1.is_set(CR1::BIDIMODE));
        assert!(!cr1.is_set(CR1::DFF));
        assert!(!cr1.is_set(CR1::CPOL));
        assert!(!cr1.is_set(CR1::CPHA));
        assert_eq!(cr1.read(CR1::BR), 0b100);
        assert_eq!(spi.registers.cr2.get(), 0);
        assert_eq!(spi.configuration(), SPI1_CONFIG);
    }

    #[test]
    fn init_is_idempotent() {
        let spi = loopback(SpiId::Spi2);
        spi.init(SPI1_CONFIG);
        let once = (spi.registers.cr1.get(), spi.registers.cr2.get());

        spi.init(SPI1_CONFIG);
        assert_eq!((spi.registers.cr1.get(), spi.registers.cr2.get()), once);
        assert_eq!(spi.configuration(), SPI1_CONFIG);
    }

    #[test]
    fn reconfiguration_replaces_every_field() {
        let spi = loopback(SpiId::Spi3);
        let other = SpiConfig::new(
            DataFrame::Bits16,
            ClockPolarity::IdleHigh,
            ClockPhase::SampleTrailing,
            BaudRate::Div256,
        );

        spi.init(other);
        assert_eq!(spi.configuration(), other);

        spi.init(SPI1_CONFIG);
        assert_eq!(spi.configuration(), SPI1_CONFIG);
        assert!(spi.registers.cr1.is_set(CR1::SPE));
    }

    #[test]
    fn every_divider_round_trips() {
        let spi = loopback(SpiId::Spi1);
        for code in 0..8u8 {
            let config = SpiConfig {
                baud_rate: BaudRate::try_from(code).unwrap(),
                ..SPI1_CONFIG
            };
            spi.init(config);
            assert_eq!(spi.registers.cr1.read(CR1::BR), u32::from(code));
            assert_eq!(spi.configuration(), config);
        }
    }

    #[test]
    fn init_default_applies_static_configuration() {
        let spi = loopback(SpiId::Spi1);
        spi.init_default();
        assert_eq!(spi.configuration(), CONFIG.spi);
    }

    #[test]
    fn transfer_echoes_every_byte() {
        let spi = loopback(SpiId::Spi1);
        spi.init(SPI1_CONFIG);

        let tx = [0x01, 0x02, 0x03, 0x04];
        let mut rx = [0u8; 4];
        assert_eq!(spi.read_write_bytes(&tx, &mut rx, 4), Ok(()));

        assert_eq!(rx, tx);
        assert_eq!(spi.registers.dr.get(), 0x04);
        assert!(!spi.is_busy());
    }

    #[test]
    fn transfer_stops_after_len_units() {
        let spi = loopback(SpiId::Spi1);
        spi.init(SPI1_CONFIG);

        let tx = [0xA0, 0xA1, 0xA2, 0xA3];
        let mut rx = [0xFF; 4];
        spi.read_write_bytes(&tx, &mut rx, 2).unwrap();

        assert_eq!(rx, [0xA0, 0xA1, 0xFF, 0xFF]);
        assert_eq!(spi.registers.dr.get(), 0xA1);
    }

    #[test]
    fn empty_transfer_touches_nothing() {
        let spi = loopback(SpiId::Spi1);
        let mut rx: [u8; 0] = [];
        assert_eq!(spi.read_write_bytes(&[], &mut rx, 0), Ok(()));
        assert_eq!(spi.registers.dr.get(), 0);
    }

    #[test]
    fn oversized_transfer_is_rejected() {
        let spi = loopback(SpiId::Spi1);
        let tx = [1, 2, 3];
        let mut rx = [0u8; 2];

        assert_eq!(spi.read_write_bytes(&tx, &mut rx, 3), Err(ErrorCode::INVAL));
        let mut rx = [0u8; 4];
        assert_eq!(spi.read_write_bytes(&tx, &mut rx, 4), Err(ErrorCode::INVAL));

        assert_eq!(rx, [0; 4]);
        assert_eq!(spi.registers.dr.get(), 0);
    }

    #[test]
    fn single_byte_exchange() {
        let spi = loopback(SpiId::Spi2);
        assert_eq!(spi.read_write_byte(0x5A), 0x5A);
    }

    #[test]
    fn word_transfer_uses_full_frames() {
        let spi = loopback(SpiId::Spi3);
        spi.init(SpiConfig {
            frame: DataFrame::Bits16,
            ..SPI1_CONFIG
        });

        let tx = [0x1234, 0xBEEF];
        let mut rx = [0u16; 2];
        assert_eq!(spi.read_write_words(&tx, &mut rx, 2), Ok(()));
        assert_eq!(rx, tx);
        assert_eq!(spi.read_write_words(&tx, &mut rx, 3), Err(ErrorCode::INVAL));
    }

    #[test]
    fn transfer_waits_for_received_frame() {
        let registers: StaticRef<SpiRegisters> = unsafe { test_registers::zeroed() };
        // Transmit buffer empty, nothing received yet.
        registers.sr.write(SR::TXE::SET);

        // `StaticRef` is not `Send`, so the transferring thread builds its own
        // handle to the same register block.
        let base = &*registers as *const SpiRegisters as usize;
        let transfer = thread::spawn(move || {
            let spi = Spi::new(
                unsafe { StaticRef::new(base as *const SpiRegisters) },
                SpiId::Spi1,
            );
            let mut rx = [0u8; 4];
            spi.read_write_bytes(&[0x01, 0x02, 0x03, 0x04], &mut rx, 4)
                .map(|()| rx)
        });

        thread::sleep(Duration::from_millis(100));
        assert!(!transfer.is_finished());

        registers.sr.modify(SR::RXNE::SET);
        assert_eq!(transfer.join().unwrap(), Ok([0x01, 0x02, 0x03, 0x04]));
    }

    #[test]
    fn busy_flag() {
        let spi = loopback(SpiId::Spi1);
        assert!(!spi.is_busy());
        spi.registers.sr.modify(SR::BSY::SET);
        assert!(spi.is_busy());
    }

    #[test]
    fn raw_instance_ids() {
        assert_eq!(SpiId::try_from(0), Ok(SpiId::Spi1));
        assert_eq!(SpiId::try_from(1), Ok(SpiId::Spi2));
        assert_eq!(SpiId::try_from(2), Ok(SpiId::Spi3));
        for raw in 3..=u8::MAX {
            assert_eq!(SpiId::try_from(raw), Err(ErrorCode::INVAL));
        }
    }
}
