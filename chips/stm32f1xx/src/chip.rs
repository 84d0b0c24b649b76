// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Chip trait setup.

use core::convert::TryFrom;

use kernel::platform::chip::InterruptService;
use kernel::utilities::StaticRef;
use log::warn;

use crate::exti::{Exti, ExtiRegisters};
use crate::nvic;
use crate::spi::{Spi, SpiId, SpiRegisters};

pub struct Stm32f1xxDefaultPeripherals<'a> {
    pub exti: Exti<'a>,
    pub spi1: Spi,
    pub spi2: Spi,
    pub spi3: Spi,
}

impl<'a> Stm32f1xxDefaultPeripherals<'a> {
    pub const fn new(
        exti_base: StaticRef<ExtiRegisters>,
        spi1_base: StaticRef<SpiRegisters>,
        spi2_base: StaticRef<SpiRegisters>,
        spi3_base: StaticRef<SpiRegisters>,
    ) -> Self {
        Self {
            exti: Exti::new(exti_base),
            spi1: Spi::new(spi1_base, SpiId::Spi1),
            spi2: Spi::new(spi2_base, SpiId::Spi2),
            spi3: Spi::new(spi3_base, SpiId::Spi3),
        }
    }

    pub fn spi(&self, id: SpiId) -> &Spi {
        match id {
            SpiId::Spi1 => &self.spi1,
            SpiId::Spi2 => &self.spi2,
            SpiId::Spi3 => &self.spi3,
        }
    }

    /// Look up an SPI instance by its raw selector. Selectors other than 0,
    /// 1 and 2 name no instance.
    pub fn select_spi(&self, id: u8) -> Option<&Spi> {
        match SpiId::try_from(id) {
            Ok(id) => Some(self.spi(id)),
            Err(_) => {
                warn!("spi: no instance {}", id);
                None
            }
        }
    }
}

impl InterruptService for Stm32f1xxDefaultPeripherals<'_> {
    unsafe fn service_interrupt(&self, interrupt: u32) -> bool {
        match interrupt {
            nvic::EXTI0 => self.exti.handle_interrupt(),
            nvic::EXTI1 => self.exti.handle_interrupt(),
            nvic::EXTI2 => self.exti.handle_interrupt(),
            nvic::EXTI3 => self.exti.handle_interrupt(),
            nvic::EXTI4 => self.exti.handle_interrupt(),
            nvic::EXTI9_5 => self.exti.handle_interrupt(),
            nvic::EXTI15_10 => self.exti.handle_interrupt(),

            nvic::SPI1 => self.spi1.handle_interrupt(),
            nvic::SPI2 => self.spi2.handle_interrupt(),
            nvic::SPI3 => self.spi3.handle_interrupt(),
            _ => return false,
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;
    use core::ptr;

    use kernel::hil::exti::{Client, ExternalInterrupt};

    use crate::test_registers;

    struct CountingClient {
        count: Cell<usize>,
    }

    impl Client for CountingClient {
        fn fired(&self) {
            self.count.set(self.count.get() + 1);
        }
    }

    fn peripherals<'a>() -> Stm32f1xxDefaultPeripherals<'a> {
        unsafe {
            Stm32f1xxDefaultPeripherals::new(
                test_registers::zeroed(),
                test_registers::zeroed(),
                test_registers::zeroed(),
                test_registers::zeroed(),
            )
        }
    }

    #[test]
    fn selectors_name_distinct_instances() {
        let p = peripherals();

        let spi1 = p.select_spi(0).unwrap();
        let spi2 = p.select_spi(1).unwrap();
        let spi3 = p.select_spi(2).unwrap();

        assert!(ptr::eq(spi1, &p.spi1));
        assert!(ptr::eq(spi2, &p.spi2));
        assert!(ptr::eq(spi3, &p.spi3));
        assert!(!ptr::eq(spi1, spi2));
        assert!(!ptr::eq(spi2, spi3));
        assert_eq!(spi1.id(), SpiId::Spi1);
        assert_eq!(spi3.id(), SpiId::Spi3);
    }

    #[test]
    fn unknown_selectors_are_rejected() {
        let p = peripherals();
        for id in 3..=u8::MAX {
            assert!(p.select_spi(id).is_none());
        }
    }

    #[test]
    fn exti_vectors_reach_the_client() {
        let client = CountingClient {
            count: Cell::new(0),
        };
        let p = peripherals();
        p.exti.set_client(Some(&client)).unwrap();

        // Pending but masked.
        p.exti.raise(11);
        assert!(unsafe { p.service_interrupt(nvic::EXTI15_10) });
        assert_eq!(client.count.get(), 0);

        p.exti.enable_line(5).unwrap();
        p.exti.raise(5);
        assert!(unsafe { p.service_interrupt(nvic::EXTI9_5) });
        assert_eq!(client.count.get(), 1);
    }

    #[test]
    fn spi_vectors_are_claimed() {
        let p = peripherals();
        for irq in [nvic::SPI1, nvic::SPI2, nvic::SPI3] {
            assert!(unsafe { p.service_interrupt(irq) });
        }
    }

    #[test]
    fn unknown_vectors_are_not_claimed() {
        let p = peripherals();
        assert!(!unsafe { p.service_interrupt(0) });
        assert!(!unsafe { p.service_interrupt(nvic::EXTI4 + 1) });
    }
}
