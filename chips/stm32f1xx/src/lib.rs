// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Peripheral implementations for the STM32F10x MCU family.
//!
//! STM32F103: <https://www.st.com/en/microcontrollers-microprocessors/stm32f103.html>
//!
//! The drivers take the base of their register block as a [`StaticRef`]
//! supplied by the board, so the same code runs against real memory-mapped
//! peripherals or against register blocks emulated in RAM.
//!
//! [`StaticRef`]: kernel::utilities::StaticRef

#![no_std]

mod config;

pub mod chip;
pub mod nvic;

// Peripherals
pub mod exti;
pub mod spi;

#[cfg(test)]
#[macro_use]
extern crate std;

#[cfg(test)]
mod test_registers;
