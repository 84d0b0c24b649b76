// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Core driver kernel.
//!
//! The kernel crate holds the code that chip crates share: the Hardware
//! Interface Layer (HIL) traits for the external interrupt controller and the
//! SPI controller, the standard error type, the interrupt service interface,
//! and the register access utilities.
//!
//! Chip crates implement the HIL traits on top of memory-mapped register
//! blocks. The kernel itself never touches hardware.

#![warn(unreachable_pub)]
#![no_std]

pub mod errorcode;
pub mod hil;
pub mod platform;
pub mod utilities;

pub use crate::errorcode::ErrorCode;

// Unit tests run on the host.
#[cfg(test)]
#[macro_use]
extern crate std;
