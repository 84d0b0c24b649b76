// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Compile-time configuration options for the chip drivers.
//!
//! Options live in a typed `const` object rather than behind `#[cfg]`
//! attributes, so every code path is type-checked whatever the selected
//! values are, and the compiler folds the constants away afterwards.
//! Cargo features only pick values for the fields below.

use kernel::hil::exti::SenseMode;
use kernel::hil::spi::{BaudRate, ClockPhase, ClockPolarity, DataFrame, SpiConfig};

use crate::exti;

/// Data structure holding compile-time configuration options.
///
/// To change the configuration, modify the relevant values in the `CONFIG`
/// constant object defined at the end of this file.
pub(crate) struct Config {
    /// The line `Exti::init` masks and configures.
    pub(crate) exti_line: u8,

    /// The sensing mode `Exti::init` applies to `exti_line`.
    ///
    /// Rising edges by default, falling edges with the `exti_falling`
    /// feature, both edges with the `exti_on_change` feature.
    pub(crate) exti_sense_mode: SenseMode,

    /// The configuration `Spi::init_default` applies.
    pub(crate) spi: SpiConfig,
}

/// A unique instance of `Config` where compile-time configuration options are
/// defined. This is the only location in the crate where Cargo features are
/// consulted.
pub(crate) const CONFIG: Config = Config {
    exti_line: 0,
    exti_sense_mode: if cfg!(feature = "exti_on_change") {
        SenseMode::OnChange
    } else if cfg!(feature = "exti_falling") {
        SenseMode::Falling
    } else {
        SenseMode::Rising
    },
    spi: SpiConfig::new(
        DataFrame::Bits8,
        ClockPolarity::IdleLow,
        ClockPhase::SampleLeading,
        BaudRate::Div32,
    ),
};

const _: () = assert!(
    !(cfg!(feature = "exti_falling") && cfg!(feature = "exti_on_change")),
    "select at most one of the `exti_falling` and `exti_on_change` features"
);

const _: () = assert!(
    CONFIG.exti_line < exti::NUM_LINES,
    "the configured EXTI line does not exist"
);
