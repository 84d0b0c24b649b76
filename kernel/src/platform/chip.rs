// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Interfaces for chip interrupt dispatch.

/// Interface for handling interrupts on a hardware chip.
///
/// When an interrupt (identified by its NVIC number) has triggered, the
/// implementation is called with that number. It either routes the interrupt
/// to the peripheral driver that owns it or returns `false` to signify that it
/// does not know how to handle the interrupt.
///
/// Implementations can be chained: a chip-variant object handles its own
/// interrupts and forwards everything else to the object for the base chip.
pub trait InterruptService {
    /// Service an interrupt, if supported by this chip. If this interrupt
    /// number is not supported, return false.
    ///
    /// ## Safety
    ///
    /// Must only be called from the interrupt (or interrupt-equivalent)
    /// execution context, since handlers assume they are not preempted by
    /// other users of the same peripheral.
    unsafe fn service_interrupt(&self, interrupt: u32) -> bool;
}
