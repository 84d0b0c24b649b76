// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Register blocks emulated in host memory for unit tests.

use std::boxed::Box;

use kernel::utilities::StaticRef;

/// Allocate a register block in host memory, with every register at zero,
/// and leak it so drivers can hold it like a memory-mapped block.
///
/// ## Safety
///
/// `T` must be a register block built only from `tock-registers` cells over
/// unsigned integers, for which the all-zero pattern is valid.
pub(crate) unsafe fn zeroed<T: 'static>() -> StaticRef<T> {
    let block: &'static T = Box::leak(Box::new(core::mem::zeroed::<T>()));
    StaticRef::new(block as *const T)
}
