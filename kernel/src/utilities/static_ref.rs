// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Wrapper type for safe pointers to static memory.

use core::ops::Deref;

/// A pointer to statically allocated mutable data such as memory mapped I/O
/// registers.
///
/// This is a simple wrapper around a raw pointer that encapsulates an unsafe
/// dereference in a safe manner. It serves the role of creating a `&'static T`
/// given a raw address and acts similarly to `extern` definitions, except
/// `StaticRef` is subject to module and crate boundaries, while `extern`
/// definitions can be imported anywhere.
#[derive(Debug)]
pub struct StaticRef<T> {
    ptr: *const T,
}

impl<T> StaticRef<T> {
    /// Create a new `StaticRef` from a raw pointer
    ///
    /// ## Safety
    ///
    /// Callers must pass in a reference to statically allocated memory which
    /// does not overlap with other values.
    pub const unsafe fn new(ptr: *const T) -> StaticRef<T> {
        StaticRef { ptr }
    }
}

impl<T> Clone for StaticRef<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for StaticRef<T> {}

impl<T> PartialEq for StaticRef<T> {
    fn eq(&self, other: &Self) -> bool {
        core::ptr::eq(self.ptr, other.ptr)
    }
}

impl<T> Eq for StaticRef<T> {}

impl<T: 'static> Deref for StaticRef<T> {
    type Target = T;
    fn deref(&self) -> &'static T {
        // SAFETY: `new` requires the pointer to reference static memory.
        unsafe { &*self.ptr }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static VALUE: u32 = 0x1234;

    #[test]
    fn derefs_to_static_memory() {
        let r = unsafe { StaticRef::new(&VALUE as *const u32) };
        let copy = r;
        assert_eq!(*copy, 0x1234);
        assert!(core::ptr::eq(&*r, &VALUE));
        assert_eq!(r, copy);
    }
}
