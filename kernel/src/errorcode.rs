// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Standard error enum for driver operations.

/// Standard errors returned by fallible driver operations.
///
/// Driver operations either succeed or reject their arguments. There is no
/// recoverable/fatal split: callers inspect the result and decide policy.
///
/// The discriminants are the integer status codes reported to callers that
/// want a plain number, see [`into_statuscode`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(usize)]
pub enum ErrorCode {
    /// An invalid parameter was passed: an out-of-range line or instance
    /// identifier, an unknown mode selector, a missing callback, or a
    /// transfer length larger than its buffers.
    INVAL = 1,
}

impl From<ErrorCode> for usize {
    fn from(err: ErrorCode) -> usize {
        err as usize
    }
}

impl core::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ErrorCode::INVAL => f.write_str("invalid argument"),
        }
    }
}

/// Convert a `Result<(), ErrorCode>` to a status code.
///
/// `Ok(())` is 0 and every `ErrorCode` maps to its discriminant, so the
/// invalid-argument outcome is 1.
pub fn into_statuscode(r: Result<(), ErrorCode>) -> usize {
    match r {
        Ok(()) => 0,
        Err(e) => e.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::string::ToString;

    #[test]
    fn status_codes() {
        assert_eq!(into_statuscode(Ok(())), 0);
        assert_eq!(into_statuscode(Err(ErrorCode::INVAL)), 1);
        assert_eq!(usize::from(ErrorCode::INVAL), 1);
    }

    #[test]
    fn display() {
        assert_eq!(ErrorCode::INVAL.to_string(), "invalid argument");
    }
}
