/*
 * SPDX-FileCopyrightText: 2025 The warren developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Cooperative cancellation.
//!
//! Generators and solvers check a [`CancelToken`] at least once per
//! outer iteration (stack push/pop, frontier pull, agent tick) and bail
//! out with [`Cancelled`] when it has been flipped. A cancelled
//! operation leaves the grid in an undefined but well-typed state; the
//! caller is expected to discard it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
/// The operation observed a cancellation request.
#[error("the operation was cancelled")]
pub struct Cancelled;

/// A cloneable cancellation flag shared between an operation and its
/// controller.
#[derive(Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// Creates a token in the not-cancelled state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation. Idempotent and safe to call from any
    /// thread (e.g. a signal handler).
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// Returns whether cancellation has been requested.
    #[inline(always)]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }

    /// Returns `Err(Cancelled)` if cancellation has been requested.
    #[inline(always)]
    pub fn check(&self) -> Result<(), Cancelled> {
        if self.is_cancelled() {
            Err(Cancelled)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token() {
        let token = CancelToken::new();
        assert!(token.check().is_ok());
        let clone = token.clone();
        clone.cancel();
        assert_eq!(token.check(), Err(Cancelled));
    }
}
