/*
 * SPDX-FileCopyrightText: 2025 The warren developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

#![doc = include_str!("../README.md")]
#![deny(unstable_features)]
#![deny(trivial_casts)]
#![deny(unconditional_recursion)]
#![deny(clippy::empty_loop)]
#![deny(unreachable_code)]
#![deny(unreachable_pub)]
#![deny(unreachable_patterns)]
#![deny(unused_macro_rules)]
#![deny(unused_doc_comments)]

pub mod analysis;
pub mod cancel;
#[cfg(feature = "cli")]
pub mod cli;
pub mod events;
pub mod generate;
pub mod grid;
pub mod rng;
pub mod solve;
pub mod storage;

/// Prelude module to import everything from this crate.
pub mod prelude {
    pub use crate::analysis::*;
    pub use crate::cancel::*;
    pub use crate::events::*;
    pub use crate::generate::*;
    pub use crate::grid::*;
    pub use crate::rng::*;
    pub use crate::solve::*;
    pub use crate::storage::*;
}
