/*
 * SPDX-FileCopyrightText: 2025 The warren developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use warren::cancel::Cancelled;
use warren::cli::{cli_main, init_env_logger};
use warren::events::ReplayError;
use warren::solve::NoPath;
use warren::storage::FormatError;

/// Exit codes: 0 success, 1 usage error, 2 I/O error, 3 algorithm
/// failure, 4 cancelled. Anything not recognizably I/O or algorithmic
/// (bad dimensions, bad options, bad flags) is a usage error.
fn exit_code(err: &anyhow::Error) -> i32 {
    fn has<E: std::error::Error + 'static>(err: &anyhow::Error) -> bool {
        err.chain().any(|cause| cause.downcast_ref::<E>().is_some())
    }

    if has::<Cancelled>(err) {
        4
    } else if has::<NoPath>(err) {
        3
    } else if has::<FormatError>(err) || has::<ReplayError>(err) || has::<std::io::Error>(err) {
        2
    } else {
        1
    }
}

pub fn main() {
    if let Err(e) = init_env_logger() {
        eprintln!("warren: {e}");
        std::process::exit(2);
    }
    if let Err(e) = cli_main(std::env::args_os()) {
        eprintln!("warren: {e:#}");
        std::process::exit(exit_code(&e));
    }
}
