// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! The confidential arithmetic capability consumed by the tally engine.
//!
//! [`ConfidentialArithmetic`] is the only surface the engine sees: algebraic, comparison and
//! selection primitives over ciphertext handles plus verification of client-submitted inputs.
//! Nothing here decrypts. [`MockArithmetic`] is a deterministic reference backend used by the
//! test-suite and the CLI, together with [`InputClient`] (the client side of input submission)
//! and [`DecryptionOracle`] (the off-system decryption service).

mod backend;
mod input;
mod mock;
mod oracle;

pub use backend::*;
pub use input::*;
pub use mock::*;
pub use oracle::*;
