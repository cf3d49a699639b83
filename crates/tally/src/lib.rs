// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! The confidential tally engine.
//!
//! An [`Election`] moves through the [`veil_events::Stage`]s, admits voters with an encrypted
//! quota of one ballot, folds encrypted ballots into per-proposal counts without branching on
//! anything secret, and finally computes an encrypted winner id that only the administrator can
//! have decrypted.

mod election;
mod error;
mod lifecycle;
mod registry;
mod stage;
mod tally;
#[cfg(test)]
mod test_utils;
mod winner;
mod withdraw;

pub use election::*;
pub use error::*;
pub use registry::*;
pub use tally::*;
