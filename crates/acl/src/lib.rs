// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

mod handle;
mod ledger;
mod principal;

pub use handle::*;
pub use ledger::*;
pub use principal::*;
