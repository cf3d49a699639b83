// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

mod election_event;
mod event_id;
mod eventbus;
mod stage;
mod traits;

pub use election_event::*;
pub use event_id::*;
pub use eventbus::*;
pub use stage::*;
pub use traits::*;
