// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use actix::Message;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use veil_acl::Principal;

/// A vote operation completed. Says nothing about whether the tally changed.
#[derive(Message, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[rtype(result = "()")]
pub struct VoteCast {
    pub round: u64,
    pub voter: Principal,
    pub total_votes: u64,
}

impl Display for VoteCast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "round: {}, voter: {}, total_votes: {}",
            self.round, self.voter, self.total_votes
        )
    }
}
