// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use actix::Message;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use veil_acl::{Handle, Principal};

#[derive(Message, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[rtype(result = "()")]
pub struct VoterRegistered {
    pub round: u64,
    pub principal: Principal,
    pub index: usize,
    /// Handle of the voter's encrypted quota
    pub quota: Handle,
    /// Fee overpayment credited back to the voter
    pub refund: u128,
}

impl Display for VoterRegistered {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "round: {}, principal: {}, index: {}, quota: {}, refund: {}",
            self.round, self.principal, self.index, self.quota, self.refund
        )
    }
}
