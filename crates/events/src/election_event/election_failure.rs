// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use actix::Message;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use veil_acl::Principal;

/// An operation was rejected. Published instead of any other event for that operation.
#[derive(Message, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[rtype(result = "()")]
pub struct ElectionFailure {
    pub operation: u64,
    pub caller: Principal,
    /// Name of the operation that failed
    pub method: String,
    /// Error kind, eg. "WrongStage"
    pub kind: String,
    pub message: String,
}

impl ElectionFailure {
    pub fn new(
        operation: u64,
        caller: Principal,
        method: &str,
        kind: &str,
        message: impl Into<String>,
    ) -> Self {
        Self {
            operation,
            caller,
            method: method.to_string(),
            kind: kind.to_string(),
            message: message.into(),
        }
    }
}

impl Display for ElectionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "operation: {}, caller: {}, method: {}, kind: {}, message: {}",
            self.operation, self.caller, self.method, self.kind, self.message
        )
    }
}
