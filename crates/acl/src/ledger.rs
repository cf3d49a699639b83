// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{Handle, Principal};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;
use tracing::{debug, trace};

/// Sequence number of an atomic operation executed against the ledger.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OperationId(u64);

impl OperationId {
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "op#{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scope {
    /// Survives across operations and is never revoked automatically.
    Persistent,
    /// Only valid while the given operation is executing.
    Transient(OperationId),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccessGrant {
    pub handle: Handle,
    pub principal: Principal,
    pub scope: Scope,
}

/// How an operation scope is closed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Commit,
    Abort,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AclError {
    #[error("no operation is in progress")]
    NoActiveOperation,
    #[error("{0} is still in progress")]
    OperationInProgress(OperationId),
    #[error("attempted to close {got} while {expected} is active")]
    OperationMismatch {
        expected: OperationId,
        got: OperationId,
    },
    #[error("{principal} holds no grant on {handle}")]
    NotGranted { handle: Handle, principal: Principal },
}

/// Capability ledger recording which principal may decrypt which ciphertext.
///
/// Grants are keyed by `(handle, principal)`. Transient grants are tagged with the operation that
/// issued them and are swept when that operation ends. Persistent grants issued inside an
/// operation are staged and only become visible to later operations if the operation commits.
#[derive(Debug, Default)]
pub struct AccessControlLedger {
    grants: BTreeMap<(Handle, Principal), Scope>,
    staged: Vec<(Handle, Principal)>,
    current: Option<OperationId>,
    next_operation: u64,
}

impl AccessControlLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_operation(&self) -> Option<OperationId> {
        self.current
    }

    /// Open a new operation scope. Operations never nest.
    pub fn begin_operation(&mut self) -> Result<OperationId, AclError> {
        if let Some(active) = self.current {
            return Err(AclError::OperationInProgress(active));
        }
        let op = OperationId(self.next_operation);
        self.next_operation += 1;
        self.current = Some(op);
        trace!(%op, "operation started");
        Ok(op)
    }

    /// Close the operation scope, sweeping its transient grants and either committing or dropping
    /// the persistent grants it staged.
    pub fn end_operation(&mut self, op: OperationId, outcome: Outcome) -> Result<(), AclError> {
        let expected = self.current.ok_or(AclError::NoActiveOperation)?;
        if expected != op {
            return Err(AclError::OperationMismatch { expected, got: op });
        }

        let before = self.grants.len();
        self.grants
            .retain(|_, scope| !matches!(scope, Scope::Transient(tagged) if *tagged == op));
        let swept = before - self.grants.len();

        let staged = std::mem::take(&mut self.staged);
        let committed = match outcome {
            Outcome::Commit => {
                let count = staged.len();
                for key in staged {
                    self.grants.insert(key, Scope::Persistent);
                }
                count
            }
            Outcome::Abort => 0,
        };

        self.current = None;
        debug!(%op, ?outcome, swept, committed, "operation closed");
        Ok(())
    }

    /// Grant `principal` a persistent right to decrypt `handle`.
    ///
    /// Inside an operation the grant is staged until the operation commits.
    pub fn allow(&mut self, handle: Handle, principal: Principal) {
        match self.current {
            Some(_) => self.staged.push((handle, principal)),
            None => {
                self.grants.insert((handle, principal), Scope::Persistent);
            }
        }
    }

    /// Grant `principal` a right to decrypt `handle` that expires with the current operation.
    pub fn allow_transient(&mut self, handle: Handle, principal: Principal) -> Result<(), AclError> {
        let op = self.current.ok_or(AclError::NoActiveOperation)?;
        self.grants
            .entry((handle, principal))
            .or_insert(Scope::Transient(op));
        Ok(())
    }

    /// Whether `principal` may decrypt `handle` right now, including grants that only last for the
    /// current operation.
    pub fn is_allowed(&self, handle: &Handle, principal: &Principal) -> bool {
        let key = (*handle, *principal);
        match self.grants.get(&key) {
            Some(Scope::Persistent) => true,
            Some(Scope::Transient(op)) => self.current == Some(*op),
            None => self.current.is_some() && self.staged.contains(&key),
        }
    }

    /// Whether a committed persistent grant exists. This is what an off-system decryption service
    /// checks.
    pub fn is_allowed_persistent(&self, handle: &Handle, principal: &Principal) -> bool {
        matches!(
            self.grants.get(&(*handle, *principal)),
            Some(Scope::Persistent)
        )
    }

    pub fn check_persistent(&self, handle: &Handle, principal: &Principal) -> Result<(), AclError> {
        if self.is_allowed_persistent(handle, principal) {
            Ok(())
        } else {
            Err(AclError::NotGranted {
                handle: *handle,
                principal: *principal,
            })
        }
    }

    pub fn grants_for(&self, handle: &Handle) -> Vec<AccessGrant> {
        self.grants
            .iter()
            .filter(|((h, _), _)| h == handle)
            .map(|((handle, principal), scope)| AccessGrant {
                handle: *handle,
                principal: *principal,
                scope: *scope,
            })
            .collect()
    }

    pub fn transient_count(&self) -> usize {
        self.grants
            .values()
            .filter(|scope| matches!(scope, Scope::Transient(_)))
            .count()
    }

    pub fn persistent_count(&self) -> usize {
        self.grants.len() - self.transient_count()
    }
}
