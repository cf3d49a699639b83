// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{Election, ElectionError};
use std::collections::HashMap;
use tracing::info;
use veil_acl::Principal;
use veil_arith::{Ciphertext, ConfidentialArithmetic, EncU64};
use veil_events::{Stage, VoterRegistered};
use veil_fees::{refund_for, FeeCollector};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Voter {
    pub index: usize,
    pub principal: Principal,
    /// Encrypted number of ballots the voter may still cast, 0 or 1
    pub remaining_quota: EncU64,
}

/// Arena of voters addressed by their stable index, plus the principal lookup.
#[derive(Clone, Debug, Default)]
pub struct VoterRegistry {
    voters: Vec<Voter>,
    index: HashMap<Principal, usize>,
}

impl VoterRegistry {
    pub fn len(&self) -> usize {
        self.voters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voters.is_empty()
    }

    pub fn contains(&self, principal: &Principal) -> bool {
        self.index.contains_key(principal)
    }

    pub fn get(&self, principal: &Principal) -> Option<&Voter> {
        self.index.get(principal).and_then(|i| self.voters.get(*i))
    }

    pub fn voters(&self) -> &[Voter] {
        &self.voters
    }

    pub(crate) fn push(&mut self, principal: Principal, remaining_quota: EncU64) -> usize {
        let index = self.voters.len();
        self.voters.push(Voter {
            index,
            principal,
            remaining_quota,
        });
        self.index.insert(principal, index);
        index
    }

    pub(crate) fn set_quota(&mut self, index: usize, remaining_quota: EncU64) {
        if let Some(voter) = self.voters.get_mut(index) {
            voter.remaining_quota = remaining_quota;
        }
    }
}

impl<B, F> Election<B, F>
where
    B: ConfidentialArithmetic,
    F: FeeCollector,
{
    /// Admit `principal` for this round against a payment of `paid_fee` wei. Returns the voter's
    /// index.
    pub fn register(&mut self, principal: Principal, paid_fee: u128) -> Result<usize, ElectionError> {
        self.run_operation(principal, "register", |this, _| {
            this.require_stage(Stage::Registration)?;
            this.require_participant(&principal)?;
            if this.registry.contains(&principal) {
                return Err(ElectionError::AlreadyRegistered(principal));
            }
            let required = this.config.required_fee;
            refund_for(paid_fee, required)?;

            let quota = this.backend.encrypt(1)?;
            this.grant_stored(quota.handle());

            let refund = this.fees.collect(principal, paid_fee, required)?;
            let index = this.registry.push(principal, quota);

            info!(round = this.round, %principal, index, "voter registered");
            this.emit(VoterRegistered {
                round: this.round,
                principal,
                index,
                quota: quota.handle(),
                refund,
            });
            Ok(index)
        })
    }
}
