// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{Election, ElectionError};
use tracing::info;
use veil_acl::Principal;
use veil_arith::{
    Ciphertext, ConfidentialArithmetic, EncU64, ExternalCiphertext, InputContext, InputProof,
};
use veil_events::{Stage, VoteCast};
use veil_fees::FeeCollector;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Proposal {
    /// The proposal's own index, encrypted at creation
    pub id: EncU64,
    /// Encrypted running count
    pub count: EncU64,
}

impl<B, F> Election<B, F>
where
    B: ConfidentialArithmetic,
    F: FeeCollector,
{
    /// Cast an encrypted ballot.
    ///
    /// The ballot is compared against every proposal id and each count is updated through an
    /// oblivious select gated by the voter's quota, so neither the choice nor whether the voter had
    /// a ballot left influences which operations run. A voter with no quota left still completes
    /// the operation; it just changes no count.
    pub fn vote(
        &mut self,
        voter: Principal,
        ballot: &ExternalCiphertext,
        proof: &InputProof,
    ) -> Result<(), ElectionError> {
        self.run_operation(voter, "vote", |this, _| {
            this.require_stage(Stage::Vote)?;
            this.require_participant(&voter)?;
            let (index, quota) = this
                .registry
                .get(&voter)
                .map(|v| (v.index, v.remaining_quota))
                .ok_or(ElectionError::NotRegistered(voter))?;

            let context = InputContext {
                owner: voter,
                target: this.config.election_address,
            };
            let choice = this.backend.verify_and_decode(ballot, proof, &context)?;
            this.grant_transient(choice.handle())?;

            let zero = this.constant(0)?;
            let one = this.constant(1)?;

            let has_quota = this.backend.gt(&quota, &zero)?;
            this.grant_transient(has_quota.handle())?;

            let mut counts = Vec::with_capacity(this.proposals.len());
            for proposal in this.proposals.clone() {
                let matched = this.backend.eq(&choice, &proposal.id)?;
                let increment = this.backend.select(&matched, &one, &zero)?;
                let candidate = this.backend.add(&proposal.count, &increment)?;
                let count = this.backend.select(&has_quota, &candidate, &proposal.count)?;

                this.grant_transient(matched.handle())?;
                this.grant_transient(increment.handle())?;
                this.grant_transient(candidate.handle())?;
                this.grant_stored(count.handle());
                counts.push(count);
            }

            let decremented = this.backend.sub(&quota, &one)?;
            this.grant_transient(decremented.handle())?;
            let remaining = this.backend.select(&has_quota, &decremented, &quota)?;
            this.grant_stored(remaining.handle());

            for (proposal, count) in this.proposals.iter_mut().zip(counts) {
                proposal.count = count;
            }
            this.registry.set_quota(index, remaining);
            this.total_votes += 1;

            info!(round = this.round, %voter, total_votes = this.total_votes, "vote applied");
            this.emit(VoteCast {
                round: this.round,
                voter,
                total_votes: this.total_votes,
            });
            Ok(())
        })
    }
}
