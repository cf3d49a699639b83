// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{Election, ElectionError, Proposal, VoterRegistry};
use tracing::info;
use veil_acl::Principal;
use veil_arith::{Ciphertext, ConfidentialArithmetic};
use veil_events::{ElectionReset, Stage};
use veil_fees::FeeCollector;

impl<B, F> Election<B, F>
where
    B: ConfidentialArithmetic,
    F: FeeCollector,
{
    /// Encrypt ids `0..n` and zero counts, granting both to the administrator and the election.
    pub(crate) fn create_proposals(&mut self, n: usize) -> Result<Vec<Proposal>, ElectionError> {
        let mut proposals = Vec::with_capacity(n);
        for i in 0..n {
            let id = self.backend.encrypt(i as u64)?;
            let count = self.backend.encrypt(0)?;
            self.grant_stored(id.handle());
            self.grant_stored(count.handle());
            proposals.push(Proposal { id, count });
        }
        Ok(proposals)
    }

    /// Start a new round with `num_proposals` fresh proposals. Administrator only, allowed in any
    /// stage.
    ///
    /// Grants issued on the discarded ciphertexts stay in place.
    pub fn reset(&mut self, caller: Principal, num_proposals: usize) -> Result<(), ElectionError> {
        self.run_operation(caller, "reset", |this, _| {
            this.require_administrator(&caller)?;
            let proposals = this.create_proposals(num_proposals)?;

            this.proposals = proposals;
            this.registry = VoterRegistry::default();
            this.total_votes = 0;
            this.encrypted_winner_id = None;
            this.stage = Stage::Registration;
            this.round += 1;

            info!(round = this.round, num_proposals, "election reset");
            this.emit(ElectionReset {
                round: this.round,
                num_proposals,
            });
            Ok(())
        })
    }
}
