// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{Election, ElectionError};
use tracing::info;
use veil_acl::Principal;
use veil_arith::{Ciphertext, ConfidentialArithmetic, EncU64};
use veil_events::{Stage, WinnerAvailable};
use veil_fees::FeeCollector;

impl<B, F> Election<B, F>
where
    B: ConfidentialArithmetic,
    F: FeeCollector,
{
    /// Compute the encrypted id of the proposal with the highest count. Administrator only.
    ///
    /// A single pass keeps the best count and id so far, replacing both through a select on a
    /// strict greater-than, so on a tie the earlier proposal wins. Only the resulting id is granted
    /// beyond this operation.
    pub fn reveal_winner(&mut self, caller: Principal) -> Result<EncU64, ElectionError> {
        self.run_operation(caller, "reveal_winner", |this, _| {
            this.require_administrator(&caller)?;
            this.require_stage(Stage::Done)?;
            let (first, rest) = this
                .proposals
                .split_first()
                .map(|(first, rest)| (*first, rest.to_vec()))
                .ok_or(ElectionError::NoProposals)?;
            if this.total_votes == 0 {
                return Err(ElectionError::NoVotesCast);
            }

            let mut best_count = first.count;
            let mut best_id = first.id;
            for proposal in rest {
                let is_greater = this.backend.gt(&proposal.count, &best_count)?;
                best_count = this.backend.select(&is_greater, &proposal.count, &best_count)?;
                best_id = this.backend.select(&is_greater, &proposal.id, &best_id)?;

                this.grant_transient(is_greater.handle())?;
                this.grant_transient(best_count.handle())?;
                this.grant_transient(best_id.handle())?;
            }
            this.grant_stored(best_id.handle());

            this.encrypted_winner_id = Some(best_id);
            info!(round = this.round, winner = %best_id, "winner computed");
            this.emit(WinnerAvailable {
                round: this.round,
                winner: best_id.handle(),
            });
            Ok(best_id)
        })
    }
}
