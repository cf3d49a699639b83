// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{Election, ElectionError};
use tracing::info;
use veil_acl::Principal;
use veil_arith::ConfidentialArithmetic;
use veil_events::{Stage, StageAdvanced};
use veil_fees::FeeCollector;

impl<B, F> Election<B, F>
where
    B: ConfidentialArithmetic,
    F: FeeCollector,
{
    pub(crate) fn require_stage(&self, expected: Stage) -> Result<(), ElectionError> {
        if self.stage != expected {
            return Err(ElectionError::WrongStage {
                expected,
                actual: self.stage,
            });
        }
        Ok(())
    }

    /// Move the election to its next stage. Administrator only.
    pub fn advance_stage(&mut self, caller: Principal) -> Result<Stage, ElectionError> {
        self.run_operation(caller, "advance_stage", |this, _| {
            this.require_administrator(&caller)?;
            let previous = this.stage;
            let current = previous.next().ok_or(ElectionError::AlreadyFinal)?;

            this.stage = current;
            info!(round = this.round, %previous, %current, "stage advanced");
            this.emit(StageAdvanced {
                round: this.round,
                previous,
                current,
            });
            Ok(current)
        })
    }
}
