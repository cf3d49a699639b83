// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{Election, ElectionError};
use veil_acl::Principal;
use veil_arith::ConfidentialArithmetic;
use veil_events::FeesWithdrawn;
use veil_fees::FeeCollector;

impl<B, F> Election<B, F>
where
    B: ConfidentialArithmetic,
    F: FeeCollector,
{
    /// Pay every collected fee out to the administrator. Returns the amount in wei.
    pub fn withdraw(&mut self, caller: Principal) -> Result<u128, ElectionError> {
        self.run_operation(caller, "withdraw", |this, op| {
            this.require_administrator(&caller)?;
            let amount = this.fees.withdraw(caller)?;
            this.emit(FeesWithdrawn {
                operation: op.value(),
                to: caller,
                amount,
            });
            Ok(amount)
        })
    }
}
