// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::info;
use veil_acl::Principal;

/// Amount in wei
pub type Wei = u128;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FeeError {
    #[error("insufficient fee: paid {paid} wei, required {required} wei")]
    InsufficientFee { paid: Wei, required: Wei },
    #[error("no collected fees to withdraw")]
    NothingToWithdraw,
    #[error("fee balance overflow")]
    Overflow,
}

/// Check a payment against the required fee and return the overpayment.
pub fn refund_for(paid: Wei, required: Wei) -> Result<Wei, FeeError> {
    paid.checked_sub(required)
        .ok_or(FeeError::InsufficientFee { paid, required })
}

/// Plain bookkeeping of registration fees. Nothing here is confidential.
pub trait FeeCollector {
    /// Take `required` from a payment of `paid` into the election balance and credit the
    /// difference back to the payer. Returns the refunded amount.
    fn collect(&mut self, payer: Principal, paid: Wei, required: Wei) -> Result<Wei, FeeError>;
    /// Move the whole balance to `to`. Returns the amount moved.
    fn withdraw(&mut self, to: Principal) -> Result<Wei, FeeError>;
    fn balance(&self) -> Wei;
}

/// In memory fee ledger.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct FeeLedger {
    balance: Wei,
    /// Refunds owed to payers
    refunds: BTreeMap<Principal, Wei>,
    /// Totals paid out per recipient
    payouts: BTreeMap<Principal, Wei>,
}

impl FeeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn refund_of(&self, payer: &Principal) -> Wei {
        self.refunds.get(payer).copied().unwrap_or(0)
    }

    pub fn paid_out_to(&self, to: &Principal) -> Wei {
        self.payouts.get(to).copied().unwrap_or(0)
    }
}

impl FeeCollector for FeeLedger {
    fn collect(&mut self, payer: Principal, paid: Wei, required: Wei) -> Result<Wei, FeeError> {
        let refund = refund_for(paid, required)?;
        let balance = self
            .balance
            .checked_add(required)
            .ok_or(FeeError::Overflow)?;
        let owed = self
            .refund_of(&payer)
            .checked_add(refund)
            .ok_or(FeeError::Overflow)?;

        self.balance = balance;
        if refund > 0 {
            self.refunds.insert(payer, owed);
        }

        info!(%payer, fee = required, refund, balance, "Collected registration fee");
        Ok(refund)
    }

    fn withdraw(&mut self, to: Principal) -> Result<Wei, FeeError> {
        if self.balance == 0 {
            return Err(FeeError::NothingToWithdraw);
        }
        let amount = self.balance;
        let total = self
            .paid_out_to(&to)
            .checked_add(amount)
            .ok_or(FeeError::Overflow)?;

        self.payouts.insert(to, total);
        self.balance = 0;

        info!(%to, amount, "Withdrew collected fees");
        Ok(amount)
    }

    fn balance(&self) -> Wei {
        self.balance
    }
}
