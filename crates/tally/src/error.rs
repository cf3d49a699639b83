// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use strum::IntoStaticStr;
use thiserror::Error;
use veil_acl::{AclError, Principal};
use veil_arith::ArithError;
use veil_events::Stage;
use veil_fees::FeeError;

/// Every way an election operation can be rejected. A rejected operation leaves no trace in the
/// election state, the access-control ledger or the fee ledger.
#[derive(Error, Debug, Clone, PartialEq, Eq, IntoStaticStr)]
pub enum ElectionError {
    #[error("{caller} is not the administrator")]
    NotAuthorized { caller: Principal },
    #[error("operation requires stage {expected} but the election is in {actual}")]
    WrongStage { expected: Stage, actual: Stage },
    #[error("{0} is already registered")]
    AlreadyRegistered(Principal),
    #[error("{0} is not registered")]
    NotRegistered(Principal),
    #[error("the administrator cannot register or vote")]
    AdministratorCannotParticipate,
    #[error("the election address cannot register or vote")]
    ElectionAddressCannotParticipate,
    #[error("insufficient fee: paid {paid} wei, required {required} wei")]
    InsufficientFee { paid: u128, required: u128 },
    #[error("invalid vote: {0}")]
    InvalidProof(String),
    #[error("there are no proposals")]
    NoProposals,
    #[error("no votes have been cast")]
    NoVotesCast,
    #[error("the election is already in its final stage")]
    AlreadyFinal,
    #[error("proposal {id} does not exist ({count} proposals)")]
    InvalidProposalId { id: usize, count: usize },
    #[error("there are no collected fees to withdraw")]
    NothingToWithdraw,
    #[error("fee ledger: {0}")]
    FeeLedger(FeeError),
    #[error("arithmetic backend: {0}")]
    Arithmetic(ArithError),
}

impl ElectionError {
    /// Stable name of the error kind, eg. `"WrongStage"`.
    pub fn kind(&self) -> &'static str {
        self.into()
    }
}

impl From<ArithError> for ElectionError {
    fn from(value: ArithError) -> Self {
        match value {
            ArithError::InvalidProof(reason) => ElectionError::InvalidProof(reason),
            other => ElectionError::Arithmetic(other),
        }
    }
}

impl From<AclError> for ElectionError {
    fn from(value: AclError) -> Self {
        ElectionError::Arithmetic(ArithError::Access(value))
    }
}

impl From<FeeError> for ElectionError {
    fn from(value: FeeError) -> Self {
        match value {
            FeeError::InsufficientFee { paid, required } => {
                ElectionError::InsufficientFee { paid, required }
            }
            FeeError::NothingToWithdraw => ElectionError::NothingToWithdraw,
            other => ElectionError::FeeLedger(other),
        }
    }
}
