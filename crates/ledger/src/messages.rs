// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use actix::Message;
use serde::{Deserialize, Serialize};
use veil_acl::Principal;
use veil_arith::{EncU64, ExternalCiphertext, InputProof};
use veil_events::Stage;
use veil_tally::ElectionError;

#[derive(Message, Clone, Debug)]
#[rtype(result = "Result<usize, ElectionError>")]
pub struct Register {
    pub voter: Principal,
    /// Payment attached to the registration, in wei
    pub paid_fee: u128,
}

#[derive(Message, Clone, Debug)]
#[rtype(result = "Result<(), ElectionError>")]
pub struct CastVote {
    pub voter: Principal,
    pub ballot: ExternalCiphertext,
    pub proof: InputProof,
}

#[derive(Message, Clone, Debug)]
#[rtype(result = "Result<Stage, ElectionError>")]
pub struct AdvanceStage {
    pub caller: Principal,
}

#[derive(Message, Clone, Debug)]
#[rtype(result = "Result<EncU64, ElectionError>")]
pub struct RevealWinner {
    pub caller: Principal,
}

#[derive(Message, Clone, Debug)]
#[rtype(result = "Result<(), ElectionError>")]
pub struct Reset {
    pub caller: Principal,
    pub num_proposals: usize,
}

#[derive(Message, Clone, Debug)]
#[rtype(result = "Result<u128, ElectionError>")]
pub struct Withdraw {
    pub caller: Principal,
}

#[derive(Message, Clone, Debug)]
#[rtype(result = "Result<EncU64, ElectionError>")]
pub struct GetEncryptedProposalCount {
    pub id: usize,
}

#[derive(Message, Clone, Debug)]
#[rtype(result = "Result<EncU64, ElectionError>")]
pub struct GetEncryptedRemainingVotes {
    pub voter: Principal,
}

#[derive(Message, Clone, Debug)]
#[rtype(result = "bool")]
pub struct IsRegistered {
    pub voter: Principal,
}

#[derive(Message, Clone, Debug)]
#[rtype(result = "ElectionSummary")]
pub struct GetSummary;

/// Public state of an election. Contains no plaintext derived from ballots.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectionSummary {
    pub stage: Stage,
    pub round: u64,
    pub total_votes: u64,
    pub voter_count: usize,
    pub proposal_count: usize,
    pub encrypted_winner_id: Option<EncU64>,
    pub required_fee: u128,
    pub fee_balance: u128,
}

/// Ask the decryption oracle for a plaintext on behalf of `requester`.
#[derive(Message, Clone, Debug)]
#[rtype(result = "Result<u64, ElectionError>")]
pub struct Decrypt {
    pub value: EncU64,
    pub requester: Principal,
}
