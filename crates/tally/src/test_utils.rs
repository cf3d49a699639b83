// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::Election;
use anyhow::Result;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use veil_acl::Principal;
use veil_arith::{
    DecryptionOracle, EncU64, ExternalCiphertext, InputContext, InputKey, InputProof,
    MockArithmetic,
};
use veil_config::ElectionConfig;
use veil_fees::FeeLedger;

pub type TestElection = Election<MockArithmetic, FeeLedger>;

pub const FEE: u128 = 5_000_000_000_000_000;

pub fn admin() -> Principal {
    Principal::new([0xad; 20])
}

pub fn voter(n: u8) -> Principal {
    Principal::new([n; 20])
}

pub fn deploy(num_proposals: usize) -> Result<TestElection> {
    let config = ElectionConfig {
        name: "test".to_string(),
        administrator: admin(),
        election_address: Principal::new([0xe1; 20]),
        required_fee: FEE,
        num_proposals,
        proposal_labels: vec![],
    };
    let backend = MockArithmetic::new(InputKey::new([3; 32]));
    Ok(Election::new(config, backend, FeeLedger::new())?)
}

/// Deploy, register `voters` and open the vote stage.
pub fn open_voting(num_proposals: usize, voters: &[Principal]) -> Result<TestElection> {
    let mut election = deploy(num_proposals)?;
    for voter in voters {
        election.register(*voter, FEE)?;
    }
    election.advance_stage(admin())?;
    election.take_events();
    Ok(election)
}

pub fn sealed_vote(
    election: &TestElection,
    rng: &mut ChaCha20Rng,
    voter: Principal,
    choice: u64,
) -> Result<(ExternalCiphertext, InputProof)> {
    let context = InputContext {
        owner: voter,
        target: election.election_address(),
    };
    Ok(election
        .backend()
        .input_client()
        .seal(rng, choice, &context)?)
}

pub fn cast_all(
    election: &mut TestElection,
    voters: &[Principal],
    choices: &[u64],
    seed: u64,
) -> Result<()> {
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    for (voter, choice) in voters.iter().zip(choices) {
        let (ballot, proof) = sealed_vote(election, &mut rng, *voter, *choice)?;
        election.vote(*voter, &ballot, &proof)?;
    }
    Ok(())
}

/// Decrypt as the administrator through the oracle.
pub fn decrypt(election: &TestElection, value: &EncU64) -> Result<u64> {
    Ok(election
        .backend()
        .decrypt_u64(election.acl(), value, &admin())?)
}
