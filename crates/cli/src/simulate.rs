// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use actix::Actor;
use anyhow::Result;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use tracing::{info, instrument};
use veil_acl::Principal;
use veil_arith::{InputContext, InputKey, MockArithmetic};
use veil_config::ElectionConfig;
use veil_events::{ElectionEvent, EventBus};
use veil_fees::FeeLedger;
use veil_ledger::{
    AdvanceStage, CastVote, Decrypt, ElectionActor, GetEncryptedProposalCount, GetSummary,
    Register, RevealWinner,
};
use veil_logger::SimpleLogger;
use veil_tally::Election;

/// Drive a full round through the election actor: register one voter per ballot, vote, close,
/// reveal, then decrypt as the administrator.
#[instrument(name = "simulate", skip_all)]
pub async fn execute(config: ElectionConfig, votes: Vec<u64>, seed: u64) -> Result<()> {
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    let backend = MockArithmetic::new(InputKey::generate(&mut rng));
    let client = backend.input_client();
    let admin = config.administrator;
    let required_fee = config.required_fee;
    let election_address = config.election_address;

    let bus = EventBus::<ElectionEvent>::default().start();
    SimpleLogger::<ElectionEvent>::attach(&config.name, bus.clone());
    let election = Election::new(config.clone(), backend, FeeLedger::new())?;
    let addr = ElectionActor::attach(election, &bus);

    let voters: Vec<Principal> = votes.iter().map(|_| Principal::random(&mut rng)).collect();
    for voter in &voters {
        addr.send(Register {
            voter: *voter,
            paid_fee: required_fee,
        })
        .await??;
    }

    addr.send(AdvanceStage { caller: admin }).await??;
    for (voter, choice) in voters.iter().zip(&votes) {
        let context = InputContext {
            owner: *voter,
            target: election_address,
        };
        let (ballot, proof) = client.seal(&mut rng, *choice, &context)?;
        addr.send(CastVote {
            voter: *voter,
            ballot,
            proof,
        })
        .await??;
    }
    addr.send(AdvanceStage { caller: admin }).await??;

    let winner = addr.send(RevealWinner { caller: admin }).await??;
    let winner = addr
        .send(Decrypt {
            value: winner,
            requester: admin,
        })
        .await??;

    let summary = addr.send(GetSummary).await?;
    info!(total_votes = summary.total_votes, "round closed");

    for id in 0..summary.proposal_count {
        let count = addr.send(GetEncryptedProposalCount { id }).await??;
        let count = addr
            .send(Decrypt {
                value: count,
                requester: admin,
            })
            .await??;
        println!("{:>12}  {}", config.proposal_label(id), count);
    }
    println!(
        "winner: {} ({} votes, {} wei collected)",
        config.proposal_label(winner as usize),
        summary.total_votes,
        summary.fee_balance
    );

    Ok(())
}
