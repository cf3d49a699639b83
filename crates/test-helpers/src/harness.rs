// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{principals, test_config};
use actix::{Actor, Addr};
use anyhow::Result;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use std::time::Duration;
use tracing::info;
use veil_acl::Principal;
use veil_arith::{
    EncU64, ExternalCiphertext, InputClient, InputContext, InputKey, InputProof, MockArithmetic,
};
use veil_config::ElectionConfig;
use veil_events::{
    ClearHistory, ElectionEvent, EventBus, GetEvents, HistoryCollector, Stage, TakeEvents,
};
use veil_fees::FeeLedger;
use veil_ledger::{
    AdvanceStage, CastVote, Decrypt, ElectionActor, ElectionSummary, GetEncryptedProposalCount,
    GetEncryptedRemainingVotes, GetSummary, IsRegistered, Register, Reset, RevealWinner, Withdraw,
};
use veil_logger::SimpleLogger;
use veil_tally::Election;

pub type MockElectionActor = ElectionActor<MockArithmetic, FeeLedger>;

/// A running election wired the way a deployment would be: the actor, its bus, a logger and
/// collectors for everything published and for failures only.
///
/// Every call goes through the actor mailbox. Rejections come back as `anyhow` errors wrapping
/// [`veil_tally::ElectionError`], so tests can `downcast_ref` them.
pub struct ElectionHarness {
    pub addr: Addr<MockElectionActor>,
    pub bus: Addr<EventBus<ElectionEvent>>,
    pub history: Addr<HistoryCollector<ElectionEvent>>,
    pub errors: Addr<HistoryCollector<ElectionEvent>>,
    pub config: ElectionConfig,
    client: InputClient,
    rng: ChaCha20Rng,
}

impl ElectionHarness {
    pub fn new(config: ElectionConfig, seed: u64) -> Result<Self> {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let backend = MockArithmetic::new(InputKey::generate(&mut rng));
        let client = backend.input_client();
        let election = Election::new(config.clone(), backend, FeeLedger::new())?;

        let bus = EventBus::<ElectionEvent>::default().start();
        let history = EventBus::history(&bus);
        let errors = EventBus::<ElectionEvent>::error(&bus);
        SimpleLogger::<ElectionEvent>::attach(&config.name, bus.clone());
        let addr = ElectionActor::attach(election, &bus);

        Ok(Self {
            addr,
            bus,
            history,
            errors,
            config,
            client,
            rng,
        })
    }

    pub fn with_proposals(num_proposals: usize, required_fee: u128) -> Result<Self> {
        Self::new(test_config(num_proposals, required_fee), 42)
    }

    pub fn admin(&self) -> Principal {
        self.config.administrator
    }

    /// Seeded voters that never collide with the administrator.
    pub fn voters(&self, n: usize) -> Vec<Principal> {
        principals(1_000, n)
    }

    pub async fn register(&self, voter: Principal) -> Result<usize> {
        self.register_paying(voter, self.config.required_fee).await
    }

    pub async fn register_paying(&self, voter: Principal, paid_fee: u128) -> Result<usize> {
        Ok(self.addr.send(Register { voter, paid_fee }).await??)
    }

    /// Encrypt `choice` for this election on behalf of `voter`.
    pub fn seal(
        &mut self,
        voter: Principal,
        choice: u64,
    ) -> Result<(ExternalCiphertext, InputProof)> {
        let context = InputContext {
            owner: voter,
            target: self.config.election_address,
        };
        Ok(self.client.seal(&mut self.rng, choice, &context)?)
    }

    pub async fn vote(&mut self, voter: Principal, choice: u64) -> Result<()> {
        let (ballot, proof) = self.seal(voter, choice)?;
        self.submit(voter, ballot, proof).await
    }

    pub async fn submit(
        &self,
        voter: Principal,
        ballot: ExternalCiphertext,
        proof: InputProof,
    ) -> Result<()> {
        Ok(self
            .addr
            .send(CastVote {
                voter,
                ballot,
                proof,
            })
            .await??)
    }

    pub async fn advance_as(&self, caller: Principal) -> Result<Stage> {
        Ok(self.addr.send(AdvanceStage { caller }).await??)
    }

    pub async fn advance(&self) -> Result<Stage> {
        self.advance_as(self.admin()).await
    }

    pub async fn reveal(&self) -> Result<EncU64> {
        Ok(self
            .addr
            .send(RevealWinner {
                caller: self.admin(),
            })
            .await??)
    }

    pub async fn reset(&self, num_proposals: usize) -> Result<()> {
        Ok(self
            .addr
            .send(Reset {
                caller: self.admin(),
                num_proposals,
            })
            .await??)
    }

    pub async fn withdraw(&self) -> Result<u128> {
        Ok(self
            .addr
            .send(Withdraw {
                caller: self.admin(),
            })
            .await??)
    }

    pub async fn is_registered(&self, voter: Principal) -> Result<bool> {
        Ok(self.addr.send(IsRegistered { voter }).await?)
    }

    pub async fn summary(&self) -> Result<ElectionSummary> {
        Ok(self.addr.send(GetSummary).await?)
    }

    /// Ask the oracle to open `value` as the administrator.
    pub async fn decrypt(&self, value: EncU64) -> Result<u64> {
        self.decrypt_as(value, self.admin()).await
    }

    pub async fn decrypt_as(&self, value: EncU64, requester: Principal) -> Result<u64> {
        Ok(self.addr.send(Decrypt { value, requester }).await??)
    }

    pub async fn proposal_count(&self, id: usize) -> Result<EncU64> {
        Ok(self.addr.send(GetEncryptedProposalCount { id }).await??)
    }

    pub async fn remaining_votes(&self, voter: Principal) -> Result<EncU64> {
        Ok(self.addr.send(GetEncryptedRemainingVotes { voter }).await??)
    }

    /// Plaintext tally of every proposal, in proposal order.
    pub async fn decrypted_counts(&self) -> Result<Vec<u64>> {
        let summary = self.summary().await?;
        let mut counts = Vec::with_capacity(summary.proposal_count);
        for id in 0..summary.proposal_count {
            counts.push(self.decrypt(self.proposal_count(id).await?).await?);
        }
        Ok(counts)
    }

    /// Register one fresh voter per choice, vote, close the round and return the decrypted
    /// winner. Expects the election to be in registration.
    pub async fn run_round(&mut self, choices: &[u64]) -> Result<u64> {
        let voters = self.voters(choices.len());
        for voter in &voters {
            self.register(*voter).await?;
        }
        self.advance().await?;
        for (voter, choice) in voters.iter().zip(choices) {
            self.vote(*voter, *choice).await?;
        }
        self.advance().await?;
        let winner = self.reveal().await?;
        let winner = self.decrypt(winner).await?;
        info!(winner, votes = choices.len(), "round complete");
        Ok(winner)
    }

    /// Wait for exactly `n` published events and drain them.
    pub async fn take_events(&self, n: usize) -> Result<Vec<ElectionEvent>> {
        Ok(self.history.send(TakeEvents::new(n)).await?)
    }

    /// Drop everything collected so far, eg. between rounds.
    pub async fn clear_history(&self) -> Result<()> {
        // let in-flight events land before clearing
        actix::clock::sleep(Duration::from_millis(10)).await;
        self.history.send(ClearHistory).await?;
        self.errors.send(ClearHistory).await?;
        Ok(())
    }

    /// Failures published so far.
    pub async fn failures(&self) -> Result<Vec<ElectionEvent>> {
        // give the bus a moment to forward
        actix::clock::sleep(Duration::from_millis(10)).await;
        Ok(self.errors.send(GetEvents::new()).await?)
    }
}
