// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{
    AdvanceStage, CastVote, Decrypt, ElectionSummary, GetEncryptedProposalCount,
    GetEncryptedRemainingVotes, GetSummary, IsRegistered, Register, Reset, RevealWinner, Withdraw,
};
use actix::prelude::*;
use tracing::{info, instrument};
use veil_arith::{ConfidentialArithmetic, DecryptionOracle, EncU64};
use veil_events::{ElectionEvent, EventBus, Stage};
use veil_fees::FeeCollector;
use veil_tally::{Election, ElectionError};

/// Sequencer for a single election.
///
/// The actor mailbox gives every operation a place in one total order and each handler runs the
/// operation to completion before the next message is looked at. Whatever the operation produced
/// is published to the bus straight after it ran.
pub struct ElectionActor<B, F> {
    election: Election<B, F>,
    bus: Addr<EventBus<ElectionEvent>>,
}

impl<B, F> Actor for ElectionActor<B, F>
where
    B: ConfidentialArithmetic + Unpin + 'static,
    F: FeeCollector + Unpin + 'static,
{
    type Context = Context<Self>;
}

impl<B, F> ElectionActor<B, F>
where
    B: ConfidentialArithmetic + Unpin + 'static,
    F: FeeCollector + Unpin + 'static,
{
    pub fn new(election: Election<B, F>, bus: Addr<EventBus<ElectionEvent>>) -> Self {
        Self { election, bus }
    }

    pub fn attach(election: Election<B, F>, bus: &Addr<EventBus<ElectionEvent>>) -> Addr<Self> {
        let name = election.config().name.clone();
        let addr = Self::new(election, bus.clone()).start();
        info!(%name, "Election actor started");
        addr
    }

    fn publish(&mut self) {
        for event in self.election.take_events() {
            self.bus.do_send(event);
        }
    }
}

impl<B, F> Handler<Register> for ElectionActor<B, F>
where
    B: ConfidentialArithmetic + Unpin + 'static,
    F: FeeCollector + Unpin + 'static,
{
    type Result = Result<usize, ElectionError>;

    #[instrument(name = "register", skip_all)]
    fn handle(&mut self, msg: Register, _: &mut Self::Context) -> Self::Result {
        let result = self.election.register(msg.voter, msg.paid_fee);
        self.publish();
        result
    }
}

impl<B, F> Handler<CastVote> for ElectionActor<B, F>
where
    B: ConfidentialArithmetic + Unpin + 'static,
    F: FeeCollector + Unpin + 'static,
{
    type Result = Result<(), ElectionError>;

    #[instrument(name = "vote", skip_all)]
    fn handle(&mut self, msg: CastVote, _: &mut Self::Context) -> Self::Result {
        let result = self.election.vote(msg.voter, &msg.ballot, &msg.proof);
        self.publish();
        result
    }
}

impl<B, F> Handler<AdvanceStage> for ElectionActor<B, F>
where
    B: ConfidentialArithmetic + Unpin + 'static,
    F: FeeCollector + Unpin + 'static,
{
    type Result = Result<Stage, ElectionError>;

    #[instrument(name = "advance_stage", skip_all)]
    fn handle(&mut self, msg: AdvanceStage, _: &mut Self::Context) -> Self::Result {
        let result = self.election.advance_stage(msg.caller);
        self.publish();
        result
    }
}

impl<B, F> Handler<RevealWinner> for ElectionActor<B, F>
where
    B: ConfidentialArithmetic + Unpin + 'static,
    F: FeeCollector + Unpin + 'static,
{
    type Result = Result<EncU64, ElectionError>;

    #[instrument(name = "reveal_winner", skip_all)]
    fn handle(&mut self, msg: RevealWinner, _: &mut Self::Context) -> Self::Result {
        let result = self.election.reveal_winner(msg.caller);
        self.publish();
        result
    }
}

impl<B, F> Handler<Reset> for ElectionActor<B, F>
where
    B: ConfidentialArithmetic + Unpin + 'static,
    F: FeeCollector + Unpin + 'static,
{
    type Result = Result<(), ElectionError>;

    #[instrument(name = "reset", skip_all)]
    fn handle(&mut self, msg: Reset, _: &mut Self::Context) -> Self::Result {
        let result = self.election.reset(msg.caller, msg.num_proposals);
        self.publish();
        result
    }
}

impl<B, F> Handler<Withdraw> for ElectionActor<B, F>
where
    B: ConfidentialArithmetic + Unpin + 'static,
    F: FeeCollector + Unpin + 'static,
{
    type Result = Result<u128, ElectionError>;

    #[instrument(name = "withdraw", skip_all)]
    fn handle(&mut self, msg: Withdraw, _: &mut Self::Context) -> Self::Result {
        let result = self.election.withdraw(msg.caller);
        self.publish();
        result
    }
}

impl<B, F> Handler<GetEncryptedProposalCount> for ElectionActor<B, F>
where
    B: ConfidentialArithmetic + Unpin + 'static,
    F: FeeCollector + Unpin + 'static,
{
    type Result = Result<EncU64, ElectionError>;

    fn handle(&mut self, msg: GetEncryptedProposalCount, _: &mut Self::Context) -> Self::Result {
        self.election.encrypted_proposal_count(msg.id)
    }
}

impl<B, F> Handler<GetEncryptedRemainingVotes> for ElectionActor<B, F>
where
    B: ConfidentialArithmetic + Unpin + 'static,
    F: FeeCollector + Unpin + 'static,
{
    type Result = Result<EncU64, ElectionError>;

    fn handle(&mut self, msg: GetEncryptedRemainingVotes, _: &mut Self::Context) -> Self::Result {
        self.election.encrypted_remaining_votes(&msg.voter)
    }
}

impl<B, F> Handler<IsRegistered> for ElectionActor<B, F>
where
    B: ConfidentialArithmetic + Unpin + 'static,
    F: FeeCollector + Unpin + 'static,
{
    type Result = bool;

    fn handle(&mut self, msg: IsRegistered, _: &mut Self::Context) -> Self::Result {
        self.election.is_registered(&msg.voter)
    }
}

impl<B, F> Handler<GetSummary> for ElectionActor<B, F>
where
    B: ConfidentialArithmetic + Unpin + 'static,
    F: FeeCollector + Unpin + 'static,
{
    type Result = MessageResult<GetSummary>;

    fn handle(&mut self, _: GetSummary, _: &mut Self::Context) -> Self::Result {
        let election = &self.election;
        MessageResult(ElectionSummary {
            stage: election.stage(),
            round: election.round(),
            total_votes: election.total_votes(),
            voter_count: election.voter_count(),
            proposal_count: election.proposal_count(),
            encrypted_winner_id: election.encrypted_winner_id(),
            required_fee: election.required_fee(),
            fee_balance: election.fee_balance(),
        })
    }
}

impl<B, F> Handler<Decrypt> for ElectionActor<B, F>
where
    B: ConfidentialArithmetic + DecryptionOracle + Unpin + 'static,
    F: FeeCollector + Unpin + 'static,
{
    type Result = Result<u64, ElectionError>;

    #[instrument(name = "decrypt", skip_all)]
    fn handle(&mut self, msg: Decrypt, _: &mut Self::Context) -> Self::Result {
        Ok(self
            .election
            .backend()
            .decrypt_u64(self.election.acl(), &msg.value, &msg.requester)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;
    use std::time::Duration;
    use veil_acl::Principal;
    use veil_arith::{InputClient, InputContext, InputKey, MockArithmetic};
    use veil_config::ElectionConfig;
    use veil_events::{Event, GetEvents, HistoryCollector, TakeEvents};
    use veil_fees::FeeLedger;

    const FEE: u128 = 1_000;

    struct Setup {
        addr: Addr<ElectionActor<MockArithmetic, FeeLedger>>,
        history: Addr<HistoryCollector<ElectionEvent>>,
        client: InputClient,
        config: ElectionConfig,
    }

    fn voter(n: u8) -> Principal {
        Principal::new([n; 20])
    }

    fn setup(num_proposals: usize) -> Result<Setup> {
        let config = ElectionConfig {
            administrator: Principal::new([0xad; 20]),
            election_address: Principal::new([0xe1; 20]),
            required_fee: FEE,
            num_proposals,
            ..ElectionConfig::default()
        };
        let backend = MockArithmetic::new(InputKey::new([9; 32]));
        let client = backend.input_client();
        let election = Election::new(config.clone(), backend, FeeLedger::new())?;

        let bus = EventBus::<ElectionEvent>::default().start();
        let history = EventBus::history(&bus);
        let addr = ElectionActor::attach(election, &bus);
        Ok(Setup {
            addr,
            history,
            client,
            config,
        })
    }

    async fn vote(setup: &Setup, rng: &mut ChaCha20Rng, who: Principal, choice: u64) -> Result<()> {
        let context = InputContext {
            owner: who,
            target: setup.config.election_address,
        };
        let (ballot, proof) = setup.client.seal(rng, choice, &context)?;
        setup
            .addr
            .send(CastVote {
                voter: who,
                ballot,
                proof,
            })
            .await??;
        Ok(())
    }

    #[actix::test]
    async fn test_full_round_through_the_actor() -> Result<()> {
        let setup = setup(3)?;
        let admin = setup.config.administrator;
        let mut rng = ChaCha20Rng::seed_from_u64(42);

        for n in 1..=3 {
            setup
                .addr
                .send(Register {
                    voter: voter(n),
                    paid_fee: FEE,
                })
                .await??;
        }
        setup.addr.send(AdvanceStage { caller: admin }).await??;
        vote(&setup, &mut rng, voter(1), 0).await?;
        vote(&setup, &mut rng, voter(2), 1).await?;
        vote(&setup, &mut rng, voter(3), 1).await?;
        setup.addr.send(AdvanceStage { caller: admin }).await??;
        let winner = setup.addr.send(RevealWinner { caller: admin }).await??;

        let plain = setup
            .addr
            .send(Decrypt {
                value: winner,
                requester: admin,
            })
            .await??;
        assert_eq!(plain, 1);

        let summary = setup.addr.send(GetSummary).await?;
        assert_eq!(summary.stage, Stage::Done);
        assert_eq!(summary.total_votes, 3);
        assert_eq!(summary.voter_count, 3);
        assert_eq!(summary.fee_balance, 3 * FEE);
        assert_eq!(summary.encrypted_winner_id, Some(winner));

        let events = setup.history.send(TakeEvents::new(9)).await?;
        let types: Vec<String> = events.iter().map(|e| e.event_type()).collect();
        assert_eq!(
            types,
            vec![
                "VoterRegistered",
                "VoterRegistered",
                "VoterRegistered",
                "StageAdvanced",
                "VoteCast",
                "VoteCast",
                "VoteCast",
                "StageAdvanced",
                "WinnerAvailable",
            ]
        );
        Ok(())
    }

    #[actix::test]
    async fn test_rejections_publish_only_a_failure() -> Result<()> {
        let setup = setup(2)?;
        let admin = setup.config.administrator;

        let err = setup
            .addr
            .send(Register {
                voter: admin,
                paid_fee: FEE,
            })
            .await?;
        assert_eq!(err, Err(ElectionError::AdministratorCannotParticipate));

        let err = setup.addr.send(Withdraw { caller: admin }).await?;
        assert_eq!(err, Err(ElectionError::NothingToWithdraw));

        let events = setup.history.send(TakeEvents::new(2)).await?;
        assert!(events.iter().all(|e| e.as_failure().is_some()));
        assert_eq!(
            events[0].as_failure().map(|f| f.kind.as_str()),
            Some("AdministratorCannotParticipate")
        );
        assert!(!setup.addr.send(IsRegistered { voter: admin }).await?);
        Ok(())
    }

    #[actix::test]
    async fn test_queries_and_oracle_refusal() -> Result<()> {
        let setup = setup(2)?;
        let admin = setup.config.administrator;
        let mut rng = ChaCha20Rng::seed_from_u64(1);

        setup
            .addr
            .send(Register {
                voter: voter(1),
                paid_fee: FEE,
            })
            .await??;
        setup.addr.send(AdvanceStage { caller: admin }).await??;
        vote(&setup, &mut rng, voter(1), 1).await?;

        let quota = setup
            .addr
            .send(GetEncryptedRemainingVotes { voter: voter(1) })
            .await??;
        let count = setup
            .addr
            .send(GetEncryptedProposalCount { id: 1 })
            .await??;
        assert_eq!(
            setup
                .addr
                .send(Decrypt {
                    value: quota,
                    requester: admin
                })
                .await??,
            0
        );
        assert_eq!(
            setup
                .addr
                .send(Decrypt {
                    value: count,
                    requester: admin
                })
                .await??,
            1
        );

        // nobody but the grantees can decrypt
        let refused = setup
            .addr
            .send(Decrypt {
                value: count,
                requester: voter(1),
            })
            .await?;
        assert!(matches!(refused, Err(ElectionError::Arithmetic(_))));

        assert!(matches!(
            setup.addr.send(GetEncryptedProposalCount { id: 2 }).await?,
            Err(ElectionError::InvalidProposalId { id: 2, count: 2 })
        ));

        let events = setup.history.send(TakeEvents::new(3)).await?;
        assert_eq!(events[2].event_type(), "VoteCast");

        // queries do not publish anything
        tokio::time::sleep(Duration::from_millis(10)).await;
        let rest = setup.history.send(GetEvents::new()).await?;
        assert!(rest.is_empty());
        Ok(())
    }
}
