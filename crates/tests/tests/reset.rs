// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use anyhow::{bail, Result};
use veil_events::{ElectionEventData, Event, Stage};
use veil_tally::ElectionError;
use veil_test_helpers::{ElectionHarness, REGISTRATION_FEE};

#[actix::test]
async fn test_reset_behaves_like_a_fresh_deployment() -> Result<()> {
    let choices = [3, 1, 3, 0, 3];

    let mut reused = ElectionHarness::with_proposals(2, REGISTRATION_FEE)?;
    reused.run_round(&[0, 1, 1]).await?;
    reused.clear_history().await?;
    reused.reset(4).await?;

    let announced = reused.take_events(1).await?;
    assert_eq!(announced[0].event_type(), "ElectionReset");
    assert_eq!(announced[0].round(), Some(1));

    let summary = reused.summary().await?;
    assert_eq!(summary.stage, Stage::Registration);
    assert_eq!(summary.round, 1);
    assert_eq!(summary.total_votes, 0);
    assert_eq!(summary.voter_count, 0);
    assert_eq!(summary.proposal_count, 4);
    assert_eq!(summary.encrypted_winner_id, None);
    // fees belong to the deployment, not the round
    assert_eq!(summary.fee_balance, 3 * REGISTRATION_FEE);

    let mut fresh = ElectionHarness::with_proposals(4, REGISTRATION_FEE)?;

    // the same principals may register again after a reset
    let reused_winner = reused.run_round(&choices).await?;
    let fresh_winner = fresh.run_round(&choices).await?;
    assert_eq!(reused_winner, 3);
    assert_eq!(reused_winner, fresh_winner);
    assert_eq!(
        reused.decrypted_counts().await?,
        fresh.decrypted_counts().await?
    );

    let (reused, fresh) = (reused.summary().await?, fresh.summary().await?);
    assert_eq!(reused.stage, fresh.stage);
    assert_eq!(reused.total_votes, fresh.total_votes);
    assert_eq!(reused.voter_count, fresh.voter_count);
    Ok(())
}

#[actix::test]
async fn test_reset_is_admin_only_and_announced() -> Result<()> {
    let election = ElectionHarness::with_proposals(2, REGISTRATION_FEE)?;
    let voter = election.voters(1)[0];
    election.register(voter).await?;
    election.advance().await?;

    let err = election
        .addr
        .send(veil_ledger::Reset {
            caller: voter,
            num_proposals: 2,
        })
        .await?
        .unwrap_err();
    assert_eq!(err, ElectionError::NotAuthorized { caller: voter });
    assert_eq!(election.summary().await?.stage, Stage::Vote);

    // callable mid round
    election.reset(3).await?;
    assert!(!election.is_registered(voter).await?);

    let events = election.take_events(4).await?;
    let ElectionEventData::ElectionReset(reset) = events[3].get_data() else {
        bail!("reset announcement expected, got {}", events[3]);
    };
    assert_eq!((reset.round, reset.num_proposals), (1, 3));
    Ok(())
}

#[actix::test]
async fn test_reset_to_zero_proposals() -> Result<()> {
    let mut election = ElectionHarness::with_proposals(2, REGISTRATION_FEE)?;
    election.reset(0).await?;

    let voter = election.voters(1)[0];
    election.register(voter).await?;
    election.advance().await?;
    election.vote(voter, 0).await?;
    election.advance().await?;

    let err = election.reveal().await.unwrap_err();
    assert_eq!(
        err.downcast_ref::<ElectionError>(),
        Some(&ElectionError::NoProposals)
    );
    Ok(())
}
