// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use anyhow::{bail, Result};
use tracing::subscriber::DefaultGuard;
use veil_events::{Event, Stage};
use veil_tally::ElectionError;
use veil_test_helpers::{ElectionHarness, REGISTRATION_FEE};

fn init_tracing() -> DefaultGuard {
    use tracing_subscriber::{fmt, EnvFilter};

    let subscriber = fmt()
        .with_env_filter(EnvFilter::new("info"))
        .with_test_writer()
        .finish();

    tracing::subscriber::set_default(subscriber)
}

fn election_error(err: &anyhow::Error) -> Result<&ElectionError> {
    let Some(e) = err.downcast_ref::<ElectionError>() else {
        bail!("election error expected, got {err}");
    };
    Ok(e)
}

/// Three proposals, three paying voters voting A, B, B. B wins.
#[actix::test]
async fn test_majority_wins_with_three_voters() -> Result<()> {
    let _guard = init_tracing();
    let mut election = ElectionHarness::with_proposals(3, REGISTRATION_FEE)?;

    let winner = election.run_round(&[0, 1, 1]).await?;
    assert_eq!(winner, 1);
    assert_eq!(election.decrypted_counts().await?, vec![1, 2, 0]);

    let summary = election.summary().await?;
    assert_eq!(summary.stage, Stage::Done);
    assert_eq!(summary.total_votes, 3);
    assert_eq!(summary.voter_count, 3);
    assert_eq!(summary.fee_balance, 3 * REGISTRATION_FEE);

    // 3 registrations, 2 stage changes, 3 votes, 1 reveal
    let events = election.take_events(9).await?;
    assert_eq!(events[8].event_type(), "WinnerAvailable");
    assert!(events.iter().all(|e| e.round() == Some(0)));
    assert!(election.failures().await?.is_empty());

    assert_eq!(election.withdraw().await?, 3 * REGISTRATION_FEE);
    let err = election.withdraw().await.unwrap_err();
    assert_eq!(election_error(&err)?, &ElectionError::NothingToWithdraw);
    Ok(())
}

#[actix::test]
async fn test_reveal_without_votes() -> Result<()> {
    let _guard = init_tracing();
    let election = ElectionHarness::with_proposals(3, REGISTRATION_FEE)?;
    let voters = election.voters(2);
    for voter in &voters {
        election.register(*voter).await?;
    }

    election.advance().await?;
    assert_eq!(election.advance().await?, Stage::Done);

    let err = election.reveal().await.unwrap_err();
    assert_eq!(election_error(&err)?, &ElectionError::NoVotesCast);
    assert_eq!(election.summary().await?.encrypted_winner_id, None);
    Ok(())
}

#[actix::test]
async fn test_remaining_quota_after_voting() -> Result<()> {
    let mut election = ElectionHarness::with_proposals(3, REGISTRATION_FEE)?;
    let voter = election.voters(1)[0];
    election.register(voter).await?;

    let quota = election.remaining_votes(voter).await?;
    assert_eq!(election.decrypt(quota).await?, 1);

    election.advance().await?;
    election.vote(voter, 1).await?;

    let quota = election.remaining_votes(voter).await?;
    assert_eq!(election.decrypt(quota).await?, 0);

    // the voter holds no grant on their own quota
    let refused = election.decrypt_as(quota, voter).await.unwrap_err();
    assert_eq!(election_error(&refused)?.kind(), "Arithmetic");
    Ok(())
}

#[actix::test]
async fn test_double_registration_changes_nothing() -> Result<()> {
    let election = ElectionHarness::with_proposals(3, REGISTRATION_FEE)?;
    let voter = election.voters(1)[0];
    election.register(voter).await?;
    let before = election.summary().await?;

    let err = election.register(voter).await.unwrap_err();
    assert_eq!(election_error(&err)?, &ElectionError::AlreadyRegistered(voter));
    assert_eq!(election.summary().await?, before);
    assert!(election.is_registered(voter).await?);

    let registered = election.take_events(2).await?;
    assert_eq!(registered[0].event_type(), "VoterRegistered");
    let failure = registered[1].as_failure().cloned();
    assert_eq!(
        failure.map(|f| (f.method, f.kind)),
        Some(("register".to_string(), "AlreadyRegistered".to_string()))
    );
    Ok(())
}

#[actix::test]
async fn test_administrator_cannot_participate() -> Result<()> {
    let mut election = ElectionHarness::with_proposals(3, REGISTRATION_FEE)?;
    let admin = election.admin();
    let voter = election.voters(1)[0];

    let err = election.register(admin).await.unwrap_err();
    assert_eq!(
        election_error(&err)?,
        &ElectionError::AdministratorCannotParticipate
    );

    let err = election
        .register(election.config.election_address)
        .await
        .unwrap_err();
    assert_eq!(
        election_error(&err)?,
        &ElectionError::ElectionAddressCannotParticipate
    );

    let err = election.advance_as(voter).await.unwrap_err();
    assert_eq!(
        election_error(&err)?,
        &ElectionError::NotAuthorized { caller: voter }
    );

    election.register(voter).await?;
    election.advance().await?;
    let err = election.vote(admin, 0).await.unwrap_err();
    assert_eq!(
        election_error(&err)?,
        &ElectionError::AdministratorCannotParticipate
    );

    let summary = election.summary().await?;
    assert_eq!(summary.stage, Stage::Vote);
    assert_eq!(summary.total_votes, 0);
    assert_eq!(summary.voter_count, 1);
    assert_eq!(election.failures().await?.len(), 4);
    Ok(())
}

#[actix::test]
async fn test_underpaid_and_overpaid_registration() -> Result<()> {
    let election = ElectionHarness::with_proposals(2, REGISTRATION_FEE)?;
    let voters = election.voters(2);

    let err = election
        .register_paying(voters[0], REGISTRATION_FEE - 1)
        .await
        .unwrap_err();
    assert_eq!(
        election_error(&err)?,
        &ElectionError::InsufficientFee {
            paid: REGISTRATION_FEE - 1,
            required: REGISTRATION_FEE
        }
    );
    assert!(!election.is_registered(voters[0]).await?);

    // the surplus is refunded, only the required fee is kept
    election
        .register_paying(voters[1], REGISTRATION_FEE * 2)
        .await?;
    assert_eq!(election.summary().await?.fee_balance, REGISTRATION_FEE);
    Ok(())
}

#[actix::test]
async fn test_forged_ballot_is_rejected() -> Result<()> {
    let mut election = ElectionHarness::with_proposals(2, REGISTRATION_FEE)?;
    let voters = election.voters(2);
    for voter in &voters {
        election.register(*voter).await?;
    }
    election.advance().await?;

    // a ballot sealed for one voter cannot be replayed by another
    let (ballot, proof) = election.seal(voters[0], 1)?;
    let err = election
        .submit(voters[1], ballot.clone(), proof.clone())
        .await
        .unwrap_err();
    assert_eq!(election_error(&err)?.kind(), "InvalidProof");
    assert_eq!(election.summary().await?.total_votes, 0);

    // the rightful owner can still use it, and the rejected voter may retry
    election.submit(voters[0], ballot, proof).await?;
    election.vote(voters[1], 1).await?;
    assert_eq!(election.summary().await?.total_votes, 2);
    Ok(())
}

#[actix::test]
async fn test_stage_gating() -> Result<()> {
    let mut election = ElectionHarness::with_proposals(2, REGISTRATION_FEE)?;
    let voters = election.voters(2);
    election.register(voters[0]).await?;

    let err = election.vote(voters[0], 0).await.unwrap_err();
    assert_eq!(election_error(&err)?.kind(), "WrongStage");
    let err = election.reveal().await.unwrap_err();
    assert_eq!(election_error(&err)?.kind(), "WrongStage");

    election.advance().await?;
    let err = election.register(voters[1]).await.unwrap_err();
    assert_eq!(election_error(&err)?.kind(), "WrongStage");
    let err = election.vote(voters[1], 0).await.unwrap_err();
    assert_eq!(election_error(&err)?, &ElectionError::NotRegistered(voters[1]));

    election.advance().await?;
    let err = election.advance().await.unwrap_err();
    assert_eq!(election_error(&err)?, &ElectionError::AlreadyFinal);
    Ok(())
}
