// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use anyhow::Result;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use veil_test_helpers::ElectionHarness;

const FEE: u128 = 1_000;

/// Plaintext reference: counts per proposal and the first proposal holding the maximum.
fn expected(num_proposals: usize, choices: &[u64]) -> (Vec<u64>, u64) {
    let mut counts = vec![0u64; num_proposals];
    for choice in choices {
        if let Some(count) = counts.get_mut(*choice as usize) {
            *count += 1;
        }
    }
    let mut best = 0;
    for (id, count) in counts.iter().enumerate() {
        if *count > counts[best] {
            best = id;
        }
    }
    (counts, best as u64)
}

#[actix::test]
async fn test_random_rounds_match_plaintext_tally() -> Result<()> {
    let mut rng = ChaCha20Rng::seed_from_u64(7);

    for _ in 0..8 {
        let num_proposals = rng.gen_range(1..=4);
        let num_voters = rng.gen_range(1..=6);
        // choices past the last proposal are valid ballots that count for nothing
        let choices: Vec<u64> = (0..num_voters)
            .map(|_| rng.gen_range(0..=num_proposals as u64))
            .collect();

        let mut election = ElectionHarness::with_proposals(num_proposals, FEE)?;
        let winner = election.run_round(&choices).await?;
        let counts = election.decrypted_counts().await?;
        let summary = election.summary().await?;

        let (expected_counts, expected_winner) = expected(num_proposals, &choices);
        assert_eq!(counts, expected_counts, "choices {:?}", choices);
        assert_eq!(winner, expected_winner, "choices {:?}", choices);
        assert_eq!(summary.total_votes, choices.len() as u64);
        assert!(counts.iter().sum::<u64>() <= summary.total_votes);
    }
    Ok(())
}

#[actix::test]
async fn test_ties_go_to_the_lowest_index() -> Result<()> {
    let mut election = ElectionHarness::with_proposals(3, FEE)?;
    assert_eq!(election.run_round(&[2, 1, 2, 1]).await?, 1);

    let mut election = ElectionHarness::with_proposals(3, FEE)?;
    assert_eq!(election.run_round(&[2, 0]).await?, 0);
    Ok(())
}

#[actix::test]
async fn test_reveal_is_deterministic() -> Result<()> {
    let mut election = ElectionHarness::with_proposals(3, FEE)?;
    let first = election.run_round(&[0, 2, 2]).await?;

    let again = election.reveal().await?;
    assert_eq!(election.decrypt(again).await?, first);
    assert_eq!(election.summary().await?.encrypted_winner_id, Some(again));
    Ok(())
}

#[actix::test]
async fn test_second_vote_spends_nothing() -> Result<()> {
    let mut election = ElectionHarness::with_proposals(2, FEE)?;
    let voter = election.voters(1)[0];
    election.register(voter).await?;
    election.advance().await?;

    election.vote(voter, 0).await?;
    // accepted, counted as an operation, but the tally does not move
    election.vote(voter, 1).await?;
    election.vote(voter, 1).await?;

    let quota = election.remaining_votes(voter).await?;
    assert_eq!(election.decrypt(quota).await?, 0);
    assert_eq!(election.decrypted_counts().await?, vec![1, 0]);
    assert_eq!(election.summary().await?.total_votes, 3);
    Ok(())
}
