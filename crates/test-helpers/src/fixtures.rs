// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use veil_acl::Principal;
use veil_config::ElectionConfig;

/// 0.005 ETH in wei
pub const REGISTRATION_FEE: u128 = 5_000_000_000_000_000;

const OPERATOR_SEED: u64 = 0;

/// `n` principals derived from `seed`. Same seed, same principals.
pub fn principals(seed: u64, n: usize) -> Vec<Principal> {
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    (0..n).map(|_| Principal::random(&mut rng)).collect()
}

/// Configuration with a seeded administrator and election address.
pub fn test_config(num_proposals: usize, required_fee: u128) -> ElectionConfig {
    let operators = principals(OPERATOR_SEED, 2);
    ElectionConfig {
        name: "test-election".to_string(),
        administrator: operators[0],
        election_address: operators[1],
        required_fee,
        num_proposals,
        proposal_labels: vec![],
    }
}
