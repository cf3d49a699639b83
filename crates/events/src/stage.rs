// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// Coarse phase of an election round. Stages only ever move forward; the single way back is a
/// full reset of the round.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, EnumIter,
)]
pub enum Stage {
    Registration,
    Vote,
    Done,
}

impl Stage {
    /// The stage that follows this one, or `None` when the stage is final.
    pub fn next(self) -> Option<Stage> {
        match self {
            Stage::Registration => Some(Stage::Vote),
            Stage::Vote => Some(Stage::Done),
            Stage::Done => None,
        }
    }

    pub fn is_final(self) -> bool {
        self.next().is_none()
    }
}

impl Default for Stage {
    fn default() -> Self {
        Stage::Registration
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_stages_only_move_forward() {
        for stage in Stage::iter() {
            if let Some(next) = stage.next() {
                assert!(next > stage);
            }
        }
        assert_eq!(Stage::iter().filter(|s| s.is_final()).count(), 1);
        assert_eq!(Stage::default(), Stage::Registration);
    }
}
