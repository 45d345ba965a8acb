//! Round to epoch arithmetic.
//!
//! An epoch is a contiguous range of consensus rounds. The schedule is fixed
//! at startup: `rounds_per_epoch` rounds per epoch, counted from
//! `start_round`.

use serde::{Deserialize, Serialize};
use shardnode_types::{Epoch, Round};

use crate::{EpochError, EpochResult};

/// Rounds per epoch when nothing is configured (~1 day at 6s rounds)
pub const DEFAULT_ROUNDS_PER_EPOCH: u64 = 14400;

/// Minimum epoch length to prevent too frequent transitions
pub const MIN_ROUNDS_PER_EPOCH: u64 = 10;

/// Maximum epoch length
pub const MAX_ROUNDS_PER_EPOCH: u64 = 1_000_000;

/// Maps rounds onto epochs.
///
/// Deserialization goes through [`RoundSchedule::new`], so an out of range
/// length is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSchedule")]
pub struct RoundSchedule {
    rounds_per_epoch: u64,
    start_round: Round,
}

/// Unchecked wire form of [`RoundSchedule`]
#[derive(Deserialize)]
struct RawSchedule {
    rounds_per_epoch: u64,
    start_round: Round,
}

impl TryFrom<RawSchedule> for RoundSchedule {
    type Error = EpochError;

    fn try_from(raw: RawSchedule) -> EpochResult<Self> {
        Self::new(raw.rounds_per_epoch, raw.start_round)
    }
}

impl RoundSchedule {
    /// Creates a new schedule
    ///
    /// # Arguments
    ///
    /// * `rounds_per_epoch` - Number of rounds per epoch
    /// * `start_round` - First round of epoch 0
    pub fn new(rounds_per_epoch: u64, start_round: Round) -> EpochResult<Self> {
        if !(MIN_ROUNDS_PER_EPOCH..=MAX_ROUNDS_PER_EPOCH).contains(&rounds_per_epoch) {
            return Err(EpochError::InvalidRoundsPerEpoch {
                length: rounds_per_epoch,
                min: MIN_ROUNDS_PER_EPOCH,
                max: MAX_ROUNDS_PER_EPOCH,
            });
        }
        Ok(Self {
            rounds_per_epoch,
            start_round,
        })
    }

    /// Returns the number of rounds per epoch
    #[inline]
    pub fn rounds_per_epoch(&self) -> u64 {
        self.rounds_per_epoch
    }

    /// Returns the first round of epoch 0
    #[inline]
    pub fn start_round(&self) -> Round {
        self.start_round
    }

    /// Epoch containing `round`. Rounds before the start belong to epoch 0;
    /// epochs past `u32::MAX` saturate.
    pub fn epoch_for_round(&self, round: Round) -> Epoch {
        let elapsed = round.saturating_sub(self.start_round);
        Epoch::try_from(elapsed / self.rounds_per_epoch).unwrap_or(Epoch::MAX)
    }

    /// First round of `epoch`
    pub fn first_round_of(&self, epoch: Epoch) -> Round {
        self.start_round
            .saturating_add(u64::from(epoch).saturating_mul(self.rounds_per_epoch))
    }

    /// True if `round` is the first round of an epoch
    pub fn is_epoch_start(&self, round: Round) -> bool {
        round >= self.start_round && (round - self.start_round) % self.rounds_per_epoch == 0
    }
}

impl Default for RoundSchedule {
    fn default() -> Self {
        Self {
            rounds_per_epoch: DEFAULT_ROUNDS_PER_EPOCH,
            start_round: 0,
        }
    }
}
