//! Full-state checkpoints for desync recovery and save/load.
//!
//! A checkpoint is the bincode encoding of [`MatchState`] plus a SHA-256
//! digest of those bytes. Restoring verifies the digest before decoding.

use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tactics_core::{MatchState, Phase};

use crate::api::{Result, RuntimeError};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub turn: u32,
    pub phase: Phase,
    /// Hex-encoded SHA-256 of `state`.
    pub digest: String,
    state: Vec<u8>,
}

fn digest_of(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Digest of the canonical encoding of `state`.
///
/// Two hosts holding the same state produce the same digest, so peers can
/// compare digests to detect a desync without shipping the whole state.
pub fn state_digest(state: &MatchState) -> Result<String> {
    let bytes = bincode::serialize(state).map_err(RuntimeError::Encode)?;
    Ok(digest_of(&bytes))
}

impl Checkpoint {
    pub fn capture(state: &MatchState) -> Result<Self> {
        let bytes = bincode::serialize(state).map_err(RuntimeError::Encode)?;
        Ok(Self {
            turn: state.turn_number(),
            phase: state.current_phase(),
            digest: digest_of(&bytes),
            state: bytes,
        })
    }

    /// Decodes the state after checking the digest.
    pub fn restore(&self) -> Result<MatchState> {
        let actual = digest_of(&self.state);
        if actual != self.digest {
            return Err(RuntimeError::DigestMismatch {
                expected: self.digest.clone(),
                actual,
            });
        }
        bincode::deserialize(&self.state).map_err(RuntimeError::Decode)
    }

    pub fn size_bytes(&self) -> usize {
        self.state.len()
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let bytes = bincode::serialize(self).map_err(RuntimeError::Encode)?;
        std::fs::write(path, bytes).map_err(|source| RuntimeError::Io {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|source| RuntimeError::Io {
            path: path.display().to_string(),
            source,
        })?;
        bincode::deserialize(&bytes).map_err(RuntimeError::Decode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tactics_core::{GridPosition, MatchConfig, PlayerId, Unit, UnitId};

    fn seeded() -> MatchState {
        let mut state = MatchState::new(MatchConfig::default());
        state
            .add_unit(Unit::new(UnitId(1), PlayerId::One, GridPosition::new(1, 1)))
            .unwrap();
        state
            .add_unit(Unit::new(UnitId(2), PlayerId::Two, GridPosition::new(5, 5)))
            .unwrap();
        state
    }

    #[test]
    fn restores_identical_state() {
        let state = seeded();
        let checkpoint = Checkpoint::capture(&state).unwrap();
        assert_eq!(checkpoint.restore().unwrap(), state);
        assert_eq!(checkpoint.digest, state_digest(&state).unwrap());
    }

    #[test]
    fn tampered_bytes_fail_digest_check() {
        let mut checkpoint = Checkpoint::capture(&seeded()).unwrap();
        let last = checkpoint.state.len() - 1;
        checkpoint.state[last] ^= 0xff;
        assert!(matches!(
            checkpoint.restore(),
            Err(RuntimeError::DigestMismatch { .. })
        ));
    }

    #[test]
    fn digest_tracks_state_changes() {
        let state = seeded();
        let mut moved = state.clone();
        moved.units.get_mut(UnitId(1)).unwrap().hp.current = 40;
        assert_ne!(state_digest(&state).unwrap(), state_digest(&moved).unwrap());
    }

    #[test]
    fn survives_a_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("turn-1.ckpt");
        let checkpoint = Checkpoint::capture(&seeded()).unwrap();
        checkpoint.save(&path).unwrap();
        assert_eq!(Checkpoint::load(&path).unwrap(), checkpoint);
    }
}
