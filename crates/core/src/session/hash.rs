//! Stable snapshot hashing for deterministic verification.
//! It does not hash the event log or the navigator's caches.

use std::hash::Hasher;

use xxhash_rust::xxh3::Xxh3;

use super::*;

impl Session {
    pub fn snapshot_hash(&self) -> u64 {
        let mut hasher = Xxh3::new();
        hasher.write_u64(self.seed);
        hasher.write_u64(self.steps);
        hasher.write_u32(self.score);
        hasher.write_u32(self.resets);
        hasher.write_u8(self.navigator.mode() as u8);

        hasher.write_u64(self.body.target_len() as u64);
        hasher.write_u64(self.body.len() as u64);
        for cell in self.body.cells() {
            hasher.write_i32(cell.col);
            hasher.write_i32(cell.row);
        }
        match self.target {
            Some(target) => {
                hasher.write_u8(1);
                hasher.write_i32(target.col);
                hasher.write_i32(target.row);
            }
            None => hasher.write_u8(0),
        }
        hasher.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_tracks_state_changes() {
        let mut session = Session::new(21, EngineConfig::default()).expect("session");
        let start = session.snapshot_hash();
        assert_eq!(start, session.snapshot_hash());
        session.advance(1).expect("advance");
        assert_ne!(start, session.snapshot_hash());
    }

    #[test]
    fn different_seeds_hash_differently() {
        let a = Session::new(1, EngineConfig::default()).expect("session");
        let b = Session::new(2, EngineConfig::default()).expect("session");
        assert_ne!(a.snapshot_hash(), b.snapshot_hash());
    }
}
