//! Seed sources and the small, fast generator every world draws from.
//!
//! A world owns its own [WyRng], so a world built from the same seed replays the same episode.

use core::cmp::min;
use rand::RngCore;
use std::{
    fs::File,
    io::{self, Read},
};

/// wyrand: one multiply per draw, and plenty for asteroid placement and jitter
#[derive(Debug, Clone)]
pub struct WyRng {
    state: u64,
}

impl WyRng {
    pub fn seeded(state: u64) -> Self {
        Self { state }
    }
}

impl RngCore for WyRng {
    fn next_u32(&mut self) -> u32 {
        self.next_u64() as u32
    }

    fn next_u64(&mut self) -> u64 {
        const WY_CONST_0: u64 = 0x2d35_8dcc_aa6c_78a5;
        const WY_CONST_1: u64 = 0x8bb8_4b93_962e_acc9;
        self.state = self.state.wrapping_add(WY_CONST_0);
        let t = u128::from(self.state) * u128::from(self.state ^ WY_CONST_1);
        (t as u64) ^ (t >> 64) as u64
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        let mut idx = 0;
        while idx < dst.len() {
            let lim = min(8, dst.len() - idx);
            dst[idx..idx + lim].copy_from_slice(&self.next_u64().to_ne_bytes()[..lim]);
            idx += lim;
        }
    }
}

pub fn seed_urandom() -> io::Result<u64> {
    let mut file = File::open("/dev/urandom")?;
    let mut buffer = [0u8; 8];
    file.read_exact(&mut buffer)?;
    Ok(u64::from_le_bytes(buffer))
}

/// A stream of per-episode seeds. Seeded streams hand out the same seeds in the same order,
/// unseeded ones start from `/dev/urandom`.
#[derive(Debug, Clone)]
pub struct SeedStream(WyRng);

impl SeedStream {
    pub fn new(seed: Option<u64>) -> io::Result<Self> {
        Ok(Self(WyRng::seeded(match seed {
            Some(seed) => seed,
            None => seed_urandom()?,
        })))
    }

    pub fn next_seed(&mut self) -> u64 {
        self.0.next_u64()
    }
}
