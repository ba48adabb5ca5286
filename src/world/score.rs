use serde::{Deserialize, Serialize};

/// Bookkeeping for one episode. `ticks` doubles as the world's clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Score {
    pub lives: u32,
    pub score: u32,
    pub shots_fired: u32,
    pub shots_hit: u32,
    pub ticks: u64,
}

impl Score {
    pub fn new(lives: u32) -> Self {
        Self {
            lives,
            ..Self::default()
        }
    }

    /// Fraction of fired shots who hit something, or 0 if nothing was fired
    pub fn accuracy(&self) -> f64 {
        if self.shots_fired > 0 {
            self.shots_hit as f64 / self.shots_fired as f64
        } else {
            0.
        }
    }

    /// Points scored, plus ticks survived, plus accuracy so that spraying bullets without aiming
    /// is never free
    pub fn fitness(&self) -> f64 {
        self.score as f64 + self.ticks as f64 + self.accuracy()
    }
}
