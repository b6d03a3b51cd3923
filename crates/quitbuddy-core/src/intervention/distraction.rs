//! Bubble-popping mini-game state.
//!
//! Positions are percentages of the play area: `x` across, `y` down from
//! the top. Bubbles spawn below the bottom edge and drift up until they
//! leave past the top, at which point they vanish without penalty.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::storage::DistractionConfig;

/// A bubble is gone once it rises past this line.
pub const TOP_EDGE: f64 = -10.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bubble {
    pub id: u64,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DistractionState {
    pub elapsed_secs: u32,
    pub score: u32,
    pub bubbles: Vec<Bubble>,
    #[serde(skip)]
    next_bubble_id: u64,
}

impl DistractionState {
    pub fn remaining_secs(&self, config: &DistractionConfig) -> u32 {
        config.duration_secs.saturating_sub(self.elapsed_secs)
    }

    /// Roll for a new bubble. Returns the spawned bubble, if any.
    pub fn maybe_spawn<R: Rng>(&mut self, rng: &mut R, config: &DistractionConfig) -> Option<&Bubble> {
        let p = if config.spawn_probability.is_finite() {
            config.spawn_probability.clamp(0.0, 1.0)
        } else {
            0.0
        };
        if !rng.gen_bool(p) {
            return None;
        }
        self.next_bubble_id += 1;
        self.bubbles.push(Bubble {
            id: self.next_bubble_id,
            x: rng.gen_range(10.0..90.0),
            y: 100.0 + rng.gen_range(0.0..20.0),
        });
        self.bubbles.last()
    }

    /// Drift every bubble up and drop those past the top edge.
    pub fn drift(&mut self, rise: f64) {
        for bubble in &mut self.bubbles {
            bubble.y -= rise;
        }
        self.bubbles.retain(|b| b.y > TOP_EDGE);
    }

    /// Remove a bubble and score it. False if no such bubble is live.
    pub fn pop(&mut self, id: u64) -> bool {
        let before = self.bubbles.len();
        self.bubbles.retain(|b| b.id != id);
        if self.bubbles.len() == before {
            return false;
        }
        self.score += 1;
        true
    }
}
