//! Ground recovery and crawl suppression for the attacked humanoid.
//!
//! The alive bonus is treated as a leak from a potential field: a state worth
//! potential `P` under gamma = 0.99 must be topped up by `(1 - 0.99) * P` each
//! tick. Standing is worth 200 (a 2.0 leak), lying on the ground 100 (1.0).
//! The robot stands up to collect the 100 point difference.

use crate::config::HarderConfig;

/// Alive bonus as a function of torso height: 1.0 on the ground, 2.0 standing.
pub fn potential_leak(z: f32) -> f32 {
    let standing = HarderConfig::STANDING_Z;
    z.clamp(0.0, standing) / standing + 1.0
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CrawlGuard {
    /// Grows while the robot is down, shrinks back while it is up
    pub on_ground_frame_counter: u32,
    crawl_start_potential: Option<f32>,
    crawl_ignored_potential: f32,
}

impl CrawlGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn update_ground_counter(&mut self, z: f32) {
        if z < HarderConfig::STANDING_Z {
            self.on_ground_frame_counter += 1;
        } else {
            self.on_ground_frame_counter = self.on_ground_frame_counter.saturating_sub(1);
        }
    }

    /// The leak while the robot may still get up, -1 once it has been down
    /// too long to bother simulating further.
    pub fn alive_bonus(&self, z: f32) -> f32 {
        if self.on_ground_frame_counter < HarderConfig::GIVE_UP_FRAMES {
            potential_leak(z)
        } else {
            -1.0
        }
    }

    /// Freeze flag-run progress while the robot is down so crawling towards
    /// the flag earns nothing, then resume from the frozen value once up.
    pub fn calc_potential(&mut self, flag_running_progress: f32, z: f32) -> f32 {
        let mut progress = flag_running_progress;
        if z < HarderConfig::STANDING_Z {
            let start = *self
                .crawl_start_potential
                .get_or_insert(progress - self.crawl_ignored_potential);
            self.crawl_ignored_potential = progress - start;
            progress = start;
        } else {
            progress -= self.crawl_ignored_potential;
            self.crawl_start_potential = None;
        }

        progress + potential_leak(z) * HarderConfig::LEAK_POTENTIAL
    }

    pub fn is_crawling(&self) -> bool {
        self.crawl_start_potential.is_some()
    }

    /// Progress made while down, excluded from the reported potential.
    pub fn crawl_ignored_potential(&self) -> f32 {
        self.crawl_ignored_potential
    }
}
