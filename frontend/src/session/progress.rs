//! Cosmetic progress simulation shown while a batch is processing.
//!
//! The percentage is not tied to the real transfer: it creeps up to
//! [`PROGRESS_CAP`] and waits there until the request settles.

/// Highest value the simulation reaches on its own.
pub const PROGRESS_CAP: f64 = 90.0;

/// Upper bound (exclusive) of the random jitter added per tick.
pub const MAX_JITTER: f64 = 2.0;

/// Batch size tier, drives tick speed, step and wording.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BatchTier {
    /// Up to 20 files
    Small,
    /// 21 to 50 files
    Medium,
    /// More than 50 files
    Large,
}

impl BatchTier {
    pub fn for_count(file_count: usize) -> Self {
        if file_count > 50 {
            BatchTier::Large
        } else if file_count > 20 {
            BatchTier::Medium
        } else {
            BatchTier::Small
        }
    }

    /// Interval between two ticks.
    pub fn tick_period_ms(&self) -> u64 {
        match self {
            BatchTier::Large => 100,
            BatchTier::Medium => 150,
            BatchTier::Small => 200,
        }
    }

    /// Base increment per tick, before jitter.
    pub fn step(&self) -> f64 {
        match self {
            BatchTier::Large => 0.5,
            BatchTier::Medium => 1.0,
            BatchTier::Small => 2.0,
        }
    }

    /// Text shown when the loading panel opens.
    pub fn loading_text(&self, file_count: usize) -> String {
        match self {
            BatchTier::Large => format!(
                "🚀 Processing {} images - This may take a few minutes...",
                file_count
            ),
            BatchTier::Medium => format!("⚡ Processing {} images in parallel...", file_count),
            BatchTier::Small => format!("⏳ Processing {} images...", file_count),
        }
    }
}

/// State of one simulation run.
#[derive(Clone, Debug, PartialEq)]
pub struct ProgressSimulation {
    file_count: usize,
    tier: BatchTier,
    percent: f64,
}

impl ProgressSimulation {
    pub fn new(file_count: usize) -> Self {
        Self {
            file_count,
            tier: BatchTier::for_count(file_count),
            percent: 0.0,
        }
    }

    pub fn tier(&self) -> BatchTier {
        self.tier
    }

    pub fn percent(&self) -> f64 {
        self.percent
    }

    /// Advance by one tick with the given jitter (clamped to `[0, MAX_JITTER)`).
    ///
    /// Returns `false` once the cap was already reached; the ticker should
    /// stop at that point.
    pub fn advance(&mut self, jitter: f64) -> bool {
        if self.percent >= PROGRESS_CAP {
            return false;
        }
        let jitter = jitter.clamp(0.0, MAX_JITTER);
        self.percent = (self.percent + self.tier.step() + jitter).min(PROGRESS_CAP);
        true
    }

    /// Per-tick status line, only used for the larger tiers.
    pub fn status_text(&self) -> Option<String> {
        match self.tier {
            BatchTier::Small => None,
            BatchTier::Medium | BatchTier::Large => Some(format!(
                "⏳ Processing {} images... {}%",
                self.file_count,
                self.percent.round() as u32
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tiers_follow_batch_size() {
        assert_eq!(BatchTier::for_count(1), BatchTier::Small);
        assert_eq!(BatchTier::for_count(20), BatchTier::Small);
        assert_eq!(BatchTier::for_count(21), BatchTier::Medium);
        assert_eq!(BatchTier::for_count(50), BatchTier::Medium);
        assert_eq!(BatchTier::for_count(51), BatchTier::Large);

        assert_eq!(BatchTier::Small.tick_period_ms(), 200);
        assert_eq!(BatchTier::Medium.tick_period_ms(), 150);
        assert_eq!(BatchTier::Large.tick_period_ms(), 100);
    }

    #[test]
    fn test_twenty_five_files_scenario() {
        let mut sim = ProgressSimulation::new(25);
        assert_eq!(sim.tier().tick_period_ms(), 150);
        assert!(sim.tier().loading_text(25).contains("25 images in parallel"));

        assert!(sim.advance(0.0));
        assert_eq!(sim.percent(), 1.0);
        assert!(sim.advance(1.5));
        assert_eq!(sim.percent(), 3.5);
        assert_eq!(sim.status_text().unwrap(), "⏳ Processing 25 images... 4%");
    }

    #[test]
    fn test_caps_at_ninety_then_stops() {
        let mut sim = ProgressSimulation::new(3);
        let mut ticks = 0;
        while sim.advance(1.9) {
            ticks += 1;
            assert!(sim.percent() <= PROGRESS_CAP);
            assert!(ticks < 100, "simulation never stopped");
        }
        assert_eq!(sim.percent(), PROGRESS_CAP);
        assert!(!sim.advance(1.0));
        assert_eq!(sim.percent(), PROGRESS_CAP);
    }

    #[test]
    fn test_jitter_is_clamped() {
        let mut sim = ProgressSimulation::new(60);
        sim.advance(50.0);
        assert_eq!(sim.percent(), 0.5 + MAX_JITTER);
        sim.advance(-3.0);
        assert_eq!(sim.percent(), 1.0 + MAX_JITTER);
    }

    #[test]
    fn test_small_batches_have_no_status_line() {
        let mut sim = ProgressSimulation::new(4);
        sim.advance(0.3);
        assert!(sim.status_text().is_none());
        assert!(BatchTier::Large.loading_text(80).contains("few minutes"));
    }
}
