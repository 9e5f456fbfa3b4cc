//! Data-driven game balance
//!
//! Every constant the simulation reads lives here so runs can be re-balanced
//! from a JSON file without touching the core. The simulation only ever sees
//! a [`Tuning`] that went through [`Tuning::sanitized`].

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Relative weights for the row-type draw (Ground / Traffic / Water)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowWeights {
    pub ground: u32,
    pub traffic: u32,
    pub water: u32,
}

impl Default for RowWeights {
    fn default() -> Self {
        Self {
            ground: 50,
            traffic: 25,
            water: 25,
        }
    }
}

impl RowWeights {
    /// Sum of the partition (100 for the shipped presets)
    pub fn total(&self) -> u32 {
        self.ground + self.traffic + self.water
    }
}

/// Inclusive run-length bounds for the obstacle/gap pattern of a moving lane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunLengths {
    pub obstacle_min: usize,
    pub obstacle_max: usize,
    pub gap_min: usize,
    pub gap_max: usize,
}

impl RunLengths {
    pub const fn new(obstacle_min: usize, obstacle_max: usize, gap_min: usize, gap_max: usize) -> Self {
        Self {
            obstacle_min,
            obstacle_max,
            gap_min,
            gap_max,
        }
    }

    /// Clamp to a playable pattern: at least one obstacle and one gap cell per run
    fn sanitized(self) -> Self {
        let obstacle_min = self.obstacle_min.max(1);
        let gap_min = self.gap_min.max(1);
        Self {
            obstacle_min,
            obstacle_max: self.obstacle_max.max(obstacle_min),
            gap_min,
            gap_max: self.gap_max.max(gap_min),
        }
    }
}

/// Lane generator balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorTuning {
    /// The first K generated lanes are always Ground
    pub forced_ground_lanes: u64,
    pub weights: RowWeights,
    /// Cars: short vehicles, wide gaps
    pub traffic: RunLengths,
    /// Logs: longer obstacles, narrower water gaps
    pub water: RunLengths,
    /// Advance period range at world position 0 (ticks between rotations)
    pub period_min: u32,
    pub period_max: u32,
    /// Lanes generated per one-tick decrease of the period range
    pub difficulty_step: u64,
    /// Periods never drop below this
    pub period_floor: u32,
}

impl Default for GeneratorTuning {
    fn default() -> Self {
        Self {
            forced_ground_lanes: 3,
            weights: RowWeights::default(),
            traffic: RunLengths::new(1, 2, 3, 6),
            water: RunLengths::new(2, 4, 2, 5),
            period_min: 5,
            period_max: 8,
            difficulty_step: 25,
            period_floor: 2,
        }
    }
}

/// How many trailing lanes stay Ground once the early game is over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LateMargin {
    /// Safe margin enforcement stops entirely
    Off,
    /// Safe margin shrinks to this many lanes
    Lanes(usize),
}

impl Default for LateMargin {
    fn default() -> Self {
        LateMargin::Lanes(1)
    }
}

/// Full simulation balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub width: usize,
    pub height: usize,
    /// Spawn row is `height - spawn_row_offset`
    pub spawn_row_offset: usize,
    /// Ticks between automatic scrolls
    pub scroll_interval_ticks: u32,
    /// Trailing lanes forced to Ground during the early game
    pub safe_margin: usize,
    /// Early game lasts while fewer than this many lanes have scrolled in
    pub early_game_threshold: u64,
    pub late_margin: LateMargin,
    /// Forbid vertically adjacent Water lanes during the early game
    pub no_adjacent_water_early: bool,
    pub starting_lives: u8,
    pub max_lives: u8,
    pub respawn_seconds: f32,
    /// Scrolls between life pickup spawn attempts (single-player only)
    pub pickup_interval_scrolls: u32,
    pub generator: GeneratorTuning,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            width: GRID_WIDTH,
            height: GRID_HEIGHT,
            spawn_row_offset: 2,
            scroll_interval_ticks: SCROLL_INTERVAL_TICKS,
            safe_margin: 3,
            early_game_threshold: 30,
            late_margin: LateMargin::default(),
            no_adjacent_water_early: true,
            starting_lives: 1,
            max_lives: MAX_LIVES,
            respawn_seconds: RESPAWN_SECONDS,
            pickup_interval_scrolls: 12,
            generator: GeneratorTuning::default(),
        }
    }
}

impl Tuning {
    /// Default balance on a custom grid width
    pub fn with_width(width: usize) -> Self {
        Self {
            width,
            ..Self::default()
        }
    }

    /// Parse a tuning file (missing fields take their defaults)
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Clamp every value into a range the simulation can run with
    pub fn sanitized(&self) -> Self {
        let mut t = self.clone();

        t.width = t.width.max(1);
        t.height = t.height.max(2);
        t.spawn_row_offset = t.spawn_row_offset.clamp(1, t.height);
        t.safe_margin = t.safe_margin.min(t.height);
        if let LateMargin::Lanes(n) = t.late_margin {
            t.late_margin = LateMargin::Lanes(n.min(t.height));
        }
        t.scroll_interval_ticks = t.scroll_interval_ticks.max(1);
        t.max_lives = t.max_lives.max(1);
        t.starting_lives = t.starting_lives.clamp(1, t.max_lives);
        if !t.respawn_seconds.is_finite() || t.respawn_seconds < 0.0 {
            t.respawn_seconds = RESPAWN_SECONDS;
        }
        t.pickup_interval_scrolls = t.pickup_interval_scrolls.max(1);

        let g = &mut t.generator;
        g.traffic = g.traffic.sanitized();
        g.water = g.water.sanitized();
        g.period_floor = g.period_floor.max(1);
        g.period_min = g.period_min.max(g.period_floor);
        g.period_max = g.period_max.max(g.period_min);
        g.difficulty_step = g.difficulty_step.max(1);

        if t != *self {
            log::warn!("Tuning contained out-of-range values; clamped");
        }
        t
    }

    /// Row the actors spawn on
    pub fn spawn_row(&self) -> usize {
        self.height - self.spawn_row_offset
    }

    /// Column the actors spawn on
    pub fn spawn_col(&self) -> usize {
        self.width / 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights_partition() {
        assert_eq!(RowWeights::default().total(), 100);
    }

    #[test]
    fn test_default_spawn_matches_grid() {
        let t = Tuning::default();
        assert_eq!(t.width, 28);
        assert_eq!(t.height, 20);
        assert_eq!((t.spawn_col(), t.spawn_row()), (14, 18));
    }

    #[test]
    fn test_sanitize_clamps_gaps_and_periods() {
        let mut t = Tuning::default();
        t.generator.traffic = RunLengths::new(0, 0, 0, 0);
        t.generator.period_floor = 0;
        t.generator.period_min = 0;
        t.generator.period_max = 0;
        t.starting_lives = 9;
        t.max_lives = 3;

        let s = t.sanitized();
        assert_eq!(s.generator.traffic, RunLengths::new(1, 1, 1, 1));
        assert_eq!(s.generator.period_floor, 1);
        assert!(s.generator.period_min >= 1);
        assert!(s.generator.period_max >= s.generator.period_min);
        assert_eq!(s.starting_lives, 3);
    }

    #[test]
    fn test_sanitize_is_identity_on_defaults() {
        let t = Tuning::default();
        assert_eq!(t.sanitized(), t);
    }

    #[test]
    fn test_from_json_partial() {
        let t = Tuning::from_json(r#"{ "width": 31, "late_margin": "Off" }"#).unwrap();
        assert_eq!(t.width, 31);
        assert_eq!(t.height, 20);
        assert_eq!(t.late_margin, LateMargin::Off);

        assert!(Tuning::from_json("{ not json").is_err());
    }

    #[test]
    fn test_from_json_late_margin_lanes() {
        let t = Tuning::from_json(r#"{ "late_margin": { "Lanes": 2 } }"#).unwrap();
        assert_eq!(t.late_margin, LateMargin::Lanes(2));
    }
}
