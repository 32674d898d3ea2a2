//! Lock configuration: quiz length, strike policy, operand ranges, timings.
//!
//! Every field has a default, so a JSON document only needs the keys it
//! overrides:
//!
//! ```rust
//! use math_lock::LockConfig;
//!
//! let cfg = LockConfig::from_json_str(r#"{ "total_questions": 5, "fail_threshold": null }"#).unwrap();
//! assert_eq!(cfg.total_questions, 5);
//! assert!(cfg.fail_threshold.is_none());
//! assert_eq!(cfg.timing.flash_ms, 350);
//! ```

use std::path::Path;
use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Inclusive integer range `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperandRange {
    pub min: i64,
    pub max: i64,
}

impl OperandRange {
    pub const fn new(min: i64, max: i64) -> Self {
        OperandRange { min, max }
    }

    pub fn sample<R: Rng>(&self, rng: &mut R) -> i64 {
        rng.gen_range(self.min..=self.max)
    }

    pub fn contains(&self, value: i64) -> bool {
        (self.min..=self.max).contains(&value)
    }

    fn check(&self, name: &'static str) -> Result<(), ConfigError> {
        if self.min > self.max {
            return Err(ConfigError::InvalidRange { name, min: self.min, max: self.max });
        }
        Ok(())
    }

    fn check_nonzero(&self, name: &'static str) -> Result<(), ConfigError> {
        self.check(name)?;
        if self.contains(0) {
            return Err(ConfigError::ZeroInRange { name });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OperandRanges {
    /// Both operands of `+` and `-`.
    pub add_sub: OperandRange,
    /// Re-draw `+`/`-` operands until they differ.
    pub distinct_add_sub: bool,
    pub mul: OperandRange,
    pub divisor: OperandRange,
    pub quotient: OperandRange,
}

impl Default for OperandRanges {
    fn default() -> Self {
        OperandRanges {
            add_sub: OperandRange::new(7, 25),
            distinct_add_sub: true,
            mul: OperandRange::new(2, 12),
            divisor: OperandRange::new(3, 7),
            quotient: OperandRange::new(2, 25),
        }
    }
}

impl OperandRanges {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.add_sub.check("add_sub")?;
        if self.distinct_add_sub && self.add_sub.min == self.add_sub.max {
            return Err(ConfigError::DegenerateRange { name: "add_sub" });
        }
        self.mul.check("mul")?;
        self.divisor.check_nonzero("divisor")?;
        self.quotient.check("quotient")?;
        Ok(())
    }
}

/// Timer constants, all in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub flash_ms: u64,
    pub failure_tick_ms: u64,
    pub failure_ticks: u32,
    /// Offsets from the triggering event, strictly increasing.
    pub focus_burst_ms: Vec<u64>,
    pub heartbeat_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        TimingConfig {
            flash_ms: 350,
            failure_tick_ms: 700,
            failure_ticks: 6,
            focus_burst_ms: vec![100, 300, 500],
            heartbeat_ms: 150,
        }
    }
}

impl TimingConfig {
    pub fn flash(&self) -> Duration {
        Duration::from_millis(self.flash_ms)
    }

    pub fn failure_tick(&self) -> Duration {
        Duration::from_millis(self.failure_tick_ms)
    }

    pub fn heartbeat(&self) -> Duration {
        Duration::from_millis(self.heartbeat_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.flash_ms == 0 {
            return Err(ConfigError::ZeroInterval { name: "flash_ms" });
        }
        if self.failure_tick_ms == 0 {
            return Err(ConfigError::ZeroInterval { name: "failure_tick_ms" });
        }
        if self.failure_ticks == 0 {
            return Err(ConfigError::ZeroInterval { name: "failure_ticks" });
        }
        if self.heartbeat_ms == 0 {
            return Err(ConfigError::ZeroInterval { name: "heartbeat_ms" });
        }
        if self.focus_burst_ms.is_empty() {
            return Err(ConfigError::EmptyBurstLadder);
        }
        if self.focus_burst_ms.windows(2).any(|w| w[1] <= w[0]) {
            return Err(ConfigError::UnorderedBurstLadder);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LockConfig {
    pub total_questions: u32,
    /// Strikes before a lockout. `None` disables strike tracking.
    pub fail_threshold: Option<u32>,
    pub ranges: OperandRanges,
    pub timing: TimingConfig,
    /// `Some(seed)` makes the question sequence reproducible.
    pub rng_seed: Option<u64>,
    pub counter_prefix: String,
    pub strike_prefix: String,
    pub failure_text: String,
}

impl Default for LockConfig {
    fn default() -> Self {
        LockConfig {
            total_questions: 3,
            fail_threshold: Some(2),
            ranges: OperandRanges::default(),
            timing: TimingConfig::default(),
            rng_seed: None,
            counter_prefix: "Problems left: ".to_string(),
            strike_prefix: "Strikes: ".to_string(),
            failure_text: "Problem Failed".to_string(),
        }
    }
}

impl LockConfig {
    /// Defaults without strike tracking.
    pub fn lenient() -> Self {
        LockConfig { fail_threshold: None, ..LockConfig::default() }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let cfg: LockConfig = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.total_questions == 0 {
            return Err(ConfigError::ZeroTotalQuestions);
        }
        if self.fail_threshold == Some(0) {
            return Err(ConfigError::ZeroFailThreshold);
        }
        self.ranges.validate()?;
        self.timing.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        LockConfig::default().validate().unwrap();
        LockConfig::lenient().validate().unwrap();
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = LockConfig::from_json_str(r#"{ "ranges": { "mul": { "min": 1, "max": 12 } } }"#).unwrap();
        assert_eq!(cfg.ranges.mul, OperandRange::new(1, 12));
        assert_eq!(cfg.ranges.divisor, OperandRange::new(3, 7));
        assert_eq!(cfg.fail_threshold, Some(2));
        assert_eq!(cfg.timing.focus_burst_ms, vec![100, 300, 500]);
    }

    #[test]
    fn divisor_range_spanning_zero_is_rejected() {
        let err = LockConfig::from_json_str(r#"{ "ranges": { "divisor": { "min": -2, "max": 4 } } }"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::ZeroInRange { name: "divisor" }));
    }

    #[test]
    fn inverted_and_degenerate_ranges_are_rejected() {
        let mut cfg = LockConfig::default();
        cfg.ranges.mul = OperandRange::new(9, 3);
        assert!(matches!(cfg.validate(), Err(ConfigError::InvalidRange { name: "mul", .. })));

        let mut cfg = LockConfig::default();
        cfg.ranges.add_sub = OperandRange::new(5, 5);
        assert!(matches!(cfg.validate(), Err(ConfigError::DegenerateRange { .. })));
        cfg.ranges.distinct_add_sub = false;
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn burst_ladder_must_increase() {
        let mut cfg = LockConfig::default();
        cfg.timing.focus_burst_ms = vec![100, 100];
        assert!(matches!(cfg.validate(), Err(ConfigError::UnorderedBurstLadder)));
        cfg.timing.focus_burst_ms.clear();
        assert!(matches!(cfg.validate(), Err(ConfigError::EmptyBurstLadder)));
    }

    #[test]
    fn zero_threshold_and_zero_questions_are_rejected() {
        let cfg = LockConfig { fail_threshold: Some(0), ..LockConfig::default() };
        assert!(matches!(cfg.validate(), Err(ConfigError::ZeroFailThreshold)));
        let cfg = LockConfig { total_questions: 0, ..LockConfig::default() };
        assert!(matches!(cfg.validate(), Err(ConfigError::ZeroTotalQuestions)));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(LockConfig::from_json_str("{ nope"), Err(ConfigError::Parse(_))));
    }
}
