//! Player-selectable options: fall speed presets and attempts per game.

use std::fmt;
use std::str::FromStr;

use crate::GameError;

/// Fall speed preset, in pixels per tick before the time constant is applied.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Speed {
    #[default]
    Slow,
    Medium,
    Fast,
}

impl Speed {
    pub const ALL: [Speed; 3] = [Speed::Slow, Speed::Medium, Speed::Fast];

    pub fn value(self) -> f64 {
        match self {
            Speed::Slow => 20.0,
            Speed::Medium => 30.0,
            Speed::Fast => 40.0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Speed::Slow => "slow",
            Speed::Medium => "medium",
            Speed::Fast => "fast",
        }
    }
}

impl FromStr for Speed {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Speed::ALL
            .into_iter()
            .find(|sp| sp.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| GameError::UnknownSpeed(s.to_string()))
    }
}

impl fmt::Display for Speed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub const ATTEMPT_LIMITS: [u32; 4] = [5, 10, 15, 20];
pub const DEFAULT_ATTEMPT_LIMIT: u32 = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameConfig {
    pub speed: Speed,
    attempt_limit: u32,
}

impl GameConfig {
    pub fn new(speed: Speed, attempt_limit: u32) -> Result<Self, GameError> {
        let mut cfg = Self {
            speed,
            ..Self::default()
        };
        cfg.set_attempt_limit(attempt_limit)?;
        Ok(cfg)
    }

    pub fn attempt_limit(&self) -> u32 {
        self.attempt_limit
    }

    pub fn set_attempt_limit(&mut self, limit: u32) -> Result<(), GameError> {
        if !ATTEMPT_LIMITS.contains(&limit) {
            return Err(GameError::UnsupportedAttemptLimit(limit));
        }
        self.attempt_limit = limit;
        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            speed: Speed::default(),
            attempt_limit: DEFAULT_ATTEMPT_LIMIT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speed_parse() {
        assert_eq!("slow".parse::<Speed>().unwrap(), Speed::Slow);
        assert_eq!(" Medium ".parse::<Speed>().unwrap(), Speed::Medium);
        assert_eq!("FAST".parse::<Speed>().unwrap(), Speed::Fast);
        assert!(matches!(
            "warp".parse::<Speed>(),
            Err(GameError::UnknownSpeed(s)) if s == "warp"
        ));
    }

    #[test]
    fn test_speed_presets_ordered() {
        let values: Vec<f64> = Speed::ALL.iter().map(|s| s.value()).collect();
        assert_eq!(values, vec![20.0, 30.0, 40.0]);
    }

    #[test]
    fn test_attempt_limit_validation() {
        let mut cfg = GameConfig::default();
        assert_eq!(cfg.attempt_limit(), 10);
        cfg.set_attempt_limit(15).unwrap();
        assert_eq!(cfg.attempt_limit(), 15);
        assert!(matches!(
            cfg.set_attempt_limit(0),
            Err(GameError::UnsupportedAttemptLimit(0))
        ));
        assert_eq!(cfg.attempt_limit(), 15);
        assert!(GameConfig::new(Speed::Fast, 7).is_err());
    }
}
