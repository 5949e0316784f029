//! Strategy configuration
//!
//! Every field has a default, so a config file only needs the fields it changes.

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::eval::EvalWeights;
use crate::game::Rules;
use crate::hubs::DEFAULT_HUB_DEPTH;
use crate::maxn::MAX_SEARCH_DEPTH;

/// How deep to search on a given turn
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum DepthPolicy {
    Fixed { depth: u32 },
    /// `opening` plies before `switch_turn`, `endgame` from then on
    Scheduled {
        opening: u32,
        endgame: u32,
        switch_turn: u32,
    },
}

impl Default for DepthPolicy {
    fn default() -> Self {
        DepthPolicy::Fixed { depth: 3 }
    }
}

impl DepthPolicy {
    /// Depth for `turn`, clamped to the supported range
    pub fn depth_for_turn(&self, turn: u32) -> u32 {
        let depth = match *self {
            DepthPolicy::Fixed { depth } => depth,
            DepthPolicy::Scheduled {
                opening,
                endgame,
                switch_turn,
            } => {
                if turn < switch_turn {
                    opening
                } else {
                    endgame
                }
            }
        };
        depth.clamp(1, MAX_SEARCH_DEPTH)
    }

    fn validate(&self) -> Result<()> {
        let depths = match *self {
            DepthPolicy::Fixed { depth } => vec![depth],
            DepthPolicy::Scheduled { opening, endgame, .. } => vec![opening, endgame],
        };
        if depths.contains(&0) {
            return Err(EngineError::InvalidConfig("search depth must be at least 1".into()));
        }
        Ok(())
    }
}

/// Everything a `Strategy` can be tuned with
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyConfig {
    pub depth: DepthPolicy,
    /// Per-decision time budget in milliseconds (None = depth only)
    pub time_limit_ms: Option<u64>,
    pub weights: EvalWeights,
    pub rules: Rules,
    /// Outward depth of the goal-edge hub walk
    pub hub_depth: u32,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            depth: DepthPolicy::default(),
            time_limit_ms: None,
            weights: EvalWeights::default(),
            rules: Rules::default(),
            hub_depth: DEFAULT_HUB_DEPTH,
        }
    }
}

impl StrategyConfig {
    /// Fixed-depth config
    pub fn fixed(depth: u32) -> Self {
        Self {
            depth: DepthPolicy::Fixed { depth },
            ..Default::default()
        }
    }

    pub fn with_depth_policy(mut self, depth: DepthPolicy) -> Self {
        self.depth = depth;
        self
    }

    pub fn with_time_limit(mut self, ms: u64) -> Self {
        self.time_limit_ms = Some(ms);
        self
    }

    pub fn with_weights(mut self, weights: EvalWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_rules(mut self, rules: Rules) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_hub_depth(mut self, hub_depth: u32) -> Self {
        self.hub_depth = hub_depth;
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.depth.validate()?;
        if self.rules.exits_to_win == 0 {
            return Err(EngineError::InvalidConfig("exits_to_win must be at least 1".into()));
        }
        if self.rules.max_plies == 0 {
            return Err(EngineError::InvalidConfig("max_plies must be at least 1".into()));
        }
        Ok(())
    }

    /// Load from a JSON file and validate
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: StrategyConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_depth() {
        let config = StrategyConfig::default();
        assert_eq!(config.depth.depth_for_turn(0), 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_scheduled_depth_switches() {
        let policy = DepthPolicy::Scheduled {
            opening: 4,
            endgame: 2,
            switch_turn: 10,
        };
        assert_eq!(policy.depth_for_turn(0), 4);
        assert_eq!(policy.depth_for_turn(9), 4);
        assert_eq!(policy.depth_for_turn(10), 2);
    }

    #[test]
    fn test_depth_is_clamped() {
        assert_eq!(DepthPolicy::Fixed { depth: 50 }.depth_for_turn(0), MAX_SEARCH_DEPTH);
    }

    #[test]
    fn test_zero_depth_rejected() {
        let config = StrategyConfig::fixed(0);
        assert!(matches!(config.validate(), Err(EngineError::InvalidConfig(_))));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{"depth":{"policy":"fixed","depth":2},"weights":{"exit_weight":20.0}}"#;
        let config: StrategyConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.depth, DepthPolicy::Fixed { depth: 2 });
        assert_eq!(config.weights.exit_weight, 20.0);
        assert_eq!(config.weights.capture_weight, EvalWeights::default().capture_weight);
        assert_eq!(config.rules, Rules::default());
        assert_eq!(config.hub_depth, DEFAULT_HUB_DEPTH);
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("chexers-config-{}.json", std::process::id()));
        std::fs::write(&path, r#"{"time_limit_ms":250}"#).unwrap();
        let config = StrategyConfig::load(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(config.time_limit_ms, Some(250));
        assert!(StrategyConfig::load(Path::new("/nonexistent/chexers.json")).is_err());
    }
}
