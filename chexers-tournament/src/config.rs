//! Configuration types for self-play
//!
//! Level 4 - Utilities and configuration

use chexers_core::{DepthPolicy, EvalWeights, Rules, StrategyConfig};

/// AI configuration for one seat
#[derive(Clone, Debug, PartialEq)]
pub struct AiConfig {
    /// Search depth policy
    pub depth: DepthPolicy,
    /// Optional time limit per decision in milliseconds
    pub time_limit_ms: Option<u64>,
    /// Leaf evaluation weights
    pub weights: EvalWeights,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            depth: DepthPolicy::default(),
            time_limit_ms: None,
            weights: EvalWeights::default(),
        }
    }
}

impl AiConfig {
    /// Create config for MaxN at a fixed depth
    pub fn maxn(depth: u32) -> Self {
        Self {
            depth: DepthPolicy::Fixed { depth },
            ..Default::default()
        }
    }

    /// Set custom weights
    pub fn with_weights(mut self, weights: EvalWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Set time limit
    pub fn with_time_limit(mut self, ms: u64) -> Self {
        self.time_limit_ms = Some(ms);
        self
    }

    /// Strategy configuration for a game played under `rules`
    pub fn strategy_config(&self, rules: Rules) -> StrategyConfig {
        let config = StrategyConfig::default()
            .with_depth_policy(self.depth)
            .with_weights(self.weights.clone())
            .with_rules(rules);
        match self.time_limit_ms {
            Some(ms) => config.with_time_limit(ms),
            None => config,
        }
    }
}

/// Match configuration
#[derive(Clone, Debug)]
pub struct MatchConfig {
    /// One AI per colour, in turn order
    pub seats: [AiConfig; 3],
    /// Number of games
    pub games: usize,
    /// Exit target and ply cap
    pub rules: Rules,
    /// Random blockers placed before each game
    pub blockers: usize,
    /// Random seed for blocker layouts (None = 42)
    pub seed: Option<u64>,
    /// Whether to run games in parallel
    pub parallel: bool,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            seats: [AiConfig::default(), AiConfig::default(), AiConfig::default()],
            games: 6,
            rules: Rules::default(),
            blockers: 0,
            seed: None,
            parallel: true,
        }
    }
}

impl MatchConfig {
    /// Same AI in every seat
    pub fn symmetric(ai: AiConfig, games: usize) -> Self {
        Self {
            seats: [ai.clone(), ai.clone(), ai],
            games,
            ..Default::default()
        }
    }

    pub fn with_blockers(mut self, blockers: usize) -> Self {
        self.blockers = blockers;
        self
    }

    pub fn with_max_plies(mut self, max_plies: u32) -> Self {
        self.rules.max_plies = max_plies;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ai_config_defaults() {
        let config = AiConfig::default();
        assert_eq!(config.depth, DepthPolicy::Fixed { depth: 3 });
        assert_eq!(config.time_limit_ms, None);
    }

    #[test]
    fn test_strategy_config_carries_rules() {
        let rules = Rules { exits_to_win: 2, max_plies: 90 };
        let config = AiConfig::maxn(2).with_time_limit(100).strategy_config(rules);
        assert_eq!(config.rules, rules);
        assert_eq!(config.time_limit_ms, Some(100));
        assert_eq!(config.depth.depth_for_turn(0), 2);
    }

    #[test]
    fn test_match_config_builders() {
        let config = MatchConfig::symmetric(AiConfig::maxn(1), 4)
            .with_blockers(3)
            .with_max_plies(60)
            .with_seed(7);
        assert_eq!(config.games, 4);
        assert_eq!(config.blockers, 3);
        assert_eq!(config.rules.max_plies, 60);
        assert_eq!(config.seed, Some(7));
        assert!(config.seats.iter().all(|s| s == &AiConfig::maxn(1)));
    }
}
