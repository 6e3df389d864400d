//! Command line configuration for the `dining` driver.

use std::time::Duration;

use clap::Parser;

use crate::error::{Error, Result};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "dining",
    about = "Philosophers sharing chopsticks and a talk permit through one monitor"
)]
pub struct Config {
    /// Number of philosophers around the table
    #[arg(short = 'n', long, env = "DINING_PHILOSOPHERS", default_value_t = 4)]
    pub philosophers: usize,

    /// Meals each philosopher eats before leaving (0 = until interrupted)
    #[arg(short, long, env = "DINING_MEALS", default_value_t = 10)]
    pub meals: u64,

    /// Upper bound of a think pause, in milliseconds
    #[arg(long, env = "DINING_THINK_MS", default_value_t = 100)]
    pub think_ms: u64,

    /// Upper bound of a meal, in milliseconds
    #[arg(long, env = "DINING_EAT_MS", default_value_t = 100)]
    pub eat_ms: u64,

    /// Upper bound of a talk, in milliseconds
    #[arg(long, env = "DINING_TALK_MS", default_value_t = 100)]
    pub talk_ms: u64,

    /// Probability of asking to talk after each meal
    #[arg(long, env = "DINING_TALK_CHANCE", default_value_t = 0.5)]
    pub talk_chance: f64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            philosophers: 4,
            meals: 10,
            think_ms: 100,
            eat_ms: 100,
            talk_ms: 100,
            talk_chance: 0.5,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.philosophers < 1 {
            return Err(Error::Config(
                "there must be at least one philosopher".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.talk_chance) {
            return Err(Error::Config(format!(
                "talk chance must be within [0, 1], got {}",
                self.talk_chance
            )));
        }
        Ok(())
    }

    pub fn think(&self) -> Duration {
        Duration::from_millis(self.think_ms)
    }

    pub fn eat(&self) -> Duration {
        Duration::from_millis(self.eat_ms)
    }

    pub fn talk(&self) -> Duration {
        Duration::from_millis(self.talk_ms)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::try_parse_from(["dining"]).unwrap();
        assert_eq!(config.philosophers, 4);
        assert_eq!(config.meals, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_flags() {
        let config =
            Config::try_parse_from(["dining", "-n", "7", "--meals", "0", "--talk-chance", "1"])
                .unwrap();
        assert_eq!(config.philosophers, 7);
        assert_eq!(config.meals, 0);
        assert_eq!(config.talk_chance, 1.0);
    }

    #[test]
    fn test_rejects_empty_table() {
        let config = Config {
            philosophers: 0,
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_rejects_bad_talk_chance() {
        for chance in [-0.1, 1.5, f64::NAN] {
            let config = Config {
                talk_chance: chance,
                ..Config::default()
            };
            assert!(config.validate().is_err(), "accepted {chance}");
        }
    }
}
