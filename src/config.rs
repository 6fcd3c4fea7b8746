use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Tunables of the evolutionary trainer.
///
/// Every field has a default, so a JSON document only needs the values it
/// changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerConfig {
    /// Fraction of the population kept as survivors each generation, in (0, 1).
    pub selection_harshness: f64,
    /// Rank `i` is drawn with relative weight `survivor_weight^i`, in (0, 1).
    pub survivor_weight: f64,
    /// Every inherited parameter moves by a uniform value in `[-s, s)`.
    pub mutation_strength: f64,
    /// Chance that each of the top `kill_window` networks is skipped by selection.
    pub kill_probability: f64,
    pub kill_window: usize,
    /// Best networks copied unchanged into the next generation.
    pub elite_count: usize,
    /// Keep the reference network's parameters in slot 0 of the population.
    pub keep_reference: bool,
    /// Fitness worker threads; available parallelism when unset.
    pub workers: Option<usize>,
    /// Seed for the trainer's RNG; drawn from entropy when unset.
    pub seed: Option<u64>,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        TrainerConfig {
            selection_harshness: 0.5,
            survivor_weight: 0.8,
            mutation_strength: 0.2,
            kill_probability: 0.05,
            kill_window: 2,
            elite_count: 0,
            keep_reference: true,
            workers: None,
            seed: None,
        }
    }
}

impl TrainerConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: TrainerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.selection_harshness > 0.0 && self.selection_harshness < 1.0) {
            return Err(Error::InvalidConfig(format!(
                "selection_harshness has to be in (0, 1), got {}",
                self.selection_harshness
            )));
        }
        if !(self.survivor_weight > 0.0 && self.survivor_weight < 1.0) {
            return Err(Error::InvalidConfig(format!(
                "survivor_weight has to be in (0, 1), got {}",
                self.survivor_weight
            )));
        }
        if !self.mutation_strength.is_finite() || self.mutation_strength < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "mutation_strength has to be a finite non-negative number, got {}",
                self.mutation_strength
            )));
        }
        if !(0.0..=1.0).contains(&self.kill_probability) {
            return Err(Error::InvalidConfig(format!(
                "kill_probability has to be in [0, 1], got {}",
                self.kill_probability
            )));
        }
        if self.workers == Some(0) {
            return Err(Error::InvalidConfig(
                "workers has to be bigger than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// How many of `population_size` networks survive selection.
    pub fn survivor_count(&self, population_size: usize) -> usize {
        (population_size as f64 * self.selection_harshness).floor() as usize
    }

    /// Checks the settings that depend on the population they will drive.
    pub(crate) fn validate_for_population(&self, population_size: usize) -> Result<()> {
        if population_size < 2 {
            return Ok(());
        }
        let survivors = self.survivor_count(population_size);
        if survivors < 2 {
            return Err(Error::InvalidConfig(format!(
                "a population of {population_size} with harshness {} keeps {survivors} \
                 survivors, breeding needs 2",
                self.selection_harshness
            )));
        }
        if self.elite_count >= population_size {
            return Err(Error::InvalidConfig(format!(
                "elite_count {} leaves no room to breed in a population of {population_size}",
                self.elite_count
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let json = r#"{ "mutation_strength": 0.5, "seed": 42 }"#;
        let config = TrainerConfig::from_json(json).unwrap();
        assert_eq!(config.mutation_strength, 0.5);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.selection_harshness, 0.5);
        assert_eq!(config.survivor_weight, 0.8);
        assert!(config.keep_reference);
    }

    #[test]
    fn rejects_out_of_range_values() {
        for json in [
            r#"{ "selection_harshness": 1.0 }"#,
            r#"{ "selection_harshness": 0.0 }"#,
            r#"{ "survivor_weight": 1.5 }"#,
            r#"{ "mutation_strength": -0.1 }"#,
            r#"{ "kill_probability": 2.0 }"#,
            r#"{ "workers": 0 }"#,
        ] {
            assert!(
                matches!(TrainerConfig::from_json(json), Err(Error::InvalidConfig(_))),
                "{json} was accepted"
            );
        }
        assert!(matches!(
            TrainerConfig::from_json("{ nope"),
            Err(Error::ConfigParse(_))
        ));
    }

    #[test]
    fn survivor_count_floors() {
        let config = TrainerConfig {
            selection_harshness: 0.3,
            ..TrainerConfig::default()
        };
        assert_eq!(config.survivor_count(10), 3);
        assert_eq!(config.survivor_count(9), 2);
        assert!(config.validate_for_population(9).is_ok());
        assert!(config.validate_for_population(6).is_err());
        assert!(config.validate_for_population(1).is_ok());
    }
}
