//! The evolutionary trainer: evaluate, select, breed, repeat.

use crate::NeuralNetwork;
use crate::breeding::breed_into;
use crate::config::TrainerConfig;
use crate::dataset::{Dataset, Sample};
use crate::error::{Error, Result};
use crate::fitness::FitnessEvaluator;
use crate::population::{Individual, Population};
use crate::schema::NetworkSchema;
use crate::selection::{WeightedTable, pick_parents, select_survivors};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::HashMap;
use tracing::{debug, info};

/// Phase the trainer is in. A generation walks through every phase in order
/// and ends back at `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainerState {
    Idle,
    Evaluating,
    Selecting,
    Breeding,
}

/// Cost summary of one evaluation pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationStats {
    pub generation: u64,
    pub best: f64,
    pub mean: f64,
    pub worst: f64,
}

impl GenerationStats {
    fn of(generation: u64, costs: &[f64]) -> Self {
        let best = costs.iter().copied().fold(f64::INFINITY, f64::min);
        let worst = costs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mean = costs.iter().sum::<f64>() / costs.len().max(1) as f64;
        GenerationStats {
            generation,
            best,
            mean,
            worst,
        }
    }
}

/// Trains a population of networks sharing one topology by selection,
/// crossover and mutation.
pub struct Trainer {
    population: Population,
    dataset: Dataset,
    config: TrainerConfig,
    evaluator: FitnessEvaluator,
    rng: StdRng,
    state: TrainerState,
    generation: u64,
    champion: Option<Individual>, // Best of the last evaluation
}

impl Trainer {
    /// A trainer with the default configuration.
    pub fn new(reference: NeuralNetwork, population_size: usize) -> Result<Self> {
        Self::with_config(reference, population_size, TrainerConfig::default())
    }

    /// Seeds `population_size` networks from `reference`'s topology.
    pub fn with_config(
        reference: NeuralNetwork,
        population_size: usize,
        config: TrainerConfig,
    ) -> Result<Self> {
        if population_size == 0 {
            return Err(Error::InvalidPopulationSize(population_size));
        }
        config.validate()?;
        config.validate_for_population(population_size)?;

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        let population =
            Population::seed(reference, population_size, config.keep_reference, &mut rng);
        let evaluator = FitnessEvaluator::new(config.workers)?;

        info!(
            population = population_size,
            layers = ?population.individuals()[0].network.layer_sizes(),
            workers = evaluator.workers(),
            "trainer ready"
        );

        Ok(Trainer {
            population,
            dataset: Dataset::new(),
            config,
            evaluator,
            rng,
            state: TrainerState::Idle,
            generation: 0,
            champion: None,
        })
    }

    /// Replaces the training data. Nothing changes if any sample is invalid.
    pub fn load_training_data<S: AsRef<str>>(
        &mut self,
        inputs: Vec<Vec<f64>>,
        labels: &[S],
    ) -> Result<()> {
        self.dataset = Dataset::from_parts(inputs, labels, self.template())?;
        debug!(samples = self.dataset.len(), "training data loaded");
        Ok(())
    }

    /// Appends one sample to the training data.
    pub fn add_single_training_datum(&mut self, input: Vec<f64>, label: &str) -> Result<()> {
        let sample = Sample::new(input, label);
        let template = &self.population.individuals()[0].network;
        self.dataset.push(sample, template)
    }

    /// Runs `iterations` generations, then scores the final population so
    /// [`best_network`](Self::best_network) reflects it.
    ///
    /// A population of one has nothing to breed with and is only scored.
    pub fn train(&mut self, iterations: i64) -> Result<()> {
        if iterations <= 0 {
            return Err(Error::InvalidIterationCount(iterations));
        }
        if self.dataset.is_empty() {
            return Err(Error::NoTrainingData);
        }

        info!(
            iterations,
            population = self.population.len(),
            samples = self.dataset.len(),
            "training started"
        );

        if self.population.len() > 1 {
            for _ in 0..iterations {
                self.evolve_one_generation()?;
            }
        }

        let stats = self.evaluate_population()?;
        info!(
            generation = stats.generation,
            best = stats.best,
            mean = stats.mean,
            "training finished"
        );
        Ok(())
    }

    /// One full generation. Returns the costs the old population scored.
    ///
    /// Any failure aborts the generation and leaves the trainer `Idle`.
    pub fn evolve_one_generation(&mut self) -> Result<GenerationStats> {
        let result = self.generation_step();
        self.state = TrainerState::Idle;
        result
    }

    /// Scores the current population without evolving it.
    pub fn evaluate_population(&mut self) -> Result<GenerationStats> {
        let result = self.evaluate();
        self.state = TrainerState::Idle;
        result
    }

    fn generation_step(&mut self) -> Result<GenerationStats> {
        let stats = self.evaluate()?;

        self.state = TrainerState::Selecting;
        let survivors = select_survivors(&self.population, &self.config, &mut self.rng)?;

        self.state = TrainerState::Breeding;
        self.breed(&survivors)?;

        self.generation += 1;
        debug!(
            generation = self.generation,
            best = stats.best,
            mean = stats.mean,
            worst = stats.worst,
            survivors = survivors.len(),
            "generation bred"
        );
        Ok(stats)
    }

    fn evaluate(&mut self) -> Result<GenerationStats> {
        if self.dataset.is_empty() {
            return Err(Error::NoTrainingData);
        }
        self.state = TrainerState::Evaluating;
        self.evaluator
            .evaluate_all(self.population.individuals_mut(), &self.dataset)?;
        self.champion = self.population.best().cloned();
        Ok(GenerationStats::of(self.generation, &self.population.costs()))
    }

    /// Refills every slot of the population in place: elites first, then
    /// children of two distinct survivors.
    fn breed(&mut self, survivors: &[Individual]) -> Result<()> {
        let elites: Vec<NeuralNetwork> = self
            .population
            .ranked()
            .into_iter()
            .take(self.config.elite_count)
            .map(|i| self.population.individuals()[i].network.clone())
            .collect();
        let table = WeightedTable::geometric(survivors.len(), self.config.survivor_weight);
        if table.len() < 2 {
            return Err(Error::TooFewSurvivors {
                survivors: table.len(),
            });
        }

        for (slot, individual) in self.population.individuals_mut().iter_mut().enumerate() {
            match elites.get(slot) {
                Some(elite) => individual.network.clone_from(elite),
                None => {
                    let (first, second) = pick_parents(&table, &mut self.rng)?;
                    breed_into(
                        &mut individual.network,
                        &survivors[first].network,
                        &survivors[second].network,
                        self.config.mutation_strength,
                        &mut self.rng,
                    )?;
                }
            }
            individual.cost = f64::INFINITY;
        }
        Ok(())
    }

    /// Activation of every output label on the best network.
    pub fn predict(&mut self, input: &[f64]) -> Result<HashMap<String, f64>> {
        self.best_network_mut().predict(input)
    }

    /// Most activated label of the best network.
    pub fn best_label(&mut self, input: &[f64]) -> Result<(String, f64)> {
        self.best_network_mut().best_label(input)
    }

    /// Lowest-cost network of the last evaluation; the first slot before any.
    ///
    /// A copy is kept, so breeding that follows the evaluation doesn't
    /// replace it.
    pub fn best_network(&self) -> &NeuralNetwork {
        match &self.champion {
            Some(champion) => &champion.network,
            None => self.template(),
        }
    }

    fn best_network_mut(&mut self) -> &mut NeuralNetwork {
        match &mut self.champion {
            Some(champion) => &mut champion.network,
            None => &mut self.population.individuals_mut()[0].network,
        }
    }

    /// Cost of the best network in the last evaluation, `None` before any.
    pub fn best_cost(&self) -> Option<f64> {
        self.champion.as_ref().map(|c| c.cost)
    }

    /// Cost of every slot. Slots bred since the last evaluation read
    /// `f64::INFINITY`.
    pub fn costs(&self) -> Vec<f64> {
        self.population.costs()
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    pub fn state(&self) -> TrainerState {
        self.state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn schema(&self) -> NetworkSchema {
        self.template().schema()
    }

    fn template(&self) -> &NeuralNetwork {
        &self.population.individuals()[0].network
    }
}
