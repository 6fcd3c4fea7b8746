//! A small feedforward neural network trained by evolution instead of
//! backpropagation.
//!
//! A [`Trainer`] keeps a population of networks that share one topology.
//! Each generation every network is scored against the training data in
//! parallel, the cheapest ones are favoured as survivors, and the whole
//! population is refilled with mutated crossovers of two survivors.
//!
//! ```no_run
//! use evonet::{NeuralNetwork, Trainer};
//!
//! # fn main() -> evonet::Result<()> {
//! let nn = NeuralNetwork::new(&[3, 6, 2], &["red", "notRed"])?;
//! let mut trainer = Trainer::new(nn, 50)?;
//! trainer.load_training_data(vec![vec![0.9, 0.1, 0.2], vec![0.2, 0.8, 0.3]], &["red", "notRed"])?;
//! trainer.train(100)?;
//! let (label, confidence) = trainer.best_label(&[0.8, 0.2, 0.1])?;
//! println!("{label} ({confidence:.3})");
//! # Ok(())
//! # }
//! ```

mod breeding;
mod config;
mod dataset;
mod error;
mod fitness;
mod neural_network;
mod population;
mod schema;
mod selection;
mod trainer;

pub use breeding::breed_into;
pub use config::TrainerConfig;
pub use dataset::{Dataset, Sample};
pub use error::{Error, Result};
pub use fitness::{FitnessEvaluator, evaluate};
pub use neural_network::{INITIAL_RANGE, NeuralNetwork, Parameter};
pub use population::{Individual, Population};
pub use schema::NetworkSchema;
pub use selection::{WeightedTable, pick_parents, select_survivors};
pub use trainer::{GenerationStats, Trainer, TrainerState};
