//! Cost of a network against a labelled dataset, and the worker pool that
//! computes it for a whole population at once.

use crate::NeuralNetwork;
use crate::dataset::Dataset;
use crate::error::{Error, Result};
use crate::population::Individual;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::debug;

/// Average squared distance between the network's outputs and a one-hot
/// encoding of each sample's label.
///
/// The matching output contributes `(1 - value)^2`, every other output
/// `value^2`. Outputs are assumed to be sigmoid-bounded, so the cost is
/// never negative and only reaches zero on perfect one-hot answers.
pub fn evaluate(network: &mut NeuralNetwork, dataset: &Dataset) -> Result<f64> {
    if dataset.is_empty() {
        return Err(Error::NoTrainingData);
    }

    let mut combined = 0.0;
    for sample in dataset.samples() {
        let outputs = network.forward(&sample.input);
        for (label, value) in network.labels().iter().zip(outputs) {
            combined += if *label == sample.label {
                (1.0 - value).powi(2)
            } else {
                value.powi(2)
            };
        }
    }

    Ok(combined / dataset.len() as f64)
}

/// Fixed-size pool of fitness workers.
pub struct FitnessEvaluator {
    pool: ThreadPool,
}

impl FitnessEvaluator {
    /// Starts `workers` threads, or one per available core when `None`.
    pub fn new(workers: Option<usize>) -> Result<Self> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers.unwrap_or(0))
            .thread_name(|i| format!("fitness-{i}"))
            .build()?;
        debug!(workers = pool.current_num_threads(), "fitness pool started");
        Ok(FitnessEvaluator { pool })
    }

    pub fn workers(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Scores every individual and stores the result in its own cost field.
    ///
    /// Each individual is handed to exactly one worker; the call returns
    /// once all of them are scored.
    pub fn evaluate_all(&self, individuals: &mut [Individual], dataset: &Dataset) -> Result<()> {
        if dataset.is_empty() {
            return Err(Error::NoTrainingData);
        }

        self.pool.install(|| {
            individuals.par_iter_mut().try_for_each(|individual| -> Result<()> {
                individual.cost = evaluate(&mut individual.network, dataset)?;
                Ok(())
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Sample;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn two_way() -> NeuralNetwork {
        let mut rng = StdRng::seed_from_u64(3);
        NeuralNetwork::with_rng(&[2, 3, 2], &["a", "b"], &mut rng).unwrap()
    }

    fn dataset(network: &NeuralNetwork) -> Dataset {
        Dataset::from_parts(
            vec![vec![0.0, 1.0], vec![1.0, 0.0], vec![0.5, 0.5]],
            &["a", "b", "a"],
            network,
        )
        .unwrap()
    }

    #[test]
    fn cost_is_never_negative() {
        let mut rng = StdRng::seed_from_u64(11);
        let reference = two_way();
        let data = dataset(&reference);
        for _ in 0..20 {
            let mut nn = reference.clone_topology(&mut rng);
            let cost = evaluate(&mut nn, &data).unwrap();
            assert!(cost >= 0.0);
            // Two sigmoid outputs can each miss by at most 1.
            assert!(cost <= 2.0);
        }
    }

    #[test]
    fn cost_follows_the_one_hot_rule() {
        let mut nn = NeuralNetwork::new(&[1, 2], &["a", "b"]).unwrap();
        for node in 0..2 {
            nn.set_weight(0, 0, node, 0.0).unwrap();
            nn.set_bias(1, node, 0.0).unwrap();
        }
        let data = Dataset::from_parts(vec![vec![1.0]], &["a"], &nn).unwrap();
        // Both outputs sit at 0.5.
        assert_eq!(evaluate(&mut nn, &data).unwrap(), 0.25 + 0.25);
    }

    #[test]
    fn perfect_answers_cost_nothing() {
        // A single layer hands its input straight back.
        let mut identity = NeuralNetwork::new(&[2], &["on", "off"]).unwrap();
        let data = Dataset::from_parts(
            vec![vec![1.0, 0.0], vec![0.0, 1.0]],
            &["on", "off"],
            &identity,
        )
        .unwrap();
        assert_eq!(evaluate(&mut identity, &data).unwrap(), 0.0);

        // Saturated biases get within rounding of zero.
        let mut nn = two_way();
        for node in 0..3 {
            nn.set_weight(1, node, 0, 0.0).unwrap();
            nn.set_weight(1, node, 1, 0.0).unwrap();
        }
        nn.set_bias(2, 0, 60.0).unwrap();
        nn.set_bias(2, 1, -60.0).unwrap();
        let data = Dataset::from_parts(vec![vec![0.3, 0.7]], &["a"], &nn).unwrap();
        assert!(evaluate(&mut nn, &data).unwrap() < 1e-20);
    }

    #[test]
    fn empty_dataset_is_rejected() {
        let mut nn = two_way();
        assert!(matches!(
            evaluate(&mut nn, &Dataset::new()),
            Err(Error::NoTrainingData)
        ));
    }

    #[test]
    fn parallel_costs_match_sequential_ones() {
        let mut rng = StdRng::seed_from_u64(5);
        let reference = two_way();
        let mut data = dataset(&reference);
        data.push(Sample::new(vec![0.9, 0.1], "b"), &reference).unwrap();

        let mut individuals: Vec<Individual> = (0..37)
            .map(|_| Individual::new(reference.clone_topology(&mut rng)))
            .collect();
        let expected: Vec<f64> = individuals
            .iter()
            .map(|i| evaluate(&mut i.network.clone(), &data).unwrap())
            .collect();

        let evaluator = FitnessEvaluator::new(Some(4)).unwrap();
        assert_eq!(evaluator.workers(), 4);
        evaluator.evaluate_all(&mut individuals, &data).unwrap();

        let costs: Vec<f64> = individuals.iter().map(|i| i.cost).collect();
        assert_eq!(costs, expected);
    }
}
