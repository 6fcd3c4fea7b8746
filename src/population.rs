use crate::NeuralNetwork;
use rand::Rng;

/// A population member and the cost it scored in the last evaluation.
#[derive(Debug, Clone)]
pub struct Individual {
    pub network: NeuralNetwork,
    pub cost: f64,
}

impl Individual {
    /// Not yet evaluated; an infinite cost ranks it last.
    pub fn new(network: NeuralNetwork) -> Self {
        Individual {
            network,
            cost: f64::INFINITY,
        }
    }
}

/// Fixed-size set of networks sharing one topology.
#[derive(Debug, Clone)]
pub struct Population {
    individuals: Vec<Individual>,
}

impl Population {
    /// Seeds `size` members from `reference`'s topology. With
    /// `keep_reference`, slot 0 carries the reference's own parameters and
    /// the rest are freshly randomised.
    pub fn seed<R: Rng + ?Sized>(
        reference: NeuralNetwork,
        size: usize,
        keep_reference: bool,
        rng: &mut R,
    ) -> Self {
        let mut individuals = Vec::with_capacity(size);
        let first = if keep_reference {
            reference.clone()
        } else {
            reference.clone_topology(rng)
        };
        individuals.push(Individual::new(first));
        while individuals.len() < size {
            individuals.push(Individual::new(reference.clone_topology(rng)));
        }
        individuals.truncate(size);

        Population { individuals }
    }

    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    pub fn individuals_mut(&mut self) -> &mut [Individual] {
        &mut self.individuals
    }

    pub fn networks(&self) -> impl Iterator<Item = &NeuralNetwork> {
        self.individuals.iter().map(|i| &i.network)
    }

    pub fn costs(&self) -> Vec<f64> {
        self.individuals.iter().map(|i| i.cost).collect()
    }

    /// Member indices ordered from the lowest cost to the highest.
    pub fn ranked(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.individuals.len()).collect();
        order.sort_by(|&a, &b| {
            self.individuals[a]
                .cost
                .total_cmp(&self.individuals[b].cost)
        });
        order
    }

    pub fn best(&self) -> Option<&Individual> {
        self.individuals
            .iter()
            .min_by(|a, b| a.cost.total_cmp(&b.cost))
    }

    pub fn best_index(&self) -> Option<usize> {
        (0..self.individuals.len()).min_by(|&a, &b| {
            self.individuals[a]
                .cost
                .total_cmp(&self.individuals[b].cost)
        })
    }
}
