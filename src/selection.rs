//! Cost-biased selection: rank `i` is drawn with weight `w^i`, so the best
//! networks are the most likely to survive and to breed.

use crate::config::TrainerConfig;
use crate::error::{Error, Result};
use crate::population::{Individual, Population};
use rand::Rng;
use tracing::trace;

/// Running totals of per-entry weights, walked to turn a uniform draw into
/// an index.
#[derive(Debug, Clone)]
pub struct WeightedTable {
    weights: Vec<f64>,
    cumulative: Vec<f64>,
}

impl WeightedTable {
    pub fn new(weights: impl IntoIterator<Item = f64>) -> Self {
        let weights: Vec<f64> = weights.into_iter().collect();
        let mut total = 0.0;
        let cumulative = weights
            .iter()
            .map(|w| {
                total += w;
                total
            })
            .collect();
        WeightedTable {
            weights,
            cumulative,
        }
    }

    /// Weights `survivor_weight^rank` for ranks `0..len`.
    pub fn geometric(len: usize, survivor_weight: f64) -> Self {
        Self::new((0..len).map(|rank| survivor_weight.powi(rank as i32)))
    }

    pub fn len(&self) -> usize {
        self.cumulative.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cumulative.is_empty()
    }

    /// Weight of a single entry, as given to [`new`](Self::new).
    pub fn weight(&self, index: usize) -> Option<f64> {
        self.weights.get(index).copied()
    }

    pub fn total(&self) -> f64 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    /// First index whose cumulative weight meets or exceeds `draw`.
    pub fn index_for(&self, draw: f64) -> Result<usize> {
        self.cumulative
            .iter()
            .position(|&weight| draw <= weight)
            .ok_or(Error::SelectionExhausted {
                draw,
                total: self.total(),
            })
    }

    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<usize> {
        self.index_for(rng.random::<f64>() * self.total())
    }
}

/// Picks `config.survivor_count(population.len())` members, weighted
/// towards low cost and without replacement, and returns deep copies of
/// them ordered from the lowest cost to the highest.
///
/// Before the draw each of the top `kill_window` ranks may be dropped with
/// `kill_probability`, as long as enough candidates remain.
pub fn select_survivors<R: Rng + ?Sized>(
    population: &Population,
    config: &TrainerConfig,
    rng: &mut R,
) -> Result<Vec<Individual>> {
    let wanted = config.survivor_count(population.len());

    // (rank, member index) pairs still eligible.
    let mut candidates: Vec<(usize, usize)> =
        population.ranked().into_iter().enumerate().collect();

    for rank in 0..config.kill_window {
        if candidates.len() <= wanted {
            break;
        }
        if rng.random_bool(config.kill_probability) {
            if let Some(position) = candidates.iter().position(|&(r, _)| r == rank) {
                trace!(rank, "skipping top network");
                candidates.remove(position);
            }
        }
    }

    let mut survivors = Vec::with_capacity(wanted);
    while survivors.len() < wanted {
        let table = WeightedTable::new(
            candidates
                .iter()
                .map(|&(rank, _)| config.survivor_weight.powi(rank as i32)),
        );
        let picked = table.draw(rng)?;
        let (rank, index) = candidates.remove(picked);
        trace!(rank, "survivor picked");
        survivors.push((rank, population.individuals()[index].clone()));
    }

    survivors.sort_by_key(|&(rank, _)| rank);
    Ok(survivors.into_iter().map(|(_, individual)| individual).collect())
}

/// Draws two different survivor indices, favouring the front of the list.
///
/// The second parent comes from a table without the first one, so the pair
/// is found in two draws however lopsided the weights are.
pub fn pick_parents<R: Rng + ?Sized>(
    table: &WeightedTable,
    rng: &mut R,
) -> Result<(usize, usize)> {
    if table.len() < 2 {
        return Err(Error::TooFewSurvivors {
            survivors: table.len(),
        });
    }
    let first = table.draw(rng)?;

    let others: Vec<usize> = (0..table.len()).filter(|&i| i != first).collect();
    let rest = WeightedTable::new(others.iter().map(|&i| table.weights[i]));
    let second = if rest.total() > 0.0 {
        others[rest.draw(rng)?]
    } else {
        // Every remaining weight underflowed to zero.
        others[rng.random_range(0..others.len())]
    };
    Ok((first, second))
}
