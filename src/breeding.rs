use crate::NeuralNetwork;
use crate::error::Result;
use rand::Rng;

/// Overwrites `child` with a crossover of `first` and `second`.
///
/// Every bias and weight is taken from either parent with equal chance and
/// then nudged by a uniform value in `[-mutation_strength, mutation_strength)`.
/// All three networks must share one topology; `child` keeps its own
/// allocation.
pub fn breed_into<R: Rng + ?Sized>(
    child: &mut NeuralNetwork,
    first: &NeuralNetwork,
    second: &NeuralNetwork,
    mutation_strength: f64,
    rng: &mut R,
) -> Result<()> {
    debug_assert!(child.same_topology(first) && child.same_topology(second));

    let parameters: Vec<_> = first.parameters().collect();
    for parameter in parameters {
        let inherited = if rng.random_bool(0.5) {
            first.parameter(parameter)?
        } else {
            second.parameter(parameter)?
        };
        let mutation = (rng.random::<f64>() * 2.0 - 1.0) * mutation_strength;
        child.set_parameter(parameter, inherited + mutation)?;
    }
    Ok(())
}
