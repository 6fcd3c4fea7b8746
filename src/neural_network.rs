use crate::error::{Error, Result};
use crate::schema::NetworkSchema;
use rand::Rng;
use std::collections::HashMap;

/// Every bias and weight of a fresh network is drawn uniformly from
/// `[-INITIAL_RANGE, INITIAL_RANGE)`.
pub const INITIAL_RANGE: f64 = 1.0;

#[derive(Debug, Clone, PartialEq)]
struct Node {
    value: f64,
    bias: f64,
    weights: Vec<f64>, // One per node of the next layer
}

#[derive(Debug, Clone, PartialEq)]
struct Layer {
    nodes: Vec<Node>,
}

/// Address of a single trainable value inside a network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Parameter {
    Bias {
        layer: usize,
        node: usize,
    },
    Weight {
        layer: usize,
        node: usize,
        weight: usize,
    },
}

/// A fully connected feedforward network with labelled outputs.
///
/// Nodes are stored per layer and addressed by `(layer, node)`. Layer `i`
/// feeds layer `i + 1`, so node `(i, j)` carries one weight for every node
/// of the next layer. Biases are added by the receiving node just before
/// the sigmoid; input-layer biases are kept so every node can be addressed
/// the same way, but the input layer always holds the raw input.
///
/// Cloning produces a deep copy with identical parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct NeuralNetwork {
    layers: Vec<Layer>,  // Input layer first, output layer last
    labels: Vec<String>, // One per output node
}

impl NeuralNetwork {
    /// Builds a randomly initialised network using the thread-local RNG.
    pub fn new<S: AsRef<str>>(layer_sizes: &[usize], labels: &[S]) -> Result<Self> {
        Self::with_rng(layer_sizes, labels, &mut rand::rng())
    }

    /// Builds a randomly initialised network, drawing every parameter from `rng`.
    pub fn with_rng<S, R>(layer_sizes: &[usize], labels: &[S], rng: &mut R) -> Result<Self>
    where
        S: AsRef<str>,
        R: Rng + ?Sized,
    {
        validate_topology(layer_sizes, labels.len())?;

        let layers = layer_sizes
            .iter()
            .enumerate()
            .map(|(i, &size)| {
                let next_size = layer_sizes.get(i + 1).copied().unwrap_or(0);
                let nodes = (0..size)
                    .map(|_| Node {
                        value: 0.0,
                        bias: random_parameter(rng),
                        weights: (0..next_size).map(|_| random_parameter(rng)).collect(),
                    })
                    .collect();
                Layer { nodes }
            })
            .collect();

        Ok(NeuralNetwork {
            layers,
            labels: labels.iter().map(|l| l.as_ref().to_string()).collect(),
        })
    }

    /// A network with the same layer sizes and labels but freshly drawn parameters.
    pub fn clone_topology<R: Rng + ?Sized>(&self, rng: &mut R) -> Self {
        let mut fresh = self.clone();
        for layer in &mut fresh.layers {
            for node in &mut layer.nodes {
                node.value = 0.0;
                node.bias = random_parameter(rng);
                for weight in &mut node.weights {
                    *weight = random_parameter(rng);
                }
            }
        }
        fresh
    }

    /// Runs one forward pass and returns the output layer's values.
    ///
    /// `inputs` must hold exactly [`input_size`](Self::input_size) values in
    /// `[0, 1]`; callers validate once when data is loaded, this routine
    /// doesn't check again.
    pub fn forward(&mut self, inputs: &[f64]) -> Vec<f64> {
        debug_assert_eq!(inputs.len(), self.input_size());

        for (node, &input) in self.layers[0].nodes.iter_mut().zip(inputs) {
            node.value = input;
        }

        for layer in 1..self.layers.len() {
            let (done, rest) = self.layers.split_at_mut(layer);
            let previous = &done[layer - 1];
            for (j, node) in rest[0].nodes.iter_mut().enumerate() {
                let sum: f64 = previous
                    .nodes
                    .iter()
                    .map(|source| source.value * source.weights[j])
                    .sum();
                node.value = sigmoid(sum + node.bias);
            }
        }

        self.get_outputs()
    }

    /// Values left in the output layer by the last forward pass.
    pub fn get_outputs(&self) -> Vec<f64> {
        self.output_layer().nodes.iter().map(|n| n.value).collect()
    }

    /// Validates `inputs` and maps every output label to its activation.
    pub fn predict(&mut self, inputs: &[f64]) -> Result<HashMap<String, f64>> {
        self.check_input(inputs)?;
        let outputs = self.forward(inputs);
        Ok(self.labels.iter().cloned().zip(outputs).collect())
    }

    /// Validates `inputs` and returns the most activated label with its value.
    ///
    /// Ties go to the label listed first.
    pub fn best_label(&mut self, inputs: &[f64]) -> Result<(String, f64)> {
        self.check_input(inputs)?;
        let outputs = self.forward(inputs);

        let mut best = 0;
        for (i, &value) in outputs.iter().enumerate() {
            if value > outputs[best] {
                best = i;
            }
        }
        Ok((self.labels[best].clone(), outputs[best]))
    }

    /// Checks that `inputs` fits the input layer and lies within `[0, 1]`.
    pub fn check_input(&self, inputs: &[f64]) -> Result<()> {
        if inputs.len() != self.input_size() {
            return Err(Error::InputLengthMismatch {
                expected: self.input_size(),
                found: inputs.len(),
            });
        }
        if let Some((index, &value)) = inputs
            .iter()
            .enumerate()
            .find(|(_, v)| !(0.0..=1.0).contains(*v))
        {
            return Err(Error::InputOutOfRange { index, value });
        }
        Ok(())
    }

    pub fn parameter(&self, parameter: Parameter) -> Result<f64> {
        match parameter {
            Parameter::Bias { layer, node } => self.bias(layer, node),
            Parameter::Weight {
                layer,
                node,
                weight,
            } => self.weight(layer, node, weight),
        }
    }

    pub fn set_parameter(&mut self, parameter: Parameter, value: f64) -> Result<()> {
        match parameter {
            Parameter::Bias { layer, node } => self.set_bias(layer, node, value),
            Parameter::Weight {
                layer,
                node,
                weight,
            } => self.set_weight(layer, node, weight, value),
        }
    }

    pub fn bias(&self, layer: usize, node: usize) -> Result<f64> {
        Ok(self.node(layer, node)?.bias)
    }

    pub fn set_bias(&mut self, layer: usize, node: usize, bias: f64) -> Result<()> {
        self.node_mut(layer, node)?.bias = bias;
        Ok(())
    }

    pub fn weight(&self, layer: usize, node: usize, weight: usize) -> Result<f64> {
        self.check_weight(layer, node, weight)?;
        Ok(self.layers[layer].nodes[node].weights[weight])
    }

    pub fn set_weight(
        &mut self,
        layer: usize,
        node: usize,
        weight: usize,
        value: f64,
    ) -> Result<()> {
        self.check_weight(layer, node, weight)?;
        self.layers[layer].nodes[node].weights[weight] = value;
        Ok(())
    }

    /// Every trainable parameter, layer by layer and node by node, each
    /// node's bias before its weights.
    pub fn parameters(&self) -> impl Iterator<Item = Parameter> + '_ {
        self.layers.iter().enumerate().flat_map(|(layer, l)| {
            l.nodes.iter().enumerate().flat_map(move |(node, n)| {
                std::iter::once(Parameter::Bias { layer, node }).chain(
                    (0..n.weights.len()).map(move |weight| Parameter::Weight {
                        layer,
                        node,
                        weight,
                    }),
                )
            })
        })
    }

    pub fn parameter_count(&self) -> usize {
        self.layers
            .iter()
            .flat_map(|l| &l.nodes)
            .map(|n| 1 + n.weights.len())
            .sum()
    }

    /// Number of nodes in each layer, input layer first.
    pub fn layer_sizes(&self) -> Vec<usize> {
        self.layers.iter().map(|l| l.nodes.len()).collect()
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn input_size(&self) -> usize {
        self.layers[0].nodes.len()
    }

    pub fn output_size(&self) -> usize {
        self.output_layer().nodes.len()
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    /// True when both networks have the same layer sizes and labels.
    pub fn same_topology(&self, other: &NeuralNetwork) -> bool {
        self.labels == other.labels && self.layer_sizes() == other.layer_sizes()
    }

    pub fn schema(&self) -> NetworkSchema {
        NetworkSchema::of(self)
    }

    fn output_layer(&self) -> &Layer {
        // A network always has at least one layer.
        &self.layers[self.layers.len() - 1]
    }

    fn node(&self, layer: usize, node: usize) -> Result<&Node> {
        self.layers
            .get(layer)
            .and_then(|l| l.nodes.get(node))
            .ok_or(Error::IndexOutOfRange {
                layer,
                node,
                weight: None,
            })
    }

    fn node_mut(&mut self, layer: usize, node: usize) -> Result<&mut Node> {
        self.layers
            .get_mut(layer)
            .and_then(|l| l.nodes.get_mut(node))
            .ok_or(Error::IndexOutOfRange {
                layer,
                node,
                weight: None,
            })
    }

    fn check_weight(&self, layer: usize, node: usize, weight: usize) -> Result<()> {
        let weights = self.node(layer, node)?.weights.len();
        if layer + 1 == self.layers.len() {
            return Err(Error::NoSuchWeight { layer, node });
        }
        if weight >= weights {
            return Err(Error::IndexOutOfRange {
                layer,
                node,
                weight: Some(weight),
            });
        }
        Ok(())
    }
}

fn validate_topology(layer_sizes: &[usize], label_count: usize) -> Result<()> {
    let Some(&output_size) = layer_sizes.last() else {
        return Err(Error::InvalidTopology(
            "number of layers has to be bigger than 0".to_string(),
        ));
    };
    if let Some(layer) = layer_sizes.iter().position(|&size| size == 0) {
        return Err(Error::InvalidTopology(format!(
            "layer {layer} has no nodes"
        )));
    }
    if label_count != output_size {
        return Err(Error::InvalidTopology(format!(
            "{label_count} output labels for {output_size} output nodes"
        )));
    }
    Ok(())
}

fn random_parameter<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.random_range(-INITIAL_RANGE..INITIAL_RANGE)
}

pub(crate) fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn network(sizes: &[usize], labels: &[&str]) -> NeuralNetwork {
        let mut rng = StdRng::seed_from_u64(7);
        NeuralNetwork::with_rng(sizes, labels, &mut rng).unwrap()
    }

    #[test]
    fn rejects_malformed_topologies() {
        let empty: [&str; 0] = [];
        assert!(matches!(
            NeuralNetwork::new(&[], &empty),
            Err(Error::InvalidTopology(_))
        ));
        assert!(matches!(
            NeuralNetwork::new(&[3, 0, 2], &["a", "b"]),
            Err(Error::InvalidTopology(_))
        ));
        assert!(matches!(
            NeuralNetwork::new(&[0], &empty),
            Err(Error::InvalidTopology(_))
        ));
        assert!(matches!(
            NeuralNetwork::new(&[3, 4, 2], &["a", "b", "c"]),
            Err(Error::InvalidTopology(_))
        ));
        assert!(matches!(
            NeuralNetwork::new(&[3, 4, 2], &["a"]),
            Err(Error::InvalidTopology(_))
        ));
    }

    #[test]
    fn new_takes_owned_labels() {
        let labels = vec!["red".to_string(), "notRed".to_string()];
        let nn = NeuralNetwork::new(&[3, 2], &labels).unwrap();
        assert_eq!(nn.labels(), labels.as_slice());
        assert_eq!(nn.layer_sizes(), vec![3, 2]);
    }

    #[test]
    fn initial_parameters_stay_in_range() {
        let nn = network(&[4, 6, 3], &["a", "b", "c"]);
        assert_eq!(nn.parameter_count(), 4 * 7 + 6 * 4 + 3);
        for p in nn.parameters() {
            let value = nn.parameter(p).unwrap();
            assert!((-INITIAL_RANGE..INITIAL_RANGE).contains(&value), "{p:?} = {value}");
        }
    }

    #[test]
    fn forward_outputs_are_sigmoid_bounded() {
        let mut nn = network(&[3, 5, 4, 2], &["yes", "no"]);
        for input in [[0.0, 0.0, 0.0], [1.0, 1.0, 1.0], [0.2, 0.9, 0.4]] {
            let outputs = nn.forward(&input);
            assert_eq!(outputs.len(), 2);
            assert!(outputs.iter().all(|&v| v > 0.0 && v < 1.0), "{outputs:?}");
        }
    }

    #[test]
    fn single_layer_returns_raw_input() {
        let mut nn = network(&[3], &["r", "g", "b"]);
        assert_eq!(nn.forward(&[0.0, 0.5, 1.0]), vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn forward_is_repeatable() {
        let mut nn = network(&[3, 8, 2], &["a", "b"]);
        let first = nn.forward(&[0.3, 0.1, 0.8]);
        nn.forward(&[1.0, 0.0, 1.0]);
        let second = nn.forward(&[0.3, 0.1, 0.8]);
        assert_eq!(first, second);
    }

    #[test]
    fn forward_matches_hand_computation() {
        let mut nn = network(&[2, 1], &["out"]);
        nn.set_weight(0, 0, 0, 0.5).unwrap();
        nn.set_weight(0, 1, 0, -1.0).unwrap();
        nn.set_bias(1, 0, 0.25).unwrap();
        // Input biases don't take part in the pass.
        nn.set_bias(0, 0, 100.0).unwrap();

        let outputs = nn.forward(&[1.0, 0.5]);
        assert_eq!(outputs, vec![sigmoid(0.5 - 0.5 + 0.25)]);
    }

    #[test]
    fn parameter_access_is_bounds_checked() {
        let mut nn = network(&[2, 3, 1], &["x"]);
        assert!(nn.bias(2, 0).is_ok());
        assert!(matches!(
            nn.bias(3, 0),
            Err(Error::IndexOutOfRange { layer: 3, .. })
        ));
        assert!(matches!(
            nn.set_bias(1, 3, 0.0),
            Err(Error::IndexOutOfRange { node: 3, .. })
        ));
        assert!(matches!(
            nn.weight(0, 0, 3),
            Err(Error::IndexOutOfRange {
                weight: Some(3),
                ..
            })
        ));
        assert!(matches!(
            nn.weight(2, 0, 0),
            Err(Error::NoSuchWeight { layer: 2, node: 0 })
        ));
        assert_eq!(
            nn.weight(0, 0, 3).unwrap_err().to_string(),
            "no parameter at layer 0, node 0, weight 3"
        );
        assert_eq!(
            nn.bias(3, 0).unwrap_err().to_string(),
            "no parameter at layer 3, node 0"
        );

        let p = Parameter::Weight {
            layer: 1,
            node: 2,
            weight: 0,
        };
        nn.set_parameter(p, 0.75).unwrap();
        assert_eq!(nn.parameter(p).unwrap(), 0.75);
    }

    #[test]
    fn parameters_visit_every_value_once() {
        let nn = network(&[2, 3, 1], &["x"]);
        let all: Vec<_> = nn.parameters().collect();
        assert_eq!(all.len(), nn.parameter_count());
        assert_eq!(all[0], Parameter::Bias { layer: 0, node: 0 });
        assert_eq!(
            all[1],
            Parameter::Weight {
                layer: 0,
                node: 0,
                weight: 0
            }
        );
        assert!(all.iter().all(|&p| nn.parameter(p).is_ok()));
    }

    #[test]
    fn topology_clone_keeps_shape_but_not_values() {
        let nn = network(&[3, 4, 2], &["a", "b"]);
        let mut rng = StdRng::seed_from_u64(99);
        let fresh = nn.clone_topology(&mut rng);
        assert!(fresh.same_topology(&nn));
        assert_ne!(fresh, nn);

        let copy = nn.clone();
        assert_eq!(copy, nn);
    }

    #[test]
    fn inference_validates_and_labels_outputs() {
        let mut nn = network(&[2, 2], &["left", "right"]);
        nn.set_bias(1, 0, -5.0).unwrap();
        nn.set_bias(1, 1, 5.0).unwrap();

        let map = nn.predict(&[0.0, 0.0]).unwrap();
        assert_eq!(map.len(), 2);
        assert!(map["right"] > map["left"]);

        let (label, value) = nn.best_label(&[0.0, 0.0]).unwrap();
        assert_eq!(label, "right");
        assert_eq!(value, map["right"]);

        assert!(matches!(
            nn.predict(&[0.5]),
            Err(Error::InputLengthMismatch {
                expected: 2,
                found: 1
            })
        ));
        assert!(matches!(
            nn.best_label(&[0.5, 1.5]),
            Err(Error::InputOutOfRange { index: 1, .. })
        ));
    }
}
