//! Structural summary of a network, for printing and diagnostics.

use crate::NeuralNetwork;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkSchema {
    pub layer_sizes: Vec<usize>,
    pub labels: Vec<String>,
}

impl NetworkSchema {
    pub fn of(network: &NeuralNetwork) -> Self {
        NetworkSchema {
            layer_sizes: network.layer_sizes(),
            labels: network.labels().to_vec(),
        }
    }

    pub fn layer_count(&self) -> usize {
        self.layer_sizes.len()
    }
}

impl fmt::Display for NetworkSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "<========================>")?;
        writeln!(f, " A neural network schema:")?;
        for (i, nodes) in self.layer_sizes.iter().enumerate() {
            writeln!(f, " Layer {i}: {nodes} nodes")?;
        }
        writeln!(f, " Outputs: {}", self.labels.join(", "))?;
        write!(f, "<========================>")
    }
}
