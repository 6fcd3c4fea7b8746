//! Labelled training samples, validated once when they are loaded.

use crate::NeuralNetwork;
use crate::error::{Error, Result};

/// One input vector and the label the network should pick for it.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub input: Vec<f64>,
    pub label: String,
}

impl Sample {
    pub fn new(input: Vec<f64>, label: impl Into<String>) -> Self {
        Sample {
            input,
            label: label.into(),
        }
    }

    /// Checks the input against the network's input layer and the label
    /// against its output labels.
    pub fn validate_for(&self, network: &NeuralNetwork) -> Result<()> {
        network.check_input(&self.input)?;
        if !network.has_label(&self.label) {
            return Err(Error::UnknownLabel(self.label.clone()));
        }
        Ok(())
    }
}

/// Samples shared read-only by every network during an evaluation pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    samples: Vec<Sample>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pairs `inputs[i]` with `labels[i]`, checking every sample against `network`.
    pub fn from_parts<S: AsRef<str>>(
        inputs: Vec<Vec<f64>>,
        labels: &[S],
        network: &NeuralNetwork,
    ) -> Result<Self> {
        if inputs.len() != labels.len() {
            return Err(Error::SampleCountMismatch {
                inputs: inputs.len(),
                labels: labels.len(),
            });
        }

        let samples = inputs
            .into_iter()
            .zip(labels)
            .map(|(input, label)| -> Result<Sample> {
                let sample = Sample::new(input, label.as_ref());
                sample.validate_for(network)?;
                Ok(sample)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Dataset { samples })
    }

    /// Validates and appends one sample.
    pub fn push(&mut self, sample: Sample, network: &NeuralNetwork) -> Result<()> {
        sample.validate_for(network)?;
        self.samples.push(sample);
        Ok(())
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}
