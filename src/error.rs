use thiserror::Error;

/// Everything that can go wrong while building, feeding or training networks.
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid topology: {0}")]
    InvalidTopology(String),

    #[error("no parameter at layer {layer}, node {node}{}", weight_suffix(.weight))]
    IndexOutOfRange {
        layer: usize,
        node: usize,
        weight: Option<usize>,
    },

    #[error("layer {layer} is the output layer, node {node} has no weights")]
    NoSuchWeight { layer: usize, node: usize },

    #[error("number of iterations has to be bigger than zero, got {0}")]
    InvalidIterationCount(i64),

    #[error("the training data hasn't been loaded yet")]
    NoTrainingData,

    #[error("weighted draw {draw} ran past the end of the survivor table (total weight {total})")]
    SelectionExhausted { draw: f64, total: f64 },

    #[error("breeding needs at least two survivors, got {survivors}")]
    TooFewSurvivors { survivors: usize },

    #[error("population size has to be bigger than zero, got {0}")]
    InvalidPopulationSize(usize),

    #[error("invalid trainer configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to parse trainer configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("failed to start the fitness worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),

    #[error("got {inputs} inputs but {labels} labels")]
    SampleCountMismatch { inputs: usize, labels: usize },

    #[error("expected {expected} input values, got {found}")]
    InputLengthMismatch { expected: usize, found: usize },

    #[error("input value {value} at index {index} is outside [0, 1]")]
    InputOutOfRange { index: usize, value: f64 },

    #[error("unknown output label: {0:?}")]
    UnknownLabel(String),
}

pub type Result<T> = std::result::Result<T, Error>;

fn weight_suffix(weight: &Option<usize>) -> String {
    weight.map(|w| format!(", weight {w}")).unwrap_or_default()
}
