use evonet::{NeuralNetwork, Trainer};
use tracing_subscriber::EnvFilter;

fn main() -> evonet::Result<()> {
    let filter = EnvFilter::from_default_env().add_directive("evonet=info".parse().unwrap());
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // 2 inputs, one hidden layer of 4 neurons, and one output per answer
    let nn = NeuralNetwork::new(&[2, 4, 2], &["0", "1"])?;
    let mut trainer = Trainer::new(nn, 100)?;

    // Training data for XOR
    let training_data = vec![
        (vec![0.0, 0.0], "0"),
        (vec![0.0, 1.0], "1"),
        (vec![1.0, 0.0], "1"),
        (vec![1.0, 1.0], "0"),
    ];
    for (inputs, expected) in &training_data {
        trainer.add_single_training_datum(inputs.clone(), expected)?;
    }

    println!("{}", trainer.schema());
    trainer.train(500)?;

    // Test the network
    for (inputs, expected) in &training_data {
        let (label, confidence) = trainer.best_label(inputs)?;
        println!(
            "Input: {:?}, Expected: {}, Got: {} ({:.4})",
            inputs, expected, label, confidence
        );
    }
    Ok(())
}
