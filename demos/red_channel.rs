use evonet::{NeuralNetwork, Trainer, TrainerConfig};
use rand::Rng;
use std::env;
use tracing_subscriber::EnvFilter;

const SAMPLES: usize = 200;
const GENERATIONS: i64 = 20; // Per report
const REPORTS: usize = 10;

// A colour counts as red when its red channel outweighs the other two twice over.
fn is_red(color: &[f64]) -> bool {
    color[0] > 2.0 * (color[1] + color[2])
}

fn random_color(rng: &mut impl Rng) -> Vec<f64> {
    vec![rng.random(), rng.random::<f64>() * 0.5, rng.random::<f64>() * 0.5]
}

fn main() -> evonet::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // An optional JSON file overrides the trainer defaults.
    let config = match env::args().nth(1) {
        Some(path) => {
            let json = std::fs::read_to_string(&path).unwrap_or_else(|err| {
                eprintln!("Could not read {}: {}", path, err);
                std::process::exit(1);
            });
            TrainerConfig::from_json(&json)?
        }
        None => TrainerConfig::default(),
    };

    let mut rng = rand::rng();
    let nn = NeuralNetwork::with_rng(&[3, 6, 2], &["red", "notRed"], &mut rng)?;
    let mut trainer = Trainer::with_config(nn, 60, config)?;

    let inputs: Vec<Vec<f64>> = (0..SAMPLES).map(|_| random_color(&mut rng)).collect();
    let labels: Vec<&str> = inputs
        .iter()
        .map(|c| if is_red(c) { "red" } else { "notRed" })
        .collect();
    trainer.load_training_data(inputs, &labels)?;

    let start = trainer.evaluate_population()?;
    println!("Generation 0: best cost {:.4}", start.best);
    for _ in 0..REPORTS {
        trainer.train(GENERATIONS)?;
        println!(
            "Generation {}: best cost {:.4}",
            trainer.generation(),
            trainer.best_cost().unwrap_or(f64::NAN)
        );
    }

    let mut correct = 0;
    for _ in 0..SAMPLES {
        let color = random_color(&mut rng);
        let (label, _) = trainer.best_label(&color)?;
        if (label == "red") == is_red(&color) {
            correct += 1;
        }
    }
    println!("Held-out accuracy: {}/{}", correct, SAMPLES);
    Ok(())
}
