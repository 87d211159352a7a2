use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use log::info;
use rand::{rngs::StdRng, SeedableRng};

use ferrite_svm::{
    compare, grad_check_sparse, init_weights, ExperimentConfig, Result, SvmVariant, SyntheticBatch,
};

#[derive(Parser)]
#[command(name = "ferrite-svm")]
#[command(about = "Multiclass SVM loss: check the naive and vectorized forms against each other")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run both forms on a synthetic batch and report loss/gradient differences and timings
    Compare {
        #[command(flatten)]
        run: RunArgs,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Compare the analytic gradient with central differences at random entries of W
    GradCheck {
        #[command(flatten)]
        run: RunArgs,

        /// Which form supplies the loss and the analytic gradient
        #[arg(long, value_enum, default_value = "naive")]
        variant: SvmVariant,
    },

    /// Write the default experiment config to a JSON file
    InitConfig {
        path: PathBuf,
    },
}

#[derive(clap::Args)]
struct RunArgs {
    /// Experiment config (JSON); defaults are used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the regularization strength
    #[arg(long)]
    reg: Option<f64>,

    /// Override the random seed
    #[arg(long)]
    seed: Option<u64>,
}

impl RunArgs {
    fn load(&self) -> Result<ExperimentConfig> {
        let mut config = match &self.config {
            Some(path) => ExperimentConfig::load_json(path)?,
            None => ExperimentConfig::default(),
        };
        if let Some(reg) = self.reg {
            config.reg = reg;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        config.validate()?;
        Ok(config)
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Compare { run, json } => {
            let config = run.load()?;
            let mut rng = StdRng::seed_from_u64(config.seed);
            let batch = SyntheticBatch::generate(&config, &mut rng)?;
            let w = init_weights(&config, &mut rng);

            let report = compare(&w, &batch.x, &batch.y, config.reg)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{report}");
            }
        }
        Commands::GradCheck { run, variant } => {
            let config = run.load()?;
            let mut rng = StdRng::seed_from_u64(config.seed);
            let batch = SyntheticBatch::generate(&config, &mut rng)?;
            let w = init_weights(&config, &mut rng);

            let analytic = variant.compute(&w, &batch.x, &batch.y, config.reg)?;
            info!("{} loss: {:e}", variant.name(), analytic.loss);

            let samples = grad_check_sparse(
                |w| variant.compute(w, &batch.x, &batch.y, config.reg).map(|out| out.loss),
                &w,
                &analytic.grad,
                config.grad_checks,
                config.grad_step,
                &mut rng,
            )?;
            for s in &samples {
                println!(
                    "numerical: {:+.6e} analytic: {:+.6e}, relative error: {:.6e}",
                    s.numerical, s.analytic, s.relative_error
                );
            }
        }
        Commands::InitConfig { path } => {
            ExperimentConfig::default().save_json(&path)?;
            println!("wrote {}", path.display());
        }
    }
    Ok(())
}
