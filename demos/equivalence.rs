/// Checks the vectorized SVM loss against the naive one on a small random
/// batch, then runs a sparse gradient check with and without regularization.
///
/// Run with:
///   cargo run --example equivalence --release
use rand::{rngs::StdRng, SeedableRng};

use ferrite_svm::{
    compare, grad_check_sparse, init_weights, svm_loss_naive, ExperimentConfig, SyntheticBatch,
};

fn main() -> ferrite_svm::Result<()> {
    let config = ExperimentConfig { num_examples: 200, feature_dim: 256, ..Default::default() };
    let mut rng = StdRng::seed_from_u64(config.seed);
    let batch = SyntheticBatch::generate(&config, &mut rng)?;
    let w = init_weights(&config, &mut rng);

    let out = svm_loss_naive(&w, &batch.x, &batch.y, 0.0)?;
    // Near-zero W puts every score close to 0, so each wrong class costs ~Δ.
    println!("loss: {:.6} (expect about {})", out.loss, config.num_classes - 1);

    for reg in [0.0, 5e1] {
        let analytic = svm_loss_naive(&w, &batch.x, &batch.y, reg)?;
        let samples = grad_check_sparse(
            |w| svm_loss_naive(w, &batch.x, &batch.y, reg).map(|o| o.loss),
            &w,
            &analytic.grad,
            5,
            config.grad_step,
            &mut rng,
        )?;
        println!("gradient check, reg = {reg}");
        for s in samples {
            println!("  numerical: {:+e} analytic: {:+e}, relative error: {:e}", s.numerical, s.analytic, s.relative_error);
        }
    }

    let report = compare(&w, &batch.x, &batch.y, config.reg)?;
    println!("{report}");
    println!("equivalent: {}", report.is_equivalent(1e-7));
    Ok(())
}
