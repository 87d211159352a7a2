use std::path::Path;

use serde::{Serialize, Deserialize};

use crate::error::{Result, SvmError};

/// Parameters for one comparison / gradient-check run on a synthetic batch.
///
/// # Fields
/// - `num_examples` — N, rows of X
/// - `feature_dim`  — D before the optional bias column
/// - `num_classes`  — C, columns of W
/// - `reg`          — L2 strength passed to the loss
/// - `weight_scale` — standard deviation used to initialise W
/// - `bias_trick`   — append a constant-1 feature to X (and a row to W)
/// - `seed`         — seed for every random draw in the run
/// - `grad_checks`  — number of W entries probed by the gradient check
/// - `grad_step`    — central-difference step h
///
/// The defaults mirror a CIFAR-10 sized development batch: 500 flattened
/// 32×32×3 images, 10 classes, W drawn at scale 1e-4.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    pub num_examples: usize,
    pub feature_dim: usize,
    pub num_classes: usize,
    pub reg: f64,
    pub weight_scale: f64,
    pub bias_trick: bool,
    pub seed: u64,
    pub grad_checks: usize,
    pub grad_step: f64,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        ExperimentConfig {
            num_examples: 500,
            feature_dim: 3072,
            num_classes: 10,
            reg: 5e-6,
            weight_scale: 1e-4,
            bias_trick: true,
            seed: 231,
            grad_checks: 10,
            grad_step: 1e-5,
        }
    }
}

impl ExperimentConfig {
    /// Number of rows of W: the feature dimension plus the bias row, if any.
    pub fn weight_rows(&self) -> usize {
        self.feature_dim + usize::from(self.bias_trick)
    }

    pub fn validate(&self) -> Result<()> {
        if self.num_examples == 0 {
            return Err(SvmError::InvalidConfig("num_examples must be at least 1".into()));
        }
        if self.weight_rows() == 0 {
            return Err(SvmError::InvalidConfig("feature_dim must be at least 1 without bias_trick".into()));
        }
        if self.num_classes == 0 {
            return Err(SvmError::InvalidConfig("num_classes must be at least 1".into()));
        }
        if !self.reg.is_finite() || self.reg < 0.0 {
            return Err(SvmError::InvalidRegularization(self.reg));
        }
        if !self.weight_scale.is_finite() || self.weight_scale < 0.0 {
            return Err(SvmError::InvalidConfig(format!("weight_scale must be >= 0, got {}", self.weight_scale)));
        }
        if !self.grad_step.is_finite() || self.grad_step <= 0.0 {
            return Err(SvmError::InvalidConfig(format!("grad_step must be > 0, got {}", self.grad_step)));
        }
        Ok(())
    }

    /// Serializes the config to a pretty-printed JSON file.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes and validates a config written by `save_json`.
    /// Missing fields fall back to their defaults.
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<ExperimentConfig> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        let config: ExperimentConfig = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        let config = ExperimentConfig::default();
        config.validate().unwrap();
        assert_eq!(config.weight_rows(), 3073);
    }

    #[test]
    fn json_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("experiment.json");
        let config = ExperimentConfig { num_examples: 7, reg: 0.25, bias_trick: false, ..Default::default() };
        config.save_json(&path).unwrap();
        assert_eq!(ExperimentConfig::load_json(&path).unwrap(), config);
    }

    #[test]
    fn partial_json_uses_defaults() {
        let config: ExperimentConfig = serde_json::from_str(r#"{ "num_classes": 3 }"#).unwrap();
        assert_eq!(config.num_classes, 3);
        assert_eq!(config.num_examples, 500);
    }

    #[test]
    fn load_rejects_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, r#"{ "num_examples": 0 }"#).unwrap();
        assert!(matches!(ExperimentConfig::load_json(&path), Err(SvmError::InvalidConfig(_))));
    }

    #[test]
    fn validate_rejects_bad_reg_and_step() {
        let neg = ExperimentConfig { reg: -0.1, ..Default::default() };
        assert!(matches!(neg.validate(), Err(SvmError::InvalidRegularization(_))));
        let step = ExperimentConfig { grad_step: 0.0, ..Default::default() };
        assert!(matches!(step.validate(), Err(SvmError::InvalidConfig(_))));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ExperimentConfig::load_json(dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, SvmError::Io(_)));
    }
}
