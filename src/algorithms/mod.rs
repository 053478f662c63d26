pub mod eller;
pub use eller::{EllerGenerator, Generation, Snapshot};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dims::Dims;

/// Random number generator used for anything, where determinism is required.
pub type Random = rand_xoshiro::Xoshiro256StarStar;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum GenerationError {
    #[error("invalid maze size {0:?}, both dimensions must be positive")]
    InvalidSize(Dims),
    #[error("invalid {name} of {value}, outside the accepted range")]
    InvalidProbability { name: &'static str, value: f64 },
}

/// Tuning knobs of the Eller generator.
///
/// Both values are checked up front: `join_probability` must lie in
/// `[0, 1]` and `connect_probability` in `(0, 1]`, since a connect
/// probability of zero would retry the downward-connection pass forever.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EllerConfig {
    pub join_probability: f64,
    pub connect_probability: f64,
}

impl Default for EllerConfig {
    fn default() -> Self {
        Self {
            join_probability: 0.5,
            connect_probability: 0.2,
        }
    }
}

impl EllerConfig {
    pub fn validate(&self) -> Result<(), GenerationError> {
        if !(0.0..=1.0).contains(&self.join_probability) {
            return Err(GenerationError::InvalidProbability {
                name: "join probability",
                value: self.join_probability,
            });
        }

        if self.connect_probability <= 0.0 || self.connect_probability > 1.0 {
            return Err(GenerationError::InvalidProbability {
                name: "connect probability",
                value: self.connect_probability,
            });
        }

        Ok(())
    }
}
