use rand::Rng;
use rand_distr::{Distribution, Exp, Gamma, LogNormal, Normal, Uniform};
use serde::Deserialize;

use crate::error::ModelError;

#[derive(Debug, Clone, Copy)]
pub enum DistType {
    Constant(f64),
    Uniform(Uniform<f64>),
    Normal(Normal<f64>),
    LogNormal(LogNormal<f64>),
    Exponential(Exp<f64>),
    Gamma(Gamma<f64>),
}

/// Parameters of a scalar distribution as read from the configuration file. Only the fields
/// relevant to <code>dist_name</code> need to be present.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DistParams {
    pub dist_name: String,
    pub value: Option<f64>,
    pub mean: Option<f64>,
    pub std_dev: Option<f64>,
    pub scale: Option<f64>,
    pub shape: Option<f64>,
    pub rate: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    /// Truncate samples to whole numbers.
    pub integer: Option<bool>,
}

impl DistParams {
    pub fn constant(value: f64) -> Self {
        Self {
            dist_name: "constant".to_string(),
            value: Some(value),
            ..Default::default()
        }
    }

    pub fn uniform(min: f64, max: f64) -> Self {
        Self {
            dist_name: "uniform".to_string(),
            min: Some(min),
            max: Some(max),
            ..Default::default()
        }
    }

    pub fn integer(mut self) -> Self {
        self.integer = Some(true);
        self
    }
}

impl DistType {
    pub fn new(params: &DistParams) -> Result<Self, ModelError> {
        match params.dist_name.to_lowercase().as_str() {
            "constant" => Ok(Self::Constant(required(params.value, "value")?)),
            "uniform" => Self::build_uniform(params),
            "normal" => Self::build_normal(params),
            "lognormal" => Self::build_log_normal(params),
            "exponential" => Self::build_exponential(params),
            "gamma" => Self::build_gamma(params),
            other => Err(ModelError::UnsupportedVariant {
                model: "distribution",
                variant: other.to_string(),
            }),
        }
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match self {
            DistType::Constant(value) => *value,
            DistType::Uniform(dist) => dist.sample(rng),
            DistType::Normal(dist) => dist.sample(rng),
            DistType::LogNormal(dist) => dist.sample(rng),
            DistType::Exponential(dist) => dist.sample(rng),
            DistType::Gamma(dist) => dist.sample(rng),
        }
    }

    fn build_uniform(params: &DistParams) -> Result<Self, ModelError> {
        let min = required(params.min, "min")?;
        let max = required(params.max, "max")?;
        if !(min < max) {
            return Err(invalid("uniform", format!("min {} must be below max {}", min, max)));
        }
        Ok(Self::Uniform(Uniform::new(min, max)))
    }

    fn build_normal(params: &DistParams) -> Result<Self, ModelError> {
        let mean = required(params.mean, "mean")?;
        let std_dev = required(params.std_dev, "std_dev")?;
        Normal::new(mean, std_dev)
            .map(Self::Normal)
            .map_err(|e| invalid("normal", e.to_string()))
    }

    fn build_log_normal(params: &DistParams) -> Result<Self, ModelError> {
        let mean = required(params.mean, "mean")?;
        let std_dev = required(params.std_dev, "std_dev")?;
        LogNormal::new(mean, std_dev)
            .map(Self::LogNormal)
            .map_err(|e| invalid("lognormal", e.to_string()))
    }

    fn build_exponential(params: &DistParams) -> Result<Self, ModelError> {
        let rate = required(params.rate, "rate")?;
        Exp::new(rate)
            .map(Self::Exponential)
            .map_err(|e| invalid("exponential", e.to_string()))
    }

    fn build_gamma(params: &DistParams) -> Result<Self, ModelError> {
        let shape = required(params.shape, "shape")?;
        let scale = required(params.scale, "scale")?;
        Gamma::new(shape, scale)
            .map(Self::Gamma)
            .map_err(|e| invalid("gamma", e.to_string()))
    }
}

/// A distribution together with its post-processing, ready to be drawn from with the
/// simulation's random generator.
#[derive(Debug, Clone, Copy)]
pub struct RngSampler {
    pub dist: DistType,
    pub integer: bool,
}

impl RngSampler {
    pub fn new(params: &DistParams) -> Result<Self, ModelError> {
        Ok(Self {
            dist: DistType::new(params)?,
            integer: params.integer.unwrap_or(false),
        })
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let value = self.dist.sample(rng);
        if self.integer {
            value.floor()
        } else {
            value
        }
    }
}

fn required(value: Option<f64>, name: &'static str) -> Result<f64, ModelError> {
    value.ok_or(ModelError::MissingParameter(name))
}

fn invalid(model: &'static str, reason: String) -> ModelError {
    ModelError::InvalidParameter { model, reason }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;

    use super::*;

    #[test]
    fn integer_uniform_stays_in_range() {
        let sampler = RngSampler::new(&DistParams::uniform(5.0, 25.0).integer()).expect("valid");
        let mut rng = Pcg64Mcg::seed_from_u64(7);
        for _ in 0..500 {
            let value = sampler.sample(&mut rng);
            assert!((5.0..25.0).contains(&value));
            assert_eq!(value, value.floor());
        }
    }

    #[test]
    fn constant_ignores_rng() {
        let sampler = RngSampler::new(&DistParams::constant(3.0)).expect("valid");
        let mut rng = Pcg64Mcg::seed_from_u64(1);
        assert_eq!(sampler.sample(&mut rng), 3.0);
    }

    #[test]
    fn invalid_parameters_are_reported() {
        assert_eq!(
            DistType::new(&DistParams::uniform(4.0, 4.0)).err().map(|e| e.to_string()),
            Some("invalid parameters for uniform: min 4 must be below max 4".to_string())
        );
        let missing = DistParams {
            dist_name: "normal".to_string(),
            mean: Some(1.0),
            ..Default::default()
        };
        assert_eq!(
            DistType::new(&missing).err(),
            Some(ModelError::MissingParameter("std_dev"))
        );
        let unknown = DistParams {
            dist_name: "zipf".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            DistType::new(&unknown),
            Err(ModelError::UnsupportedVariant { .. })
        ));
    }
}
