//! Large-scale signal model used to score the link between an access point and a mobile node.
//!
//! Path loss follows the 3GPP urban macro model with a line-of-sight regime below the
//! breakpoint distance and a non-line-of-sight regime at or beyond it. Interference is a fixed
//! level rather than a sum over neighbouring cells.

use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::Deserialize;

use slicesim_core::metrics::{Metric, MetricSettings};
use slicesim_core::radio::LinkFeatures;

use crate::device::mobility::Point2D;
use crate::error::ModelError;

pub const SPEED_OF_LIGHT: f64 = 3e8;
pub const BOLTZMANN_CONST: f64 = 1.380649e-23;
pub const TEMPERATURE_K: f64 = 290.0;
pub const NOISE_FIGURE_DB: f64 = 5.0;
pub const NOISE_BANDWIDTH_HZ: f64 = 10e6;
pub const INTERFERENCE_DBM: f64 = -90.0;
pub const UE_HEIGHT_M: f64 = 1.5;
pub const SHADOWING_STD_DEV_DB: f64 = 8.0;

pub const FREQUENCY_LOW_BAND: f64 = 600e6;
pub const FREQUENCY_MMWAVE: f64 = 28e9;

/// Thermal noise over the channel bandwidth plus the receiver noise figure, in dBm.
pub fn noise_power_dbm() -> f64 {
    let noise_watts = BOLTZMANN_CONST * TEMPERATURE_K * NOISE_BANDWIDTH_HZ;
    10.0 * (noise_watts / 1e-3).log10() + NOISE_FIGURE_DB
}

/// Power sum of dBm values, in dBm.
fn sum_dbm(levels: &[f64]) -> f64 {
    10.0 * levels
        .iter()
        .map(|level| 10f64.powf(level / 10.0))
        .sum::<f64>()
        .log10()
}

pub fn breakpoint_distance(bs_height: f64, ue_height: f64, frequency: f64) -> f64 {
    4.0 * (bs_height - 1.0) * (ue_height - 1.0) * frequency / SPEED_OF_LIGHT
}

/// Urban macro path loss in dB. Only <code>distance < dBP</code> is line of sight.
pub fn urban_macro_path_loss(distance: f64, bs_height: f64, ue_height: f64, frequency: f64) -> f64 {
    let d_bp = breakpoint_distance(bs_height, ue_height, frequency);
    let frequency_term = 20.0 * (frequency / 1e9).log10();
    if distance < d_bp {
        28.0 + 22.0 * distance.log10() + frequency_term
    } else {
        28.0 + 40.0 * distance.log10() + frequency_term
            - 9.0 * (d_bp.powi(2) + distance.powi(2)).log10()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
pub struct SignalMetrics {
    pub sinr: f64,
    pub rsrp: f64,
    pub rssi: f64,
}

impl Metric for SignalMetrics {}

impl LinkFeatures for SignalMetrics {}

impl SignalMetrics {
    /// Metrics of a link that can never carry a connection.
    pub fn unreachable() -> Self {
        Self {
            sinr: f64::NEG_INFINITY,
            rsrp: f64::NEG_INFINITY,
            rssi: f64::NEG_INFINITY,
        }
    }
}

/// Transmitter side of a link.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RadioSite {
    pub position: Point2D,
    pub height: f64,
    pub frequency: f64,
    pub power: f64,
    pub antenna_gain: f64,
}

#[serde_with::skip_serializing_none]
#[derive(Deserialize, Debug, Clone)]
pub struct ShadowingSettings {
    pub variant: String,
    pub std_dev: Option<f64>,
}

impl MetricSettings for ShadowingSettings {}

impl Default for ShadowingSettings {
    fn default() -> Self {
        Self {
            variant: "gaussian".to_string(),
            std_dev: Some(SHADOWING_STD_DEV_DB),
        }
    }
}

/// Log-normal shadowing, drawn fresh for every evaluation.
#[derive(Clone, Copy, Debug)]
pub enum Shadowing {
    Gaussian(Normal<f64>),
    Disabled,
}

impl Shadowing {
    pub fn with_settings(settings: &ShadowingSettings) -> Result<Self, ModelError> {
        match settings.variant.to_lowercase().as_str() {
            "gaussian" => {
                let std_dev = settings.std_dev.unwrap_or(SHADOWING_STD_DEV_DB);
                let normal =
                    Normal::new(0.0, std_dev).map_err(|e| ModelError::InvalidParameter {
                        model: "shadowing",
                        reason: e.to_string(),
                    })?;
                Ok(Shadowing::Gaussian(normal))
            }
            "disabled" | "none" => Ok(Shadowing::Disabled),
            _ => Err(ModelError::UnsupportedVariant {
                model: "shadowing",
                variant: settings.variant.clone(),
            }),
        }
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match self {
            Shadowing::Gaussian(normal) => normal.sample(rng),
            Shadowing::Disabled => 0.0,
        }
    }
}

#[derive(Clone, Debug)]
pub struct SignalModel {
    shadowing: Shadowing,
    interference_dbm: f64,
    ue_height: f64,
    noise_dbm: f64,
    impairment_dbm: f64,
}

impl Default for SignalModel {
    fn default() -> Self {
        let shadowing = Normal::new(0.0, SHADOWING_STD_DEV_DB)
            .map(Shadowing::Gaussian)
            .unwrap_or(Shadowing::Disabled);
        Self::new(shadowing, INTERFERENCE_DBM, UE_HEIGHT_M)
    }
}

impl SignalModel {
    pub fn new(shadowing: Shadowing, interference_dbm: f64, ue_height: f64) -> Self {
        let noise_dbm = noise_power_dbm();
        Self {
            shadowing,
            interference_dbm,
            ue_height,
            noise_dbm,
            impairment_dbm: sum_dbm(&[interference_dbm, noise_dbm]),
        }
    }

    /// A model without shadowing, so that the same geometry always gives the same metrics.
    pub fn deterministic() -> Self {
        Self::new(Shadowing::Disabled, INTERFERENCE_DBM, UE_HEIGHT_M)
    }

    pub fn noise_dbm(&self) -> f64 {
        self.noise_dbm
    }

    pub fn compute_metrics<R: Rng + ?Sized>(
        &self,
        site: &RadioSite,
        ue_position: &Point2D,
        rng: &mut R,
    ) -> SignalMetrics {
        let distance = site.position.distance_to(ue_position);

        if distance == 0.0 {
            let rsrp = site.power;
            return SignalMetrics {
                sinr: rsrp - self.noise_dbm,
                rsrp,
                rssi: self.rssi_of(rsrp),
            };
        }

        let path_loss = urban_macro_path_loss(distance, site.height, self.ue_height, site.frequency);
        if !path_loss.is_finite() {
            return SignalMetrics::unreachable();
        }

        let shadowing = self.shadowing.sample(rng);
        let rsrp = site.power - path_loss + site.antenna_gain - shadowing;
        if !rsrp.is_finite() {
            return SignalMetrics::unreachable();
        }
        SignalMetrics {
            sinr: rsrp - self.impairment_dbm,
            rsrp,
            rssi: self.rssi_of(rsrp),
        }
    }

    #[inline]
    fn rssi_of(&self, rsrp: f64) -> f64 {
        sum_dbm(&[rsrp, self.interference_dbm, self.noise_dbm])
    }
}

#[cfg(test)]
mod tests {
    use rand_pcg::Pcg64Mcg;

    use super::*;

    fn low_band_site() -> RadioSite {
        RadioSite {
            position: Point2D::new(0.0, 0.0),
            height: 25.0,
            frequency: FREQUENCY_LOW_BAND,
            power: 40.0,
            antenna_gain: 10.0,
        }
    }

    #[test]
    fn noise_floor_for_ten_megahertz() {
        let noise = noise_power_dbm();
        assert!((noise - (-98.98)).abs() < 0.01, "noise was {}", noise);
    }

    #[test]
    fn zero_distance_uses_transmit_power() {
        let model = SignalModel::default();
        let mut rng = Pcg64Mcg::new(3);
        let metrics = model.compute_metrics(&low_band_site(), &Point2D::new(0.0, 0.0), &mut rng);
        assert_eq!(metrics.rsrp, 40.0);
        assert_eq!(metrics.sinr, 40.0 - model.noise_dbm());
    }

    #[test]
    fn breakpoint_switches_to_nlos() {
        let d_bp = breakpoint_distance(25.0, UE_HEIGHT_M, FREQUENCY_LOW_BAND);
        assert_eq!(d_bp, 96.0);

        let f_term = 20.0 * (FREQUENCY_LOW_BAND / 1e9).log10();
        let nlos = 28.0 + 40.0 * d_bp.log10() + f_term - 9.0 * (2.0 * d_bp * d_bp).log10();
        let at_bp = urban_macro_path_loss(d_bp, 25.0, UE_HEIGHT_M, FREQUENCY_LOW_BAND);
        assert!((at_bp - nlos).abs() < 1e-9);

        let below: f64 = 95.5;
        let los = 28.0 + 22.0 * below.log10() + f_term;
        let below_bp = urban_macro_path_loss(below, 25.0, UE_HEIGHT_M, FREQUENCY_LOW_BAND);
        assert!((below_bp - los).abs() < 1e-9);
    }

    #[test]
    fn metrics_without_shadowing_are_repeatable() {
        let model = SignalModel::deterministic();
        let mut rng = Pcg64Mcg::new(11);
        let ue = Point2D::new(300.0, 400.0);
        let first = model.compute_metrics(&low_band_site(), &ue, &mut rng);
        let second = model.compute_metrics(&low_band_site(), &ue, &mut rng);
        assert_eq!(first, second);

        let path_loss = urban_macro_path_loss(500.0, 25.0, UE_HEIGHT_M, FREQUENCY_LOW_BAND);
        assert!((first.rsrp - (40.0 - path_loss + 10.0)).abs() < 1e-9);
        assert!(first.sinr < first.rsrp - model.noise_dbm());
        assert!(first.rssi > first.rsrp);
    }

    #[test]
    fn shadowing_draws_independent_samples() {
        let model = SignalModel::default();
        let mut rng = Pcg64Mcg::new(5);
        let ue = Point2D::new(200.0, 0.0);
        let first = model.compute_metrics(&low_band_site(), &ue, &mut rng);
        let second = model.compute_metrics(&low_band_site(), &ue, &mut rng);
        assert_ne!(first.rsrp, second.rsrp);
    }

    #[test]
    fn invalid_frequency_is_unreachable() {
        let model = SignalModel::deterministic();
        let mut rng = Pcg64Mcg::new(5);
        let mut site = low_band_site();
        site.frequency = 0.0;
        let metrics = model.compute_metrics(&site, &Point2D::new(10.0, 0.0), &mut rng);
        assert_eq!(metrics.rsrp, f64::NEG_INFINITY);
        assert_eq!(metrics.sinr, f64::NEG_INFINITY);
    }

    #[test]
    fn shadowing_settings_variants() {
        let disabled = ShadowingSettings {
            variant: "Disabled".to_string(),
            std_dev: None,
        };
        assert!(matches!(
            Shadowing::with_settings(&disabled),
            Ok(Shadowing::Disabled)
        ));
        assert!(matches!(
            Shadowing::with_settings(&ShadowingSettings::default()),
            Ok(Shadowing::Gaussian(_))
        ));
        let unknown = ShadowingSettings {
            variant: "rayleigh".to_string(),
            std_dev: None,
        };
        assert!(Shadowing::with_settings(&unknown).is_err());
    }
}
