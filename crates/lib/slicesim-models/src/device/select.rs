use std::cmp::Ordering;

use log::warn;
use rand::Rng;
use typed_builder::TypedBuilder;

use slicesim_core::radio::Link;

use crate::device::mobility::Point2D;
use crate::net::signal::{SignalMetrics, SignalModel};
use crate::net::slice::{Bandwidth, PoolArena, PoolId, SliceType};
use crate::net::station::AccessPoint;

/// Weights of the linear score used to rank candidates.
#[derive(Clone, Copy, Debug, PartialEq, TypedBuilder)]
pub struct ScoreWeights {
    #[builder(default = 0.7)]
    pub sinr: f64,
    #[builder(default = 0.2)]
    pub rsrp: f64,
    #[builder(default = 0.1)]
    pub bandwidth: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        ScoreWeights::builder().build()
    }
}

/// An (access point, pool) pair a node could connect through.
#[derive(Clone, Copy, Debug)]
pub struct Candidate {
    pub link: Link<SignalMetrics>,
    pub pool: PoolId,
    pub available: Bandwidth,
}

impl Candidate {
    pub fn sinr(&self) -> f64 {
        self.link.features.sinr
    }

    pub fn rsrp(&self) -> f64 {
        self.link.features.rsrp
    }

    pub fn score(&self, weights: &ScoreWeights) -> f64 {
        weights.sinr * self.sinr()
            + weights.rsrp * self.rsrp()
            + weights.bandwidth * self.available.as_f64()
    }
}

/// Outcome of evaluating every access point and pool for one node.
#[derive(Clone, Debug, Default)]
pub struct Evaluation {
    /// Candidates that passed both the signal thresholds and the admission filter, in
    /// enumeration order.
    pub candidates: Vec<Candidate>,
    /// The highest scoring pair whose signal passed but whose pool failed admission.
    pub best_rejected: Option<Candidate>,
    /// Number of access points whose signal met the slice thresholds.
    pub viable_stations: usize,
}

#[derive(Clone, Copy, Debug, TypedBuilder)]
pub struct CandidateSelector {
    #[builder(default)]
    pub weights: ScoreWeights,
    /// Share of the required bandwidth a pool must advertise to be admitted.
    #[builder(default = 0.5)]
    pub admission_ratio: f64,
}

impl Default for CandidateSelector {
    fn default() -> Self {
        CandidateSelector::builder().build()
    }
}

impl CandidateSelector {
    /// Measures every access point once and collects the admissible candidates. Access points
    /// are visited in the order given and pools in the order each access point hosts them.
    #[allow(clippy::too_many_arguments)]
    pub fn evaluate<R: Rng + ?Sized>(
        &self,
        stations: &[AccessPoint],
        pools: &PoolArena,
        model: &SignalModel,
        position: &Point2D,
        slice: SliceType,
        required: Bandwidth,
        rng: &mut R,
    ) -> Evaluation {
        let requirements = slice.requirements();
        let demand = required * self.admission_ratio;
        let mut evaluation = Evaluation::default();

        for station in stations.iter() {
            let metrics = station.evaluate(model, position, rng);
            if !requirements.check(&metrics).is_feasible() {
                continue;
            }
            evaluation.viable_stations += 1;

            for pool_id in station.hosted_pools() {
                let pool = match pools.get(pool_id) {
                    Some(pool) => pool,
                    None => {
                        warn!("Access point {} hosts unknown pool {}", station.id, pool_id);
                        continue;
                    }
                };
                if pool.slice() != slice {
                    continue;
                }

                let candidate = Candidate {
                    link: Link::builder()
                        .target(station.id)
                        .features(metrics)
                        .build(),
                    pool: *pool_id,
                    available: pool.check_available(),
                };
                if candidate.available >= demand {
                    evaluation.candidates.push(candidate);
                } else {
                    self.keep_best_rejected(&mut evaluation.best_rejected, candidate);
                }
            }
        }
        evaluation
    }

    /// Sorts the candidates by descending score. The sort is stable, so equal scores keep
    /// their enumeration order.
    pub fn rank(&self, candidates: &mut [Candidate]) {
        candidates.sort_by(|a, b| self.compare(b, a));
    }

    pub fn select(&self, mut evaluation: Evaluation) -> Option<Candidate> {
        self.rank(&mut evaluation.candidates);
        evaluation.candidates.first().copied()
    }

    fn keep_best_rejected(&self, best: &mut Option<Candidate>, candidate: Candidate) {
        let replace = match best {
            Some(current) => self.compare(&candidate, current) == Ordering::Greater,
            None => true,
        };
        if replace {
            *best = Some(candidate);
        }
    }

    #[inline]
    fn compare(&self, a: &Candidate, b: &Candidate) -> Ordering {
        a.score(&self.weights).total_cmp(&b.score(&self.weights))
    }
}

#[cfg(test)]
mod tests {
    use slicesim_core::agent::AgentId;

    use super::*;

    fn candidate(station: u64, sinr: f64, rsrp: f64, available: f64) -> Candidate {
        Candidate {
            link: Link::builder()
                .target(AgentId::from(station))
                .features(SignalMetrics {
                    sinr,
                    rsrp,
                    rssi: 0.0,
                })
                .build(),
            pool: PoolId::from(1),
            available: Bandwidth::new(available),
        }
    }

    #[test]
    fn score_is_weighted_sum() {
        let c = candidate(1, 10.0, -80.0, 50.0);
        let score = c.score(&ScoreWeights::default());
        assert!((score - (7.0 - 16.0 + 5.0)).abs() < 1e-9);
    }

    #[test]
    fn highest_score_wins() {
        let selector = CandidateSelector::default();
        // Scores 9.9 and 10.0.
        let lower = candidate(1, 0.0, 0.0, 99.0);
        let higher = candidate(2, 0.0, 0.0, 100.0);
        let evaluation = Evaluation {
            candidates: vec![lower, higher],
            ..Default::default()
        };
        let best = selector.select(evaluation).expect("two candidates");
        assert_eq!(best.link.target, AgentId::from(2));
    }

    #[test]
    fn ties_keep_enumeration_order() {
        let selector = CandidateSelector::default();
        let mut candidates = vec![
            candidate(3, 10.0, -90.0, 20.0),
            candidate(1, 10.0, -90.0, 20.0),
            candidate(2, 10.0, -90.0, 20.0),
            candidate(4, 30.0, -90.0, 20.0),
        ];
        selector.rank(&mut candidates);
        let order: Vec<u64> = candidates.iter().map(|c| c.link.target.as_u64()).collect();
        assert_eq!(order, vec![4, 3, 1, 2]);
    }

    #[test]
    fn empty_evaluation_selects_nothing() {
        assert!(CandidateSelector::default()
            .select(Evaluation::default())
            .is_none());
    }
}
