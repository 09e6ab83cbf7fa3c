/// A measurable radio quantity such as bandwidth.
pub trait Metric: Default + PartialEq + PartialOrd + Copy + Clone + Send + Sync {}

/// Outcome of asking a resource for some amount, carrying the measured value either way.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Feasibility<M>
where
    M: Metric,
{
    Feasible(M),
    Infeasible(M),
}

impl<M> Feasibility<M>
where
    M: Metric,
{
    pub fn is_feasible(&self) -> bool {
        matches!(self, Feasibility::Feasible(_))
    }

    pub fn value(&self) -> M {
        match self {
            Feasibility::Feasible(m) | Feasibility::Infeasible(m) => *m,
        }
    }
}

/// Settings a <code>Resource</code> is built from.
pub trait MetricSettings {}

/// A consumable that stays debited until the consumer releases it.
///
/// <code>consume</code> returns the granted amount when feasible and the advertised
/// availability when the request is refused.
pub trait Resource<M>: Clone + Send + Sync
where
    M: Metric,
{
    type S: MetricSettings;
    type E: std::error::Error;
    fn with_settings(settings: &Self::S) -> Self;
    fn consume(&mut self, request: M) -> Feasibility<M>;
    fn release(&mut self, amount: M) -> Result<(), Self::E>;
    fn available(&self) -> M;
}
