use std::fmt::{Debug, Display};
use std::ops::{Add, AddAssign, Sub};
use std::str::FromStr;

use serde::Deserialize;

/// A logical time step. Ticks are counted from zero and advance by one for every
/// pass over all agents.
#[derive(Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tick(pub u64);

impl Display for Tick {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Tick {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tick = s.parse::<u64>()?;
        Ok(Self(tick))
    }
}

impl From<u64> for Tick {
    fn from(f: u64) -> Self {
        Self(f)
    }
}

impl From<u32> for Tick {
    fn from(f: u32) -> Self {
        Self(f as u64)
    }
}

impl Tick {
    pub fn as_u64(&self) -> u64 {
        self.0
    }
    pub fn as_f64(&self) -> f64 {
        self.0 as f64
    }
}

impl Add for Tick {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Tick {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_sub(rhs.0))
    }
}

impl AddAssign for Tick {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

/// Shared state handed to every agent during a tick: stations, pools, the random
/// generator and the result writers. The scheduler calls the hooks around each pass.
pub trait Bucket: Send {
    fn initialize(&mut self, tick: Tick);
    fn before_agents(&mut self, tick: Tick);
    fn after_agents(&mut self);
    fn stream_output(&mut self);
    fn terminate(self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_arithmetic() {
        let mut now = Tick::from(3u64);
        now += Tick::from(2u64);
        assert_eq!(now, Tick(5));
        assert_eq!(now - Tick(7), Tick(0));
        assert_eq!((now + Tick(1)).as_u64(), 6);
    }
}
