//! Labour productivity damage function.
//!
//! Fractional loss follows a cumulative normal curve in WBGT (°C):
//! `loss(t) = 0.5 * (1 + erf((t - omega) / (mu * sqrt(2))))`, with `omega` the WBGT at which
//! half of productivity is lost and `mu` the spread. Each physical-intensity class has its own
//! pair. Inputs are not range-checked; NaN propagates and ±inf saturates to 0 or 1.

use std::f64::consts::SQRT_2;
use std::fmt;
use std::str::FromStr;

use ndarray::ArrayD;

/// Location and scale of the damage curve, both in °C. `mu` must be positive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageParams {
    pub omega: f64,
    pub mu: f64,
}

pub const LOW_INTENSITY: DamageParams = DamageParams { omega: 35.5, mu: 3.9 };
pub const MEDIUM_INTENSITY: DamageParams = DamageParams { omega: 33.5, mu: 3.9 };
pub const HIGH_INTENSITY: DamageParams = DamageParams { omega: 32.5, mu: 4.2 };

/// Physical workload category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ExertionClass {
    Low,
    Medium,
    High,
}

impl ExertionClass {
    pub const ALL: [ExertionClass; 3] = [Self::Low, Self::Medium, Self::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    pub fn params(&self) -> DamageParams {
        match self {
            Self::Low => LOW_INTENSITY,
            Self::Medium => MEDIUM_INTENSITY,
            Self::High => HIGH_INTENSITY,
        }
    }

    /// Name of the output layer holding this class's loss.
    pub fn variable_name(&self) -> String {
        format!("productivity_loss_{}", self.as_str())
    }

    pub fn long_name(&self) -> String {
        format!(
            "Labour productivity loss ({} physical intensity)",
            self.as_str()
        )
    }
}

impl fmt::Display for ExertionClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownExertionClass(pub String);

impl fmt::Display for UnknownExertionClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown exertion class '{}' (expected low, medium or high)", self.0)
    }
}

impl std::error::Error for UnknownExertionClass {}

impl FromStr for ExertionClass {
    type Err = UnknownExertionClass;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(UnknownExertionClass(s.to_string())),
        }
    }
}

/// Fractional productivity loss in (0, 1) at a single WBGT value.
pub fn labour_productivity_damage(wbgt: f64, params: DamageParams) -> f64 {
    0.5 * (1.0 + libm::erf((wbgt - params.omega) / (params.mu * SQRT_2)))
}

/// Element-wise damage over a whole grid. Output has the input's shape.
pub fn damage_field(wbgt: &ArrayD<f64>, params: DamageParams) -> ArrayD<f64> {
    wbgt.mapv(|t| labour_productivity_damage(t, params))
}

/// Loss expressed as "change in labour productivity" in percent (0 to -100).
pub fn productivity_change_percent(loss: f64) -> f64 {
    -100.0 * loss
}
