//! Harmonic (sine/cosine) seasonality encoding
//!
//! Seasonality is encoded as sine/cosine pairs so a log-linear model can
//! represent any phase of a cycle. The single-year fold carries the
//! fundamental and three overtones (periods 1, 1/2, 1/3 and 1/4 year); the
//! two-year fold carries one pair at half the base frequency (period 2
//! years) for alternating-year effects.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Which fold of the calendar a position is measured on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cycle {
    /// Position wraps every year; base angular frequency 2π
    FullYear,
    /// Position wraps every two years; base angular frequency π
    TwoYear,
}

impl Cycle {
    /// Angular frequency per unit of position.
    pub const fn base_frequency(&self) -> f64 {
        match self {
            Self::FullYear => 2.0 * PI,
            Self::TwoYear => PI,
        }
    }
}

/// Sine and cosine of one angle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HarmonicPair {
    /// Sine component
    pub sin: f64,
    /// Cosine component
    pub cos: f64,
}

impl HarmonicPair {
    /// Pair for the given angle in radians.
    pub fn from_angle(angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self { sin, cos }
    }
}

/// Normalized position of a record within its seasonal cycles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// `(day_of_year - 1) / density`
    pub part_of_year: f64,
    /// `part_of_year + (year mod 2)`
    pub part_of_two_years: f64,
}

impl Position {
    /// Fold a day of year onto the single- and two-year cycles.
    ///
    /// Returns `None` for a degenerate year (zero or undefined density).
    pub fn fold(day_of_year: u32, year: i32, density: f64) -> Option<Self> {
        if density.is_nan() || density <= 0.0 {
            return None;
        }
        let part_of_year = f64::from(day_of_year.saturating_sub(1)) / density;
        Some(Self {
            part_of_year,
            part_of_two_years: part_of_year + f64::from(year.rem_euclid(2)),
        })
    }
}

/// The five harmonic pairs of one record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HarmonicFeatures {
    /// Fundamental, period one year
    pub t: HarmonicPair,
    /// Period 1/2 year
    pub t2: HarmonicPair,
    /// Period 1/3 year
    pub t3: HarmonicPair,
    /// Period 1/4 year
    pub t4: HarmonicPair,
    /// Period two years, on the two-year fold
    pub half: HarmonicPair,
}

impl HarmonicFeatures {
    /// Column names, in the order of [`values`](Self::values).
    pub const COLUMNS: [&'static str; 10] = [
        "sin_t", "cos_t", "sin_2t", "cos_2t", "sin_3t", "cos_3t", "sin_4t", "cos_4t",
        "sin_half_t", "cos_half_t",
    ];

    /// Flatten into sine/cosine values.
    pub const fn values(&self) -> [f64; 10] {
        [
            self.t.sin,
            self.t.cos,
            self.t2.sin,
            self.t2.cos,
            self.t3.sin,
            self.t3.cos,
            self.t4.sin,
            self.t4.cos,
            self.half.sin,
            self.half.cos,
        ]
    }
}

/// Pure harmonic encoder.
#[derive(Debug, Clone, Copy, Default)]
pub struct HarmonicEncoder;

impl HarmonicEncoder {
    /// Integer multiples of the base frequency encoded on the single-year fold.
    pub const FULL_YEAR_MULTIPLES: [u32; 4] = [1, 2, 3, 4];

    /// One pair at `multiple` times the cycle's base frequency.
    ///
    /// NaN positions yield NaN components.
    pub fn pair(position: f64, multiple: f64, cycle: Cycle) -> HarmonicPair {
        HarmonicPair::from_angle(cycle.base_frequency() * multiple * position)
    }

    /// Pairs on the single-year fold, one per [`FULL_YEAR_MULTIPLES`](Self::FULL_YEAR_MULTIPLES).
    pub fn full_year(part_of_year: f64) -> [HarmonicPair; 4] {
        Self::FULL_YEAR_MULTIPLES
            .map(|k| Self::pair(part_of_year, f64::from(k), Cycle::FullYear))
    }

    /// The half-frequency pair on the two-year fold.
    pub fn two_year(part_of_two_years: f64) -> HarmonicPair {
        Self::pair(part_of_two_years, 1.0, Cycle::TwoYear)
    }

    /// All five pairs for a position.
    pub fn encode(position: Position) -> HarmonicFeatures {
        let [t, t2, t3, t4] = Self::full_year(position.part_of_year);
        HarmonicFeatures {
            t,
            t2,
            t3,
            t4,
            half: Self::two_year(position.part_of_two_years),
        }
    }
}
