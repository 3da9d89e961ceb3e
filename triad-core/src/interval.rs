//! Closed-open interval arithmetic over the extended reals.
//!
//! An [`Interval`] `[start, end)` bounds a hidden attribute value. Intervals are
//! `Copy` values; every operation returns a new interval.

use core::fmt;
use core::ops::{Add, Neg, Sub};

use thiserror::Error;
use triad_types::TriadError;

/// Context-free arithmetic failure.
///
/// The replay engine attaches player and attribute context before surfacing it
/// as [`TriadError::ImpossibleInterval`].
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum IntervalError {
    /// Bounds do not describe a non-empty range.
    #[error("impossible interval: {start} > {end}")]
    Impossible {
        /// Requested lower bound.
        start: f64,
        /// Requested upper bound.
        end: f64,
    },

    /// Two intervals share no point.
    #[error("no intersection between {left} and {right}")]
    Disjoint {
        /// Left operand.
        left: Interval,
        /// Right operand.
        right: Interval,
    },

    /// Median requested for a half-infinite interval.
    #[error("no median exists for infinite interval {0}")]
    NoMedian(Interval),
}

impl From<IntervalError> for TriadError {
    fn from(e: IntervalError) -> Self {
        match e {
            IntervalError::NoMedian(i) => Self::NoMedian {
                interval: i.to_string(),
            },
            other => Self::Data(other.to_string()),
        }
    }
}

/// A range `[start, end)` with `start <= end`; either bound may be infinite.
///
/// A degenerate interval `[x, x]` denotes the single point `x`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    start: f64,
    end: f64,
}

impl Interval {
    /// The attribute domain `[0, +inf)`.
    pub const DOMAIN: Self = Self {
        start: 0.0,
        end: f64::INFINITY,
    };

    /// The whole extended real line.
    pub const UNBOUNDED: Self = Self {
        start: f64::NEG_INFINITY,
        end: f64::INFINITY,
    };

    /// Half-width of the interval implied by one star rating.
    pub const RATING_HALF_WIDTH: f64 = 12.5;

    /// Attribute points represented by one star.
    pub const POINTS_PER_STAR: f64 = 25.0;

    /// Build an interval, rejecting `start > end` and NaN bounds.
    ///
    /// # Errors
    /// Returns `IntervalError::Impossible` when the bounds are inverted.
    pub fn new(start: f64, end: f64) -> Result<Self, IntervalError> {
        if start.is_nan() || end.is_nan() || start > end {
            return Err(IntervalError::Impossible { start, end });
        }
        Ok(Self { start, end })
    }

    /// A degenerate interval holding exactly `x`.
    ///
    /// # Errors
    /// Returns `IntervalError::Impossible` when `x` is NaN.
    pub fn point(x: f64) -> Result<Self, IntervalError> {
        Self::new(x, x)
    }

    /// Interval implied by a star rating: `[25r - 12.5, 25r + 12.5)` clipped to the domain.
    #[must_use]
    pub fn from_rating(rating: u32) -> Self {
        let center = f64::from(rating) * Self::POINTS_PER_STAR;
        Self {
            start: (center - Self::RATING_HALF_WIDTH).max(0.0),
            end: center + Self::RATING_HALF_WIDTH,
        }
    }

    /// Lower bound (inclusive).
    #[must_use]
    pub const fn start(&self) -> f64 {
        self.start
    }

    /// Upper bound (exclusive unless the interval is a point).
    #[must_use]
    pub const fn end(&self) -> f64 {
        self.end
    }

    /// `end - start`.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.end - self.start
    }

    /// Whether `x` lies in the interval.
    #[must_use]
    pub fn contains(&self, x: f64) -> bool {
        if self.start == self.end {
            return x == self.start;
        }
        self.start <= x && x < self.end
    }

    /// Whether every point of `self` lies in `other`.
    #[must_use]
    pub fn is_subset_of(&self, other: &Self) -> bool {
        other.start <= self.start && self.end <= other.end
    }

    /// Midpoint of the interval.
    ///
    /// # Errors
    /// Returns `IntervalError::NoMedian` when exactly one bound is infinite.
    pub fn median(&self) -> Result<f64, IntervalError> {
        match (self.start.is_infinite(), self.end.is_infinite()) {
            (true, true) => Ok(0.0),
            (false, false) => Ok((self.start + self.end) / 2.0),
            _ => Err(IntervalError::NoMedian(*self)),
        }
    }

    /// Half-width, or `+inf` when unbounded.
    #[must_use]
    pub fn uncertainty(&self) -> f64 {
        if self.start.is_infinite() || self.end.is_infinite() {
            f64::INFINITY
        } else {
            (self.end - self.start) / 2.0
        }
    }

    /// Rendered cell value `"{median} ± {uncertainty}"`.
    ///
    /// # Errors
    /// Returns `IntervalError::NoMedian` for half-infinite intervals.
    pub fn value(&self) -> Result<String, IntervalError> {
        Ok(format!("{} ± {}", self.median()?, self.uncertainty()))
    }

    /// Shift both bounds by `delta`.
    #[must_use]
    pub fn translate(self, delta: f64) -> Self {
        Self {
            start: self.start + delta,
            end: self.end + delta,
        }
    }

    /// Add `other`'s bounds elementwise.
    #[must_use]
    pub fn translate_by(self, other: Self) -> Self {
        Self {
            start: self.start + other.start,
            end: self.end + other.end,
        }
    }

    /// The tightest interval consistent with both operands.
    ///
    /// Touching intervals such as `[37.5, 62.5)` and `[62.5, 87.5)` share no
    /// point and are rejected.
    ///
    /// # Errors
    /// Returns `IntervalError::Disjoint` when the operands share no point.
    pub fn intersect(self, other: Self) -> Result<Self, IntervalError> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        let disjoint = start > end
            || (start == end && !(self.contains(start) && other.contains(start)));
        if disjoint {
            return Err(IntervalError::Disjoint {
                left: self,
                right: other,
            });
        }
        Ok(Self { start, end })
    }

    /// The hull of both operands.
    #[must_use]
    pub fn union(self, other: Self) -> Self {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

impl Default for Interval {
    fn default() -> Self {
        Self::DOMAIN
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

impl Neg for Interval {
    type Output = Self;

    fn neg(self) -> Self {
        Self {
            start: -self.end,
            end: -self.start,
        }
    }
}

impl Add for Interval {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        self.translate_by(rhs)
    }
}

impl Sub for Interval {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        self.translate_by(-rhs)
    }
}

impl Add<f64> for Interval {
    type Output = Self;

    fn add(self, rhs: f64) -> Self {
        self.translate(rhs)
    }
}

impl Sub<f64> for Interval {
    type Output = Self;

    fn sub(self, rhs: f64) -> Self {
        self.translate(-rhs)
    }
}
