//! Exact rational arithmetic for tick values.
//!
//! All musical time in the engine is a `Fraction` of ticks. Summing many
//! short durations in floating point drifts; fractions do not. Values are
//! *not* reduced on construction (`2/4` stays `2/4`) but compare equal to
//! their reduced forms by cross-multiplication.
//!
//! Operators return new values. The `*Assign` operators are the
//! accumulator form used by voices and the timeline builder.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, MulAssign, Sub, SubAssign};
use std::str::FromStr;

use serde::Serialize;

use crate::error::{FormatError, Result};

/// Tolerance used when a fraction is compared to a plain number.
const VALUE_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Fraction {
    pub numerator: i64,
    pub denominator: i64,
}

impl Fraction {
    pub const ZERO: Fraction = Fraction { numerator: 0, denominator: 1 };
    pub const ONE: Fraction = Fraction { numerator: 1, denominator: 1 };

    /// Create a fraction. The denominator must be non-zero.
    pub fn new(numerator: i64, denominator: i64) -> Result<Self> {
        if denominator == 0 {
            return Err(FormatError::BadArguments(format!(
                "fraction denominator must be non-zero: {numerator}/0"
            )));
        }
        Ok(Self { numerator, denominator })
    }

    /// A whole number of ticks.
    pub const fn from_integer(value: i64) -> Self {
        Self { numerator: value, denominator: 1 }
    }

    /// Floating-point value. Only for layout math, never for time keeping.
    pub fn value(&self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }

    /// Reduced form with a positive denominator.
    pub fn simplify(&self) -> Self {
        let (mut n, mut d) = (self.numerator, self.denominator);
        if d < 0 {
            n = -n;
            d = -d;
        }
        let g = Self::gcd(n, d);
        if g > 1 {
            n /= g;
            d /= g;
        }
        Self { numerator: n, denominator: d }
    }

    pub fn is_zero(&self) -> bool {
        self.numerator == 0
    }

    // ── Named arithmetic ────────────────────────────────────────────

    pub fn add(&self, other: Fraction) -> Fraction {
        *self + other
    }

    pub fn subtract(&self, other: Fraction) -> Fraction {
        *self - other
    }

    pub fn multiply(&self, other: Fraction) -> Fraction {
        *self * other
    }

    /// Divide by `other`; fails when `other` is zero.
    pub fn divide(&self, other: Fraction) -> Result<Fraction> {
        if other.numerator == 0 {
            return Err(FormatError::BadArguments(format!("division of {self} by zero")));
        }
        Fraction::new(
            self.numerator * other.denominator,
            self.denominator * other.numerator,
        )
    }

    // ── Comparison ──────────────────────────────────────────────────

    /// Cross-product equality: `1/2` equals `2/4`.
    pub fn equals(&self, other: &Fraction) -> bool {
        self.cross(other) == Ordering::Equal
    }

    /// Compare against a plain number with a small tolerance.
    pub fn equals_value(&self, value: f64) -> bool {
        (self.value() - value).abs() < VALUE_EPSILON
    }

    pub fn greater_than(&self, other: &Fraction) -> bool {
        self.cross(other) == Ordering::Greater
    }

    pub fn less_than(&self, other: &Fraction) -> bool {
        self.cross(other) == Ordering::Less
    }

    pub fn greater_than_equals(&self, other: &Fraction) -> bool {
        self.equals(other) || self.greater_than(other)
    }

    pub fn less_than_equals(&self, other: &Fraction) -> bool {
        self.equals(other) || self.less_than(other)
    }

    fn cross(&self, other: &Fraction) -> Ordering {
        let (an, ad) = sign_normalized(self.numerator, self.denominator);
        let (bn, bd) = sign_normalized(other.numerator, other.denominator);
        (an * bd).cmp(&(bn * ad))
    }

    // ── Statics ─────────────────────────────────────────────────────

    /// Greatest common divisor. Returns the non-zero operand when the
    /// other is zero, so `gcd(0, 0) == 0`.
    pub fn gcd(a: i64, b: i64) -> i64 {
        let (mut a, mut b) = (a.abs(), b.abs());
        if a == 0 {
            return b;
        }
        if b == 0 {
            return a;
        }
        while b != 0 {
            let t = b;
            b = a % b;
            a = t;
        }
        a
    }

    /// Least common multiple of two values.
    pub fn lcm(a: i64, b: i64) -> i64 {
        let g = Self::gcd(a, b);
        if g == 0 {
            return 0;
        }
        (a / g * b).abs()
    }

    /// Least common multiple of a list: 0 when empty, the element itself
    /// for a single entry.
    pub fn lcmm(values: &[i64]) -> i64 {
        match values {
            [] => 0,
            [only] => *only,
            [first, rest @ ..] => rest.iter().fold(*first, |acc, &v| Self::lcm(acc, v)),
        }
    }
}

fn sign_normalized(n: i64, d: i64) -> (i128, i128) {
    if d < 0 {
        (-(n as i128), -(d as i128))
    } else {
        (n as i128, d as i128)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Operators
// ═══════════════════════════════════════════════════════════════════════

impl Add for Fraction {
    type Output = Fraction;

    fn add(self, rhs: Fraction) -> Fraction {
        if self.denominator == rhs.denominator {
            return Fraction {
                numerator: self.numerator + rhs.numerator,
                denominator: self.denominator,
            };
        }
        let lcm = Fraction::lcm(self.denominator, rhs.denominator);
        let (a, b) = (lcm / self.denominator, lcm / rhs.denominator);
        Fraction {
            numerator: self.numerator * a + rhs.numerator * b,
            denominator: lcm,
        }
    }
}

impl Sub for Fraction {
    type Output = Fraction;

    fn sub(self, rhs: Fraction) -> Fraction {
        self + Fraction { numerator: -rhs.numerator, denominator: rhs.denominator }
    }
}

impl Mul for Fraction {
    type Output = Fraction;

    fn mul(self, rhs: Fraction) -> Fraction {
        Fraction {
            numerator: self.numerator * rhs.numerator,
            denominator: self.denominator * rhs.denominator,
        }
    }
}

impl Add<i64> for Fraction {
    type Output = Fraction;

    fn add(self, rhs: i64) -> Fraction {
        self + Fraction::from_integer(rhs)
    }
}

impl Sub<i64> for Fraction {
    type Output = Fraction;

    fn sub(self, rhs: i64) -> Fraction {
        self - Fraction::from_integer(rhs)
    }
}

impl Mul<i64> for Fraction {
    type Output = Fraction;

    fn mul(self, rhs: i64) -> Fraction {
        Fraction {
            numerator: self.numerator * rhs,
            denominator: self.denominator,
        }
    }
}

impl AddAssign for Fraction {
    fn add_assign(&mut self, rhs: Fraction) {
        *self = *self + rhs;
    }
}

impl SubAssign for Fraction {
    fn sub_assign(&mut self, rhs: Fraction) {
        *self = *self - rhs;
    }
}

impl MulAssign for Fraction {
    fn mul_assign(&mut self, rhs: Fraction) {
        *self = *self * rhs;
    }
}

impl Sum for Fraction {
    fn sum<I: Iterator<Item = Fraction>>(iter: I) -> Fraction {
        iter.fold(Fraction::ZERO, |acc, f| acc + f)
    }
}

impl PartialEq for Fraction {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl Eq for Fraction {}

impl PartialOrd for Fraction {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Fraction {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cross(other)
    }
}

impl Hash for Fraction {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let reduced = self.simplify();
        reduced.numerator.hash(state);
        reduced.denominator.hash(state);
    }
}

impl Default for Fraction {
    fn default() -> Self {
        Fraction::ZERO
    }
}

impl From<i64> for Fraction {
    fn from(value: i64) -> Self {
        Fraction::from_integer(value)
    }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

impl FromStr for Fraction {
    type Err = FormatError;

    /// Parse `"n/d"` or a bare integer `"n"`.
    fn from_str(s: &str) -> Result<Self> {
        let bad = || FormatError::BadArguments(format!("invalid fraction: '{s}'"));
        match s.trim().split_once('/') {
            Some((n, d)) => {
                let n = n.trim().parse::<i64>().map_err(|_| bad())?;
                let d = d.trim().parse::<i64>().map_err(|_| bad())?;
                Fraction::new(n, d)
            }
            None => s.trim().parse::<i64>().map(Fraction::from_integer).map_err(|_| bad()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn f(n: i64, d: i64) -> Fraction {
        Fraction::new(n, d).unwrap()
    }

    #[test]
    fn not_reduced_on_construction() {
        let half = f(2, 4);
        assert_eq!(half.numerator, 2);
        assert_eq!(half.denominator, 4);
        assert_eq!(half, f(1, 2));
        assert_eq!(half.simplify().numerator, 1);
    }

    #[test]
    fn zero_denominator_is_rejected() {
        assert!(Fraction::new(1, 0).is_err());
        assert!(f(1, 2).divide(Fraction::ZERO).is_err());
    }

    #[test]
    fn add_then_subtract_round_trips() {
        let samples = [f(1, 3), f(-5, 7), f(16384, 1), f(2, 6), f(0, 9)];
        for a in samples {
            for x in samples {
                assert!(a.add(x).subtract(x).equals(&a), "{a} + {x} - {x}");
            }
        }
    }

    #[test]
    fn comparisons_compose() {
        let a = f(3, 4);
        let b = f(6, 8);
        let c = f(7, 8);
        assert!(a.greater_than_equals(&b));
        assert!(a.less_than_equals(&b));
        assert!(a.less_than(&c));
        assert!(c.greater_than(&a));
        assert!(!a.greater_than(&b));
        assert!(f(1, -2).less_than(&Fraction::ZERO));
        assert!(f(3, 2).equals_value(1.5));
    }

    #[test]
    fn gcd_and_lcmm_laws() {
        assert_eq!(Fraction::gcd(0, 0), 0);
        assert_eq!(Fraction::gcd(7, 0), 7);
        assert_eq!(Fraction::gcd(0, 9), 9);
        assert_eq!(Fraction::gcd(12, 18), 6);
        assert_eq!(Fraction::lcmm(&[]), 0);
        assert_eq!(Fraction::lcmm(&[5]), 5);
        assert_eq!(Fraction::lcmm(&[2, 4, 6]), 12);
        assert_eq!(Fraction::lcmm(&[12, 15, 10, 75]), 300);
    }

    #[test]
    fn parse_and_display() {
        assert_eq!("3/8".parse::<Fraction>().unwrap(), f(3, 8));
        assert_eq!("4".parse::<Fraction>().unwrap(), Fraction::from_integer(4));
        assert!("3/0".parse::<Fraction>().is_err());
        assert!("x/2".parse::<Fraction>().is_err());
        assert_eq!(f(2, 4).to_string(), "2/4");
    }

    #[test]
    fn divide_and_multiply() {
        let q = f(1, 4).divide(f(1, 2)).unwrap();
        assert_eq!(q, f(1, 2));
        assert_eq!(f(2, 3) * 3, Fraction::from_integer(2));
        let total: Fraction = [f(1, 3), f(1, 3), f(1, 3)].into_iter().sum();
        assert_eq!(total, Fraction::ONE);
    }
}
