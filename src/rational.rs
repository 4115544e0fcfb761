//! Float to rational conversion for EXIF RATIONAL / SRATIONAL fields.

/// Unsigned 32-bit fraction (EXIF RATIONAL).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct URational {
    pub numerator: u32,
    pub denominator: u32,
}

/// Signed 32-bit fraction (EXIF SRATIONAL).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SRational {
    pub numerator: i32,
    pub denominator: i32,
}

const MAX_TERMS: usize = 64;
const RELATIVE_PRECISION: f64 = 1e-9;

impl URational {
    pub fn new(numerator: u32, denominator: u32) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// Best fraction for a non-negative value. Negative input is treated as zero.
    pub fn from_f64(value: f64) -> Self {
        let value = value.max(0.0);
        let (n, d) = approximate(value, u32::MAX as u64);
        if d == 0 {
            return Self::new(value.round() as u32, 1);
        }
        Self::new(n as u32, d as u32)
    }
}

impl SRational {
    pub fn new(numerator: i32, denominator: i32) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    pub fn from_f64(value: f64) -> Self {
        let (n, d) = approximate(value.abs(), i32::MAX as u64);
        if d == 0 {
            return Self::new(value.round() as i32, 1);
        }
        let n = n as i32;
        Self::new(if value < 0.0 { -n } else { n }, d as i32)
    }
}

/// Reinterprets a fraction with no negative part as an unsigned one.
impl TryFrom<SRational> for URational {
    type Error = SRational;

    fn try_from(value: SRational) -> Result<Self, Self::Error> {
        match (
            u32::try_from(value.numerator),
            u32::try_from(value.denominator),
        ) {
            (Ok(n), Ok(d)) => Ok(Self::new(n, d)),
            _ => Err(value),
        }
    }
}

/// Continued fraction expansion of a non-negative `value`, keeping numerator
/// and denominator at or below `limit`.
///
/// Returns a zero denominator when not even the integer part fits under
/// `limit`; callers fall back to `(round(value), 1)` in that case.
pub fn approximate(value: f64, limit: u64) -> (u64, u64) {
    // convergents h(n)/k(n), seeded with h(-2)/k(-2) = 0/1 and h(-1)/k(-1) = 1/0
    let (mut h_prev, mut h) = (0u64, 1u64);
    let (mut k_prev, mut k) = (1u64, 0u64);
    let mut x = value;

    for _ in 0..MAX_TERMS {
        let a = x.floor();
        if !(a <= limit as f64) {
            break;
        }
        let a = a as u64;

        let next_h = a.checked_mul(h).and_then(|v| v.checked_add(h_prev));
        let next_k = a.checked_mul(k).and_then(|v| v.checked_add(k_prev));
        match (next_h, next_k) {
            (Some(nh), Some(nk)) if nh <= limit && nk <= limit => {
                h_prev = h;
                h = nh;
                k_prev = k;
                k = nk;
            }
            _ => break,
        }

        let fraction = x - a as f64;
        let current = h as f64 / k as f64;
        if fraction <= f64::EPSILON || (current - value).abs() <= value * RELATIVE_PRECISION {
            break;
        }
        x = 1.0 / fraction;
    }

    (h, k)
}
