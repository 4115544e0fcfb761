//! Decimal degrees to degrees/minutes/seconds/milliseconds.

/// An angle split into sexagesimal units. Only produced by [`SexagesimalAngle::from_degrees`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SexagesimalAngle {
    pub negative: bool,
    pub degrees: u32,
    pub minutes: u32,
    pub seconds: u32,
    pub milliseconds: u32,
}

impl SexagesimalAngle {
    /// Converts a finite angle in decimal degrees.
    ///
    /// The input is wrapped into (-180, 180] first. Every unit is truncated,
    /// nothing carries into the next larger unit.
    pub fn from_degrees(angle: f64) -> Self {
        let mut angle = angle;
        if angle <= -180.0 || angle > 180.0 {
            angle = (angle + 180.0).rem_euclid(360.0) - 180.0;
            if angle == -180.0 {
                angle = 180.0;
            }
        }

        let negative = angle < 0.0;
        let angle = angle.abs();

        let degrees = angle.floor();
        let delta = angle - degrees;

        let total_seconds = (delta * 3600.0).floor();
        let minutes = (total_seconds / 60.0).floor();
        let seconds = total_seconds % 60.0;
        let fraction = delta * 3600.0 - total_seconds;

        Self {
            negative,
            degrees: degrees as u32,
            minutes: minutes as u32,
            seconds: seconds as u32,
            milliseconds: (fraction * 1000.0).trunc() as u32,
        }
    }

    /// Seconds including the millisecond part, as thousandths of a second.
    pub fn seconds_millis(&self) -> u32 {
        self.seconds * 1000 + self.milliseconds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ONE_MS_OF_ARC: f64 = 1.0 / 3_600_000.0;

    fn to_degrees(a: &SexagesimalAngle) -> f64 {
        let magnitude = a.degrees as f64
            + a.minutes as f64 / 60.0
            + a.seconds as f64 / 3600.0
            + a.milliseconds as f64 / 3_600_000.0;
        if a.negative {
            -magnitude
        } else {
            magnitude
        }
    }

    #[test]
    fn test_zero() {
        let a = SexagesimalAngle::from_degrees(0.0);
        assert_eq!(
            a,
            SexagesimalAngle {
                negative: false,
                degrees: 0,
                minutes: 0,
                seconds: 0,
                milliseconds: 0,
            }
        );
    }

    #[test]
    fn test_western_longitude() {
        // 82 deg 15' 20" W
        let a = SexagesimalAngle::from_degrees(-82.25569);
        assert!(a.negative);
        assert_eq!(a.degrees, 82);
        assert_eq!(a.minutes, 15);
        assert_eq!(a.seconds, 20);
    }

    #[test]
    fn test_northern_latitude() {
        // 34 deg 44' 16" N
        let a = SexagesimalAngle::from_degrees(34.7379);
        assert!(!a.negative);
        assert_eq!((a.degrees, a.minutes, a.seconds), (34, 44, 16));
    }

    #[test]
    fn test_wraparound() {
        let a = SexagesimalAngle::from_degrees(181.0);
        assert!(a.negative);
        assert_eq!(a.degrees, 179);

        let b = SexagesimalAngle::from_degrees(-200.0);
        assert!(!b.negative);
        assert_eq!(b.degrees, 160);

        let c = SexagesimalAngle::from_degrees(-180.0);
        assert!(!c.negative);
        assert_eq!(c.degrees, 180);

        let d = SexagesimalAngle::from_degrees(540.0);
        assert_eq!((d.negative, d.degrees), (false, 180));

        let e = SexagesimalAngle::from_degrees(180.0);
        assert_eq!((e.negative, e.degrees), (false, 180));
    }

    #[test]
    fn test_huge_finite_input() {
        for v in [1.0e20, -1.0e15, f64::MAX, f64::MIN] {
            let a = SexagesimalAngle::from_degrees(v);
            assert!(a.degrees <= 180, "{v}: {a:?}");
            assert!(a.minutes < 60, "{v}: {a:?}");
            assert!(a.seconds < 60, "{v}: {a:?}");
            assert!(a.milliseconds < 1000, "{v}: {a:?}");
        }
    }

    #[test]
    fn test_units_stay_in_range() {
        for v in [0.999_999_9, 59.999_999_99, -0.000_000_1, 12.5, 179.999_999] {
            let a = SexagesimalAngle::from_degrees(v);
            assert!(a.minutes < 60, "{v}: {a:?}");
            assert!(a.seconds < 60, "{v}: {a:?}");
            assert!(a.milliseconds < 1000, "{v}: {a:?}");
        }
    }

    #[test]
    fn test_truncates_never_rounds() {
        let a = SexagesimalAngle::from_degrees(0.999_999_9);
        assert_eq!((a.degrees, a.minutes, a.seconds), (0, 59, 59));
        assert_eq!(a.milliseconds, 999);
    }

    #[test]
    fn test_reconstruction_within_one_millisecond() {
        for v in [
            -179.999, -82.25569, -45.5, -0.0001, 0.5, 1.0, 34.7379, 51.477_928, 120.123_456_789,
            180.0,
        ] {
            let a = SexagesimalAngle::from_degrees(v);
            let back = to_degrees(&a);
            let err = v - back;
            // truncation means the reconstruction never overshoots
            assert!(err.abs() < ONE_MS_OF_ARC + 1e-9, "{v} -> {back}");
            assert!(err * v.signum() > -1e-9, "{v} -> {back}");
        }
    }

    #[test]
    fn test_seconds_millis() {
        let a = SexagesimalAngle {
            negative: false,
            degrees: 1,
            minutes: 2,
            seconds: 3,
            milliseconds: 45,
        };
        assert_eq!(a.seconds_millis(), 3045);
    }
}
