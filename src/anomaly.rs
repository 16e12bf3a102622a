//! # Anomaly conversions
//!
//! Pure conversions between the three anomalies of a single elliptic orbit:
//!
//! * **Mean anomaly** `M` – uniform angle since periastron, `M = 2π (t − T0) / T`.
//! * **Eccentric anomaly** `E` – related to `M` by Kepler's equation `M = E − e·sin E`
//!   (the inverse direction is solved numerically in [`crate::kepler`]).
//! * **True anomaly** `ν` – geometric angle from periastron seen from the focus.
//!
//! Mean anomalies are never wrapped: every downstream function is 2π-periodic, so
//! negative or large values are accepted as-is. True anomalies come out in `(−π, π]`.

use itertools::izip;

use std::f64::consts::PI;

use crate::constants::{Day, Radian, DPI};

/// Bring an angle from `(−2π, 2π]` back into `(−π, π]`.
#[inline]
fn wrap_half_turn(angle: Radian) -> Radian {
    if angle > PI {
        angle - DPI
    } else if angle <= -PI {
        angle + DPI
    } else {
        angle
    }
}

/// Mean anomaly at time `t` for an orbit of period `period` with periastron at `periastron_epoch`.
///
/// Arguments
/// ---------
/// * `t` – sample time.
/// * `period` – orbital period `T` (same unit as `t`).
/// * `periastron_epoch` – `T0` (same unit as `t`).
///
/// Return
/// ------
/// * `M = ((t − T0) / T)·2π`, unwrapped.
#[inline]
pub fn mean_anomaly(t: Day, period: Day, periastron_epoch: Day) -> Radian {
    (t - periastron_epoch) / period * DPI
}

/// Elementwise [`mean_anomaly`] over a time sample sequence.
pub fn mean_anomalies(times: &[Day], period: Day, periastron_epoch: Day) -> Vec<Radian> {
    let mean_motion = DPI / period;
    times
        .iter()
        .map(|&t| (t - periastron_epoch) * mean_motion)
        .collect()
}

/// True anomaly from eccentric anomaly.
///
/// Uses the half-angle form with the two-argument arctangent,
/// `ν = 2·atan2(√(1+e)·sin(E/2), √(1−e)·cos(E/2))`, which keeps the correct quadrant
/// over the full range of `E`, including `E ≈ π`. The raw half-angle result lies in
/// `(−2π, 2π]` and is folded back by one turn.
///
/// Return
/// ------
/// * `ν` in `(−π, π]`. Both `E = −π` and `E = π` map to `ν = π`, so
///   `true_anomaly(−E) == −true_anomaly(E)` holds only modulo 2π at that boundary.
#[inline]
pub fn true_anomaly(eccentric_anomaly: Radian, e: f64) -> Radian {
    let half = eccentric_anomaly / 2.0;
    wrap_half_turn(2.0 * ((1.0 + e).sqrt() * half.sin()).atan2((1.0 - e).sqrt() * half.cos()))
}

/// Elementwise [`true_anomaly`].
pub fn true_anomalies(eccentric_anomalies: &[Radian], e: f64) -> Vec<Radian> {
    let (sqrt_1pe, sqrt_1me) = ((1.0 + e).sqrt(), (1.0 - e).sqrt());
    eccentric_anomalies
        .iter()
        .map(|&ecc| {
            let half = ecc / 2.0;
            wrap_half_turn(2.0 * (sqrt_1pe * half.sin()).atan2(sqrt_1me * half.cos()))
        })
        .collect()
}

/// Eccentric anomaly from true anomaly (inverse of [`true_anomaly`]).
///
/// Return
/// ------
/// * `E = 2·atan2(√(1−e)·sin(ν/2), √(1+e)·cos(ν/2))`, in `(−π, π]`.
#[inline]
pub fn eccentric_from_true(true_anomaly: Radian, e: f64) -> Radian {
    let half = true_anomaly / 2.0;
    2.0 * ((1.0 - e).sqrt() * half.sin()).atan2((1.0 + e).sqrt() * half.cos())
}

/// Mean anomaly from eccentric anomaly (forward Kepler equation, `M = E − e·sin E`).
#[inline]
pub fn mean_from_eccentric(eccentric_anomaly: Radian, e: f64) -> Radian {
    eccentric_anomaly - e * eccentric_anomaly.sin()
}

/// Residual of Kepler's equation `M − E + e·sin E` for each aligned `(M, E)` pair.
pub fn kepler_residuals(
    mean_anomalies: &[Radian],
    eccentric_anomalies: &[Radian],
    e: f64,
) -> Vec<f64> {
    izip!(mean_anomalies, eccentric_anomalies)
        .map(|(&m, &ecc)| m - mean_from_eccentric(ecc, e))
        .collect()
}

#[cfg(test)]
mod anomaly_test {
    use super::*;
    use crate::kepler::principal_angle;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    /// Difference of two angles wrapped to (−π, π].
    fn wrapped_diff(a: f64, b: f64) -> f64 {
        let d = principal_angle(a - b);
        if d > PI {
            d - DPI
        } else {
            d
        }
    }

    #[test]
    fn test_mean_anomaly() {
        let m = mean_anomaly(0.0, 30.0 * 365.25, 1.88);
        assert_relative_eq!(m, -0.001_078_018_560_574_731_6, epsilon = 1e-15);

        // one full period later the angle grew by exactly 2π
        let m1 = mean_anomaly(1.88 + 10957.5, 10957.5, 1.88);
        assert_relative_eq!(m1, DPI, epsilon = 1e-14);

        let ms = mean_anomalies(&[0.0, 10.0, 20.0], 10957.5, 1.88);
        assert_eq!(ms.len(), 3);
        assert_relative_eq!(ms[0], m, epsilon = 1e-15);
        assert_relative_eq!(ms[2] - ms[1], 10.0 * DPI / 10957.5, epsilon = 1e-15);
    }

    #[test]
    fn test_mean_anomaly_not_wrapped() {
        let m = mean_anomaly(-5.0 * 100.0, 100.0, 0.0);
        assert_relative_eq!(m, -5.0 * DPI, epsilon = 1e-12);
    }

    #[test]
    fn test_true_anomaly_circular() {
        for k in -30..=30 {
            let ecc = k as f64 * 0.1;
            assert_abs_diff_eq!(true_anomaly(ecc, 0.0), ecc, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_true_anomaly_quadrants() {
        let e = 0.6;
        // E slightly past π must land near −π, not near +π
        let nu = true_anomaly(PI + 0.01, e);
        assert!(nu < 0.0);
        assert!(nu > -PI);

        // E slightly before π stays positive
        let nu = true_anomaly(PI - 0.01, e);
        assert!(nu > 0.0 && nu < PI);

        // periastron and apoastron are fixed points
        assert_eq!(true_anomaly(0.0, e), 0.0);
        assert_relative_eq!(true_anomaly(PI, e), PI, epsilon = 1e-12);

        // whole range folded into (−π, π]
        for k in -100..=100 {
            let nu = true_anomaly(k as f64 * 0.37, e);
            assert!(nu > -PI && nu <= PI);
        }

        // ν runs ahead of E between periastron and apoastron
        assert!(true_anomaly(1.0, e) > 1.0);
    }

    #[test]
    fn test_true_anomaly_odd_and_periodic() {
        for &e in &[0.0, 0.1, 0.5, 0.9] {
            for k in -40..=40 {
                let ecc = k as f64 * 0.15 + 0.013;
                let nu = true_anomaly(ecc, e);
                assert_abs_diff_eq!(true_anomaly(-ecc, e), -nu, epsilon = 1e-12);
                assert_abs_diff_eq!(
                    wrapped_diff(true_anomaly(ecc + DPI, e), nu),
                    0.0,
                    epsilon = 1e-12
                );
            }
        }
    }

    #[test]
    fn test_true_anomaly_half_turn_boundary() {
        // ±π fold onto the same end of (−π, π]
        for e in [0.0, 0.3, 0.9] {
            assert_eq!(true_anomaly(PI, e), PI);
            assert_eq!(true_anomaly(-PI, e), PI);
            assert_abs_diff_eq!(
                wrapped_diff(true_anomaly(-PI, e), -true_anomaly(PI, e)),
                0.0,
                epsilon = 1e-15
            );
        }
    }

    #[test]
    fn test_true_anomalies_matches_scalar() {
        let es: Vec<f64> = (0..50).map(|k| -6.0 + k as f64 * 0.25).collect();
        let nus = true_anomalies(&es, 0.3);
        assert_eq!(nus.len(), es.len());
        for (ecc, nu) in es.iter().zip(&nus) {
            assert_eq!(*nu, true_anomaly(*ecc, 0.3));
        }
    }

    #[test]
    fn test_eccentric_true_inverse() {
        for &e in &[0.0, 0.02, 0.3, 0.95] {
            for k in -20..=20 {
                let ecc = k as f64 * 0.15;
                let back = eccentric_from_true(true_anomaly(ecc, e), e);
                assert_abs_diff_eq!(wrapped_diff(back, ecc), 0.0, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_kepler_residuals() {
        let es = [0.0, 1.0, 2.0];
        let ms: Vec<f64> = es.iter().map(|&x| mean_from_eccentric(x, 0.4)).collect();
        for r in kepler_residuals(&ms, &es, 0.4) {
            assert_abs_diff_eq!(r, 0.0, epsilon = 1e-15);
        }
    }
}
