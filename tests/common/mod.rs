#![allow(dead_code)]

use approx::assert_relative_eq;
use sky_orbits::anomaly::kepler_residuals;
use sky_orbits::keplerian_element::OrbitalElements;
use sky_orbits::trajectory::OrbitTrajectory;

pub fn body_one() -> OrbitalElements {
    OrbitalElements::from_degrees(10.0, 0.02, 70.0, 20.0, -15.0, 30.0 * 365.25, 1.88).unwrap()
}

pub fn body_two() -> OrbitalElements {
    OrbitalElements::from_degrees(15.0, 0.3, 85.0, 15.0, 5.0, 55.0 * 365.25, 8.66).unwrap()
}

pub fn assert_elements_close(actual: &OrbitalElements, expected: &OrbitalElements, epsilon: f64) {
    assert_relative_eq!(
        actual.semi_major_axis(),
        expected.semi_major_axis(),
        epsilon = epsilon
    );
    assert_relative_eq!(
        actual.eccentricity(),
        expected.eccentricity(),
        epsilon = epsilon
    );
    assert_relative_eq!(actual.inclination(), expected.inclination(), epsilon = epsilon);
    assert_relative_eq!(
        actual.periapsis_argument(),
        expected.periapsis_argument(),
        epsilon = epsilon
    );
    assert_relative_eq!(
        actual.ascending_node_longitude(),
        expected.ascending_node_longitude(),
        epsilon = epsilon
    );
    assert_relative_eq!(actual.period(), expected.period(), epsilon = epsilon);
    assert_relative_eq!(
        actual.periastron_epoch(),
        expected.periastron_epoch(),
        epsilon = epsilon
    );
}

/// Every sequence of the trajectory has the same length and every value is finite.
pub fn assert_trajectory_consistent(traj: &OrbitTrajectory) {
    let n = traj.len();
    for seq in [
        traj.times(),
        traj.mean_anomalies(),
        traj.eccentric_anomalies(),
        traj.true_anomalies(),
        traj.x(),
        traj.y(),
        traj.z(),
    ] {
        assert_eq!(seq.len(), n);
        assert!(seq.iter().all(|v| v.is_finite()));
    }

    let e = traj.elements().eccentricity();
    for res in kepler_residuals(traj.mean_anomalies(), traj.eccentric_anomalies(), e) {
        assert!(res.abs() < 1e-8, "residual {res}");
    }
}
