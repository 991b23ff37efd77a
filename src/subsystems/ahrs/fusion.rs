//! Orientation fusion filter seam
//!
//! The pipeline consumes fusion as a black box behind [`FusionFilter`]; the
//! bundled implementation is a Mahony complementary filter ([`Mahony`]):
//! gyro integration with a proportional-integral correction that pulls the
//! estimated gravity direction toward the measured acceleration.
//!
//! Reference: Mahony, Hamel, Pflimlin (2008), "Nonlinear complementary
//! filters on the special orthogonal group."

use libm::sqrtf;
use nalgebra::{Quaternion, Vector3};

/// Orientation filter contract
///
/// `update` advances `orientation` in place from one sensor reading. The
/// filter may keep internal state (integral terms, gradient history) but must
/// leave `orientation` a unit quaternion for any finite inputs.
pub trait FusionFilter {
    /// Advance the orientation estimate by one sample interval
    ///
    /// # Arguments
    ///
    /// * `gyro_rad` - bias-corrected angular rate (rad/s, body frame)
    /// * `accel` - acceleration (any consistent unit; only the direction is
    ///   used), gravity included
    /// * `dt` - sample interval in seconds
    /// * `orientation` - quaternion to advance, unit on entry and exit
    fn update(
        &mut self,
        gyro_rad: Vector3<f32>,
        accel: Vector3<f32>,
        dt: f32,
        orientation: &mut Quaternion<f32>,
    );
}

/// Mahony filter gains
#[derive(Debug, Clone, Copy)]
pub struct MahonyConfig {
    /// Proportional feedback gain
    pub kp: f32,

    /// Integral feedback gain (0 disables the integral term)
    pub ki: f32,
}

impl Default for MahonyConfig {
    fn default() -> Self {
        Self { kp: 1.0, ki: 0.0 }
    }
}

/// Mahony AHRS filter (accelerometer + gyro, no magnetometer)
#[derive(Debug, Clone)]
pub struct Mahony {
    config: MahonyConfig,
    /// Integral feedback accumulator (rad/s)
    integral: Vector3<f32>,
}

impl Mahony {
    pub fn new(config: MahonyConfig) -> Self {
        Self {
            config,
            integral: Vector3::zeros(),
        }
    }

    /// Clear the integral feedback term
    pub fn reset(&mut self) {
        self.integral = Vector3::zeros();
    }
}

impl Default for Mahony {
    fn default() -> Self {
        Self::new(MahonyConfig::default())
    }
}

impl FusionFilter for Mahony {
    fn update(
        &mut self,
        gyro_rad: Vector3<f32>,
        accel: Vector3<f32>,
        dt: f32,
        orientation: &mut Quaternion<f32>,
    ) {
        let (q0, q1, q2, q3) = (orientation.w, orientation.i, orientation.j, orientation.k);
        let (mut gx, mut gy, mut gz) = (gyro_rad.x, gyro_rad.y, gyro_rad.z);

        // Accelerometer correction, skipped when there is no usable gravity
        // reference (free fall or missing accel data).
        let norm_sq = accel.norm_squared();
        if norm_sq > f32::EPSILON {
            let recip = 1.0 / sqrtf(norm_sq);
            let ax = accel.x * recip;
            let ay = accel.y * recip;
            let az = accel.z * recip;

            // Estimated gravity direction from the current quaternion
            // (half magnitudes, per the classic formulation).
            let half_vx = q1 * q3 - q0 * q2;
            let half_vy = q0 * q1 + q2 * q3;
            let half_vz = q0 * q0 - 0.5 + q3 * q3;

            // Error: cross product of measured and estimated gravity
            let half_ex = ay * half_vz - az * half_vy;
            let half_ey = az * half_vx - ax * half_vz;
            let half_ez = ax * half_vy - ay * half_vx;

            if self.config.ki > 0.0 {
                self.integral.x += self.config.ki * half_ex * dt;
                self.integral.y += self.config.ki * half_ey * dt;
                self.integral.z += self.config.ki * half_ez * dt;
                gx += self.integral.x;
                gy += self.integral.y;
                gz += self.integral.z;
            } else {
                self.integral = Vector3::zeros();
            }

            gx += self.config.kp * half_ex;
            gy += self.config.kp * half_ey;
            gz += self.config.kp * half_ez;
        }

        // First-order quaternion integration of the corrected rate
        let half_dt = 0.5 * dt;
        gx *= half_dt;
        gy *= half_dt;
        gz *= half_dt;
        let (qa, qb, qc) = (q0, q1, q2);
        let w = q0 + (-qb * gx - qc * gy - q3 * gz);
        let x = q1 + (qa * gx + qc * gz - q3 * gy);
        let y = q2 + (qa * gy - qb * gz + q3 * gx);
        let z = q3 + (qa * gz + qb * gy - qc * gx);

        let norm = sqrtf(w * w + x * x + y * y + z * z);
        if norm > f32::EPSILON {
            let recip = 1.0 / norm;
            *orientation = Quaternion::new(w * recip, x * recip, y * recip, z * recip);
        }
        // Degenerate update: keep the previous (unit) quaternion.
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 0.005;

    fn norm(q: &Quaternion<f32>) -> f32 {
        sqrtf(q.w * q.w + q.i * q.i + q.j * q.j + q.k * q.k)
    }

    #[test]
    fn stationary_identity_stays_identity() {
        let mut filter = Mahony::default();
        let mut q = Quaternion::new(1.0, 0.0, 0.0, 0.0);

        for _ in 0..1000 {
            filter.update(Vector3::zeros(), Vector3::new(0.0, 0.0, 1.0), DT, &mut q);
        }

        assert!((q.w - 1.0).abs() < 1e-3);
        assert!(q.i.abs() < 1e-3);
        assert!(q.j.abs() < 1e-3);
        assert!(q.k.abs() < 1e-3);
    }

    #[test]
    fn quaternion_stays_unit_under_arbitrary_finite_input() {
        let mut filter = Mahony::new(MahonyConfig { kp: 1.0, ki: 0.1 });
        let mut q = Quaternion::new(1.0, 0.0, 0.0, 0.0);

        let gyros = [
            Vector3::new(3.0, -2.0, 1.5),
            Vector3::new(-10.0, 4.0, 0.1),
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(100.0, -100.0, 50.0),
        ];
        let accels = [
            Vector3::new(0.0, 0.0, 1.0),
            Vector3::new(0.5, -0.5, 0.7),
            Vector3::new(0.0, 0.0, 0.0), // free fall: correction skipped
            Vector3::new(-1.0, 2.0, -3.0),
        ];

        for i in 0..400 {
            filter.update(gyros[i % 4], accels[i % 4], DT, &mut q);
            let n = norm(&q);
            assert!((n - 1.0).abs() < 1e-4, "norm drifted to {}", n);
        }
    }

    #[test]
    fn gyro_only_yaw_integration() {
        let mut filter = Mahony::default();
        let mut q = Quaternion::new(1.0, 0.0, 0.0, 0.0);

        // Rotate about z at pi/2 rad/s for one second with no gravity
        // reference; expect a 90 degree yaw: q = (cos(pi/4), 0, 0, sin(pi/4)).
        let rate = core::f32::consts::FRAC_PI_2;
        let steps = 200;
        let dt = 1.0 / steps as f32;
        for _ in 0..steps {
            filter.update(Vector3::new(0.0, 0.0, rate), Vector3::zeros(), dt, &mut q);
        }

        let expected = core::f32::consts::FRAC_PI_4;
        assert!((q.w - libm::cosf(expected)).abs() < 0.01);
        assert!((q.k - libm::sinf(expected)).abs() < 0.01);
        assert!(q.i.abs() < 0.01);
        assert!(q.j.abs() < 0.01);
    }

    #[test]
    fn accel_correction_pulls_toward_gravity() {
        let mut filter = Mahony::new(MahonyConfig { kp: 2.0, ki: 0.0 });
        let mut q = Quaternion::new(1.0, 0.0, 0.0, 0.0);

        // Gravity measured along +x means the body is pitched 90 degrees; the
        // estimate should move away from identity.
        for _ in 0..500 {
            filter.update(Vector3::zeros(), Vector3::new(1.0, 0.0, 0.0), DT, &mut q);
        }

        assert!((q.w - 1.0).abs() > 0.1, "estimate did not move: {:?}", q);
        assert!((norm(&q) - 1.0).abs() < 1e-4);
    }
}
