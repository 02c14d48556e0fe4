//! Scalar and vector helpers shared by the movement and camera code

use glam::{Vec2, Vec3};

/// Squared-length threshold below which a vector is treated as degenerate
const EPSILON_NORMAL_SQRT: f32 = 1e-15;

/// Threshold used by [`project_on_plane`] for a zero-length plane normal
const EPSILON: f32 = 1e-5;

/// Smallest smoothing time accepted by the dampers
const MIN_SMOOTH_TIME: f32 = 0.0001;

/// Critically damped smoothing of a scalar toward `target`.
///
/// `velocity` carries the damper state between calls. A zero `dt` leaves both
/// the value and the velocity untouched.
pub fn smooth_damp(current: f32, target: f32, velocity: &mut f32, smooth_time: f32, dt: f32) -> f32 {
    if dt <= 0.0 {
        return current;
    }

    let smooth_time = smooth_time.max(MIN_SMOOTH_TIME);
    let omega = 2.0 / smooth_time;
    let x = omega * dt;
    let decay = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);

    let change = current - target;
    let temp = (*velocity + omega * change) * dt;
    *velocity = (*velocity - omega * temp) * decay;
    let mut output = target + (change + temp) * decay;

    // Never overshoot the target
    if (target - current > 0.0) == (output > target) {
        output = target;
        *velocity = 0.0;
    }

    output
}

/// Critically damped smoothing of a 2D vector toward `target`.
pub fn smooth_damp_vec2(
    current: Vec2,
    target: Vec2,
    velocity: &mut Vec2,
    smooth_time: f32,
    dt: f32,
) -> Vec2 {
    if dt <= 0.0 {
        return current;
    }

    let smooth_time = smooth_time.max(MIN_SMOOTH_TIME);
    let omega = 2.0 / smooth_time;
    let x = omega * dt;
    let decay = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);

    let change = current - target;
    let temp = (*velocity + omega * change) * dt;
    *velocity = (*velocity - omega * temp) * decay;
    let mut output = target + (change + temp) * decay;

    if (target - current).dot(output - target) > 0.0 {
        output = target;
        *velocity = Vec2::ZERO;
    }

    output
}

/// Remove the component of `vector` along `normal`.
///
/// Returns `vector` unchanged when the normal is (nearly) zero.
pub fn project_on_plane(vector: Vec3, normal: Vec3) -> Vec3 {
    let sqr_mag = normal.length_squared();
    if sqr_mag < EPSILON {
        return vector;
    }
    vector - normal * (vector.dot(normal) / sqr_mag)
}

/// Unsigned angle between two vectors in degrees, 0 for degenerate input.
pub fn angle_between(from: Vec3, to: Vec3) -> f32 {
    let denominator = (from.length_squared() * to.length_squared()).sqrt();
    if denominator < EPSILON_NORMAL_SQRT {
        return 0.0;
    }
    let dot = (from.dot(to) / denominator).clamp(-1.0, 1.0);
    dot.acos().to_degrees()
}

/// Unsigned angle between two 2D vectors in degrees, 0 for degenerate input.
pub fn angle_between_2d(from: Vec2, to: Vec2) -> f32 {
    let denominator = (from.length_squared() * to.length_squared()).sqrt();
    if denominator < EPSILON_NORMAL_SQRT {
        return 0.0;
    }
    let dot = (from.dot(to) / denominator).clamp(-1.0, 1.0);
    dot.acos().to_degrees()
}

/// Round to the nearest tenth
pub fn round_to_tenth(value: f32) -> f32 {
    (value * 10.0).round() / 10.0
}

/// Linear interpolation with `t` clamped to `[0, 1]`
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_smooth_damp_approaches_target() {
        let mut velocity = 0.0;
        let mut value = 0.0;
        for _ in 0..120 {
            value = smooth_damp(value, 1.0, &mut velocity, 0.1, 1.0 / 60.0);
        }
        assert!((value - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_smooth_damp_never_overshoots() {
        let mut velocity = 0.0;
        let mut value = 0.0;
        for _ in 0..200 {
            value = smooth_damp(value, 1.0, &mut velocity, 0.05, 0.1);
            assert!(value <= 1.0);
        }
    }

    #[test]
    fn test_smooth_damp_zero_dt_is_identity() {
        let mut velocity = Vec2::new(3.0, -1.0);
        let value = smooth_damp_vec2(Vec2::new(0.2, 0.4), Vec2::ONE, &mut velocity, 0.1, 0.0);
        assert_eq!(value, Vec2::new(0.2, 0.4));
        assert_eq!(velocity, Vec2::new(3.0, -1.0));
    }

    #[test]
    fn test_smooth_damp_vec2_moves_toward_target() {
        let mut velocity = Vec2::ZERO;
        let value = smooth_damp_vec2(Vec2::ZERO, Vec2::new(1.0, 0.0), &mut velocity, 0.065, 1.0 / 60.0);
        assert!(value.x > 0.0 && value.x < 1.0);
        assert_eq!(value.y, 0.0);
    }

    #[test]
    fn test_project_on_plane() {
        let projected = project_on_plane(Vec3::new(1.0, -1.0, 0.0), Vec3::Y);
        assert_eq!(projected, Vec3::new(1.0, 0.0, 0.0));

        let untouched = project_on_plane(Vec3::X, Vec3::ZERO);
        assert_eq!(untouched, Vec3::X);
    }

    #[test]
    fn test_angles() {
        assert!((angle_between(Vec3::Y, Vec3::X) - 90.0).abs() < 1e-4);
        assert_eq!(angle_between(Vec3::Y, Vec3::ZERO), 0.0);

        let slope = Vec3::new(1.0, 1.0, 0.0).normalize();
        assert!((angle_between(Vec3::Y, slope) - 45.0).abs() < 1e-3);
        assert!((angle_between_2d(Vec2::Y, Vec2::new(slope.x, slope.y)) - 45.0).abs() < 1e-3);
    }

    #[test]
    fn test_round_to_tenth() {
        assert_eq!(round_to_tenth(44.96), 45.0);
        assert_eq!(round_to_tenth(12.34), 12.3);
    }
}
