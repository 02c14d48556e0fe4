//! Keyframed response curves
//!
//! Curves map a normalized time to a value and drive acceleration, braking,
//! dash falloff, and camera bob. Between keys the curve is a cubic Hermite
//! spline; outside the key range it holds the first or last value.

use serde::{Deserialize, Serialize};

/// Errors produced when building a curve
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CurveError {
    #[error("curve has no keyframes")]
    Empty,

    #[error("keyframe {0} contains a non-finite value")]
    NonFinite(usize),

    #[error("keyframe {0} is not after the previous keyframe")]
    Unsorted(usize),
}

/// A single curve key
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub time: f32,
    pub value: f32,
    /// Slope arriving at this key
    #[serde(default)]
    pub in_tangent: f32,
    /// Slope leaving this key
    #[serde(default)]
    pub out_tangent: f32,
}

impl Keyframe {
    /// Key with flat tangents
    pub const fn new(time: f32, value: f32) -> Self {
        Self {
            time,
            value,
            in_tangent: 0.0,
            out_tangent: 0.0,
        }
    }

    /// Key with explicit tangents
    pub const fn with_tangents(time: f32, value: f32, in_tangent: f32, out_tangent: f32) -> Self {
        Self {
            time,
            value,
            in_tangent,
            out_tangent,
        }
    }

    fn is_finite(&self) -> bool {
        self.time.is_finite()
            && self.value.is_finite()
            && self.in_tangent.is_finite()
            && self.out_tangent.is_finite()
    }
}

/// A validated, non-empty curve with strictly increasing key times
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Keyframe>", into = "Vec<Keyframe>")]
pub struct ResponseCurve {
    keys: Vec<Keyframe>,
}

impl ResponseCurve {
    /// Build a curve from keys, rejecting empty, non-finite, or unsorted input
    pub fn from_keys(keys: Vec<Keyframe>) -> Result<Self, CurveError> {
        if keys.is_empty() {
            return Err(CurveError::Empty);
        }

        for (i, key) in keys.iter().enumerate() {
            if !key.is_finite() {
                return Err(CurveError::NonFinite(i));
            }
            if i > 0 && key.time <= keys[i - 1].time {
                return Err(CurveError::Unsorted(i));
            }
        }

        Ok(Self { keys })
    }

    /// Flat curve
    pub fn constant(value: f32) -> Self {
        Self {
            keys: vec![Keyframe::new(0.0, value)],
        }
    }

    /// Straight line from `(0, from)` to `(1, to)`
    pub fn linear(from: f32, to: f32) -> Self {
        let slope = to - from;
        Self {
            keys: vec![
                Keyframe::with_tangents(0.0, from, slope, slope),
                Keyframe::with_tangents(1.0, to, slope, slope),
            ],
        }
    }

    /// S-shaped curve from `(0, from)` to `(1, to)` with flat ends
    pub fn ease_in_out(from: f32, to: f32) -> Self {
        Self {
            keys: vec![Keyframe::new(0.0, from), Keyframe::new(1.0, to)],
        }
    }

    /// The curve's keys, sorted by time
    pub fn keys(&self) -> &[Keyframe] {
        &self.keys
    }

    /// Sample the curve at `time`
    pub fn evaluate(&self, time: f32) -> f32 {
        let first = self.keys[0];
        let last = self.keys[self.keys.len() - 1];

        if time.is_nan() || time <= first.time {
            return first.value;
        }
        if time >= last.time {
            return last.value;
        }

        // First key strictly after `time`; guaranteed in 1..len by the bounds above
        let upper = self.keys.partition_point(|k| k.time <= time);
        let a = self.keys[upper - 1];
        let b = self.keys[upper];

        hermite(a, b, time)
    }
}

impl TryFrom<Vec<Keyframe>> for ResponseCurve {
    type Error = CurveError;

    fn try_from(keys: Vec<Keyframe>) -> Result<Self, Self::Error> {
        Self::from_keys(keys)
    }
}

impl From<ResponseCurve> for Vec<Keyframe> {
    fn from(curve: ResponseCurve) -> Self {
        curve.keys
    }
}

fn hermite(a: Keyframe, b: Keyframe, time: f32) -> f32 {
    let span = b.time - a.time;
    let t = (time - a.time) / span;
    let t2 = t * t;
    let t3 = t2 * t;

    let m0 = a.out_tangent * span;
    let m1 = b.in_tangent * span;

    let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
    let h10 = t3 - 2.0 * t2 + t;
    let h01 = -2.0 * t3 + 3.0 * t2;
    let h11 = t3 - t2;

    h00 * a.value + h10 * m0 + h01 * b.value + h11 * m1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_curve() {
        let curve = ResponseCurve::linear(0.0, 1.0);
        assert!((curve.evaluate(0.25) - 0.25).abs() < 1e-5);
        assert!((curve.evaluate(0.5) - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_clamps_outside_key_range() {
        let curve = ResponseCurve::linear(1.0, 0.0);
        assert_eq!(curve.evaluate(-3.0), 1.0);
        assert_eq!(curve.evaluate(1.2), 0.0);
        assert_eq!(curve.evaluate(f32::NAN), 1.0);
    }

    #[test]
    fn test_ease_in_out_is_symmetric() {
        let curve = ResponseCurve::ease_in_out(0.0, 1.0);
        assert!((curve.evaluate(0.5) - 0.5).abs() < 1e-5);
        assert!(curve.evaluate(0.1) < 0.1);
        assert!(curve.evaluate(0.9) > 0.9);
    }

    #[test]
    fn test_constant_curve() {
        let curve = ResponseCurve::constant(0.7);
        assert_eq!(curve.evaluate(0.0), 0.7);
        assert_eq!(curve.evaluate(100.0), 0.7);
    }

    #[test]
    fn test_multi_key_curve_hits_keys() {
        let curve = ResponseCurve::from_keys(vec![
            Keyframe::new(0.0, 0.0),
            Keyframe::new(0.5, 1.0),
            Keyframe::new(1.0, 0.0),
        ])
        .unwrap();
        assert!((curve.evaluate(0.5) - 1.0).abs() < 1e-5);
        assert!(curve.evaluate(0.25) > 0.0 && curve.evaluate(0.25) < 1.0);
    }

    #[test]
    fn test_rejects_invalid_keys() {
        assert_eq!(ResponseCurve::from_keys(vec![]), Err(CurveError::Empty));
        assert_eq!(
            ResponseCurve::from_keys(vec![Keyframe::new(0.0, 0.0), Keyframe::new(0.0, 1.0)]),
            Err(CurveError::Unsorted(1))
        );
        assert_eq!(
            ResponseCurve::from_keys(vec![Keyframe::new(0.0, f32::INFINITY)]),
            Err(CurveError::NonFinite(0))
        );
    }

    #[test]
    fn test_deserialize_validates() {
        #[derive(Deserialize)]
        struct Wrapper {
            curve: ResponseCurve,
        }

        let ok: Wrapper = toml::from_str(
            "curve = [{ time = 0.0, value = 0.0 }, { time = 1.0, value = 1.0 }]",
        )
        .unwrap();
        assert_eq!(ok.curve.keys().len(), 2);

        let empty = toml::from_str::<Wrapper>("curve = []");
        assert!(empty.is_err());
    }
}
