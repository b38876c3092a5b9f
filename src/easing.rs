//! CSS-style cubic-bezier timing functions.

/// A timing curve through (0, 0), (x1, y1), (x2, y2), (1, 1).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    x1: f32,
    y1: f32,
    x2: f32,
    y2: f32,
}

impl CubicBezier {
    /// The CSS `ease` keyword.
    pub const EASE: Self = Self::new(0.25, 0.1, 0.25, 1.0);

    /// Curve used for viewer zoom transitions.
    pub const VIEWER: Self = Self::new(0.25, 0.46, 0.45, 0.94);

    pub const fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Eased progress for linear progress `t` in [0, 1].
    pub fn apply(&self, t: f32) -> f32 {
        if t <= 0.0 {
            return 0.0;
        }
        if t >= 1.0 {
            return 1.0;
        }
        let s = self.solve_x(t);
        bezier(s, self.y1, self.y2)
    }

    /// Finds the curve parameter whose x coordinate equals `x`.
    fn solve_x(&self, x: f32) -> f32 {
        // Newton first, bisection when the slope is too flat.
        let mut s = x;
        for _ in 0..8 {
            let err = bezier(s, self.x1, self.x2) - x;
            if err.abs() < 1e-6 {
                return s;
            }
            let slope = bezier_slope(s, self.x1, self.x2);
            if slope.abs() < 1e-6 {
                break;
            }
            s -= err / slope;
        }

        let (mut lo, mut hi) = (0.0_f32, 1.0_f32);
        s = x;
        for _ in 0..32 {
            let value = bezier(s, self.x1, self.x2);
            if (value - x).abs() < 1e-6 {
                break;
            }
            if value < x {
                lo = s;
            } else {
                hi = s;
            }
            s = (lo + hi) * 0.5;
        }
        s
    }
}

fn bezier(s: f32, p1: f32, p2: f32) -> f32 {
    let inv = 1.0 - s;
    3.0 * inv * inv * s * p1 + 3.0 * inv * s * s * p2 + s * s * s
}

fn bezier_slope(s: f32, p1: f32, p2: f32) -> f32 {
    let inv = 1.0 - s;
    3.0 * inv * inv * p1 + 6.0 * inv * s * (p2 - p1) + 3.0 * s * s * (1.0 - p2)
}

/// Linear interpolation between `a` and `b`.
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_are_fixed() {
        for curve in [CubicBezier::EASE, CubicBezier::VIEWER] {
            assert_eq!(curve.apply(0.0), 0.0);
            assert_eq!(curve.apply(1.0), 1.0);
            assert_eq!(curve.apply(-3.0), 0.0);
            assert_eq!(curve.apply(7.0), 1.0);
        }
    }

    #[test]
    fn curves_are_monotonic() {
        for curve in [CubicBezier::EASE, CubicBezier::VIEWER] {
            let mut prev = 0.0;
            for step in 1..=100 {
                let value = curve.apply(step as f32 / 100.0);
                assert!(value + 1e-5 >= prev, "{value} < {prev} at step {step}");
                prev = value;
            }
        }
    }

    #[test]
    fn linear_curve_is_identity() {
        let linear = CubicBezier::new(0.25, 0.25, 0.75, 0.75);
        for step in 0..=10 {
            let t = step as f32 / 10.0;
            assert!((linear.apply(t) - t).abs() < 1e-4);
        }
    }

    #[test]
    fn ease_is_ahead_of_linear_midway() {
        // `ease` front-loads its motion.
        assert!(CubicBezier::EASE.apply(0.5) > 0.75);
    }
}
