//! Real roots of low-order polynomials.
//!
//! Used by the analytic intersection tests. Roots come back unordered in a
//! fixed-capacity buffer; callers pick and validate the ones they need.

use std::f64::consts::PI;

/// Up to `N` real roots, in no particular order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Roots<const N: usize> {
    values: [f64; N],
    len: usize,
}

impl<const N: usize> Roots<N> {
    fn none() -> Self {
        Self {
            values: [0.0; N],
            len: 0,
        }
    }

    fn push(&mut self, root: f64) {
        if self.len < N {
            self.values[self.len] = root;
            self.len += 1;
        }
    }

    /// Number of real roots found.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values[..self.len]
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.as_slice().iter().copied()
    }
}

/// Solve `a·x² + b·x + c = 0`.
///
/// Degenerates to the linear case when `a == 0`. A zero discriminant yields a
/// single root.
pub fn quadratic_roots(a: f64, b: f64, c: f64) -> Roots<2> {
    let mut roots = Roots::none();

    if a == 0.0 {
        if b != 0.0 {
            roots.push(-c / b);
        }
        return roots;
    }

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return roots;
    }
    if discriminant == 0.0 {
        roots.push(-b / (2.0 * a));
        return roots;
    }

    // Avoid cancellation between -b and the square root
    let q = -0.5 * (b + b.signum() * discriminant.sqrt());
    roots.push(q / a);
    roots.push(c / q);
    roots
}

/// Solve the monic cubic `x³ + a·x² + b·x + c = 0`.
pub fn cubic_roots(a: f64, b: f64, c: f64) -> Roots<3> {
    let mut roots = Roots::none();

    let q = (a * a - 3.0 * b) / 9.0;
    let r = (2.0 * a * a * a - 9.0 * a * b + 27.0 * c) / 54.0;
    let shift = a / 3.0;

    let q3 = q * q * q;
    if r * r < q3 {
        // Three distinct real roots
        let theta = (r / q3.sqrt()).clamp(-1.0, 1.0).acos();
        let scale = -2.0 * q.sqrt();
        roots.push(scale * (theta / 3.0).cos() - shift);
        roots.push(scale * ((theta + 2.0 * PI) / 3.0).cos() - shift);
        roots.push(scale * ((theta - 2.0 * PI) / 3.0).cos() - shift);
        return roots;
    }

    let big_a = -r.signum() * (r.abs() + (r * r - q3).sqrt()).cbrt();
    let big_b = if big_a != 0.0 { q / big_a } else { 0.0 };

    roots.push(big_a + big_b - shift);
    if big_a != 0.0 && big_a == big_b {
        // Double root
        roots.push(-0.5 * (big_a + big_b) - shift);
    }
    roots
}

/// Solve the monic quartic `x⁴ + a·x³ + b·x² + c·x + d = 0` (Ferrari).
pub fn quartic_roots(a: f64, b: f64, c: f64, d: f64) -> Roots<4> {
    let mut roots = Roots::none();

    // Depress with x = y - a/4: y⁴ + p·y² + q·y + r = 0
    let a2 = a * a;
    let p = b - 3.0 * a2 / 8.0;
    let q = c - a * b / 2.0 + a2 * a / 8.0;
    let r = d - a * c / 4.0 + a2 * b / 16.0 - 3.0 * a2 * a2 / 256.0;
    let shift = a / 4.0;

    if q.abs() < 1e-12 {
        // Biquadratic in y²
        for z in quadratic_roots(1.0, p, r).iter() {
            if z > 0.0 {
                let y = z.sqrt();
                roots.push(y - shift);
                roots.push(-y - shift);
            } else if z == 0.0 {
                roots.push(-shift);
            }
        }
        return roots;
    }

    // Resolvent cubic m³ + p·m² + (p²/4 - r)·m - q²/8 = 0 always has a positive root
    let m = cubic_roots(p, p * p / 4.0 - r, -q * q / 8.0)
        .iter()
        .fold(f64::NEG_INFINITY, f64::max);
    if m <= 0.0 {
        return roots;
    }

    let s = (2.0 * m).sqrt();
    let k = q / (2.0 * s);
    for y in quadratic_roots(1.0, -s, p / 2.0 + m + k).iter() {
        roots.push(y - shift);
    }
    for y in quadratic_roots(1.0, s, p / 2.0 + m - k).iter() {
        roots.push(y - shift);
    }
    roots
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(slice: &[f64]) -> Vec<f64> {
        let mut v = slice.to_vec();
        v.sort_by(|a, b| a.partial_cmp(b).unwrap());
        v
    }

    fn assert_roots(found: &[f64], expected: &[f64]) {
        let found = sorted(found);
        assert_eq!(found.len(), expected.len(), "roots: {:?}", found);
        for (f, e) in found.iter().zip(expected) {
            assert!((f - e).abs() < 1e-6, "expected {} got {}", e, f);
        }
    }

    #[test]
    fn test_quadratic_two_roots() {
        // (x - 1)(x - 3)
        let roots = quadratic_roots(1.0, -4.0, 3.0);
        assert_roots(roots.as_slice(), &[1.0, 3.0]);
    }

    #[test]
    fn test_quadratic_tangent() {
        // (x - 2)²
        let roots = quadratic_roots(1.0, -4.0, 4.0);
        assert_eq!(roots.len(), 1);
        assert!((roots.as_slice()[0] - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_quadratic_no_roots() {
        assert!(quadratic_roots(1.0, 0.0, 1.0).is_empty());
    }

    #[test]
    fn test_quadratic_linear_fallback() {
        let roots = quadratic_roots(0.0, 2.0, -4.0);
        assert_roots(roots.as_slice(), &[2.0]);
        assert!(quadratic_roots(0.0, 0.0, 1.0).is_empty());
    }

    #[test]
    fn test_quadratic_zero_b() {
        // x² - 9
        let roots = quadratic_roots(1.0, 0.0, -9.0);
        assert_roots(roots.as_slice(), &[-3.0, 3.0]);
    }

    #[test]
    fn test_cubic_three_roots() {
        // (x - 1)(x - 2)(x - 3) = x³ - 6x² + 11x - 6
        let roots = cubic_roots(-6.0, 11.0, -6.0);
        assert_roots(roots.as_slice(), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_cubic_single_root() {
        // (x - 2)(x² + 1) = x³ - 2x² + x - 2
        let roots = cubic_roots(-2.0, 1.0, -2.0);
        assert_roots(roots.as_slice(), &[2.0]);
    }

    #[test]
    fn test_quartic_four_roots() {
        // (x - 1)(x - 2)(x - 3)(x - 4) = x⁴ - 10x³ + 35x² - 50x + 24
        let roots = quartic_roots(-10.0, 35.0, -50.0, 24.0);
        assert_roots(roots.as_slice(), &[1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_quartic_with_odd_terms() {
        // (x - 1)(x - 2)(x - 3)(x + 4) = x⁴ - 2x³ - 13x² + 38x - 24
        let roots = quartic_roots(-2.0, -13.0, 38.0, -24.0);
        assert_roots(roots.as_slice(), &[-4.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_quartic_biquadratic() {
        // (x² - 1)(x² - 4) = x⁴ - 5x² + 4
        let roots = quartic_roots(0.0, -5.0, 0.0, 4.0);
        assert_roots(roots.as_slice(), &[-2.0, -1.0, 1.0, 2.0]);
    }

    #[test]
    fn test_quartic_no_real_roots() {
        // x⁴ + 1
        assert!(quartic_roots(0.0, 0.0, 0.0, 1.0).is_empty());
    }
}
