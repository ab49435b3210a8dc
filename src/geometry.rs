//! Affine matrices and orientation lookup.
//!
//! Matrices use the PDF row-vector convention `[x' y' 1] = [x y 1] · M`:
//!
//! ```text
//! | a  b  0 |
//! | c  d  0 |
//! | e  f  1 |
//! ```
//!
//! so `compose(m0, m1)` applies `m0` first and `m1` second. Matrices handed to
//! a canvas live in the backend's native space: points, origin at the
//! bottom-left corner of the page.

use std::f64::consts::{FRAC_PI_2, PI};

use glam::{DAffine2, DVec2, dvec2};
use serde::{Deserialize, Serialize};

use crate::render::defaults::NATIVE_UNITS_PER_MM;
use crate::types::{Length, PointMm};

/// Which way a flap (or a line of text) points once drawn.
///
/// The hinge of a flap sits on the edge opposite the direction it points.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    None,
    Up,
    Down,
    Left,
    Right,
}

impl Orientation {
    /// Counter-clockwise rotation (in native, y-up space) in radians.
    pub fn angle(self) -> f64 {
        match self {
            Orientation::None | Orientation::Up => 0.0,
            Orientation::Left => FRAC_PI_2,
            Orientation::Down => PI,
            Orientation::Right => 3.0 * PI / 2.0,
        }
    }

    /// Same rotation in degrees
    pub fn degrees(self) -> f64 {
        self.angle().to_degrees()
    }
}

/// Six-coefficient 2D affine transform
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct AffineMatrix {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Default for AffineMatrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl AffineMatrix {
    pub const IDENTITY: AffineMatrix = AffineMatrix::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);

    pub const fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        AffineMatrix { a, b, c, d, e, f }
    }

    /// Rotation by `angle` radians with zero translation
    pub fn rotation(angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        AffineMatrix::new(cos, sin, -sin, cos, 0.0, 0.0)
    }

    /// Translation by a millimetre delta, expressed in native units.
    ///
    /// This is the only constructor that converts units.
    pub fn translation(dx: Length, dy: Length) -> Self {
        AffineMatrix::new(
            1.0,
            0.0,
            0.0,
            1.0,
            dx.raw() * NATIVE_UNITS_PER_MM,
            dy.raw() * NATIVE_UNITS_PER_MM,
        )
    }

    /// Apply `m0`, then `m1`.
    pub fn compose(m0: AffineMatrix, m1: AffineMatrix) -> AffineMatrix {
        AffineMatrix {
            a: m0.a * m1.a + m0.b * m1.c,
            b: m0.a * m1.b + m0.b * m1.d,
            c: m0.c * m1.a + m0.d * m1.c,
            d: m0.c * m1.b + m0.d * m1.d,
            e: m0.e * m1.a + m0.f * m1.c + m1.e,
            f: m0.e * m1.b + m0.f * m1.d + m1.f,
        }
    }

    /// `self` first, then `next`
    pub fn then(self, next: AffineMatrix) -> AffineMatrix {
        AffineMatrix::compose(self, next)
    }

    /// Transform a point (row-vector convention)
    pub fn apply(&self, p: DVec2) -> DVec2 {
        dvec2(
            p.x * self.a + p.y * self.c + self.e,
            p.x * self.b + p.y * self.d + self.f,
        )
    }

    pub fn to_array(self) -> [f64; 6] {
        [self.a, self.b, self.c, self.d, self.e, self.f]
    }

    /// Column-major glam equivalent; `glam` composes right-to-left, so
    /// `compose(m0, m1)` corresponds to `m1.to_daffine2() * m0.to_daffine2()`.
    pub fn to_daffine2(self) -> DAffine2 {
        DAffine2::from_cols_array(&self.to_array())
    }

    pub fn approx_eq(&self, other: &AffineMatrix, epsilon: f64) -> bool {
        self.to_array()
            .iter()
            .zip(other.to_array().iter())
            .all(|(l, r)| (l - r).abs() <= epsilon)
    }

    /// Page space (millimetres, top-left origin) to native space (points,
    /// bottom-left origin).
    pub fn page_to_native(page_height: Length) -> Self {
        let k = NATIVE_UNITS_PER_MM;
        AffineMatrix::new(k, 0.0, 0.0, -k, 0.0, page_height.raw() * k)
    }

    /// Inverse of [`AffineMatrix::page_to_native`]
    pub fn native_to_page(page_height: Length) -> Self {
        let k = NATIVE_UNITS_PER_MM;
        AffineMatrix::new(1.0 / k, 0.0, 0.0, -1.0 / k, 0.0, page_height.raw())
    }

    /// Re-express a native-space transform in page space.
    pub fn native_to_page_space(self, page_height: Length) -> Self {
        AffineMatrix::page_to_native(page_height)
            .then(self)
            .then(AffineMatrix::native_to_page(page_height))
    }
}

/// Rotation of the coordinate system by `angle` about `pivot`.
///
/// `pivot` is in page space; its y is measured from the bottom edge before
/// translating, because the native origin is the bottom-left corner.
pub fn rotation_about(pivot: PointMm, page_height: Length, angle: f64) -> AffineMatrix {
    let y = page_height - pivot.y;
    AffineMatrix::translation(-pivot.x, -y)
        .then(AffineMatrix::rotation(angle))
        .then(AffineMatrix::translation(pivot.x, y))
}

/// Native-space coordinates of a page-space point
pub fn to_native(p: PointMm, page_height: Length) -> DVec2 {
    AffineMatrix::page_to_native(page_height).apply(dvec2(p.x.raw(), p.y.raw()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::pt;

    const EPSILON: f64 = 1e-9;

    fn sample() -> [AffineMatrix; 3] {
        [
            AffineMatrix::new(0.5, 0.1, -0.1, 0.9, 10.0, -20.0),
            AffineMatrix::rotation(0.7).then(AffineMatrix::translation(Length(3.0), Length(-4.0))),
            AffineMatrix::new(2.0, 0.0, 0.3, 1.5, -7.0, 2.5),
        ]
    }

    #[test]
    fn orientation_table_is_fixed() {
        assert_eq!(Orientation::None.angle(), 0.0);
        assert_eq!(Orientation::Up.angle(), 0.0);
        assert_eq!(Orientation::Left.angle(), PI / 2.0);
        assert_eq!(Orientation::Down.angle(), PI);
        assert_eq!(Orientation::Right.angle(), 3.0 * PI / 2.0);
        assert_eq!(Orientation::default(), Orientation::None);
    }

    #[test]
    fn compose_identity() {
        for m in sample() {
            assert_eq!(AffineMatrix::compose(AffineMatrix::IDENTITY, m), m);
            assert_eq!(AffineMatrix::compose(m, AffineMatrix::IDENTITY), m);
        }
    }

    #[test]
    fn compose_is_associative() {
        let [m0, m1, m2] = sample();
        let left = AffineMatrix::compose(AffineMatrix::compose(m0, m1), m2);
        let right = AffineMatrix::compose(m0, AffineMatrix::compose(m1, m2));
        assert!(left.approx_eq(&right, EPSILON), "{left:?} != {right:?}");
    }

    #[test]
    fn compose_is_not_commutative() {
        let r = AffineMatrix::rotation(FRAC_PI_2);
        let t = AffineMatrix::translation(Length(10.0), Length(0.0));
        assert!(!r.then(t).approx_eq(&t.then(r), EPSILON));
    }

    #[test]
    fn compose_applies_first_matrix_first() {
        let [m0, m1, _] = sample();
        let p = dvec2(3.0, -2.0);
        let composed = AffineMatrix::compose(m0, m1).apply(p);
        let stepwise = m1.apply(m0.apply(p));
        assert!((composed - stepwise).length() < EPSILON);
    }

    #[test]
    fn compose_matches_glam() {
        let [m0, m1, _] = sample();
        let ours = AffineMatrix::compose(m0, m1).to_daffine2();
        let glams = m1.to_daffine2() * m0.to_daffine2();
        assert!(ours.abs_diff_eq(glams, EPSILON));
    }

    #[test]
    fn rotation_is_counter_clockwise_in_native_space() {
        let v = AffineMatrix::rotation(FRAC_PI_2).apply(dvec2(1.0, 0.0));
        assert!((v - dvec2(0.0, 1.0)).length() < EPSILON);
    }

    #[test]
    fn translation_converts_to_native_units() {
        let t = AffineMatrix::translation(Length(10.0), Length(-1.0));
        assert!((t.e - 28.3464).abs() < EPSILON);
        assert!((t.f + 2.83464).abs() < EPSILON);
    }

    #[test]
    fn rotation_about_fixes_the_pivot() {
        let page_height = Length(210.0);
        let pivot = pt(40.0, 25.0);
        for orientation in [Orientation::Left, Orientation::Down, Orientation::Right] {
            let m = rotation_about(pivot, page_height, orientation.angle());
            let native = to_native(pivot, page_height);
            assert!(
                (m.apply(native) - native).length() < 1e-6,
                "{orientation:?}"
            );
        }
    }

    #[test]
    fn rotation_about_unflipped_pivot_misses() {
        // Using the top-based y would pivot about the mirrored point instead.
        let page_height = Length(210.0);
        let pivot = pt(40.0, 25.0);
        let m = rotation_about(pt(40.0, 185.0), page_height, PI);
        let native = to_native(pivot, page_height);
        assert!((m.apply(native) - native).length() > 1.0);
    }

    #[test]
    fn page_native_round_trip() {
        let h = Length(210.0);
        let m = AffineMatrix::page_to_native(h).then(AffineMatrix::native_to_page(h));
        assert!(m.approx_eq(&AffineMatrix::IDENTITY, EPSILON));
    }

    #[test]
    fn rotation_in_page_space_turns_about_pivot() {
        let h = Length(210.0);
        let pivot = pt(100.0, 50.0);
        let m = rotation_about(pivot, h, Orientation::Down.angle()).native_to_page_space(h);
        // Half a turn maps a point 10mm right of the pivot to 10mm left of it.
        let p = m.apply(dvec2(110.0, 50.0));
        assert!((p - dvec2(90.0, 50.0)).length() < 1e-6, "{p:?}");
    }

    #[test]
    fn quarter_turns_in_page_space_point_up_edges_sideways() {
        let h = Length(210.0);
        let pivot = pt(100.0, 50.0);
        let above = dvec2(100.0, 40.0);
        let left = rotation_about(pivot, h, Orientation::Left.angle()).native_to_page_space(h);
        let p = left.apply(above);
        assert!((p - dvec2(90.0, 50.0)).length() < 1e-6, "{p:?}");
        let right = rotation_about(pivot, h, Orientation::Right.angle()).native_to_page_space(h);
        let p = right.apply(above);
        assert!((p - dvec2(110.0, 50.0)).length() < 1e-6, "{p:?}");
    }
}
