//! Strongly-typed numeric primitives for tuckbox layouts (zero-cost newtypes).
//!
//! All layout math runs in millimetres, with the origin at the top-left corner
//! of the page and y growing downwards. Conversion to a backend's native unit
//! happens only at the canvas boundary.

use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};
use std::sync::LazyLock;

use regex_lite::Regex;
use serde::Serialize;

/// Error type for invalid numeric values
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericError {
    /// Value is NaN
    NaN,
    /// Value is infinite
    Infinite,
    /// Value is zero when non-zero required
    Zero,
    /// Value is negative when positive required
    Negative,
}

impl fmt::Display for NumericError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericError::NaN => write!(f, "value is NaN"),
            NumericError::Infinite => write!(f, "value is infinite"),
            NumericError::Zero => write!(f, "value is zero"),
            NumericError::Negative => write!(f, "value is negative"),
        }
    }
}

impl std::error::Error for NumericError {}

/// Length in millimetres (the working unit)
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Default, Serialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Length(pub f64);

impl Length {
    pub const ZERO: Length = Length(0.0);

    /// Create a Length from millimetres (const-friendly, unchecked).
    /// Use `try_positive` for user-provided values.
    #[inline]
    pub const fn mm(val: f64) -> Length {
        Length(val)
    }

    /// Create a strictly positive Length with validation
    #[inline]
    pub fn try_positive(val: f64) -> Result<Length, NumericError> {
        if val.is_nan() {
            Err(NumericError::NaN)
        } else if val.is_infinite() {
            Err(NumericError::Infinite)
        } else if val == 0.0 {
            Err(NumericError::Zero)
        } else if val < 0.0 {
            Err(NumericError::Negative)
        } else {
            Ok(Length(val))
        }
    }

    /// Get the minimum of two lengths
    #[inline]
    pub fn min(self, other: Length) -> Length {
        Length(self.0.min(other.0))
    }

    /// Get the maximum of two lengths
    #[inline]
    pub fn max(self, other: Length) -> Length {
        Length(self.0.max(other.0))
    }

    /// Get the raw value (use sparingly, prefer typed operations)
    #[inline]
    pub fn raw(self) -> f64 {
        self.0
    }
}

impl Add for Length {
    type Output = Length;
    fn add(self, rhs: Length) -> Length {
        Length(self.0 + rhs.0)
    }
}
impl Sub for Length {
    type Output = Length;
    fn sub(self, rhs: Length) -> Length {
        Length(self.0 - rhs.0)
    }
}
impl Mul<f64> for Length {
    type Output = Length;
    fn mul(self, rhs: f64) -> Length {
        Length(self.0 * rhs)
    }
}
impl Div<f64> for Length {
    type Output = Length;
    fn div(self, rhs: f64) -> Length {
        Length(self.0 / rhs)
    }
}

impl Neg for Length {
    type Output = Length;
    fn neg(self) -> Length {
        Length(-self.0)
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}mm", self.0)
    }
}

/// Generic 2D point
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize)]
pub struct Point<T> {
    pub x: T,
    pub y: T,
}

impl<T> Point<T> {
    pub fn new(x: T, y: T) -> Self {
        Point { x, y }
    }
}

impl Point<Length> {
    /// Translate by raw millimetre deltas
    pub fn offset(self, dx: Length, dy: Length) -> Self {
        Point {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// 2D size
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize)]
pub struct Size<T> {
    pub w: T,
    pub h: T,
}

impl<T> Size<T> {
    pub fn new(w: T, h: T) -> Self {
        Size { w, h }
    }
}

impl Size<Length> {
    /// Half of this size as an offset from a center to the bottom-right corner
    pub fn half(self) -> Offset<Length> {
        Offset {
            dx: self.w / 2.0,
            dy: self.h / 2.0,
        }
    }
}

/// Axis-aligned bounding box
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BBox<T> {
    pub min: Point<T>,
    pub max: Point<T>,
}

impl BBox<Length> {
    /// Create an empty bounding box (will expand on first point)
    pub fn new() -> Self {
        BBox {
            min: Point {
                x: Length(f64::MAX),
                y: Length(f64::MAX),
            },
            max: Point {
                x: Length(f64::MIN),
                y: Length(f64::MIN),
            },
        }
    }

    /// Check if the bbox is empty (never expanded)
    pub fn is_empty(&self) -> bool {
        self.min.x.0 > self.max.x.0 || self.min.y.0 > self.max.y.0
    }

    /// Expand to include a point
    pub fn expand_point(&mut self, p: Point<Length>) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
    }

    /// Expand to include a rectangle defined by center and size
    pub fn expand_rect(&mut self, center: Point<Length>, size: Size<Length>) {
        let hw = size.w / 2.0;
        let hh = size.h / 2.0;
        self.expand_point(Point {
            x: center.x - hw,
            y: center.y - hh,
        });
        self.expand_point(Point {
            x: center.x + hw,
            y: center.y + hh,
        });
    }

    pub fn width(&self) -> Length {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> Length {
        self.max.y - self.min.y
    }

    pub fn size(&self) -> Size<Length> {
        Size {
            w: self.width(),
            h: self.height(),
        }
    }

    pub fn center(&self) -> Point<Length> {
        Point {
            x: (self.min.x + self.max.x) / 2.0,
            y: (self.min.y + self.max.y) / 2.0,
        }
    }
}

impl Default for BBox<Length> {
    fn default() -> Self {
        Self::new()
    }
}

/// A displacement/offset vector (not an absolute position)
/// Use this for translations; Point + Offset = Point
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize)]
pub struct Offset<T> {
    pub dx: T,
    pub dy: T,
}

impl<T> Offset<T> {
    pub fn new(dx: T, dy: T) -> Self {
        Offset { dx, dy }
    }
}

/// Add an offset to a point to get a new point
impl Add<Offset<Length>> for Point<Length> {
    type Output = Point<Length>;
    fn add(self, rhs: Offset<Length>) -> Point<Length> {
        Point {
            x: self.x + rhs.dx,
            y: self.y + rhs.dy,
        }
    }
}

/// Subtract an offset from a point
impl Sub<Offset<Length>> for Point<Length> {
    type Output = Point<Length>;
    fn sub(self, rhs: Offset<Length>) -> Point<Length> {
        Point {
            x: self.x - rhs.dx,
            y: self.y - rhs.dy,
        }
    }
}

/// Subtract two points to get an offset
impl Sub<Point<Length>> for Point<Length> {
    type Output = Offset<Length>;
    fn sub(self, rhs: Point<Length>) -> Offset<Length> {
        Offset {
            dx: self.x - rhs.x,
            dy: self.y - rhs.y,
        }
    }
}

/// Convenient aliases
pub type PointMm = Point<Length>;
pub type SizeMm = Size<Length>;
pub type OffsetMm = Offset<Length>;
pub type BoxMm = BBox<Length>;

/// Shorthand for a point in millimetres
pub fn pt(x: f64, y: f64) -> PointMm {
    Point::new(Length(x), Length(y))
}

/// Shorthand for a size in millimetres
pub fn size(w: f64, h: f64) -> SizeMm {
    Size::new(Length(w), Length(h))
}

/// Shorthand for an offset in millimetres
pub fn offset(dx: f64, dy: f64) -> OffsetMm {
    Offset::new(Length(dx), Length(dy))
}

/// 8-bit RGB color
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

static HEX_COLOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^#?([0-9a-f]{6})").expect("hex color pattern is valid"));

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const WHITE: Rgb = Rgb(255, 255, 255);

    /// A neutral gray with all three channels set to `level`
    pub const fn gray(level: u8) -> Rgb {
        Rgb(level, level, level)
    }

    /// Parse a six-digit hex color, optionally prefixed with `#`.
    ///
    /// Matching is case-insensitive and anchored at the start only, so
    /// trailing characters after the sixth digit are ignored. Anything else
    /// yields `None`; callers treat that as "no color".
    pub fn parse_lenient(input: &str) -> Option<Rgb> {
        let Some(caps) = HEX_COLOR.captures(input.trim()) else {
            crate::log::warn!(input, "ignoring malformed color");
            return None;
        };
        let bits = u32::from_str_radix(&caps[1], 16).ok()?;
        Some(Rgb(
            ((bits >> 16) & 0xff) as u8,
            ((bits >> 8) & 0xff) as u8,
            (bits & 0xff) as u8,
        ))
    }

    /// Hex notation, e.g. `#ff8000`
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({},{},{})", self.0, self.1, self.2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Length tests ====================

    #[test]
    fn length_try_positive_valid() {
        assert_eq!(Length::try_positive(1.0), Ok(Length(1.0)));
        assert_eq!(Length::try_positive(0.001), Ok(Length(0.001)));
    }

    #[test]
    fn length_try_positive_rejects_zero_and_negative() {
        assert_eq!(Length::try_positive(0.0), Err(NumericError::Zero));
        assert_eq!(Length::try_positive(-3.0), Err(NumericError::Negative));
    }

    #[test]
    fn length_try_positive_rejects_non_finite() {
        assert_eq!(Length::try_positive(f64::NAN), Err(NumericError::NaN));
        assert_eq!(
            Length::try_positive(f64::INFINITY),
            Err(NumericError::Infinite)
        );
        assert_eq!(
            Length::try_positive(f64::NEG_INFINITY),
            Err(NumericError::Infinite)
        );
    }

    #[test]
    fn length_arithmetic() {
        let a = Length(3.0);
        let b = Length(2.0);

        assert_eq!(a + b, Length(5.0));
        assert_eq!(a - b, Length(1.0));
        assert_eq!(a * 2.0, Length(6.0));
        assert_eq!(a / 2.0, Length(1.5));
        assert_eq!(-a, Length(-3.0));
    }

    #[test]
    fn length_min_max() {
        let a = Length(3.0);
        let b = Length(5.0);

        assert_eq!(a.min(b), Length(3.0));
        assert_eq!(a.max(b), Length(5.0));
    }

    // ==================== Point/Offset tests ====================

    #[test]
    fn point_plus_offset_gives_point() {
        let result = pt(1.0, 2.0) + offset(3.0, 4.0);
        assert_eq!(result, pt(4.0, 6.0));
    }

    #[test]
    fn point_minus_point_gives_offset() {
        let delta = pt(5.0, 7.0) - pt(2.0, 3.0);
        assert_eq!(delta, offset(3.0, 4.0));
    }

    #[test]
    fn size_half_is_corner_offset() {
        assert_eq!(size(10.0, 4.0).half(), offset(5.0, 2.0));
    }

    // ==================== BBox tests ====================

    #[test]
    fn bbox_new_is_empty() {
        assert!(BBox::<Length>::new().is_empty());
    }

    #[test]
    fn bbox_expand_rect() {
        let mut bb = BBox::<Length>::new();
        bb.expand_rect(pt(5.0, 5.0), size(4.0, 2.0));

        assert_eq!(bb.min, pt(3.0, 4.0));
        assert_eq!(bb.max, pt(7.0, 6.0));
        assert_eq!(bb.size(), size(4.0, 2.0));
        assert_eq!(bb.center(), pt(5.0, 5.0));
    }

    // ==================== Rgb tests ====================

    #[test]
    fn rgb_parses_with_and_without_hash() {
        assert_eq!(Rgb::parse_lenient("#ff8000"), Some(Rgb(255, 128, 0)));
        assert_eq!(Rgb::parse_lenient("ff8000"), Some(Rgb(255, 128, 0)));
    }

    #[test]
    fn rgb_parse_is_case_insensitive() {
        assert_eq!(Rgb::parse_lenient("#AbCdEf"), Some(Rgb(0xab, 0xcd, 0xef)));
    }

    #[test]
    fn rgb_parse_ignores_trailing_text() {
        assert_eq!(Rgb::parse_lenient("#102030ff"), Some(Rgb(0x10, 0x20, 0x30)));
    }

    #[test]
    fn rgb_parse_drops_malformed_input() {
        assert_eq!(Rgb::parse_lenient("zzzzzz"), None);
        assert_eq!(Rgb::parse_lenient("#fff"), None);
        assert_eq!(Rgb::parse_lenient(""), None);
        assert_eq!(Rgb::parse_lenient("red"), None);
    }

    #[test]
    fn rgb_formats() {
        assert_eq!(Rgb(1, 2, 3).to_string(), "rgb(1,2,3)");
        assert_eq!(Rgb(255, 0, 16).to_hex(), "#ff0010");
    }
}
