//! Built-in font metrics for the standard Helvetica faces.
//!
//! Widths come from the Adobe core font metrics, in thousandths of an em,
//! for the printable ASCII range.

use crate::render::defaults::{LINE_HEIGHT_FACTOR, MM_TO_INCHES, POINTS_PER_INCH};
use crate::types::Length;

use super::{FontWeight, TextMetrics};

/// Helvetica advance widths for ' '..='~'
#[rustfmt::skip]
pub const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191,
    333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556,
    556, 556, 278, 278, 584, 584, 584, 556,
   1015, 667, 667, 722, 722, 667, 611, 778,
    722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944,
    667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556,
    556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722,
    500, 500, 500, 334, 260, 334, 584,
];

/// Helvetica-Bold advance widths for ' '..='~'
#[rustfmt::skip]
pub const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238,
    333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556,
    556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778,
    722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944,
    667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611,
    611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778,
    556, 556, 500, 389, 280, 389, 584,
];

/// Width used for characters outside the table
const FALLBACK_WIDTH: u16 = 556;

/// Width of `text` in ems.
pub fn string_unit_width(text: &str, weight: FontWeight) -> f64 {
    let table = match weight {
        FontWeight::Normal => &HELVETICA,
        FontWeight::Bold => &HELVETICA_BOLD,
    };
    let mut total: u64 = 0;
    for c in text.chars() {
        total += if (' '..='~').contains(&c) {
            u64::from(table[(c as usize) - 0x20])
        } else {
            u64::from(FALLBACK_WIDTH)
        };
    }
    total as f64 / 1000.0
}

/// Convert a size in points to millimetres.
pub(crate) fn points_to_mm(points: f64) -> Length {
    Length(points / POINTS_PER_INCH / MM_TO_INCHES)
}

/// Measure `text` set at `size_pt` points.
pub fn measure(text: &str, size_pt: f64, weight: FontWeight) -> TextMetrics {
    TextMetrics {
        width: points_to_mm(string_unit_width(text, weight) * size_pt),
        line_height: points_to_mm(size_pt * LINE_HEIGHT_FACTOR),
    }
}
