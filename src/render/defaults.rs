//! Fixed template constants (all lengths in millimetres)

use crate::types::{Length, Rgb};

/// Millimetres to inches
pub const MM_TO_INCHES: f64 = 0.03937;
/// Points per inch in the native (PDF) space
pub const POINTS_PER_INCH: f64 = 72.0;
/// The single working-unit → native-unit factor
pub const NATIVE_UNITS_PER_MM: f64 = POINTS_PER_INCH * MM_TO_INCHES;

pub const LINE_WIDTH: Length = Length::mm(0.2);
pub const OUTLINE_GRAY: Rgb = Rgb::gray(160);
pub const CUT_MARK_COLOR: Rgb = Rgb::BLACK;

// Box
pub const SIDE_FLAP_DEPTH_RATIO: f64 = 0.9;
pub const LR_FLAP_MAX_HEIGHT: Length = Length::mm(15.875);
pub const TOP_TOP_FLAP_MIN_HEIGHT: Length = Length::mm(12.7);
pub const INSIDE_FLAP_ATTENUATION: Length = Length::mm(1.5875);
pub const THUMB_CUTOUT_RADIUS: Length = Length::mm(8.46);
pub const CUT_MARK_LENGTH: Length = Length::mm(9.525);
/// Added to every box dimension when an insert shares the build
pub const INSERT_CLEARANCE: Length = Length::mm(1.5);

// Sleeve
pub const SLEEVE_TAB_LENGTH: Length = Length::mm(6.35);
pub const SLEEVE_TAB_WIDTH: Length = Length::mm(12.7);
pub const SLEEVE_FLAP_ATTENUATION: Length = Length::mm(1.5875);

// Tray
pub const TRAY_GAP_WIDTH: Length = Length::mm(25.0);
pub const TRAY_FLAP_ATTENUATION: Length = Length::mm(1.5875);

// Text
pub const FONT_FAMILY: &str = "helvetica";
pub const TITLE_FONT_SIZE: f64 = 20.0;
pub const SIDE_TITLE_FONT_SIZE: f64 = 23.0;
/// Line height as a multiple of the font size
pub const LINE_HEIGHT_FACTOR: f64 = 1.15;
/// Share of the line height treated as the visual text height
pub const TEXT_HEIGHT_RATIO: f64 = 0.6;
/// Title offset from the front panel center, as a share of its height
pub const FRONT_TITLE_OFFSET_RATIO: f64 = 0.25;
