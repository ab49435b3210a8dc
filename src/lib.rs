//! Printable flat-pattern templates for card-deck packaging.
//!
//! Three template families are supported: the tuckbox itself, and an
//! optional sleeve or divider-tray insert drawn on a page of its own. Nets
//! are sized from the card width, card length and deck depth in millimetres.
//!
//! ```no_run
//! use tuckbox::{BuildRequest, InsideKind, build};
//!
//! let request = BuildRequest {
//!     inside: InsideKind::Sleeve,
//!     title: "My Deck".to_string(),
//!     ..BuildRequest::new(64.0, 89.0, 13.0)
//! };
//! let templates = build(&request)?;
//! templates.persist("deck.svg")?;
//! # Ok::<(), miette::Report>(())
//! ```

pub mod assembly;
pub mod canvas;
pub mod config;
pub mod errors;
pub mod geometry;
pub mod layout;
pub mod log;
pub mod render;
pub mod types;

pub use assembly::{BuildRequest, Dimensions, InsideKind, PageLayout, Tuckbox, build, build_with};
pub use canvas::{Backend, Canvas, PaperSize, Recorder, SvgCanvas};
pub use config::Config;
pub use errors::{BuildError, ConfigError, RenderError};
pub use layout::tuckbox::{BoxStyle, ImageSet, TitleFaces};
pub use types::{Length, Rgb};
