//! TOML configuration for a build.
//!
//! Keys are kebab-case and every key is optional:
//!
//! ```toml
//! unit = "in"
//! card-width = 2.5
//! card-length = 3.5
//! box-depth = 0.75
//! inside = "sleeve"
//! fill = "#ffeedd"
//! title = "Lost Cities"
//!
//! [images]
//! front = "art/front.png"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::assembly::{BuildRequest, InsideKind};
use crate::canvas::{ImageFormat, ImageHandle, PaperSize};
use crate::errors::{ConfigError, SourceContext};
use crate::layout::tuckbox::{ImageSet, TitleFaces};
use crate::log::debug;
use crate::render::defaults::MM_TO_INCHES;
use crate::types::Rgb;

/// Unit the dimensions in a configuration are written in
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    #[default]
    Mm,
    In,
}

impl Unit {
    pub fn to_mm(self, value: f64) -> f64 {
        match self {
            Unit::Mm => value,
            Unit::In => value / MM_TO_INCHES,
        }
    }
}

/// Image files, relative to the configuration file
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImagePaths {
    pub front: Option<PathBuf>,
    pub back: Option<PathBuf>,
    pub side: Option<PathBuf>,
    pub top: Option<PathBuf>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields, default)]
pub struct Config {
    pub unit: Unit,
    pub card_width: f64,
    pub card_length: f64,
    pub box_depth: f64,
    pub inside: InsideKind,
    pub fill: String,
    pub text_color: String,
    pub title: String,
    pub title_faces: TitleFaces,
    pub paper: PaperSize,
    pub images: ImagePaths,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            unit: Unit::Mm,
            card_width: 64.0,
            card_length: 89.0,
            box_depth: 13.0,
            inside: InsideKind::None,
            fill: "#ffffff".to_string(),
            text_color: "#000000".to_string(),
            title: String::new(),
            title_faces: TitleFaces::Front,
            paper: PaperSize::A4,
            images: ImagePaths::default(),
        }
    }
}

impl Config {
    /// Parse a configuration; `name` labels the source in diagnostics.
    pub fn from_toml_str(name: &str, src: &str) -> Result<Config, ConfigError> {
        toml::from_str(src)
            .map_err(|err| ConfigError::from_toml(&SourceContext::new(name, src), err))
    }

    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        let src = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Config::from_toml_str(&path.display().to_string(), &src)
    }

    /// Convert to a millimetre request. Images are left empty; see
    /// [`Config::load_images`].
    pub fn to_request(&self) -> BuildRequest {
        BuildRequest {
            width: self.unit.to_mm(self.card_width),
            length: self.unit.to_mm(self.card_length),
            depth: self.unit.to_mm(self.box_depth),
            inside: self.inside,
            fill: Rgb::parse_lenient(&self.fill),
            text_color: Rgb::parse_lenient(&self.text_color),
            title: self.title.clone(),
            title_faces: self.title_faces,
            images: ImageSet::default(),
            paper: self.paper,
        }
    }

    /// Read every configured image, resolving relative paths against
    /// `base_dir`.
    pub fn load_images(&self, base_dir: &Path) -> Result<ImageSet, ConfigError> {
        let load = |path: &Option<PathBuf>| -> Result<Option<ImageHandle>, ConfigError> {
            path.as_deref().map(|path| load_image(&base_dir.join(path))).transpose()
        };
        Ok(ImageSet {
            front: load(&self.images.front)?,
            back: load(&self.images.back)?,
            side: load(&self.images.side)?,
            top: load(&self.images.top)?,
        })
    }
}

fn load_image(path: &Path) -> Result<ImageHandle, ConfigError> {
    let format = path
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(ImageFormat::from_extension)
        .ok_or_else(|| ConfigError::UnsupportedImage {
            path: path.to_path_buf(),
        })?;
    let data = fs::read(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), bytes = data.len(), "loaded image");
    Ok(ImageHandle::new(format, data))
}
