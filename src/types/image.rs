use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Image category filter understood by the image-search API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageType {
    #[default]
    All,
    Photo,
    Illustration,
    Vector,
}

impl ImageType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Photo => "photo",
            Self::Illustration => "illustration",
            Self::Vector => "vector",
        }
    }
}

impl fmt::Display for ImageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImageType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(Self::All),
            "photo" => Ok(Self::Photo),
            "illustration" => Ok(Self::Illustration),
            "vector" => Ok(Self::Vector),
            _ => Err(format!(
                "Unknown image type: {s}. Supported: all, photo, illustration, vector"
            )),
        }
    }
}

/// Orientation filter understood by the image-search API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    All,
    Horizontal,
    Vertical,
}

impl Orientation {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Horizontal => "horizontal",
            Self::Vertical => "vertical",
        }
    }
}

/// Parameters for one image search
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImageSearchParams {
    pub query: String,
    pub count: Option<u32>,
    pub image_type: Option<ImageType>,
    pub orientation: Option<Orientation>,
    pub category: Option<String>,
    pub min_width: Option<u32>,
    pub min_height: Option<u32>,
}

impl ImageSearchParams {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_count(mut self, count: Option<u32>) -> Self {
        self.count = count;
        self
    }

    #[must_use]
    pub fn with_image_type(mut self, image_type: Option<ImageType>) -> Self {
        self.image_type = image_type;
        self
    }
}

/// An image shaped for the code generator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessedImage {
    pub url: String,
    pub alt: String,
    pub width: u32,
    pub height: u32,
    pub source: String,
    pub license: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribution: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSearchMeta {
    pub query: String,
    pub timestamp: DateTime<Utc>,
    /// Total hits reported by the API
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSearchResult {
    pub images: Vec<ProcessedImage>,
    pub meta: ImageSearchMeta,
}

/// Images carried into code generation, with the suggested layout
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageData {
    pub processed: Vec<ProcessedImage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<String>,
}
