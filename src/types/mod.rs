//! Data model for the generation pipeline
//!
//! - Generation requests, state and results
//! - Image search parameters and processed images
//! - Layout requirements and results

mod generation;
mod image;
mod layout;

pub use generation::{
    GeneratedCode, GenerationMeta, GenerationOptions, GenerationRequest, GenerationResult,
    GenerationState, ImageRequirements, Requirements, StateRequirements, StyleRequirements,
};

pub use image::{
    ImageData, ImageSearchMeta, ImageSearchParams, ImageSearchResult, ImageType, Orientation,
    ProcessedImage,
};

pub use layout::{
    ElementSize, LayoutConstraints, LayoutElement, LayoutMeta, LayoutRequirements, LayoutResult,
};
