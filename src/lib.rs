//! Command-line client for the Cloud Vision image annotation API.
//!
//! [`VisionClient`] fetches label, text and face annotations through an
//! [`AnnotationService`]; [`report`] renders them as text.

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod input;
pub mod model;
pub mod report;
pub mod service;

pub use client::{LabeledImage, VisionClient};
pub use config::Config;
pub use error::{VisionError, VisionResult};
pub use input::ImageInput;
pub use service::{AnnotationService, HttpAnnotationService};
