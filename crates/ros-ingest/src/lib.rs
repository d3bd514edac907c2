//! ROS Ingress Ingest Library
//!
//! Archive extraction, manifest resolution, and the upload pipeline that
//! sequences extract -> resolve -> upload -> notify for one request.

pub mod extractor;
pub mod pipeline;
pub mod resolver;

// Re-export commonly used types
pub use extractor::{ExtractedArchive, ExtractionDir, PayloadExtractor};
pub use pipeline::{PipelineResult, UploadPipeline};
pub use resolver::SelectedFile;
