//! Main Library File for Document Redaction
//! Provides selection, compositing and export of redacted pages from raw
//! text or rendered PDF documents.

// Configuration and Core Pipeline
pub mod config;
pub mod error;
pub mod pipeline;
pub mod session;
pub mod types;

// Selection: which regions or words get hidden
pub mod oracle;
pub mod selector;

// Drawing and compositing
pub mod compositor;
pub mod render;
pub mod surface;

// Export
pub mod output;

// Re-exports for crate consumers
pub use compositor::Compositor;
pub use config::RedactorConfig;
pub use error::{Error, Result};
pub use oracle::{GeminiOracle, NoopOracle, PhraseOracle, StaticOracle};
pub use output::{ImageExporter, PdfExporter};
pub use pipeline::{ProgressUpdate, RedactionInput, RedactionRequest, Redactor, TaskGuard};
pub use render::{DocumentRenderer, PopplerRenderer, RenderedDocument};
pub use session::Session;
pub use surface::Surface;
pub use types::{RedactedPage, RedactionIntensity, RedactionMode, RedactionResult, RedactionStats};
