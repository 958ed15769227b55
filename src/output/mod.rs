//! Output module: serialises composited pages
//! Created: 2025-06-03 16:18:02 UTC
//! Author: kartik4091

pub mod image_exporter;
pub mod pdf_exporter;

pub use image_exporter::{ExportedImage, ImageExporter};
pub use pdf_exporter::{ExportSummary, ExportedPage, PdfExport, PdfExporter};
