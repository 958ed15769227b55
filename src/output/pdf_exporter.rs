//! Multi-page PDF assembly
//! Created: 2025-06-07 10:41:55 UTC
//! Author: kartik4091

use std::path::{Path, PathBuf};

use chrono::Utc;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream, StringFormat};
use tracing::{debug, info, instrument};

use crate::config::ExportConfig;
use crate::error::{ExportError, Result};
use crate::types::{PageOrientation, RedactedPage};

const IMAGE_NAME: &str = "Im0";

/// Per-page record of what was written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedPage {
    pub page_number: u32,
    pub width: u32,
    pub height: u32,
    pub orientation: PageOrientation,
    pub image_bytes: usize,
}

#[derive(Debug, Clone, Default)]
pub struct ExportSummary {
    pub pages: Vec<ExportedPage>,
    pub document_bytes: usize,
}

#[derive(Debug, Clone)]
pub struct PdfExport {
    pub bytes: Vec<u8>,
    pub summary: ExportSummary,
}

/// Builds one PDF page per surface, each sized to its surface's pixels
/// with the page embedded as a full-resolution JPEG.
#[derive(Debug, Clone)]
pub struct PdfExporter {
    jpeg_quality: u8,
    file_name: String,
}

impl PdfExporter {
    pub fn new(config: &ExportConfig) -> Self {
        Self {
            jpeg_quality: config.pdf_jpeg_quality,
            file_name: config.pdf_file_name.clone(),
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    #[instrument(skip(self, pages), fields(pages = pages.len()))]
    pub fn export(&self, pages: &[RedactedPage]) -> Result<PdfExport> {
        if pages.is_empty() {
            return Err(ExportError::NoPages.into());
        }

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let mut kids = Vec::with_capacity(pages.len());
        let mut summary = ExportSummary::default();

        for page in pages {
            let surface = &page.surface;
            let (width, height) = (surface.width(), surface.height());
            let jpeg = surface.encode_jpeg(self.jpeg_quality)?;
            let image_bytes = jpeg.len();

            let image_id = doc.add_object(Stream::new(
                dictionary! {
                    "Type" => "XObject",
                    "Subtype" => "Image",
                    "Width" => width as i64,
                    "Height" => height as i64,
                    "ColorSpace" => "DeviceRGB",
                    "BitsPerComponent" => 8,
                    "Filter" => "DCTDecode",
                },
                jpeg,
            ));

            let content = Content {
                operations: vec![
                    Operation::new("q", vec![]),
                    Operation::new(
                        "cm",
                        vec![
                            Object::Integer(width as i64),
                            Object::Integer(0),
                            Object::Integer(0),
                            Object::Integer(height as i64),
                            Object::Integer(0),
                            Object::Integer(0),
                        ],
                    ),
                    Operation::new("Do", vec![Object::Name(IMAGE_NAME.as_bytes().to_vec())]),
                    Operation::new("Q", vec![]),
                ],
            };
            let encoded = content
                .encode()
                .map_err(|e| ExportError::Assembly(e.to_string()))?;
            let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));

            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => Object::Reference(pages_id),
                "MediaBox" => vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(width as i64),
                    Object::Integer(height as i64),
                ],
                "Contents" => Object::Reference(content_id),
                "Resources" => dictionary! {
                    "XObject" => dictionary! {
                        IMAGE_NAME => Object::Reference(image_id),
                    },
                },
            });
            kids.push(Object::Reference(page_id));

            let orientation = PageOrientation::from_size(width, height);
            debug!(
                "Page {}: {}x{} {:?}, {} JPEG bytes",
                page.page_number, width, height, orientation, image_bytes
            );
            summary.pages.push(ExportedPage {
                page_number: page.page_number,
                width,
                height,
                orientation,
                image_bytes,
            });
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => Object::Reference(pages_id),
        });
        let info_id = doc.add_object(dictionary! {
            "Producer" => literal(concat!("blackout ", env!("CARGO_PKG_VERSION"))),
            "CreationDate" => literal(&Utc::now().format("D:%Y%m%d%H%M%SZ").to_string()),
        });
        doc.trailer.set("Root", Object::Reference(catalog_id));
        doc.trailer.set("Info", Object::Reference(info_id));

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes)
            .map_err(|e| ExportError::Assembly(e.to_string()))?;
        summary.document_bytes = bytes.len();

        Ok(PdfExport { bytes, summary })
    }

    /// File `write_to` would create for `path`
    pub fn target_path(&self, path: &Path) -> PathBuf {
        if path.is_dir() {
            path.join(&self.file_name)
        } else {
            path.to_path_buf()
        }
    }

    /// Writes the document to `path`, or to the configured file name in
    /// `path` when it is a directory.
    pub fn write_to(&self, pages: &[RedactedPage], path: &Path) -> Result<PathBuf> {
        let target = self.target_path(path);
        let export = self.export(pages)?;
        std::fs::write(&target, &export.bytes)?;
        info!("📄 Wrote {} pages to {}", export.summary.pages.len(), target.display());
        Ok(target)
    }
}

fn literal(text: &str) -> Object {
    Object::String(text.as_bytes().to_vec(), StringFormat::Literal)
}

impl Default for PdfExporter {
    fn default() -> Self {
        Self::new(&ExportConfig::default())
    }
}
