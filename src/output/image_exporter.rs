//! Per-page JPEG export

use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::ExportConfig;
use crate::error::{ExportError, Result};
use crate::types::RedactedPage;

#[derive(Debug, Clone)]
pub struct ExportedImage {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// One independently named JPEG per surface, numbered from 1 in sequence order
#[derive(Debug, Clone)]
pub struct ImageExporter {
    jpeg_quality: u8,
    name_prefix: String,
}

impl ImageExporter {
    pub fn new(config: &ExportConfig) -> Self {
        Self {
            jpeg_quality: config.image_jpeg_quality,
            name_prefix: config.image_name_prefix.clone(),
        }
    }

    pub fn file_name(&self, index: usize) -> String {
        format!("{}{}.jpg", self.name_prefix, index + 1)
    }

    /// Files `write_to_dir` would create for `count` pages
    pub fn planned_paths(&self, dir: &Path, count: usize) -> Vec<PathBuf> {
        (0..count).map(|index| dir.join(self.file_name(index))).collect()
    }

    pub fn export(&self, pages: &[RedactedPage]) -> Result<Vec<ExportedImage>> {
        if pages.is_empty() {
            return Err(ExportError::NoPages.into());
        }
        pages
            .iter()
            .enumerate()
            .map(|(index, page)| {
                Ok(ExportedImage {
                    file_name: self.file_name(index),
                    bytes: page.surface.encode_jpeg(self.jpeg_quality)?,
                })
            })
            .collect()
    }

    pub fn write_to_dir(&self, pages: &[RedactedPage], dir: &Path) -> Result<Vec<PathBuf>> {
        std::fs::create_dir_all(dir)?;
        let images = self.export(pages)?;
        let written = self.planned_paths(dir, images.len());
        for (image, path) in images.iter().zip(&written) {
            std::fs::write(path, &image.bytes)?;
        }
        info!("🖼️ Wrote {} images to {}", written.len(), dir.display());
        Ok(written)
    }
}

impl Default for ImageExporter {
    fn default() -> Self {
        Self::new(&ExportConfig::default())
    }
}
