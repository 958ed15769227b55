use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use blackout::config::RedactorConfig;
use blackout::error::{DecodeError, Result};
use blackout::oracle::PhraseOracle;
use blackout::render::{DocumentRenderer, RenderedDocument};
use blackout::Redactor;
use image::{Rgb, RgbImage};
use lopdf::{dictionary, Document, Object};

pub struct TestFixtures;

impl TestFixtures {
    /// Minimal PDF with one empty page per `(width, height)` MediaBox
    pub fn pdf_with_pages(sizes: &[(i64, i64)]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let mut kids = Vec::new();
        for (width, height) in sizes {
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => Object::Reference(pages_id),
                "MediaBox" => vec![0.into(), 0.into(), (*width).into(), (*height).into()],
            });
            kids.push(Object::Reference(page_id));
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
        doc.trailer.set("Root", Object::Reference(catalog_id));

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    pub fn redactor(renderer: StubRenderer, oracle: Arc<dyn PhraseOracle>) -> Redactor {
        Redactor::new(RedactorConfig::default(), Arc::new(renderer), oracle)
    }
}

/// Renders blank white pages of fixed sizes and records the render order
#[derive(Clone)]
pub struct StubRenderer {
    pages: Vec<(u32, u32)>,
    unrenderable: Option<u32>,
    opened: Arc<Mutex<u32>>,
    rendered: Arc<Mutex<Vec<u32>>>,
}

impl StubRenderer {
    pub fn new(pages: Vec<(u32, u32)>) -> Self {
        Self {
            pages,
            unrenderable: None,
            opened: Arc::new(Mutex::new(0)),
            rendered: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// `page` fails the way a corrupt page fails in pdftoppm
    pub fn with_unrenderable_page(mut self, page: u32) -> Self {
        self.unrenderable = Some(page);
        self
    }

    pub fn render_log(&self) -> Arc<Mutex<Vec<u32>>> {
        Arc::clone(&self.rendered)
    }

    pub fn open_count(&self) -> Arc<Mutex<u32>> {
        Arc::clone(&self.opened)
    }
}

#[async_trait]
impl DocumentRenderer for StubRenderer {
    async fn open(&self, document: &[u8]) -> Result<Box<dyn RenderedDocument>> {
        if document.is_empty() {
            return Err(DecodeError::Empty.into());
        }
        *self.opened.lock().unwrap() += 1;
        Ok(Box::new(self.clone()))
    }
}

#[async_trait]
impl RenderedDocument for StubRenderer {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    async fn render_page(&self, page: u32, scale: f64) -> Result<RgbImage> {
        self.rendered.lock().unwrap().push(page);
        if self.unrenderable == Some(page) {
            return Err(DecodeError::PageUnrenderable {
                page,
                reason: "pdftoppm exited with exit status: 1".into(),
            }
            .into());
        }
        let (width, height) = self.pages[page as usize - 1];
        let scaled = |v: u32| (v as f64 * scale).round() as u32;
        Ok(RgbImage::from_pixel(scaled(width), scaled(height), Rgb([255, 255, 255])))
    }
}
