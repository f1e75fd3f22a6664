//! Output page rendering
//!
//! [`PdfSink`] turns each page tile into one PDF page whose image fills
//! the physical page size.

use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

use super::xobject::create_jpeg_xobject;
use crate::constants::cm_to_pt;
use crate::layout::{GridPosition, LayoutPlan};
use crate::preview::encode_jpeg;
use crate::tiles::TileSink;
use crate::types::Result;
use image::RgbImage;

/// Tile sink that builds an in-memory PDF document
pub struct PdfSink {
    output: Document,
    pages_tree_id: ObjectId,
    page_refs: Vec<Object>,
    page_width_pt: f32,
    page_height_pt: f32,
    jpeg_quality: u8,
}

impl PdfSink {
    /// Create a sink for pages of `plan`'s physical page size
    pub fn new(plan: &LayoutPlan, jpeg_quality: u8) -> Self {
        let mut output = Document::with_version("1.7");
        let pages_tree_id = output.new_object_id();

        Self {
            output,
            pages_tree_id,
            page_refs: Vec::new(),
            page_width_pt: cm_to_pt(plan.page_cm.0) as f32,
            page_height_pt: cm_to_pt(plan.page_cm.1) as f32,
            jpeg_quality,
        }
    }

    /// Number of pages added so far
    pub fn page_count(&self) -> usize {
        self.page_refs.len()
    }

    /// Add one page showing `tile` scaled to the full page
    pub fn add_page(&mut self, tile: &RgbImage) -> Result<ObjectId> {
        let jpeg = encode_jpeg(tile, self.jpeg_quality)?;
        let image_id = create_jpeg_xobject(&mut self.output, jpeg, tile.width(), tile.height());

        let mut xobjects = Dictionary::new();
        xobjects.set("Im0", Object::Reference(image_id));
        let mut resources = Dictionary::new();
        resources.set("XObject", Object::Dictionary(xobjects));

        // Image space is the unit square; scale it to the page
        let content = format!(
            "q {} 0 0 {} 0 0 cm /Im0 Do Q\n",
            self.page_width_pt, self.page_height_pt
        );
        let content_id = self
            .output
            .add_object(Stream::new(Dictionary::new(), content.into_bytes()));

        let mut page_dict = Dictionary::new();
        page_dict.set("Type", Object::Name(b"Page".to_vec()));
        page_dict.set("Parent", Object::Reference(self.pages_tree_id));
        page_dict.set(
            "MediaBox",
            Object::Array(vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Real(self.page_width_pt),
                Object::Real(self.page_height_pt),
            ]),
        );
        page_dict.set("Contents", Object::Reference(content_id));
        page_dict.set("Resources", Object::Dictionary(resources));

        let page_id = self.output.add_object(page_dict);
        self.page_refs.push(Object::Reference(page_id));
        Ok(page_id)
    }

    /// Assemble the page tree and catalog
    pub fn into_document(mut self) -> Document {
        let count = self.page_refs.len() as i64;
        let pages_dict = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Kids", Object::Array(self.page_refs)),
            ("Count", Object::Integer(count)),
        ]);
        self.output
            .objects
            .insert(self.pages_tree_id, Object::Dictionary(pages_dict));

        let catalog_id = self.output.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Catalog".to_vec())),
            ("Pages", Object::Reference(self.pages_tree_id)),
        ]));
        self.output.trailer.set("Root", catalog_id);

        self.output
    }

    /// Serialize the finished document
    pub fn finish(self) -> Result<Vec<u8>> {
        let mut doc = self.into_document();
        let mut writer = Vec::new();
        doc.save_to(&mut writer)?;
        Ok(writer)
    }
}

impl TileSink for PdfSink {
    fn emit(&mut self, _pos: GridPosition, page: &RgbImage) -> Result<()> {
        self.add_page(page)?;
        Ok(())
    }
}
