//! Minimal page-oriented drawing surface over `lopdf`.
//!
//! Mirrors the usual canvas workflow: pick a font, draw strings at absolute
//! positions (PDF user space, origin bottom-left), commit the page with
//! `show_page`, and finally serialize. Only the standard Type1 fonts are used,
//! so nothing needs embedding.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream, StringFormat};

use crate::documents::RenderError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width: f32,
    pub height: f32,
}

pub const A4: PageSize = PageSize {
    width: 595.2756,
    height: 841.8898,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Helvetica,
    HelveticaBold,
    TimesRoman,
}

impl Font {
    const ALL: [Font; 3] = [Font::Helvetica, Font::HelveticaBold, Font::TimesRoman];

    fn resource_name(self) -> &'static str {
        match self {
            Font::Helvetica => "F1",
            Font::HelveticaBold => "F2",
            Font::TimesRoman => "F3",
        }
    }

    fn base_font(self) -> &'static str {
        match self {
            Font::Helvetica => "Helvetica",
            Font::HelveticaBold => "Helvetica-Bold",
            Font::TimesRoman => "Times-Roman",
        }
    }
}

pub struct PdfCanvas {
    doc: Document,
    pages_id: ObjectId,
    resources_id: ObjectId,
    page_ids: Vec<ObjectId>,
    operations: Vec<Operation>,
    font: Font,
    font_size: f32,
    size: PageSize,
}

impl PdfCanvas {
    pub fn new(size: PageSize) -> Self {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();

        let mut fonts = Dictionary::new();
        for font in Font::ALL {
            let font_id = doc.add_object(dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => font.base_font(),
                "Encoding" => "WinAnsiEncoding",
            });
            fonts.set(font.resource_name(), font_id);
        }
        let resources_id = doc.add_object(dictionary! { "Font" => fonts });

        Self {
            doc,
            pages_id,
            resources_id,
            page_ids: Vec::new(),
            operations: Vec::new(),
            font: Font::Helvetica,
            font_size: 12.0,
            size,
        }
    }

    pub fn size(&self) -> PageSize {
        self.size
    }

    /// Number of pages committed so far.
    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    pub fn set_font(&mut self, font: Font, size: f32) {
        self.font = font;
        self.font_size = size;
    }

    pub fn draw_string(&mut self, x: f32, y: f32, text: &str) {
        self.operations.extend([
            Operation::new("BT", vec![]),
            Operation::new(
                "Tf",
                vec![
                    Object::Name(self.font.resource_name().as_bytes().to_vec()),
                    self.font_size.into(),
                ],
            ),
            Operation::new("Td", vec![x.into(), y.into()]),
            Operation::new(
                "Tj",
                vec![Object::String(to_win_ansi(text), StringFormat::Literal)],
            ),
            Operation::new("ET", vec![]),
        ]);
    }

    /// Commits the current page and starts a fresh one.
    pub fn show_page(&mut self) -> Result<(), RenderError> {
        let content = Content {
            operations: std::mem::take(&mut self.operations),
        };
        let content_id = self
            .doc
            .add_object(Stream::new(Dictionary::new(), content.encode()?));

        let page_id = self.doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                self.size.width.into(),
                self.size.height.into(),
            ],
            "Contents" => content_id,
            "Resources" => self.resources_id,
        });
        self.page_ids.push(page_id);
        Ok(())
    }

    /// Builds the page tree and returns the finished document.
    /// Drawing done after the last `show_page` is discarded.
    pub fn finish(mut self) -> Result<Document, RenderError> {
        if self.page_ids.is_empty() {
            return Err(RenderError::EmptyDocument);
        }

        let kids: Vec<Object> = self.page_ids.iter().map(|id| (*id).into()).collect();
        self.doc.objects.insert(
            self.pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => self.page_ids.len() as i64,
            }),
        );

        let catalog_id = self.doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        self.doc.trailer.set("Root", catalog_id);
        Ok(self.doc)
    }

    pub fn write_to<W: Write>(self, target: &mut W) -> Result<(), RenderError> {
        let mut doc = self.finish()?;
        doc.save_to(target)?;
        Ok(())
    }

    pub fn save(self, path: &Path) -> Result<(), RenderError> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_to(&mut writer)?;
        writer.flush()?;
        Ok(())
    }
}

/// Encodes text for a WinAnsi standard font. Latin-1 maps byte-for-byte;
/// anything else becomes `?`.
fn to_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c as u32 {
            0x20..=0x7E | 0xA0..=0xFF => c as u32 as u8,
            _ => b'?',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_canvas_cannot_finish() {
        let canvas = PdfCanvas::new(A4);
        assert!(matches!(canvas.finish(), Err(RenderError::EmptyDocument)));
    }

    #[test]
    fn test_pages_round_trip_through_lopdf() {
        let mut canvas = PdfCanvas::new(A4);
        for i in 1..=3 {
            canvas.set_font(Font::HelveticaBold, 14.0);
            canvas.draw_string(50.0, 780.0, &format!("Heading {i}"));
            canvas.show_page().unwrap();
        }
        assert_eq!(canvas.page_count(), 3);

        let mut bytes = Vec::new();
        canvas.write_to(&mut bytes).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));

        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 3);
        let text = doc.extract_text(&[2]).unwrap();
        assert!(text.contains("Heading 2"), "extracted: {text:?}");
    }

    #[test]
    fn test_win_ansi_replaces_unencodable() {
        assert_eq!(to_win_ansi("Café ✓"), vec![b'C', b'a', b'f', 0xE9, b' ', b'?']);
    }
}
