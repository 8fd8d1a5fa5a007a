//! Fixed-layout drawing of invoices and contracts.
//!
//! Layout is a straight sequence of draw calls per page. Nothing carries over
//! between pages except the canvas itself.

use std::path::Path;

use crate::documents::canvas::{Font, PdfCanvas, A4};
use crate::documents::content::ContentSource;
use crate::documents::model::{DocType, DocumentSpec, LineItem, PageBody, PageContent};
use crate::documents::RenderError;

const LEFT: f32 = 50.0;
const QTY_X: f32 = 300.0;
const PRICE_X: f32 = 350.0;
const TOTAL_X: f32 = 420.0;
const GRAND_TOTAL_X: f32 = 440.0;
const SIGN_DATE_X: f32 = 300.0;
const ROW_HEIGHT: f32 = 20.0;
const CLAUSE_SPACING: f32 = 30.0;

/// Samples a fresh document and writes it to `path`.
/// Returns the sampled content so callers can inspect what was drawn.
pub fn render_to_file<S: ContentSource + ?Sized>(
    doc_type: DocType,
    page_count: u32,
    source: &mut S,
    path: &Path,
) -> Result<DocumentSpec, RenderError> {
    let spec = DocumentSpec::sample(doc_type, page_count, source)?;
    let mut canvas = PdfCanvas::new(A4);
    render(&spec, &mut canvas)?;
    canvas.save(path)?;
    Ok(spec)
}

/// Draws every page of `spec`, committing each one before the next starts.
pub fn render(spec: &DocumentSpec, canvas: &mut PdfCanvas) -> Result<(), RenderError> {
    let multi_page = spec.page_count() > 1;
    for page in &spec.pages {
        draw_header(canvas, spec.doc_type, page, multi_page);
        match &page.body {
            PageBody::Invoice { items } => draw_line_items(canvas, items),
            PageBody::Contract { clauses } => draw_clauses(canvas, clauses),
        }
        canvas.show_page()?;
    }
    Ok(())
}

pub fn page_title(doc_type: DocType, page_number: u32, multi_page: bool) -> String {
    if multi_page {
        format!("{} - Page {}", doc_type.title(), page_number)
    } else {
        doc_type.title().to_string()
    }
}

fn draw_header(canvas: &mut PdfCanvas, doc_type: DocType, page: &PageContent, multi_page: bool) {
    let h = canvas.size().height;
    let f = &page.fields;

    canvas.set_font(Font::HelveticaBold, 14.0);
    canvas.draw_string(LEFT, h - 60.0, &page_title(doc_type, page.page_number, multi_page));

    canvas.set_font(Font::Helvetica, 11.0);
    let labels = match doc_type {
        DocType::Invoices => ["Invoice ID", "Date", "Customer Name", "Company"],
        DocType::Contracts => ["Contract ID", "Effective Date", "Client Name", "Client Company"],
    };
    let values = [f.id.clone(), f.date.to_string(), f.name.clone(), f.company.clone()];
    let mut y = h - 100.0;
    for (label, value) in labels.iter().zip(values.iter()) {
        canvas.draw_string(LEFT, y, &format!("{label}: {value}"));
        y -= 20.0;
    }
    canvas.draw_string(LEFT, h - 180.0, &format!("Address: {}", f.address));

    if let Some(phone) = &f.phone {
        canvas.draw_string(LEFT, h - 220.0, &format!("Phone: {phone}"));
    }
}

fn draw_line_items(canvas: &mut PdfCanvas, items: &[LineItem]) {
    let mut y = canvas.size().height - 260.0;

    canvas.set_font(Font::HelveticaBold, 11.0);
    canvas.draw_string(LEFT, y, "Item");
    canvas.draw_string(QTY_X, y, "Qty");
    canvas.draw_string(PRICE_X, y, "Price");
    canvas.draw_string(TOTAL_X, y, "Total");
    canvas.set_font(Font::Helvetica, 11.0);
    y -= ROW_HEIGHT;

    let mut total = 0.0;
    for item in items {
        let line_total = item.total();
        total += line_total;
        canvas.draw_string(LEFT, y, &item.description);
        canvas.draw_string(QTY_X, y, &item.quantity.to_string());
        canvas.draw_string(PRICE_X, y, &format!("${:.2}", item.unit_price));
        canvas.draw_string(TOTAL_X, y, &format!("${line_total:.2}"));
        y -= ROW_HEIGHT;
    }

    y -= 10.0;
    canvas.set_font(Font::HelveticaBold, 11.0);
    canvas.draw_string(PRICE_X, y, "Grand Total:");
    canvas.draw_string(GRAND_TOTAL_X, y, &format!("${total:.2}"));
}

fn draw_clauses(canvas: &mut PdfCanvas, clauses: &[&str]) {
    let mut y = canvas.size().height - 230.0;

    canvas.set_font(Font::TimesRoman, 11.0);
    for (i, clause) in clauses.iter().enumerate() {
        canvas.draw_string(LEFT, y, &format!("Clause {}: {clause}", i + 1));
        y -= CLAUSE_SPACING;
    }

    for (offset, party) in [(30.0, "Client"), (60.0, "Contractor")] {
        canvas.draw_string(LEFT, y - offset, &format!("{party} Signature: ______________________"));
        canvas.draw_string(SIGN_DATE_X, y - offset, "Date: __________");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::content::FakeContent;
    use lopdf::Document;

    fn load(path: &Path) -> Document {
        Document::load(path).unwrap()
    }

    #[test]
    fn test_page_title_only_numbered_when_multi_page() {
        assert_eq!(page_title(DocType::Invoices, 1, false), "INVOICE");
        assert_eq!(
            page_title(DocType::Contracts, 3, true),
            "CONTRACT AGREEMENT - Page 3"
        );
    }

    #[test]
    fn test_invoice_file_has_requested_pages() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("invoice.pdf");
        let mut src = FakeContent::seeded(21);

        let spec = render_to_file(DocType::Invoices, 4, &mut src, &path).unwrap();
        assert_eq!(spec.page_count(), 4);
        assert_eq!(load(&path).get_pages().len(), 4);
    }

    #[test]
    fn test_invoice_text_shows_page_grand_total() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("invoice.pdf");
        let mut src = FakeContent::seeded(8);

        let spec = render_to_file(DocType::Invoices, 2, &mut src, &path).unwrap();
        let doc = load(&path);
        for page in &spec.pages {
            let text = doc.extract_text(&[page.page_number]).unwrap();
            assert!(text.contains(&format!("INVOICE - Page {}", page.page_number)));
            assert!(text.contains(&page.fields.id));
            assert!(
                text.contains(&format!("${:.2}", page.grand_total())),
                "page {} text missing its own total: {text:?}",
                page.page_number
            );
        }
    }

    #[test]
    fn test_contract_text_has_clauses_and_signatures() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("contract.pdf");
        let mut src = FakeContent::seeded(4);

        render_to_file(DocType::Contracts, 1, &mut src, &path).unwrap();
        let text = load(&path).extract_text(&[1]).unwrap();
        assert!(text.contains("CONTRACT AGREEMENT"));
        assert!(!text.contains("Page 1"));
        assert!(text.contains("Clause 4:"));
        assert!(text.contains("Contractor Signature:"));
    }

    #[test]
    fn test_zero_pages_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("none.pdf");
        let mut src = FakeContent::seeded(1);

        assert!(render_to_file(DocType::Contracts, 0, &mut src, &path).is_err());
        assert!(!path.exists());
    }
}
