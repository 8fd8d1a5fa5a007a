use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::documents::content::ContentSource;
use crate::documents::RenderError;

/// Longest line-item description printed on an invoice row.
pub const DESCRIPTION_MAX_CHARS: usize = 35;

pub const MIN_LINE_ITEMS: u32 = 3;
pub const MAX_LINE_ITEMS: u32 = 7;
pub const MIN_QUANTITY: u32 = 1;
pub const MAX_QUANTITY: u32 = 10;
pub const MIN_UNIT_PRICE: f64 = 10.0;
pub const MAX_UNIT_PRICE: f64 = 200.0;

/// Boilerplate clauses printed, in order, on every contract page.
pub const CONTRACT_CLAUSES: [&str; 4] = [
    "The client agrees to pay the contractor within 30 days of receipt of invoice.",
    "Both parties shall maintain confidentiality of proprietary information.",
    "This agreement is governed by the laws of the State of New York.",
    "Either party may terminate this agreement with 30 days written notice.",
];

// ────────────────────────────────────────────────────────────────────────────
// Document type
// ────────────────────────────────────────────────────────────────────────────

/// The two synthetic document families. Serialized in plural form
/// (`invoices` / `contracts`); the singular form is accepted on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DocType {
    #[default]
    #[serde(alias = "invoice")]
    Invoices,
    #[serde(alias = "contract")]
    Contracts,
}

impl DocType {
    pub const ALL: [DocType; 2] = [DocType::Invoices, DocType::Contracts];

    /// Plural name, used for directories and archive names.
    pub fn as_str(self) -> &'static str {
        match self {
            DocType::Invoices => "invoices",
            DocType::Contracts => "contracts",
        }
    }

    /// Singular name, used for per-document file names.
    pub fn singular(self) -> &'static str {
        match self {
            DocType::Invoices => "invoice",
            DocType::Contracts => "contract",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            DocType::Invoices => "INVOICE",
            DocType::Contracts => "CONTRACT AGREEMENT",
        }
    }
}

impl fmt::Display for DocType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "invoices" | "invoice" => Ok(DocType::Invoices),
            "contracts" | "contract" => Ok(DocType::Contracts),
            other => Err(format!("unknown document type '{other}'")),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Page content
// ────────────────────────────────────────────────────────────────────────────

/// Header fields drawn at the top of every page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartyFields {
    pub id: String,
    pub date: chrono::NaiveDate,
    pub name: String,
    pub company: String,
    pub address: String,
    /// Only invoices carry a phone number.
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineItem {
    pub description: String,
    pub quantity: u32,
    pub unit_price: f64,
}

impl LineItem {
    pub fn total(&self) -> f64 {
        self.quantity as f64 * self.unit_price
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum PageBody {
    Invoice { items: Vec<LineItem> },
    Contract { clauses: Vec<&'static str> },
}

/// Everything drawn on a single page. Pages never share values: each one
/// re-rolls its header fields and body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageContent {
    /// 1-based.
    pub page_number: u32,
    pub fields: PartyFields,
    pub body: PageBody,
}

impl PageContent {
    /// Sum of this page's line-item totals; zero for contracts.
    pub fn grand_total(&self) -> f64 {
        match &self.body {
            PageBody::Invoice { items } => items.iter().map(LineItem::total).sum(),
            PageBody::Contract { .. } => 0.0,
        }
    }
}

/// One logical document, fully sampled before rendering begins.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentSpec {
    pub doc_type: DocType,
    pub pages: Vec<PageContent>,
}

impl DocumentSpec {
    /// Samples `page_count` pages of fresh content for `doc_type`.
    pub fn sample<S: ContentSource + ?Sized>(
        doc_type: DocType,
        page_count: u32,
        source: &mut S,
    ) -> Result<Self, RenderError> {
        if page_count == 0 {
            return Err(RenderError::InvalidPageCount(page_count));
        }
        let pages = (1..=page_count)
            .map(|page_number| sample_page(doc_type, page_number, source))
            .collect();
        Ok(Self { doc_type, pages })
    }

    pub fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }
}

fn sample_page<S: ContentSource + ?Sized>(
    doc_type: DocType,
    page_number: u32,
    source: &mut S,
) -> PageContent {
    let fields = PartyFields {
        id: source.identifier(),
        date: source.date(),
        name: source.person_name(),
        company: source.company(),
        address: source.address(),
        phone: match doc_type {
            DocType::Invoices => Some(source.phone()),
            DocType::Contracts => None,
        },
    };

    let body = match doc_type {
        DocType::Invoices => {
            let n = source.int_in(MIN_LINE_ITEMS, MAX_LINE_ITEMS);
            let items = (0..n)
                .map(|_| LineItem {
                    description: truncate_chars(&source.catch_phrase(), DESCRIPTION_MAX_CHARS),
                    quantity: source.int_in(MIN_QUANTITY, MAX_QUANTITY),
                    unit_price: round_cents(source.float_in(MIN_UNIT_PRICE, MAX_UNIT_PRICE)),
                })
                .collect();
            PageBody::Invoice { items }
        }
        DocType::Contracts => PageBody::Contract {
            clauses: CONTRACT_CLAUSES.to_vec(),
        },
    };

    PageContent {
        page_number,
        fields,
        body,
    }
}

pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::content::FakeContent;

    #[test]
    fn test_doc_type_names() {
        assert_eq!(DocType::Invoices.as_str(), "invoices");
        assert_eq!(DocType::Contracts.singular(), "contract");
        assert_eq!("Invoice".parse::<DocType>().unwrap(), DocType::Invoices);
        assert_eq!("contracts".parse::<DocType>().unwrap(), DocType::Contracts);
        assert!("receipts".parse::<DocType>().is_err());
    }

    #[test]
    fn test_doc_type_serde_accepts_singular() {
        let t: DocType = serde_json::from_str("\"contract\"").unwrap();
        assert_eq!(t, DocType::Contracts);
        assert_eq!(serde_json::to_string(&t).unwrap(), "\"contracts\"");
    }

    #[test]
    fn test_zero_pages_rejected() {
        let mut src = FakeContent::seeded(1);
        let err = DocumentSpec::sample(DocType::Invoices, 0, &mut src).unwrap_err();
        assert!(matches!(err, RenderError::InvalidPageCount(0)));
    }

    #[test]
    fn test_invoice_pages_within_bounds() {
        let mut src = FakeContent::seeded(42);
        let spec = DocumentSpec::sample(DocType::Invoices, 20, &mut src).unwrap();
        assert_eq!(spec.page_count(), 20);

        for (i, page) in spec.pages.iter().enumerate() {
            assert_eq!(page.page_number, i as u32 + 1);
            assert!(page.fields.phone.is_some());
            let PageBody::Invoice { items } = &page.body else {
                panic!("invoice page without line items");
            };
            assert!((3..=7).contains(&items.len()), "got {} items", items.len());
            for item in items {
                assert!(item.description.chars().count() <= DESCRIPTION_MAX_CHARS);
                assert!((1..=10).contains(&item.quantity));
                assert!((10.0..=200.0).contains(&item.unit_price));
                assert_eq!(item.unit_price, round_cents(item.unit_price));
            }
        }
    }

    #[test]
    fn test_grand_total_is_page_local() {
        let mut src = FakeContent::seeded(7);
        let spec = DocumentSpec::sample(DocType::Invoices, 5, &mut src).unwrap();
        for page in &spec.pages {
            let PageBody::Invoice { items } = &page.body else {
                unreachable!()
            };
            let expected: f64 = items.iter().map(|i| i.quantity as f64 * i.unit_price).sum();
            assert!((page.grand_total() - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn test_contract_pages_have_fixed_clauses() {
        let mut src = FakeContent::seeded(3);
        let spec = DocumentSpec::sample(DocType::Contracts, 2, &mut src).unwrap();
        for page in &spec.pages {
            assert!(page.fields.phone.is_none());
            assert_eq!(page.grand_total(), 0.0);
            assert_eq!(
                page.body,
                PageBody::Contract {
                    clauses: CONTRACT_CLAUSES.to_vec()
                }
            );
        }
    }

    #[test]
    fn test_truncate_chars_is_char_boundary_safe() {
        assert_eq!(truncate_chars("héllo wörld", 4), "héll");
        assert_eq!(truncate_chars("abc", 35), "abc");
    }
}
