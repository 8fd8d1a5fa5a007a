//! Size-Budgeted Planner.
//!
//! Renders one sample of each document type, measures them on disk and
//! derives how many documents of each type fit a byte budget. The result is
//! an estimate: later documents have randomized content and vary in size.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{info, warn};

use crate::batch::{type_dir, BatchError};
use crate::documents::{render_to_file, ContentSource, DocType};

/// Page count of the sample documents.
pub const SAMPLE_PAGES: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SizeEstimate {
    pub invoice_bytes: u64,
    pub contract_bytes: u64,
    pub avg_bytes: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Plan {
    pub estimate: SizeEstimate,
    pub max_total_bytes: u64,
    pub count_each: u32,
}

/// Mean of the two sizes, or whichever one is positive (at least 1).
pub fn average_size(invoice_bytes: u64, contract_bytes: u64) -> f64 {
    if invoice_bytes > 0 && contract_bytes > 0 {
        (invoice_bytes + contract_bytes) as f64 / 2.0
    } else {
        invoice_bytes.max(contract_bytes).max(1) as f64
    }
}

/// Documents per type that fit `max_total_bytes`, split evenly between the
/// two types and capped at `target_each`. Never below 1.
pub fn count_within_budget(target_each: u32, max_total_bytes: u64, avg_bytes: f64) -> u32 {
    let avg = avg_bytes.max(1.0);
    let max_files_total = ((max_total_bytes as f64 / avg).floor() as u64).max(1);
    let max_each = (max_files_total / 2).max(1);
    target_each.min(u32::try_from(max_each).unwrap_or(u32::MAX))
}

/// Samples both document types under `root` and plans the batch.
/// Sample files are removed afterwards; failing to remove them is only logged.
pub fn plan<S: ContentSource + ?Sized>(
    target_each: u32,
    max_total_bytes: u64,
    root: &Path,
    source: &mut S,
) -> Result<Plan, BatchError> {
    let invoice_sample = sample_path(root, DocType::Invoices)?;
    let contract_sample = sample_path(root, DocType::Contracts)?;

    let invoice_bytes = sample_size(DocType::Invoices, &invoice_sample, source);
    let contract_bytes = sample_size(DocType::Contracts, &contract_sample, source);
    let avg_bytes = average_size(invoice_bytes, contract_bytes);

    for path in [&invoice_sample, &contract_sample] {
        if let Err(e) = fs::remove_file(path) {
            warn!("Could not remove sample {}: {e}", path.display());
        }
    }

    let count_each = count_within_budget(target_each, max_total_bytes, avg_bytes);
    info!(
        "Estimated sizes: invoice={}, contract={}, avg={}; targeting {count_each} of each (<= {})",
        human_size(invoice_bytes),
        human_size(contract_bytes),
        human_size(avg_bytes as u64),
        human_size(max_total_bytes),
    );

    Ok(Plan {
        estimate: SizeEstimate {
            invoice_bytes,
            contract_bytes,
            avg_bytes,
        },
        max_total_bytes,
        count_each,
    })
}

fn sample_path(root: &Path, doc_type: DocType) -> Result<PathBuf, BatchError> {
    let dir = type_dir(root, doc_type);
    fs::create_dir_all(&dir)?;
    Ok(dir.join(format!("_sample_{}.pdf", doc_type.singular())))
}

/// On-disk size of a freshly rendered sample; 0 if it could not be produced.
fn sample_size<S: ContentSource + ?Sized>(doc_type: DocType, path: &Path, source: &mut S) -> u64 {
    if let Err(e) = render_to_file(doc_type, SAMPLE_PAGES, source, path) {
        warn!("Sampling {doc_type} failed: {e}");
        return 0;
    }
    fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}

/// `1536` → `1.5KB`.
pub fn human_size(bytes: u64) -> String {
    let mut n = bytes as f64;
    for unit in ["B", "KB", "MB"] {
        if n < 1024.0 {
            return format!("{n:.1}{unit}");
        }
        n /= 1024.0;
    }
    format!("{n:.1}GB")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::FakeContent;

    #[test]
    fn test_average_size_falls_back_to_available_sample() {
        assert_eq!(average_size(100, 300), 200.0);
        assert_eq!(average_size(0, 300), 300.0);
        assert_eq!(average_size(250, 0), 250.0);
        assert_eq!(average_size(0, 0), 1.0);
    }

    #[test]
    fn test_count_capped_by_target() {
        assert_eq!(count_within_budget(10, 7 * 1024 * 1024, 5_000.0), 10);
    }

    #[test]
    fn test_count_capped_by_budget() {
        // 100_000 / 3_000 = 33 files total -> 16 each
        assert_eq!(count_within_budget(50, 100_000, 3_000.0), 16);
    }

    #[test]
    fn test_count_never_below_one() {
        assert_eq!(count_within_budget(10, 10, 5_000.0), 1);
        assert_eq!(count_within_budget(10, 0, 5_000.0), 1);
        assert_eq!(count_within_budget(10, 3_000, 2_000.0), 1);
    }

    #[test]
    fn test_count_fits_budget_whenever_two_documents_fit() {
        for avg in [1.0, 17.0, 512.5, 4_096.0, 33_333.3, 1_000_000.0] {
            for budget in [2_u64, 999, 65_536, 7 * 1024 * 1024, 1 << 32] {
                let n = count_within_budget(u32::MAX, budget, avg);
                assert!(n >= 1);
                if budget as f64 >= 2.0 * avg {
                    assert!(
                        n as f64 * 2.0 * avg <= budget as f64,
                        "avg={avg} budget={budget} n={n}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_human_size_units() {
        assert_eq!(human_size(512), "512.0B");
        assert_eq!(human_size(1536), "1.5KB");
        assert_eq!(human_size(7 * 1024 * 1024), "7.0MB");
        assert_eq!(human_size(3 * 1024 * 1024 * 1024), "3.0GB");
    }

    #[test]
    fn test_plan_measures_and_removes_samples() {
        let root = tempfile::tempdir().unwrap();
        let mut src = FakeContent::seeded(99);

        let plan = plan(10, 7 * 1024 * 1024, root.path(), &mut src).unwrap();
        assert!(plan.estimate.invoice_bytes > 0);
        assert!(plan.estimate.contract_bytes > 0);
        assert_eq!(plan.count_each, 10);

        for doc_type in DocType::ALL {
            let dir = type_dir(root.path(), doc_type);
            assert!(dir.is_dir());
            assert_eq!(fs::read_dir(&dir).unwrap().count(), 0, "samples left behind");
        }
    }

    #[test]
    fn test_plan_with_tiny_budget() {
        let root = tempfile::tempdir().unwrap();
        let mut src = FakeContent::seeded(100);
        let plan = plan(10, 1, root.path(), &mut src).unwrap();
        assert_eq!(plan.count_each, 1);
    }
}
