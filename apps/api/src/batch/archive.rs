use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::batch::BatchError;

/// Writes `files` into a deflated zip at `archive_path`, in the given order,
/// using each file's base name as its entry name.
pub fn write_zip(archive_path: &Path, files: &[PathBuf]) -> Result<(), BatchError> {
    let mut zip = ZipWriter::new(BufWriter::new(File::create(archive_path)?));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for path in files {
        let entry_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| BatchError::InvalidFileName(path.display().to_string()))?;
        zip.start_file(entry_name, options)?;
        let mut source = File::open(path)?;
        io::copy(&mut source, &mut zip)?;
    }

    zip.finish()?;
    Ok(())
}
