//! One-way file glue around the core: importing a source file into a
//! buffer and exporting buffer text or an assembled document to disk.
//! Nothing in the core depends on this.

use std::io::Write;

pub type SourceResult<T> = Result<T, SourceError>;

#[derive(Debug)]
pub enum SourceError {
    Io(std::io::Error),
    /// The mapped file is not valid UTF-8; buffers are text-only.
    NotUtf8(std::str::Utf8Error),
}

impl std::fmt::Display for SourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceError::Io(e) => write!(f, "source file io error: {e}"),
            SourceError::NotUtf8(e) => write!(f, "source file is not valid utf-8: {e}"),
        }
    }
}

impl std::error::Error for SourceError {}

impl From<std::io::Error> for SourceError {
    fn from(value: std::io::Error) -> Self {
        SourceError::Io(value)
    }
}

/// Reads a source file into a `String` through a memory map.
///
/// # Errors
///
/// Fails if the file cannot be opened or mapped, or if its bytes are not
/// valid UTF-8.
pub fn read_source(path: impl AsRef<std::path::Path>) -> SourceResult<String> {
    let file = std::fs::File::open(path)?;

    // SAFETY:
    // - File is opened read-only
    // - The map lives only for the duration of this call
    // - Only an immutable &[u8] view is taken
    let mmap = unsafe { memmap2::Mmap::map(&file)? };

    let text = std::str::from_utf8(&mmap).map_err(SourceError::NotUtf8)?;
    Ok(text.to_string())
}

/// Writes `contents` to `path` atomically: the bytes land in a temp file in
/// the same directory (required for an atomic rename across the final hop),
/// get synced, and are then persisted over the destination.
///
/// # Errors
///
/// Fails if the temp file cannot be created or written, or if the rename
/// into place fails.
pub fn write_atomic(path: impl AsRef<std::path::Path>, contents: &str) -> std::io::Result<()> {
    let path = path.as_ref();
    let parent_dir = path.parent().unwrap_or_else(|| std::path::Path::new("."));

    let mut temp_file = tempfile::Builder::new()
        .prefix(".export_tmp_")
        .tempfile_in(parent_dir)?;

    temp_file.write_all(contents.as_bytes())?;
    temp_file.as_file().sync_all()?;
    temp_file.persist(path).map_err(|e| e.error)?;

    Ok(())
}

/// Default download name for a single-buffer or assembled-document export,
/// mirroring the names the export buttons advertise.
#[must_use]
pub fn export_file_name(language: Option<playground_core::language::Language>) -> String {
    match language {
        Some(language) => format!("code.{}", language.extension()),
        // The assembled document is always a markup file.
        None => "code.html".to_string(),
    }
}
