//! File persistence primitives.
//!
//! Whole-file writes go through a temp file + rename so readers never see a
//! half-written document. Appends take an exclusive advisory lock so
//! concurrent writers never interleave partial lines.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use fs2::FileExt;
use tracing::{debug, warn};

/// Create a directory and all of its parents.
///
/// Succeeds when the directory already exists, including when another writer
/// created it concurrently.
pub fn make_dir(dir: &Path) -> io::Result<()> {
    if dir.as_os_str().is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "empty directory path",
        ));
    }
    if dir.is_dir() {
        return Ok(());
    }
    match fs::create_dir_all(dir) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists && dir.is_dir() => Ok(()),
        Err(e) => Err(e),
    }
}

/// Replace the whole content of `path`, creating parent directories.
pub fn save_file(path: &Path, data: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            make_dir(parent)?;
        }
    }

    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"))?;
    // Unique per write so concurrent saves never share a temp file
    let temp_path = path.with_file_name(format!(
        ".{}.{}.tmp",
        file_name,
        uuid::Uuid::new_v4().simple()
    ));

    let result = write_and_rename(&temp_path, path, data);
    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result?;

    debug!(path = %path.display(), bytes = data.len(), "File saved");
    Ok(())
}

fn write_and_rename(temp_path: &Path, path: &Path, data: &[u8]) -> io::Result<()> {
    let file = File::create(temp_path)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(data)?;
    writer.flush()?;
    writer.get_ref().sync_all()?;
    fs::rename(temp_path, path)
}

/// Append `line` to `path` under an exclusive lock, creating the file and its
/// parent directories when missing.
pub fn append_line_locked(path: &Path, line: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            make_dir(parent)?;
        }
    }

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    file.lock_exclusive()?;

    // One write call per line keeps the append atomic under the lock
    let mut buf = String::with_capacity(line.len() + 1);
    buf.push_str(line);
    if !line.ends_with('\n') {
        buf.push('\n');
    }
    let mut writer = &file;
    let written = writer.write_all(buf.as_bytes()).and_then(|_| writer.flush());

    settle_locked_write(path, written, file.unlock())
}

/// Outcome of a locked write. The write decides the result; a failed unlock is
/// only logged, since the lock is released when the file closes anyway.
fn settle_locked_write(
    path: &Path,
    written: io::Result<()>,
    unlocked: io::Result<()>,
) -> io::Result<()> {
    if let Err(e) = unlocked {
        warn!(path = %path.display(), "Failed to unlock file: {}", e);
    }
    written
}

/// Read a file, returning `None` when it does not exist.
pub fn read_to_string_opt(path: &Path) -> io::Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}
