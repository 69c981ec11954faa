use std::fs::{self, File};
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::error::TenderError;
use crate::model::TenderRecord;

/// Keeps a copy of every ingested upload as `<root>/<id>_<filename>`, so the
/// original document can be handed back later.
#[derive(Debug, Clone)]
pub struct UploadArchive {
    root: PathBuf,
}

impl UploadArchive {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        UploadArchive { root: root.into() }
    }

    /// Where the upload for `id`, uploaded as `filename`, is kept.
    pub fn path_for(&self, id: &Uuid, filename: &str) -> PathBuf {
        self.root.join(format!("{id}_{}", safe_file_name(filename)))
    }

    /// Copy the staged upload at `src` into the archive. The copy appears
    /// under its final name only once it is complete.
    pub fn retain(&self, src: &Path, id: &Uuid, filename: &str) -> Result<PathBuf, TenderError> {
        fs::create_dir_all(&self.root)?;
        let target = self.path_for(id, filename);

        let mut tmp = tempfile::NamedTempFile::new_in(&self.root)?;
        io::copy(&mut File::open(src)?, &mut tmp)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&target).map_err(|e| TenderError::Io(e.error))?;

        tracing::debug!(%id, path = %target.display(), "retained upload");
        Ok(target)
    }

    /// The kept upload for `record`, or `UploadMissing` when it was never
    /// kept or has been removed.
    pub fn locate(&self, record: &TenderRecord) -> Result<PathBuf, TenderError> {
        let path = self.path_for(&record.id, &record.filename);
        if path.is_file() {
            Ok(path)
        } else {
            Err(TenderError::UploadMissing(format!(
                "{} ({})",
                record.id, record.filename
            )))
        }
    }

    /// Copy the kept upload for `record` out to `dest`. A directory `dest`
    /// receives the file under its uploaded name. Existing files are never
    /// overwritten.
    pub fn export(&self, record: &TenderRecord, dest: &Path) -> Result<PathBuf, TenderError> {
        let src = self.locate(record)?;
        let target = if dest.is_dir() {
            dest.join(safe_file_name(&record.filename))
        } else {
            dest.to_path_buf()
        };

        let mut out = match fs::OpenOptions::new()
            .create_new(true)
            .write(true)
            .open(&target)
        {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(TenderError::Io(io::Error::new(
                    ErrorKind::AlreadyExists,
                    format!("{} already exists", target.display()),
                )))
            }
            Err(e) => return Err(e.into()),
        };
        io::copy(&mut File::open(&src)?, &mut out)?;
        Ok(target)
    }
}

/// The last path component of an uploaded name, so `../x.pdf` or
/// `C:\docs\x.pdf` cannot escape the archive directory.
fn safe_file_name(filename: &str) -> String {
    let base = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();
    let cleaned: String = base.chars().filter(|c| !c.is_control()).collect();
    match cleaned.as_str() {
        "" | "." | ".." => "upload".to_string(),
        _ => cleaned,
    }
}
