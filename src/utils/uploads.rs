use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};

/// Upload categories; the serialized name is the directory under the
/// store root and under the `/uploads/` web prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum UploadKind {
    #[strum(serialize = "profile_pictures")]
    ProfilePicture,
    #[strum(serialize = "employee_profiles")]
    EmployeeProfile,
    #[strum(serialize = "employee_documents")]
    EmployeeDocument,
    #[strum(serialize = "company_handbook")]
    CompanyHandbook,
    #[strum(serialize = "resources")]
    Resource,
}

/// Lowercased extension of a client filename, dot included ("report.PDF"
/// gives ".pdf"). Empty when there is none.
pub fn file_ext(file_name: &str) -> String {
    Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_lowercase()))
        .unwrap_or_default()
}

/// Disk store for uploaded files. Rows keep web paths of the form
/// `/uploads/<category>/...`; this type owns the mapping between those
/// paths and the configured root directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Writes `data` under the category directory and returns the web
    /// path to store in the database.
    pub fn save(&self, kind: UploadKind, file_name: &str, data: &[u8]) -> io::Result<String> {
        let dir = self.root.join(kind.to_string());
        fs::create_dir_all(&dir)?;
        fs::write(dir.join(file_name), data)?;
        Ok(format!("/uploads/{}/{}", kind, file_name))
    }

    /// Like [`save`](Self::save), with a per-employee subdirectory.
    pub fn save_scoped(
        &self,
        kind: UploadKind,
        employee_id: i64,
        file_name: &str,
        data: &[u8],
    ) -> io::Result<String> {
        let dir = self.root.join(kind.to_string()).join(employee_id.to_string());
        fs::create_dir_all(&dir)?;
        fs::write(dir.join(file_name), data)?;
        Ok(format!("/uploads/{}/{}/{}", kind, employee_id, file_name))
    }

    /// Maps a stored web path back to its location on disk. Paths that
    /// do not live under `/uploads/`, or that try to climb out of the
    /// store, map to nothing.
    pub fn disk_path(&self, web_path: &str) -> Option<PathBuf> {
        let rest = web_path.strip_prefix("/uploads/")?;
        let rel = Path::new(rest);
        if rel
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
        {
            return None;
        }
        Some(self.root.join(rel))
    }

    /// Best-effort removal of a stored file. A missing file is not an
    /// error; row deletion already happened and must stand.
    pub fn remove_by_web_path(&self, web_path: &str) -> bool {
        let Some(path) = self.disk_path(web_path) else {
            return false;
        };

        match fs::remove_file(&path) {
            Ok(()) => true,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(web_path, "File already absent on disk");
                false
            }
            Err(e) => {
                warn!(error = %e, web_path, "Failed to delete stored file");
                false
            }
        }
    }
}
