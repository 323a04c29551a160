use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, MutexGuard},
};

use once_cell::sync::Lazy;
use uuid::Uuid;

use super::{PaymentRow, PaymentStore};
use crate::{
    errors::{RentalError, Result},
    utils::paths::{ensure_dir, payments_file_in, resolve_base, write_atomic},
};

/// One lock per payment file, shared by every store opened on it in this process.
static FILE_LOCKS: Lazy<Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

fn lock_for(path: &Path) -> Arc<Mutex<()>> {
    let key = lock_key(path);
    let mut locks = FILE_LOCKS.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    Arc::clone(locks.entry(key).or_default())
}

/// Canonical form of `path` when its directory exists, so `./a/payments.json`
/// and `/abs/a/payments.json` share a lock.
fn lock_key(path: &Path) -> PathBuf {
    let parent = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    match (parent.canonicalize(), path.file_name()) {
        (Ok(dir), Some(name)) => dir.join(name),
        _ => path.to_path_buf(),
    }
}

/// Stores every payment row in a single JSON array file.
///
/// Each insert rewrites the file through a temp file and rename, so a crash
/// mid-write leaves the previous contents intact. Stores opened on the same
/// file within one process serialise their reads and writes; separate
/// processes must not share a file.
#[derive(Debug)]
pub struct JsonPaymentStore {
    path: PathBuf,
    guard: Arc<Mutex<()>>,
}

impl JsonPaymentStore {
    /// Opens the store under `root`, or the application data directory when `None`.
    pub fn new(root: Option<PathBuf>) -> Result<Self> {
        let base = resolve_base(root);
        ensure_dir(&base)?;
        Ok(Self::at_path(payments_file_in(&base)))
    }

    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let guard = lock_for(&path);
        Self { path, guard }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn rows(&self) -> Result<Vec<PaymentRow>> {
        let _lock = self.lock()?;
        self.read_rows()
    }

    fn read_rows(&self) -> Result<Vec<PaymentRow>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let data = fs::read_to_string(&self.path)?;
        if data.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&data)?)
    }

    fn lock(&self) -> Result<MutexGuard<'_, ()>> {
        self.guard
            .lock()
            .map_err(|_| RentalError::Storage("payment file lock poisoned".into()))
    }
}

impl PaymentStore for JsonPaymentStore {
    fn insert(&self, row: &PaymentRow) -> Result<()> {
        let _lock = self.lock()?;
        let mut rows = self.read_rows()?;
        if rows.iter().any(|existing| existing.id == row.id) {
            return Err(RentalError::Storage(format!(
                "payment row {} already exists",
                row.id
            )));
        }
        rows.push(row.clone());
        let json = serde_json::to_string_pretty(&rows)?;
        write_atomic(&self.path, &json)?;
        tracing::debug!(path = %self.path.display(), rows = rows.len(), "payment row written");
        Ok(())
    }

    fn rows_for_lease(&self, lease_id: Uuid) -> Result<Vec<PaymentRow>> {
        Ok(self
            .rows()?
            .into_iter()
            .filter(|row| row.lease_id == lease_id)
            .collect())
    }
}
