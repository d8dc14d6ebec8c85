//! Device-local registration session
//!
//! After each completed registration the identifiers that were entered are
//! remembered so the next registration can start in continuous mode with
//! predicted identifiers. There is exactly one slot: every save overwrites the
//! previous record.
//!
//! Contract: single writer, single reader. Two registration flows running at
//! once on the same device race on the slot and the last save wins. Saves are
//! atomic at the file level (temp file + rename), so a reader sees either the
//! old record or the new one, never a torn file.
//!
//! On disk the slot is a JSON document in the root folder holding the record
//! under a fixed key:
//!
//! ```json
//! {"lastRegistration":{"lastIdentifiers":["247エ714"],"poleTypeCategory":"concrete","timestamp":1700000000000}}
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::identifier::canonicalize;
use crate::{time, Error, Result};

/// File holding the device-local session document
pub const SESSION_FILE_NAME: &str = "session.json";

/// Key of the registration record inside the session document
pub const SESSION_KEY: &str = "lastRegistration";

/// The last completed registration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationSession {
    /// Canonical identifiers of every plate on the last registered pole
    pub last_identifiers: Vec<String>,
    pub pole_type_category: String,
    /// Unix milliseconds
    pub timestamp: i64,
}

impl RegistrationSession {
    /// Record a registration completed now.
    ///
    /// Identifiers are canonicalized and blank ones dropped.
    pub fn completed<I, S>(identifiers: I, pole_type_category: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            last_identifiers: identifiers
                .into_iter()
                .map(|id| canonicalize(id.as_ref()))
                .filter(|id| !id.is_empty())
                .collect(),
            pole_type_category: pole_type_category.into(),
            timestamp: time::now_millis(),
        }
    }

    pub fn recorded_at(&self) -> Option<DateTime<Utc>> {
        time::from_millis(self.timestamp)
    }
}

/// Handle on the single session slot
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store located at `<root_folder>/session.json`
    pub fn in_root_folder(root_folder: &Path) -> Self {
        Self::new(root_folder.join(SESSION_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the slot.
    ///
    /// A missing file or key is `None`. An unreadable record is logged and
    /// also treated as `None`; the next [`save`](Self::save) replaces it.
    pub fn load(&self) -> Result<Option<RegistrationSession>> {
        let Some(mut document) = self.read_document()? else {
            return Ok(None);
        };

        let Some(record) = document.remove(SESSION_KEY) else {
            return Ok(None);
        };

        match serde_json::from_value(record) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Ignoring malformed registration session"
                );
                Ok(None)
            }
        }
    }

    /// Overwrite the slot with `session`
    pub fn save(&self, session: &RegistrationSession) -> Result<()> {
        let mut document = self.read_document()?.unwrap_or_default();
        document.insert(SESSION_KEY.to_string(), serde_json::to_value(session)?);
        self.write_document(&document)?;

        debug!(
            path = %self.path.display(),
            identifiers = session.last_identifiers.len(),
            "Saved registration session"
        );
        Ok(())
    }

    /// Record a registration completed now and store it.
    ///
    /// Fails with [`Error::InvalidInput`] when no identifier survives
    /// canonicalization; the stored record is left untouched in that case.
    pub fn record_completed<I, S>(
        &self,
        identifiers: I,
        pole_type_category: impl Into<String>,
    ) -> Result<RegistrationSession>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let session = RegistrationSession::completed(identifiers, pole_type_category);
        if session.last_identifiers.is_empty() {
            return Err(Error::InvalidInput(
                "lastIdentifiers must contain at least one non-blank identifier".to_string(),
            ));
        }
        self.save(&session)?;
        Ok(session)
    }

    /// Empty the slot. Returns whether a record was present.
    pub fn clear(&self) -> Result<bool> {
        let Some(mut document) = self.read_document()? else {
            return Ok(false);
        };
        let existed = document.remove(SESSION_KEY).is_some();
        if existed {
            self.write_document(&document)?;
        }
        Ok(existed)
    }

    fn read_document(&self) -> Result<Option<Map<String, Value>>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_str::<Map<String, Value>>(&content) {
            Ok(document) => Ok(Some(document)),
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Session file is not a JSON object, starting fresh"
                );
                Ok(None)
            }
        }
    }

    fn write_document(&self, document: &Map<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let temp_path = self.path.with_extension("json.tmp");
        std::fs::write(&temp_path, serde_json::to_vec(document)?)?;
        std::fs::rename(&temp_path, &self.path)?;
        Ok(())
    }
}
