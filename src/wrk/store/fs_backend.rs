use super::backend::{AliasRecord, StorageBackend};
use crate::error::{Result, WrkError};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;
use uuid::Uuid;

pub const IDS_FILENAME: &str = "ids.json";
const FORMAT_VERSION: u32 = 1;

#[derive(Deserialize)]
struct IdsFileIn {
    #[serde(default)]
    version: u32,
    #[serde(default)]
    aliases: Vec<serde_json::Value>,
}

#[derive(Serialize)]
struct IdsFileOut<'a> {
    version: u32,
    aliases: &'a [AliasRecord],
}

/// Stores aliases as `ids.json` under the wrk data directory.
pub struct FsBackend {
    root: PathBuf,
}

impl FsBackend {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn ids_file(&self) -> PathBuf {
        self.root.join(IDS_FILENAME)
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(WrkError::Io)?;
        }
        Ok(())
    }
}

/// Best-effort record from an object with missing or mistyped fields.
///
/// Anything that isn't a string becomes empty. Entries that aren't objects carry no
/// short id worth protecting and yield `None`.
fn salvage(value: &serde_json::Value) -> Option<AliasRecord> {
    let object = value.as_object()?;
    let field = |name: &str| {
        object
            .get(name)
            .and_then(serde_json::Value::as_str)
            .unwrap_or_default()
            .to_string()
    };
    Some(AliasRecord {
        wrk: field("wrk"),
        tag: field("type"),
        id: field("id"),
    })
}

impl StorageBackend for FsBackend {
    fn load_records(&self) -> Result<Vec<AliasRecord>> {
        let ids_file = self.ids_file();
        if !ids_file.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&ids_file).map_err(WrkError::Io)?;
        let file: IdsFileIn = serde_json::from_str(&content).map_err(WrkError::Serialization)?;
        if file.version > FORMAT_VERSION {
            tracing::warn!(
                version = file.version,
                "{} was written by a newer wrk, reading what this version understands",
                ids_file.display()
            );
        }

        let mut records = Vec::with_capacity(file.aliases.len());
        for value in file.aliases {
            match serde_json::from_value::<AliasRecord>(value.clone()) {
                Ok(record) => records.push(record),
                Err(e) => match salvage(&value) {
                    // Kept so its short id stays taken
                    Some(record) => {
                        tracing::warn!(wrk = %record.wrk, "keeping partial alias record: {}", e);
                        records.push(record);
                    }
                    None => tracing::warn!("skipping unreadable alias record: {}", e),
                },
            }
        }
        tracing::debug!(count = records.len(), path = %ids_file.display(), "loaded alias records");
        Ok(records)
    }

    fn save_records(&self, records: &[AliasRecord]) -> Result<()> {
        self.ensure_dir()?;

        let content = serde_json::to_string_pretty(&IdsFileOut {
            version: FORMAT_VERSION,
            aliases: records,
        })
        .map_err(WrkError::Serialization)?;

        // Same directory as the target so the rename never crosses filesystems
        let tmp_file = self.root.join(format!(".ids-{}.tmp", Uuid::new_v4()));
        let written = (|| {
            let mut file = File::create(&tmp_file)?;
            file.write_all(content.as_bytes())?;
            file.sync_all()?;
            fs::rename(&tmp_file, self.ids_file())
        })();
        if let Err(e) = written {
            let _ = fs::remove_file(&tmp_file);
            return Err(WrkError::Io(e));
        }

        tracing::debug!(count = records.len(), "saved alias records");
        Ok(())
    }

    fn location(&self) -> PathBuf {
        self.ids_file()
    }
}
