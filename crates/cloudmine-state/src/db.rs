use chrono::NaiveDate;
use cloudmine_core::constants::{BONUS_DAY_FORMAT, LAST_BONUS_DATE_KEY};
use cloudmine_core::error::CloudmineError;
use cloudmine_core::types::Timestamp;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// What the slot remembers about the last daily-bonus claim.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusRecord {
    /// Calendar day of the claim, `%Y-%m-%d`. Compared as a string.
    pub day: String,
    pub claimed_at: Timestamp,
}

impl BonusRecord {
    pub fn new(day: NaiveDate, claimed_at: Timestamp) -> Self {
        Self {
            day: day.format(BONUS_DAY_FORMAT).to_string(),
            claimed_at,
        }
    }

    pub fn is_for(&self, day: NaiveDate) -> bool {
        self.day == day.format(BONUS_DAY_FORMAT).to_string()
    }
}

/// The only persisted state: one key in a sled `meta` tree.
///
///   meta: "last_bonus_date" → bincode(BonusRecord)
///
/// Everything else lives in memory and is lost on restart.
pub struct SlotDb {
    _db: sled::Db,
    meta: sled::Tree,
}

impl SlotDb {
    /// Open or create the slot database at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, CloudmineError> {
        let db = sled::open(path).map_err(|e| CloudmineError::Storage(e.to_string()))?;
        Self::from_db(db)
    }

    /// A slot that disappears when dropped.
    pub fn temporary() -> Result<Self, CloudmineError> {
        let db = sled::Config::new()
            .temporary(true)
            .open()
            .map_err(|e| CloudmineError::Storage(e.to_string()))?;
        Self::from_db(db)
    }

    fn from_db(db: sled::Db) -> Result<Self, CloudmineError> {
        let meta = db.open_tree("meta").map_err(|e| CloudmineError::Storage(e.to_string()))?;
        Ok(Self { _db: db, meta })
    }

    pub fn get_bonus_record(&self) -> Result<Option<BonusRecord>, CloudmineError> {
        match self
            .meta
            .get(LAST_BONUS_DATE_KEY.as_bytes())
            .map_err(|e| CloudmineError::Storage(e.to_string()))?
        {
            Some(bytes) => {
                let record = bincode::deserialize(&bytes)
                    .map_err(|e| CloudmineError::Serialization(e.to_string()))?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    pub fn put_bonus_record(&self, record: &BonusRecord) -> Result<(), CloudmineError> {
        let bytes = bincode::serialize(record)
            .map_err(|e| CloudmineError::Serialization(e.to_string()))?;
        self.meta
            .insert(LAST_BONUS_DATE_KEY.as_bytes(), bytes)
            .map_err(|e| CloudmineError::Storage(e.to_string()))?;
        Ok(())
    }

    /// Flush all pending writes to disk.
    pub fn flush(&self) -> Result<(), CloudmineError> {
        self._db.flush().map_err(|e| CloudmineError::Storage(e.to_string()))?;
        Ok(())
    }
}
