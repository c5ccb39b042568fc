//! Append-only ledger of consumption events, backed by SQLite.
//!
//! Entries are inserted exactly once when the user confirms an addition and
//! are never updated or deleted. Daily totals are recomputed by SQL on every
//! query rather than cached, so a `record` followed by `daily_totals` always
//! reflects the new entry.

use std::path::{Path, PathBuf};

use rusqlite::{Connection, params};
use thiserror::Error;
use time::{Date, OffsetDateTime, format_description::FormatItem, macros::format_description};

/// Storage format of the `day` column.
const DAY_FORMAT: &[FormatItem<'_>] = format_description!("[year]-[month]-[day]");

/// A consumption event as stored in the ledger.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsumptionEntry {
    /// Auto-assigned row id.
    pub id: i64,
    /// Identifier of the catalog product this entry came from.
    pub product_id: String,
    pub name: String,
    /// Consumed weight in grams.
    pub grams: f64,
    pub calories: f64,
    pub protein: f64,
    /// Calendar date the entry was recorded on; immutable thereafter.
    pub day: Date,
}

/// Fields of an entry about to be recorded.
#[derive(Debug, Clone)]
pub struct NewEntry {
    pub product_id: String,
    pub name: String,
    pub grams: f64,
    pub calories: f64,
    pub protein: f64,
}

/// Aggregate nutrient sums for one calendar date. Derived, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DailyTotal {
    pub calories: f64,
    pub protein: f64,
}

/// Errors returned by ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Could not create ledger directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Ledger query failed: {0}")]
    Sql(#[from] rusqlite::Error),
    #[error("Could not format ledger date: {0}")]
    FormatDay(#[from] time::error::Format),
    #[error("Ledger holds an unreadable date '{0}'")]
    InvalidStoredDay(String),
    #[error("Entry amounts must be non-negative (grams {grams}, calories {calories}, protein {protein})")]
    NegativeAmount {
        grams: f64,
        calories: f64,
        protein: f64,
    },
}

/// SQLite wrapper holding the single `foods` table.
pub struct Ledger {
    connection: Connection,
}

impl Ledger {
    /// Open (or create) the ledger database at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, LedgerError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|source| LedgerError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let connection = Connection::open(path)?;
        let ledger = Self { connection };
        ledger.apply_pragmas()?;
        ledger.apply_schema()?;
        Ok(ledger)
    }

    /// Append one entry, durably persisted before this returns.
    ///
    /// Amounts must be non-negative; the date recorded is the date passed in,
    /// fixed at creation time.
    pub fn record(&self, entry: &NewEntry, day: Date) -> Result<ConsumptionEntry, LedgerError> {
        if entry.grams < 0.0 || entry.calories < 0.0 || entry.protein < 0.0 {
            return Err(LedgerError::NegativeAmount {
                grams: entry.grams,
                calories: entry.calories,
                protein: entry.protein,
            });
        }
        let day_text = day.format(DAY_FORMAT)?;
        let mut stmt = self.connection.prepare_cached(
            "INSERT INTO foods (product_id, name, weight, calories, protein, day)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )?;
        stmt.execute(params![
            entry.product_id,
            entry.name,
            entry.grams,
            entry.calories,
            entry.protein,
            day_text,
        ])?;
        Ok(ConsumptionEntry {
            id: self.connection.last_insert_rowid(),
            product_id: entry.product_id.clone(),
            name: entry.name.clone(),
            grams: entry.grams,
            calories: entry.calories,
            protein: entry.protein,
            day,
        })
    }

    /// Sum calories and protein over all entries recorded on `day`.
    ///
    /// A day with no entries totals zero/zero.
    pub fn daily_totals(&self, day: Date) -> Result<DailyTotal, LedgerError> {
        let day_text = day.format(DAY_FORMAT)?;
        let mut stmt = self.connection.prepare_cached(
            "SELECT COALESCE(SUM(calories), 0), COALESCE(SUM(protein), 0)
             FROM foods WHERE day = ?1",
        )?;
        let total = stmt.query_row(params![day_text], |row| {
            Ok(DailyTotal {
                calories: row.get(0)?,
                protein: row.get(1)?,
            })
        })?;
        Ok(total)
    }

    /// List the entries recorded on `day`, oldest first.
    pub fn entries_for_day(&self, day: Date) -> Result<Vec<ConsumptionEntry>, LedgerError> {
        let day_text = day.format(DAY_FORMAT)?;
        let mut stmt = self.connection.prepare_cached(
            "SELECT id, product_id, name, weight, calories, protein, day
             FROM foods WHERE day = ?1 ORDER BY id ASC",
        )?;
        let rows = stmt
            .query_map(params![day_text], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, f64>(3)?,
                    row.get::<_, f64>(4)?,
                    row.get::<_, f64>(5)?,
                    row.get::<_, String>(6)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(id, product_id, name, grams, calories, protein, day_text)| {
                let day = Date::parse(&day_text, DAY_FORMAT)
                    .map_err(|_| LedgerError::InvalidStoredDay(day_text.clone()))?;
                Ok(ConsumptionEntry {
                    id,
                    product_id,
                    name,
                    grams,
                    calories,
                    protein,
                    day,
                })
            })
            .collect()
    }

    fn apply_pragmas(&self) -> Result<(), LedgerError> {
        self.connection.execute_batch(
            "PRAGMA journal_mode=WAL;
             PRAGMA synchronous=NORMAL;
             PRAGMA busy_timeout=5000;",
        )?;
        Ok(())
    }

    fn apply_schema(&self) -> Result<(), LedgerError> {
        self.connection.execute_batch(
            "CREATE TABLE IF NOT EXISTS foods (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                product_id TEXT NOT NULL,
                name TEXT NOT NULL,
                weight REAL NOT NULL,
                calories REAL NOT NULL,
                protein REAL NOT NULL,
                day TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_foods_day ON foods(day);",
        )?;
        Ok(())
    }
}

/// Today's date in local time, falling back to UTC when the offset is unknown.
pub fn today() -> Date {
    OffsetDateTime::now_local()
        .unwrap_or_else(|_| OffsetDateTime::now_utc())
        .date()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use time::macros::date;

    fn entry(name: &str, calories: f64, protein: f64) -> NewEntry {
        NewEntry {
            product_id: "123".into(),
            name: name.into(),
            grams: 50.0,
            calories,
            protein,
        }
    }

    fn open_ledger(dir: &tempfile::TempDir) -> Ledger {
        Ledger::open(dir.path().join("kalori.db")).unwrap()
    }

    #[test]
    fn record_is_visible_to_an_immediate_total_query() {
        let dir = tempdir().unwrap();
        let ledger = open_ledger(&dir);
        let day = date!(2026 - 08 - 24);

        ledger.record(&entry("Oatmeal", 187.5, 6.75), day).unwrap();
        let total = ledger.daily_totals(day).unwrap();
        assert_eq!(total, DailyTotal { calories: 187.5, protein: 6.75 });
    }

    #[test]
    fn totals_sum_only_the_queried_day() {
        let dir = tempdir().unwrap();
        let ledger = open_ledger(&dir);
        let monday = date!(2026 - 08 - 24);
        let tuesday = date!(2026 - 08 - 25);

        ledger.record(&entry("Oatmeal", 100.0, 5.0), monday).unwrap();
        ledger.record(&entry("Skyr", 60.0, 10.0), monday).unwrap();
        ledger.record(&entry("Rye bread", 210.0, 7.0), tuesday).unwrap();

        let total = ledger.daily_totals(monday).unwrap();
        assert_eq!(total, DailyTotal { calories: 160.0, protein: 15.0 });
        let other = ledger.daily_totals(tuesday).unwrap();
        assert_eq!(other, DailyTotal { calories: 210.0, protein: 7.0 });
    }

    #[test]
    fn empty_day_totals_zero() {
        let dir = tempdir().unwrap();
        let ledger = open_ledger(&dir);
        let total = ledger.daily_totals(date!(2026 - 01 - 01)).unwrap();
        assert_eq!(total, DailyTotal::default());
    }

    #[test]
    fn entries_survive_reopening_the_database() {
        let dir = tempdir().unwrap();
        let day = date!(2026 - 08 - 24);
        {
            let ledger = open_ledger(&dir);
            ledger.record(&entry("Oatmeal", 187.5, 6.75), day).unwrap();
        }
        let ledger = open_ledger(&dir);
        let entries = ledger.entries_for_day(day).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "Oatmeal");
        assert_eq!(entries[0].day, day);
    }

    #[test]
    fn entries_listed_oldest_first() {
        let dir = tempdir().unwrap();
        let ledger = open_ledger(&dir);
        let day = date!(2026 - 08 - 24);
        ledger.record(&entry("First", 1.0, 0.0), day).unwrap();
        ledger.record(&entry("Second", 2.0, 0.0), day).unwrap();
        let names: Vec<String> = ledger
            .entries_for_day(day)
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, ["First", "Second"]);
    }

    #[test]
    fn negative_amounts_are_rejected() {
        let dir = tempdir().unwrap();
        let ledger = open_ledger(&dir);
        let err = ledger
            .record(&entry("Broken", -1.0, 0.0), date!(2026 - 08 - 24))
            .unwrap_err();
        assert!(matches!(err, LedgerError::NegativeAmount { .. }));
        assert_eq!(
            ledger.daily_totals(date!(2026 - 08 - 24)).unwrap(),
            DailyTotal::default()
        );
    }
}
