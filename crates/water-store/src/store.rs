//! Table Store Implementation

use crate::record::{
    format_date, format_measure, parse_date, parse_measure, ParseWarning, QualityRecord, Record,
    UsageRecord, DATE_COLUMN, HOUSEHOLD_COLUMN,
};
use crate::StoreError;
use csv::StringRecord;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Default usage file name
pub const USAGE_FILE: &str = "water_usage.csv";
/// Default quality file name
pub const QUALITY_FILE: &str = "water_quality.csv";

/// Locations of the two data files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    pub usage_path: PathBuf,
    pub quality_path: PathBuf,
}

impl StoreConfig {
    /// Both files with their default names inside `dir`
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            usage_path: dir.join(USAGE_FILE),
            quality_path: dir.join(QUALITY_FILE),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::in_dir("data")
    }
}

/// Result of loading a file: rows in file order plus any field-level warnings
#[derive(Debug, Clone, PartialEq)]
pub struct Loaded<R> {
    pub records: Vec<R>,
    pub warnings: Vec<ParseWarning>,
}

impl<R> Default for Loaded<R> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            warnings: Vec::new(),
        }
    }
}

/// Column positions resolved from a file's header row
struct Columns {
    date: usize,
    household: usize,
    measure: usize,
    width: usize,
}

impl Columns {
    fn resolve<R: Record>(header: &StringRecord, path: &Path) -> Result<Self, StoreError> {
        let find = |column: &'static str| {
            header
                .iter()
                .position(|name| name.trim() == column)
                .ok_or_else(|| StoreError::MissingColumn {
                    path: path.to_path_buf(),
                    column,
                })
        };
        Ok(Self {
            date: find(DATE_COLUMN)?,
            household: find(HOUSEHOLD_COLUMN)?,
            measure: find(R::MEASURE_COLUMN)?,
            width: header.len(),
        })
    }

    fn parse<R: Record>(&self, row: &StringRecord, warnings: &mut Vec<ParseWarning>) -> R {
        let line = row.position().map(|p| p.line()).unwrap_or(0);
        let raw_date = row.get(self.date).unwrap_or("");
        let raw_measure = row.get(self.measure).unwrap_or("");

        let date = parse_date(raw_date);
        if date.is_none() {
            warnings.push(ParseWarning {
                line,
                field: DATE_COLUMN,
                value: raw_date.to_string(),
            });
        }

        let measure = parse_measure(raw_measure);
        if measure.is_none() {
            warnings.push(ParseWarning {
                line,
                field: R::MEASURE_COLUMN,
                value: raw_measure.to_string(),
            });
        }

        let household = row.get(self.household).unwrap_or("").to_string();
        R::from_parts(date, household, measure)
    }

    /// Lay out a record in this file's column order
    fn place<R: Record>(&self, record: &R) -> StringRecord {
        let mut fields = vec![String::new(); self.width];
        fields[self.date] = format_date(record.date());
        fields[self.household] = record.household().to_string();
        fields[self.measure] = format_measure(record.measure());
        StringRecord::from(fields)
    }
}

/// Append-only store for one record kind, backed by one CSV file
#[derive(Debug, Clone)]
pub struct TableStore<R> {
    path: PathBuf,
    _kind: PhantomData<R>,
}

impl<R: Record> TableStore<R> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _kind: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the file with only a header row if it does not exist.
    ///
    /// Returns `true` when the file was created.
    pub fn ensure_initialized(&self) -> Result<bool, StoreError> {
        if self.path.exists() {
            debug!("{} already present", self.path.display());
            return Ok(false);
        }

        let init_error = |source| StoreError::Initialization {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(init_error)?;
            }
        }

        let header = StringRecord::from(R::header().to_vec());
        let bytes = encode(&header, std::iter::empty()).map_err(init_error)?;
        fs::write(&self.path, bytes).map_err(init_error)?;

        info!("Created {} with header only", self.path.display());
        Ok(true)
    }

    /// Read the whole file, add `record` as the last row, rewrite the file.
    ///
    /// Existing rows are carried over byte-for-byte in field terms, including
    /// rows that would not parse. Not atomic: a failed write can leave the
    /// file truncated.
    pub fn append(&self, record: &R) -> Result<(), StoreError> {
        let (header, rows) = self.read_raw()?;
        let columns = Columns::resolve::<R>(&header, &self.path)?;
        let new_row = columns.place(record);

        let bytes = encode(&header, rows.iter().chain(std::iter::once(&new_row))).map_err(
            |source| StoreError::Write {
                path: self.path.clone(),
                source,
            },
        )?;
        fs::write(&self.path, bytes).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })?;

        debug!(
            "Appended row {} to {}",
            rows.len() + 1,
            self.path.display()
        );
        Ok(())
    }

    /// Parse every row in file order.
    ///
    /// A header-only file yields no records. Unparseable dates and
    /// measurements become `None` and are reported in `warnings`.
    pub fn load_all(&self) -> Result<Loaded<R>, StoreError> {
        let (header, rows) = self.read_raw()?;
        let columns = Columns::resolve::<R>(&header, &self.path)?;

        let mut loaded = Loaded::default();
        for row in &rows {
            let record = columns.parse::<R>(row, &mut loaded.warnings);
            loaded.records.push(record);
        }

        if !loaded.warnings.is_empty() {
            warn!(
                "{}: {} unparseable field(s) across {} row(s)",
                self.path.display(),
                loaded.warnings.len(),
                loaded.records.len()
            );
        }
        Ok(loaded)
    }

    fn read_raw(&self) -> Result<(StringRecord, Vec<StringRecord>), StoreError> {
        let bytes = fs::read(&self.path).map_err(|source| StoreError::Read {
            path: self.path.clone(),
            source,
        })?;
        let csv_error = |source| StoreError::Csv {
            path: self.path.clone(),
            source,
        };

        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(bytes.as_slice());
        let header = reader.headers().map_err(csv_error)?.clone();
        let rows = reader
            .records()
            .collect::<Result<Vec<_>, _>>()
            .map_err(csv_error)?;
        Ok((header, rows))
    }
}

fn encode<'a>(
    header: &StringRecord,
    rows: impl Iterator<Item = &'a StringRecord>,
) -> Result<Vec<u8>, io::Error> {
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(Vec::new());
    writer.write_record(header)?;
    for row in rows {
        writer.write_record(row)?;
    }
    writer
        .into_inner()
        .map_err(|e| io::Error::new(e.error().kind(), e.to_string()))
}

/// The two independent stores of the dashboard
#[derive(Debug, Clone)]
pub struct WaterStore {
    usage: TableStore<UsageRecord>,
    quality: TableStore<QualityRecord>,
}

impl WaterStore {
    pub fn new(config: &StoreConfig) -> Self {
        info!(
            "Using usage file {} and quality file {}",
            config.usage_path.display(),
            config.quality_path.display()
        );
        Self {
            usage: TableStore::new(&config.usage_path),
            quality: TableStore::new(&config.quality_path),
        }
    }

    /// Create any missing file; safe to call on every startup
    pub fn ensure_initialized(&self) -> Result<(), StoreError> {
        self.usage.ensure_initialized()?;
        self.quality.ensure_initialized()?;
        Ok(())
    }

    pub fn usage(&self) -> &TableStore<UsageRecord> {
        &self.usage
    }

    pub fn quality(&self) -> &TableStore<QualityRecord> {
        &self.quality
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn store() -> (TempDir, WaterStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = WaterStore::new(&StoreConfig::in_dir(dir.path().join("data")));
        store.ensure_initialized().unwrap();
        (dir, store)
    }

    #[test]
    fn test_initialize_writes_header_only() {
        let (_dir, store) = store();

        let usage = fs::read_to_string(store.usage().path()).unwrap();
        let quality = fs::read_to_string(store.quality().path()).unwrap();
        assert_eq!(usage, "date,household,liters\n");
        assert_eq!(quality, "date,household,pH\n");
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let (_dir, store) = store();
        store
            .usage()
            .append(&UsageRecord::new(date(2024, 1, 1), "A", 120.0))
            .unwrap();
        let before = fs::read(store.usage().path()).unwrap();

        assert!(!store.usage().ensure_initialized().unwrap());
        store.ensure_initialized().unwrap();

        assert_eq!(fs::read(store.usage().path()).unwrap(), before);
    }

    #[test]
    fn test_empty_store_loads_empty() {
        let (_dir, store) = store();

        let usage = store.usage().load_all().unwrap();
        let quality = store.quality().load_all().unwrap();
        assert!(usage.records.is_empty());
        assert!(usage.warnings.is_empty());
        assert!(quality.records.is_empty());
    }

    #[test]
    fn test_append_then_load_round_trip() {
        let (_dir, store) = store();
        let record = QualityRecord::new(date(2024, 1, 5), "Household A", 7.3);

        store.quality().append(&record).unwrap();

        let loaded = store.quality().load_all().unwrap();
        assert_eq!(loaded.records, vec![record]);
        assert!(loaded.warnings.is_empty());
    }

    #[test]
    fn test_append_preserves_order_and_duplicates() {
        let (_dir, store) = store();
        let first = UsageRecord::new(date(2024, 1, 2), "A", 100.0);
        let second = UsageRecord::new(date(2024, 1, 1), "A", 80.5);
        let third = UsageRecord::new(date(2024, 1, 2), "A", 100.0);

        for record in [&first, &second, &third] {
            store.usage().append(record).unwrap();
        }

        let loaded = store.usage().load_all().unwrap();
        assert_eq!(loaded.records, vec![first, second, third]);
    }

    #[test]
    fn test_household_is_stored_raw() {
        let (_dir, store) = store();
        store
            .usage()
            .append(&UsageRecord::new(date(2024, 1, 1), " house, \"A\" ", 1.0))
            .unwrap();

        let loaded = store.usage().load_all().unwrap();
        assert_eq!(loaded.records[0].household, " house, \"A\" ");
    }

    #[test]
    fn test_bad_date_row_is_kept() {
        let (_dir, store) = store();
        fs::write(
            store.quality().path(),
            "date,household,pH\n2024-01-01,A,7.0\nnot-a-date,B,6.8\n2024-01-03,C,8.1\n",
        )
        .unwrap();

        let loaded = store.quality().load_all().unwrap();
        assert_eq!(loaded.records.len(), 3);
        assert_eq!(loaded.records[1].date, None);
        assert_eq!(loaded.records[1].household, "B");
        assert_eq!(loaded.records[1].ph, Some(6.8));
        assert_eq!(loaded.records[2].date, Some(date(2024, 1, 3)));
        assert_eq!(
            loaded.warnings,
            vec![ParseWarning {
                line: 3,
                field: "date",
                value: "not-a-date".to_string(),
            }]
        );
    }

    #[test]
    fn test_non_numeric_measure_is_blanked() {
        let (_dir, store) = store();
        fs::write(
            store.usage().path(),
            "date,household,liters\n2024-01-01,A,lots\n2024-01-02,A\n",
        )
        .unwrap();

        let loaded = store.usage().load_all().unwrap();
        assert_eq!(loaded.records.len(), 2);
        assert!(loaded.records.iter().all(|r| r.liters.is_none()));
        assert_eq!(loaded.warnings.len(), 2);
    }

    #[test]
    fn test_append_carries_malformed_rows_verbatim() {
        let (_dir, store) = store();
        fs::write(
            store.usage().path(),
            "date,household,liters\nsometime,A,n/a\n",
        )
        .unwrap();

        store
            .usage()
            .append(&UsageRecord::new(date(2024, 2, 1), "B", 55.5))
            .unwrap();

        let content = fs::read_to_string(store.usage().path()).unwrap();
        assert_eq!(
            content,
            "date,household,liters\nsometime,A,n/a\n2024-02-01,B,55.5\n"
        );
    }

    #[test]
    fn test_columns_resolved_by_name() {
        let (_dir, store) = store();
        fs::write(store.quality().path(), "household,pH,date\nA,7.5,2024-01-01\n").unwrap();

        store
            .quality()
            .append(&QualityRecord::new(date(2024, 1, 2), "B", 6.0))
            .unwrap();

        let loaded = store.quality().load_all().unwrap();
        assert_eq!(loaded.records[0], QualityRecord::new(date(2024, 1, 1), "A", 7.5));
        assert_eq!(loaded.records[1], QualityRecord::new(date(2024, 1, 2), "B", 6.0));
    }

    #[test]
    fn test_missing_column_is_read_error() {
        let (_dir, store) = store();
        fs::write(store.quality().path(), "date,household\n2024-01-01,A\n").unwrap();

        let err = store.quality().load_all().unwrap_err();
        assert!(matches!(err, StoreError::MissingColumn { column: "pH", .. }));
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let table = TableStore::<UsageRecord>::new(dir.path().join("absent.csv"));

        assert!(matches!(table.load_all(), Err(StoreError::Read { .. })));
        assert!(matches!(
            table.append(&UsageRecord::new(date(2024, 1, 1), "A", 1.0)),
            Err(StoreError::Read { .. })
        ));
    }

    #[test]
    fn test_uncreatable_location_is_initialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();

        let store = WaterStore::new(&StoreConfig::in_dir(blocker.join("data")));
        assert!(matches!(
            store.ensure_initialized(),
            Err(StoreError::Initialization { .. })
        ));
    }
}
