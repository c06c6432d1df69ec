use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use time::Date;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

const HEADER: [&str; 4] = ["endereco", "data", "hora", "nome"];

const DATE_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]");

/// One scheduled visit. Appended to the ledger, never updated or deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisitRequest {
    pub address: String,
    /// ISO-8601 calendar date, `YYYY-MM-DD`.
    pub date: String,
    /// 24-hour wall-clock time, `HH:MM`.
    pub time: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    InvalidDate { value: String },
    InvalidTime { value: String },
    Write { path: PathBuf, reason: String },
}

impl Display for LedgerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidDate { value } => {
                write!(f, "invalid visit date '{value}', expected YYYY-MM-DD")
            }
            Self::InvalidTime { value } => {
                write!(f, "invalid visit time '{value}', expected HH:MM")
            }
            Self::Write { path, reason } => {
                write!(f, "failed to write visit ledger {}: {reason}", path.display())
            }
        }
    }
}

impl Error for LedgerError {}

pub type LedgerResult<T> = std::result::Result<T, LedgerError>;

/// Append-only CSV file of scheduled visits.
///
/// Created with its header on the first append. Appends are at-least-once
/// and non-transactional: no duplicate detection, no slot conflict check,
/// no atomic rename. Concurrent writers are not coordinated.
#[derive(Debug, Clone)]
pub struct VisitLedger {
    path: PathBuf,
}

impl VisitLedger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, visit: &VisitRequest) -> LedgerResult<()> {
        Date::parse(&visit.date, DATE_FORMAT).map_err(|_| LedgerError::InvalidDate {
            value: visit.date.clone(),
        })?;
        if !is_valid_wall_clock(&visit.time) {
            return Err(LedgerError::InvalidTime {
                value: visit.time.clone(),
            });
        }

        let needs_header = match fs::metadata(&self.path) {
            Ok(metadata) => metadata.len() == 0,
            Err(_) => true,
        };

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|err| self.write_error(err.to_string()))?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        if needs_header {
            writer
                .write_record(HEADER)
                .map_err(|err| self.write_error(err.to_string()))?;
        }
        writer
            .write_record([&visit.address, &visit.date, &visit.time, &visit.name])
            .map_err(|err| self.write_error(err.to_string()))?;
        writer
            .flush()
            .map_err(|err| self.write_error(err.to_string()))?;

        Ok(())
    }

    fn write_error(&self, reason: String) -> LedgerError {
        LedgerError::Write {
            path: self.path.clone(),
            reason,
        }
    }
}

/// 24-hour `HH:MM` (single-digit hours tolerated, minutes always two digits).
fn is_valid_wall_clock(value: &str) -> bool {
    let Some((hour, minute)) = value.split_once(':') else {
        return false;
    };
    if hour.is_empty() || hour.len() > 2 || minute.len() != 2 {
        return false;
    }
    if !hour.bytes().all(|b| b.is_ascii_digit()) || !minute.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }

    match (hour.parse::<u8>(), minute.parse::<u8>()) {
        (Ok(h), Ok(m)) => h < 24 && m < 60,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::{LedgerError, VisitLedger, VisitRequest, is_valid_wall_clock};
    use std::fs;

    fn visit(address: &str, date: &str, time: &str, name: &str) -> VisitRequest {
        VisitRequest {
            address: address.to_string(),
            date: date.to_string(),
            time: time.to_string(),
            name: name.to_string(),
        }
    }

    #[test]
    fn first_append_creates_file_with_header_and_row() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let ledger = VisitLedger::new(tmp.path().join("visitas.csv"));

        ledger
            .append(&visit("Rua X, 10", "2024-06-01", "14:00", "Ana"))
            .expect("append visit");

        let content = fs::read_to_string(ledger.path()).expect("read ledger");
        let mut lines = content.lines();
        assert_eq!(lines.next(), Some("endereco,data,hora,nome"));
        assert_eq!(lines.next(), Some("\"Rua X, 10\",2024-06-01,14:00,Ana"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn appends_are_monotonic_and_keep_call_order() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let ledger = VisitLedger::new(tmp.path().join("visitas.csv"));

        ledger
            .append(&visit("Rua A", "2024-06-01", "09:00", "Bruno"))
            .expect("first append");
        ledger
            .append(&visit("Rua B", "2024-06-02", "10:30", "Carla"))
            .expect("second append");
        ledger
            .append(&visit("Rua C", "2024-06-03", "16:15", "Diego"))
            .expect("third append");

        let mut reader = csv::Reader::from_path(ledger.path()).expect("open ledger");
        let rows: Vec<csv::StringRecord> = reader
            .records()
            .collect::<Result<_, _>>()
            .expect("read rows");

        assert_eq!(rows.len(), 3);
        assert_eq!(&rows[0], &["Rua A", "2024-06-01", "09:00", "Bruno"][..]);
        assert_eq!(&rows[1], &["Rua B", "2024-06-02", "10:30", "Carla"][..]);
        assert_eq!(&rows[2], &["Rua C", "2024-06-03", "16:15", "Diego"][..]);
    }

    #[test]
    fn duplicate_slots_are_allowed() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let ledger = VisitLedger::new(tmp.path().join("visitas.csv"));
        let request = visit("Rua X, 10", "2024-06-01", "14:00", "Ana");

        ledger.append(&request).expect("first append");
        ledger.append(&request).expect("duplicate append");

        let content = fs::read_to_string(ledger.path()).expect("read ledger");
        assert_eq!(content.lines().count(), 3);
    }

    #[test]
    fn rejects_malformed_date() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let ledger = VisitLedger::new(tmp.path().join("visitas.csv"));

        let err = ledger
            .append(&visit("Rua X", "01/06/2024", "14:00", "Ana"))
            .expect_err("bad date should fail");
        assert_eq!(
            err,
            LedgerError::InvalidDate {
                value: "01/06/2024".to_string()
            }
        );
        assert!(!ledger.path().exists(), "rejected visit must not touch the file");
    }

    #[test]
    fn rejects_malformed_time() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let ledger = VisitLedger::new(tmp.path().join("visitas.csv"));

        let err = ledger
            .append(&visit("Rua X", "2024-06-01", "2pm", "Ana"))
            .expect_err("bad time should fail");
        assert_eq!(
            err,
            LedgerError::InvalidTime {
                value: "2pm".to_string()
            }
        );
    }

    #[test]
    fn wall_clock_validation_covers_ranges_and_shape() {
        for valid in ["00:00", "9:30", "14:00", "23:59"] {
            assert!(is_valid_wall_clock(valid), "{valid} should be valid");
        }
        for invalid in ["24:00", "12:60", "2pm", "14h00", "14:0", "14:000", ":30", "1a:30"] {
            assert!(!is_valid_wall_clock(invalid), "{invalid} should be invalid");
        }
    }

    #[test]
    fn unwritable_target_surfaces_write_error() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let ledger = VisitLedger::new(tmp.path().join("missing-dir").join("visitas.csv"));

        let err = ledger
            .append(&visit("Rua X", "2024-06-01", "14:00", "Ana"))
            .expect_err("unwritable path should fail");
        assert!(matches!(err, LedgerError::Write { .. }));
    }
}
