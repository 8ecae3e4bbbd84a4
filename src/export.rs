//! CSV export of the winner ledger: UTF-8 with a leading byte-order mark so
//! spreadsheet imports decode it correctly, a `名次,姓名` header, CRLF line
//! endings, and one row per winner whose rank counts down from the most
//! recent draw.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use directories::UserDirs;

use crate::models::Participant;

/// Header row of the exported file: rank, name.
const CSV_HEADER: &str = "名次,姓名";
/// Byte-order mark so spreadsheet imports detect UTF-8.
const BOM: char = '\u{feff}';

/// Render the ledger as CSV text. Entry 0 is the most recent winner and gets
/// the highest rank number.
pub fn winners_csv(ledger: &[Participant]) -> String {
    let mut csv = String::new();
    csv.push(BOM);
    csv.push_str(CSV_HEADER);
    csv.push_str("\r\n");

    for (index, winner) in ledger.iter().enumerate() {
        let rank = ledger.len() - index;
        csv.push_str(&format!("{rank},{}\r\n", winner.name));
    }

    csv
}

/// Build the export file name from the event title: every character that is
/// not an ASCII alphanumeric becomes `_`, letters are lowercased, and the
/// date is appended as `_winners_<YYYY-MM-DD>.csv`.
pub fn export_filename(title: &str, date: NaiveDate) -> String {
    let sanitized: String = title
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() {
                ch.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();

    format!("{sanitized}_winners_{}.csv", date.format("%Y-%m-%d"))
}

/// Write the winner ledger as a CSV file into `dir` and return the full path.
/// The caller is expected to have checked that the ledger is non-empty and to
/// surface that case as a status message instead.
pub fn export_winners(
    ledger: &[Participant],
    title: &str,
    dir: &Path,
    date: NaiveDate,
) -> Result<PathBuf> {
    let path = dir.join(export_filename(title, date));
    fs::write(&path, winners_csv(ledger))
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(path)
}

/// Directory exported files land in: the user's download folder when the
/// platform knows one, the current working directory otherwise.
pub fn export_dir() -> Result<PathBuf> {
    if let Some(dir) = UserDirs::new().and_then(|dirs| dirs.download_dir().map(Path::to_path_buf)) {
        return Ok(dir);
    }
    env::current_dir().context("failed to resolve current directory")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn winner(id: i64, name: &str) -> Participant {
        Participant {
            id,
            name: name.to_string(),
        }
    }

    #[test]
    fn test_csv_ranks_count_down_from_newest() {
        // C was drawn last, so it leads the ledger and takes the top rank.
        let ledger = vec![winner(3, "C"), winner(2, "B"), winner(1, "A")];
        let csv = winners_csv(&ledger);

        assert_eq!(csv, "\u{feff}名次,姓名\r\n3,C\r\n2,B\r\n1,A\r\n");
    }

    #[test]
    fn test_csv_of_empty_ledger_is_header_only() {
        let csv = winners_csv(&[]);
        assert_eq!(csv, "\u{feff}名次,姓名\r\n");
    }

    #[test]
    fn test_filename_sanitizes_and_lowercases() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(
            export_filename("Demo 2024!", date),
            "demo_2024__winners_2024-03-09.csv"
        );
    }

    #[test]
    fn test_filename_replaces_non_ascii_titles_entirely() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(
            export_filename("抽獎", date),
            "___winners_2024-03-09.csv"
        );
    }

    #[test]
    fn test_export_writes_the_file() {
        let dir = tempdir().unwrap();
        let ledger = vec![winner(2, "Bob"), winner(1, "Alice")];
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();

        let path = export_winners(&ledger, "Demo", dir.path(), date).unwrap();

        assert_eq!(path, dir.path().join("demo_winners_2024-03-09.csv"));
        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "\u{feff}名次,姓名\r\n2,Bob\r\n1,Alice\r\n");
    }
}
