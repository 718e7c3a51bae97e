//! Modification timestamps in HTTP-date shape

use chrono::{DateTime, Local, NaiveDateTime};
use std::path::Path;
use std::time::SystemTime;

use crate::error::{Error, Result};

/// Output pattern. The `+0000` suffix is literal: the wall-clock time is
/// local and is not converted to UTC.
const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S +0000";

/// Format a naive wall-clock time
pub fn format_http_date(time: &NaiveDateTime) -> String {
    time.format(HTTP_DATE_FORMAT).to_string()
}

/// Format a system time in the local timezone
pub fn format_system_time(time: SystemTime) -> String {
    let local: DateTime<Local> = time.into();
    format_http_date(&local.naive_local())
}

/// Read a file's last-modification time and format it
pub fn modified_timestamp(path: &Path) -> Result<String> {
    let modified = std::fs::metadata(path)
        .and_then(|meta| meta.modified())
        .map_err(|e| Error::file_read(path, e))?;
    Ok(format_system_time(modified))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_format_http_date() {
        let time = NaiveDate::from_ymd_opt(2024, 9, 7)
            .unwrap()
            .and_hms_opt(8, 5, 3)
            .unwrap();
        assert_eq!(format_http_date(&time), "Sat, 07 Sep 2024 08:05:03 +0000");
    }

    #[test]
    fn test_suffix_is_literal() {
        let stamp = format_system_time(SystemTime::UNIX_EPOCH);
        assert!(stamp.ends_with(" +0000"));
        assert_eq!(stamp.len(), "Thu, 01 Jan 1970 00:00:00 +0000".len());

        let expected: DateTime<Local> = SystemTime::UNIX_EPOCH.into();
        assert!(stamp.starts_with(&expected.format("%a, %d %b %Y").to_string()));
    }

    #[test]
    fn test_missing_file() {
        let err = modified_timestamp(Path::new("/definitely/not/here.txt")).unwrap_err();
        assert!(matches!(err, Error::FileRead { .. }));
    }
}
