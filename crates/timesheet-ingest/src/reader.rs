//! CSV loading into text-typed Polars DataFrames.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use polars::prelude::*;
use tracing::debug;

use crate::error::{IngestError, Result};
use crate::polars_utils::any_to_string_non_empty;

/// Byte-order marks of encodings Polars cannot read.
const FOREIGN_BOMS: &[(&[u8], &str)] = &[
    (&[0xFF, 0xFE], "UTF-16 LE"),
    (&[0xFE, 0xFF], "UTF-16 BE"),
];

fn access_error(path: &Path, err: io::Error) -> IngestError {
    match err.kind() {
        io::ErrorKind::NotFound => IngestError::FileNotFound {
            path: path.to_path_buf(),
        },
        _ => IngestError::FileAccess {
            path: path.to_path_buf(),
            source: err,
        },
    }
}

/// Reject empty files and UTF-16 exports before handing the file to Polars.
pub fn validate_encoding(path: &Path) -> Result<()> {
    let mut head = Vec::with_capacity(4);
    File::open(path)
        .and_then(|file| file.take(4).read_to_end(&mut head))
        .map_err(|err| access_error(path, err))?;
    if head.is_empty() {
        return Err(IngestError::EmptyCsv {
            path: path.to_path_buf(),
        });
    }
    match FOREIGN_BOMS.iter().find(|(bom, _)| head.starts_with(bom)) {
        Some(&(_, encoding)) => Err(IngestError::UnsupportedEncoding {
            path: path.to_path_buf(),
            encoding,
        }),
        None => Ok(()),
    }
}

fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    trimmed.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Trim stray whitespace and byte-order marks from column names.
fn normalize_headers(df: DataFrame) -> Result<DataFrame> {
    let columns: Vec<Column> = df
        .get_columns()
        .iter()
        .map(|column| {
            let name = normalize_header(column.name());
            column.clone().with_name(name.into())
        })
        .collect();
    Ok(DataFrame::new(columns)?)
}

/// Drop rows where every cell is blank (trailing spreadsheet rows).
fn drop_blank_rows(df: DataFrame) -> Result<DataFrame> {
    let mut keep = vec![false; df.height()];
    for column in df.get_columns() {
        for (idx, flag) in keep.iter_mut().enumerate() {
            if *flag {
                continue;
            }
            let value = column.get(idx).unwrap_or(AnyValue::Null);
            if any_to_string_non_empty(value).is_some() {
                *flag = true;
            }
        }
    }
    if keep.iter().all(|flag| *flag) {
        return Ok(df);
    }
    let mask = BooleanChunked::from_slice("keep".into(), &keep);
    Ok(df.filter(&mask)?)
}

/// Reads a CSV file into a DataFrame whose columns are all `String`.
///
/// Headers are whitespace-normalized and fully blank rows are dropped. No
/// dtype inference happens here: day columns mix hours, `OFF` and leave
/// labels, and identifiers must keep their leading zeros.
pub fn read_table(path: &Path) -> Result<DataFrame> {
    validate_encoding(path)?;

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
        .finish()
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    let df = drop_blank_rows(normalize_headers(df)?)?;
    debug!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "loaded table"
    );
    Ok(df)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn csv_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_read_table_keeps_leading_zeros() {
        let file = csv_file("ID,Name\n00000000005,Nino\n");
        let df = read_table(file.path()).unwrap();

        assert_eq!(df.height(), 1);
        let id = df.column("ID").unwrap().get(0).unwrap();
        assert_eq!(any_to_string_non_empty(id), Some("00000000005".to_string()));
    }

    #[test]
    fn test_read_table_normalizes_headers() {
        let file = csv_file("\u{feff} Starts  on ,Email\n2024-03-01,a@x.ge\n");
        let df = read_table(file.path()).unwrap();

        let names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect();
        assert_eq!(names, vec!["Starts on", "Email"]);
    }

    #[test]
    fn test_read_table_drops_blank_rows() {
        let file = csv_file("ID,2024-03-01\n5,8\n,\n7,OFF\n");
        let df = read_table(file.path()).unwrap();

        assert_eq!(df.height(), 2);
    }

    #[test]
    fn test_read_table_rejects_empty_file() {
        let file = csv_file("");
        let result = read_table(file.path());
        assert!(matches!(result, Err(IngestError::EmptyCsv { .. })));
    }

    #[test]
    fn test_read_table_missing_file() {
        let result = read_table(Path::new("/nonexistent/base.csv"));
        assert!(matches!(result, Err(IngestError::FileNotFound { .. })));
    }

    #[test]
    fn test_read_table_rejects_utf16() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&[0xFF, 0xFE, b'I', 0, b'D', 0]).unwrap();
        let result = read_table(file.path());
        let Err(IngestError::UnsupportedEncoding { encoding, .. }) = &result else {
            panic!("expected an encoding error, got {result:?}");
        };
        assert_eq!(*encoding, "UTF-16 LE");
    }
}
