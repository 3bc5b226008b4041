//! Chunked reading of the user's input CSV

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use csv::StringRecord;
use tracing::{debug, warn};

use crate::config::LinkConfig;
use crate::domain::{ExclusionSet, InputRecord};
use crate::error::{ConfigError, LinkError, Result};
use crate::identifiers::extract_doi;

/// Split an authors cell into trimmed, non-empty names.
///
/// An empty separator means the cell holds a single author.
pub fn split_authors(cell: &str, separator: &str) -> Vec<String> {
    if separator.is_empty() {
        let name = cell.trim();
        return if name.is_empty() {
            Vec::new()
        } else {
            vec![name.to_string()]
        };
    }

    cell.split(separator)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Positions of the configured columns in the header row
#[derive(Debug, Clone, Copy)]
struct ColumnIndexes {
    doi: Option<usize>,
    work_id: Option<usize>,
    authors: usize,
}

/// Reader over the input file, resolved against the configured columns.
#[derive(Debug, Clone)]
pub struct InputReader {
    path: PathBuf,
    columns: ColumnIndexes,
    separator: String,
}

impl InputReader {
    /// Open the input file and resolve configured column names.
    pub fn open(path: impl AsRef<Path>, config: &LinkConfig) -> Result<Self> {
        let path = path.as_ref();
        let headers = read_headers(path)?;

        let authors_name = config
            .authors_column()
            .ok_or_else(|| ConfigError::MissingKey("input_columns.authors".to_string()))?;

        let columns = ColumnIndexes {
            doi: config
                .doi_column()
                .map(|name| column_index(&headers, name))
                .transpose()?,
            work_id: config
                .work_id_column()
                .map(|name| column_index(&headers, name))
                .transpose()?,
            authors: column_index(&headers, authors_name)?,
        };

        if columns.doi.is_none() && columns.work_id.is_none() {
            return Err(ConfigError::MissingIdentifierColumn.into());
        }

        Ok(Self {
            path: path.to_path_buf(),
            columns,
            separator: config.author_separator().to_string(),
        })
    }

    /// Scan the whole file once for the identifiers it already contains.
    pub fn exclusion_set(&self) -> Result<ExclusionSet> {
        let mut reader = open_csv(&self.path)?;
        let mut record = StringRecord::new();
        let mut set = ExclusionSet::new();

        loop {
            match reader.read_record(&mut record) {
                Ok(true) => {
                    let doi = cell(&record, self.columns.doi);
                    let work_id = cell(&record, self.columns.work_id);
                    set.insert(doi, work_id);
                }
                Ok(false) => break,
                Err(e) if e.is_io_error() => return Err(e.into()),
                Err(e) => warn!(error = %e, "Skipping unreadable input row"),
            }
        }

        debug!(
            pairs = set.len(),
            dois = set.doi_count(),
            work_ids = set.work_id_count(),
            "Built exclusion set"
        );
        Ok(set)
    }

    /// Iterate the file in chunks of at most `chunk_size` records.
    pub fn chunks(&self, chunk_size: usize) -> Result<InputChunks> {
        Ok(InputChunks {
            reader: open_csv(&self.path)?,
            columns: self.columns,
            separator: self.separator.clone(),
            chunk_size: chunk_size.max(1),
            done: false,
        })
    }

    fn parse(record: &StringRecord, columns: ColumnIndexes, separator: &str) -> InputRecord {
        InputRecord {
            doi: cell(record, columns.doi).and_then(extract_doi),
            work_id: cell(record, columns.work_id)
                .map(str::trim)
                .filter(|w| !w.is_empty())
                .map(str::to_string),
            authors: cell(record, Some(columns.authors))
                .map(|c| split_authors(c, separator))
                .unwrap_or_default(),
        }
    }
}

/// Chunk iterator returned by [`InputReader::chunks`]
pub struct InputChunks {
    reader: csv::Reader<BufReader<File>>,
    columns: ColumnIndexes,
    separator: String,
    chunk_size: usize,
    done: bool,
}

impl Iterator for InputChunks {
    type Item = Result<Vec<InputRecord>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let mut chunk = Vec::with_capacity(self.chunk_size.min(4096));
        let mut record = StringRecord::new();

        while chunk.len() < self.chunk_size {
            match self.reader.read_record(&mut record) {
                Ok(true) => chunk.push(InputReader::parse(&record, self.columns, &self.separator)),
                Ok(false) => {
                    self.done = true;
                    break;
                }
                Err(e) if e.is_io_error() => {
                    self.done = true;
                    return Some(Err(e.into()));
                }
                Err(e) => warn!(error = %e, "Skipping unreadable input row"),
            }
        }

        if chunk.is_empty() {
            None
        } else {
            Some(Ok(chunk))
        }
    }
}

/// Read every value of one column, for affiliation search mode.
pub fn read_column(path: impl AsRef<Path>, column: &str) -> Result<Vec<String>> {
    let path = path.as_ref();
    let headers = read_headers(path)?;
    let idx = column_index(&headers, column)?;

    let mut reader = open_csv(path)?;
    let mut values = Vec::new();
    for result in reader.records() {
        match result {
            Ok(record) => {
                if let Some(value) = record.get(idx) {
                    values.push(value.to_string());
                }
            }
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => warn!(error = %e, "Skipping unreadable input row"),
        }
    }
    Ok(values)
}

fn open_csv(path: &Path) -> Result<csv::Reader<BufReader<File>>> {
    if !path.is_file() {
        return Err(LinkError::MissingResource(format!(
            "input file not found: {}",
            path.display()
        )));
    }

    let file = File::open(path)?;
    Ok(csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(BufReader::new(file)))
}

fn read_headers(path: &Path) -> Result<StringRecord> {
    let mut reader = open_csv(path)?;
    Ok(reader.headers()?.clone())
}

fn column_index(headers: &StringRecord, name: &str) -> std::result::Result<usize, ConfigError> {
    headers
        .iter()
        .position(|h| h.trim() == name.trim())
        .ok_or_else(|| ConfigError::MissingColumn(name.to_string()))
}

fn cell(record: &StringRecord, idx: Option<usize>) -> Option<&str> {
    idx.and_then(|i| record.get(i))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_authors() {
        assert_eq!(split_authors("Smith J; Doe A;  ", ";"), vec!["Smith J", "Doe A"]);
        assert_eq!(split_authors("  Smith, John ", ""), vec!["Smith, John"]);
        assert!(split_authors("   ", "").is_empty());
        assert!(split_authors("", ";").is_empty());
    }

    #[test]
    fn test_split_authors_multichar_separator() {
        assert_eq!(split_authors("A B | C D", " | "), vec!["A B", "C D"]);
    }
}
