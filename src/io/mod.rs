use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// One line of a dataset, held as opaque text.
///
/// Fields are positional: the maximal non-empty substrings obtained by
/// splitting on commas and ASCII whitespace. No schema is enforced beyond
/// positional access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    raw: String,
}

impl Record {
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.raw
            .split(|c: char| c == ',' || c.is_ascii_whitespace())
            .filter(|field| !field.is_empty())
    }

    pub fn field(&self, index: usize) -> Option<&str> {
        self.fields().nth(index)
    }
}

/// Read a dataset into memory, one record per line, preserving line order.
pub fn read_records(path: &Path) -> Result<Vec<Record>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open dataset: {}", path.display()))?;

    let mut records = Vec::new();
    for line in BufReader::new(file).lines() {
        let line =
            line.with_context(|| format!("Failed to read dataset: {}", path.display()))?;
        records.push(Record::new(line));
    }
    Ok(records)
}

/// Write records line-by-line in the given order. Any existing file at the
/// path is truncated.
pub fn write_records(path: &Path, records: &[Record]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let file = File::create(path)
        .with_context(|| format!("Failed to create output file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    for record in records {
        writeln!(writer, "{}", record.as_str())?;
    }
    writer.flush()?;
    Ok(())
}
