// src/corpus.rs
//! Persisted input and output: the labelled corpus, the feature matrix and
//! the optional overlap/vocabulary dumps.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use crate::error::{FeatureError, Result};
use crate::features::VocabularyIndex;
use crate::matrix::{header, FeatureMatrix};

/// Binary class of a record: 1 sarcastic, 0 not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Label {
    NonSarcastic,
    Sarcastic,
}

impl Label {
    pub fn as_u8(self) -> u8 {
        match self {
            Label::NonSarcastic => 0,
            Label::Sarcastic => 1,
        }
    }
}

impl TryFrom<i64> for Label {
    type Error = String;

    fn try_from(v: i64) -> std::result::Result<Self, Self::Error> {
        match v {
            0 => Ok(Label::NonSarcastic),
            1 => Ok(Label::Sarcastic),
            other => Err(format!("label must be 0 or 1, got {other}")),
        }
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}

/// One corpus row. Immutable once read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub index: i64,
    pub label: Label,
    pub text: String,
}

pub fn load_corpus(path: &Path) -> Result<Vec<Record>> {
    let file = File::open(path)?;
    read_corpus(file)
}

/// Reads headerless `index,label,text` rows. Any bad row aborts the load.
pub fn read_corpus<R: Read>(input: R) -> Result<Vec<Record>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(input);

    let mut out = Vec::new();
    let mut raw = csv::StringRecord::new();
    loop {
        let line = reader.position().line();
        match reader.read_record(&mut raw) {
            Ok(true) => out.push(parse_row(&raw, line)?),
            Ok(false) => break,
            Err(e) => {
                let line = e.position().map(|p| p.line()).unwrap_or(line);
                return Err(match e.kind() {
                    csv::ErrorKind::Utf8 { .. } => FeatureError::MalformedRecord {
                        line,
                        reason: "text is not valid UTF-8".into(),
                    },
                    _ => FeatureError::Csv(e),
                });
            }
        }
    }
    Ok(out)
}

fn parse_row(row: &csv::StringRecord, line: u64) -> Result<Record> {
    let malformed = |reason: String| FeatureError::MalformedRecord { line, reason };
    if row.len() != 3 {
        return Err(malformed(format!("expected 3 columns, found {}", row.len())));
    }
    let index = row[0]
        .trim()
        .parse::<i64>()
        .map_err(|_| malformed(format!("non-numeric index `{}`", row[0].trim())))?;
    let label = row[1]
        .trim()
        .parse::<i64>()
        .map_err(|_| malformed(format!("non-numeric label `{}`", row[1].trim())))
        .and_then(|v| Label::try_from(v).map_err(malformed))?;
    Ok(Record {
        index,
        label,
        text: row[2].to_string(),
    })
}

/// Writes through a sibling temp file and renames, so a failed run leaves no partial file.
fn write_atomic<F>(path: &Path, fill: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<()>,
{
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    let tmp = tmp_path(path);
    let result = File::create(&tmp).map_err(FeatureError::from).and_then(|f| {
        let mut w = BufWriter::new(f);
        fill(&mut w)?;
        w.flush()?;
        Ok(())
    });
    match result {
        Ok(()) => Ok(fs::rename(&tmp, path)?),
        Err(e) => {
            let _ = fs::remove_file(&tmp);
            Err(e)
        }
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

pub fn write_matrix(path: &Path, matrix: &FeatureMatrix) -> Result<()> {
    write_atomic(path, |w| write_matrix_to(w, matrix))
}

/// Header line, then one row per record; label as an integer.
pub fn write_matrix_to<W: Write>(out: W, matrix: &FeatureMatrix) -> Result<()> {
    let mut w = csv::Writer::from_writer(out);
    w.write_record(header())?;
    for row in matrix.rows() {
        let mut fields = Vec::with_capacity(row.values().len() + 1);
        fields.push(row.label.to_string());
        fields.extend(row.values().iter().map(|v| v.to_string()));
        w.write_record(&fields)?;
    }
    w.flush()?;
    Ok(())
}

/// Per-record overlap with both mined term sets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverlapLine<'a> {
    pub index: i64,
    pub sarcastic: &'a BTreeMap<String, usize>,
    pub non_sarcastic: &'a BTreeMap<String, usize>,
}

/// JSON lines, one per record, in the order given.
pub fn write_overlaps<'a, I>(path: &Path, lines: I) -> Result<()>
where
    I: IntoIterator<Item = OverlapLine<'a>>,
{
    write_atomic(path, |w| {
        for line in lines {
            serde_json::to_writer(&mut *w, &line)?;
            w.write_all(b"\n")?;
        }
        Ok(())
    })
}

pub fn write_vocabulary(path: &Path, vocabulary: &VocabularyIndex) -> Result<()> {
    write_atomic(path, |w| {
        serde_json::to_writer_pretty(&mut *w, vocabulary)?;
        w.write_all(b"\n")?;
        Ok(())
    })
}
