use crate::error::{Error, Result};
use crate::source::{ItemSource, ItemStream};
use std::collections::{HashSet, VecDeque};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

pub const DEFAULT_CAST_COLUMN: &str = "cast";

/// Names that show up in the cast column but are not actors.
pub const DEFAULT_BLOCKED_NAMES: [&str; 5] = ["champion", "trigger", "narrator", "ph.d.", "phd"];

const FIELD_SEPARATOR: char = ',';
const NAME_SEPARATOR: char = ',';

/// A simple comma-separated reader that reads records one by one.
///
/// Quoted fields may contain separators, doubled quotes and line breaks.
/// Blank lines are skipped.
pub struct RecordReader<R: BufRead> {
    reader: R,
    line: String,
    line_no: u64,
    record_start: u64,
    finished: bool,
}

impl<R: BufRead> RecordReader<R> {
    pub fn new(reader: R) -> Self {
        RecordReader {
            reader,
            line: String::new(),
            line_no: 0,
            record_start: 0,
            finished: false,
        }
    }

    /// Line on which the most recently read record started (1-based).
    pub fn line(&self) -> u64 {
        self.record_start
    }

    /// Reads the next record.
    ///
    /// Returns `Ok(None)` at EOF. A quoted field left open at EOF yields
    /// [`Error::MalformedRecord`]; the reader is finished afterwards.
    pub fn next_record(&mut self) -> Result<Option<Vec<String>>> {
        loop {
            if self.finished {
                return Ok(None);
            }

            self.line.clear();
            self.record_start = self.line_no + 1;

            // Keep reading while a quoted field is open; its newlines belong
            // to the field.
            let fields = loop {
                let eof = self.reader.read_line(&mut self.line)? == 0;
                if eof {
                    self.finished = true;
                } else {
                    self.line_no += 1;
                }

                let fields = split_record(self.line.trim_end_matches(['\r', '\n']));
                if eof || fields.is_some() {
                    break fields;
                }
            };

            if self.line.trim_end_matches(['\r', '\n']).is_empty() {
                continue;
            }

            return fields.map(Some).ok_or_else(|| Error::MalformedRecord {
                line: self.record_start,
                reason: "unterminated quoted field".to_string(),
            });
        }
    }
}

enum FieldState {
    Start,
    Unquoted,
    Quoted,
    QuoteInQuoted,
}

/// Splits one raw record into fields. Returns `None` if a quote is left open.
///
/// A `"` opens a quoted field only as the first character of a field; inside
/// one, `""` is a literal quote. Anywhere else `"` is kept as is, and text
/// after a closing quote is appended to the field.
pub fn split_record(raw: &str) -> Option<Vec<String>> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut state = FieldState::Start;

    for c in raw.chars() {
        state = match (state, c) {
            (FieldState::Quoted, '"') => FieldState::QuoteInQuoted,
            (FieldState::Quoted, c) => {
                field.push(c);
                FieldState::Quoted
            }
            (FieldState::QuoteInQuoted, '"') => {
                field.push('"');
                FieldState::Quoted
            }
            (FieldState::Start, '"') => FieldState::Quoted,
            (_, FIELD_SEPARATOR) => {
                fields.push(std::mem::take(&mut field));
                FieldState::Start
            }
            (_, c) => {
                field.push(c);
                FieldState::Unquoted
            }
        };
    }

    if matches!(state, FieldState::Quoted) {
        return None;
    }
    fields.push(field);
    Some(fields)
}

/// Decides which raw cast entries count as actor names.
///
/// A name is kept when, after trimming, it is non-empty, not purely numeric,
/// at least two characters long and not blocked. Blocking ignores case.
#[derive(Debug, Clone)]
pub struct NameFilter {
    blocked: HashSet<String>,
}

impl Default for NameFilter {
    fn default() -> Self {
        NameFilter::new(DEFAULT_BLOCKED_NAMES)
    }
}

impl NameFilter {
    pub fn new<I, T>(blocked: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        NameFilter {
            blocked: blocked
                .into_iter()
                .map(|name| name.as_ref().trim().to_lowercase())
                .collect(),
        }
    }

    pub fn block(&mut self, name: &str) {
        self.blocked.insert(name.trim().to_lowercase());
    }

    pub fn clean<'n>(&self, raw: &'n str) -> Option<&'n str> {
        let name = raw.trim();
        if name.is_empty()
            || name.chars().all(char::is_numeric)
            || name.chars().count() < 2
            || self.blocked.contains(&name.to_lowercase())
        {
            return None;
        }
        Some(name)
    }
}

/// An iterator over the cleaned actor names of a delimited file, one per
/// occurrence, in file order.
///
/// Records too short to reach the cast column, or with a quoted field left
/// open, are skipped and tallied. An I/O error is yielded once and ends the stream.
pub struct CastStream<'a, R: BufRead> {
    records: RecordReader<R>,
    column: usize,
    filter: &'a NameFilter,
    pending: VecDeque<String>,
    malformed: u64,
    tally: Option<&'a AtomicU64>,
    done: bool,
}

impl<'a, R: BufRead> CastStream<'a, R> {
    /// Reads the header and locates `column`.
    pub fn new(reader: R, column: &str, filter: &'a NameFilter) -> Result<Self> {
        let mut records = RecordReader::new(reader);
        let header = records
            .next_record()?
            .ok_or_else(|| Error::MissingColumn(column.to_string()))?;

        let index = header
            .iter()
            .position(|name| name.trim_start_matches('\u{feff}').trim() == column)
            .ok_or_else(|| Error::MissingColumn(column.to_string()))?;

        Ok(CastStream {
            records,
            column: index,
            filter,
            pending: VecDeque::new(),
            malformed: 0,
            tally: None,
            done: false,
        })
    }

    /// Number of records skipped so far.
    pub fn malformed(&self) -> u64 {
        self.malformed
    }

    fn report_to(mut self, tally: &'a AtomicU64) -> Self {
        self.tally = Some(tally);
        self
    }

    fn finish(&mut self) {
        self.done = true;
        if let Some(tally) = self.tally {
            tally.fetch_max(self.malformed, Ordering::Relaxed);
        }
    }
}

impl<'a, R: BufRead> Iterator for CastStream<'a, R> {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(name) = self.pending.pop_front() {
                return Some(Ok(name));
            }
            if self.done {
                return None;
            }

            match self.records.next_record() {
                Ok(Some(fields)) if fields.len() > self.column => {
                    self.pending.extend(
                        fields[self.column]
                            .split(NAME_SEPARATOR)
                            .filter_map(|raw| self.filter.clean(raw))
                            .map(str::to_owned),
                    );
                }
                Ok(Some(_)) | Err(Error::MalformedRecord { .. }) => self.malformed += 1,
                Ok(None) => self.finish(),
                Err(e) => {
                    self.finish();
                    return Some(Err(e));
                }
            }
        }
    }
}

/// A cast file on disk, replayable as an [`ItemSource`].
pub struct CastDataset {
    path: PathBuf,
    column: String,
    filter: NameFilter,
    malformed: AtomicU64,
}

impl CastDataset {
    /// Fails with [`Error::SourceNotFound`] if `path` is not a file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(Error::SourceNotFound(path.to_path_buf()));
        }

        Ok(CastDataset {
            path: path.to_path_buf(),
            column: DEFAULT_CAST_COLUMN.to_string(),
            filter: NameFilter::default(),
            malformed: AtomicU64::new(0),
        })
    }

    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = column.into();
        self
    }

    pub fn with_filter(mut self, filter: NameFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Malformed records skipped by the most complete pass so far.
    pub fn malformed_records(&self) -> u64 {
        self.malformed.load(Ordering::Relaxed)
    }

    /// Opens a fresh pass over the file.
    pub fn stream(&self) -> Result<CastStream<'_, BufReader<File>>> {
        let file = File::open(&self.path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => Error::SourceNotFound(self.path.clone()),
            _ => Error::Io(e),
        })?;

        let stream = CastStream::new(BufReader::new(file), &self.column, &self.filter)?;
        Ok(stream.report_to(&self.malformed))
    }
}

impl ItemSource for CastDataset {
    fn items(&self) -> Result<ItemStream<'_>> {
        Ok(Box::new(self.stream()?))
    }
}
