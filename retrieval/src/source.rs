//! Corpus sources: where raw records come from, and how a record becomes a
//! [`Document`].

use crate::document::Document;
use crate::error::{Result, RetrievalError};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub type Record = Map<String, Value>;

pub trait CorpusSource: Send + Sync {
    /// Human-readable origin used in logs and load errors.
    fn describe(&self) -> String;
    fn records(&self) -> Result<Vec<Record>>;
}

/// One JSON object per line; blank lines are skipped.
pub struct JsonlFile(pub PathBuf);

/// A JSON array of objects, or a single object.
pub struct JsonFile(pub PathBuf);

/// Every `.json`/`.jsonl` file under a directory, in sorted path order.
pub struct Directory(pub PathBuf);

pub struct InMemory(pub Vec<Record>);

/// Pick a source for `path`: directories are walked, `.jsonl` is read line
/// by line, anything else is parsed as a JSON document.
pub fn open_source(path: impl AsRef<Path>) -> Box<dyn CorpusSource> {
    let path = path.as_ref().to_path_buf();
    if path.is_dir() {
        Box::new(Directory(path))
    } else if has_extension(&path, "jsonl") {
        Box::new(JsonlFile(path))
    } else {
        Box::new(JsonFile(path))
    }
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension().and_then(|s| s.to_str()) == Some(ext)
}

impl CorpusSource for JsonlFile {
    fn describe(&self) -> String {
        self.0.display().to_string()
    }

    fn records(&self) -> Result<Vec<Record>> {
        let origin = self.describe();
        let f = File::open(&self.0).map_err(|e| RetrievalError::corpus_load(&origin, e))?;
        let mut records = Vec::new();
        for (lineno, line) in BufReader::new(f).lines().enumerate() {
            let line = line.map_err(|e| RetrievalError::corpus_load(&origin, e))?;
            if line.trim().is_empty() { continue; }
            let value: Value = serde_json::from_str(&line)
                .map_err(|e| RetrievalError::corpus_load(&origin, format!("line {}: {e}", lineno + 1)))?;
            records.push(into_record(&origin, value)?);
        }
        Ok(records)
    }
}

impl CorpusSource for JsonFile {
    fn describe(&self) -> String {
        self.0.display().to_string()
    }

    fn records(&self) -> Result<Vec<Record>> {
        let origin = self.describe();
        let f = File::open(&self.0).map_err(|e| RetrievalError::corpus_load(&origin, e))?;
        let json: Value = serde_json::from_reader(BufReader::new(f))
            .map_err(|e| RetrievalError::corpus_load(&origin, e))?;
        match json {
            Value::Array(arr) => arr.into_iter().map(|v| into_record(&origin, v)).collect(),
            other => Ok(vec![into_record(&origin, other)?]),
        }
    }
}

impl CorpusSource for Directory {
    fn describe(&self) -> String {
        self.0.display().to_string()
    }

    fn records(&self) -> Result<Vec<Record>> {
        let origin = self.describe();
        if !self.0.is_dir() {
            return Err(RetrievalError::corpus_load(origin, "not a directory"));
        }
        let mut files: Vec<PathBuf> = Vec::new();
        for entry in WalkDir::new(&self.0).sort_by_file_name() {
            let entry = entry.map_err(|e| RetrievalError::corpus_load(&origin, e))?;
            let p = entry.path();
            if p.is_file() && (has_extension(p, "json") || has_extension(p, "jsonl")) {
                files.push(p.to_path_buf());
            }
        }
        let mut records = Vec::new();
        for file in files {
            if has_extension(&file, "jsonl") {
                records.extend(JsonlFile(file).records()?);
            } else {
                records.extend(JsonFile(file).records()?);
            }
        }
        Ok(records)
    }
}

impl CorpusSource for InMemory {
    fn describe(&self) -> String {
        format!("<memory: {} records>", self.0.len())
    }

    fn records(&self) -> Result<Vec<Record>> {
        Ok(self.0.clone())
    }
}

fn into_record(origin: &str, value: Value) -> Result<Record> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(RetrievalError::corpus_load(origin, format!("expected a JSON object, found {}", kind(&other)))),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// How raw records map onto documents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RecordSchema {
    /// Text comes from one field; the id from `id_field` when present,
    /// otherwise the record's position.
    Text { text_field: String, id_field: Option<String> },
    /// Gala invitee records: `name`, `relation`, `description`, `email`.
    #[default]
    Guest,
}

const GUEST_FIELDS: [(&str, &str); 4] = [
    ("name", "Name"),
    ("relation", "Relation"),
    ("description", "Description"),
    ("email", "Email"),
];

impl RecordSchema {
    pub fn text(field: impl Into<String>) -> Self {
        RecordSchema::Text { text_field: field.into(), id_field: None }
    }

    /// Parse `guest` or `text:<field>[:<id_field>]`.
    pub fn from_name(name: &str) -> Result<Self> {
        let mut parts = name.trim().splitn(3, ':');
        match (parts.next(), parts.next(), parts.next()) {
            (Some("guest"), None, None) => Ok(RecordSchema::Guest),
            (Some("text"), Some(field), id) if !field.is_empty() => Ok(RecordSchema::Text {
                text_field: field.to_string(),
                id_field: id.filter(|s| !s.is_empty()).map(str::to_string),
            }),
            _ => Err(RetrievalError::InvalidArgument(format!(
                "unknown record schema {name:?}, expected \"guest\" or \"text:<field>[:<id_field>]\""
            ))),
        }
    }

    pub(crate) fn to_document(&self, position: usize, mut record: Record) -> std::result::Result<Document, String> {
        match self {
            RecordSchema::Text { text_field, id_field } => {
                let text = match record.remove(text_field) {
                    Some(Value::String(s)) => s,
                    Some(other) => return Err(format!("field {text_field:?} must be a string, found {}", kind(&other))),
                    None => return Err(format!("missing text field {text_field:?}")),
                };
                let id = id_field
                    .as_ref()
                    .and_then(|f| record.remove(f))
                    .and_then(scalar_to_string)
                    .unwrap_or_else(|| position.to_string());
                Ok(Document { id, text, metadata: metadata_of(record) })
            }
            RecordSchema::Guest => {
                let mut values = Vec::with_capacity(GUEST_FIELDS.len());
                for (field, _) in GUEST_FIELDS {
                    match record.remove(field) {
                        None | Some(Value::Null) => return Err(format!("missing guest field {field:?}")),
                        Some(v @ (Value::Array(_) | Value::Object(_))) => {
                            return Err(format!("guest field {field:?} must be a scalar, found {}", kind(&v)))
                        }
                        Some(v) => values.extend(scalar_to_string(v)),
                    }
                }
                let text = GUEST_FIELDS
                    .iter()
                    .zip(&values)
                    .map(|((_, label), v)| format!("{label}: {v}"))
                    .collect::<Vec<_>>()
                    .join("\n");
                let mut metadata = metadata_of(record);
                metadata.insert("relation".into(), values[1].clone());
                metadata.insert("email".into(), values[3].clone());
                Ok(Document { id: values[0].clone(), text, metadata })
            }
        }
    }
}

fn scalar_to_string(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}

fn metadata_of(record: Record) -> BTreeMap<String, String> {
    record.into_iter().filter_map(|(k, v)| scalar_to_string(v).map(|v| (k, v))).collect()
}
