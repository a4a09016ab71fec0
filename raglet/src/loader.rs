//! Folder loading with per-extension parsers.
//!
//! [`FolderLoader`] walks a folder recursively and dispatches each file to
//! a [`FileParser`] registered for its extension. Files with no registered
//! parser are skipped; any read or parse failure is fatal for the whole
//! load and carries the offending path.

use std::collections::HashMap;
use std::fs;
use std::io::Read;
use std::path::Path;

use serde_json::{json, Value};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::document::Document;
use crate::error::{RagError, Result};

/// Metadata value recorded under `loaded_from` for every document.
const LOAD_ORIGIN: &str = "local_folder";

/// Parses one file into one or more [`Document`]s.
///
/// A parser may split a single file into several documents (one per CSV
/// row, for instance); the loader preserves whatever granularity the
/// parser chooses. Every produced document carries a `source` metadata
/// field with the file path.
pub trait FileParser: Send + Sync {
    /// Parse the file at `path`.
    fn parse(&self, path: &Path) -> Result<Vec<Document>>;
}

fn loader_error(path: &Path, message: impl std::fmt::Display) -> RagError {
    RagError::Loader { path: path.to_path_buf(), message: message.to_string() }
}

fn source_metadata(path: &Path) -> (String, Value) {
    ("source".to_string(), json!(path.display().to_string()))
}

/// Plain-text files (`.txt`, `.md`).
pub struct TextParser;

impl FileParser for TextParser {
    fn parse(&self, path: &Path) -> Result<Vec<Document>> {
        let content = fs::read_to_string(path).map_err(|e| loader_error(path, e))?;
        let mut document = Document::new(content);
        let (key, value) = source_metadata(path);
        document.metadata.insert(key, value);
        Ok(vec![document])
    }
}

/// PDF files, via text extraction of the full document.
pub struct PdfParser;

impl FileParser for PdfParser {
    fn parse(&self, path: &Path) -> Result<Vec<Document>> {
        let content = pdf_extract::extract_text(path).map_err(|e| loader_error(path, e))?;
        let mut document = Document::new(content);
        let (key, value) = source_metadata(path);
        document.metadata.insert(key, value);
        Ok(vec![document])
    }
}

/// CSV files, one document per record with `header: value` lines.
pub struct CsvParser;

impl FileParser for CsvParser {
    fn parse(&self, path: &Path) -> Result<Vec<Document>> {
        let mut reader = csv::Reader::from_path(path).map_err(|e| loader_error(path, e))?;
        let headers = reader.headers().map_err(|e| loader_error(path, e))?.clone();

        let mut documents = Vec::new();
        for (row, record) in reader.records().enumerate() {
            let record = record.map_err(|e| loader_error(path, e))?;
            let content = headers
                .iter()
                .zip(record.iter())
                .map(|(header, field)| format!("{header}: {field}"))
                .collect::<Vec<_>>()
                .join("\n");

            let mut document = Document::new(content);
            let (key, value) = source_metadata(path);
            document.metadata.insert(key, value);
            document.metadata.insert("row".to_string(), json!(row));
            documents.push(document);
        }

        Ok(documents)
    }
}

/// DOCX files: the main document part is unzipped and its XML reduced to
/// plain text, one line per paragraph.
pub struct DocxParser;

impl FileParser for DocxParser {
    fn parse(&self, path: &Path) -> Result<Vec<Document>> {
        let file = fs::File::open(path).map_err(|e| loader_error(path, e))?;
        let mut archive = zip::ZipArchive::new(file).map_err(|e| loader_error(path, e))?;
        let mut xml = String::new();
        archive
            .by_name("word/document.xml")
            .map_err(|e| loader_error(path, e))?
            .read_to_string(&mut xml)
            .map_err(|e| loader_error(path, e))?;

        let mut document = Document::new(docx_xml_to_text(&xml));
        let (key, value) = source_metadata(path);
        document.metadata.insert(key, value);
        Ok(vec![document])
    }
}

/// Strip WordprocessingML markup, keeping text runs and turning paragraph
/// closes into newlines.
fn docx_xml_to_text(xml: &str) -> String {
    let mut text = String::new();
    let mut rest = xml;

    while let Some(start) = rest.find('<') {
        text.push_str(&rest[..start]);
        let Some(close) = rest[start..].find('>') else {
            break;
        };
        let tag = &rest[start..start + close + 1];
        if tag == "</w:p>" {
            text.push('\n');
        }
        rest = &rest[start + close + 1..];
    }
    text.push_str(rest);

    decode_xml_entities(text.trim_end())
}

fn decode_xml_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// JSON files: validated, then re-rendered as pretty-printed text.
pub struct JsonParser;

impl FileParser for JsonParser {
    fn parse(&self, path: &Path) -> Result<Vec<Document>> {
        let raw = fs::read_to_string(path).map_err(|e| loader_error(path, e))?;
        let value: Value = serde_json::from_str(&raw).map_err(|e| loader_error(path, e))?;
        let content = serde_json::to_string_pretty(&value).map_err(|e| loader_error(path, e))?;

        let mut document = Document::new(content);
        let (key, value) = source_metadata(path);
        document.metadata.insert(key, value);
        Ok(vec![document])
    }
}

/// Loads every parseable file under a folder, recursively.
pub struct FolderLoader {
    parsers: HashMap<String, Box<dyn FileParser>>,
}

impl Default for FolderLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl FolderLoader {
    /// Create a loader with the default extension mapping:
    /// `txt`/`md` → text, `pdf` → PDF, `csv` → CSV, `docx` → DOCX,
    /// `json` → JSON.
    pub fn new() -> Self {
        let mut loader = Self { parsers: HashMap::new() };
        loader.register("txt", TextParser);
        loader.register("md", TextParser);
        loader.register("pdf", PdfParser);
        loader.register("csv", CsvParser);
        loader.register("docx", DocxParser);
        loader.register("json", JsonParser);
        loader
    }

    /// Register a parser for a file extension (without the leading dot),
    /// replacing any existing registration.
    pub fn register(&mut self, extension: &str, parser: impl FileParser + 'static) {
        self.parsers.insert(extension.to_ascii_lowercase(), Box::new(parser));
    }

    /// Load all documents under `folder`, recursively.
    ///
    /// Files whose extension has no registered parser are skipped. Every
    /// returned document's metadata gains `loaded_from` and `folder_path`
    /// fields on top of whatever its parser recorded.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Loader`] if the folder cannot be walked or any
    /// dispatched file fails to parse.
    pub fn load_documents(&self, folder: impl AsRef<Path>) -> Result<Vec<Document>> {
        let folder = folder.as_ref();
        if !folder.is_dir() {
            return Err(loader_error(folder, "not a directory"));
        }

        let mut documents = Vec::new();
        for entry in WalkDir::new(folder).sort_by_file_name() {
            let entry = entry.map_err(|e| loader_error(folder, e))?;
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            let extension = path
                .extension()
                .and_then(|ext| ext.to_str())
                .map(str::to_ascii_lowercase)
                .unwrap_or_default();

            match self.parsers.get(&extension) {
                Some(parser) => documents.extend(parser.parse(path)?),
                None => {
                    debug!(path = %path.display(), "no parser registered, skipping file");
                }
            }
        }

        let folder_path = folder.display().to_string();
        for document in &mut documents {
            document.metadata.insert("loaded_from".to_string(), json!(LOAD_ORIGIN));
            document.metadata.insert("folder_path".to_string(), json!(folder_path.clone()));
        }

        info!(document_count = documents.len(), folder = %folder_path, "loaded documents");
        Ok(documents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_registered_extensions_and_skips_others() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("nested")).unwrap();

        fs::write(root.join("a.txt"), "plain text").unwrap();
        fs::write(root.join("nested/b.md"), "# markdown").unwrap();
        fs::write(root.join("c.json"), r#"{"k": 1}"#).unwrap();
        fs::write(root.join("ignored.bin"), [0u8, 1, 2]).unwrap();

        let documents = FolderLoader::new().load_documents(root).unwrap();
        assert_eq!(documents.len(), 3);
    }

    #[test]
    fn merges_provenance_metadata_without_dropping_parser_keys() {
        let temp = tempfile::tempdir().unwrap();
        fs::write(temp.path().join("a.txt"), "content").unwrap();

        let documents = FolderLoader::new().load_documents(temp.path()).unwrap();
        let metadata = &documents[0].metadata;
        assert_eq!(metadata["loaded_from"], json!(LOAD_ORIGIN));
        assert_eq!(metadata["folder_path"], json!(temp.path().display().to_string()));
        assert!(documents[0].source().unwrap().ends_with("a.txt"));
    }

    #[test]
    fn csv_yields_one_document_per_row() {
        let temp = tempfile::tempdir().unwrap();
        fs::write(temp.path().join("t.csv"), "name,age\nada,36\ngrace,45\n").unwrap();

        let documents = FolderLoader::new().load_documents(temp.path()).unwrap();
        assert_eq!(documents.len(), 2);
        assert_eq!(documents[0].content, "name: ada\nage: 36");
        assert_eq!(documents[0].metadata["row"], json!(0));
        assert_eq!(documents[1].metadata["row"], json!(1));
    }

    #[test]
    fn missing_folder_is_an_error() {
        let err = FolderLoader::new().load_documents("/definitely/not/here").unwrap_err();
        assert!(matches!(err, RagError::Loader { .. }));
    }

    #[test]
    fn invalid_json_is_a_fatal_load_error() {
        let temp = tempfile::tempdir().unwrap();
        fs::write(temp.path().join("bad.json"), "{not json").unwrap();

        assert!(FolderLoader::new().load_documents(temp.path()).is_err());
    }

    #[test]
    fn docx_markup_reduces_to_paragraph_lines() {
        let xml = "<w:document><w:p><w:r><w:t>first</w:t></w:r></w:p>\
                   <w:p><w:r><w:t>second &amp; third</w:t></w:r></w:p></w:document>";
        assert_eq!(docx_xml_to_text(xml), "first\nsecond & third");
    }
}
