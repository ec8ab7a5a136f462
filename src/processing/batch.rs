use log::{error, info, warn};
use std::fs;
use std::path::{Path, PathBuf};
use std::thread;

use super::ocr::text_to_lines;
use crate::models::ExtractedIdentity;
use crate::passport_extractor::PassportExtractor;
use crate::utils::PassportError;

const MRZ_SUFFIX: &str = ".mrz.txt";
const PAGE_SUFFIX: &str = ".page.txt";

/// One document in a batch directory: `<name>.mrz.txt` plus an optional
/// `<name>.page.txt` holding the full-page OCR lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchDocument {
    pub name: String,
    pub mrz_path: PathBuf,
    pub page_path: Option<PathBuf>,
}

#[derive(Debug)]
pub struct BatchOutcome {
    pub name: String,
    pub result: Result<ExtractedIdentity, PassportError>,
}

/// Find every `*.mrz.txt` in `directory`, sorted by document name.
pub fn collect_documents<P: AsRef<Path>>(directory: P) -> Result<Vec<BatchDocument>, PassportError> {
    let dir = directory.as_ref();
    let mut documents = Vec::new();

    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let file_name = match path.file_name().and_then(|f| f.to_str()) {
            Some(name) => name,
            None => continue,
        };
        let name = match file_name.strip_suffix(MRZ_SUFFIX) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => continue,
        };

        let page_path = dir.join(format!("{}{}", name, PAGE_SUFFIX));
        let page_path = if page_path.is_file() {
            Some(page_path)
        } else {
            warn!("No page text for {}, authority and issue date will be missing", name);
            None
        };
        documents.push(BatchDocument {
            name,
            mrz_path: path,
            page_path,
        });
    }

    documents.sort_by(|a, b| a.name.cmp(&b.name));
    info!("Found {} documents in {}", documents.len(), dir.display());
    Ok(documents)
}

/// Process documents on up to `workers` threads. Each worker runs its own
/// extractor clone; only the country table is shared. Outcomes keep the
/// input order.
pub fn run_batch(
    extractor: &PassportExtractor,
    documents: &[BatchDocument],
    workers: usize,
) -> Vec<BatchOutcome> {
    if documents.is_empty() {
        return Vec::new();
    }
    let workers = workers.clamp(1, documents.len());
    let chunk_size = (documents.len() + workers - 1) / workers;

    thread::scope(|scope| {
        let handles: Vec<_> = documents
            .chunks(chunk_size)
            .map(|chunk| {
                let extractor = extractor.clone();
                scope.spawn(move || {
                    chunk
                        .iter()
                        .map(|document| process_document(&extractor, document))
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        handles
            .into_iter()
            .flat_map(|handle| match handle.join() {
                Ok(outcomes) => outcomes,
                Err(panic) => std::panic::resume_unwind(panic),
            })
            .collect()
    })
}

fn process_document(extractor: &PassportExtractor, document: &BatchDocument) -> BatchOutcome {
    let result = read_lines(&document.mrz_path).and_then(|mrz_lines| {
        let page_lines = match &document.page_path {
            Some(path) => read_lines(path)?,
            None => Vec::new(),
        };
        extractor.extract(&mrz_lines, &page_lines)
    });

    if let Err(e) = &result {
        error!("Failed to extract {}: {}", document.name, e);
    }
    BatchOutcome {
        name: document.name.clone(),
        result,
    }
}

fn read_lines(path: &Path) -> Result<Vec<String>, PassportError> {
    Ok(text_to_lines(&fs::read_to_string(path)?))
}
