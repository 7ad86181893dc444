// RAG export: documents and chunks as newline-delimited JSON plus an
// equivalent CSV rendering with flattened metadata columns. Field names are
// stable; downstream retrieval keys on `metadata.parent_id` and
// `metadata.course_code`.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::error::Result;
use crate::pipeline::processing::chunk::Chunk;
use crate::pipeline::processing::document::{CourseDocument, DocumentMetadata};

/// Where one export run landed on disk.
#[derive(Debug, Clone)]
pub struct ExportPaths {
    pub docs_jsonl: PathBuf,
    pub chunks_jsonl: PathBuf,
    pub docs_csv: PathBuf,
    pub chunks_csv: PathBuf,
}

/// Writes all four export files into `output_dir`.
pub fn export_all(
    output_dir: &Path,
    documents: &[CourseDocument],
    chunks: &[Chunk],
) -> Result<ExportPaths> {
    fs::create_dir_all(output_dir)?;

    let paths = ExportPaths {
        docs_jsonl: output_dir.join("rag_docs.jsonl"),
        chunks_jsonl: output_dir.join("rag_chunks.jsonl"),
        docs_csv: output_dir.join("rag_docs.csv"),
        chunks_csv: output_dir.join("rag_chunks.csv"),
    };

    write_jsonl(&paths.docs_jsonl, documents)?;
    write_jsonl(&paths.chunks_jsonl, chunks)?;
    write_docs_csv(&paths.docs_csv, documents)?;
    write_chunks_csv(&paths.chunks_csv, chunks)?;

    info!(
        "exported {} documents and {} chunks to {}",
        documents.len(),
        chunks.len(),
        output_dir.display()
    );
    Ok(paths)
}

fn write_jsonl<T: Serialize>(path: &Path, records: &[T]) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    for record in records {
        serde_json::to_writer(&mut writer, record)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

const METADATA_COLUMNS: [&str; 10] = [
    "metadata.course_code",
    "metadata.class_name",
    "metadata.subject",
    "metadata.subject_code",
    "metadata.credits_raw",
    "metadata.credits_min",
    "metadata.credits_max",
    "metadata.prereq_codes",
    "metadata.coreq_codes",
    "metadata.source_url",
];

fn optional_number(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn metadata_cells(metadata: &DocumentMetadata) -> Result<Vec<String>> {
    Ok(vec![
        metadata.course_code.clone(),
        metadata.class_name.clone(),
        metadata.subject.clone(),
        metadata.subject_code.clone(),
        metadata.credits_raw.clone(),
        optional_number(metadata.credits_min),
        optional_number(metadata.credits_max),
        // Lists are JSON-encoded in their cell to keep the column set flat
        serde_json::to_string(&metadata.prereq_codes)?,
        serde_json::to_string(&metadata.coreq_codes)?,
        metadata.source_url.clone(),
    ])
}

fn write_docs_csv(path: &Path, documents: &[CourseDocument]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;

    let mut header = vec!["id", "text"];
    header.extend(METADATA_COLUMNS);
    writer.write_record(&header)?;

    for document in documents {
        let mut row = vec![document.id.clone(), document.text.clone()];
        row.extend(metadata_cells(&document.metadata)?);
        writer.write_record(&row)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_chunks_csv(path: &Path, chunks: &[Chunk]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;

    let mut header = vec!["id", "text"];
    header.extend(METADATA_COLUMNS);
    header.extend([
        "metadata.parent_id",
        "metadata.chunk_index",
        "metadata.chunk_count",
    ]);
    writer.write_record(&header)?;

    for chunk in chunks {
        let mut row = vec![chunk.id.clone(), chunk.text.clone()];
        row.extend(metadata_cells(&chunk.metadata.document)?);
        row.push(chunk.metadata.parent_id.clone());
        row.push(chunk.metadata.chunk_index.to_string());
        row.push(chunk.metadata.chunk_count.to_string());
        writer.write_record(&row)?;
    }
    writer.flush()?;
    Ok(())
}
