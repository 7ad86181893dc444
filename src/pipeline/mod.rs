// Data processing pipeline: normalize, deduplicate, assemble, chunk

pub mod processing;

use tracing::info;

use crate::config::ChunkingConfig;
use crate::types::RawEntry;
use processing::chunk::{chunk_document, Chunk};
use processing::conflation::dedupe_records;
use processing::document::{assemble_document, CourseDocument};
use processing::normalize::{normalize_batch, ParseFailure};

/// Everything one processing run produces, failures included. Failures ride
/// alongside the results; nothing here aborts the batch.
#[derive(Debug)]
pub struct PipelineOutput {
    pub total_entries: usize,
    pub unique_records: usize,
    pub documents: Vec<CourseDocument>,
    pub chunks: Vec<Chunk>,
    pub failures: Vec<ParseFailure>,
}

/// Runs raw entries through normalization, deduplication, document assembly,
/// and chunking.
///
/// Normalization is per-entry and order-independent; deduplication is the one
/// barrier that needs the full record set. Given the same entries this
/// produces the same documents and chunks.
pub fn process_entries(entries: &[RawEntry], chunking: ChunkingConfig) -> PipelineOutput {
    let (records, failures) = normalize_batch(entries);
    info!(
        "normalized {} of {} entries ({} failures)",
        records.len(),
        entries.len(),
        failures.len()
    );

    let unique = dedupe_records(records);
    info!("{} unique courses after deduplication", unique.len());

    let documents: Vec<CourseDocument> = unique.iter().map(assemble_document).collect();
    let chunks: Vec<Chunk> = documents
        .iter()
        .flat_map(|document| chunk_document(document, chunking))
        .collect();
    info!(
        "assembled {} documents into {} chunks",
        documents.len(),
        chunks.len()
    );

    PipelineOutput {
        total_entries: entries.len(),
        unique_records: unique.len(),
        documents,
        chunks,
        failures,
    }
}
