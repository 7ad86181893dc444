use anyhow::Result;
use tempfile::tempdir;

use catalog_scraper::config::ChunkingConfig;
use catalog_scraper::export::export_all;
use catalog_scraper::ingestion::{read_entries_jsonl, write_entries_jsonl};
use catalog_scraper::pipeline::process_entries;
use catalog_scraper::types::RawEntry;

fn entry(title: &str, description: &str, url: &str, block_index: usize) -> RawEntry {
    RawEntry {
        title: title.to_string(),
        description: description.to_string(),
        section_title: "Computer Science (CS)".to_string(),
        source_url: url.to_string(),
        block_index,
    }
}

fn sample_entries() -> Vec<RawEntry> {
    vec![
        entry(
            "CS 211. Programming Practicum. 2 hours.",
            "Software development tools and practices. Prerequisite(s): CS 141; \
             and credit or concurrent registration in MATH 215.",
            "https://catalog.example.edu/cs/",
            0,
        ),
        // Cross-listed duplicate with a shorter description
        entry(
            "CS 211. Programming Practicum. 2 hours.",
            "Software tools.",
            "https://catalog.example.edu/cs-cross/",
            4,
        ),
        entry(
            "MATH 220. Calculus. 3 or 4 hours.",
            "Limits, derivatives, integrals.",
            "https://catalog.example.edu/math/",
            1,
        ),
        // Malformed title: kept with best-effort name
        entry(
            "Departmental Honors Seminar",
            "Open to invited students.",
            "https://catalog.example.edu/hon/",
            2,
        ),
        // Entirely empty block: dropped
        entry("", "", "https://catalog.example.edu/hon/", 3),
    ]
}

#[test]
fn test_full_pipeline_produces_documents_and_chunks() -> Result<()> {
    let output = process_entries(&sample_entries(), ChunkingConfig::default());

    assert_eq!(output.total_entries, 5);
    // CS 211 deduplicated, empty entry dropped
    assert_eq!(output.unique_records, 3);
    assert_eq!(output.documents.len(), 3);
    // One failure for the malformed honors title; the empty entry records
    // both its title failure and the drop
    assert_eq!(output.failures.len(), 3);

    let practicum = output
        .documents
        .iter()
        .find(|d| d.metadata.course_code == "CS 211")
        .expect("CS 211 document");
    // The longer description won the dedup
    assert!(practicum.text.contains("Software development tools and practices."));
    assert_eq!(practicum.metadata.source_url, "https://catalog.example.edu/cs/");
    // Cross-reference codes landed in both sets
    assert_eq!(practicum.metadata.prereq_codes, vec!["MATH 215"]);
    assert_eq!(practicum.metadata.coreq_codes, vec!["MATH 215"]);
    // And the phrase no longer sits in the visible description block
    // (the prerequisites/corequisites blocks keep it as their own content)
    let description_block = practicum
        .text
        .split("\n\n")
        .find(|block| block.starts_with("Description:"))
        .expect("description block");
    assert!(!description_block.to_lowercase().contains("concurrent registration"));
    assert!(practicum
        .text
        .contains("Corequisites:\nCredit or concurrent registration in MATH 215."));

    let calculus = output
        .documents
        .iter()
        .find(|d| d.metadata.course_code == "MATH 220")
        .expect("MATH 220 document");
    assert_eq!(calculus.metadata.credits_min, Some(3.0));
    assert_eq!(calculus.metadata.credits_max, Some(4.0));
    assert_eq!(calculus.metadata.subject_code, "MATH");

    // Short documents chunk 1:1
    assert_eq!(output.chunks.len(), 3);
    for chunk in &output.chunks {
        assert!(chunk.id.ends_with("::chunk-1"));
        assert_eq!(chunk.metadata.chunk_count, 1);
    }

    Ok(())
}

#[test]
fn test_pipeline_is_deterministic_across_runs() -> Result<()> {
    let entries = sample_entries();
    let first = process_entries(&entries, ChunkingConfig::default());
    let second = process_entries(&entries, ChunkingConfig::default());

    assert_eq!(first.documents, second.documents);
    assert_eq!(first.chunks, second.chunks);
    Ok(())
}

#[test]
fn test_raw_entry_replay_and_export_round_trip() -> Result<()> {
    let temp_dir = tempdir()?;
    let raw_path = temp_dir.path().join("raw_entries.jsonl");
    let export_dir = temp_dir.path().join("rag_export");

    write_entries_jsonl(&raw_path, &sample_entries())?;
    let replayed = read_entries_jsonl(&raw_path)?;
    assert_eq!(replayed.len(), 5);

    let output = process_entries(&replayed, ChunkingConfig::default());
    let paths = export_all(&export_dir, &output.documents, &output.chunks)?;

    let docs_jsonl = std::fs::read_to_string(&paths.docs_jsonl)?;
    assert_eq!(docs_jsonl.lines().count(), 3);
    for line in docs_jsonl.lines() {
        let doc: serde_json::Value = serde_json::from_str(line)?;
        assert!(doc["id"].as_str().unwrap().contains("::"));
        assert!(doc["metadata"].get("course_code").is_some());
    }

    let chunks_jsonl = std::fs::read_to_string(&paths.chunks_jsonl)?;
    for line in chunks_jsonl.lines() {
        let chunk: serde_json::Value = serde_json::from_str(line)?;
        // Chunk ids derive from their parent's id
        let parent_id = chunk["metadata"]["parent_id"].as_str().unwrap();
        assert!(chunk["id"].as_str().unwrap().starts_with(parent_id));
    }

    assert!(paths.docs_csv.exists());
    assert!(paths.chunks_csv.exists());
    Ok(())
}
