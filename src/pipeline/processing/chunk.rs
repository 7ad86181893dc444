use serde::{Deserialize, Serialize};

use crate::config::ChunkingConfig;
use crate::pipeline::processing::document::{CourseDocument, DocumentMetadata};

/// Chunk metadata: the parent document's metadata plus chunk lineage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    #[serde(flatten)]
    pub document: DocumentMetadata,
    pub parent_id: String,
    /// 1-based position within the parent document
    pub chunk_index: usize,
    /// Total chunks produced for the parent document
    pub chunk_count: usize,
}

/// A fixed-size overlapping word-window slice of a canonical document, sized
/// for downstream embedding. Rebuilt from its parent on every run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub id: String,
    pub text: String,
    pub metadata: ChunkMetadata,
}

/// Word-based chunker, model-agnostic. Windows advance by
/// `max_words - overlap` (or `max_words` when the overlap is not smaller)
/// and emission stops once a window reaches the final word.
pub fn chunk_text_words(text: &str, max_words: usize, overlap: usize) -> Vec<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() {
        return vec![text.to_string()];
    }

    let max_words = max_words.max(1);
    let step = if max_words > overlap {
        max_words - overlap
    } else {
        max_words
    };

    let mut chunks = Vec::new();
    let mut start = 0;
    loop {
        let end = (start + max_words).min(words.len());
        chunks.push(words[start..end].join(" "));
        if end >= words.len() {
            break;
        }
        start += step;
    }
    chunks
}

/// Slices one document into its chunk records.
pub fn chunk_document(document: &CourseDocument, chunking: ChunkingConfig) -> Vec<Chunk> {
    let pieces = chunk_text_words(&document.text, chunking.max_words, chunking.overlap);
    let chunk_count = pieces.len();

    pieces
        .into_iter()
        .enumerate()
        .map(|(index, text)| Chunk {
            id: format!("{}::chunk-{}", document.id, index + 1),
            text,
            metadata: ChunkMetadata {
                document: document.metadata.clone(),
                parent_id: document.id.clone(),
                chunk_index: index + 1,
                chunk_count,
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::processing::document::{CourseDocument, DocumentMetadata};

    fn words(n: usize) -> String {
        (0..n).map(|i| format!("w{}", i)).collect::<Vec<_>>().join(" ")
    }

    fn document(text: &str) -> CourseDocument {
        CourseDocument {
            id: "cs-211-programming-practicum::abcdef123456".to_string(),
            text: text.to_string(),
            metadata: DocumentMetadata {
                course_code: "CS 211".to_string(),
                class_name: "Programming Practicum".to_string(),
                subject: String::new(),
                subject_code: "CS".to_string(),
                credits_raw: "2".to_string(),
                credits_min: Some(2.0),
                credits_max: Some(2.0),
                prereq_codes: Vec::new(),
                coreq_codes: Vec::new(),
                source_url: String::new(),
            },
        }
    }

    #[test]
    fn test_text_of_exactly_max_words_is_one_chunk() {
        let text = words(500);
        let chunks = chunk_text_words(&text, 500, 80);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0], text);
    }

    #[test]
    fn test_two_windows_overlap_by_exactly_overlap_words() {
        let text = words(2 * 500 - 80);
        let chunks = chunk_text_words(&text, 500, 80);
        assert_eq!(chunks.len(), 2);

        let first: Vec<&str> = chunks[0].split_whitespace().collect();
        let second: Vec<&str> = chunks[1].split_whitespace().collect();
        assert_eq!(first.len(), 500);
        assert_eq!(second.len(), 500);
        assert_eq!(&first[420..], &second[..80]);
    }

    #[test]
    fn test_short_text_is_a_single_chunk() {
        let chunks = chunk_text_words("just a few words", 500, 80);
        assert_eq!(chunks, vec!["just a few words"]);
    }

    #[test]
    fn test_empty_text_still_emits_one_chunk() {
        let chunks = chunk_text_words("", 500, 80);
        assert_eq!(chunks, vec![""]);
    }

    #[test]
    fn test_overlap_not_smaller_than_window_floors_stride_to_window() {
        let text = words(10);
        let chunks = chunk_text_words(&text, 4, 4);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0], "w0 w1 w2 w3");
        assert_eq!(chunks[1], "w4 w5 w6 w7");
        assert_eq!(chunks[2], "w8 w9");
    }

    #[test]
    fn test_rechunking_is_deterministic() {
        let text = words(1234);
        assert_eq!(
            chunk_text_words(&text, 500, 80),
            chunk_text_words(&text, 500, 80)
        );
    }

    #[test]
    fn test_chunk_ids_and_counts() {
        let doc = document(&words(920));
        let chunks = chunk_document(&doc, ChunkingConfig { max_words: 500, overlap: 80 });
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].id, format!("{}::chunk-1", doc.id));
        assert_eq!(chunks[1].id, format!("{}::chunk-2", doc.id));
        for chunk in &chunks {
            assert_eq!(chunk.metadata.parent_id, doc.id);
            assert_eq!(chunk.metadata.chunk_count, 2);
            assert_eq!(chunk.metadata.document.course_code, "CS 211");
        }
        assert_eq!(chunks[0].metadata.chunk_index, 1);
        assert_eq!(chunks[1].metadata.chunk_index, 2);
    }
}
