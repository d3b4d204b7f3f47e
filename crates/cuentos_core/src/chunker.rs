use std::collections::VecDeque;

use crate::types::Document;
use crate::{Error, Result};

pub const DEFAULT_CHUNK_SIZE: usize = 1024;
pub const DEFAULT_CHUNK_OVERLAP: usize = 512;

/// Recursive character splitter. Separators are tried in order; a piece still
/// longer than `chunk_size` is split again with the next separator, and the
/// empty separator falls back to single characters.
#[derive(Debug, Clone)]
pub struct Chunker {
    chunk_size: usize,
    chunk_overlap: usize,
    separators: Vec<String>,
}

#[derive(Debug, Clone, Copy)]
struct Span {
    start: usize,
    end: usize,
    len: usize,
}

impl Chunker {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(Error::Config("chunk_size must be greater than zero".to_string()));
        }
        if chunk_overlap >= chunk_size {
            return Err(Error::Config(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                chunk_overlap, chunk_size
            )));
        }
        Ok(Self {
            chunk_size,
            chunk_overlap,
            separators: ["\n\n", "\n", " ", ""].iter().map(|s| s.to_string()).collect(),
        })
    }

    pub fn with_separators(mut self, separators: Vec<String>) -> Self {
        self.separators = separators;
        self
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }

    pub fn split(&self, text: &str) -> Vec<Document> {
        if text.is_empty() {
            return Vec::new();
        }
        let mut spans = Vec::new();
        self.split_spans(text, 0, &self.separators, &mut spans);
        self.merge(text, &spans)
    }

    fn split_spans(&self, piece: &str, base: usize, separators: &[String], out: &mut Vec<Span>) {
        let len = piece.chars().count();
        if len <= self.chunk_size {
            out.push(Span { start: base, end: base + piece.len(), len });
            return;
        }

        match separators.split_first() {
            Some((sep, rest)) if !sep.is_empty() => {
                if !piece.contains(sep.as_str()) {
                    self.split_spans(piece, base, rest, out);
                    return;
                }
                let mut offset = base;
                for part in piece.split_inclusive(sep.as_str()) {
                    self.split_spans(part, offset, rest, out);
                    offset += part.len();
                }
            }
            _ => {
                for (i, c) in piece.char_indices() {
                    out.push(Span {
                        start: base + i,
                        end: base + i + c.len_utf8(),
                        len: 1,
                    });
                }
            }
        }
    }

    fn merge(&self, text: &str, spans: &[Span]) -> Vec<Document> {
        let mut documents = Vec::new();
        let mut window: VecDeque<Span> = VecDeque::new();
        let mut total = 0;

        for span in spans {
            if total + span.len > self.chunk_size && !window.is_empty() {
                documents.push(Self::document(text, &window));
                while total > self.chunk_overlap
                    || (total > 0 && total + span.len > self.chunk_size)
                {
                    match window.pop_front() {
                        Some(front) => total -= front.len,
                        None => break,
                    }
                }
            }
            window.push_back(*span);
            total += span.len;
        }

        if !window.is_empty() {
            documents.push(Self::document(text, &window));
        }
        documents
    }

    fn document(text: &str, window: &VecDeque<Span>) -> Document {
        let start = window.front().map_or(0, |s| s.start);
        let end = window.back().map_or(start, |s| s.end);
        Document::new(&text[start..end], start)
    }
}

/// Rebuilds the source text from ordered chunks, dropping the overlapped regions.
pub fn reassemble(documents: &[Document]) -> String {
    let mut text = String::new();
    let mut covered = 0;
    for doc in documents {
        if doc.end() <= covered {
            continue;
        }
        let skip = covered.saturating_sub(doc.offset);
        text.push_str(&doc.content[skip..]);
        covered = doc.end();
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn long_text() -> String {
        (0..40)
            .map(|i| format!("Párrafo número {} sobre el bosque y sus árboles.", i))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    #[test]
    fn test_overlap_must_be_smaller_than_size() {
        assert!(Chunker::new(10, 10).is_err());
        assert!(Chunker::new(10, 20).is_err());
        assert!(Chunker::new(0, 0).is_err());
        assert!(Chunker::new(10, 9).is_ok());
    }

    #[test]
    fn test_empty_text_yields_no_chunks() {
        let chunker = Chunker::new(10, 2).unwrap();
        assert!(chunker.split("").is_empty());
    }

    #[test]
    fn test_short_text_is_single_chunk() {
        let chunker = Chunker::new(DEFAULT_CHUNK_SIZE, DEFAULT_CHUNK_OVERLAP).unwrap();
        let docs = chunker.split("Un río se contamina por basura plástica.");
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].offset, 0);
    }

    #[test]
    fn test_chunks_respect_size_and_reassemble() {
        let text = long_text();
        for (size, overlap) in [(120, 60), (64, 16), (300, 0), (50, 49)] {
            let chunker = Chunker::new(size, overlap).unwrap();
            let docs = chunker.split(&text);
            assert!(docs.len() > 1);
            for doc in &docs {
                assert!(doc.content.chars().count() <= size);
            }
            assert_eq!(reassemble(&docs), text, "size {} overlap {}", size, overlap);
        }
    }

    #[test]
    fn test_consecutive_chunks_share_bounded_overlap() {
        let text = long_text();
        let chunker = Chunker::new(120, 60).unwrap();
        let docs = chunker.split(&text);
        for pair in docs.windows(2) {
            assert!(pair[1].offset > pair[0].offset);
            assert!(pair[1].offset <= pair[0].end());
            let shared = &text[pair[1].offset..pair[0].end()];
            assert!(shared.chars().count() <= 60);
        }
    }

    #[test]
    fn test_text_without_separators_falls_back_to_characters() {
        let text = "ñ".repeat(95);
        let chunker = Chunker::new(20, 5).unwrap();
        let docs = chunker.split(&text);
        assert!(docs.iter().all(|d| d.content.chars().count() <= 20));
        assert_eq!(reassemble(&docs), text);
    }

    #[test]
    fn test_cleaned_text_splits_on_spaces() {
        let text = crate::text::clean(&long_text());
        let chunker = Chunker::new(100, 30).unwrap();
        let docs = chunker.split(&text);
        for doc in &docs[..docs.len() - 1] {
            assert!(doc.content.ends_with(' '));
        }
        assert_eq!(reassemble(&docs), text);
    }
}
