//! Character-bounded text splitting with a fixed overlap
//!
//! Lengths are counted in characters. A text that fits in one segment is returned
//! unchanged. Longer texts are cut into pieces of at most `chunk_size - overlap`
//! characters by [`text_splitter`], which prefers word boundaries, and every segment
//! after the first is prefixed with the `overlap` characters preceding its piece.
//! A whitespace-delimited token longer than `chunk_size` is the one exception: it is
//! emitted whole as its own segment, without a prefix.

use crate::error::{IndexError, Result};
use std::ops::Range;
use supply_core::{EnrichedDocument, IndexConfig, TextSegment};
use text_splitter::{ChunkConfig, TextSplitter as ChunkSplitter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextSplitter {
    chunk_size: usize,
    overlap: usize,
}

/// Byte range of the text that one segment covers beyond its overlap prefix
#[derive(Debug)]
struct Piece {
    range: Range<usize>,
    oversized: bool,
}

impl TextSplitter {
    pub fn new(chunk_size: usize, overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(IndexError::Config("chunk_size must be greater than 0".to_string()));
        }
        if overlap >= chunk_size {
            return Err(IndexError::Config(format!(
                "overlap ({overlap}) must be smaller than chunk_size ({chunk_size})"
            )));
        }
        Ok(Self {
            chunk_size,
            overlap,
        })
    }

    pub fn from_config(config: &IndexConfig) -> Result<Self> {
        Self::new(config.chunk_size, config.chunk_overlap)
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn overlap(&self) -> usize {
        self.overlap
    }

    /// Split `text` into segments
    pub fn split(&self, text: &str) -> Vec<String> {
        if text.chars().count() <= self.chunk_size {
            return vec![text.to_string()];
        }

        self.pieces(text)
            .iter()
            .enumerate()
            .map(|(i, piece)| {
                let start = if i == 0 || piece.oversized {
                    piece.range.start
                } else {
                    chars_back(text, piece.range.start, self.overlap)
                };
                text[start..piece.range.end].to_string()
            })
            .collect()
    }

    /// Split a document, copying its metadata onto every segment
    pub fn split_document(&self, document: &EnrichedDocument) -> Vec<TextSegment> {
        self.split(&document.description)
            .into_iter()
            .enumerate()
            .map(|(chunk_index, content)| {
                let mut metadata = document.metadata.clone();
                metadata.chunk_index = chunk_index;
                TextSegment { content, metadata }
            })
            .collect()
    }

    /// Contiguous pieces tiling `text`
    fn pieces(&self, text: &str) -> Vec<Piece> {
        let chunker =
            ChunkSplitter::new(ChunkConfig::new(self.chunk_size - self.overlap).with_trim(false));
        let mut pieces = Vec::new();
        let mut cursor = 0;

        let push_region = |pieces: &mut Vec<Piece>, cursor: &mut usize, end: usize| {
            let region_start = *cursor;
            for (offset, chunk) in chunker.chunk_indices(&text[region_start..end]) {
                let chunk_end = region_start + offset + chunk.len();
                if chunk_end > *cursor {
                    pieces.push(Piece {
                        range: *cursor..chunk_end,
                        oversized: false,
                    });
                    *cursor = chunk_end;
                }
            }
            if *cursor < end {
                pieces.push(Piece {
                    range: *cursor..end,
                    oversized: false,
                });
                *cursor = end;
            }
        };

        for token in oversized_tokens(text, self.chunk_size) {
            push_region(&mut pieces, &mut cursor, token.start);
            cursor = token.end;
            pieces.push(Piece {
                range: token,
                oversized: true,
            });
        }
        push_region(&mut pieces, &mut cursor, text.len());

        pieces
    }
}

impl Default for TextSplitter {
    fn default() -> Self {
        Self {
            chunk_size: 500,
            overlap: 50,
        }
    }
}

/// Byte offset `count` characters before `at`, stopping at the start of `text`
fn chars_back(text: &str, at: usize, count: usize) -> usize {
    if count == 0 {
        return at;
    }
    text[..at]
        .char_indices()
        .rev()
        .nth(count - 1)
        .map_or(0, |(i, _)| i)
}

/// Byte ranges of whitespace-delimited tokens longer than `limit` characters
fn oversized_tokens(text: &str, limit: usize) -> Vec<Range<usize>> {
    let mut found = Vec::new();
    let mut current: Option<(usize, usize)> = None;
    for (i, c) in text.char_indices() {
        if c.is_whitespace() {
            if let Some((start, len)) = current.take() {
                if len > limit {
                    found.push(start..i);
                }
            }
        } else {
            let (start, len) = current.unwrap_or((i, 0));
            current = Some((start, len + 1));
        }
    }
    if let Some((start, len)) = current {
        if len > limit {
            found.push(start..text.len());
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use supply_core::{Criticality, SegmentMetadata};

    fn words(count: usize) -> String {
        (0..count)
            .map(|i| format!("w{}", i % 97))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn char_len(s: &str) -> usize {
        s.chars().count()
    }

    fn tail(s: &str, n: usize) -> String {
        let chars: Vec<char> = s.chars().collect();
        chars[chars.len() - n..].iter().collect()
    }

    fn head(s: &str, n: usize) -> String {
        s.chars().take(n).collect()
    }

    fn is_oversized_token(splitter: &TextSplitter, segment: &str) -> bool {
        char_len(segment) > splitter.chunk_size() && !segment.chars().any(char::is_whitespace)
    }

    /// Bound, exact overlap, and lossless reconstruction of `text` from `segments`
    fn assert_well_formed(splitter: &TextSplitter, text: &str, segments: &[String]) {
        for segment in segments {
            assert!(
                char_len(segment) <= splitter.chunk_size() || is_oversized_token(splitter, segment),
                "segment too long: {segment:?}"
            );
        }

        for pair in segments.windows(2) {
            if is_oversized_token(splitter, &pair[1]) {
                continue;
            }
            let k = splitter.overlap().min(char_len(&pair[0]));
            assert_eq!(tail(&pair[0], k), head(&pair[1], k), "overlap broken: {pair:?}");
        }

        let mut rebuilt = segments[0].clone();
        for segment in &segments[1..] {
            if is_oversized_token(splitter, segment) {
                rebuilt.push_str(segment);
            } else {
                let skip = splitter.overlap().min(char_len(&rebuilt));
                rebuilt.extend(segment.chars().skip(skip));
            }
        }
        assert_eq!(rebuilt, text);
    }

    #[test]
    fn test_rejects_invalid_sizes() {
        assert!(TextSplitter::new(0, 0).is_err());
        assert!(TextSplitter::new(10, 10).is_err());
        assert!(TextSplitter::new(10, 9).is_ok());
    }

    #[test]
    fn test_short_text_is_single_segment() {
        let splitter = TextSplitter::default();
        let text = "Material 'Seal Kit' (ID: M001) is a Low criticality component.";
        assert_eq!(splitter.split(text), vec![text.to_string()]);

        let exact = "x".repeat(500);
        assert_eq!(splitter.split(&exact), vec![exact.clone()]);
    }

    #[test]
    fn test_segments_respect_bound_and_exact_overlap() {
        let splitter = TextSplitter::new(60, 12).unwrap();
        let text = words(200);
        let segments = splitter.split(&text);

        assert!(segments.len() > 2);
        assert_well_formed(&splitter, &text, &segments);
        for pair in segments.windows(2) {
            assert_eq!(tail(&pair[0], 12), head(&pair[1], 12));
        }
    }

    #[test]
    fn test_short_prefix_before_long_token_does_not_underflow() {
        let splitter = TextSplitter::default();
        let long = "b".repeat(600);
        let text = format!("a {long}");
        let segments = splitter.split(&text);

        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].trim(), "a");
        assert_eq!(segments[1], long);
        assert_well_formed(&splitter, &text, &segments);
    }

    #[test]
    fn test_multibyte_text_counts_characters() {
        let splitter = TextSplitter::new(20, 4).unwrap();
        let text = "São Paulo Düsseldorf Nezahualcóyotl Brasília León Juárez";
        let segments = splitter.split(text);

        assert!(segments.len() > 1);
        assert_eq!(segments.first().map(|s| head(s, 3)), Some("São".to_string()));
        assert_well_formed(&splitter, text, &segments);
    }

    #[test]
    fn test_oversized_token_is_kept_whole() {
        let splitter = TextSplitter::new(10, 3).unwrap();
        let long = "a".repeat(25);
        let text = format!("ab cd {long} ef gh");
        let segments = splitter.split(&text);

        assert!(segments.contains(&long));
        assert!(segments.last().unwrap().ends_with("gh"));
        assert_well_formed(&splitter, &text, &segments);
    }

    #[test]
    fn test_token_filling_most_of_the_bound_keeps_full_overlap() {
        let splitter = TextSplitter::new(10, 4).unwrap();
        let text = "aaaa bbbbb cccccccc";
        let segments = splitter.split(text);

        assert!(segments.len() > 1);
        assert_well_formed(&splitter, text, &segments);
        for pair in segments.windows(2) {
            assert_eq!(tail(&pair[0], 4), head(&pair[1], 4));
        }
    }

    #[test]
    fn test_long_text_with_several_oversized_tokens() {
        let splitter = TextSplitter::new(30, 6).unwrap();
        let text = format!(
            "{} {} {} {}",
            words(20),
            "x".repeat(45),
            "y".repeat(31),
            words(15)
        );
        let segments = splitter.split(&text);

        assert!(segments.contains(&"x".repeat(45)));
        assert!(segments.contains(&"y".repeat(31)));
        assert_well_formed(&splitter, &text, &segments);
    }

    #[test]
    fn test_split_document_copies_metadata() {
        let splitter = TextSplitter::new(30, 5).unwrap();
        let document = EnrichedDocument {
            description: words(30),
            metadata: SegmentMetadata {
                source: "materials.csv#M001".to_string(),
                material_id: "M001".to_string(),
                material_name: "Diode".to_string(),
                criticality_level: Some(Criticality::Critical),
                supplier_id: "S001".to_string(),
                supplier_name: "Apex Orion Corp".to_string(),
                supplier_resolved: true,
                chunk_index: 0,
            },
        };

        let segments = splitter.split_document(&document);
        assert!(segments.len() > 1);
        for (i, segment) in segments.iter().enumerate() {
            assert_eq!(segment.metadata.chunk_index, i);
            assert_eq!(segment.metadata.material_id, "M001");
        }
    }
}
