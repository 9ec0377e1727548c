//! Overlapping, boundary-aware text splitting.
//!
//! Lengths and offsets are counted in `char`s so a cut never lands inside a
//! multi-byte sequence. Consecutive chunks share exactly `overlap` chars,
//! which makes the split lossless: dropping the first `overlap` chars of every
//! chunk after the first and concatenating reproduces the input.

use serde::{Deserialize, Serialize};

use super::knowledge::Passage;

/// A bounded-length slice of one passage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub text: String,
    /// Category of the passage this chunk was cut from.
    pub category: String,
    /// Char offset of the chunk inside its passage.
    pub source_offset: usize,
    /// Position of the chunk within its passage.
    pub chunk_index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunker {
    max_length: usize,
    overlap: usize,
}

impl Chunker {
    /// `max_length` of zero is treated as one; `overlap` is clamped below `max_length`.
    pub fn new(max_length: usize, overlap: usize) -> Self {
        let max_length = max_length.max(1);
        Self {
            max_length,
            overlap: overlap.min(max_length - 1),
        }
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    pub fn overlap(&self) -> usize {
        self.overlap
    }

    pub fn split<'a>(&self, text: &'a str) -> Vec<&'a str> {
        self.spans(text).into_iter().map(|(_, span)| span).collect()
    }

    pub fn chunk_passage(&self, passage: &Passage) -> Vec<Chunk> {
        self.spans(&passage.content)
            .into_iter()
            .enumerate()
            .map(|(chunk_index, (source_offset, text))| Chunk {
                text: text.to_string(),
                category: passage.category.clone(),
                source_offset,
                chunk_index,
            })
            .collect()
    }

    /// Returns `(char_offset, slice)` pairs in order.
    fn spans<'a>(&self, text: &'a str) -> Vec<(usize, &'a str)> {
        if text.is_empty() {
            return Vec::new();
        }

        let chars: Vec<char> = text.chars().collect();
        let bounds: Vec<usize> = text
            .char_indices()
            .map(|(idx, _)| idx)
            .chain(std::iter::once(text.len()))
            .collect();
        let total = chars.len();

        let mut spans = Vec::new();
        let mut start = 0;
        loop {
            let hard_end = (start + self.max_length).min(total);
            let end = if hard_end == total {
                total
            } else {
                self.find_cut(&chars, start, hard_end)
            };

            spans.push((start, &text[bounds[start]..bounds[end]]));

            if end == total {
                break;
            }
            start = end - self.overlap;
        }

        spans
    }

    /// Picks where the chunk starting at `start` ends.
    ///
    /// The chunk must keep more than `overlap` chars so the next start advances.
    fn find_cut(&self, chars: &[char], start: usize, hard_end: usize) -> usize {
        let min_end = start + self.overlap + 1;

        // Sentence breaks only count in the back half, otherwise chunks get tiny.
        let sentence_floor = min_end.max(start + self.max_length / 2);
        if let Some(end) = (sentence_floor..=hard_end)
            .rev()
            .find(|&end| is_sentence_break(chars, end))
        {
            return end;
        }

        if let Some(end) = (min_end..=hard_end)
            .rev()
            .find(|&end| chars[end - 1].is_whitespace())
        {
            return end;
        }

        hard_end
    }
}

/// Free-function form of [`Chunker::split`].
pub fn split(text: &str, max_length: usize, overlap: usize) -> Vec<String> {
    Chunker::new(max_length, overlap)
        .split(text)
        .into_iter()
        .map(str::to_string)
        .collect()
}

fn is_sentence_break(chars: &[char], end: usize) -> bool {
    let last = chars[end - 1];
    if last == '\n' {
        return true;
    }
    end >= 2 && last.is_whitespace() && matches!(chars[end - 2], '.' | '!' | '?' | '。')
}
