//! Chunk builders.
//!
//! Every builder consumes parsed blocks and emits unlinked chunks in
//! document order. They share the buffer and splitting rules below:
//! atomic blocks are never cut, oversized non-atomic blocks are split at
//! line, word and finally grapheme boundaries.

mod combined;
mod fixed;
mod hierarchical;
mod semantic;

pub(crate) use combined::CombinedBuilder;
pub(crate) use fixed::FixedBuilder;
pub(crate) use hierarchical::HierarchicalBuilder;
pub(crate) use semantic::SemanticBuilder;

use crate::tokens::TokenEstimator;
use crate::types::{Block, BlockType, Chunk};
use unicode_segmentation::UnicodeSegmentation;

/// Budget and estimator shared by all builders of one processing call
#[derive(Debug, Clone, Copy)]
pub(crate) struct BuildContext<'a> {
    pub estimator: &'a TokenEstimator,
    pub max_tokens: usize,
    pub overlap: usize,
}

impl<'a> BuildContext<'a> {
    pub(crate) fn new(estimator: &'a TokenEstimator, max_tokens: usize, overlap: usize) -> Self {
        Self {
            estimator,
            max_tokens,
            overlap,
        }
    }

    pub(crate) fn estimate(&self, text: &str) -> usize {
        self.estimator.estimate(text)
    }

    /// Build a chunk from consecutive blocks joined by newlines
    pub(crate) fn assemble(&self, blocks: &[Block], overlap_len: usize) -> Chunk {
        let text = blocks
            .iter()
            .map(|b| b.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        let overlap_chars = match overlap_len {
            0 => 0,
            len if blocks.len() > 1 => len + 1,
            len => len,
        };

        Chunk {
            token_count: self.estimate(&text),
            has_table: blocks.iter().any(|b| b.has_table),
            has_code: blocks.iter().any(|b| b.has_code),
            is_atomic: blocks.len() == 1 && blocks[0].is_atomic,
            start_offset: blocks.first().map_or(0, |b| b.start),
            end_offset: blocks.last().map_or(0, |b| b.end),
            overlap_chars,
            text,
            ..Default::default()
        }
    }

    /// A single atomic block as its own chunk, warning when over budget
    pub(crate) fn standalone_atomic(&self, block: &Block, tokens: usize) -> Chunk {
        if tokens > self.max_tokens {
            log::warn!(
                "{} at offset {} has {tokens} tokens, over max_tokens ({}); emitting it whole",
                block.kind.as_str(),
                block.start,
                self.max_tokens
            );
        }
        self.assemble(std::slice::from_ref(block), 0)
    }

    /// The block itself, or budget-sized pieces of an oversized non-atomic block
    pub(crate) fn fit(&self, block: &Block, tokens: usize) -> Vec<(Block, usize)> {
        if block.is_atomic || tokens <= self.max_tokens {
            return vec![(block.clone(), tokens)];
        }

        log::debug!(
            "splitting {} at offset {} ({tokens} tokens > {})",
            block.kind.as_str(),
            block.start,
            self.max_tokens
        );
        let mut pieces = Vec::new();
        self.split_range(block, 0, block.text.len(), SplitLevel::Lines, &mut pieces);
        pieces
            .into_iter()
            .map(|piece| {
                let tokens = self.estimate(&piece.text);
                (piece, tokens)
            })
            .collect()
    }

    fn split_range(
        &self,
        block: &Block,
        from: usize,
        to: usize,
        level: SplitLevel,
        out: &mut Vec<Block>,
    ) {
        let segment = &block.text[from..to];
        if self.estimate(segment) <= self.max_tokens {
            out.push(block.slice(from, to));
            return;
        }

        let units = level.units(segment, from);
        if units.len() <= 1 {
            match level.finer() {
                Some(finer) => self.split_range(block, from, to, finer, out),
                None => out.push(block.slice(from, to)),
            }
            return;
        }

        let fits = |start: usize, end: usize| self.estimate(&block.text[start..end]) <= self.max_tokens;

        let mut i = 0;
        while i < units.len() {
            let (piece_start, unit_end) = units[i];
            if !fits(piece_start, unit_end) {
                match level.finer() {
                    Some(finer) => self.split_range(block, piece_start, unit_end, finer, out),
                    None => out.push(block.slice(piece_start, unit_end)),
                }
                i += 1;
                continue;
            }

            // Largest run of units starting at `i` that still fits
            let (mut lo, mut hi) = (i, units.len() - 1);
            while lo < hi {
                let mid = (lo + hi + 1) / 2;
                if fits(piece_start, units[mid].1) {
                    lo = mid;
                } else {
                    hi = mid - 1;
                }
            }
            out.push(block.slice(piece_start, units[lo].1));
            i = lo + 1;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SplitLevel {
    Lines,
    Words,
    Graphemes,
}

impl SplitLevel {
    const fn finer(self) -> Option<Self> {
        match self {
            Self::Lines => Some(Self::Words),
            Self::Words => Some(Self::Graphemes),
            Self::Graphemes => None,
        }
    }

    /// Unit ranges of `segment`, shifted by `base` into block coordinates
    fn units(self, segment: &str, base: usize) -> Vec<(usize, usize)> {
        match self {
            Self::Lines => {
                let mut start = 0;
                segment
                    .split('\n')
                    .map(|line| {
                        let range = (base + start, base + start + line.len());
                        start += line.len() + 1;
                        range
                    })
                    .collect()
            }
            Self::Words => segment
                .split_word_bound_indices()
                .map(|(idx, word)| (base + idx, base + idx + word.len()))
                .collect(),
            Self::Graphemes => segment
                .grapheme_indices(true)
                .map(|(idx, g)| (base + idx, base + idx + g.len()))
                .collect(),
        }
    }
}

/// Blocks collected for the chunk under construction
#[derive(Debug, Default)]
pub(crate) struct ChunkBuffer {
    blocks: Vec<Block>,
    tokens: usize,
    overlap_len: usize,
}

impl ChunkBuffer {
    /// Empty, or holding nothing but headings
    pub(crate) fn only_headings(&self) -> bool {
        self.blocks.iter().all(Block::is_heading)
    }

    /// Whether `tokens` more fit, counting one token for the joining newline
    pub(crate) fn fits(&self, tokens: usize, max_tokens: usize) -> bool {
        let separator = usize::from(!self.blocks.is_empty());
        self.tokens + separator + tokens <= max_tokens
    }

    pub(crate) fn push(&mut self, block: Block, tokens: usize) {
        if !self.blocks.is_empty() {
            self.tokens += 1;
        }
        self.tokens += tokens;
        self.blocks.push(block);
    }

    /// Seed an empty buffer with text repeated from the previous chunk
    pub(crate) fn push_overlap(&mut self, tail: Block, tokens: usize) {
        debug_assert!(self.blocks.is_empty());
        self.overlap_len = tail.text.len();
        self.push(tail, tokens);
    }

    /// Last block, when it may be repeated as overlap
    pub(crate) fn overlap_source(&self) -> Option<&Block> {
        self.blocks
            .last()
            .filter(|b| matches!(b.kind, BlockType::Paragraph | BlockType::List))
    }

    /// Turn the buffer into a chunk and reset it
    pub(crate) fn flush(&mut self, ctx: &BuildContext<'_>) -> Option<Chunk> {
        if self.blocks.is_empty() {
            return None;
        }
        let chunk = ctx.assemble(&self.blocks, self.overlap_len);
        *self = Self::default();
        Some(chunk)
    }
}
