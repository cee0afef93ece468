use super::{BuildContext, ChunkBuffer};
use crate::types::{Block, Chunk};

/// Greedy packer: fills chunks with whole blocks up to the token budget.
///
/// When a non-atomic block ends a full chunk, its trailing lines (up to
/// `overlap` tokens) are repeated at the start of the next one.
pub(crate) struct FixedBuilder<'a> {
    ctx: BuildContext<'a>,
    split_on_headings: bool,
}

impl<'a> FixedBuilder<'a> {
    pub(crate) fn new(ctx: BuildContext<'a>) -> Self {
        Self {
            ctx,
            split_on_headings: true,
        }
    }

    /// Pack straight through headings (used to re-split one section)
    pub(crate) fn within_section(ctx: BuildContext<'a>) -> Self {
        Self {
            ctx,
            split_on_headings: false,
        }
    }

    pub(crate) fn build(&self, blocks: &[Block]) -> Vec<Chunk> {
        let mut out = Vec::new();
        let mut buffer = ChunkBuffer::default();

        for block in blocks {
            if self.split_on_headings && block.is_heading() {
                out.extend(buffer.flush(&self.ctx));
            }

            let tokens = self.ctx.estimate(&block.text);
            if block.is_atomic && tokens > self.ctx.max_tokens {
                out.extend(buffer.flush(&self.ctx));
                out.push(self.ctx.standalone_atomic(block, tokens));
                continue;
            }

            for (piece, piece_tokens) in self.ctx.fit(block, tokens) {
                if !buffer.fits(piece_tokens, self.ctx.max_tokens) {
                    let tail = self.overlap_tail(&buffer, piece_tokens);
                    out.extend(buffer.flush(&self.ctx));
                    if let Some((tail, tail_tokens)) = tail {
                        buffer.push_overlap(tail, tail_tokens);
                    }
                }
                buffer.push(piece, piece_tokens);
            }
        }

        out.extend(buffer.flush(&self.ctx));
        out
    }

    /// Trailing lines of the buffer's last block that fit the overlap budget
    /// and still leave room for the incoming block.
    fn overlap_tail(&self, buffer: &ChunkBuffer, incoming: usize) -> Option<(Block, usize)> {
        if self.ctx.overlap == 0 {
            return None;
        }
        let source = buffer.overlap_source()?;
        let room = self.ctx.max_tokens.checked_sub(incoming + 1)?;
        let budget = self.ctx.overlap.min(room);
        if budget == 0 {
            return None;
        }

        let line_starts: Vec<usize> = std::iter::once(0)
            .chain(source.text.match_indices('\n').map(|(idx, _)| idx + 1))
            .collect();

        // Grow the tail one line at a time, oldest line dropped first
        let mut best = None;
        for &start in line_starts.iter().rev() {
            let tokens = self.ctx.estimate(&source.text[start..]);
            if tokens > budget {
                break;
            }
            best = Some((start, tokens));
        }

        let (start, tokens) = best?;
        let tail = source.slice(start, source.text.len());
        if tail.text.trim().is_empty() {
            return None;
        }
        Some((tail, tokens))
    }
}
