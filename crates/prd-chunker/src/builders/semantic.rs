use super::{BuildContext, ChunkBuffer};
use crate::patterns;
use crate::types::{Block, Chunk};

/// Splits at requirement boundaries (`**R1.`, `NR2.`, ...) and keeps every
/// table or code block in a chunk of its own.
pub(crate) struct SemanticBuilder<'a> {
    ctx: BuildContext<'a>,
}

impl<'a> SemanticBuilder<'a> {
    pub(crate) fn new(ctx: BuildContext<'a>) -> Self {
        Self { ctx }
    }

    pub(crate) fn build(&self, blocks: &[Block]) -> Vec<Chunk> {
        let mut out = Vec::new();
        let mut buffer = ChunkBuffer::default();

        for block in blocks {
            let tokens = self.ctx.estimate(&block.text);

            if block.is_atomic {
                out.extend(buffer.flush(&self.ctx));
                out.push(self.ctx.standalone_atomic(block, tokens));
                continue;
            }

            // A heading stays with the requirement it introduces
            if patterns::starts_requirement(&block.text) && !buffer.only_headings() {
                out.extend(buffer.flush(&self.ctx));
            }

            for (piece, piece_tokens) in self.ctx.fit(block, tokens) {
                if !buffer.fits(piece_tokens, self.ctx.max_tokens) {
                    out.extend(buffer.flush(&self.ctx));
                }
                buffer.push(piece, piece_tokens);
            }
        }

        out.extend(buffer.flush(&self.ctx));
        out
    }
}
