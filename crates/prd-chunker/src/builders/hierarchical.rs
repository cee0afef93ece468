//! Section-per-chunk builder driven by the heading stack.
//!
//! Each heading opens a section and closes every open section of the same
//! or deeper level. The innermost section owns the blocks that follow it
//! until the next heading. Sections are emitted in document order; a
//! section holding only its heading is carried into the next emitted one
//! so that no heading text is lost.

use super::{BuildContext, FixedBuilder, SemanticBuilder};
use crate::types::{Block, Chunk};

/// How an over-budget section is broken up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Resplit {
    Fixed,
    Semantic,
}

#[derive(Debug)]
struct OpenSection {
    level: u8,
    title: String,
}

#[derive(Debug)]
enum Draft {
    Section {
        path: Vec<String>,
        level: u8,
        blocks: Vec<Block>,
    },
    /// Table or code block appearing before the first heading
    Atomic(Block),
}

#[derive(Debug, Default)]
struct SectionWalk {
    stack: Vec<OpenSection>,
    current: Vec<Block>,
    carried: Vec<Block>,
    drafts: Vec<Draft>,
}

impl SectionWalk {
    fn path(&self) -> Vec<String> {
        self.stack.iter().map(|s| s.title.clone()).collect()
    }

    fn level(&self) -> u8 {
        self.stack.last().map_or(0, |s| s.level)
    }

    fn close_current(&mut self) {
        if self.current.is_empty() {
            return;
        }
        if self.current.iter().all(Block::is_heading) {
            self.carried.append(&mut self.current);
            return;
        }
        let mut blocks = std::mem::take(&mut self.carried);
        blocks.append(&mut self.current);
        self.drafts.push(Draft::Section {
            path: self.path(),
            level: self.level(),
            blocks,
        });
    }

    fn open(&mut self, heading: &Block) {
        self.close_current();
        while self
            .stack
            .last()
            .is_some_and(|s| s.level >= heading.heading_level)
        {
            self.stack.pop();
        }
        self.stack.push(OpenSection {
            level: heading.heading_level,
            title: heading.heading_title().to_string(),
        });
        self.current.push(heading.clone());
    }

    fn finish(mut self) -> Vec<Draft> {
        self.close_current();
        if !self.carried.is_empty() {
            let path = self.path();
            let level = self.level();
            self.drafts.push(Draft::Section {
                path,
                level,
                blocks: std::mem::take(&mut self.carried),
            });
        }
        self.drafts
    }
}

pub(crate) struct HierarchicalBuilder<'a> {
    ctx: BuildContext<'a>,
    resplit: Resplit,
}

impl<'a> HierarchicalBuilder<'a> {
    pub(crate) fn new(ctx: BuildContext<'a>) -> Self {
        Self {
            ctx,
            resplit: Resplit::Fixed,
        }
    }

    pub(crate) fn with_resplit(ctx: BuildContext<'a>, resplit: Resplit) -> Self {
        Self { ctx, resplit }
    }

    pub(crate) fn build(&self, blocks: &[Block]) -> Vec<Chunk> {
        let mut walk = SectionWalk::default();
        for block in blocks {
            if block.is_heading() {
                walk.open(block);
            } else if block.is_atomic && walk.stack.is_empty() {
                walk.close_current();
                walk.drafts.push(Draft::Atomic(block.clone()));
            } else {
                walk.current.push(block.clone());
            }
        }

        let mut out = Vec::new();
        for draft in walk.finish() {
            match draft {
                Draft::Atomic(block) => {
                    let tokens = self.ctx.estimate(&block.text);
                    out.push(self.ctx.standalone_atomic(&block, tokens));
                }
                Draft::Section {
                    path,
                    level,
                    blocks,
                } => {
                    let mut chunks = self.section_chunks(&path, &blocks);
                    for chunk in &mut chunks {
                        chunk.set_section(&path, level);
                    }
                    out.append(&mut chunks);
                }
            }
        }
        out
    }

    fn section_chunks(&self, path: &[String], blocks: &[Block]) -> Vec<Chunk> {
        let whole = self.ctx.assemble(blocks, 0);
        if whole.token_count <= self.ctx.max_tokens || whole.is_atomic {
            return vec![whole];
        }

        log::debug!(
            "section '{}' has {} tokens, re-splitting ({:?})",
            path.join("/"),
            whole.token_count,
            self.resplit
        );
        match self.resplit {
            Resplit::Fixed => FixedBuilder::within_section(self.ctx).build(blocks),
            Resplit::Semantic => SemanticBuilder::new(self.ctx).build(blocks),
        }
    }
}
