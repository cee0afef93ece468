use super::hierarchical::Resplit;
use super::{BuildContext, HierarchicalBuilder};
use crate::types::{Block, Chunk};

/// Hierarchical sections first, then requirement-boundary splitting inside
/// any section that is still over budget. Used for very large documents.
pub(crate) struct CombinedBuilder<'a> {
    inner: HierarchicalBuilder<'a>,
}

impl<'a> CombinedBuilder<'a> {
    pub(crate) fn new(ctx: BuildContext<'a>) -> Self {
        Self {
            inner: HierarchicalBuilder::with_resplit(ctx, Resplit::Semantic),
        }
    }

    pub(crate) fn build(&self, blocks: &[Block]) -> Vec<Chunk> {
        self.inner.build(blocks)
    }
}
