use crate::types::Chunk;

/// Number chunks 0..n in order and point each at its neighbours
pub fn link_chunks(chunks: &mut [Chunk]) {
    let count = chunks.len();
    for (idx, chunk) in chunks.iter_mut().enumerate() {
        chunk.id = idx;
        chunk.prev_id = idx.checked_sub(1);
        chunk.next_id = (idx + 1 < count).then_some(idx + 1);
    }
}
