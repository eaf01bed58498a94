//! Append-only record store built from fixed-size blocks.
//!
//! A hard search can push millions of records. Blocks are allocated at full
//! capacity up front and never grow, so an append never copies old records
//! and no single allocation exceeds one block.

/// Records per block.
pub const BLOCK_SIZE: usize = 8192;

/// Append-only indexed store of `Copy` records.
#[derive(Clone, Debug)]
pub struct PoolArray<T: Copy> {
    blocks: Vec<Vec<T>>,
    len: usize,
}

impl<T: Copy> PoolArray<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            blocks: Vec::new(),
            len: 0,
        }
    }

    /// Append a record, returning its index.
    pub fn push(&mut self, record: T) -> usize {
        if self.len % BLOCK_SIZE == 0 {
            self.blocks.push(Vec::with_capacity(BLOCK_SIZE));
        }
        let index = self.len;
        self.blocks[index / BLOCK_SIZE].push(record);
        self.len += 1;
        index
    }

    /// Record at `index`. Panics if out of range.
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> T {
        self.check(index);
        self.blocks[index / BLOCK_SIZE][index % BLOCK_SIZE]
    }

    /// Overwrite the record at `index`. Panics if out of range.
    #[inline]
    pub fn set(&mut self, index: usize, record: T) {
        self.check(index);
        self.blocks[index / BLOCK_SIZE][index % BLOCK_SIZE] = record;
    }

    #[inline]
    fn check(&self, index: usize) {
        assert!(index < self.len, "pool index out of range: {index} >= {}", self.len);
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of allocated blocks.
    #[must_use]
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Drop every block.
    pub fn clear(&mut self) {
        self.blocks.clear();
        self.len = 0;
    }

    /// Records in append order.
    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        self.blocks.iter().flat_map(|block| block.iter().copied())
    }
}

impl<T: Copy> Default for PoolArray<T> {
    fn default() -> Self {
        Self::new()
    }
}
