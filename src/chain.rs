//! Read-only chain view for lock evaluation
//!
//! Lock evaluation needs very little of the chain: heights, ancestors and
//! median time-past. `Chain` owns the headers in height order and hands
//! out cheap `BlockIndex` handles.

use crate::types::BlockHeader;

/// Number of trailing blocks over which median time-past is taken.
const MEDIAN_TIME_SPAN: usize = 11;

/// Headers in height order; index equals height.
#[derive(Debug, Clone, Default)]
pub struct Chain {
    headers: Vec<BlockHeader>,
}

impl Chain {
    pub fn new(headers: Vec<BlockHeader>) -> Self {
        Chain { headers }
    }

    /// Build a chain where only the header timestamps matter.
    pub fn from_timestamps(times: &[u32]) -> Self {
        let headers = times
            .iter()
            .map(|&time| BlockHeader {
                version: 1,
                prev_block_hash: [0; 32],
                merkle_root: [0; 32],
                time,
                bits: 0,
                nonce: 0,
            })
            .collect();
        Chain { headers }
    }

    pub fn len(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    /// Entry at `height`, if the chain reaches that far.
    pub fn at(&self, height: i32) -> Option<BlockIndex<'_>> {
        if height < 0 || height as usize >= self.headers.len() {
            return None;
        }
        Some(BlockIndex {
            chain: self,
            height,
        })
    }

    pub fn tip(&self) -> Option<BlockIndex<'_>> {
        if self.headers.is_empty() {
            return None;
        }
        self.at(self.headers.len() as i32 - 1)
    }
}

/// Borrowed handle to one block of a `Chain`.
#[derive(Debug, Clone, Copy)]
pub struct BlockIndex<'a> {
    chain: &'a Chain,
    height: i32,
}

impl<'a> BlockIndex<'a> {
    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn header(&self) -> &'a BlockHeader {
        &self.chain.headers[self.height as usize]
    }

    pub fn prev(&self) -> Option<BlockIndex<'a>> {
        self.chain.at(self.height - 1)
    }

    /// Ancestor at `height`, clamped into `[0, self.height]`. Lock
    /// calculation only ever asks for in-view heights.
    pub fn ancestor(&self, height: i32) -> BlockIndex<'a> {
        BlockIndex {
            chain: self.chain,
            height: height.clamp(0, self.height),
        }
    }

    /// Median of the timestamps of this block and its ten predecessors
    /// (fewer near genesis).
    pub fn median_time_past(&self) -> i64 {
        let begin = (self.height as usize + 1).saturating_sub(MEDIAN_TIME_SPAN);
        let mut times: Vec<i64> = self.chain.headers[begin..=self.height as usize]
            .iter()
            .map(|header| header.time as i64)
            .collect();
        times.sort_unstable();
        times[times.len() / 2]
    }
}
