// Copyright 2026 the Vitreous Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;

/// Disjoint-set forest over dense `u32` indices.
///
/// Path halving plus union by rank.
#[derive(Debug, Default)]
pub(crate) struct DisjointSet {
    parent: Vec<u32>,
    rank: Vec<u8>,
}

impl DisjointSet {
    /// Resets to `len` singleton sets.
    pub(crate) fn reset(&mut self, len: u32) {
        self.parent.clear();
        self.parent.extend(0..len);
        self.rank.clear();
        self.rank.resize(len as usize, 0);
    }

    /// Returns the representative of `x`'s set.
    pub(crate) fn find(&mut self, mut x: u32) -> u32 {
        while self.parent[x as usize] != x {
            let grandparent = self.parent[self.parent[x as usize] as usize];
            self.parent[x as usize] = grandparent;
            x = grandparent;
        }
        x
    }

    /// Merges the sets containing `a` and `b`.
    pub(crate) fn union(&mut self, a: u32, b: u32) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return;
        }
        let (rank_a, rank_b) = (self.rank[ra as usize], self.rank[rb as usize]);
        if rank_a < rank_b {
            self.parent[ra as usize] = rb;
        } else {
            self.parent[rb as usize] = ra;
            if rank_a == rank_b {
                self.rank[ra as usize] = rank_a.saturating_add(1);
            }
        }
    }
}
