//! Exact inner-product nearest-neighbor search over a flat vector list.
//!
//! With L2-normalized vectors the inner product equals cosine similarity.
//! Search is a full scan with a stable descending sort, so ties keep
//! insertion order.

use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};

/// L2-normalize in place. Zero vectors are left unchanged.
pub fn normalize(v: &mut [f32]) {
    let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in v.iter_mut() {
            *x /= norm;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlatIpIndex {
    dim: usize,
    vectors: Vec<Vec<f32>>,
}

impl FlatIpIndex {
    pub fn new(dim: usize) -> Self {
        Self { dim, vectors: Vec::new() }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn add(&mut self, vector: Vec<f32>) -> Result<()> {
        ensure!(
            vector.len() == self.dim,
            "vector dimension {} does not match index dimension {}",
            vector.len(),
            self.dim
        );
        self.vectors.push(vector);
        Ok(())
    }

    /// Top-k `(insertion_index, inner_product)` pairs, descending score,
    /// ties broken by insertion order.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<(usize, f32)>> {
        ensure!(
            query.len() == self.dim,
            "query dimension {} does not match index dimension {}",
            query.len(),
            self.dim
        );
        let mut hits: Vec<(usize, f32)> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(i, v)| (i, dot(query, v)))
            .collect();
        hits.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        hits.truncate(k);
        Ok(hits)
    }
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}
