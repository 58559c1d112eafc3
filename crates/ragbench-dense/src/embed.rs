//! Deterministic hashed bag-of-words embedder for offline runs and tests.
//!
//! Each whitespace token is hashed into one dimension; the vector is then
//! L2-normalized. Not semantically meaningful, but deterministic and cheap,
//! which is what the benchmark needs when no model provider is configured.

use anyhow::Result;
use std::hash::{Hash, Hasher};
use twox_hash::XxHash64;

use ragbench_core::traits::Embedder;

use crate::index::normalize;

pub struct HashEmbedder {
    dim: usize,
}

impl HashEmbedder {
    pub fn new(dim: usize) -> Self {
        Self { dim }
    }

    fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut v = vec![0f32; self.dim];
        for (i, token) in text.split_whitespace().enumerate() {
            let mut hasher = XxHash64::with_seed(0);
            token.hash(&mut hasher);
            let h = hasher.finish();
            let idx = (h as usize) % self.dim;
            let val = (((h >> 32) as u32) as f32) / (u32::MAX as f32);
            v[idx] += val + (i as f32 % 3.0) * 0.01;
        }
        normalize(&mut v);
        v
    }
}

impl Embedder for HashEmbedder {
    fn dim(&self) -> usize {
        self.dim
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.embed_text(t)).collect())
    }
}
