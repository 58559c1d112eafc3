//! Reciprocal Rank Fusion over independently ranked candidate lists.
//!
//! Rank-based fusion is scale-invariant: BM25 scores and inner-product
//! similarities live in unrelated numeric ranges, so summing raw scores
//! would need a tuned weighting step. RRF only uses rank positions.

use std::collections::HashMap;

pub const DEFAULT_RRF_K: f64 = 60.0;

/// Sum RRF partial scores per distinct text across all lists.
///
/// The chunk at 0-indexed rank `r` in a list contributes `1 / (rrf_k + r + 1)`;
/// a chunk absent from a list contributes nothing from that list. The result
/// is sorted by summed score descending, ties broken by the order a text was
/// first encountered (lists scanned in the order given, each in rank order).
pub fn fused_scores(lists: &[&[String]], rrf_k: f64) -> Vec<(String, f64)> {
    // (text, summed score, first-seen counter)
    let mut entries: Vec<(String, f64, usize)> = Vec::new();
    let mut by_text: HashMap<String, usize> = HashMap::new();

    for list in lists {
        for (rank, text) in list.iter().enumerate() {
            let partial = 1.0 / (rrf_k + rank as f64 + 1.0);
            match by_text.get(text) {
                Some(&i) => entries[i].1 += partial,
                None => {
                    by_text.insert(text.clone(), entries.len());
                    let order = entries.len();
                    entries.push((text.clone(), partial, order));
                }
            }
        }
    }

    entries.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.2.cmp(&b.2))
    });
    entries.into_iter().map(|(text, score, _)| (text, score)).collect()
}

/// Fuse ranked lists into one ranking truncated to `top_k`.
pub fn reciprocal_rank_fusion(lists: &[&[String]], rrf_k: f64, top_k: usize) -> Vec<String> {
    fused_scores(lists, rrf_k)
        .into_iter()
        .take(top_k)
        .map(|(text, _)| text)
        .collect()
}
