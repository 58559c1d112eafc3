//! BM25-Okapi index over pre-tokenized documents.
//!
//! Parameters and IDF handling follow the common Okapi variant: k1 = 1.5,
//! b = 0.75, and negative IDF values (terms in more than half the corpus)
//! floored to `epsilon * average_idf` so very common terms still contribute
//! a small positive amount instead of penalizing a document.

use std::collections::HashMap;

const K1: f64 = 1.5;
const B: f64 = 0.75;
const EPSILON: f64 = 0.25;

pub struct Bm25Index {
    /// Per-document term frequencies.
    doc_freqs: Vec<HashMap<String, usize>>,
    /// Per-term inverse document frequency, floored as described above.
    idf: HashMap<String, f64>,
    /// Per-document length in tokens.
    doc_lens: Vec<usize>,
    avgdl: f64,
}

impl Bm25Index {
    /// Build the index from tokenized documents.
    pub fn build(docs: &[Vec<String>]) -> Self {
        let n = docs.len();
        let mut doc_freqs = Vec::with_capacity(n);
        let mut doc_lens = Vec::with_capacity(n);
        let mut term_doc_count: HashMap<String, usize> = HashMap::new();

        for doc in docs {
            let mut freqs: HashMap<String, usize> = HashMap::new();
            for token in doc {
                *freqs.entry(token.clone()).or_insert(0) += 1;
            }
            for term in freqs.keys() {
                *term_doc_count.entry(term.clone()).or_insert(0) += 1;
            }
            doc_lens.push(doc.len());
            doc_freqs.push(freqs);
        }

        let avgdl = if n == 0 {
            0.0
        } else {
            doc_lens.iter().sum::<usize>() as f64 / n as f64
        };

        // Raw IDF first; the floor needs the average over all terms.
        let mut idf: HashMap<String, f64> = HashMap::new();
        let mut idf_sum = 0.0;
        let mut negative: Vec<String> = Vec::new();
        for (term, &df) in &term_doc_count {
            let value = ((n as f64 - df as f64 + 0.5) / (df as f64 + 0.5)).ln();
            idf_sum += value;
            if value < 0.0 {
                negative.push(term.clone());
            }
            idf.insert(term.clone(), value);
        }
        if !idf.is_empty() {
            let floor = EPSILON * (idf_sum / idf.len() as f64);
            for term in negative {
                idf.insert(term, floor);
            }
        }

        Self { doc_freqs, idf, doc_lens, avgdl }
    }

    pub fn len(&self) -> usize {
        self.doc_freqs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.doc_freqs.is_empty()
    }

    /// Score every document against the query tokens. One score per
    /// document, in corpus order.
    pub fn scores(&self, query_tokens: &[String]) -> Vec<f64> {
        let mut scores = vec![0.0; self.doc_freqs.len()];
        for token in query_tokens {
            let Some(&idf) = self.idf.get(token) else {
                continue;
            };
            for (i, freqs) in self.doc_freqs.iter().enumerate() {
                let f = *freqs.get(token).unwrap_or(&0) as f64;
                if f == 0.0 {
                    continue;
                }
                let norm = 1.0 - B + B * self.doc_lens[i] as f64 / self.avgdl;
                scores[i] += idf * (f * (K1 + 1.0)) / (f + K1 * norm);
            }
        }
        scores
    }
}
