//! Corpus loading: chunking `.txt` directories, JSON chunk files, and the
//! ground-truth question set.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::types::Chunk;

#[derive(Debug, Clone)]
pub struct ChunkingConfig {
    /// Approximate token budget per chunk before a paragraph is split.
    pub max_tokens: usize,
    /// Fraction of words repeated between consecutive sub-chunks.
    pub overlap_percent: f32,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self { max_tokens: 500, overlap_percent: 0.2 }
    }
}

/// Splits plain-text documents into retrieval chunks with stable ids
/// `"<stem>:<index>"`. Paragraphs within the token budget become one chunk
/// each; oversized paragraphs are split on word boundaries with overlap.
#[derive(Default)]
pub struct CorpusProcessor {
    chunking: ChunkingConfig,
}

impl CorpusProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(chunking: ChunkingConfig) -> Self {
        Self { chunking }
    }

    pub fn process_directory(&self, data_dir: &Path) -> Result<Vec<Chunk>> {
        let files = list_txt_files(data_dir);
        if files.is_empty() {
            println!("No .txt files found under {}.", data_dir.display());
            return Ok(vec![]);
        }
        let mut all_chunks = Vec::new();
        for (file_index, file_path) in files.iter().enumerate() {
            println!(
                "Processing file {}/{}: {}",
                file_index + 1,
                files.len(),
                file_path.display()
            );
            let content = read_file_content(file_path)?;
            let source = doc_stem(file_path);
            all_chunks.extend(self.chunk_content(&content, &source));
        }
        println!("Processed {} files into {} chunks", files.len(), all_chunks.len());
        Ok(all_chunks)
    }

    fn chunk_content(&self, content: &str, source: &str) -> Vec<Chunk> {
        let mut chunks = Vec::new();
        let mut position = 0;
        for paragraph in content.split("\n\n") {
            let paragraph = paragraph.trim();
            if paragraph.is_empty() {
                continue;
            }
            if count_tokens(paragraph) <= self.chunking.max_tokens {
                chunks.push(self.make_chunk(source, paragraph.to_string(), &mut position));
            } else {
                for sub in self.split_paragraph_with_overlap(paragraph) {
                    chunks.push(self.make_chunk(source, sub, &mut position));
                }
            }
        }
        chunks
    }

    fn make_chunk(&self, source: &str, text: String, position: &mut usize) -> Chunk {
        let chunk = Chunk {
            id: format!("{}:{}", source, *position),
            source: source.to_string(),
            text,
            position: *position,
        };
        *position += 1;
        chunk
    }

    fn split_paragraph_with_overlap(&self, paragraph: &str) -> Vec<String> {
        let words: Vec<&str> = paragraph.split_whitespace().collect();
        let words_per_chunk = 300;
        let overlap_words = (words_per_chunk as f32 * self.chunking.overlap_percent) as usize;
        let mut chunks = Vec::new();
        let mut start = 0;
        while start < words.len() {
            let end = (start + words_per_chunk).min(words.len());
            chunks.push(words[start..end].join(" "));
            if end >= words.len() {
                break;
            }
            start = end - overlap_words;
        }
        chunks
    }
}

/// Rough word-to-token conversion (~0.75 words per token).
fn count_tokens(text: &str) -> usize {
    let word_count = text.split_whitespace().count();
    (word_count as f32 / 0.75) as usize
}

fn list_txt_files(data_dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(data_dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| {
            e.file_type().is_file() && e.path().extension().is_some_and(|ext| ext == "txt")
        })
        .map(|e| e.path().to_path_buf())
        .collect();
    files.sort();
    files
}

fn read_file_content(file_path: &Path) -> Result<String> {
    match fs::read_to_string(file_path) {
        Ok(content) => Ok(content),
        Err(_) => Ok(String::from_utf8_lossy(&fs::read(file_path)?).to_string()),
    }
}

fn doc_stem(file_path: &Path) -> String {
    file_path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "doc".to_string())
}

/// Save chunks as JSON for reuse across runs.
pub fn save_chunks(chunks: &[Chunk], path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(chunks)?;
    fs::write(path, json).with_context(|| format!("writing chunks to {}", path.display()))?;
    println!("Saved {} chunks to {}", chunks.len(), path.display());
    Ok(())
}

/// Load chunks from JSON, enforcing id uniqueness within the corpus.
pub fn load_chunks(path: &Path) -> Result<Vec<Chunk>> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("reading chunks from {}", path.display()))?;
    let chunks: Vec<Chunk> = serde_json::from_str(&json)?;
    let mut seen = HashSet::new();
    for c in &chunks {
        if !seen.insert(c.id.as_str()) {
            bail!("duplicate chunk id '{}' in {}", c.id, path.display());
        }
    }
    Ok(chunks)
}

/// One benchmark question with its reference answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroundTruthEntry {
    pub question: String,
    pub answer: String,
}

/// Load the ordered question set. The file is a JSON array so question
/// order is stable across runs.
pub fn load_ground_truth(path: &Path) -> Result<Vec<GroundTruthEntry>> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("reading ground truth from {}", path.display()))?;
    Ok(serde_json::from_str(&json)?)
}
