//! JSON, CSV, Markdown, and console reports from benchmark results.

use anyhow::{Context, Result};
use chrono::Local;
use serde_json::json;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use crate::aggregate::ComboResult;

pub struct BenchmarkReporter {
    output_dir: PathBuf,
}

impl BenchmarkReporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self { output_dir: output_dir.into() }
    }

    /// Save JSON + CSV + Markdown and print the summary table. Returns the
    /// Markdown path.
    pub fn save_all(&self, results: &[ComboResult], prefix: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)
            .with_context(|| format!("creating {}", self.output_dir.display()))?;
        let ts = Local::now().format("%Y%m%d_%H%M%S");
        let base = self.output_dir.join(format!("{prefix}_{ts}"));

        self.save_json(results, &base.with_extension("json"))?;
        self.save_csv(results, &base.with_extension("csv"))?;
        let md_path = base.with_extension("md");
        self.save_markdown(results, &md_path)?;
        print_table(results);

        println!("\nReports saved -> {}/", self.output_dir.display());
        Ok(md_path)
    }

    pub fn save_json(&self, results: &[ComboResult], path: &Path) -> Result<()> {
        let data: Vec<_> = results
            .iter()
            .map(|r| {
                json!({
                    "combo": r.combo(),
                    "setup_metrics": r.setup_metrics,
                    "latency": {
                        "avg_retrieval_ms": round1(r.avg_retrieval_ms),
                        "avg_generation_ms": round1(r.avg_generation_ms),
                        "avg_total_ms": round1(r.avg_total_ms),
                        "avg_tokens": round1(r.avg_tokens),
                    },
                    "quality": r.judge_scores,
                    "per_question": r.per_question,
                })
            })
            .collect();
        fs::write(path, serde_json::to_string_pretty(&data)?)
            .with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }

    pub fn save_csv(&self, results: &[ComboResult], path: &Path) -> Result<()> {
        let Some(first) = results.first() else {
            return Ok(());
        };

        let mut header = vec![
            "combo".to_string(),
            "retriever".to_string(),
            "generator".to_string(),
            "setup_total_ms".to_string(),
            "setup_embedding_ms".to_string(),
            "setup_tokenizing_ms".to_string(),
            "setup_indexing_ms".to_string(),
            "setup_memory_peak_mb".to_string(),
            "avg_retrieval_ms".to_string(),
            "avg_generation_ms".to_string(),
            "avg_total_ms".to_string(),
            "avg_tokens".to_string(),
        ];
        header.extend(first.judge_scores.dimensions.keys().cloned());
        header.push("average".to_string());

        let mut out = String::new();
        writeln!(out, "{}", header.join(","))?;
        for r in results {
            let mut row = vec![
                csv_field(&r.combo()),
                csv_field(&r.retriever_name),
                csv_field(&r.generator_name),
                format!("{:.1}", r.setup_metrics.total_ms),
                format!("{:.1}", r.setup_metrics.embedding_ms),
                format!("{:.1}", r.setup_metrics.tokenizing_ms),
                format!("{:.1}", r.setup_metrics.indexing_ms),
                format!("{:.2}", r.setup_metrics.memory_peak_mb),
                format!("{:.1}", r.avg_retrieval_ms),
                format!("{:.1}", r.avg_generation_ms),
                format!("{:.1}", r.avg_total_ms),
                format!("{:.1}", r.avg_tokens),
            ];
            for key in first.judge_scores.dimensions.keys() {
                let value = r.judge_scores.dimensions.get(key).copied().unwrap_or(0.0);
                row.push(format!("{value:.3}"));
            }
            row.push(format!("{:.3}", r.judge_scores.average));
            writeln!(out, "{}", row.join(","))?;
        }
        fs::write(path, out).with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }

    pub fn save_markdown(&self, results: &[ComboResult], path: &Path) -> Result<()> {
        let mut by_quality: Vec<&ComboResult> = results.iter().collect();
        by_quality.sort_by(|a, b| {
            b.judge_scores
                .average
                .partial_cmp(&a.judge_scores.average)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let mut md = String::new();
        writeln!(md, "# Retrieval Benchmark Report")?;
        writeln!(md, "_Generated: {}_\n", Local::now().format("%Y-%m-%d %H:%M"))?;

        writeln!(md, "## Quality Rankings\n")?;
        if let Some(first) = by_quality.first() {
            let dims: Vec<&String> = first.judge_scores.dimensions.keys().collect();
            write!(md, "| Combo |")?;
            for d in &dims {
                write!(md, " {d} |")?;
            }
            writeln!(md, " average |")?;
            write!(md, "|---|")?;
            for _ in &dims {
                write!(md, "---|")?;
            }
            writeln!(md, "---|")?;
            for r in &by_quality {
                write!(md, "| {} |", r.combo())?;
                for d in &dims {
                    let value = r.judge_scores.dimensions.get(*d).copied().unwrap_or(0.0);
                    write!(md, " {value:.3} |")?;
                }
                writeln!(md, " {:.3} |", r.judge_scores.average)?;
            }
        }

        writeln!(md, "\n## Latency & Setup Cost\n")?;
        writeln!(
            md,
            "| Combo | setup_total_ms | setup_mem_mb | avg_retrieval_ms | avg_generation_ms | avg_total_ms | avg_tokens |"
        )?;
        writeln!(md, "|---|---|---|---|---|---|---|")?;
        for r in results {
            writeln!(
                md,
                "| {} | {:.1} | {:.2} | {:.1} | {:.1} | {:.1} | {:.1} |",
                r.combo(),
                r.setup_metrics.total_ms,
                r.setup_metrics.memory_peak_mb,
                r.avg_retrieval_ms,
                r.avg_generation_ms,
                r.avg_total_ms,
                r.avg_tokens
            )?;
        }

        fs::write(path, md).with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }
}

/// Console summary, quality-ranked.
pub fn print_table(results: &[ComboResult]) {
    let mut by_quality: Vec<&ComboResult> = results.iter().collect();
    by_quality.sort_by(|a, b| {
        b.judge_scores
            .average
            .partial_cmp(&a.judge_scores.average)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    println!("\n{:<30} {:>8} {:>12} {:>12}", "combo", "score", "avg_ret_ms", "avg_gen_ms");
    for r in by_quality {
        println!(
            "{:<30} {:>8.3} {:>12.1} {:>12.1}",
            r.combo(),
            r.judge_scores.average,
            r.avg_retrieval_ms,
            r.avg_generation_ms
        );
    }
}

fn csv_field(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}
