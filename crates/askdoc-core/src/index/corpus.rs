//! In-memory corpus index with cosine-similarity retrieval

use crate::error::{AskDocError, Result};
use crate::index::chunker::Chunk;
use crate::llm::Embedder;

/// A retrieval hit: chunk position plus similarity score
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub chunk_index: usize,
    pub score: f32,
}

/// The ordered chunk sequence paired 1:1 with embedding vectors.
///
/// Built once per run, read-only afterwards. Vector `i` embeds
/// `chunks[i].text`; chunk order is insertion order and only matters for
/// mapping hit indices back to text.
#[derive(Debug, Default)]
pub struct CorpusIndex {
    chunks: Vec<Chunk>,
    embeddings: Vec<Vec<f32>>,
}

impl CorpusIndex {
    /// Embed all chunks and build the index
    pub async fn build(chunks: Vec<Chunk>, embedder: &dyn Embedder) -> Result<Self> {
        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        tracing::info!("Embedding {} chunks", texts.len());

        let embeddings = embedder.embed_batch(&texts).await?;
        if embeddings.len() != chunks.len() {
            return Err(AskDocError::Parse(format!(
                "Embedding provider returned {} vectors for {} chunks",
                embeddings.len(),
                chunks.len()
            )));
        }

        Ok(Self { chunks, embeddings })
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Get a chunk by position
    pub fn chunk(&self, index: usize) -> Option<&Chunk> {
        self.chunks.get(index)
    }

    /// Rank all chunks against a query vector, best first.
    ///
    /// Ties are broken by lowest chunk index so results are reproducible.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<SearchHit>> {
        if self.chunks.is_empty() {
            return Err(AskDocError::EmptyCorpus);
        }

        let mut scored: Vec<SearchHit> = self
            .embeddings
            .iter()
            .enumerate()
            .map(|(chunk_index, embedding)| SearchHit {
                chunk_index,
                score: cosine_similarity(query, embedding),
            })
            .collect();

        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.chunk_index.cmp(&b.chunk_index))
        });

        scored.truncate(k);
        Ok(scored)
    }
}

/// Cosine similarity between two vectors.
///
/// Zero vectors and length mismatches score 0.0 so ranking stays total
/// (no NaN).
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}
