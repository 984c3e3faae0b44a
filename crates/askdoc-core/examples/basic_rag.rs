// Basic retrieval example using askdoc-core as a library
//
// Runs the chunk -> embed -> search steps over an in-process toy embedder,
// so it works without a runtime installation.

use askdoc_core::{ChunkingConfig, Document, Embedder, QueryPipeline, Result};
use async_trait::async_trait;
use std::sync::Arc;

/// Maps text to letter-frequency vectors; crude but deterministic
struct LetterFrequencyEmbedder;

#[async_trait]
impl Embedder for LetterFrequencyEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut counts = vec![0.0f32; 26];
        for c in text.chars().filter(|c| c.is_ascii_alphabetic()) {
            counts[(c.to_ascii_lowercase() as u8 - b'a') as usize] += 1.0;
        }
        Ok(counts)
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut out = Vec::with_capacity(texts.len());
        for text in texts {
            out.push(self.embed(text).await?);
        }
        Ok(out)
    }

    fn dimensions(&self) -> usize {
        26
    }

    fn model_name(&self) -> &str {
        "letter-frequency"
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    println!("Askdoc Basic Retrieval Example\n");

    let documents = vec![Document {
        path: "inline.txt".into(),
        text: "The sky is blue on clear days. Rain falls when clouds gather. \
               Snow arrives in the winter months. Deserts see almost no rain at all."
            .to_string(),
    }];

    let embedder = Arc::new(LetterFrequencyEmbedder);
    let pipeline = QueryPipeline::new(embedder.clone());

    let chunking = ChunkingConfig {
        max_words: 8,
        overlap_words: 2,
    };
    let index = pipeline.build_corpus(&documents, &chunking).await?;
    println!("Indexed {} chunks", index.len());

    let query = "when does rain fall";
    let query_embedding = embedder.embed(query).await?;
    for hit in index.search(&query_embedding, 3)? {
        let chunk = index.chunk(hit.chunk_index).expect("hit maps to a chunk");
        println!("  [{:>5.3}] {}", hit.score, chunk.text);
    }

    Ok(())
}
