//! Corpus construction: chunking and the embedding index

pub mod chunker;
pub mod corpus;

pub use chunker::{split, split_sentences, Chunk, DEFAULT_MAX_WORDS, DEFAULT_OVERLAP_WORDS};
pub use corpus::{cosine_similarity, CorpusIndex, SearchHit};
