//! Deterministic hashing embedder used by the local store.
//!
//! Words and character trigrams are hashed into a fixed number of buckets and the
//! resulting vector is L2-normalised. It only needs to be stable across runs so that
//! stored vectors and query vectors are comparable.

use crate::constants::LOCAL_EMBEDDING_DIM;
use crate::settings::DistanceMetric;

const NGRAM_SIZE: usize = 3;
const NGRAM_WEIGHT: f32 = 0.5;
const POSITION_WEIGHT: f32 = 0.3;

/// Token and n-gram hashing embedder.
#[derive(Debug, Clone, Copy)]
pub struct HashingEmbedder {
    dimension: usize,
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self {
            dimension: LOCAL_EMBEDDING_DIM,
        }
    }
}

impl HashingEmbedder {
    pub fn embed(&self, text: &str) -> Vec<f32> {
        let mut embedding = vec![0.0f32; self.dimension];
        let lowered = text.to_lowercase();

        let tokens: Vec<&str> = lowered
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
            .collect();
        let total = tokens.len();
        for (pos, token) in tokens.iter().enumerate() {
            let idx = (fnv1a(token) % self.dimension as u64) as usize;
            embedding[idx] += position_weight(pos, total);
        }

        let chars: Vec<char> = lowered.chars().collect();
        for window in chars.windows(NGRAM_SIZE) {
            let ngram: String = window.iter().collect();
            let idx = (fnv1a(&ngram) % self.dimension as u64) as usize;
            embedding[idx] += NGRAM_WEIGHT;
        }

        let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in &mut embedding {
                *x /= norm;
            }
        }
        embedding
    }
}

/// Distance between two vectors under the given metric. Smaller is closer.
pub fn distance(metric: DistanceMetric, a: &[f32], b: &[f32]) -> f32 {
    match metric {
        DistanceMetric::L2 => a
            .iter()
            .zip(b)
            .map(|(x, y)| (x - y) * (x - y))
            .sum(),
        DistanceMetric::Ip => 1.0 - dot(a, b),
        DistanceMetric::Cosine => {
            let norm_a = dot(a, a).sqrt();
            let norm_b = dot(b, b).sqrt();
            if norm_a == 0.0 || norm_b == 0.0 {
                1.0
            } else {
                1.0 - dot(a, b) / (norm_a * norm_b)
            }
        }
    }
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn position_weight(position: usize, total: usize) -> f32 {
    let normalized_pos = position as f32 / total as f32;
    1.0 + (POSITION_WEIGHT * (1.0 - normalized_pos))
}

fn fnv1a(s: &str) -> u64 {
    let mut hash: u64 = 0xcbf29ce484222325;
    for byte in s.as_bytes() {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(0x100000001b3);
    }
    hash
}
