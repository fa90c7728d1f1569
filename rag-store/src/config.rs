//! Runtime index and retrieval configuration.

use serde::Serialize;

use crate::errors::RagError;

/// Distance function used to rank stored vectors. Lower is closer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceKind {
    /// `1 - cos(a, b)`.
    Cosine,
    /// Negated dot product (useful for normalized vectors).
    Dot,
    /// Euclidean distance (L2), the flat-index default.
    Euclid,
}

impl DistanceKind {
    /// Parses a metric name (case-insensitive).
    pub fn parse(s: &str) -> Result<Self, RagError> {
        match s.trim().to_lowercase().as_str() {
            "cosine" => Ok(Self::Cosine),
            "dot" | "dotproduct" => Ok(Self::Dot),
            "euclid" | "l2" => Ok(Self::Euclid),
            other => Err(RagError::Config(format!("unknown distance '{other}'"))),
        }
    }

    /// Distance between two vectors of equal length.
    pub fn distance(&self, a: &[f32], b: &[f32]) -> f32 {
        match self {
            Self::Euclid => a
                .iter()
                .zip(b)
                .map(|(x, y)| (x - y) * (x - y))
                .sum::<f32>()
                .sqrt(),
            Self::Dot => -dot(a, b),
            Self::Cosine => {
                let na = dot(a, a).sqrt();
                let nb = dot(b, b).sqrt();
                if na == 0.0 || nb == 0.0 {
                    1.0
                } else {
                    1.0 - dot(a, b) / (na * nb)
                }
            }
        }
    }
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Configuration for index construction and retrieval.
#[derive(Clone, Debug)]
pub struct RagConfig {
    /// Chunks returned per query.
    pub top_k: usize,
    /// Distance function.
    pub distance: DistanceKind,
    /// Texts per embedding request.
    pub embed_batch: usize,
    /// Embedding requests in flight.
    pub concurrency: usize,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            top_k: 4,
            distance: DistanceKind::Euclid,
            embed_batch: 64,
            concurrency: 4,
        }
    }
}

impl RagConfig {
    /// Reads `RAG_TOP_K`, `RAG_DISTANCE`, `EMBEDDING_BATCH_SIZE` and
    /// `EMBEDDING_CONCURRENCY`, keeping defaults for unset variables.
    pub fn from_env() -> Result<Self, RagError> {
        let d = Self::default();
        let cfg = Self {
            top_k: env_usize("RAG_TOP_K", d.top_k)?,
            distance: match std::env::var("RAG_DISTANCE") {
                Ok(v) if !v.trim().is_empty() => DistanceKind::parse(&v)?,
                _ => d.distance,
            },
            embed_batch: env_usize("EMBEDDING_BATCH_SIZE", d.embed_batch)?,
            concurrency: env_usize("EMBEDDING_CONCURRENCY", d.concurrency)?,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Validates config values.
    pub fn validate(&self) -> Result<(), RagError> {
        if self.top_k == 0 {
            return Err(RagError::Config("top_k must be > 0".into()));
        }
        if self.embed_batch == 0 {
            return Err(RagError::Config("embed_batch must be > 0".into()));
        }
        if self.concurrency == 0 {
            return Err(RagError::Config("concurrency must be > 0".into()));
        }
        Ok(())
    }
}

fn env_usize(key: &str, default: usize) -> Result<usize, RagError> {
    match std::env::var(key) {
        Ok(v) if !v.trim().is_empty() => v
            .trim()
            .parse::<usize>()
            .map_err(|_| RagError::Config(format!("{key} must be a positive integer, got '{v}'"))),
        _ => Ok(default),
    }
}
