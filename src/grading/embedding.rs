use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;

use super::{Grader, Scored};
use crate::error::{EngineError, Result};

/// Boundary contract for the embedding provider: one fixed-length vector
/// per input string.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f64>>>;
}

/// OpenAI embeddings API client.
pub struct OpenAiEmbeddings {
    client: Client,
    api_key: String,
    model: String,
}

impl OpenAiEmbeddings {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            model: "text-embedding-3-small".to_string(),
        }
    }

    pub fn with_model(api_key: String, model: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            model,
        }
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbeddings {
    async fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f64>>> {
        let request_body = serde_json::json!({
            "model": self.model,
            "input": texts,
        });

        let response = self
            .client
            .post("https://api.openai.com/v1/embeddings")
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request_body)
            .send()
            .await
            .map_err(|e| EngineError::GradingProvider(format!("Embedding request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(EngineError::GradingProvider(format!(
                "Embedding API error: {}",
                response.status()
            )));
        }

        let response_json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| EngineError::GradingProvider(format!("Failed to parse embedding response: {}", e)))?;

        let data = response_json["data"]
            .as_array()
            .ok_or_else(|| EngineError::GradingProvider("No data in embedding response".to_string()))?;

        let mut vectors = Vec::with_capacity(data.len());
        for item in data {
            let vector = item["embedding"]
                .as_array()
                .ok_or_else(|| {
                    EngineError::GradingProvider("Missing embedding vector in response".to_string())
                })?
                .iter()
                .filter_map(|v| v.as_f64())
                .collect();
            vectors.push(vector);
        }

        if vectors.len() != texts.len() {
            return Err(EngineError::GradingProvider(format!(
                "Expected {} embedding vectors, got {}",
                texts.len(),
                vectors.len()
            )));
        }

        Ok(vectors)
    }
}

/// Cosine similarity between two vectors. Zero when either vector has zero
/// magnitude.
pub fn cosine_similarity(u: &[f64], v: &[f64]) -> f64 {
    let dot: f64 = u.iter().zip(v).map(|(a, b)| a * b).sum();
    let mag_u = u.iter().map(|a| a * a).sum::<f64>().sqrt();
    let mag_v = v.iter().map(|b| b * b).sum::<f64>().sqrt();
    if mag_u == 0.0 || mag_v == 0.0 {
        return 0.0;
    }
    dot / (mag_u * mag_v)
}

/// Vector-embedding grading: embed answer and reference, score the rounded
/// cosine similarity. Provider failures surface as `GradingProvider` so a
/// composing grader can fall back per answer.
pub struct EmbeddingGrader {
    provider: Arc<dyn EmbeddingProvider>,
}

impl EmbeddingGrader {
    pub fn new(provider: Arc<dyn EmbeddingProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl Grader for EmbeddingGrader {
    async fn grade(&self, answer: &str, reference: &str) -> Result<Scored> {
        let vectors = self.provider.embed(&[answer, reference]).await?;
        let [u, v] = vectors.as_slice() else {
            return Err(EngineError::GradingProvider(
                "Embedding provider returned the wrong number of vectors".to_string(),
            ));
        };
        Ok(Scored::from_similarity(cosine_similarity(u, v)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grading::Grade;

    struct FixedProvider {
        vectors: Vec<Vec<f64>>,
    }

    #[async_trait]
    impl EmbeddingProvider for FixedProvider {
        async fn embed(&self, _texts: &[&str]) -> Result<Vec<Vec<f64>>> {
            Ok(self.vectors.clone())
        }
    }

    #[test]
    fn cosine_of_identical_vectors_is_one() {
        let v = [0.5, 0.2, 0.1];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn cosine_of_orthogonal_vectors_is_zero() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
    }

    #[test]
    fn zero_magnitude_vector_yields_zero() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    }

    #[tokio::test]
    async fn identical_embeddings_grade_a() {
        let grader = EmbeddingGrader::new(Arc::new(FixedProvider {
            vectors: vec![vec![1.0, 2.0, 3.0], vec![1.0, 2.0, 3.0]],
        }));
        let scored = grader.grade("a", "b").await.unwrap();
        assert_eq!(scored.score, 100);
        assert_eq!(scored.grade, Grade::A);
    }

    #[tokio::test]
    async fn opposite_embeddings_clamp_to_zero() {
        let grader = EmbeddingGrader::new(Arc::new(FixedProvider {
            vectors: vec![vec![1.0, 0.0], vec![-1.0, 0.0]],
        }));
        let scored = grader.grade("a", "b").await.unwrap();
        assert_eq!(scored.score, 0);
        assert_eq!(scored.grade, Grade::F);
    }

    #[tokio::test]
    async fn zero_vector_scores_zero() {
        let grader = EmbeddingGrader::new(Arc::new(FixedProvider {
            vectors: vec![vec![0.0, 0.0], vec![1.0, 1.0]],
        }));
        let scored = grader.grade("a", "b").await.unwrap();
        assert_eq!(scored.score, 0);
    }
}
