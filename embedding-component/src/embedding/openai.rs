//! OpenAI-compatible `/embeddings` wire format over blocking HTTP.

use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    index: usize,
}

pub(crate) fn build_agent(timeout_secs: u64) -> ureq::Agent {
    ureq::AgentBuilder::new()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
}

/// POST `texts` to `url` and return one embedding per input, in input order.
pub(crate) fn request_embeddings(
    agent: &ureq::Agent,
    url: &str,
    api_key: Option<&str>,
    model: &str,
    texts: &[String],
) -> Result<Vec<Vec<f32>>, String> {
    let mut request = agent.post(url).set("Content-Type", "application/json");
    if let Some(key) = api_key {
        request = request.set("Authorization", &format!("Bearer {key}"));
    }

    log::debug!("Sending embedding request to {url} for {} texts", texts.len());

    let response = match request.send_json(EmbeddingRequest { model, input: texts }) {
        Ok(response) => response,
        Err(ureq::Error::Status(code, response)) => {
            let body = response.into_string().unwrap_or_default();
            return Err(format!("{url} returned HTTP {code}: {body}"));
        }
        Err(e) => return Err(format!("request to {url} failed: {e}")),
    };

    let parsed: EmbeddingResponse = response
        .into_json()
        .map_err(|e| format!("invalid response from {url}: {e}"))?;

    into_ordered(parsed, texts.len())
}

fn into_ordered(response: EmbeddingResponse, expected: usize) -> Result<Vec<Vec<f32>>, String> {
    if response.data.len() != expected {
        return Err(format!(
            "expected {expected} embeddings, got {}",
            response.data.len()
        ));
    }

    let mut data = response.data;
    data.sort_by_key(|d| d.index);

    // Each input position must be answered exactly once.
    if let Some((position, d)) = data.iter().enumerate().find(|(i, d)| d.index != *i) {
        return Err(format!(
            "embedding indices do not cover inputs 0..{expected}: found index {} at position {position}",
            d.index
        ));
    }

    Ok(data.into_iter().map(|d| d.embedding).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serialization() {
        let input = vec!["a".to_string(), "b".to_string()];
        let json = serde_json::to_string(&EmbeddingRequest {
            model: "m1",
            input: &input,
        })
        .unwrap();
        assert_eq!(json, r#"{"model":"m1","input":["a","b"]}"#);
    }

    #[test]
    fn test_response_reordered_by_index() {
        let response: EmbeddingResponse = serde_json::from_str(
            r#"{"object":"list","data":[
                {"object":"embedding","embedding":[2.0],"index":1},
                {"object":"embedding","embedding":[1.0],"index":0}
            ],"model":"m1"}"#,
        )
        .unwrap();

        let ordered = into_ordered(response, 2).unwrap();
        assert_eq!(ordered, vec![vec![1.0], vec![2.0]]);
    }

    #[test]
    fn test_response_count_mismatch() {
        let response: EmbeddingResponse =
            serde_json::from_str(r#"{"data":[{"embedding":[1.0],"index":0}]}"#).unwrap();
        assert!(into_ordered(response, 3).is_err());
    }

    #[test]
    fn test_response_duplicate_index() {
        let response: EmbeddingResponse = serde_json::from_str(
            r#"{"data":[{"embedding":[1.0],"index":0},{"embedding":[2.0],"index":0}]}"#,
        )
        .unwrap();
        let err = into_ordered(response, 2).unwrap_err();
        assert!(err.contains("index 0 at position 1"));
    }

    #[test]
    fn test_response_index_out_of_range() {
        let response: EmbeddingResponse = serde_json::from_str(
            r#"{"data":[{"embedding":[1.0],"index":0},{"embedding":[2.0],"index":2}]}"#,
        )
        .unwrap();
        assert!(into_ordered(response, 2).is_err());
    }
}
