// ABOUTME: Azure AI Vision Read API client for receipt image OCR
// ABOUTME: Submits an analyze job and polls the operation until the text is ready
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use super::ReceiptOcr;
use crate::errors::UpstreamError;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

/// Read API version path segment
const READ_ANALYZE_PATH: &str = "vision/v3.2/read/analyze";

/// Delay between polls of the read operation
const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Maximum number of polls before giving up
const MAX_POLL_ATTEMPTS: u32 = 30;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReadOperation {
    status: String,
    analyze_result: Option<AnalyzeResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeResult {
    read_results: Vec<ReadResult>,
}

#[derive(Debug, Deserialize)]
struct ReadResult {
    lines: Vec<ReadLine>,
}

#[derive(Debug, Deserialize)]
struct ReadLine {
    text: String,
}

/// Azure AI Vision Read client
///
/// Uses the asynchronous Read 3.2 API: the image is submitted for analysis
/// and the result is fetched by polling the returned operation URL.
pub struct AzureReadClient {
    key: String,
    endpoint: String,
    client: Client,
}

impl AzureReadClient {
    /// Create a client for an Azure Vision resource
    #[must_use]
    pub fn new(key: impl Into<String>, endpoint: impl Into<String>) -> Self {
        let endpoint = endpoint.into().trim_end_matches('/').to_owned();
        Self {
            key: key.into(),
            endpoint,
            client: Client::new(),
        }
    }

    fn analyze_url(&self) -> String {
        format!("{}/{READ_ANALYZE_PATH}", self.endpoint)
    }

    async fn submit(&self, image: &[u8]) -> Result<String, UpstreamError> {
        let response = self
            .client
            .post(self.analyze_url())
            .header("Ocp-Apim-Subscription-Key", &self.key)
            .header("Content-Type", "application/octet-stream")
            .body(image.to_vec())
            .send()
            .await
            .map_err(|e| UpstreamError::OcrUnavailable(format!("analyze request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::OcrUnavailable(format!(
                "Read API returned status {status}"
            )));
        }

        response
            .headers()
            .get("Operation-Location")
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned)
            .ok_or_else(|| {
                UpstreamError::OcrUnavailable("missing Operation-Location header".into())
            })
    }

    async fn poll(&self, operation_url: &str) -> Result<AnalyzeResult, UpstreamError> {
        for attempt in 0..MAX_POLL_ATTEMPTS {
            tokio::time::sleep(POLL_INTERVAL).await;

            let response = self
                .client
                .get(operation_url)
                .header("Ocp-Apim-Subscription-Key", &self.key)
                .send()
                .await
                .map_err(|e| UpstreamError::OcrUnavailable(format!("poll request failed: {e}")))?;

            let operation: ReadOperation = response.json().await.map_err(|e| {
                UpstreamError::OcrUnavailable(format!("unparseable read operation: {e}"))
            })?;

            debug!(attempt, status = %operation.status, "Polled Azure read operation");

            match operation.status.as_str() {
                "succeeded" => {
                    return operation.analyze_result.ok_or_else(|| {
                        UpstreamError::OcrUnavailable("succeeded operation had no result".into())
                    });
                }
                "notStarted" | "running" => {}
                other => {
                    warn!(status = %other, "Azure read operation did not succeed");
                    return Err(UpstreamError::OcrUnavailable(format!(
                        "read operation ended with status {other}"
                    )));
                }
            }
        }

        Err(UpstreamError::OcrUnavailable(
            "read operation timed out".into(),
        ))
    }
}

#[async_trait]
impl ReceiptOcr for AzureReadClient {
    async fn read_text(&self, image: &[u8]) -> Result<Vec<String>, UpstreamError> {
        let operation_url = self.submit(image).await?;
        let result = self.poll(&operation_url).await?;

        Ok(result
            .read_results
            .into_iter()
            .flat_map(|page| page.lines)
            .map(|line| line.text)
            .collect())
    }

    fn name(&self) -> &str {
        "azure-read"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_url_strips_trailing_slash() {
        let client = AzureReadClient::new("key", "https://example.cognitiveservices.azure.com/");
        assert_eq!(
            client.analyze_url(),
            "https://example.cognitiveservices.azure.com/vision/v3.2/read/analyze"
        );
    }

    #[test]
    fn test_operation_parsing_collects_line_text() {
        let body = r#"{
            "status": "succeeded",
            "analyzeResult": {
                "readResults": [
                    {"lines": [{"text": "Bananas"}, {"text": "TOTAL 12.50"}]},
                    {"lines": [{"text": "Milk"}]}
                ]
            }
        }"#;
        let operation: ReadOperation = serde_json::from_str(body).unwrap();
        assert_eq!(operation.status, "succeeded");
        let lines: Vec<String> = operation
            .analyze_result
            .unwrap()
            .read_results
            .into_iter()
            .flat_map(|page| page.lines)
            .map(|line| line.text)
            .collect();
        assert_eq!(lines, vec!["Bananas", "TOTAL 12.50", "Milk"]);
    }
}
