use async_trait::async_trait;
use log::warn;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use telemetry::Measure;

use crate::error::DelegationFailure;
use crate::{Analysis, Analyzer, ConfidenceScores, DelegationConfig, Sentiment};

lazy_static! {
    static ref ANALYZE_MEASURE: Measure = Measure::new("analyzer", "analyze");
}

const KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";
const DOCUMENT_ID: &str = "1";

#[derive(Debug, Serialize)]
struct Document<'a> {
    id: &'a str,
    language: &'a str,
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct AnalyzeRequest<'a> {
    documents: [Document<'a>; 1],
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

#[derive(Debug, Deserialize)]
struct DocumentError {
    id: String,
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
#[serde(bound = "T: DeserializeOwned")]
struct AnalyzeResponse<T> {
    #[serde(default)]
    documents: Vec<T>,
    #[serde(default)]
    errors: Vec<DocumentError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SentimentDocument {
    id: String,
    sentiment: Sentiment,
    confidence_scores: Option<ConfidenceScores>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct KeyPhraseDocument {
    id: String,
    key_phrases: Vec<String>,
}

trait Identified {
    fn id(&self) -> &str;
}

impl Identified for SentimentDocument {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Identified for KeyPhraseDocument {
    fn id(&self) -> &str {
        &self.id
    }
}

impl<T: Identified> AnalyzeResponse<T> {
    fn into_document(self) -> Result<T, DelegationFailure> {
        if let Some(doc) = self.documents.into_iter().find(|d| d.id() == DOCUMENT_ID) {
            return Ok(doc);
        }
        let message = self
            .errors
            .into_iter()
            .find(|e| e.id == DOCUMENT_ID)
            .map(|e| e.error.message)
            .unwrap_or_else(|| "Document missing from response".to_string());
        Err(DelegationFailure::ServiceError(message))
    }
}

/// Client for an Azure-style text analytics REST API
pub struct LanguageClient {
    sentiment_url: String,
    key_phrases_url: String,
    access_key: String,
    client: reqwest::Client,
}

impl LanguageClient {
    pub fn new(client: reqwest::Client, config: &DelegationConfig) -> LanguageClient {
        let base = config.endpoint.trim_end_matches('/');
        LanguageClient {
            sentiment_url: format!("{}/text/analytics/v3.1/sentiment", base),
            key_phrases_url: format!("{}/text/analytics/v3.1/keyPhrases", base),
            access_key: config.access_key.clone(),
            client,
        }
    }

    async fn post<T>(&self, url: &str, text: &str) -> Result<T, DelegationFailure>
    where
        T: DeserializeOwned + Identified,
    {
        let request = AnalyzeRequest {
            documents: [Document {
                id: DOCUMENT_ID,
                language: "en",
                text,
            }],
        };

        let response = self
            .client
            .post(url)
            .header(KEY_HEADER, &self.access_key)
            .json(&request)
            .send()
            .await?;

        if let Some(failure) = DelegationFailure::from_status(response.status()) {
            return Err(failure);
        }

        response
            .json::<AnalyzeResponse<T>>()
            .await?
            .into_document()
    }

    pub async fn sentiment(
        &self,
        text: &str,
    ) -> Result<(Sentiment, Option<ConfidenceScores>), DelegationFailure> {
        let doc: SentimentDocument = self.post(&self.sentiment_url, text).await?;
        Ok((doc.sentiment, doc.confidence_scores))
    }

    pub async fn key_phrases(&self, text: &str) -> Result<Vec<String>, DelegationFailure> {
        let doc: KeyPhraseDocument = self.post(&self.key_phrases_url, text).await?;
        Ok(doc.key_phrases)
    }
}

#[async_trait]
impl Analyzer for LanguageClient {
    async fn analyze(&self, text: &str) -> Result<Analysis, DelegationFailure> {
        ANALYZE_MEASURE
            .stats(async move {
                let (sentiment, confidence) = self.sentiment(text).await?;

                // Key phrases are optional decoration on a sentiment result
                let key_phrases = match self.key_phrases(text).await {
                    Ok(phrases) => phrases,
                    Err(e) => {
                        warn!("Key phrase extraction failed: {}", e);
                        Vec::new()
                    }
                };

                Ok(Analysis {
                    sentiment,
                    confidence,
                    key_phrases,
                })
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;
    use std::time::Duration;

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    use super::*;

    const SENTIMENT_BODY: &str = r#"{"documents":[{"id":"1","sentiment":"positive","confidenceScores":{"positive":0.9,"neutral":0.08,"negative":0.02},"sentences":[],"warnings":[]}],"errors":[],"modelVersion":"2022-11-01"}"#;
    const KEY_PHRASE_BODY: &str =
        r#"{"documents":[{"id":"1","keyPhrases":["simple bot","weather"],"warnings":[]}],"errors":[]}"#;

    fn http_response(status: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        )
    }

    /// Reads the head and the `content-length` body of one request
    async fn read_request(socket: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = socket.read(&mut chunk).await.unwrap_or(0);
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);

            let text = String::from_utf8_lossy(&buf);
            if let Some(end) = text.find("\r\n\r\n") {
                let length = text[..end]
                    .lines()
                    .filter_map(|line| line.split_once(':'))
                    .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
                    .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buf.len() >= end + 4 + length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).to_string()
    }

    /// Serves canned responses, choosing by request path
    async fn serve<F>(respond: F) -> Result<String, Box<dyn Error>>
    where
        F: Fn(&str) -> Option<String> + Send + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((mut socket, _)) = listener.accept().await {
                let request = read_request(&mut socket).await;
                match respond(&request) {
                    Some(response) => {
                        let _ = socket.write_all(response.as_bytes()).await;
                    }
                    // Never answer
                    None => held.push(socket),
                }
            }
        });

        Ok(format!("http://{}", addr))
    }

    fn client(endpoint: String) -> Result<LanguageClient, Box<dyn Error>> {
        let http = reqwest::ClientBuilder::new()
            .timeout(Duration::from_millis(200))
            .build()?;

        Ok(LanguageClient::new(
            http,
            &DelegationConfig {
                endpoint,
                access_key: "secret".to_string(),
                timeout: Duration::from_millis(200),
            },
        ))
    }

    #[test]
    fn test_into_document() -> Result<(), Box<dyn Error>> {
        let response: AnalyzeResponse<SentimentDocument> = serde_json::from_str(SENTIMENT_BODY)?;
        let doc = response.into_document()?;
        assert_eq!(doc.sentiment, Sentiment::Positive);
        assert_eq!(
            doc.confidence_scores,
            Some(ConfidenceScores {
                positive: 0.9,
                neutral: 0.08,
                negative: 0.02
            })
        );

        let response: AnalyzeResponse<KeyPhraseDocument> = serde_json::from_str(
            r#"{"documents":[],"errors":[{"id":"1","error":{"code":"InvalidArgument","message":"Document text is empty."}}]}"#,
        )?;
        assert_eq!(
            response.into_document().unwrap_err(),
            DelegationFailure::ServiceError("Document text is empty.".to_string())
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_analyze() -> Result<(), Box<dyn Error>> {
        let endpoint = serve(|request| {
            assert!(request.to_ascii_lowercase().contains("ocp-apim-subscription-key: secret"));
            if request.starts_with("POST /text/analytics/v3.1/sentiment ") {
                Some(http_response("200 OK", SENTIMENT_BODY))
            } else {
                Some(http_response("200 OK", KEY_PHRASE_BODY))
            }
        })
        .await?;

        let analysis = client(format!("{}/", endpoint))?.analyze("hello").await?;
        assert_eq!(analysis.sentiment, Sentiment::Positive);
        assert_eq!(analysis.key_phrases, vec!["simple bot", "weather"]);
        Ok(())
    }

    #[tokio::test]
    async fn test_key_phrase_failure_tolerated() -> Result<(), Box<dyn Error>> {
        let endpoint = serve(|request| {
            if request.starts_with("POST /text/analytics/v3.1/sentiment ") {
                Some(http_response("200 OK", SENTIMENT_BODY))
            } else {
                Some(http_response("500 Internal Server Error", "{}"))
            }
        })
        .await?;

        let analysis = client(endpoint)?.analyze("hello").await?;
        assert_eq!(analysis.sentiment, Sentiment::Positive);
        assert!(analysis.key_phrases.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_auth_error() -> Result<(), Box<dyn Error>> {
        let endpoint = serve(|_| Some(http_response("401 Unauthorized", "{}"))).await?;

        let result = client(endpoint)?.analyze("hello").await;
        assert_eq!(result.unwrap_err(), DelegationFailure::AuthError);
        Ok(())
    }

    #[tokio::test]
    async fn test_timeout() -> Result<(), Box<dyn Error>> {
        let endpoint = serve(|_| None).await?;

        let result = client(endpoint)?.analyze("hello").await;
        assert_eq!(result.unwrap_err(), DelegationFailure::Timeout);
        Ok(())
    }

    #[tokio::test]
    async fn test_service_error() -> Result<(), Box<dyn Error>> {
        let endpoint = serve(|_| Some(http_response("200 OK", "not json"))).await?;

        match client(endpoint)?.analyze("hello").await {
            Err(DelegationFailure::ServiceError(_)) => (),
            r => panic!("{:?} doesn't match", r),
        }
        Ok(())
    }
}
