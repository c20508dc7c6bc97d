//! Evaluation client implementation.

use async_trait::async_trait;
use bytes::Bytes;
use http::{Method, StatusCode};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use url::Url;
use wings_core::ResolutionError;

use crate::retry::{AttemptError, retry};
use crate::{
    ClientConfig, EvaluationError, EvaluationRequest, EvaluationResponse, Request, Response,
    Result,
};

/// Performs one flag evaluation round trip.
///
/// The seam between the provider facade and the wire client.
#[async_trait]
pub trait Evaluator: Send + Sync {
    /// Evaluate `request` against the endpoint at `path`.
    async fn evaluate(
        &self,
        cancel: &CancellationToken,
        path: &str,
        method: Method,
        request: &EvaluationRequest<'_>,
    ) -> Result<EvaluationResponse>;
}

/// HTTP evaluation client with constant-backoff retry.
///
/// Cheap to clone; clones share configuration and transport.
#[derive(Debug, Clone)]
pub struct EvaluationClient {
    config: Arc<ClientConfig>,
}

impl EvaluationClient {
    /// Create a new evaluation client with the given configuration.
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Create a client for `host` with default settings.
    pub fn for_host(host: impl Into<String>) -> Result<Self> {
        Ok(Self::new(ClientConfig::builder(host).build()?))
    }

    /// Get the client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Send one attempt and classify its outcome.
    async fn attempt(
        &self,
        method: &Method,
        url: &Url,
        body: &Bytes,
        attempt: u32,
    ) -> std::result::Result<EvaluationResponse, AttemptError> {
        let request = Request::new(method.clone(), url.clone())
            .headers(self.config.default_headers())
            .json_bytes(body.clone());

        debug!(attempt, method = %method, url = %url, "Sending evaluation request");

        let response = self
            .config
            .transport()
            .send(request)
            .await
            .map_err(classify_send_failure)?;

        classify(response)
    }
}

/// A send failure is permanent only if a 4xx status was already received.
fn classify_send_failure(error: EvaluationError) -> AttemptError {
    match error.status_code() {
        Some(status) if (400..500).contains(&status) => AttemptError::Permanent(error),
        _ => AttemptError::Retryable(error),
    }
}

/// Map a response onto a decoded result or a tagged failure.
fn classify(response: Response) -> std::result::Result<EvaluationResponse, AttemptError> {
    let status = response.status();
    if status == StatusCode::OK {
        return response.json().map_err(AttemptError::Permanent);
    }

    let error = EvaluationError::Resolution(resolution_error(status, response.text()));
    if status.is_client_error() {
        Err(AttemptError::Permanent(error))
    } else {
        Err(AttemptError::Retryable(error))
    }
}

/// Classify a non-200 status, carrying the response body as the message.
fn resolution_error(status: StatusCode, body: String) -> ResolutionError {
    match status {
        StatusCode::BAD_REQUEST => ResolutionError::invalid_context(body),
        StatusCode::NOT_FOUND => ResolutionError::flag_not_found(body),
        _ => ResolutionError::general(body),
    }
}

#[async_trait]
impl Evaluator for EvaluationClient {
    async fn evaluate(
        &self,
        cancel: &CancellationToken,
        path: &str,
        method: Method,
        request: &EvaluationRequest<'_>,
    ) -> Result<EvaluationResponse> {
        if request.id().is_empty() {
            return Err(EvaluationError::InvalidRequest(
                "flag id must be non-empty".to_string(),
            ));
        }

        let body = Bytes::from(serde_json::to_vec(request)?);
        let url = self.config.endpoint(path);

        let result = retry(self.config.retry(), cancel, |attempt| {
            self.attempt(&method, &url, &body, attempt)
        })
        .await;

        if let Err(e) = &result {
            warn!(flag = request.id(), path, error = %e, "Flag evaluation failed");
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Transport;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;
    use tokio::time::Instant;
    use wings_core::{ErrorKind, FlattenedContext};

    /// Scripted outcome for one send.
    enum Step {
        Respond(u16, &'static str),
        Fail,
        BodyFail(u16),
        Hang,
    }

    /// In-memory transport replaying a script and recording requests.
    #[derive(Default)]
    struct ScriptedTransport {
        steps: Mutex<VecDeque<Step>>,
        sent: Mutex<Vec<(Instant, Request)>>,
    }

    impl std::fmt::Debug for ScriptedTransport {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("ScriptedTransport")
        }
    }

    impl ScriptedTransport {
        fn new(steps: Vec<Step>) -> Arc<Self> {
            Arc::new(Self {
                steps: Mutex::new(steps.into()),
                sent: Mutex::default(),
            })
        }

        fn calls(&self) -> usize {
            self.sent.lock().unwrap().len()
        }

        fn sent_at(&self) -> Vec<Instant> {
            self.sent.lock().unwrap().iter().map(|(at, _)| *at).collect()
        }

        fn last_request(&self) -> Request {
            self.sent.lock().unwrap().last().unwrap().1.clone()
        }
    }

    #[async_trait]
    impl Transport for ScriptedTransport {
        async fn send(&self, request: Request) -> Result<Response> {
            self.sent.lock().unwrap().push((Instant::now(), request));
            let step = self
                .steps
                .lock()
                .unwrap()
                .pop_front()
                .expect("transport called more often than scripted");

            match step {
                Step::Respond(status, body) => {
                    Ok(Response::new(StatusCode::from_u16(status).unwrap(), body))
                }
                Step::Fail => Err(EvaluationError::Connection("connection reset".to_string())),
                Step::BodyFail(status) => Err(EvaluationError::BodyRead {
                    status,
                    message: "connection closed mid-body".to_string(),
                }),
                Step::Hang => std::future::pending().await,
            }
        }
    }

    fn client(transport: Arc<ScriptedTransport>, max_retries: u32) -> EvaluationClient {
        let config = ClientConfig::builder("http://flags.example.com")
            .transport(transport)
            .max_retries(max_retries)
            .retry_interval(Duration::from_millis(100))
            .build()
            .unwrap();
        EvaluationClient::new(config)
    }

    async fn evaluate(client: &EvaluationClient, path: &str) -> Result<EvaluationResponse> {
        let meta = FlattenedContext::from([("region".to_string(), json!("eu"))]);
        client
            .evaluate(
                &CancellationToken::new(),
                path,
                Method::POST,
                &EvaluationRequest::new("new-ui", &meta),
            )
            .await
    }

    fn resolution_kind(result: Result<EvaluationResponse>) -> ErrorKind {
        match result {
            Err(EvaluationError::Resolution(e)) => e.kind(),
            other => panic!("expected resolution error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_success_builds_https_request() {
        let transport = ScriptedTransport::new(vec![Step::Respond(
            200,
            r#"{"variant":"on","bool":{"value":true}}"#,
        )]);
        let client = client(transport.clone(), 3);

        let res = evaluate(&client, "/bool:evaluate").await.unwrap();
        assert_eq!(res.variant, "on");
        assert_eq!(res.bool_value(), Some(true));

        let sent = transport.last_request();
        assert_eq!(sent.method(), Method::POST);
        assert_eq!(sent.url().as_str(), "https://flags.example.com/bool:evaluate");
        assert_eq!(
            serde_json::from_slice::<serde_json::Value>(sent.body()).unwrap(),
            json!({"id": "new-ui", "meta": {"region": "eu"}})
        );
        assert!(sent.headers_ref().get("x-api-key").is_none());
    }

    #[tokio::test]
    async fn test_credentials_are_sent() {
        let transport = ScriptedTransport::new(vec![Step::Respond(
            200,
            r#"{"variant":"a","string":{"value":"x"}}"#,
        )]);
        let config = ClientConfig::builder("flags.example.com")
            .transport(transport.clone())
            .credentials(crate::Credentials::new("key", "key-id"))
            .build()
            .unwrap();

        evaluate(&EvaluationClient::new(config), "/string:evaluate")
            .await
            .unwrap();

        let sent = transport.last_request();
        assert_eq!(sent.headers_ref().get("x-api-key").unwrap(), "key");
        assert_eq!(sent.headers_ref().get("x-api-key-id").unwrap(), "key-id");
    }

    #[tokio::test]
    async fn test_400_is_invalid_context_without_retry() {
        let transport = ScriptedTransport::new(vec![Step::Respond(400, "missing attribute")]);
        let client = client(transport.clone(), 3);

        let result = evaluate(&client, "/int:evaluate").await;
        assert_eq!(resolution_kind(result), ErrorKind::InvalidContext);
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn test_404_is_flag_not_found_without_retry() {
        let transport = ScriptedTransport::new(vec![Step::Respond(404, "unknown flag")]);
        let client = client(transport.clone(), 3);

        match evaluate(&client, "/int:evaluate").await {
            Err(EvaluationError::Resolution(e)) => {
                assert_eq!(e.kind(), ErrorKind::FlagNotFound);
                assert_eq!(e.message(), "unknown flag");
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn test_other_4xx_is_general_and_permanent() {
        let transport = ScriptedTransport::new(vec![Step::Respond(403, "forbidden")]);
        let client = client(transport.clone(), 3);

        assert_eq!(
            resolution_kind(evaluate(&client, "/int:evaluate").await),
            ErrorKind::General
        );
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_500_retried_until_budget_spent() {
        let transport = ScriptedTransport::new(vec![
            Step::Respond(500, "boom 1"),
            Step::Respond(502, "boom 2"),
            Step::Respond(503, "boom 3"),
        ]);
        let client = client(transport.clone(), 3);

        match evaluate(&client, "/bool:evaluate").await {
            Err(EvaluationError::Resolution(e)) => {
                assert_eq!(e.kind(), ErrorKind::General);
                assert_eq!(e.message(), "boom 3");
            }
            other => panic!("unexpected result: {other:?}"),
        }

        let sent_at = transport.sent_at();
        assert_eq!(sent_at.len(), 3);
        for pair in sent_at.windows(2) {
            assert!(pair[1] - pair[0] >= Duration::from_millis(100));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_transport_failure_then_success() {
        let transport = ScriptedTransport::new(vec![
            Step::Fail,
            Step::Respond(503, "warming up"),
            Step::Respond(200, r#"{"variant":"fast","float":{"value":0.25}}"#),
        ]);
        let client = client(transport.clone(), 3);

        let res = evaluate(&client, "/float:evaluate").await.unwrap();
        assert_eq!(res.float_value(), Some(0.25));
        assert_eq!(transport.calls(), 3);

        // Every attempt carries the full body.
        for (_, request) in transport.sent.lock().unwrap().iter() {
            assert!(!request.body().is_empty());
        }
    }

    #[tokio::test]
    async fn test_body_read_failure_on_4xx_is_permanent() {
        let transport = ScriptedTransport::new(vec![Step::BodyFail(404)]);
        let client = client(transport.clone(), 3);

        let result = evaluate(&client, "/bool:evaluate").await;
        assert!(matches!(
            result,
            Err(EvaluationError::BodyRead { status: 404, .. })
        ));
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_body_read_failure_on_5xx_is_retried() {
        let transport = ScriptedTransport::new(vec![
            Step::BodyFail(502),
            Step::Respond(200, r#"{"variant":"on","bool":{"value":true}}"#),
        ]);
        let client = client(transport.clone(), 3);

        let res = evaluate(&client, "/bool:evaluate").await.unwrap();
        assert_eq!(res.bool_value(), Some(true));
        assert_eq!(transport.calls(), 2);
    }

    #[tokio::test]
    async fn test_decode_failure_is_not_retried() {
        let transport = ScriptedTransport::new(vec![Step::Respond(200, "<html>oops</html>")]);
        let client = client(transport.clone(), 3);

        let result = evaluate(&client, "/bool:evaluate").await;
        assert!(matches!(result, Err(EvaluationError::Json(_))));
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn test_empty_id_rejected_before_sending() {
        let transport = ScriptedTransport::new(vec![]);
        let client = client(transport.clone(), 3);
        let meta = FlattenedContext::new();

        let result = client
            .evaluate(
                &CancellationToken::new(),
                "/bool:evaluate",
                Method::POST,
                &EvaluationRequest::new("", &meta),
            )
            .await;

        assert!(matches!(result, Err(EvaluationError::InvalidRequest(_))));
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_in_flight_attempt() {
        let transport = ScriptedTransport::new(vec![Step::Hang]);
        let client = client(transport.clone(), 3);
        let cancel = CancellationToken::new();
        let meta = FlattenedContext::new();

        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            trigger.cancel();
        });

        let result = client
            .evaluate(
                &cancel,
                "/bool:evaluate",
                Method::POST,
                &EvaluationRequest::new("slow-flag", &meta),
            )
            .await;

        assert!(result.unwrap_err().is_cancelled());
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_during_retry_wait() {
        let transport = ScriptedTransport::new(vec![Step::Respond(500, "down")]);
        let config = ClientConfig::builder("flags.example.com")
            .transport(transport.clone())
            .max_retries(5)
            .retry_interval(Duration::from_secs(30))
            .build()
            .unwrap();
        let client = EvaluationClient::new(config);
        let cancel = CancellationToken::new();
        let meta = FlattenedContext::new();

        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            trigger.cancel();
        });

        let started = Instant::now();
        let result = client
            .evaluate(
                &cancel,
                "/bool:evaluate",
                Method::POST,
                &EvaluationRequest::new("flag", &meta),
            )
            .await;

        assert!(result.unwrap_err().is_cancelled());
        assert_eq!(transport.calls(), 1);
        assert!(started.elapsed() < Duration::from_secs(30));
    }

    #[test]
    fn test_status_classification() {
        let kind = |code: u16| {
            resolution_error(StatusCode::from_u16(code).unwrap(), String::new()).kind()
        };
        assert_eq!(kind(400), ErrorKind::InvalidContext);
        assert_eq!(kind(404), ErrorKind::FlagNotFound);
        assert_eq!(kind(409), ErrorKind::General);
        assert_eq!(kind(500), ErrorKind::General);
    }
}
