//! Streaming read loop
//!
//! Opens the completion request and feeds the response body to a consumer
//! callback one framed line at a time. Ollama emits bare JSON lines; the SSE
//! providers prefix payloads with `data:` and terminate with `[DONE]` — both
//! framings are normalized here so the consumer only ever sees payloads.
//!
//! Cancellation is cooperative: the caller's token is checked between every
//! await point, and a cancelled token stops chunk delivery immediately.

use futures_util::StreamExt;
use reqwest::Client;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::adapter::StreamRequest;
use crate::error::ProviderError;

/// Consumer verdict after each delivered chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkAction {
    Continue,
    Stop,
}

/// Why the read loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamEnd {
    /// Server closed the connection (or sent its end marker)
    Eof,
    /// The consumer requested a stop
    Stopped,
    /// The cancellation token fired
    Cancelled,
}

/// Drive a streaming completion request to its end
///
/// `on_line` receives each framed payload and decides whether to keep
/// consuming. Transport failures abort the loop with an error; the caller
/// does not retry (a fresh editor trigger is the only retry path).
pub async fn stream_lines<F>(
    client: &Client,
    request: &StreamRequest,
    cancel: &CancellationToken,
    mut on_line: F,
) -> Result<StreamEnd, ProviderError>
where
    F: FnMut(&str) -> ChunkAction,
{
    let mut builder = client.post(&request.url).json(&request.body);
    if let Some(token) = &request.bearer_token {
        builder = builder.bearer_auth(token);
    }

    let response = tokio::select! {
        biased;
        _ = cancel.cancelled() => return Ok(StreamEnd::Cancelled),
        response = builder.send() => response?,
    };

    let status = response.status();
    if !status.is_success() {
        return Err(ProviderError::Http {
            status: status.as_u16(),
        });
    }

    let mut body = response.bytes_stream();
    let mut buffer = String::new();

    loop {
        let chunk = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!("stream cancelled mid-body");
                return Ok(StreamEnd::Cancelled);
            }
            chunk = body.next() => chunk,
        };

        let Some(chunk) = chunk else { break };
        let bytes = chunk?;
        buffer.push_str(&String::from_utf8_lossy(&bytes));

        while let Some(newline) = buffer.find('\n') {
            let line: String = buffer.drain(..=newline).collect();
            match frame_line(&line) {
                None => continue,
                Some("[DONE]") => return Ok(StreamEnd::Eof),
                Some(payload) => {
                    if on_line(payload) == ChunkAction::Stop {
                        return Ok(StreamEnd::Stopped);
                    }
                }
            }
        }
    }

    // a final payload may arrive without a trailing newline
    match frame_line(&buffer) {
        None | Some("[DONE]") => {}
        Some(payload) => {
            let _ = on_line(payload);
        }
    }
    Ok(StreamEnd::Eof)
}

/// Strip SSE framing, returning the payload of a non-empty line
fn frame_line(line: &str) -> Option<&str> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    Some(match line.strip_prefix("data:") {
        Some(rest) => rest.trim_start(),
        None => line,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn frame_line_strips_sse_prefix() {
        assert_eq!(frame_line("data: {\"x\":1}"), Some("{\"x\":1}"));
        assert_eq!(frame_line("{\"x\":1}"), Some("{\"x\":1}"));
        assert_eq!(frame_line("data: [DONE]"), Some("[DONE]"));
        assert_eq!(frame_line("   "), None);
        assert_eq!(frame_line(""), None);
    }

    fn request_for(url: String) -> StreamRequest {
        StreamRequest {
            url,
            body: serde_json::json!({"prompt": "p"}),
            bearer_token: None,
        }
    }

    #[tokio::test]
    async fn delivers_each_json_line() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                "{\"response\":\"a\"}\n{\"response\":\"b\"}\n",
                "application/json",
            ))
            .mount(&server)
            .await;

        let client = Client::new();
        let cancel = CancellationToken::new();
        let mut lines = Vec::new();
        let end = stream_lines(
            &client,
            &request_for(format!("{}/api/generate", server.uri())),
            &cancel,
            |line| {
                lines.push(line.to_string());
                ChunkAction::Continue
            },
        )
        .await
        .unwrap();

        assert_eq!(end, StreamEnd::Eof);
        assert_eq!(lines, vec!["{\"response\":\"a\"}", "{\"response\":\"b\"}"]);
    }

    #[tokio::test]
    async fn stop_verdict_ends_the_loop_early() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/completion"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                "data: {\"content\":\"a\"}\ndata: {\"content\":\"b\"}\ndata: {\"content\":\"c\"}\n",
                "text/event-stream",
            ))
            .mount(&server)
            .await;

        let client = Client::new();
        let cancel = CancellationToken::new();
        let mut seen = 0;
        let end = stream_lines(
            &client,
            &request_for(format!("{}/completion", server.uri())),
            &cancel,
            |_| {
                seen += 1;
                if seen == 2 {
                    ChunkAction::Stop
                } else {
                    ChunkAction::Continue
                }
            },
        )
        .await
        .unwrap();

        assert_eq!(end, StreamEnd::Stopped);
        assert_eq!(seen, 2);
    }

    #[tokio::test]
    async fn done_marker_ends_sse_stream() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                "data: {\"choices\":[{\"text\":\"x\"}]}\ndata: [DONE]\n",
                "text/event-stream",
            ))
            .mount(&server)
            .await;

        let client = Client::new();
        let cancel = CancellationToken::new();
        let mut lines = Vec::new();
        let end = stream_lines(
            &client,
            &request_for(format!("{}/v1/completions", server.uri())),
            &cancel,
            |line| {
                lines.push(line.to_string());
                ChunkAction::Continue
            },
        )
        .await
        .unwrap();

        assert_eq!(end, StreamEnd::Eof);
        assert_eq!(lines.len(), 1);
    }

    #[tokio::test]
    async fn non_success_status_is_an_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = Client::new();
        let cancel = CancellationToken::new();
        let result = stream_lines(
            &client,
            &request_for(format!("{}/api/generate", server.uri())),
            &cancel,
            |_| ChunkAction::Continue,
        )
        .await;

        assert_eq!(result, Err(ProviderError::Http { status: 500 }));
    }

    #[tokio::test]
    async fn pre_cancelled_token_never_sends() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = Client::new();
        let cancel = CancellationToken::new();
        cancel.cancel();
        let end = stream_lines(
            &client,
            &request_for(format!("{}/api/generate", server.uri())),
            &cancel,
            |_| ChunkAction::Continue,
        )
        .await
        .unwrap();

        assert_eq!(end, StreamEnd::Cancelled);
    }

    #[tokio::test]
    async fn bearer_token_and_json_body_are_sent() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(header("authorization", "Bearer secret"))
            .and(body_partial_json(serde_json::json!({"prompt": "p"})))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw("{\"response\":\"ok\"}\n", "application/json"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = Client::new();
        let cancel = CancellationToken::new();
        let mut request = request_for(format!("{}/api/generate", server.uri()));
        request.bearer_token = Some("secret".to_string());
        let end = stream_lines(&client, &request, &cancel, |_| ChunkAction::Continue)
            .await
            .unwrap();
        assert_eq!(end, StreamEnd::Eof);
    }
}
