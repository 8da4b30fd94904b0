//! Completion request lifecycle
//!
//! The engine owns every suspending part of a completion request: the
//! debounce window, the cache short-circuit, the streaming read loop and its
//! stopping heuristics, and finalization. At most one stream is in flight
//! per engine; a newer trigger cancels whichever stage the previous request
//! was in, so the newest keystroke always wins.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, RwLock};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use infill_cache::CompletionCache;
use infill_config::CompletionConfig;
use infill_providers::{
    stream_lines, ChunkAction, Endpoint, GenerationParams, Provider, StreamEnd,
};

use crate::context::{cursor_context, file_context, file_header, text_after_cursor};
use crate::error::CompletionError;
use crate::format::{format_completion, strip_stop_sequences, FormatOptions};
use crate::template::{FimTemplate, TemplateInputs};
use crate::types::{CompletionRequest, CompletionResult, CursorContext, TriggerKind};

/// Minimal status signal surfaced to the editor host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineStatus {
    Idle,
    Generating,
    Alert,
}

/// Accumulation state for one open stream
///
/// The nonce strictly increases per engine and is used only to correlate log
/// lines; correctness rests on explicit cancellation of the prior handle.
#[derive(Debug)]
struct StreamSession {
    nonce: u64,
    accumulated: String,
    chunk_count: usize,
    line_count: usize,
}

impl StreamSession {
    fn new(nonce: u64) -> Self {
        Self {
            nonce,
            accumulated: String::new(),
            chunk_count: 0,
            line_count: 0,
        }
    }

    fn append(&mut self, fragment: &str) {
        self.accumulated.push_str(fragment);
        self.chunk_count += 1;
    }
}

/// Inline completion engine
///
/// Host-facing entry points: [`complete`](Self::complete),
/// [`stop_generation`](Self::stop_generation),
/// [`update_config`](Self::update_config) and [`status`](Self::status).
pub struct CompletionEngine {
    config: RwLock<Arc<CompletionConfig>>,
    cache: Arc<CompletionCache>,
    client: reqwest::Client,
    /// Cancellation handle of the newest request; cancelled and replaced on
    /// every trigger, which is what enforces at-most-one-in-flight
    session_slot: Mutex<CancellationToken>,
    nonce: AtomicU64,
    status: watch::Sender<EngineStatus>,
}

impl CompletionEngine {
    pub fn new(config: CompletionConfig) -> Self {
        Self::with_cache(config, Arc::new(CompletionCache::new()))
    }

    /// Build an engine sharing an existing cache
    pub fn with_cache(config: CompletionConfig, cache: Arc<CompletionCache>) -> Self {
        let (status, _) = watch::channel(EngineStatus::Idle);
        Self {
            config: RwLock::new(Arc::new(config)),
            cache,
            client: reqwest::Client::new(),
            session_slot: Mutex::new(CancellationToken::new()),
            nonce: AtomicU64::new(0),
            status,
        }
    }

    /// Replace the configuration snapshot wholesale
    ///
    /// In-flight requests keep the snapshot they started with.
    pub fn update_config(&self, config: CompletionConfig) {
        *self.config.write() = Arc::new(config);
        debug!("configuration snapshot replaced");
    }

    /// Subscribe to the three-state status indicator
    pub fn status(&self) -> watch::Receiver<EngineStatus> {
        self.status.subscribe()
    }

    pub fn current_status(&self) -> EngineStatus {
        *self.status.borrow()
    }

    pub fn cache(&self) -> &Arc<CompletionCache> {
        &self.cache
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Cancel whatever is debouncing or streaming right now
    pub fn stop_generation(&self) {
        self.session_slot.lock().cancel();
        self.set_status(EngineStatus::Idle);
    }

    /// Run one completion request to its end
    ///
    /// Every failure mode yields `None` — the editor shows "no suggestion",
    /// never an error dialog.
    pub async fn complete(&self, request: CompletionRequest) -> Option<CompletionResult> {
        let config = self.config.read().clone();

        if request.trigger == TriggerKind::AutoSuggest && !config.auto_suggest {
            debug!("auto-suggest trigger rejected while auto-suggest is disabled");
            return None;
        }

        // supersede the previous request, whatever stage it reached
        let cancel = {
            let mut slot = self.session_slot.lock();
            slot.cancel();
            let fresh = CancellationToken::new();
            *slot = fresh.clone();
            fresh
        };

        match self.run(&request, &config, &cancel).await {
            Ok(result) => result,
            Err(error) => {
                warn!(%error, "completion request failed");
                self.set_status(EngineStatus::Alert);
                None
            }
        }
    }

    async fn run(
        &self,
        request: &CompletionRequest,
        config: &CompletionConfig,
        cancel: &CancellationToken,
    ) -> Result<Option<CompletionResult>, CompletionError> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!("debounce superseded by a newer trigger");
                return Ok(None);
            }
            _ = tokio::time::sleep(Duration::from_millis(config.debounce_wait_ms)) => {}
        }

        if !config.enabled {
            debug!("completions disabled; request dropped");
            return Ok(None);
        }

        let nonce = self.nonce.fetch_add(1, Ordering::Relaxed) + 1;

        let context = cursor_context(&request.document, request.position, config.context_length);
        if context.prefix.is_empty() && context.suffix.is_empty() {
            debug!(nonce, "empty cursor context; nothing to complete");
            return Ok(None);
        }

        let header = file_header(&request.document.language_id, &request.document.path);
        let related = if config.use_file_context {
            file_context(&request.document, &request.open_documents)
        } else {
            String::new()
        };
        let template = FimTemplate::parse(&config.template_format);
        let fim = template.render(&TemplateInputs {
            prefix: &context.prefix,
            suffix: &context.suffix,
            header: &header,
            file_context: &related,
            use_file_context: config.use_file_context,
        });

        if config.cache_enabled {
            if let Some(cached) = self.cache.get(&context.prefix, &context.suffix) {
                debug!(nonce, "streaming skipped; completion served from cache");
                return Ok(Some(self.finalize(cached, &fim.stop, request, &context, config)));
            }
        }

        config.validate()?;
        let provider = Provider::parse(&config.provider)?;
        let params = GenerationParams {
            model: config.model.clone(),
            temperature: config.temperature,
            max_new_tokens: config.max_new_tokens,
        };
        let endpoint = Endpoint {
            hostname: config.api_hostname.clone(),
            port: config.api_port,
            path: config.api_path.clone(),
            bearer_token: config.api_bearer_token.clone(),
        };
        let stream_request = provider.stream_request(&endpoint, &fim.prompt, &params)?;

        self.set_status(EngineStatus::Generating);
        let mut session = StreamSession::new(nonce);

        let end = stream_lines(&self.client, &stream_request, cancel, |line| {
            let fragment = match provider.decode_chunk(line) {
                Ok(Some(fragment)) => fragment,
                Ok(None) => return ChunkAction::Continue,
                Err(error) => {
                    debug!(nonce, %error, "skipping undecodable chunk");
                    return ChunkAction::Continue;
                }
            };
            session.append(&fragment);
            evaluate_stop(
                &mut session,
                &fragment,
                config.multiline,
                config.max_lines,
                &fim.stop,
            )
        })
        .await;

        match end {
            Ok(StreamEnd::Cancelled) => {
                debug!(nonce = session.nonce, "stream cancelled");
                self.set_status(EngineStatus::Idle);
                Ok(None)
            }
            Ok(reason) => {
                debug!(
                    nonce = session.nonce,
                    ?reason,
                    chunks = session.chunk_count,
                    lines = session.line_count,
                    "stream finished"
                );
                self.set_status(EngineStatus::Idle);
                Ok(Some(self.finalize(
                    session.accumulated,
                    &fim.stop,
                    request,
                    &context,
                    config,
                )))
            }
            Err(error) => Err(error.into()),
        }
    }

    /// Strip stop sequences, post-process, and populate the cache
    fn finalize(
        &self,
        raw: String,
        stop: &[String],
        request: &CompletionRequest,
        context: &CursorContext,
        config: &CompletionConfig,
    ) -> CompletionResult {
        let completion = strip_stop_sequences(raw, stop);

        let lines = request.document.lines();
        let below_start = (request.position.line + 1).min(lines.len());
        let after = text_after_cursor(&request.document, request.position);

        let formatted = format_completion(
            &completion,
            &FormatOptions {
                text_after_cursor: after,
                lines_below: &lines[below_start..],
                multiline: config.multiline,
            },
        );

        if config.cache_enabled {
            self.cache
                .insert(&context.prefix, &context.suffix, &formatted);
        }
        CompletionResult {
            position: request.position,
            text: formatted,
        }
    }

    fn set_status(&self, status: EngineStatus) {
        self.status.send_replace(status);
    }
}

/// Stopping heuristics evaluated after each decoded fragment
///
/// Single-line mode stops on the first fragment past the first one that ends
/// in a line break. Multi-line mode stops once the line budget is exceeded
/// or a stop sequence shows up in the accumulated text — whichever condition
/// is detected first wins.
fn evaluate_stop(
    session: &mut StreamSession,
    fragment: &str,
    multiline: bool,
    max_lines: usize,
    stop: &[String],
) -> ChunkAction {
    if !multiline && session.chunk_count > 1 && ends_with_line_break(fragment) {
        return ChunkAction::Stop;
    }
    if ends_with_line_break(fragment) {
        session.line_count += 1;
    }
    if session.line_count > max_lines
        || stop
            .iter()
            .any(|sequence| session.accumulated.contains(sequence.as_str()))
    {
        return ChunkAction::Stop;
    }
    ChunkAction::Continue
}

fn ends_with_line_break(fragment: &str) -> bool {
    fragment.ends_with('\n')
}
