//! The tool-call stream store.

use crate::chunk::ToolCallChunk;
use crate::error::{ChunkField, Limit, Result, StoreError};
use crate::notify::{Subscribers, Subscription};
use crate::stream::{ChatCompletionMessageToolCall, ToolCallStream};
use parking_lot::{Mutex, RwLock};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;
use toolstream_common_config::{StoreConfig, ToolstreamConfig};
use toolstream_common_log::spans::{record_error, store_span, tool_call_span};
use toolstream_common_log::timed;
use toolstream_json::{IncrementalParser, JsonStreamParser, ParseEvent, ParserOptions};

/// Immutable view of every stream, ordered by index.
pub type Snapshot = Arc<[ToolCallStream]>;

/// Builds the parser bound to a newly created stream.
pub type ParserFactory = Box<dyn Fn(u32) -> Box<dyn IncrementalParser> + Send + Sync>;

/// A committed state, stamped in commit order.
struct Commit {
    generation: u64,
    streams: Snapshot,
}

impl Commit {
    fn initial() -> Self {
        Self {
            generation: 0,
            streams: Arc::from(Vec::new()),
        }
    }
}

#[derive(Default)]
struct Inner {
    streams: BTreeMap<u32, ToolCallStream>,
    parsers: HashMap<u32, Box<dyn IncrementalParser>>,
    generation: u64,
}

impl Inner {
    fn commit(&mut self) -> Commit {
        self.generation += 1;
        Commit {
            generation: self.generation,
            streams: self.streams.values().cloned().collect(),
        }
    }

    fn apply_events(&mut self, index: u32, events: Vec<ParseEvent>, commits: &mut Vec<Commit>) {
        for event in events {
            let Some(stream) = self.streams.get_mut(&index) else {
                return;
            };
            match event {
                ParseEvent::Value(value) => {
                    tracing::trace!("partial arguments updated");
                    stream.function.arguments = value;
                    stream.function.partial = true;
                }
                ParseEvent::End(value) => {
                    tracing::debug!("arguments complete");
                    stream.function.arguments = value;
                    stream.function.partial = false;
                }
            }
            commits.push(self.commit());
        }
    }
}

/// Assembles streamed tool-call chunks into decoded, continuously updated
/// tool calls.
///
/// Each index owns one incremental parser. Every committed change replaces the
/// snapshot and then notifies subscribers, once per change:
///
/// - creating a stream,
/// - appending a name fragment,
/// - each value or end event the parser emits.
///
/// Failed calls commit nothing and notify nobody.
///
/// ```
/// use toolstream_store::{ToolCallChunk, ToolCallStreamStore};
/// use serde_json::json;
///
/// let store = ToolCallStreamStore::new();
/// store.set_tool_call(&ToolCallChunk::start(0, "call_1", "get_weather")).unwrap();
/// store.set_tool_call(&ToolCallChunk::arguments(0, r#"{"city":"Par"#)).unwrap();
///
/// let snapshot = store.snapshot();
/// assert_eq!(snapshot[0].function.arguments, json!({"city": "Par"}));
/// assert!(snapshot[0].function.partial);
/// ```
pub struct ToolCallStreamStore {
    inner: Mutex<Inner>,
    published: RwLock<Commit>,
    subscribers: Subscribers,
    factory: ParserFactory,
    config: StoreConfig,
}

impl Default for ToolCallStreamStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ToolCallStreamStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolCallStreamStore")
            .field("streams", &self.snapshot().len())
            .field("parsers", &self.parser_count())
            .field("subscribers", &self.subscribers)
            .field("config", &self.config)
            .finish()
    }
}

impl ToolCallStreamStore {
    /// Create a store with no limits and default parser options.
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    /// Create a store with the given limits.
    pub fn with_config(config: StoreConfig) -> Self {
        Self::with_parser_options(config, ParserOptions::default())
    }

    /// Create a store from loaded configuration.
    pub fn from_config(config: &ToolstreamConfig) -> Self {
        let options = ParserOptions {
            max_depth: config.parser.max_depth,
        };
        Self::with_parser_options(config.store, options)
    }

    fn with_parser_options(config: StoreConfig, options: ParserOptions) -> Self {
        Self::with_parser_factory(
            config,
            Box::new(move |_| Box::new(JsonStreamParser::with_options(options))),
        )
    }

    /// Create a store whose parsers come from `factory`.
    pub fn with_parser_factory(config: StoreConfig, factory: ParserFactory) -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            published: RwLock::new(Commit::initial()),
            subscribers: Subscribers::new(),
            factory,
            config,
        }
    }

    /// Limits this store enforces.
    pub fn config(&self) -> StoreConfig {
        self.config
    }

    /// Apply one chunk.
    ///
    /// The first chunk for an index must carry a non-empty id and function
    /// name. It creates the stream with empty, partial arguments and feeds any
    /// argument text it carries. Later chunks append name fragments and feed
    /// argument fragments to the bound parser. A later chunk for an index
    /// whose parser was released keeps the last decoded arguments.
    ///
    /// All subscriber notifications for the call have run when it returns.
    pub fn set_tool_call(&self, chunk: &ToolCallChunk) -> Result<()> {
        let span = tool_call_span(chunk.index, chunk.id());
        let _enter = span.enter();

        let commits = {
            let mut inner = self.inner.lock();
            let result = if inner.streams.contains_key(&chunk.index) {
                self.update(&mut inner, chunk)
            } else {
                self.create(&mut inner, chunk)
            };
            match result {
                Ok(commits) => commits,
                Err(err) => {
                    record_error(&err);
                    tracing::debug!(error = %err, "chunk rejected");
                    return Err(err);
                }
            }
        };

        self.publish(commits);
        Ok(())
    }

    fn create(&self, inner: &mut Inner, chunk: &ToolCallChunk) -> Result<Vec<Commit>> {
        let index = chunk.index;
        let id = chunk.id().ok_or(StoreError::InvalidChunk {
            field: ChunkField::Id,
            index,
        })?;
        let name = chunk
            .name()
            .filter(|name| !name.is_empty())
            .ok_or(StoreError::InvalidChunk {
                field: ChunkField::FunctionName,
                index,
            })?;

        if let Some(max) = self.config.max_streams {
            if inner.streams.len() >= max {
                return Err(StoreError::LimitExceeded {
                    index,
                    limit: Limit::Streams { max },
                });
            }
        }
        if inner.parsers.contains_key(&index) {
            return Err(StoreError::DuplicateParser { index });
        }

        let fragment = chunk.argument_fragment().unwrap_or_default();
        self.check_argument_bytes(index, 0, fragment)?;

        let mut parser = (self.factory)(index);
        let events = Self::feed(&mut *parser, index, fragment)?;

        tracing::debug!(name, "tool call stream created");
        inner.streams.insert(index, ToolCallStream::new(index, id, name));
        inner.parsers.insert(index, parser);

        let mut commits = vec![inner.commit()];
        inner.apply_events(index, events, &mut commits);
        Ok(commits)
    }

    fn update(&self, inner: &mut Inner, chunk: &ToolCallChunk) -> Result<Vec<Commit>> {
        let index = chunk.index;

        if let (Some(id), Some(stream)) = (chunk.id(), inner.streams.get(&index)) {
            if id != stream.id {
                tracing::warn!(existing = %stream.id, ignored = id, "tool call id changed mid-stream");
            }
        }

        let fragment = chunk.argument_fragment().filter(|text| !text.is_empty());
        let events = match (fragment, inner.parsers.get_mut(&index)) {
            (Some(text), Some(parser)) => {
                self.check_argument_bytes(index, parser.bytes_consumed(), text)?;
                Self::feed(&mut **parser, index, text)?
            }
            (Some(text), None) => {
                tracing::debug!(bytes = text.len(), "no parser bound, argument fragment dropped");
                Vec::new()
            }
            (None, _) => Vec::new(),
        };

        let mut commits = Vec::new();
        if let Some(name) = chunk.name().filter(|name| !name.is_empty()) {
            if let Some(stream) = inner.streams.get_mut(&index) {
                stream.function.name.push_str(name);
                commits.push(inner.commit());
            }
        }
        inner.apply_events(index, events, &mut commits);
        Ok(commits)
    }

    fn check_argument_bytes(&self, index: u32, consumed: usize, fragment: &str) -> Result<()> {
        match self.config.max_argument_bytes {
            Some(max) if consumed + fragment.len() > max => Err(StoreError::LimitExceeded {
                index,
                limit: Limit::ArgumentBytes { max },
            }),
            _ => Ok(()),
        }
    }

    fn feed(parser: &mut dyn IncrementalParser, index: u32, text: &str) -> Result<Vec<ParseEvent>> {
        if text.is_empty() {
            return Ok(Vec::new());
        }
        timed!("feed_arguments", parser.feed_collect(text))
            .map_err(|source| StoreError::Parse { index, source })
    }

    /// Publish each commit and notify once per commit.
    ///
    /// Runs after the state lock is released, so a concurrent call may already
    /// have published a later generation. An older commit never replaces it.
    fn publish(&self, commits: Vec<Commit>) {
        for commit in commits {
            {
                let mut published = self.published.write();
                if commit.generation > published.generation {
                    *published = commit;
                }
            }
            self.subscribers.notify();
        }
    }

    /// Remove every stream with this id and dispose its parser.
    ///
    /// Notifies once and returns `true` when something was removed.
    pub fn delete_tool_call_by_id(&self, id: &str) -> bool {
        let span = store_span("delete_tool_call_by_id");
        let _enter = span.enter();

        let commit = {
            let mut inner = self.inner.lock();
            let indices: Vec<u32> = inner
                .streams
                .values()
                .filter(|stream| stream.id == id)
                .map(|stream| stream.index)
                .collect();
            if indices.is_empty() {
                return false;
            }
            for index in indices {
                inner.streams.remove(&index);
                if inner.parsers.remove(&index).is_some() {
                    tracing::debug!(index, "parser disposed");
                }
            }
            inner.commit()
        };

        self.publish(vec![commit]);
        true
    }

    /// Remove every stream and dispose every parser.
    ///
    /// Notifies only when there was something to remove.
    pub fn clear(&self) {
        let span = store_span("clear");
        let _enter = span.enter();

        let commit = {
            let mut inner = self.inner.lock();
            let had_streams = !inner.streams.is_empty();
            tracing::debug!(
                streams = inner.streams.len(),
                parsers = inner.parsers.len(),
                "clearing store"
            );
            inner.streams.clear();
            inner.parsers.clear();
            had_streams.then(|| inner.commit())
        };

        if let Some(commit) = commit {
            self.publish(vec![commit]);
        }
    }

    /// Dispose the parser for `index`, keeping the stream's last state.
    ///
    /// Later argument fragments for the index are dropped. Returns whether a
    /// parser was bound.
    pub fn release_parser(&self, index: u32) -> bool {
        let released = self.inner.lock().parsers.remove(&index).is_some();
        if released {
            tracing::debug!(index, "parser released");
        }
        released
    }

    /// Whether a parser is bound to `index`.
    pub fn has_parser(&self, index: u32) -> bool {
        self.inner.lock().parsers.contains_key(&index)
    }

    /// Number of bound parsers.
    pub fn parser_count(&self) -> usize {
        self.inner.lock().parsers.len()
    }

    /// Latest committed state. Safe to call from a subscriber callback.
    pub fn snapshot(&self) -> Snapshot {
        Arc::clone(&self.published.read().streams)
    }

    /// Stream for `index` in the latest snapshot.
    pub fn get(&self, index: u32) -> Option<ToolCallStream> {
        self.snapshot().iter().find(|stream| stream.index == index).cloned()
    }

    /// Number of streams.
    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    /// Whether the store holds no streams.
    pub fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }

    /// Whether any stream is still receiving arguments.
    pub fn has_tool_call_in_progress(&self) -> bool {
        self.snapshot().iter().any(|stream| stream.function.partial)
    }

    /// Wire form of every completed stream, ordered by index.
    pub fn completed_tool_calls(&self) -> Vec<ChatCompletionMessageToolCall> {
        self.snapshot()
            .iter()
            .filter(|stream| stream.is_complete())
            .map(ToolCallStream::to_wire)
            .collect()
    }

    /// Register a callback invoked after every committed change.
    pub fn subscribe(&self, callback: impl Fn() + Send + Sync + 'static) -> Subscription {
        self.subscribers.subscribe(callback)
    }

    /// Canonical wire form of `stream`. Does not touch store state.
    pub fn to_chat_completion_message_tool_call(
        &self,
        stream: &ToolCallStream,
    ) -> ChatCompletionMessageToolCall {
        stream.to_wire()
    }
}
