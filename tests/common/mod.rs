//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::fmt;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use diceroller::config::DiceConfig;
use diceroller::dice::{DiceRoller, LoadedDie};
use diceroller::http::HttpServer;
use diceroller::lifecycle::Shutdown;
use diceroller::observability::metrics::{DICE_ROLLS, ROLL_VALUE_LABEL};
use diceroller::observability::RollMetrics;
use metrics_util::debugging::{DebugValue, DebuggingRecorder, Snapshotter};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::field::{Field, Visit};
use tracing::span::{Attributes, Id, Record};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::Layer;

/// A span as seen by [`CaptureLayer`].
#[derive(Debug, Clone)]
pub struct CapturedSpan {
    pub id: u64,
    pub name: &'static str,
    pub fields: HashMap<String, String>,
    pub closed: bool,
}

/// An event as seen by [`CaptureLayer`].
#[derive(Debug, Clone)]
pub struct CapturedEvent {
    pub level: Level,
    pub message: String,
    pub fields: HashMap<String, String>,
    pub span: Option<&'static str>,
}

#[derive(Default)]
struct Captured {
    spans: Vec<CapturedSpan>,
    events: Vec<CapturedEvent>,
}

/// Layer recording every span field and event, for asserting on
/// instrumentation.
#[derive(Clone, Default)]
pub struct CaptureLayer {
    inner: Arc<Mutex<Captured>>,
}

impl CaptureLayer {
    pub fn spans_named(&self, name: &str) -> Vec<CapturedSpan> {
        let inner = self.inner.lock().unwrap();
        inner.spans.iter().filter(|s| s.name == name).cloned().collect()
    }

    pub fn events(&self) -> Vec<CapturedEvent> {
        self.inner.lock().unwrap().events.clone()
    }

    pub fn events_at(&self, level: Level) -> Vec<CapturedEvent> {
        self.events().into_iter().filter(|e| e.level == level).collect()
    }
}

#[derive(Default)]
struct FieldVisitor(HashMap<String, String>);

impl Visit for FieldVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.insert(field.name().to_string(), value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.0.insert(field.name().to_string(), format!("{:?}", value));
    }
}

impl<S> Layer<S> for CaptureLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, _ctx: Context<'_, S>) {
        let mut visitor = FieldVisitor::default();
        attrs.record(&mut visitor);
        self.inner.lock().unwrap().spans.push(CapturedSpan {
            id: id.into_u64(),
            name: attrs.metadata().name(),
            fields: visitor.0,
            closed: false,
        });
    }

    fn on_record(&self, id: &Id, values: &Record<'_>, _ctx: Context<'_, S>) {
        let mut visitor = FieldVisitor::default();
        values.record(&mut visitor);
        let mut inner = self.inner.lock().unwrap();
        if let Some(span) = inner
            .spans
            .iter_mut()
            .rev()
            .find(|s| s.id == id.into_u64() && !s.closed)
        {
            span.fields.extend(visitor.0);
        }
    }

    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);
        let message = visitor.0.remove("message").unwrap_or_default();
        let span = ctx.event_span(event).map(|s| s.name());
        self.inner.lock().unwrap().events.push(CapturedEvent {
            level: *event.metadata().level(),
            message,
            fields: visitor.0,
            span,
        });
    }

    fn on_close(&self, id: Id, _ctx: Context<'_, S>) {
        let mut inner = self.inner.lock().unwrap();
        if let Some(span) = inner
            .spans
            .iter_mut()
            .rev()
            .find(|s| s.id == id.into_u64() && !s.closed)
        {
            span.closed = true;
        }
    }
}

/// Register roll counters against a fresh debugging recorder.
pub fn debug_metrics() -> (RollMetrics, Snapshotter) {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    let metrics = metrics::with_local_recorder(&recorder, RollMetrics::register);
    (metrics, snapshotter)
}

/// `dice.rolls` totals keyed by `roll.value`. Takes a single snapshot.
pub fn roll_counts(snapshotter: &Snapshotter) -> HashMap<String, u64> {
    let mut counts = HashMap::new();
    for (key, _, _, value) in snapshotter.snapshot().into_vec() {
        if key.key().name() != DICE_ROLLS {
            continue;
        }
        let label = key
            .key()
            .labels()
            .find(|l| l.key() == ROLL_VALUE_LABEL)
            .map(|l| l.value().to_string())
            .expect("dice.rolls without roll.value label");
        let count = match value {
            DebugValue::Counter(v) => v,
            other => panic!("expected a counter, got: {:?}", other),
        };
        *counts.entry(label).or_insert(0) += count;
    }
    counts
}

/// A roller over a loaded die, counting into `metrics`.
pub fn loaded_roller(faces: &[u8], metrics: RollMetrics) -> DiceRoller {
    let die = LoadedDie::new(faces.to_vec()).expect("valid faces");
    DiceRoller::new(Arc::new(die), metrics)
}

/// A running server on an ephemeral port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub handle: JoinHandle<Result<(), std::io::Error>>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

/// Start the dice server on 127.0.0.1 with an OS-assigned port.
pub async fn start_server(roller: DiceRoller) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let mut config = DiceConfig::default();
    config.listener.bind_address = addr.to_string();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, Arc::new(roller));
    let handle = tokio::spawn(server.run(listener, shutdown.subscribe()));

    TestServer {
        addr,
        shutdown,
        handle,
    }
}

/// HTTP client that does not follow redirects or use system proxies.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .no_proxy()
        .build()
        .unwrap()
}
