use serde_json::json;
use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::Dispatch;

use crate::config::NotifierConfig;
use crate::dispatcher::Dispatcher;
use crate::domain::{ListingRecord, Recipient};
use crate::errors::Result;
use crate::telegram::{ApiCall, ProviderResponse, RetryPolicy, Sleeper, TelegramClient, Transport};

/// Something that happened during a dispatch, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Call(ApiCall),
    Sleep(Duration),
}

#[derive(Debug, Clone, Default)]
pub struct Timeline(Arc<Mutex<Vec<Event>>>);

impl Timeline {
    fn push(&self, event: Event) {
        self.0.lock().unwrap().push(event);
    }

    pub fn events(&self) -> Vec<Event> {
        self.0.lock().unwrap().clone()
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Call(call) => Some(call),
                Event::Sleep(_) => None,
            })
            .collect()
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Sleep(d) => Some(d),
                Event::Call(_) => None,
            })
            .collect()
    }
}

/// Records delays instead of sleeping.
#[derive(Debug, Clone, Default)]
pub struct RecordingSleeper {
    timeline: Timeline,
}

impl RecordingSleeper {
    pub fn delays(&self) -> Vec<Duration> {
        self.timeline.sleeps()
    }

    pub fn total(&self) -> Duration {
        self.delays().into_iter().sum()
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep(&self, duration: Duration) {
        self.timeline.push(Event::Sleep(duration));
    }
}

/// Records every call and answers from a script, then with `200 {"ok":true}`.
#[derive(Clone, Default)]
pub struct MockTransport {
    timeline: Timeline,
    script: Arc<Mutex<VecDeque<Result<ProviderResponse>>>>,
}

impl MockTransport {
    pub fn respond(&self, status: u16, body: serde_json::Value) {
        self.script
            .lock()
            .unwrap()
            .push_back(Ok(ProviderResponse::new(status, body)));
    }

    pub fn fail(&self, err: crate::errors::NotifierError) {
        self.script.lock().unwrap().push_back(Err(err));
    }
}

impl Transport for MockTransport {
    fn execute(&self, call: &ApiCall) -> Result<ProviderResponse> {
        self.timeline.push(Event::Call(call.clone()));
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(ProviderResponse::new(200, json!({"ok": true}))))
    }
}

/// Collects formatted log output.
#[derive(Debug, Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    pub fn dispatch(&self) -> Dispatch {
        let writer = self.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .finish();
        Dispatch::new(subscriber)
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }

    pub fn count(&self, needle: &str) -> usize {
        self.contents().matches(needle).count()
    }

    /// Lines emitted at ERROR level.
    pub fn error_lines(&self) -> Vec<String> {
        self.contents()
            .lines()
            .filter(|line| line.contains(" ERROR "))
            .map(str::to_string)
            .collect()
    }

    pub fn has_error(&self, needle: &str) -> bool {
        self.error_lines().iter().any(|line| line.contains(needle))
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Mock transport, recording sleeper and log capture sharing one timeline.
pub struct Harness {
    pub timeline: Timeline,
    pub transport: MockTransport,
    pub sleeper: RecordingSleeper,
    pub logs: LogCapture,
}

impl Harness {
    pub fn new() -> Self {
        let timeline = Timeline::default();
        Self {
            transport: MockTransport {
                timeline: timeline.clone(),
                script: Default::default(),
            },
            sleeper: RecordingSleeper {
                timeline: timeline.clone(),
            },
            logs: LogCapture::default(),
            timeline,
        }
    }

    pub fn client(&self) -> TelegramClient {
        TelegramClient::new(
            Box::new(self.transport.clone()),
            Arc::new(self.sleeper.clone()),
            RetryPolicy::default(),
        )
    }

    pub fn dispatcher(&self, config: &NotifierConfig) -> Dispatcher {
        Dispatcher::with_transport(
            config,
            Box::new(self.transport.clone()),
            Arc::new(self.sleeper.clone()),
        )
        .unwrap()
        .with_log_dispatch(self.logs.dispatch())
    }

    /// Run `f` with this harness's log capture installed.
    pub fn logged<T>(&self, f: impl FnOnce() -> T) -> T {
        tracing::dispatcher::with_default(&self.logs.dispatch(), f)
    }
}

pub fn config_for(receivers: Option<Vec<Recipient>>) -> NotifierConfig {
    NotifierConfig {
        bot_token: "123456:SECRET".to_string(),
        receiver_ids: receivers,
        message: Some("{title}\n{rooms} Zimmer, {size} m²\n{price}\n{address}\n{url}".into()),
        ..Default::default()
    }
}

pub fn sample_listing() -> ListingRecord {
    ListingRecord {
        id: Some("4711".into()),
        title: Some("Helle Altbauwohnung mit Balkon".into()),
        rooms: Some("3".into()),
        size: Some("78".into()),
        price: Some("1.250 €".into()),
        rent_warm: Some("1.480 €".into()),
        url: Some("https://www.example-immo.de/expose/4711".into()),
        address: Some("Lychener Str. 12, 10437 Berlin".into()),
        images: None,
        description: None,
        durations: None,
    }
}

pub fn image_urls(n: usize) -> Vec<String> {
    (0..n)
        .map(|i| format!("https://pictures.example-immo.de/listings/{i}.jpg/ORIG/resize/1024x768"))
        .collect()
}

pub fn text_of(call: &ApiCall) -> Option<&str> {
    match call {
        ApiCall::SendMessage { text, .. } => Some(text),
        _ => None,
    }
}
