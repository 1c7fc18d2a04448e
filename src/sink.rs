//! Outbound delivery of collected interpretations.
//!
//! One JSON payload is delivered per recognized utterance. [`HttpSink`]
//! performs a synchronous POST from the calling thread, matching the host's
//! callback model. [`BackgroundSink`] wraps any sink in a worker thread so a
//! slow or unreachable endpoint cannot stall the host's callback dispatch.

use std::sync::mpsc::{self, Sender};
use std::thread;

use log::{debug, error};
use serde::Serialize;

use crate::error::Error;

/// Default forwarding endpoint.
pub const DEFAULT_ENDPOINT: &str = "http://10.0.128.1:9099/dragon";

/// Wire format of one recognition event.
#[derive(Debug, Serialize)]
pub struct Payload {
    /// Ranked candidate transcriptions, best first.
    pub interpretations: Vec<Vec<String>>,
}

/// Receives one payload per recognition event.
pub trait InterpretationSink {
    fn deliver(&mut self, payload: Payload) -> Result<(), Error>;
}

/// Blocking HTTP delivery: one POST per event, JSON body, response ignored.
///
/// No retries and no status check; only transport failures surface. The
/// client's default timeout applies.
pub struct HttpSink {
    client: reqwest::blocking::Client,
    endpoint: String,
}

impl HttpSink {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

impl Default for HttpSink {
    fn default() -> Self {
        Self::new(DEFAULT_ENDPOINT)
    }
}

impl InterpretationSink for HttpSink {
    fn deliver(&mut self, payload: Payload) -> Result<(), Error> {
        let body = serde_json::to_vec(&payload)?;
        debug!(
            "Posting {} interpretations to {}",
            payload.interpretations.len(),
            self.endpoint
        );
        self.client
            .post(&self.endpoint)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()?;
        Ok(())
    }
}

/// Fire-and-forget delivery through a worker thread.
///
/// `deliver` only enqueues the payload; the worker performs the real
/// delivery and logs failures instead of surfacing them to the recognition
/// callback. Dropping the sink flushes the queue and joins the worker.
pub struct BackgroundSink {
    tx: Option<Sender<Payload>>,
    worker: Option<thread::JoinHandle<()>>,
}

impl BackgroundSink {
    pub fn spawn(mut inner: impl InterpretationSink + Send + 'static) -> Result<Self, Error> {
        let (tx, rx) = mpsc::channel::<Payload>();
        let worker = thread::Builder::new()
            .name("natbridge-sink".to_string())
            .spawn(move || {
                while let Ok(payload) = rx.recv() {
                    if let Err(err) = inner.deliver(payload) {
                        error!("Dropped payload: {err}");
                    }
                }
            })?;
        Ok(Self {
            tx: Some(tx),
            worker: Some(worker),
        })
    }
}

impl InterpretationSink for BackgroundSink {
    fn deliver(&mut self, payload: Payload) -> Result<(), Error> {
        if let Some(tx) = &self.tx {
            if tx.send(payload).is_err() {
                // Worker died; fire-and-forget, so log rather than surface.
                error!("Sink worker is gone, payload dropped");
            }
        }
        Ok(())
    }
}

impl Drop for BackgroundSink {
    fn drop(&mut self) {
        drop(self.tx.take());
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}
