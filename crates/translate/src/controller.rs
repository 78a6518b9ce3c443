#![forbid(unsafe_code)]

//! Debounced request controller.
//!
//! Turns a stream of input edits into at most one prediction request per
//! settled value. Time is passed in explicitly (`set_input(text, now)`,
//! `poll(now)`) so the UI loop owns the clock. Requests run on worker
//! threads; their results come back over a channel and are applied on the
//! next `poll` or `wait`.
//!
//! Every fired request and every clear bumps a generation counter. A result
//! whose generation is no longer current is discarded, so a slow response
//! for an older value never overwrites a newer result or a cleared display.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, warn};
use tokens::Translation;

use crate::client::{PredictError, Predictor};

/// What the output pane shows. Exactly one is active at a time.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum RequestState {
    /// nothing requested, or the input was cleared
    #[default]
    Idle,
    /// a request for the latest settled value is outstanding
    Loading,
    /// the latest request succeeded
    Succeeded(Translation),
    /// the latest request failed; user-displayable message
    Failed(String),
}

impl RequestState {
    /// The translation, if the latest request succeeded.
    pub fn translation(&self) -> Option<&Translation> {
        match self {
            RequestState::Succeeded(t) => Some(t),
            _ => None,
        }
    }

    /// Error message, if the latest request failed.
    pub fn error(&self) -> Option<&str> {
        match self {
            RequestState::Failed(msg) => Some(msg.as_str()),
            _ => None,
        }
    }
}

struct Pending {
    text: String,
    deadline: Instant,
}

struct Completion {
    generation: u64,
    input_text: String,
    result: Result<Translation, PredictError>,
}

type Notifier = Arc<dyn Fn() + Send + Sync>;

/// Owns the request lifecycle and the displayed `RequestState`.
pub struct Controller<P> {
    predictor: Arc<P>,
    quiet_period: Duration,
    pending: Option<Pending>,
    last_requested: Option<String>,
    generation: u64,
    state: RequestState,
    tx: Sender<Completion>,
    rx: Receiver<Completion>,
    notifier: Option<Notifier>,
}

impl<P: Predictor + 'static> Controller<P> {
    /// Controller that waits `quiet_period` after the last edit before requesting.
    pub fn new(predictor: P, quiet_period: Duration) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            predictor: Arc::new(predictor),
            quiet_period,
            pending: None,
            last_requested: None,
            generation: 0,
            state: RequestState::Idle,
            tx,
            rx,
            notifier: None,
        }
    }

    /// Called from the worker thread after a result has been queued,
    /// e.g. to wake the UI loop.
    pub fn with_notifier(mut self, notify: impl Fn() + Send + Sync + 'static) -> Self {
        self.notifier = Some(Arc::new(notify));
        self
    }

    /// Current display state.
    pub fn state(&self) -> &RequestState {
        &self.state
    }

    /// True while the latest request is outstanding.
    pub fn is_loading(&self) -> bool {
        self.state == RequestState::Loading
    }

    /// When the pending value settles, if one is pending.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.deadline)
    }

    /// Record an edit. Restarts the quiet period; blank text clears at once.
    pub fn set_input(&mut self, text: &str, now: Instant) {
        if text.trim().is_empty() {
            self.clear();
            return;
        }
        self.pending = Some(Pending {
            text: text.to_owned(),
            deadline: now + self.quiet_period,
        });
    }

    /// Empty the display immediately.
    ///
    /// Cancels the pending timer. A request already on the wire is not
    /// aborted, but its result will be discarded.
    pub fn clear(&mut self) {
        self.pending = None;
        self.last_requested = None;
        self.generation += 1;
        self.state = RequestState::Idle;
        debug!("input cleared (generation {})", self.generation);
    }

    /// Apply finished requests and fire the pending value if it has settled.
    ///
    /// Returns true when `state()` changed.
    pub fn poll(&mut self, now: Instant) -> bool {
        let mut changed = false;
        while let Ok(completion) = self.rx.try_recv() {
            changed |= self.apply(completion);
        }
        if self.pending.as_ref().is_some_and(|p| p.deadline <= now) {
            if let Some(pending) = self.pending.take() {
                changed |= self.settle(pending.text);
            }
        }
        changed
    }

    /// Block until the current request resolves or `timeout` passes.
    ///
    /// Returns false on timeout. Returns true at once when nothing is loading.
    pub fn wait(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while self.is_loading() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.rx.recv_timeout(remaining) {
                Ok(completion) => {
                    self.apply(completion);
                }
                Err(_) => return false,
            }
        }
        true
    }

    fn settle(&mut self, text: String) -> bool {
        if self.last_requested.as_deref() == Some(text.as_str()) {
            debug!("settled value unchanged, no request");
            return false;
        }
        self.fire(text);
        true
    }

    fn fire(&mut self, text: String) {
        self.generation += 1;
        let generation = self.generation;
        debug!("requesting generation {generation}: {text:?}");
        self.last_requested = Some(text.clone());
        self.state = RequestState::Loading;

        let predictor = Arc::clone(&self.predictor);
        let tx = self.tx.clone();
        let notifier = self.notifier.clone();
        thread::spawn(move || {
            let result = predictor
                .predict(&text)
                .and_then(|response| response.into_translation().map_err(PredictError::from));
            let completion = Completion {
                generation,
                input_text: text,
                result,
            };
            // the receiver lives as long as the controller
            if tx.send(completion).is_ok() {
                if let Some(notify) = notifier {
                    notify();
                }
            }
        });
    }

    fn apply(&mut self, completion: Completion) -> bool {
        if completion.generation != self.generation {
            debug!(
                "discarding stale response for {:?} (generation {}, current {})",
                completion.input_text, completion.generation, self.generation
            );
            return false;
        }
        self.state = match completion.result {
            Ok(translation) => {
                debug!("{} tokens for {:?}", translation.tokens.len(), completion.input_text);
                RequestState::Succeeded(translation)
            }
            Err(e) => {
                warn!("prediction failed for {:?}: {e}", completion.input_text);
                // a failed value may be retried by settling on it again
                self.last_requested = None;
                RequestState::Failed(e.to_string())
            }
        };
        true
    }
}
