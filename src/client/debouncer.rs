use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, warn};

use super::relay_client::TranslationService;
use super::timer::DebounceTimer;
use crate::languages::LanguageCode;
use crate::translate::TranslationRequest;

/// Idle period before a request is issued
pub const SETTLE_DELAY: Duration = Duration::from_millis(600);

/// Shown in place of a translation when the request fails
pub const ERROR_MESSAGE: &str = "Error: Failed to translate.";

/// What the view layer renders
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayState {
    pub loading: bool,
    pub translation: String,
    pub failed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Armed,
    InFlight,
}

struct DebounceState {
    text: String,
    from: LanguageCode,
    to: LanguageCode,
    timer: DebounceTimer,
    /// Bumped on every input change; a timer only fires for its own generation
    generation: u64,
    next_seq: u64,
    /// Sequence of the request whose response will be applied
    current: Option<u64>,
    display: watch::Sender<DisplayState>,
}

/// Turns text and language changes into at most one request per settle period.
///
/// Dropping the debouncer cancels the pending timer and discards any response
/// still in flight.
pub struct TranslationDebouncer {
    state: Arc<Mutex<DebounceState>>,
    service: Arc<dyn TranslationService>,
    delay: Duration,
    display_rx: watch::Receiver<DisplayState>,
}

fn lock(state: &Mutex<DebounceState>) -> MutexGuard<'_, DebounceState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

impl TranslationDebouncer {
    #[cfg(test)]
    pub fn new(service: Arc<dyn TranslationService>, from: LanguageCode, to: LanguageCode) -> Self {
        Self::with_delay(service, from, to, SETTLE_DELAY)
    }

    pub fn with_delay(
        service: Arc<dyn TranslationService>,
        from: LanguageCode,
        to: LanguageCode,
        delay: Duration,
    ) -> Self {
        let (display, display_rx) = watch::channel(DisplayState::default());
        let state = DebounceState {
            text: String::new(),
            from,
            to,
            timer: DebounceTimer::new(),
            generation: 0,
            next_seq: 0,
            current: None,
            display,
        };
        Self {
            state: Arc::new(Mutex::new(state)),
            service,
            delay,
            display_rx,
        }
    }

    pub fn set_text(&self, text: impl Into<String>) {
        let mut state = lock(&self.state);
        state.text = text.into();
        self.on_input_change(&mut state);
    }

    pub fn set_from(&self, from: LanguageCode) {
        let mut state = lock(&self.state);
        state.from = from;
        self.on_input_change(&mut state);
    }

    pub fn set_to(&self, to: LanguageCode) {
        let mut state = lock(&self.state);
        state.to = to;
        self.on_input_change(&mut state);
    }

    /// Exchange source and target; counts as a single change
    pub fn swap_languages(&self) {
        let mut state = lock(&self.state);
        let DebounceState { from, to, .. } = &mut *state;
        std::mem::swap(from, to);
        self.on_input_change(&mut state);
    }

    pub fn text(&self) -> String {
        lock(&self.state).text.clone()
    }

    pub fn languages(&self) -> (LanguageCode, LanguageCode) {
        let state = lock(&self.state);
        (state.from, state.to)
    }

    pub fn display(&self) -> DisplayState {
        self.display_rx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<DisplayState> {
        self.display_rx.clone()
    }

    pub fn phase(&self) -> Phase {
        let state = lock(&self.state);
        // `current` is set before the timer task returns, so it decides first
        if state.current.is_some() {
            Phase::InFlight
        } else if state.timer.is_armed() {
            Phase::Armed
        } else {
            Phase::Idle
        }
    }

    fn on_input_change(&self, state: &mut DebounceState) {
        state.generation += 1;
        // Whatever is in flight now answers a question nobody is asking
        state.current = None;

        if state.text.trim().is_empty() {
            state.timer.cancel();
            state.display.send_modify(|d| {
                d.loading = false;
                d.translation.clear();
                d.failed = false;
            });
            return;
        }

        state.display.send_modify(|d| d.loading = true);

        let generation = state.generation;
        let weak = Arc::downgrade(&self.state);
        let service = self.service.clone();
        state
            .timer
            .arm(self.delay, move || fire(weak, service, generation));
    }
}

/// Timer callback: issue one request from the state as it is now
fn fire(weak: Weak<Mutex<DebounceState>>, service: Arc<dyn TranslationService>, generation: u64) {
    let Some(shared) = weak.upgrade() else { return };
    let (request, seq) = {
        let mut state = lock(&shared);
        if state.generation != generation {
            return;
        }
        let seq = state.next_seq;
        state.next_seq += 1;
        state.current = Some(seq);
        let request = TranslationRequest {
            text: state.text.clone(),
            from: state.from,
            to: state.to,
        };
        (request, seq)
    };
    drop(shared);

    debug!("Issuing translation request #{} ({} -> {})", seq, request.from, request.to);
    tokio::spawn(async move {
        let outcome = service.translate(&request).await;

        let Some(shared) = weak.upgrade() else {
            debug!("Dropping response #{} after teardown", seq);
            return;
        };
        let mut state = lock(&shared);
        if state.current != Some(seq) {
            debug!("Discarding stale response #{}", seq);
            return;
        }
        state.current = None;
        match outcome {
            Ok(translation) => state.display.send_modify(|d| {
                d.loading = false;
                d.translation = translation;
                d.failed = false;
            }),
            Err(e) => {
                warn!("Translation request #{} failed: {}", seq, e);
                state.display.send_modify(|d| {
                    d.loading = false;
                    d.translation = ERROR_MESSAGE.to_string();
                    d.failed = true;
                });
            }
        }
    });
}

impl Drop for TranslationDebouncer {
    fn drop(&mut self) {
        let mut state = lock(&self.state);
        state.generation += 1;
        state.timer.cancel();
        state.current = None;
    }
}
