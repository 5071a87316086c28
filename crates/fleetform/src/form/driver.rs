// File: src/form/driver.rs
// Purpose: Async event loop feeding form events into a FormValidator

use super::{FieldPresenter, FormHost, FormValidator, SubmitOutcome};
use crate::validation::ErrorMap;
use serde_json::{Map, Value};
use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant};

/// Something the user did to the form
#[derive(Debug, Clone, PartialEq)]
pub enum FormEvent {
    Input { field: String, value: Value },
    Blur { field: String },
    Submit,
    Reset,
    Remove { field: String },
}

/// What the form reports back
#[derive(Debug, Clone, PartialEq)]
pub enum FormSignal {
    FieldValid { field: String },
    FieldInvalid { field: String, message: String },
    ValidationFailed(ErrorMap),
    ValidationSuccess(Map<String, Value>),
}

enum Wake {
    Event(Option<FormEvent>),
    Timer,
}

/// Owns a [`FormValidator`] and drives it from a channel of [`FormEvent`]s
///
/// Debounce deadlines are served by the same loop, so live validation runs
/// on the driver's task with no extra timers spawned.
pub struct FormDriver<F, P> {
    validator: FormValidator<F, P>,
    events: mpsc::Receiver<FormEvent>,
    signals: mpsc::UnboundedSender<FormSignal>,
}

/// Wire a validator to a fresh pair of channels
pub fn channel<F, P>(
    validator: FormValidator<F, P>,
    capacity: usize,
) -> (
    mpsc::Sender<FormEvent>,
    mpsc::UnboundedReceiver<FormSignal>,
    FormDriver<F, P>,
)
where
    F: FormHost,
    P: FieldPresenter,
{
    let (event_tx, event_rx) = mpsc::channel(capacity);
    let (signal_tx, signal_rx) = mpsc::unbounded_channel();
    let driver = FormDriver::new(validator, event_rx, signal_tx);
    (event_tx, signal_rx, driver)
}

impl<F: FormHost, P: FieldPresenter> FormDriver<F, P> {
    pub fn new(
        validator: FormValidator<F, P>,
        events: mpsc::Receiver<FormEvent>,
        signals: mpsc::UnboundedSender<FormSignal>,
    ) -> Self {
        Self {
            validator,
            events,
            signals,
        }
    }

    /// Process events until every sender is dropped, then hand the
    /// validator back
    ///
    /// Debounce timers still pending at that point do not fire; they stay
    /// on the returned validator, where `poll_due` can run them.
    pub async fn run(mut self) -> FormValidator<F, P> {
        loop {
            let deadline = self.validator.next_deadline();
            let timer = async move {
                match deadline {
                    Some(deadline) => sleep_until(deadline).await,
                    None => std::future::pending::<()>().await,
                }
            };

            let wake = tokio::select! {
                event = self.events.recv() => Wake::Event(event),
                _ = timer => Wake::Timer,
            };

            match wake {
                Wake::Event(Some(event)) => self.handle(event),
                Wake::Event(None) => break,
                Wake::Timer => {
                    for (field, valid) in self.validator.poll_due(Instant::now()) {
                        self.emit_field(field, valid);
                    }
                }
            }
        }

        let pending = self.validator.pending();
        if pending > 0 {
            tracing::debug!(pending, "form event channel closed; dropping pending live validation");
        } else {
            tracing::debug!("form event channel closed");
        }
        self.validator
    }

    fn handle(&mut self, event: FormEvent) {
        tracing::trace!(?event, "form event");
        match event {
            FormEvent::Input { field, value } => {
                self.validator.on_input(&field, value, Instant::now());
            }
            FormEvent::Blur { field } => {
                let valid = self.validator.on_blur(&field);
                self.emit_field(field, valid);
            }
            FormEvent::Submit => {
                let signal = match self.validator.submit() {
                    SubmitOutcome::Failed(errors) => FormSignal::ValidationFailed(errors),
                    SubmitOutcome::Success(values) => FormSignal::ValidationSuccess(values),
                };
                self.emit(signal);
            }
            FormEvent::Reset => self.validator.reset(),
            FormEvent::Remove { field } => {
                self.validator.remove_field(&field);
            }
        }
    }

    fn emit_field(&self, field: String, valid: bool) {
        let signal = match self.validator.first_error(&field) {
            Some(message) if !valid => FormSignal::FieldInvalid {
                message: message.to_string(),
                field,
            },
            _ => FormSignal::FieldValid { field },
        };
        self.emit(signal);
    }

    fn emit(&self, signal: FormSignal) {
        if self.signals.send(signal).is_err() {
            tracing::debug!("signal receiver dropped");
        }
    }
}
