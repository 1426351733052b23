//! Submission controller - guards and sequences the async submit action.

use std::fmt::Display;
use std::future::Future;

#[cfg(feature = "async")]
use tokio_util::sync::CancellationToken;

use crate::error::SubmitError;
use crate::store::FormStore;
use crate::values::FormValues;

/// Outcome of a submit attempt: the handler's result, or why there is none.
pub type SubmitOutcome<T> = Result<T, SubmitError>;

// Lowers the submission flag even when the submit future is dropped mid-flight.
struct InFlight<'a> {
    store: &'a FormStore,
    ticket: u64,
    done: bool,
}

impl<'a> InFlight<'a> {
    fn new(store: &'a FormStore, ticket: u64) -> Self {
        Self { store, ticket, done: false }
    }

    fn finish(mut self, reset: bool) {
        self.done = true;
        self.store.end_submit(self.ticket, reset);
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.done {
            #[cfg(feature = "tracing")]
            tracing::warn!("submission dropped while in flight");
            self.store.end_submit(self.ticket, false);
        }
    }
}

impl FormStore {
    /// Validates the whole form and, if it passes, runs `handler` with the
    /// current values.
    ///
    /// At most one submission is in flight per form: a call made while
    /// another is pending returns `Busy` without invoking `handler`. A failed
    /// handler leaves values and touched flags as they were; a successful
    /// one resets the form when `reset_on_success` is set.
    ///
    /// # Returns
    /// - `Ok(result)` with the handler's result
    /// - `Err(Busy)` / `Err(ValidationFailed)` if the handler was not invoked
    /// - `Err(Handler(message))` if the handler failed
    pub async fn submit<F, Fut, T, E>(&self, handler: F) -> SubmitOutcome<T>
    where
        F: FnOnce(FormValues) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        let (ticket, values) = self.start()?;
        let in_flight = InFlight::new(self, ticket);
        let result = handler(values).await;
        self.complete(in_flight, result)
    }

    /// Like [`FormStore::submit`], but gives up as soon as `token` is cancelled.
    ///
    /// Cancellation lowers the submission flag and keeps the values; the
    /// handler future is dropped.
    #[cfg(feature = "async")]
    pub async fn submit_with_cancellation<F, Fut, T, E>(
        &self,
        handler: F,
        token: CancellationToken,
    ) -> SubmitOutcome<T>
    where
        F: FnOnce(FormValues) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        if token.is_cancelled() {
            return Err(SubmitError::Cancelled);
        }
        let (ticket, values) = self.start()?;
        let in_flight = InFlight::new(self, ticket);

        tokio::select! {
            biased;
            _ = token.cancelled() => {
                #[cfg(feature = "tracing")]
                tracing::info!("submission cancelled");
                in_flight.finish(false);
                Err(SubmitError::Cancelled)
            }
            result = handler(values) => self.complete(in_flight, result),
        }
    }

    fn start(&self) -> Result<(u64, FormValues), SubmitError> {
        match self.begin_submit() {
            Ok((ticket, values)) => {
                #[cfg(feature = "tracing")]
                tracing::info!(ticket, "submission started");
                Ok((ticket, values))
            }
            Err(e) => {
                #[cfg(feature = "tracing")]
                tracing::debug!("submission rejected: {}", e);
                Err(e)
            }
        }
    }

    fn complete<T, E: Display>(&self, in_flight: InFlight<'_>, result: Result<T, E>) -> SubmitOutcome<T> {
        match result {
            Ok(value) => {
                #[cfg(feature = "tracing")]
                tracing::info!("submission succeeded");
                in_flight.finish(self.options().reset_on_success);
                Ok(value)
            }
            Err(e) => {
                in_flight.finish(false);
                let message = e.to_string();
                let message = if message.trim().is_empty() {
                    self.options().fallback_error.clone()
                } else {
                    message
                };
                #[cfg(feature = "tracing")]
                tracing::error!("submission failed: {}", message);
                Err(SubmitError::Handler(message))
            }
        }
    }
}
