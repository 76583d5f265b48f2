//! Reactive query bindings.
//!
//! A reactive query is bound to a parameter stream and re-executes whenever
//! the bound value changes or invalidation is requested. Results are pushed
//! to the callbacks registered with [`ReactiveQuery::on_result`], which is
//! how the results panel learns about new data without polling.
//!
//! [`BoatQuery`] is the implementation used for the boat list. Parameters
//! arrive over a `tokio::sync::watch` channel: the panel owns the sender and
//! the query owns the receiver. [`BoatQuery::run`] is the driver task that
//! reacts to parameter changes.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use tokio::sync::watch;

use crate::data::{BoatDataGateway, BoatRecord, BoatTypeFilter, DataError};

/// Callback receiving each query outcome.
pub type ResultCallback<T> = Box<dyn Fn(Result<T, DataError>) + Send + Sync>;

type SharedCallback<T> = Arc<dyn Fn(Result<T, DataError>) + Send + Sync>;

/// A query bound to a changing parameter value.
#[async_trait]
pub trait ReactiveQuery: Send + Sync {
    /// Parameter the query depends on.
    type Params: Clone + Send + Sync + 'static;
    /// Value produced by a successful execution.
    type Output: Clone + Send + 'static;

    /// Binds the query to a parameter source. Later calls replace the
    /// source.
    fn bind(&self, params: watch::Receiver<Self::Params>);

    /// Registers a callback for every result the query produces.
    fn on_result(&self, callback: ResultCallback<Self::Output>);

    /// Re-executes the query for the current parameters.
    ///
    /// Fresh data is pushed to the registered callbacks. A failed refetch is
    /// only returned to the caller so that callbacks keep their last good
    /// result.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::UnboundQuery`] when no parameters are bound, or
    /// the error raised by the underlying fetch.
    async fn invalidate(&self) -> Result<(), DataError>;
}

/// Boat list query backed by a [`BoatDataGateway`].
pub struct BoatQuery<G> {
    gateway: Arc<G>,
    params: Mutex<Option<watch::Receiver<BoatTypeFilter>>>,
    callbacks: Mutex<Vec<SharedCallback<Vec<BoatRecord>>>>,
}

impl<G> BoatQuery<G>
where
    G: BoatDataGateway,
{
    /// Creates an unbound query over `gateway`.
    #[must_use]
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            gateway,
            params: Mutex::new(None),
            callbacks: Mutex::new(Vec::new()),
        }
    }

    fn params(&self) -> MutexGuard<'_, Option<watch::Receiver<BoatTypeFilter>>> {
        self.params.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn current_params(&self) -> Result<BoatTypeFilter, DataError> {
        self.params()
            .as_ref()
            .map(|receiver| receiver.borrow().clone())
            .ok_or(DataError::UnboundQuery)
    }

    fn deliver(&self, result: &Result<Vec<BoatRecord>, DataError>) {
        let callbacks: Vec<_> = self
            .callbacks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        for callback in callbacks {
            callback(result.clone());
        }
    }

    /// Executes the query once for the current parameters and delivers the
    /// outcome, success or failure, to every callback.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::UnboundQuery`] when nothing is bound (no callback
    /// runs in that case), otherwise the fetch error that was delivered.
    pub async fn execute(&self) -> Result<(), DataError> {
        let params = self.current_params()?;
        let result = self.gateway.query_boats(&params).await;
        self.deliver(&result);
        result.map(|_| ())
    }

    /// Drives the query: executes once for the bound value, then again on
    /// every change until the parameter sender is dropped.
    pub async fn run(&self) {
        let Some(mut changes) = self.params().clone() else {
            tracing::warn!("boat query driver started before parameters were bound");
            return;
        };

        changes.mark_changed();
        while changes.changed().await.is_ok() {
            let params = changes.borrow_and_update().clone();
            tracing::debug!("boat query re-executing for {}", params.label());
            let result = self.gateway.query_boats(&params).await;

            // A newer filter arrived while this one was in flight; the next
            // iteration queries it instead.
            if changes.has_changed().unwrap_or(false) || *changes.borrow() != params {
                tracing::debug!("discarding result for superseded {}", params.label());
                continue;
            }
            self.deliver(&result);
        }
        tracing::debug!("boat query parameters closed; driver stopping");
    }
}

#[async_trait]
impl<G> ReactiveQuery for BoatQuery<G>
where
    G: BoatDataGateway,
{
    type Params = BoatTypeFilter;
    type Output = Vec<BoatRecord>;

    fn bind(&self, params: watch::Receiver<BoatTypeFilter>) {
        *self.params() = Some(params);
    }

    fn on_result(&self, callback: ResultCallback<Vec<BoatRecord>>) {
        self.callbacks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::from(callback));
    }

    async fn invalidate(&self) -> Result<(), DataError> {
        let params = self.current_params()?;
        let boats = self.gateway.query_boats(&params).await?;

        // A filter change while the refetch was in flight makes this result
        // stale; the driver delivers the newer one.
        if self.current_params()? != params {
            tracing::debug!("discarding refetch for superseded {}", params.label());
            return Ok(());
        }

        self.deliver(&Ok(boats));
        Ok(())
    }
}

#[cfg(test)]
mod tests;
