use crate::message::{LookupRequest, SaveRequest};
use async_trait::async_trait;
use goto_core::{Key, Redirect, RedirectError, Redirector, StorageError};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tracing::{trace, warn};

type Result<T> = std::result::Result<T, RedirectError>;

/// Cloneable access point to a running [`StoreWorker`](crate::StoreWorker).
///
/// Every call builds a fresh one-shot reply channel, queues the request and
/// waits for the single answer. Queueing and waiting together are bounded by
/// the configured request timeout, so a stalled worker cannot hang callers.
#[derive(Debug, Clone)]
pub struct WorkerHandle {
    lookups: mpsc::Sender<LookupRequest>,
    saves: mpsc::Sender<SaveRequest>,
    request_timeout: Duration,
}

impl WorkerHandle {
    pub(crate) fn new(
        lookups: mpsc::Sender<LookupRequest>,
        saves: mpsc::Sender<SaveRequest>,
        request_timeout: Duration,
    ) -> Self {
        Self {
            lookups,
            saves,
            request_timeout,
        }
    }

    /// Looks up the URL stored for `key`.
    ///
    /// Returns `None` if the key is unknown or its URL is empty.
    pub async fn lookup(&self, key: &Key) -> Result<Option<String>> {
        trace!(key = %key, "sending lookup to store worker");

        let (reply, response) = oneshot::channel();
        let request = LookupRequest {
            key: key.clone(),
            reply,
        };
        let url = self.exchange(&self.lookups, request, response).await?;

        Ok(url.filter(|url| !url.is_empty()))
    }

    /// Saves a redirect, replacing any previous mapping for its key.
    ///
    /// Returns once the store has completed (or failed) the write.
    pub async fn save(&self, redirect: Redirect) -> Result<()> {
        let Redirect { key, url } = redirect;
        trace!(key = %key, "sending save to store worker");

        let (reply, response) = oneshot::channel();
        let request = SaveRequest { key, url, reply };
        self.exchange(&self.saves, request, response).await
    }

    async fn exchange<M, T>(
        &self,
        queue: &mpsc::Sender<M>,
        request: M,
        response: oneshot::Receiver<std::result::Result<T, StorageError>>,
    ) -> Result<T>
    where
        M: Send,
        T: Send,
    {
        let round_trip = async {
            queue
                .send(request)
                .await
                .map_err(|_| RedirectError::Unavailable)?;
            let reply = response.await.map_err(|_| RedirectError::Unavailable)?;
            reply.map_err(RedirectError::from)
        };

        match tokio::time::timeout(self.request_timeout, round_trip).await {
            Ok(result) => result,
            Err(_) => {
                warn!(timeout = ?self.request_timeout, "store worker did not reply in time");
                Err(RedirectError::Timeout(self.request_timeout))
            }
        }
    }
}

#[async_trait]
impl Redirector for WorkerHandle {
    async fn resolve(&self, key: &Key) -> Result<Option<String>> {
        self.lookup(key).await
    }

    async fn register(&self, redirect: Redirect) -> Result<()> {
        self.save(redirect).await
    }
}
