//! Event stream protocol between the tree walker (producer) and its
//! consumers.
//!
//! The walker publishes one [`RepositoryEvent`] per visited directory into an
//! [`EventSink`]. For asynchronous consumers the sink is a bounded channel of
//! capacity one drained through an [`ItemStream`]; the producer waits for the
//! consumer before publishing the next event.
//!
//! # Cancellation
//! Every stream carries a `CancellationToken`. Cancelling it, calling
//! [`ItemStream::cancel`] or dropping the stream stops the producer at its
//! next publish, even when it is already waiting for channel capacity.

use std::ops::ControlFlow;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::Stream;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::error::{IndexError, Result};
use crate::item::Item;

/// Capacity of the walker's event channel. One event in flight at a time.
pub const EVENT_CHANNEL_CAPACITY: usize = 1;

/// Result of visiting one directory: either an item or the reason there is
/// none. An error event never ends the stream by itself.
#[derive(Debug)]
pub struct RepositoryEvent {
    result: Result<Item>,
}

impl RepositoryEvent {
    pub fn from_item(item: Item) -> Self {
        Self { result: Ok(item) }
    }

    pub fn from_error(error: IndexError) -> Self {
        Self { result: Err(error) }
    }

    pub fn item(&self) -> Option<&Item> {
        self.result.as_ref().ok()
    }

    pub fn error(&self) -> Option<&IndexError> {
        self.result.as_ref().err()
    }

    pub fn is_error(&self) -> bool {
        self.result.is_err()
    }

    pub fn into_result(self) -> Result<Item> {
        self.result
    }
}

impl From<Result<Item>> for RepositoryEvent {
    fn from(result: Result<Item>) -> Self {
        Self { result }
    }
}

/// Anything that accepts walker events in order.
///
/// Returning `ControlFlow::Break` tells the walker to stop; no further
/// events are published.
pub trait EventSink {
    fn publish(&mut self, event: RepositoryEvent) -> ControlFlow<()>;
}

impl EventSink for Vec<RepositoryEvent> {
    fn publish(&mut self, event: RepositoryEvent) -> ControlFlow<()> {
        self.push(event);
        ControlFlow::Continue(())
    }
}

/// Sink used by the background producer. Must run on a blocking thread of
/// the runtime owning `handle`.
pub(crate) struct ChannelSink {
    tx: mpsc::Sender<RepositoryEvent>,
    cancel: CancellationToken,
    handle: Handle,
}

impl ChannelSink {
    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl EventSink for ChannelSink {
    fn publish(&mut self, event: RepositoryEvent) -> ControlFlow<()> {
        if self.cancel.is_cancelled() {
            return ControlFlow::Break(());
        }

        let tx = &self.tx;
        let cancel = &self.cancel;
        let delivered = self.handle.block_on(async {
            tokio::select! {
                biased;
                () = cancel.cancelled() => false,
                sent = tx.send(event) => sent.is_ok(),
            }
        });

        if delivered {
            ControlFlow::Continue(())
        } else {
            tracing::debug!("Event stream closed or cancelled, stopping producer");
            ControlFlow::Break(())
        }
    }
}

/// Readable end of a walk. Yields events in pre-order and ends once the
/// producer has exhausted the tree.
pub struct ItemStream {
    rx: mpsc::Receiver<RepositoryEvent>,
    cancel: CancellationToken,
}

impl ItemStream {
    /// Creates the stream and the producer-side sink bound to `handle`.
    pub(crate) fn channel(cancel: CancellationToken, handle: Handle) -> (ChannelSink, ItemStream) {
        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let sink = ChannelSink {
            tx,
            cancel: cancel.clone(),
            handle,
        };
        (sink, ItemStream { rx, cancel })
    }

    /// A stream that is already closed and yields nothing.
    pub fn closed() -> Self {
        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        drop(tx);
        Self {
            rx,
            cancel: CancellationToken::new(),
        }
    }

    /// A closed stream holding a single error event.
    pub(crate) fn failed(error: IndexError) -> Self {
        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        // Capacity is at least one and the receiver is alive.
        let _ = tx.try_send(RepositoryEvent::from_error(error));
        Self {
            rx,
            cancel: CancellationToken::new(),
        }
    }

    /// Waits for the next event. `None` once the stream is closed.
    pub async fn next_event(&mut self) -> Option<RepositoryEvent> {
        self.rx.recv().await
    }

    /// Stops the producer. Events already buffered can still be drained.
    pub fn cancel(&mut self) {
        self.cancel.cancel();
        self.rx.close();
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }
}

impl Stream for ItemStream {
    type Item = RepositoryEvent;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().rx.poll_recv(cx)
    }
}

impl Drop for ItemStream {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
