//! Shutdown signal for the fake-logger emitter.
//!
//! The emitter runs as a cooperative task that would otherwise loop forever.
//! This crate provides the one-shot mechanism used to stop it: a single
//! `Broadcaster` and one or more `Watcher` instances. Once the `Broadcaster`
//! fires, every `Watcher` observes the signal exactly once. Dropping the
//! `Broadcaster` without firing counts as firing, so a watcher never hangs on
//! a sender that no longer exists.

#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
#![deny(clippy::dbg_macro)]
#![deny(clippy::unwrap_used)]
#![deny(unused_extern_crates)]
#![deny(unused_allocation)]
#![deny(unused_assignments)]
#![deny(unused_comparisons)]
#![deny(unreachable_pub)]
#![deny(missing_docs)]
#![deny(missing_debug_implementations)]
#![allow(clippy::multiple_crate_versions)]

use tokio::sync::watch;
use tracing::info;

/// Construct a `Watcher` and `Broadcaster` pair.
#[must_use]
pub fn signal() -> (Watcher, Broadcaster) {
    // The watch value only ever moves from `false` to `true`. Receivers are
    // counted by the channel itself, which is what `signal_and_wait` relies on
    // to know when every peer has dropped off.
    let (sender, receiver) = watch::channel(false);

    let w = Watcher {
        receiver,
        signal_received: false,
    };
    let b = Broadcaster { sender };

    (w, b)
}

#[derive(Debug)]
/// Mechanism to notify one or more `Watcher` instances that shutdown has been
/// requested.
pub struct Broadcaster {
    sender: watch::Sender<bool>,
}

impl Broadcaster {
    /// Send the signal through any `Watcher` instances.
    ///
    /// Function will NOT block until all peers have ack'ed the signal.
    pub fn signal(self) {
        self.sender.send_replace(true);
    }

    /// Send the signal through to any `Watcher` instances.
    ///
    /// Function WILL block until every `Watcher` has been dropped, either by
    /// consuming itself in [`Watcher::recv`] or by going out of scope.
    pub async fn signal_and_wait(self) {
        self.sender.send_replace(true);

        let peers = self.sender.receiver_count();
        if peers > 0 {
            info!("Waiting for {peers} peers");
        }
        self.sender.closed().await;
    }
}

/// Errors for `Watcher::try_recv`.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TryRecvError {
    /// The signal has been received and yet `try_recv` was called.
    #[error("signal has been received")]
    SignalReceived,
}

#[derive(Debug, Clone)]
/// Mechanism to watch for shutdown.
///
/// Every clone is a peer of the `Broadcaster`: `signal_and_wait` does not
/// return until all of them are gone.
pub struct Watcher {
    receiver: watch::Receiver<bool>,
    /// Set once this instance has observed the signal.
    signal_received: bool,
}

impl Watcher {
    /// Receive the shutdown notice. This function will block if a notice has
    /// not already been sent.
    ///
    /// If the notice was already observed through `try_recv` this function
    /// returns immediately.
    pub async fn recv(mut self) {
        if self.signal_received {
            // Yield so that a `select!` polling this arm repeatedly cannot
            // starve the others.
            tokio::task::yield_now().await;
            return;
        }

        // An error here means the `Broadcaster` was dropped, which is treated
        // the same as an explicit signal.
        let _ = self.receiver.wait_for(|fired| *fired).await;
        self.signal_received = true;
    }

    /// Check if a shutdown notice has been sent without blocking.
    ///
    /// If the signal has not been received returns Ok(false). If it has been
    /// received Ok(true). All calls after will return
    /// `TryRecvError::SignalReceived`.
    ///
    /// # Errors
    ///
    /// Returns `TryRecvError::SignalReceived` if the signal has already been
    /// observed by this watcher.
    pub fn try_recv(&mut self) -> Result<bool, TryRecvError> {
        if self.signal_received {
            return Err(TryRecvError::SignalReceived);
        }

        let closed = self.receiver.has_changed().is_err();
        let fired = closed || *self.receiver.borrow();
        if fired {
            self.signal_received = true;
        }
        Ok(fired)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::time::timeout;

    use crate::{TryRecvError, signal};

    #[tokio::test]
    async fn basic_signal() {
        let (watcher, broadcaster) = signal();

        let handle = tokio::spawn(watcher.recv());
        broadcaster.signal_and_wait().await;

        handle.await.expect("watcher task panicked");
    }

    #[tokio::test]
    async fn multiple_watchers() {
        let (watcher1, broadcaster) = signal();
        let watcher2 = watcher1.clone();

        let handle1 = tokio::spawn(watcher1.recv());
        let handle2 = tokio::spawn(watcher2.recv());

        broadcaster.signal_and_wait().await;

        handle1.await.expect("watcher task panicked");
        handle2.await.expect("watcher task panicked");
    }

    #[tokio::test]
    async fn signal_and_wait_blocks_on_live_watcher() {
        let (watcher, broadcaster) = signal();

        // The watcher is held but never consumed, so the broadcaster must keep
        // waiting.
        let res = timeout(Duration::from_millis(50), broadcaster.signal_and_wait()).await;
        assert!(res.is_err());
        drop(watcher);
    }

    #[tokio::test]
    async fn signal_and_wait_without_watchers() {
        let (watcher, broadcaster) = signal();
        drop(watcher);

        timeout(Duration::from_secs(1), broadcaster.signal_and_wait())
            .await
            .expect("broadcaster hung with no peers");
    }

    #[test]
    fn try_receive_before_signal() {
        let (mut watcher, broadcaster) = signal();

        assert_eq!(watcher.try_recv(), Ok(false));
        broadcaster.signal();
        assert_eq!(watcher.try_recv(), Ok(true));
    }

    #[test]
    fn try_receive_after_signal() {
        let (mut watcher, broadcaster) = signal();
        broadcaster.signal();

        assert_eq!(watcher.try_recv(), Ok(true));
        // From this point every call to try_recv errors.
        assert_eq!(watcher.try_recv(), Err(TryRecvError::SignalReceived));
    }

    #[test]
    fn dropped_broadcaster_counts_as_signal() {
        let (mut watcher, broadcaster) = signal();
        drop(broadcaster);

        assert_eq!(watcher.try_recv(), Ok(true));
    }

    #[tokio::test]
    async fn recv_after_try_recv_returns() {
        let (mut watcher, broadcaster) = signal();
        broadcaster.signal();
        assert_eq!(watcher.try_recv(), Ok(true));

        timeout(Duration::from_secs(1), watcher.recv())
            .await
            .expect("recv hung after signal was observed");
    }
}
