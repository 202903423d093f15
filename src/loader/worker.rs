//! Background thread that fetches and decodes images (native only).

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use super::{decode_image, DecodedImage, ImageFetcher, LoadError, LoadTicket};

/// Result of one request, tagged with the ticket it was made for.
#[derive(Debug)]
pub struct DecodeOutcome {
    pub ticket: LoadTicket,
    pub url: String,
    pub result: Result<DecodedImage, LoadError>,
}

struct DecodeRequest {
    ticket: LoadTicket,
    url: String,
}

/// Message sent to the decoder thread.
enum ThreadMessage {
    Decode(DecodeRequest),
    Shutdown,
}

/// Manages a background thread for image fetch + decode.
///
/// Requests are handled in order. Results are polled from the UI thread with
/// [`DecoderThread::try_recv`]; the session decides whether a ticket is
/// still current.
pub struct DecoderThread {
    request_tx: Sender<ThreadMessage>,
    result_rx: Receiver<DecodeOutcome>,
    /// Joined on drop
    thread_handle: Option<JoinHandle<()>>,
    pending: usize,
}

impl DecoderThread {
    /// Spawn a decoder thread reading bytes through `fetcher`.
    pub fn spawn<F: ImageFetcher>(fetcher: F) -> Result<Self, LoadError> {
        let (request_tx, request_rx) = mpsc::channel::<ThreadMessage>();
        let (result_tx, result_rx) = mpsc::channel::<DecodeOutcome>();

        let thread_handle = thread::Builder::new()
            .name("image-decoder".to_string())
            .spawn(move || {
                log::info!("Image decoder thread started ({})", fetcher.id());
                Self::thread_loop(&fetcher, request_rx, result_tx);
                log::info!("Image decoder thread exiting");
            })
            .map_err(|e| LoadError::Fetch {
                url: String::new(),
                reason: format!("Failed to spawn decoder thread: {}", e),
            })?;

        Ok(Self {
            request_tx,
            result_rx,
            thread_handle: Some(thread_handle),
            pending: 0,
        })
    }

    fn thread_loop<F: ImageFetcher>(
        fetcher: &F,
        request_rx: Receiver<ThreadMessage>,
        result_tx: Sender<DecodeOutcome>,
    ) {
        loop {
            match request_rx.recv() {
                Ok(ThreadMessage::Decode(DecodeRequest { ticket, url })) => {
                    log::debug!("Loading {} for ticket {}", url, ticket.id());
                    let result = fetcher.fetch(&url).and_then(|bytes| decode_image(&bytes));
                    if result_tx.send(DecodeOutcome { ticket, url, result }).is_err() {
                        log::warn!("Result channel closed, decoder thread exiting");
                        break;
                    }
                }
                Ok(ThreadMessage::Shutdown) => {
                    log::debug!("Received shutdown signal");
                    break;
                }
                Err(_) => {
                    log::debug!("Request channel closed, decoder thread exiting");
                    break;
                }
            }
        }
    }

    /// Queue a fetch + decode of `url` for `ticket`.
    pub fn request(&mut self, ticket: LoadTicket, url: impl Into<String>) {
        let request = DecodeRequest {
            ticket,
            url: url.into(),
        };
        if self.request_tx.send(ThreadMessage::Decode(request)).is_err() {
            log::error!("Failed to send decode request: channel closed");
        } else {
            self.pending += 1;
        }
    }

    /// Take one completed result. Non-blocking.
    pub fn try_recv(&mut self) -> Option<DecodeOutcome> {
        match self.result_rx.try_recv() {
            Ok(outcome) => {
                self.pending = self.pending.saturating_sub(1);
                Some(outcome)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                log::warn!("Decoder thread disconnected");
                None
            }
        }
    }

    /// Wait up to `timeout` for a result.
    pub fn recv_timeout(&mut self, timeout: Duration) -> Option<DecodeOutcome> {
        let outcome = self.result_rx.recv_timeout(timeout).ok()?;
        self.pending = self.pending.saturating_sub(1);
        Some(outcome)
    }

    /// Number of requests without a result yet.
    pub fn pending_count(&self) -> usize {
        self.pending
    }
}

impl Drop for DecoderThread {
    fn drop(&mut self) {
        log::debug!("Shutting down image decoder thread");

        let _ = self.request_tx.send(ThreadMessage::Shutdown);

        if let Some(handle) = self.thread_handle.take() {
            if let Err(e) = handle.join() {
                log::warn!("Decoder thread panicked: {:?}", e);
            }
        }
    }
}
