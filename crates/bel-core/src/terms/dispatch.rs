//! Timed dispatch of collaborator calls.
//!
//! Each call runs on a worker thread and is awaited with a deadline; a call
//! that misses its deadline counts as a lookup miss and its worker is left to
//! finish on its own. Results always come back in input order.

use std::{
    sync::{
        Arc,
        mpsc::{self, Receiver, RecvTimeoutError},
    },
    thread,
    time::{Duration, Instant},
};

use log::{trace, warn};

use crate::{error::LookupError, terms::TermId};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Timeout and concurrency policy for collaborator calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookupOptions {
    /// `None` calls the collaborator inline, without a deadline.
    timeout: Option<Duration>,
    /// Start all calls of a batch together and join them in order.
    concurrent: bool,
}

impl Default for LookupOptions {
    fn default() -> Self {
        Self {
            timeout: Some(DEFAULT_TIMEOUT),
            concurrent: true,
        }
    }
}

impl LookupOptions {
    pub fn new(timeout: Option<Duration>, concurrent: bool) -> Self {
        Self {
            timeout,
            concurrent,
        }
    }

    /// Inline calls, no deadline, no worker threads.
    pub fn inline() -> Self {
        Self::new(None, false)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn concurrent(&self) -> bool {
        self.concurrent
    }
}

/// Run `lookup` for every term, honouring the timeout policy.
///
/// Returns one entry per term, in input order: `Some` with the collaborator's
/// answer, or `None` when the call timed out.
///
/// # Errors
///
/// Propagates the first collaborator error in input order, and reports a
/// worker that stopped without answering (e.g. it panicked).
pub fn lookup_all<T, F>(
    terms: &[TermId],
    options: &LookupOptions,
    lookup: F,
) -> Result<Vec<Option<T>>, LookupError>
where
    T: Send + 'static,
    F: Fn(&TermId) -> Result<T, LookupError> + Send + Sync + 'static,
{
    let Some(timeout) = options.timeout else {
        return terms.iter().map(|term| lookup(term).map(Some)).collect();
    };

    trace!(terms = terms.len(), concurrent = options.concurrent; "Dispatching term lookups");
    let lookup = Arc::new(lookup);

    if options.concurrent {
        let deadline = Instant::now() + timeout;
        let pending: Vec<_> = terms.iter().map(|term| spawn(term, &lookup)).collect();
        pending
            .into_iter()
            .zip(terms)
            .map(|(receiver, term)| wait(receiver, deadline, term))
            .collect()
    } else {
        terms
            .iter()
            .map(|term| {
                let receiver = spawn(term, &lookup);
                wait(receiver, Instant::now() + timeout, term)
            })
            .collect()
    }
}

fn spawn<T, F>(term: &TermId, lookup: &Arc<F>) -> Receiver<Result<T, LookupError>>
where
    T: Send + 'static,
    F: Fn(&TermId) -> Result<T, LookupError> + Send + Sync + 'static,
{
    let (sender, receiver) = mpsc::channel();
    let term = term.clone();
    let lookup = Arc::clone(lookup);
    thread::spawn(move || {
        // The receiver is gone once the deadline passed.
        let _ = sender.send(lookup(&term));
    });
    receiver
}

fn wait<T>(
    receiver: Receiver<Result<T, LookupError>>,
    deadline: Instant,
    term: &TermId,
) -> Result<Option<T>, LookupError> {
    let remaining = deadline.saturating_duration_since(Instant::now());
    match receiver.recv_timeout(remaining) {
        Ok(result) => result.map(Some),
        Err(RecvTimeoutError::Timeout) => {
            warn!(term:% = term; "Term lookup timed out, treating as a miss");
            Ok(None)
        }
        Err(RecvTimeoutError::Disconnected) => Err(LookupError::Aborted {
            term: term.to_string(),
        }),
    }
}
