//! First-success race over a set of spawned futures.
//!
//! Every contender runs on its own task and reports its outcome on a bounded
//! channel sized to the number of contenders, so a report never blocks even
//! after the race has been decided. The race settles on the first `Ok`;
//! failures are collected in arrival order and only surface when every
//! contender has failed.

use std::future::Future;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// What happens to the remaining contenders once one of them succeeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RaceMode {
    /// Losers keep running to completion; their outcomes are discarded.
    KeepSiblings,
    /// The scope token is cancelled so losers can stop early.
    CancelSiblings,
}

/// How a race ended.
#[derive(Debug)]
pub enum Settlement<T, E> {
    /// The first successful outcome.
    Settled(T),
    /// Every contender failed; errors in arrival order.
    AllFailed(Vec<E>),
    /// The scope was cancelled from outside before anyone succeeded.
    Cancelled,
}

/// Run `contenders` concurrently and settle on the first success.
///
/// `scope` is the token the contenders watch. With
/// [`RaceMode::CancelSiblings`] it is cancelled when the race returns for
/// any reason, including the returned future being dropped.
pub async fn first_success<T, E, F>(
    contenders: Vec<F>,
    scope: &CancellationToken,
    mode: RaceMode,
) -> Settlement<T, E>
where
    F: Future<Output = Result<T, E>> + Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
{
    if scope.is_cancelled() {
        return Settlement::Cancelled;
    }
    if contenders.is_empty() {
        return Settlement::AllFailed(Vec::new());
    }

    let _guard = (mode == RaceMode::CancelSiblings).then(|| scope.clone().drop_guard());

    let total = contenders.len();
    let (tx, mut rx) = mpsc::channel(total);
    for contender in contenders {
        let tx = tx.clone();
        tokio::spawn(async move {
            let outcome = contender.await;
            // Capacity equals the number of senders; a failed send only
            // means the race is over.
            let _ = tx.try_send(outcome);
        });
    }
    drop(tx);

    let mut failures = Vec::with_capacity(total);
    loop {
        tokio::select! {
            biased;
            report = rx.recv() => match report {
                Some(Ok(value)) => return Settlement::Settled(value),
                Some(Err(err)) => failures.push(err),
                None if scope.is_cancelled() => return Settlement::Cancelled,
                None => return Settlement::AllFailed(failures),
            },
            _ = scope.cancelled() => return Settlement::Cancelled,
        }
    }
}
