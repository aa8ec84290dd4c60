//! Joins the walker and a renderer over a bounded channel.
//!
//! One producer task, one consumer loop, one shared cancellation token.
//! The channel provides natural backpressure: the producer suspends on a
//! full channel, the consumer on an empty one. Each event is owned by the
//! consumer once received.

use crate::cancellation::CancellationToken;
use crate::errors::{Error, Result};
use crate::events::{Event, CHANNEL_CAPACITY};
use crossbeam_channel::{bounded, Sender};
use std::thread;

/// The producer's guarded handle to the channel.
///
/// Every send checks cancellation first, so a cancelled pipeline emits no
/// further events. A send into a channel whose consumer has gone away also
/// reports [`Error::Cancelled`]; the consumer's own error, if any, wins in
/// [`run_pipeline`].
pub struct EventSender {
    tx: Sender<Event>,
    token: CancellationToken,
}

impl EventSender {
    /// Sends one event, honoring cancellation.
    pub fn send(&self, event: Event) -> Result<()> {
        self.token.guard()?;
        self.tx.send(event).map_err(|_| Error::Cancelled)
    }

    /// The shared cancellation token, for checks between sends.
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }
}

/// Runs a producer and a consumer concurrently until the stream ends.
///
/// The producer runs on a scoped thread and the channel closes when it
/// returns; the consumer loop runs on the calling thread until the channel
/// closes or the token is cancelled. Returns the first non-cancellation
/// error from either side, preferring the consumer's (a failed consumer
/// makes the producer's sends fail as a side effect).
///
/// # Errors
/// [`Error::Cancelled`] when the token was cancelled and neither side
/// failed for another reason.
pub fn run_pipeline<P>(
    token: &CancellationToken,
    producer: P,
    consumer: &mut dyn FnMut(Event) -> Result<()>,
) -> Result<()>
where
    P: FnOnce(&EventSender) -> Result<()> + Send,
{
    let (tx, rx) = bounded::<Event>(CHANNEL_CAPACITY);
    let sender = EventSender {
        tx,
        token: token.clone(),
    };

    thread::scope(|scope| {
        let producer_handle = scope.spawn(move || {
            let result = producer(&sender);
            // Dropping the sender here closes the channel exactly once.
            result
        });

        let mut consumer_result: Result<()> = Ok(());
        for event in rx.iter() {
            if token.is_cancelled() {
                consumer_result = Err(Error::Cancelled);
                break;
            }
            if let Err(e) = consumer(event) {
                consumer_result = Err(e);
                break;
            }
        }
        // Draining stopped early: drop the receiver so the producer's next
        // send fails and the thread winds down.
        drop(rx);

        let producer_result = match producer_handle.join() {
            Ok(result) => result,
            Err(_) => Err(Error::Render("producer task panicked".to_string())),
        };

        match (consumer_result, producer_result) {
            (Ok(()), Ok(())) => {
                if token.is_cancelled() {
                    Err(Error::Cancelled)
                } else {
                    Ok(())
                }
            }
            (Err(consumer_error), Err(producer_error)) => {
                if consumer_error.is_cancelled() && !producer_error.is_cancelled() {
                    Err(producer_error)
                } else {
                    Err(consumer_error)
                }
            }
            (Err(e), Ok(())) | (Ok(()), Err(e)) => Err(e),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn start_event(name: &str) -> Event {
        Event::start(PathBuf::from(name))
    }

    #[test]
    fn test_events_arrive_in_order() -> Result<()> {
        let token = CancellationToken::new();
        let mut seen = Vec::new();
        run_pipeline(
            &token,
            |out| {
                for index in 0..100 {
                    out.send(start_event(&format!("root-{index}")))?;
                }
                Ok(())
            },
            &mut |event| {
                if let Some(path) = &event.path {
                    seen.push(path.display().to_string());
                }
                Ok(())
            },
        )?;
        assert_eq!(seen.len(), 100);
        assert_eq!(seen[0], "root-0");
        assert_eq!(seen[99], "root-99");
        Ok(())
    }

    #[test]
    fn test_consumer_error_propagates_and_stops_producer() {
        let token = CancellationToken::new();
        let result = run_pipeline(
            &token,
            |out| {
                // Far more events than the channel holds; the consumer's
                // failure must unblock us.
                for index in 0..10_000 {
                    out.send(start_event(&format!("root-{index}")))?;
                }
                Ok(())
            },
            &mut |_| Err(Error::Render("boom".to_string())),
        );
        match result {
            Err(Error::Render(message)) => assert_eq!(message, "boom"),
            other => panic!("expected consumer error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_producer_error_propagates() {
        let token = CancellationToken::new();
        let result = run_pipeline(
            &token,
            |out| {
                out.send(start_event("root"))?;
                Err(Error::NoValidPaths)
            },
            &mut |_| Ok(()),
        );
        assert!(matches!(result, Err(Error::NoValidPaths)));
    }

    #[test]
    fn test_cancelled_before_start_emits_nothing() {
        let token = CancellationToken::new();
        token.cancel();
        let mut count = 0usize;
        let result = run_pipeline(
            &token,
            |out| {
                out.send(start_event("root"))?;
                Ok(())
            },
            &mut |_| {
                count += 1;
                Ok(())
            },
        );
        assert!(matches!(result, Err(Error::Cancelled)));
        assert_eq!(count, 0);
    }

    #[test]
    fn test_cancel_mid_stream_terminates_promptly() {
        let token = CancellationToken::new();
        let cancel_after = 10usize;
        let mut seen = 0usize;
        let token_clone = token.clone();
        let result = run_pipeline(
            &token,
            |out| {
                for index in 0..1_000_000 {
                    out.send(start_event(&format!("root-{index}")))?;
                }
                Ok(())
            },
            &mut |_| {
                seen += 1;
                if seen == cancel_after {
                    token_clone.cancel();
                }
                Ok(())
            },
        );
        assert!(matches!(result, Err(Error::Cancelled)));
        // Bounded channel: the producer cannot have raced far past the
        // consumer before its next send observed the cancellation.
        assert!(seen <= cancel_after + CHANNEL_CAPACITY);
    }
}
