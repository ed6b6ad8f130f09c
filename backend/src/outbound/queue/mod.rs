//! In-process fan-out queue adapter over a Tokio channel.
//!
//! Deliveries are durable only for the process lifetime; the bounded feed
//! retention and idempotent appends keep a restart safe, just lossy for
//! deliveries that were still in flight.

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::domain::ports::{DeliveryDispatchError, FanoutDelivery, FanoutQueue};

/// Sender half of the fan-out channel, implementing the dispatch port.
#[derive(Clone)]
pub struct TokioFanoutQueue {
    tx: mpsc::UnboundedSender<FanoutDelivery>,
}

/// Create a connected queue/receiver pair.
///
/// The receiver side is handed to
/// [`crate::domain::fanout::FanoutWorker::run`]; the sender side goes into
/// the timeline service. Dropping the receiver closes the queue, after which
/// `enqueue` fails with [`DeliveryDispatchError::Closed`].
pub fn fanout_channel() -> (TokioFanoutQueue, mpsc::UnboundedReceiver<FanoutDelivery>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (TokioFanoutQueue { tx }, rx)
}

#[async_trait]
impl FanoutQueue for TokioFanoutQueue {
    async fn enqueue(&self, delivery: FanoutDelivery) -> Result<(), DeliveryDispatchError> {
        self.tx
            .send(delivery)
            .map_err(|_| DeliveryDispatchError::closed("fan-out worker has shut down"))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::domain::feed::FeedEntry;
    use crate::domain::message::{MessageId, MessageText};
    use crate::domain::user::{AuthorProfile, Email, UserId, Username};

    fn delivery() -> FanoutDelivery {
        FanoutDelivery {
            recipient: UserId::random(),
            entry: FeedEntry {
                message_id: MessageId::random(),
                author: AuthorProfile {
                    id: UserId::random(),
                    username: Username::new("alice").expect("valid username"),
                    email: Email::new("alice@example.com").expect("valid email"),
                },
                text: MessageText::new("hello").expect("valid text"),
                posted_at: Utc
                    .with_ymd_and_hms(2026, 8, 1, 12, 0, 0)
                    .single()
                    .expect("valid timestamp"),
            },
        }
    }

    #[tokio::test]
    async fn enqueued_deliveries_reach_the_receiver() {
        let (queue, mut rx) = fanout_channel();
        let sent = delivery();

        queue.enqueue(sent.clone()).await.expect("enqueue");
        let received = rx.recv().await.expect("delivery received");
        assert_eq!(received, sent);
    }

    #[tokio::test]
    async fn enqueue_after_worker_shutdown_reports_closed() {
        let (queue, rx) = fanout_channel();
        drop(rx);

        let err = queue
            .enqueue(delivery())
            .await
            .expect_err("closed queue must reject");
        assert!(matches!(err, DeliveryDispatchError::Closed { .. }));
    }
}
