//! End-to-end coverage of the notification pipeline: enqueue on the
//! channel queue, drain through the background worker, deliver over all
//! three channels via in-memory fakes.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::sleep;

use backend::domain::events::{DomainEvent, NotificationRequest};
use backend::domain::fanout::NotificationFanout;
use backend::domain::notification::InAppNotification;
use backend::domain::ports::{
    MailDeliveryError, Mailer, MulticastOutcome, NewInAppNotification, NotificationQueue,
    NotificationRepository, NotificationStoreError, OutgoingEmail, PushDeliveryError, PushGateway,
    PushMessage, PushSendError, PushTokenRepository, PushTokenStoreError, RecipientDirectory,
    RecipientLookupError, TokenDelivery,
};
use backend::domain::user::{Recipient, RecipientSelector};
use backend::outbound::queue::{notification_channel, spawn_fanout_worker};

/// Shared chronological log of channel actions, keyed per recipient.
#[derive(Default)]
struct ActionLog {
    entries: Mutex<Vec<String>>,
}

impl ActionLog {
    fn record(&self, entry: String) {
        self.entries.lock().expect("log lock").push(entry);
    }

    fn snapshot(&self) -> Vec<String> {
        self.entries.lock().expect("log lock").clone()
    }
}

struct FakeDirectory {
    recipients: Vec<Recipient>,
}

#[async_trait]
impl RecipientDirectory for FakeDirectory {
    async fn resolve(
        &self,
        _selector: &RecipientSelector,
    ) -> Result<Vec<Recipient>, RecipientLookupError> {
        Ok(self.recipients.clone())
    }
}

struct FakeMailer {
    log: Arc<ActionLog>,
    sent: Mutex<Vec<OutgoingEmail>>,
}

#[async_trait]
impl Mailer for FakeMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailDeliveryError> {
        self.log.record(format!("email:{}", email.to_email));
        self.sent.lock().expect("mailer lock").push(email.clone());
        Ok(())
    }
}

struct FakeNotifications {
    log: Arc<ActionLog>,
    rows: Mutex<Vec<NewInAppNotification>>,
}

#[async_trait]
impl NotificationRepository for FakeNotifications {
    async fn insert(
        &self,
        notification: NewInAppNotification,
    ) -> Result<i32, NotificationStoreError> {
        self.log.record(format!("insert:{}", notification.user_id));
        let mut rows = self.rows.lock().expect("rows lock");
        rows.push(notification);
        Ok(i32::try_from(rows.len()).expect("small test counts"))
    }

    async fn list_for_user(
        &self,
        _user_id: i32,
    ) -> Result<Vec<InAppNotification>, NotificationStoreError> {
        Ok(Vec::new())
    }

    async fn mark_read(&self, _notification_id: i32) -> Result<bool, NotificationStoreError> {
        Ok(true)
    }

    async fn mark_all_read(&self, _user_id: i32) -> Result<u64, NotificationStoreError> {
        Ok(0)
    }
}

struct FakeTokens {
    tokens_by_user: Vec<(i32, Vec<String>)>,
    deactivated: Mutex<Vec<(i32, String)>>,
}

#[async_trait]
impl PushTokenRepository for FakeTokens {
    async fn active_tokens(&self, user_id: i32) -> Result<Vec<String>, PushTokenStoreError> {
        Ok(self
            .tokens_by_user
            .iter()
            .find(|(owner, _)| *owner == user_id)
            .map(|(_, tokens)| tokens.clone())
            .unwrap_or_default())
    }

    async fn upsert(
        &self,
        _user_id: i32,
        _token: &str,
        _device_type: &str,
    ) -> Result<(), PushTokenStoreError> {
        Ok(())
    }

    async fn deactivate(&self, user_id: i32, token: &str) -> Result<bool, PushTokenStoreError> {
        self.deactivated
            .lock()
            .expect("deactivated lock")
            .push((user_id, token.to_owned()));
        Ok(true)
    }
}

struct FakeGateway {
    log: Arc<ActionLog>,
    /// Tokens the provider reports as unregistered.
    dead_tokens: Vec<String>,
}

#[async_trait]
impl PushGateway for FakeGateway {
    async fn send_multicast(
        &self,
        tokens: &[String],
        _message: &PushMessage,
    ) -> Result<MulticastOutcome, PushSendError> {
        self.log.record(format!("push:{}", tokens.join(",")));
        Ok(MulticastOutcome {
            deliveries: tokens
                .iter()
                .map(|token| {
                    if self.dead_tokens.contains(token) {
                        TokenDelivery {
                            success: false,
                            error: Some(PushDeliveryError::Unregistered),
                        }
                    } else {
                        TokenDelivery {
                            success: true,
                            error: None,
                        }
                    }
                })
                .collect(),
        })
    }
}

fn recipient(id: i32) -> Recipient {
    Recipient {
        user_id: Some(id),
        name: format!("Student {id}"),
        email: format!("student{id}@example.com"),
    }
}

struct Pipeline {
    log: Arc<ActionLog>,
    mailer: Arc<FakeMailer>,
    notifications: Arc<FakeNotifications>,
    tokens: Arc<FakeTokens>,
}

fn pipeline(
    recipients: Vec<Recipient>,
    tokens_by_user: Vec<(i32, Vec<String>)>,
    dead_tokens: Vec<String>,
) -> (Pipeline, Arc<NotificationFanout>) {
    let log = Arc::new(ActionLog::default());
    let mailer = Arc::new(FakeMailer {
        log: log.clone(),
        sent: Mutex::new(Vec::new()),
    });
    let notifications = Arc::new(FakeNotifications {
        log: log.clone(),
        rows: Mutex::new(Vec::new()),
    });
    let tokens = Arc::new(FakeTokens {
        tokens_by_user,
        deactivated: Mutex::new(Vec::new()),
    });
    let gateway = Arc::new(FakeGateway {
        log: log.clone(),
        dead_tokens,
    });
    let fanout = Arc::new(NotificationFanout::new(
        Arc::new(FakeDirectory { recipients }),
        notifications.clone(),
        tokens.clone(),
        mailer.clone(),
        Some(gateway),
    ));
    (
        Pipeline {
            log,
            mailer,
            notifications,
            tokens,
        },
        fanout,
    )
}

/// Wait until the predicate holds or a generous deadline passes.
async fn eventually(mut predicate: impl FnMut() -> bool) {
    for _ in 0..200 {
        if predicate() {
            return;
        }
        sleep(Duration::from_millis(10)).await;
    }
    panic!("pipeline did not settle in time");
}

#[tokio::test]
async fn enqueued_event_reaches_every_channel_for_every_recipient() {
    let (parts, fanout) = pipeline(
        vec![recipient(1), recipient(2)],
        vec![(1, vec!["tok-1a".to_owned()])],
        Vec::new(),
    );
    let (queue, receiver) = notification_channel();
    let worker = spawn_fanout_worker(receiver, fanout);

    queue
        .enqueue(NotificationRequest {
            event: DomainEvent::Notice {
                title: "Open day".to_owned(),
                body: "Saturday 10:00".to_owned(),
            },
            recipients: RecipientSelector::Broadcast,
        })
        .expect("enqueue succeeds");

    eventually(|| parts.mailer.sent.lock().expect("mailer lock").len() == 2).await;
    eventually(|| parts.notifications.rows.lock().expect("rows lock").len() == 2).await;

    let log = parts.log.snapshot();
    // Recipient 2 has no tokens, so exactly one push went out.
    assert_eq!(log.iter().filter(|e| e.starts_with("push:")).count(), 1);
    // Per recipient, the in-app insert strictly precedes the push.
    let insert_pos = log
        .iter()
        .position(|e| e == "insert:1")
        .expect("insert for recipient 1");
    let push_pos = log
        .iter()
        .position(|e| e.starts_with("push:tok-1a"))
        .expect("push for recipient 1");
    assert!(insert_pos < push_pos);

    drop(queue);
    worker.await.expect("worker exits cleanly");
}

#[tokio::test]
async fn dead_tokens_are_deactivated_while_live_ones_survive() {
    let (parts, fanout) = pipeline(
        vec![recipient(1)],
        vec![(1, vec!["tok-dead".to_owned(), "tok-live".to_owned()])],
        vec!["tok-dead".to_owned()],
    );
    let (queue, receiver) = notification_channel();
    let worker = spawn_fanout_worker(receiver, fanout);

    queue
        .enqueue(NotificationRequest {
            event: DomainEvent::ExamGraded {
                exam_name: "Charcoal I".to_owned(),
                grade: "A".to_owned(),
            },
            recipients: RecipientSelector::Ids(vec![1]),
        })
        .expect("enqueue succeeds");

    eventually(|| {
        !parts
            .tokens
            .deactivated
            .lock()
            .expect("deactivated lock")
            .is_empty()
    })
    .await;

    assert_eq!(
        parts
            .tokens
            .deactivated
            .lock()
            .expect("deactivated lock")
            .clone(),
        vec![(1, "tok-dead".to_owned())]
    );

    drop(queue);
    worker.await.expect("worker exits cleanly");
}

#[tokio::test]
async fn several_events_drain_in_submission_order() {
    let (parts, fanout) = pipeline(vec![recipient(7)], Vec::new(), Vec::new());
    let (queue, receiver) = notification_channel();
    let worker = spawn_fanout_worker(receiver, fanout);

    for title in ["first", "second", "third"] {
        queue
            .enqueue(NotificationRequest {
                event: DomainEvent::Notice {
                    title: title.to_owned(),
                    body: String::new(),
                },
                recipients: RecipientSelector::Broadcast,
            })
            .expect("enqueue succeeds");
    }

    eventually(|| parts.mailer.sent.lock().expect("mailer lock").len() == 3).await;
    let subjects: Vec<String> = parts
        .mailer
        .sent
        .lock()
        .expect("mailer lock")
        .iter()
        .map(|email| email.subject.clone())
        .collect();
    assert_eq!(
        subjects,
        vec![
            "Notice: first".to_owned(),
            "Notice: second".to_owned(),
            "Notice: third".to_owned()
        ]
    );

    drop(queue);
    worker.await.expect("worker exits cleanly");
}
