use log::{debug, error, info};

use crate::config::Config;
use crate::discord::{Webhook, WebhookMessage};
use crate::error::Result;
use crate::timestream::{EventStore, query_string};
use crate::types::{BlindEvent, Response};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Sent(String),
    NoEvents,
}

pub struct Notifier<S, W> {
    config: Config,
    store: S,
    webhook: W,
}

impl<S: EventStore, W: Webhook> Notifier<S, W> {
    pub fn new(config: Config, store: S, webhook: W) -> Self {
        Self {
            config,
            store,
            webhook,
        }
    }

    pub async fn try_notify(&self) -> Result<Outcome> {
        let query = query_string(&self.config.database, &self.config.table);
        let result = self.store.query(&query).await?;

        let Some(row) = result.rows.first() else {
            return Ok(Outcome::NoEvents);
        };

        let event = BlindEvent::from_row(row)?;
        debug!("{event:?}");

        let message = event.to_string();
        self.webhook
            .post(&self.config.webhook_url, &WebhookMessage::new(message.as_str()))
            .await?;

        Ok(Outcome::Sent(message))
    }

    /// Runs one notification, absorbing every failure into the returned response.
    pub async fn notify(&self) -> Response {
        match self.try_notify().await {
            Ok(Outcome::Sent(message)) => {
                info!("Sent \"{message}\"");
                Response::sent()
            }
            Ok(Outcome::NoEvents) => {
                info!("No new events");
                Response::not_found()
            }
            Err(e) => {
                error!("{e}");
                Response::from(&e)
            }
        }
    }
}

#[cfg(test)]
mod test {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::error::Error;
    use crate::types::{Datum, QueryResult, Row};

    const EXAMPLE_QUERY_RESPONSE: &str = include_str!("../tests/fixtures/query.json");

    enum Reply {
        Rows(Vec<Vec<&'static str>>),
        Json(&'static str),
        Fault(&'static str),
    }

    struct FakeStore {
        reply: Reply,
        queries: Mutex<Vec<String>>,
    }

    impl FakeStore {
        fn new(reply: Reply) -> Self {
            Self {
                reply,
                queries: Mutex::new(Vec::new()),
            }
        }
    }

    impl EventStore for FakeStore {
        async fn query(&self, query: &str) -> Result<QueryResult> {
            self.queries.lock().unwrap().push(query.to_owned());

            match &self.reply {
                Reply::Rows(rows) => Ok(QueryResult {
                    rows: rows
                        .iter()
                        .map(|cells| Row {
                            data: cells
                                .iter()
                                .map(|c| Datum {
                                    scalar_value: Some((*c).to_owned()),
                                })
                                .collect(),
                        })
                        .collect(),
                }),
                Reply::Json(json) => Ok(serde_json::from_str(json).unwrap()),
                Reply::Fault(msg) => Err(Error::Query((*msg).into())),
            }
        }
    }

    #[derive(Default)]
    struct FakeWebhook {
        fail: bool,
        posted: Mutex<Vec<(String, serde_json::Value)>>,
        attempts: AtomicUsize,
    }

    impl FakeWebhook {
        fn failing() -> Self {
            Self {
                fail: true,
                ..Default::default()
            }
        }

        fn posted(&self) -> Vec<(String, serde_json::Value)> {
            self.posted.lock().unwrap().clone()
        }
    }

    impl Webhook for FakeWebhook {
        async fn post(&self, url: &str, message: &WebhookMessage) -> Result<()> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(Error::Delivery("HTTP status server error (500)".into()));
            }
            self.posted
                .lock()
                .unwrap()
                .push((url.to_owned(), serde_json::to_value(message).unwrap()));
            Ok(())
        }
    }

    fn config() -> Config {
        Config {
            database: "Blinds".to_owned(),
            table: "Data".to_owned(),
            webhook_url: "https://discord.example/api/webhooks/1/token".to_owned(),
        }
    }

    fn open_row() -> Reply {
        Reply::Rows(vec![vec!["2024-01-01T10:00:00", "Open"]])
    }

    #[tokio::test]
    async fn test_happy_path() {
        let notifier = Notifier::new(config(), FakeStore::new(open_row()), FakeWebhook::default());

        assert_eq!(notifier.notify().await, Response::sent());
        assert_eq!(
            notifier.webhook.posted(),
            vec![(
                "https://discord.example/api/webhooks/1/token".to_owned(),
                serde_json::json!({"content": "New event: Open at 2024-01-01T10:00:00"})
            )]
        );
    }

    #[tokio::test]
    async fn test_sends_configured_query() {
        let notifier = Notifier::new(config(), FakeStore::new(open_row()), FakeWebhook::default());
        notifier.notify().await;

        assert_eq!(
            *notifier.store.queries.lock().unwrap(),
            vec![
                "SELECT * FROM Blinds.Data WHERE measure_name IN ('Open', 'Closing') ORDER BY time DESC LIMIT 1"
                    .to_owned()
            ]
        );
    }

    #[tokio::test]
    async fn test_fixture_response() {
        let notifier = Notifier::new(
            config(),
            FakeStore::new(Reply::Json(EXAMPLE_QUERY_RESPONSE)),
            FakeWebhook::default(),
        );

        assert_eq!(
            notifier.try_notify().await.unwrap(),
            Outcome::Sent("New event: Open at 2024-01-01 10:00:00.000000000".to_owned())
        );
    }

    #[tokio::test]
    async fn test_only_first_row_is_used() {
        let store = FakeStore::new(Reply::Rows(vec![
            vec!["2024-01-02T08:30:00", "Closing"],
            vec!["2024-01-01T10:00:00", "Open"],
        ]));
        let notifier = Notifier::new(config(), store, FakeWebhook::default());

        assert_eq!(
            notifier.try_notify().await.unwrap(),
            Outcome::Sent("New event: Closing at 2024-01-02T08:30:00".to_owned())
        );
        assert_eq!(notifier.webhook.posted().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_rows() {
        let notifier = Notifier::new(
            config(),
            FakeStore::new(Reply::Rows(vec![])),
            FakeWebhook::default(),
        );

        assert_eq!(notifier.notify().await, Response::not_found());
        assert_eq!(notifier.webhook.attempts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_absent_rows() {
        let notifier = Notifier::new(
            config(),
            FakeStore::new(Reply::Json(r#"{"QueryId": "abc", "ColumnInfo": []}"#)),
            FakeWebhook::default(),
        );

        assert_eq!(notifier.notify().await, Response::not_found());
        assert_eq!(notifier.webhook.attempts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_query_fault() {
        let notifier = Notifier::new(
            config(),
            FakeStore::new(Reply::Fault("AccessDeniedException")),
            FakeWebhook::default(),
        );

        assert!(matches!(notifier.try_notify().await, Err(Error::Query(_))));
        assert_eq!(notifier.notify().await, Response::internal_error());
        assert_eq!(notifier.webhook.attempts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_malformed_row() {
        let notifier = Notifier::new(
            config(),
            FakeStore::new(Reply::Rows(vec![vec!["2024-01-01T10:00:00"]])),
            FakeWebhook::default(),
        );

        assert!(matches!(
            notifier.try_notify().await,
            Err(Error::MalformedRow(_))
        ));
        assert_eq!(notifier.notify().await, Response::internal_error());
        assert_eq!(notifier.webhook.attempts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_delivery_failure_is_reported() {
        let notifier = Notifier::new(config(), FakeStore::new(open_row()), FakeWebhook::failing());

        assert!(matches!(notifier.try_notify().await, Err(Error::Delivery(_))));
        assert_eq!(notifier.notify().await, Response::internal_error());
        assert_eq!(notifier.webhook.attempts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_repeated_invocations_match() {
        let notifier = Notifier::new(config(), FakeStore::new(open_row()), FakeWebhook::default());

        let first = notifier.notify().await;
        let second = notifier.notify().await;

        assert_eq!(first, second);
        let posted = notifier.webhook.posted();
        assert_eq!(posted.len(), 2);
        assert_eq!(posted[0], posted[1]);
    }
}
