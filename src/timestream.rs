use std::future::Future;
use std::sync::Arc;

use aws_config::{BehaviorVersion, SdkConfig};
use aws_sdk_timestreamquery::Client;
use aws_sdk_timestreamquery::error::DisplayErrorContext;
use aws_sdk_timestreamquery::operation::query::QueryOutput;
use log::{debug, trace};
use tokio::sync::OnceCell;

use crate::error::{Error, Result};
use crate::types::{Datum, QueryResult, Row};

pub fn query_string(database: &str, table: &str) -> String {
    format!(
        "SELECT * FROM {database}.{table} WHERE measure_name IN ('Open', 'Closing') ORDER BY time DESC LIMIT 1"
    )
}

pub trait EventStore {
    fn query(&self, query: &str) -> impl Future<Output = Result<QueryResult>> + Send;
}

#[derive(Clone)]
pub struct TimestreamStore {
    config: SdkConfig,
    client: Arc<OnceCell<Client>>,
}

impl TimestreamStore {
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            config: config.clone(),
            client: Arc::new(OnceCell::new()),
        }
    }

    pub async fn from_env() -> Self {
        Self::new(&aws_config::load_defaults(BehaviorVersion::latest()).await)
    }

    /// Timestream only answers on discovered endpoints. Discovery runs on first use, and is
    /// retried on the next query if it fails.
    async fn client(&self) -> Result<&Client> {
        self.client
            .get_or_try_init(|| async {
                debug!("Discovering Timestream endpoint");
                let (client, reload) = Client::new(&self.config)
                    .with_endpoint_discovery_enabled()
                    .await
                    .map_err(Error::Query)?;
                tokio::spawn(reload.reload_task());
                Ok::<_, Error>(client)
            })
            .await
    }
}

impl EventStore for TimestreamStore {
    async fn query(&self, query: &str) -> Result<QueryResult> {
        debug!("Querying Timestream: {query}");

        let output = self
            .client()
            .await?
            .query()
            .query_string(query)
            .send()
            .await
            .map_err(|e| Error::Query(DisplayErrorContext(&e).to_string().into()))?;
        trace!("{output:?}");

        Ok(QueryResult::from(&output))
    }
}

impl From<&QueryOutput> for QueryResult {
    fn from(output: &QueryOutput) -> Self {
        Self {
            rows: output
                .rows()
                .iter()
                .map(|row| Row {
                    data: row
                        .data()
                        .iter()
                        .map(|datum| Datum {
                            scalar_value: datum.scalar_value().map(str::to_owned),
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}
