use blindnotifier::discord::DiscordWebhook;
use blindnotifier::timestream::TimestreamStore;
use blindnotifier::{APP_NAME, Config, Notifier, Response};
use jluszcz_rust_utils::lambda;
use lambda_runtime::{LambdaEvent, service_fn};
use log::error;
use serde_json::Value;

#[tokio::main]
async fn main() -> Result<(), lambda_runtime::Error> {
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();
    lambda::init(APP_NAME, module_path!(), false).await?;

    let store = TimestreamStore::from_env().await;
    let webhook = DiscordWebhook::new();

    let func = service_fn(move |event| handler(event, store.clone(), webhook.clone()));
    lambda_runtime::run(func).await?;
    Ok(())
}

async fn handler(
    _event: LambdaEvent<Value>,
    store: TimestreamStore,
    webhook: DiscordWebhook,
) -> Result<Response, lambda_runtime::Error> {
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{e}");
            return Ok(Response::from(&e));
        }
    };

    Ok(Notifier::new(config, store, webhook).notify().await)
}
