pub mod config;
pub mod discord;
pub mod error;
pub mod notifier;
pub mod timestream;
pub mod types;

pub use config::Config;
pub use error::{Error, Result};
pub use notifier::{Notifier, Outcome};
pub use types::Response;

pub const APP_NAME: &str = "blindnotifier";

pub fn set_up_logger(calling_module: &str, verbose: bool) -> anyhow::Result<()> {
    Ok(jluszcz_rust_utils::set_up_logger(
        APP_NAME,
        calling_module,
        verbose,
    )?)
}
