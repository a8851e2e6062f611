//! Serve handler: expose the explanation endpoint over HTTP.

use anyhow::Result;
use tracing::debug;

use crate::{config::Config, explain::Explainer, server};

pub async fn run(cfg: &Config, addr: &str) -> Result<()> {
    debug!(api_key_loaded = cfg.api_key().is_some(), "starting explanation server");

    let explainer = Explainer::from_config(cfg)?;
    let app = server::create_app(explainer);
    let (listener, _) = server::bind(addr).await?;
    server::run_server(app, listener).await
}
