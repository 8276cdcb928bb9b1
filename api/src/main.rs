use anyhow::Context;

use cb_api::logging::init_logging;
use cb_shared::config::AppConfig;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env().context("invalid configuration")?;
    init_logging(&config.logging)?;

    cb_api::run(config).await
}
