#[cfg(feature = "http_api")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use anyhow::Context;
    use homework_tracker::{AppConfig, http_api};

    homework_tracker::init_tracing();
    let config = AppConfig::from_env().context("loading configuration")?;
    tracing::info!(
        username = %config.username,
        data_file = %config.data_file.display(),
        "starting homework tracker"
    );
    http_api::serve(config).await?;
    Ok(())
}

#[cfg(not(feature = "http_api"))]
fn main() {
    eprintln!("Rebuild with the `http_api` feature to enable the HTTP server.");
}
