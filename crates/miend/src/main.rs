use anyhow::Result;
use tracing_subscriber::EnvFilter;

mod config;
mod dbus_interface;

use config::Config;
use dbus_interface::MienService;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    tracing::info!("miend starting");

    let config = Config::from_env();
    tracing::info!(data_dir = %config.data_dir.display(), "serving emotion records");

    let store = mien_core::RecordStore::new(config.data_dir);
    let service = MienService::new(store);

    let _conn = zbus::connection::Builder::session()?
        .name("org.freedesktop.Mien1")?
        .serve_at("/org/freedesktop/Mien1", service)?
        .build()
        .await?;

    tracing::info!("miend ready");

    // Keep running until signaled
    tokio::signal::ctrl_c().await?;
    tracing::info!("miend shutting down");

    Ok(())
}
