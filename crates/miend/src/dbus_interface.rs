use mien_core::{EmotionStats, RecordStore, StoreError};
use zbus::fdo;
use zbus::interface;

/// D-Bus interface for the Mien emotion record daemon.
///
/// Bus name: org.freedesktop.Mien1
/// Object path: /org/freedesktop/Mien1
///
/// Payloads are JSON strings; callers deserialize with the shapes from
/// `mien-core`. Every method recomputes from the data directory's current
/// contents — the daemon keeps no state between calls.
pub struct MienService {
    store: RecordStore,
}

impl MienService {
    pub fn new(store: RecordStore) -> Self {
        Self { store }
    }

    /// Run a store operation off the async executor; file I/O blocks.
    async fn run_store<T, F>(&self, op: F) -> fdo::Result<T>
    where
        T: Send + 'static,
        F: FnOnce(RecordStore) -> T + Send + 'static,
    {
        let store = self.store.clone();
        tokio::task::spawn_blocking(move || op(store))
            .await
            .map_err(|e| fdo::Error::Failed(format!("store task failed: {e}")))
    }
}

#[interface(name = "org.freedesktop.Mien1")]
impl MienService {
    /// Full ordered listing: JSON array of emotion records, sorted by
    /// (timestamp, source file).
    async fn list_records(&self) -> fdo::Result<String> {
        tracing::debug!("list_records requested");
        let records = self.run_store(|s| s.aggregate()).await?.map_err(store_error)?;
        to_json(&records)
    }

    /// Per-image point query. Returns FileNotFound when no data file
    /// matches the image name (extension optional).
    async fn image_report(&self, image: &str) -> fdo::Result<String> {
        tracing::debug!(image, "image_report requested");
        let name = image.to_string();
        let report = self.run_store(move |s| s.image_report(&name)).await?;
        match report {
            Some(report) => to_json(&report),
            None => Err(fdo::Error::FileNotFound(format!(
                "no data for image: {image}"
            ))),
        }
    }

    /// All records carrying the given face id, across all images.
    /// An empty array is a normal result.
    async fn face_history(&self, face_id: i64) -> fdo::Result<String> {
        tracing::debug!(face_id, "face_history requested");
        let records = self
            .run_store(move |s| s.face_history(face_id))
            .await?
            .map_err(store_error)?;
        to_json(&records)
    }

    /// Distribution and average metrics over the full listing. Averages
    /// are JSON null when there are no records.
    async fn statistics(&self) -> fdo::Result<String> {
        tracing::debug!("statistics requested");
        let stats = self
            .run_store(|s| s.aggregate().map(|r| EmotionStats::compute(&r)))
            .await?
            .map_err(store_error)?;
        to_json(&stats)
    }

    /// Daemon health document.
    async fn status(&self) -> fdo::Result<String> {
        let files = self.run_store(|s| s.list_data_files()).await?;
        // Null file count means the data directory is not listable.
        let data_files = match &files {
            Ok(names) => serde_json::json!(names.len()),
            Err(_) => serde_json::Value::Null,
        };
        Ok(serde_json::json!({
            "version": env!("CARGO_PKG_VERSION"),
            "data_dir": self.store.data_dir().display().to_string(),
            "data_files": data_files,
        })
        .to_string())
    }
}

fn store_error(err: StoreError) -> fdo::Error {
    fdo::Error::Failed(err.to_string())
}

fn to_json<T: serde::Serialize>(value: &T) -> fdo::Result<String> {
    serde_json::to_string(value).map_err(|e| fdo::Error::Failed(format!("serialize failed: {e}")))
}
