use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use zbus::proxy;

use mien_core::view;
use mien_core::{EmotionRecord, EmotionStats, ImageReport, SortDirection, SortKey, ViewState};

#[proxy(
    interface = "org.freedesktop.Mien1",
    default_service = "org.freedesktop.Mien1",
    default_path = "/org/freedesktop/Mien1"
)]
trait Mien {
    async fn list_records(&self) -> zbus::Result<String>;
    async fn image_report(&self, image: &str) -> zbus::Result<String>;
    async fn face_history(&self, face_id: i64) -> zbus::Result<String>;
    async fn statistics(&self) -> zbus::Result<String>;
    async fn status(&self) -> zbus::Result<String>;
}

#[derive(Parser)]
#[command(name = "mien", about = "Browse emotion records served by miend")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List emotion records, one table page at a time
    List {
        /// Keep only records with this emotion label ("all" keeps everything)
        #[arg(short, long, default_value = "all")]
        emotion: String,
        /// Column to sort by
        #[arg(short, long, value_enum, default_value = "none")]
        sort: SortArg,
        /// Sort direction
        #[arg(short, long, value_enum, default_value = "asc")]
        order: OrderArg,
        /// 1-based page index (20 records per page)
        #[arg(short, long, default_value_t = 1)]
        page: usize,
    },
    /// Show all faces detected in one image
    Image {
        /// Image name, with or without the .json extension
        name: String,
    },
    /// Show the history of one face id across all images
    Face {
        /// Face id to look up
        id: i64,
    },
    /// Show distribution and average statistics
    Stats,
    /// Show daemon status
    Status,
}

#[derive(Clone, Copy, ValueEnum)]
enum SortArg {
    None,
    Valence,
    Arousal,
    Emotion,
    Image,
}

impl From<SortArg> for SortKey {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::None => SortKey::None,
            SortArg::Valence => SortKey::Valence,
            SortArg::Arousal => SortKey::Arousal,
            SortArg::Emotion => SortKey::Emotion,
            SortArg::Image => SortKey::Image,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum OrderArg {
    Asc,
    Desc,
}

impl From<OrderArg> for SortDirection {
    fn from(arg: OrderArg) -> Self {
        match arg {
            OrderArg::Asc => SortDirection::Ascending,
            OrderArg::Desc => SortDirection::Descending,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let conn = zbus::Connection::session()
        .await
        .context("connecting to the session bus")?;
    let daemon = MienProxy::new(&conn)
        .await
        .context("connecting to miend — is the daemon running?")?;

    match cli.command {
        Commands::List {
            emotion,
            sort,
            order,
            page,
        } => {
            let payload = daemon.list_records().await?;
            let records: Vec<EmotionRecord> =
                serde_json::from_str(&payload).context("decoding record listing")?;

            let state = ViewState {
                category: (emotion != "all").then_some(emotion),
                sort_key: sort.into(),
                direction: order.into(),
                page,
            };
            let page = view::render_page(&records, &state);

            if page.total_records == 0 {
                println!("No records");
            } else {
                print_record_table(&page.records);
                println!(
                    "page {}/{} ({} records)",
                    page.page, page.total_pages, page.total_records
                );
            }
        }
        Commands::Image { name } => {
            let payload = daemon.image_report(&name).await?;
            let report: ImageReport =
                serde_json::from_str(&payload).context("decoding image report")?;

            println!("image:  {}", report.image);
            println!("source: {}", report.source_file);
            println!("faces:  {}", report.faces.len());
            for face in &report.faces {
                println!(
                    "  face {:<4} {:<10} valence {:+.3}  arousal {:+.3}  bbox [{:.0}, {:.0}, {:.0}, {:.0}]",
                    face.face_id,
                    face.emotion_name,
                    face.valence,
                    face.arousal,
                    face.bbox[0],
                    face.bbox[1],
                    face.bbox[2],
                    face.bbox[3],
                );
            }
        }
        Commands::Face { id } => {
            let payload = daemon.face_history(id).await?;
            let records: Vec<EmotionRecord> =
                serde_json::from_str(&payload).context("decoding face history")?;

            if records.is_empty() {
                println!("No records for face {id}");
            } else {
                print_record_table(&records);
                println!("{} records for face {id}", records.len());
            }
        }
        Commands::Stats => {
            let payload = daemon.statistics().await?;
            let stats: EmotionStats =
                serde_json::from_str(&payload).context("decoding statistics")?;

            if stats.is_empty() {
                println!("No records");
            } else {
                println!("records: {}", stats.total_records);
                for (label, count) in &stats.emotion_distribution {
                    println!("  {label:<10} {count}");
                }
                // Non-empty, so both averages are present.
                if let (Some(valence), Some(arousal)) =
                    (stats.average_valence, stats.average_arousal)
                {
                    println!("average valence: {valence:+.3}");
                    println!("average arousal: {arousal:+.3}");
                }
            }
        }
        Commands::Status => {
            let payload = daemon.status().await?;
            let doc: serde_json::Value =
                serde_json::from_str(&payload).context("decoding status")?;
            println!("{}", serde_json::to_string_pretty(&doc)?);
        }
    }

    Ok(())
}

fn print_record_table(records: &[EmotionRecord]) {
    println!(
        "{:<20} {:>6}  {:<10} {:>8} {:>8}  {}",
        "image", "face", "emotion", "valence", "arousal", "source"
    );
    for record in records {
        println!(
            "{:<20} {:>6}  {:<10} {:>+8.3} {:>+8.3}  {}",
            record.image,
            record.face_id,
            record.emotion_name,
            record.valence,
            record.arousal,
            record.source_file,
        );
    }
}
