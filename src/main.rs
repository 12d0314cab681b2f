use std::fs::File;

use futures::{StreamExt, stream};
use tracing::info;

use writeoff_engine::batch::BatchPoster;
use writeoff_engine::config::AppConfig;
use writeoff_engine::domain::{RequestStream, WriteOffRequest};
use writeoff_engine::ingestion::{self, RequestCsvReader};
use writeoff_engine::memory_store::InMemoryStore;
use writeoff_engine::output::ReportWriter;
use writeoff_engine::poster::WriteOffPoster;
use writeoff_engine::reconcile::{LogReconciliation, ReconciliationSink, needs_reconciliation};
use writeoff_engine::telemetry;

#[tokio::main] // using Tokio runtime for async
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    telemetry::init_tracing()?;

    let config = AppConfig::from_env()?;
    info!(mode = ?config.posting_mode, "starting write-off batch");

    // Set up the components
    let store = InMemoryStore::new(config.posting_mode);
    for vendor in ingestion::load_vendors(File::open(&config.vendors_path)?)? {
        store.seed(vendor)?;
    }

    let mut reader = RequestCsvReader::new(File::open(&config.requests_path)?);
    let items: Vec<_> = reader.stream().collect().await;
    let requests: Vec<Option<WriteOffRequest>> =
        items.iter().map(|item| item.as_ref().ok().cloned()).collect();

    let batch = BatchPoster::new(WriteOffPoster::new(store.clone(), config.poster));
    let results = batch.post_stream(stream::iter(items)).await?;

    let reconciliation = LogReconciliation::default();
    for (idx, result) in results.iter().enumerate() {
        if let Err(e) = result {
            if needs_reconciliation(e) {
                reconciliation.report(idx + 1, e);
            }
        }
    }

    let mut report = ReportWriter::new(std::io::stdout().lock());
    report.write_results(&requests, &results)?;
    report.write_vendors(&store.vendors()?)?;
    report.flush()?;

    Ok(())
}
