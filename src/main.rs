use folio::FolioError;
use folio::config::fetch_config;

#[tokio::main]
async fn main() -> Result<(), FolioError> {
    let config = fetch_config()?;

    // Logs go to a file under the data dir; the terminal belongs to the UI.
    std::fs::create_dir_all(&config.data_dir)
        .map_err(|e| FolioError::Io(format!("create data dir: {e}")))?;
    let log_file = std::fs::File::create(config.data_dir.join("folio.log"))
        .map_err(|e| FolioError::Io(format!("open log file: {e}")))?;
    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .init();

    folio::tui::run(config).await
}
