mod cli;

use std::io::Write;
use std::path::Path;
use std::process::ExitCode;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use cmdfiles_client::{
    ClientConfig, Downloader, Endpoint, RemoteFiles, ScratchArea, TransferOptions,
    TransferProgress, UploadReceipt, Uploader, local_target,
};
use cmdfiles_file_ops::format_bytes;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let start = Instant::now();
    let result = run(cli.command).await;
    println!("------ {:?} ------", start.elapsed());

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Command) -> anyhow::Result<()> {
    let scratch = ScratchArea::open(ScratchArea::default_root())
        .context("failed to open scratch directory")?;
    scratch.purge().context("failed to clear scratch directory")?;

    if let Command::Config { host, port } = &command {
        println!("save config host: {host} port: {port}");
        ClientConfig::new(host.as_str(), port.to_string()).save(&scratch.config_path())?;
        return Ok(());
    }

    let endpoint = ClientConfig::load(&scratch.config_path())?.endpoint()?;
    let http = reqwest::Client::new();

    match command {
        Command::Config { .. } => Ok(()),
        Command::Upload { from, to } => upload(http, endpoint, scratch, &from, &to).await,
        Command::Down { from, to } => download(http, endpoint, &from, &to).await,
        Command::Delete { from } => {
            let body = RemoteFiles::new(http, endpoint).delete(&from).await?;
            println!("{body}");
            Ok(())
        }
        Command::List { from } => {
            let body = RemoteFiles::new(http, endpoint).list(&from).await?;
            println!("{body}");
            Ok(())
        }
    }
}

async fn upload(
    http: reqwest::Client,
    endpoint: Endpoint,
    scratch: ScratchArea,
    from: &str,
    to: &str,
) -> anyhow::Result<()> {
    let uploader = Uploader::new(http, endpoint, scratch, TransferOptions::default());

    let (tx, mut rx) = mpsc::channel::<UploadReceipt>(8);
    let printer = tokio::spawn(async move {
        while let Some(receipt) = rx.recv().await {
            println!("post {} {}", receipt.url, receipt.sent.display());
            println!("{}", receipt.body);
        }
    });

    let result = uploader.upload(Path::new(from), to, Some(tx)).await;
    let _ = printer.await;
    let receipts = result.with_context(|| format!("upload of {from} failed"))?;
    tracing::info!(requests = receipts.len(), "upload finished");
    Ok(())
}

async fn download(
    http: reqwest::Client,
    endpoint: Endpoint,
    from: &str,
    to: &str,
) -> anyhow::Result<()> {
    let target = local_target(from, to)?;
    println!(
        "download from {} to {}",
        endpoint.files_url(from),
        target.display()
    );

    let downloader = Downloader::new(http, endpoint);
    let (tx, mut rx) = mpsc::channel::<TransferProgress>(8);
    let printer = tokio::spawn(async move {
        let mut stdout = std::io::stdout();
        while let Some(progress) = rx.recv().await {
            let _ = write!(
                stdout,
                "\r{} {}\t{}/s\t",
                progress.total_bytes,
                format_bytes(progress.total_bytes),
                format_bytes(progress.bytes_per_second as u64)
            );
            let _ = stdout.flush();
        }
    });

    let result = downloader.download(from, to, Some(tx)).await;
    let _ = printer.await;
    println!();
    let report = result.with_context(|| format!("download of {from} failed"))?;
    tracing::info!(path = %report.path.display(), total_bytes = report.total_bytes, "download finished");
    println!("SUCCESS");
    Ok(())
}
