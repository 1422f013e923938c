//! syosetu-dl: command-line novel downloader for ncode.syosetu.com.
//!
//! Downloads a novel's parts as text files and optionally converts them to
//! EPUB. Exits non-zero on connection failure or an invalid save format.

mod epub;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use syosetu_core::{
    safe_file_name, ClientConfig, NovelClient, NovelDownloader, SaveFormat, SyosetuError,
};

/// Download a web novel from ncode.syosetu.com as text or EPUB
#[derive(Debug, Parser)]
#[command(name = "syosetu-dl", version, about)]
struct SyosetuArgs {
    /// Novel id, e.g. n8920ex
    #[arg(long)]
    novel_id: String,

    /// Proxy endpoint, e.g. http://localhost:10809
    #[arg(long)]
    proxy: Option<String>,

    /// Output directory
    #[arg(long, default_value = "./downloads")]
    output_dir: PathBuf,

    /// Record each chapter's position in its header, like [総第12話]
    #[arg(long)]
    record_chapter_number: bool,

    /// Save format: txt or epub
    #[arg(long, default_value = "txt")]
    save_format: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    match run(SyosetuArgs::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            if is_connection_error(&e) {
                eprintln!("check your network or proxy");
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(args: SyosetuArgs) -> anyhow::Result<()> {
    // Reject a bad save format before touching the network.
    let save_format: SaveFormat = args.save_format.parse()?;

    let client = NovelClient::with_config(ClientConfig {
        proxy: args.proxy.clone(),
        ..ClientConfig::default()
    })?;
    let downloader = NovelDownloader::with_client(client, &args.novel_id)?
        .record_chapter_index(args.record_chapter_number);

    let structure = downloader.download(&args.output_dir).await?;

    if save_format == SaveFormat::Epub {
        let novel_dir = args
            .output_dir
            .join(safe_file_name(&structure.handle.title));
        epub::convert_directory_txt_to_epub(&novel_dir)?;
    }

    Ok(())
}

/// Whether any cause in the chain is a transport-level connection failure.
///
/// Those get a network/proxy hint instead of a raw error chain.
fn is_connection_error(error: &anyhow::Error) -> bool {
    error.chain().any(|cause| {
        cause
            .downcast_ref::<SyosetuError>()
            .is_some_and(SyosetuError::is_connection)
    })
}
