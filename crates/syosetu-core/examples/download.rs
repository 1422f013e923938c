//! Live structure lookup against ncode.syosetu.com.
//!
//! Usage: cargo run --example download -- <novel_id>

use syosetu_core::NovelDownloader;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let novel_id = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "n8920ex".to_string());

    let downloader = NovelDownloader::new(&novel_id)?;
    let structure = downloader.resolve_structure().await?;

    println!("{} by {}", structure.handle.title, structure.handle.author);
    for part in &structure.parts {
        let name = if part.is_flat() { "(no parts)" } else { &part.title };
        println!(
            "  {} -> chapters {}..{}",
            name,
            part.chapters.start,
            part.chapters.end - 1
        );
    }

    Ok(())
}
