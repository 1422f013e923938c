//! Text-to-EPUB conversion.
//!
//! Consumes the downloader's text file contract — one chapter per two-line
//! record, header anchored by the `●` marker — and packages each `.txt`
//! file into one EPUB. Depends only on that contract, not on how the files
//! were produced.

use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use epub_builder::{EpubBuilder, EpubContent, ZipLibrary};
use tracing::info;

use syosetu_core::RECORD_MARKER;

/// One parsed record from a text file.
#[derive(Debug, PartialEq, Eq)]
struct Record {
    title: String,
    body: String,
}

/// Convert every `.txt` file in `dir` into an EPUB next to it.
pub fn convert_directory_txt_to_epub(dir: &Path) -> Result<()> {
    for entry in
        fs::read_dir(dir).with_context(|| format!("reading directory {}", dir.display()))?
    {
        let path = entry?.path();
        if path.extension().is_some_and(|ext| ext == "txt") {
            create_epub_from_txt(&path, dir)?;
        }
    }
    Ok(())
}

/// Convert one text file into `{stem}.epub` inside `output_dir`.
fn create_epub_from_txt(file_path: &Path, output_dir: &Path) -> Result<()> {
    let text = fs::read_to_string(file_path)
        .with_context(|| format!("reading {}", file_path.display()))?;
    let title = file_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("novel");
    let records = split_records(&text);

    let zip = ZipLibrary::new().map_err(|e| anyhow!(e.to_string()))?;
    let mut book = EpubBuilder::new(zip).map_err(|e| anyhow!(e.to_string()))?;
    book.metadata("title", title)
        .map_err(|e| anyhow!(e.to_string()))?;
    book.metadata("lang", "ja")
        .map_err(|e| anyhow!(e.to_string()))?;

    for (i, record) in records.iter().enumerate() {
        let xhtml = chapter_xhtml(&record.title, &record.body);
        book.add_content(
            EpubContent::new(format!("chap_{}.xhtml", i + 1), xhtml.as_bytes())
                .title(&record.title),
        )
        .map_err(|e| anyhow!(e.to_string()))?;
    }

    let out_path = output_dir.join(format!("{}.epub", title));
    let mut out = fs::File::create(&out_path)
        .with_context(|| format!("creating {}", out_path.display()))?;
    book.generate(&mut out).map_err(|e| anyhow!(e.to_string()))?;

    info!(file = %out_path.display(), chapters = records.len(), "epub written");
    Ok(())
}

/// Split file text into records on marker-anchored header lines.
///
/// Lines before the first header are ignored.
fn split_records(text: &str) -> Vec<Record> {
    let header_prefix = format!("{} ", RECORD_MARKER);
    let mut records: Vec<Record> = Vec::new();

    for line in text.lines() {
        if let Some(title) = line.strip_prefix(&header_prefix) {
            records.push(Record {
                title: title.to_string(),
                body: String::new(),
            });
        } else if let Some(current) = records.last_mut() {
            if !current.body.is_empty() {
                current.body.push('\n');
            }
            current.body.push_str(line);
        }
    }

    records
}

/// Minimal XHTML chapter document with the record header as its heading.
fn chapter_xhtml(title: &str, body: &str) -> String {
    let paragraphs: String = body
        .lines()
        .map(|line| format!("<p>{}</p>", escape_xml(line)))
        .collect();

    format!(
        "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n\
         <html xmlns=\"http://www.w3.org/1999/xhtml\">\n\
         <head><title>{title}</title></head>\n\
         <body><h1>{title}</h1>{paragraphs}</body>\n\
         </html>",
        title = escape_xml(title),
        paragraphs = paragraphs
    )
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_records_basic() {
        let text = "● 第一話\n本文一\n● 第二話\n本文二\n";
        let records = split_records(text);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].title, "第一話");
        assert_eq!(records[0].body, "本文一");
        assert_eq!(records[1].title, "第二話");
        assert_eq!(records[1].body, "本文二");
    }

    #[test]
    fn test_split_records_multiline_body() {
        let text = "● t\nline one\nline two\n";
        let records = split_records(text);
        assert_eq!(records[0].body, "line one\nline two");
    }

    #[test]
    fn test_split_records_with_index_suffix() {
        let text = "● 第一話 [総第1話]\n本文\n";
        let records = split_records(text);
        assert_eq!(records[0].title, "第一話 [総第1話]");
    }

    #[test]
    fn test_split_records_ignores_preamble() {
        let text = "noise before any header\n● t\nbody\n";
        let records = split_records(text);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].body, "body");
    }

    #[test]
    fn test_chapter_xhtml_escapes_markup() {
        let xhtml = chapter_xhtml("a & b", "1 < 2");
        assert!(xhtml.contains("<h1>a &amp; b</h1>"));
        assert!(xhtml.contains("<p>1 &lt; 2</p>"));
    }

    #[test]
    fn test_convert_directory_produces_epub_per_txt() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("Part A.txt"), "● 第一話\n本文\n").unwrap();
        fs::write(dir.path().join("Part B.txt"), "● 第二話\n本文\n").unwrap();
        fs::write(dir.path().join("cover.jpg"), b"not text").unwrap();

        convert_directory_txt_to_epub(dir.path()).unwrap();

        assert!(dir.path().join("Part A.epub").exists());
        assert!(dir.path().join("Part B.epub").exists());
        assert!(!dir.path().join("cover.epub").exists());
    }
}
