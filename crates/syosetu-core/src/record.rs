//! Chapter record serialization for the text output format.
//!
//! A record is a two-line unit: a header line anchored by the `●` marker
//! and carrying the chapter title (optionally suffixed with the chapter's
//! position), followed by the body line. The marker is the parse anchor
//! for the downstream EPUB converter, so the format is a contract.

use std::path::Path;

use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

use crate::error::Result;
use crate::types::Chapter;

/// Marker glyph opening every record header line
pub const RECORD_MARKER: char = '●';

/// Serialize one chapter to its two-line record.
///
/// With `record_index` set, the header carries the chapter's position
/// within the novel, e.g. `● 第一話 [総第1話]`.
pub fn format_record(chapter: &Chapter, record_index: bool) -> String {
    if record_index {
        format!(
            "{} {} [総第{}話]\n{}\n",
            RECORD_MARKER, chapter.title, chapter.number, chapter.body
        )
    } else {
        format!("{} {}\n{}\n", RECORD_MARKER, chapter.title, chapter.body)
    }
}

/// Append one chapter record to the output file, creating it if needed.
pub async fn append_record(path: &Path, chapter: &Chapter, record_index: bool) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await?;
    file.write_all(format_record(chapter, record_index).as_bytes())
        .await?;
    // tokio files complete writes on a background thread; without the flush
    // the record may not be visible to readers when this future resolves.
    file.flush().await?;
    Ok(())
}

/// Make a part or novel title safe to use as a file name.
///
/// Replaces path separators and characters invalid on common filesystems
/// with an underscore.
pub fn safe_file_name(title: &str) -> String {
    title
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c => c,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chapter() -> Chapter {
        Chapter {
            number: 12,
            title: "第十二話 会議".to_string(),
            body: "本文です。".to_string(),
        }
    }

    #[test]
    fn test_format_record_plain() {
        assert_eq!(
            format_record(&chapter(), false),
            "● 第十二話 会議\n本文です。\n"
        );
    }

    #[test]
    fn test_format_record_with_index() {
        assert_eq!(
            format_record(&chapter(), true),
            "● 第十二話 会議 [総第12話]\n本文です。\n"
        );
    }

    #[test]
    fn test_safe_file_name() {
        assert_eq!(safe_file_name("第一部　断頭台の姫君"), "第一部　断頭台の姫君");
        assert_eq!(safe_file_name("a/b\\c:d"), "a_b_c_d");
        assert_eq!(safe_file_name("why?*"), "why__");
    }

    #[tokio::test]
    async fn test_append_record_grows_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("part.txt");

        let first = Chapter {
            number: 1,
            title: "一".to_string(),
            body: "a".to_string(),
        };
        let second = Chapter {
            number: 2,
            title: "二".to_string(),
            body: "b".to_string(),
        };

        append_record(&path, &first, false).await.unwrap();
        append_record(&path, &second, false).await.unwrap();

        let content = tokio::fs::read_to_string(&path).await.unwrap();
        assert_eq!(content, "● 一\na\n● 二\nb\n");
    }
}
