//! HLS manifest parsing.
//!
//! A manifest is newline-delimited text. Comment lines start with `#`;
//! every other line whose path component carries a known segment suffix
//! is a segment reference, resolved absolute against the manifest URL.
//! Playlist order is preserved, it dictates the byte order of the final
//! output file.

use url::Url;

use crate::error::HlsError;

const SEGMENT_SUFFIXES: &[&str] = &[".ts", ".m4s", ".aac"];

/// Extract the segment URIs from a manifest body, in playlist order.
///
/// Fails with [`HlsError::Manifest`] when no segment references are found
/// or a reference does not resolve against the base URL.
pub fn parse_segments(body: &str, base: &Url) -> Result<Vec<Url>, HlsError> {
    let mut segments = Vec::new();
    for line in body.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        // suffix check ignores any query string
        let path = line.split('?').next().unwrap_or(line);
        if !SEGMENT_SUFFIXES.iter().any(|s| path.ends_with(s)) {
            continue;
        }
        let url = base
            .join(line)
            .map_err(|e| HlsError::Manifest(format!("bad segment reference {line:?}: {e}")))?;
        segments.push(url);
    }

    if segments.is_empty() {
        return Err(HlsError::Manifest("no segment references".into()));
    }
    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://cdn.example.com/hls/show/index.m3u8").unwrap()
    }

    #[test]
    fn test_relative_segments_resolve_in_order() {
        let body = "#EXTM3U\n\
                    #EXT-X-TARGETDURATION:10\n\
                    #EXTINF:9.9,\n\
                    seg-001.ts\n\
                    #EXTINF:9.9,\n\
                    seg-002.ts\n\
                    #EXT-X-ENDLIST\n";

        let segments = parse_segments(body, &base()).unwrap();
        assert_eq!(
            segments
                .iter()
                .map(|u| u.as_str())
                .collect::<Vec<_>>(),
            [
                "https://cdn.example.com/hls/show/seg-001.ts",
                "https://cdn.example.com/hls/show/seg-002.ts",
            ]
        );
    }

    #[test]
    fn test_absolute_and_query_segments() {
        let body = "https://other.example.com/a.m4s?token=abc\nchunk.aac\n";
        let segments = parse_segments(body, &base()).unwrap();
        assert_eq!(segments[0].as_str(), "https://other.example.com/a.m4s?token=abc");
        assert_eq!(segments[1].as_str(), "https://cdn.example.com/hls/show/chunk.aac");
    }

    #[test]
    fn test_non_segment_lines_are_skipped() {
        let body = "#EXTM3U\nvariant/playlist.m3u8\nseg.ts\n";
        let segments = parse_segments(body, &base()).unwrap();
        assert_eq!(segments.len(), 1);
    }

    #[test]
    fn test_empty_manifest_is_an_error() {
        assert!(matches!(
            parse_segments("", &base()),
            Err(HlsError::Manifest(_))
        ));
        assert!(matches!(
            parse_segments("#EXTM3U\n#EXT-X-ENDLIST\n", &base()),
            Err(HlsError::Manifest(_))
        ));
    }
}
