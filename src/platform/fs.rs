// DayzWatch - platform/fs.rs
//
// Lossy text decoding shared by every log source.
//
// ADM files are nominally UTF-8 but player names regularly carry stray
// bytes; a bad byte must never fail the cycle, so it is replaced with U+FFFD.

use std::io;
use std::path::Path;

/// Decode `bytes` lossily and split into newline-stripped lines.
///
/// Both `\n` and `\r\n` terminators are accepted.
pub fn decode_lines(bytes: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(bytes)
        .lines()
        .map(str::to_string)
        .collect()
}

/// Read a whole local file and decode it with [`decode_lines`].
pub fn read_lines_lossy(path: &Path) -> io::Result<Vec<String>> {
    let bytes = std::fs::read(path)?;
    Ok(decode_lines(&bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_lines_strips_terminators() {
        let lines = decode_lines(b"10:00:00 a\r\n10:00:01 b\n10:00:02 c");
        assert_eq!(lines, vec!["10:00:00 a", "10:00:01 b", "10:00:02 c"]);
    }

    #[test]
    fn test_decode_lines_replaces_invalid_bytes() {
        let lines = decode_lines(b"10:00:00 Player \"\xff\xfeBob\" connected\n10:00:01 ok\n");
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("10:00:00 Player"));
        assert!(lines[0].contains('\u{FFFD}'));
        assert_eq!(lines[1], "10:00:01 ok");
    }

    #[test]
    fn test_read_lines_lossy_missing_file_is_error() {
        let dir = tempfile::TempDir::new().expect("tmpdir");
        let err = read_lines_lossy(&dir.path().join("absent.ADM")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
