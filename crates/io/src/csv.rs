// Lenient reading of CSV import files

use std::io::Read;
use std::path::Path;

/// Read a file and convert to UTF-8 if needed (handles Windows-1252, Latin-1, etc.)
///
/// Spreadsheet tools on Windows still export CSV in the legacy codepage, which
/// mangles the accented header names (`Año`, `Inversión ($)`) if read as UTF-8.
pub fn read_file_as_utf8(path: &Path) -> Result<String, String> {
    let mut file = std::fs::File::open(path)
        .map_err(|e| format!("failed to open {}: {}", path.display(), e))?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)
        .map_err(|e| format!("failed to read {}: {}", path.display(), e))?;

    // Try UTF-8 first; on failure, recover the buffer from the error
    match String::from_utf8(bytes) {
        Ok(s) => Ok(s),
        Err(e) => {
            let bytes = e.into_bytes();
            // Fall back to Windows-1252 (common for Excel-exported CSVs)
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            Ok(decoded.into_owned())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn utf8_files_read_verbatim() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("rows.csv");
        fs::write(&path, "Año,Canal\n2025,WHATSAPP\n").unwrap();

        let content = read_file_as_utf8(&path).unwrap();
        assert_eq!(content, "Año,Canal\n2025,WHATSAPP\n");
    }

    #[test]
    fn windows_1252_files_decode_accents() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("legacy.csv");
        // "Año,Inversión\n" with ñ=0xF1 and ó=0xF3 in Windows-1252
        let bytes: Vec<u8> = vec![
            b'A', 0xF1, b'o', b',', b'I', b'n', b'v', b'e', b'r', b's', b'i', 0xF3, b'n', b'\n',
        ];
        fs::write(&path, &bytes).unwrap();

        let content = read_file_as_utf8(&path).unwrap();
        assert_eq!(content, "Año,Inversión\n");
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = read_file_as_utf8(Path::new("/nonexistent/rows.csv")).unwrap_err();
        assert!(err.contains("/nonexistent/rows.csv"), "got: {err}");
    }
}
