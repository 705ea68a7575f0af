//! Delimited text reading with encoding and delimiter auto-detection.

use super::{Cell, Sheet, SourceFormat};
use crate::error::{SheetError, SheetResult};

/// Detect the encoding of raw bytes using chardet
pub fn detect_encoding(bytes: &[u8]) -> String {
    let result = chardet::detect(bytes);
    let charset = result.0;

    // Normalize charset names
    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" | "" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Decode bytes to string using the specified encoding
pub fn decode_content(bytes: &[u8], encoding: &str) -> SheetResult<String> {
    let decoded = match encoding.to_lowercase().as_str() {
        "utf-8" | "utf8" | "ascii" => String::from_utf8_lossy(bytes).into_owned(),
        "iso-8859-1" | "latin-1" | "latin1" => {
            encoding_rs::WINDOWS_1252.decode(bytes).0.into_owned()
        }
        "windows-1252" | "cp1252" => encoding_rs::WINDOWS_1252.decode(bytes).0.into_owned(),
        other => {
            let enc = encoding_rs::Encoding::for_label(other.as_bytes())
                .ok_or_else(|| SheetError::Encoding(format!("unsupported encoding '{}'", other)))?;
            enc.decode(bytes).0.into_owned()
        }
    };

    // Excel's "CSV UTF-8" export starts with a BOM
    Ok(decoded.trim_start_matches('\u{feff}').to_string())
}

/// Detect the delimiter by counting occurrences in a header line
pub fn detect_delimiter(line: &str) -> char {
    let separators = [';', ',', '\t', '|'];
    let mut best_sep = ',';
    let mut best_count = 0;

    for &sep in &separators {
        let count = line.matches(sep).count();
        if count > best_count {
            best_count = count;
            best_sep = sep;
        }
    }

    best_sep
}

/// Read delimited text bytes into a [`Sheet`].
///
/// The delimiter is detected on the first non-blank line after the skipped
/// rows, since banner lines above the header rarely contain separators.
pub fn read_delimited(bytes: &[u8], skip_rows: usize) -> SheetResult<Sheet> {
    let encoding = detect_encoding(bytes);
    let content = decode_content(bytes, &encoding)?;

    let header_line = content
        .lines()
        .skip(skip_rows)
        .find(|l| !l.trim().is_empty())
        .ok_or(SheetError::MissingHeader { skip_rows })?;
    let delimiter = detect_delimiter(header_line);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter as u8)
        .from_reader(content.as_bytes());

    let text = content.as_bytes();
    let mut grid = Vec::new();
    let mut next_line = 0;
    for record in reader.records() {
        let record = record?;
        let index = match record.position() {
            Some(p) => record_line(text, p.byte() as usize, p.line().saturating_sub(1) as usize),
            None => next_line,
        };
        next_line = index + 1;
        let cells = record.iter().map(Cell::from_text).collect();
        grid.push((index, cells));
    }

    Sheet::from_grid(grid, skip_rows, SourceFormat::Csv { encoding, delimiter })
}

/// 0-based line a record actually starts on.
///
/// The csv reader reports the position where it began scanning, which is
/// before any empty lines it skipped to reach the record.
fn record_line(text: &[u8], byte: usize, line: usize) -> usize {
    let mut rest = text.get(byte..).unwrap_or_default();
    let mut line = line;
    loop {
        rest = match rest {
            [b'\r', b'\n', tail @ ..] | [b'\n', tail @ ..] | [b'\r', tail @ ..] => tail,
            _ => return line,
        };
        line += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_csv() {
        let csv = "name;age\nAlice;30\nBob;25";
        let sheet = read_delimited(csv.as_bytes(), 0).unwrap();

        assert_eq!(sheet.headers, vec!["name", "age"]);
        assert_eq!(sheet.rows.len(), 2);
        assert_eq!(sheet.rows[0].cells[0], Cell::Text("Alice".into()));
        assert_eq!(sheet.rows[1].cells[1], Cell::Text("25".into()));
    }

    #[test]
    fn test_skip_banner_rows() {
        let csv = "Reporte\n\nGenerado: hoy\n\n\nEstablecimiento,Valoraciones,Cantidad de opiniones\nCLINICA X,SATISFECHO,5\n";
        let sheet = read_delimited(csv.as_bytes(), 5).unwrap();

        assert_eq!(sheet.headers[0], "Establecimiento");
        assert_eq!(sheet.rows.len(), 1);
        assert_eq!(sheet.rows[0].line, 7);
        assert!(matches!(sheet.source, SourceFormat::Csv { delimiter: ',', .. }));
    }

    #[test]
    fn test_blank_lines_before_header() {
        // Header on line 6 with only empty lines above it
        let csv = "\n\n\n\n\nEstablecimiento;Valoraciones;Cantidad de opiniones\n\nHN A;SATISFECHO;3\n";
        let sheet = read_delimited(csv.as_bytes(), 5).unwrap();

        assert_eq!(sheet.headers[0], "Establecimiento");
        assert_eq!(sheet.rows.len(), 1);
        assert_eq!(sheet.rows[0].line, 8);
    }

    #[test]
    fn test_record_line_skips_empty_lines() {
        let text = b"a\n\n\r\nb\n";
        assert_eq!(record_line(text, 2, 1), 3);
        assert_eq!(record_line(text, 0, 0), 0);
        assert_eq!(record_line(text, 99, 4), 4);
    }

    #[test]
    fn test_quoted_values() {
        let csv = "name;value\n\"Alice\";\"Hello; World\"";
        let sheet = read_delimited(csv.as_bytes(), 0).unwrap();
        assert_eq!(sheet.rows[0].cells[1], Cell::Text("Hello; World".into()));
    }

    #[test]
    fn test_missing_values() {
        let csv = "a;b;c\n1;;3";
        let sheet = read_delimited(csv.as_bytes(), 0).unwrap();
        assert_eq!(sheet.rows[0].cells[1], Cell::Empty);
    }

    #[test]
    fn test_empty_input() {
        let err = read_delimited(b"", 0).unwrap_err();
        assert!(matches!(err, SheetError::MissingHeader { .. }));
    }

    #[test]
    fn test_detect_delimiter() {
        assert_eq!(detect_delimiter("a;b;c"), ';');
        assert_eq!(detect_delimiter("a,b,c"), ',');
        assert_eq!(detect_delimiter("a\tb\tc"), '\t');
        assert_eq!(detect_delimiter("a|b|c"), '|');
    }

    #[test]
    fn test_latin1_decoding() {
        // "Clínica" in ISO-8859-1
        let bytes: &[u8] = &[0x43, 0x6C, 0xED, 0x6E, 0x69, 0x63, 0x61];
        let decoded = decode_content(bytes, "iso-8859-1").unwrap();
        assert_eq!(decoded, "Clínica");
    }

    #[test]
    fn test_latin1_label_is_windows_1252() {
        // 0xA4 is '¤' in Latin-1 and '€' only in ISO-8859-15
        let decoded = decode_content(&[0xA4, 0x80], "iso-8859-1").unwrap();
        assert_eq!(decoded, "¤€");
    }

    #[test]
    fn test_bom_stripped() {
        let decoded = decode_content("\u{feff}a,b".as_bytes(), "utf-8").unwrap();
        assert_eq!(decoded, "a,b");
    }
}
