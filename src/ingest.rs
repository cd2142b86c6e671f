use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TableError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("unclosed quote starting on line {line}")]
    UnclosedQuote { line: usize },
}

/// Read a hierarchy table: one row per path, one column per depth level.
/// Tab-separated for `.tsv`/`.tab`, comma-separated otherwise. Rows come
/// back trimmed, blank rows and exact duplicates dropped.
pub fn read_rows(path: &Path) -> Result<Vec<Vec<String>>, TableError> {
    let contents = std::fs::read_to_string(path).map_err(|source| TableError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let delimiter = match path.extension().and_then(|e| e.to_str()) {
        Some("tsv") | Some("tab") => '\t',
        _ => ',',
    };
    let rows = parse_delimited(&contents, delimiter)?;
    Ok(clean_rows(rows))
}

/// Minimal RFC-4180-style reader: quoted cells may hold delimiters,
/// newlines, and doubled quotes; CR before LF is dropped.
pub fn parse_delimited(input: &str, delimiter: char) -> Result<Vec<Vec<String>>, TableError> {
    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut cell = String::new();
    let mut chars = input.chars().peekable();
    let mut in_quotes = false;
    let mut line = 1;
    let mut quote_line = 1;

    while let Some(ch) = chars.next() {
        if in_quotes {
            match ch {
                '"' => {
                    if chars.peek() == Some(&'"') {
                        cell.push('"');
                        chars.next();
                    } else {
                        in_quotes = false;
                    }
                }
                '\n' => {
                    line += 1;
                    cell.push(ch);
                }
                _ => cell.push(ch),
            }
            continue;
        }
        match ch {
            '"' if cell.is_empty() => {
                in_quotes = true;
                quote_line = line;
            }
            '\r' => {}
            '\n' => {
                line += 1;
                row.push(std::mem::take(&mut cell));
                rows.push(std::mem::take(&mut row));
            }
            c if c == delimiter => {
                row.push(std::mem::take(&mut cell));
            }
            _ => cell.push(ch),
        }
    }

    if in_quotes {
        return Err(TableError::UnclosedQuote { line: quote_line });
    }
    if !cell.is_empty() || !row.is_empty() {
        row.push(cell);
        rows.push(row);
    }
    Ok(rows)
}

/// Trim cells, drop all-blank rows, drop exact duplicate rows keeping the
/// first occurrence.
pub fn clean_rows(rows: Vec<Vec<String>>) -> Vec<Vec<String>> {
    let mut seen: HashSet<Vec<String>> = HashSet::new();
    let mut out = Vec::with_capacity(rows.len());
    for row in rows {
        let trimmed: Vec<String> = row.into_iter().map(|cell| cell.trim().to_string()).collect();
        if trimmed.iter().all(|cell| cell.is_empty()) {
            continue;
        }
        if seen.insert(trimmed.clone()) {
            out.push(trimmed);
        }
    }
    out
}
