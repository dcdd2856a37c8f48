use std::fmt::Write as _;

/// Position inside the GraphQL document, 1-based. Columns are counted in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
pub struct Location {
    pub line: u32,
    pub column: u32,
}

impl Location {
    pub fn new(line: u32, column: u32) -> Self {
        Location { line, column }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

const SOURCE_NAME: &str = "GraphQL request";
const MINIFIED_LINE_THRESHOLD: usize = 120;
const MINIFIED_CHUNK_WIDTH: usize = 80;

/// Renders the source excerpt pointing at `location`:
///
/// ```text
/// GraphQL request:1:10
/// 1 | { hello, mistake }
///   |          ^
/// ```
pub fn print_location(document: &str, location: Location) -> String {
    let line_num = location.line.max(1) as usize;
    let column_num = location.column.max(1) as usize;
    let line_index = line_num - 1;

    let lines = split_lines(document);
    let location_line = lines.get(line_index).copied().unwrap_or_default();

    let mut out = format!("{SOURCE_NAME}:{line_num}:{column_num}\n");

    if location_line.chars().count() > MINIFIED_LINE_THRESHOLD {
        let sub_line_index = column_num / MINIFIED_CHUNK_WIDTH;
        let sub_line_column_num = column_num % MINIFIED_CHUNK_WIDTH;
        let sub_lines = chunk_chars(location_line, MINIFIED_CHUNK_WIDTH);

        let mut rows = vec![(format!("{line_num} |"), sub_lines.first().cloned())];
        rows.extend(
            sub_lines
                .iter()
                .skip(1)
                .take(sub_line_index)
                .map(|sub_line| ("|".to_string(), Some(sub_line.clone()))),
        );
        rows.push(("|".to_string(), Some(caret(sub_line_column_num))));
        rows.push(("|".to_string(), sub_lines.get(sub_line_index + 1).cloned()));

        out.push_str(&print_prefixed_lines(rows));
        return out;
    }

    let rows = vec![
        (
            format!("{} |", line_num - 1),
            line_index.checked_sub(1).and_then(|i| lines.get(i)).map(|s| s.to_string()),
        ),
        (format!("{line_num} |"), Some(location_line.to_string())),
        ("|".to_string(), Some(caret(column_num))),
        (format!("{} |", line_num + 1), lines.get(line_index + 1).map(|s| s.to_string())),
    ];
    out.push_str(&print_prefixed_lines(rows));
    out
}

fn split_lines(document: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut rest = document;
    while let Some(index) = rest.find(['\r', '\n']) {
        lines.push(&rest[..index]);
        let skip = if rest[index..].starts_with("\r\n") { 2 } else { 1 };
        rest = &rest[index + skip..];
    }
    lines.push(rest);
    lines
}

fn chunk_chars(line: &str, width: usize) -> Vec<String> {
    let chars = line.chars().collect::<Vec<_>>();
    chars.chunks(width).map(|chunk| chunk.iter().collect()).collect()
}

/// A caret right-aligned on `column`.
fn caret(column: usize) -> String {
    format!("{:>width$}", "^", width = column.max(1))
}

fn print_prefixed_lines(rows: Vec<(String, Option<String>)>) -> String {
    let rows = rows
        .into_iter()
        .filter_map(|(prefix, line)| line.map(|line| (prefix, line)))
        .collect::<Vec<_>>();
    let pad = rows.iter().map(|(prefix, _)| prefix.len()).max().unwrap_or_default();

    let mut out = String::new();
    for (i, (prefix, line)) in rows.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let _ = write!(out, "{prefix:>pad$}");
        if !line.is_empty() {
            out.push(' ');
            out.push_str(line);
        }
    }
    out
}
