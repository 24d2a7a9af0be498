//! HTML fragments shared by issue bodies and comments.
//!
//! GitHub renders these inside Markdown, so blank lines inside a table cell
//! would start an indented code block; [`indent`] stops at the first one.

/// Escapes text for use inside HTML.
#[must_use]
pub fn escape(text: &str) -> String {
    handlebars::html_escape(text)
}

/// Renders a borderless layout table.
///
/// A row shorter than `width` lets its last cell span the remaining columns.
/// The first of two cells holding a single image is fixed to avatar width.
#[must_use]
pub fn build_table<S: AsRef<str>>(width: usize, rows: &[Vec<S>]) -> String {
    let mut out = String::from("<table>\n");
    for (row_index, row) in rows.iter().enumerate() {
        if row_index > 0 {
            out.push_str("<tr></tr>\n");
        }
        out.push_str("<tr>\n");
        for (index, cell) in row.iter().enumerate() {
            let cell = cell.as_ref();
            if index == row.len() - 1 && row.len() < width {
                out.push_str(&format!("  <td colspan=\"{}\">\n", width - index));
            } else if index == 0
                && row.len() == 2
                && cell.starts_with("<img src=\"")
                && !cell.contains('\n')
            {
                out.push_str("  <td width=\"60\">\n");
            } else {
                out.push_str("  <td>\n");
            }
            let mut cell = indent("    ", cell);
            if !cell.ends_with('\n') {
                cell.push('\n');
            }
            out.push_str(&cell);
            out.push_str("  </td>\n");
        }
        out.push_str("</tr>\n");
    }
    out.push_str("</table>\n");
    out
}

/// Renders a collapsible block.
#[must_use]
pub fn build_details(prefix: &str, summary: &str, details: &str) -> String {
    format!(
        "{prefix}<details>\n{prefix}  <summary>{summary}</summary>\n{}{prefix}</details>\n",
        indent(&format!("{prefix}  "), details)
    )
}

/// Indents lines up to the first blank one; fenced code is left untouched.
#[must_use]
pub fn indent(prefix: &str, text: &str) -> String {
    if text.contains("```") {
        return text.to_string();
    }
    let mut lines: Vec<String> = text.split('\n').map(str::to_string).collect();
    for line in &mut lines {
        if line.is_empty() {
            break;
        }
        line.insert_str(0, prefix);
    }
    lines.join("\n")
}

/// Returns `unit` or its plural.
#[must_use]
pub fn plural_unit(count: u64, unit: &str) -> String {
    if count == 1 {
        unit.to_string()
    } else {
        format!("{unit}s")
    }
}

/// Returns e.g. `"3 files"`.
#[must_use]
pub fn plural(count: u64, unit: &str) -> String {
    format!("{count} {}", plural_unit(count, unit))
}

/// Returns the 7-character abbreviation of a commit SHA.
#[must_use]
pub fn short_sha(sha: &str) -> &str {
    sha.get(..7).unwrap_or(sha)
}

/// Joins phrases as `"a, b and c"`.
#[must_use]
pub fn join_phrases<S: AsRef<str>>(phrases: &[S]) -> String {
    match phrases {
        [] => String::new(),
        [only] => only.as_ref().to_string(),
        [init @ .., last] => format!(
            "{} and {}",
            init.iter()
                .map(AsRef::as_ref)
                .collect::<Vec<_>>()
                .join(", "),
            last.as_ref()
        ),
    }
}
