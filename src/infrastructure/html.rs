//! Minimal tolerant HTML table scanning.
//!
//! The source page is old-school server-rendered markup; we only need to
//! pull one table out of it by position. Scanning is case-insensitive and
//! local to known blocks, so attribute order, whitespace and harmless
//! markup noise do not matter. Nested tables count as their own entries
//! in document order, matching how table collections are usually indexed.

/// Number of `<table>` elements in the document, nested ones included.
pub fn table_count(html: &str) -> usize {
    open_tag_positions(html, "table").len()
}

/// Cell text of the table at `index` in document order, row by row.
/// Returns `None` when the document has no table at that index.
pub fn extract_table(html: &str, index: usize) -> Option<Vec<Vec<String>>> {
    let block = table_block(html, index)?;
    let mut rows = Vec::new();
    for row_block in element_blocks(block, "tr") {
        let mut cells: Vec<(usize, String)> = Vec::new();
        for tag in ["td", "th"] {
            for (offset, cell_block) in element_blocks_with_offsets(row_block, tag) {
                cells.push((offset, normalize_text(&strip_tags(cell_block))));
            }
        }
        // td and th cells back in source order
        cells.sort_by_key(|(offset, _)| *offset);
        if !cells.is_empty() {
            rows.push(cells.into_iter().map(|(_, text)| text).collect());
        }
    }
    Some(rows)
}

/// Byte offsets of every `<tag` opening, case-insensitive.
fn open_tag_positions(html: &str, tag: &str) -> Vec<usize> {
    let lower = html.to_ascii_lowercase();
    let needle = format!("<{tag}");
    let mut positions = Vec::new();
    let mut from = 0;
    while let Some(found) = lower[from..].find(&needle) {
        let at = from + found;
        // Reject prefixes like "<tablex"; the tag must end with '>',
        // whitespace or '/'.
        let after = lower[at + needle.len()..].chars().next();
        if matches!(after, Some('>') | Some('/') | None) || after.is_some_and(char::is_whitespace) {
            positions.push(at);
        }
        from = at + needle.len();
    }
    positions
}

/// Inner content of the `index`-th table, with nesting handled by depth
/// counting so a parent table's block spans its children.
fn table_block(html: &str, index: usize) -> Option<&str> {
    let lower = html.to_ascii_lowercase();
    let opens = open_tag_positions(html, "table");
    let start = *opens.get(index)?;

    let body_start = start + lower[start..].find('>')? + 1;
    let mut depth = 1usize;
    let mut cursor = body_start;
    while depth > 0 {
        let next_open = lower[cursor..].find("<table");
        let next_close = lower[cursor..].find("</table");
        match (next_open, next_close) {
            (Some(open), Some(close)) if open < close => {
                depth += 1;
                cursor += open + "<table".len();
            }
            (_, Some(close)) => {
                depth -= 1;
                if depth == 0 {
                    return Some(&html[body_start..cursor + close]);
                }
                cursor += close + "</table".len();
            }
            // Unclosed table: take everything to the end of the document.
            _ => return Some(&html[body_start..]),
        }
    }
    None
}

/// Non-nested blocks of `tag` within `html`: content between each opening
/// tag and its closing tag, or the next opening tag when the markup omits
/// closers (common for `<tr>`/`<td>` in legacy pages).
fn element_blocks<'a>(html: &'a str, tag: &str) -> Vec<&'a str> {
    element_blocks_with_offsets(html, tag)
        .into_iter()
        .map(|(_, block)| block)
        .collect()
}

fn element_blocks_with_offsets<'a>(html: &'a str, tag: &str) -> Vec<(usize, &'a str)> {
    let lower = html.to_ascii_lowercase();
    let close = format!("</{tag}");
    let opens = open_tag_positions(html, tag);
    let mut blocks = Vec::new();
    for (i, &at) in opens.iter().enumerate() {
        let Some(gt) = lower[at..].find('>') else {
            continue;
        };
        let body_start = at + gt + 1;
        let next_open = opens.get(i + 1).copied().unwrap_or(html.len());
        let end = match lower[body_start..].find(&close) {
            Some(found) if body_start + found <= next_open => body_start + found,
            _ => next_open,
        };
        blocks.push((at, &html[body_start..end]));
    }
    blocks
}

/// Drops every `<...>` run, keeping the text between tags.
fn strip_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            c if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}

/// Decodes the handful of entities legacy pages actually use and
/// collapses all whitespace (including NBSP) to single spaces.
fn normalize_text(text: &str) -> String {
    let decoded = text
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'");
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}
