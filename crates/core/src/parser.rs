//! Recovers an ordered task list from free-form completion text.
//!
//! Model output is untrusted: it may be a JSON array, a loosely quoted array,
//! a numbered or bulleted list, or prose with nothing usable in it. Parsing
//! never fails; text with no recognisable list yields an empty list.

use once_cell::sync::Lazy;
use regex::Regex;

/// A bracketed array of double-quoted strings, as a JSON encoder would emit it.
static JSON_ARRAY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\[(?:\s*"(?:[^"\\]|\\.)*"\s*,?)+\s*\]"#).expect("valid array pattern")
});

/// A bracketed array whose items are all quoted, in either quote style, with
/// only separators between them. An apostrophe followed by a letter does not
/// close a single-quoted item.
static QUOTED_ARRAY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\[\s*(?:(?:"(?:[^"\\]|\\.)*"|'(?:[^'\\]|\\.|'\pL)*')\s*,?\s*)+\]"#)
        .expect("valid quoted array pattern")
});

/// Leading list marker: `1.`, `12)`, `-`, `*`, `+` or `•`, followed by whitespace.
static LIST_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:\d+[.)]|[-*+•])\s+(.*)$").expect("valid marker pattern")
});

/// Parse `text` into trimmed, non-empty task descriptions in source order.
///
/// Marked list lines take precedence, so brackets or quotes inside a list item
/// never replace the list itself.
pub fn parse_completion(text: &str) -> Vec<String> {
    if has_marker_lines(text) {
        return parse_list_lines(text);
    }

    if let Some(tasks) = parse_json_array(text) {
        return tasks;
    }

    parse_quoted_array(text)
}

fn has_marker_lines(text: &str) -> bool {
    text.lines().any(|line| LIST_MARKER.is_match(line.trim()))
}

fn parse_json_array(text: &str) -> Option<Vec<String>> {
    let found = JSON_ARRAY.find(text)?;
    let items: Vec<String> = serde_json::from_str(found.as_str()).ok()?;
    let tasks: Vec<String> = items.iter().filter_map(|item| clean_item(item)).collect();
    (!tasks.is_empty()).then_some(tasks)
}

fn parse_quoted_array(text: &str) -> Vec<String> {
    let Some(found) = QUOTED_ARRAY.find(text) else {
        return Vec::new();
    };

    let array = found.as_str();
    let inner: Vec<char> = array[1..array.len() - 1].chars().collect();
    let mut items = Vec::new();
    let mut i = 0;

    while i < inner.len() {
        let quote = inner[i];
        if !matches!(quote, '"' | '\'') {
            i += 1;
            continue;
        }

        let mut item = String::new();
        let mut end = None;
        let mut j = i + 1;
        while j < inner.len() {
            let ch = inner[j];
            if ch == '\\' && j + 1 < inner.len() {
                item.push(inner[j + 1]);
                j += 2;
                continue;
            }
            // A quote only closes the item when the next token is a separator,
            // so apostrophes inside single-quoted items survive.
            if ch == quote && closes_item(&inner[j + 1..]) {
                end = Some(j);
                break;
            }
            item.push(ch);
            j += 1;
        }

        match end {
            Some(end) => {
                items.extend(clean_item(&item));
                i = end + 1;
            }
            None => break,
        }
    }

    items
}

fn closes_item(rest: &[char]) -> bool {
    rest.iter()
        .find(|c| !c.is_whitespace())
        .map_or(true, |c| *c == ',')
}

fn parse_list_lines(text: &str) -> Vec<String> {
    let mut tasks: Vec<String> = Vec::new();
    let mut current: Option<String> = None;

    for line in text.lines() {
        let trimmed = line.trim();

        if trimmed.starts_with("```") {
            continue;
        }

        if trimmed.is_empty() {
            tasks.extend(current.take().and_then(|item| clean_item(&item)));
            continue;
        }

        if let Some(captures) = LIST_MARKER.captures(trimmed) {
            tasks.extend(current.take().and_then(|item| clean_item(&item)));
            current = captures.get(1).map(|m| m.as_str().to_string());
            continue;
        }

        let indented = line.starts_with([' ', '\t']);
        match current.as_mut() {
            Some(item) if indented => {
                item.push(' ');
                item.push_str(trimmed);
            }
            _ => tasks.extend(current.take().and_then(|item| clean_item(&item))),
        }
    }

    tasks.extend(current.and_then(|item| clean_item(&item)));
    tasks
}

fn clean_item(raw: &str) -> Option<String> {
    let mut item = raw.trim().trim_end_matches(',').trim();

    for (open, close) in [('"', '"'), ('\'', '\''), ('“', '”'), ('`', '`')] {
        if item.len() >= 2 && item.starts_with(open) && item.ends_with(close) {
            item = item[open.len_utf8()..item.len() - close.len_utf8()].trim();
            break;
        }
    }

    (!item.is_empty()).then(|| item.to_string())
}
