//! Block-scalar rewriting of quoted `description` lines in YAML.

use std::sync::LazyLock;

use regex::Regex;

static DESCRIPTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^(\s*)(- )?description: (?:"(.*)"|'(.*)')\s*$"#).expect("valid regex")
});

/// Rewrite quoted `description` lines whose text spans several lines or
/// carries markup into literal block scalars. Both double-quoted and
/// single-quoted scalars are recognised.
///
/// Content lines are indented two columns past the key. Every other line,
/// and every line ending, passes through unchanged.
pub fn format_multiline_descriptions(yaml: &str) -> String {
    let mut out = String::with_capacity(yaml.len());

    for raw in yaml.split_inclusive('\n') {
        let (line, ending) = split_line_ending(raw);
        match rewrite_line(line, ending) {
            Some(block) => out.push_str(&block),
            None => out.push_str(raw),
        }
    }
    out
}

fn split_line_ending(raw: &str) -> (&str, &str) {
    if let Some(line) = raw.strip_suffix("\r\n") {
        (line, "\r\n")
    } else if let Some(line) = raw.strip_suffix('\n') {
        (line, "\n")
    } else {
        (raw, "")
    }
}

fn rewrite_line(line: &str, ending: &str) -> Option<String> {
    let caps = DESCRIPTION_RE.captures(line)?;
    let indent = caps.get(1).map_or("", |m| m.as_str());
    let dash = caps.get(2).map_or("", |m| m.as_str());
    let text = match (caps.get(3), caps.get(4)) {
        (Some(double), _) => unescape(double.as_str())?,
        (None, Some(single)) => unescape_single(single.as_str())?,
        (None, None) => return None,
    };

    let has_markup = text.contains('<') && text.contains('>');
    if !has_markup && !text.contains('\n') {
        return None;
    }

    let chomp = if text.ends_with("\n\n") {
        "+"
    } else if text.ends_with('\n') {
        ""
    } else {
        "-"
    };
    let body = text.strip_suffix('\n').unwrap_or(&text);
    let leading_space = body
        .split('\n')
        .find(|l| !l.is_empty())
        .is_some_and(|l| l.starts_with(' '));
    let indicator = if leading_space { "2" } else { "" };

    // The key sits after the sequence dash, if any.
    let content_indent = " ".repeat(indent.len() + dash.len() + 2);
    // A file without a trailing newline still needs breaks between the
    // block's own lines.
    let newline = if ending.is_empty() { "\n" } else { ending };

    let mut block = format!("{indent}{dash}description: |{indicator}{chomp}");
    for content in body.split('\n') {
        block.push_str(newline);
        if !content.is_empty() {
            block.push_str(&content_indent);
            block.push_str(content);
        }
    }
    block.push_str(ending);
    Some(block)
}

/// Undo the escapes of a double-quoted scalar. `None` for any escape other
/// than `\n`, `\"`, `\\` and `\t`; such lines are left alone.
fn unescape(quoted: &str) -> Option<String> {
    let mut out = String::with_capacity(quoted.len());
    let mut chars = quoted.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next()? {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            '"' => out.push('"'),
            '\\' => out.push('\\'),
            _ => return None,
        }
    }
    Some(out)
}

/// Undo the `''` escape of a single-quoted scalar. `None` when a lone quote
/// shows the match ran across more than one scalar.
fn unescape_single(quoted: &str) -> Option<String> {
    let mut out = String::with_capacity(quoted.len());
    let mut chars = quoted.chars();
    while let Some(c) = chars.next() {
        if c == '\'' && chars.next()? != '\'' {
            return None;
        }
        out.push(c);
    }
    Some(out)
}
