// ABOUTME: Classification and rendering of `// key: value` metadata header lines.
// ABOUTME: The header block is the contiguous run of such lines at the start of a library file.

use std::collections::BTreeMap;

/// Metadata carried at the top of a library file. Repeated keys keep the last value.
pub type HeaderBlock = BTreeMap<String, String>;

const LINE_PREFIX: &str = "// ";

const LINE_TERMINATORS: [char; 4] = ['\r', '\n', '\u{2028}', '\u{2029}'];

/// Parse a single line as a header line, returning its key and value.
///
/// A header line is `// <key>: <value>` where the key is one or more ASCII
/// word characters (`[A-Za-z0-9_]`). The value runs up to the first line
/// terminator (`\r`, `\n`, U+2028 or U+2029), which is never part of it.
pub fn parse_header_line(line: &str) -> Option<(&str, &str)> {
    let rest = line.strip_prefix(LINE_PREFIX)?;
    let key_len = rest
        .bytes()
        .take_while(|b| b.is_ascii_alphanumeric() || *b == b'_')
        .count();
    if key_len == 0 {
        return None;
    }
    let (key, rest) = rest.split_at(key_len);
    let value = rest.strip_prefix(": ")?;
    let end = value.find(LINE_TERMINATORS).unwrap_or(value.len());
    Some((key, &value[..end]))
}

/// Whether a line belongs to the header block.
pub fn is_header_line(line: &str) -> bool {
    parse_header_line(line).is_some()
}

/// Render a header block as one `// key: value` line per entry.
pub fn render_header(header: &HeaderBlock) -> String {
    header
        .iter()
        .map(|(key, value)| format!("{LINE_PREFIX}{key}: {value}\n"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_key_and_value_without_terminator() {
        assert_eq!(
            parse_header_line("// name: My Flow\n"),
            Some(("name", "My Flow"))
        );
        assert_eq!(
            parse_header_line("// name: crlf\r\n"),
            Some(("name", "crlf"))
        );
    }

    #[test]
    fn value_stops_at_unicode_line_separators() {
        assert_eq!(
            parse_header_line("// name: left\u{2028}right\n"),
            Some(("name", "left"))
        );
        assert_eq!(
            parse_header_line("// name: up\u{2029}down\n"),
            Some(("name", "up"))
        );
    }

    #[test]
    fn value_may_be_empty_or_contain_colons() {
        assert_eq!(parse_header_line("// notes: \n"), Some(("notes", "")));
        assert_eq!(
            parse_header_line("// url: http://host:1880/x\n"),
            Some(("url", "http://host:1880/x"))
        );
    }

    #[test]
    fn rejects_lines_that_break_the_pattern() {
        assert!(!is_header_line("//name: x\n"));
        assert!(!is_header_line("// : x\n"));
        assert!(!is_header_line("// my-key: x\n"));
        assert!(!is_header_line("// key:x\n"));
        assert!(!is_header_line(" // key: x\n"));
        assert!(!is_header_line("[{\"id\":1}]\n"));
        assert!(!is_header_line("\n"));
    }

    #[test]
    fn renders_in_map_order() {
        let mut header = HeaderBlock::new();
        header.insert("name".into(), "demo".into());
        header.insert("description".into(), "a demo".into());
        assert_eq!(
            render_header(&header),
            "// description: a demo\n// name: demo\n"
        );
        assert_eq!(render_header(&HeaderBlock::new()), "");
    }
}
