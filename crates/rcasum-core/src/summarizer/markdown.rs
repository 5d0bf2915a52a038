//! Light markdown normalization for generated summaries

use pulldown_cmark::{Event, Parser, Tag};
use std::ops::Range;

/// Byte ranges of every code block, fences included
fn code_block_ranges(markdown: &str) -> Vec<Range<usize>> {
    Parser::new(markdown)
        .into_offset_iter()
        .filter_map(|(event, range)| match event {
            Event::Start(Tag::CodeBlock(_)) => Some(range),
            _ => None,
        })
        .collect()
}

/// Strip trailing whitespace, collapse blank-line runs and end with one newline.
///
/// Code blocks are copied through untouched.
pub fn normalize(markdown: &str) -> String {
    let code_blocks = code_block_ranges(markdown);
    let in_code = |offset: usize| code_blocks.iter().any(|r| r.contains(&offset));

    let mut out: Vec<&str> = Vec::new();
    let mut offset = 0;
    for raw in markdown.split_inclusive('\n') {
        let start = offset;
        offset += raw.len();
        let line = raw.trim_end_matches(['\n', '\r']);

        if in_code(start) {
            out.push(line);
            continue;
        }
        let line = line.trim_end();
        if line.is_empty() && out.last().is_none_or(|prev| prev.is_empty()) {
            continue;
        }
        out.push(line);
    }

    while out.last().is_some_and(|l| l.is_empty()) {
        out.pop();
    }

    let mut text = out.join("\n");
    text.push('\n');
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapses_blank_runs_and_trailing_space() {
        let raw = "\n\n## Overview   \nAll good.\n\n\n\n## Impact\nNone.  \n\n";
        assert_eq!(normalize(raw), "## Overview\nAll good.\n\n## Impact\nNone.\n");
    }

    #[test]
    fn test_code_block_untouched() {
        let raw = "Log:\n```\nline  \n\n\nend\n```\n";
        assert_eq!(normalize(raw), "Log:\n```\nline  \n\n\nend\n```\n");
    }

    #[test]
    fn test_crlf_input() {
        assert_eq!(normalize("a\r\n\r\n\r\nb"), "a\n\nb\n");
    }

    #[test]
    fn test_list_spacing_kept() {
        let raw = "## Timeline\n- 14:00 paged\n- 14:30 mitigated\n";
        assert_eq!(normalize(raw), raw);
    }
}
