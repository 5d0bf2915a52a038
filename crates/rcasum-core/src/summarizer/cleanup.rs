//! Event note cleanup
//!
//! Notes are often pasted from chat and carry huge log dumps and monitoring
//! links. They are reduced to the prose before they reach the prompt.

use once_cell::sync::Lazy;
use regex::Regex;

const CODE_FENCE: &str = "```";
const CODE_BLOCK_PLACEHOLDER: &str = "[code block/log snippet]";

static DYNATRACE_URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\S+https?://\S+dynatrace\S+").expect("valid dynatrace url regex")
});

static SLACK_LINK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<(\S+)\|([^\r\n\t\x0C\x0B]+)>").expect("valid hyperlink regex")
});

/// Strip code blocks and noisy links from an event note
pub fn clean_note(text: &str) -> String {
    let fenced = text.replace(CODE_FENCE, "\n```\n");
    let without_dynatrace = DYNATRACE_URL_RE.replace_all(&fenced, "[dynatrace url]");
    let without_links = SLACK_LINK_RE.replace_all(&without_dynatrace, "$2");
    drop_code_blocks(&without_links)
}

/// Replace each fenced block with a placeholder; an unclosed fence swallows the rest
fn drop_code_blocks(text: &str) -> String {
    let mut lines = Vec::new();
    let mut in_code_block = false;

    for line in text.split('\n') {
        if in_code_block {
            if line == CODE_FENCE {
                in_code_block = false;
            }
        } else if line == CODE_FENCE {
            in_code_block = true;
            lines.push(CODE_BLOCK_PLACEHOLDER);
        } else {
            lines.push(line);
        }
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_block_replaced() {
        let note = "pods crashing:\n```\npanic: oom\ngoroutine 1\n```\nrolled back";
        assert_eq!(
            clean_note(note),
            "pods crashing:\n\n[code block/log snippet]\n\nrolled back"
        );
    }

    #[test]
    fn test_inline_fence_gets_own_lines() {
        assert_eq!(
            clean_note("see ```kubectl logs``` output"),
            "see \n[code block/log snippet]\n output"
        );
    }

    #[test]
    fn test_unclosed_block_drops_remainder() {
        assert_eq!(
            clean_note("before\n```\nlog line\nmore"),
            "before\n\n[code block/log snippet]"
        );
    }

    #[test]
    fn test_dynatrace_link_replaced() {
        let note = "graph: <https://abc123.live.dynatrace.com/#dashboard;id=42|dashboard> ok";
        assert_eq!(clean_note(note), "graph: [dynatrace url] ok");
    }

    #[test]
    fn test_hyperlink_unwrapped() {
        assert_eq!(
            clean_note("tracked in <https://issues.example.com/OHSS-1|OHSS-1>"),
            "tracked in OHSS-1"
        );
    }

    #[test]
    fn test_plain_text_untouched() {
        assert_eq!(clean_note("SRE paged, investigating"), "SRE paged, investigating");
    }
}
