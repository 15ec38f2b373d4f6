// ==============================================================================
// Comment Formatting for Generated Declarations
// ==============================================================================
//
// Proto comments arrive as raw text, sometimes still carrying the `*` gutter
// or indentation of the block they were lifted from. The formatter normalizes
// them and renders a JSDoc fragment to prepend to a declaration.

/// Renders a proto comment as a fragment placed before a declaration.
///
/// `inline` fragments sit on the same line as a property or enum member;
/// block fragments precede a whole declaration and end with a newline. An
/// absent or blank comment renders as the empty string.
pub trait CommentFormatter {
    fn format(&self, comment: Option<&str>, inline: bool) -> String;
}

/// The default formatter: `/** ... */` JSDoc comments.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsDocComments;

impl CommentFormatter for JsDocComments {
    fn format(&self, comment: Option<&str>, inline: bool) -> String {
        let Some(text) = comment.map(normalize_comment).filter(|t| !t.is_empty()) else {
            return String::new();
        };
        let text = text.replace("*/", "*\\/");

        if inline {
            let joined: Vec<&str> = text.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
            return format!("/** {} */ ", joined.join(" "));
        }

        let lines: Vec<&str> = text.lines().collect();
        if let [single] = lines.as_slice() {
            return format!("/** {single} */\n");
        }
        let mut out = String::from("/**\n");
        for line in lines {
            if line.is_empty() {
                out.push_str(" *\n");
            } else {
                out.push_str(" * ");
                out.push_str(line);
                out.push('\n');
            }
        }
        out.push_str(" */\n");
        out
    }
}

/// Strip a `*` gutter and common indentation from a comment body and trim
/// surrounding blank lines.
pub fn normalize_comment(comment: &str) -> String {
    let trimmed = comment.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    let lines: Vec<&str> = trimmed.lines().collect();

    // Star gutter: every non-blank line (after indentation) starts with `*`.
    let starred = lines
        .iter()
        .map(|l| l.trim_start())
        .filter(|l| !l.is_empty())
        .all(|l| l.starts_with('*'));
    if starred {
        return lines
            .iter()
            .map(|l| {
                let l = l.trim_start().trim_start_matches('*');
                l.strip_prefix(' ').unwrap_or(l).trim_end()
            })
            .collect::<Vec<_>>()
            .join("\n")
            .trim()
            .to_string();
    }

    // Common indentation of the lines after the first; the first line's was
    // removed by `trim`.
    let indent = lines[1..]
        .iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.len() - l.trim_start().len())
        .min()
        .unwrap_or(0);
    let mut out: Vec<&str> = Vec::with_capacity(lines.len());
    out.push(lines[0].trim_end());
    for line in &lines[1..] {
        if line.trim().is_empty() {
            out.push("");
        } else {
            out.push(line.get(indent..).unwrap_or(line.trim_start()).trim_end());
        }
    }
    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn absent_and_blank_comments_render_empty() {
        assert_eq!(JsDocComments.format(None, true), "");
        assert_eq!(JsDocComments.format(Some("  \n "), false), "");
    }

    #[test]
    fn inline_joins_lines() {
        assert_eq!(
            JsDocComments.format(Some("The order id.\nNever empty."), true),
            "/** The order id. Never empty. */ "
        );
    }

    #[test]
    fn block_single_line() {
        assert_eq!(
            JsDocComments.format(Some("An order."), false),
            "/** An order. */\n"
        );
    }

    #[test]
    fn block_multi_line() {
        assert_eq!(
            JsDocComments.format(Some("An order.\n\nPlaced by a customer."), false),
            "/**\n * An order.\n *\n * Placed by a customer.\n */\n"
        );
    }

    #[test]
    fn closing_delimiter_is_escaped() {
        assert_eq!(
            JsDocComments.format(Some("glob a/*/b"), true),
            "/** glob a/*\\/b */ "
        );
    }

    #[test]
    fn normalize_strips_star_gutter() {
        assert_eq!(
            normalize_comment("* First line\n   * Second line\n   *"),
            "First line\nSecond line"
        );
    }

    #[test]
    fn normalize_strips_common_indent() {
        assert_eq!(
            normalize_comment("First\n    indented\n      more"),
            "First\nindented\n  more"
        );
    }
}
