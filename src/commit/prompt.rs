//! Prompt construction for AI-generated commit messages.

use crate::commit::diff::DiffMap;

/// Serialize the diff map as a `<diffs>` document with one tagged block per path.
///
/// Diff text is embedded verbatim. Only characters that would terminate the
/// `name` attribute are escaped.
pub fn serialize_diffs(diffs: &DiffMap) -> String {
    let mut out = String::from("<diffs>\n");
    for (path, diff) in diffs {
        out.push_str(&format!("<file name='{}'>\n", escape_attr(path)));
        out.push_str(diff);
        if !diff.is_empty() && !diff.ends_with('\n') {
            out.push('\n');
        }
        out.push_str("</file>\n");
    }
    out.push_str("</diffs>");
    out
}

fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('\'', "&apos;")
        .replace('<', "&lt;")
}

/// Build the prompt asking for one commit message per file.
///
/// The reply is expected as a fenced JSON object mapping each path to its
/// message.
pub fn build_per_file_prompt(diffs: &DiffMap) -> String {
    let document = serialize_diffs(diffs);

    format!(
        r#"You are generating Git commit messages following the Conventional Commits specification.

## Staged Changes ({file_count} files)
Each `<file>` element holds the staged diff of one file; its `name` attribute is the file path.

```xml
{document}
```

## Rules
- Write one commit message PER FILE, describing only that file's changes
- Format: `type(scope): description`
- Type: one of feat, fix, build, chore, ci, docs, style, refactor, perf, test
- Description: imperative mood ("add", "fix", "remove"), lowercase after colon, NO period at end
- Keep each message on a single line of at most 72 characters
- Use every file path exactly as given in the `name` attribute, and no others

## Output Format
Respond with ONLY a JSON object mapping each file path to its commit message, in a ```json code block:
```json
{{"path/to/file.rs": "feat(scope): add something", "other/file.md": "docs: explain something"}}
```"#,
        file_count = diffs.len(),
    )
}

/// Build the prompt asking for a single message covering all files.
pub fn build_unified_prompt(diffs: &DiffMap) -> String {
    let document = serialize_diffs(diffs);

    format!(
        r#"You are generating a Git commit message following the Conventional Commits specification.

## Staged Changes ({file_count} files)
Each `<file>` element holds the staged diff of one file; its `name` attribute is the file path.

```xml
{document}
```

## Rules
- All of these changes belong to ONE commit. Write a SINGLE commit message summarizing them as one unit
- Subject format: `type(scope): description`
- Type: one of feat, fix, build, chore, ci, docs, style, refactor, perf, test
- Description: imperative mood, lowercase after colon, NO period at end, at most 72 characters
- An optional body may follow after a blank line, explaining WHY the change was made

## Output Format
Respond with ONLY the commit message as plain text. No JSON, no explanation, no surrounding quotes."#,
        file_count = diffs.len(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_diffs() -> DiffMap {
        let mut diffs = DiffMap::new();
        diffs.insert("src/a.rs".to_string(), "+fn a() {}\n".to_string());
        diffs.insert("docs/b.md".to_string(), "-old line\n+new line\n".to_string());
        diffs
    }

    #[test]
    fn test_serialize_diffs_one_block_per_path() {
        let document = serialize_diffs(&sample_diffs());

        assert!(document.starts_with("<diffs>"));
        assert!(document.ends_with("</diffs>"));
        assert_eq!(document.matches("<file name=").count(), 2);
        assert_eq!(document.matches("</file>").count(), 2);
        assert!(document.contains("<file name='src/a.rs'>\n+fn a() {}\n</file>"));
        assert!(document.contains("<file name='docs/b.md'>\n-old line\n+new line\n</file>"));
    }

    #[test]
    fn test_serialize_diffs_keeps_diff_text_verbatim() {
        let mut diffs = DiffMap::new();
        diffs.insert(
            "x.html".to_string(),
            "+<div class='a'>&nbsp;</div>\n".to_string(),
        );
        let document = serialize_diffs(&diffs);
        assert!(document.contains("+<div class='a'>&nbsp;</div>\n"));
    }

    #[test]
    fn test_serialize_diffs_empty_diff_for_removed_file() {
        let mut diffs = DiffMap::new();
        diffs.insert("gone.rs".to_string(), String::new());
        let document = serialize_diffs(&diffs);
        assert!(document.contains("<file name='gone.rs'>\n</file>"));
    }

    #[test]
    fn test_serialize_diffs_escapes_quote_in_path() {
        let mut diffs = DiffMap::new();
        diffs.insert("it's.txt".to_string(), "+x\n".to_string());
        let document = serialize_diffs(&diffs);
        assert!(document.contains("<file name='it&apos;s.txt'>"));
    }

    #[test]
    fn test_per_file_prompt_requests_json() {
        let prompt = build_per_file_prompt(&sample_diffs());
        assert!(prompt.contains("```xml"));
        assert!(prompt.contains("```json"));
        assert!(prompt.contains("PER FILE"));
        assert!(prompt.contains("(2 files)"));
        assert!(prompt.contains("<file name='src/a.rs'>"));
    }

    #[test]
    fn test_unified_prompt_requests_single_message() {
        let prompt = build_unified_prompt(&sample_diffs());
        assert!(prompt.contains("SINGLE commit message"));
        assert!(prompt.contains("plain text"));
        assert!(!prompt.contains("```json"));
        assert!(prompt.contains("<file name='docs/b.md'>"));
    }
}
