//! Truncation of unified diffs embedded in import bodies.
//!
//! The import API rejects oversized payloads, so every file section keeps its
//! `diff`/`index` header while large bodies collapse into [`TOO_LARGE`].

/// Replacement for a file body or tail that was cut.
pub const TOO_LARGE: &str = "Too large diff\n";

/// Longest file body kept verbatim, in bytes.
pub const SECTION_LIMIT: usize = 10_000;

/// Longest truncated diff, in bytes.
pub const TOTAL_LIMIT: usize = 60_000;

/// Truncates `diff` so that it fits in an import body.
///
/// The result is at most [`TOTAL_LIMIT`] bytes long and truncating it again
/// returns it unchanged.
#[must_use]
pub fn truncate_diff(diff: &str) -> String {
    let sections: Vec<String> = split_sections(diff)
        .into_iter()
        .map(truncate_section)
        .collect();

    let total: usize = sections.iter().map(String::len).sum();
    if total <= TOTAL_LIMIT {
        return sections.concat();
    }

    let mut out = String::new();
    for section in &sections {
        if out.len() + section.len() + TOO_LARGE.len() > TOTAL_LIMIT {
            break;
        }
        out.push_str(section);
    }
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(TOO_LARGE);
    out
}

/// Breaks `diff` before every line starting with `diff `.
fn split_sections(diff: &str) -> Vec<&str> {
    let mut starts: Vec<usize> = diff.match_indices("\ndiff ").map(|(i, _)| i + 1).collect();
    if starts.first() != Some(&0) {
        starts.insert(0, 0);
    }
    starts.push(diff.len());
    starts
        .windows(2)
        .map(|bounds| &diff[bounds[0]..bounds[1]])
        .filter(|section| !section.is_empty())
        .collect()
}

fn truncate_section(section: &str) -> String {
    let split = header_len(section);
    let (header, body) = section.split_at(split);
    let measured = body.strip_suffix(TOO_LARGE).unwrap_or(body);
    if measured.len() > SECTION_LIMIT {
        format!("{header}{TOO_LARGE}")
    } else {
        section.to_string()
    }
}

/// Length of the header: through the first `index ` line, else the first line.
fn header_len(section: &str) -> usize {
    if !section.starts_with("diff ") {
        return 0;
    }
    let line_end = |from: usize| {
        section[from..]
            .find('\n')
            .map_or(section.len(), |i| from + i + 1)
    };
    match section.find("\nindex ") {
        Some(i) => line_end(i + 1),
        None => line_end(0),
    }
}

/// Breaks up triple backticks so the diff cannot close its code fence.
#[must_use]
pub fn escape_fences(text: &str) -> String {
    text.replace("```", "\u{200d}```")
}

#[cfg(test)]
mod tests {
    use super::*;

    const README_HEADER: &str = "diff --git a/README.md b/README.md\n\
        index 1234567..89abcde 100644\n";

    const CHANGELOG: &str = "diff --git a/CHANGELOG.md b/CHANGELOG.md\n\
        index 1234567..89abcde 100644\n\
        --- a/CHANGELOG.md\n\
        +++ b/CHANGELOG.md\n\
        @@ -1,6 +1,16 @@\n\
        # CHANGELOG\n\
        -deleted\n\
        +added\n";

    fn readme(body: &str) -> String {
        format!("{README_HEADER}--- a/README.md\n+++ b/README.md\n@@ -1,6 +1,16 @@\n# README\n{body}")
    }

    #[test]
    fn test_small_diff_is_unchanged() {
        let diff = format!("{}{CHANGELOG}", readme("-deleted\n+added\n"));

        assert_eq!(truncate_diff(&diff), diff);
    }

    #[test]
    fn test_large_body_keeps_header() {
        let diff = readme(&"\n".repeat(70_000));

        assert_eq!(truncate_diff(&diff), format!("{README_HEADER}{TOO_LARGE}"));
    }

    #[test]
    fn test_large_body_keeps_following_sections() {
        let diff = format!("{}{CHANGELOG}", readme(&format!("{}\n+added\n", "\n".repeat(70_000))));

        assert_eq!(
            truncate_diff(&diff),
            format!("{README_HEADER}{TOO_LARGE}{CHANGELOG}")
        );
    }

    #[test]
    fn test_header_without_index_line() {
        let diff = format!("diff --git a/x b/x\n{}", "+\n".repeat(6_000));

        assert_eq!(truncate_diff(&diff), format!("diff --git a/x b/x\n{TOO_LARGE}"));
    }

    #[test]
    fn test_total_ceiling_drops_whole_sections() {
        let section = |n: usize| {
            format!(
                "diff --git a/f{n} b/f{n}\nindex 1..2 100644\n{}",
                "+line\n".repeat(1_600)
            )
        };
        let diff: String = (0..10).map(section).collect();
        assert!(diff.len() > TOTAL_LIMIT);

        let truncated = truncate_diff(&diff);

        assert!(truncated.len() <= TOTAL_LIMIT);
        assert!(truncated.ends_with(&format!("+line\n{TOO_LARGE}")));
        assert!(truncated.starts_with(&section(0)));
        assert!(!truncated.contains("f9"));
    }

    #[test]
    fn test_truncation_is_idempotent() {
        let big = |n: usize| {
            format!(
                "diff --git a/f{n} b/f{n}\nindex 1..2 100644\n{}",
                "+".repeat(9_000 + n * 500) + "\n"
            )
        };
        let inputs = [
            readme(&"\n".repeat(70_000)),
            (0..12).map(big).collect::<String>(),
            format!("{}{CHANGELOG}", readme(&"x\n".repeat(20_000))),
            String::new(),
            "no diff header\n".repeat(5_000),
        ];

        for input in inputs {
            let once = truncate_diff(&input);
            assert!(once.len() <= TOTAL_LIMIT);
            assert_eq!(truncate_diff(&once), once);
        }
    }

    #[test]
    fn test_escape_fences() {
        assert_eq!(escape_fences("a\n```\nb``` c"), "a\n\u{200d}```\nb\u{200d}``` c");
        assert_eq!(escape_fences("no fences"), "no fences");
    }
}
