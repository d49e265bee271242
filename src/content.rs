use scraper::Html;

use crate::model::SolutionSubmission;

/// Marker line separating the generated header from the verbatim code.
/// Other tooling greps for this, so it must appear exactly once.
pub const SOLUTION_MARKER: &str = "// [Solution]";

/// Strips markup from a problem description, keeping text content only,
/// then normalizes whitespace: CRLF to LF, tabs to two spaces, runs of
/// three or more newlines collapsed to two, outer whitespace trimmed.
pub fn html_to_plain_text(html: &str) -> String {
    if html.is_empty() {
        return String::new();
    }

    let fragment = Html::parse_fragment(html);
    let text: String = fragment.root_element().text().collect();

    let text = text.replace("\r\n", "\n").replace('\t', "  ");
    collapse_blank_runs(&text).trim().to_string()
}

fn collapse_blank_runs(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut newlines = 0;
    for c in text.chars() {
        if c == '\n' {
            newlines += 1;
            if newlines <= 2 {
                out.push(c);
            }
        } else {
            newlines = 0;
            out.push(c);
        }
    }
    out
}

/// File extension for a language label, case-insensitive. Unrecognized
/// languages fall back to `txt` so the sync never drops a solution.
pub fn extension_for(language: &str) -> &'static str {
    match language.to_ascii_lowercase().as_str() {
        "python" | "python3" => "py",
        "java" => "java",
        "c++" | "cpp" => "cpp",
        "c" => "c",
        "javascript" => "js",
        "typescript" => "ts",
        "go" | "golang" => "go",
        "rust" => "rs",
        "ruby" => "rb",
        "swift" => "swift",
        "kotlin" => "kt",
        "scala" => "scala",
        "php" => "php",
        "csharp" | "c#" => "cs",
        _ => "txt",
    }
}

fn comment_wrapper(ext: &str) -> (&'static str, &'static str) {
    if ext == "py" {
        ("\"\"\"", "\"\"\"")
    } else {
        ("/*", "*/")
    }
}

/// Assembles the full text of a solution file: a commented header with the
/// title, source URL, plain-text description and metadata, then the marker
/// line and the untouched code.
pub fn build_solution_content(submission: &SolutionSubmission, ext: &str) -> String {
    let (open, close) = comment_wrapper(ext);
    let description = html_to_plain_text(&submission.description_html);

    format!(
        "{open}\n\
         [Description]\n\
         {title}\n\
         {url}\n\
         \n\
         {description}\n\
         \n\
         [Metadata]\n\
         - Difficulty: {difficulty}\n\
         - Topics: {topics}\n\
         - Slug: {slug}\n\
         {close}\n\
         \n\
         {marker}\n\
         {code}",
        title = submission.title,
        url = submission.source_url,
        difficulty = submission.difficulty,
        topics = submission.topics.join(", "),
        slug = submission.slug,
        marker = SOLUTION_MARKER,
        code = submission.code,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_strips_tags_and_decodes_entities() {
        let html = "<p>Given <code>nums</code>, return indices where <b>a &lt; b</b>.</p>";
        assert_eq!(
            html_to_plain_text(html),
            "Given nums, return indices where a < b."
        );
    }

    #[test]
    fn plain_text_normalizes_whitespace() {
        let html = "line one\r\n\ttabbed\n\n\n\n\nline two";
        assert_eq!(html_to_plain_text(html), "line one\n  tabbed\n\nline two");
    }

    #[test]
    fn plain_text_empty_input() {
        assert_eq!(html_to_plain_text(""), "");
    }

    #[test]
    fn plain_text_trims_outer_whitespace() {
        assert_eq!(html_to_plain_text("<p>  core  </p>"), "core");
    }

    #[test]
    fn extension_lookup_is_case_insensitive() {
        assert_eq!(extension_for("Python3"), "py");
        assert_eq!(extension_for("C++"), "cpp");
        assert_eq!(extension_for("GoLang"), "go");
        assert_eq!(extension_for("C#"), "cs");
        assert_eq!(extension_for("brainfuck"), "txt");
    }

    fn submission() -> SolutionSubmission {
        SolutionSubmission {
            slug: "two-sum".into(),
            title: "Two Sum".into(),
            difficulty: "Easy".into(),
            topics: vec!["Array".into(), "Hash Table".into()],
            description_html: "<p>Find two numbers that add up to target.</p>".into(),
            code: "def two_sum(nums, target):\n    return []".into(),
            language: "python".into(),
            source_url: "https://leetcode.com/problems/two-sum/".into(),
        }
    }

    #[test]
    fn python_solutions_use_docstring_wrapper() {
        let content = build_solution_content(&submission(), "py");
        assert!(content.starts_with("\"\"\"\n[Description]\nTwo Sum\n"));
        assert!(content.contains("\n\"\"\"\n\n// [Solution]\n"));
    }

    #[test]
    fn other_languages_use_block_comment_wrapper() {
        let mut sub = submission();
        sub.language = "rust".into();
        sub.code = "fn main() {}".into();
        let content = build_solution_content(&sub, "rs");
        assert!(content.starts_with("/*\n"));
        assert!(content.contains("\n*/\n\n// [Solution]\nfn main() {}"));
    }

    #[test]
    fn marker_appears_exactly_once_with_verbatim_code_after() {
        let sub = submission();
        let content = build_solution_content(&sub, "py");
        assert_eq!(content.matches(SOLUTION_MARKER).count(), 1);
        let tail = content
            .split_once(&format!("{SOLUTION_MARKER}\n"))
            .map(|(_, tail)| tail)
            .unwrap();
        assert_eq!(tail, sub.code);
    }

    #[test]
    fn header_contains_metadata_lines() {
        let content = build_solution_content(&submission(), "py");
        assert!(content.contains("- Difficulty: Easy\n"));
        assert!(content.contains("- Topics: Array, Hash Table\n"));
        assert!(content.contains("- Slug: two-sum\n"));
    }
}
