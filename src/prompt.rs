use crate::pr::Evidence;

const NO_TEMPLATE: &str = "No template provided - please create a clear, structured description.";

const INSTRUCTIONS: &str = "Instructions:
1. Follow the template structure if provided
2. Summarize the changes concisely but comprehensively
3. Highlight important changes and their impact
4. Maintain a professional tone
5. Include all relevant issue references
6. Format in clean Markdown without using triple backtick fences
7. Do not add any meta-commentary about the description itself
8. Start directly with the content, usually with a heading like ## Description or # Title

Generate the PR description now:";

/// Render the template and evidence into the generation prompt.
///
/// Pure and deterministic. The "Linked Issues" block only appears when at
/// least one issue was resolved.
pub fn compose(template: &str, evidence: &Evidence) -> String {
    let template = if template.trim().is_empty() {
        NO_TEMPLATE
    } else {
        template
    };

    let files = evidence
        .files
        .iter()
        .map(|f| {
            format!(
                "  • {} ({}: +{} -{})",
                f.filename, f.status, f.additions, f.deletions
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let commits = evidence
        .commits
        .iter()
        .map(|c| format!("- {}", c.message))
        .collect::<Vec<_>>()
        .join("\n");

    let issues = if evidence.issues.is_empty() {
        String::new()
    } else {
        let lines = evidence
            .issues
            .iter()
            .map(|i| format!("- #{}: {}", i.number, i.title))
            .collect::<Vec<_>>()
            .join("\n");
        format!("Linked Issues:\n{lines}")
    };

    format!(
        "Generate a comprehensive GitHub pull request description based on the following information:

Template Structure:
{template}

Pull Request Changes:
- Branch: {head} → {base}
- Files Changed: {file_count}
{files}

Commits:
{commits}

{issues}

{INSTRUCTIONS}",
        head = evidence.head,
        base = evidence.base,
        file_count = evidence.files.len(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pr::types::{ChangedFile, Commit, LinkedIssue};

    fn sample_evidence() -> Evidence {
        Evidence {
            base: "main".to_string(),
            head: "feature-x".to_string(),
            commits: vec![
                Commit {
                    message: "Fix #5".to_string(),
                    sha: "a1".to_string(),
                },
                Commit {
                    message: "Unrelated change".to_string(),
                    sha: "b2".to_string(),
                },
            ],
            files: vec![ChangedFile {
                filename: "widget.js".to_string(),
                status: "modified".to_string(),
                additions: 10,
                deletions: 2,
                changes: 12,
            }],
            issues: vec![LinkedIssue {
                number: 5,
                title: "Widget crashes on resize".to_string(),
                state: "open".to_string(),
                url: "https://github.com/acme/widgets/issues/5".to_string(),
            }],
        }
    }

    #[test]
    fn test_compose_is_deterministic() {
        let evidence = sample_evidence();
        assert_eq!(compose("## T", &evidence), compose("## T", &evidence));
    }

    #[test]
    fn test_compose_full_layout() {
        let prompt = compose("## Summary\n<!-- what -->", &sample_evidence());
        let expected_middle = "Template Structure:
## Summary
<!-- what -->

Pull Request Changes:
- Branch: feature-x → main
- Files Changed: 1
  • widget.js (modified: +10 -2)

Commits:
- Fix #5
- Unrelated change

Linked Issues:
- #5: Widget crashes on resize

Instructions:
1. Follow the template structure if provided";
        assert!(prompt.starts_with(
            "Generate a comprehensive GitHub pull request description based on the following information:\n\n"
        ));
        assert!(prompt.contains(expected_middle), "prompt was:\n{prompt}");
        assert!(prompt.ends_with("Generate the PR description now:"));
    }

    #[test]
    fn test_issue_block_omitted_when_no_issues() {
        let mut evidence = sample_evidence();
        evidence.issues.clear();
        let prompt = compose("## T", &evidence);
        assert!(!prompt.contains("Linked Issues"));
        assert!(prompt.contains("- Unrelated change\n\n\n\nInstructions:"));
    }

    #[test]
    fn test_empty_template_uses_placeholder_sentence() {
        let prompt = compose("", &Evidence::default());
        assert!(prompt.contains(&format!("Template Structure:\n{NO_TEMPLATE}\n")));
        assert!(prompt.contains("- Files Changed: 0\n"));
    }

    #[test]
    fn test_instruction_block_is_constant() {
        let a = compose("", &Evidence::default());
        let b = compose("## Other", &sample_evidence());
        assert!(a.ends_with(INSTRUCTIONS));
        assert!(b.ends_with(INSTRUCTIONS));
        assert!(INSTRUCTIONS.contains("without using triple backtick fences"));
        assert!(INSTRUCTIONS.contains("Include all relevant issue references"));
    }
}
