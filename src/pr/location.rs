use std::sync::LazyLock;

use regex::Regex;

use super::types::{BranchPair, PageLocation};

static COMPARE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|/)compare/(.+)").expect("valid compare regex"));

static PULL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/pull/(\d+)").expect("valid pull regex"));

/// Turn CLI input into a page path.
///
/// Accepts a full URL (`https://github.com/org/repo/compare/main...dev`) or an
/// already-bare path. Query strings and fragments are dropped.
pub fn page_path(input: &str) -> String {
    if let Ok(url) = reqwest::Url::parse(input) {
        if matches!(url.scheme(), "http" | "https") {
            return url.path().to_string();
        }
    }
    let end = input.find(['?', '#']).unwrap_or(input.len());
    input[..end].to_string()
}

/// Recover owner/repo and the compare pair or pull number from a page path.
///
/// Never fails: anything that cannot be recognized is left as `None`.
/// `compare/<range>` must be a whole path segment. The range is split on `...`
/// and only the first two parts are kept; a range without the separator
/// becomes the base with an empty head.
pub fn resolve(path: &str) -> PageLocation {
    let mut segments = path.split('/').filter(|s| !s.is_empty());
    let owner = segments.next().map(str::to_string);
    let repo = segments.next().map(str::to_string);

    let compare = COMPARE_RE
        .captures(path)
        .and_then(|caps| caps.get(1))
        .map(|range| {
            let mut parts = range.as_str().split("...");
            BranchPair {
                base: parts.next().unwrap_or_default().to_string(),
                head: parts.next().unwrap_or_default().to_string(),
            }
        });

    let pull_number = PULL_RE
        .captures(path)
        .and_then(|caps| caps.get(1))
        .and_then(|digits| digits.as_str().parse::<u64>().ok());

    PageLocation {
        owner,
        repo,
        compare,
        pull_number,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_compare_page() {
        let loc = resolve("/acme/widgets/compare/main...feature-x");
        assert_eq!(loc.owner.as_deref(), Some("acme"));
        assert_eq!(loc.repo.as_deref(), Some("widgets"));
        assert_eq!(
            loc.compare,
            Some(BranchPair {
                base: "main".to_string(),
                head: "feature-x".to_string(),
            })
        );
        assert_eq!(loc.pull_number, None);
    }

    #[test]
    fn test_resolve_compare_with_slashes_in_branch() {
        let loc = resolve("/acme/widgets/compare/release/1.x...feat/login");
        let pair = loc.compare.unwrap();
        assert_eq!(pair.base, "release/1.x");
        assert_eq!(pair.head, "feat/login");
    }

    #[test]
    fn test_resolve_compare_without_separator() {
        let loc = resolve("/acme/widgets/compare/feature-x");
        let pair = loc.compare.unwrap();
        assert_eq!(pair.base, "feature-x");
        assert!(pair.head.is_empty());
    }

    #[test]
    fn test_resolve_range_keeps_first_two_parts() {
        let pair = resolve("/acme/widgets/compare/a...b...c").compare.unwrap();
        assert_eq!(pair.base, "a");
        assert_eq!(pair.head, "b");
    }

    #[test]
    fn test_compare_must_be_a_whole_segment() {
        let loc = resolve("/acme/image-compare/pull/42");
        assert_eq!(loc.repo.as_deref(), Some("image-compare"));
        assert!(loc.compare.is_none());
        assert_eq!(loc.pull_number, Some(42));

        let loc = resolve("/acme/image-compare/compare/main...dev");
        let pair = loc.compare.unwrap();
        assert_eq!(pair.base, "main");
        assert_eq!(pair.head, "dev");
    }

    #[test]
    fn test_resolve_pull_page() {
        let loc = resolve("/acme/widgets/pull/42/files");
        assert_eq!(loc.owner.as_deref(), Some("acme"));
        assert_eq!(loc.repo.as_deref(), Some("widgets"));
        assert_eq!(loc.pull_number, Some(42));
        assert!(loc.compare.is_none());
    }

    #[test]
    fn test_resolve_pull_requires_digits() {
        let loc = resolve("/acme/widgets/pull/new/feature");
        assert_eq!(loc.pull_number, None);
    }

    #[test]
    fn test_resolve_malformed_paths_do_not_fail() {
        assert_eq!(resolve(""), PageLocation::default());
        let loc = resolve("/only-owner");
        assert_eq!(loc.owner.as_deref(), Some("only-owner"));
        assert!(loc.repo.is_none());
        let loc = resolve("///");
        assert!(loc.owner.is_none());
    }

    #[test]
    fn test_page_path_from_url() {
        assert_eq!(
            page_path("https://github.com/acme/widgets/compare/main...dev?expand=1"),
            "/acme/widgets/compare/main...dev"
        );
        assert_eq!(page_path("/acme/widgets/pull/7#top"), "/acme/widgets/pull/7");
        assert_eq!(page_path("acme/widgets"), "acme/widgets");
    }
}
