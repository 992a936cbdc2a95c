use crate::error::{MirrorError, Result};
use crate::types::ResolvedLink;
use reqwest::Url;

/// Extract project name and relative file path from a SourceForge link.
///
/// Supported shapes:
/// - `https://sourceforge.net/projects/<proj>/files/<path>/file.zip/download`
/// - `https://downloads.sourceforge.net/project/<proj>/<path>/file.zip`
///
/// Query strings and fragments are ignored.
pub fn resolve(url: &str) -> Result<ResolvedLink> {
    let parsed = Url::parse(url.trim())
        .map_err(|e| MirrorError::UnparseableUrl(format!("{}: {}", url, e)))?;

    let path = parsed.path();
    // A single trailing slash does not add a segment
    let path = path.strip_suffix('/').unwrap_or(path);

    if let Some(rest) = path.strip_prefix("/projects/") {
        return resolve_listing(url, rest);
    }
    if let Some(rest) = path.strip_prefix("/project/") {
        return resolve_direct(url, rest);
    }

    Err(MirrorError::UnparseableUrl(format!(
        "{}: path is neither /projects/... nor /project/...",
        url
    )))
}

// /projects/<proj>/files/<path...>[/download]
fn resolve_listing(url: &str, rest: &str) -> Result<ResolvedLink> {
    let parts: Vec<&str> = rest.split('/').collect();

    let project = parts.first().copied().unwrap_or_default();
    if project.is_empty() {
        return Err(unparseable(url, "missing project"));
    }

    let files_idx = parts
        .iter()
        .skip(1)
        .position(|p| *p == "files")
        .map(|i| i + 1)
        .ok_or_else(|| unparseable(url, "missing 'files' segment"))?;

    let mut rel_parts = &parts[files_idx + 1..];
    if let Some((&"download", head)) = rel_parts.split_last() {
        rel_parts = head;
    }

    if rel_parts.iter().all(|p| p.is_empty()) {
        return Err(unparseable(url, "no file path after 'files'"));
    }

    Ok(ResolvedLink {
        project: project.to_string(),
        rel_path: rel_parts.join("/"),
    })
}

// /project/<proj>/<path...>
fn resolve_direct(url: &str, rest: &str) -> Result<ResolvedLink> {
    let (project, rel_path) = rest
        .split_once('/')
        .ok_or_else(|| unparseable(url, "missing file path"))?;

    if project.is_empty() {
        return Err(unparseable(url, "missing project"));
    }
    if rel_path.split('/').all(str::is_empty) {
        return Err(unparseable(url, "missing file path"));
    }

    Ok(ResolvedLink {
        project: project.to_string(),
        rel_path: rel_path.to_string(),
    })
}

fn unparseable(url: &str, reason: &str) -> MirrorError {
    MirrorError::UnparseableUrl(format!("{}: {}", url, reason))
}

/// Whether the link points at sourceforge.net or one of its subdomains
pub fn is_sourceforge_url(url: &str) -> bool {
    Url::parse(url.trim())
        .ok()
        .and_then(|u| u.host_str().map(str::to_ascii_lowercase))
        .map(|host| host == "sourceforge.net" || host.ends_with(".sourceforge.net"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(url: &str) -> (String, String) {
        let link = resolve(url).expect("should resolve");
        (link.project, link.rel_path)
    }

    #[test]
    fn test_listing_with_download_suffix() {
        assert_eq!(
            ok("https://sourceforge.net/projects/foo/files/bar/baz.zip/download"),
            ("foo".to_string(), "bar/baz.zip".to_string())
        );
    }

    #[test]
    fn test_listing_without_download_suffix() {
        assert_eq!(
            ok("https://sourceforge.net/projects/foo/files/bar/baz.zip"),
            ("foo".to_string(), "bar/baz.zip".to_string())
        );
    }

    #[test]
    fn test_listing_trailing_slash_and_query() {
        assert_eq!(
            ok("https://sourceforge.net/projects/foo/files/baz.zip/download/?ts=123#top"),
            ("foo".to_string(), "baz.zip".to_string())
        );
    }

    #[test]
    fn test_direct_download() {
        assert_eq!(
            ok("https://downloads.sourceforge.net/project/foo/bar/baz.zip"),
            ("foo".to_string(), "bar/baz.zip".to_string())
        );
        assert_eq!(
            ok("https://downloads.sourceforge.net/project/foo/baz.zip?r=&use_mirror=jaist"),
            ("foo".to_string(), "baz.zip".to_string())
        );
    }

    #[test]
    fn test_direct_keeps_download_segment() {
        assert_eq!(
            ok("https://downloads.sourceforge.net/project/foo/bar/download"),
            ("foo".to_string(), "bar/download".to_string())
        );
    }

    #[test]
    fn test_failures() {
        let bad = [
            "not a url",
            "https://sourceforge.net/projects/foo/bar/baz.zip",
            "https://sourceforge.net/projects/foo/files/download",
            "https://sourceforge.net/projects/foo/files",
            "https://sourceforge.net/projects/foo/files//download",
            "https://sourceforge.net/projects/foo/files//",
            "https://sourceforge.net/projects/foo/files///",
            "https://sourceforge.net/projects//files/baz.zip",
            "https://sourceforge.net/projects/",
            "https://downloads.sourceforge.net/project/foo",
            "https://downloads.sourceforge.net/project/foo/",
            "https://downloads.sourceforge.net/project/foo///",
            "https://downloads.sourceforge.net/project//baz.zip",
            "https://sourceforge.net/p/foo/code/",
        ];
        for url in bad {
            assert!(
                matches!(resolve(url), Err(MirrorError::UnparseableUrl(_))),
                "expected failure for {}",
                url
            );
        }
    }

    #[test]
    fn test_project_named_files() {
        assert_eq!(
            ok("https://sourceforge.net/projects/files/files/a.zip/download"),
            ("files".to_string(), "a.zip".to_string())
        );
    }

    #[test]
    fn test_idempotent() {
        let url = "https://sourceforge.net/projects/foo/files/bar/baz.zip/download";
        assert_eq!(resolve(url).unwrap(), resolve(url).unwrap());
    }

    #[test]
    fn test_is_sourceforge_url() {
        assert!(is_sourceforge_url("https://sourceforge.net/projects/foo"));
        assert!(is_sourceforge_url("https://downloads.sourceforge.net/project/foo/a"));
        assert!(!is_sourceforge_url("https://notsourceforge.net/projects/foo"));
        assert!(!is_sourceforge_url("garbage"));
    }
}
