use serde::Serialize;

/// Which environment a workspace path belongs to.
///
/// This is a prefix heuristic only; nothing is resolved against a filesystem,
/// because the target may not be reachable from this process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PathDomain {
    /// Host paths (`C:\src\app`, relative paths, UNC shares).
    Native,
    /// Unix-style paths living inside the subsystem (`/home/u/app`, `~/app`).
    Foreign,
}

impl PathDomain {
    pub fn label(self) -> &'static str {
        match self {
            PathDomain::Native => "Windows",
            PathDomain::Foreign => "WSL",
        }
    }
}

pub fn classify_domain(path: &str) -> PathDomain {
    if path.starts_with('/') || path.starts_with('~') {
        PathDomain::Foreign
    } else {
        PathDomain::Native
    }
}

/// Unify separators, collapse repeated slashes and drop one trailing slash.
fn normalize_separators(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    for c in path.chars() {
        let c = if c == '\\' { '/' } else { c };
        if c == '/' && out.ends_with('/') {
            continue;
        }
        out.push(c);
    }
    if out.len() > 1 && out.ends_with('/') {
        out.pop();
    }
    out
}

/// Comparison-only key for duplicate detection. Never shown to the user.
///
/// Native paths and anything carrying a drive colon compare case-insensitively;
/// foreign paths keep their case.
pub fn canonical_key(path: &str) -> String {
    let normalized = normalize_separators(path);
    if normalized.contains(':') || classify_domain(path) == PathDomain::Native {
        normalized.to_lowercase()
    } else {
        normalized
    }
}

/// Final path segment, or the input unchanged when there is none.
pub fn display_name(path: &str) -> &str {
    let trimmed = path.trim_end_matches(['/', '\\']);
    match trimmed.rfind(['/', '\\']) {
        Some(idx) if idx + 1 < trimmed.len() => &trimmed[idx + 1..],
        _ if !trimmed.is_empty() && trimmed.len() < path.len() => trimmed,
        _ => path,
    }
}
