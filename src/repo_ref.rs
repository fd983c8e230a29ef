use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use url::Url;

/// Validation failures for a repository reference.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RefError {
    #[error("empty repo")]
    Empty,
    #[error("invalid format, expected owner/repo or owner/repo#number")]
    InvalidFormat,
    #[error("repo must be in owner/repo format: {0}")]
    NotOwnerRepo(String),
    #[error("invalid pull request number: {0}")]
    InvalidNumber(String),
}

/// A tracked repository, optionally narrowed to a single pull request.
///
/// The textual form is `owner/name` or `owner/name#number`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
    pub number: Option<u64>,
}

impl RepoRef {
    /// Builds a reference from user input, accepting GitHub URLs as well as
    /// the canonical `owner/name[#number]` form.
    ///
    /// `https://github.com/owner/name/pull/42` becomes `owner/name#42`, any
    /// other URL with at least two path segments becomes `owner/name`.
    pub fn normalize(raw: &str) -> Result<Self, RefError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(RefError::Empty);
        }

        if looks_like_url(trimmed) {
            if let Some(candidate) = ref_from_url(trimmed) {
                return candidate.parse();
            }
        }
        trimmed.parse()
    }

    /// `owner/name` without the pull request number.
    pub fn repo_path(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.number {
            Some(number) => write!(f, "{}/{}#{}", self.owner, self.name, number),
            None => write!(f, "{}/{}", self.owner, self.name),
        }
    }
}

impl FromStr for RepoRef {
    type Err = RefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(RefError::Empty);
        }

        let (repo_part, number) = match s.split_once('#') {
            Some((repo, num)) => {
                let repo = repo.trim();
                let num = num.trim();
                if repo.is_empty() || num.is_empty() {
                    return Err(RefError::InvalidFormat);
                }
                let number = num
                    .parse::<u64>()
                    .map_err(|_| RefError::InvalidNumber(num.to_string()))?;
                (repo, Some(number))
            }
            None => (s, None),
        };

        let parts: Vec<&str> = repo_part.split('/').map(str::trim).collect();
        match parts.as_slice() {
            [owner, name] if !owner.is_empty() && !name.is_empty() => Ok(RepoRef {
                owner: owner.to_string(),
                name: name.to_string(),
                number,
            }),
            _ => Err(RefError::NotOwnerRepo(repo_part.to_string())),
        }
    }
}

fn looks_like_url(s: &str) -> bool {
    s.contains("github.com/") || s.starts_with("http://") || s.starts_with("https://")
}

fn ref_from_url(raw: &str) -> Option<String> {
    let parsed = if raw.starts_with("http://") || raw.starts_with("https://") {
        Url::parse(raw)
    } else {
        Url::parse(&format!("https://{raw}"))
    }
    .ok()?;

    let segments: Vec<&str> = parsed.path_segments()?.filter(|s| !s.is_empty()).collect();
    match segments.as_slice() {
        [owner, name, "pull", number, ..] => Some(format!(
            "{owner}/{}#{number}",
            name.trim_end_matches(".git")
        )),
        [owner, name, ..] => Some(format!("{owner}/{}", name.trim_end_matches(".git"))),
        _ => None,
    }
}
