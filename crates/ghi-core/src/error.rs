use std::path::PathBuf;
use thiserror::Error;

/// Broad failure class. Each maps to a distinct process exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Usage,
    Environment,
    Io,
}

impl ErrorKind {
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorKind::Usage => 1,
            ErrorKind::Environment => 2,
            ErrorKind::Io => 3,
        }
    }
}

#[derive(Debug, Error)]
pub enum GhiError {
    #[error("invalid issue number '{0}': must be a non-negative integer")]
    InvalidIssueNumber(String),

    #[error("issue title must not be empty")]
    EmptyTitle,

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("{} not found. Run 'ghi pull {number}' first", .path.display())]
    IssueFileNotFound { path: PathBuf, number: String },

    #[error("malformed frontmatter: {0}")]
    MalformedFrontmatter(String),

    #[error("failed to parse frontmatter YAML: {0}")]
    FrontmatterYaml(serde_yaml::Error),

    #[error("gh CLI not found. Install GitHub CLI and run 'gh auth login'")]
    GhNotInstalled,

    #[error("git not found: install git to use 'ghi diff'")]
    GitNotInstalled,

    #[error("gh error: verify authentication ('gh auth status') and run inside a Git repo")]
    AuthRequired,

    #[error("gh error: {0}")]
    GhFailed(String),

    #[error("failed to parse gh output: {0}")]
    UnexpectedOutput(String),

    #[error("failed to run {program}: {reason}")]
    ToolSpawnFailed { program: String, reason: String },

    #[error("{program} timed out after {secs}s")]
    ToolTimeout { program: String, secs: u64 },

    #[error("git diff failed with exit code {0}")]
    DiffFailed(i32),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl GhiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GhiError::InvalidIssueNumber(_) | GhiError::EmptyTitle | GhiError::InvalidConfig(_) => {
                ErrorKind::Usage
            }
            GhiError::GhNotInstalled
            | GhiError::GitNotInstalled
            | GhiError::AuthRequired
            | GhiError::GhFailed(_)
            | GhiError::UnexpectedOutput(_)
            | GhiError::ToolSpawnFailed { .. }
            | GhiError::ToolTimeout { .. }
            | GhiError::DiffFailed(_)
            | GhiError::Json(_) => ErrorKind::Environment,
            GhiError::IssueFileNotFound { .. }
            | GhiError::MalformedFrontmatter(_)
            | GhiError::FrontmatterYaml(_)
            | GhiError::Io(_)
            | GhiError::Yaml(_) => ErrorKind::Io,
        }
    }
}

pub type Result<T> = std::result::Result<T, GhiError>;
