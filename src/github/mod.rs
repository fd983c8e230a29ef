pub mod pulls;

pub use pulls::{FetchError, GitHubClient, PullRequest, User};
