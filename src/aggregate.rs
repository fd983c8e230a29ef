use crate::github::{FetchError, GitHubClient, PullRequest};

/// Result of fetching one tracked reference.
#[derive(Debug)]
pub struct FetchOutcome {
    /// The reference as stored.
    pub repo: String,
    pub result: Result<Vec<PullRequest>, FetchError>,
}

/// Fetches every reference concurrently, one task per reference.
///
/// All tasks are spawned before any is awaited, so a slow or failing
/// reference never delays the start of another. Exactly one outcome is
/// returned per reference, in input order.
pub async fn list_all(client: &GitHubClient, repos: &[String]) -> Vec<FetchOutcome> {
    tracing::debug!(count = repos.len(), "fetching pull requests");

    let handles: Vec<_> = repos
        .iter()
        .map(|repo| {
            let client = client.clone();
            let task_repo = repo.clone();
            let handle = tokio::spawn(async move { client.fetch(&task_repo).await });
            (repo.clone(), handle)
        })
        .collect();

    let mut outcomes = Vec::with_capacity(handles.len());
    for (repo, handle) in handles {
        let result = match handle.await {
            Ok(result) => result,
            Err(join_error) => Err(FetchError::Task(join_error.to_string())),
        };
        if let Err(err) = &result {
            tracing::info!(repo = %repo, error = %err, "fetch failed");
        }
        outcomes.push(FetchOutcome { repo, result });
    }
    outcomes
}
