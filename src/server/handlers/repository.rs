use crate::error::UpstreamError;
use crate::event::{RepoCreation, RepositoryPayload};
use crate::github::{GitHubClient, Hook};

#[derive(Debug)]
pub(crate) struct Provisioning {
    pub repository: RepoCreation,
    pub webhook: Result<Hook, UpstreamError>,
}

/// Log a newly created repository and register our webhook on it. Other actions are ignored.
pub(crate) async fn provision(
    github: &GitHubClient,
    callback_url: &str,
    payload: RepositoryPayload,
) -> Option<Provisioning> {
    let repository = payload.created()?;
    log_new_repository(&repository);

    let webhook = github.register_webhook(&repository.name, callback_url).await;
    match &webhook {
        Ok(hook) => tracing::info!(
            hook = hook.id,
            active = hook.active,
            "Successfully added webhook to new repo: {}",
            repository.name
        ),
        Err(error) => tracing::error!(
            %error,
            "Failed to add webhook to new repo {}",
            repository.name
        ),
    }
    Some(Provisioning {
        repository,
        webhook,
    })
}

fn log_new_repository(repo: &RepoCreation) {
    tracing::info!(
        name = %repo.name,
        created_by = %repo.created_by,
        created_at = %repo.created_at,
        description = %repo.description,
        language = %repo.language,
        private = repo.private,
        default_branch = %repo.default_branch,
        clone_url = %repo.clone_url,
        git_url = %repo.git_url,
        ssh_url = %repo.ssh_url,
        "New repository created"
    );
}
