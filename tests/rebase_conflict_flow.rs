//! Integration test for the rebase conflict workflow
//!
//! Drives the actual Tauri commands end to end against a real repository:
//! a rebase that pauses on conflicts, the snapshot the conflicts dialog
//! renders from, manual resolution, and the continue/abort outcomes.

use std::path::{Path, PathBuf};

use git2::Repository;
use tempfile::TempDir;

use undertow_lib::commands::rebase::{
    abort_rebase, continue_rebase, get_conflicts, rebase, resolve_conflict,
};
use undertow_lib::commands::repository::get_repository_info;
use undertow_lib::commands::status::get_working_directory_status;
use undertow_lib::models::{ContinueRebaseResult, FileStatus, ManualConflictResolution};

fn create_commit(repo: &Repository, path: &Path, message: &str, files: &[(&str, &str)]) {
    for (name, content) in files {
        std::fs::write(path.join(name), content).expect("Failed to write file");
    }

    let mut index = repo.index().expect("Failed to get index");
    for (name, _) in files {
        index
            .add_path(Path::new(name))
            .expect("Failed to stage file");
    }
    index.write().expect("Failed to write index");

    let tree_oid = index.write_tree().expect("Failed to write tree");
    let tree = repo.find_tree(tree_oid).expect("Failed to find tree");
    let sig = repo.signature().expect("Failed to get signature");

    let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
    let parents: Vec<&git2::Commit> = parent.as_ref().into_iter().collect();

    repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
        .expect("Failed to create commit");
}

fn checkout(repo: &Repository, branch: &str) {
    let branch = repo
        .find_branch(branch, git2::BranchType::Local)
        .expect("Failed to find branch");
    let obj = branch
        .get()
        .peel(git2::ObjectType::Commit)
        .expect("Failed to peel");
    repo.checkout_tree(&obj, Some(git2::build::CheckoutBuilder::default().force()))
        .expect("Failed to checkout");
    repo.set_head(branch.get().name().unwrap())
        .expect("Failed to set HEAD");
}

/// Build a repository where rebasing `topic` onto the default branch
/// conflicts on `shared.txt`. Returns the temp dir, the workdir path and
/// the default branch name.
fn setup_conflict_repo() -> (TempDir, PathBuf, String) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().to_path_buf();
    let repo = Repository::init(&path).expect("Failed to init repo");

    let mut config = repo.config().expect("Failed to get config");
    config
        .set_str("user.name", "Test User")
        .expect("Failed to set user.name");
    config
        .set_str("user.email", "test@example.com")
        .expect("Failed to set user.email");

    create_commit(&repo, &path, "Shared base", &[("shared.txt", "base\n")]);
    let base_branch = repo
        .head()
        .expect("Failed to get HEAD")
        .shorthand()
        .expect("Unnamed branch")
        .to_string();

    let base_commit = repo
        .head()
        .unwrap()
        .peel_to_commit()
        .expect("Failed to peel HEAD");
    repo.branch("topic", &base_commit, false)
        .expect("Failed to create branch");

    create_commit(&repo, &path, "Our change", &[("shared.txt", "ours\n")]);

    checkout(&repo, "topic");
    create_commit(&repo, &path, "Their change", &[("shared.txt", "theirs\n")]);

    (dir, path, base_branch)
}

#[tokio::test]
async fn conflicted_rebase_can_be_resolved_and_continued() {
    let (_dir, path, base_branch) = setup_conflict_repo();
    let p = path.to_string_lossy().to_string();

    let result = rebase(p.clone(), base_branch).await.expect("rebase failed");
    assert_eq!(result, ContinueRebaseResult::ConflictsEncountered);

    let info = get_repository_info(p.clone()).await.expect("info failed");
    assert!(info.state.is_rebasing());

    // The snapshot the conflicts dialog derives its file list from
    let snapshot = get_working_directory_status(p.clone())
        .await
        .expect("status failed");
    let conflicted: Vec<_> = snapshot.files.iter().filter(|f| f.is_conflicted).collect();
    assert_eq!(conflicted.len(), 1);
    assert_eq!(conflicted[0].path, "shared.txt");
    assert_eq!(conflicted[0].status, FileStatus::Conflicted);

    let conflicts = get_conflicts(p.clone()).await.expect("conflicts failed");
    assert_eq!(conflicts.len(), 1);
    assert!(conflicts[0].ours.is_some());
    assert!(conflicts[0].theirs.is_some());

    // Still conflicted: the engine refuses and the rebase stays paused
    let result = continue_rebase(p.clone(), snapshot.clone())
        .await
        .expect("continue failed");
    assert_eq!(result, ContinueRebaseResult::ConflictsEncountered);

    resolve_conflict(
        p.clone(),
        "shared.txt".to_string(),
        ManualConflictResolution::Theirs,
    )
    .await
    .expect("resolve failed");

    let result = continue_rebase(p.clone(), snapshot)
        .await
        .expect("continue failed");
    assert_eq!(result, ContinueRebaseResult::CompletedWithoutError);

    let info = get_repository_info(p.clone()).await.expect("info failed");
    assert!(!info.state.is_rebasing());

    let content = std::fs::read_to_string(path.join("shared.txt")).expect("read failed");
    assert_eq!(content, "theirs\n");
}

#[tokio::test]
async fn aborting_a_conflicted_rebase_restores_head() {
    let (_dir, path, base_branch) = setup_conflict_repo();
    let p = path.to_string_lossy().to_string();

    let head_before = Repository::open(&path)
        .unwrap()
        .head()
        .unwrap()
        .target()
        .expect("No HEAD target");

    let result = rebase(p.clone(), base_branch).await.expect("rebase failed");
    assert_eq!(result, ContinueRebaseResult::ConflictsEncountered);

    abort_rebase(p.clone()).await.expect("abort failed");

    let repo = Repository::open(&path).unwrap();
    assert_eq!(repo.state(), git2::RepositoryState::Clean);
    assert_eq!(repo.head().unwrap().target(), Some(head_before));

    let content = std::fs::read_to_string(path.join("shared.txt")).expect("read failed");
    assert_eq!(content, "theirs\n");
}

#[tokio::test]
async fn continue_without_a_rebase_in_progress_fails() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let repo = Repository::init(dir.path()).expect("Failed to init repo");
    let mut config = repo.config().expect("Failed to get config");
    config.set_str("user.name", "Test User").unwrap();
    config.set_str("user.email", "test@example.com").unwrap();
    create_commit(&repo, dir.path(), "Initial commit", &[("a.txt", "a\n")]);

    let result = continue_rebase(
        dir.path().to_string_lossy().to_string(),
        Default::default(),
    )
    .await;
    assert!(result.is_err());
}
