//! Rebase engine
//!
//! Starts, continues and aborts rebases and applies manual conflict
//! resolutions. Outcomes that the user can act on (conflicts, unstaged
//! files) are reported as [`ContinueRebaseResult`] variants rather than
//! errors, so the conflicts dialog can stay open and let the user correct
//! the state; `Err` is reserved for caller bugs and unusable repositories.

use std::collections::HashSet;
use std::path::Path;

use crate::error::{Result, UndertowError};
use crate::models::{
    ConflictEntry, ConflictFile, ContinueRebaseResult, ManualConflictResolution, RepositoryState,
    WorkingDirectoryStatus,
};

/// Rebase HEAD onto another ref.
///
/// When a step conflicts the rebase is left paused on disk and
/// `ConflictsEncountered` is returned; the caller is expected to show the
/// conflicts dialog and come back through [`continue_rebase`] or
/// [`abort_rebase`].
pub fn begin_rebase(path: &Path, onto: &str) -> Result<ContinueRebaseResult> {
    let repo = git2::Repository::open(path)?;

    let onto_ref = repo
        .find_reference(&format!("refs/heads/{}", onto))
        .or_else(|_| repo.find_reference(&format!("refs/remotes/{}", onto)))
        .or_else(|_| repo.find_reference(onto))?;

    let onto_commit = repo.reference_to_annotated_commit(&onto_ref)?;
    let head = repo.head()?;
    let head_commit = repo.reference_to_annotated_commit(&head)?;

    let mut rebase = repo.rebase(Some(&head_commit), Some(&onto_commit), None, None)?;
    let signature = repo.signature()?;

    while let Some(op) = rebase.next() {
        let _op = op?;

        if repo.index()?.has_conflicts() {
            tracing::debug!("rebase paused on conflicts");
            return Ok(ContinueRebaseResult::ConflictsEncountered);
        }

        match rebase.commit(None, &signature, None) {
            Ok(_) => {}
            // Patch already present upstream; nothing to commit
            Err(e) if e.code() == git2::ErrorCode::Applied => {}
            Err(e) => return Err(e.into()),
        }
    }

    rebase.finish(Some(&signature))?;
    Ok(ContinueRebaseResult::CompletedWithoutError)
}

/// Continue a rebase paused on conflicts.
///
/// Stages the snapshot's previously-conflicted paths whose index conflict
/// has been cleared, then commits the paused operation and replays the
/// rest. Operational git failures map to `ContinueRebaseResult::Error`
/// (and are logged) so the dialog stays open.
pub fn continue_rebase(
    path: &Path,
    working_directory: &WorkingDirectoryStatus,
) -> Result<ContinueRebaseResult> {
    let repo = git2::Repository::open(path)?;

    if !RepositoryState::from(repo.state()).is_rebasing() {
        return Err(UndertowError::NoRebaseInProgress);
    }

    if let Err(e) = stage_resolved_files(&repo, working_directory) {
        tracing::warn!("failed to stage resolved files: {}", e);
        return Ok(ContinueRebaseResult::OutstandingFilesNotStaged);
    }

    if repo.index()?.has_conflicts() {
        return Ok(ContinueRebaseResult::ConflictsEncountered);
    }

    let mut rebase = repo.open_rebase(None)?;
    let signature = repo.signature()?;

    // Commit the operation the rebase is paused on
    match rebase.commit(None, &signature, None) {
        Ok(_) => {}
        Err(e) if e.code() == git2::ErrorCode::Applied => {}
        Err(e) => {
            tracing::error!("committing the paused rebase operation failed: {}", e);
            return Ok(ContinueRebaseResult::Error);
        }
    }

    // Replay the remaining operations
    while let Some(op) = rebase.next() {
        if let Err(e) = op {
            tracing::error!("rebase step failed: {}", e);
            return Ok(ContinueRebaseResult::Error);
        }

        if repo.index()?.has_conflicts() {
            return Ok(ContinueRebaseResult::ConflictsEncountered);
        }

        match rebase.commit(None, &signature, None) {
            Ok(_) => {}
            Err(e) if e.code() == git2::ErrorCode::Applied => {}
            Err(e) => {
                tracing::error!("rebase commit failed: {}", e);
                return Ok(ContinueRebaseResult::Error);
            }
        }
    }

    rebase.finish(Some(&signature))?;
    Ok(ContinueRebaseResult::CompletedWithoutError)
}

/// Abort an in-progress rebase, restoring HEAD to where it was
pub fn abort_rebase(path: &Path) -> Result<()> {
    let repo = git2::Repository::open(path)?;
    let mut rebase = repo
        .open_rebase(None)
        .map_err(|_| UndertowError::NoRebaseInProgress)?;
    rebase.abort()?;
    Ok(())
}

/// Enumerate the index conflicts with their ancestor/ours/theirs sides
pub fn list_conflicts(path: &Path) -> Result<Vec<ConflictFile>> {
    let repo = git2::Repository::open(path)?;
    let index = repo.index()?;

    let mut files = Vec::new();
    for conflict in index.conflicts()? {
        let conflict = conflict?;
        let Some(path) = conflict_path(&conflict) else {
            continue;
        };
        files.push(ConflictFile {
            path,
            ancestor: conflict.ancestor.as_ref().map(to_conflict_entry),
            ours: conflict.our.as_ref().map(to_conflict_entry),
            theirs: conflict.their.as_ref().map(to_conflict_entry),
        });
    }

    Ok(files)
}

/// Apply a manual resolution for one conflicted file and stage the result.
///
/// `Ours`/`Theirs` materialize the chosen side from the index stages into
/// the working tree (deleting the file when that side does not exist);
/// `Manual` trusts whatever the user left in the working tree. Staging the
/// path clears its conflict entries from the index.
pub fn resolve_conflict(
    path: &Path,
    file: &str,
    resolution: ManualConflictResolution,
) -> Result<()> {
    let repo = git2::Repository::open(path)?;
    let workdir = repo
        .workdir()
        .ok_or_else(|| UndertowError::OperationFailed("repository has no working directory".to_string()))?;
    let mut index = repo.index()?;
    let rel = Path::new(file);

    match resolution {
        ManualConflictResolution::Manual => {}
        side => {
            let conflict = index
                .conflicts()?
                .filter_map(|c| c.ok())
                .find(|c| conflict_path(c).as_deref() == Some(file))
                .ok_or_else(|| {
                    UndertowError::OperationFailed(format!("no conflict recorded for {}", file))
                })?;

            let chosen = match side {
                ManualConflictResolution::Ours => conflict.our,
                ManualConflictResolution::Theirs => conflict.their,
                ManualConflictResolution::Manual => unreachable!(),
            };

            match chosen {
                Some(entry) => {
                    let blob = repo.find_blob(entry.id)?;
                    let target = workdir.join(rel);
                    if let Some(parent) = target.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&target, blob.content())?;
                }
                // The chosen side deleted the file
                None => {
                    let target = workdir.join(rel);
                    if target.exists() {
                        std::fs::remove_file(&target)?;
                    }
                }
            }
        }
    }

    if workdir.join(rel).exists() {
        index.add_path(rel)?;
    } else {
        index.remove_path(rel)?;
    }
    index.write()?;

    tracing::debug!("resolved conflict in {} as {:?}", file, resolution);
    Ok(())
}

/// Stage the snapshot's conflicted paths whose index conflict has been
/// cleared since the snapshot was taken. Paths still conflicted in the
/// live index are left alone and will block the continue attempt.
fn stage_resolved_files(
    repo: &git2::Repository,
    working_directory: &WorkingDirectoryStatus,
) -> Result<()> {
    let workdir = repo
        .workdir()
        .ok_or_else(|| UndertowError::OperationFailed("repository has no working directory".to_string()))?;
    let mut index = repo.index()?;

    let still_conflicted: HashSet<String> = index
        .conflicts()?
        .filter_map(|c| c.ok())
        .filter_map(|c| conflict_path(&c))
        .collect();

    for entry in working_directory.files.iter().filter(|f| f.is_conflicted) {
        if still_conflicted.contains(&entry.path) {
            continue;
        }
        let rel = Path::new(&entry.path);
        if workdir.join(rel).exists() {
            index.add_path(rel)?;
        } else {
            index.remove_path(rel)?;
        }
    }

    index.write()?;
    Ok(())
}

fn conflict_path(conflict: &git2::IndexConflict) -> Option<String> {
    conflict
        .our
        .as_ref()
        .or(conflict.their.as_ref())
        .or(conflict.ancestor.as_ref())
        .map(|entry| String::from_utf8_lossy(&entry.path).to_string())
}

fn to_conflict_entry(entry: &git2::IndexEntry) -> ConflictEntry {
    ConflictEntry {
        oid: entry.id.to_string(),
        path: String::from_utf8_lossy(&entry.path).to_string(),
        mode: entry.mode,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FileStatus, StatusEntry};
    use crate::test_utils::TestRepo;

    fn conflicted_snapshot(paths: &[&str]) -> WorkingDirectoryStatus {
        WorkingDirectoryStatus::new(
            paths
                .iter()
                .map(|p| StatusEntry {
                    path: p.to_string(),
                    status: FileStatus::Conflicted,
                    is_staged: false,
                    is_conflicted: true,
                })
                .collect(),
        )
    }

    #[test]
    fn rebase_without_conflicts_completes() {
        let repo = TestRepo::with_initial_commit();
        let base_branch = repo.current_branch();
        repo.create_branch("topic");
        repo.create_commit("Base change", &[("base.txt", "base\n")]);
        repo.checkout_branch("topic");
        repo.create_commit("Topic change", &[("topic.txt", "topic\n")]);

        let result = begin_rebase(&repo.path, &base_branch).expect("rebase failed");
        assert_eq!(result, ContinueRebaseResult::CompletedWithoutError);

        // Both histories are present after the replay
        assert!(repo.path.join("base.txt").exists());
        assert!(repo.path.join("topic.txt").exists());
        assert_eq!(repo.repo().state(), git2::RepositoryState::Clean);
    }

    #[test]
    fn conflicting_rebase_pauses_on_disk() {
        let (repo, base_branch) = TestRepo::with_conflicting_branches("shared.txt");

        let result = begin_rebase(&repo.path, &base_branch).expect("rebase failed");
        assert_eq!(result, ContinueRebaseResult::ConflictsEncountered);
        assert!(RepositoryState::from(repo.repo().state()).is_rebasing());

        let conflicts = list_conflicts(&repo.path).expect("list failed");
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].path, "shared.txt");
        assert!(conflicts[0].ours.is_some());
        assert!(conflicts[0].theirs.is_some());
    }

    #[test]
    fn continue_refuses_while_conflicts_remain() {
        let (repo, base_branch) = TestRepo::with_conflicting_branches("shared.txt");
        begin_rebase(&repo.path, &base_branch).expect("rebase failed");

        let result = continue_rebase(&repo.path, &conflicted_snapshot(&["shared.txt"]))
            .expect("continue failed");
        assert_eq!(result, ContinueRebaseResult::ConflictsEncountered);
        assert!(RepositoryState::from(repo.repo().state()).is_rebasing());
    }

    #[test]
    fn resolving_theirs_then_continuing_completes() {
        let (repo, base_branch) = TestRepo::with_conflicting_branches("shared.txt");
        begin_rebase(&repo.path, &base_branch).expect("rebase failed");

        resolve_conflict(&repo.path, "shared.txt", ManualConflictResolution::Theirs)
            .expect("resolve failed");

        let result = continue_rebase(&repo.path, &conflicted_snapshot(&["shared.txt"]))
            .expect("continue failed");
        assert_eq!(result, ContinueRebaseResult::CompletedWithoutError);
        assert_eq!(repo.repo().state(), git2::RepositoryState::Clean);

        let content =
            std::fs::read_to_string(repo.path.join("shared.txt")).expect("read failed");
        assert_eq!(content, "theirs\n");
    }

    #[test]
    fn resolving_ours_keeps_the_onto_side() {
        let (repo, base_branch) = TestRepo::with_conflicting_branches("shared.txt");
        begin_rebase(&repo.path, &base_branch).expect("rebase failed");

        resolve_conflict(&repo.path, "shared.txt", ManualConflictResolution::Ours)
            .expect("resolve failed");

        // "Ours" during a rebase is the branch being rebased onto
        let content =
            std::fs::read_to_string(repo.path.join("shared.txt")).expect("read failed");
        assert_eq!(content, "ours\n");
        assert!(list_conflicts(&repo.path).expect("list failed").is_empty());
    }

    #[test]
    fn manual_resolution_trusts_the_working_tree() {
        let (repo, base_branch) = TestRepo::with_conflicting_branches("shared.txt");
        begin_rebase(&repo.path, &base_branch).expect("rebase failed");

        repo.create_file("shared.txt", "hand merged\n");
        resolve_conflict(&repo.path, "shared.txt", ManualConflictResolution::Manual)
            .expect("resolve failed");

        let result = continue_rebase(&repo.path, &conflicted_snapshot(&["shared.txt"]))
            .expect("continue failed");
        assert_eq!(result, ContinueRebaseResult::CompletedWithoutError);

        let content =
            std::fs::read_to_string(repo.path.join("shared.txt")).expect("read failed");
        assert_eq!(content, "hand merged\n");
    }

    #[test]
    fn unstageable_resolution_reports_outstanding_files() {
        let (repo, base_branch) = TestRepo::with_conflicting_branches("shared.txt");
        begin_rebase(&repo.path, &base_branch).expect("rebase failed");

        resolve_conflict(&repo.path, "shared.txt", ManualConflictResolution::Theirs)
            .expect("resolve failed");

        // A directory now sits where the resolved file was, so the path
        // can no longer be staged
        std::fs::remove_file(repo.path.join("shared.txt")).expect("remove failed");
        std::fs::create_dir(repo.path.join("shared.txt")).expect("mkdir failed");

        let result = continue_rebase(&repo.path, &conflicted_snapshot(&["shared.txt"]))
            .expect("continue failed");
        assert_eq!(result, ContinueRebaseResult::OutstandingFilesNotStaged);
        assert!(RepositoryState::from(repo.repo().state()).is_rebasing());
    }

    #[test]
    fn abort_restores_the_original_head() {
        let (repo, base_branch) = TestRepo::with_conflicting_branches("shared.txt");
        let head_before = repo.head_oid();

        begin_rebase(&repo.path, &base_branch).expect("rebase failed");
        abort_rebase(&repo.path).expect("abort failed");

        assert_eq!(repo.repo().state(), git2::RepositoryState::Clean);
        assert_eq!(repo.head_oid(), head_before);

        let content =
            std::fs::read_to_string(repo.path.join("shared.txt")).expect("read failed");
        assert_eq!(content, "theirs\n");
    }

    #[test]
    fn continue_without_a_rebase_is_a_caller_bug() {
        let repo = TestRepo::with_initial_commit();
        let result = continue_rebase(&repo.path, &WorkingDirectoryStatus::default());
        assert!(matches!(result, Err(UndertowError::NoRebaseInProgress)));
    }

    #[test]
    fn abort_without_a_rebase_fails() {
        let repo = TestRepo::with_initial_commit();
        assert!(abort_rebase(&repo.path).is_err());
    }
}
