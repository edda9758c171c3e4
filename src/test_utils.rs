//! Test utilities for creating temporary git repositories

#![cfg(test)]

use std::path::PathBuf;
use tempfile::TempDir;

/// A temporary git repository for testing
pub struct TestRepo {
    pub dir: TempDir,
    pub path: PathBuf,
}

impl TestRepo {
    /// Create a new empty git repository
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().to_path_buf();

        let repo = git2::Repository::init(&path).expect("Failed to init repo");

        // Configure user for commits
        let mut config = repo.config().expect("Failed to get config");
        config
            .set_str("user.name", "Test User")
            .expect("Failed to set user.name");
        config
            .set_str("user.email", "test@example.com")
            .expect("Failed to set user.email");

        Self { dir, path }
    }

    /// Create a repository with an initial commit
    pub fn with_initial_commit() -> Self {
        let test_repo = Self::new();
        test_repo.create_commit("Initial commit", &[("README.md", "# Test Repo")]);
        test_repo
    }

    /// Create a repository where rebasing `topic` onto the base branch
    /// conflicts on `file`: both branches rewrite it after a shared base
    /// commit. Leaves `topic` checked out with `file` containing
    /// `"theirs\n"`; the base branch holds `"ours\n"`. Returns the
    /// repository and the base branch name.
    pub fn with_conflicting_branches(file: &str) -> (Self, String) {
        let test_repo = Self::with_initial_commit();
        test_repo.create_commit("Shared base", &[(file, "base\n")]);
        let base_branch = test_repo.current_branch();

        test_repo.create_branch("topic");
        test_repo.create_commit("Our change", &[(file, "ours\n")]);

        test_repo.checkout_branch("topic");
        test_repo.create_commit("Their change", &[(file, "theirs\n")]);

        (test_repo, base_branch)
    }

    /// Get the repository path as a string
    pub fn path_str(&self) -> String {
        self.path.to_string_lossy().to_string()
    }

    /// Get the git2 repository
    pub fn repo(&self) -> git2::Repository {
        git2::Repository::open(&self.path).expect("Failed to open repo")
    }

    /// Create a file with content
    pub fn create_file(&self, name: &str, content: &str) {
        let file_path = self.path.join(name);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        std::fs::write(&file_path, content).expect("Failed to write file");
    }

    /// Stage a file
    pub fn stage_file(&self, name: &str) {
        let repo = self.repo();
        let mut index = repo.index().expect("Failed to get index");
        index
            .add_path(std::path::Path::new(name))
            .expect("Failed to stage file");
        index.write().expect("Failed to write index");
    }

    /// Create a commit with the given files
    pub fn create_commit(&self, message: &str, files: &[(&str, &str)]) -> git2::Oid {
        let repo = self.repo();

        // Create and stage files
        for (name, content) in files {
            self.create_file(name, content);
            self.stage_file(name);
        }

        // Create commit
        let mut index = repo.index().expect("Failed to get index");
        let tree_oid = index.write_tree().expect("Failed to write tree");
        let tree = repo.find_tree(tree_oid).expect("Failed to find tree");
        let sig = repo.signature().expect("Failed to get signature");

        let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = parent.as_ref().into_iter().collect();

        repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .expect("Failed to create commit")
    }

    /// Create a branch at the current HEAD
    pub fn create_branch(&self, name: &str) -> git2::Oid {
        let repo = self.repo();
        let head = repo.head().expect("Failed to get HEAD");
        let commit = head.peel_to_commit().expect("Failed to get commit");
        repo.branch(name, &commit, false)
            .expect("Failed to create branch");
        commit.id()
    }

    /// Checkout a branch
    pub fn checkout_branch(&self, name: &str) {
        let repo = self.repo();
        let branch = repo
            .find_branch(name, git2::BranchType::Local)
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

    /// Get the current branch name
    pub fn current_branch(&self) -> String {
        let repo = self.repo();
        let head = repo.head().expect("Failed to get HEAD");
        head.shorthand().unwrap_or("").to_string()
    }

    /// Get the HEAD commit OID
    pub fn head_oid(&self) -> git2::Oid {
        let repo = self.repo();
        let head = repo.head().expect("Failed to get HEAD");
        head.target().expect("Failed to get target")
    }
}

impl Default for TestRepo {
    fn default() -> Self {
        Self::new()
    }
}
