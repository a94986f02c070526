//! Integration tests for the Git reader.
//!
//! These tests build real repositories in a tempdir through the git2 API
//! and check that what the reader returns matches what was written.

#![cfg(feature = "git2")]

use std::path::Path;

use tempfile::TempDir;

use gitdomain::git::{Git, GitError};
use gitdomain::types::{FileChangeKind, Hash, RefKind, RefName, TagName, Validate};

/// Test fixture that creates a real git repository.
struct TestRepo {
    dir: TempDir,
    repo: git2::Repository,
}

impl TestRepo {
    /// Create a new test repository with an initial commit.
    fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        let repo = git2::Repository::init(dir.path()).expect("failed to init repo");
        let fixture = Self { dir, repo };
        fixture.commit_file("README.md", "# Test Repo\n", "Initial commit");
        fixture
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Open the reader on this repository.
    fn git(&self) -> Git {
        Git::open(self.path()).expect("failed to open test repo")
    }

    fn signature(&self) -> git2::Signature<'static> {
        let when = git2::Time::new(1_700_000_000, 60);
        git2::Signature::new("Test User", "test@example.com", &when).unwrap()
    }

    fn write(&self, path: &str, content: &str) {
        let full = self.path().join(path);
        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(full, content).unwrap();
    }

    fn stage(&self, path: &str) {
        let mut index = self.repo.index().unwrap();
        index.add_path(Path::new(path)).unwrap();
        index.write().unwrap();
    }

    /// Write, stage and commit a file, returning the new commit id.
    fn commit_file(&self, path: &str, content: &str, message: &str) -> git2::Oid {
        self.write(path, content);
        self.stage(path);
        self.commit_index(message)
    }

    /// Move a file in the worktree and index, then commit.
    fn commit_rename(&self, from: &str, to: &str, message: &str) -> git2::Oid {
        std::fs::rename(self.path().join(from), self.path().join(to)).unwrap();
        let mut index = self.repo.index().unwrap();
        index.remove_path(Path::new(from)).unwrap();
        index.add_path(Path::new(to)).unwrap();
        index.write().unwrap();
        self.commit_index(message)
    }

    fn commit_index(&self, message: &str) -> git2::Oid {
        let mut index = self.repo.index().unwrap();
        let tree = self.repo.find_tree(index.write_tree().unwrap()).unwrap();
        let sig = self.signature();
        let parent = self.repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();
        self.repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .unwrap()
    }

    fn head_commit(&self) -> git2::Commit<'_> {
        self.repo.head().unwrap().peel_to_commit().unwrap()
    }
}

fn hash(oid: git2::Oid) -> Hash {
    Hash::new(oid.to_string()).unwrap()
}

mod open {
    use super::*;

    #[test]
    fn discovers_from_subdirectory() {
        let repo = TestRepo::new();
        repo.write("nested/dir/file.txt", "x");
        assert!(Git::open(&repo.path().join("nested/dir")).is_ok());
    }
}

mod refs {
    use super::*;

    #[test]
    fn head_resolves_to_latest_commit() {
        let repo = TestRepo::new();
        let oid = repo.commit_file("a.txt", "a", "Add a");

        let head = repo.git().head().unwrap();
        assert_eq!(head.kind, RefKind::Head);
        assert_eq!(head.name.as_str(), "HEAD");
        assert_eq!(head.hash, hash(oid));
        assert!(head.validate().is_ok());
    }

    #[test]
    fn branch_ref_kind_is_inferred() {
        let repo = TestRepo::new();
        repo.repo.branch("feature", &repo.head_commit(), false).unwrap();

        let name = RefName::new("refs/heads/feature").unwrap();
        let r = repo.git().resolve_ref(&name).unwrap();
        assert_eq!(r.kind, RefKind::Branch);
        assert_eq!(r.hash, hash(repo.head_commit().id()));
    }

    #[test]
    fn missing_ref_is_reported() {
        let repo = TestRepo::new();
        let name = RefName::new("refs/heads/nope").unwrap();
        let err = repo.git().resolve_ref(&name).unwrap_err();
        assert!(matches!(err, GitError::RefNotFound { refname } if refname == "refs/heads/nope"));
    }
}

mod commits {
    use super::*;

    #[test]
    fn root_commit_lists_added_files() {
        let repo = TestRepo::new();
        let commit = repo.git().commit(&hash(repo.head_commit().id())).unwrap();

        assert!(commit.is_root());
        assert_eq!(commit.summary, "Initial commit");
        assert_eq!(commit.changes.len(), 1);
        assert_eq!(commit.changes[0].path, "README.md");
        assert_eq!(commit.changes[0].kind, FileChangeKind::Added);
    }

    #[test]
    fn signatures_keep_offset() {
        let repo = TestRepo::new();
        let commit = repo.git().commit(&hash(repo.head_commit().id())).unwrap();

        assert_eq!(commit.author.name, "Test User");
        assert_eq!(commit.author.email, "test@example.com");
        assert_eq!(
            commit.author.when.unwrap().to_rfc3339(),
            "2023-11-14T23:13:20+01:00"
        );
    }

    #[test]
    fn message_body_and_parents() {
        let repo = TestRepo::new();
        let parent = repo.head_commit().id();
        let oid = repo.commit_file("b.txt", "b", "feat: add b\n\nLonger body.\n");

        let commit = repo.git().commit(&hash(oid)).unwrap();
        assert_eq!(commit.parents, vec![hash(parent)]);
        assert_eq!(commit.summary, "feat: add b");
        assert_eq!(commit.body(), "Longer body.");
        assert!(commit.validate().is_ok());
    }

    #[test]
    fn modified_and_deleted_files() {
        let repo = TestRepo::new();
        repo.commit_file("keep.txt", "one\n", "Add keep");
        repo.write("keep.txt", "two\n");
        repo.stage("keep.txt");
        std::fs::remove_file(repo.path().join("README.md")).unwrap();
        let mut index = repo.repo.index().unwrap();
        index.remove_path(Path::new("README.md")).unwrap();
        index.write().unwrap();
        let oid = repo.commit_index("Edit and delete");

        let commit = repo.git().commit(&hash(oid)).unwrap();
        let kinds: Vec<(&str, FileChangeKind)> = commit
            .changes
            .iter()
            .map(|c| (c.path.as_str(), c.kind))
            .collect();
        assert!(kinds.contains(&("keep.txt", FileChangeKind::Modified)));
        assert!(kinds.contains(&("README.md", FileChangeKind::Deleted)));
    }

    #[test]
    fn renames_are_detected() {
        let repo = TestRepo::new();
        let content = "fn main() {\n    println!(\"hello\");\n}\n".repeat(10);
        repo.commit_file("old.rs", &content, "Add old");
        let oid = repo.commit_rename("old.rs", "new.rs", "Rename");

        let commit = repo.git().commit(&hash(oid)).unwrap();
        assert_eq!(commit.changes.len(), 1);
        let change = &commit.changes[0];
        assert_eq!(change.kind, FileChangeKind::Renamed);
        assert_eq!(change.path, "new.rs");
        assert_eq!(change.old_path, "old.rs");
    }

    #[test]
    fn merge_commit_has_two_parents() {
        let repo = TestRepo::new();
        let base = repo.head_commit();
        let sig = repo.signature();
        let side_tree = base.tree().unwrap();
        let side = repo
            .repo
            .commit(None, &sig, &sig, "Side", &side_tree, &[&base])
            .unwrap();
        let main = repo.commit_file("m.txt", "m", "Main");

        let main_commit = repo.repo.find_commit(main).unwrap();
        let side_commit = repo.repo.find_commit(side).unwrap();
        let merge = repo
            .repo
            .commit(
                Some("HEAD"),
                &sig,
                &sig,
                "Merge side",
                &main_commit.tree().unwrap(),
                &[&main_commit, &side_commit],
            )
            .unwrap();

        let commit = repo.git().commit(&hash(merge)).unwrap();
        assert!(commit.is_merge());
        assert_eq!(commit.parents.len(), 2);
    }

    #[test]
    fn crlf_message_is_invalid() {
        let repo = TestRepo::new();
        let multi = repo.commit_file("c.txt", "c", "fix\r\n\r\nbody");
        let single = repo.commit_file("d.txt", "d", "fix\r\n");

        for oid in [multi, single] {
            match repo.git().commit(&hash(oid)).unwrap_err() {
                GitError::Invalid(e) => assert_eq!(e.field(), "message"),
                other => panic!("expected Invalid, got {other:?}"),
            }
        }
    }

    #[test]
    fn missing_commit_is_reported() {
        let repo = TestRepo::new();
        let missing = Hash::new("1111111111111111111111111111111111111111").unwrap();
        assert!(matches!(
            repo.git().commit(&missing),
            Err(GitError::ObjectNotFound { .. })
        ));
    }
}

mod tags {
    use super::*;

    #[test]
    fn lightweight_tag() {
        let repo = TestRepo::new();
        let head = repo.head_commit();
        repo.repo
            .tag_lightweight("v1.0.0", head.as_object(), false)
            .unwrap();

        let tag = repo.git().tag(&TagName::new("v1.0.0").unwrap()).unwrap();
        assert!(!tag.annotated);
        assert_eq!(tag.commit, hash(head.id()));
        assert_eq!(tag.object, tag.commit);
        assert!(tag.message.is_empty());
    }

    #[test]
    fn annotated_tag() {
        let repo = TestRepo::new();
        let head = repo.head_commit();
        let tag_oid = repo
            .repo
            .tag("v2.0.0", head.as_object(), &repo.signature(), "Release two\n", false)
            .unwrap();

        let tag = repo.git().tag(&TagName::new("v2.0.0").unwrap()).unwrap();
        assert!(tag.annotated);
        assert_eq!(tag.object, hash(tag_oid));
        assert_eq!(tag.commit, hash(head.id()));
        assert_eq!(tag.message, "Release two");
    }

    #[test]
    fn missing_tag() {
        let repo = TestRepo::new();
        let err = repo.git().tag(&TagName::new("v9").unwrap()).unwrap_err();
        assert!(matches!(err, GitError::RefNotFound { .. }));
    }
}

mod worktree {
    use super::*;

    #[test]
    fn fresh_repo_is_clean() {
        let repo = TestRepo::new();
        assert!(repo.git().worktree_status().unwrap().is_clean());
    }

    #[test]
    fn untracked_file() {
        let repo = TestRepo::new();
        repo.write("new.txt", "new");

        let status = repo.git().worktree_status().unwrap();
        assert!(status.has_untracked);
        assert!(!status.has_staged);
        assert!(!status.has_unstaged);
        assert_eq!(status.to_string(), "untracked");
    }

    #[test]
    fn staged_and_unstaged() {
        let repo = TestRepo::new();
        repo.write("staged.txt", "s");
        repo.stage("staged.txt");
        repo.write("README.md", "changed\n");

        let status = repo.git().worktree_status().unwrap();
        assert!(status.has_staged);
        assert!(status.has_unstaged);
        assert!(!status.has_untracked);
        assert_eq!(status.to_string(), "unstaged, staged");
    }
}
