//! Build-then-publish cycle for the meme site.
//!
//! `build_site` refreshes today's memes and regenerates the site; `publish`
//! snapshots the generated output into a throwaway git repository and
//! force-pushes it, so the target branch always holds exactly one commit.

use crate::{
    config::PublisherConfig,
    domain::CommandRunner,
    errors::PublishError,
    exec::Cmd,
};
use anyhow::{Context, Result};
use std::{fs, path::Path};
use tempfile::TempDir;
use tracing::{self, info};

pub const COMMIT_MESSAGE: &str = "Daily update";
const WORK_DIR_PREFIX: &str = "dm-";
/// Remote name used inside the disposable working tree.
const PUSH_REMOTE: &str = "origin";

pub struct Publisher<R> {
    config: PublisherConfig,
    runner: R,
}

impl<R: CommandRunner> Publisher<R> {
    pub fn new(config: PublisherConfig, runner: R) -> Self {
        Self { config, runner }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Runs the collector, then the site generator, both from the project root.
    pub fn build_site(&self) -> Result<(), PublishError> {
        let root = &self.config.root;
        self.runner.run(&Cmd::from_slice(&self.config.fetch_command).cwd(root))?;
        self.runner.run(&Cmd::from_slice(&self.config.generate_command).cwd(root))?;
        Ok(())
    }

    /// Commits the build output into a fresh repository and force-pushes it
    /// to the configured branch. The working tree is removed on every path.
    pub fn publish(&self) -> Result<(), PublishError> {
        let build_dir = &self.config.build_dir;
        if !build_dir.is_dir() {
            tracing::error!(build_dir = %build_dir.display(), "No build directory found. Run the site generator first.");
            return Err(PublishError::MissingBuildDir(build_dir.clone()));
        }

        let work = tempfile::Builder::new()
            .prefix(WORK_DIR_PREFIX)
            .tempdir()
            .map_err(PublishError::WorkingTree)?;
        tracing::debug!(work_dir = %work.path().display(), "Created working tree");

        let result = self.publish_from(&work);
        close_working_tree(work); // Runs on success and on every error path
        result
    }

    fn publish_from(&self, work: &TempDir) -> Result<(), PublishError> {
        let cwd = work.path();
        let copied = copy_dir_contents(&self.config.build_dir, cwd)?;
        tracing::debug!(files = copied, "Copied build output into working tree");

        let git = || Cmd::new("git").cwd(cwd);
        self.runner.run(&git().arg("init"))?;
        self.runner.run(&git().args(["config", "user.email", self.config.committer_email.as_str()]))?;
        self.runner.run(&git().args(["config", "user.name", self.config.committer_name.as_str()]))?;
        self.runner.run(&git().args(["add", "."]))?;
        self.runner.run(&git().args(["commit", "-m", COMMIT_MESSAGE]))?;

        let repo_url = self.remote_url()?;

        self.runner.run(&git().args(["remote", "add", PUSH_REMOTE, repo_url.as_str()]))?;
        let refspec = format!("HEAD:{}", self.config.git_branch);
        self.runner.run(&git().args(["push", "-f", PUSH_REMOTE, refspec.as_str()]))?;

        info!(branch = %self.config.git_branch, "Published build to branch {}", self.config.git_branch);
        Ok(())
    }

    /// Reads the push target from the project's own repository. A failing
    /// lookup counts as "no URL" rather than a command failure.
    fn remote_url(&self) -> Result<String, PublishError> {
        let key = format!("remote.{}.url", self.config.git_remote);
        let lookup = Cmd::new("git")
            .args(["config", "--get", key.as_str()])
            .cwd(&self.config.root);
        let output = self.runner.output(&lookup)?;

        let url = output.stdout.trim();
        if url.is_empty() {
            tracing::error!(
                remote = %self.config.git_remote,
                "Could not determine repo remote URL. Make sure git remote exists in your repo."
            );
            return Err(PublishError::MissingRemoteUrl(self.config.git_remote.clone()));
        }
        Ok(url.to_string())
    }
}

fn close_working_tree(work: TempDir) {
    let path = work.path().to_path_buf();
    if let Err(e) = work.close() {
        tracing::warn!(work_dir = %path.display(), "Failed to remove working tree: {}", e);
    }
}

/// Copies everything under `src_dir` into `dest_dir`, merging with whatever
/// is already there. Returns the number of files copied.
fn copy_dir_contents(src_dir: &Path, dest_dir: &Path) -> Result<usize> {
    let mut count = 0;
    copy_dir_recursive(src_dir, dest_dir, &mut count)?;
    Ok(count)
}

fn copy_dir_recursive(src_dir: &Path, dest_dir: &Path, count: &mut usize) -> Result<()> {
    fs::create_dir_all(dest_dir)
        .with_context(|| format!("Failed to create directory {}", dest_dir.display()))?;

    let entries = fs::read_dir(src_dir)
        .with_context(|| format!("Failed to read directory {}", src_dir.display()))?;
    for entry in entries {
        let entry = entry?;
        let src_path = entry.path();
        let dest_path = dest_dir.join(entry.file_name());

        // Follows symlinks so a linked directory is copied as its contents
        let is_dir = fs::metadata(&src_path)
            .with_context(|| format!("Failed to read metadata of {}", src_path.display()))?
            .is_dir();
        if is_dir {
            copy_dir_recursive(&src_path, &dest_path, count)?;
        } else {
            fs::copy(&src_path, &dest_path).with_context(|| {
                format!("Failed to copy {} to {}", src_path.display(), dest_path.display())
            })?;
            *count += 1;
        }
    }
    Ok(())
}
