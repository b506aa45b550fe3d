//! Git credential setup and the add/commit/push sequence.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::env::Credentials;
use crate::error::Result;
use crate::inputs::Inputs;
use crate::runner::{must_succeed, CommandRunner, Invocation};

/// `user.name` for commits made by the action.
pub const GIT_USER_NAME: &str = "GitHub Action";

/// Hosts that receive a `.netrc` stanza.
pub const NETRC_HOSTS: [&str; 2] = ["github.com", "api.github.com"];

/// `.netrc` body with one stanza per entry of [`NETRC_HOSTS`].
pub fn netrc_contents(actor: &str, token: &str) -> String {
    NETRC_HOSTS
        .iter()
        .map(|host| format!("machine {}\nlogin {}\npassword {}\n", host, actor, token))
        .collect()
}

/// GitHub noreply address for `actor`.
pub fn noreply_email(actor: &str) -> String {
    format!("{}@users.noreply.github.com", actor)
}

/// Commit message naming the new image and the overlay.
pub fn commit_message(inputs: &Inputs) -> String {
    format!(
        "Set image {}:{} in {}",
        inputs.new_name,
        inputs.new_tag,
        inputs.pathspec()
    )
}

/// Write `<home>/.netrc`, owner-readable only on unix.
pub fn write_netrc(credentials: &Credentials) -> Result<PathBuf> {
    let path = credentials.home.join(".netrc");
    std::fs::write(&path, netrc_contents(&credentials.actor, &credentials.token))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o600))?;
    }

    Ok(path)
}

/// Git commands bound to one working directory and one home.
///
/// Every call carries `HOME` so `--global` config and `.netrc` resolve to
/// the same directory the credentials were written into.
pub struct GitDriver<'a> {
    runner: &'a dyn CommandRunner,
    workdir: PathBuf,
    home: PathBuf,
}

impl<'a> GitDriver<'a> {
    pub fn new(runner: &'a dyn CommandRunner, workdir: &Path, home: &Path) -> Self {
        GitDriver {
            runner,
            workdir: workdir.to_path_buf(),
            home: home.to_path_buf(),
        }
    }

    fn git<I, S>(&self, args: I) -> Invocation
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Invocation::new("git", args)
            .current_dir(&self.workdir)
            .env("HOME", self.home.to_string_lossy())
    }

    /// `git config --global <key> <value>`
    pub async fn config_global(&self, key: &str, value: &str) -> Result<()> {
        must_succeed(self.runner, &self.git(["config", "--global", key, value])).await?;
        Ok(())
    }

    /// `git add <pathspec>`
    pub async fn add(&self, pathspec: &str) -> Result<()> {
        must_succeed(self.runner, &self.git(["add", pathspec])).await?;
        Ok(())
    }

    /// `git commit -m <message>`
    pub async fn commit(&self, message: &str) -> Result<()> {
        must_succeed(self.runner, &self.git(["commit", "-m", message])).await?;
        Ok(())
    }

    /// `git push`
    pub async fn push(&self) -> Result<()> {
        must_succeed(self.runner, &self.git(["push"])).await?;
        Ok(())
    }
}

/// Write `.netrc` and set the commit identity.
pub async fn configure_credentials(
    runner: &dyn CommandRunner,
    workdir: &Path,
    credentials: &Credentials,
) -> Result<()> {
    let netrc = write_netrc(credentials)?;
    info!(path = %netrc.display(), actor = %credentials.actor, "Wrote credentials");

    let git = GitDriver::new(runner, workdir, &credentials.home);
    git.config_global("user.email", &noreply_email(&credentials.actor))
        .await?;
    git.config_global("user.name", GIT_USER_NAME).await?;
    Ok(())
}
