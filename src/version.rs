//! Build metadata embedded at compile time.

use std::fmt;

/// Package version from Cargo.toml.
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

const UNKNOWN: &str = "unknown";

/// Where and from what source this binary was built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildInfo {
    pub version: &'static str,
    pub git_branch: &'static str,
    pub git_sha: &'static str,
    pub git_dirty: bool,
}

impl BuildInfo {
    /// Metadata of the running build; git fields are "unknown" outside a checkout.
    pub fn current() -> Self {
        Self {
            version: PKG_VERSION,
            git_branch: match option_env!("VERGEN_GIT_BRANCH") {
                Some(branch) => branch,
                None => UNKNOWN,
            },
            git_sha: match option_env!("VERGEN_GIT_SHA") {
                Some(sha) => sha,
                None => UNKNOWN,
            },
            git_dirty: option_env!("VERGEN_GIT_DIRTY") == Some("true"),
        }
    }

    /// First seven characters of the commit SHA.
    pub fn short_sha(&self) -> &'static str {
        let end = self
            .git_sha
            .char_indices()
            .nth(7)
            .map_or(self.git_sha.len(), |(i, _)| i);
        &self.git_sha[..end]
    }
}

/// `{version}+{branch}.{sha}`, with a `.dirty` suffix for modified trees.
impl fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}+{}.{}", self.version, self.git_branch, self.short_sha())?;
        if self.git_dirty {
            f.write_str(".dirty")?;
        }
        Ok(())
    }
}

/// Full version string of the running build, e.g. `0.2.1+main.abc1234`.
pub fn version_string() -> String {
    BuildInfo::current().to_string()
}
