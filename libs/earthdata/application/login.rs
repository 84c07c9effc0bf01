//! Make sure the netrc file holds Earthdata Login credentials

use crate::infrastructure::auth::{
    prompt_line, prompt_secret, read_netrc, write_netrc, Netrc, NetrcError, PASSWORD_PROMPT,
    URS_HOST, USERNAME_PROMPT,
};
use anyhow::bail;
use std::io;
use std::path::Path;
use tracing::info;

/// Source of the username and password typed by the user
pub trait Prompter {
    fn username(&mut self) -> io::Result<String>;
    fn password(&mut self) -> io::Result<String>;
}

/// Reads from the controlling terminal; the password is not echoed
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn username(&mut self) -> io::Result<String> {
        prompt_line(USERNAME_PROMPT)
    }

    fn password(&mut self) -> io::Result<String> {
        prompt_secret(PASSWORD_PROMPT)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginOutcome {
    /// Credentials were already present; nothing written
    AlreadyConfigured,
    /// The netrc file did not exist and was created
    Created,
    /// An entry was added to an existing netrc file
    Updated,
}

pub struct LoginService {
    host: String,
}

impl LoginService {
    pub fn new(host: impl Into<String>) -> Self {
        Self { host: host.into() }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Prompt for credentials unless `path` already has them for the host
    pub fn ensure_credentials(
        &self,
        path: &Path,
        prompter: &mut dyn Prompter,
    ) -> anyhow::Result<LoginOutcome> {
        let (mut netrc, outcome) = match read_netrc(path) {
            Ok(netrc) => {
                if netrc
                    .authenticators(&self.host)
                    .and_then(|e| e.credentials())
                    .is_some()
                {
                    info!("Credentials for {} already present in {}", self.host, path.display());
                    return Ok(LoginOutcome::AlreadyConfigured);
                }
                (netrc, LoginOutcome::Updated)
            }
            Err(NetrcError::NotFound(_)) => (Netrc::default(), LoginOutcome::Created),
            Err(e) => return Err(e.into()),
        };

        let username = prompter.username()?.trim().to_string();
        if username.is_empty() {
            bail!("username cannot be empty");
        }
        let password = prompter.password()?;
        if password.is_empty() {
            bail!("password cannot be empty");
        }

        netrc.upsert(&self.host, &username, &password);
        write_netrc(path, &netrc)?;

        info!("Saved credentials for {} to {}", self.host, path.display());
        Ok(outcome)
    }
}

impl Default for LoginService {
    fn default() -> Self {
        Self::new(URS_HOST)
    }
}
