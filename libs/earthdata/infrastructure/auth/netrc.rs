//! netrc parsing and writing
//!
//! Supports `machine`, `default`, `login`, `password`, `account` and
//! `macdef` (bodies are kept verbatim so rewriting a file does not drop
//! them). Comments start with a `#` token and run to end of line.

use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum NetrcError {
    #[error("netrc file not found: {0}")]
    NotFound(PathBuf),

    #[error("no credentials for {0} in netrc file")]
    NoEntry(String),

    #[error("netrc entry for {0} is missing a login or password")]
    Incomplete(String),

    #[error("netrc parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("could not determine home directory")]
    NoHomeDir,

    #[error("netrc I/O failed: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, NetrcError>;

/// Username and password for a single host
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// One `machine` (or `default`) block
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetrcEntry {
    /// `None` for the `default` entry
    pub machine: Option<String>,
    pub login: Option<String>,
    pub password: Option<String>,
    pub account: Option<String>,
}

impl NetrcEntry {
    /// Login and password if both are set
    pub fn credentials(&self) -> Option<Credentials> {
        match (&self.login, &self.password) {
            (Some(login), Some(password)) => Some(Credentials::new(login, password)),
            _ => None,
        }
    }
}

/// Parsed netrc file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Netrc {
    entries: Vec<NetrcEntry>,
    macros: Vec<(String, String)>,
}

impl Netrc {
    pub fn parse(text: &str) -> Result<Self> {
        Parser::new(text).parse()
    }

    pub fn entries(&self) -> &[NetrcEntry] {
        &self.entries
    }

    /// Entry for `host`, falling back to the `default` entry
    pub fn authenticators(&self, host: &str) -> Option<&NetrcEntry> {
        self.entries
            .iter()
            .find(|e| e.machine.as_deref() == Some(host))
            .or_else(|| self.entries.iter().find(|e| e.machine.is_none()))
    }

    /// Replace the login and password for `host`, adding the entry if needed
    ///
    /// New entries go before a `default` entry, which must stay last.
    pub fn upsert(&mut self, host: &str, login: &str, password: &str) {
        if let Some(entry) = self
            .entries
            .iter_mut()
            .find(|e| e.machine.as_deref() == Some(host))
        {
            entry.login = Some(login.to_string());
            entry.password = Some(password.to_string());
            return;
        }

        let entry = NetrcEntry {
            machine: Some(host.to_string()),
            login: Some(login.to_string()),
            password: Some(password.to_string()),
            account: None,
        };

        match self.entries.iter().position(|e| e.machine.is_none()) {
            Some(idx) => self.entries.insert(idx, entry),
            None => self.entries.push(entry),
        }
    }
}

impl fmt::Display for Netrc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            match &entry.machine {
                Some(machine) => write!(f, "machine {}", quote(machine))?,
                None => f.write_str("default")?,
            }
            if let Some(login) = &entry.login {
                write!(f, " login {}", quote(login))?;
            }
            if let Some(password) = &entry.password {
                write!(f, " password {}", quote(password))?;
            }
            if let Some(account) = &entry.account {
                write!(f, " account {}", quote(account))?;
            }
            writeln!(f)?;
        }
        for (name, body) in &self.macros {
            writeln!(f, "macdef {}", name)?;
            f.write_str(body)?;
            if !body.ends_with('\n') {
                writeln!(f)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Quote a token that would otherwise read back differently; a leading
/// `#` starts a comment
fn quote(token: &str) -> String {
    if !token.is_empty()
        && !token.starts_with('#')
        && !token.contains(|c: char| c.is_whitespace() || c == '"' || c == '\\')
    {
        return token.to_string();
    }
    let mut out = String::with_capacity(token.len() + 2);
    out.push('"');
    for c in token.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

struct Parser<'a> {
    text: &'a str,
    pos: usize,
    line: usize,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str) -> Self {
        Self { text, pos: 0, line: 1 }
    }

    fn error(&self, message: impl Into<String>) -> NetrcError {
        NetrcError::Parse {
            line: self.line,
            message: message.into(),
        }
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.text[self.pos..].chars().next()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    fn peek(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    fn next_token(&mut self) -> Result<Option<String>> {
        loop {
            while self.peek().is_some_and(char::is_whitespace) {
                self.bump();
            }
            match self.peek() {
                None => return Ok(None),
                Some('#') => {
                    while let Some(c) = self.bump() {
                        if c == '\n' {
                            break;
                        }
                    }
                }
                Some('"') => {
                    self.bump();
                    let mut token = String::new();
                    loop {
                        match self.bump() {
                            None => return Err(self.error("unterminated quoted token")),
                            Some('"') => return Ok(Some(token)),
                            Some('\\') => match self.bump() {
                                Some(c) => token.push(c),
                                None => return Err(self.error("unterminated quoted token")),
                            },
                            Some(c) => token.push(c),
                        }
                    }
                }
                Some(_) => {
                    let start = self.pos;
                    while self.peek().is_some_and(|c| !c.is_whitespace()) {
                        self.bump();
                    }
                    return Ok(Some(self.text[start..self.pos].to_string()));
                }
            }
        }
    }

    fn value(&mut self, keyword: &str) -> Result<String> {
        self.next_token()?
            .ok_or_else(|| self.error(format!("missing value after '{keyword}'")))
    }

    /// Consume the rest of the `macdef` line and the body up to a blank line
    fn macro_body(&mut self) -> String {
        while let Some(c) = self.bump() {
            if c == '\n' {
                break;
            }
        }
        let start = self.pos;
        let rest = &self.text[start..];
        let end = rest
            .find("\n\n")
            .map(|i| i + 1)
            .unwrap_or(rest.len());
        let body = rest[..end].to_string();
        while self.pos < start + end {
            self.bump();
        }
        body
    }

    fn parse(mut self) -> Result<Netrc> {
        let mut netrc = Netrc::default();
        let mut current: Option<NetrcEntry> = None;

        while let Some(token) = self.next_token()? {
            match token.as_str() {
                "machine" => {
                    let machine = self.value("machine")?;
                    netrc.entries.extend(current.take());
                    current = Some(NetrcEntry {
                        machine: Some(machine),
                        ..Default::default()
                    });
                }
                "default" => {
                    netrc.entries.extend(current.take());
                    current = Some(NetrcEntry::default());
                }
                "login" | "password" | "account" => {
                    let value = self.value(&token)?;
                    let entry = current
                        .as_mut()
                        .ok_or_else(|| self.error(format!("'{token}' outside of a machine entry")))?;
                    match token.as_str() {
                        "login" => entry.login = Some(value),
                        "password" => entry.password = Some(value),
                        _ => entry.account = Some(value),
                    }
                }
                "macdef" => {
                    let name = self.value("macdef")?;
                    netrc.entries.extend(current.take());
                    let body = self.macro_body();
                    netrc.macros.push((name, body));
                }
                other => return Err(self.error(format!("unexpected token '{other}'"))),
            }
        }

        netrc.entries.extend(current.take());
        Ok(netrc)
    }
}

/// `$NETRC` if set, otherwise `~/.netrc`
pub fn netrc_path() -> Result<PathBuf> {
    if let Some(path) = std::env::var_os("NETRC") {
        return Ok(PathBuf::from(path));
    }
    dirs::home_dir()
        .map(|home| home.join(".netrc"))
        .ok_or(NetrcError::NoHomeDir)
}

/// Read a netrc file, mapping a missing file to [`NetrcError::NotFound`]
pub fn read_netrc(path: &Path) -> Result<Netrc> {
    match fs::read_to_string(path) {
        Ok(text) => Netrc::parse(&text),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            Err(NetrcError::NotFound(path.to_path_buf()))
        }
        Err(e) => Err(e.into()),
    }
}

/// Credentials for `host` from the netrc file at `path`
pub fn load_credentials(path: &Path, host: &str) -> Result<Credentials> {
    let netrc = read_netrc(path)?;
    let entry = netrc
        .authenticators(host)
        .ok_or_else(|| NetrcError::NoEntry(host.to_string()))?;
    entry
        .credentials()
        .ok_or_else(|| NetrcError::Incomplete(host.to_string()))
}

/// Write the netrc file readable and writable by the owner only
pub fn write_netrc(path: &Path, netrc: &Netrc) -> Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;
    file.write_all(netrc.to_string().as_bytes())?;

    // mode() only applies on creation
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    }

    debug!(path = %path.display(), "Wrote netrc file");
    Ok(())
}
