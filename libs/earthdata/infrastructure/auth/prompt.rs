//! Terminal prompts for Earthdata Login

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use std::io::{self, BufRead, Write};

pub const USERNAME_PROMPT: &str =
    "Enter NASA Earthdata Login Username \n(or create an account at urs.earthdata.nasa.gov): ";

pub const PASSWORD_PROMPT: &str = "Enter NASA Earthdata Login Password: ";

/// Read one visible line from stdin, without the trailing newline
pub fn prompt_line(prompt: &str) -> io::Result<String> {
    let mut stdout = io::stdout();
    stdout.write_all(prompt.as_bytes())?;
    stdout.flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Read a line without echoing it
///
/// Raw mode is always restored, including on Ctrl+C which returns
/// [`io::ErrorKind::Interrupted`].
pub fn prompt_secret(prompt: &str) -> io::Result<String> {
    let mut stdout = io::stdout();
    stdout.write_all(prompt.as_bytes())?;
    stdout.flush()?;

    terminal::enable_raw_mode()?;
    let result = read_hidden();
    terminal::disable_raw_mode()?;

    stdout.write_all(b"\r\n")?;
    stdout.flush()?;
    result
}

fn read_hidden() -> io::Result<String> {
    let mut secret = String::new();

    loop {
        let Event::Key(KeyEvent {
            code,
            modifiers,
            kind,
            ..
        }) = event::read()?
        else {
            continue;
        };

        if kind == KeyEventKind::Release {
            continue;
        }

        match code {
            KeyCode::Enter => return Ok(secret),
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                return Err(io::Error::new(io::ErrorKind::Interrupted, "input cancelled"));
            }
            KeyCode::Backspace => {
                secret.pop();
            }
            KeyCode::Char(c) => secret.push(c),
            _ => {}
        }
    }
}
