use anyhow::{Context, Result};
use earthdata::{init_tracing, netrc_path, LoginOutcome, LoginService, TerminalPrompter};
use tracing::info;

fn main() -> Result<()> {
    init_tracing();

    let path = netrc_path().context("cannot locate netrc file")?;
    let service = LoginService::default();

    match service.ensure_credentials(&path, &mut TerminalPrompter)? {
        LoginOutcome::AlreadyConfigured => {
            info!("Earthdata Login already configured for {}", service.host())
        }
        LoginOutcome::Created => info!("Created {}", path.display()),
        LoginOutcome::Updated => info!("Added {} to {}", service.host(), path.display()),
    }

    Ok(())
}
