//! Earthdata Login credentials
//!
//! Credentials live in a netrc file under the URS machine entry, the same
//! place curl, wget and GDAL look for them.

pub mod netrc;
pub mod prompt;

pub use netrc::{
    load_credentials, netrc_path, read_netrc, write_netrc, Credentials, Netrc, NetrcEntry,
    NetrcError,
};
pub use prompt::{prompt_line, prompt_secret, PASSWORD_PROMPT, USERNAME_PROMPT};

/// Earthdata Login (URS) host that issues download authorizations
pub const URS_HOST: &str = "urs.earthdata.nasa.gov";
