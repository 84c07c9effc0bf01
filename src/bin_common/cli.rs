//! CLI utilities for binaries
//!
//! Handles configuration path lookup and argument parsing
//! for all binary executables.

use std::path::PathBuf;

/// Type of configuration to load
#[derive(Debug, Clone)]
pub enum ConfigType {
    /// Granule fetch configuration (fetch_config.yaml)
    Fetch,
    /// Custom path
    Custom(String),
}

impl ConfigType {
    /// Get the default path for this config type
    pub fn default_path(&self) -> &str {
        match self {
            ConfigType::Fetch => "config/fetch_config.yaml",
            ConfigType::Custom(path) => path,
        }
    }

    /// Get the environment variable name for this config type
    pub fn env_var_name(&self) -> &str {
        match self {
            ConfigType::Fetch => "FETCH_CONFIG_PATH",
            ConfigType::Custom(_) => "CONFIG_PATH",
        }
    }
}

/// Load configuration path from environment or use default
///
/// # Examples
/// ```
/// use earthdata_viirs::bin_common::{load_config_from_env, ConfigType};
///
/// let path = load_config_from_env(ConfigType::Fetch);
/// ```
pub fn load_config_from_env(config_type: ConfigType) -> PathBuf {
    std::env::var(config_type.env_var_name())
        .unwrap_or_else(|_| config_type.default_path().to_string())
        .into()
}

/// Parse command line arguments for a binary
///
/// Returns a vector of arguments (excluding the program name)
pub fn parse_args() -> Vec<String> {
    std::env::args().skip(1).collect()
}

/// Which analyses `viirs_analyze` runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisSelection {
    pub rgb: bool,
    pub vegetation: bool,
    pub reflectance: bool,
}

impl AnalysisSelection {
    pub fn all() -> Self {
        Self {
            rgb: true,
            vegetation: true,
            reflectance: true,
        }
    }
}

/// Parsed `viirs_analyze` arguments
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzeArgs {
    pub input: PathBuf,
    pub out_dir: PathBuf,
    pub selection: AnalysisSelection,
}

pub const ANALYZE_USAGE: &str =
    "usage: viirs_analyze <file.h5> [out_dir] [--rgb] [--vi] [--reflectance]";

/// Parse `<file.h5> [out_dir] [--rgb|--vi|--reflectance]...`
///
/// Without flags every analysis runs. `out_dir` defaults to the
/// directory holding the input file.
pub fn parse_analyze_args(args: &[String]) -> anyhow::Result<AnalyzeArgs> {
    let mut positional = Vec::new();
    let mut selection = AnalysisSelection {
        rgb: false,
        vegetation: false,
        reflectance: false,
    };

    for arg in args {
        match arg.as_str() {
            "--rgb" => selection.rgb = true,
            "--vi" => selection.vegetation = true,
            "--reflectance" => selection.reflectance = true,
            flag if flag.starts_with("--") => anyhow::bail!("unknown flag {flag}\n{ANALYZE_USAGE}"),
            _ => positional.push(arg.clone()),
        }
    }

    let (input, out_dir) = match positional.as_slice() {
        [input] => {
            let input = PathBuf::from(input);
            let out_dir = input
                .parent()
                .filter(|dir| !dir.as_os_str().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("."));
            (input, out_dir)
        }
        [input, out_dir] => (PathBuf::from(input), PathBuf::from(out_dir)),
        _ => anyhow::bail!(ANALYZE_USAGE),
    };

    if !(selection.rgb || selection.vegetation || selection.reflectance) {
        selection = AnalysisSelection::all();
    }

    Ok(AnalyzeArgs {
        input,
        out_dir,
        selection,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_config_type_paths() {
        assert_eq!(ConfigType::Fetch.default_path(), "config/fetch_config.yaml");

        let custom = ConfigType::Custom("custom/path.yaml".to_string());
        assert_eq!(custom.default_path(), "custom/path.yaml");
    }

    #[test]
    fn test_config_type_env_vars() {
        assert_eq!(ConfigType::Fetch.env_var_name(), "FETCH_CONFIG_PATH");
    }

    #[test]
    fn test_analyze_defaults() {
        let parsed = parse_analyze_args(&args(&["data/granule.h5"])).unwrap();
        assert_eq!(parsed.input, PathBuf::from("data/granule.h5"));
        assert_eq!(parsed.out_dir, PathBuf::from("data"));
        assert_eq!(parsed.selection, AnalysisSelection::all());
    }

    #[test]
    fn test_analyze_flags_select() {
        let parsed = parse_analyze_args(&args(&["g.h5", "out", "--vi"])).unwrap();
        assert_eq!(parsed.out_dir, PathBuf::from("out"));
        assert!(parsed.selection.vegetation);
        assert!(!parsed.selection.rgb);
        assert!(!parsed.selection.reflectance);
    }

    #[test]
    fn test_analyze_rejects_bad_args() {
        assert!(parse_analyze_args(&args(&[])).is_err());
        assert!(parse_analyze_args(&args(&["a.h5", "b", "c"])).is_err());
        assert!(parse_analyze_args(&args(&["a.h5", "--ndwi"])).is_err());
    }
}
