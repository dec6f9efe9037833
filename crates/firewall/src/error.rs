use std::fmt;
use std::path::PathBuf;

/// The only failure a caller can see: filtered output still contained a
/// suspect tag. The content must not be rendered.
#[derive(Debug)]
pub enum FirewallError {
    VerificationFailed {
        /// Suspect tags found, lowercase, sorted.
        tags: Vec<String>,
        /// Diagnostic files that were written, if any.
        diagnostics: Vec<PathBuf>,
    },
}

impl fmt::Display for FirewallError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FirewallError::VerificationFailed { tags, diagnostics } => {
                write!(
                    f,
                    "html firewall failed: tags passed the filter: {}",
                    tags.join(",")
                )?;
                if !diagnostics.is_empty() {
                    let paths: Vec<_> = diagnostics.iter().map(|p| p.display().to_string()).collect();
                    write!(f, " (diagnostics: {})", paths.join(", "))?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for FirewallError {}

/// Failure to load `FirewallSettings`.
#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "failed to read firewall settings {}: {source}", path.display())
            }
            ConfigError::Parse(err) => write!(f, "invalid firewall settings: {err}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Parse(err) => Some(err),
        }
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::Parse(err)
    }
}
