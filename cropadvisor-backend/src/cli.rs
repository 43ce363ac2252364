/// Parsed command-line arguments.
pub struct CliArgs {
    /// Path to configuration file, if provided via `--config-path` or `-c`.
    pub config_path: Option<String>,
    pub help_requested: bool,
}

impl CliArgs {
    /// Parse the process arguments.
    ///
    /// Supported flags:
    /// - `--config-path <path>`, `--config-path=<path>`, `-c <path>`, `-c=<path>`
    /// - `--help` or `-h`
    pub fn parse() -> Self {
        let args: Vec<String> = std::env::args().collect();
        Self::from_args(&args)
    }

    fn from_args(args: &[String]) -> Self {
        Self {
            config_path: Self::extract_config_path(args),
            help_requested: args.iter().skip(1).any(|a| a == "--help" || a == "-h"),
        }
    }

    /// Print usage information to stderr.
    pub fn print_help() {
        eprintln!(
            "Usage: cropadvisor-backend [--config-path PATH] [--help]\n\n\
             --config-path, -c    Path to configuration file (overrides CROPADVISOR_CONFIG_PATH env var)\n\
             --help, -h           Print this message"
        );
    }

    fn extract_config_path(args: &[String]) -> Option<String> {
        let mut rest = args.iter().skip(1);
        while let Some(a) = rest.next() {
            if let Some(stripped) = a
                .strip_prefix("--config-path=")
                .or_else(|| a.strip_prefix("-c="))
            {
                return Some(stripped.to_string());
            }
            if a == "--config-path" || a == "-c" {
                return rest.next().cloned();
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("cropadvisor-backend")
            .chain(list.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn config_path_forms() {
        for form in [
            args(&["--config-path", "a.toml"]),
            args(&["--config-path=a.toml"]),
            args(&["-c", "a.toml"]),
            args(&["-c=a.toml"]),
        ] {
            assert_eq!(CliArgs::from_args(&form).config_path.as_deref(), Some("a.toml"));
        }
        assert_eq!(CliArgs::from_args(&args(&["-c"])).config_path, None);
        assert_eq!(CliArgs::from_args(&args(&[])).config_path, None);
    }

    #[test]
    fn help_flag() {
        assert!(CliArgs::from_args(&args(&["-h"])).help_requested);
        assert!(CliArgs::from_args(&args(&["--help"])).help_requested);
        assert!(!CliArgs::from_args(&args(&["-c", "x"])).help_requested);
    }
}
