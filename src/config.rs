//! Command-line arguments and the validated scan configuration.

use crate::classifier::CompanyDomain;
use crate::error::ConfigError;
use crate::patterns::AssetType;
use clap::Parser;
use std::path::PathBuf;

/// Default number of worker threads
pub const DEFAULT_THREADS: usize = 20;

#[derive(Parser, Debug, Clone)]
#[command(
    author,
    version,
    about = "Extract emails, IPs, domains, URL paths and company subdomains from files",
    long_about = None,
    after_help = "Examples:\n    \
        assetgrep -p ./dump -a all\n    \
        assetgrep -p notes.txt,logs/ -a email -t 4\n    \
        assetgrep -p ./crawl -a companydomain --cd example.com"
)]
pub struct CliArgs {
    /// Comma-separated files and/or folders from which to extract assets
    #[arg(short, long, value_delimiter = ',', required = true, value_name = "PATHS")]
    pub paths: Vec<String>,

    /// Asset type to extract
    #[arg(short, long = "asset-type", alias = "assetType", value_enum, value_name = "TYPE")]
    pub asset_type: AssetType,

    /// Number of threads to use to process files
    #[arg(short, long, default_value_t = DEFAULT_THREADS, value_name = "NUM")]
    pub threads: usize,

    /// Print verbose messages on stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// Company domain whose subdomains are reported (required for companydomain)
    #[arg(long = "cd", alias = "company-domain", value_name = "DOMAIN")]
    pub company_domain: Option<String>,

    /// Abort the whole run on the first file that cannot be read
    #[arg(long)]
    pub strict: bool,
}

/// What to do when an enumerated file cannot be read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadErrorPolicy {
    /// Report the file and keep going
    #[default]
    Skip,
    /// Stop the run and return the error
    Abort,
}

/// Validated configuration for one run
#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub paths: Vec<PathBuf>,
    pub asset_type: AssetType,
    pub threads: usize,
    pub verbose: bool,
    /// Set only in companydomain mode
    pub company_domain: Option<CompanyDomain>,
    pub read_errors: ReadErrorPolicy,
}

impl ScanConfig {
    /// Configuration with default threads, no company domain and skip-on-read-error
    pub fn new(paths: Vec<PathBuf>, asset_type: AssetType) -> Self {
        Self {
            paths,
            asset_type,
            threads: DEFAULT_THREADS,
            verbose: false,
            company_domain: None,
            read_errors: ReadErrorPolicy::Skip,
        }
    }

    pub fn from_args(args: CliArgs) -> Result<Self, ConfigError> {
        // "a,,b" and trailing commas leave empty entries behind
        let paths: Vec<PathBuf> = args
            .paths
            .iter()
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
            .collect();
        if paths.is_empty() {
            return Err(ConfigError::NoPaths);
        }

        if args.threads == 0 {
            return Err(ConfigError::InvalidThreadCount(args.threads));
        }

        let company_domain = if args.asset_type.filters_company_domain() {
            let domain = args
                .company_domain
                .as_deref()
                .and_then(CompanyDomain::new)
                .ok_or(ConfigError::MissingCompanyDomain)?;
            Some(domain)
        } else {
            None
        };

        Ok(Self {
            paths,
            asset_type: args.asset_type,
            threads: args.threads,
            verbose: args.verbose,
            company_domain,
            read_errors: if args.strict {
                ReadErrorPolicy::Abort
            } else {
                ReadErrorPolicy::Skip
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Result<ScanConfig, ConfigError> {
        let mut full = vec!["assetgrep"];
        full.extend_from_slice(argv);
        ScanConfig::from_args(CliArgs::try_parse_from(full).unwrap())
    }

    #[test]
    fn test_defaults() {
        let config = parse(&["-p", "a.txt", "-a", "email"]).unwrap();
        assert_eq!(config.paths, vec![PathBuf::from("a.txt")]);
        assert_eq!(config.asset_type, AssetType::Email);
        assert_eq!(config.threads, DEFAULT_THREADS);
        assert!(!config.verbose);
        assert!(config.company_domain.is_none());
        assert_eq!(config.read_errors, ReadErrorPolicy::Skip);
    }

    #[test]
    fn test_paths_are_comma_separated() {
        let config = parse(&["--paths", "a.txt,dir/, ,b.log,", "-a", "ip"]).unwrap();
        assert_eq!(
            config.paths,
            vec![
                PathBuf::from("a.txt"),
                PathBuf::from("dir/"),
                PathBuf::from("b.log")
            ]
        );
    }

    #[test]
    fn test_only_empty_paths_is_an_error() {
        assert_eq!(parse(&["-p", ",", "-a", "ip"]).unwrap_err(), ConfigError::NoPaths);
    }

    #[test]
    fn test_asset_type_camel_case_alias() {
        let config = parse(&["-p", "a", "--assetType", "urlpath"]).unwrap();
        assert_eq!(config.asset_type, AssetType::Urlpath);
    }

    #[test]
    fn test_invalid_asset_type_is_rejected_by_parser() {
        let result = CliArgs::try_parse_from(["assetgrep", "-p", "a", "-a", "hostname"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_companydomain_requires_cd() {
        assert_eq!(
            parse(&["-p", "a", "-a", "companydomain"]).unwrap_err(),
            ConfigError::MissingCompanyDomain
        );
        assert_eq!(
            parse(&["-p", "a", "-a", "companydomain", "--cd", "  "]).unwrap_err(),
            ConfigError::MissingCompanyDomain
        );
    }

    #[test]
    fn test_companydomain_is_normalised() {
        let config = parse(&["-p", "a", "-a", "companydomain", "--cd", "Example.COM"]).unwrap();
        assert_eq!(config.company_domain.unwrap().as_str(), "example.com");
    }

    #[test]
    fn test_cd_ignored_outside_companydomain_mode() {
        let config = parse(&["-p", "a", "-a", "domain", "--cd", "example.com"]).unwrap();
        assert!(config.company_domain.is_none());
    }

    #[test]
    fn test_zero_threads_is_an_error() {
        assert_eq!(
            parse(&["-p", "a", "-a", "all", "-t", "0"]).unwrap_err(),
            ConfigError::InvalidThreadCount(0)
        );
    }

    #[test]
    fn test_strict_selects_abort_policy() {
        let config = parse(&["-p", "a", "-a", "all", "--strict", "-v"]).unwrap();
        assert_eq!(config.read_errors, ReadErrorPolicy::Abort);
        assert!(config.verbose);
    }
}
