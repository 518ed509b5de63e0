//! Artifact types and the patterns that extract them, loaded from patterns.toml.

use anyhow::{Context, Result};
use clap::ValueEnum;
use regex::Regex;
use serde::Deserialize;
use std::fmt;

/// Kinds of artifact that have their own pattern and their own unique set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactType {
    UrlPath,
    Email,
    Ip,
    Domain,
}

impl ArtifactType {
    /// Every artifact type, in the order a file is classified against them
    pub const ALL: [ArtifactType; 4] = [
        ArtifactType::UrlPath,
        ArtifactType::Email,
        ArtifactType::Ip,
        ArtifactType::Domain,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ArtifactType::UrlPath => "urlpath",
            ArtifactType::Email => "email",
            ArtifactType::Ip => "ip",
            ArtifactType::Domain => "domain",
        }
    }
}

impl fmt::Display for ArtifactType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Asset type requested on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AssetType {
    /// Every artifact type
    All,
    Email,
    Ip,
    Domain,
    Urlpath,
    /// Domains, printing only the company domain and its subdomains
    Companydomain,
}

impl AssetType {
    /// Artifact types whose patterns are applied in this mode
    pub fn artifact_types(self) -> &'static [ArtifactType] {
        match self {
            AssetType::All => &ArtifactType::ALL,
            AssetType::Email => &[ArtifactType::Email],
            AssetType::Ip => &[ArtifactType::Ip],
            AssetType::Domain | AssetType::Companydomain => &[ArtifactType::Domain],
            AssetType::Urlpath => &[ArtifactType::UrlPath],
        }
    }

    pub fn includes(self, artifact_type: ArtifactType) -> bool {
        self.artifact_types().contains(&artifact_type)
    }

    /// Whether newly found domains are filtered against a company domain before printing
    pub fn filters_company_domain(self) -> bool {
        self == AssetType::Companydomain
    }
}

/// Structure to deserialize the pattern table from TOML
#[derive(Debug, Deserialize)]
struct PatternsConfig {
    urlpath: PatternConfig,
    email: PatternConfig,
    ip: PatternConfig,
    domain: PatternConfig,
}

#[derive(Debug, Deserialize)]
struct PatternConfig {
    pattern: String,
}

// Embed the TOML file directly in the binary at compile time
const PATTERNS_TOML: &str = include_str!("../patterns.toml");

/// The compiled pattern for every artifact type. Built once at startup and shared
/// read-only by every worker.
#[derive(Debug, Clone)]
pub struct PatternSet {
    urlpath: Regex,
    email: Regex,
    ip: Regex,
    domain: Regex,
}

impl PatternSet {
    /// Load the patterns embedded in the binary
    pub fn load() -> Result<Self> {
        Self::from_toml(PATTERNS_TOML)
    }

    /// Parse and compile a pattern table
    pub fn from_toml(source: &str) -> Result<Self> {
        let config: PatternsConfig =
            toml::from_str(source).context("Failed to parse patterns TOML")?;

        Ok(PatternSet {
            urlpath: compile(ArtifactType::UrlPath, &config.urlpath.pattern)?,
            email: compile(ArtifactType::Email, &config.email.pattern)?,
            ip: compile(ArtifactType::Ip, &config.ip.pattern)?,
            domain: compile(ArtifactType::Domain, &config.domain.pattern)?,
        })
    }

    pub fn regex(&self, artifact_type: ArtifactType) -> &Regex {
        match artifact_type {
            ArtifactType::UrlPath => &self.urlpath,
            ArtifactType::Email => &self.email,
            ArtifactType::Ip => &self.ip,
            ArtifactType::Domain => &self.domain,
        }
    }

    /// All non-overlapping matches of one artifact type's pattern, left to right
    pub fn find_all<'t>(&self, artifact_type: ArtifactType, text: &'t str) -> Vec<&'t str> {
        self.regex(artifact_type)
            .find_iter(text)
            .map(|m| m.as_str())
            .collect()
    }
}

fn compile(artifact_type: ArtifactType, pattern: &str) -> Result<Regex> {
    Regex::new(pattern).with_context(|| format!("Invalid {} pattern: {}", artifact_type, pattern))
}
