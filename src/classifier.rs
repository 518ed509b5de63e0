//! Classification of one file's contents into artifacts.
//!
//! A file is matched against the pattern of every requested artifact type. Domain
//! candidates that are exactly an IP match from the same content are dropped, and in
//! companydomain mode newly unique domains are printed only when they belong to the
//! company domain. Every accepted candidate goes through the shared [`AssetStore`], which
//! decides whether it is new and therefore printed.

use crate::config::ScanConfig;
use crate::emitter::Emitter;
use crate::error::ScanError;
use crate::patterns::{ArtifactType, AssetType, PatternSet};
use crate::store::AssetStore;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// A company's root domain, lowercased
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyDomain(String);

impl CompanyDomain {
    /// Returns None for an empty or all-whitespace domain
    pub fn new(domain: &str) -> Option<Self> {
        let domain = domain.trim().to_lowercase();
        if domain.is_empty() {
            None
        } else {
            Some(CompanyDomain(domain))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for the domain itself and any subdomain of it, ignoring case
    pub fn matches(&self, domain: &str) -> bool {
        let domain = domain.to_lowercase();
        match domain.strip_suffix(self.0.as_str()) {
            Some("") => true,
            Some(prefix) => prefix.ends_with('.'),
            None => false,
        }
    }
}

/// Newly unique values found in one or more files
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Findings {
    counts: [usize; 4],
    /// New domains kept out of the output by the company domain filter
    pub suppressed_domains: usize,
}

impl Findings {
    pub fn new_values(&self, artifact_type: ArtifactType) -> usize {
        self.counts[artifact_type as usize]
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    pub fn merge(&mut self, other: &Findings) {
        for (count, extra) in self.counts.iter_mut().zip(other.counts) {
            *count += extra;
        }
        self.suppressed_domains += other.suppressed_domains;
    }

    fn record(&mut self, artifact_type: ArtifactType) {
        self.counts[artifact_type as usize] += 1;
    }
}

pub struct Classifier<'a> {
    patterns: &'a PatternSet,
    store: &'a AssetStore,
    emitter: &'a dyn Emitter,
    asset_type: AssetType,
    company_domain: Option<&'a CompanyDomain>,
}

impl<'a> Classifier<'a> {
    pub fn new(
        config: &'a ScanConfig,
        patterns: &'a PatternSet,
        store: &'a AssetStore,
        emitter: &'a dyn Emitter,
    ) -> Self {
        let company_domain = if config.asset_type.filters_company_domain() {
            config.company_domain.as_ref()
        } else {
            None
        };

        Self {
            patterns,
            store,
            emitter,
            asset_type: config.asset_type,
            company_domain,
        }
    }

    /// Read a whole file and classify its contents
    pub fn classify_file(&self, path: &Path) -> Result<Findings, ScanError> {
        let bytes = fs::read(path).map_err(|source| ScanError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        // Patterns are ASCII-only, so replacement characters never change a match
        let content = String::from_utf8_lossy(&bytes);
        Ok(self.classify_text(&content))
    }

    /// Classify already loaded content
    pub fn classify_text(&self, content: &str) -> Findings {
        let mut findings = Findings::default();

        for &artifact_type in self.asset_type.artifact_types() {
            let candidates = match artifact_type {
                ArtifactType::Domain => self.domain_candidates(content),
                other => self.patterns.find_all(other, content),
            };
            for candidate in candidates {
                self.accept(artifact_type, candidate, &mut findings);
            }
        }

        findings
    }

    /// Domain matches minus anything that is also an IP match in the same content
    fn domain_candidates<'t>(&self, content: &'t str) -> Vec<&'t str> {
        let ips: HashSet<&str> = self
            .patterns
            .find_all(ArtifactType::Ip, content)
            .into_iter()
            .collect();

        self.patterns
            .find_all(ArtifactType::Domain, content)
            .into_iter()
            .filter(|candidate| !ips.contains(candidate))
            .collect()
    }

    fn accept(&self, artifact_type: ArtifactType, value: &str, findings: &mut Findings) {
        let mut suppressed = false;
        let inserted = self.store.set(artifact_type).insert_then(value, || {
            if self.is_printable(artifact_type, value) {
                self.emitter.emit(artifact_type, value);
            } else {
                suppressed = true;
            }
        });

        if inserted {
            findings.record(artifact_type);
        }
        if suppressed {
            findings.suppressed_domains += 1;
        }
    }

    fn is_printable(&self, artifact_type: ArtifactType, value: &str) -> bool {
        match (artifact_type, self.company_domain) {
            (ArtifactType::Domain, Some(company)) => company.matches(value),
            _ => true,
        }
    }
}
