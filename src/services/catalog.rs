use std::io;
use std::path::Path;

use crate::services::vantage::is_instance_type_token;

/// Instance types offered when no catalog file is configured.
pub const DEFAULT_INSTANCE_TYPES: &[&str] = &[
    "t2.micro",
    "t2.small",
    "t2.medium",
    "t2.large",
    "t3.micro",
    "t3.small",
    "t3.medium",
    "t3.large",
    "m5.large",
    "m5.xlarge",
    "m5.2xlarge",
    "c5.large",
    "c5.xlarge",
    "c5.2xlarge",
    "r5.large",
    "r5.xlarge",
    "r5.2xlarge",
];

/// The list of instance types the picker offers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceCatalog {
    types: Vec<String>,
}

impl Default for InstanceCatalog {
    fn default() -> Self {
        Self {
            types: DEFAULT_INSTANCE_TYPES.iter().map(|t| t.to_string()).collect(),
        }
    }
}

fn normalize(value: &str) -> String {
    value.to_lowercase().replace('.', "")
}

impl InstanceCatalog {
    /// Parse one instance type per line, e.g. the output of
    /// `aws ec2 describe-instance-types`. Blank lines, `#` comments and malformed
    /// names are skipped; the result is sorted and deduplicated.
    pub fn from_lines(text: &str) -> Self {
        let mut types: Vec<String> = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with('#'))
            .filter(|l| is_instance_type_token(l))
            .map(str::to_string)
            .collect();
        types.sort();
        types.dedup();
        Self { types }
    }

    pub fn from_file(path: &Path) -> io::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(Self::from_lines(&text))
    }

    /// Load the configured catalog file, falling back to the built-in list when
    /// no file is configured, it cannot be read or it holds no usable entry.
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };
        match Self::from_file(path) {
            Ok(catalog) if !catalog.is_empty() => {
                tracing::info!(path = %path.display(), count = catalog.len(), "Loaded instance type catalog");
                catalog
            }
            Ok(_) => {
                tracing::warn!(path = %path.display(), "Instance type catalog is empty; using built-in list");
                Self::default()
            }
            Err(e) => {
                tracing::error!(%e, path = %path.display(), "Failed to read instance type catalog; using built-in list");
                Self::default()
            }
        }
    }

    pub fn types(&self) -> &[String] {
        &self.types
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Case-insensitive substring match ignoring dots, so `c52` finds `c5.2xlarge`.
    pub fn search(&self, term: &str) -> Vec<&str> {
        let needle = normalize(term.trim());
        self.types
            .iter()
            .filter(|t| normalize(t).contains(&needle))
            .map(String::as_str)
            .collect()
    }
}
