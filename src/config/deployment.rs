//! Deployment configuration (lapd.yml) data structures
//!
//! A configuration names one or more deployable functions. Each function
//! owns an ordered list of filters describing which files go into its
//! archive.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::archive::filter::GlobSet;
use crate::error::{LapdError, Result};

/// Top-level configuration (lapd.yml)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Deployable functions
    #[serde(default)]
    pub functions: Vec<FunctionDeployment>,

    /// Bucket the archive is uploaded to
    #[serde(default)]
    pub s3_bucket: String,

    /// Object key of the uploaded archive
    #[serde(default)]
    pub package: String,

    /// Local path the archive is written to
    #[serde(default)]
    pub local_package_name: String,
}

/// One deployable unit and its file-selection policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionDeployment {
    /// Function name, also used as the Lambda function name
    pub name: String,

    /// Directory subtrees scanned into the archive, in order
    #[serde(rename = "filter", default)]
    pub filters: Vec<Filter>,
}

/// One directory subtree to scan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    /// Directory stripped from archive entry names
    #[serde(default)]
    pub base_path: String,

    /// Subdirectory of `base_path` to walk; kept in entry names
    #[serde(default)]
    pub relative_path: String,

    /// Base-name globs; a file must match at least one
    #[serde(default)]
    pub include: Vec<String>,

    /// Base-name globs; a file must match none
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl Config {
    /// The configuration written when no `lapd.yml` exists yet
    pub fn default_template() -> Self {
        Self {
            functions: vec![FunctionDeployment {
                name: "default".to_string(),
                filters: vec![
                    Filter::new(".", "src"),
                    Filter::new(".venv/lib/python3.11/site-packages/", "."),
                ],
            }],
            s3_bucket: "lapd".to_string(),
            package: "deploy.zip".to_string(),
            local_package_name: "deploy.zip".to_string(),
        }
    }

    /// Parse configuration from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Serialize configuration to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Find a function deployment by name
    pub fn function(&self, name: &str) -> Result<&FunctionDeployment> {
        self.functions
            .iter()
            .find(|f| f.name == name)
            .ok_or_else(|| LapdError::FunctionNotFound {
                name: name.to_string(),
            })
    }

    /// Validate the configuration
    ///
    /// Function names must be unique and every glob must compile.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for function in &self.functions {
            if function.name.is_empty() {
                return Err(LapdError::ConfigInvalid {
                    message: "function name cannot be empty".to_string(),
                });
            }
            if !seen.insert(function.name.as_str()) {
                return Err(LapdError::ConfigInvalid {
                    message: format!("function '{}' is defined more than once", function.name),
                });
            }
            for filter in &function.filters {
                filter.compile().map_err(|reason| LapdError::ConfigInvalid {
                    message: format!("function '{}': {reason}", function.name),
                })?;
            }
        }

        Ok(())
    }
}

impl Filter {
    /// Create a filter that includes every file under `base_path/relative_path`
    pub fn new(base_path: impl Into<String>, relative_path: impl Into<String>) -> Self {
        Self {
            base_path: base_path.into(),
            relative_path: relative_path.into(),
            include: vec!["*".to_string()],
            exclude: Vec::new(),
        }
    }

    /// Compile the include and exclude globs
    pub fn compile(&self) -> std::result::Result<(GlobSet, GlobSet), String> {
        Ok((GlobSet::new(&self.include)?, GlobSet::new(&self.exclude)?))
    }
}
