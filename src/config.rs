//! Settings file support
//!
//! Every section is optional; keys left out of a TOML file keep their defaults.
//!
//! ```toml
//! [scan]
//! exclude_patterns = ["node_modules", "*.log"]
//! respect_gitignore = true
//!
//! [complexity]
//! control_flow = 2.0
//!
//! [layout]
//! strategy = "district_cluster"
//! seed = 7
//!
//! [layout.forces]
//! damping = 0.95
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};
use crate::estimator::ComplexityWeights;
use crate::layout::LayoutConfig;
use crate::tree::ScanConfig;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub scan: ScanConfig,
    pub complexity: ComplexityWeights,
    pub layout: LayoutConfig,
}

impl Settings {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| AnalysisError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::LayoutStrategy;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(Settings::from_toml_str("").unwrap(), Settings::default());
    }

    #[test]
    fn test_partial_override() {
        let settings = Settings::from_toml_str(
            r#"
[scan]
respect_gitignore = true

[complexity]
control_flow = 3.0

[layout]
strategy = "folder_bubble"
iterations = 10

[layout.forces]
damping = 0.9
"#,
        )
        .unwrap();

        assert!(settings.scan.respect_gitignore);
        assert!(settings.scan.exclude_patterns.contains(&"node_modules".to_string()));
        assert_eq!(settings.complexity.control_flow, 3.0);
        assert_eq!(settings.complexity.function, 2.0);
        assert_eq!(settings.layout.strategy, LayoutStrategy::FolderBubble);
        assert_eq!(settings.layout.iterations, 10);
        assert_eq!(settings.layout.forces.damping, 0.9);
        assert_eq!(settings.layout.forces.cooling, 0.98);
        assert_eq!(settings.layout.district.base_radius, 40.0);
    }

    #[test]
    fn test_invalid_toml() {
        let err = Settings::from_toml_str("[layout]\nstrategy = \"spiral\"").unwrap_err();
        assert!(matches!(err, AnalysisError::ConfigParse(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Settings::load(Path::new("/no/such/codeorbit.toml")).unwrap_err();
        assert!(matches!(err, AnalysisError::ConfigRead { .. }));
    }

    #[test]
    fn test_load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("codeorbit.toml");
        fs::write(&path, "[layout]\nseed = 42\n").unwrap();
        assert_eq!(Settings::load(&path).unwrap().layout.seed, 42);
    }
}
