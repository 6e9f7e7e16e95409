use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use niuma_game::{ContentTables, DataLoader, RulesConfig};

/// Failures while reading tester inputs from disk.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Reads rules and content from JSON files, falling back to the embedded
/// tables and default rules for anything not given.
#[derive(Debug, Clone, Default)]
pub struct FileLoader {
    pub rules_path: Option<PathBuf>,
    pub content_path: Option<PathBuf>,
}

impl FileLoader {
    fn read(path: &Path) -> Result<String, LoadError> {
        fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    fn parse_err(path: &Path) -> impl FnOnce(serde_json::Error) -> LoadError + '_ {
        move |source| LoadError::Parse {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl DataLoader for FileLoader {
    type Error = LoadError;

    fn load_content(&self) -> Result<ContentTables, Self::Error> {
        match &self.content_path {
            Some(path) => ContentTables::from_json(&Self::read(path)?)
                .map_err(Self::parse_err(path)),
            None => ContentTables::embedded().map_err(|source| LoadError::Parse {
                path: PathBuf::from("<embedded>"),
                source,
            }),
        }
    }

    fn load_rules(&self) -> Result<RulesConfig, Self::Error> {
        match &self.rules_path {
            Some(path) => {
                RulesConfig::from_json(&Self::read(path)?).map_err(Self::parse_err(path))
            }
            None => Ok(RulesConfig::default()),
        }
    }
}

/// Content and rules shared by every simulated run.
#[derive(Debug, Clone)]
pub struct TesterAssets {
    pub content: ContentTables,
    pub rules: RulesConfig,
}

impl TesterAssets {
    /// # Errors
    ///
    /// Returns an error if either file cannot be read or parsed, or if the
    /// result fails validation.
    pub fn load(loader: &impl DataLoader<Error = LoadError>) -> anyhow::Result<Self> {
        let content = loader.load_content()?;
        let rules = loader.load_rules()?;
        content.validate()?;
        rules.validate()?;
        Ok(Self { content, rules })
    }

    pub fn load_default() -> anyhow::Result<Self> {
        Self::load(&FileLoader::default())
    }
}
