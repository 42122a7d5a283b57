use super::{evolution::EvolutionConfig, traits::ConfigSection};
use crate::error::GpError;
use crate::grammar::{Grammar, Rule};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

/// Grammar section: the rules plus the type the search starts from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrammarConfig {
    pub start_type: String,
    pub rules: Vec<Rule>,
}

impl GrammarConfig {
    pub fn grammar(&self) -> Grammar {
        Grammar::new(self.rules.clone())
    }

    pub fn validate(&self) -> Result<(), GpError> {
        if !self.rules.iter().any(|r| r.return_type == self.start_type) {
            return Err(GpError::Configuration(format!(
                "No rule produces the start type {}",
                self.start_type
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub evolution: EvolutionConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grammar: Option<GrammarConfig>,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), GpError> {
        self.evolution.validate()?;
        if let Some(grammar) = &self.grammar {
            grammar.validate()?;
        }
        Ok(())
    }
}

pub struct ConfigManager {
    config: Arc<RwLock<AppConfig>>,
}

impl ConfigManager {
    pub fn new() -> Self {
        Self {
            config: Arc::new(RwLock::new(AppConfig::default())),
        }
    }

    pub fn load_from_file<P: AsRef<Path>>(&self, path: P) -> Result<(), GpError> {
        let contents = std::fs::read_to_string(path)?;
        self.load_from_str(&contents)
    }

    pub fn load_from_str(&self, contents: &str) -> Result<(), GpError> {
        let config: AppConfig = toml::from_str(contents)?;
        config.validate()?;
        log::debug!("Loaded configuration section {}", EvolutionConfig::section_name());

        *self.config.write().unwrap_or_else(PoisonError::into_inner) = config;
        Ok(())
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), GpError> {
        let toml_str = toml::to_string_pretty(&self.get())?;
        std::fs::write(path, toml_str)?;
        Ok(())
    }

    pub fn get(&self) -> AppConfig {
        self.config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Apply `f` and keep the result only if it validates
    pub fn update<F>(&self, f: F) -> Result<(), GpError>
    where
        F: FnOnce(&mut AppConfig),
    {
        let mut config = self.config.write().unwrap_or_else(PoisonError::into_inner);
        let mut candidate = config.clone();
        f(&mut candidate);
        candidate.validate()?;
        *config = candidate;
        Ok(())
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}
