use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Deserialize;
use thiserror::Error;

const LIFESPAN_RANGE: std::ops::RangeInclusive<u32> = 40..=85;

fn default_years_per_tick() -> u32 {
    1
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub seed: u64,
    pub start_year: i32,
    #[serde(default = "default_years_per_tick")]
    pub years_per_tick: u32,
    #[serde(default)]
    pub ticks: Option<u64>,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub figures: Vec<ScenarioFigure>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioFigure {
    pub name: String,
    pub birth_year: i32,
    #[serde(default)]
    pub lifespan: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScenarioError {
    #[error("scenario name must not be empty")]
    EmptyName,
    #[error("years_per_tick must be at least 1")]
    ZeroYearsPerTick,
    #[error("figure `{0}` is listed more than once")]
    DuplicateFigure(String),
    #[error("figure `{name}` is born in {birth_year}, after the start year {start_year}")]
    BornAfterStart {
        name: String,
        birth_year: i32,
        start_year: i32,
    },
}

/// A figure ready to be spawned, with its lifespan resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FigureSeed {
    pub name: String,
    pub birth_year: i32,
    pub lifespan: u32,
}

pub struct ScenarioLoader {
    base_dir: PathBuf,
}

impl ScenarioLoader {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self, file: impl AsRef<Path>) -> Result<Scenario> {
        let path = self.base_dir.join(file);
        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read scenario file {}", path.display()))?;
        let scenario = Scenario::from_yaml_str(&data)
            .with_context(|| format!("Failed to load {}", path.display()))?;
        Ok(scenario)
    }
}

impl Scenario {
    /// Parse and validate a scenario document.
    pub fn from_yaml_str(data: &str) -> Result<Self> {
        let scenario: Scenario = serde_yaml::from_str(data).context("Failed to parse scenario")?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn validate(&self) -> Result<(), ScenarioError> {
        if self.name.trim().is_empty() {
            return Err(ScenarioError::EmptyName);
        }
        if self.years_per_tick == 0 {
            return Err(ScenarioError::ZeroYearsPerTick);
        }
        let mut seen = HashSet::new();
        for figure in &self.figures {
            if !seen.insert(figure.name.as_str()) {
                return Err(ScenarioError::DuplicateFigure(figure.name.clone()));
            }
            if figure.birth_year > self.start_year {
                return Err(ScenarioError::BornAfterStart {
                    name: figure.name.clone(),
                    birth_year: figure.birth_year,
                    start_year: self.start_year,
                });
            }
        }
        Ok(())
    }

    /// Figures in declaration order. Missing lifespans are rolled from the
    /// scenario seed, so the same scenario always yields the same figures.
    pub fn figure_seeds(&self) -> Vec<FigureSeed> {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        self.figures
            .iter()
            .map(|figure| FigureSeed {
                name: figure.name.clone(),
                birth_year: figure.birth_year,
                lifespan: figure
                    .lifespan
                    .unwrap_or_else(|| rng.gen_range(LIFESPAN_RANGE)),
            })
            .collect()
    }

    pub fn ticks(&self, override_ticks: Option<u64>) -> u64 {
        override_ticks.or(self.ticks).unwrap_or(100)
    }
}
