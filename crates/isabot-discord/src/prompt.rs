// ABOUTME: Random script prompt generator.
// ABOUTME: Loads option lists from a TOML file and picks speaker, listener, genre and trope.

use crate::error::{BotError, Result};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Deserialize;
use std::path::Path;

/// A generated prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub speaker: String,
    pub listener: String,
    pub genre: String,
    pub trope: String,
}

/// Option lists a prompt is drawn from.
#[derive(Debug, Clone, Deserialize)]
pub struct Generator {
    pub genders: Vec<String>,
    pub character_types: Vec<String>,
    pub genres: Vec<String>,
    pub tropes: Vec<String>,
}

impl Generator {
    /// Read and validate the options file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            BotError::Prompt(format!("Failed to read prompt options from {:?}: {}", path, e))
        })?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let generator: Generator = toml::from_str(contents)
            .map_err(|e| BotError::Prompt(format!("Failed to parse prompt options: {}", e)))?;
        generator.validate()?;
        Ok(generator)
    }

    fn validate(&self) -> Result<()> {
        let lists = [
            ("genders", &self.genders),
            ("character_types", &self.character_types),
            ("genres", &self.genres),
            ("tropes", &self.tropes),
        ];
        for (name, list) in lists {
            if list.is_empty() {
                return Err(BotError::Prompt(format!("{} must not be empty", name)));
            }
        }
        Ok(())
    }

    /// Draw a prompt.
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Prompt {
        Prompt {
            speaker: self.character(rng),
            listener: self.character(rng),
            genre: pick(&self.genres, rng),
            trope: pick(&self.tropes, rng),
        }
    }

    /// "[gender] character type"
    fn character<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        format!(
            "[{}] {}",
            pick(&self.genders, rng),
            pick(&self.character_types, rng)
        )
    }
}

fn pick<R: Rng + ?Sized>(options: &[String], rng: &mut R) -> String {
    options.choose(rng).cloned().unwrap_or_default()
}
