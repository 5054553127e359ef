//! Initialize a tagnet project.

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::{Path, PathBuf};
use tagnet::prelude::*;

use crate::config::{Config, CONFIG_FILE};

const DICTIONARY_FILE: &str = "dictionary.json";

pub fn run(path: Option<String>, with_dictionary: bool) -> Result<()> {
    let base_path = match path {
        Some(p) => PathBuf::from(p),
        None => std::env::current_dir().context("Failed to read current directory")?,
    };
    std::fs::create_dir_all(&base_path)
        .with_context(|| format!("Failed to create {}", base_path.display()))?;

    println!("{} Initializing tagnet project...", "→".blue());

    let mut config = Config::default();
    if with_dictionary {
        write_dictionary(&base_path.join(DICTIONARY_FILE))?;
        config.dictionary.path = Some(PathBuf::from(DICTIONARY_FILE));
    }

    let config_path = base_path.join(CONFIG_FILE);
    if !config_path.exists() {
        config.save(&config_path)?;
        println!("  {} Created {}", "✓".green(), config_path.display());
    } else {
        println!("  {} {} already exists", "•".yellow(), config_path.display());
    }

    println!();
    println!("{} tagnet project initialized!", "✓".green().bold());
    println!();
    println!("Next steps:");
    println!("  {} tagnet stats <records.json>", "1.".blue());
    println!("  {} tagnet analyze <records.json> --target whitening", "2.".blue());
    println!("  {} tagnet export <records.json> --target whitening --output graph.json", "3.".blue());

    Ok(())
}

fn write_dictionary(path: &Path) -> Result<()> {
    if path.exists() {
        println!("  {} {} already exists", "•".yellow(), path.display());
        return Ok(());
    }
    let content = serde_json::to_string_pretty(&TagDictionary::builtin())
        .context("Failed to serialize dictionary")?;
    std::fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    println!("  {} Created {}", "✓".green(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_dictionary;

    #[test]
    fn init_writes_config_and_dictionary() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("project");
        run(Some(base.to_string_lossy().to_string()), true).unwrap();

        let config = Config::load_from(&base.join(CONFIG_FILE)).unwrap();
        assert_eq!(config.dictionary.path, Some(base.join(DICTIONARY_FILE)));
        let dict = load_dictionary(&base.join(DICTIONARY_FILE)).unwrap();
        assert_eq!(dict, TagDictionary::builtin());

        // Second run leaves existing files alone
        run(Some(base.to_string_lossy().to_string()), false).unwrap();
        assert!(Config::load_from(&base.join(CONFIG_FILE)).unwrap().dictionary.path.is_some());
    }
}
