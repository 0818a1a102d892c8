//! Reads a `ChaseConfig` from a `.json` or `.toml` file.
//! Keys the core does not know (renderer settings and the like) are ignored.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use chase_core::ChaseConfig;

pub fn load_config(path: &Path) -> Result<ChaseConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or_default();
    let config = match extension.to_ascii_lowercase().as_str() {
        "json" => parse_json(&text),
        "toml" => parse_toml(&text),
        other => bail!("unsupported config format `{other}` (expected .json or .toml)"),
    }
    .with_context(|| format!("failed to parse config file {}", path.display()))?;
    config.validate().with_context(|| format!("invalid config in {}", path.display()))?;
    tracing::debug!(path = %path.display(), "config loaded");
    Ok(config)
}

/// Config from `path`, or the defaults when no file was given.
pub fn load_or_default(path: Option<&Path>) -> Result<ChaseConfig> {
    match path {
        Some(path) => load_config(path),
        None => Ok(ChaseConfig::default()),
    }
}

fn parse_json(text: &str) -> Result<ChaseConfig> {
    Ok(serde_json::from_str(text)?)
}

/// Strategy names are map keys; going through a JSON value keeps their
/// decoding identical for both formats.
fn parse_toml(text: &str) -> Result<ChaseConfig> {
    let table: toml::Table = toml::from_str(text)?;
    Ok(serde_json::from_value(serde_json::to_value(table)?)?)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use chase_core::{CheckpointRouting, Role, StrategyKind};
    use tempfile::NamedTempFile;

    use super::*;

    fn write_config(suffix: &str, body: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().expect("temp file");
        file.write_all(body.as_bytes()).expect("write config");
        file
    }

    #[test]
    fn json_overrides_merge_with_defaults() {
        let file = write_config(
            ".json",
            r#"{
                "fps": 30,
                "maxSteps": 120,
                "firstMover": "enemy",
                "strategyWeights": { "enemy": { "jps": 1.0, "random": 0.25 } }
            }"#,
        );
        let config = load_config(file.path()).expect("json loads");
        assert_eq!(config.max_steps, 120);
        assert_eq!(config.first_mover, Role::Enemy);
        assert_eq!(config.strategy_weights.enemy.get(&StrategyKind::Jps), Some(&1.0));
        assert_eq!(config.strategy_weights.agent, ChaseConfig::default().strategy_weights.agent);
        assert_eq!(config.tunnel_pairs, 2);
    }

    #[test]
    fn toml_uses_the_same_keys() {
        let file = write_config(
            ".toml",
            r#"
maxSteps = 80
checkpointRouting = "inOrder"

[terrainProb]
wall = 0.1
bush = 0.1

[strategyWeights.enemy]
aStar = 1.0
moveClose = 0.5
"#,
        );
        let config = load_config(file.path()).expect("toml loads");
        assert_eq!(config.max_steps, 80);
        assert_eq!(config.checkpoint_routing, CheckpointRouting::InOrder);
        assert_eq!(config.terrain_prob.wall, 0.1);
        assert_eq!(config.strategy_weights.enemy.len(), 2);
    }

    #[test]
    fn invalid_weights_are_rejected_at_load_time() {
        let file = write_config(".json", r#"{ "strategyWeights": { "agent": { "random": -1 } } }"#);
        let err = load_config(file.path()).expect_err("negative weight");
        assert!(format!("{err:#}").contains("invalid config"));
    }

    #[test]
    fn unknown_strategy_names_fail_to_parse() {
        let file = write_config(".json", r#"{ "strategyWeights": { "enemy": { "teleport": 1 } } }"#);
        assert!(load_config(file.path()).is_err());
    }

    #[test]
    fn other_extensions_are_refused() {
        let file = write_config(".yaml", "maxSteps: 3");
        let err = load_config(file.path()).expect_err("yaml is not supported");
        assert!(format!("{err:#}").contains("unsupported config format"));
        assert_eq!(load_or_default(None).expect("defaults"), ChaseConfig::default());
    }
}
