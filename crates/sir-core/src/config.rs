use std::path::{Path, PathBuf};

use crate::app_config::ScoringConfig;
use crate::error::ConfigError;
use crate::schema::Platform;

/// Load scoring configuration: defaults, then an optional YAML profile, then
/// `SIR_*` environment overrides.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
/// `profile` wins over `SIR_PROFILE_PATH` when both are given.
///
/// # Errors
///
/// Returns `ConfigError` if the profile cannot be read or parsed, an env var
/// is not a number, or the resulting config fails validation.
pub fn load_scoring_config(profile: Option<&Path>) -> Result<ScoringConfig, ConfigError> {
    dotenvy::dotenv().ok();
    build_scoring_config(profile, |key| std::env::var(key))
}

/// Load and validate a YAML scoring profile. Every section and field is
/// optional and falls back to its default.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_scoring_profile(path: &Path) -> Result<ScoringConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ProfileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let config: ScoringConfig = serde_yaml::from_str(&content)?;
    validate_scoring_config(&config)?;

    Ok(config)
}

/// Build scoring configuration using the provided env-var lookup function,
/// so tests can drive it from a `HashMap` without touching the process env.
fn build_scoring_config<F>(profile: Option<&Path>, lookup: F) -> Result<ScoringConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let profile_path = profile
        .map(Path::to_path_buf)
        .or_else(|| lookup("SIR_PROFILE_PATH").ok().map(PathBuf::from));

    let base = match profile_path {
        Some(path) => load_scoring_profile(&path)?,
        None => ScoringConfig::default(),
    };

    let config = apply_env_overrides(base, lookup)?;
    validate_scoring_config(&config)?;
    Ok(config)
}

/// Overlay `SIR_*` environment variables onto `config`. Unset variables keep
/// the current value.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidEnvVar`] if a set variable is not a number.
pub fn apply_env_overrides<F>(mut config: ScoringConfig, lookup: F) -> Result<ScoringConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let parse_f64 = |var: &str, current: f64| -> Result<f64, ConfigError> {
        match lookup(var) {
            Ok(raw) => raw
                .trim()
                .parse::<f64>()
                .map_err(|e| ConfigError::InvalidEnvVar {
                    var: var.to_string(),
                    reason: e.to_string(),
                }),
            Err(_) => Ok(current),
        }
    };

    let w = &mut config.weights;
    w.presenca = parse_f64("SIR_W_PRESENCA", w.presenca)?;
    w.popularidade = parse_f64("SIR_W_POP", w.popularidade)?;
    w.atividade = parse_f64("SIR_W_ATIV", w.atividade)?;
    w.engajamento = parse_f64("SIR_W_ENG", w.engajamento)?;
    w.difusao = parse_f64("SIR_W_DIF", w.difusao)?;

    let n = &mut config.normalization;
    n.floor = parse_f64("SIR_FLOOR", n.floor)?;
    n.cap_min = parse_f64("SIR_CAP_MIN", n.cap_min)?;
    n.dominance_factor = parse_f64("SIR_DOMINANCE_FACTOR", n.dominance_factor)?;

    Ok(config)
}

/// Check the invariants the engine relies on.
///
/// # Errors
///
/// Returns [`ConfigError::Validation`] describing the first violated rule.
pub fn validate_scoring_config(config: &ScoringConfig) -> Result<(), ConfigError> {
    let w = &config.weights;
    for (label, value) in [
        ("presenca", w.presenca),
        ("popularidade", w.popularidade),
        ("atividade", w.atividade),
        ("engajamento", w.engajamento),
        ("difusao", w.difusao),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(ConfigError::Validation(format!(
                "weight '{label}' must be a finite non-negative number, got {value}"
            )));
        }
    }

    let n = &config.normalization;
    if !n.floor.is_finite() || n.floor < 0.0 {
        return Err(ConfigError::Validation(format!(
            "floor must be a finite non-negative number, got {}",
            n.floor
        )));
    }
    if !n.cap_min.is_finite() || n.cap_min < n.floor || n.cap_min > 100.0 {
        return Err(ConfigError::Validation(format!(
            "cap_min must lie in [floor, 100] (floor = {}), got {}",
            n.floor, n.cap_min
        )));
    }
    if !n.dominance_factor.is_finite() || n.dominance_factor < 1.0 {
        return Err(ConfigError::Validation(format!(
            "dominance_factor must be at least 1, got {}",
            n.dominance_factor
        )));
    }

    if let Some((platform, value)) = Platform::ALL
        .iter()
        .map(|p| (*p, config.platform_weights.get(*p)))
        .find(|(_, v)| !v.is_finite())
    {
        return Err(ConfigError::Validation(format!(
            "platform weight '{platform}' must be finite, got {value}"
        )));
    }

    Ok(())
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
