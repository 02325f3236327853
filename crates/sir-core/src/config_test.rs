use std::collections::HashMap;
use std::env::VarError;
use std::io::Write;

use super::*;
use crate::app_config::{DimensionWeights, NormalizationParams};

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

fn write_profile(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("temp profile");
    file.write_all(contents.as_bytes()).expect("write profile");
    file
}

#[test]
fn build_scoring_config_uses_defaults_with_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_scoring_config(None, lookup_from_map(&map)).unwrap();
    assert_eq!(cfg, ScoringConfig::default());
    assert_eq!(cfg.weights.engajamento, 28.0);
    assert_eq!(cfg.normalization.cap_min, 98.0);
}

#[test]
fn env_overrides_weights_and_normalization() {
    let mut map = HashMap::new();
    map.insert("SIR_W_PRESENCA", "0");
    map.insert("SIR_W_DIF", " 35.5 ");
    map.insert("SIR_DOMINANCE_FACTOR", "4");
    let cfg = build_scoring_config(None, lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.weights.presenca, 0.0);
    assert_eq!(cfg.weights.difusao, 35.5);
    assert_eq!(cfg.weights.popularidade, 24.0);
    assert_eq!(cfg.normalization.dominance_factor, 4.0);
}

#[test]
fn invalid_env_number_is_reported_with_var_name() {
    let mut map = HashMap::new();
    map.insert("SIR_CAP_MIN", "ninety");
    let result = build_scoring_config(None, lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "SIR_CAP_MIN"),
        "expected InvalidEnvVar(SIR_CAP_MIN), got: {result:?}"
    );
}

#[test]
fn negative_weight_fails_validation() {
    let mut map = HashMap::new();
    map.insert("SIR_W_ENG", "-1");
    let result = build_scoring_config(None, lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::Validation(ref msg)) if msg.contains("engajamento")),
        "expected Validation error, got: {result:?}"
    );
}

#[test]
fn cap_min_below_floor_fails_validation() {
    let config = ScoringConfig {
        normalization: NormalizationParams {
            floor: 10.0,
            cap_min: 5.0,
            dominance_factor: 10.0,
        },
        ..ScoringConfig::default()
    };
    assert!(matches!(
        validate_scoring_config(&config),
        Err(ConfigError::Validation(_))
    ));
}

#[test]
fn dominance_factor_below_one_fails_validation() {
    let config = ScoringConfig {
        normalization: NormalizationParams {
            dominance_factor: 0.5,
            ..NormalizationParams::default()
        },
        ..ScoringConfig::default()
    };
    assert!(matches!(
        validate_scoring_config(&config),
        Err(ConfigError::Validation(_))
    ));
}

#[test]
fn all_zero_weights_are_valid() {
    let config = ScoringConfig {
        weights: DimensionWeights {
            presenca: 0.0,
            popularidade: 0.0,
            atividade: 0.0,
            engajamento: 0.0,
            difusao: 0.0,
        },
        ..ScoringConfig::default()
    };
    assert!(validate_scoring_config(&config).is_ok());
}

#[test]
fn profile_fills_missing_fields_with_defaults() {
    let file = write_profile(
        "weights:\n  presenca: 50\n  difusao: 0\nnormalization:\n  piso_positivo: 2.5\n",
    );
    let cfg = load_scoring_profile(file.path()).unwrap();
    assert_eq!(cfg.weights.presenca, 50.0);
    assert_eq!(cfg.weights.difusao, 0.0);
    assert_eq!(cfg.weights.atividade, 16.0);
    assert_eq!(cfg.normalization.floor, 2.5);
    assert_eq!(cfg.normalization.cap_min, 98.0);
}

#[test]
fn env_overrides_take_precedence_over_profile() {
    let file = write_profile("weights:\n  popularidade: 40\n");
    let path = file.path().to_str().unwrap().to_string();
    let mut map = HashMap::new();
    map.insert("SIR_PROFILE_PATH", path.as_str());
    map.insert("SIR_W_POP", "10");
    let cfg = build_scoring_config(None, lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.weights.popularidade, 10.0);
}

#[test]
fn explicit_profile_wins_over_env_profile_path() {
    let explicit = write_profile("weights:\n  atividade: 3\n");
    let mut map = HashMap::new();
    map.insert("SIR_PROFILE_PATH", "/definitely/not/here.yaml");
    let cfg = build_scoring_config(Some(explicit.path()), lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.weights.atividade, 3.0);
}

#[test]
fn missing_profile_file_is_io_error() {
    let err = load_scoring_profile(Path::new("/definitely/not/here.yaml")).unwrap_err();
    assert!(matches!(err, ConfigError::ProfileIo { .. }));
}

#[test]
fn malformed_profile_is_parse_error() {
    let file = write_profile("weights: [1, 2, 3]\n");
    let err = load_scoring_profile(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::ProfileParse(_)));
}

#[test]
fn invalid_profile_values_fail_validation() {
    let file = write_profile("normalization:\n  cap_min: 120\n");
    let err = load_scoring_profile(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Validation(_)));
}
