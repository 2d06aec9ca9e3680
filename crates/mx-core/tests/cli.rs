//! End-to-end tests for the `mx` binary.
//!
//! Each test writes a description (and optionally a tunables file) into a
//! temporary directory and checks stdout payloads and exit codes.

use std::path::PathBuf;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

const GAMMA_PAIR: &str = r#"{
    "atoms": [
        {"distribution": {"family": "gamma", "shape": 3.0, "rate": 1.0}},
        {"distribution": {"family": "gamma", "shape": 3.0, "rate": 1.0}}
    ]
}"#;

fn mx() -> Command {
    let mut cmd = cargo_bin_cmd!("mx");
    cmd.env_remove("MX_CONFIG")
        .env_remove("MX_LOG")
        .env_remove("RUST_LOG")
        .env("XDG_CONFIG_HOME", "/nonexistent/mx-test-config");
    cmd
}

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("write fixture");
    path
}

fn stdout_json(cmd: &mut Command) -> Value {
    let output = cmd.output().expect("run mx");
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    serde_json::from_slice(&output.stdout).expect("stdout is JSON")
}

// ============================================================================
// Successful commands
// ============================================================================

mod commands {
    use super::*;

    #[test]
    fn describe_reports_moments() {
        let dir = TempDir::new().expect("temp dir");
        let desc = write(&dir, "pair.json", GAMMA_PAIR);
        let json = stdout_json(mx().arg("describe").arg(&desc));
        assert_eq!(json["command"], "describe");
        assert_eq!(json["results"]["mean"], 6.0);
        assert_eq!(json["results"]["variance"], 6.0);
        assert_eq!(json["results"]["atoms"].as_array().map(Vec::len), Some(2));
        assert_eq!(json["results"]["atoms"][0]["family"], "Gamma");
        assert_eq!(json["config_source"], "builtin default");
    }

    #[test]
    fn pdf_at_several_points() {
        let dir = TempDir::new().expect("temp dir");
        let desc = write(&dir, "pair.json", GAMMA_PAIR);
        let json = stdout_json(mx().arg("pdf").arg(&desc).args(["--at", "-1", "5"]));
        let results = json["results"].as_array().expect("results array");
        assert_eq!(results.len(), 2);
        assert_eq!(results[0]["value"], 0.0);
        // Gamma(6) density at 5
        let expected = 5f64.powi(5) * (-5f64).exp() / 120.0;
        let got = results[1]["value"].as_f64().expect("number");
        assert!((got - expected).abs() < 1e-8);
    }

    #[test]
    fn cdf_and_complement() {
        let dir = TempDir::new().expect("temp dir");
        let desc = write(&dir, "pair.json", GAMMA_PAIR);
        let lower = stdout_json(mx().arg("cdf").arg(&desc).args(["--at", "6"]));
        let upper = stdout_json(
            mx().arg("cdf")
                .arg(&desc)
                .args(["--at", "6", "--complementary"]),
        );
        assert_eq!(upper["command"], "ccdf");
        let a = lower["results"][0]["value"].as_f64().expect("number");
        let b = upper["results"][0]["value"].as_f64().expect("number");
        assert!((a + b - 1.0).abs() < 1e-8);
    }

    #[test]
    fn quantile_round_trip() {
        let dir = TempDir::new().expect("temp dir");
        let desc = write(&dir, "pair.json", GAMMA_PAIR);
        let json = stdout_json(mx().arg("quantile").arg(&desc).args(["--p", "0.5"]));
        let q = json["results"][0]["quantile"].as_f64().expect("number");
        let back = stdout_json(mx().arg("cdf").arg(&desc).args(["--at", &q.to_string()]));
        let p = back["results"][0]["value"].as_f64().expect("number");
        assert!((p - 0.5).abs() < 1e-8);
    }

    #[test]
    fn probability_of_interval() {
        let dir = TempDir::new().expect("temp dir");
        let desc = write(&dir, "pair.json", GAMMA_PAIR);
        let json = stdout_json(
            mx().arg("probability")
                .arg(&desc)
                .args(["--lower", "-10", "--upper", "1e6"]),
        );
        assert_eq!(json["results"]["value"], 1.0);
    }

    #[test]
    fn toml_description_and_text_output() {
        let dir = TempDir::new().expect("temp dir");
        let desc = write(
            &dir,
            "shifted.toml",
            r#"
            constant = 2.0

            [[atoms]]
            weight = 2.0
            distribution = { family = "uniform", lower = 0.0, upper = 1.0 }
            "#,
        );
        mx().args(["--format", "text", "pdf"])
            .arg(&desc)
            .args(["--at", "3"])
            .assert()
            .success()
            .stdout(predicate::str::starts_with("3\t0.5"));
    }
}

// ============================================================================
// Configuration
// ============================================================================

mod configuration {
    use super::*;

    #[test]
    fn explicit_config_is_used() {
        let dir = TempDir::new().expect("temp dir");
        let desc = write(&dir, "pair.json", GAMMA_PAIR);
        let config = write(&dir, "tunables.toml", "alpha = 3.0\nsmall_size = 2\n");
        let json = stdout_json(
            mx().arg("--config")
                .arg(&config)
                .arg("describe")
                .arg(&desc),
        );
        assert_eq!(json["config_source"], "CLI argument");
        assert_eq!(json["results"]["alpha"], 3.0);
        assert_eq!(json["results"]["large"], true);
    }

    #[test]
    fn environment_config_is_used() {
        let dir = TempDir::new().expect("temp dir");
        let desc = write(&dir, "pair.json", GAMMA_PAIR);
        let config = write(&dir, "tunables.json", r#"{"alpha": 4.0}"#);
        let json = stdout_json(mx().env("MX_CONFIG", &config).arg("describe").arg(&desc));
        assert_eq!(json["config_source"], "environment variable");
        assert_eq!(json["results"]["alpha"], 4.0);
    }

    #[test]
    fn invalid_config_is_an_argument_error() {
        let dir = TempDir::new().expect("temp dir");
        let desc = write(&dir, "pair.json", GAMMA_PAIR);
        let config = write(&dir, "bad.json", r#"{"alpha": -1.0}"#);
        mx().arg("--config")
            .arg(&config)
            .arg("describe")
            .arg(&desc)
            .assert()
            .code(10)
            .stderr(predicate::str::contains("ERR_ARGS"));
    }
}

// ============================================================================
// Errors
// ============================================================================

mod errors {
    use super::*;

    #[test]
    fn missing_description_file() {
        mx().args(["describe", "/nonexistent/mixture.json"])
            .assert()
            .code(10)
            .stderr(predicate::str::contains("I/O error"));
    }

    #[test]
    fn malformed_description() {
        let dir = TempDir::new().expect("temp dir");
        let desc = write(&dir, "bad.json", r#"{"atoms": [{"distribution": {"family": "cauchy"}}]}"#);
        mx().arg("describe")
            .arg(&desc)
            .assert()
            .code(10)
            .stderr(predicate::str::contains("JSON error"));
    }

    #[test]
    fn empty_mixture() {
        let dir = TempDir::new().expect("temp dir");
        let desc = write(&dir, "empty.json", r#"{"atoms": []}"#);
        mx().arg("describe")
            .arg(&desc)
            .assert()
            .code(10)
            .stderr(predicate::str::contains("at least one atom"));
    }

    #[test]
    fn probability_out_of_range() {
        let dir = TempDir::new().expect("temp dir");
        let desc = write(&dir, "pair.json", GAMMA_PAIR);
        mx().arg("quantile")
            .arg(&desc)
            .args(["--p", "1.5"])
            .assert()
            .code(10)
            .stdout(predicate::str::is_empty())
            .stderr(predicate::str::contains("probability must be in [0, 1]"));
    }

    #[test]
    fn unknown_subcommand() {
        mx().arg("nonexistent")
            .assert()
            .failure()
            .stderr(predicate::str::contains("error"));
    }
}
