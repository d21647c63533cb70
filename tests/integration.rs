use std::{env, fs, path::PathBuf, process::Command};

fn run_bin(args: &[&str]) -> std::process::Output {
    let bin = PathBuf::from(env!("CARGO_BIN_EXE_formica"));

    Command::new(bin)
        .args(args)
        .output()
        .expect("failed to execute command")
}

fn assert_success(args: &[&str]) {
    let output = run_bin(args);

    let stdout_str =
        std::str::from_utf8(&output.stdout).expect("failed to convert stdout to string");
    let stderr_str =
        std::str::from_utf8(&output.stderr).expect("failed to convert stderr to string");

    assert!(
        output.status.success(),
        "failed to run binary with {args:?}\nstdout:\n{stdout_str}\nstderr:\n{stderr_str}\n"
    );
}

#[test]
fn basic_workflow() {
    let test_dir = PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join("basic_workflow");

    fs::remove_dir_all(&test_dir).ok();
    fs::create_dir(&test_dir).expect("failed to create test directory");

    let config_path = test_dir.join("config.toml");
    let config_contents = String::new()
        + "seed = 42\n"
        + "\n"
        + "[world]\n"
        + "width = 400.0\n"
        + "height = 300.0\n"
        + "\n"
        + "[colony]\n"
        + "n_agt = 20\n"
        + "\n"
        + "[food]\n"
        + "n_food = 8\n"
        + "amount = 10\n";

    fs::write(&config_path, config_contents).expect("failed to write config file");

    let config_str = config_path
        .to_str()
        .expect("failed to convert config path to string");
    let report_path = test_dir.join("report.json");
    let report_str = report_path
        .to_str()
        .expect("failed to convert report path to string");

    assert_success(&["--config", config_str, "check"]);
    assert_success(&["--config", config_str, "run", "--ticks", "500"]);
    assert_success(&[
        "--config", config_str, "--seed", "7", "run", "--ticks", "200", "--report", report_str,
    ]);
    assert_success(&["run", "--ticks", "50"]);

    let report = fs::read_to_string(&report_path).expect("failed to read report");
    let report: serde_json::Value = serde_json::from_str(&report).expect("failed to parse report");
    assert_eq!(report["n_ticks"], 200);
    assert_eq!(report["observables"].as_array().map(Vec::len), Some(3));

    fs::remove_dir_all(&test_dir).ok();
}

#[test]
fn invalid_config_fails() {
    let test_dir = PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join("invalid_config_fails");

    fs::remove_dir_all(&test_dir).ok();
    fs::create_dir(&test_dir).expect("failed to create test directory");

    let config_path = test_dir.join("config.toml");
    fs::write(&config_path, "[world]\nwidth = 0.0\n").expect("failed to write config file");
    let config_str = config_path
        .to_str()
        .expect("failed to convert config path to string");

    assert!(!run_bin(&["--config", config_str, "check"]).status.success());
    assert!(!run_bin(&["--config", config_str, "run"]).status.success());

    fs::remove_dir_all(&test_dir).ok();
}
