use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Run the CLI with an isolated HOME and the given API URL.
pub fn run_cli_with_env(args: &[&str], home: &Path, api_url: Option<&str>) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_ward"));
    cmd.args(args);
    cmd.env("HOME", home);
    cmd.env("XDG_DATA_HOME", home.join("data"));
    cmd.env("NO_COLOR", "1");
    cmd.env_remove("RUST_LOG");
    match api_url {
        Some(url) => cmd.env("WARD_API_URL", url),
        None => cmd.env_remove("WARD_API_URL"),
    };
    cmd.output().expect("Failed to execute CLI")
}

/// Run the CLI off the async runtime, so a mock server on the same test can answer.
pub async fn run_cli_async(args: &[&str], home: &Path, api_url: Option<&str>) -> Output {
    let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
    let home: PathBuf = home.to_path_buf();
    let api_url = api_url.map(str::to_string);
    tokio::task::spawn_blocking(move || {
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        run_cli_with_env(&args, &home, api_url.as_deref())
    })
    .await
    .expect("CLI task panicked")
}

/// Assert success and return stdout.
pub fn expect_success(output: Output) -> String {
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        panic!("CLI command failed\nstderr: {}", stderr);
    }
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Assert failure and return stderr.
pub fn expect_failure(output: Output) -> String {
    if output.status.success() {
        let stdout = String::from_utf8_lossy(&output.stdout);
        panic!("CLI command should have failed\nstdout: {}", stdout);
    }
    String::from_utf8_lossy(&output.stderr).to_string()
}

/// Value printed for `label` by `ward session show`.
pub fn shown_field(stdout: &str, label: &str) -> Option<String> {
    stdout.lines().find_map(|line| {
        line.strip_prefix(label)
            .and_then(|rest| rest.strip_prefix(':'))
            .map(|value| value.trim().to_string())
    })
}
