use assert_cmd::Command;
use serde_json::Value;
use std::ffi::OsStr;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;
use tempfile::TempDir;

#[derive(Debug)]
pub struct ItrRun {
    pub stdout: String,
    pub stderr: String,
    pub status: std::process::ExitStatus,
}

impl ItrRun {
    /// Parse stdout as one JSON document.
    pub fn json(&self) -> Value {
        serde_json::from_str(self.stdout.trim())
            .unwrap_or_else(|e| panic!("stdout is not JSON ({e}): {}", self.stdout))
    }
}

pub struct ItrWorkspace {
    _temp_dir: TempDir,
    pub root: PathBuf,
    log_dir: PathBuf,
}

impl ItrWorkspace {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("temp dir");
        let root = temp_dir.path().to_path_buf();
        let log_dir = root.join("logs");
        fs::create_dir_all(&log_dir).expect("log dir");
        Self {
            _temp_dir: temp_dir,
            root,
            log_dir,
        }
    }

    pub fn db_path(&self) -> PathBuf {
        self.root.join(".issue-tracker").join("issues.db")
    }
}

pub fn run_itr<I, S>(workspace: &ItrWorkspace, args: I, label: &str) -> ItrRun
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    run_itr_with_env(
        workspace,
        args,
        std::iter::empty::<(String, String)>(),
        label,
    )
}

pub fn run_itr_with_env<I, S, E, K, V>(
    workspace: &ItrWorkspace,
    args: I,
    env_vars: E,
    label: &str,
) -> ItrRun
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
    E: IntoIterator<Item = (K, V)>,
    K: AsRef<OsStr>,
    V: AsRef<OsStr>,
{
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("itr"));
    cmd.current_dir(&workspace.root);
    cmd.args(args);
    cmd.env_remove("ISSUE_TRACKER_BACKEND");
    cmd.env_remove("ISSUE_TRACKER_DB");
    cmd.envs(env_vars);
    cmd.env("RUST_LOG", "issue_tracker=debug");
    cmd.env("HOME", &workspace.root);

    let start = Instant::now();
    let output = cmd.output().expect("run itr");
    let duration = start.elapsed();

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    let log_body = format!(
        "label: {label}\nduration: {duration:?}\nstatus: {}\nargs: {:?}\n\nstdout:\n{stdout}\n\nstderr:\n{stderr}\n",
        output.status,
        cmd.get_args().collect::<Vec<_>>(),
    );
    fs::write(workspace.log_dir.join(format!("{label}.log")), log_body).expect("write log");

    ItrRun {
        stdout,
        stderr,
        status: output.status,
    }
}
