//! External command execution.
//!
//! Commands are always run from an argv list, never through a shell, so
//! interpolated values (emails, passwords, file names) cannot be
//! reinterpreted.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use crate::error::{Result, VulcanError};
use crate::secrets::OutputMasker;

/// Where a child's stdin comes from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StdinSource {
    /// Inherit the terminal.
    #[default]
    Inherit,
    /// Closed stdin.
    Null,
    /// Read from a file.
    File(PathBuf),
    /// Feed fixed bytes, then close.
    Bytes(Vec<u8>),
}

/// Where a child's stdout goes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StdoutTarget {
    /// Pass through to the terminal.
    #[default]
    Inherit,
    /// Collect into [`CommandResult::stdout`].
    Capture,
    /// Write to a file created with mode 0600.
    File(PathBuf),
}

/// An external command to run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
    /// Extra variables, merged over the inherited environment.
    pub env: BTreeMap<String, String>,
    pub stdin: StdinSource,
    pub stdout: StdoutTarget,
    /// Capture stderr instead of passing it through.
    pub capture_stderr: bool,
    /// Kill the child after this long.
    pub timeout: Option<Duration>,
    /// Values hidden from [`CommandSpec::display`], and so from logs and
    /// error messages.
    pub redact: OutputMasker,
}

impl CommandSpec {
    pub fn new<I, S>(program: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.to_string(),
            args: args.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn cwd(mut self, dir: &Path) -> Self {
        self.cwd = Some(dir.to_path_buf());
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    pub fn envs(mut self, vars: impl IntoIterator<Item = (String, String)>) -> Self {
        self.env.extend(vars);
        self
    }

    pub fn stdin(mut self, source: StdinSource) -> Self {
        self.stdin = source;
        self
    }

    /// Capture stdout and stderr.
    pub fn capture(mut self) -> Self {
        self.stdout = StdoutTarget::Capture;
        self.capture_stderr = true;
        self
    }

    pub fn stdout_to(mut self, path: &Path) -> Self {
        self.stdout = StdoutTarget::File(path.to_path_buf());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Hide `value` wherever it appears in the displayed command line.
    pub fn redacting(mut self, value: impl Into<String>) -> Self {
        self.redact.add_secret(value);
        self
    }

    /// Space-joined argv, unredacted.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Command line for display and logs, with redacted values masked.
    pub fn display(&self) -> String {
        self.redact.mask(&self.command_line())
    }
}

/// Result of running a command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandResult {
    /// Exit code (None if killed by signal or timeout).
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    pub duration: Duration,
    pub success: bool,
    pub timed_out: bool,
}

impl CommandResult {
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            exit_code: Some(0),
            stdout: stdout.into(),
            success: true,
            ..Default::default()
        }
    }

    pub fn failure(exit_code: Option<i32>, stderr: impl Into<String>) -> Self {
        Self {
            exit_code,
            stderr: stderr.into(),
            ..Default::default()
        }
    }

    /// Turn a non-zero exit into [`VulcanError::CommandFailed`].
    pub fn check(self, spec: &CommandSpec) -> Result<Self> {
        if self.success {
            Ok(self)
        } else {
            Err(VulcanError::CommandFailed {
                command: spec.display(),
                code: self.exit_code,
            })
        }
    }
}

#[cfg(unix)]
fn create_private_file(path: &Path) -> std::io::Result<File> {
    use std::os::unix::fs::OpenOptionsExt;
    std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)
}

#[cfg(not(unix))]
fn create_private_file(path: &Path) -> std::io::Result<File> {
    File::create(path)
}

fn spawn_failed(spec: &CommandSpec, e: std::io::Error) -> VulcanError {
    if e.kind() == std::io::ErrorKind::NotFound {
        VulcanError::not_found(format!("{} is not installed or not in PATH", spec.program))
    } else {
        VulcanError::Io(e)
    }
}

fn read_pipe<R: Read + Send + 'static>(pipe: Option<R>) -> Option<thread::JoinHandle<String>> {
    pipe.map(|mut p| {
        thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = p.read_to_end(&mut buf);
            String::from_utf8_lossy(&buf).into_owned()
        })
    })
}

fn wait_with_timeout(child: &mut Child, timeout: Option<Duration>) -> Result<(Option<i32>, bool, bool)> {
    let Some(timeout) = timeout else {
        let status = child.wait()?;
        return Ok((status.code(), status.success(), false));
    };

    let deadline = Instant::now() + timeout;
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok((status.code(), status.success(), false));
        }
        if Instant::now() >= deadline {
            let _ = child.kill();
            let _ = child.wait();
            return Ok((None, false, true));
        }
        thread::sleep(Duration::from_millis(20));
    }
}

/// Run `spec` and wait for it to finish.
///
/// A non-zero exit is a successful call with `success == false`; only a
/// failure to start the program is an error.
pub fn execute(spec: &CommandSpec) -> Result<CommandResult> {
    let start = Instant::now();
    tracing::debug!("Running: {}", spec.display());

    let mut cmd = Command::new(&spec.program);
    cmd.args(&spec.args);
    if let Some(cwd) = &spec.cwd {
        cmd.current_dir(cwd);
    }
    for (key, value) in &spec.env {
        cmd.env(key, value);
    }

    match &spec.stdin {
        StdinSource::Inherit => cmd.stdin(Stdio::inherit()),
        StdinSource::Null => cmd.stdin(Stdio::null()),
        StdinSource::File(path) => cmd.stdin(Stdio::from(File::open(path)?)),
        StdinSource::Bytes(_) => cmd.stdin(Stdio::piped()),
    };
    match &spec.stdout {
        StdoutTarget::Inherit => cmd.stdout(Stdio::inherit()),
        StdoutTarget::Capture => cmd.stdout(Stdio::piped()),
        StdoutTarget::File(path) => cmd.stdout(Stdio::from(create_private_file(path)?)),
    };
    if spec.capture_stderr {
        cmd.stderr(Stdio::piped());
    } else {
        cmd.stderr(Stdio::inherit());
    }

    let mut child = cmd.spawn().map_err(|e| spawn_failed(spec, e))?;

    let writer = match (&spec.stdin, child.stdin.take()) {
        (StdinSource::Bytes(bytes), Some(mut stdin)) => {
            let bytes = bytes.clone();
            Some(thread::spawn(move || {
                let _ = stdin.write_all(&bytes);
            }))
        }
        _ => None,
    };
    let stdout_reader = read_pipe(child.stdout.take());
    let stderr_reader = read_pipe(child.stderr.take());

    let (exit_code, success, timed_out) = wait_with_timeout(&mut child, spec.timeout)?;

    if let Some(handle) = writer {
        let _ = handle.join();
    }
    let stdout = stdout_reader
        .and_then(|h| h.join().ok())
        .unwrap_or_default();
    let stderr = stderr_reader
        .and_then(|h| h.join().ok())
        .unwrap_or_default();

    if timed_out {
        tracing::debug!("Timed out after {:?}: {}", spec.timeout, spec.display());
    }

    Ok(CommandResult {
        exit_code,
        stdout,
        stderr,
        duration: start.elapsed(),
        success,
        timed_out,
    })
}

/// Seam between commands and the processes they start.
pub trait Runner {
    fn run(&self, spec: &CommandSpec) -> Result<CommandResult>;

    /// Run and require a zero exit.
    fn run_checked(&self, spec: &CommandSpec) -> Result<CommandResult> {
        self.run(spec)?.check(spec)
    }

    /// True if the command starts and exits zero. Output is discarded.
    fn succeeds(&self, spec: &CommandSpec) -> bool {
        let quiet = spec.clone().capture().stdin(StdinSource::Null);
        self.run(&quiet).map(|r| r.success).unwrap_or(false)
    }
}

/// Runs real processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl Runner for SystemRunner {
    fn run(&self, spec: &CommandSpec) -> Result<CommandResult> {
        execute(spec)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sh(script: &str) -> CommandSpec {
        CommandSpec::new("sh", ["-c", script])
    }

    #[test]
    fn captures_stdout() {
        let result = execute(&sh("echo hello").capture()).unwrap();
        assert!(result.success);
        assert_eq!(result.exit_code, Some(0));
        assert_eq!(result.stdout.trim(), "hello");
    }

    #[test]
    fn nonzero_exit_is_not_an_error() {
        let result = execute(&sh("echo oops >&2; exit 3").capture()).unwrap();
        assert!(!result.success);
        assert_eq!(result.exit_code, Some(3));
        assert!(result.stderr.contains("oops"));
    }

    #[test]
    fn check_converts_failure() {
        let spec = sh("exit 2").capture();
        let err = execute(&spec).unwrap().check(&spec).unwrap_err();
        assert!(matches!(err, VulcanError::CommandFailed { code: Some(2), .. }));
    }

    #[test]
    fn missing_program_is_not_found() {
        let spec = CommandSpec::new("vulcan-definitely-missing-binary", Vec::<String>::new());
        assert!(matches!(execute(&spec), Err(VulcanError::NotFound { .. })));
    }

    #[test]
    fn arguments_are_not_shell_interpreted() {
        let spec = CommandSpec::new("echo", ["$HOME;", "it's"]).capture();
        assert_eq!(execute(&spec).unwrap().stdout.trim(), "$HOME; it's");
    }

    #[test]
    fn env_and_cwd_are_applied() {
        let temp = TempDir::new().unwrap();
        let spec = sh("echo $GREETING; pwd")
            .env("GREETING", "hi")
            .cwd(temp.path())
            .capture();
        let out = execute(&spec).unwrap().stdout;
        assert!(out.starts_with("hi\n"));
        assert!(out.trim_end().ends_with(temp.path().file_name().unwrap().to_str().unwrap()));
    }

    #[test]
    fn stdin_bytes_are_fed() {
        let spec = CommandSpec::new("cat", Vec::<String>::new())
            .stdin(StdinSource::Bytes(b"piped".to_vec()))
            .capture();
        assert_eq!(execute(&spec).unwrap().stdout, "piped");
    }

    #[test]
    fn stdin_from_file() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("dump.sql");
        std::fs::write(&input, "SELECT 1;").unwrap();
        let spec = CommandSpec::new("cat", Vec::<String>::new())
            .stdin(StdinSource::File(input))
            .capture();
        assert_eq!(execute(&spec).unwrap().stdout, "SELECT 1;");
    }

    #[test]
    fn stdout_to_file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let out = temp.path().join("backup.sql");
        let result = execute(&sh("echo dump").stdout_to(&out)).unwrap();

        assert!(result.success);
        assert_eq!(std::fs::read_to_string(&out).unwrap(), "dump\n");
        let mode = std::fs::metadata(&out).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o600);
    }

    #[test]
    fn timeout_kills_child() {
        let spec = CommandSpec::new("sleep", ["5"])
            .capture()
            .timeout(Duration::from_millis(100));
        let result = execute(&spec).unwrap();
        assert!(result.timed_out);
        assert!(!result.success);
        assert!(result.duration < Duration::from_secs(4));
    }

    #[test]
    fn display_joins_argv() {
        let spec = CommandSpec::new("docker", ["compose", "logs"]).arg("--tail").arg("100");
        assert_eq!(spec.display(), "docker compose logs --tail 100");
    }

    #[test]
    fn redacted_values_stay_out_of_display_and_errors() {
        let spec = CommandSpec::new("bin/rails", ["runner", "user.password = 'Sup3r-Secret!Pw'"])
            .redacting("user.password = 'Sup3r-Secret!Pw'");
        assert_eq!(spec.display(), "bin/rails runner [REDACTED]");
        assert!(spec.command_line().contains("Sup3r-Secret!Pw"));

        let err = CommandResult::failure(Some(1), "").check(&spec).unwrap_err();
        assert!(!err.to_string().contains("Sup3r"));
    }

    #[test]
    fn system_runner_succeeds_helper() {
        assert!(SystemRunner.succeeds(&sh("true")));
        assert!(!SystemRunner.succeeds(&sh("false")));
    }
}
