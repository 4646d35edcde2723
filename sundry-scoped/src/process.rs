//! Running external programs without a console.

use std::ffi::OsStr;
use std::io;
use std::path::Path;
use std::process::{Child, Command, Stdio};

use tracing::debug;

fn command<I, S>(program: &str, args: I, working_dir: Option<&Path>) -> Command
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut cmd = Command::new(program);
    cmd.args(args).stdin(Stdio::null());
    if let Some(dir) = working_dir {
        cmd.current_dir(dir);
    }
    cmd
}

/// Start `program` in `working_dir` (the current directory when `None`).
///
/// Output is discarded. With `wait` the call blocks until the process exits;
/// otherwise the running child is returned to the caller.
pub fn run_in_background<I, S>(
    program: &str,
    args: I,
    working_dir: Option<&Path>,
    wait: bool,
) -> io::Result<Child>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut child = command(program, args, working_dir)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;
    debug!(program, pid = child.id(), "Started background process");

    if wait {
        let status = child.wait()?;
        debug!(program, %status, "Background process exited");
    }
    Ok(child)
}

/// Run `program` to completion and return what it wrote to stdout.
///
/// Invalid UTF-8 is replaced. A non-zero exit status is logged, not
/// returned as an error.
pub fn run_for_stdout<I, S>(program: &str, args: I, working_dir: Option<&Path>) -> io::Result<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let output = command(program, args, working_dir)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()?;
    if !output.status.success() {
        debug!(
            program,
            status = %output.status,
            stderr = %String::from_utf8_lossy(&output.stderr).trim_end(),
            "Process exited unsuccessfully"
        );
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
