//! Owns the single running game process.

use std::process::{Child, Command, ExitStatus};
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use tracing::{debug, info, warn};
use wait_timeout::ChildExt;

use crate::error::{ArcadeError, Result};
use crate::launcher::menu::Entry;
use crate::signals;

/// How a game process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildExit {
    Exited(ExitStatus),
    /// An interruption arrived; the game was killed and reaped.
    Interrupted,
}

impl ChildExit {
    pub fn describe(&self, name: &str) -> String {
        use std::os::unix::process::ExitStatusExt;

        match self {
            ChildExit::Interrupted => "Game interrupted. Returning to main menu...".to_string(),
            ChildExit::Exited(status) if status.success() => format!("{name} finished."),
            ChildExit::Exited(status) => match (status.code(), status.signal()) {
                (Some(code), _) => format!("{name} exited with status {code}."),
                (None, Some(sig)) => format!("{name} was killed by signal {sig}."),
                _ => format!("{name} ended abnormally."),
            },
        }
    }
}

/// How long a game gets to clean up after `SIGTERM` before it is killed.
const STOP_GRACE: Duration = Duration::from_millis(500);

/// A spawned game. Dropping it kills and reaps the process if it is still
/// alive, so no path leaves a zombie behind.
struct RunningChild {
    child: Child,
    name: String,
}

impl RunningChild {
    fn pid(&self) -> u32 {
        self.child.id()
    }

    /// `SIGTERM` first so the game can leave raw mode itself, then `SIGKILL`.
    fn kill_and_reap(&mut self) -> std::io::Result<ExitStatus> {
        if let Some(status) = self.child.try_wait()? {
            return Ok(status);
        }
        if unsafe { libc::kill(self.pid() as libc::pid_t, libc::SIGTERM) } == 0 {
            if let Some(status) = self.child.wait_timeout(STOP_GRACE)? {
                return Ok(status);
            }
        }
        self.child.kill()?;
        self.child.wait()
    }
}

impl Drop for RunningChild {
    fn drop(&mut self) {
        if let Err(e) = self.kill_and_reap() {
            warn!(pid = self.pid(), err = %e, "failed to reap game process");
        }
    }
}

/// `Browsing` when idle, `Running` while a game process is owned.
pub struct Supervisor {
    running: Option<RunningChild>,
    poll: Duration,
}

impl Supervisor {
    /// `poll` bounds how long an interruption can go unnoticed while waiting.
    pub fn new(poll: Duration) -> Self {
        Self {
            running: None,
            poll,
        }
    }

    pub fn is_browsing(&self) -> bool {
        self.running.is_none()
    }

    pub fn child_id(&self) -> Option<u32> {
        self.running.as_ref().map(RunningChild::pid)
    }

    /// Start `entry` with no arguments on the inherited terminal.
    pub fn launch(&mut self, entry: &Entry) -> Result<()> {
        self.launch_command(&entry.display_name, Command::new(&entry.path))
    }

    pub fn launch_command(&mut self, name: &str, mut command: Command) -> Result<()> {
        if let Some(running) = &self.running {
            return Err(ArcadeError::AlreadyRunning {
                pid: running.pid(),
            });
        }
        let child = command.spawn().map_err(|source| ArcadeError::Spawn {
            path: command.get_program().into(),
            source,
        })?;
        info!(game = name, pid = child.id(), "game started");
        self.running = Some(RunningChild {
            child,
            name: name.to_string(),
        });
        Ok(())
    }

    /// Block until the running game ends or `interrupt` is raised.
    ///
    /// Returns `None` when no game is running. Either way the supervisor is
    /// back to browsing with no child process when this returns.
    pub fn wait(&mut self, interrupt: &AtomicBool) -> Result<Option<ChildExit>> {
        // Dropping `running` on any early return still kills and reaps.
        let Some(mut running) = self.running.take() else {
            return Ok(None);
        };
        let pid = running.pid();

        let outcome = loop {
            if signals::take(interrupt) {
                warn!(game = %running.name, pid, "interrupted, stopping game");
                running
                    .kill_and_reap()
                    .map_err(|source| ArcadeError::Wait { pid, source })?;
                break ChildExit::Interrupted;
            }
            match running.child.wait_timeout(self.poll) {
                Ok(Some(status)) => {
                    // The terminal's Ctrl+C reaches both processes; the game
                    // may win the race but the signal still meant "cancel".
                    if signals::take(interrupt) {
                        break ChildExit::Interrupted;
                    }
                    break ChildExit::Exited(status);
                }
                Ok(None) => continue,
                Err(source) => return Err(ArcadeError::Wait { pid, source }),
            }
        };

        debug!(pid, ?outcome, "game ended");
        Ok(Some(outcome))
    }
}

/// Spawn errors that mean "this file cannot be run", as opposed to the
/// system being unable to create processes at all.
pub fn is_exec_failure(err: &ArcadeError) -> bool {
    match err {
        ArcadeError::Spawn { source, .. } => {
            matches!(
                source.kind(),
                std::io::ErrorKind::NotFound | std::io::ErrorKind::PermissionDenied
            ) || source.raw_os_error() == Some(libc::ENOEXEC)
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::Instant;

    fn supervisor() -> Supervisor {
        Supervisor::new(Duration::from_millis(10))
    }

    fn sh(script: &str) -> Command {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(script);
        cmd
    }

    fn alive(pid: u32) -> bool {
        unsafe { libc::kill(pid as libc::pid_t, 0) == 0 }
    }

    #[test]
    fn normal_exit_returns_to_browsing() {
        let mut sup = supervisor();
        let flag = AtomicBool::new(false);
        sup.launch_command("ok", sh("exit 0")).expect("launch");
        assert!(!sup.is_browsing());

        let outcome = sup.wait(&flag).expect("wait").expect("child");
        match outcome {
            ChildExit::Exited(status) => assert!(status.success()),
            other => panic!("unexpected {other:?}"),
        }
        assert!(sup.is_browsing());
        assert_eq!(sup.child_id(), None);
    }

    #[test]
    fn failing_child_is_reported_not_fatal() {
        let mut sup = supervisor();
        let flag = AtomicBool::new(false);
        sup.launch_command("bad", sh("exit 3")).expect("launch");

        let outcome = sup.wait(&flag).expect("wait").expect("child");
        assert_eq!(outcome.describe("bad"), "bad exited with status 3.");
        assert!(sup.is_browsing());
    }

    #[test]
    fn interruption_kills_and_reaps_child() {
        let mut sup = supervisor();
        let flag = AtomicBool::new(false);
        sup.launch_command("sleepy", sh("exec sleep 30")).expect("launch");
        let pid = sup.child_id().expect("pid");
        assert!(alive(pid));

        flag.store(true, std::sync::atomic::Ordering::SeqCst);
        let started = Instant::now();
        let outcome = sup.wait(&flag).expect("wait").expect("child");

        assert_eq!(outcome, ChildExit::Interrupted);
        assert!(started.elapsed() < Duration::from_secs(5));
        assert!(sup.is_browsing());
        assert!(!signals::is_set(&flag));
        assert!(!alive(pid));
    }

    #[test]
    fn only_one_child_at_a_time() {
        let mut sup = supervisor();
        sup.launch_command("first", sh("exec sleep 30")).expect("launch");
        let err = sup.launch_command("second", sh("exit 0")).unwrap_err();
        assert!(matches!(err, ArcadeError::AlreadyRunning { .. }));
    }

    #[test]
    fn child_ignoring_sigterm_is_killed() {
        let mut sup = supervisor();
        let flag = AtomicBool::new(true);
        sup.launch_command("stubborn", sh("trap '' TERM; exec sleep 30"))
            .expect("launch");
        let pid = sup.child_id().expect("pid");

        let outcome = sup.wait(&flag).expect("wait").expect("child");
        assert_eq!(outcome, ChildExit::Interrupted);
        assert!(!alive(pid));
    }

    #[test]
    fn dropping_supervisor_reaps_running_child() {
        let mut sup = supervisor();
        sup.launch_command("sleepy", sh("exec sleep 30")).expect("launch");
        let pid = sup.child_id().expect("pid");
        drop(sup);
        assert!(!alive(pid));
    }

    #[test]
    fn wait_without_child_is_a_no_op() {
        let mut sup = supervisor();
        let flag = AtomicBool::new(false);
        assert_eq!(sup.wait(&flag).expect("wait"), None);
    }

    #[test]
    fn missing_binary_is_an_exec_failure() {
        let mut sup = supervisor();
        let entry = Entry {
            file_name: "game_missing".to_string(),
            display_name: "missing".to_string(),
            path: PathBuf::from("/nonexistent/game_missing"),
        };
        let err = sup.launch(&entry).unwrap_err();
        assert!(is_exec_failure(&err));
        assert!(sup.is_browsing());
    }
}
