//! Interruption signals.
//!
//! The handler only records that a signal arrived. The game loop and the
//! supervisor check the flag between steps and do all cleanup themselves.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};

static INTERRUPTED: AtomicBool = AtomicBool::new(false);

extern "C" fn record(_signal: libc::c_int) {
    INTERRUPTED.store(true, Ordering::SeqCst);
}

/// Route `SIGINT`, `SIGTERM` and `SIGHUP` to the process-wide flag.
pub fn install() -> io::Result<()> {
    for sig in [libc::SIGINT, libc::SIGTERM, libc::SIGHUP] {
        let previous = unsafe { libc::signal(sig, record as libc::sighandler_t) };
        if previous == libc::SIG_ERR {
            return Err(io::Error::last_os_error());
        }
    }
    Ok(())
}

/// The flag set by the installed handlers.
pub fn flag() -> &'static AtomicBool {
    &INTERRUPTED
}

/// Clear the flag and report whether it was set.
pub fn take(flag: &AtomicBool) -> bool {
    flag.swap(false, Ordering::SeqCst)
}

pub fn is_set(flag: &AtomicBool) -> bool {
    flag.load(Ordering::SeqCst)
}
