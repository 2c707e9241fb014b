//! Spawner: process spawning for user commands, invoked through a
//! collaborator that double-forks to detach children. The trait lets
//! `command::spawn` stay testable without actually forking; `ForkSpawner`
//! is the real double-fork implementation.

use std::ffi::CString;

use libc::c_int;
use log::{debug, error, trace};

/// Launches a detached child process on behalf of a keybinding action.
pub trait Spawner {
    fn spawn(&self, argv: &[String]);
}

/// Double-forks so the grandchild is reparented to init/pid 1 and never
/// becomes a zombie the window manager has to reap directly; closes the
/// Display Surface's file descriptor and starts a new session before
/// `execvp`.
pub struct ForkSpawner {
    display_fd: c_int,
}

impl ForkSpawner {
    pub fn new(display_fd: c_int) -> Self {
        ForkSpawner { display_fd }
    }
}

impl Spawner for ForkSpawner {
    fn spawn(&self, argv: &[String]) {
        if argv.is_empty() {
            return;
        }
        trace!("spawn: {:?}", argv);

        let pid = unsafe { libc::fork() };
        match pid {
            -1 => {
                error!("spawn: fork failed for {:?}", argv);
            }
            0 => {
                // Child: fork again so the grandchild's parent becomes
                // init, then exit immediately so the first child never
                // lingers.
                let grandchild = unsafe { libc::fork() };
                match grandchild {
                    -1 => unsafe { libc::_exit(1) },
                    0 => {
                        unsafe {
                            libc::close(self.display_fd);
                            libc::setsid();
                        }
                        exec(argv);
                        unsafe { libc::_exit(1) };
                    }
                    _ => unsafe { libc::_exit(0) },
                }
            }
            child => {
                let mut status: c_int = 0;
                unsafe {
                    libc::waitpid(child, &mut status, 0);
                }
                debug!("spawn: reaped intermediate child {} status {}", child, status);
            }
        }
    }
}

fn exec(argv: &[String]) {
    let cargs: Vec<CString> = argv.iter().map(|a| CString::new(a.as_str()).unwrap()).collect();
    let mut raw: Vec<*const libc::c_char> = cargs.iter().map(|c| c.as_ptr()).collect();
    raw.push(std::ptr::null());
    unsafe {
        libc::execvp(cargs[0].as_ptr(), raw.as_ptr());
    }
}

/// Installs a re-installing SIGCHLD handler that reaps zombies with
/// WNOHANG. Restricted to `waitpid` and `signal`, both async-signal-safe.
pub fn install_sigchld_reaper() {
    unsafe {
        libc::signal(libc::SIGCHLD, reap_zombies as libc::sighandler_t);
    }
}

extern "C" fn reap_zombies(_sig: c_int) {
    unsafe {
        let mut status: c_int = 0;
        while libc::waitpid(-1, &mut status, libc::WNOHANG) > 0 {}
        libc::signal(libc::SIGCHLD, reap_zombies as libc::sighandler_t);
    }
}

#[cfg(test)]
pub struct RecordingSpawner {
    pub calls: std::cell::RefCell<Vec<Vec<String>>>,
}

#[cfg(test)]
impl RecordingSpawner {
    pub fn new() -> Self {
        RecordingSpawner { calls: std::cell::RefCell::new(Vec::new()) }
    }
}

#[cfg(test)]
impl Spawner for RecordingSpawner {
    fn spawn(&self, argv: &[String]) {
        self.calls.borrow_mut().push(argv.to_vec());
    }
}
