//! Keeps collaborator chatter off stdout.
//!
//! PDF interpreters and the OCR runtime may print to the process streams.
//! Their calls run inside [`suppress_output`], which points fd 1 (and fd 2
//! unless asked to keep it) at `/dev/null` for the duration of the call.
//! Results are written through [`stdout`], a duplicate of the original
//! descriptor taken at startup, so an envelope still reaches the terminal when
//! a timed-out worker is left holding the redirect.

use std::io::{self, Write};

#[cfg(unix)]
mod imp {
    use std::fs::{File, OpenOptions};
    use std::io;
    use std::os::unix::io::{AsRawFd, FromRawFd, RawFd};
    use std::sync::OnceLock;

    use tracing::debug;

    static ORIGINAL_STDOUT: OnceLock<RawFd> = OnceLock::new();

    pub fn preserve_stdout() {
        ORIGINAL_STDOUT.get_or_init(|| unsafe { libc::dup(libc::STDOUT_FILENO) });
    }

    pub fn original_stdout() -> Option<File> {
        let fd = *ORIGINAL_STDOUT.get()?;
        if fd < 0 {
            return None;
        }
        let copy = unsafe { libc::dup(fd) };
        (copy >= 0).then(|| unsafe { File::from_raw_fd(copy) })
    }

    /// Redirects descriptors to `/dev/null` until dropped.
    pub struct Redirect {
        saved: Vec<(RawFd, RawFd)>,
    }

    impl Redirect {
        pub fn new(keep_stderr: bool) -> io::Result<Self> {
            let null = OpenOptions::new().write(true).open("/dev/null")?;

            let mut targets = vec![libc::STDOUT_FILENO];
            if !keep_stderr {
                targets.push(libc::STDERR_FILENO);
            }

            let mut redirect = Self { saved: Vec::new() };
            for fd in targets {
                let saved = unsafe { libc::dup(fd) };
                if saved < 0 {
                    return Err(io::Error::last_os_error());
                }
                if unsafe { libc::dup2(null.as_raw_fd(), fd) } < 0 {
                    let err = io::Error::last_os_error();
                    unsafe { libc::close(saved) };
                    return Err(err);
                }
                redirect.saved.push((fd, saved));
            }
            Ok(redirect)
        }
    }

    impl Drop for Redirect {
        fn drop(&mut self) {
            for (fd, saved) in self.saved.drain(..).rev() {
                unsafe {
                    libc::dup2(saved, fd);
                    libc::close(saved);
                }
            }
            debug!("Restored output streams");
        }
    }
}

/// Remember the real stdout before any redirect happens.
pub fn preserve_stdout() {
    #[cfg(unix)]
    imp::preserve_stdout();
}

/// Writer for the process result.
#[cfg(unix)]
pub fn stdout() -> Box<dyn Write> {
    match imp::original_stdout() {
        Some(file) => Box::new(file),
        None => Box::new(io::stdout()),
    }
}

/// Writer for the process result.
#[cfg(not(unix))]
pub fn stdout() -> Box<dyn Write> {
    Box::new(io::stdout())
}

/// Run `f` with stdout (and stderr unless `keep_stderr`) discarded.
#[cfg(unix)]
pub fn suppress_output<T>(keep_stderr: bool, f: impl FnOnce() -> T) -> T {
    let _ = io::stdout().flush();
    let _ = io::stderr().flush();

    let guard = match imp::Redirect::new(keep_stderr) {
        Ok(guard) => Some(guard),
        Err(e) => {
            tracing::warn!("Could not redirect output: {}", e);
            None
        }
    };

    let result = f();

    let _ = io::stdout().flush();
    drop(guard);
    result
}

/// Run `f`; stream redirection is only available on Unix.
#[cfg(not(unix))]
pub fn suppress_output<T>(_keep_stderr: bool, f: impl FnOnce() -> T) -> T {
    f()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suppress_output_returns_value() {
        let value = suppress_output(true, || {
            println!("discarded");
            7
        });
        assert_eq!(value, 7);
    }
}
