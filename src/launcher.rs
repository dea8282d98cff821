use crate::PROGRAM;
use crate::command::Launch;
use crate::error::ShellError;
use crate::tokenizer::Args;
use log::debug;
use nix::errno::Errno;
use nix::libc;
use nix::sys::signal::{SigHandler, Signal, signal};
use nix::sys::wait::{WaitPidFlag, WaitStatus, waitpid};
use nix::unistd::{ForkResult, Pid, fork, write};
use std::ffi::{CString, c_char};
use std::os::fd::BorrowedFd;
use std::os::unix::ffi::OsStrExt;
use std::ptr;

/// How a launched program ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchOutcome {
    /// The program exited with the given status.
    Exited(i32),
    /// The program was terminated by a signal.
    Signaled(Signal),
}

/// Launches external programs by duplicating the interpreter and replacing the
/// child's image with the requested program.
///
/// The program is looked up in `PATH` by the loader, and it inherits the working
/// directory, environment and standard streams of the interpreter. Arguments are
/// passed byte for byte. `SIGPIPE`, which the Rust runtime ignores in the
/// interpreter, is restored to its default action in the child. When the program
/// cannot be executed the child prints a diagnostic and exits with status 1.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessLauncher;

impl Launch for ProcessLauncher {
    fn launch(&self, args: &Args<'_>) -> Result<LaunchOutcome, ShellError> {
        let name = args
            .command()
            .ok_or_else(|| ShellError::InvalidArgument(String::new()))?;
        let argv = args
            .iter()
            .map(|arg| CString::new(arg.as_bytes()))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| ShellError::InvalidArgument(name.to_string_lossy().into_owned()))?;

        // everything the child needs is built here, so it does not allocate after fork
        let mut argv_ptrs: Vec<*const c_char> = argv.iter().map(|arg| arg.as_ptr()).collect();
        argv_ptrs.push(ptr::null());
        let mut diagnostic = format!("{}: ", PROGRAM).into_bytes();
        diagnostic.extend_from_slice(name.as_bytes());
        diagnostic.extend_from_slice(b": ");

        // SAFETY: the child branch only calls sigaction, execvp, write and _exit.
        match unsafe { fork() } {
            Err(errno) => Err(ShellError::Fork(errno)),
            Ok(ForkResult::Child) => exec_child(&argv_ptrs, &diagnostic),
            Ok(ForkResult::Parent { child }) => {
                debug!("started {} as pid {}", name.to_string_lossy(), child);
                wait_for(child)
            }
        }
    }
}

/// Child side of a launch. `argv` is a null-terminated array pointing into
/// `CString`s the caller keeps alive.
fn exec_child(argv: &[*const c_char], diagnostic: &[u8]) -> ! {
    // SAFETY: resetting a disposition to SIG_DFL installs no handler.
    let _ = unsafe { signal(Signal::SIGPIPE, SigHandler::SigDfl) };

    // SAFETY: argv[0] and every following pointer up to the null are valid C strings.
    unsafe { libc::execvp(argv[0], argv.as_ptr()) };
    let errno = Errno::last();

    // SAFETY: descriptor 2 stays open for the lifetime of the child.
    let stderr = unsafe { BorrowedFd::borrow_raw(libc::STDERR_FILENO) };
    let _ = write(stderr, diagnostic);
    let _ = write(stderr, errno.desc().as_bytes());
    let _ = write(stderr, b"\n");

    // SAFETY: _exit skips the parent's atexit handlers and buffered output.
    unsafe { libc::_exit(1) }
}

/// Block until `child` has exited or was killed; stopped and continued states
/// are observed and waited through.
fn wait_for(child: Pid) -> Result<LaunchOutcome, ShellError> {
    loop {
        match waitpid(child, Some(WaitPidFlag::WUNTRACED)) {
            Ok(status) => match terminal_outcome(status) {
                Some(outcome) => return Ok(outcome),
                None => debug!("pid {} not finished yet: {:?}", child, status),
            },
            Err(Errno::EINTR) => continue,
            Err(errno) => return Err(ShellError::Wait(errno)),
        }
    }
}

fn terminal_outcome(status: WaitStatus) -> Option<LaunchOutcome> {
    match status {
        WaitStatus::Exited(_, code) => Some(LaunchOutcome::Exited(code)),
        WaitStatus::Signaled(_, signal, _) => Some(LaunchOutcome::Signaled(signal)),
        _ => None,
    }
}
