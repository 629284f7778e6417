use crate::errors::WmResult;
use crate::window_system::ShutdownRequest;
use nix::libc::{SIGHUP, c_int};
use nix::sys::signal::{SaFlags, SigAction, SigHandler, SigSet, Signal, sigaction};
use std::sync::atomic::{AtomicU8, Ordering};

const NONE: u8 = 0;
const QUIT: u8 = 1;
const RESTART: u8 = 2;

static PENDING: AtomicU8 = AtomicU8::new(NONE);

extern "C" fn on_signal(signal: c_int) {
    let request = if signal == SIGHUP { RESTART } else { QUIT };
    PENDING.store(request, Ordering::SeqCst);
}

/// SIGHUP restarts and SIGTERM quits, both through the normal shutdown path
/// of the event loop.
pub fn install() -> WmResult<()> {
    let action = SigAction::new(
        SigHandler::Handler(on_signal),
        SaFlags::SA_RESTART,
        SigSet::empty(),
    );
    for signal in [Signal::SIGHUP, Signal::SIGTERM] {
        // SAFETY: the handler only stores to an atomic.
        unsafe { sigaction(signal, &action) }.map_err(std::io::Error::from)?;
    }
    Ok(())
}

pub fn take_request() -> Option<ShutdownRequest> {
    match PENDING.swap(NONE, Ordering::SeqCst) {
        QUIT => Some(ShutdownRequest::Quit),
        RESTART => Some(ShutdownRequest::Restart),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nix::sys::signal::raise;

    #[test]
    fn test_signals_become_shutdown_requests() {
        install().unwrap();
        assert_eq!(take_request(), None);

        raise(Signal::SIGHUP).unwrap();
        assert_eq!(take_request(), Some(ShutdownRequest::Restart));
        assert_eq!(take_request(), None);

        raise(Signal::SIGTERM).unwrap();
        assert_eq!(take_request(), Some(ShutdownRequest::Quit));
    }
}
