use std::io::BufRead;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

const QUIT_COMMAND: &str = "q";

/// Reads lines from `input` until one equals `q` (surrounding whitespace
/// ignored), then raises `cancelled`.
///
/// Returns `true` if a quit was requested, `false` on end of input or a
/// read error.
pub fn watch_for_quit<R: BufRead>(input: R, cancelled: &AtomicBool) -> bool {
    for line in input.lines() {
        match line {
            Ok(line) if line.trim().eq_ignore_ascii_case(QUIT_COMMAND) => {
                cancelled.store(true, Ordering::SeqCst);
                return true;
            }
            Ok(_) => {}
            Err(e) => {
                log::debug!("Stopped listening for quit: {e}");
                return false;
            }
        }
    }
    false
}

/// Watches stdin on a background thread and raises `cancelled` when the
/// user types `q` followed by Enter.
///
/// The thread blocks on stdin and is never joined; it ends with the process.
pub fn spawn_quit_listener(cancelled: Arc<AtomicBool>) -> std::io::Result<JoinHandle<()>> {
    std::thread::Builder::new()
        .name("quit-listener".to_string())
        .spawn(move || {
            let stdin = std::io::stdin();
            if watch_for_quit(stdin.lock(), &cancelled) {
                log::info!("Quit requested; finishing the current frame");
            }
        })
}
