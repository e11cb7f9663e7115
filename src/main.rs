use std::io::{self, BufRead, Write};
use std::sync::mpsc::{channel, sync_channel};
use std::sync::Arc;
use std::thread;

use ironfin::context::EngineContext;
use ironfin::uci::uci_top::UciState;

/// Commands queued ahead of the dispatcher before stdin blocks.
const COMMAND_QUEUE_DEPTH: usize = 8;

fn main() -> io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Stderr)
        .init();

    let context = Arc::new(EngineContext::new());
    let (command_tx, command_rx) = sync_channel::<String>(COMMAND_QUEUE_DEPTH);
    let (response_tx, response_rx) = channel::<String>();

    // Stdin reader. Dropping `command_tx` on EOF ends the dispatcher.
    thread::Builder::new()
        .name("stdin".to_owned())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                if command_tx.send(line).is_err() {
                    break;
                }
            }
            log::debug!("stdin closed");
        })?;

    // Dispatcher. Owns the UCI state and its search worker; the response
    // channel closes once both are gone.
    let dispatcher = thread::Builder::new()
        .name("uci".to_owned())
        .spawn(move || {
            let mut uci = UciState::new(context, response_tx);
            for line in command_rx {
                if uci.handle_command(&line) {
                    break;
                }
            }
            uci.handle_command("stop");
        })?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for line in response_rx {
        writeln!(out, "{line}")?;
        out.flush()?;
    }

    if dispatcher.join().is_err() {
        log::error!("uci thread panicked");
    }
    Ok(())
}
