use crate::domain::model::Command;
use std::io::BufRead;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

/// Map one line of user input to a command. Blank lines mean nothing.
pub fn parse_command(line: &str) -> Option<Command> {
    let trimmed = line.trim();
    match trimmed {
        "" => None,
        "s" | "save" | "register" => Some(Command::Register),
        "q" | "quit" | "exit" | "\u{1b}" => Some(Command::Exit),
        name => Some(Command::Name(name.to_string())),
    }
}

/// Forward parsed lines from `reader` until it closes or the receiver is
/// dropped. Blocks; the frame loop only ever sees the queue.
pub fn forward_commands<B: BufRead>(reader: B, tx: UnboundedSender<Command>) {
    for line in reader.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!("⚠️ Stopped reading commands: {}", e);
                return;
            }
        };
        let Some(command) = parse_command(&line) else {
            continue;
        };
        tracing::debug!("Queued command {:?}", command);
        if tx.send(command).is_err() {
            return;
        }
    }
    tracing::debug!("Command input closed");
}

/// Read commands from stdin on a detached thread, so a pending read never
/// holds up shutdown.
pub fn spawn_stdin_commands(tx: UnboundedSender<Command>) -> std::io::Result<()> {
    std::thread::Builder::new()
        .name("stdin-commands".to_string())
        .spawn(move || forward_commands(std::io::stdin().lock(), tx))
        .map(|_| ())
}

/// Queue an `Exit` on Ctrl-C.
pub fn spawn_ctrl_c(tx: UnboundedSender<Command>) -> JoinHandle<()> {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Ctrl-C received");
            let _ = tx.send(Command::Exit);
        }
    })
}
