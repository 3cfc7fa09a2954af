//! Typed commands from the host UI to the browser core.
//!
//! Every action the UI can trigger is a [`Command`] variant, sent over a
//! channel created by [`channel`]. Publishers and the consumer agree on the
//! closed set of variants at compile time.

use std::sync::mpsc::{self, Receiver, Sender};

use crate::listing::Entry;

/// Commands the host UI can send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Share the current selection (toolbar button).
    Share,
    /// Select only this row, then share it (row action button, context menu).
    ShareEntry { index: usize },
    /// Select only this row, then download it.
    Download { index: usize },
    /// Open the image gallery at the named entry.
    Gallery { name: String },
    /// Select every entry.
    SelectAll,
    /// Deselect everything.
    ClearSelection,
    /// Show a new directory. Clears the selection.
    Navigate { path: String, entries: Vec<Entry> },
}

/// Sending half of a command channel. Cheap to clone.
#[derive(Debug, Clone)]
pub struct CommandSender {
    tx: Sender<Command>,
}

impl CommandSender {
    /// Send a command. Returns false if the receiver is gone.
    pub fn send(&self, command: Command) -> bool {
        self.tx.send(command).is_ok()
    }
}

/// Receiving half of a command channel.
#[derive(Debug)]
pub struct CommandReceiver {
    rx: Receiver<Command>,
}

impl CommandReceiver {
    /// Take the next pending command without blocking.
    pub fn try_recv(&self) -> Option<Command> {
        self.rx.try_recv().ok()
    }

    /// Take every pending command, in send order.
    pub fn drain(&self) -> Vec<Command> {
        self.rx.try_iter().collect()
    }
}

/// Create a command channel.
pub fn channel() -> (CommandSender, CommandReceiver) {
    let (tx, rx) = mpsc::channel();
    (CommandSender { tx }, CommandReceiver { rx })
}
