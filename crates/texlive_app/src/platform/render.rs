use std::collections::HashMap;
use std::io;

use console::{style, Term};
use texlive_core::{SessionStatus, SessionView};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Slot {
    Header,
    Archive,
    Engine,
    Status,
    Queue,
    Error,
    Success,
}

/// Text lines for a view, one per visible slot, in display order.
pub(crate) fn lines(view: &SessionView) -> Vec<(Slot, String)> {
    let mut lines = vec![
        (Slot::Header, format!("[{}]", view.header_label)),
        (Slot::Archive, format!("Archive: {}", view.selected_file)),
    ];
    if let Some(engine) = view.engine {
        lines.push((Slot::Engine, format!("Engine:  {engine}")));
    }
    lines.push((Slot::Status, format!("Status:  {}", view.status_text)));
    if let Some(queue) = &view.queue_message {
        lines.push((Slot::Queue, format!("Queue:   {queue}")));
    }
    if let Some(error) = &view.error {
        lines.push((Slot::Error, format!("Error ({}): {}", error.kind, error.text)));
    }
    if let Some(success) = &view.success {
        let text = match &success.saved_path {
            Some(path) => format!("{} -> {}", success.text, path.display()),
            None => success.text.to_string(),
        };
        lines.push((Slot::Success, text));
    }
    lines
}

/// Prints a view to the terminal, skipping lines unchanged since the last call.
pub struct Renderer {
    term: Term,
    shown: HashMap<Slot, String>,
}

impl Renderer {
    pub fn stdout() -> Self {
        Self {
            term: Term::stdout(),
            shown: HashMap::new(),
        }
    }

    pub fn present(&mut self, view: &SessionView) -> io::Result<()> {
        let current = lines(view);
        self.shown
            .retain(|slot, _| current.iter().any(|(visible, _)| visible == slot));

        for (slot, text) in current {
            if self.shown.get(&slot) == Some(&text) {
                continue;
            }
            self.term.write_line(&styled(slot, view.status, &text))?;
            self.shown.insert(slot, text);
        }
        Ok(())
    }
}

fn styled(slot: Slot, status: SessionStatus, text: &str) -> String {
    match slot {
        Slot::Header => match status {
            SessionStatus::Error => style(text).red().bold().to_string(),
            SessionStatus::Running => style(text).cyan().bold().to_string(),
            SessionStatus::Success => style(text).green().bold().to_string(),
            SessionStatus::Idle => style(text).dim().to_string(),
        },
        Slot::Queue => style(text).dim().to_string(),
        Slot::Error => style(text).red().to_string(),
        Slot::Success => style(text).green().to_string(),
        Slot::Archive | Slot::Engine | Slot::Status => text.to_string(),
    }
}
