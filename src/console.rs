//! Line-oriented front end.
//!
//! Reads one command per line from stdin and turns it into editor events.
//! The auto-save timer runs on the same task: the loop waits on either the
//! next input line or the next auto-save due time, whichever comes first,
//! so the editor is only ever touched from one place.
//!
//! Commands that would discard unsaved changes (`new`, `open`, `quit`) are
//! refused while the document is modified unless they carry a `!` suffix.
//! `save` on a document that has never been saved needs a file name.

use anyhow::{Context, bail};
use plume_buffer::Position;
use plume_core::editor::{FONT_FAMILIES, FONT_SIZES};
use plume_core::{Editor, EditorEvent, Flow, Ticket};
use plume_syntax::HighlightKind;
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;
use tokio::io::{AsyncBufReadExt, BufReader};

const HELP: &str = "\
Editing:   insert TEXT | delete | move LINE COL | select L1 C1 L2 C2 | select-all
File:      new[!] | open[!] PATH | save [PATH] | saveas PATH | quit[!]
Search:    find TERM | with TEXT | case on|off | replace | replace-all
View:      dark | syntax | autosave | font SIZE FAMILY | geometry WxH+X+Y
Other:     show | status | help
In TEXT, \\n and \\t stand for a newline and a tab.";

/// A parsed console command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Events to send to the editor, in order
    Events {
        events: Vec<EditorEvent>,
        /// Discard unsaved changes without asking
        force: bool,
    },
    /// Print the document with line numbers
    Show,
    /// Print status, title and view settings
    Status,
    Help,
}

impl Command {
    fn event(event: EditorEvent) -> Self {
        Self::Events {
            events: vec![event],
            force: false,
        }
    }
}

/// Parses one input line. Blank lines parse to `None`.
pub fn parse_command(line: &str) -> anyhow::Result<Option<Command>> {
    let line = line.trim_end_matches(['\r', '\n']);
    let (word, rest) = match line.trim_start().split_once(' ') {
        Some((word, rest)) => (word, rest),
        None => (line.trim(), ""),
    };
    if word.is_empty() {
        return Ok(None);
    }
    let (name, force) = match word.strip_suffix('!') {
        Some(name) => (name, true),
        None => (word, false),
    };
    let command = match name {
        "insert" | "i" => Command::event(EditorEvent::Insert(unescape(rest))),
        "delete" | "d" => Command::event(EditorEvent::DeleteBackward),
        "move" => {
            let [line, column] = numbers(rest)?;
            Command::event(EditorEvent::MoveCursor(position(line, column)?))
        }
        "select" => {
            let [l1, c1, l2, c2] = numbers(rest)?;
            Command::event(EditorEvent::Select {
                start: position(l1, c1)?,
                end: position(l2, c2)?,
            })
        }
        "select-all" => Command::event(EditorEvent::SelectAll),

        "new" => Command::Events {
            events: vec![EditorEvent::NewFile],
            force,
        },
        "open" => Command::Events {
            events: vec![EditorEvent::Open(path_arg(rest)?)],
            force,
        },
        "save" if rest.trim().is_empty() => Command::event(EditorEvent::Save),
        "save" => Command::event(EditorEvent::SaveAs(path_arg(rest)?)),
        "saveas" => Command::event(EditorEvent::SaveAs(path_arg(rest)?)),
        "quit" | "q" => Command::Events {
            events: vec![EditorEvent::Exit],
            force,
        },

        "find" => Command::Events {
            events: vec![
                EditorEvent::SetSearchTerm(unescape(rest)),
                EditorEvent::Find,
            ],
            force: false,
        },
        "with" => Command::event(EditorEvent::SetReplaceTerm(unescape(rest))),
        "case" => match rest.trim() {
            "on" => Command::event(EditorEvent::SetCaseSensitive(true)),
            "off" => Command::event(EditorEvent::SetCaseSensitive(false)),
            other => bail!("expected 'on' or 'off', got '{}'", other),
        },
        "replace" => Command::event(EditorEvent::ReplaceNext),
        "replace-all" => Command::event(EditorEvent::ReplaceAll),

        "dark" => Command::event(EditorEvent::ToggleDarkMode),
        "syntax" => Command::event(EditorEvent::ToggleSyntax),
        "autosave" => Command::event(EditorEvent::ToggleAutoSave),
        "font" => {
            let (size, family) = rest
                .trim()
                .split_once(' ')
                .context("usage: font SIZE FAMILY")?;
            let size = size
                .parse::<u32>()
                .with_context(|| format!("invalid font size '{}'", size))?;
            Command::event(EditorEvent::SetFont {
                family: family.trim().to_string(),
                size,
            })
        }
        "geometry" => {
            let geometry = rest.trim();
            if geometry.is_empty() {
                bail!("usage: geometry WxH+X+Y");
            }
            Command::event(EditorEvent::SetGeometry(geometry.to_string()))
        }

        "show" => Command::Show,
        "status" => Command::Status,
        "help" | "?" => Command::Help,
        other => bail!("unknown command '{}' (try 'help')", other),
    };

    let destructive = match &command {
        Command::Events { events, .. } => events.iter().any(EditorEvent::is_destructive),
        _ => false,
    };
    if force && !destructive {
        bail!("'{}' does not take '!'", name);
    }
    Ok(Some(command))
}

fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

fn numbers<const N: usize>(args: &str) -> anyhow::Result<[usize; N]> {
    let parsed = args
        .split_whitespace()
        .map(|n| n.parse::<usize>().with_context(|| format!("invalid number '{}'", n)))
        .collect::<anyhow::Result<Vec<usize>>>()?;
    let count = parsed.len();
    parsed
        .try_into()
        .map_err(|_| anyhow::anyhow!("expected {} numbers, got {}", N, count))
}

/// Lines are typed 1-based, as the status bar shows them.
fn position(line: usize, column: usize) -> anyhow::Result<Position> {
    if line == 0 {
        bail!("line numbers start at 1");
    }
    Ok(Position::new(line - 1, column))
}

fn path_arg(args: &str) -> anyhow::Result<PathBuf> {
    let path = args.trim();
    if path.is_empty() {
        bail!("missing file name");
    }
    Ok(PathBuf::from(path))
}

/// Drives an [`Editor`] from text commands and prints what changed.
pub struct Console<W: Write> {
    editor: Editor,
    out: W,
    title: String,
}

impl<W: Write> Console<W> {
    pub fn new(editor: Editor, out: W) -> Self {
        Self {
            editor,
            out,
            title: String::new(),
        }
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    /// Prints the title and status as they stand before the first command.
    pub fn greet(&mut self) -> std::io::Result<()> {
        self.render()
    }

    /// Runs one command. Returns [`Flow::Exit`] once the editor agreed to
    /// quit.
    pub fn execute(&mut self, command: Command) -> std::io::Result<Flow> {
        match command {
            Command::Events { events, force } => {
                let mut refused = None;
                let mut confirm = |title: &str, message: &str| {
                    if !force {
                        refused = Some(format!("{}: {} Repeat with '!' to confirm.", title, message));
                    }
                    force
                };
                let mut flow = Flow::Continue;
                for event in events {
                    if event == EditorEvent::Save && self.editor.document().path().is_none() {
                        writeln!(self.out, "No file name yet. Use 'save PATH' or 'saveas PATH'.")?;
                        continue;
                    }
                    flow = self.editor.handle(event, &mut confirm);
                    if flow == Flow::Exit {
                        break;
                    }
                }
                if let Some(message) = refused {
                    writeln!(self.out, "{}", message)?;
                }
                if flow == Flow::Exit {
                    return Ok(Flow::Exit);
                }
            }
            Command::Show => self.show()?,
            Command::Status => self.print_settings()?,
            Command::Help => writeln!(self.out, "{}", HELP)?,
        }
        self.render()?;
        Ok(Flow::Continue)
    }

    /// Delivers a due auto-save firing.
    pub fn auto_save(&mut self, ticket: Ticket) -> std::io::Result<()> {
        self.editor
            .handle(EditorEvent::AutoSaveTick(ticket), &mut |_: &str, _: &str| false);
        self.render()
    }

    /// Exits at end of input, discarding unsaved changes.
    pub fn finish(&mut self) -> std::io::Result<()> {
        if self.editor.is_modified() {
            writeln!(self.out, "End of input: discarding unsaved changes")?;
        }
        self.editor
            .handle(EditorEvent::Exit, &mut |_: &str, _: &str| true);
        Ok(())
    }

    fn render(&mut self) -> std::io::Result<()> {
        for alert in self.editor.take_alerts() {
            writeln!(self.out, "error: {}", alert)?;
        }
        let title = self.editor.title();
        if title != self.title {
            writeln!(self.out, "== {} ==", title)?;
            self.title = title;
        }
        writeln!(self.out, "[{}]", self.editor.status())?;
        self.out.flush()
    }

    fn show(&mut self) -> std::io::Result<()> {
        let text = self.editor.document().text();
        for (number, line) in text.split('\n').enumerate() {
            writeln!(self.out, "{:>4} | {}", number + 1, line)?;
        }
        Ok(())
    }

    fn print_settings(&mut self) -> std::io::Result<()> {
        let editor = &self.editor;
        let theme = editor.theme();
        let font = editor.font();
        writeln!(self.out, "{}", editor.document().cursor_status())?;
        writeln!(
            self.out,
            "theme: {} ({} on {})",
            theme.name, theme.palette.text_foreground, theme.palette.text_background
        )?;
        writeln!(
            self.out,
            "syntax: {}, auto-save: {}, font: {} {}",
            on_off(editor.is_syntax_enabled()),
            on_off(editor.auto_save().is_enabled()),
            font.family,
            font.size
        )?;
        let counts: Vec<String> = HighlightKind::ALL
            .iter()
            .map(|&kind| format!("{} {}", kind.theme_key(), editor.highlight_count(kind)))
            .collect();
        let at_cursor: Vec<&str> = editor
            .highlights_at_cursor()
            .iter()
            .map(HighlightKind::theme_key)
            .collect();
        writeln!(
            self.out,
            "highlights: {} | at cursor: {} | matches: {}",
            counts.join(", "),
            if at_cursor.is_empty() { "-".to_string() } else { at_cursor.join(", ") },
            editor.found().len()
        )?;
        writeln!(
            self.out,
            "fonts: {} | sizes: {:?}",
            FONT_FAMILIES.join(", "),
            FONT_SIZES
        )?;
        Ok(())
    }
}

fn on_off(flag: bool) -> &'static str {
    if flag { "on" } else { "off" }
}

/// Waits until the next auto-save is due. Never resolves while auto-save is
/// off.
async fn next_auto_save(next: Option<(Instant, Ticket)>) -> Ticket {
    match next {
        Some((due, ticket)) => {
            tokio::time::sleep_until(tokio::time::Instant::from_std(due)).await;
            ticket
        }
        None => std::future::pending().await,
    }
}

/// Runs the console on stdin and stdout until the user quits or input ends.
pub async fn run(editor: Editor) -> anyhow::Result<()> {
    let mut console = Console::new(editor, std::io::stdout());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    console.greet()?;

    loop {
        let next = console.editor().auto_save().next();
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read input")? else {
                    console.finish()?;
                    return Ok(());
                };
                match parse_command(&line) {
                    Ok(Some(command)) => {
                        if console.execute(command)? == Flow::Exit {
                            tracing::info!("Exiting");
                            return Ok(());
                        }
                    }
                    Ok(None) => {}
                    Err(e) => println!("error: {:#}", e),
                }
            }
            ticket = next_auto_save(next) => {
                console.auto_save(ticket)?;
            }
        }
    }
}
