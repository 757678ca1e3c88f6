//! Line-oriented text protocol for driving a game session.
//!
//! The protocol follows the shape of GTP: each request is one line with an
//! optional numeric id, and each response starts with `=` (success) or `?`
//! (failure), followed by the id and the payload, and ends with a blank line.
//! It stands in for a graphical board: clicks come in as commands, and the
//! board, highlights, move log, status line, and announcements go out as text.
//!
//! ## Supported Commands
//!
//! - `name` - Return engine name
//! - `version` - Return engine version
//! - `list_commands` - List all supported commands
//! - `known_command <cmd>` - Check if a command is supported
//! - `quit` - Exit the loop
//! - `click <square>` or `click <row> <col>` - Click a square (`e2`, or `6 4`)
//! - `board` - Show the board
//! - `highlights` - Show the destinations of the selected piece
//! - `history [black|white]` - Show the move log
//! - `status` - Show whose turn it is
//! - `reset` - Start a new game
//! - `genmove` - Play a scheduled engine move right away
//!
//! After a click that hands the turn to the engine, the loop waits the
//! configured delay and plays the engine's reply in the same response.

use std::io::{self, BufRead, Write};
use std::thread;

use tracing::debug;

use crate::board::{Color, Square};
use crate::error::{GameError, GameResult};
use crate::game::{AiOutcome, Announcement, ClickOutcome, Game, GameConfig, MoveReport};

/// The list of known commands.
const KNOWN_COMMANDS: &[&str] = &[
    "board",
    "click",
    "genmove",
    "highlights",
    "history",
    "known_command",
    "list_commands",
    "name",
    "quit",
    "reset",
    "status",
    "version",
];

/// Protocol session state.
pub struct Session {
    game: Game,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}

impl Session {
    pub fn new(config: GameConfig) -> Self {
        Self {
            game: Game::new(config),
        }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Run the command loop on stdin and stdout.
    pub fn run(&mut self) -> io::Result<()> {
        let stdin = io::stdin();
        let stdout = io::stdout();
        self.run_with(stdin.lock(), stdout.lock())
    }

    /// Run the command loop on the given streams until `quit` or end of input.
    pub fn run_with<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> io::Result<()> {
        // An engine playing the first move replies before any command.
        if let Some(text) = self.run_scheduled_ai() {
            writeln!(output, "\n= {text}\n")?;
            output.flush()?;
        }

        for line in input.lines() {
            let line = line?;

            // Skip empty lines and comments
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (id, command_line) = Self::parse_id(line);

            let parts: Vec<&str> = command_line.split_whitespace().collect();
            if parts.is_empty() {
                continue;
            }

            let command = parts[0].to_lowercase();
            let args = &parts[1..];

            let (success, message) = self.execute(&command, args);
            let prefix = if success { '=' } else { '?' };
            let id_str = id.map(|i| i.to_string()).unwrap_or_default();

            writeln!(output, "\n{prefix}{id_str} {message}\n")?;
            output.flush()?;

            if command == "quit" {
                break;
            }
        }
        Ok(())
    }

    /// Parse an optional numeric command ID from the beginning of the line.
    fn parse_id(line: &str) -> (Option<u32>, &str) {
        let trimmed = line.trim();
        let end = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());

        match trimmed[..end].parse::<u32>() {
            Ok(id) => (Some(id), trimmed[end..].trim()),
            Err(_) => (None, trimmed),
        }
    }

    /// Parse `e2` or `6 4` into a square.
    fn parse_square(args: &[&str]) -> GameResult<Square> {
        match args {
            [name] => name.parse(),
            [row, col] => {
                let invalid = || GameError::InvalidSquare {
                    text: format!("{row} {col}"),
                };
                let row = row.parse::<usize>().map_err(|_| invalid())?;
                let col = col.parse::<usize>().map_err(|_| invalid())?;
                Square::new(row, col).ok_or_else(invalid)
            }
            _ => Err(GameError::InvalidSquare {
                text: args.join(" "),
            }),
        }
    }

    /// Execute a command and return (success, response).
    fn execute(&mut self, command: &str, args: &[&str]) -> (bool, String) {
        match command {
            "name" => (true, env!("CARGO_PKG_NAME").to_string()),

            "version" => (true, env!("CARGO_PKG_VERSION").to_string()),

            "list_commands" => (true, KNOWN_COMMANDS.join("\n")),

            "known_command" => {
                if args.is_empty() {
                    return (false, "missing argument".to_string());
                }
                let known = KNOWN_COMMANDS.contains(&args[0].to_lowercase().as_str());
                (true, if known { "true" } else { "false" }.to_string())
            }

            "quit" => (true, String::new()),

            "click" => {
                let sq = match Self::parse_square(args) {
                    Ok(sq) => sq,
                    Err(e) => return (false, e.to_string()),
                };
                match self.game.click(sq) {
                    Ok(outcome) => (true, self.describe_click(outcome)),
                    Err(e) => (false, e.to_string()),
                }
            }

            "board" => (true, format!("\n{}", self.game.board()).trim_end().to_string()),

            "highlights" => {
                let squares: Vec<String> =
                    self.game.highlights().iter().map(Square::to_string).collect();
                (true, squares.join(" "))
            }

            "history" => {
                let side = match args.first().map(|s| s.parse::<Color>()).transpose() {
                    Ok(side) => side,
                    Err(e) => return (false, e.to_string()),
                };
                let lines: Vec<String> = self
                    .game
                    .history()
                    .iter()
                    .filter(|r| side.is_none_or(|s| r.side == s))
                    .map(|r| format!("{}: {r}", r.side.name()))
                    .collect();
                (true, lines.join("\n"))
            }

            "status" => (true, self.game.status()),

            "reset" => {
                self.game.reset();
                (true, self.run_scheduled_ai().unwrap_or_default())
            }

            "genmove" => {
                if self.game.pending_ai_move().is_none() {
                    return (false, "no engine move pending".to_string());
                }
                match self.game.play_ai_move() {
                    Ok(outcome) => (true, self.describe_ai(outcome)),
                    Err(e) => (false, e.to_string()),
                }
            }

            _ => (false, format!("unknown command: {command}")),
        }
    }

    fn describe_click(&mut self, outcome: ClickOutcome) -> String {
        match outcome {
            ClickOutcome::Ignored => "ignored".to_string(),
            ClickOutcome::Deselected => "deselected".to_string(),
            ClickOutcome::Selected(sel) => {
                if sel.destinations.is_empty() {
                    return format!("selected {}", sel.square);
                }
                let squares: Vec<String> = sel.destinations.iter().map(Square::to_string).collect();
                format!("selected {}: {}", sel.square, squares.join(" "))
            }
            ClickOutcome::Moved(report) => {
                let mut lines = self.describe_move(&report);
                if let Some(reply) = self.run_scheduled_ai() {
                    lines.push(reply);
                }
                lines.join("\n")
            }
        }
    }

    fn describe_ai(&mut self, outcome: AiOutcome) -> String {
        match outcome {
            AiOutcome::Idle => String::new(),
            AiOutcome::Moved(report) => self.describe_move(&report).join("\n"),
            AiOutcome::NoMove(announcement) => {
                format!("{announcement}\n{}", self.game.status())
            }
        }
    }

    /// Lines for a completed move: log entry, announcement, status. Starts
    /// a new game afterwards if a king fell and auto reset is on.
    fn describe_move(&mut self, report: &MoveReport) -> Vec<String> {
        let mut lines = vec![format!("{}: {}", report.record.side.name(), report.record)];
        if let Some(announcement) = report.announcement {
            lines.push(announcement.to_string());
        }
        lines.push(self.game.status());

        if matches!(report.announcement, Some(Announcement::KingCaptured { .. }))
            && self.game.config().auto_reset
        {
            self.game.reset();
            lines.push("new game".to_string());
            lines.push(self.game.status());
            if let Some(reply) = self.run_scheduled_ai() {
                lines.push(reply);
            }
        }
        lines
    }

    /// Wait the configured delay and play the engine's move if one is due.
    fn run_scheduled_ai(&mut self) -> Option<String> {
        let delay = self.game.pending_ai_move()?;
        debug!(?delay, "engine move scheduled");
        if !delay.is_zero() {
            thread::sleep(delay);
        }
        match self.game.play_ai_move() {
            Ok(outcome) => Some(self.describe_ai(outcome)),
            Err(e) => Some(e.to_string()),
        }
    }
}
