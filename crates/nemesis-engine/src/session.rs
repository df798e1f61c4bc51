//! Advisor commands and the interactive session loop.
//!
//! One-shot CLI subcommands and the interactive session share the same
//! [`Command`] type and run through [`Session::execute`], so both persist and
//! print in the same way.

use std::io::{self, BufRead, Write};

use nemesis_advisor::advisor::{Advisor, AdvisorError};
use thiserror::Error;
use tracing::{debug, info};

use crate::output::{format_inventory, format_recommendation, OutputFormat};
use crate::store::{InventoryStore, StoreError};

/// Help text for the interactive session.
pub const HELP: &str = "\
Commands:
  show                     Show the current recommendation
  inventory                List held items
  set <item> <count>       Set the held count of an item
  inc <item>               Add one of an item
  dec <item>               Remove one of an item
  drop <item>[, <item>...] Queue drops to add on the next flush
  flush                    Add every queued drop to the inventory
  clear                    Discard queued drops
  consume                  Apply the current recommendation
  help                     Show this help
  quit                     Save and exit
";

/// Errors that can occur while running commands.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Command line could not be understood.
    #[error("{0}")]
    Usage(String),

    /// Advisor rejected the command.
    #[error(transparent)]
    Advisor(#[from] AdvisorError),

    /// Persisting the inventory failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Terminal IO failed.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Rendering JSON output failed.
    #[error("Failed to render JSON output: {0}")]
    Json(#[from] serde_json::Error),
}

impl SessionError {
    /// Returns true if the session can carry on after this error.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Usage(_) | Self::Advisor(_))
    }
}

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// A single advisor command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print the current recommendation.
    Show,
    /// Print held counts.
    Inventory,
    /// Set a held count.
    Set {
        /// Item name.
        item: String,
        /// New count.
        count: u32,
    },
    /// Add one of an item.
    Inc(String),
    /// Remove one of an item.
    Dec(String),
    /// Queue drops.
    Drop(Vec<String>),
    /// Add queued drops to the inventory.
    Flush,
    /// Discard queued drops.
    Clear,
    /// Apply the current recommendation.
    Consume,
    /// Print help.
    Help,
    /// Leave the session.
    Quit,
}

impl Command {
    /// Parses one session line. Returns `Ok(None)` for a blank line.
    ///
    /// Item names may contain spaces. `set` takes the count as its last
    /// word and `drop` separates names with commas.
    pub fn parse(line: &str) -> SessionResult<Option<Self>> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        let command = match verb.to_ascii_lowercase().as_str() {
            "show" | "s" => Self::Show,
            "inventory" | "inv" | "i" => Self::Inventory,
            "set" => {
                let (item, count) = rest
                    .rsplit_once(char::is_whitespace)
                    .ok_or_else(|| usage("usage: set <item> <count>"))?;
                let count = count
                    .parse()
                    .map_err(|_| usage(format!("not a count: {count}")))?;
                Self::Set {
                    item: item.trim().to_string(),
                    count,
                }
            },
            "inc" | "+" => Self::Inc(item_arg(rest, "usage: inc <item>")?),
            "dec" | "-" => Self::Dec(item_arg(rest, "usage: dec <item>")?),
            "drop" | "d" => {
                let items: Vec<String> = rest
                    .split(',')
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .map(str::to_string)
                    .collect();
                if items.is_empty() {
                    return Err(usage("usage: drop <item>[, <item>...]"));
                }
                Self::Drop(items)
            },
            "flush" | "f" => Self::Flush,
            "clear" => Self::Clear,
            "consume" | "c" => Self::Consume,
            "help" | "h" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            _ => return Err(usage(format!("unknown command: {verb} (try `help`)"))),
        };
        Ok(Some(command))
    }

    /// Returns true if the command changes inventory or queue.
    #[must_use]
    pub fn is_mutating(&self) -> bool {
        matches!(
            self,
            Self::Set { .. }
                | Self::Inc(_)
                | Self::Dec(_)
                | Self::Drop(_)
                | Self::Flush
                | Self::Clear
                | Self::Consume
        )
    }
}

fn usage(message: impl Into<String>) -> SessionError {
    SessionError::Usage(message.into())
}

fn item_arg(rest: &str, message: &str) -> SessionResult<String> {
    if rest.is_empty() {
        return Err(usage(message));
    }
    Ok(rest.to_string())
}

/// Whether the loop should keep reading commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Read the next command.
    Continue,
    /// Stop the session.
    Quit,
}

/// An advisor bound to its store and display settings.
pub struct Session {
    advisor: Advisor,
    store: Option<InventoryStore>,
    auto_save: bool,
    show_counts: bool,
    format: OutputFormat,
    dirty: bool,
}

impl Session {
    /// Creates a session. Without a store nothing is persisted.
    #[must_use]
    pub fn new(advisor: Advisor, store: Option<InventoryStore>) -> Self {
        Self {
            advisor,
            store,
            auto_save: true,
            show_counts: false,
            format: OutputFormat::Text,
            dirty: false,
        }
    }

    /// Saves after every mutating command instead of only on finish.
    #[must_use]
    pub fn with_auto_save(mut self, auto_save: bool) -> Self {
        self.auto_save = auto_save;
        self
    }

    /// Prints held counts next to recommended items.
    #[must_use]
    pub fn with_show_counts(mut self, show_counts: bool) -> Self {
        self.show_counts = show_counts;
        self
    }

    /// Sets the output format.
    #[must_use]
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Returns the advisor.
    #[must_use]
    pub fn advisor(&self) -> &Advisor {
        &self.advisor
    }

    /// Runs one command and writes its output.
    pub fn execute<W: Write>(&mut self, command: &Command, out: &mut W) -> SessionResult<Flow> {
        debug!(?command, "Executing command");

        match command {
            Command::Show => {},
            Command::Inventory => {
                write!(out, "{}", format_inventory(&self.advisor, self.format)?)?;
                if self.format == OutputFormat::Json {
                    writeln!(out)?;
                }
                return Ok(Flow::Continue);
            },
            Command::Set { item, count } => {
                self.advisor.set_count(item, *count)?;
            },
            Command::Inc(item) => {
                self.advisor.increment(item)?;
            },
            Command::Dec(item) => {
                self.advisor.decrement(item)?;
            },
            Command::Drop(items) => {
                // All-or-nothing so a typo does not leave half the drops queued.
                for item in items {
                    self.check_drop(item)?;
                }
                for item in items {
                    self.advisor.queue_drop(item)?;
                }
            },
            Command::Flush => {
                self.advisor.flush_queue();
            },
            Command::Clear => {
                self.advisor.clear_queue();
            },
            Command::Consume => {
                self.advisor.consume_recipe();
            },
            Command::Help => {
                write!(out, "{HELP}")?;
                return Ok(Flow::Continue);
            },
            Command::Quit => return Ok(Flow::Quit),
        }

        if command.is_mutating() {
            self.dirty = true;
            if self.auto_save {
                self.save()?;
            }
        }

        self.print_recommendation(out)?;
        Ok(Flow::Continue)
    }

    fn check_drop(&self, item: &str) -> SessionResult<()> {
        let catalog = self.advisor.catalog();
        let id = catalog
            .id(item)
            .ok_or_else(|| AdvisorError::UnknownItem(item.to_string()))?;
        if !catalog.is_drop(id) {
            return Err(AdvisorError::NotADrop(item.to_string()).into());
        }
        Ok(())
    }

    /// Writes the current recommendation.
    pub fn print_recommendation<W: Write>(&self, out: &mut W) -> SessionResult<()> {
        let text = format_recommendation(&self.advisor, self.show_counts, self.format)?;
        write!(out, "{text}")?;
        if self.format == OutputFormat::Json {
            writeln!(out)?;
        }
        Ok(())
    }

    /// Persists inventory and queue if anything changed.
    pub fn save(&mut self) -> SessionResult<()> {
        if let Some(store) = &self.store {
            if self.dirty {
                store.save_advisor(&self.advisor)?;
                self.dirty = false;
            }
        }
        Ok(())
    }

    /// Runs the interactive loop until `quit` or end of input, then saves.
    ///
    /// Unknown items and malformed lines are reported on `out` and the loop
    /// carries on; store and IO failures end the session.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> SessionResult<()> {
        info!("Starting interactive session");
        self.print_recommendation(out)?;
        write!(out, "> ")?;
        out.flush()?;

        for line in input.lines() {
            let line = line?;
            let flow = match Command::parse(&line) {
                Ok(Some(command)) => self.execute(&command, out),
                Ok(None) => Ok(Flow::Continue),
                Err(e) => Err(e),
            };

            match flow {
                Ok(Flow::Quit) => break,
                Ok(Flow::Continue) => {},
                Err(e) if e.is_recoverable() => writeln!(out, "error: {e}")?,
                Err(e) => return Err(e),
            }

            write!(out, "> ")?;
            out.flush()?;
        }

        self.save()?;
        info!("Session ended");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nemesis_advisor::catalog::{Catalog, Item};
    use nemesis_advisor::inventory::Inventory;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn catalog() -> Catalog {
        Catalog::new(vec![
            Item::drop("Toxic"),
            Item::drop("Bloodletter"),
            Item::drop("Hasted"),
            Item::drop("Deadeye"),
            Item::craftable("Corpse Detonator", ["Hasted", "Deadeye"]),
            Item::craftable("Entangler", ["Toxic", "Bloodletter"]),
        ])
        .expect("valid catalog")
    }

    fn session() -> Session {
        Session::new(Advisor::new(catalog(), Inventory::new()), None)
    }

    fn run(session: &mut Session, input: &str) -> String {
        let mut out = Vec::new();
        session.run(Cursor::new(input), &mut out).expect("session runs");
        String::from_utf8(out).expect("utf8")
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("  ").expect("blank"), None);
        assert_eq!(Command::parse("SHOW").expect("show"), Some(Command::Show));
        assert_eq!(
            Command::parse("set Corpse Detonator 3").expect("set"),
            Some(Command::Set {
                item: "Corpse Detonator".to_string(),
                count: 3
            })
        );
        assert_eq!(
            Command::parse("inc Corpse Detonator").expect("inc"),
            Some(Command::Inc("Corpse Detonator".to_string()))
        );
        assert_eq!(
            Command::parse("drop Toxic, Hasted,").expect("drop"),
            Some(Command::Drop(vec!["Toxic".to_string(), "Hasted".to_string()]))
        );
        assert_eq!(Command::parse("q").expect("quit"), Some(Command::Quit));
        assert_eq!(Command::parse("clear").expect("clear"), Some(Command::Clear));
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(Command::parse("set Toxic"), Err(SessionError::Usage(_))));
        assert!(matches!(Command::parse("set Toxic -1"), Err(SessionError::Usage(_))));
        assert!(matches!(Command::parse("inc"), Err(SessionError::Usage(_))));
        assert!(matches!(Command::parse("drop ,"), Err(SessionError::Usage(_))));
        assert!(matches!(Command::parse("craft"), Err(SessionError::Usage(_))));
    }

    #[test]
    fn test_mutating_commands() {
        assert!(Command::Flush.is_mutating());
        assert!(Command::Clear.is_mutating());
        assert!(Command::Inc("Toxic".to_string()).is_mutating());
        assert!(!Command::Show.is_mutating());
        assert!(!Command::Help.is_mutating());
    }

    #[test]
    fn test_session_flow() {
        let mut session = session();

        let out = run(
            &mut session,
            "inc Toxic\ninc Bloodletter\nset Hasted 2\ninc Deadeye\nconsume\ninventory\nquit\ninc Toxic\n",
        );

        assert!(out.contains("Build Recipes: Corpse Detonator + Entangler\n"));
        assert!(out.contains("Corpse Detonator  1\nEntangler         1\nHasted            1\n"));
        assert_eq!(session.advisor().count("Entangler"), Ok(1));
        assert_eq!(session.advisor().count("Corpse Detonator"), Ok(1));
        assert_eq!(session.advisor().count("Hasted"), Ok(1));
        // Input after quit is ignored.
        assert_eq!(session.advisor().count("Toxic"), Ok(0));
    }

    #[test]
    fn test_session_reports_recoverable_errors() {
        let mut session = session();

        let out = run(&mut session, "inc Mystery\ndrop Toxic, Entangler\nfly\ninc Toxic\n");

        assert!(out.contains("error: Unknown item: Mystery\n"));
        assert!(out.contains("error: Entangler is crafted, not dropped\n"));
        assert!(out.contains("error: unknown command: fly"));
        assert!(session.advisor().queued().is_empty());
        assert_eq!(session.advisor().count("Toxic"), Ok(1));
    }

    #[test]
    fn test_drop_and_flush() {
        let mut session = session();
        let mut out = Vec::new();

        session
            .execute(&Command::Drop(vec!["Toxic".into(), "Toxic".into()]), &mut out)
            .expect("drop");
        assert_eq!(session.advisor().queued(), vec!["Toxic", "Toxic"]);

        session.execute(&Command::Flush, &mut out).expect("flush");
        assert_eq!(session.advisor().count("Toxic"), Ok(2));
        assert!(session.advisor().queued().is_empty());
    }

    #[test]
    fn test_clear_discards_queue() {
        let mut session = session();
        let mut out = Vec::new();

        session
            .execute(&Command::Drop(vec!["Toxic".into(), "Hasted".into()]), &mut out)
            .expect("drop");
        session.execute(&Command::Clear, &mut out).expect("clear");
        session.execute(&Command::Flush, &mut out).expect("flush");

        assert!(session.advisor().queued().is_empty());
        assert_eq!(session.advisor().count("Toxic"), Ok(0));
        assert_eq!(session.advisor().count("Hasted"), Ok(0));
    }

    #[test]
    fn test_render_failure_ends_session() {
        let render = serde_json::from_str::<u32>("not json").expect_err("invalid json");
        let error = SessionError::from(render);

        assert!(matches!(error, SessionError::Json(_)));
        assert!(!error.is_recoverable());
        assert!(error.to_string().starts_with("Failed to render JSON output"));
    }

    #[test]
    fn test_json_session_output() {
        let mut session = session().with_format(OutputFormat::Json);
        let mut out = Vec::new();

        session.execute(&Command::Inventory, &mut out).expect("inventory");
        session.execute(&Command::Show, &mut out).expect("show");

        let text = String::from_utf8(out).expect("utf8");
        let mut values = serde_json::Deserializer::from_str(&text).into_iter::<serde_json::Value>();
        let inventory = values.next().expect("inventory value").expect("inventory json");
        let shown = values.next().expect("show value").expect("show json");
        assert_eq!(inventory, serde_json::json!({}));
        assert_eq!(shown["kind"], "empty_inventory");
    }

    #[test]
    fn test_session_persists_on_exit() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = InventoryStore::new(temp_dir.path());
        let mut session =
            Session::new(Advisor::new(catalog(), Inventory::new()), Some(store.clone()))
                .with_auto_save(false);

        run(&mut session, "set Toxic 4\ndrop Hasted\n");

        let restored = store.load_advisor(catalog()).expect("load");
        assert_eq!(restored.count("Toxic"), Ok(4));
        assert_eq!(restored.queued(), vec!["Hasted"]);
    }

    #[test]
    fn test_auto_save_after_each_command() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = InventoryStore::new(temp_dir.path());
        let mut session =
            Session::new(Advisor::new(catalog(), Inventory::new()), Some(store.clone()));
        let mut out = Vec::new();

        session.execute(&Command::Show, &mut out).expect("show");
        assert!(!store.inventory_path().exists());

        session
            .execute(&Command::Set { item: "Deadeye".into(), count: 2 }, &mut out)
            .expect("set");
        assert!(store.inventory_path().exists());
    }
}
