use thiserror::Error;

use crate::engine::{DirectoryEngine, CONVERTED_KEY};
use crate::links::LinkTemplates;
use crate::output::{self, OutputFormat};
use crate::store::ConvertedStore;

pub const HELP: &str = "\
commands:
  list                 category list with counts
  select <category>    show a category (use 'converted' for marked companies)
  converted            show marked companies from every category
  search [term]        filter the current category (empty term clears)
  clear                clear the search term
  mark <id>            mark a company as converted
  unmark <id>          remove the converted mark
  stats                totals
  help                 this text
  quit                 leave the shell
";

/// One user action, as typed at the prompt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    List,
    Select(String),
    Converted,
    Search(String),
    Clear,
    Mark(u64),
    Unmark(u64),
    Stats,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("unknown command '{command}', type 'help' for a list")]
    UnknownCommand { command: String },

    #[error("'{command}' needs {what}")]
    MissingArgument {
        command: &'static str,
        what: &'static str,
    },

    #[error("invalid company id '{value}'")]
    InvalidId { value: String },
}

fn parse_id(command: &'static str, rest: &str) -> Result<u64, ParseError> {
    if rest.is_empty() {
        return Err(ParseError::MissingArgument {
            command,
            what: "a company id",
        });
    }
    rest.parse::<u64>().map_err(|_| ParseError::InvalidId {
        value: rest.to_string(),
    })
}

/// Blank lines parse to `None`. Category names may contain spaces.
pub fn parse_line(line: &str) -> Result<Option<Action>, ParseError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };

    let action = match command.to_lowercase().as_str() {
        "list" | "ls" | "categories" => Action::List,
        "select" | "show" | "cd" => {
            if rest.is_empty() {
                return Err(ParseError::MissingArgument {
                    command: "select",
                    what: "a category name",
                });
            }
            Action::Select(rest.to_string())
        }
        "converted" => Action::Converted,
        "search" | "find" | "/" => Action::Search(rest.to_string()),
        "clear" => Action::Clear,
        "mark" | "done" => Action::Mark(parse_id("mark", rest)?),
        "unmark" | "undo" => Action::Unmark(parse_id("unmark", rest)?),
        "stats" => Action::Stats,
        "help" | "?" => Action::Help,
        "quit" | "exit" | "q" => Action::Quit,
        _ => {
            return Err(ParseError::UnknownCommand {
                command: command.to_string(),
            })
        }
    };
    Ok(Some(action))
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue(String),
    Quit,
}

/// Applies one action to the engine and renders what the user should see
/// next. Mutations are followed by a fresh selection pass so the list and
/// counts reflect the new marks.
pub fn dispatch<S: ConvertedStore>(
    engine: &mut DirectoryEngine<S>,
    action: Action,
    links: &LinkTemplates,
    format: OutputFormat,
) -> Flow {
    let out = match action {
        Action::Quit => return Flow::Quit,
        Action::Help => HELP.to_string(),
        Action::List => output::render_categories(&output::category_entries(engine), format),
        Action::Stats => output::render_stats(&engine.stats(), format),
        Action::Select(key) => {
            engine.select_category(&key);
            output::render_selection(engine, links, format)
        }
        Action::Converted => {
            engine.select_category(CONVERTED_KEY);
            output::render_selection(engine, links, format)
        }
        Action::Search(term) => {
            engine.apply_search(&term);
            output::render_selection(engine, links, format)
        }
        Action::Clear => {
            engine.apply_search("");
            output::render_selection(engine, links, format)
        }
        Action::Mark(id) => {
            engine.mark_converted(id);
            refresh(engine, links, format)
        }
        Action::Unmark(id) => {
            engine.unmark_converted(id);
            refresh(engine, links, format)
        }
    };
    Flow::Continue(out)
}

fn refresh<S: ConvertedStore>(
    engine: &mut DirectoryEngine<S>,
    links: &LinkTemplates,
    format: OutputFormat,
) -> String {
    if engine.selected().is_none() {
        return output::render_stats(&engine.stats(), format);
    }
    let term = engine.search_term().to_string();
    engine.apply_search(&term);
    output::render_selection(engine, links, format)
}
