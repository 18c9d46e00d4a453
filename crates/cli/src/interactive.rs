//! Line-oriented session: recommendations and favorites in one loop.

use std::io::Write;
use std::path::PathBuf;

use colored::Colorize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{debug, warn};

use server::{RecommendationOrchestrator, Session};

use crate::display::{print_favorites, print_notice, print_recommendations};

const HELP: &str = "\
Commands:
  rec <title>     recommend movies similar to <title>
  surprise        recommend from a random catalog title
  add <rank>      add the recommendation with that rank to favorites
  fav <rank>      toggle the recommendation with that rank in favorites
  remove <id>     remove a favorite by movie id
  favs            show favorites
  save | load     write or read the favorites file
  export <path>   export favorites as CSV
  share           print favorites as shareable text
  top <n>         number of recommendations per request
  help            show this message
  quit            leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Recommend(String),
    Surprise,
    Add(usize),
    Toggle(usize),
    Remove(String),
    Favorites,
    Save,
    Load,
    Export(PathBuf),
    Share,
    Top(usize),
    Help,
    Quit,
    Empty,
}

/// Parse one input line; `Err` carries a message for the user
pub fn parse_command(line: &str) -> std::result::Result<Command, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let needs = |what: &str| format!("'{}' needs {}", word, what);

    match word.to_lowercase().as_str() {
        "" => Ok(Command::Empty),
        "rec" | "recommend" if rest.is_empty() => Err(needs("a title")),
        "rec" | "recommend" => Ok(Command::Recommend(rest.to_string())),
        "surprise" => Ok(Command::Surprise),
        "add" => rest
            .parse()
            .map(Command::Add)
            .map_err(|_| needs("a rank number")),
        "fav" => rest
            .parse()
            .map(Command::Toggle)
            .map_err(|_| needs("a rank number")),
        "remove" | "rm" if rest.is_empty() => Err(needs("a movie id")),
        "remove" | "rm" => Ok(Command::Remove(rest.to_string())),
        "favs" | "favorites" => Ok(Command::Favorites),
        "save" => Ok(Command::Save),
        "load" => Ok(Command::Load),
        "export" if rest.is_empty() => Err(needs("a file path")),
        "export" => Ok(Command::Export(PathBuf::from(rest))),
        "share" => Ok(Command::Share),
        "top" => rest
            .parse()
            .map(Command::Top)
            .map_err(|_| needs("a number")),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" | "q" => Ok(Command::Quit),
        other => Err(format!("Unknown command '{}'; type 'help'", other)),
    }
}

/// Interactive session on stdin
pub async fn run(orchestrator: RecommendationOrchestrator, session: Session, top_n: usize) {
    println!("{}", HELP);
    drive(
        &orchestrator,
        session,
        top_n,
        BufReader::new(tokio::io::stdin()),
    )
    .await;
}

/// Run until `quit`, end of input, or an I/O failure; returns the session.
///
/// Nothing in the loop ends the process; I/O failures are logged and
/// close the session.
async fn drive<R: AsyncBufRead + Unpin>(
    orchestrator: &RecommendationOrchestrator,
    mut session: Session,
    mut top_n: usize,
    input: R,
) -> Session {
    let mut lines = input.lines();

    loop {
        print!("{} ", ">".bold());
        if let Err(e) = std::io::stdout().flush() {
            warn!("Terminal output unavailable, ending session: {}", e);
            break;
        }

        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                warn!("Could not read input, ending session: {}", e);
                break;
            }
        };

        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(message) => {
                println!("{}", message.yellow());
                continue;
            }
        };
        debug!("Interactive command: {:?}", command);

        match command {
            Command::Empty => {}
            Command::Quit => break,
            Command::Help => println!("{}", HELP),
            Command::Recommend(title) => {
                let results = orchestrator.get_recommendations(&title, top_n).await;
                print_recommendations(&title, &results, false);
                session.show_results(results);
            }
            Command::Surprise => match orchestrator.surprise(top_n).await {
                Some((title, results)) => {
                    print_recommendations(&title, &results, false);
                    session.show_results(results);
                }
                None => println!("{}", "The catalog is empty.".yellow()),
            },
            Command::Add(rank) => {
                session.add_result(rank);
            }
            Command::Toggle(rank) => {
                let details = session
                    .results()
                    .iter()
                    .find(|r| r.rank == rank)
                    .map(|r| r.details.clone());
                match details {
                    Some(details) => session.toggle_favorite(&details),
                    None => println!("{}", format!("No recommendation ranked {}.", rank).yellow()),
                }
            }
            Command::Remove(id) => {
                session.remove_favorite(&id);
            }
            Command::Favorites => print_favorites(session.favorites()),
            Command::Save => {
                session.save_favorites();
            }
            Command::Load => {
                session.load_favorites();
            }
            Command::Export(path) => {
                session.export_favorites_csv(&path);
            }
            Command::Share => {
                if session.favorites().is_empty() {
                    println!("{}", "No favorites to share.".dimmed());
                } else {
                    println!("{}", session.favorites().share_text());
                }
            }
            Command::Top(n) => {
                top_n = n;
                println!("Showing {} recommendations per request.", top_n);
            }
        }

        if let Some(notice) = session.take_notice() {
            print_notice(&notice);
        }
    }

    session
}
