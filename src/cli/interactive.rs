//! Line-driven symptom picker.
//!
//! Reads one command per line, mutates the session's selection, and renders
//! predictions on `predict`. Output goes through the supplied writer so the
//! loop can be driven from tests.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use crate::error::SymptomMatchError;
use crate::session::Session;
use crate::sources::remote::RemoteClient;

const SEARCH_PREVIEW_LIMIT: usize = 20;

const HELP: &str = "Commands:
  search <text>   list symptoms containing <text>
  add <text>      select the symptom <text> refers to
  remove <text>   deselect the symptom <text> refers to
  toggle <text>   select or deselect the symptom <text> refers to
  selected        show the current selection
  clear           deselect everything
  predict         rank conditions for the current selection
  help            show this message
  quit            leave";

#[derive(Debug, PartialEq, Eq)]
enum Step {
    Continue(String),
    Quit,
}

fn split_command(line: &str) -> (String, &str) {
    let line = line.trim();
    match line.split_once(char::is_whitespace) {
        Some((cmd, rest)) => (cmd.to_ascii_lowercase(), rest.trim()),
        None => (line.to_ascii_lowercase(), ""),
    }
}

fn search(session: &Session, term: &str) -> String {
    let matches = session.index().filter(term);
    if matches.is_empty() {
        return format!("No symptoms match '{term}'.");
    }
    let mut out: Vec<String> = matches
        .iter()
        .take(SEARCH_PREVIEW_LIMIT)
        .map(|s| {
            let mark = if session.selection().contains(s) { "x" } else { " " };
            format!("[{mark}] {s}")
        })
        .collect();
    if matches.len() > SEARCH_PREVIEW_LIMIT {
        out.push(format!(
            "... {} more, refine the search",
            matches.len() - SEARCH_PREVIEW_LIMIT
        ));
    }
    out.join("\n")
}

fn selected(session: &Session) -> String {
    if session.selection().is_empty() {
        return "No symptoms selected.".to_string();
    }
    format!(
        "Selected: {}",
        session.selection().iter().collect::<Vec<_>>().join(", ")
    )
}

/// Resolves `term` to a selected name first so `remove fev` can undo
/// `add fev`, then to the symptom index.
fn resolve_for_removal(session: &Session, term: &str) -> Option<String> {
    let lower = term.trim().to_lowercase();
    session
        .selection()
        .iter()
        .find(|s| s.to_lowercase() == lower)
        .or_else(|| session.index().resolve(term))
        .map(str::to_string)
}

async fn step(
    session: &mut Session,
    remote: Option<&RemoteClient>,
    line: &str,
) -> Result<Step, SymptomMatchError> {
    let (cmd, arg) = split_command(line);
    let reply = match cmd.as_str() {
        "" => return Ok(Step::Continue(String::new())),
        "quit" | "exit" | "q" => return Ok(Step::Quit),
        "help" | "?" => HELP.to_string(),
        "search" | "s" => search(session, arg),
        "add" | "a" => match session.select_term(arg) {
            Some(symptom) => format!("Selected: {symptom}"),
            None => format!("No symptom matches '{arg}'."),
        },
        "remove" | "rm" => match resolve_for_removal(session, arg) {
            Some(symptom) if session.deselect(&symptom) => format!("Removed: {symptom}"),
            _ => format!("'{arg}' is not selected."),
        },
        "toggle" | "t" => match session.index().resolve(arg).map(str::to_string) {
            Some(symptom) if session.toggle(&symptom) => format!("Selected: {symptom}"),
            Some(symptom) => format!("Removed: {symptom}"),
            None => format!("No symptom matches '{arg}'."),
        },
        "selected" | "list" => selected(session),
        "clear" => {
            session.clear_selection();
            "Selection cleared.".to_string()
        }
        "predict" | "p" => match session.predict(remote).await {
            Ok(outcome) => crate::render::markdown::predictions_markdown(session, &outcome)?,
            Err(SymptomMatchError::EmptySelection) => {
                "Please select at least one symptom.".to_string()
            }
            Err(err) => return Err(err),
        },
        other => format!("Unknown command '{other}'. Type 'help' for commands."),
    };
    Ok(Step::Continue(reply))
}

pub(crate) async fn run_loop<R, W>(
    session: &mut Session,
    remote: Option<&RemoteClient>,
    input: R,
    output: &mut W,
) -> Result<(), SymptomMatchError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let greeting = format!(
        "{} conditions, {} symptoms loaded. Type 'help' for commands.\n",
        session.catalog().len(),
        session.index().len()
    );
    output.write_all(greeting.as_bytes()).await?;
    if let Some(banner) = crate::render::markdown::load_banner(
        session.load_status(),
        session.load_source(),
        session.load_failures(),
    ) {
        output.write_all(format!("{banner}\n").as_bytes()).await?;
    }
    output.write_all(b"> ").await?;
    output.flush().await?;

    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        match step(session, remote, &line).await? {
            Step::Quit => break,
            Step::Continue(reply) => {
                if !reply.is_empty() {
                    output.write_all(reply.as_bytes()).await?;
                    output.write_all(b"\n").await?;
                }
            }
        }
        output.write_all(b"> ").await?;
        output.flush().await?;
    }
    output.write_all(b"\n").await?;
    output.flush().await?;
    Ok(())
}

pub(crate) async fn run_stdio(
    session: &mut Session,
    remote: Option<&RemoteClient>,
) -> Result<(), SymptomMatchError> {
    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();
    run_loop(session, remote, stdin, &mut stdout).await
}
