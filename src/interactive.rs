//! Line-oriented interactive session over the intake controller

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use crate::error::AppError;
use crate::intake::{IntakeController, IntakeEvent, Submission};
use crate::render;
use crate::search::ResultSet;

const HELP: &str = "\
Type a query and press Enter to search.
  /type <text>    update the input box (filters suggestions)
  /next, /prev    move between result pages
  /page <n>       jump to a page
  /recent         show recent searches
  /recent <n>     rerun recent search n
  /recent clear   forget recent searches
  /voice          dictate a query
  /clear          clear the input box
  /quit           leave";

/// A parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Submit(String),
    Type(String),
    Next,
    Previous,
    Page(usize),
    Clear,
    Recent,
    SelectRecent(usize),
    ClearRecent,
    Voice,
    Help,
    Quit,
    Invalid(String),
}

pub fn parse_command(line: &str) -> Command {
    let line = line.trim_end_matches(['\r', '\n']);
    let Some(rest) = line.trim_start().strip_prefix('/') else {
        return Command::Submit(line.to_string());
    };

    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest, ""),
    };

    match (name, arg) {
        ("type", text) => Command::Type(text.to_string()),
        ("next", "") => Command::Next,
        ("prev", "") => Command::Previous,
        ("page", n) => match n.parse::<usize>() {
            Ok(page) => Command::Page(page),
            Err(_) => Command::Invalid(format!("Not a page number: '{}'", n)),
        },
        ("clear", "") => Command::Clear,
        ("recent", "") => Command::Recent,
        ("recent", "clear") => Command::ClearRecent,
        ("recent", n) => match n.parse::<usize>() {
            Ok(index) if index >= 1 => Command::SelectRecent(index),
            _ => Command::Invalid(format!("Not a recent search number: '{}'", n)),
        },
        ("voice", "") => Command::Voice,
        ("help", "") => Command::Help,
        ("quit", "") | ("exit", "") => Command::Quit,
        _ => Command::Invalid(format!("Unknown command '/{}'. Try /help", rest)),
    }
}

enum Step {
    Line(Option<String>),
    Event(IntakeEvent),
}

/// Run until `/quit` or end of input
pub async fn run(mut controller: IntakeController) -> Result<(), AppError> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{}\n", HELP);
    controller.on_focus();
    if let Some(overlay) = render::format_overlay(&controller.view()) {
        println!("{}", overlay);
    }

    loop {
        let step = tokio::select! {
            line = lines.next_line() => Step::Line(line?),
            event = controller.process_next() => Step::Event(event),
        };

        match step {
            Step::Line(None) => break,
            Step::Line(Some(line)) => {
                if !handle_command(&mut controller, parse_command(&line)) {
                    break;
                }
            }
            Step::Event(event) => handle_event(&controller, event),
        }
    }

    Ok(())
}

/// Apply one command; false ends the session
fn handle_command(controller: &mut IntakeController, command: Command) -> bool {
    match command {
        Command::Submit(text) => report_submission(controller.on_submit(&text)),
        Command::Type(text) => {
            controller.on_input_change(&text);
            if text.is_empty() {
                show_overlay(controller);
            }
        }
        Command::Next => turn_page(controller, |set| {
            set.paginator_mut().next();
        }),
        Command::Previous => turn_page(controller, |set| {
            set.paginator_mut().previous();
        }),
        Command::Page(page) => turn_page(controller, |set| {
            set.paginator_mut().go_to(page);
        }),
        Command::Clear => {
            controller.on_clear();
            println!("{}", render::format_status(&controller.view()));
        }
        Command::Recent => print!("{}", render::format_recent(&controller.view())),
        Command::SelectRecent(n) => match controller.select_recent(n - 1) {
            Some(submission) => report_submission(submission),
            None => eprintln!("No recent search #{}", n),
        },
        Command::ClearRecent => {
            controller.clear_recent();
            println!("Recent searches cleared.");
        }
        Command::Voice => {
            if controller.on_voice_start() {
                println!("{}", render::format_status(&controller.view()));
            } else {
                eprintln!("Dictation already in progress");
            }
        }
        Command::Help => println!("{}", HELP),
        Command::Quit => return false,
        Command::Invalid(message) => eprintln!("{}", message),
    }
    true
}

fn handle_event(controller: &IntakeController, event: IntakeEvent) {
    match event {
        IntakeEvent::SuggestionsUpdated { .. } => show_overlay(controller),
        IntakeEvent::ResultsReady { .. } => {
            if let Some(set) = controller.results() {
                print!("{}", render::format_page_markdown(set));
            }
        }
        IntakeEvent::SearchFailed { message, .. } => eprintln!("{}", message),
        IntakeEvent::TranscriptReceived { chars } => {
            debug!("Replaying {} dictated characters", chars);
        }
        IntakeEvent::TranscriptProgress { .. } => {
            println!("{}", render::format_status(&controller.view()));
        }
        IntakeEvent::VoiceSubmitted { submission } => report_submission(submission),
        IntakeEvent::VoiceFailed { message } => eprintln!("{}", message),
        IntakeEvent::StaleDiscarded { generation } => {
            debug!("Dropped reply for superseded search #{}", generation);
        }
        IntakeEvent::Superseded => {}
    }
}

fn show_overlay(controller: &IntakeController) {
    if let Some(overlay) = render::format_overlay(&controller.view()) {
        print!("{}", overlay);
    }
}

fn report_submission(submission: Submission) {
    match submission {
        Submission::EmptyQuery => eprintln!("Type something to search."),
        Submission::Dispatched { generation } => {
            debug!("Search #{} dispatched", generation);
            println!("Searching...");
        }
    }
}

fn turn_page(controller: &mut IntakeController, turn: impl FnOnce(&mut ResultSet)) {
    match controller.results_mut() {
        Some(set) => {
            turn(set);
            print!("{}", render::format_page_markdown(set));
        }
        None => eprintln!("No results to page through."),
    }
}
