//! Line-oriented chat front end over stdin/stdout.

use std::io::Write;

use tokio::io::{AsyncBufReadExt, BufReader};

use askebl_chat::{Affordance, ChatError, ChatSession, Message, SuggestionSink};

const HELP: &str = "Commands: /popular lists quick questions, /<n> asks quick question n, /faqs lists all FAQs, /reset starts over, /quit exits.";

/// A line typed at the prompt.
#[derive(Debug, PartialEq, Eq)]
enum Input<'a> {
    Blank,
    Quit,
    Reset,
    Help,
    ListPopular,
    ListFaqs,
    Popular(usize),
    Text(&'a str),
}

fn parse_input(line: &str) -> Input<'_> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Input::Blank;
    }
    match trimmed {
        "/quit" | "/exit" => Input::Quit,
        "/reset" => Input::Reset,
        "/help" => Input::Help,
        "/popular" => Input::ListPopular,
        "/faqs" => Input::ListFaqs,
        _ => match trimmed.strip_prefix('/').and_then(|n| n.parse::<usize>().ok()) {
            Some(n) if n > 0 => Input::Popular(n - 1),
            _ => Input::Text(line.trim_end_matches(['\r', '\n'])),
        },
    }
}

fn render(message: &Message) -> String {
    let mut out = format!("AskEBL: {}", message.text);
    match &message.affordance {
        Some(Affordance::Options { options }) => {
            for option in options {
                out.push_str(&format!("\n  - {option}"));
            }
        }
        Some(Affordance::YesNo { .. }) => out.push_str("\n  [Yes] [No]"),
        None => {}
    }
    out
}

fn print_popular<S: SuggestionSink>(session: &ChatSession<S>) {
    for (i, entry) in session.popular_questions().iter().enumerate() {
        println!("  /{} {}", i + 1, entry.question);
    }
}

fn print_faqs<S: SuggestionSink>(session: &ChatSession<S>) {
    let faqs = session.faqs();
    if faqs.is_empty() {
        println!("  No FAQs loaded.");
    }
    for entry in faqs {
        println!("  Q: {}\n     {}", entry.question, entry.answer);
    }
}

/// Run the conversation until EOF or `/quit`.
pub async fn run<S: SuggestionSink>(mut session: ChatSession<S>) -> std::io::Result<()> {
    if let Some(greeting) = session.history().first() {
        println!("{}", render(greeting));
    }
    println!("{HELP}");
    print_popular(&session);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let result = match parse_input(&line) {
            Input::Blank => continue,
            Input::Quit => break,
            Input::Help => {
                println!("{HELP}");
                continue;
            }
            Input::ListPopular => {
                print_popular(&session);
                continue;
            }
            Input::ListFaqs => {
                print_faqs(&session);
                continue;
            }
            Input::Reset => {
                session.reset();
                if let Some(greeting) = session.history().first() {
                    println!("{}", render(greeting));
                }
                continue;
            }
            Input::Popular(index) => session.ask_popular(index).await,
            Input::Text(text) => session.send(text).await,
        };

        match result {
            Ok(reply) => println!("{}", render(&reply)),
            Err(e @ (ChatError::MessageTooLong(_) | ChatError::UnknownPopularQuestion(_))) => {
                println!("AskEBL: {e}");
            }
            Err(e) => {
                tracing::error!(error = %e, "Chat turn failed");
                println!("AskEBL: Sorry, something went wrong. Please try again.");
            }
        }
    }

    tracing::info!(session_id = %session.session_id(), "Chat session ended");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use askebl_chat::Reply;

    #[test]
    fn test_parse_input() {
        assert_eq!(parse_input("   "), Input::Blank);
        assert_eq!(parse_input("/quit"), Input::Quit);
        assert_eq!(parse_input(" /reset "), Input::Reset);
        assert_eq!(parse_input("/popular"), Input::ListPopular);
        assert_eq!(parse_input(" /faqs"), Input::ListFaqs);
        assert_eq!(parse_input("/3"), Input::Popular(2));
        assert_eq!(parse_input("/0"), Input::Text("/0"));
        assert_eq!(parse_input("Debit Card\r\n"), Input::Text("Debit Card"));
    }

    #[test]
    fn test_render_options() {
        let msg = Message::bot(Reply::with_options(
            "Pick one:",
            vec!["Gulshan".to_string(), "Sylhet".to_string()],
        ));
        assert_eq!(render(&msg), "AskEBL: Pick one:\n  - Gulshan\n  - Sylhet");
    }

    #[test]
    fn test_render_yes_no() {
        let msg = Message::bot(Reply::yes_no("Suggest it?", "xyzzy"));
        assert_eq!(render(&msg), "AskEBL: Suggest it?\n  [Yes] [No]");
    }
}
