//! Interactive chat loop
//!
//! `ChatController` ties the session state to the relay API and the voice
//! capabilities; `run` drives it from the terminal.

use anyhow::{Context, Result};
use colored::Colorize;
use dialoguer::Input;

use crate::api::{ChatApi, PersonaSummary};
use crate::selector::{paint, PersonaSelector};
use crate::session::{ChatSession, Role, Turn};
use crate::voice::{SpeechRecognizer, SpeechSynthesizer, Voice};

#[derive(Debug, PartialEq, Eq)]
pub enum ListenOutcome {
    /// Transcript placed in the draft
    Heard,
    Silent,
    Failed(String),
    Unavailable,
}

pub struct ChatController<A, S, R> {
    api: A,
    session: ChatSession,
    speaker: Voice<S>,
    recognizer: Voice<R>,
}

impl<A, S, R> ChatController<A, S, R>
where
    A: ChatApi,
    S: SpeechSynthesizer,
    R: SpeechRecognizer,
{
    pub fn new(api: A, session: ChatSession, speaker: Voice<S>, recognizer: Voice<R>) -> Self {
        Self {
            api,
            session,
            speaker,
            recognizer,
        }
    }

    pub fn session(&self) -> &ChatSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut ChatSession {
        &mut self.session
    }

    /// Send the current draft and append the reply (or error) to the
    /// transcript. Returns `None` when nothing was sent.
    pub async fn submit(&mut self) -> Option<Turn> {
        let request = self.session.begin_send()?;
        let outcome = self.api.send_chat(&request).await;

        let spoken = match &outcome {
            Ok(text) if self.session.speak_replies() => Some(text.clone()),
            _ => None,
        };
        let turn = self.session.finish_send(outcome)?.clone();

        if let Some(text) = spoken {
            if let Err(e) = self.speaker.announce(&text) {
                eprintln!("{} Voice output failed: {:#}", "!".yellow(), e);
            }
        }

        Some(turn)
    }

    /// One recognition session; the transcript becomes the draft
    pub fn listen(&mut self) -> ListenOutcome {
        if !self.recognizer.is_available() || !self.session.start_listening() {
            return ListenOutcome::Unavailable;
        }

        let Some(outcome) = self.recognizer.listen() else {
            self.session.finish_listening::<anyhow::Error>(Ok(None));
            return ListenOutcome::Unavailable;
        };

        let failure = outcome.as_ref().err().map(|e| format!("{:#}", e));
        if self.session.finish_listening(outcome) {
            ListenOutcome::Heard
        } else if let Some(message) = failure {
            ListenOutcome::Failed(message)
        } else {
            ListenOutcome::Silent
        }
    }

    /// Toggle spoken replies. Returns the new setting; stays off without a
    /// synthesizer.
    pub fn toggle_speak(&mut self) -> bool {
        let enabled = !self.session.speak_replies() && self.speaker.is_available();
        if !enabled {
            self.speaker.silence();
        }
        self.session.set_speak_replies(enabled);
        enabled
    }
}

// ============================================
// Slash Commands
// ============================================

#[derive(Debug, PartialEq, Eq)]
pub enum SlashCommand<'a> {
    Persona,
    Voice,
    Speak,
    Clear,
    Help,
    Quit,
    Unknown(&'a str),
    Message(&'a str),
}

impl<'a> SlashCommand<'a> {
    pub fn parse(input: &'a str) -> Self {
        let trimmed = input.trim();
        if !trimmed.starts_with('/') {
            return SlashCommand::Message(input);
        }

        match trimmed {
            "/persona" | "/p" => SlashCommand::Persona,
            "/voice" | "/v" => SlashCommand::Voice,
            "/speak" => SlashCommand::Speak,
            "/clear" => SlashCommand::Clear,
            "/help" | "/?" => SlashCommand::Help,
            "/quit" | "/exit" | "/q" => SlashCommand::Quit,
            other => SlashCommand::Unknown(other),
        }
    }
}

// ============================================
// Terminal Loop
// ============================================

pub async fn run<A, S, R>(
    controller: &mut ChatController<A, S, R>,
    selector: &mut PersonaSelector,
) -> Result<()>
where
    A: ChatApi,
    S: SpeechSynthesizer,
    R: SpeechRecognizer,
{
    print_persona(selector.find(controller.session().mode()), controller.session().mode());
    println!("{}", "Type /help for commands.".dimmed());

    loop {
        let line: String = Input::new()
            .with_prompt("You")
            .with_initial_text(controller.session().draft())
            .allow_empty(true)
            .interact_text()
            .context("Failed to read input")?;

        match SlashCommand::parse(&line) {
            SlashCommand::Quit => break,
            SlashCommand::Help => {
                controller.session_mut().set_draft(String::new());
                print_help();
            }
            SlashCommand::Clear => {
                controller.session_mut().set_draft(String::new());
                controller.session_mut().clear();
                println!("{} New conversation", "✓".green());
            }
            SlashCommand::Persona => {
                controller.session_mut().set_draft(String::new());
                let active = controller.session().mode().to_string();
                if selector.prompt(&active, |id| controller.session_mut().set_mode(id))? {
                    let mode = controller.session().mode();
                    print_persona(selector.find(mode), mode);
                }
            }
            SlashCommand::Voice => {
                controller.session_mut().set_draft(String::new());
                println!("{}", "🎤 Listening...".cyan());
                match controller.listen() {
                    ListenOutcome::Heard => {}
                    ListenOutcome::Silent => println!("{}", "Nothing heard.".dimmed()),
                    ListenOutcome::Failed(e) => {
                        println!("{} Voice input failed: {}", "✗".red(), e)
                    }
                    ListenOutcome::Unavailable => println!(
                        "{} Voice input is not available. Set it with: persona-chat config set stt-command <cmd>",
                        "!".yellow()
                    ),
                }
            }
            SlashCommand::Speak => {
                controller.session_mut().set_draft(String::new());
                if controller.toggle_speak() {
                    println!("{} Spoken replies on", "✓".green());
                } else {
                    println!("{} Spoken replies off", "✓".green());
                }
            }
            SlashCommand::Unknown(cmd) => {
                controller.session_mut().set_draft(String::new());
                println!("{} Unknown command '{}'. Type /help", "✗".red(), cmd);
            }
            SlashCommand::Message(text) => {
                controller.session_mut().set_draft(text);
                let mode = controller.session().mode().to_string();
                let persona = selector.find(&mode);

                if controller.session().draft().trim().is_empty() {
                    continue;
                }
                println!("{}", "...".dimmed());
                if let Some(turn) = controller.submit().await {
                    print_turn(&turn, persona);
                }
            }
        }
    }

    Ok(())
}

pub fn print_turn(turn: &Turn, persona: Option<&PersonaSummary>) {
    if turn.role == Role::User {
        println!("{}: {}", "You".bold(), turn.text);
        return;
    }

    if turn.failed {
        println!("{}", turn.text.red());
        return;
    }

    let (name, theme) = persona
        .map(|p| (p.name.as_str(), p.theme.as_str()))
        .unwrap_or(("AI", ""));
    println!("{}: {}", paint(name, theme).bold(), turn.text);
}

fn print_persona(persona: Option<&PersonaSummary>, mode: &str) {
    match persona {
        Some(p) => println!(
            "Chatting with {} {}",
            paint(&p.name, &p.theme).bold(),
            format!("({})", p.tagline).dimmed()
        ),
        None => println!("Chatting in mode {}", mode.cyan()),
    }
}

fn print_help() {
    println!("{}", "Commands:".bold());
    println!("  /persona  Choose a persona");
    println!("  /voice    Speak your next message");
    println!("  /speak    Toggle spoken replies");
    println!("  /clear    Start a new conversation");
    println!("  /help     Show this help");
    println!("  /quit     Exit");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ChatFailure, ChatRequest, UNREACHABLE_MESSAGE};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    type Log<T> = Arc<Mutex<Vec<T>>>;

    struct FakeApi {
        replies: Mutex<VecDeque<Result<String, ChatFailure>>>,
        requests: Log<ChatRequest>,
    }

    #[async_trait]
    impl ChatApi for FakeApi {
        async fn send_chat(&self, request: &ChatRequest) -> Result<String, ChatFailure> {
            self.requests.lock().unwrap().push(request.clone());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(ChatFailure::Unreachable(anyhow::anyhow!("no reply"))))
        }
    }

    struct FakeSynth {
        audible: Log<String>,
    }

    impl SpeechSynthesizer for FakeSynth {
        fn speak(&mut self, text: &str) -> Result<()> {
            self.audible.lock().unwrap().push(text.to_string());
            Ok(())
        }

        fn cancel(&mut self) {
            self.audible.lock().unwrap().clear();
        }

        fn is_speaking(&mut self) -> bool {
            !self.audible.lock().unwrap().is_empty()
        }
    }

    struct FakeRecognizer(VecDeque<Result<Option<String>>>);

    impl SpeechRecognizer for FakeRecognizer {
        fn recognize(&mut self) -> Result<Option<String>> {
            self.0.pop_front().unwrap_or(Ok(None))
        }
    }

    type TestController = ChatController<FakeApi, FakeSynth, FakeRecognizer>;

    fn controller(
        replies: Vec<Result<String, ChatFailure>>,
    ) -> (TestController, Log<ChatRequest>, Log<String>) {
        let requests: Log<ChatRequest> = Arc::default();
        let audible: Log<String> = Arc::default();
        let api = FakeApi {
            replies: Mutex::new(replies.into()),
            requests: requests.clone(),
        };
        let controller = ChatController::new(
            api,
            ChatSession::new("friend"),
            Voice::Available(FakeSynth {
                audible: audible.clone(),
            }),
            Voice::Unavailable,
        );
        (controller, requests, audible)
    }

    #[tokio::test]
    async fn test_blank_input_sends_nothing() {
        let (mut controller, requests, _) = controller(vec![Ok("unused".into())]);
        controller.session_mut().set_draft("  ");

        assert!(controller.submit().await.is_none());
        assert!(requests.lock().unwrap().is_empty());
        assert!(controller.session().transcript().is_empty());
    }

    #[tokio::test]
    async fn test_sequential_sends_append_in_order() {
        let (mut controller, requests, _) =
            controller(vec![Ok("Hello!".into()), Ok("Sure.".into())]);

        controller.session_mut().set_draft("Hi");
        controller.submit().await.unwrap();
        controller.session_mut().set_draft("Help me");
        controller.submit().await.unwrap();

        let texts: Vec<_> = controller
            .session()
            .transcript()
            .iter()
            .map(|t| (t.role, t.text.as_str()))
            .collect();
        assert_eq!(
            texts,
            vec![
                (Role::User, "Hi"),
                (Role::Model, "Hello!"),
                (Role::User, "Help me"),
                (Role::Model, "Sure."),
            ]
        );

        let requests = requests.lock().unwrap();
        assert_eq!(requests.len(), 2);
        assert!(requests[0].history.is_empty());
        assert_eq!(requests[1].history.len(), 2);
        assert!(!controller.session().is_busy());
    }

    #[tokio::test]
    async fn test_failures_become_model_turns() {
        let (mut controller, _, audible) = controller(vec![
            Err(ChatFailure::Rejected("서버 에러: boom".into())),
            Err(ChatFailure::Unreachable(anyhow::anyhow!("connection refused"))),
        ]);
        controller.session_mut().set_speak_replies(true);

        controller.session_mut().set_draft("one");
        let first = controller.submit().await.unwrap();
        assert_eq!(first.role, Role::Model);
        assert_eq!(first.text, "Error: 서버 에러: boom");

        controller.session_mut().set_draft("two");
        let second = controller.submit().await.unwrap();
        assert_eq!(second.text, UNREACHABLE_MESSAGE);

        assert!(audible.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_spoken_replies_preempt() {
        let (mut controller, _, audible) =
            controller(vec![Ok("first".into()), Ok("second".into())]);
        controller.session_mut().set_speak_replies(true);

        controller.session_mut().set_draft("a");
        controller.submit().await;
        controller.session_mut().set_draft("b");
        controller.submit().await;

        assert_eq!(*audible.lock().unwrap(), vec!["second".to_string()]);
    }

    #[tokio::test]
    async fn test_replies_not_spoken_when_disabled() {
        let (mut controller, _, audible) = controller(vec![Ok("quiet".into())]);
        controller.session_mut().set_draft("a");
        controller.submit().await;
        assert!(audible.lock().unwrap().is_empty());
    }

    #[test]
    fn test_toggle_speak() {
        let (mut controller, _, _) = controller(vec![]);
        assert!(controller.toggle_speak());
        assert!(!controller.toggle_speak());

        let mut muted: ChatController<FakeApi, FakeSynth, FakeRecognizer> = ChatController::new(
            FakeApi {
                replies: Mutex::default(),
                requests: Arc::default(),
            },
            ChatSession::new("friend"),
            Voice::Unavailable,
            Voice::Unavailable,
        );
        assert!(!muted.toggle_speak());
    }

    #[test]
    fn test_listen_fills_draft_or_keeps_it() {
        let (mut controller, _, _) = controller(vec![]);
        assert_eq!(controller.listen(), ListenOutcome::Unavailable);

        controller.recognizer = Voice::Available(FakeRecognizer(VecDeque::from(vec![
            Ok(Some("from the mic".to_string())),
            Err(anyhow::anyhow!("microphone busy")),
            Ok(None),
        ])));

        assert_eq!(controller.listen(), ListenOutcome::Heard);
        assert_eq!(controller.session().draft(), "from the mic");

        assert_eq!(
            controller.listen(),
            ListenOutcome::Failed("microphone busy".into())
        );
        assert_eq!(controller.session().draft(), "from the mic");

        assert_eq!(controller.listen(), ListenOutcome::Silent);
        assert_eq!(controller.session().draft(), "from the mic");
    }

    #[test]
    fn test_slash_command_parsing() {
        assert_eq!(SlashCommand::parse("/persona"), SlashCommand::Persona);
        assert_eq!(SlashCommand::parse(" /quit "), SlashCommand::Quit);
        assert_eq!(SlashCommand::parse("/dance"), SlashCommand::Unknown("/dance"));
        assert_eq!(SlashCommand::parse("hello /quit"), SlashCommand::Message("hello /quit"));
    }
}
