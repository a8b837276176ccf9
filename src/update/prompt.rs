//! Interactive update confirmation

use dialoguer::Input;
use std::collections::VecDeque;
use std::io;

/// Answer to an update question
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    Yes,
    No,
    Quit,
}

impl Answer {
    fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "y" | "yes" => Some(Answer::Yes),
            "n" | "no" => Some(Answer::No),
            "q" | "quit" => Some(Answer::Quit),
            _ => None,
        }
    }
}

/// Source of interactive answers
pub trait Prompter {
    /// Ask `question` and return the raw reply, `default` for an empty reply
    fn ask(&mut self, question: &str, default: &str) -> io::Result<String>;

    /// Show a message to the user
    fn notify(&mut self, message: &str);
}

/// Ask whether to update `package`, repeating until a valid answer is given
pub fn ask_to_update(
    prompter: &mut dyn Prompter,
    package: &str,
    current: &str,
    latest: &str,
) -> io::Result<Answer> {
    let question = format!("Update {} from {} to {}? (y, n, q)", package, current, latest);
    loop {
        let reply = prompter.ask(&question, "y")?;
        match Answer::parse(&reply) {
            Some(answer) => return Ok(answer),
            None => prompter.notify("Please enter either y, n, q."),
        }
    }
}

/// Prompter reading from the terminal
#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn ask(&mut self, question: &str, default: &str) -> io::Result<String> {
        Input::<String>::new()
            .with_prompt(question)
            .default(default.to_string())
            .interact_text()
            .map_err(io::Error::other)
    }

    fn notify(&mut self, message: &str) {
        eprintln!("{}", message);
    }
}

/// Prompter replaying a fixed list of answers.
///
/// For scripted or non-terminal callers that drive interactive mode from a
/// program instead of a person. Asked questions and shown notices are
/// recorded so the caller can inspect them. An empty answer takes the
/// question's default, and running out of answers is an `UnexpectedEof` error.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<String>,
    /// Questions asked so far
    pub questions: Vec<String>,
    /// Messages shown so far
    pub notices: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            questions: Vec::new(),
            notices: Vec::new(),
        }
    }
}

impl Prompter for ScriptedPrompter {
    fn ask(&mut self, question: &str, default: &str) -> io::Result<String> {
        self.questions.push(question.to_string());
        let reply = self.answers.pop_front().ok_or_else(|| {
            io::Error::new(io::ErrorKind::UnexpectedEof, "no scripted answer left")
        })?;
        Ok(if reply.is_empty() {
            default.to_string()
        } else {
            reply
        })
    }

    fn notify(&mut self, message: &str) {
        self.notices.push(message.to_string());
    }
}
