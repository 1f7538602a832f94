//! Terminal front end for the concierge
//!
//! Reads guest input line by line, drives a [`ConversationController`] and
//! prints replies, callback requests and status notices.

#![warn(missing_docs)]

mod command;
mod relay;

pub use command::{Command, HELP};
pub use relay::{HttpRelay, DEFAULT_RELAY_URL};

use concierge_core::{
    ConversationController, ConversationState, Outcome, Result, Submission, SAMPLE_QUESTIONS,
};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::debug;

/// Drives one conversation from a line-oriented input
pub struct TerminalAdaptor {
    controller: ConversationController,
}

impl TerminalAdaptor {
    /// Adaptor around an existing conversation
    pub fn new(controller: ConversationController) -> Self {
        Self { controller }
    }

    /// The conversation
    pub fn controller(&self) -> &ConversationController {
        &self.controller
    }

    /// Run on stdin/stdout until `/quit` or end of input
    pub async fn run_stdio(&mut self) -> Result<()> {
        let mut status_rx = self.controller.subscribe();
        let watcher = tokio::spawn(async move {
            while status_rx.changed().await.is_ok() {
                let status = status_rx.borrow_and_update().clone();
                if status.notice.is_some() || status.state != ConversationState::Ready {
                    eprintln!("[{}]", status);
                }
            }
        });

        let result = self
            .run(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
            .await;
        watcher.abort();
        result
    }

    /// Run on arbitrary input and output
    pub async fn run<R, W>(&mut self, input: R, mut output: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        for message in self.controller.history() {
            write_line(&mut output, &format!("{}: {}", message.role, message.content)).await?;
        }
        let status = self.controller.status();
        if status.notice.is_some() {
            write_line(&mut output, &format!("[{}]", status)).await?;
        }
        write_line(&mut output, "Type /help for commands.").await?;

        let mut lines = input.lines();
        while let Some(line) = lines.next_line().await? {
            let command = Command::parse(&line);
            debug!(?command, "Terminal input");
            match command {
                Command::Empty => {}
                Command::Quit => break,
                Command::Help => write_line(&mut output, HELP).await?,
                Command::Samples => {
                    for (i, question) in SAMPLE_QUESTIONS.iter().enumerate() {
                        write_line(&mut output, &format!("  {}. {}", i + 1, question)).await?;
                    }
                }
                Command::Sample(n) => {
                    let question = SAMPLE_QUESTIONS[n - 1];
                    write_line(&mut output, &format!("user: {}", question)).await?;
                    let submission = self.controller.submit(question).await?;
                    self.print_submission(&mut output, &submission).await?;
                }
                Command::Say(text) => {
                    let submission = self.controller.submit(&text).await?;
                    self.print_submission(&mut output, &submission).await?;
                }
                Command::Listen => match self.controller.listen().await? {
                    Some(submission) => {
                        if let Some(user) = self.controller.history().iter().rev().nth(1) {
                            write_line(&mut output, &format!("user (spoken): {}", user.content))
                                .await?;
                        }
                        self.print_submission(&mut output, &submission).await?;
                    }
                    None => {
                        write_line(&mut output, &format!("[{}]", self.controller.status())).await?
                    }
                },
                Command::Callbacks => {
                    let callbacks = self.controller.callbacks();
                    if callbacks.is_empty() {
                        write_line(&mut output, "No callback requests.").await?;
                    }
                    for entry in &callbacks {
                        write_line(
                            &mut output,
                            &format!("  {}  {}  {}", entry.time, entry.phone, entry.user_text),
                        )
                        .await?;
                    }
                }
                Command::Unknown(raw) => {
                    write_line(&mut output, &format!("Unknown command {}. Type /help.", raw))
                        .await?
                }
            }
        }
        output.flush().await?;
        Ok(())
    }

    async fn print_submission<W: AsyncWrite + Unpin>(
        &self,
        output: &mut W,
        submission: &Submission,
    ) -> Result<()> {
        write_line(output, &format!("assistant: {}", submission.reply)).await?;
        if let Outcome::Handoff { callback } = &submission.outcome {
            write_line(
                output,
                &format!("[callback logged for {} at {}]", callback.phone, callback.time),
            )
            .await?;
        }
        Ok(())
    }
}

async fn write_line<W: AsyncWrite + Unpin>(output: &mut W, line: &str) -> Result<()> {
    output.write_all(line.as_bytes()).await?;
    output.write_all(b"\n").await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use concierge_core::{
        ChatCompletionRequest, ChatRelay, ControllerConfig, KnowledgeBase, NoSpeech,
        HANDOFF_REPLY,
    };
    use serde_json::{json, Value};
    use std::sync::Arc;

    mockall::mock! {
        Relay {}

        #[async_trait]
        impl ChatRelay for Relay {
            async fn complete(&self, request: ChatCompletionRequest) -> Result<Value>;
        }
    }

    fn adaptor(relay: MockRelay) -> TerminalAdaptor {
        let controller = ConversationController::new(
            ControllerConfig::default(),
            Arc::new(KnowledgeBase::embedded().unwrap()),
            Arc::new(relay),
            Arc::new(NoSpeech),
        )
        .unwrap();
        TerminalAdaptor::new(controller)
    }

    async fn drive(adaptor: &mut TerminalAdaptor, input: &str) -> String {
        let mut output = Vec::new();
        adaptor.run(input.as_bytes(), &mut output).await.unwrap();
        String::from_utf8(output).unwrap()
    }

    #[tokio::test]
    async fn test_sample_and_callbacks() {
        let mut relay = MockRelay::new();
        relay.expect_complete().times(1).returning(|_| {
            Ok(json!({"choices": [{"message": {"content": "Dinner is 6 PM to 10 PM."}}]}))
        });
        let mut adaptor = adaptor(relay);

        let out = drive(
            &mut adaptor,
            "/samples\n/sample 3\nI want to talk to a person\n/callbacks\n/quit\nnever read\n",
        )
        .await;

        assert!(out.starts_with("assistant: Hello"));
        assert!(out.contains("  5. How do I check in after midnight?"));
        assert!(out.contains("assistant: Dinner is 6 PM to 10 PM."));
        assert!(out.contains(&format!("assistant: {}", HANDOFF_REPLY)));
        assert!(out.contains("(555) 555-0199  I want to talk to a person"));
        assert_eq!(adaptor.controller().history().len(), 5);
    }

    #[tokio::test]
    async fn test_listen_without_recognizer() {
        let mut relay = MockRelay::new();
        relay.expect_complete().times(0);
        let mut adaptor = adaptor(relay);

        let out = drive(&mut adaptor, "/listen\n/callbacks\n/bogus\n").await;
        assert!(out.contains("[Speech recognition is not available on this host.]"));
        assert!(out.contains("No callback requests."));
        assert!(out.contains("Unknown command /bogus"));
    }
}
