//! Conversation widget: the state behind the chat view and the relay to the
//! Dialogue Service.
//!
//! All state lives in [`ConversationWidget`]; nothing is global. Requests are
//! split into three steps so a front-end can run them off its event loop:
//!
//! 1. a user action produces a [`PendingRequest`] tagged with a sequence number,
//! 2. [`PendingRequest::dispatch`] performs the call and yields a [`Completed`],
//! 3. [`ConversationWidget::apply`] folds the result back in, discarding it if
//!    a newer request has been issued since.
//!
//! [`ConversationWidget::send_message_to_bot`] runs all three in order for
//! callers that do not need to interleave other work.

use tracing::{debug, info, warn};

use crate::client::{DialogueError, DialogueService};
use crate::config::Config;
use crate::conversation::{MessageLog, Sender};
use crate::protocol::{ChatReply, ChatRequest, UpdateReply, UpdateRequest};
use crate::stepper::Stepper;

/// How the user provides input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Only suggestion controls are offered.
    #[default]
    Buttons,
    /// A free-text input is shown. Terminal: never reverts to `Buttons`.
    FreeText,
}

/// Where free-text submissions are sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmitTarget {
    /// `POST /chat`, advancing the guided conversation.
    #[default]
    Chat,
    /// `POST /update_website`, once the site has been generated.
    UpdateWebsite,
}

/// Preview of the generated website.
///
/// A reload re-fetches the whole preview; it is tracked as a revision counter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreviewFrame {
    /// Where the preview is served from, once known.
    pub url: Option<String>,
    /// Number of full reloads performed.
    pub revision: u64,
}

impl PreviewFrame {
    /// Force a full reload of the preview.
    pub fn reload(&mut self) {
        self.revision += 1;
    }
}

/// A request to the Dialogue Service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outgoing {
    /// `POST /chat`.
    Chat(ChatRequest),
    /// `POST /update_website`.
    UpdateWebsite(UpdateRequest),
}

/// Result of a request to the Dialogue Service.
#[derive(Debug)]
pub enum Incoming {
    /// Answer to a chat request.
    Chat(Result<ChatReply, DialogueError>),
    /// Answer to a website update request.
    UpdateWebsite(Result<UpdateReply, DialogueError>),
}

/// A request that has been issued but not yet sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRequest {
    /// Sequence number; only the latest one is applied.
    pub seq: u64,
    /// What to send.
    pub request: Outgoing,
}

impl PendingRequest {
    /// Send the request and wait for the answer.
    pub async fn dispatch(self, service: &dyn DialogueService) -> Completed {
        let outcome = match self.request {
            Outgoing::Chat(request) => Incoming::Chat(service.chat(request).await),
            Outgoing::UpdateWebsite(request) => {
                Incoming::UpdateWebsite(service.update_website(request).await)
            }
        };
        Completed {
            seq: self.seq,
            outcome,
        }
    }
}

/// A finished request, ready to be applied.
#[derive(Debug)]
pub struct Completed {
    /// Sequence number of the originating request.
    pub seq: u64,
    /// What came back.
    pub outcome: Incoming,
}

/// What [`ConversationWidget::apply`] did with a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The reply was rendered.
    Applied,
    /// A newer request exists; the result was dropped.
    Stale,
    /// The request failed; a notice was shown and state left unchanged.
    Failed,
}

/// State of the chat view and its link to the Dialogue Service.
#[derive(Debug, Clone)]
pub struct ConversationWidget {
    log: MessageLog,
    stepper: Stepper,
    input_mode: InputMode,
    input_focused: bool,
    submit_target: SubmitTarget,
    preview: PreviewFrame,
    user_id: String,
    show_loading: bool,
    loading: bool,
    next_seq: u64,
    latest_seq: Option<u64>,
}

impl ConversationWidget {
    /// Create a widget at step 1 showing the configured greeting and suggestions.
    pub fn new(config: &Config) -> Self {
        let mut widget = Self::blank(config);
        widget.set_step(1);
        widget.append_message(config.greeting.clone(), Sender::Bot);
        widget.render_suggestions(config.initial_suggestions.iter().cloned());
        widget
    }

    /// Create a widget with an empty log and no step shown.
    pub fn blank(config: &Config) -> Self {
        Self {
            log: MessageLog::new(),
            stepper: Stepper::new(config.step_labels.clone()),
            input_mode: InputMode::Buttons,
            input_focused: false,
            submit_target: SubmitTarget::Chat,
            preview: PreviewFrame::default(),
            user_id: config.user_id.clone(),
            show_loading: config.show_loading,
            loading: false,
            next_seq: 0,
            latest_seq: None,
        }
    }

    /// Append a message to the log, scrolling it into view.
    pub fn append_message(&mut self, text: impl Into<String>, sender: Sender) {
        self.log.append_message(text, sender);
    }

    /// Append a group of suggestion controls. Returns the group's log index.
    pub fn render_suggestions<I, S>(&mut self, labels: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.log.render_suggestions(labels)
    }

    /// Move the step indicator to `n` (1-indexed).
    pub fn set_step(&mut self, n: u32) {
        self.stepper.set_step(n);
    }

    /// Step sent with the next chat request.
    pub fn current_step(&self) -> u32 {
        self.stepper.current()
    }

    /// The message log.
    pub fn log(&self) -> &MessageLog {
        &self.log
    }

    /// The step indicator.
    pub fn stepper(&self) -> &Stepper {
        &self.stepper
    }

    /// Current input mode.
    pub fn input_mode(&self) -> InputMode {
        self.input_mode
    }

    /// Whether the text input has been given focus.
    pub fn input_focused(&self) -> bool {
        self.input_focused
    }

    /// Where free-text submissions go.
    pub fn submit_target(&self) -> SubmitTarget {
        self.submit_target
    }

    /// The generated-site preview.
    pub fn preview(&self) -> &PreviewFrame {
        &self.preview
    }

    /// Whether the loading indicator should be shown.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Session identifier sent with chat requests.
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    fn issue(&mut self, request: Outgoing) -> PendingRequest {
        self.next_seq += 1;
        let seq = self.next_seq;
        self.latest_seq = Some(seq);
        if self.show_loading {
            self.loading = true;
        }
        debug!(seq, "issued dialogue request");
        PendingRequest { seq, request }
    }

    /// Build a chat request for `text` at the current step.
    ///
    /// Does not append anything to the log; callers add the user message.
    pub fn prepare_chat(&mut self, text: impl Into<String>) -> PendingRequest {
        let request = ChatRequest {
            message: text.into(),
            user_id: self.user_id.clone(),
            step: self.current_step(),
        };
        self.issue(Outgoing::Chat(request))
    }

    /// Select a suggestion: mark it, echo its label as a user message and
    /// build the chat request for it.
    ///
    /// Returns `None` if `group`/`choice` does not name a suggestion.
    pub fn click_suggestion(&mut self, group: usize, choice: usize) -> Option<PendingRequest> {
        let label = self.log.toggle_suggestion(group, choice)?;
        self.append_message(label.clone(), Sender::User);
        Some(self.prepare_chat(label))
    }

    /// Submit typed text.
    ///
    /// Only accepted in free-text mode; blank text is ignored. Before the site
    /// is generated the text goes to the chat endpoint, afterwards it is sent
    /// as a website update instruction.
    pub fn submit_text(&mut self, text: &str) -> Option<PendingRequest> {
        if self.input_mode != InputMode::FreeText {
            debug!("ignoring text submission while suggestions are active");
            return None;
        }
        if text.trim().is_empty() {
            return None;
        }
        match self.submit_target {
            SubmitTarget::Chat => {
                self.append_message(text, Sender::User);
                Some(self.prepare_chat(text))
            }
            SubmitTarget::UpdateWebsite => Some(self.update_website(text)),
        }
    }

    /// Echo an instruction as a user message and build the update request.
    pub fn update_website(&mut self, instruction: impl Into<String>) -> PendingRequest {
        let instruction = instruction.into();
        self.append_message(instruction.clone(), Sender::User);
        self.issue(Outgoing::UpdateWebsite(UpdateRequest { instruction }))
    }

    /// Fold a finished request back into the widget.
    pub fn apply(&mut self, completed: Completed) -> ApplyOutcome {
        if self.latest_seq != Some(completed.seq) {
            debug!(
                seq = completed.seq,
                latest = ?self.latest_seq,
                "discarding stale dialogue reply"
            );
            return ApplyOutcome::Stale;
        }
        self.loading = false;

        match completed.outcome {
            Incoming::Chat(Ok(reply)) => {
                self.apply_chat_reply(reply);
                ApplyOutcome::Applied
            }
            Incoming::UpdateWebsite(Ok(reply)) => {
                self.append_message(reply.message, Sender::Bot);
                self.preview.reload();
                info!(revision = self.preview.revision, "reloaded website preview");
                ApplyOutcome::Applied
            }
            Incoming::Chat(Err(err)) | Incoming::UpdateWebsite(Err(err)) => {
                self.report_failure(&err);
                ApplyOutcome::Failed
            }
        }
    }

    fn apply_chat_reply(&mut self, reply: ChatReply) {
        let site_generated = reply.is_site_generated();
        let free_text = reply.is_free_text_phase();

        self.append_message(reply.message, Sender::Bot);

        if let Some(suggestions) = reply.suggestions {
            self.render_suggestions(suggestions);
        } else if free_text {
            self.switch_to_free_text();
        }

        // A zero nextStep means "no change".
        if let Some(step) = reply.next_step.filter(|&step| step > 0) {
            self.set_step(step);
        }

        if site_generated {
            if reply.link.is_some() {
                self.preview.url = reply.link;
            }
            self.submit_target = SubmitTarget::UpdateWebsite;
            info!(url = ?self.preview.url, "website generated");
        }
    }

    fn switch_to_free_text(&mut self) {
        if self.input_mode == InputMode::Buttons {
            info!("switching to free-text input");
        }
        self.input_mode = InputMode::FreeText;
        self.input_focused = true;
    }

    fn report_failure(&mut self, err: &DialogueError) {
        warn!(error = %err, "dialogue request failed");
        let notice = match (err.service_message(), err) {
            (Some(message), _) => message.to_string(),
            (None, DialogueError::Status { code, .. }) => {
                format!("The assistant is unavailable (HTTP {code}). Please try again.")
            }
            (None, DialogueError::Protocol(_)) => {
                "The assistant sent an unexpected reply. Please try again.".into()
            }
            (None, DialogueError::Transport(_) | DialogueError::InvalidUrl(_)) => {
                "Could not reach the assistant. Please try again.".into()
            }
        };
        self.log.append_notice(notice);
    }

    /// Send `text` to the Dialogue Service and render the reply.
    ///
    /// The text is not echoed; callers append the user message themselves.
    pub async fn send_message_to_bot(
        &mut self,
        service: &dyn DialogueService,
        text: impl Into<String>,
    ) -> ApplyOutcome {
        let pending = self.prepare_chat(text);
        let completed = pending.dispatch(service).await;
        self.apply(completed)
    }

    /// Select a suggestion and relay it, waiting for the reply.
    ///
    /// Returns `None` if `group`/`choice` does not name a suggestion.
    pub async fn choose_suggestion(
        &mut self,
        service: &dyn DialogueService,
        group: usize,
        choice: usize,
    ) -> Option<ApplyOutcome> {
        let pending = self.click_suggestion(group, choice)?;
        let completed = pending.dispatch(service).await;
        Some(self.apply(completed))
    }
}
