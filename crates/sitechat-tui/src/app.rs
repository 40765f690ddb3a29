//! Application state and update logic for the sitechat TUI.

use crate::event::Action;
use crate::widgets::{StatusBarContent, TextInputState};
use sitechat_engine::{
    ApplyOutcome, Completed, Config, ConversationWidget, InputMode, LogEntry, PendingRequest,
    SubmitTarget,
};
use tracing::info;

/// Lines scrolled per scroll action.
const SCROLL_STEP: usize = 3;

/// Where keyboard input goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    /// Suggestion chips in the chat log.
    #[default]
    Log,
    /// The free-text input bar. Only reachable once free text is enabled.
    Input,
}

/// Application state.
#[derive(Debug)]
pub struct App {
    /// Whether the app should quit.
    pub should_quit: bool,

    /// Whether the help overlay is visible.
    pub show_help: bool,

    /// Conversation state.
    pub widget: ConversationWidget,

    /// Free-text input.
    pub input: TextInputState,

    /// Highlighted suggestion in the active group.
    pub choice: usize,

    /// Suggestion group picked with Up/Down; `None` follows the latest one.
    group: Option<usize>,

    /// Requested focus; only honoured in free-text mode.
    focus: Focus,

    /// Lines scrolled back from the newest entry.
    pub scroll_back: usize,

    /// Tick counter for animations.
    pub tick: usize,

    /// Dialogue Service address, for display.
    pub server_url: String,

    /// Log length at the last sync, to detect new entries.
    seen_entries: usize,
}

impl App {
    /// Create the app with a freshly greeted conversation.
    pub fn new(config: &Config) -> Self {
        let widget = ConversationWidget::new(config);
        let seen_entries = widget.log().len();
        Self {
            should_quit: false,
            show_help: false,
            widget,
            input: TextInputState::new(),
            choice: 0,
            group: None,
            focus: Focus::Log,
            scroll_back: 0,
            tick: 0,
            server_url: config.server_url.clone(),
            seen_entries,
        }
    }

    /// Where keyboard input goes. Always the log until free text is enabled.
    pub fn focus(&self) -> Focus {
        match self.widget.input_mode() {
            InputMode::Buttons => Focus::Log,
            InputMode::FreeText => self.focus,
        }
    }

    /// Log index of the suggestion group keyboard selection applies to.
    pub fn active_group(&self) -> Option<usize> {
        if self.focus() != Focus::Log {
            return None;
        }
        self.group.or_else(|| self.widget.log().latest_suggestion_group())
    }

    /// Highlighted suggestion as (log index, choice index).
    pub fn cursor(&self) -> Option<(usize, usize)> {
        self.active_group().map(|group| (group, self.choice))
    }

    /// Log indices of groups that have at least one suggestion.
    fn selectable_groups(&self) -> impl Iterator<Item = usize> + '_ {
        self.widget
            .log()
            .entries()
            .iter()
            .enumerate()
            .filter_map(|(index, entry)| match entry {
                LogEntry::Suggestions(group) if !group.is_empty() => Some(index),
                _ => None,
            })
    }

    fn move_group(&mut self, forward: bool) {
        let Some(current) = self.active_group() else {
            return;
        };
        let next = if forward {
            self.selectable_groups().find(|&g| g > current)
        } else {
            self.selectable_groups().filter(|&g| g < current).last()
        };
        if let Some(next) = next {
            self.group = Some(next);
            self.choice = 0;
            self.scroll_back = 0;
        }
    }

    fn active_group_len(&self) -> usize {
        self.active_group()
            .and_then(|g| self.widget.log().suggestion_group(g))
            .map_or(0, sitechat_engine::SuggestionGroup::len)
    }

    /// Handle an action. Returns a request to dispatch, if the action produced one.
    pub fn handle_action(&mut self, action: Action) -> Option<PendingRequest> {
        if self.show_help {
            match action {
                Action::Quit => self.should_quit = true,
                Action::None => {}
                _ => self.show_help = false,
            }
            return None;
        }

        let pending = match action {
            Action::Quit => {
                self.should_quit = true;
                None
            }
            Action::Help => {
                self.show_help = true;
                None
            }
            Action::ScrollUp => {
                self.scroll_back += SCROLL_STEP;
                None
            }
            Action::ScrollDown => {
                self.scroll_back = self.scroll_back.saturating_sub(SCROLL_STEP);
                None
            }
            Action::ToggleFocus => {
                self.focus = match self.focus() {
                    Focus::Log if self.widget.input_mode() == InputMode::FreeText => Focus::Input,
                    _ => Focus::Log,
                };
                None
            }
            _ => match self.focus() {
                Focus::Log => self.handle_log_action(action),
                Focus::Input => self.handle_text_action(action),
            },
        };

        self.sync_view();
        pending
    }

    fn handle_log_action(&mut self, action: Action) -> Option<PendingRequest> {
        let len = self.active_group_len();
        match action {
            Action::Left if len > 0 => {
                self.choice = (self.choice + len - 1) % len;
                None
            }
            Action::Right if len > 0 => {
                self.choice = (self.choice + 1) % len;
                None
            }
            Action::Choose(index) if index < len => {
                self.choice = index;
                self.click_choice()
            }
            Action::Select if len > 0 => self.click_choice(),
            Action::PrevGroup => {
                self.move_group(false);
                None
            }
            Action::NextGroup => {
                self.move_group(true);
                None
            }
            _ => None,
        }
    }

    fn click_choice(&mut self) -> Option<PendingRequest> {
        let group = self.active_group()?;
        let pending = self.widget.click_suggestion(group, self.choice)?;
        info!(seq = pending.seq, "suggestion chosen");
        Some(pending)
    }

    fn handle_text_action(&mut self, action: Action) -> Option<PendingRequest> {
        match action {
            Action::Char(c) => self.input.insert(c),
            Action::Backspace => self.input.backspace(),
            Action::Delete => self.input.delete(),
            Action::Left => self.input.move_left(),
            Action::Right => self.input.move_right(),
            Action::Home => self.input.move_home(),
            Action::End => self.input.move_end(),
            Action::HistoryPrev => self.input.history_prev(),
            Action::HistoryNext => self.input.history_next(),
            Action::Select => {
                if self.input.content().trim().is_empty() {
                    return None;
                }
                let text = self.input.submit();
                let pending = self.widget.submit_text(&text);
                if let Some(ref p) = pending {
                    info!(seq = p.seq, "text submitted");
                }
                return pending;
            }
            _ => {}
        }
        None
    }

    /// Fold a finished request into the conversation.
    pub fn apply(&mut self, completed: Completed) -> ApplyOutcome {
        let outcome = self.widget.apply(completed);
        self.sync_view();
        outcome
    }

    /// Follow the log when it grows: jump back to the newest entry, move the
    /// suggestion cursor to the latest group and hand focus to whichever
    /// control the new entries call for.
    fn sync_view(&mut self) {
        let len = self.widget.log().len();
        if len == self.seen_entries {
            return;
        }
        let new_group = self
            .widget
            .log()
            .latest_suggestion_group()
            .is_some_and(|g| g >= self.seen_entries);
        if new_group {
            self.focus = Focus::Log;
        } else if self.widget.input_focused() {
            self.focus = Focus::Input;
        }
        self.group = None;
        self.choice = 0;
        self.scroll_back = 0;
        self.seen_entries = len;
    }

    /// Advance animations.
    pub fn tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
    }

    /// Content for the bottom status bar.
    pub fn status_content(&self) -> StatusBarContent {
        let stepper = self.widget.stepper();
        let preview = self.widget.preview();
        let free_text = self.widget.input_mode() == InputMode::FreeText;
        let hint = match (self.focus(), self.widget.submit_target()) {
            (Focus::Log, _) if free_text => "Tab to input · F1 help · Esc quit",
            (Focus::Log, _) => "F1 help · Esc quit",
            (Focus::Input, SubmitTarget::Chat) => "Enter send · Tab suggestions · Esc quit",
            (Focus::Input, SubmitTarget::UpdateWebsite) => {
                "Enter send instruction · Tab suggestions · Esc quit"
            }
        };
        StatusBarContent {
            step: format!("Step {}/{}", stepper.current(), stepper.len()),
            server: self.server_url.clone(),
            preview: preview
                .url
                .as_ref()
                .map(|url| format!("{url} (rev {})", preview.revision)),
            hint: Some(hint.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sitechat_engine::{ChatReply, Incoming, Outgoing, Sender};

    fn config() -> Config {
        Config {
            user_id: "tester".into(),
            ..Config::default()
        }
    }

    /// Build a successful chat result from `key=value;...` pairs.
    fn chat_reply(fields: &str) -> Incoming {
        let mut reply = ChatReply::default();
        for part in fields.split(';') {
            let (key, value) = part.split_once('=').unwrap();
            match key {
                "message" => reply.message = value.into(),
                "suggestions" => {
                    reply.suggestions = Some(value.split(',').map(String::from).collect());
                }
                "phase" => reply.phase = Some(value.parse().unwrap()),
                "nextStep" => reply.next_step = Some(value.parse().unwrap()),
                "link" => reply.link = Some(value.into()),
                _ => panic!("unknown key {key}"),
            }
        }
        Incoming::Chat(Ok(reply))
    }

    #[test]
    fn test_new_app_starts_on_first_suggestion() {
        let app = App::new(&config());
        assert!(!app.should_quit);
        assert_eq!(app.cursor(), Some((1, 0)));
        assert_eq!(app.status_content().step, "Step 1/4");
    }

    #[test]
    fn test_arrow_keys_wrap_around_suggestions() {
        let mut app = App::new(&config());
        app.handle_action(Action::Left);
        assert_eq!(app.choice, 2);
        app.handle_action(Action::Right);
        assert_eq!(app.choice, 0);
    }

    #[test]
    fn test_select_clicks_highlighted_suggestion() {
        let mut app = App::new(&config());
        app.handle_action(Action::Right);

        let pending = app.handle_action(Action::Select).unwrap();
        match pending.request {
            Outgoing::Chat(request) => {
                assert_eq!(request.message, "Blog");
                assert_eq!(request.step, 1);
            }
            Outgoing::UpdateWebsite(_) => panic!("expected chat request"),
        }
        let last = app.widget.log().messages().last().unwrap();
        assert_eq!(last.sender, Sender::User);
        assert_eq!(last.text, "Blog");
    }

    #[test]
    fn test_choose_out_of_range_does_nothing() {
        let mut app = App::new(&config());
        assert!(app.handle_action(Action::Choose(7)).is_none());
    }

    #[test]
    fn test_new_group_resets_cursor_and_scroll() {
        let mut app = App::new(&config());
        app.handle_action(Action::Right);
        app.handle_action(Action::ScrollUp);
        let pending = app.handle_action(Action::Choose(2)).unwrap();
        assert_eq!(app.scroll_back, 0);
        app.handle_action(Action::ScrollUp);
        assert_eq!(app.scroll_back, SCROLL_STEP);

        app.apply(Completed {
            seq: pending.seq,
            outcome: chat_reply("message=Background?;suggestions=Dark-Mode,Light-Mode;nextStep=2"),
        });

        assert_eq!(app.choice, 0);
        assert_eq!(app.scroll_back, 0);
        assert_eq!(app.status_content().step, "Step 2/4");
    }

    #[test]
    fn test_free_text_flow() {
        let mut app = App::new(&config());
        let pending = app.handle_action(Action::Choose(0)).unwrap();
        app.apply(Completed {
            seq: pending.seq,
            outcome: chat_reply("message=Anything else?;phase=4;nextStep=4"),
        });
        assert_eq!(app.widget.input_mode(), InputMode::FreeText);
        assert_eq!(app.cursor(), None);

        // Blank input is not sent.
        assert!(app.handle_action(Action::Select).is_none());

        for c in "Shop".chars() {
            app.handle_action(Action::Char(c));
        }
        app.handle_action(Action::Backspace);
        let pending = app.handle_action(Action::Select).unwrap();
        assert!(matches!(
            pending.request,
            Outgoing::Chat(ref r) if r.message == "Sho" && r.step == 4
        ));
        assert!(app.input.is_empty());
    }

    #[test]
    fn test_help_overlay_swallows_next_key() {
        let mut app = App::new(&config());
        app.handle_action(Action::Help);
        assert!(app.show_help);
        assert!(app.handle_action(Action::Select).is_none());
        assert!(!app.show_help);
        assert!(!matches!(
            app.widget.log().entries().last(),
            Some(LogEntry::Message(_))
        ));
    }

    #[test]
    fn test_status_shows_preview_after_generation() {
        let mut app = App::new(&config());
        let pending = app.widget.prepare_chat("details");
        app.apply(Completed {
            seq: pending.seq,
            outcome: chat_reply("message=Done!;phase=5;link=/view_website"),
        });
        assert_eq!(
            app.status_content().preview.as_deref(),
            Some("/view_website (rev 0)")
        );
    }

    fn chat_message(pending: &PendingRequest) -> &str {
        match &pending.request {
            Outgoing::Chat(request) => &request.message,
            Outgoing::UpdateWebsite(_) => panic!("expected chat request"),
        }
    }

    fn reach_free_text(app: &mut App) {
        let pending = app.handle_action(Action::Choose(0)).unwrap();
        app.apply(Completed {
            seq: pending.seq,
            outcome: chat_reply("message=Anything else?;phase=4;nextStep=4"),
        });
        assert_eq!(app.focus(), Focus::Input);
    }

    #[test]
    fn test_suggestions_after_free_text_can_be_chosen() {
        let mut app = App::new(&config());
        reach_free_text(&mut app);

        for c in "More".chars() {
            app.handle_action(Action::Char(c));
        }
        let pending = app.handle_action(Action::Select).unwrap();
        app.apply(Completed {
            seq: pending.seq,
            outcome: chat_reply("message=Keep the logo?;suggestions=Yes,No"),
        });

        assert_eq!(app.widget.input_mode(), InputMode::FreeText);
        assert_eq!(app.focus(), Focus::Log);
        let latest = app.widget.log().latest_suggestion_group().unwrap();
        assert_eq!(app.cursor(), Some((latest, 0)));

        let pending = app.handle_action(Action::Choose(1)).unwrap();
        assert_eq!(chat_message(&pending), "No");
    }

    #[test]
    fn test_tab_moves_focus_only_in_free_text() {
        let mut app = App::new(&config());
        app.handle_action(Action::ToggleFocus);
        assert_eq!(app.focus(), Focus::Log);

        reach_free_text(&mut app);
        app.handle_action(Action::ToggleFocus);
        assert_eq!(app.focus(), Focus::Log);
        assert!(app.cursor().is_some());
        // Letters are not typed while the log has focus.
        app.handle_action(Action::Char('x'));
        assert!(app.input.is_empty());

        app.handle_action(Action::ToggleFocus);
        assert_eq!(app.focus(), Focus::Input);
        app.handle_action(Action::Char('x'));
        assert_eq!(app.input.content(), "x");
    }

    #[test]
    fn test_older_groups_stay_choosable() {
        let mut app = App::new(&config());
        let first = app.active_group().unwrap();
        let pending = app.handle_action(Action::Choose(1)).unwrap();
        app.apply(Completed {
            seq: pending.seq,
            outcome: chat_reply("message=Background?;suggestions=Dark-Mode,Light-Mode;nextStep=2"),
        });
        let latest = app.active_group().unwrap();
        assert!(latest > first);

        app.handle_action(Action::PrevGroup);
        assert_eq!(app.cursor(), Some((first, 0)));
        // No group before the first.
        app.handle_action(Action::PrevGroup);
        assert_eq!(app.active_group(), Some(first));

        app.handle_action(Action::Right);
        app.handle_action(Action::Right);
        let pending = app.handle_action(Action::Select).unwrap();
        assert_eq!(chat_message(&pending), "Landing Page");
        // The earlier pick in the same group stays selected.
        let group = app.widget.log().suggestion_group(first).unwrap();
        assert!(group.suggestions[1].selected);
        assert!(group.suggestions[2].selected);

        // The echo moved the cursor back to the newest group.
        assert_eq!(app.active_group(), Some(latest));
        app.handle_action(Action::PrevGroup);
        app.handle_action(Action::NextGroup);
        assert_eq!(app.active_group(), Some(latest));
    }
}
