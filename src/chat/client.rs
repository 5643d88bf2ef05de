use super::input::{split_terminal_line, GestureOutcome, SubmitGesture};
use crate::api::{endpoints, ApiClient};
use crate::models::{AnalyzeRequest, ChatMessage};
use crate::session::SessionStore;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, warn};
use uuid::Uuid;

pub const LOAD_HISTORY_FAILED: &str = "Failed to load chat history";
pub const ANALYZE_FAILED: &str = "Failed to analyze symptoms";
pub const CLEAR_FAILED: &str = "Failed to clear chat history";
pub const CLEAR_PROMPT: &str = "Are you sure you want to clear all chat history?";

/// Everything the chat view renders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatView {
    pub messages: Vec<ChatMessage>,
    pub input: String,
    pub loading: bool,
    pub error: Option<String>,
}

/// Proof that the user was asked before clearing the history.
///
/// Only the most recent confirmation issued by a client is honoured.
#[derive(Debug)]
pub struct ClearConfirmation {
    id: Uuid,
}

impl ClearConfirmation {
    pub fn prompt(&self) -> &'static str {
        CLEAR_PROMPT
    }
}

#[derive(Default)]
struct ChatState {
    view: ChatView,
    pending_clear: Option<Uuid>,
}

/// Controller for the symptom-analysis conversation.
///
/// Failures never escape: they end up in `ChatView::error` as the string the
/// view shows. The state lock is never held across a request.
pub struct ChatClient {
    api: ApiClient,
    session: Arc<SessionStore>,
    state: Mutex<ChatState>,
}

impl ChatClient {
    pub fn new(session: Arc<SessionStore>) -> Self {
        Self {
            api: session.api().clone(),
            session,
            state: Mutex::new(ChatState::default()),
        }
    }

    pub fn view(&self) -> ChatView {
        self.lock().view.clone()
    }

    pub fn messages(&self) -> Vec<ChatMessage> {
        self.lock().view.messages.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.lock().view.loading
    }

    pub fn error(&self) -> Option<String> {
        self.lock().view.error.clone()
    }

    pub fn input(&self) -> String {
        self.lock().view.input.clone()
    }

    pub fn set_input(&self, text: impl Into<String>) {
        self.lock().view.input = text.into();
    }

    /// Whether the submit control is enabled.
    pub fn can_submit(&self) -> bool {
        let state = self.lock();
        !state.view.loading && !state.view.input.trim().is_empty()
    }

    /// Replace the local list with the server's. On failure the list is kept.
    pub async fn load_history(&self) {
        let token = self.session.token();
        match self
            .api
            .get::<Vec<ChatMessage>>(endpoints::CHAT_HISTORY, token.as_deref())
            .await
        {
            Ok(messages) => {
                debug!(count = messages.len(), "chat history loaded");
                self.lock().view.messages = messages;
            }
            Err(e) => {
                warn!(error = %e, "loading chat history failed");
                self.lock().view.error = Some(LOAD_HISTORY_FAILED.to_string());
            }
        }
    }

    /// Submit symptoms for analysis. Blank text is ignored without a request.
    ///
    /// On success the history is reloaded so the list carries the server's id,
    /// timestamp and response, and the input is cleared.
    pub async fn analyze_symptoms(&self, text: &str) {
        if text.trim().is_empty() {
            return;
        }

        let _loading = self.begin_loading();
        let token = self.session.token();
        let request = AnalyzeRequest {
            symptoms: text.to_string(),
        };

        match self
            .api
            .post_ack(endpoints::CHAT_ANALYZE, token.as_deref(), &request)
            .await
        {
            Ok(()) => {
                self.load_history().await;
                self.lock().view.input.clear();
            }
            Err(e) => {
                warn!(error = %e, "symptom analysis failed");
                let message = e
                    .server_message()
                    .map(str::to_string)
                    .unwrap_or_else(|| ANALYZE_FAILED.to_string());
                self.lock().view.error = Some(message);
            }
        }
    }

    /// Analyze whatever is currently in the input.
    pub async fn submit(&self) {
        let input = self.input();
        self.analyze_symptoms(&input).await;
    }

    /// Plain submit analyzes the input without adding a newline; shift+submit
    /// inserts a newline and keeps composing.
    pub async fn handle_gesture(&self, gesture: SubmitGesture) -> GestureOutcome {
        match gesture {
            SubmitGesture::ShiftSubmit => {
                self.lock().view.input.push('\n');
                GestureOutcome::NewlineInserted
            }
            SubmitGesture::Submit => {
                if !self.can_submit() {
                    return GestureOutcome::Ignored;
                }
                self.submit().await;
                GestureOutcome::Submitted
            }
        }
    }

    /// Feed one terminal line to the composer.
    ///
    /// The line is appended to the input and its gesture applied. A blank or
    /// failed submission empties the composer.
    pub async fn handle_terminal_line(&self, line: &str) -> GestureOutcome {
        let (text, gesture) = split_terminal_line(line);
        self.lock().view.input.push_str(text);

        let outcome = self.handle_gesture(gesture).await;
        let discard = match outcome {
            GestureOutcome::Submitted => self.error().is_some(),
            GestureOutcome::Ignored => true,
            GestureOutcome::NewlineInserted => false,
        };
        if discard {
            self.lock().view.input.clear();
        }
        outcome
    }

    /// First phase of clearing: ask. No request is made.
    pub fn request_clear(&self) -> ClearConfirmation {
        let id = Uuid::new_v4();
        self.lock().pending_clear = Some(id);
        ClearConfirmation { id }
    }

    pub fn cancel_clear(&self, confirmation: ClearConfirmation) {
        let mut state = self.lock();
        if state.pending_clear == Some(confirmation.id) {
            state.pending_clear = None;
        }
    }

    /// Second phase of clearing: delete on the server, then locally.
    ///
    /// Returns whether the history was cleared. A confirmation that is stale
    /// or was cancelled is refused without a request.
    pub async fn confirm_clear(&self, confirmation: ClearConfirmation) -> bool {
        {
            let mut state = self.lock();
            if state.pending_clear != Some(confirmation.id) {
                warn!("ignoring stale clear confirmation");
                return false;
            }
            state.pending_clear = None;
        }

        let token = self.session.token();
        match self.api.delete(endpoints::CHAT_CLEAR, token.as_deref()).await {
            Ok(()) => {
                debug!("chat history cleared");
                self.lock().view.messages.clear();
                true
            }
            Err(e) => {
                warn!(error = %e, "clearing chat history failed");
                self.lock().view.error = Some(CLEAR_FAILED.to_string());
                false
            }
        }
    }

    fn begin_loading(&self) -> LoadingGuard<'_> {
        let mut state = self.lock();
        state.view.loading = true;
        state.view.error = None;
        LoadingGuard { state: &self.state }
    }

    fn lock(&self) -> MutexGuard<'_, ChatState> {
        lock(&self.state)
    }
}

/// Resets the loading flag on every exit path of an analysis.
struct LoadingGuard<'a> {
    state: &'a Mutex<ChatState>,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        lock(self.state).view.loading = false;
    }
}

fn lock(state: &Mutex<ChatState>) -> MutexGuard<'_, ChatState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
