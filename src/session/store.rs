// ABOUTME: The session state store — single source of truth for cross-screen state.
// ABOUTME: Write-through persists auth and workspaces; the chat transcript is memory-only.

use serde::{Deserialize, Serialize};

use crate::catalog;
use crate::session::storage::{FallbackReason, FileStorage, Loaded, parse_or_default};

pub const KEY_AUTH_TOKEN: &str = "authToken";
pub const KEY_AUTH_USER: &str = "authUser";
pub const KEY_CODE_SOLVE: &str = "codeSolveState";
pub const KEY_DEBUG_ZONE: &str = "debugZoneState";
pub const KEY_CLICK_TO_CODE: &str = "clickToCodeState";

/// The authenticated user's identity as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: i64,
    pub username: String,
    pub email: String,
}

/// The current authentication session. Logged in means token and user are
/// both present; the pair is replaced atomically and never split.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthSession {
    pub token: Option<String>,
    pub user: Option<AuthUser>,
}

impl AuthSession {
    pub fn is_logged_in(&self) -> bool {
        self.token.is_some() && self.user.is_some()
    }
}

/// Who produced a chat message. Serialized as the backend expects.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Sender {
    #[serde(rename = "user")]
    User,
    #[serde(rename = "ai")]
    Ai,
}

/// One entry in the AI assistant transcript. Conversation order is the
/// vector order; the transcript lives only for the process lifetime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub text: String,
    pub sender: Sender,
}

/// Editable state of the general-purpose execution screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExecutionWorkspace {
    pub code: String,
    pub language_name: String,
    pub output: String,
    pub stdin: String,
}

impl Default for ExecutionWorkspace {
    fn default() -> Self {
        Self {
            code: "console.log('Hello World');".to_string(),
            language_name: "JavaScript".to_string(),
            output: String::new(),
            stdin: String::new(),
        }
    }
}

/// Editable state of the snippet-assembly screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SnippetWorkspace {
    pub code: String,
    pub active_language: String,
    pub output: String,
    pub stdin: String,
}

impl Default for SnippetWorkspace {
    fn default() -> Self {
        Self {
            code: "public class Main {\n    public static void main(String[] args) {\n        \n    }\n}".to_string(),
            active_language: "java".to_string(),
            output: String::new(),
            stdin: String::new(),
        }
    }
}

/// A debugging challenge fetched from the backend. The workspace only holds
/// a copy of the descriptor; the backend owns the challenge lifecycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugProblem {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub language: String,
    pub code_with_error: String,
    #[serde(default)]
    pub solution_code: Option<String>,
}

/// Verdict of a fix attempt, derived from the judge service output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JudgeResult {
    pub output: String,
    pub status: String,
    pub is_success: bool,
}

/// Editable state of the debugging screen.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DebugWorkspace {
    pub user_code: String,
    pub selected_problem: Option<DebugProblem>,
    pub judge_result: Option<JudgeResult>,
}

/// The three tool screens that own a workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    Execution,
    SnippetAssembly,
    Debug,
}

/// Partial update for the execution workspace; absent fields are preserved.
#[derive(Debug, Clone, Default)]
pub struct ExecutionUpdate {
    pub code: Option<String>,
    pub language_name: Option<String>,
    pub output: Option<String>,
    pub stdin: Option<String>,
}

/// Partial update for the snippet-assembly workspace.
#[derive(Debug, Clone, Default)]
pub struct SnippetUpdate {
    pub code: Option<String>,
    pub active_language: Option<String>,
    pub output: Option<String>,
    pub stdin: Option<String>,
}

/// Partial update for the debug workspace. The nullable fields use a double
/// Option: outer None leaves the field alone, `Some(None)` clears it.
#[derive(Debug, Clone, Default)]
pub struct DebugUpdate {
    pub user_code: Option<String>,
    pub selected_problem: Option<Option<DebugProblem>>,
    pub judge_result: Option<Option<JudgeResult>>,
}

/// In-memory session state mirrored to durable storage.
///
/// Constructed once at startup and handed to the UI as an owned value; every
/// mutation runs on the single UI task, so last-write-wins ordering is
/// race-free by construction. Each mutation writes the full record through
/// to storage before returning; read/parse failures at startup recover to
/// defaults, write failures propagate.
#[derive(Debug)]
pub struct SessionStore {
    storage: FileStorage,
    auth: AuthSession,
    chat: Vec<ChatMessage>,
    execution: ExecutionWorkspace,
    snippet: SnippetWorkspace,
    debug: DebugWorkspace,
    recovery_notes: Vec<String>,
}

impl SessionStore {
    /// Initialize from durable storage, recovering corrupt or missing
    /// records to their hardcoded defaults.
    ///
    /// A half-valid auth session (token without user or vice versa) is
    /// force-cleared from storage so it cannot resurface on a later start.
    pub fn open(storage: FileStorage) -> anyhow::Result<Self> {
        let mut notes = Vec::new();

        let token = storage.get(KEY_AUTH_TOKEN);
        let user = match storage.get(KEY_AUTH_USER) {
            None => None,
            Some(raw) => match serde_json::from_str::<AuthUser>(&raw) {
                Ok(user) => Some(user),
                Err(e) => {
                    notes.push(format!("stored {KEY_AUTH_USER} was unreadable ({e})"));
                    None
                }
            },
        };
        let auth = match (token, user) {
            (Some(token), Some(user)) => AuthSession {
                token: Some(token),
                user: Some(user),
            },
            (token, user) => {
                if token.is_some() != user.is_some() {
                    notes.push("incomplete stored auth session; cleared".to_string());
                }
                storage.remove(KEY_AUTH_TOKEN)?;
                storage.remove(KEY_AUTH_USER)?;
                AuthSession::default()
            }
        };

        let execution = load_record(&storage, KEY_CODE_SOLVE, &mut notes);
        let snippet = load_record(&storage, KEY_CLICK_TO_CODE, &mut notes);
        let debug = load_record(&storage, KEY_DEBUG_ZONE, &mut notes);

        Ok(Self {
            storage,
            auth,
            chat: Vec::new(),
            execution,
            snippet,
            debug,
            recovery_notes: notes,
        })
    }

    /// Start with pure defaults, ignoring whatever storage holds. Writes
    /// still go through, so the old state is overwritten as the user works.
    pub fn fresh(storage: FileStorage) -> Self {
        Self {
            storage,
            auth: AuthSession::default(),
            chat: Vec::new(),
            execution: ExecutionWorkspace::default(),
            snippet: SnippetWorkspace::default(),
            debug: DebugWorkspace::default(),
            recovery_notes: Vec::new(),
        }
    }

    /// Records recovered to defaults during `open`, for a startup notice.
    pub fn recovery_notes(&self) -> &[String] {
        &self.recovery_notes
    }

    // --- Auth ---

    pub fn auth(&self) -> &AuthSession {
        &self.auth
    }

    pub fn is_logged_in(&self) -> bool {
        self.auth.is_logged_in()
    }

    /// Replace token and user atomically as a pair. An identity cannot exist
    /// without a token (and a token is useless without an identity), so if
    /// either half is absent both are cleared, in memory and in storage.
    pub fn set_auth(
        &mut self,
        token: Option<String>,
        user: Option<AuthUser>,
    ) -> anyhow::Result<()> {
        let (token, user) = match (token, user) {
            (Some(t), Some(u)) => (Some(t), Some(u)),
            _ => (None, None),
        };

        match &token {
            Some(t) => self.storage.set(KEY_AUTH_TOKEN, t)?,
            None => self.storage.remove(KEY_AUTH_TOKEN)?,
        }
        match &user {
            Some(u) => self
                .storage
                .set(KEY_AUTH_USER, &serde_json::to_string(u)?)?,
            None => self.storage.remove(KEY_AUTH_USER)?,
        }

        self.auth = AuthSession { token, user };
        Ok(())
    }

    /// Log out: drop the token/user pair everywhere.
    pub fn clear_auth(&mut self) -> anyhow::Result<()> {
        self.set_auth(None, None)
    }

    // --- Chat transcript (memory-only) ---

    pub fn chat(&self) -> &[ChatMessage] {
        &self.chat
    }

    /// Append to the transcript and return it for rendering. Deliberately
    /// not persisted: the conversation resets with the process.
    pub fn append_chat_message(&mut self, message: ChatMessage) -> &[ChatMessage] {
        self.chat.push(message);
        &self.chat
    }

    pub fn clear_chat(&mut self) {
        self.chat.clear();
    }

    // --- Workspaces ---

    pub fn execution(&self) -> &ExecutionWorkspace {
        &self.execution
    }

    pub fn snippet(&self) -> &SnippetWorkspace {
        &self.snippet
    }

    pub fn debug(&self) -> &DebugWorkspace {
        &self.debug
    }

    /// Shallow-merge a partial update into the execution workspace and
    /// persist the full merged record.
    pub fn update_execution(&mut self, update: ExecutionUpdate) -> anyhow::Result<()> {
        if let Some(code) = update.code {
            self.execution.code = code;
        }
        if let Some(language_name) = update.language_name {
            self.execution.language_name = language_name;
        }
        if let Some(output) = update.output {
            self.execution.output = output;
        }
        if let Some(stdin) = update.stdin {
            self.execution.stdin = stdin;
        }
        self.persist_execution()
    }

    /// Shallow-merge a partial update into the snippet-assembly workspace.
    pub fn update_snippet(&mut self, update: SnippetUpdate) -> anyhow::Result<()> {
        if let Some(code) = update.code {
            self.snippet.code = code;
        }
        if let Some(active_language) = update.active_language {
            self.snippet.active_language = active_language;
        }
        if let Some(output) = update.output {
            self.snippet.output = output;
        }
        if let Some(stdin) = update.stdin {
            self.snippet.stdin = stdin;
        }
        self.persist_snippet()
    }

    /// Shallow-merge a partial update into the debug workspace.
    pub fn update_debug(&mut self, update: DebugUpdate) -> anyhow::Result<()> {
        if let Some(user_code) = update.user_code {
            self.debug.user_code = user_code;
        }
        if let Some(selected_problem) = update.selected_problem {
            self.debug.selected_problem = selected_problem;
        }
        if let Some(judge_result) = update.judge_result {
            self.debug.judge_result = judge_result;
        }
        self.persist_debug()
    }

    /// Replace a tool's entire workspace with the template for `language`,
    /// clearing output and stdin. The previous code is discarded on purpose:
    /// it belonged to the old language.
    pub fn reset_for_language(&mut self, tool: Tool, language: &str) -> anyhow::Result<()> {
        match tool {
            Tool::Execution => {
                let option = catalog::execution_language(language)
                    .ok_or_else(|| anyhow::anyhow!("unknown execution language: {language}"))?;
                self.execution = ExecutionWorkspace {
                    code: option.template.to_string(),
                    language_name: option.name.to_string(),
                    output: String::new(),
                    stdin: String::new(),
                };
                self.persist_execution()
            }
            Tool::SnippetAssembly => {
                let option = catalog::snippet_language(language)
                    .ok_or_else(|| anyhow::anyhow!("unknown snippet language: {language}"))?;
                self.snippet = SnippetWorkspace {
                    code: option.template.to_string(),
                    active_language: option.id.to_string(),
                    output: String::new(),
                    stdin: String::new(),
                };
                self.persist_snippet()
            }
            Tool::Debug => anyhow::bail!("the debug workspace has no language templates"),
        }
    }

    fn persist_execution(&self) -> anyhow::Result<()> {
        self.storage
            .set(KEY_CODE_SOLVE, &serde_json::to_string(&self.execution)?)
    }

    fn persist_snippet(&self) -> anyhow::Result<()> {
        self.storage
            .set(KEY_CLICK_TO_CODE, &serde_json::to_string(&self.snippet)?)
    }

    fn persist_debug(&self) -> anyhow::Result<()> {
        self.storage
            .set(KEY_DEBUG_ZONE, &serde_json::to_string(&self.debug)?)
    }
}

/// Read one workspace record, noting corrupt records for the startup notice.
fn load_record<T>(storage: &FileStorage, key: &str, notes: &mut Vec<String>) -> T
where
    T: serde::de::DeserializeOwned + Default,
{
    match parse_or_default(storage.get(key)) {
        Loaded::Stored(value) => value,
        Loaded::Fallback {
            value,
            reason: FallbackReason::Corrupt(e),
        } => {
            notes.push(format!("stored {key} was unreadable ({e}); defaults restored"));
            value
        }
        Loaded::Fallback { value, .. } => value,
    }
}
