// ABOUTME: TUI state types — the active screen and each screen's transient UI state.
// ABOUTME: Durable state lives in the SessionStore; this is cursors, focus, and spinners.

use crate::session::store::{DebugProblem, SessionStore};
use crate::tui::input::EditBuffer;

/// Which screen is showing. Tool screens are gated behind login.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Login,
    Register,
    CodeSolve,
    ClickToCode,
    DebugZone,
    Assistant,
}

/// Focusable fields on the auth forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthField {
    Username,
    Email,
    Password,
}

#[derive(Debug, Default)]
pub struct LoginState {
    pub username: EditBuffer,
    pub password: EditBuffer,
    pub focus_password: bool,
    pub message: String,
    pub is_error: bool,
    pub busy: bool,
}

#[derive(Debug)]
pub struct RegisterState {
    pub username: EditBuffer,
    pub email: EditBuffer,
    pub password: EditBuffer,
    pub focus: AuthField,
    pub message: String,
    pub is_error: bool,
    pub busy: bool,
}

impl Default for RegisterState {
    fn default() -> Self {
        Self {
            username: EditBuffer::new(),
            email: EditBuffer::new(),
            password: EditBuffer::new(),
            focus: AuthField::Username,
            message: String::new(),
            is_error: false,
            busy: false,
        }
    }
}

/// Panels on the execution screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolvePanel {
    Editor,
    Stdin,
}

#[derive(Debug)]
pub struct CodeSolveState {
    pub code: EditBuffer,
    pub stdin: EditBuffer,
    pub focus: SolvePanel,
    pub status: String,
    pub busy: bool,
}

/// Panels on the snippet-assembly screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnippetPanel {
    Snippets,
    Editor,
    Stdin,
}

#[derive(Debug)]
pub struct ClickToCodeState {
    pub code: EditBuffer,
    pub stdin: EditBuffer,
    pub focus: SnippetPanel,
    pub snippet_index: usize,
    pub busy: bool,
}

/// Panels on the debugging screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebugPanel {
    Problems,
    Editor,
}

#[derive(Debug)]
pub struct DebugZoneState {
    pub code: EditBuffer,
    pub focus: DebugPanel,
    pub problems: Vec<DebugProblem>,
    pub problem_index: usize,
    pub fetch_error: Option<String>,
    pub fetch_started: bool,
    pub busy: bool,
}

#[derive(Debug, Default)]
pub struct AssistantState {
    pub input: EditBuffer,
    pub busy: bool,
    pub error: Option<String>,
}

/// All transient UI state, seeded from the session store at startup so the
/// editors open showing whatever survived the last run.
#[derive(Debug)]
pub struct TuiState {
    pub screen: Screen,
    pub login: LoginState,
    pub register: RegisterState,
    pub solve: CodeSolveState,
    pub click: ClickToCodeState,
    pub debug: DebugZoneState,
    pub assistant: AssistantState,
    /// One-line startup notice (recovered records, log failures).
    pub notice: String,
}

impl TuiState {
    pub fn new(store: &SessionStore) -> Self {
        let screen = if store.is_logged_in() {
            Screen::CodeSolve
        } else {
            Screen::Login
        };
        Self {
            screen,
            login: LoginState::default(),
            register: RegisterState::default(),
            solve: CodeSolveState {
                code: EditBuffer::from_text(&store.execution().code),
                stdin: EditBuffer::from_text(&store.execution().stdin),
                focus: SolvePanel::Editor,
                status: String::new(),
                busy: false,
            },
            click: ClickToCodeState {
                code: EditBuffer::from_text(&store.snippet().code),
                stdin: EditBuffer::from_text(&store.snippet().stdin),
                focus: SnippetPanel::Snippets,
                snippet_index: 0,
                busy: false,
            },
            debug: DebugZoneState {
                code: EditBuffer::from_text(&store.debug().user_code),
                focus: DebugPanel::Problems,
                problems: Vec::new(),
                problem_index: 0,
                fetch_error: None,
                fetch_started: false,
                busy: false,
            },
            assistant: AssistantState::default(),
            notice: store.recovery_notes().join("; "),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::storage::FileStorage;
    use crate::session::store::ExecutionUpdate;

    #[test]
    fn starts_on_login_when_not_authenticated() {
        let tmp = tempfile::tempdir().unwrap();
        let store = SessionStore::open(FileStorage::open(tmp.path()).unwrap()).unwrap();
        let state = TuiState::new(&store);
        assert_eq!(state.screen, Screen::Login);
    }

    #[test]
    fn editors_are_seeded_from_the_store() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = SessionStore::open(FileStorage::open(tmp.path()).unwrap()).unwrap();
        store
            .update_execution(ExecutionUpdate {
                code: Some("persisted work".to_string()),
                stdin: Some("in".to_string()),
                ..Default::default()
            })
            .unwrap();

        let state = TuiState::new(&store);
        assert_eq!(state.solve.code.text(), "persisted work");
        assert_eq!(state.solve.stdin.text(), "in");
    }
}
