// ABOUTME: The TUI update model — key handling, backend task dispatch, and
// ABOUTME: applying completions to the session store on the single UI task.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tokio::sync::mpsc;

use crate::api::client::Backend;
use crate::api::types::LoginResponse;
use crate::catalog;
use crate::session::ActivityLog;
use crate::session::store::{
    AuthUser, ChatMessage, DebugProblem, DebugUpdate, ExecutionUpdate, JudgeResult, Sender,
    SessionStore, SnippetUpdate, Tool,
};
use crate::tui::input::{EditBuffer, apply_key};
use crate::tui::state::{AuthField, DebugPanel, Screen, SnippetPanel, SolvePanel, TuiState};

/// Completions of spawned backend calls, delivered over an mpsc channel and
/// applied one at a time. Errors arrive pre-rendered as display strings.
#[derive(Debug)]
pub enum ApiEvent {
    LoginFinished(Result<LoginResponse, String>),
    RegisterFinished(Result<String, String>),
    RunFinished {
        tool: Tool,
        output: Result<String, String>,
    },
    ChatFinished(Result<String, String>),
    ProblemsLoaded(Result<Vec<DebugProblem>, String>),
}

/// Whether the event loop should keep running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// The application model: owns the session store and all UI state. Every
/// mutation funnels through here on the UI task, so a completion that
/// arrives mid-edit can never interleave with a keystroke.
pub struct Model {
    pub state: TuiState,
    pub store: SessionStore,
    backend: Arc<dyn Backend>,
    api_tx: mpsc::Sender<ApiEvent>,
    log: Option<ActivityLog>,
    /// Timestamp of the last Ctrl+C press for double-tap quit detection.
    last_ctrl_c: Option<Instant>,
}

impl Model {
    pub fn new(
        store: SessionStore,
        backend: Arc<dyn Backend>,
        api_tx: mpsc::Sender<ApiEvent>,
        log: Option<ActivityLog>,
    ) -> Self {
        let state = TuiState::new(&store);
        Self {
            state,
            store,
            backend,
            api_tx,
            log,
            last_ctrl_c: None,
        }
    }

    fn record_log(&mut self, kind: &str, detail: &str) {
        if let Some(log) = self.log.as_mut() {
            if let Err(e) = log.record(kind, detail) {
                self.state.notice = format!("activity log failed: {e}");
            }
        }
    }

    // --- Key events ---

    pub fn handle_key(&mut self, key: KeyEvent) -> anyhow::Result<Flow> {
        if key.kind == KeyEventKind::Release {
            return Ok(Flow::Continue);
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        if ctrl && key.code == KeyCode::Char('c') {
            if let Some(last) = self.last_ctrl_c {
                if last.elapsed() < Duration::from_secs(2) {
                    return Ok(Flow::Quit);
                }
            }
            self.last_ctrl_c = Some(Instant::now());
            self.state.notice = "Press Ctrl+C again to quit".to_string();
            return Ok(Flow::Continue);
        }

        if self.store.is_logged_in() {
            match key.code {
                KeyCode::F(1) => {
                    self.switch_screen(Screen::CodeSolve);
                    return Ok(Flow::Continue);
                }
                KeyCode::F(2) => {
                    self.switch_screen(Screen::ClickToCode);
                    return Ok(Flow::Continue);
                }
                KeyCode::F(3) => {
                    self.switch_screen(Screen::DebugZone);
                    return Ok(Flow::Continue);
                }
                KeyCode::F(4) => {
                    self.switch_screen(Screen::Assistant);
                    return Ok(Flow::Continue);
                }
                KeyCode::Char('l') if ctrl => {
                    self.logout()?;
                    return Ok(Flow::Continue);
                }
                _ => {}
            }
        }

        match self.state.screen {
            Screen::Login => self.handle_login_key(key)?,
            Screen::Register => self.handle_register_key(key)?,
            Screen::CodeSolve => self.handle_solve_key(key)?,
            Screen::ClickToCode => self.handle_click_key(key)?,
            Screen::DebugZone => self.handle_debug_key(key)?,
            Screen::Assistant => self.handle_assistant_key(key)?,
        }
        Ok(Flow::Continue)
    }

    pub fn handle_paste(&mut self, text: String) -> anyhow::Result<()> {
        match self.state.screen {
            Screen::Login => {
                let buf = if self.state.login.focus_password {
                    &mut self.state.login.password
                } else {
                    &mut self.state.login.username
                };
                buf.insert_str(&text);
            }
            Screen::Register => {
                let reg = &mut self.state.register;
                let buf = match reg.focus {
                    AuthField::Username => &mut reg.username,
                    AuthField::Email => &mut reg.email,
                    AuthField::Password => &mut reg.password,
                };
                buf.insert_str(&text);
            }
            Screen::CodeSolve => {
                match self.state.solve.focus {
                    SolvePanel::Editor => self.state.solve.code.insert_str(&text),
                    SolvePanel::Stdin => self.state.solve.stdin.insert_str(&text),
                }
                self.sync_solve_buffers()?;
            }
            Screen::ClickToCode => {
                match self.state.click.focus {
                    SnippetPanel::Editor => self.state.click.code.insert_str(&text),
                    SnippetPanel::Stdin => self.state.click.stdin.insert_str(&text),
                    SnippetPanel::Snippets => {}
                }
                self.sync_click_buffers()?;
            }
            Screen::DebugZone => {
                if self.state.debug.focus == DebugPanel::Editor {
                    self.state.debug.code.insert_str(&text);
                    self.sync_debug_buffer()?;
                }
            }
            Screen::Assistant => self.state.assistant.input.insert_str(&text),
        }
        Ok(())
    }

    fn switch_screen(&mut self, screen: Screen) {
        self.state.screen = screen;
        if screen == Screen::DebugZone {
            self.ensure_problems();
        }
    }

    // --- Auth screens ---

    fn handle_login_key(&mut self, key: KeyEvent) -> anyhow::Result<()> {
        match key.code {
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Down | KeyCode::Up => {
                self.state.login.focus_password = !self.state.login.focus_password;
            }
            KeyCode::Enter => self.submit_login(),
            KeyCode::Char('r') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.state.screen = Screen::Register;
            }
            KeyCode::Esc => self.state.login.message.clear(),
            _ => {
                let login = &mut self.state.login;
                let buf = if login.focus_password {
                    &mut login.password
                } else {
                    &mut login.username
                };
                apply_key(buf, key, false);
            }
        }
        Ok(())
    }

    fn submit_login(&mut self) {
        if self.state.login.busy {
            return;
        }
        let username = self.state.login.username.text().to_string();
        let password = self.state.login.password.text().to_string();
        if username.is_empty() || password.is_empty() {
            self.state.login.message = "Username and password are required.".to_string();
            self.state.login.is_error = true;
            return;
        }
        self.state.login.busy = true;
        self.state.login.message.clear();
        self.state.login.is_error = false;

        let backend = self.backend.clone();
        let tx = self.api_tx.clone();
        tokio::spawn(async move {
            let result = backend
                .login(&username, &password)
                .await
                .map_err(|e| e.to_string());
            let _ = tx.send(ApiEvent::LoginFinished(result)).await;
        });
    }

    fn handle_register_key(&mut self, key: KeyEvent) -> anyhow::Result<()> {
        match key.code {
            KeyCode::Tab | KeyCode::Down => {
                self.state.register.focus = match self.state.register.focus {
                    AuthField::Username => AuthField::Email,
                    AuthField::Email => AuthField::Password,
                    AuthField::Password => AuthField::Username,
                };
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.state.register.focus = match self.state.register.focus {
                    AuthField::Username => AuthField::Password,
                    AuthField::Email => AuthField::Username,
                    AuthField::Password => AuthField::Email,
                };
            }
            KeyCode::Enter => self.submit_register(),
            KeyCode::Esc => self.state.screen = Screen::Login,
            _ => {
                let reg = &mut self.state.register;
                let buf = match reg.focus {
                    AuthField::Username => &mut reg.username,
                    AuthField::Email => &mut reg.email,
                    AuthField::Password => &mut reg.password,
                };
                apply_key(buf, key, false);
            }
        }
        Ok(())
    }

    fn submit_register(&mut self) {
        if self.state.register.busy {
            return;
        }
        let username = self.state.register.username.text().to_string();
        let email = self.state.register.email.text().to_string();
        let password = self.state.register.password.text().to_string();
        if username.is_empty() || email.is_empty() || password.is_empty() {
            self.state.register.message = "All fields are required.".to_string();
            self.state.register.is_error = true;
            return;
        }
        self.state.register.busy = true;
        self.state.register.message.clear();
        self.state.register.is_error = false;

        let backend = self.backend.clone();
        let tx = self.api_tx.clone();
        tokio::spawn(async move {
            let result = backend
                .register(&username, &email, &password)
                .await
                .map_err(|e| e.to_string());
            let _ = tx.send(ApiEvent::RegisterFinished(result)).await;
        });
    }

    fn logout(&mut self) -> anyhow::Result<()> {
        self.store.clear_auth()?;
        self.backend.set_token(None);
        self.state.debug.problems.clear();
        self.state.debug.fetch_started = false;
        self.state.debug.fetch_error = None;
        self.state.screen = Screen::Login;
        self.state.login.message = "Logged out.".to_string();
        self.state.login.is_error = false;
        Ok(())
    }

    // --- CodeSolve screen ---

    fn handle_solve_key(&mut self, key: KeyEvent) -> anyhow::Result<()> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('r') if ctrl => self.run_solve()?,
            KeyCode::Char('p') if ctrl => self.cycle_execution_language()?,
            // Tab types indentation in the editors, so Esc moves focus.
            KeyCode::Esc => {
                self.state.solve.focus = match self.state.solve.focus {
                    SolvePanel::Editor => SolvePanel::Stdin,
                    SolvePanel::Stdin => SolvePanel::Editor,
                };
            }
            _ => {
                let changed = match self.state.solve.focus {
                    SolvePanel::Editor => apply_key(&mut self.state.solve.code, key, true),
                    SolvePanel::Stdin => apply_key(&mut self.state.solve.stdin, key, true),
                };
                if changed {
                    self.sync_solve_buffers()?;
                }
            }
        }
        Ok(())
    }

    /// Mirror the solve editors into the store (write-through per edit).
    fn sync_solve_buffers(&mut self) -> anyhow::Result<()> {
        self.store.update_execution(ExecutionUpdate {
            code: Some(self.state.solve.code.text().to_string()),
            stdin: Some(self.state.solve.stdin.text().to_string()),
            ..Default::default()
        })
    }

    fn cycle_execution_language(&mut self) -> anyhow::Result<()> {
        let current = &self.store.execution().language_name;
        let index = catalog::EXECUTION_LANGUAGES
            .iter()
            .position(|l| l.name == current.as_str())
            .unwrap_or(0);
        let next = &catalog::EXECUTION_LANGUAGES[(index + 1) % catalog::EXECUTION_LANGUAGES.len()];
        self.store.reset_for_language(Tool::Execution, next.name)?;
        self.state.solve.code = EditBuffer::from_text(&self.store.execution().code);
        self.state.solve.stdin = EditBuffer::new();
        self.state.solve.status.clear();
        Ok(())
    }

    fn run_solve(&mut self) -> anyhow::Result<()> {
        if self.state.solve.busy {
            return Ok(());
        }
        self.state.solve.busy = true;
        self.state.solve.status = "Submitting...".to_string();
        self.store.update_execution(ExecutionUpdate {
            output: Some(String::new()),
            ..Default::default()
        })?;

        let ws = self.store.execution().clone();
        let language = catalog::execution_language(&ws.language_name)
            .unwrap_or(&catalog::EXECUTION_LANGUAGES[0]);
        self.record_log("run", &format!("execution: {}", language.name));

        let language_id = language.id;
        let backend = self.backend.clone();
        let tx = self.api_tx.clone();
        tokio::spawn(async move {
            let output = backend
                .execute(&ws.code, language_id, &ws.stdin)
                .await
                .map_err(|e| e.to_string());
            let _ = tx
                .send(ApiEvent::RunFinished {
                    tool: Tool::Execution,
                    output,
                })
                .await;
        });
        Ok(())
    }

    // --- ClickToCode screen ---

    fn handle_click_key(&mut self, key: KeyEvent) -> anyhow::Result<()> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('r') if ctrl => self.run_click()?,
            KeyCode::Char('p') if ctrl => self.cycle_snippet_language()?,
            KeyCode::Esc => {
                self.state.click.focus = match self.state.click.focus {
                    SnippetPanel::Snippets => SnippetPanel::Editor,
                    SnippetPanel::Editor => SnippetPanel::Stdin,
                    SnippetPanel::Stdin => SnippetPanel::Snippets,
                };
            }
            _ if self.state.click.focus == SnippetPanel::Snippets => {
                let count = catalog::snippets_for(&self.store.snippet().active_language).len();
                match key.code {
                    KeyCode::Up => {
                        self.state.click.snippet_index =
                            self.state.click.snippet_index.saturating_sub(1);
                    }
                    KeyCode::Down if count > 0 => {
                        self.state.click.snippet_index =
                            (self.state.click.snippet_index + 1).min(count - 1);
                    }
                    KeyCode::Enter => self.insert_selected_snippet()?,
                    _ => {}
                }
            }
            _ => {
                let changed = match self.state.click.focus {
                    SnippetPanel::Editor => apply_key(&mut self.state.click.code, key, true),
                    SnippetPanel::Stdin => apply_key(&mut self.state.click.stdin, key, true),
                    SnippetPanel::Snippets => false,
                };
                if changed {
                    self.sync_click_buffers()?;
                }
            }
        }
        Ok(())
    }

    fn sync_click_buffers(&mut self) -> anyhow::Result<()> {
        self.store.update_snippet(SnippetUpdate {
            code: Some(self.state.click.code.text().to_string()),
            stdin: Some(self.state.click.stdin.text().to_string()),
            ..Default::default()
        })
    }

    fn insert_selected_snippet(&mut self) -> anyhow::Result<()> {
        let snippets = catalog::snippets_for(&self.store.snippet().active_language);
        if let Some(snippet) = snippets.get(self.state.click.snippet_index) {
            self.state.click.code.insert_str(snippet.code);
            self.state.click.focus = SnippetPanel::Editor;
            self.sync_click_buffers()?;
        }
        Ok(())
    }

    fn cycle_snippet_language(&mut self) -> anyhow::Result<()> {
        let current = &self.store.snippet().active_language;
        let index = catalog::SNIPPET_LANGUAGES
            .iter()
            .position(|l| l.id == current.as_str())
            .unwrap_or(0);
        let next = &catalog::SNIPPET_LANGUAGES[(index + 1) % catalog::SNIPPET_LANGUAGES.len()];
        self.store.reset_for_language(Tool::SnippetAssembly, next.id)?;
        self.state.click.code = EditBuffer::from_text(&self.store.snippet().code);
        self.state.click.stdin = EditBuffer::new();
        self.state.click.snippet_index = 0;
        Ok(())
    }

    fn run_click(&mut self) -> anyhow::Result<()> {
        if self.state.click.busy {
            return Ok(());
        }
        let ws = self.store.snippet().clone();
        let Some(language) = catalog::snippet_language(&ws.active_language) else {
            self.store.update_snippet(SnippetUpdate {
                output: Some("Unsupported language.".to_string()),
                ..Default::default()
            })?;
            return Ok(());
        };
        self.state.click.busy = true;
        self.store.update_snippet(SnippetUpdate {
            output: Some("Executing...".to_string()),
            ..Default::default()
        })?;
        self.record_log("run", &format!("snippet-assembly: {}", language.id));

        let judge_id = language.judge_id;
        let backend = self.backend.clone();
        let tx = self.api_tx.clone();
        tokio::spawn(async move {
            let output = backend
                .execute(&ws.code, judge_id, &ws.stdin)
                .await
                .map_err(|e| e.to_string());
            let _ = tx
                .send(ApiEvent::RunFinished {
                    tool: Tool::SnippetAssembly,
                    output,
                })
                .await;
        });
        Ok(())
    }

    // --- DebugZone screen ---

    fn ensure_problems(&mut self) {
        if self.state.debug.fetch_started {
            return;
        }
        if !self.store.is_logged_in() {
            self.state.debug.fetch_error =
                Some("Please log in to view debug problems.".to_string());
            return;
        }
        self.state.debug.fetch_started = true;
        self.state.debug.fetch_error = None;

        let backend = self.backend.clone();
        let tx = self.api_tx.clone();
        tokio::spawn(async move {
            let result = backend.debug_problems().await.map_err(|e| e.to_string());
            let _ = tx.send(ApiEvent::ProblemsLoaded(result)).await;
        });
    }

    fn handle_debug_key(&mut self, key: KeyEvent) -> anyhow::Result<()> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('r') if ctrl => self.check_fix()?,
            KeyCode::Char('f') if ctrl => {
                // Manual refetch, e.g. after a network failure.
                self.state.debug.fetch_started = false;
                self.ensure_problems();
            }
            KeyCode::Esc => {
                self.state.debug.focus = match self.state.debug.focus {
                    DebugPanel::Problems => DebugPanel::Editor,
                    DebugPanel::Editor => DebugPanel::Problems,
                };
            }
            _ if self.state.debug.focus == DebugPanel::Problems => match key.code {
                KeyCode::Up => {
                    self.state.debug.problem_index =
                        self.state.debug.problem_index.saturating_sub(1);
                }
                KeyCode::Down if !self.state.debug.problems.is_empty() => {
                    self.state.debug.problem_index = (self.state.debug.problem_index + 1)
                        .min(self.state.debug.problems.len() - 1);
                }
                KeyCode::Enter => self.select_problem()?,
                _ => {}
            },
            _ => {
                if apply_key(&mut self.state.debug.code, key, true) {
                    self.sync_debug_buffer()?;
                }
            }
        }
        Ok(())
    }

    fn sync_debug_buffer(&mut self) -> anyhow::Result<()> {
        self.store.update_debug(DebugUpdate {
            user_code: Some(self.state.debug.code.text().to_string()),
            ..Default::default()
        })
    }

    /// Choosing a challenge seeds the editor with its broken code and
    /// discards the previous verdict.
    fn select_problem(&mut self) -> anyhow::Result<()> {
        let Some(problem) = self
            .state
            .debug
            .problems
            .get(self.state.debug.problem_index)
            .cloned()
        else {
            return Ok(());
        };
        self.store.update_debug(DebugUpdate {
            user_code: Some(problem.code_with_error.clone()),
            selected_problem: Some(Some(problem.clone())),
            judge_result: Some(None),
        })?;
        self.state.debug.code = EditBuffer::from_text(&problem.code_with_error);
        self.state.debug.focus = DebugPanel::Editor;
        Ok(())
    }

    fn check_fix(&mut self) -> anyhow::Result<()> {
        if self.state.debug.busy {
            return Ok(());
        }
        let Some(problem) = self.store.debug().selected_problem.clone() else {
            return Ok(());
        };
        self.store.update_debug(DebugUpdate {
            judge_result: Some(None),
            ..Default::default()
        })?;

        let Some(language_id) = catalog::judge_language_id(&problem.language) else {
            self.store.update_debug(DebugUpdate {
                judge_result: Some(Some(JudgeResult {
                    output: "Unsupported language.".to_string(),
                    status: "Error".to_string(),
                    is_success: false,
                })),
                ..Default::default()
            })?;
            return Ok(());
        };

        self.state.debug.busy = true;
        self.record_log("challenge-check", &problem.title);

        let code = self.store.debug().user_code.clone();
        let backend = self.backend.clone();
        let tx = self.api_tx.clone();
        tokio::spawn(async move {
            let output = backend
                .execute(&code, language_id, "")
                .await
                .map_err(|e| e.to_string());
            let _ = tx
                .send(ApiEvent::RunFinished {
                    tool: Tool::Debug,
                    output,
                })
                .await;
        });
        Ok(())
    }

    // --- Assistant screen ---

    fn handle_assistant_key(&mut self, key: KeyEvent) -> anyhow::Result<()> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Enter if key.modifiers.contains(KeyModifiers::ALT) => {
                self.state.assistant.input.insert_char('\n');
            }
            KeyCode::Enter => self.send_chat(),
            KeyCode::Char('x') if ctrl => {
                self.store.clear_chat();
                self.state.assistant.error = None;
            }
            _ => {
                apply_key(&mut self.state.assistant.input, key, false);
            }
        }
        Ok(())
    }

    fn send_chat(&mut self) {
        if self.state.assistant.busy {
            return;
        }
        let text = self.state.assistant.input.text().trim().to_string();
        if text.is_empty() {
            return;
        }
        self.state.assistant.input.clear();
        self.state.assistant.busy = true;
        self.state.assistant.error = None;
        self.store.append_chat_message(ChatMessage {
            text,
            sender: Sender::User,
        });
        self.record_log("chat", "message sent");

        let transcript = self.store.chat().to_vec();
        let backend = self.backend.clone();
        let tx = self.api_tx.clone();
        tokio::spawn(async move {
            let result = backend.chat(&transcript).await.map_err(|e| e.to_string());
            let _ = tx.send(ApiEvent::ChatFinished(result)).await;
        });
    }

    // --- Backend completions ---

    pub fn handle_api(&mut self, event: ApiEvent) -> anyhow::Result<()> {
        match event {
            ApiEvent::LoginFinished(result) => {
                self.state.login.busy = false;
                match result {
                    Ok(resp) => {
                        let user = AuthUser {
                            id: resp.id,
                            username: resp.username.clone(),
                            email: resp.email,
                        };
                        self.store.set_auth(Some(resp.token.clone()), Some(user))?;
                        self.backend.set_token(Some(resp.token));
                        self.state.login.password.clear();
                        self.state.login.message = "Login successful!".to_string();
                        self.state.login.is_error = false;
                        self.record_log("login", &resp.username);
                        self.switch_screen(Screen::CodeSolve);
                    }
                    Err(e) => {
                        self.state.login.message = format!("Login failed: {e}");
                        self.state.login.is_error = true;
                    }
                }
            }
            ApiEvent::RegisterFinished(result) => {
                self.state.register.busy = false;
                match result {
                    Ok(message) => {
                        self.state.register.message = message;
                        self.state.register.is_error = false;
                    }
                    Err(e) => {
                        self.state.register.message = format!("Registration failed: {e}");
                        self.state.register.is_error = true;
                    }
                }
            }
            ApiEvent::RunFinished { tool, output } => match tool {
                Tool::Execution => self.finish_solve_run(output)?,
                Tool::SnippetAssembly => self.finish_click_run(output)?,
                Tool::Debug => self.finish_fix_check(output)?,
            },
            ApiEvent::ChatFinished(result) => {
                self.state.assistant.busy = false;
                match result {
                    Ok(reply) => {
                        self.store.append_chat_message(ChatMessage {
                            text: reply,
                            sender: Sender::Ai,
                        });
                    }
                    Err(e) => {
                        let message = format!("Sorry, an error occurred. Please try again. ({e})");
                        self.state.assistant.error = Some(message.clone());
                        self.store.append_chat_message(ChatMessage {
                            text: message,
                            sender: Sender::Ai,
                        });
                    }
                }
            }
            ApiEvent::ProblemsLoaded(result) => match result {
                Ok(problems) => {
                    self.state.debug.problems = problems;
                    self.state.debug.problem_index = 0;
                    self.state.debug.fetch_error = None;
                }
                Err(e) => {
                    self.state.debug.fetch_error =
                        Some(format!("Failed to load debug problems: {e}"));
                }
            },
        }
        Ok(())
    }

    fn finish_solve_run(&mut self, output: Result<String, String>) -> anyhow::Result<()> {
        self.state.solve.busy = false;
        match output {
            Ok(text) => {
                self.state.solve.status = classify_run_status(&text).to_string();
                self.store.update_execution(ExecutionUpdate {
                    output: Some(text),
                    ..Default::default()
                })?;
            }
            Err(e) => {
                let message = format!("Backend Error: {e}");
                self.state.solve.status = message.clone();
                self.store.update_execution(ExecutionUpdate {
                    output: Some(message),
                    ..Default::default()
                })?;
            }
        }
        Ok(())
    }

    fn finish_click_run(&mut self, output: Result<String, String>) -> anyhow::Result<()> {
        self.state.click.busy = false;
        let text = match output {
            Ok(text) if text.is_empty() => "Execution finished with no output.".to_string(),
            Ok(text) => text,
            Err(e) => format!("Error: {e}"),
        };
        self.store.update_snippet(SnippetUpdate {
            output: Some(text),
            ..Default::default()
        })
    }

    fn finish_fix_check(&mut self, output: Result<String, String>) -> anyhow::Result<()> {
        self.state.debug.busy = false;
        let language = self
            .store
            .debug()
            .selected_problem
            .as_ref()
            .map(|p| p.language.clone())
            .unwrap_or_default();
        let result = match output {
            Ok(text) => classify_fix(&language, &text),
            Err(e) => JudgeResult {
                output: format!("Backend Error: {e}"),
                status: "Error".to_string(),
                is_success: false,
            },
        };
        self.store.update_debug(DebugUpdate {
            judge_result: Some(Some(result)),
            ..Default::default()
        })
    }
}

/// Status label for an execution run, keyed off the judge proxy's output
/// prefix conventions.
pub fn classify_run_status(output: &str) -> &'static str {
    if output.starts_with("Error:") || output.starts_with("Compile Error:") {
        "Runtime/Compile Error"
    } else if output.starts_with("Status:") {
        "Completed with Status"
    } else {
        "Success"
    }
}

/// Verdict for a debugging-challenge fix attempt. The per-language output
/// probes match what the challenge bank's reference solutions print.
pub fn classify_fix(language: &str, output: &str) -> JudgeResult {
    let language = language.to_lowercase();
    let is_success = output.contains("Success")
        || (language == "java" && output.contains("Hello Java"))
        || (language == "python" && output.contains('6'));
    let status = if is_success {
        "Success!"
    } else if output.contains("Error") || output.contains("Compile Error") {
        "Failed (Error)"
    } else {
        "Failed (Incorrect Output)"
    };
    JudgeResult {
        output: output.to_string(),
        status: status.to_string(),
        is_success,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    use crate::api::types::LoginResponse;
    use crate::session::storage::FileStorage;

    /// Backend stub with canned responses and switchable failures.
    #[derive(Default)]
    struct StubBackend {
        token: Mutex<Option<String>>,
        fail_chat: bool,
        fail_execute: bool,
        execute_output: String,
    }

    #[async_trait]
    impl Backend for StubBackend {
        fn set_token(&self, token: Option<String>) {
            *self.token.lock().unwrap() = token;
        }

        async fn login(&self, username: &str, _password: &str) -> anyhow::Result<LoginResponse> {
            Ok(LoginResponse {
                token: "stub-token".to_string(),
                id: 1,
                username: username.to_string(),
                email: format!("{username}@example.com"),
            })
        }

        async fn register(
            &self,
            _username: &str,
            _email: &str,
            _password: &str,
        ) -> anyhow::Result<String> {
            Ok("Registration successful! Please login.".to_string())
        }

        async fn execute(
            &self,
            _source_code: &str,
            _language_id: u32,
            _stdin: &str,
        ) -> anyhow::Result<String> {
            if self.fail_execute {
                anyhow::bail!("503 - judge unavailable");
            }
            Ok(self.execute_output.clone())
        }

        async fn chat(&self, _transcript: &[ChatMessage]) -> anyhow::Result<String> {
            if self.fail_chat {
                anyhow::bail!("500 - assistant unavailable");
            }
            Ok("stub reply".to_string())
        }

        async fn debug_problems(&self) -> anyhow::Result<Vec<DebugProblem>> {
            Ok(vec![DebugProblem {
                id: 1,
                title: "Fix the greeting".to_string(),
                description: "It should print Hello Java.".to_string(),
                language: "java".to_string(),
                code_with_error: "System.out.println(\"Helo Java\");".to_string(),
                solution_code: None,
            }])
        }
    }

    struct Fixture {
        model: Model,
        rx: mpsc::Receiver<ApiEvent>,
        backend: Arc<StubBackend>,
        _tmp: tempfile::TempDir,
    }

    fn fixture_with(backend: StubBackend) -> Fixture {
        let tmp = tempfile::tempdir().unwrap();
        let store = SessionStore::open(FileStorage::open(tmp.path()).unwrap()).unwrap();
        let backend = Arc::new(backend);
        let (tx, rx) = mpsc::channel(16);
        let model = Model::new(store, backend.clone(), tx, None);
        Fixture {
            model,
            rx,
            backend,
            _tmp: tmp,
        }
    }

    fn fixture() -> Fixture {
        fixture_with(StubBackend::default())
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    async fn login(fx: &mut Fixture) {
        fx.model.state.login.username.set_text("ada");
        fx.model.state.login.password.set_text("pw");
        fx.model.handle_key(key(KeyCode::Enter)).unwrap();
        let event = fx.rx.recv().await.unwrap();
        fx.model.handle_api(event).unwrap();
    }

    #[tokio::test]
    async fn login_flow_sets_auth_and_switches_screen() {
        let mut fx = fixture();
        assert_eq!(fx.model.state.screen, Screen::Login);
        login(&mut fx).await;

        assert!(fx.model.store.is_logged_in());
        assert_eq!(fx.model.state.screen, Screen::CodeSolve);
        assert_eq!(
            fx.backend.token.lock().unwrap().as_deref(),
            Some("stub-token")
        );
        assert_eq!(fx.model.state.login.message, "Login successful!");
    }

    #[tokio::test]
    async fn empty_login_is_rejected_locally() {
        let mut fx = fixture();
        fx.model.handle_key(key(KeyCode::Enter)).unwrap();
        assert!(fx.model.state.login.is_error);
        assert!(!fx.model.state.login.busy);
    }

    #[tokio::test]
    async fn logout_clears_auth_and_returns_to_login() {
        let mut fx = fixture();
        login(&mut fx).await;
        fx.model.handle_key(ctrl('l')).unwrap();
        assert!(!fx.model.store.is_logged_in());
        assert_eq!(fx.model.state.screen, Screen::Login);
        assert!(fx.backend.token.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn typing_in_editor_writes_through_to_store() {
        let mut fx = fixture();
        login(&mut fx).await;
        let before = fx.model.store.execution().code.clone();
        fx.model.handle_key(key(KeyCode::Char('x'))).unwrap();
        assert_eq!(fx.model.store.execution().code, format!("{before}x"));
    }

    #[tokio::test]
    async fn cycling_language_resets_workspace_to_template() {
        let mut fx = fixture();
        login(&mut fx).await;
        // Default is JavaScript; next in the catalog is Python.
        fx.model.handle_key(ctrl('p')).unwrap();
        assert_eq!(fx.model.store.execution().language_name, "Python");
        assert_eq!(fx.model.store.execution().code, "print('Hello World')");
        assert_eq!(fx.model.state.solve.code.text(), "print('Hello World')");
    }

    #[tokio::test]
    async fn run_flow_writes_output_and_success_status() {
        let mut fx = fixture_with(StubBackend {
            execute_output: "hello from judge\n".to_string(),
            ..Default::default()
        });
        login(&mut fx).await;
        fx.model.handle_key(ctrl('r')).unwrap();
        assert_eq!(fx.model.state.solve.status, "Submitting...");

        let event = fx.rx.recv().await.unwrap();
        fx.model.handle_api(event).unwrap();
        assert_eq!(fx.model.store.execution().output, "hello from judge\n");
        assert_eq!(fx.model.state.solve.status, "Success");
        assert!(!fx.model.state.solve.busy);
    }

    #[tokio::test]
    async fn failed_run_surfaces_backend_error_in_output() {
        let mut fx = fixture_with(StubBackend {
            fail_execute: true,
            ..Default::default()
        });
        login(&mut fx).await;
        fx.model.handle_key(ctrl('r')).unwrap();
        let event = fx.rx.recv().await.unwrap();
        fx.model.handle_api(event).unwrap();
        assert!(
            fx.model
                .store
                .execution()
                .output
                .starts_with("Backend Error:")
        );
    }

    #[tokio::test]
    async fn chat_round_trip_appends_both_messages() {
        let mut fx = fixture();
        login(&mut fx).await;
        fx.model.handle_key(key(KeyCode::F(4))).unwrap();
        fx.model.state.assistant.input.set_text("explain recursion");
        fx.model.handle_key(key(KeyCode::Enter)).unwrap();

        let event = fx.rx.recv().await.unwrap();
        fx.model.handle_api(event).unwrap();

        let chat = fx.model.store.chat();
        assert_eq!(chat.len(), 2);
        assert_eq!(chat[0].sender, Sender::User);
        assert_eq!(chat[0].text, "explain recursion");
        assert_eq!(chat[1].sender, Sender::Ai);
        assert_eq!(chat[1].text, "stub reply");
    }

    #[tokio::test]
    async fn chat_failure_is_appended_as_assistant_message() {
        let mut fx = fixture_with(StubBackend {
            fail_chat: true,
            ..Default::default()
        });
        login(&mut fx).await;
        fx.model.handle_key(key(KeyCode::F(4))).unwrap();
        fx.model.state.assistant.input.set_text("hi");
        fx.model.handle_key(key(KeyCode::Enter)).unwrap();

        let event = fx.rx.recv().await.unwrap();
        fx.model.handle_api(event).unwrap();

        let chat = fx.model.store.chat();
        assert_eq!(chat.len(), 2);
        assert!(chat[1].text.starts_with("Sorry, an error occurred"));
        assert!(fx.model.state.assistant.error.is_some());
    }

    #[tokio::test]
    async fn visiting_debug_zone_fetches_problems_once() {
        let mut fx = fixture();
        login(&mut fx).await;
        fx.model.handle_key(key(KeyCode::F(3))).unwrap();
        let event = fx.rx.recv().await.unwrap();
        fx.model.handle_api(event).unwrap();
        assert_eq!(fx.model.state.debug.problems.len(), 1);

        // Switching away and back must not refetch.
        fx.model.handle_key(key(KeyCode::F(1))).unwrap();
        fx.model.handle_key(key(KeyCode::F(3))).unwrap();
        assert!(fx.rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn selecting_a_problem_seeds_editor_and_clears_verdict() {
        let mut fx = fixture();
        login(&mut fx).await;
        fx.model.handle_key(key(KeyCode::F(3))).unwrap();
        let event = fx.rx.recv().await.unwrap();
        fx.model.handle_api(event).unwrap();

        fx.model.handle_key(key(KeyCode::Enter)).unwrap();
        let debug = fx.model.store.debug();
        assert_eq!(debug.user_code, "System.out.println(\"Helo Java\");");
        assert!(debug.selected_problem.is_some());
        assert!(debug.judge_result.is_none());
        assert_eq!(fx.model.state.debug.focus, DebugPanel::Editor);
    }

    #[tokio::test]
    async fn check_fix_classifies_java_success() {
        let mut fx = fixture_with(StubBackend {
            execute_output: "Hello Java\n".to_string(),
            ..Default::default()
        });
        login(&mut fx).await;
        fx.model.handle_key(key(KeyCode::F(3))).unwrap();
        let event = fx.rx.recv().await.unwrap();
        fx.model.handle_api(event).unwrap();
        fx.model.handle_key(key(KeyCode::Enter)).unwrap();

        fx.model.handle_key(ctrl('r')).unwrap();
        let event = fx.rx.recv().await.unwrap();
        fx.model.handle_api(event).unwrap();

        let result = fx.model.store.debug().judge_result.clone().unwrap();
        assert!(result.is_success);
        assert_eq!(result.status, "Success!");
    }

    #[test]
    fn classify_fix_covers_all_verdicts() {
        assert!(classify_fix("javascript", "Success").is_success);
        assert!(classify_fix("java", "Hello Java").is_success);
        assert!(classify_fix("python", "6").is_success);
        assert_eq!(
            classify_fix("java", "Compile Error: missing ;").status,
            "Failed (Error)"
        );
        assert_eq!(
            classify_fix("javascript", "wrong answer").status,
            "Failed (Incorrect Output)"
        );
    }

    #[test]
    fn classify_run_status_matches_output_prefixes() {
        assert_eq!(classify_run_status("hi"), "Success");
        assert_eq!(classify_run_status("Error: boom"), "Runtime/Compile Error");
        assert_eq!(
            classify_run_status("Compile Error: nope"),
            "Runtime/Compile Error"
        );
        assert_eq!(
            classify_run_status("Status: Time Limit Exceeded"),
            "Completed with Status"
        );
    }
}
