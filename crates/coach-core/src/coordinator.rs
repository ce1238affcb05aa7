//! Conversation coordinator — the session lifecycle state machine.
//!
//! Decides which remote thread the device is attached to, whether it is a
//! WEEKLY program or a GENERAL thread, whether input is allowed, and merges
//! server replies into the observable [`ChatState`].
//!
//! All operations take `&self` and are meant to be spawned on a single-thread
//! executor (`wasm_bindgen_futures::spawn_local`). The in-flight guard lives
//! in the state record, so a second send while one is pending is a no-op
//! instead of a queued request.

use std::cell::RefCell;
use std::rc::Rc;

use futures::future::{self, Either};
use futures::pin_mut;

use coach_types::{
    CoachError, Result,
    config::CoachConfig,
    event::{ChatEvent, LoadingStage},
    message::{is_init_token, Message, INIT_TOKEN},
    session::{CurrentThread, SessionGrant, SessionStatus, SessionType},
    turn::ChatTurn,
};
use crate::directory::ThreadDirectory;
use crate::event_bus::EventBus;
use crate::homework::HomeworkStore;
use crate::identity::DeviceIdentity;
use crate::labels::*;
use crate::ports::*;
use crate::session_cache::SessionStore;
use crate::state::{reduce, ChatState};

/// Adapters the coordinator is built from
#[derive(Clone)]
pub struct CoachPorts {
    pub remote: Rc<dyn ConversationPort>,
    pub storage: Rc<dyn StoragePort>,
    pub timer: Rc<dyn TimerPort>,
    pub session: Rc<dyn SessionStore>,
}

pub struct ConversationCoordinator {
    config: CoachConfig,
    remote: Rc<dyn ConversationPort>,
    timer: Rc<dyn TimerPort>,
    session: Rc<dyn SessionStore>,
    identity: DeviceIdentity,
    homework: HomeworkStore,
    directory: Rc<ThreadDirectory>,
    state: RefCell<ChatState>,
    event_bus: EventBus,
}

impl ConversationCoordinator {
    pub fn new(config: CoachConfig, ports: CoachPorts, event_bus: EventBus) -> Self {
        Self {
            config,
            remote: ports.remote,
            timer: ports.timer,
            session: ports.session,
            identity: DeviceIdentity::new(ports.storage.clone()),
            homework: HomeworkStore::new(ports.storage),
            directory: Rc::new(ThreadDirectory::new()),
            state: RefCell::new(ChatState::new()),
            event_bus,
        }
    }

    /// Snapshot of the observable state
    pub fn state(&self) -> ChatState {
        self.state.borrow().clone()
    }

    pub fn directory(&self) -> Rc<ThreadDirectory> {
        self.directory.clone()
    }

    pub fn homework(&self) -> &HomeworkStore {
        &self.homework
    }

    pub fn current_thread(&self) -> Option<CurrentThread> {
        self.session.current()
    }

    // ─── Entry points ────────────────────────────────────────

    /// App start: open `target_thread` when navigation supplied one,
    /// otherwise restore (or create) the device's session.
    pub async fn start(&self, target_thread: Option<&str>) -> Result<()> {
        match target_thread {
            Some(thread_id) => {
                // The drawer entry carries the date used for the title
                self.refresh_directory().await?;
                self.load_specific_session(thread_id).await
            }
            None => {
                self.restore_or_start().await?;
                self.refresh_directory().await
            }
        }
    }

    /// Cold start without a target thread.
    pub async fn restore_or_start(&self) -> Result<()> {
        if self.state.borrow().is_busy() {
            return Ok(());
        }
        self.dispatch(ChatEvent::RestoreStarted);
        let user_id = match self.identity.id().await {
            Ok(id) => id,
            Err(e) => {
                self.dispatch(ChatEvent::RestoreFinished);
                return Err(e);
            }
        };

        match self.remote.resolve_or_create_session(&user_id, false).await {
            Ok(grant) => {
                self.bind_session(&grant);
                self.dispatch(ChatEvent::TitleChanged {
                    title: session_label(&grant.session),
                });
                let ended = grant.session.is_ended();
                let thread_id = grant.session.thread_id;

                let transcript = self.remote.get_transcript(&user_id, &thread_id).await;
                let guidance = match transcript {
                    Ok(history) if !history.is_empty() => {
                        log::debug!("Restored {} messages for {}", history.len(), thread_id);
                        self.dispatch(ChatEvent::MessagesReplaced { messages: history });
                        false
                    }
                    other => {
                        if let Err(e) = other {
                            log::warn!("Transcript for {} unavailable: {}", thread_id, e);
                        }
                        // An ended thread stays quiet; otherwise ask for the opening line
                        if ended {
                            false
                        } else {
                            self.opening_turn(&user_id, INIT_FAILED).await
                        }
                    }
                };
                self.dispatch(ChatEvent::RestoreFinished);
                if guidance {
                    self.play_restart_guidance().await;
                }
            }
            Err(e) => {
                log::warn!("Session resolution failed: {}", e);
                self.session.clear();
                self.dispatch(ChatEvent::MessageAppended {
                    message: Message::guide(RESTORE_FAILED),
                });
                self.dispatch(ChatEvent::RestoreFinished);
            }
        }
        Ok(())
    }

    /// Continue a historical thread picked from the drawer.
    ///
    /// Always GENERAL, whatever the server thinks the thread was; binds the
    /// session cache directly without a session-init call.
    pub async fn load_specific_session(&self, thread_id: &str) -> Result<()> {
        if self.reject_while_locked("open a thread") || self.state.borrow().is_busy() {
            return Ok(());
        }
        self.dispatch(ChatEvent::TurnStarted {
            stage: LoadingStage::Thinking,
        });
        let user_id = self.identity_or_release().await?;

        let summary = self.directory.find_by_id(thread_id);
        let ended = summary
            .as_ref()
            .is_some_and(|s| s.status == SessionStatus::Ended);

        self.session.update(thread_id, SessionType::General);
        self.dispatch(ChatEvent::ThreadOpened { ended });
        self.dispatch(ChatEvent::TitleChanged {
            title: LOADING_TITLE.to_string(),
        });

        match self.remote.get_transcript(&user_id, thread_id).await {
            Ok(history) => {
                self.dispatch(ChatEvent::MessagesReplaced { messages: history });
                self.dispatch(ChatEvent::TitleChanged {
                    title: opened_thread_label(summary.as_ref().map(|s| s.date.as_str())),
                });
            }
            Err(e) => {
                log::warn!("Transcript for {} unavailable: {}", thread_id, e);
                self.dispatch(ChatEvent::MessagesReplaced {
                    messages: vec![Message::guide(TRANSCRIPT_FAILED)],
                });
            }
        }
        self.dispatch(ChatEvent::TurnFinished);
        log::info!("Opened thread {} as GENERAL", thread_id);
        Ok(())
    }

    /// Send one user message.
    ///
    /// The user bubble is appended before the request goes out and is kept
    /// even if the request fails; the failure shows up as a guide message.
    pub async fn send_message(&self, text: &str) -> Result<()> {
        if text.trim().is_empty() || !self.state.borrow().can_send() {
            return Ok(());
        }

        if !is_init_token(text) {
            self.dispatch(ChatEvent::MessageAppended {
                message: Message::user(text),
            });
        }
        self.dispatch(ChatEvent::TurnStarted {
            stage: LoadingStage::Thinking,
        });

        let user_id = self.identity_or_release().await?;

        let guidance = match self.resolve_thread(&user_id).await {
            Ok(thread) => {
                // A lazily resolved thread may already be over
                if self.state.borrow().is_session_ended {
                    log::info!("Not sending into ended thread {}", thread.thread_id);
                    self.dispatch(ChatEvent::MessageAppended {
                        message: Message::guide(SESSION_ENDED_NOTICE),
                    });
                    false
                } else {
                    match self.exchange_with_schedule(&user_id, thread, text).await {
                        Ok(turn) => self.apply_chat_turn(turn).await,
                        Err(e) => {
                            self.report_send_failure(&e);
                            false
                        }
                    }
                }
            }
            Err(e) => {
                self.report_send_failure(&e);
                false
            }
        };
        self.dispatch(ChatEvent::TurnFinished);

        if guidance {
            self.play_restart_guidance().await;
        }
        Ok(())
    }

    /// "New session" button: allocate a brand-new GENERAL thread.
    pub async fn on_new_session_click(&self) -> Result<()> {
        if self.reject_while_locked("start a new session") || self.state.borrow().is_busy() {
            return Ok(());
        }
        self.dispatch(ChatEvent::TurnStarted {
            stage: LoadingStage::Thinking,
        });
        let user_id = self.identity_or_release().await?;

        self.dispatch(ChatEvent::NewSessionPrepared {
            placeholder_title: NEW_SESSION_TITLE.to_string(),
        });

        let mut guidance = false;
        match self.start_fresh_thread(&user_id).await {
            Ok(turn) => {
                guidance = self.apply_chat_turn(turn).await;
                match self.sync_directory(&user_id).await {
                    Ok(()) => {
                        // A server-assigned display title wins over the placeholder
                        let entry = self
                            .session
                            .current()
                            .and_then(|current| self.directory.find_by_id(&current.thread_id));
                        if let Some(entry) = entry {
                            self.dispatch(ChatEvent::TitleChanged { title: entry.title });
                        }
                    }
                    Err(e) => log::warn!("Directory refresh failed: {}", e),
                }
            }
            Err(e) => {
                log::warn!("New session failed: {}", e);
                self.dispatch(ChatEvent::MessagesReplaced {
                    messages: vec![Message::guide(CONNECTION_FAILED)],
                });
                if let Err(e) = self.sync_directory(&user_id).await {
                    log::warn!("Directory refresh failed: {}", e);
                }
            }
        }
        self.dispatch(ChatEvent::TurnFinished);

        if guidance {
            self.play_restart_guidance().await;
        }
        Ok(())
    }

    // ─── Reset with confirmation ─────────────────────────────

    /// Reset button: ask for confirmation first.
    pub fn request_reset(&self) {
        if self.state.borrow().is_busy() {
            return;
        }
        self.dispatch(ChatEvent::ResetRequested);
    }

    pub fn dismiss_reset(&self) {
        self.dispatch(ChatEvent::ResetDismissed);
    }

    /// Run the reset, but only when a confirmation is pending.
    pub async fn confirm_reset(&self) -> Result<()> {
        if !self.state.borrow().show_reset_dialog {
            return Ok(());
        }
        self.dispatch(ChatEvent::ResetDismissed);
        self.reset_program().await
    }

    async fn reset_program(&self) -> Result<()> {
        if self.state.borrow().is_busy() {
            return Ok(());
        }
        self.dispatch(ChatEvent::TurnStarted {
            stage: LoadingStage::Thinking,
        });
        let user_id = self.identity_or_release().await?;

        let mut guidance = false;
        match self.remote.reset_program(&user_id).await {
            Ok(grant) => {
                log::info!("Program reset onto thread {}", grant.session.thread_id);
                self.bind_session(&grant);
                self.dispatch(ChatEvent::TitleChanged {
                    title: session_label(&grant.session),
                });
                let greeting = if grant.display_message.trim().is_empty() {
                    DEFAULT_RESET_GREETING.to_string()
                } else {
                    grant.display_message.clone()
                };
                self.dispatch(ChatEvent::MessagesReplaced {
                    messages: vec![Message::guide(greeting)],
                });

                match self.exchange(&user_id, INIT_TOKEN).await {
                    Ok(turn) => guidance = self.apply_chat_turn(turn).await,
                    Err(e) => {
                        log::warn!("Opening turn after reset failed: {}", e);
                        self.dispatch(ChatEvent::MessageAppended {
                            message: Message::guide(format!("{}: {}", RESET_START_FAILED, e)),
                        });
                    }
                }
                if let Err(e) = self.sync_directory(&user_id).await {
                    log::warn!("Directory refresh failed: {}", e);
                }
            }
            Err(e) => {
                log::warn!("Reset failed: {}", e);
                self.dispatch(ChatEvent::MessageAppended {
                    message: Message::guide(format!("{}: {}", RESET_FAILED, e)),
                });
            }
        }
        self.dispatch(ChatEvent::TurnFinished);

        if guidance {
            self.play_restart_guidance().await;
        }
        Ok(())
    }

    // ─── Directory ───────────────────────────────────────────

    /// Replace the thread directory with the server's list.
    /// Transport failures only log; the stale list stays.
    pub async fn refresh_directory(&self) -> Result<()> {
        let user_id = self.identity.id().await?;
        if let Err(e) = self.sync_directory(&user_id).await {
            log::warn!("Directory refresh failed: {}", e);
        }
        Ok(())
    }

    async fn sync_directory(&self, user_id: &str) -> Result<()> {
        let sessions = self.remote.list_sessions(user_id).await?;
        let count = sessions.len();
        self.directory.replace(sessions);
        self.dispatch(ChatEvent::DirectoryRefreshed { count });
        Ok(())
    }

    // ─── History viewer ──────────────────────────────────────

    /// Read-only transcript of any thread, for the history screen.
    ///
    /// Leaves the current thread, the session type and the weekly lock
    /// alone, so it also works while a weekly program is running.
    pub async fn view_transcript(&self, thread_id: &str) -> Result<Vec<Message>> {
        let user_id = self.identity.id().await?;
        self.remote.get_transcript(&user_id, thread_id).await
    }

    // ─── Notices ─────────────────────────────────────────────

    pub fn clear_notice(&self) {
        self.dispatch(ChatEvent::NoticeCleared);
    }

    fn reject_while_locked(&self, action: &str) -> bool {
        if !self.state.borrow().is_weekly_locked {
            return false;
        }
        log::info!("Refusing to {} while a weekly program is running", action);
        self.dispatch(ChatEvent::NoticeRaised {
            text: WEEKLY_LOCK_NOTICE.to_string(),
        });
        true
    }

    // ─── Internals ───────────────────────────────────────────

    fn dispatch(&self, event: ChatEvent) {
        let next = reduce(&self.state.borrow(), &event);
        *self.state.borrow_mut() = next;
        self.event_bus.emit(event);
    }

    /// Device id for an operation that already raised the busy flag;
    /// the flag is dropped again when the id is unavailable.
    async fn identity_or_release(&self) -> Result<String> {
        match self.identity.id().await {
            Ok(id) => Ok(id),
            Err(e) => {
                self.dispatch(ChatEvent::TurnFinished);
                Err(e)
            }
        }
    }

    fn report_send_failure(&self, e: &CoachError) {
        log::warn!("Turn failed: {}", e);
        self.dispatch(ChatEvent::MessageAppended {
            message: Message::guide(format!("{}: {}", SEND_FAILED, e)),
        });
    }

    /// Point the session cache at a server-granted thread and publish its fields.
    fn bind_session(&self, grant: &SessionGrant) {
        let session = &grant.session;
        // An ended thread never holds the lock, whatever the server flag says
        let locked = grant.is_weekly_in_progress && !session.is_ended();
        self.session.update(&session.thread_id, session.session_type);
        self.dispatch(ChatEvent::SessionApplied {
            session_type: session.session_type,
            current_week: session.current_week,
            ended: session.is_ended(),
            locked,
        });
        log::info!(
            "Bound thread {} ({}, week {}, locked: {})",
            session.thread_id,
            session.session_type.as_str(),
            session.current_week,
            locked
        );
    }

    /// The cached thread, or a lazily resolved one
    async fn resolve_thread(&self, user_id: &str) -> Result<CurrentThread> {
        if let Some(current) = self.session.current() {
            return Ok(current);
        }
        let grant = self.remote.resolve_or_create_session(user_id, false).await?;
        self.bind_session(&grant);
        Ok(CurrentThread {
            thread_id: grant.session.thread_id,
            session_type: grant.session.session_type,
        })
    }

    async fn exchange(&self, user_id: &str, text: &str) -> Result<ChatTurn> {
        let thread = self.resolve_thread(user_id).await?;
        self.remote
            .send_turn(TurnRequest {
                user_id: user_id.to_string(),
                thread_id: thread.thread_id,
                message: text.to_string(),
                session_type: thread.session_type,
            })
            .await
    }

    /// Send one turn on an already resolved thread, with the loading-stage
    /// schedule running alongside.
    /// The schedule is dropped (cancelled) as soon as the reply arrives.
    async fn exchange_with_schedule(
        &self,
        user_id: &str,
        thread: CurrentThread,
        text: &str,
    ) -> Result<ChatTurn> {
        let request = self.remote.send_turn(TurnRequest {
            user_id: user_id.to_string(),
            thread_id: thread.thread_id,
            message: text.to_string(),
            session_type: thread.session_type,
        });
        let schedule = self.loading_schedule(thread.session_type);
        pin_mut!(request, schedule);

        match future::select(request, schedule).await {
            Either::Left((result, _)) => result,
            Either::Right(((), request)) => request.await,
        }
    }

    async fn loading_schedule(&self, session_type: SessionType) {
        // GENERAL replies are quick; they keep the first stage
        if session_type == SessionType::General {
            return;
        }
        let schedule = &self.config.schedule;
        self.timer.sleep(schedule.selecting_after_ms).await;
        self.dispatch(ChatEvent::LoadingStageChanged {
            stage: LoadingStage::Selecting,
        });
        self.timer.sleep(schedule.applying_after_ms).await;
        self.dispatch(ChatEvent::LoadingStageChanged {
            stage: LoadingStage::Applying,
        });
    }

    /// Ask the agent for its opening line on the current thread.
    /// Returns whether restart guidance is due.
    async fn opening_turn(&self, user_id: &str, failure_text: &str) -> bool {
        match self.exchange(user_id, INIT_TOKEN).await {
            Ok(turn) => self.apply_chat_turn(turn).await,
            Err(e) => {
                log::warn!("Opening turn failed: {}", e);
                self.dispatch(ChatEvent::MessageAppended {
                    message: Message::guide(failure_text),
                });
                false
            }
        }
    }

    /// Force a new GENERAL thread and fetch its opening turn
    async fn start_fresh_thread(&self, user_id: &str) -> Result<ChatTurn> {
        let grant = self.remote.resolve_or_create_session(user_id, true).await?;
        self.bind_session(&grant);
        self.exchange(user_id, INIT_TOKEN).await
    }

    /// Merge a server reply into local state.
    ///
    /// Returns true when the final program week just ended and the restart
    /// guidance should follow once the request guard is released.
    async fn apply_chat_turn(&self, turn: ChatTurn) -> bool {
        let session_type = self.state.borrow().session_type;

        self.dispatch(ChatEvent::MessageAppended {
            message: turn.assistant_message,
        });
        self.dispatch(ChatEvent::ProgressUpdated {
            current_week: turn.current_week,
            goals: turn.week_goals,
        });

        if turn.week_title.as_deref().is_some_and(|t| !t.trim().is_empty()) {
            let title = match session_type {
                SessionType::Weekly => week_label(turn.current_week),
                SessionType::General => GENERAL_TITLE.to_string(),
            };
            self.dispatch(ChatEvent::TitleChanged { title });
        }

        if let Some(homework) = turn.homework {
            if let Err(e) = self.homework.save(&homework).await {
                log::warn!("Failed to store homework: {}", e);
            }
        }

        if !turn.is_session_ended {
            return false;
        }

        self.dispatch(ChatEvent::SessionEnded);
        log::info!("Session ended at week {}", turn.current_week);
        if let Err(e) = self.refresh_directory().await {
            log::warn!("Directory refresh skipped: {}", e);
        }

        session_type == SessionType::Weekly
            && turn.current_week == self.config.program.terminal_week
    }

    async fn play_restart_guidance(&self) {
        let delay = self.config.schedule.guidance_delay_ms;
        for (i, text) in RESTART_GUIDANCE.iter().enumerate() {
            if i > 0 {
                self.timer.sleep(delay).await;
            }
            self.dispatch(ChatEvent::MessageAppended {
                message: Message::guide(*text),
            });
        }
    }
}
