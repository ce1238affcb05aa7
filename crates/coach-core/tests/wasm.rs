//! WASM-target tests for coach-core.
//!
//! Runs the EventBus, reducer and ConversationCoordinator flows under
//! wasm32-unknown-unknown via `wasm-pack test --node`.

#![cfg(target_arch = "wasm32")]

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use async_trait::async_trait;
use wasm_bindgen_test::*;

use coach_core::event_bus::EventBus;
use coach_core::labels::{week_label, WEEKLY_LOCK_NOTICE};
use coach_core::ports::*;
use coach_core::session_cache::{SessionCache, SessionStore};
use coach_core::state::{reduce, ChatState, Phase};
use coach_core::{CoachPorts, ConversationCoordinator};
use coach_types::config::CoachConfig;
use coach_types::event::ChatEvent;
use coach_types::message::*;
use coach_types::session::*;
use coach_types::turn::ChatTurn;
use coach_types::Result;

// ─── Mocks ───────────────────────────────────────────────

struct ScriptedRemote {
    turns: RefCell<Vec<ChatTurn>>,
    sent: RefCell<Vec<TurnRequest>>,
}

#[async_trait(?Send)]
impl ConversationPort for ScriptedRemote {
    async fn resolve_or_create_session(&self, _user_id: &str, force_new: bool) -> Result<SessionGrant> {
        let session_type = if force_new { SessionType::General } else { SessionType::Weekly };
        Ok(SessionGrant {
            session: Session {
                thread_id: if force_new { "faq-1" } else { "weekly-1" }.to_string(),
                session_type,
                current_week: 1,
                status: SessionStatus::Active,
                created_at: None,
            },
            is_weekly_in_progress: !force_new,
            display_message: String::new(),
        })
    }

    async fn send_turn(&self, req: TurnRequest) -> Result<ChatTurn> {
        self.sent.borrow_mut().push(req);
        let next = self.turns.borrow_mut().pop();
        Ok(next.unwrap_or_else(|| ChatTurn::reply("Welcome to week 1", 1)))
    }

    async fn list_sessions(&self, _user_id: &str) -> Result<Vec<SessionSummary>> {
        Ok(Vec::new())
    }

    async fn get_transcript(&self, _user_id: &str, _thread_id: &str) -> Result<Vec<Message>> {
        Ok(Vec::new())
    }

    async fn reset_program(&self, user_id: &str) -> Result<SessionGrant> {
        self.resolve_or_create_session(user_id, false).await
    }
}

#[derive(Default)]
struct KvStorage {
    data: RefCell<HashMap<String, Vec<u8>>>,
}

#[async_trait(?Send)]
impl StoragePort for KvStorage {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.data.borrow().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        self.data.borrow_mut().insert(key.to_string(), value.to_vec());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.data.borrow_mut().remove(key);
        Ok(())
    }

    fn backend_name(&self) -> &str {
        "kv"
    }
}

struct NoDelay;

#[async_trait(?Send)]
impl TimerPort for NoDelay {
    async fn sleep(&self, _ms: u64) {}
}

fn coordinator(remote: Rc<ScriptedRemote>) -> (ConversationCoordinator, Rc<SessionCache>, EventBus) {
    let session = Rc::new(SessionCache::new());
    let bus = EventBus::new();
    let coordinator = ConversationCoordinator::new(
        CoachConfig::default(),
        CoachPorts {
            remote,
            storage: Rc::new(KvStorage::default()),
            timer: Rc::new(NoDelay),
            session: session.clone(),
        },
        bus.clone(),
    );
    (coordinator, session, bus)
}

fn scripted() -> Rc<ScriptedRemote> {
    Rc::new(ScriptedRemote {
        turns: RefCell::new(Vec::new()),
        sent: RefCell::new(Vec::new()),
    })
}

// ─── EventBus / reducer ──────────────────────────────────

#[wasm_bindgen_test]
fn event_bus_drains_in_order() {
    let bus = EventBus::new();
    bus.emit(ChatEvent::RestoreStarted);
    bus.emit(ChatEvent::NoticeCleared);
    assert_eq!(
        bus.drain(),
        vec![ChatEvent::RestoreStarted, ChatEvent::NoticeCleared]
    );
    assert!(!bus.has_pending());
}

#[wasm_bindgen_test]
fn reducer_reset_dialog_roundtrip() {
    let shown = reduce(&ChatState::new(), &ChatEvent::ResetRequested);
    assert!(shown.show_reset_dialog);
    let hidden = reduce(&shown, &ChatEvent::ResetDismissed);
    assert!(!hidden.show_reset_dialog);
}

// ─── Coordinator ─────────────────────────────────────────

#[wasm_bindgen_test]
async fn cold_start_sends_single_init_turn() {
    let remote = scripted();
    let (coordinator, session, bus) = coordinator(remote.clone());

    coordinator.start(None).await.unwrap();

    assert_eq!(remote.sent.borrow().len(), 1);
    assert_eq!(remote.sent.borrow()[0].message, INIT_TOKEN);
    assert_eq!(session.current().unwrap().thread_id, "weekly-1");

    let state = coordinator.state();
    assert_eq!(state.title, week_label(1));
    assert_eq!(state.phase(), Phase::Idle { session_type: SessionType::Weekly, locked: true });
    assert!(bus.has_pending());
}

#[wasm_bindgen_test]
async fn weekly_lock_blocks_new_session() {
    let remote = scripted();
    let (coordinator, _, _) = coordinator(remote.clone());
    coordinator.restore_or_start().await.unwrap();

    coordinator.on_new_session_click().await.unwrap();

    assert_eq!(remote.sent.borrow().len(), 1);
    assert_eq!(coordinator.state().notice.as_deref(), Some(WEEKLY_LOCK_NOTICE));
}

#[wasm_bindgen_test]
async fn send_appends_user_and_reply() {
    let remote = scripted();
    remote.turns.borrow_mut().push(ChatTurn::reply("Tell me about it", 1));
    let (coordinator, session, _) = coordinator(remote.clone());
    session.update("weekly-1", SessionType::Weekly);

    coordinator.send_message("I had an urge today").await.unwrap();

    let roles: Vec<Role> = coordinator.state().messages.iter().map(|m| m.role).collect();
    assert_eq!(roles, vec![Role::User, Role::Assistant]);
    assert!(coordinator.state().can_send());
}
