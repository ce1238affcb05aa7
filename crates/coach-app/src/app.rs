//! Host-facing handle: owns the event bus and the coordinator slot.
//!
//! The rendering shell calls the command methods from UI handlers and polls
//! `drain_events_json` / `snapshot_json` to repaint.

use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;

use serde::Serialize;
use wasm_bindgen::prelude::*;

use coach_core::event_bus::EventBus;
use coach_core::session_cache::SessionCache;
use coach_core::state::ChatState;
use coach_core::{CoachPorts, ConversationCoordinator};
use coach_platform::storage::open_storage;
use coach_platform::{BrowserTimer, HttpConversationService};
use coach_types::{
    Result,
    config::CoachConfig,
    session::{CurrentThread, SessionSummary},
};

type CoordinatorSlot = Rc<RefCell<Option<Rc<ConversationCoordinator>>>>;

/// Everything the renderer needs for one frame
#[derive(Serialize)]
struct Snapshot {
    state: ChatState,
    current_thread: Option<CurrentThread>,
    directory: Vec<SessionSummary>,
}

#[wasm_bindgen]
pub struct CoachApp {
    config: CoachConfig,
    event_bus: EventBus,
    coordinator: CoordinatorSlot,
}

#[wasm_bindgen]
impl CoachApp {
    /// `config_json` is a serialised `CoachConfig`; missing fields take defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> std::result::Result<CoachApp, JsValue> {
        let config = match config_json.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => CoachConfig::from_json(raw).map_err(to_js)?,
            _ => CoachConfig::default(),
        };
        log::info!(
            "Backend: {} (storage: {:?})",
            config.api.base(),
            config.storage.backend
        );
        Ok(Self {
            config,
            event_bus: EventBus::new(),
            coordinator: Rc::new(RefCell::new(None)),
        })
    }

    /// Open storage, build the coordinator and run the startup flow.
    /// `thread_id` is the navigation target, if any.
    pub fn start(&self, thread_id: Option<String>) {
        if self.coordinator.borrow().is_some() {
            log::warn!("CoachApp already started");
            return;
        }
        let config = self.config.clone();
        let event_bus = self.event_bus.clone();
        let slot = self.coordinator.clone();

        wasm_bindgen_futures::spawn_local(async move {
            let storage = match open_storage(config.storage.backend).await {
                Ok(storage) => storage,
                Err(e) => {
                    log::error!("Storage unavailable: {}", e);
                    return;
                }
            };
            let ports = CoachPorts {
                remote: Rc::new(HttpConversationService::new(config.api.clone())),
                storage,
                timer: Rc::new(BrowserTimer::new()),
                session: Rc::new(SessionCache::new()),
            };
            let coordinator = Rc::new(ConversationCoordinator::new(config, ports, event_bus));
            *slot.borrow_mut() = Some(coordinator.clone());

            if let Err(e) = coordinator.start(thread_id.as_deref()).await {
                log::error!("Startup failed: {}", e);
            }
        });
    }

    pub fn send(&self, text: String) {
        self.spawn("send", move |c| async move { c.send_message(&text).await });
    }

    pub fn new_session(&self) {
        self.spawn("new session", |c| async move { c.on_new_session_click().await });
    }

    pub fn open_thread(&self, thread_id: String) {
        self.spawn("open thread", move |c| async move {
            c.load_specific_session(&thread_id).await
        });
    }

    pub fn refresh_directory(&self) {
        self.spawn("refresh directory", |c| async move { c.refresh_directory().await });
    }

    pub fn request_reset(&self) {
        if let Some(c) = self.current() {
            c.request_reset();
        }
    }

    pub fn dismiss_reset(&self) {
        if let Some(c) = self.current() {
            c.dismiss_reset();
        }
    }

    pub fn confirm_reset(&self) {
        self.spawn("reset", |c| async move { c.confirm_reset().await });
    }

    pub fn clear_notice(&self) {
        if let Some(c) = self.current() {
            c.clear_notice();
        }
    }

    /// Stored homework as JSON, or `null`, for the daily reminder.
    pub fn load_homework(&self) -> js_sys::Promise {
        let coordinator = self.current();
        wasm_bindgen_futures::future_to_promise(async move {
            let Some(c) = coordinator else {
                return Ok(JsValue::NULL);
            };
            match c.homework().load().await.map_err(to_js)? {
                Some(stored) => {
                    let json = serde_json::to_string(&stored)
                        .map_err(|e| JsValue::from_str(&e.to_string()))?;
                    Ok(JsValue::from_str(&json))
                }
                None => Ok(JsValue::NULL),
            }
        })
    }

    /// Read-only transcript of any thread as JSON; the active thread is untouched.
    pub fn view_transcript(&self, thread_id: String) -> js_sys::Promise {
        let coordinator = self.current();
        wasm_bindgen_futures::future_to_promise(async move {
            let Some(c) = coordinator else {
                return Err(JsValue::from_str("app not started"));
            };
            let messages = c.view_transcript(&thread_id).await.map_err(to_js)?;
            let json = serde_json::to_string(&messages)
                .map_err(|e| JsValue::from_str(&e.to_string()))?;
            Ok(JsValue::from_str(&json))
        })
    }

    pub fn clear_homework(&self) {
        self.spawn("clear homework", |c| async move { c.homework().clear().await });
    }

    pub fn snapshot_json(&self) -> String {
        let snapshot = match self.current() {
            Some(c) => Snapshot {
                state: c.state(),
                current_thread: c.current_thread(),
                directory: c.directory().list(),
            },
            None => Snapshot {
                state: ChatState::new(),
                current_thread: None,
                directory: Vec::new(),
            },
        };
        serde_json::to_string(&snapshot).unwrap_or_else(|e| {
            log::error!("Snapshot serialisation failed: {}", e);
            "null".to_string()
        })
    }

    /// Events emitted since the last call, oldest first
    pub fn drain_events_json(&self) -> String {
        let events = self.event_bus.drain();
        serde_json::to_string(&events).unwrap_or_else(|e| {
            log::error!("Event serialisation failed: {}", e);
            "[]".to_string()
        })
    }
}

impl CoachApp {
    fn current(&self) -> Option<Rc<ConversationCoordinator>> {
        self.coordinator.borrow().clone()
    }

    /// Run a coordinator operation on the local executor
    fn spawn<F, Fut>(&self, op: &'static str, f: F)
    where
        F: FnOnce(Rc<ConversationCoordinator>) -> Fut + 'static,
        Fut: Future<Output = Result<()>> + 'static,
    {
        let Some(coordinator) = self.current() else {
            log::warn!("Ignoring {}: app not started", op);
            return;
        };
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(e) = f(coordinator).await {
                log::error!("{} failed: {}", op, e);
            }
        });
    }
}

fn to_js(e: coach_types::CoachError) -> JsValue {
    JsValue::from_str(&e.to_string())
}
