#[cfg(test)]
mod tests {
    use crate::message::*;
    use crate::session::*;
    use crate::turn::*;
    use crate::event::*;
    use crate::config::*;
    use crate::error::*;

    // ─── Message Tests ───────────────────────────────────────

    #[test]
    fn test_message_constructors() {
        assert_eq!(Message::guide("hi").role, Role::Guide);
        assert_eq!(Message::user("hi").role, Role::User);
        let msg = Message::assistant("hello there");
        assert_eq!(msg.role, Role::Assistant);
        assert_eq!(msg.text, "hello there");
    }

    #[test]
    fn test_role_from_wire_synonyms() {
        assert_eq!(Role::from_wire("user"), Role::User);
        assert_eq!(Role::from_wire("Human"), Role::User);
        assert_eq!(Role::from_wire("assistant"), Role::Assistant);
        assert_eq!(Role::from_wire("AI"), Role::Assistant);
        assert_eq!(Role::from_wire("bot"), Role::Assistant);
        assert_eq!(Role::from_wire("system"), Role::Guide);
        assert_eq!(Role::from_wire(""), Role::Guide);
    }

    #[test]
    fn test_role_serialization() {
        assert_eq!(serde_json::to_string(&Role::Guide).unwrap(), r#""guide""#);
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), r#""user""#);
        assert_eq!(serde_json::to_string(&Role::Assistant).unwrap(), r#""assistant""#);
    }

    #[test]
    fn test_init_token_detection() {
        assert!(is_init_token("__init__"));
        assert!(is_init_token("  __init__\n"));
        assert!(!is_init_token("__init__ please"));
        assert!(!is_init_token("hello"));
    }

    // ─── Session Tests ───────────────────────────────────────

    #[test]
    fn test_session_type_wire_names() {
        assert_eq!(serde_json::to_string(&SessionType::Weekly).unwrap(), r#""WEEKLY""#);
        assert_eq!(serde_json::to_string(&SessionType::General).unwrap(), r#""GENERAL""#);
        assert_eq!(SessionType::Weekly.as_str(), "WEEKLY");
        assert_eq!(SessionType::General.as_str(), "GENERAL");
    }

    #[test]
    fn test_session_type_from_wire() {
        assert_eq!(SessionType::from_wire("GENERAL"), SessionType::General);
        assert_eq!(SessionType::from_wire("general"), SessionType::General);
        assert_eq!(SessionType::from_wire("WEEKLY"), SessionType::Weekly);
        assert_eq!(SessionType::from_wire("whatever"), SessionType::Weekly);
        assert_eq!(SessionType::default(), SessionType::Weekly);
    }

    #[test]
    fn test_session_status_from_wire() {
        assert_eq!(SessionStatus::from_wire("ended"), SessionStatus::Ended);
        assert_eq!(SessionStatus::from_wire("ENDED"), SessionStatus::Ended);
        assert_eq!(SessionStatus::from_wire("active"), SessionStatus::Active);
        assert_eq!(SessionStatus::from_wire(""), SessionStatus::Active);
    }

    #[test]
    fn test_session_is_ended() {
        let mut session = Session {
            thread_id: "t1".to_string(),
            session_type: SessionType::Weekly,
            current_week: 3,
            status: SessionStatus::Active,
            created_at: None,
        };
        assert!(!session.is_ended());
        session.status = SessionStatus::Ended;
        assert!(session.is_ended());
    }

    // ─── Turn Tests ──────────────────────────────────────────

    #[test]
    fn test_chat_turn_reply_defaults() {
        let turn = ChatTurn::reply("Welcome back", 2);
        assert_eq!(turn.assistant_message, Message::assistant("Welcome back"));
        assert_eq!(turn.current_week, 2);
        assert!(!turn.is_session_ended);
        assert!(turn.week_title.is_none());
        assert!(turn.week_goals.is_empty());
        assert!(turn.homework.is_none());
    }

    #[test]
    fn test_stored_homework_saved_on() {
        let stored = StoredHomework::new(Homework {
            description: "Write down one trigger".to_string(),
            examples: vec!["after dinner".to_string()],
        });
        let today = stored.saved_at.date_naive();
        assert!(stored.saved_on(today));
        assert!(!stored.saved_on(today.pred_opt().unwrap()));
    }

    #[test]
    fn test_homework_examples_default() {
        let hw: Homework = serde_json::from_str(r#"{"description":"breathe"}"#).unwrap();
        assert_eq!(hw.description, "breathe");
        assert!(hw.examples.is_empty());
    }

    // ─── Event Tests ─────────────────────────────────────────

    #[test]
    fn test_chat_event_serialization() {
        let event = ChatEvent::TurnStarted { stage: LoadingStage::Thinking };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("TurnStarted"));
        assert!(json.contains("THINKING"));
    }

    #[test]
    fn test_chat_event_message_payload() {
        let event = ChatEvent::MessageAppended { message: Message::guide("Connection failed") };
        let json = serde_json::to_string(&event).unwrap();
        let back: ChatEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }

    // ─── Config Tests ────────────────────────────────────────

    #[test]
    fn test_default_config() {
        let config = CoachConfig::default();
        assert_eq!(config.api.base(), "http://127.0.0.1:8123");
        assert!(config.api.request_timeout_ms.is_none());
        assert_eq!(config.storage.backend, StorageBackendType::Auto);
        assert_eq!(config.schedule.selecting_after_ms, 50_000);
        assert_eq!(config.schedule.applying_after_ms, 35_000);
        assert_eq!(config.schedule.guidance_delay_ms, 2_000);
        assert_eq!(config.program.terminal_week, 10);
    }

    #[test]
    fn test_config_partial_json_uses_defaults() {
        let config = CoachConfig::from_json(r#"{"api":{"base_url":"https://coach.example/"}}"#).unwrap();
        assert_eq!(config.api.base(), "https://coach.example");
        assert_eq!(config.program.terminal_week, 10);
        assert_eq!(config.schedule.guidance_delay_ms, 2_000);
    }

    #[test]
    fn test_config_invalid_json() {
        let err = CoachConfig::from_json("{{nope").unwrap_err();
        assert!(matches!(err, CoachError::Config(_)));
    }

    // ─── Error Tests ─────────────────────────────────────────

    #[test]
    fn test_error_display() {
        assert_eq!(CoachError::Network("offline".to_string()).to_string(), "Network error: offline");
        assert_eq!(
            CoachError::Http { status: 500, body: "boom".to_string() }.to_string(),
            "HTTP 500: boom"
        );
        assert_eq!(CoachError::Timeout(20000).to_string(), "Timeout after 20000ms");
        assert_eq!(
            CoachError::Identity("no storage".to_string()).to_string(),
            "Device identity unavailable: no storage"
        );
        assert_eq!(
            CoachError::JsInterop("JsValue(null)".to_string()).to_string(),
            "JS interop error: JsValue(null)"
        );
    }

    #[test]
    fn test_error_from_serde() {
        let serde_err = serde_json::from_str::<serde_json::Value>("{{invalid}}").unwrap_err();
        let err: CoachError = serde_err.into();
        assert!(matches!(err, CoachError::Serialization(_)));
    }
}
