use serde_json::{json, Value};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{info, warn};

use crate::language::Language;
use crate::session::{PendingTranslation, TranslateRejection, TRANSLATION_FAILED_MESSAGE};
use crate::state::AppState;

pub async fn handle_message(
    state: &AppState,
    client_uid: &str,
    text: &str,
    sender: &UnboundedSender<String>,
) -> anyhow::Result<()> {
    let msg: Value = serde_json::from_str(text)?;
    let msg_type = msg.get("type").and_then(|v| v.as_str());

    match msg_type {
        Some("set-input") => {
            handle_set_input(state, client_uid, &msg, sender);
        }
        Some("set-language") => {
            handle_set_language(state, client_uid, &msg, sender);
        }
        Some("translate") => {
            handle_translate(state, client_uid, sender);
        }
        Some("clear") => {
            handle_clear(state, client_uid, sender);
        }
        Some("fetch-languages") => {
            handle_fetch_languages(sender);
        }
        _ => {
            warn!("Unknown message type: {:?}", msg_type);
        }
    }

    Ok(())
}

/// Current session state as JSON, or None for an unknown client.
pub fn state_snapshot(state: &AppState, client_uid: &str) -> Option<Value> {
    state
        .sessions
        .get(client_uid)
        .and_then(|entry| serde_json::to_value(entry.value()).ok())
}

fn push_state(state: &AppState, client_uid: &str, sender: &UnboundedSender<String>) {
    if let Some(snapshot) = state_snapshot(state, client_uid) {
        let _ = sender.send(
            json!({
                "type": "state-update",
                "state": snapshot
            })
            .to_string(),
        );
    }
}

fn handle_set_input(
    state: &AppState,
    client_uid: &str,
    msg: &Value,
    sender: &UnboundedSender<String>,
) {
    let text = msg.get("text").and_then(|v| v.as_str()).unwrap_or("");
    if let Some(mut session) = state.sessions.get_mut(client_uid) {
        session.set_input(text);
    }
    push_state(state, client_uid, sender);
}

fn handle_set_language(
    state: &AppState,
    client_uid: &str,
    msg: &Value,
    sender: &UnboundedSender<String>,
) {
    let requested = msg.get("language").and_then(|v| v.as_str()).unwrap_or("");
    match requested.parse::<Language>() {
        Ok(language) => {
            if let Some(mut session) = state.sessions.get_mut(client_uid) {
                session.set_language(language);
            }
            push_state(state, client_uid, sender);
        }
        Err(_) => {
            warn!("Client {} requested unknown language: {}", client_uid, requested);
        }
    }
}

fn handle_translate(state: &AppState, client_uid: &str, sender: &UnboundedSender<String>) {
    let outcome = match state.sessions.get_mut(client_uid) {
        Some(mut session) => session.begin_translate(),
        None => {
            warn!("Translate request for unknown session {}", client_uid);
            return;
        }
    };

    match outcome {
        Ok(pending) => {
            // The Pending snapshot goes out before any network response
            // can exist.
            push_state(state, client_uid, sender);
            spawn_translation(state, client_uid, pending, sender.clone());
        }
        Err(TranslateRejection::AlreadyPending) => {
            // The trigger is disabled client-side; a second translate is a
            // protocol violation, not a user error.
            warn!("Translate request from {} while one is in flight", client_uid);
        }
        Err(rejection) => {
            info!("Rejected translate from {}: {}", client_uid, rejection);
            push_state(state, client_uid, sender);
        }
    }
}

/// Run the translation off the connection loop and settle the session when
/// it resolves. The sequence token keeps a superseded response from
/// overwriting a newer request's state.
fn spawn_translation(
    state: &AppState,
    client_uid: &str,
    pending: PendingTranslation,
    sender: UnboundedSender<String>,
) {
    let translator = state.translator.clone();
    let sessions = state.sessions.clone();
    let uid = client_uid.to_string();

    let task = tokio::spawn(async move {
        let result = translator.translate(&pending.text, pending.target).await;

        let applied = match sessions.get_mut(&uid) {
            Some(mut session) => match result {
                Ok(translated) => session.settle_success(pending.seq, translated),
                Err(_) => session.settle_failure(pending.seq, TRANSLATION_FAILED_MESSAGE),
            },
            // Client disconnected while the call was in flight.
            None => false,
        };

        if applied {
            if let Some(entry) = sessions.get(&uid) {
                if let Ok(snapshot) = serde_json::to_value(entry.value()) {
                    let _ = sender.send(
                        json!({
                            "type": "state-update",
                            "state": snapshot
                        })
                        .to_string(),
                    );
                }
            }
        }
    });

    state
        .translation_tasks
        .insert(client_uid.to_string(), task.abort_handle());
}

fn handle_clear(state: &AppState, client_uid: &str, sender: &UnboundedSender<String>) {
    if let Some(mut session) = state.sessions.get_mut(client_uid) {
        session.clear();
    }
    push_state(state, client_uid, sender);
}

fn handle_fetch_languages(sender: &UnboundedSender<String>) {
    let _ = sender.send(
        json!({
            "type": "language-list",
            "languages": Language::catalog()
        })
        .to_string(),
    );
}
