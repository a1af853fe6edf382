use std::collections::HashSet;
use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use dioxus::events::Key;
use dioxus::prelude::*;
use tracing::warn;

use crate::feed;
use crate::identity::local_identity;
use crate::lifecycle::{self, SenderPhase};
use crate::safety;
use crate::session::{ChatSession, SKIP_RECONNECT_MS, SessionPhase, SessionState};
use crate::store::{self, FailureClass, StoreError, StoreEvent};
use crate::timer::{self, Countdown};
use crate::types::{ImageSettings, Message, MessagePayload, ThemeMode, now_millis};
use crate::views::SettingsModal;
use crate::views::shared::{
    DEFAULT_IMAGE_TIMER, IMAGE_TIMER_OPTIONS, MAX_TEXT_LENGTH, QUICK_REACTIONS, duration_label,
    format_message_timestamp,
};

/// A fatal connection state, rendered as a blocking overlay until reload.
#[derive(Clone, Debug, PartialEq)]
pub enum ConnectionFailure {
    Unconfigured(String),
    Permission,
    Other(String),
}

impl From<&StoreError> for ConnectionFailure {
    fn from(err: &StoreError) -> Self {
        match err.class() {
            FailureClass::Config => ConnectionFailure::Unconfigured(err.to_string()),
            FailureClass::Permission => ConnectionFailure::Permission,
            FailureClass::Transient => ConnectionFailure::Other(err.to_string()),
        }
    }
}

#[component]
pub fn ChatView(mut state: Signal<SessionState>, theme: Signal<ThemeMode>) -> Element {
    let session = use_hook(|| match store::from_env() {
        Ok(backend) => Ok(ChatSession::new(backend, local_identity())),
        Err(err) => Err(ConnectionFailure::from(&err)),
    });
    let connection_error = use_signal(|| session.as_ref().err().cloned());
    let show_settings = use_signal(|| false);
    let input = use_signal(String::new);
    let pending_image = use_signal(|| Option::<String>::None);
    let image_timer = use_signal(|| DEFAULT_IMAGE_TIMER);
    let mut send_error = use_signal(|| Option::<String>::None);

    let snapshot = state();
    let connected = snapshot.phase == SessionPhase::Connected;
    let vanish_mode = snapshot.vanish_mode;

    let skip = move |_| {
        let mut state = state;
        state.with_mut(|s| s.stop_chat());
        spawn(async move {
            tokio::time::sleep(Duration::from_millis(SKIP_RECONNECT_MS)).await;
            state.with_mut(|s| s.reconnect());
        });
    };

    rsx! {
        div { class: "app-shell",
            if let Some(failure) = connection_error() {
                ConnectionErrorOverlay { failure }
            }

            header { class: "chat-header",
                div { class: "header-brand",
                    span { class: "brand-mark", "∞" }
                    div { class: "brand-copy",
                        h1 { "Ghostline" }
                        p { class: "status-line",
                            span { class: format_args!(
                                "status-dot {}",
                                if connected { "online" } else { "offline" }
                            ) }
                            if connected { "{snapshot.counterpart_label()}" } else { "Offline" }
                            if vanish_mode {
                                span { class: "vanish-badge", "Vanish Mode" }
                            }
                        }
                    }
                }
                div { class: "header-actions",
                    button {
                        class: "icon-btn", title: "Toggle Theme",
                        onclick: move |_| {
                            let mut theme = theme;
                            let next = match theme() {
                                ThemeMode::Dark => ThemeMode::Light,
                                ThemeMode::Light => ThemeMode::Dark,
                            };
                            theme.set(next);
                        },
                        if theme() == ThemeMode::Dark { "Light" } else { "Dark" }
                    }
                    button {
                        class: format_args!("icon-btn {}", if vanish_mode { "active" } else { "" }),
                        title: "Toggle Vanish Mode",
                        onclick: move |_| state.with_mut(|s| s.toggle_vanish_mode()),
                        "Vanish"
                    }
                    button {
                        class: "icon-btn", title: "Settings",
                        onclick: move |_| {
                            let mut show_settings = show_settings;
                            show_settings.set(true);
                        },
                        "Settings"
                    }
                    if connected {
                        button {
                            class: "icon-btn danger", title: "End Chat",
                            onclick: move |_| state.with_mut(|s| s.stop_chat()),
                            "End"
                        }
                    } else {
                        button { class: "icon-btn accent", title: "Reconnect", onclick: skip, "New" }
                    }
                    button {
                        class: "icon-btn", title: "Exit to Home",
                        onclick: move |_| state.with_mut(|s| s.exit()),
                        "Exit"
                    }
                }
            }

            main { class: "chat-main",
                if connected {
                    if let Ok(session) = session.clone() {
                        ConnectedFeed {
                            state,
                            session,
                            connection_error,
                            input,
                            pending_image,
                            image_timer,
                            send_error,
                        }
                    }
                } else {
                    div { class: "offline-panel",
                        p { "Chat stopped." }
                        p { class: "text-muted", "Press New to rejoin the room." }
                    }
                }
            }

            if show_settings() {
                SettingsModal {
                    state,
                    theme,
                    on_close: move |_| {
                        let mut show_settings = show_settings;
                        show_settings.set(false);
                    },
                }
            }

            if pending_image().is_some() {
                if let Ok(session) = session.clone() {
                    ImagePreviewModal { session, state, pending_image, image_timer }
                }
            }

            if let Some(message) = send_error() {
                div { class: "send-error-toast",
                    span { "{message}" }
                    button { onclick: move |_| send_error.set(None), "Dismiss" }
                }
            }
        }
    }
}

/// The connected half of the chat screen. Its scope owns the subscription
/// and the 1-second tick, so stop/skip/exit tear both down by unmounting.
#[component]
fn ConnectedFeed(
    state: Signal<SessionState>,
    session: ChatSession,
    connection_error: Signal<Option<ConnectionFailure>>,
    input: Signal<String>,
    pending_image: Signal<Option<String>>,
    image_timer: Signal<Option<u32>>,
    send_error: Signal<Option<String>>,
) -> Element {
    let mut messages = use_signal(Vec::<Message>::new);
    let mut now = use_signal(now_millis);
    let mut pii_pending = use_signal(|| Option::<String>::None);

    // Realtime listener: each snapshot replaces the message list wholesale.
    {
        let session = session.clone();
        use_future(move || {
            let session = session.clone();
            let mut connection_error = connection_error;
            async move {
                match session.connect().await {
                    Ok(mut subscription) => {
                        while let Some(event) = subscription.next_event().await {
                            match event {
                                StoreEvent::Snapshot(list) => {
                                    connection_error.set(None);
                                    messages.set(list);
                                }
                                StoreEvent::Failed(err) => {
                                    connection_error.set(Some(ConnectionFailure::from(&err)));
                                    break;
                                }
                            }
                        }
                    }
                    Err(err) => connection_error.set(Some(ConnectionFailure::from(&err))),
                }
            }
        });
    }

    // Global 1-second tick: advances the projection clock, sweeps my expired
    // vanish messages, and fires the one-shot expire signal for any visible
    // image whose countdown has run out.
    {
        let session = session.clone();
        use_future(move || {
            let session = session.clone();
            async move {
                let mut expire_issued: HashSet<String> = HashSet::new();
                loop {
                    tokio::time::sleep(Duration::from_secs(1)).await;
                    let current = now_millis();
                    now.set(current);

                    let known = messages.peek().clone();
                    session.sweep(&known, current).await;

                    for msg in feed::visible_at(&known, current) {
                        let Some(settings) = msg.image_settings() else {
                            continue;
                        };
                        if lifecycle::request_expire(settings, current)
                            && expire_issued.insert(msg.id.clone())
                        {
                            if let Err(err) = session.expire_image(&msg.id, settings).await {
                                warn!(id = %msg.id, "failed to expire image: {err}");
                            }
                        }
                    }
                }
            }
        });
    }

    let identity = session.identity().to_string();
    let snapshot = state();
    let messages_snapshot = messages();
    let current = now();

    let do_send = {
        let session = session.clone();
        move |text: String| {
            let session = session.clone();
            let vanish_mode = state.peek().vanish_mode;
            let mut input = input;
            let mut send_error = send_error;
            spawn(async move {
                match session.send_text(&text, vanish_mode).await {
                    // Compose text is only cleared once the send succeeded.
                    Ok(()) => input.set(String::new()),
                    Err(err) => send_error.set(Some(format!("Failed to send message: {err}"))),
                }
            });
        }
    };

    let request_send = {
        let do_send = do_send.clone();
        move || {
            let mut pii_pending = pii_pending;
            let text = input.peek().clone();
            if text.trim().is_empty() {
                return;
            }
            if safety::scan(&text).any() {
                pii_pending.set(Some(text));
            } else {
                do_send(text);
            }
        }
    };
    let send_on_click = {
        let request_send = request_send.clone();
        move |_| request_send()
    };
    let send_on_enter = {
        let request_send = request_send.clone();
        move |ev: KeyboardEvent| {
            if ev.key() == Key::Enter {
                request_send();
            }
        }
    };

    let on_image_select = move |ev: FormEvent| {
        let mut pending_image = pending_image;
        let mut image_timer = image_timer;
        spawn(async move {
            let Some(engine) = ev.files() else { return };
            let Some(name) = engine.files().first().cloned() else {
                return;
            };
            match engine.read_file(&name).await {
                Some(bytes) => {
                    pending_image.set(Some(BASE64.encode(bytes)));
                    image_timer.set(DEFAULT_IMAGE_TIMER);
                }
                None => warn!("failed to read selected image"),
            }
        });
    };

    rsx! {
        div { class: "feed-wrap",
            div { class: "message-scroll",
                for msg in feed::visible_at(&messages_snapshot, current) {
                    MessageRow {
                        msg: msg.clone(),
                        is_user: msg.is_mine(&identity),
                        session: session.clone(),
                        now_ms: current,
                        user_name: snapshot.profile.name.clone(),
                        counterpart: snapshot.counterpart_label().to_string(),
                    }
                }
            }

            div { class: "composer",
                button {
                    class: "composer-btn", title: "Voice notes need a recorder device",
                    disabled: true,
                    "Mic"
                }
                label { class: "composer-btn attach",
                    input {
                        r#type: "file",
                        accept: "image/*",
                        class: "hidden-input",
                        onchange: on_image_select,
                    }
                    "Image"
                }
                input {
                    r#type: "text",
                    class: "composer-input",
                    value: "{input}",
                    placeholder: "Type a message...",
                    oninput: move |ev| {
                        let mut input = input;
                        input.set(ev.value());
                    },
                    onkeydown: send_on_enter,
                }
                button {
                    class: "composer-send",
                    disabled: input().trim().is_empty(),
                    onclick: send_on_click,
                    "Send"
                }
            }
            div { class: "composer-footnote", "Anonymous room • Zero trace" }
        }

        if let Some(flagged_text) = pii_pending() {
            div { class: "modal-overlay",
                div { class: "modal pii-modal",
                    h3 { "Safety Warning" }
                    p {
                        "It looks like you might be sharing a phone number or email address. "
                        "Sharing personal information with strangers can be risky."
                    }
                    div { class: "modal-actions",
                        button {
                            class: "btn",
                            onclick: move |_| pii_pending.set(None),
                            "Edit Message"
                        }
                        button {
                            class: "btn btn-danger",
                            onclick: {
                                let do_send = do_send.clone();
                                move |_| {
                                    pii_pending.set(None);
                                    do_send(flagged_text.clone());
                                }
                            },
                            "Send Anyway"
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn MessageRow(
    msg: Message,
    is_user: bool,
    session: ChatSession,
    now_ms: i64,
    user_name: String,
    counterpart: String,
) -> Element {
    if let MessagePayload::System(text) = &msg.payload {
        return rsx! {
            div { class: "system-row", span { class: "system-pill", "{text}" } }
        };
    }

    let author_label = if is_user {
        if user_name.is_empty() {
            "You".to_string()
        } else {
            user_name
        }
    } else {
        counterpart
    };

    let bubble_body = match &msg.payload {
        MessagePayload::Text(text) => rsx! {
            div { class: "text-line",
                if msg.is_vanish() {
                    span { class: "ghost-mark", "✦" }
                }
                TextBubble { text: text.clone() }
                GuardianIndicator { msg: msg.clone() }
            }
        },
        MessagePayload::Image { data, settings } => rsx! {
            SecureImageBubble {
                msg_id: msg.id.clone(),
                data: data.clone(),
                settings: settings.clone(),
                is_user,
                session: session.clone(),
                now_ms,
            }
        },
        MessagePayload::Audio(data) => rsx! {
            AudioBubble { data: data.clone() }
        },
        MessagePayload::System(_) => rsx! {},
    };

    rsx! {
        div { class: format_args!("message-row {}", if is_user { "user" } else { "stranger" }),
            div { class: "message-stack",
                span { class: "author-label", "{author_label}" }
                div { class: format_args!(
                        "bubble {} {}",
                        if is_user { "user" } else { "stranger" },
                        if msg.is_reported { "reported" } else { "" }
                    ),
                    if msg.is_reported {
                        div { class: "reported-mask", span { "Content Hidden" } }
                    }
                    {bubble_body}
                    if !msg.reactions.is_empty() {
                        div { class: "reaction-pills",
                            for (emoji, count) in msg.reactions.iter() {
                                span { class: "reaction-pill",
                                    "{emoji}"
                                    if *count > 1 {
                                        span { class: "reaction-count", "{count}" }
                                    }
                                }
                            }
                        }
                    }
                }
                span { class: "message-meta",
                    if msg.is_vanish() { "Auto-Deletes • " }
                    if let Some(ts) = format_message_timestamp(msg.timestamp_ms) { "{ts}" }
                }
                if !msg.is_reported {
                    div { class: "message-actions",
                        for emoji in QUICK_REACTIONS.iter() {
                            ReactionButton {
                                emoji: *emoji,
                                msg_id: msg.id.clone(),
                                session: session.clone(),
                            }
                        }
                        if !is_user {
                            ReportButton { msg_id: msg.id.clone(), session: session.clone() }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn ReactionButton(emoji: &'static str, msg_id: String, session: ChatSession) -> Element {
    rsx! {
        button {
            class: "action-btn",
            onclick: move |_| session.react(&msg_id, emoji),
            "{emoji}"
        }
    }
}

#[component]
fn ReportButton(msg_id: String, session: ChatSession) -> Element {
    rsx! {
        button {
            class: "action-btn report",
            title: "Report Message",
            onclick: move |_| session.report(&msg_id),
            "Report"
        }
    }
}

#[component]
fn TextBubble(text: String) -> Element {
    let mut expanded = use_signal(|| false);
    if text.len() <= MAX_TEXT_LENGTH {
        return rsx! {
            span { class: "text-body", "{text}" }
        };
    }

    let shown = if expanded() {
        text.clone()
    } else {
        let cut = text
            .char_indices()
            .map(|(idx, _)| idx)
            .take_while(|idx| *idx <= MAX_TEXT_LENGTH)
            .last()
            .unwrap_or(0);
        format!("{}...", &text[..cut])
    };

    rsx! {
        span { class: "text-body",
            "{shown}"
            button {
                class: "read-more",
                onclick: move |_| expanded.set(!expanded()),
                if expanded() { "Read less" } else { "Read more" }
            }
        }
    }
}

#[component]
fn GuardianIndicator(msg: Message) -> Element {
    let Some(guardian) = msg.guardian else {
        return rsx! {};
    };
    let class = match guardian.level {
        crate::types::GuardianLevel::Safe => "guardian safe",
        crate::types::GuardianLevel::Warning => "guardian warning",
        crate::types::GuardianLevel::Danger => "guardian danger",
    };
    let title = guardian.reason.unwrap_or_default();
    rsx! {
        span { class: "{class}", title: "{title}", "⛨" }
    }
}

#[component]
fn AudioBubble(data: String) -> Element {
    rsx! {
        div { class: "audio-bubble",
            audio { controls: true, src: "data:audio/webm;base64,{data}" }
        }
    }
}

/// Self-destructing image bubble. The phase comes straight from the stored
/// settings; the countdown badge is re-derived from `now_ms` every tick.
#[component]
fn SecureImageBubble(
    msg_id: String,
    data: String,
    settings: ImageSettings,
    is_user: bool,
    session: ChatSession,
    now_ms: i64,
) -> Element {
    let mut confirming = use_signal(|| false);

    if settings.is_expired {
        return rsx! {
            div { class: "image-expired",
                span { class: "expired-mark", "✕" }
                span { class: "expired-label", "Image Expired" }
            }
        };
    }

    if is_user {
        let badge = match lifecycle::sender_phase(&settings) {
            SenderPhase::Sent => format!("{} • Sent", duration_label(settings.duration)),
            SenderPhase::SeenCountingDown => {
                match timer::evaluate(&settings, now_ms).and_then(Countdown::seconds) {
                    Some(secs) => format!("{secs}s"),
                    None => "Opened".to_string(),
                }
            }
            SenderPhase::Expired => "Expired".to_string(),
        };
        return rsx! {
            div { class: "image-frame sender",
                img { src: "data:image/jpeg;base64,{data}", alt: "Sent image" }
                span { class: format_args!(
                        "image-badge {}",
                        if settings.is_viewed { "counting" } else { "" }
                    ),
                    "{badge}"
                }
            }
        };
    }

    if !settings.is_viewed {
        let hint = match settings.duration {
            Some(secs) => format!("Tap to allow & view ({secs}s)"),
            None => "Tap to allow & view (No timer)".to_string(),
        };
        return rsx! {
            button {
                class: "image-locked",
                onclick: {
                    let session = session.clone();
                    move |_| {
                        if !confirming() {
                            confirming.set(true);
                            return;
                        }
                        confirming.set(false);
                        let session = session.clone();
                        let msg_id = msg_id.clone();
                        let settings = settings.clone();
                        spawn(async move {
                            if let Err(err) = session.view_image(&msg_id, &settings).await {
                                warn!(id = %msg_id, "failed to mark image viewed: {err}");
                            }
                        });
                    }
                },
                span { class: "lock-glyph", "🔒" }
                span { class: "lock-title", "Sensitive Content" }
                span { class: "lock-hint",
                    if confirming() { "Timer starts immediately. Tap again to confirm" } else { "{hint}" }
                }
            }
        };
    }

    let badge = timer::evaluate(&settings, now_ms).and_then(Countdown::seconds);
    rsx! {
        div { class: "image-frame viewing",
            img { src: "data:image/jpeg;base64,{data}", alt: "Secure content" }
            if let Some(secs) = badge {
                span { class: "image-badge counting", "{secs}s" }
            }
        }
    }
}

#[component]
fn ImagePreviewModal(
    session: ChatSession,
    state: Signal<SessionState>,
    pending_image: Signal<Option<String>>,
    image_timer: Signal<Option<u32>>,
) -> Element {
    let Some(preview) = pending_image() else {
        return rsx! {};
    };

    let send_image = {
        let session = session.clone();
        let preview = preview.clone();
        move |_| {
            let session = session.clone();
            let data = preview.clone();
            let duration = *image_timer.peek();
            let vanish_mode = state.peek().vanish_mode;
            let mut pending_image = pending_image;
            spawn(async move {
                match session.send_image(data, duration, vanish_mode).await {
                    Ok(()) => pending_image.set(None),
                    Err(err) => warn!("failed to send image: {err}"),
                }
            });
        }
    };

    rsx! {
        div { class: "modal-overlay",
            div { class: "modal image-modal",
                div { class: "modal-header",
                    h3 { "Set Self-Destruct Timer" }
                    button {
                        class: "icon-btn",
                        onclick: move |_| {
                            let mut pending_image = pending_image;
                            pending_image.set(None);
                        },
                        "Close"
                    }
                }
                div { class: "image-preview",
                    img { src: "data:image/jpeg;base64,{preview}", alt: "Preview" }
                }
                p { class: "option-label", "Visible Duration" }
                div { class: "timer-options",
                    for (label, value) in IMAGE_TIMER_OPTIONS.iter() {
                        TimerOptionButton {
                            label: *label,
                            value: *value,
                            image_timer,
                        }
                    }
                }
                button { class: "btn btn-primary wide", onclick: send_image, "Send Secure Image" }
            }
        }
    }
}

#[component]
fn TimerOptionButton(
    label: &'static str,
    value: Option<u32>,
    image_timer: Signal<Option<u32>>,
) -> Element {
    let mut image_timer = image_timer;
    rsx! {
        button {
            class: format_args!(
                "timer-option {}",
                if image_timer() == value { "active" } else { "" }
            ),
            onclick: move |_| image_timer.set(value),
            "{label}"
        }
    }
}

#[component]
fn ConnectionErrorOverlay(failure: ConnectionFailure) -> Element {
    let detail = match &failure {
        ConnectionFailure::Permission => rsx! {
            p { class: "error-headline", "The store is rejecting all access." }
            ol { class: "error-steps",
                li { "Open your document-store console." }
                li { "Allow read and write on the messages collection." }
                li { "Restart Ghostline." }
            }
        },
        ConnectionFailure::Unconfigured(detail) => rsx! {
            p { class: "error-headline", "Error: {detail}" }
            p { class: "text-muted",
                "Set STORE_BASE_URL (or GHOSTLINE_STORE=memory) and restart."
            }
        },
        ConnectionFailure::Other(detail) => rsx! {
            p { class: "error-headline", "Error: {detail}" }
            p { class: "text-muted", "Check your connection and restart Ghostline." }
        },
    };

    rsx! {
        div { class: "modal-overlay blocking",
            div { class: "modal error-modal",
                h2 { "Setup Required" }
                {detail}
            }
        }
    }
}
