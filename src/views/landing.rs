use dioxus::prelude::*;

use crate::session::SessionState;
use crate::types::{ThemeMode, UserProfile};
use crate::views::shared::{AGE_OPTIONS, GENDER_OPTIONS, INTEREST_SUGGESTIONS, LOCATION_OPTIONS};

#[component]
pub fn LandingView(mut state: Signal<SessionState>, theme: Signal<ThemeMode>) -> Element {
    let mut show_form = use_signal(|| false);
    let draft = use_signal(UserProfile::default);
    let mut form_error = use_signal(|| Option::<&'static str>::None);

    rsx! {
        div { class: "landing",
            header { class: "landing-topbar",
                span { class: "brand-mark", "∞" }
                span { class: "brand-name", "Ghostline" }
                button {
                    class: "icon-btn",
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
            }

            section { class: "hero",
                h1 { "Talk to strangers." }
                h2 { class: "hero-accent", "Leave no trace." }
                p { class: "hero-copy",
                    "Anonymous conversations with people around the world. "
                    "No accounts, no history, no footprints."
                }
                button {
                    class: "btn btn-primary hero-cta",
                    onclick: move |_| show_form.set(true),
                    "Start Chatting"
                }
                div { class: "hero-points",
                    span { "Vanish mode" }
                    span { "Self-destructing images" }
                    span { "Zero sign-up" }
                }
            }

            if show_form() {
                div { class: "modal-overlay",
                    div { class: "modal profile-modal",
                        div { class: "modal-header",
                            h3 { "Before you dive in" }
                            button {
                                class: "icon-btn",
                                onclick: move |_| show_form.set(false),
                                "Close"
                            }
                        }
                        if let Some(error) = form_error() {
                            p { class: "form-error", "{error}" }
                        }
                        ProfileForm { draft }
                        button {
                            class: "btn btn-primary wide",
                            onclick: move |_| {
                                let profile = draft.peek().clone();
                                if let Err(err) = state.with_mut(|s| s.start_chat(profile)) {
                                    form_error.set(Some(err));
                                }
                            },
                            "Start Chatting"
                        }
                    }
                }
            }
        }
    }
}

/// Profile fields shared by the landing modal and the settings panel.
#[component]
pub fn ProfileForm(draft: Signal<UserProfile>) -> Element {
    let mut draft = draft;
    rsx! {
        div { class: "form-stack",
            div { class: "form-field",
                label { "Display Name" }
                input {
                    r#type: "text",
                    value: "{draft().name}",
                    placeholder: "What should we call you?",
                    oninput: move |ev| draft.with_mut(|p| p.name = ev.value()),
                }
            }
            div { class: "form-grid",
                SelectField {
                    label: "Gender",
                    options: GENDER_OPTIONS,
                    value: draft().gender.clone(),
                    on_change: move |value| draft.with_mut(|p| p.gender = value),
                }
                SelectField {
                    label: "Age",
                    options: AGE_OPTIONS,
                    value: draft().age.clone(),
                    on_change: move |value| draft.with_mut(|p| p.age = value),
                }
            }
            SelectField {
                label: "Region",
                options: LOCATION_OPTIONS,
                value: draft().location.clone(),
                on_change: move |value| draft.with_mut(|p| p.location = value),
            }
            div { class: "form-field",
                label { "Interests" }
                input {
                    r#type: "text",
                    value: "{draft().interests}",
                    placeholder: "Music, travel, late-night philosophy...",
                    oninput: move |ev| draft.with_mut(|p| p.interests = ev.value()),
                }
                div { class: "tag-row",
                    for tag in INTEREST_SUGGESTIONS.iter() {
                        InterestTag { tag: *tag, draft }
                    }
                }
            }
        }
    }
}

#[component]
fn InterestTag(tag: &'static str, draft: Signal<UserProfile>) -> Element {
    let mut draft = draft;
    rsx! {
        button {
            class: "tag-chip",
            onclick: move |_| {
                draft
                    .with_mut(|p| {
                        if p.interests.trim().is_empty() {
                            p.interests = tag.to_string();
                        } else if !p.interests.contains(tag) {
                            p.interests = format!("{}, {tag}", p.interests);
                        }
                    })
            },
            "{tag}"
        }
    }
}

#[component]
fn SelectField(
    label: &'static str,
    options: &'static [&'static str],
    value: String,
    on_change: EventHandler<String>,
) -> Element {
    rsx! {
        div { class: "form-field",
            label { "{label}" }
            select {
                onchange: move |ev| on_change.call(ev.value()),
                for opt in options.iter() {
                    option { value: "{opt}", selected: *opt == value, "{opt}" }
                }
            }
        }
    }
}
