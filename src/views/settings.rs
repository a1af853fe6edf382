use dioxus::prelude::*;

use crate::session::SessionState;
use crate::types::ThemeMode;
use crate::views::landing::ProfileForm;

#[component]
pub fn SettingsModal(
    mut state: Signal<SessionState>,
    theme: Signal<ThemeMode>,
    on_close: EventHandler<()>,
) -> Element {
    // Edits land on a draft; the live profile changes only on Save.
    let draft = use_signal(|| state.peek().profile.clone());

    rsx! {
        div { class: "modal-overlay",
            div { class: "modal settings-modal",
                div { class: "modal-header",
                    h3 { "Settings" }
                    button { class: "icon-btn", onclick: move |_| on_close.call(()), "Close" }
                }

                p { class: "option-label", "Appearance" }
                div { class: "theme-row",
                    button {
                        class: format_args!(
                            "theme-choice {}",
                            if theme() == ThemeMode::Dark { "active" } else { "" }
                        ),
                        onclick: move |_| {
                            let mut theme = theme;
                            theme.set(ThemeMode::Dark);
                        },
                        "Dark"
                    }
                    button {
                        class: format_args!(
                            "theme-choice {}",
                            if theme() == ThemeMode::Light { "active" } else { "" }
                        ),
                        onclick: move |_| {
                            let mut theme = theme;
                            theme.set(ThemeMode::Light);
                        },
                        "Light"
                    }
                }

                p { class: "option-label", "Profile" }
                ProfileForm { draft }

                button {
                    class: "btn btn-primary wide",
                    onclick: move |_| {
                        let profile = draft.peek().clone();
                        state.with_mut(|s| s.profile = profile);
                        on_close.call(());
                    },
                    "Save"
                }
            }
        }
    }
}
