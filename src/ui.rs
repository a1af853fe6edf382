//! Root component: theme plumbing plus the landing/chat switch.

use dioxus::prelude::*;

use crate::session::{SessionPhase, SessionState};
use crate::theme::theme_definition;
use crate::types::ThemeMode;
use crate::views::{ChatView, LandingView};

const APP_CSS: Asset = asset!("/assets/ghostline.css");

#[component]
pub fn App() -> Element {
    let theme = use_signal(|| ThemeMode::Dark);
    let state = use_signal(SessionState::default);

    rsx! {
        ThemeStyles { theme, vanish_mode: state().vanish_mode }
        if state().phase == SessionPhase::Landing {
            LandingView { state, theme }
        } else {
            ChatView { state, theme }
        }
    }
}

#[component]
fn ThemeStyles(theme: Signal<ThemeMode>, vanish_mode: bool) -> Element {
    let definition = theme_definition(theme(), vanish_mode);
    rsx! {
        document::Link { rel: "stylesheet", href: APP_CSS }
        style { dangerous_inner_html: "{definition.css}" }
    }
}
