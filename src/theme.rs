use crate::types::ThemeMode;

pub struct ThemeDefinition {
    pub css: &'static str,
}

/// Resolve the active palette. Vanish mode forces the dark palette and adds
/// its purple glow on top.
pub fn theme_definition(mode: ThemeMode, vanish_mode: bool) -> ThemeDefinition {
    let css = match (mode, vanish_mode) {
        (_, true) => VANISH_THEME,
        (ThemeMode::Dark, false) => DARK_THEME,
        (ThemeMode::Light, false) => LIGHT_THEME,
    };
    ThemeDefinition { css }
}

const DARK_THEME: &str = r#"
:root {
    --color-bg: #0b0614;
    --color-surface: #160d24;
    --color-border: #2d1b4a;
    --color-text-primary: #f3eefc;
    --color-text-secondary: #a093b8;
    --color-accent: #8b5cf6;
    --color-accent-hover: #7c3aed;
    --color-user-bubble: #7c3aed;
    --color-user-text: #ffffff;
    --color-stranger-bubble: #1e1430;
    --color-stranger-text: #ece5f8;
    --color-danger: #ef4444;
    --color-input-bg: #120a1f;
    --color-vanish-glow: transparent;
}
body { background: var(--color-bg); color: var(--color-text-primary); }
"#;

const LIGHT_THEME: &str = r#"
:root {
    --color-bg: #faf8ff;
    --color-surface: #ffffff;
    --color-border: #e4dcf5;
    --color-text-primary: #1d1430;
    --color-text-secondary: #6f6589;
    --color-accent: #7c3aed;
    --color-accent-hover: #6d28d9;
    --color-user-bubble: #7c3aed;
    --color-user-text: #ffffff;
    --color-stranger-bubble: #efe9fb;
    --color-stranger-text: #241a3a;
    --color-danger: #dc2626;
    --color-input-bg: #ffffff;
    --color-vanish-glow: transparent;
}
body { background: var(--color-bg); color: var(--color-text-primary); }
"#;

const VANISH_THEME: &str = r#"
:root {
    --color-bg: #050208;
    --color-surface: #110820;
    --color-border: #31175a;
    --color-text-primary: #f3eefc;
    --color-text-secondary: #9b8cbd;
    --color-accent: #a855f7;
    --color-accent-hover: #9333ea;
    --color-user-bubble: #6d28d9;
    --color-user-text: #ffffff;
    --color-stranger-bubble: #190f2c;
    --color-stranger-text: #ece5f8;
    --color-danger: #ef4444;
    --color-input-bg: #0d0618;
    --color-vanish-glow: rgba(168, 85, 247, 0.12);
}
body { background: var(--color-bg); color: var(--color-text-primary); }
.chat-main { background: radial-gradient(circle at center, var(--color-vanish-glow) 0, transparent 100%); }
"#;
