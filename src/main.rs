/// Defaults compiled into the binary for builds without a filesystem `.env`.
const BUNDLED_CONFIG: &str = include_str!("../assets/config.env");

#[cfg(not(target_arch = "wasm32"))]
fn load_dotenv() {
    // A local .env wins over the bundled defaults.
    if dotenvy::dotenv().is_ok() {
        return;
    }
    load_bundled_config();
}

#[cfg(target_arch = "wasm32")]
fn load_dotenv() {
    load_bundled_config();
}

fn load_bundled_config() {
    for line in BUNDLED_CONFIG.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            let key = key.trim();
            // Real environment variables always take precedence.
            if std::env::var(key).is_err() {
                // SAFETY: runs before any other thread exists.
                unsafe {
                    std::env::set_var(key, value.trim());
                }
            }
        }
    }
}

fn main() {
    load_dotenv();
    tracing_subscriber::fmt::init();

    #[cfg(feature = "ui")]
    dioxus::launch(ghostline::ui::App);

    #[cfg(not(feature = "ui"))]
    eprintln!("ghostline was built without a renderer; rebuild with --features desktop, web or mobile");
}
