pub mod chat;
pub mod landing;
pub mod settings;
pub mod shared;

pub use chat::ChatView;
pub use landing::LandingView;
pub use settings::SettingsModal;
