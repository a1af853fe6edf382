pub mod feed;
pub mod identity;
pub mod lifecycle;
pub mod safety;
pub mod session;
pub mod store;
pub mod timer;
pub mod types;
pub mod vanish;

#[cfg(feature = "ui")]
pub mod theme;
#[cfg(feature = "ui")]
pub mod ui;
#[cfg(feature = "ui")]
pub mod views;
