pub mod content;
pub mod event;
pub mod intent;
pub mod layout;
pub mod session;
pub mod snapshot;
