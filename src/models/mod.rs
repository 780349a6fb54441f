pub mod entry;
pub mod events;
pub mod hooks;
pub mod icon;
pub mod snapshot;
