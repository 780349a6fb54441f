pub mod context_menu;
pub mod events;
pub mod naming;
pub mod search;
pub mod tree;
