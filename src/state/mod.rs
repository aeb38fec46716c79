pub mod app_state;
pub mod editor;
pub mod focus;
pub mod layout;
pub mod mode;
