pub mod confirm_discard;
pub mod form;
pub mod highlight;
pub mod layout;
pub mod popup;
pub mod sidebar;
pub mod status_bar;
pub mod variables_modal;
pub mod variables_panel;
