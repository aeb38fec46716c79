pub mod content_editor;
pub mod fields;
pub mod preview;
pub mod tab_bar;
