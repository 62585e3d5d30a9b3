pub mod date_input;
pub mod popup;
