pub mod components;
pub mod invoice;
pub mod item_form;
