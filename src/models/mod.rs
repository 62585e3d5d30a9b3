mod invoice;
mod line_item;

pub use invoice::Invoice;
pub use line_item::LineItem;
