pub mod forms_ops;
pub mod sanitize;

pub use forms_ops::{FormsListing, FormsOps};
