pub mod page;
pub mod submit;

pub use page::predict_page;
pub use submit::predict;
