pub mod dto;
pub mod language;
pub mod login;
pub mod logout;
pub mod signup;
pub mod utils;

pub use language::set_language;
pub use login::login;
pub use logout::logout;
pub use signup::signup;
