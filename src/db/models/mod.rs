mod access_token;
mod price_history;
mod product;
mod user;

pub use access_token::*;
pub use price_history::*;
pub use product::*;
pub use user::*;
