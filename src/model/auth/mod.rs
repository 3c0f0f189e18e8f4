mod password;
mod session;

pub use password::PasswordHash;
pub use session::{Principal, Rights, Session};
