// Record management for boards, departments and users, plus the admin gate
// every command passes through

pub mod access;
pub mod board;
pub mod department;
pub mod user;

pub use access::*;
pub use board::*;
pub use department::*;
pub use user::*;
