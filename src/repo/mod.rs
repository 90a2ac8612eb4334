pub mod board;
pub mod stage;
pub mod department;
pub mod user;

pub use board::*;
pub use stage::*;
pub use department::*;
pub use user::*;
