mod credential;
mod transcript;
mod turn;

pub use credential::*;
pub use transcript::*;
pub use turn::*;
