pub mod ask_controller;
pub mod set_key_controller;

pub use ask_controller::AskController;
pub use set_key_controller::SetKeyController;
