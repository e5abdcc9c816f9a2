use anyhow::Result;

use crate::Commands;

use super::container::Container;
use super::controller::{AskController, SetKeyController};

pub struct Router<'a> {
    ask_controller: AskController<'a>,
    set_key_controller: SetKeyController<'a>,
}

impl<'a> Router<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self {
            ask_controller: AskController::new(container),
            set_key_controller: SetKeyController::new(container),
        }
    }

    pub async fn route(&self, command: Commands) -> Result<String> {
        match command {
            Commands::Ask { prompt } => self.ask_controller.ask(prompt).await,
            Commands::SetKey { key } => self.set_key_controller.set_key(key).await,
            Commands::Chat => unreachable!("Chat command is handled separately in main"),
        }
    }
}
