use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Open the chat window (the default when no command is given)
    Chat,

    /// Send a single prompt and print the reply
    Ask {
        prompt: String,
    },

    /// Store the API key used by future sessions
    SetKey {
        /// The key to store; prompted for (hidden) when omitted
        key: Option<String>,
    },
}
