use clap::Parser;

/// Arguments for completions command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Generate bash completions:\n    agentkit completions bash > ~/.bash_completion.d/agentkit\n\n\
                  Generate zsh completions:\n    agentkit completions zsh > ~/.zfunc/_agentkit\n\n\
                  Generate fish completions:\n    agentkit completions fish > ~/.config/fish/completions/agentkit.fish\n\n\
                  Generate PowerShell completions:\n    agentkit completions powershell")]
pub struct CompletionsArgs {
    /// Shell type (bash, elvish, fish, powershell, zsh)
    pub shell: String,
}
