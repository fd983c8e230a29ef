/// Enum representing CLI commands
#[derive(Debug, PartialEq)]
pub enum Command {
    Add { repo: String },
    Remove { repo: String },
    List,
    Help,
    /// A command was recognised but is missing its argument; carries the
    /// usage line to show.
    Usage(String),
    Unknown(String),
}

pub const USAGE: &str = "usage: pr-view <add|remove|list>";
pub const ADD_USAGE: &str = "usage: pr-view add owner/repo[#number]";
pub const REMOVE_USAGE: &str = "usage: pr-view remove owner/repo[#number]";

/// Parse command line arguments and return a Command
///
/// Arguments after the first operand are ignored. The reference itself is
/// validated by the store, not here, so URLs pass through unchanged.
///
/// # Arguments
/// * `args` - Command line arguments (including program name)
pub fn parse_args(args: &[String]) -> Command {
    match args.len() {
        0 | 1 => Command::Usage(USAGE.to_string()),
        2 => match args[1].as_str() {
            "list" => Command::List,
            "help" | "--help" | "-h" => Command::Help,
            "add" => Command::Usage(ADD_USAGE.to_string()),
            "remove" => Command::Usage(REMOVE_USAGE.to_string()),
            cmd => Command::Unknown(cmd.to_string()),
        },
        _ => match args[1].as_str() {
            "add" => Command::Add {
                repo: args[2].clone(),
            },
            "remove" => Command::Remove {
                repo: args[2].clone(),
            },
            "list" => Command::List,
            "help" | "--help" | "-h" => Command::Help,
            cmd => Command::Unknown(cmd.to_string()),
        },
    }
}
