//! Command-line interface definition.

use clap::{Parser, Subcommand};
use cmdfiles_protocol::constants::{DEFAULT_HOST, DEFAULT_PORT};

/// Move files to and from a cmdfiles server.
#[derive(Parser, Debug)]
#[command(name = "cmdfiles")]
#[command(version, arg_required_else_help = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Save the server address used by every other command.
    Config {
        /// Remote host.
        #[arg(long, default_value = DEFAULT_HOST)]
        host: String,
        /// Remote port.
        #[arg(long, default_value_t = DEFAULT_PORT)]
        port: u16,
    },

    /// Upload a local file.
    Upload {
        /// Local file path.
        #[arg(long)]
        from: String,
        /// Remote directory (server root when omitted).
        #[arg(long, default_value = "")]
        to: String,
    },

    /// Download a remote file.
    Down {
        /// Remote file path.
        #[arg(long)]
        from: String,
        /// Local directory (current directory when omitted).
        #[arg(long, default_value = "")]
        to: String,
    },

    /// Delete a remote file or directory tree.
    Delete {
        /// Remote path.
        #[arg(long)]
        from: String,
    },

    /// List a remote directory.
    List {
        /// Remote directory (server root when omitted).
        #[arg(long, default_value = "")]
        from: String,
    },
}
