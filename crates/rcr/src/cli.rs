//! Command-line surface

use clap::Parser;

/// rcr: run a command on the configured remote host over SSH
#[derive(Parser, Debug)]
#[command(
    name = "rcr",
    version,
    about = "Run network diagnostics and arbitrary commands on the configured remote host",
    after_help = "Examples:\n  rcr ping 8.8.8.8 -c 4\n  rcr nslookup example.com\n  rcr uname -a\n  rcr systemctl status ssh\n\nThe remote host is read from the rcr config file (override its path with RCR_CONFIG)."
)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Command and arguments to run on the remote host
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,
}

/// Concise usage shown on bare invocation or an empty command
pub fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  rcr ping <ping-arguments...>");
    eprintln!("  rcr nslookup <nslookup-arguments...>");
    eprintln!("  rcr <command> [args...]");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  rcr ping 8.8.8.8 -c 4");
    eprintln!("  rcr nslookup example.com");
    eprintln!("  rcr uname -a");
    eprintln!("  rcr systemctl status ssh");
}
