//! `sweep completions <shell>`: print a completion script for the CLI.

use clap::Command;
use clap_complete::Shell;
use std::io::{self, Write};

/// Write the completion script for `cmd` to `out`
pub fn write(cmd: &mut Command, shell: Shell, out: &mut dyn Write) {
    let bin_name = cmd.get_name().to_string();
    clap_complete::generate(shell, cmd, bin_name, out);
}

/// Execute the completions command, writing to stdout.
pub fn execute(cmd: &mut Command, shell: Shell) {
    write(cmd, shell, &mut io::stdout());
}
