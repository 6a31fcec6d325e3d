use std::io::{self, BufRead, Write};

use colored::Colorize;
use tracing::debug;

use tv_shell::{Shell, ShellConfig};

pub fn run(config: ShellConfig) -> Result<(), String> {
    debug!(history_limit = config.history_limit, glyphs = config.glyphs, "starting shell");
    let mut shell = Shell::new(config);

    println!("  {} Tavern", "Welcome to".bold());
    println!("  Type 'help' for commands, 'quit' to exit.\n");

    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let mut line = String::new();

    loop {
        for announcement in shell.tick() {
            println!("{}", announcement.cyan());
        }
        print!("{}", shell.prompt());
        io::stdout().flush().map_err(|e| e.to_string())?;

        line.clear();
        match reader.read_line(&mut line) {
            Ok(0) => break, // EOF
            Err(e) => return Err(e.to_string()),
            _ => {}
        }

        let input = line.trim();
        if input.is_empty() && !shell.in_entry_mode() {
            continue;
        }

        match shell.process(input) {
            Ok(output) => {
                if !output.is_empty() {
                    println!("{output}");
                }
            }
            Err(e) => {
                println!("{}", format!("error: {e}").yellow());
            }
        }
        if shell.should_quit() {
            break;
        }
    }

    Ok(())
}
