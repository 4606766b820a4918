pub mod command;
pub mod parse;

use crate::disk::DiskRegistry;
use crate::shell::{command::execute_command, parse::parse_command};
use colored::*;
use crossterm::{
    cursor, execute,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use indicatif::{ProgressBar, ProgressStyle};
use reedline::{DefaultPrompt, DefaultPromptSegment, Reedline, Signal};
use std::{io::stdout, path::PathBuf, thread, time::Duration};

pub fn start_shell() {
    boot_animation();

    let username = whoami::username();
    let hostname = whoami::hostname();

    println!(
        "{}",
        "Type 'help' for available commands. Use ↑↓ for history, Tab for auto-completion.\n"
            .bright_black()
    );

    let history_path = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".minidisk_history");

    let mut line_editor = Reedline::create().with_history(Box::new(
        reedline::FileBackedHistory::with_file(100, history_path).unwrap(),
    ));

    // command completion
    let commands: Vec<String> = ["help", "open", "read", "write", "close", "stat", "ls", "exit"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let completer = reedline::DefaultCompleter::new_with_wordlen(commands, 2);
    line_editor = line_editor.with_completer(Box::new(completer));

    let prompt = DefaultPrompt::new(
        DefaultPromptSegment::Basic(format!(
            "{}@{}",
            username.green().bold(),
            hostname.cyan().bold()
        )),
        DefaultPromptSegment::Basic("MiniDisk".bright_blue().bold().to_string()),
    );

    let mut registry = DiskRegistry::new();

    loop {
        let input = line_editor.read_line(&prompt);

        match input {
            Ok(Signal::Success(buffer)) => {
                let trimmed = buffer.trim();
                if trimmed.is_empty() {
                    continue;
                }

                match parse_command(trimmed) {
                    Some(cmd) => {
                        if let Err(e) = execute_command(&cmd, &mut registry) {
                            println!("{} {}", "❌ Error:".red().bold(), e);
                        }
                        if matches!(cmd, command::Command::Exit) {
                            break;
                        }
                    }
                    None => println!(
                        "{}",
                        "⚠️  Unknown or malformed command. Type 'help' for command list.".yellow()
                    ),
                }
            }
            Ok(Signal::CtrlC) => {
                println!();
                continue;
            }
            Ok(Signal::CtrlD) => {
                println!("{}", "Exiting MiniDisk...".yellow());
                break;
            }
            Err(e) => {
                println!("Error reading line: {}", e);
                break;
            }
        }
    }

    shutdown(&mut registry);
    println!("{}", "GoodBye!".bright_yellow());
}

/// Close every disk that is still open before the process goes away, so no
/// host file descriptor outlives the shell with unflushed writes.
fn shutdown(registry: &mut DiskRegistry) {
    for info in registry.list() {
        if info.is_open {
            if let Err(e) = registry.close_disk(info.id) {
                println!("{} {}", "⚠️  Failed to close disk:".yellow(), e);
            }
        }
    }
}

/// Boot-up welcome animation
fn boot_animation() {
    let mut stdout = stdout();

    execute!(stdout, Clear(ClearType::All), cursor::MoveTo(0, 0)).unwrap();
    println!("{}", "[MiniDisk Booting...]".bright_yellow().bold());
    thread::sleep(Duration::from_millis(300));

    let steps = vec![
        "🧠 Initializing disk registry...",
        "📀 Probing block devices...",
        "⌨️  Loading shell...",
    ];

    for step in steps {
        println!("{}", step);
        thread::sleep(Duration::from_millis(400));
    }

    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::with_template("[{bar:40.cyan/blue}] {pos:>3}% {msg}")
            .unwrap()
            .progress_chars("=> "),
    );

    for i in 0..100 {
        pb.set_position(i);
        thread::sleep(Duration::from_millis(10));
    }
    pb.finish_with_message("✅ Ready!");

    thread::sleep(Duration::from_millis(300));
    execute!(
        stdout,
        Clear(ClearType::All),
        cursor::MoveTo(0, 0),
        SetForegroundColor(Color::Cyan),
        Print("Welcome to MiniDisk v0.1.0\n"),
        ResetColor
    )
    .unwrap();
}
