use colored::*;
use dialoguer::Confirm;
use indicatif::{ProgressBar, ProgressStyle};
use std::error::Error;
use std::path::Path;
use std::{thread, time::Duration};

use crate::disk::{Block, DiskError, DiskId, DiskRegistry, BLOCK_SIZE};
use crate::utils::{format_size, hex_dump};

#[derive(Debug)]
pub enum Command {
    Help,
    Open(String, u64),
    Read(DiskId, u64),
    Write(DiskId, u64, String),
    Close(DiskId),
    Stat(DiskId),
    Ls,
    Exit,
}

pub fn execute_command(cmd: &Command, registry: &mut DiskRegistry) -> Result<(), Box<dyn Error>> {
    match cmd {
        Command::Help => print_help(),
        Command::Open(filename, n_bytes) => {
            let existed = Path::new(filename).exists();
            if existed && *n_bytes > 0 {
                let confirmed = Confirm::new()
                    .with_prompt(format!(
                        "Image '{}' already exists. Resize it? Content beyond the new size is lost",
                        filename
                    ))
                    .default(false)
                    .interact()?;
                if !confirmed {
                    println!("{}", "Open cancelled.".yellow());
                    return Ok(());
                }
            }

            let disk = registry.open_disk(filename, *n_bytes)?;
            if !existed {
                allocation_bar();
            }
            println!(
                "💿 Opened {} as disk {}",
                filename.cyan(),
                disk.to_string().green().bold()
            );
        }
        Command::Read(disk, block_num) => {
            let mut block: Block = [0; BLOCK_SIZE];
            registry.read_block(*disk, *block_num, &mut block)?;
            println!(
                "📖 Disk {} block {}:",
                disk.to_string().cyan(),
                block_num.to_string().cyan()
            );
            print!("{}", hex_dump(&block).bright_black());
        }
        Command::Write(disk, block_num, text) => {
            registry.write_block(*disk, *block_num, text.as_bytes())?;
            let n = text.len();
            if n < BLOCK_SIZE {
                println!(
                    "✏️  Wrote block {} ({} bytes of data, zero-padded to {})",
                    block_num,
                    n,
                    BLOCK_SIZE
                );
            } else {
                println!(
                    "✏️  Wrote block {} (input truncated to {} bytes)",
                    block_num, BLOCK_SIZE
                );
            }
        }
        Command::Close(disk) => {
            registry.close_disk(*disk)?;
            println!("🔒 Closed disk {}", disk.to_string().cyan());
        }
        Command::Stat(disk) => {
            let info = registry
                .list()
                .into_iter()
                .find(|d| d.id == *disk)
                .ok_or(DiskError::UnknownDisk(*disk))?;

            println!(
                "{}\n{}: {}\n{}: {}\n{}: {}",
                "📊 Disk Info".bright_yellow().bold(),
                "Handle".blue(),
                info.id,
                "Image".blue(),
                info.filename,
                "State".blue(),
                if info.is_open {
                    "open".green()
                } else {
                    "closed".red()
                }
            );
            if info.is_open {
                let size = registry.size_of(*disk)?;
                println!(
                    "{}: {} ({} blocks)",
                    "Size".blue(),
                    format_size(size),
                    size / BLOCK_SIZE as u64
                );
            }
        }
        Command::Ls => {
            let disks = registry.list();
            if disks.is_empty() {
                println!("{}", "No disks opened yet.".bright_black());
            }
            for info in disks {
                let state = if info.is_open {
                    "open".green()
                } else {
                    "closed".red()
                };
                println!(
                    "💿 {}  {}  [{}]",
                    info.id.to_string().bold(),
                    info.filename,
                    state
                );
            }
        }
        Command::Exit => println!("{}", "👋 Exiting MiniDisk shell...".yellow().bold()),
    }

    Ok(())
}

fn allocation_bar() {
    println!("💾 Allocating disk image...");
    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::with_template("[{bar:40.green/black}] {pos:>3}% {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );
    for i in 0..=100 {
        pb.set_position(i);
        thread::sleep(Duration::from_millis(3));
    }
    pb.finish_with_message("✅ Image allocated!");
}

fn print_help() {
    println!("{}", "📘 MiniDisk Commands".bright_cyan().bold());
    println!(
        "{}",
        "
  open <image> <bytes>         Open a disk image, creating or resizing it
                               (bytes = 0 opens an existing image as-is)
  read <disk> <block>          Hex-dump one 256-byte block
  write <disk> <block> <text>  Write text into one block (zero-padded)
  close <disk>                 Close a disk
  stat <disk>                  Show handle, image, state and size
  ls                           List all known disks
  help                         Show this help message
  exit                         Quit the shell
"
        .bright_black()
    );
}
