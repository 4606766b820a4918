use crate::shell::command::Command;

pub fn parse_command(input: &str) -> Option<Command> {
    let tokens: Vec<&str> = input.trim().split_ascii_whitespace().collect();
    if tokens.is_empty() {
        return None;
    }

    let cmd = tokens[0];
    let args = &tokens[1..];

    match cmd {
        "help" => Some(Command::Help),
        "open" => {
            let filename = args.first()?.to_string();
            Some(Command::Open(filename, num(args, 1)?))
        }
        "read" => Some(Command::Read(num(args, 0)?, num(args, 1)?)),
        "write" => {
            if args.len() >= 3 {
                Some(Command::Write(
                    num(args, 0)?,
                    num(args, 1)?,
                    args[2..].join(" "),
                ))
            } else {
                None
            }
        }
        "close" => Some(Command::Close(num(args, 0)?)),
        "stat" => Some(Command::Stat(num(args, 0)?)),
        "ls" => Some(Command::Ls),
        "exit" => Some(Command::Exit),
        _ => None,
    }
}

fn num<T: std::str::FromStr>(args: &[&str], idx: usize) -> Option<T> {
    args.get(idx)?.parse().ok()
}
