use crate::shell::start_shell;

mod disk;
mod shell;
mod utils;

fn main() {
    env_logger::init();
    start_shell();
}
