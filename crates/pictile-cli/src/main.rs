mod command;
mod logging;
mod source;
mod store;
mod tui;
mod ui;
mod util;

fn main() -> anyhow::Result<()> {
    command::run()
}
