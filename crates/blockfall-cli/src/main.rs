mod command;
mod top_score;
mod tui;
mod view;

fn main() -> anyhow::Result<()> {
    command::run()
}
