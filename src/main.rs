use anyhow::Result;

mod app;
mod logging;

fn main() -> Result<()> {
    let args = rmundo::cli::parse();
    app::run(args)
}
