use anyhow::Result;
use concierge::cli::start;

fn main() -> Result<()> {
    start::start()
}
