use anyhow::Result;

fn main() -> Result<()> {
    context_cli::main_entry()
}
