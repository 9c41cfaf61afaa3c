use anyhow::Result;

fn main() -> Result<()> {
    coderef_cli::main_entry()
}
