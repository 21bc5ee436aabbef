use anyhow::Result;
use vergen::EmitBuilder;

// Git metadata for `flight_analyzer --version`.
fn main() -> Result<()> {
    EmitBuilder::builder().git_sha(true).git_commit_date().emit()?;
    Ok(())
}
