use anyhow::Result;

use averbuch_core::site::content;

pub async fn run(width: usize) -> Result<()> {
    println!("{}", content::legal_text(width.max(20)));
    Ok(())
}
