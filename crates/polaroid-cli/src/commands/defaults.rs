//! Print the default frame parameters as JSON.

use polaroid_core::FrameParameters;

pub fn run() -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(&FrameParameters::default())?;
    println!("{json}");
    Ok(())
}
