//! Mapping command implementation.

use crate::error::CliError;
use seriesdoc_sync_protocol::IndexSettings;
use std::io::Write;

/// Prints the body used to create the destination index.
pub fn run(out: &mut impl Write) -> Result<(), CliError> {
    let body = serde_json::to_string_pretty(&IndexSettings::standard().to_body())
        .map_err(std::io::Error::from)?;
    writeln!(out, "{}", body)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prints_settings_and_mappings() {
        let mut out = Vec::new();
        run(&mut out).unwrap();
        let body: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(body["settings"]["number_of_replicas"], 0);
        assert_eq!(body["mappings"]["properties"]["time"]["type"], "date");
    }
}
