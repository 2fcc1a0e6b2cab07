//! Subcommand implementations. Each returns the text printed on stdout.

use crate::snapshot::Snapshot;
use anyhow::{Context, Result};
use gl_review_config::AppConfig;
use gl_review_diff::{parse_patch, AddressScheme, DiffRefs, DisplayLine, ReviewAddress, ReviewId};
use serde::Serialize;
use std::io::Read;
use std::path::Path;

fn to_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("Failed to serialize output")
}

fn scheme(config: &AppConfig) -> AddressScheme {
    AddressScheme::new(config.address_scheme.as_str())
}

pub fn encode_address(config: &AppConfig, address: &ReviewAddress) -> String {
    scheme(config).encode(address)
}

pub fn decode_address(config: &AppConfig, address: &str) -> Result<String> {
    let address = scheme(config).decode(address)?;
    to_json(&address)
}

/// Commenting ranges of a document showing `line_count` lines.
pub fn ranges(
    config: &AppConfig,
    snapshot: &Path,
    address: &str,
    line_count: u32,
) -> Result<String> {
    let address = scheme(config).decode(address)?;
    let session = Snapshot::read(snapshot)?.into_session(config.old_side_commenting);

    let ranges = session
        .commenting_ranges(&address, line_count)
        .with_context(|| format!("Failed to compute commenting ranges of {}", address.path))?;
    log::info!("{} commenting ranges for {}", ranges.len(), address.path);
    to_json(&ranges)
}

/// Anchor of a comment on display line `line` (0-based) of a document.
pub fn position(config: &AppConfig, snapshot: &Path, address: &str, line: u32) -> Result<String> {
    let address = scheme(config).decode(address)?;
    let session = Snapshot::read(snapshot)?.into_session(config.old_side_commenting);

    let anchor = session.resolve_click(&address, DisplayLine(line))?;
    to_json(&anchor)
}

/// Split a `git diff` patch into a snapshot. `-` reads stdin.
pub fn parse_patch_file(patch: &Path, review: ReviewId, refs: DiffRefs) -> Result<String> {
    let content = if patch == Path::new("-") {
        let mut content = String::new();
        std::io::stdin()
            .read_to_string(&mut content)
            .context("Failed to read patch from stdin")?;
        content
    } else {
        std::fs::read_to_string(patch)
            .with_context(|| format!("Failed to read patch {}", patch.display()))?
    };

    let snapshot = Snapshot {
        review,
        version: parse_patch(&content, refs),
    };
    to_json(&snapshot)
}
