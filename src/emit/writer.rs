//! Writes emitted documents to disk

use std::fs;
use std::path::{Path, PathBuf};

use crate::catalog::Provider;
use crate::error::{Result, SchemaError};

use super::Target;

/// Emit every provider in every target format to
/// `<out_dir>/<target>/<provider>.<ext>`. Returns the written paths in
/// target-major order.
pub fn write_catalogs(
    providers: &[Provider],
    targets: &[Target],
    out_dir: &Path,
    pretty: bool,
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(providers.len() * targets.len());

    for target in targets {
        let emitter = target.emitter();
        let dir = out_dir.join(target.as_str());
        fs::create_dir_all(&dir).map_err(|source| SchemaError::io(&dir, source))?;

        for provider in providers {
            let catalog = provider.catalog();
            let document = emitter.emit(catalog)?;
            let body = if pretty {
                serde_json::to_string_pretty(&document)?
            } else {
                serde_json::to_string(&document)?
            };

            let path = dir.join(format!("{}.{}", provider, emitter.file_extension()));
            fs::write(&path, body + "\n").map_err(|source| SchemaError::io(&path, source))?;

            tracing::info!(
                provider = %provider,
                target = %target,
                definitions = catalog.len(),
                path = %path.display(),
                "Generated schema file"
            );
            written.push(path);
        }
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_writes_one_file_per_pair() {
        let dir = TempDir::new().unwrap();
        let written = write_catalogs(
            &[Provider::Anthropic, Provider::Ollama],
            &Target::ALL,
            dir.path(),
            true,
        )
        .unwrap();

        let expected: Vec<PathBuf> = [
            "json-schema/anthropic.json",
            "json-schema/ollama.json",
            "openapi/anthropic.json",
            "openapi/ollama.json",
        ]
        .iter()
        .map(|p| dir.path().join(p))
        .collect();
        assert_eq!(written, expected);

        let body = fs::read_to_string(&written[1]).unwrap();
        assert!(body.contains("\n  \"$defs\""));
        let document: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert!(document["$defs"]["ChatRequest"].is_object());
    }

    #[test]
    fn test_compact_output() {
        let dir = TempDir::new().unwrap();
        let written =
            write_catalogs(&[Provider::GoogleAi], &[Target::OpenApi], dir.path(), false).unwrap();
        let body = fs::read_to_string(&written[0]).unwrap();
        assert_eq!(body.lines().count(), 1);
    }

    #[test]
    fn test_unwritable_directory() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "").unwrap();

        let err = write_catalogs(&[Provider::Ollama], &[Target::JsonSchema], &blocker, true)
            .unwrap_err();
        assert!(matches!(err, SchemaError::Io { .. }));
    }
}
