/*!
 * Common test utilities for the xcstrings-translator test suite
 */

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Catalog with one greeting in English, formatted the way Xcode writes it
pub const GREETING_CATALOG: &str = r#"{
  "sourceLanguage" : "en",
  "strings" : {
    "greeting" : {
      "localizations" : {
        "en" : {
          "stringUnit" : {
            "state" : "translated",
            "value" : "Hello %@"
          }
        }
      }
    }
  },
  "version" : "1.0"
}
"#;

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Catalog text with `count` English strings `key1..=keyN` ("Text N")
///
/// Keys listed in `translated` already carry a French translation and keys
/// in `no_translate` are marked `shouldTranslate: false`.
pub fn catalog_with_strings(count: usize, translated: &[usize], no_translate: &[usize]) -> String {
    let mut strings = serde_json::Map::new();
    for i in 1..=count {
        let mut localizations = serde_json::json!({
            "en": { "stringUnit": { "state": "translated", "value": format!("Text {}", i) } }
        });
        if translated.contains(&i) {
            localizations["fr"] = serde_json::json!({
                "stringUnit": { "state": "translated", "value": format!("Texte {}", i) }
            });
        }

        let mut entry = serde_json::json!({ "localizations": localizations });
        if no_translate.contains(&i) {
            entry["shouldTranslate"] = serde_json::Value::Bool(false);
        }
        strings.insert(format!("key{}", i), entry);
    }

    let catalog = serde_json::json!({
        "sourceLanguage": "en",
        "strings": strings,
        "version": "1.0",
    });
    serde_json::to_string_pretty(&catalog).unwrap_or_default()
}

/// Creates a catalog file with the given content
pub fn create_test_catalog(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    create_test_file(dir, filename, content)
}

/// Enables log output for a test run when `RUST_LOG` is set
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
