/*!
 * Files, configuration and preferences
 */

use anyhow::Result;
use std::fs;
use xcstrings_translator::app_config::{Config, LogLevel};
use xcstrings_translator::catalog::Catalog;
use xcstrings_translator::providers::mock::MockProvider;
use xcstrings_translator::storage::PreferenceStore;
use xcstrings_translator::{Controller, TranslationSettings};

use crate::common;

/// Catalog file read, translated and written back keeps its Xcode layout
#[tokio::test]
async fn test_translate_catalog_file_should_write_xcode_layout() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_catalog(temp_dir.path(), "Localizable.xcstrings", common::GREETING_CATALOG)?;

    let mut controller = Controller::new(MockProvider::working(), TranslationSettings::default());
    controller.load_catalog(&fs::read_to_string(&path)?)?;
    controller.translate_language("de", false).await?;
    fs::write(&path, controller.output_json()?)?;

    let written = fs::read_to_string(&path)?;
    assert!(written.contains("\"sourceLanguage\" : \"en\""));
    assert!(written.contains("\"value\" : \"[de] Hello %@\""));
    assert!(written.ends_with("}\n"));

    let reloaded = Catalog::parse(&written)?;
    assert_eq!(reloaded.to_json_string()?, written);
    assert_eq!(reloaded.version(), "1.0");
    Ok(())
}

/// Unknown fields in the catalog survive a translation run
#[tokio::test]
async fn test_translate_catalog_should_keep_unknown_fields() -> Result<()> {
    let text = r#"{
  "sourceLanguage" : "en",
  "strings" : {
    "title" : {
      "extractionState" : "manual",
      "localizations" : {
        "en" : {
          "stringUnit" : {
            "state" : "translated",
            "value" : "Settings"
          }
        }
      }
    }
  },
  "version" : "1.0"
}"#;

    let mut controller = Controller::new(MockProvider::working(), TranslationSettings::default());
    controller.load_catalog(text)?;
    controller.translate_language("fr", false).await?;

    let output = controller.output_json()?;
    assert!(output.contains("\"extractionState\" : \"manual\""));
    assert!(output.find("\"en\" :").unwrap() < output.find("\"fr\" :").unwrap());
    Ok(())
}

/// A missing config file is created with defaults and read back
#[test]
fn test_config_load_or_create_should_round_trip() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("conf.json");

    let mut config = Config::load_or_create(&path)?;
    assert!(path.exists());
    assert_eq!(config.log_level, LogLevel::Info);

    config.target_languages = vec!["fr".to_string(), "pt-BR".to_string()];
    config.translation.app_context = "Recipe app".to_string();
    config.save(&path)?;

    let loaded = Config::load_or_create(&path)?;
    assert_eq!(loaded, config);
    assert!(loaded.validate().is_ok());
    Ok(())
}

/// Preferences seed the session settings without storing the key in plain text
#[test]
fn test_preferences_should_seed_settings() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let store = PreferenceStore::new(temp_dir.path().join("preferences.json"));

    let settings = TranslationSettings {
        api_key: "sk-test-123".to_string(),
        save_api_key: true,
        model: "gpt-4o".to_string(),
        app_context: "Recipe app".to_string(),
    };
    store.save_settings(&settings)?;

    assert!(!fs::read_to_string(store.path())?.contains("sk-test-123"));
    assert_eq!(store.load().to_settings(), settings);
    Ok(())
}

/// Remembered model and context are used on a later run unless the config sets them
#[test]
fn test_remembered_settings_should_seed_next_run() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let store = PreferenceStore::new(temp_dir.path().join("preferences.json"));
    let config_path = temp_dir.path().join("conf.json");

    // First run: flags applied to the config, then remembered
    let mut config = Config::load_or_create(&config_path)?;
    config.translation.model = Some("gpt-5-mini".to_string());
    config.translation.app_context = "Chess".to_string();
    config.translation.api_key = "sk-first".to_string();
    let mut settings = config.translation.to_settings(&store.load());
    settings.save_api_key = true;
    store.save_settings(&settings)?;

    // Second run: nothing on the command line
    let config = Config::load_or_create(&config_path)?;
    let settings = config.translation.to_settings(&store.load());
    assert_eq!(settings.model, "gpt-5-mini");
    assert_eq!(settings.app_context, "Chess");
    assert_eq!(settings.api_key, "sk-first");

    // A model in the config file wins over the remembered one
    let mut config = config;
    config.translation.model = Some("gpt-4o".to_string());
    assert_eq!(config.translation.to_settings(&store.load()).model, "gpt-4o");
    Ok(())
}
