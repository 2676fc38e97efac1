//! config command - Show the effective configuration

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use serde_json::json;

use crate::cli::Context;
use crate::core::word_bank::WordBank;
use crate::registry::default_path;

/// Print the effective configuration and word bank summary.
pub fn show(ctx: &Context) -> Result<()> {
    let config = &ctx.config;
    let allocator = config.allocator_settings();
    let registrar = config.registrar_settings();

    let registry_path: Option<PathBuf> = match config.registry_provider() {
        "file" => match ctx.registry.clone().or_else(|| config.registry_path().map(PathBuf::from)) {
            Some(path) => Some(path),
            None => Some(default_path().context("Failed to resolve registry path")?),
        },
        _ => None,
    };

    let bank = match config.word_bank_path() {
        Some(path) => WordBank::load(path),
        None => WordBank::builtin(),
    }
    .context("Failed to load word bank")?;

    if ctx.json {
        let value = json!({
            "configFile": config.path(),
            "allocator": {
                "maxAttempts": allocator.max_attempts,
                "fallbackDigits": allocator.fallback_digits,
            },
            "registrar": {
                "maxInsertAttempts": registrar.max_insert_attempts,
                "timestampDigits": registrar.timestamp_digits,
                "randomSuffixLen": registrar.random_suffix_len,
            },
            "registry": {
                "provider": config.registry_provider(),
                "path": registry_path,
            },
            "wordBank": {
                "path": config.word_bank_path(),
                "version": bank.version(),
                "prefixes": bank.prefixes().len(),
                "suffixes": bank.suffixes().len(),
                "characters": bank.characters().len(),
                "abilities": bank.abilities().len(),
                "titleSpace": bank.title_space(),
                "fingerprint": bank.fingerprint(),
            },
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    let config_file = config
        .path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(defaults)".to_string());
    let registry_path = registry_path
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(in memory)".to_string());
    let bank_source = config
        .word_bank_path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(built-in)".to_string());

    println!("config file:                   {}", config_file);
    println!("allocator.max_attempts:        {}", allocator.max_attempts);
    println!("allocator.fallback_digits:     {}", allocator.fallback_digits);
    println!("registrar.max_insert_attempts: {}", registrar.max_insert_attempts);
    println!("registrar.timestamp_digits:    {}", registrar.timestamp_digits);
    println!("registrar.random_suffix_len:   {}", registrar.random_suffix_len);
    println!("registry.provider:             {}", config.registry_provider());
    println!("registry.path:                 {}", registry_path);
    println!("word_bank.path:                {}", bank_source);
    println!(
        "word_bank:                     v{}, {} titles, sha256 {}",
        bank.version(),
        bank.title_space(),
        bank.fingerprint()
    );
    Ok(())
}
