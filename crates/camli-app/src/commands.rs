// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command handlers. Each one opens the stores it needs, performs a single
// action, and prints the result to stdout.

use anyhow::{Context, Result, bail};
use camli_core::{HostPort, UploaderConfig};
use camli_prefs::keys::{self, KeyKind, LIST_SEPARATOR};
use camli_prefs::{PreferenceStore, open_active, open_profiles};

use crate::services::provider::Provider;

// -- Settings ----------------------------------------------------------------

pub fn show(provider: &Provider, json: bool) -> Result<()> {
    let profile = open_profiles(provider)?.current();
    let prefs = open_active(provider)?;
    let config = prefs
        .config()
        .context("cannot resolve the uploader configuration")?
        .redacted();

    if json {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    println!("profile:              {profile}");
    println!("store:                {}", prefs.store().name());
    println!("location:             {}", provider.location());
    print_config(&config);
    Ok(())
}

fn print_config(config: &UploaderConfig) {
    let mode = if config.dev_mode { " (dev mode)" } else { "" };
    println!("server:               {}{mode}", describe_server(&config.host_port));
    println!("username:             {}", config.username);
    println!("password:             {}", config.password);
    println!("auto upload:          {}", config.auto_upload);
    println!("  require power:      {}", config.auto_requires_power);
    println!("  require wifi:       {}", config.auto_requires_wifi);
    println!("  wifi ssid:          {}", config.auto_required_wifi_ssid);
    println!("  photos:             {}", config.auto_dir_photos);
    println!("  mytracks:           {}", config.auto_dir_mytracks);
    if config.backup_dirs.is_empty() {
        println!("  backup dirs:        (none)");
    } else {
        println!("  backup dirs:");
        for dir in &config.backup_dirs {
            println!("    {dir}");
        }
    }
    println!(
        "max cache:            {} MB ({} bytes)",
        config.max_cache_mb, config.max_cache_bytes
    );
}

fn describe_server(host_port: &HostPort) -> String {
    if host_port.raw().trim().is_empty() {
        return "(not set)".into();
    }
    match host_port.url_prefix() {
        Some(url) => url,
        None => format!("{} (invalid)", host_port.raw()),
    }
}

pub fn list_keys() -> Result<()> {
    for spec in keys::SETTINGS {
        let default = if spec.default.is_empty() {
            "(empty)"
        } else {
            spec.default
        };
        println!(
            "{:<32} {:<8} {:<8} {}",
            spec.key,
            spec.kind.as_str(),
            default,
            spec.summary
        );
    }
    Ok(())
}

pub fn get(provider: &Provider, key: &str) -> Result<()> {
    let spec = keys::lookup(key)?;
    let prefs = open_active(provider)?;
    let value = prefs
        .store()
        .get(key)
        .unwrap_or_else(|| spec.default_value());
    println!("{value}");
    Ok(())
}

pub fn set(provider: &Provider, key: &str, input: &str) -> Result<()> {
    let spec = keys::lookup(key)?;
    if spec.kind == KeyKind::List {
        bail!("{key} is a list; use `camli-prefs backup-dirs add|remove` instead");
    }
    let value = spec.parse(input)?;
    let mut prefs = open_active(provider)?;
    prefs
        .store_mut()
        .edit()
        .put(key, value.clone())
        .commit()
        .with_context(|| format!("cannot save {key}"))?;
    println!("{key} = {value}");
    Ok(())
}

pub fn unset(provider: &Provider, key: &str) -> Result<()> {
    let spec = keys::lookup(key)?;
    let mut prefs = open_active(provider)?;
    prefs
        .store_mut()
        .edit()
        .remove(key)
        .commit()
        .with_context(|| format!("cannot remove {key}"))?;
    println!("{key} reset to default ({})", spec.default_value());
    Ok(())
}

pub fn dev_ip(provider: &Provider, ip: Option<&str>) -> Result<()> {
    let ip = ip.map(str::trim).unwrap_or_default();
    if ip.contains(char::is_whitespace) || ip.contains('/') {
        bail!("{ip:?} is not an IP address");
    }

    let mut prefs = open_active(provider)?;
    prefs
        .commit_dev_ip(ip)
        .context("cannot save the development server")?;

    if ip.is_empty() {
        println!("development mode off");
    } else {
        println!(
            "development mode on: {}",
            describe_server(&prefs.host_port())
        );
    }
    Ok(())
}

// -- Backup directories ------------------------------------------------------

pub fn backup_dirs_list(provider: &Provider) -> Result<()> {
    let prefs = open_active(provider)?;
    for dir in prefs.auto_backup_dirs() {
        println!("{dir}");
    }
    Ok(())
}

pub fn backup_dirs_add(provider: &Provider, dir: &str) -> Result<()> {
    if dir.is_empty() {
        bail!("backup directory must not be empty");
    }
    if dir.contains(LIST_SEPARATOR) {
        bail!("backup directory must not contain a newline");
    }

    let mut prefs = open_active(provider)?;
    let mut dirs = prefs.auto_backup_dirs();
    if dirs.iter().any(|d| d == dir) {
        println!("{dir} is already listed");
        return Ok(());
    }
    dirs.push(dir.to_string());
    prefs
        .commit_auto_backup_dirs(&dirs)
        .context("cannot save backup directories")?;
    println!("added {dir}");
    Ok(())
}

pub fn backup_dirs_remove(provider: &Provider, dir: &str) -> Result<()> {
    let mut prefs = open_active(provider)?;
    let mut dirs = prefs.auto_backup_dirs();
    let before = dirs.len();
    dirs.retain(|d| d != dir);
    if dirs.len() == before {
        bail!("{dir} is not a backup directory");
    }
    prefs
        .commit_auto_backup_dirs(&dirs)
        .context("cannot save backup directories")?;
    println!("removed {dir}");
    Ok(())
}

pub fn backup_dirs_clear(provider: &Provider) -> Result<()> {
    let mut prefs = open_active(provider)?;
    prefs
        .commit_auto_backup_dirs(&[])
        .context("cannot save backup directories")?;
    println!("backup directories cleared");
    Ok(())
}

// -- Profiles ----------------------------------------------------------------

pub fn profile_list(provider: &Provider) -> Result<()> {
    let profiles = open_profiles(provider)?;
    let current = profiles.current();
    for name in profiles.names() {
        let marker = if name == current { "*" } else { " " };
        println!("{marker} {name}");
    }
    Ok(())
}

pub fn profile_current(provider: &Provider) -> Result<()> {
    let profiles = open_profiles(provider)?;
    println!("{}", profiles.current());
    Ok(())
}

pub fn profile_use(provider: &Provider, name: &str) -> Result<()> {
    let mut profiles = open_profiles(provider)?;
    profiles.select(name)?;
    println!("using profile {name} (store {})", profiles.store_name());
    Ok(())
}

pub fn profile_add(provider: &Provider, name: &str) -> Result<()> {
    let mut profiles = open_profiles(provider)?;
    if profiles.add(name)? {
        println!("created profile {name}");
    } else {
        println!("profile {name} already exists");
    }
    Ok(())
}
