use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::markup::{Converter, parse_colors};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigFlags {
    pub colors: Option<Vec<String>>,
    pub escape_html: bool,
}

impl ConfigFlags {
    pub fn union(&self, other: &Self) -> Self {
        Self {
            colors: other.colors.clone().or_else(|| self.colors.clone()),
            escape_html: self.escape_html || other.escape_html,
        }
    }

    /// Converter for these flags. No configured colors selects the defaults.
    pub fn converter(&self) -> Converter {
        let colors = self.colors.as_deref().unwrap_or_default();
        Converter::new(colors).with_escape_html(self.escape_html)
    }
}

pub fn global_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("notemark").join("config");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("notemark")
                .join("config");
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("notemark").join("config");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(".config").join("notemark").join("config");
        }
    }

    PathBuf::from(".notemarkrc")
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(".notemarkrc")
}

/// Load flags from a config file. A missing file yields the defaults.
///
/// # Errors
///
/// Returns an error if the file cannot be read or lists an invalid color.
pub fn load_config_flags(path: &Path) -> Result<ConfigFlags> {
    if !path.exists() {
        return Ok(ConfigFlags::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let tokens = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .flat_map(|line| line.split_whitespace().map(ToOwned::to_owned))
        .collect::<Vec<_>>();
    parse_flag_tokens(&tokens).with_context(|| format!("Invalid config {}", path.display()))
}

/// Persist flags so later runs pick them up.
///
/// # Errors
///
/// Returns an error if the config directory or file cannot be written.
pub fn save_config_flags(path: &Path, flags: &ConfigFlags) -> Result<()> {
    let mut lines = Vec::new();
    lines.push("# notemark defaults (saved with --save)".to_string());
    if let Some(colors) = &flags.colors {
        let digits: Vec<&str> = colors
            .iter()
            .map(|c| c.strip_prefix('#').unwrap_or(c))
            .collect();
        lines.push(format!("--colors={}", digits.join(",")));
    }
    if flags.escape_html {
        lines.push("--escape-html".to_string());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
    }
    fs::write(path, format!("{}\n", lines.join("\n")))
        .with_context(|| format!("Failed to write config {}", path.display()))
}

/// Remove a saved config file, if any.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be removed.
pub fn clear_config_flags(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}

/// Extract known flags from command-line style tokens. Unknown tokens are skipped.
///
/// # Errors
///
/// Returns an error if a `--colors` value contains an invalid color.
pub fn parse_flag_tokens(tokens: &[String]) -> Result<ConfigFlags> {
    let mut flags = ConfigFlags::default();
    let mut i = 0;
    while i < tokens.len() {
        let token = &tokens[i];
        if token == "--escape-html" {
            flags.escape_html = true;
        } else if token == "--colors" {
            if let Some(next) = tokens.get(i + 1) {
                flags.colors = Some(parse_color_flag(next)?);
                i += 1;
            }
        } else if let Some(value) = token.strip_prefix("--colors=") {
            flags.colors = Some(parse_color_flag(value)?);
        }
        i += 1;
    }
    Ok(flags)
}

fn parse_color_flag(value: &str) -> Result<Vec<String>> {
    parse_colors(value).with_context(|| format!("Invalid --colors value `{value}`"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_parse_flag_tokens_extracts_known_flags() {
        let tokens = args(&[
            "notemark",
            "--escape-html",
            "--colors",
            "b03830 5d62f0",
            "note.txt",
        ]);
        let flags = parse_flag_tokens(&tokens).unwrap();
        assert!(flags.escape_html);
        assert_eq!(
            flags.colors,
            Some(vec!["#b03830".to_string(), "#5d62f0".to_string()])
        );
    }

    #[test]
    fn test_parse_flag_tokens_rejects_bad_color() {
        let tokens = args(&["--colors=zzz"]);
        assert!(parse_flag_tokens(&tokens).is_err());
    }

    #[test]
    fn test_config_union_merges_cli_over_file_for_options() {
        let file = ConfigFlags {
            colors: Some(vec!["#111".to_string()]),
            escape_html: true,
        };
        let cli = ConfigFlags {
            colors: Some(vec!["#222".to_string()]),
            ..ConfigFlags::default()
        };
        let merged = file.union(&cli);
        assert!(merged.escape_html);
        assert_eq!(merged.colors, Some(vec!["#222".to_string()]));
    }

    #[test]
    fn test_converter_uses_configured_colors() {
        let flags = ConfigFlags {
            colors: Some(vec!["#abcdef".to_string()]),
            ..ConfigFlags::default()
        };
        let converter = flags.converter();
        assert!(converter.has_token('1'));
        assert!(!converter.has_token('2'));
    }

    #[test]
    fn test_converter_defaults_without_colors() {
        let converter = ConfigFlags::default().converter();
        assert!(converter.has_token('3'));
    }

    #[test]
    fn test_save_load_and_clear_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(".notemarkrc");
        let flags = ConfigFlags {
            colors: Some(vec!["#b03830".to_string(), "#b0972a".to_string()]),
            escape_html: true,
        };

        save_config_flags(&path, &flags).unwrap();
        let loaded = load_config_flags(&path).unwrap();
        assert_eq!(loaded, flags);

        clear_config_flags(&path).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_load_missing_file_is_default() {
        let dir = tempdir().unwrap();
        let loaded = load_config_flags(&dir.path().join("absent")).unwrap();
        assert_eq!(loaded, ConfigFlags::default());
    }
}
