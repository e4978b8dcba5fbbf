use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::models::Month;

pub(crate) const DB_ENV: &str = "EXPENSE_SAVVY_DB";
const DB_FILE: &str = "expense_savvy.db";

/// Global options pulled out of the command line before dispatch.
#[derive(Debug, Clone, PartialEq, Default)]
pub(crate) struct Config {
    pub(crate) db_path: Option<PathBuf>,
    pub(crate) month: Option<Month>,
    /// Everything else, program name first.
    pub(crate) args: Vec<String>,
}

impl Config {
    pub(crate) fn from_args(args: Vec<String>) -> Result<Self> {
        let mut config = Self::default();
        let mut iter = args.into_iter();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--db" => {
                    let path = iter.next().context("--db needs a path")?;
                    config.db_path = Some(PathBuf::from(crate::run::shellexpand(&path)));
                }
                "--month" => {
                    let raw = iter.next().context("--month needs a YYYY-MM value")?;
                    config.month = Some(raw.parse()?);
                }
                _ => config.args.push(arg),
            }
        }
        Ok(config)
    }

    /// `--db`, then `$EXPENSE_SAVVY_DB`, then the platform data directory.
    pub(crate) fn resolve_db_path(&self) -> Result<PathBuf> {
        let env_path = std::env::var_os(DB_ENV).filter(|v| !v.is_empty()).map(PathBuf::from);
        if let Some(path) = self.db_path.clone().or(env_path) {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
            }
            return Ok(path);
        }
        default_db_path()
    }

    pub(crate) fn month_or_current(&self) -> Month {
        self.month.unwrap_or_else(Month::current)
    }
}

fn default_db_path() -> Result<PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "expense-savvy", "ExpenseSavvy")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;
    Ok(data_dir.join(DB_FILE))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_global_flags_are_stripped() {
        let config = Config::from_args(args(&[
            "expense-savvy",
            "--db",
            "/tmp/x.db",
            "summary",
            "--month",
            "2025-04",
            "--json",
        ]))
        .unwrap();
        assert_eq!(config.db_path, Some(PathBuf::from("/tmp/x.db")));
        assert_eq!(config.month, Some("2025-04".parse().unwrap()));
        assert_eq!(config.args, args(&["expense-savvy", "summary", "--json"]));
    }

    #[test]
    fn test_no_flags() {
        let config = Config::from_args(args(&["expense-savvy", "list"])).unwrap();
        assert!(config.db_path.is_none());
        assert!(config.month.is_none());
        assert_eq!(config.args.len(), 2);
    }

    #[test]
    fn test_flag_missing_value() {
        assert!(Config::from_args(args(&["expense-savvy", "--db"])).is_err());
        assert!(Config::from_args(args(&["expense-savvy", "--month"])).is_err());
    }

    #[test]
    fn test_bad_month_is_rejected() {
        let err = Config::from_args(args(&["expense-savvy", "--month", "2025-13"])).unwrap_err();
        assert!(err.to_string().contains("expected YYYY-MM"));
    }

    #[test]
    fn test_explicit_db_path_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("data.db");
        let config = Config {
            db_path: Some(path.clone()),
            ..Config::default()
        };
        assert_eq!(config.resolve_db_path().unwrap(), path);
        assert!(dir.path().join("nested").is_dir());
    }
}
