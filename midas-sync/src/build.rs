//! Site build: run the external generator in the site root.

use std::process::{Command, Output};

use midas_core::SiteConfig;

use crate::error::SyncError;

/// Arguments passed to the generator for one build.
pub fn build_args(site: &SiteConfig, use_cache: bool) -> Vec<String> {
    let flag = &site.generator.ignore_cache_flag;
    if use_cache || flag.is_empty() {
        Vec::new()
    } else {
        vec![flag.clone()]
    }
}

/// Run the generator synchronously with `root_dir` as working directory.
///
/// A non-zero exit becomes [`SyncError::Build`] carrying stdout and stderr verbatim.
pub fn build_site(site: &SiteConfig, use_cache: bool) -> Result<(), SyncError> {
    let program = &site.generator.program;
    let args = build_args(site, use_cache);
    tracing::info!(
        "building site in {} ({program} {})",
        site.root_dir.display(),
        args.join(" ")
    );

    let output = Command::new(program)
        .args(&args)
        .current_dir(&site.root_dir)
        .output()
        .map_err(|source| SyncError::Spawn {
            program: program.clone(),
            source,
        })?;

    if !output.status.success() {
        return Err(SyncError::Build {
            program: program.clone(),
            status: output.status,
            output: combined_output(&output),
        });
    }

    tracing::debug!("{program} finished: {}", output.status);
    Ok(())
}

fn combined_output(output: &Output) -> String {
    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
    text.push_str(&String::from_utf8_lossy(&output.stderr));
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use midas_core::ErrorKind;
    use tempfile::TempDir;

    fn site_with(program: &str) -> (TempDir, SiteConfig) {
        let root = TempDir::new().unwrap();
        let mut site = SiteConfig::new(root.path());
        site.generator.program = program.to_string();
        (root, site)
    }

    #[test]
    fn cache_flag_only_when_cache_disabled() {
        let (_root, site) = site_with("hugo");
        assert!(build_args(&site, true).is_empty());
        assert_eq!(build_args(&site, false), vec!["--ignoreCache".to_string()]);
    }

    #[test]
    fn empty_flag_is_never_passed() {
        let (_root, mut site) = site_with("hugo");
        site.generator.ignore_cache_flag.clear();
        assert!(build_args(&site, false).is_empty());
    }

    #[test]
    fn missing_program_is_spawn_error() {
        let (_root, site) = site_with("midas-no-such-generator");
        let err = build_site(&site, true).unwrap_err();
        assert!(matches!(err, SyncError::Spawn { .. }), "got: {err}");
        assert_eq!(err.kind(), ErrorKind::Internal);
    }

    #[test]
    #[cfg(unix)]
    fn successful_build_runs_in_root() {
        let (root, site) = site_with("true");
        build_site(&site, true).unwrap();
        assert!(root.path().is_dir());
    }

    #[test]
    #[cfg(unix)]
    fn failing_build_carries_status() {
        let (_root, site) = site_with("false");
        let err = build_site(&site, true).unwrap_err();
        match err {
            SyncError::Build { status, .. } => assert!(!status.success()),
            other => panic!("expected Build, got {other}"),
        }
    }

    #[test]
    #[cfg(unix)]
    fn failing_build_reports_stdout_then_stderr_verbatim() {
        let (root, mut site) = site_with("sh");
        // The cache flag doubles as the script name; it resolves against the root.
        std::fs::write(
            root.path().join("gen.sh"),
            "echo 'out line'\necho 'err line' >&2\nexit 3\n",
        )
        .unwrap();
        site.generator.ignore_cache_flag = "gen.sh".into();

        let err = build_site(&site, false).unwrap_err();
        match err {
            SyncError::Build { status, output, .. } => {
                assert_eq!(status.code(), Some(3));
                assert_eq!(output, "out line\nerr line\n");
            }
            other => panic!("expected Build, got {other}"),
        }
    }
}
