use super::*;
use crate::config::Viewport;

fn config_with(mutate: impl FnOnce(&mut LaunchConfig)) -> LaunchConfig {
    let mut config = LaunchConfig::default();
    mutate(&mut config);
    config
}

#[test]
fn test_build_args_includes_port_and_profile() {
    let config = LaunchConfig::default();
    let args = build_args(&config, Path::new("/tmp/profile"));
    assert!(args.contains(&"--remote-debugging-port=9222".to_string()));
    assert!(args.contains(&"--user-data-dir=/tmp/profile".to_string()));
}

#[test]
fn test_build_args_headless_flag() {
    let headless = build_args(&LaunchConfig::default(), Path::new("/tmp/p"));
    assert!(headless.contains(&"--headless=new".to_string()));

    let headed = build_args(
        &config_with(|c| c.headless = false),
        Path::new("/tmp/p"),
    );
    assert!(!headed.contains(&"--headless=new".to_string()));
}

#[test]
fn test_build_args_filters_ignored_defaults() {
    let config = config_with(|c| {
        c.ignored_default_args = vec!["--disable-extensions".to_string()];
    });
    let args = build_args(&config, Path::new("/tmp/p"));
    assert!(!args.contains(&"--disable-extensions".to_string()));
    assert!(args.contains(&"--no-first-run".to_string()));
}

#[test]
fn test_build_args_appends_execution_args_last() {
    let config = config_with(|c| {
        c.execution_args = vec!["--single-process".to_string()];
    });
    let args = build_args(&config, Path::new("/tmp/p"));
    assert_eq!(args.last(), Some(&"--single-process".to_string()));
}

#[test]
fn test_build_args_certificate_and_viewport_flags() {
    let config = config_with(|c| {
        c.ignore_certificate_errors = true;
        c.viewport = Some(Viewport {
            width: 1280,
            height: 720,
        });
    });
    let args = build_args(&config, Path::new("/tmp/p"));
    assert!(args.contains(&"--ignore-certificate-errors".to_string()));
    assert!(args.contains(&"--window-size=1280,720".to_string()));
}

#[test]
fn test_constrained_launcher_requires_configured_executable() {
    let result = ConstrainedLauncher.resolve_executable(&LaunchConfig::default());
    assert!(matches!(result, Err(BrowserError::ExecutableNotConfigured)));

    let config = config_with(|c| c.executable_path = Some(PathBuf::from("/opt/chromium/chrome")));
    let resolved = ConstrainedLauncher.resolve_executable(&config).unwrap();
    assert_eq!(resolved, PathBuf::from("/opt/chromium/chrome"));
}

#[test]
fn test_local_launcher_prefers_configured_executable() {
    let config = config_with(|c| c.executable_path = Some(PathBuf::from("/usr/bin/chromium")));
    let resolved = LocalLauncher.resolve_executable(&config).unwrap();
    assert_eq!(resolved, PathBuf::from("/usr/bin/chromium"));
}

#[test]
fn test_launcher_for_environment() {
    // Variant selection only; both are zero-sized.
    let constrained = launcher_for(&ExecutionEnvironment::Constrained);
    assert!(matches!(
        constrained.resolve_executable(&LaunchConfig::default()),
        Err(BrowserError::ExecutableNotConfigured)
    ));

    let local = launcher_for(&ExecutionEnvironment::Local);
    let config = config_with(|c| c.executable_path = Some(PathBuf::from("/usr/bin/chromium")));
    assert!(local.resolve_executable(&config).is_ok());
}

#[test]
fn test_find_browser_does_not_panic() {
    let _result = find_browser();
}
