#[cfg(test)]
mod tests {
    use assert_cmd::Command;
    use predicates::prelude::*;
    use std::path::Path;

    fn fixup() -> Command {
        let mut cmd = Command::cargo_bin("kodegen_bundler_fixup").unwrap();
        cmd.env_remove("FIXUP_PRODUCT_NAME")
            .env_remove("FIXUP_SIGNING_IDENTITY")
            .env_remove("FIXUP_CONFIG")
            .env("NO_COLOR", "1");
        cmd
    }

    fn build_tree(root: &Path, cache: &str) -> std::path::PathBuf {
        let build = root.join("build");
        std::fs::create_dir_all(build.join("melonDS.app/Contents/MacOS")).unwrap();
        std::fs::write(build.join("CMakeCache.txt"), cache).unwrap();
        build
    }

    #[test]
    fn test_help_lists_options() {
        fixup()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("--dmg"))
            .stdout(predicate::str::contains("--product-name"))
            .stdout(predicate::str::contains("--fallback-rpath"));
    }

    #[test]
    fn test_missing_build_dir_argument() {
        fixup().assert().failure().code(2);
    }

    #[test]
    fn test_nonexistent_build_dir() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("build");

        fixup()
            .arg(&missing)
            .assert()
            .code(1)
            .stderr(predicate::str::contains(format!(
                "{} doesn't exist",
                missing.display()
            )));
    }

    #[test]
    fn test_directory_without_bundle() {
        let dir = tempfile::tempdir().unwrap();

        fixup()
            .arg(dir.path())
            .assert()
            .code(1)
            .stderr(predicate::str::contains("doesn't look like a valid build directory"));
    }

    #[test]
    fn test_product_name_selects_bundle() {
        let dir = tempfile::tempdir().unwrap();
        let build = build_tree(dir.path(), "Qt6_DIR:PATH=/nonexistent/lib/cmake/Qt6\n");

        fixup()
            .arg("--product-name")
            .arg("Other")
            .arg(&build)
            .assert()
            .code(1)
            .stderr(predicate::str::contains("doesn't look like a valid build directory"));
    }

    #[test]
    fn test_cache_without_qt_entry() {
        let dir = tempfile::tempdir().unwrap();
        let build = build_tree(dir.path(), "CMAKE_BUILD_TYPE:STRING=Release\n");

        fixup()
            .arg(&build)
            .assert()
            .code(1)
            .stderr(predicate::str::contains("no Qt<N>_DIR:PATH entry found"));
    }

    #[test]
    fn test_missing_plugin_directory_lists_candidates() {
        let dir = tempfile::tempdir().unwrap();
        let qt = dir.path().join("qt");
        let build = build_tree(
            dir.path(),
            &format!("Qt6_DIR:PATH={}/lib/cmake/Qt6\n", qt.display()),
        );

        fixup()
            .arg(&build)
            .assert()
            .code(1)
            .stderr(predicate::str::contains("couldn't find Qt plugins, tried looking for:"))
            .stderr(predicate::str::contains(
                qt.join("libexec/qt6/plugins").display().to_string(),
            ))
            .stderr(predicate::str::contains(
                qt.join("share/qt/plugins").display().to_string(),
            ));
    }

    #[test]
    fn test_invalid_plugin_argument() {
        let dir = tempfile::tempdir().unwrap();

        fixup()
            .arg("--plugin")
            .arg("libqcocoa.dylib")
            .arg(dir.path())
            .assert()
            .code(1)
            .stderr(predicate::str::contains("Invalid plugin: libqcocoa.dylib"));
    }

    #[test]
    fn test_bad_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("fixup.toml");
        std::fs::write(&config, "no_such_option = 1\n").unwrap();

        fixup()
            .arg("--config")
            .arg(&config)
            .arg(dir.path())
            .assert()
            .code(1)
            .stderr(predicate::str::contains("fixup.toml"));
    }
}
