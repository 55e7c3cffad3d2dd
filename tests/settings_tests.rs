#[cfg(test)]
mod tests {
    use kodegen_bundler_fixup::bundler::{
        DEFAULT_PLUGINS, Error, FixupConfig, SettingsBuilder,
    };
    use kodegen_bundler_fixup::metadata::ToolkitInstall;
    use std::path::{Path, PathBuf};

    #[test]
    fn test_toolkit_root_is_three_levels_above_cmake_dir() {
        let cache = "\
# This is the CMakeCache file.
CMAKE_BUILD_TYPE:STRING=Release
Qt6_DIR:PATH=/opt/homebrew/opt/qt/lib/cmake/Qt6
Qt6Core_DIR:PATH=/opt/homebrew/opt/qt/lib/cmake/Qt6Core
";
        let toolkit = ToolkitInstall::parse(cache, Path::new("CMakeCache.txt")).unwrap();

        assert_eq!(toolkit.major, 6);
        assert_eq!(toolkit.root, PathBuf::from("/opt/homebrew/opt/qt"));
        assert_eq!(toolkit.lib_dir(), PathBuf::from("/opt/homebrew/opt/qt/lib"));
        assert_eq!(
            toolkit.plugin_candidates(),
            vec![
                PathBuf::from("/opt/homebrew/opt/qt/libexec/qt6/plugins"),
                PathBuf::from("/opt/homebrew/opt/qt/plugins"),
                PathBuf::from("/opt/homebrew/opt/qt/share/qt/plugins"),
            ]
        );
    }

    #[test]
    fn test_first_qt_entry_wins() {
        let cache = "Qt5_DIR:PATH=/usr/local/qt5/lib/cmake/Qt5\nQt6_DIR:PATH=/usr/local/qt6/lib/cmake/Qt6\n";
        let toolkit = ToolkitInstall::parse(cache, Path::new("CMakeCache.txt")).unwrap();

        assert_eq!(toolkit.major, 5);
        assert_eq!(toolkit.root, PathBuf::from("/usr/local/qt5"));
    }

    #[test]
    fn test_cache_without_qt_entry_fails() {
        let cache = "CMAKE_BUILD_TYPE:STRING=Release\nQt6Core_DIR:PATH=/x/lib/cmake/Qt6Core\n";
        let err = ToolkitInstall::parse(cache, Path::new("build/CMakeCache.txt")).unwrap_err();

        assert!(matches!(err, Error::ToolkitNotFound(path) if path == Path::new("build/CMakeCache.txt")));
    }

    #[test]
    fn test_toolkit_from_cache_file() {
        let dir = tempfile::tempdir().unwrap();
        let cache = dir.path().join("CMakeCache.txt");
        std::fs::write(&cache, "Qt6_DIR:PATH=/opt/qt/6.7.0/macos/lib/cmake/Qt6\n").unwrap();

        let toolkit = ToolkitInstall::from_cmake_cache(&cache).unwrap();
        assert_eq!(toolkit.root, PathBuf::from("/opt/qt/6.7.0/macos"));

        let missing = dir.path().join("nope/CMakeCache.txt");
        assert!(matches!(
            ToolkitInstall::from_cmake_cache(&missing).unwrap_err(),
            Error::Fs { .. }
        ));
    }

    #[test]
    fn test_defaults() {
        let settings = SettingsBuilder::new().build_dir("build").build().unwrap();

        assert_eq!(settings.product_name(), "melonDS");
        assert_eq!(settings.build_dir(), Path::new("build"));
        assert!(settings.macos().is_ad_hoc());
        assert_eq!(settings.macos().plugins, DEFAULT_PLUGINS);
        assert_eq!(
            settings.macos().fallback_rpaths,
            vec![PathBuf::from("/usr/local/lib"), PathBuf::from("/opt/local/lib")]
        );
        assert!(!settings.dmg().enabled);
        assert_eq!(settings.dmg().format, "UDBZ");
        assert_eq!(settings.dmg().filesystem, "HFS+");
    }

    #[test]
    fn test_builder_values_override_config_file() {
        let config = FixupConfig::parse(
            r#"
product_name = "FromConfig"
signing_identity = "Developer ID Application: Example"
plugins = ["platforms/libqcocoa.dylib"]
fallback_rpaths = ["/opt/homebrew/lib"]
dmg_format = "UDZO"
"#,
        )
        .unwrap();

        let settings = SettingsBuilder::new()
            .build_dir("build")
            .config(config)
            .product_name("FromCli")
            .extra_fallback_rpaths(vec![PathBuf::from("/extra/lib")])
            .dmg(true)
            .build()
            .unwrap();

        assert_eq!(settings.product_name(), "FromCli");
        assert_eq!(
            settings.macos().signing_identity,
            "Developer ID Application: Example"
        );
        assert!(!settings.macos().is_ad_hoc());
        assert_eq!(settings.macos().plugins, vec!["platforms/libqcocoa.dylib"]);
        assert_eq!(
            settings.macos().fallback_rpaths,
            vec![
                PathBuf::from("/usr/local/lib"),
                PathBuf::from("/opt/local/lib"),
                PathBuf::from("/opt/homebrew/lib"),
                PathBuf::from("/extra/lib"),
            ]
        );
        assert!(settings.dmg().enabled);
        assert_eq!(settings.dmg().format, "UDZO");
    }

    #[test]
    fn test_empty_plugin_list_keeps_default() {
        let settings = SettingsBuilder::new()
            .build_dir("build")
            .plugins(Vec::new())
            .build()
            .unwrap();

        assert_eq!(settings.macos().plugins.len(), 3);
    }

    #[test]
    fn test_invalid_settings_are_rejected() {
        assert!(SettingsBuilder::new().build().is_err());
        assert!(
            SettingsBuilder::new()
                .build_dir("build")
                .product_name("  ")
                .build()
                .is_err()
        );
        assert!(matches!(
            FixupConfig::parse("unknown_key = true").unwrap_err(),
            Error::TomlError(_)
        ));
    }

    #[test]
    fn test_config_file_errors_name_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fixup.toml");
        std::fs::write(&path, "plugins = 3\n").unwrap();

        let err = FixupConfig::load(&path).unwrap_err();
        assert!(err.to_string().contains("fixup.toml"));
        assert!(matches!(err.root(), Error::TomlError(_)));
    }
}
