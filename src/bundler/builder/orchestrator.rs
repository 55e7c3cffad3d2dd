//! Main fixup orchestration.
//!
//! This module provides the [`Fixup`] orchestrator that runs every pipeline
//! step against the bundle described by [`Settings`].

use crate::{
    bundler::{
        Result, Settings,
        platform::macos::{
            dmg,
            dylib::{BinaryTools, DylibWalker, XcodeTools},
            layout::BundleLayout,
            plugins, rpath, sign,
        },
    },
    metadata::ToolkitInstall,
};
use std::path::PathBuf;

/// What a successful run produced.
#[derive(Clone, Debug)]
pub struct FixupReport {
    /// Paths of the processed bundle.
    pub layout: BundleLayout,

    /// Qt installation the libraries and plugins were taken from.
    pub toolkit: ToolkitInstall,

    /// Libraries and frameworks copied into `Contents/Frameworks` by this
    /// run, sorted. Empty on a rerun over a finished bundle.
    pub bundled: Vec<PathBuf>,

    /// Plugins deployed into `Contents/PlugIns`.
    pub plugins: Vec<PathBuf>,

    /// The disk image, if one was requested.
    pub dmg: Option<PathBuf>,
}

/// Main fixup orchestrator.
///
/// Runs the pipeline once: locate the bundle, read the Qt installation,
/// walk the executable's dependencies, deploy plugins, normalize search
/// paths, remove headers, sign, and optionally package a DMG. Every step
/// completes before the next one starts, and the first error aborts the run.
///
/// # Examples
///
/// ```no_run
/// use kodegen_bundler_fixup::bundler::{Fixup, Settings};
///
/// # async fn example(settings: Settings) -> kodegen_bundler_fixup::bundler::Result<()> {
/// let report = Fixup::new(settings).run().await?;
/// if let Some(dmg) = report.dmg {
///     println!("Created: {}", dmg.display());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Fixup<T: BinaryTools = XcodeTools> {
    settings: Settings,
    tools: T,
}

impl Fixup<XcodeTools> {
    /// Creates an orchestrator that uses the Xcode command-line tools.
    pub fn new(settings: Settings) -> Self {
        Self::with_tools(settings, XcodeTools)
    }
}

impl<T: BinaryTools> Fixup<T> {
    /// Creates an orchestrator with a custom [`BinaryTools`] implementation.
    pub fn with_tools(settings: Settings, tools: T) -> Self {
        Self { settings, tools }
    }

    /// Returns the settings this orchestrator runs with.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Returns the tools used to read and rewrite binaries.
    pub fn tools(&self) -> &T {
        &self.tools
    }

    /// Runs the whole pipeline.
    ///
    /// Everything that only reads (bundle location, build cache, plugin
    /// directory, tool availability) is checked before the bundle is
    /// modified.
    pub async fn run(&self) -> Result<FixupReport> {
        let settings = &self.settings;
        let macos = settings.macos();

        let layout = BundleLayout::locate(settings.build_dir(), settings.product_name())?;
        let toolkit = ToolkitInstall::from_cmake_cache(&layout.build_cache())?;
        let plugin_root = plugins::find_plugin_root(&toolkit.plugin_candidates())?;
        log::info!("Using Qt plugins from {}", plugin_root.display());

        self.tools.preflight(settings.dmg().enabled)?;

        let mut fallback_dirs = macos.fallback_rpaths.clone();
        fallback_dirs.push(toolkit.lib_dir());

        let executable = layout.executable();
        let mut walker = DylibWalker::new(&self.tools, &layout, fallback_dirs);

        log::info!("Bundling libraries for {}", layout.product_name());
        walker.fixup(&executable, &executable).await?;

        let deployed = plugins::deploy_plugins(&mut walker, &plugin_root, &macos.plugins).await?;

        let mut bundled = walker.copied().to_vec();
        bundled.sort();
        drop(walker);
        log::info!("Bundled {} libraries into Frameworks/", bundled.len());

        rpath::normalize_rpaths(&self.tools, &executable).await?;

        let removed = sign::remove_headers(&layout.frameworks_dir()).await?;
        log::debug!("Removed {} Headers entries", removed);

        self.tools
            .sign_bundle(layout.bundle(), &macos.signing_identity)
            .await?;

        let dmg = if settings.dmg().enabled {
            Some(dmg::create_dmg(&layout, settings.dmg()).await?)
        } else {
            None
        };

        Ok(FixupReport {
            layout,
            toolkit,
            bundled,
            plugins: deployed,
            dmg,
        })
    }
}
