//! Shared fixtures: an in-memory stand-in for the Xcode tools and a scratch
//! build tree.
//!
//! Fake binaries are text files, one load command per line:
//!
//! ```text
//! id /opt/qt/lib/libfoo.dylib
//! lib /usr/lib/libSystem.B.dylib
//! rpath @executable_path/../Frameworks
//! ```

#![allow(dead_code)]

use kodegen_bundler_fixup::bundler::{
    BinaryTools, BundleLayout, Error, ErrorExt, LinkedLibraries, Result,
};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::TempDir;

/// A mutation the fake was asked to perform.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Op {
    Change {
        binary: PathBuf,
        old: String,
        new: String,
    },
    Id {
        binary: PathBuf,
        name: String,
    },
    AddRpath {
        binary: PathBuf,
        entry: String,
    },
    DeleteRpath {
        binary: PathBuf,
        entry: String,
    },
    Strip(PathBuf),
    Sign {
        bundle: PathBuf,
        identity: String,
    },
}

/// [`BinaryTools`] over text files, recording every call.
#[derive(Default)]
pub struct FakeTools {
    ops: Mutex<Vec<Op>>,
}

impl FakeTools {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> Vec<Op> {
        self.ops.lock().unwrap().clone()
    }

    /// Ops other than stripping, which every visited binary gets.
    pub fn rewrites(&self) -> Vec<Op> {
        self.ops()
            .into_iter()
            .filter(|op| !matches!(op, Op::Strip(_)))
            .collect()
    }

    pub fn clear(&self) {
        self.ops.lock().unwrap().clear();
    }

    fn record(&self, op: Op) {
        self.ops.lock().unwrap().push(op);
    }

    fn edit(&self, binary: &Path, f: impl FnOnce(&mut Vec<String>) -> Result<()>) -> Result<()> {
        let mut lines = read_lines(binary)?;
        f(&mut lines)?;
        let mut contents = lines.join("\n");
        contents.push('\n');
        std::fs::write(binary, contents).fs_context("writing fake binary", binary)
    }
}

impl BinaryTools for FakeTools {
    async fn linked_libraries(&self, binary: &Path) -> Result<LinkedLibraries> {
        let lines = read_lines(binary)?;
        Ok(LinkedLibraries {
            install_name: lines
                .iter()
                .find_map(|line| line.strip_prefix("id "))
                .map(str::to_string),
            dependencies: values(&lines, "lib "),
        })
    }

    async fn search_paths(&self, binary: &Path) -> Result<Vec<String>> {
        Ok(values(&read_lines(binary)?, "rpath "))
    }

    async fn change_reference(&self, binary: &Path, old: &str, new: &str) -> Result<()> {
        self.record(Op::Change {
            binary: binary.to_path_buf(),
            old: old.to_string(),
            new: new.to_string(),
        });
        let from = format!("lib {old}");
        self.edit(binary, |lines| {
            for line in lines.iter_mut().filter(|line| **line == from) {
                *line = format!("lib {new}");
            }
            Ok(())
        })
    }

    async fn set_install_name(&self, binary: &Path, name: &str) -> Result<()> {
        self.record(Op::Id {
            binary: binary.to_path_buf(),
            name: name.to_string(),
        });
        self.edit(binary, |lines| {
            match lines.iter_mut().find(|line| line.starts_with("id ")) {
                Some(line) => *line = format!("id {name}"),
                None => return Err(tool_failed("install_name_tool -id", "not a dylib")),
            }
            Ok(())
        })
    }

    async fn add_search_path(&self, binary: &Path, entry: &str) -> Result<()> {
        self.record(Op::AddRpath {
            binary: binary.to_path_buf(),
            entry: entry.to_string(),
        });
        let line = format!("rpath {entry}");
        self.edit(binary, |lines| {
            if lines.contains(&line) {
                return Err(tool_failed("install_name_tool -add_rpath", "would duplicate path"));
            }
            lines.push(line);
            Ok(())
        })
    }

    async fn delete_search_path(&self, binary: &Path, entry: &str) -> Result<()> {
        self.record(Op::DeleteRpath {
            binary: binary.to_path_buf(),
            entry: entry.to_string(),
        });
        let line = format!("rpath {entry}");
        self.edit(binary, |lines| match lines.iter().position(|l| *l == line) {
            Some(index) => {
                lines.remove(index);
                Ok(())
            }
            None => Err(tool_failed("install_name_tool -delete_rpath", "no such LC_RPATH")),
        })
    }

    async fn strip_symbols(&self, binary: &Path) -> Result<()> {
        self.record(Op::Strip(binary.to_path_buf()));
        Ok(())
    }

    async fn sign_bundle(&self, bundle: &Path, identity: &str) -> Result<()> {
        self.record(Op::Sign {
            bundle: bundle.to_path_buf(),
            identity: identity.to_string(),
        });
        Ok(())
    }
}

fn tool_failed(tool: &str, output: &str) -> Error {
    Error::ToolFailed {
        tool: tool.to_string(),
        status: 1,
        output: output.to_string(),
    }
}

fn read_lines(binary: &Path) -> Result<Vec<String>> {
    let contents = std::fs::read_to_string(binary).fs_context("reading fake binary", binary)?;
    Ok(contents
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect())
}

fn values(lines: &[String], prefix: &str) -> Vec<String> {
    lines
        .iter()
        .filter_map(|line| line.strip_prefix(prefix))
        .map(str::to_string)
        .collect()
}

/// Writes a fake binary, creating parent directories.
pub fn write_binary(path: &Path, commands: &[String]) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    let mut contents = commands.join("\n");
    contents.push('\n');
    std::fs::write(path, contents).unwrap();
}

/// Load commands of a fake binary, in file order.
pub fn commands(path: &Path) -> Vec<String> {
    read_lines(path).unwrap()
}

pub fn id(name: impl AsRef<str>) -> String {
    format!("id {}", name.as_ref())
}

pub fn lib(reference: impl AsRef<str>) -> String {
    format!("lib {}", reference.as_ref())
}

pub fn rpath(entry: impl AsRef<str>) -> String {
    format!("rpath {}", entry.as_ref())
}

pub fn display(path: &Path) -> String {
    path.display().to_string()
}

/// A scratch tree shaped like a finished CMake build against Qt 6:
///
/// ```text
/// <tmp>/build/CMakeCache.txt
/// <tmp>/build/melonDS.app/Contents/MacOS/melonDS   (not written)
/// <tmp>/qt/lib/
/// <tmp>/deps/
/// ```
pub struct Fixture {
    pub dir: TempDir,
    pub build: PathBuf,
    pub qt: PathBuf,
    pub deps: PathBuf,
    pub layout: BundleLayout,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        // Canonical so paths compare equal to normalized resolutions.
        let root = dir.path().canonicalize().unwrap();
        let build = root.join("build");
        let qt = root.join("qt");
        let deps = root.join("deps");

        let layout = BundleLayout::new(&build, "melonDS");
        std::fs::create_dir_all(layout.macos_dir()).unwrap();
        std::fs::create_dir_all(qt.join("lib")).unwrap();
        std::fs::create_dir_all(&deps).unwrap();

        std::fs::write(
            build.join("CMakeCache.txt"),
            format!(
                "# This is the CMakeCache file.\n\
                 CMAKE_BUILD_TYPE:STRING=Release\n\
                 Qt6_DIR:PATH={}/lib/cmake/Qt6\n",
                qt.display()
            ),
        )
        .unwrap();

        Self {
            dir,
            build,
            qt,
            deps,
            layout,
        }
    }

    pub fn executable(&self) -> PathBuf {
        self.layout.executable()
    }

    pub fn frameworks(&self) -> PathBuf {
        self.layout.frameworks_dir()
    }

    /// Writes `<name>` under `deps/` with an absolute install name.
    pub fn dep(&self, name: &str, libs: &[String]) -> PathBuf {
        let path = self.deps.join(name);
        let mut commands = vec![id(display(&path))];
        commands.extend_from_slice(libs);
        write_binary(&path, &commands);
        path
    }

    /// Writes `qt/lib/<Name>.framework` with the usual versioned layout,
    /// `Versions/Current` and top-level symlinks and a Headers directory.
    /// Returns the path of the inner library.
    pub fn framework(&self, name: &str, libs: &[String]) -> PathBuf {
        let root = self.qt.join("lib").join(format!("{name}.framework"));
        let version = root.join("Versions").join("A");
        let library = version.join(name);

        let mut commands = vec![id(display(&library))];
        commands.extend_from_slice(libs);
        write_binary(&library, &commands);

        std::fs::create_dir_all(version.join("Headers")).unwrap();
        std::fs::write(version.join("Headers").join(format!("{name}.h")), "#pragma once\n")
            .unwrap();

        std::os::unix::fs::symlink("A", root.join("Versions").join("Current")).unwrap();
        std::os::unix::fs::symlink(format!("Versions/Current/{name}"), root.join(name)).unwrap();
        std::os::unix::fs::symlink("Versions/Current/Headers", root.join("Headers")).unwrap();

        library
    }

    /// Lists `Contents/Frameworks`, sorted.
    pub fn bundled(&self) -> Vec<String> {
        let Ok(entries) = std::fs::read_dir(self.frameworks()) else {
            return Vec::new();
        };
        let mut names: Vec<String> = entries
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}
