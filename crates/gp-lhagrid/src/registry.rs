//! Grid-set registry: the LHAPDF data directories.

use std::path::{Path, PathBuf};

use gp_core::{Error, Member, Result};

use crate::info::Info;
use crate::member::{MemberFile, parse_member};

/// Environment variable holding the registry search path.
pub const DATA_PATH_ENV: &str = "LHAPDF_DATA_PATH";

/// `<name>.info`
pub fn info_file_name(name: &str) -> String {
    format!("{name}.info")
}

/// `<name>_NNNN.dat`
pub fn member_file_name(name: &str, member: usize) -> String {
    format!("{name}_{member:04}.dat")
}

/// Read and parse an info file.
pub fn read_info(path: &Path) -> Result<Info> {
    let text = std::fs::read_to_string(path)?;
    Info::parse(&text).map_err(|e| Error::format(path, 0, e.to_string()))
}

/// Read and parse a member file.
pub fn read_member(path: &Path) -> Result<MemberFile> {
    let text = std::fs::read_to_string(path)?;
    parse_member(&text, path)
}

/// Ordered list of directories holding installed sets.
///
/// A set `NAME` lives in `<dir>/NAME/` with `NAME.info` and one
/// `NAME_NNNN.dat` per member; the first directory containing it wins.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    paths: Vec<PathBuf>,
}

impl Registry {
    /// Registry over explicit directories.
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self { paths }
    }

    /// Registry over the directories listed in `LHAPDF_DATA_PATH`.
    pub fn from_env() -> Self {
        let paths = std::env::var_os(DATA_PATH_ENV)
            .map(|v| std::env::split_paths(&v).filter(|p| !p.as_os_str().is_empty()).collect())
            .unwrap_or_default();
        Self { paths }
    }

    /// Search directories, in priority order.
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Directory of set `name`, if installed.
    pub fn find_set(&self, name: &str) -> Option<PathBuf> {
        self.paths
            .iter()
            .map(|p| p.join(name))
            .find(|dir| dir.join(info_file_name(name)).is_file())
    }

    /// True if set `name` is installed.
    pub fn contains(&self, name: &str) -> bool {
        self.find_set(name).is_some()
    }

    /// Names of all installed sets, sorted and deduplicated.
    pub fn list_sets(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for dir in &self.paths {
            if !dir.is_dir() {
                continue;
            }
            for entry in std::fs::read_dir(dir)? {
                let entry = entry?;
                let Some(name) = entry.file_name().to_str().map(String::from) else {
                    continue;
                };
                if entry.path().join(info_file_name(&name)).is_file() {
                    names.push(name);
                }
            }
        }
        names.sort();
        names.dedup();
        Ok(names)
    }

    /// Path of member `member` of set `name`.
    pub fn member_path(&self, name: &str, member: usize) -> Result<PathBuf> {
        let dir = self.find_set(name).ok_or_else(|| Error::SetNotFound(name.to_string()))?;
        Ok(dir.join(member_file_name(name, member)))
    }

    /// Metadata of set `name`.
    pub fn load_info(&self, name: &str) -> Result<Info> {
        let dir = self.find_set(name).ok_or_else(|| Error::SetNotFound(name.to_string()))?;
        let path = dir.join(info_file_name(name));
        log::debug!("reading {}", path.display());
        read_info(&path)
    }

    /// Header and blocks of one member.
    pub fn load_member(&self, name: &str, member: usize) -> Result<MemberFile> {
        let path = self.member_path(name, member)?;
        log::debug!("reading {}", path.display());
        read_member(&path)
    }

    /// Blocks of one member.
    pub fn load_blocks(&self, name: &str, member: usize) -> Result<Member> {
        Ok(self.load_member(name, member)?.blocks)
    }

    /// Directory new sets are installed into (the first search path).
    pub fn install_dir(&self) -> Result<&Path> {
        self.paths.first().map(PathBuf::as_path).ok_or_else(|| {
            Error::Validation(format!("no registry directory configured (set {DATA_PATH_ENV})"))
        })
    }

    /// Move the set directory `src` into [`Self::install_dir`].
    ///
    /// Fails if `src` is missing or the destination already exists; an
    /// existing destination is never touched.
    pub fn install(&self, src: &Path) -> Result<PathBuf> {
        if !src.is_dir() {
            return Err(Error::MissingSet(src.to_path_buf()));
        }
        let name = src
            .file_name()
            .ok_or_else(|| Error::Validation(format!("{} has no directory name", src.display())))?;
        let target_dir = self.install_dir()?;
        let dest = target_dir.join(name);
        if dest.exists() {
            return Err(Error::AlreadyInstalled(dest));
        }
        std::fs::create_dir_all(target_dir)?;

        match std::fs::rename(src, &dest) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::CrossesDevices => {
                log::debug!("rename across devices, copying {} instead", src.display());
                copy_dir(src, &dest)?;
                std::fs::remove_dir_all(src)?;
            }
            Err(e) => return Err(e.into()),
        }
        log::info!("installed {} into {}", src.display(), target_dir.display());
        Ok(dest)
    }
}

fn copy_dir(src: &Path, dest: &Path) -> Result<()> {
    std::fs::create_dir(dest)?;
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let target = dest.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_dir(&entry.path(), &target)?;
        } else {
            std::fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}
