//! Writing sets to disk.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use gp_core::{Grid, Member, Result};

use crate::info::Info;
use crate::member::{default_header, write_member};
use crate::registry::{info_file_name, member_file_name};

/// Writes sets as `<root>/<name>/`.
#[derive(Debug, Clone)]
pub struct SetWriter {
    root: PathBuf,
}

impl SetWriter {
    /// Writer rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Output root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory of set `name`.
    pub fn set_dir(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Write `<name>.info`.
    pub fn dump_info(&self, name: &str, info: &Info) -> Result<PathBuf> {
        let dir = self.set_dir(name);
        std::fs::create_dir_all(&dir)?;
        let path = dir.join(info_file_name(name));
        std::fs::write(&path, info.to_lhapdf_string()?)?;
        log::debug!("wrote {}", path.display());
        Ok(path)
    }

    /// Write `<name>_NNNN.dat`.
    ///
    /// Without `header_override` member 0 is declared central and every
    /// other member a replica.
    pub fn dump_member(
        &self,
        name: &str,
        member: usize,
        blocks: &[Grid],
        header_override: Option<&str>,
    ) -> Result<PathBuf> {
        let dir = self.set_dir(name);
        std::fs::create_dir_all(&dir)?;
        let path = dir.join(member_file_name(name, member));
        let header = header_override.unwrap_or_else(|| default_header(member));

        let mut out = BufWriter::new(File::create(&path)?);
        write_member(&mut out, header, blocks)?;
        out.flush()?;
        out.into_inner().map_err(|e| e.into_error())?.sync_all()?;
        log::debug!("wrote {} ({} block(s))", path.display(), blocks.len());
        Ok(path)
    }

    /// Write the info file and every member, in order from 0.
    ///
    /// `header_overrides[i]`, when present, replaces the header of member `i`.
    /// Member files left over from an earlier, larger set of the same name
    /// are removed.
    pub fn dump_set(
        &self,
        name: &str,
        info: &Info,
        members: &[Member],
        header_overrides: Option<&[String]>,
    ) -> Result<PathBuf> {
        self.dump_info(name, info)?;
        self.remove_stale_members(name, members.len())?;
        for (idx, blocks) in members.iter().enumerate() {
            let header = header_overrides.and_then(|h| h.get(idx)).map(String::as_str);
            self.dump_member(name, idx, blocks, header)?;
        }
        log::info!("wrote set '{}' with {} member(s)", name, members.len());
        Ok(self.set_dir(name))
    }

    fn remove_stale_members(&self, name: &str, keep: usize) -> Result<()> {
        for entry in std::fs::read_dir(self.set_dir(name))? {
            let entry = entry?;
            let file_name = entry.file_name();
            let Some(index) = file_name.to_str().and_then(|f| member_index(name, f)) else {
                continue;
            };
            if index >= keep {
                std::fs::remove_file(entry.path())?;
                log::debug!("removed stale member {}", entry.path().display());
            }
        }
        Ok(())
    }
}

/// Member number encoded in `<name>_NNNN.dat`.
fn member_index(name: &str, file_name: &str) -> Option<usize> {
    let digits = file_name.strip_prefix(name)?.strip_prefix('_')?.strip_suffix(".dat")?;
    if digits.len() < 4 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
