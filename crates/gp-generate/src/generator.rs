//! The generation pipeline: resolve parent, project, patch metadata, export,
//! optionally install.

use std::path::{Path, PathBuf};

use serde_yaml_ng::Value;

use gp_basis::{BasisTable, FlavorSelection, Projector};
use gp_core::{Error, Grid, Member, Result};
use gp_lhagrid::info::{FORCE_POSITIVE, NUM_MEMBERS};
use gp_lhagrid::{Info, Registry, SetWriter};

use crate::grid_spec::GridSpec;
use crate::source::ParentSource;
use crate::toy::ToyPdf;

const TEMPLATE_INFO: &str = include_str!("template.info");

/// Metadata used for synthetic parents.
pub fn template_info() -> Result<Info> {
    Info::parse(TEMPLATE_INFO)
}

/// What to generate.
#[derive(Debug, Default)]
pub struct GenerateRequest {
    /// Name of the new set (and of its directory).
    pub name: String,
    /// Where the unfiltered blocks come from.
    pub parent: ParentSource,
    /// Export every member of a named parent instead of member 0 only.
    pub all_members: bool,
    /// Metadata overrides, merged last. Must be a mapping.
    pub info_update: Option<Value>,
    /// Move the finished set into the registry.
    pub install: bool,
    /// Nodes for synthetic parents.
    pub grid: GridSpec,
}

impl GenerateRequest {
    /// Request for `name` with every other field at its default.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }
}

/// Result of a successful generation.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedSet {
    /// Set name.
    pub name: String,
    /// Final location of the set directory.
    pub path: PathBuf,
    /// Number of exported members.
    pub members: usize,
    /// Flavors declared in the metadata.
    pub flavors: Vec<i32>,
    /// True if the set was moved into the registry.
    pub installed: bool,
}

/// Unfiltered blocks plus the metadata and headers that go with them.
struct ParentBlocks {
    info: Info,
    members: Vec<Member>,
    headers: Option<Vec<String>>,
}

/// Generates debug sets. Sets are written to `<work_dir>/<name>`.
#[derive(Debug, Clone)]
pub struct Generator<'a> {
    table: &'a BasisTable,
    registry: Registry,
    work_dir: PathBuf,
}

impl<'a> Generator<'a> {
    /// Generator over `table`, reading parents from and installing into
    /// `registry`.
    pub fn new(table: &'a BasisTable, registry: Registry, work_dir: impl Into<PathBuf>) -> Self {
        Self { table, registry, work_dir: work_dir.into() }
    }

    /// Registry in use.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Directory new sets are written to.
    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Generate a set keeping only `labels` (all pids or all evolution
    /// labels, or the single label `custom`).
    ///
    /// Labels are checked before anything is read or written.
    pub fn generate<S: AsRef<str>>(
        &self,
        request: &GenerateRequest,
        labels: &[S],
    ) -> Result<GeneratedSet> {
        let selection = FlavorSelection::classify(self.table, labels)?;
        self.generate_selection(request, &selection)
    }

    /// Generate a set with an already classified selection.
    pub fn generate_selection(
        &self,
        request: &GenerateRequest,
        selection: &FlavorSelection,
    ) -> Result<GeneratedSet> {
        check_name(&request.name)?;
        if let Some(update) = &request.info_update
            && !update.is_mapping()
        {
            return Err(Error::InfoUpdate(format!(
                "expected a mapping of info keys, got {update:?}"
            )));
        }
        log::info!("generating '{}' from {:?} with {:?}", request.name, request.parent, selection);

        let parent = self.resolve(request)?;
        let projector = Projector::new(self.table);
        let members = parent
            .members
            .iter()
            .map(|blocks| projector.project(blocks, selection))
            .collect::<Result<Vec<_>>>()?;

        let mut info = parent.info;
        let flavors = exported_pids(&members);
        info.set_flavors(&flavors);
        info.insert(NUM_MEMBERS, members.len() as u64);
        if selection.mixes_flavors() {
            info.insert(FORCE_POSITIVE, 0u64);
        }
        if let Some(update) = &request.info_update {
            info.merge(update)?;
        }

        let writer = SetWriter::new(&self.work_dir);
        let dir = writer.dump_set(&request.name, &info, &members, parent.headers.as_deref())?;

        let path = if request.install { self.registry.install(&dir)? } else { dir };
        Ok(GeneratedSet {
            name: request.name.clone(),
            path,
            members: members.len(),
            flavors,
            installed: request.install,
        })
    }

    /// Move `<work_dir>/<name>` into the registry.
    pub fn install(&self, name: &str) -> Result<PathBuf> {
        check_name(name)?;
        self.registry.install(&self.work_dir.join(name))
    }

    fn resolve(&self, request: &GenerateRequest) -> Result<ParentBlocks> {
        let synthetic = |f: &(dyn Fn(i32, f64, f64) -> f64 + Sync)| -> Result<ParentBlocks> {
            request.grid.validate()?;
            let block = Grid::from_fn(
                f,
                self.table.pids().to_vec(),
                request.grid.xgrid(),
                request.grid.q2grid(),
            )?;
            Ok(ParentBlocks { info: template_info()?, members: vec![vec![block]], headers: None })
        };

        match &request.parent {
            ParentSource::Unset => synthetic(&|_pid: i32, x: f64, _q2: f64| x * (1.0 - x)),
            ParentSource::Toy => {
                let toy = ToyPdf;
                synthetic(&move |pid: i32, x: f64, q2: f64| toy.xfxq2(pid, x, q2))
            }
            ParentSource::Callables(map) => {
                if let Some(pid) = map.keys().find(|&&p| self.table.pid_position(p).is_none()) {
                    return Err(Error::Source(format!("pid {pid} is not part of the flavor basis")));
                }
                synthetic(&|pid: i32, x: f64, q2: f64| map.get(&pid).map_or(0.0, |f| f(x, q2)))
            }
            ParentSource::Named(name) => self.load_parent(name, request.all_members),
        }
    }

    fn load_parent(&self, name: &str, all_members: bool) -> Result<ParentBlocks> {
        if name.is_empty() {
            return Err(Error::Source("empty parent set name".into()));
        }
        let info = self.registry.load_info(name)?;
        let count = if all_members { info.num_members()? } else { 1 };
        if count == 0 {
            return Err(Error::Source(format!("parent set '{name}' declares no members")));
        }

        let mut members = Vec::with_capacity(count);
        let mut headers = Vec::with_capacity(count);
        for member in 0..count {
            let file = self.registry.load_member(name, member)?;
            headers.push(file.type_header());
            members.push(file.blocks);
        }
        log::debug!("loaded {} member(s) of '{}'", count, name);
        Ok(ParentBlocks { info, members, headers: Some(headers) })
    }
}

/// Pids of the exported columns, in order of first appearance.
fn exported_pids(members: &[Member]) -> Vec<i32> {
    let mut pids = Vec::new();
    for block in members.iter().flatten() {
        for &pid in block.pids() {
            if !pids.contains(&pid) {
                pids.push(pid);
            }
        }
    }
    pids
}

fn check_name(name: &str) -> Result<()> {
    let bad = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\'])
        || name.chars().any(char::is_whitespace);
    if bad {
        return Err(Error::Validation(format!("'{name}' is not a valid set name")));
    }
    Ok(())
}
