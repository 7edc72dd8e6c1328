//! Project and workspace model.
//!
//! A project is a set of workspaces discovered from a root `package.json`
//! plus a read-only view of the already-resolved dependency graph. The
//! manifest grammar understood here is the minimal npm shape the core
//! needs; full resolution and materialization live behind the [`Cache`]
//! seam.

use crate::cache::{Cache, CacheOutcome};
use crate::error::{SproutError, SproutResult};
use crate::report::{MessageName, Report};
use crate::types::{Descriptor, Ident, Locator, Manifest, Target, Version};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// On-disk package.json shape
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ManifestFile {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    workspaces: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dependencies: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dev_dependencies: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    peer_dependencies: Option<BTreeMap<String, String>>,
}

/// One workspace: a manifest with an identity and a concrete local version
#[derive(Debug, Clone)]
pub struct Workspace {
    pub ident: Ident,
    pub version: Version,
    pub manifest: Manifest,
    dir: Option<PathBuf>,
    workspace_dirs: Vec<String>,
}

impl Workspace {
    /// Create an in-memory workspace with no backing file
    pub fn new(ident: Ident, version: Version) -> Self {
        Self {
            ident,
            version,
            manifest: Manifest::new(),
            dir: None,
            workspace_dirs: Vec::new(),
        }
    }

    /// The locator identifying this workspace inside its project
    pub fn locator(&self) -> Locator {
        let reference = match &self.dir {
            Some(dir) => format!("workspace:{}", dir.display()),
            None => format!("workspace:{}", self.ident),
        };
        Locator::new(self.ident.clone(), reference)
    }

    /// Load a workspace from `<dir>/package.json`
    pub async fn load(dir: &Path) -> SproutResult<Self> {
        let path = dir.join("package.json");
        let content = fs::read_to_string(&path).await.map_err(|error| {
            if error.kind() == std::io::ErrorKind::NotFound {
                SproutError::ManifestNotFound {
                    path: path.display().to_string(),
                }
            } else {
                SproutError::io(format!("Failed to read {}", path.display()), error)
            }
        })?;

        let file: ManifestFile =
            serde_json::from_str(&content).map_err(|error| SproutError::ManifestParse {
                path: path.display().to_string(),
                message: error.to_string(),
            })?;

        Self::from_file(file, Some(dir.to_path_buf()))
    }

    fn from_file(file: ManifestFile, dir: Option<PathBuf>) -> SproutResult<Self> {
        let ident: Ident = file.name.parse()?;
        let version = match &file.version {
            Some(raw) => Version::parse(raw).map_err(|error| SproutError::VersionParse {
                input: raw.clone(),
                message: error.to_string(),
            })?,
            None => Version::new(0, 0, 0),
        };

        let mut manifest = Manifest::new();
        let sections = [
            (Target::Regular, &file.dependencies),
            (Target::Development, &file.dev_dependencies),
            (Target::Peer, &file.peer_dependencies),
        ];
        for (target, entries) in sections {
            for (name, range) in entries.iter().flatten() {
                let dep_ident: Ident = name.parse()?;
                manifest.set(target, Descriptor::new(dep_ident, range.clone()));
            }
        }

        Ok(Self {
            ident,
            version,
            manifest,
            dir,
            workspace_dirs: file.workspaces.unwrap_or_default(),
        })
    }

    fn to_file(&self) -> ManifestFile {
        let section = |target: Target| -> Option<BTreeMap<String, String>> {
            let entries = self.manifest.section(target);
            if entries.is_empty() {
                return None;
            }
            Some(
                entries
                    .values()
                    .map(|descriptor| (descriptor.ident.to_string(), descriptor.range.clone()))
                    .collect(),
            )
        };

        ManifestFile {
            name: self.ident.to_string(),
            version: Some(self.version.to_string()),
            workspaces: if self.workspace_dirs.is_empty() {
                None
            } else {
                Some(self.workspace_dirs.clone())
            },
            dependencies: section(Target::Regular),
            dev_dependencies: section(Target::Development),
            peer_dependencies: section(Target::Peer),
        }
    }

    /// Write the manifest back to `package.json`. In-memory workspaces
    /// have no backing file and persist nothing.
    pub async fn persist(&self) -> SproutResult<()> {
        let Some(dir) = &self.dir else {
            return Ok(());
        };
        let path = dir.join("package.json");

        let mut content = serde_json::to_string_pretty(&self.to_file()).map_err(|error| {
            SproutError::ManifestParse {
                path: path.display().to_string(),
                message: error.to_string(),
            }
        })?;
        content.push('\n');

        fs::write(&path, content)
            .await
            .map_err(|error| SproutError::io(format!("Failed to write {}", path.display()), error))
    }
}

/// The whole project: workspaces plus the resolved-graph view
#[derive(Debug)]
pub struct Project {
    pub workspaces: Vec<Workspace>,
    active: usize,
    installed: HashMap<Ident, BTreeSet<Version>>,
}

impl Project {
    /// Build a project from pre-loaded workspaces; the first one is active
    pub fn new(workspaces: Vec<Workspace>) -> Self {
        assert!(!workspaces.is_empty(), "a project has at least one workspace");
        Self {
            workspaces,
            active: 0,
            installed: HashMap::new(),
        }
    }

    /// Discover the project rooted at `cwd`: the root workspace plus every
    /// directory listed in its `workspaces` field.
    pub async fn find(cwd: &Path) -> SproutResult<Self> {
        let root = Workspace::load(cwd).await?;
        debug!(root = %root.ident, "discovered project root");

        let mut workspaces = vec![root];
        for dir in workspaces[0].workspace_dirs.clone() {
            let workspace = Workspace::load(&cwd.join(&dir)).await?;
            debug!(workspace = %workspace.ident, dir, "discovered workspace");
            workspaces.push(workspace);
        }

        Ok(Self::new(workspaces))
    }

    /// The workspace commands operate on
    pub fn active_workspace(&self) -> &Workspace {
        &self.workspaces[self.active]
    }

    pub fn active_workspace_mut(&mut self) -> &mut Workspace {
        &mut self.workspaces[self.active]
    }

    /// Find the workspace carrying the given ident, if any
    pub fn workspace_by_ident(&self, ident: &Ident) -> Option<&Workspace> {
        self.workspaces
            .iter()
            .find(|workspace| workspace.ident == *ident)
    }

    /// Record a package version as present in the resolved graph
    pub fn register_installed(&mut self, ident: Ident, version: Version) {
        self.installed.entry(ident).or_default().insert(version);
    }

    /// Versions of an ident already present in the resolved graph
    pub fn installed_versions(&self, ident: &Ident) -> Option<&BTreeSet<Version>> {
        self.installed.get(ident)
    }

    /// Perform the install, reporting progress and cache accounting
    /// through the given report.
    ///
    /// Walks every workspace's regular and development dependencies and
    /// ensures each through the cache. Peer dependencies are the consumer's
    /// responsibility and workspace-local idents are linked, not fetched.
    pub async fn install<C: Cache, R: Report + ?Sized>(
        &self,
        cache: &C,
        report: &mut R,
    ) -> SproutResult<()> {
        report.report_info(MessageName::Unnamed, "Resolving dependencies");

        for workspace in &self.workspaces {
            for target in [Target::Regular, Target::Development] {
                for descriptor in workspace.manifest.section(target).values() {
                    if self.workspace_by_ident(&descriptor.ident).is_some() {
                        continue;
                    }
                    match cache.ensure(descriptor).await? {
                        CacheOutcome::Hit(locator) => report.report_cache_hit(&locator),
                        CacheOutcome::Miss(locator) => report.report_cache_miss(&locator),
                    }
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{LightReport, StreamReport};
    use std::collections::HashSet;
    use std::fs as std_fs;
    use tempfile::TempDir;

    /// Cache double: hits for a fixed set of names, misses otherwise
    struct ScriptedCache {
        cached: HashSet<String>,
    }

    impl ScriptedCache {
        fn new(cached: &[&str]) -> Self {
            Self {
                cached: cached.iter().map(|name| name.to_string()).collect(),
            }
        }
    }

    impl Cache for ScriptedCache {
        async fn ensure(&self, descriptor: &Descriptor) -> SproutResult<CacheOutcome> {
            let locator = Locator::new(descriptor.ident.clone(), "npm:1.0.0");
            if self.cached.contains(&descriptor.ident.to_string()) {
                Ok(CacheOutcome::Hit(locator))
            } else {
                Ok(CacheOutcome::Miss(locator))
            }
        }
    }

    fn write_manifest(dir: &Path, json: &str) {
        std_fs::create_dir_all(dir).unwrap();
        std_fs::write(dir.join("package.json"), json).unwrap();
    }

    #[tokio::test]
    async fn test_find_discovers_workspaces() {
        let temp = TempDir::new().unwrap();
        write_manifest(
            temp.path(),
            r#"{"name": "root", "version": "1.0.0", "workspaces": ["packages/app"]}"#,
        );
        write_manifest(
            &temp.path().join("packages/app"),
            r#"{"name": "app", "version": "0.2.0", "dependencies": {"lodash": "^4.17.0"}}"#,
        );

        let project = Project::find(temp.path()).await.unwrap();
        assert_eq!(project.workspaces.len(), 2);
        assert_eq!(project.active_workspace().ident, Ident::new("root"));

        let app = project.workspace_by_ident(&Ident::new("app")).unwrap();
        assert_eq!(app.version, Version::new(0, 2, 0));
        assert!(app.manifest.find(&Ident::new("lodash")).is_some());
    }

    #[tokio::test]
    async fn test_find_without_manifest_fails() {
        let temp = TempDir::new().unwrap();
        let error = Project::find(temp.path()).await.unwrap_err();
        assert!(matches!(error, SproutError::ManifestNotFound { .. }));
    }

    #[tokio::test]
    async fn test_persist_round_trips_added_dependency() {
        let temp = TempDir::new().unwrap();
        write_manifest(temp.path(), r#"{"name": "root", "version": "1.0.0"}"#);

        let mut workspace = Workspace::load(temp.path()).await.unwrap();
        workspace.manifest.set(
            Target::Development,
            Descriptor::new(Ident::scoped("types", "node"), "^20.0.0"),
        );
        workspace.persist().await.unwrap();

        let reloaded = Workspace::load(temp.path()).await.unwrap();
        let (target, descriptor) = reloaded.manifest.find(&Ident::scoped("types", "node")).unwrap();
        assert_eq!(target, Target::Development);
        assert_eq!(descriptor.range, "^20.0.0");
    }

    #[tokio::test]
    async fn test_install_counts_hits_and_misses() {
        let mut root = Workspace::new(Ident::new("root"), Version::new(1, 0, 0));
        root.manifest
            .set(Target::Regular, Descriptor::new(Ident::new("lodash"), "^4.17.0"));
        root.manifest
            .set(Target::Regular, Descriptor::new(Ident::new("react"), "^18.0.0"));
        root.manifest.set(
            Target::Development,
            Descriptor::new(Ident::new("typescript"), "^5.0.0"),
        );
        // Peer entries must not be fetched at all.
        root.manifest
            .set(Target::Peer, Descriptor::new(Ident::new("react-dom"), "*"));

        let project = Project::new(vec![root]);
        let cache = ScriptedCache::new(&["lodash"]);

        let configuration = std::sync::Arc::new(crate::config::Configuration::new(false, false));
        let mut report = StreamReport::new(configuration, Vec::new());
        project.install(&cache, &mut report).await.unwrap();
        assert!(!report.has_errors());
        report.finalize();

        let output = String::from_utf8(report.into_inner()).unwrap();
        let summary = output.lines().last().unwrap();
        // lodash hits; react and typescript are fetched; the peer entry is
        // not touched.
        assert!(summary.ends_with("Done - one package was already cached, 2 had to be fetched"));
    }

    #[tokio::test]
    async fn test_install_skips_workspace_local_dependencies() {
        struct PanickingCache;
        impl Cache for PanickingCache {
            async fn ensure(&self, descriptor: &Descriptor) -> SproutResult<CacheOutcome> {
                panic!("tried to fetch {}", descriptor);
            }
        }

        let mut root = Workspace::new(Ident::new("root"), Version::new(1, 0, 0));
        root.manifest
            .set(Target::Regular, Descriptor::new(Ident::new("app"), "workspace:*"));
        let app = Workspace::new(Ident::new("app"), Version::new(0, 1, 0));

        let project = Project::new(vec![root, app]);
        let mut report = LightReport::new();
        project.install(&PanickingCache, &mut report).await.unwrap();
    }
}
