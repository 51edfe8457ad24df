use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use super::driver::{GeneratedService, ServiceGenerator};
use super::error::{GenerationError, GenerationNote};
use super::naming::to_snake_case;
use crate::config::{resolve_config, GeneratorConfig};
use crate::docs::{load_documentation, ConfiguredTags, DocumentationModel};
use crate::emit::{render_mod_rs, Emitter, RustSourceEmitter};
use crate::introspect::{load_catalog, Catalog};
use crate::model::{ModelRepository, ServiceDescriptor};

/// Output directory used when neither `--output` nor `output_dir` is set
pub const DEFAULT_OUTPUT_DIR: &str = "generated";

/// One rendered output file, relative to the output directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFile {
    pub file_name: String,
    pub contents: String,
}

impl RenderedFile {
    /// Hex SHA-256 of the contents
    pub fn digest(&self) -> String {
        sha256_hex(self.contents.as_bytes())
    }
}

/// Everything one run produces, before anything touches the disk
#[derive(Debug)]
pub struct RenderedProject {
    /// Service files in catalog order, then `mod.rs`
    pub files: Vec<RenderedFile>,
    pub services: Vec<GeneratedService>,
    pub repository: ModelRepository,
}

impl RenderedProject {
    pub fn notes(&self) -> impl Iterator<Item = &GenerationNote> {
        self.services.iter().flat_map(|s| s.notes.iter())
    }

    /// Every generated endpoint with the locator calls leading to it
    pub fn routes(&self) -> Vec<RouteSummary> {
        self.services
            .iter()
            .flat_map(|service| {
                service.class.methods.iter().map(move |method| RouteSummary {
                    class: service.class.name.clone(),
                    verb: method.verb.clone(),
                    route: method.route.clone(),
                    method: method.name.clone(),
                    chain: method.calls.iter().map(|c| c.method.clone()).collect(),
                })
            })
            .collect()
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &ServiceDescriptor> {
        self.repository.services().map(|(_, descriptor)| descriptor)
    }
}

/// A generated endpoint as reported by `inspect`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteSummary {
    pub class: String,
    pub verb: String,
    pub route: String,
    pub method: String,
    /// Calls made on the implementation, locators first
    pub chain: Vec<String>,
}

/// Run the driver for every root service in catalog order
///
/// # Errors
///
/// The first [`GenerationError`]; services generated before it are dropped.
pub fn generate_services(
    catalog: &Catalog,
    documentation: DocumentationModel,
    config: &GeneratorConfig,
) -> Result<(ModelRepository, Vec<GeneratedService>), GenerationError> {
    let tags = ConfiguredTags::new(config.tags.clone());
    let generator = ServiceGenerator::new(catalog, &tags, config);
    let mut repository = ModelRepository::new(documentation);
    let services = catalog
        .services()
        .iter()
        .map(|root| generator.generate(&mut repository, root))
        .collect::<Result<Vec<_>, _>>()?;
    Ok((repository, services))
}

/// Generate and render every root service of `catalog`
///
/// # Errors
///
/// Generation failures, two services rendering to the same file, or a
/// template error.
pub fn render_project(
    catalog: &Catalog,
    documentation: DocumentationModel,
    config: &GeneratorConfig,
    source_label: &str,
) -> anyhow::Result<RenderedProject> {
    let (repository, services) = generate_services(catalog, documentation, config)?;
    let emitter = RustSourceEmitter::new(source_label);

    let mut files = Vec::with_capacity(services.len() + 1);
    let mut modules = Vec::with_capacity(services.len());
    let mut seen = BTreeSet::new();
    for service in &services {
        let module = to_snake_case(&service.class.name);
        if !seen.insert(module.clone()) {
            anyhow::bail!(
                "two services generate the module `{module}`; set a distinct class_name"
            );
        }
        let contents = emitter
            .render(&service.class)
            .with_context(|| format!("Failed to render {}", service.class.name))?;
        files.push(RenderedFile {
            file_name: format!("{module}.rs"),
            contents,
        });
        modules.push(module);
    }
    files.push(RenderedFile {
        file_name: "mod.rs".to_string(),
        contents: render_mod_rs(&modules)?,
    });

    Ok(RenderedProject {
        files,
        services,
        repository,
    })
}

/// What happened to one output file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    Written,
    /// Already present with identical contents
    Unchanged,
    /// Present with different contents and `force` not set
    Skipped,
    /// Dry run: would be written
    WouldWrite,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub status: FileStatus,
    /// Hex SHA-256 of the rendered contents
    pub digest: String,
}

/// Write rendered files into `out_dir`
///
/// Existing files with other contents are kept unless `force` is set. With
/// `dry_run` nothing is created or written; the outcomes report what a real
/// run would do.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or a file cannot be
/// read or written.
pub fn write_project(
    files: &[RenderedFile],
    out_dir: &Path,
    force: bool,
    dry_run: bool,
) -> anyhow::Result<Vec<FileOutcome>> {
    if !dry_run {
        fs::create_dir_all(out_dir)
            .with_context(|| format!("Failed to create output directory: {}", out_dir.display()))?;
    }

    let mut outcomes = Vec::with_capacity(files.len());
    for file in files {
        let path = out_dir.join(&file.file_name);
        let digest = file.digest();
        let status = if path.exists() {
            let existing = fs::read(&path)
                .with_context(|| format!("Failed to read existing file: {}", path.display()))?;
            if sha256_hex(&existing) == digest {
                FileStatus::Unchanged
            } else if !force {
                warn!(path = %path.display(), "file exists with other contents (use --force to overwrite)");
                FileStatus::Skipped
            } else if dry_run {
                FileStatus::WouldWrite
            } else {
                FileStatus::Written
            }
        } else if dry_run {
            FileStatus::WouldWrite
        } else {
            FileStatus::Written
        };

        if status == FileStatus::Written {
            fs::write(&path, &file.contents)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!(path = %path.display(), digest = %digest, "wrote file");
        } else {
            debug!(path = %path.display(), status = ?status, "file not written");
        }
        outcomes.push(FileOutcome {
            path,
            status,
            digest,
        });
    }
    Ok(outcomes)
}

/// Inputs of one `generate` run
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    pub catalog: PathBuf,
    pub docs: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub force: bool,
    pub dry_run: bool,
}

/// What a `generate` run did
#[derive(Debug)]
pub struct GenerationReport {
    pub output_dir: PathBuf,
    pub files: Vec<FileOutcome>,
    pub notes: Vec<GenerationNote>,
}

/// Load inputs, generate every service and render the output files
///
/// # Errors
///
/// Input loading, configuration, generation or rendering failures.
pub fn load_and_render(
    catalog_path: &Path,
    docs_path: Option<&Path>,
    config_path: Option<&Path>,
) -> anyhow::Result<(RenderedProject, GeneratorConfig)> {
    let catalog = load_catalog(catalog_path)?;
    let documentation = match docs_path {
        Some(path) => load_documentation(path)?,
        None => DocumentationModel::default(),
    };
    let config = resolve_config(config_path, catalog_path)?;
    debug!(
        max_depth = config.max_depth,
        class_suffix = %config.class_suffix,
        "generator config"
    );

    let label = catalog_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| catalog_path.display().to_string());
    let project = render_project(&catalog, documentation, &config, &label)
        .with_context(|| format!("Failed to generate services from {}", catalog_path.display()))?;
    Ok((project, config))
}

/// Full `generate` pipeline: load, generate, render, write
///
/// Generation is all-or-nothing: any error aborts before a file is written.
///
/// # Errors
///
/// See [`load_and_render`] and [`write_project`].
pub fn generate_project(options: &GenerateOptions) -> anyhow::Result<GenerationReport> {
    let (project, config) = load_and_render(
        &options.catalog,
        options.docs.as_deref(),
        options.config.as_deref(),
    )?;
    let output_dir = options
        .output
        .clone()
        .or(config.output_dir)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));

    let notes: Vec<GenerationNote> = project.notes().cloned().collect();
    for note in &notes {
        info!(kind = %note.kind, operation = %note.operation, "{}", note.message);
    }

    let files = write_project(&project.files, &output_dir, options.force, options.dry_run)?;
    info!(
        output = %output_dir.display(),
        services = project.services.len(),
        descriptors = project.repository.len(),
        dry_run = options.dry_run,
        "generation complete"
    );
    Ok(GenerationReport {
        output_dir,
        files,
        notes,
    })
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hasher
        .finalize()
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}
