use super::collect::{parent_path, ArchiveContents, EntryKind};
use super::transform::DowngradeProvider;
use super::{version, Error};
use crate::jvm;
use crate::jvm::class_file::{ClassNode, ClassWriter};
use crate::jvm::node_cache::ClassNodeCache;
use crate::jvm::supertypes::{
    ArchiveWrapperProvider, ClasspathWrapperProvider, PlatformWrapperProvider, WrapperPool,
};
use std::collections::{BTreeMap, HashSet};
use std::io::{Seek, Write};
use std::path::PathBuf;
use typed_arena::Arena;
use zip::write::{FileOptions, ZipWriter};
use zip::CompressionMethod;

/// Settings for one archive rebuild
pub struct RebuildSettings {
    /// Major bytecode version the rewritten classes must not exceed
    pub target_version: u16,

    /// Whether transformer-synthesized classes are appended to the archive
    pub include_extra_classes: bool,

    /// Whether directories with no files under them still get entries
    pub include_empty_dirs: bool,

    /// Compile-time classpath entries indexed for hierarchy resolution
    pub classpath: Vec<PathBuf>,
}

impl Default for RebuildSettings {
    fn default() -> RebuildSettings {
        RebuildSettings {
            target_version: version::V1_7,
            include_extra_classes: true,
            include_empty_dirs: true,
            classpath: Vec::new(),
        }
    }
}

/// Rebuild the collected inputs into `out`, downgrading every class
///
/// Entries are written in collection order: directories as directory
/// records, non-class files (and multi-release classes) verbatim, classes
/// through the downgrade transformation and frame-recomputing re-encode.
/// Extra classes the transformation synthesized come last, deduplicated and
/// sorted by name. Any failure aborts the whole run.
pub fn rebuild_archive<W: Write + Seek>(
    contents: &ArchiveContents,
    settings: &RebuildSettings,
    downgrader: &dyn DowngradeProvider,
    out: W,
) -> Result<(), Error> {
    let node_cache = ClassNodeCache::new(contents.raw_data());

    let arena = Arena::new();
    let mut pool = WrapperPool::new(&arena);
    pool.add_provider(Box::new(ArchiveWrapperProvider::new(&node_cache)));
    pool.add_provider(Box::new(ClasspathWrapperProvider::scan(&settings.classpath)));
    pool.add_provider(Box::new(PlatformWrapperProvider::new()));
    let pool = pool;

    let class_writer = ClassWriter::new(settings.target_version, &pool);
    let mut zip = ZipWriter::new(out);
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut extra: Vec<ClassNode> = Vec::new();

    for (path, kind) in contents.entries() {
        match kind {
            EntryKind::Directory => {
                if settings.include_empty_dirs || contents.directories().contains(path) {
                    zip.add_directory(path, options)?;
                }
            }
            EntryKind::File
                if !path.ends_with(".class") || path.contains("META-INF/versions/") =>
            {
                zip.start_file(path, options)?;
                // Buffered during collection, so the index cannot miss
                zip.write_all(&contents.raw_data()[path])?;
            }
            EntryKind::File => {
                let class_name = &path[..path.len() - ".class".len()];
                let bytes =
                    transform_class(class_name, &node_cache, downgrader, &mut extra, &class_writer)
                        .map_err(|cause| Error::Transform {
                            path: path.to_owned(),
                            cause: Box::new(cause),
                        })?;
                zip.start_file(path, options)?;
                zip.write_all(&bytes)?;
            }
        }
    }

    if settings.include_extra_classes {
        write_extra_classes(
            &mut zip,
            options,
            extra,
            contents.directories().clone(),
            &class_writer,
        )?;
    }

    zip.finish()?;
    Ok(())
}

fn transform_class(
    class_name: &str,
    node_cache: &ClassNodeCache,
    downgrader: &dyn DowngradeProvider,
    extra: &mut Vec<ClassNode>,
    class_writer: &ClassWriter,
) -> Result<Vec<u8>, Error> {
    let node = node_cache
        .lookup(class_name)?
        .ok_or_else(|| jvm::Error::UnknownClass(class_name.to_owned()))?;

    let mut node = (*node).clone();
    downgrader.downgrade(&mut node, extra, &|name| node_cache.lookup(name))?;
    Ok(class_writer.encode(&node)?)
}

fn write_extra_classes<W: Write + Seek>(
    zip: &mut ZipWriter<W>,
    options: FileOptions,
    extra: Vec<ClassNode>,
    mut known_dirs: HashSet<String>,
    class_writer: &ClassWriter,
) -> Result<(), Error> {
    if extra.is_empty() {
        log::info!("Including no extra classes");
        return Ok(());
    }
    log::warn!("Extra classes are a rarely exercised feature; there may be dragons");

    // Drop duplicates and fix the archive order by sorting on the class name
    let mut by_name: BTreeMap<String, ClassNode> = BTreeMap::new();
    for node in extra {
        let name = node.name.as_str().to_owned();
        if by_name.contains_key(&name) {
            log::warn!("Ignoring duplicate extra class '{}'", name);
            continue;
        }
        log::info!("Including extra class {}", name);
        by_name.insert(name, node);
    }

    for (name, node) in &by_name {
        let class_path = format!("{}.class", name);

        // Synthesize any parent directories the main pass never created,
        // outermost first
        let mut missing: Vec<&str> = Vec::new();
        let mut ancestor = parent_path(&class_path);
        while let Some(dir) = ancestor {
            if known_dirs.contains(dir) {
                break;
            }
            missing.push(dir);
            ancestor = parent_path(dir);
        }
        for dir in missing.iter().rev() {
            known_dirs.insert((*dir).to_owned());
            zip.add_directory(*dir, options)?;
        }

        let bytes = class_writer.encode(node).map_err(|cause| Error::Transform {
            path: class_path.clone(),
            cause: Box::new(Error::Jvm(cause)),
        })?;
        zip.start_file(class_path.as_str(), options)?;
        zip.write_all(&bytes)?;
    }

    Ok(())
}
