use retrojar::archive;
use retrojar::archive::{version, ArchiveContents, RebuildSettings, VersionCapDowngrader};

use clap::{Arg, ArgAction, Command};
use std::fs;
use std::path::{Path, PathBuf};

fn main() -> Result<(), archive::Error> {
    env_logger::init();

    let matches = Command::new("retrojar")
        .version("0.1.0")
        .about("Repackage compiled Java classes into a jar targeting an older bytecode version")
        .arg(
            Arg::new("release")
                .long("target-release")
                .value_name("RELEASE")
                .value_parser(clap::value_parser!(i32))
                .default_value("7")
                .help("Java release the rewritten bytecode must run on (eg. `8`)"),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .short('o')
                .value_name("JAR")
                .help("Output jar path (defaults to `<input>-<classifier>.jar`)"),
        )
        .arg(
            Arg::new("classpath")
                .long("classpath")
                .value_name("CLASS_FILE")
                .action(ArgAction::Append)
                .help("Compile-time classpath entries used for hierarchy resolution"),
        )
        .arg(
            Arg::new("no-extra")
                .long("no-extra-classes")
                .action(ArgAction::SetTrue)
                .help("Drop classes synthesized by the downgrade transformation"),
        )
        .arg(
            Arg::new("INPUT")
                .help("Directory whose contents are packaged")
                .required(true)
                .index(1),
        )
        .get_matches();

    let release = *matches.get_one::<i32>("release").unwrap();
    let target_version = version::major_for_release(release)?;

    let input = PathBuf::from(matches.get_one::<String>("INPUT").unwrap());
    let output = match matches.get_one::<String>("output") {
        Some(path) => PathBuf::from(path),
        None => {
            let stem = input
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| String::from("archive"));
            PathBuf::from(format!(
                "{}-{}.jar",
                stem,
                version::classifier(target_version as i32)
            ))
        }
    };

    let settings = RebuildSettings {
        target_version,
        include_extra_classes: !matches.get_flag("no-extra"),
        classpath: matches
            .get_many::<String>("classpath")
            .into_iter()
            .flatten()
            .map(PathBuf::from)
            .collect(),
        ..RebuildSettings::default()
    };

    log::info!("Collecting '{}'", input.display());
    let mut contents = ArchiveContents::new();
    collect_tree(&mut contents, &input, "")?;
    contents.finish();

    log::info!("Writing '{}'", output.display());
    let downgrader = VersionCapDowngrader::new(settings.target_version);
    let out = fs::File::create(&output)?;
    archive::rebuild_archive(&contents, &settings, &downgrader, out)?;

    Ok(())
}

/// Walk a directory tree in name order, recording every entry
fn collect_tree(
    contents: &mut ArchiveContents,
    dir: &Path,
    prefix: &str,
) -> Result<(), archive::Error> {
    let mut children = fs::read_dir(dir)?.collect::<Result<Vec<_>, _>>()?;
    children.sort_by_key(|child| child.file_name());

    for child in children {
        let name = child.file_name().to_string_lossy().into_owned();
        let path = if prefix.is_empty() {
            name
        } else {
            format!("{}/{}", prefix, name)
        };

        if child.file_type()?.is_dir() {
            contents.add_directory(&path)?;
            collect_tree(contents, &child.path(), &path)?;
        } else {
            let len = child.metadata()?.len();
            contents.add_file(&path, Some(len), &mut fs::File::open(child.path())?)?;
        }
    }
    Ok(())
}
