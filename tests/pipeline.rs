//! End-to-end rebuild over an in-memory archive

use retrojar::archive::{
    rebuild_archive, ArchiveContents, DowngradeProvider, Error, NodeLookup, RebuildSettings,
};
use retrojar::jvm::class_file::ClassNode;
use retrojar::jvm::{BinaryName, ClassAccessFlags};

use std::io::{Cursor, Read};

/// Downgrader that caps versions, disturbs one frame merge, and synthesizes
/// a couple of auxiliary classes (one of them twice, to exercise dedup)
struct StubDowngrader {
    target_version: u16,
}

impl DowngradeProvider for StubDowngrader {
    fn downgrade(
        &self,
        node: &mut ClassNode,
        extra: &mut Vec<ClassNode>,
        lookup: &NodeLookup,
    ) -> Result<(), Error> {
        assert!(lookup("no/such/Class")?.is_none());

        if node.version > self.target_version {
            node.version = self.target_version;
        }
        node.frame_merges
            .push((node.name.as_str().to_owned(), String::from("java/lang/String")));

        if node.name.as_str() == "a/B" {
            extra.push(synthesize("extra/Gen", vec![]));
            extra.push(synthesize("extra/Gen", vec![BinaryName::SERIALIZABLE]));
            extra.push(synthesize("aaa/First", vec![]));
        }
        Ok(())
    }
}

fn synthesize(name: &str, interfaces: Vec<BinaryName>) -> ClassNode {
    ClassNode::synthesize(
        BinaryName::from_string(name.to_owned()).unwrap(),
        Some(BinaryName::OBJECT),
        interfaces,
        ClassAccessFlags::PUBLIC | ClassAccessFlags::SUPER,
        61,
    )
}

fn collect_inputs() -> ArchiveContents {
    let mut contents = ArchiveContents::new();
    contents
        .add_file("a.txt", Some(10), &mut &b"plain text"[..])
        .unwrap();
    contents.add_directory("a").unwrap();

    let class = synthesize("a/B", vec![]);
    contents
        .add_file(
            "a/B.class",
            Some(class.bytes().len() as u64),
            &mut class.bytes(),
        )
        .unwrap();
    contents.finish();
    contents
}

fn rebuild(contents: &ArchiveContents, settings: &RebuildSettings) -> zip::ZipArchive<Cursor<Vec<u8>>> {
    let downgrader = StubDowngrader {
        target_version: settings.target_version,
    };
    let mut out = Cursor::new(Vec::new());
    rebuild_archive(contents, settings, &downgrader, &mut out).unwrap();
    zip::ZipArchive::new(out).unwrap()
}

fn entry_bytes(archive: &mut zip::ZipArchive<Cursor<Vec<u8>>>, name: &str) -> Vec<u8> {
    let mut buf = Vec::new();
    archive
        .by_name(name)
        .unwrap()
        .read_to_end(&mut buf)
        .unwrap();
    buf
}

#[test]
fn rebuilt_archive_layout() {
    let contents = collect_inputs();
    let settings = RebuildSettings {
        target_version: 51,
        ..RebuildSettings::default()
    };
    let mut archive = rebuild(&contents, &settings);

    // Inputs in submission order, then the extras sorted by class name
    let names: Vec<String> = (0..archive.len())
        .map(|idx| archive.by_index(idx).unwrap().name().to_owned())
        .collect();
    assert_eq!(
        names,
        vec![
            "a.txt",
            "a/",
            "a/B.class",
            "aaa/",
            "aaa/First.class",
            "extra/",
            "extra/Gen.class",
        ]
    );

    assert_eq!(entry_bytes(&mut archive, "a.txt"), b"plain text");
}

#[test]
fn class_versions_are_capped() {
    let contents = collect_inputs();
    let settings = RebuildSettings {
        target_version: 51,
        ..RebuildSettings::default()
    };
    let mut archive = rebuild(&contents, &settings);

    let rewritten = ClassNode::parse(entry_bytes(&mut archive, "a/B.class")).unwrap();
    assert_eq!(rewritten.version, 51);
    assert_eq!(rewritten.name.as_str(), "a/B");

    // Extras go through the same re-encode, so they get capped too
    let gen = ClassNode::parse(entry_bytes(&mut archive, "extra/Gen.class")).unwrap();
    assert_eq!(gen.version, 51);
}

#[test]
fn duplicate_extras_keep_the_first() {
    let contents = collect_inputs();
    let mut archive = rebuild(&contents, &RebuildSettings::default());

    // The second `extra/Gen` declared an interface; the first did not
    let gen = ClassNode::parse(entry_bytes(&mut archive, "extra/Gen.class")).unwrap();
    assert!(gen.interfaces.is_empty());
}

#[test]
fn extras_can_be_disabled() {
    let contents = collect_inputs();
    let settings = RebuildSettings {
        include_extra_classes: false,
        ..RebuildSettings::default()
    };
    let archive = rebuild(&contents, &settings);

    let names: Vec<String> = archive.file_names().map(str::to_owned).collect();
    assert!(!names.iter().any(|name| name.starts_with("extra/")));
    assert!(!names.iter().any(|name| name.starts_with("aaa/")));
}
