//! End-to-end pipeline tests: classpath in, stub jar out.
//!
//! Classes are fabricated on disk (loose directories and jars), swept with the closure
//! engine, written as a stub jar, and the jar is reopened and decoded to verify what
//! survived stubbing.

use std::{fs, io::Read, path::Path};

use stubjar::{classfile::RawClass, prelude::*, AccessFlags, Result};

#[path = "../src/test/classbuilder.rs"]
#[allow(dead_code)]
mod classbuilder;

use classbuilder::{ClassBuilder, ACC_PRIVATE, ACC_PROTECTED, ACC_PUBLIC, ACC_STATIC};

fn write_class(root: &Path, name: &str, bytes: &[u8]) {
    let path = root.join(format!("{name}.class"));
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, bytes).unwrap();
}

fn jar_entry_names(path: &Path) -> Vec<String> {
    let archive = zip::ZipArchive::new(fs::File::open(path).unwrap()).unwrap();
    archive.file_names().map(str::to_string).collect()
}

fn jar_entry_bytes(path: &Path, entry: &str) -> Vec<u8> {
    let mut archive = zip::ZipArchive::new(fs::File::open(path).unwrap()).unwrap();
    let mut file = archive.by_name(entry).unwrap();
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).unwrap();
    bytes
}

#[test]
fn directory_classpath_to_stub_jar() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let classes = dir.path().join("classes");

    let service = ClassBuilder::new(ACC_PUBLIC, "com/example/Service")
        .field(ACC_PUBLIC, "item", "Lcom/example/Item;")
        .field(ACC_PRIVATE, "cache", "Lcom/example/Cache;")
        .method(ACC_PUBLIC, "count", "()I")
        .method(ACC_PRIVATE, "evict", "()V")
        .build();
    let item = ClassBuilder::new(ACC_PUBLIC, "com/example/Item")
        .method(ACC_PROTECTED, "label", "()Ljava/lang/String;")
        .build();
    let cache = ClassBuilder::new(0, "com/example/Cache").build();

    write_class(&classes, "com/example/Service", &service);
    write_class(&classes, "com/example/Item", &item);
    write_class(&classes, "com/example/Cache", &cache);

    let mut classpath = Classpath::new();
    classpath.push(&classes)?;

    let mut engine = ClosureEngine::new(classpath, ExclusionPrefixes::default());
    engine.fill(["com/example/Service".to_string()])?;

    let jar_path = dir.path().join("stubs.jar");
    let writer = StubJarWriter::new(engine.source());
    writer.write(engine.type_names(), &jar_path)?;

    let entries = jar_entry_names(&jar_path);
    assert!(entries.contains(&"com/".to_string()));
    assert!(entries.contains(&"com/example/".to_string()));
    assert!(entries.contains(&"com/example/Service.class".to_string()));
    assert!(entries.contains(&"com/example/Item.class".to_string()));
    // Cache is only reachable through a private field, so it never enters the closure.
    assert!(!entries.contains(&"com/example/Cache.class".to_string()));

    // The stubbed Service keeps only its visible members.
    let bytes = jar_entry_bytes(&jar_path, "com/example/Service.class");
    let stub = RawClass::parse(&bytes)?;
    assert_eq!(stub.name()?, "com/example/Service");
    assert_eq!(stub.fields.len(), 1);
    assert_eq!(stub.member_name(&stub.fields[0])?, "item");
    assert_eq!(stub.methods.len(), 1);
    assert_eq!(stub.member_name(&stub.methods[0])?, "count");
    assert!(stub.methods[0].access.contains(AccessFlags::PUBLIC));
    Ok(())
}

#[test]
fn jar_classpath_round_trip() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let input_jar = dir.path().join("input.jar");

    let widget = ClassBuilder::new(ACC_PUBLIC, "ui/Widget")
        .method(ACC_PUBLIC | ACC_STATIC, "create", "()Lui/Widget;")
        .method(ACC_PUBLIC, "theme", "()Lui/Theme;")
        .build();
    let theme = ClassBuilder::new(ACC_PUBLIC, "ui/Theme").build();

    {
        let file = fs::File::create(&input_jar)?;
        let mut jar = zip::ZipWriter::new(file);
        let options = zip::write::SimpleFileOptions::default();
        jar.start_file("ui/Widget.class", options)?;
        std::io::Write::write_all(&mut jar, &widget)?;
        jar.start_file("ui/Theme.class", options)?;
        std::io::Write::write_all(&mut jar, &theme)?;
        jar.finish()?;
    }

    let mut classpath = Classpath::new();
    classpath.push(&input_jar)?;

    let mut engine = ClosureEngine::new(classpath, ExclusionPrefixes::default());
    engine.fill(["ui/Widget".to_string()])?;

    let output_jar = dir.path().join("stubs.jar");
    let writer = StubJarWriter::new(engine.source());
    writer.write(engine.type_names(), &output_jar)?;

    let entries = jar_entry_names(&output_jar);
    assert!(entries.contains(&"ui/Widget.class".to_string()));
    assert!(entries.contains(&"ui/Theme.class".to_string()));

    // The placeholder body of a reference-returning method is aconst_null/areturn.
    let bytes = jar_entry_bytes(&output_jar, "ui/Widget.class");
    assert!(bytes
        .windows(2)
        .any(|window| window == [0x01u8, 0xB0u8]));
    Ok(())
}

#[test]
fn invisible_root_produces_classless_jar() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let classes = dir.path().join("classes");

    let hidden = ClassBuilder::new(0, "pkg/Hidden")
        .field(ACC_PUBLIC, "other", "Lpkg/Other;")
        .build();
    write_class(&classes, "pkg/Hidden", &hidden);

    let mut classpath = Classpath::new();
    classpath.push(&classes)?;

    let mut engine = ClosureEngine::new(classpath, ExclusionPrefixes::default());
    engine.fill(["pkg/Hidden".to_string()])?;
    assert_eq!(engine.type_names().count(), 0);

    let jar_path = dir.path().join("stubs.jar");
    let writer = StubJarWriter::new(engine.source());
    writer.write(engine.type_names(), &jar_path)?;

    assert!(jar_entry_names(&jar_path).is_empty());
    Ok(())
}
