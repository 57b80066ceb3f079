use std::fs;
use std::io::{Cursor, Write};

use arcsync_archive::{Error, Materializer};

fn build_zip(files: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = zip::write::SimpleFileOptions::default();
    for (name, content) in files {
        writer.start_file(*name, options).expect("start zip entry");
        writer.write_all(content).expect("write zip entry");
    }
    writer.finish().expect("finish zip").into_inner()
}

fn build_tar(files: &[(&str, &[u8])]) -> Vec<u8> {
    let mut builder = tar::Builder::new(Vec::new());
    for (name, content) in files {
        let mut header = tar::Header::new_gnu();
        header.set_size(content.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder
            .append_data(&mut header, name, *content)
            .expect("append tar entry");
    }
    builder.into_inner().expect("finish tar")
}

fn gzip(data: &[u8]) -> Vec<u8> {
    let mut encoder = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(data).expect("gzip");
    encoder.finish().expect("finish gzip")
}

#[test]
fn extract_zip_into_destination_root() {
    let temp_dir = tempfile::Builder::new()
        .prefix("arcsync-test-zip-")
        .tempdir()
        .expect("Failed to create temp dir");
    let dest = temp_dir.path().join("work");

    let archive = build_zip(&[("README.txt", b"hello"), ("lib/app.jar", b"jar bytes")]);
    let result = Materializer::for_file_name("bundle.zip")
        .materialize(Cursor::new(archive), &dest, "bundle.zip")
        .expect("zip extraction");

    assert_eq!(result.kind, Materializer::ZipLike);
    assert_eq!(result.entries, 2);
    assert_eq!(result.bytes, 14);
    assert_eq!(fs::read(dest.join("README.txt")).unwrap(), b"hello");
    assert_eq!(fs::read(dest.join("lib/app.jar")).unwrap(), b"jar bytes");
    assert!(!dest.join("bundle.zip").exists());
}

#[test]
fn extract_war_as_zip() {
    let temp_dir = tempfile::tempdir().unwrap();
    let archive = build_zip(&[("WEB-INF/web.xml", b"<web-app/>")]);

    let kind = Materializer::for_file_name("app.war");
    kind.materialize(Cursor::new(archive), temp_dir.path(), "app.war")
        .expect("war extraction");

    assert_eq!(
        fs::read_to_string(temp_dir.path().join("WEB-INF/web.xml")).unwrap(),
        "<web-app/>"
    );
}

#[test]
fn extract_tar_gz() {
    let temp_dir = tempfile::Builder::new()
        .prefix("arcsync-test-tar-")
        .tempdir()
        .expect("Failed to create temp dir");

    let archive = gzip(&build_tar(&[("pkg/bin/tool", b"#!/bin/sh\n"), ("pkg/VERSION", b"1.2.3")]));
    let result = Materializer::for_file_name("pkg-1.2.3.tar.gz")
        .materialize(Cursor::new(archive), temp_dir.path(), "pkg-1.2.3.tar.gz")
        .expect("tar.gz extraction");

    assert_eq!(result.kind, Materializer::GzipTar);
    assert_eq!(result.entries, 2);
    assert_eq!(fs::read(temp_dir.path().join("pkg/bin/tool")).unwrap(), b"#!/bin/sh\n");
    assert_eq!(fs::read(temp_dir.path().join("pkg/VERSION")).unwrap(), b"1.2.3");
}

#[test]
fn extract_plain_tar() {
    let temp_dir = tempfile::tempdir().unwrap();

    let archive = build_tar(&[("docs/index.html", b"<html/>")]);
    let result = Materializer::for_file_name("docs.tar")
        .materialize(Cursor::new(archive), temp_dir.path(), "docs.tar")
        .expect("tar extraction");

    assert_eq!(result.kind, Materializer::Tar);
    assert_eq!(fs::read(temp_dir.path().join("docs/index.html")).unwrap(), b"<html/>");
}

#[cfg(unix)]
#[test]
fn tar_preserves_mode_bits() {
    use std::os::unix::fs::PermissionsExt;

    let temp_dir = tempfile::tempdir().unwrap();
    let mut builder = tar::Builder::new(Vec::new());
    let mut header = tar::Header::new_gnu();
    header.set_size(3);
    header.set_mode(0o755);
    header.set_cksum();
    builder.append_data(&mut header, "run.sh", &b"abc"[..]).unwrap();
    let archive = builder.into_inner().unwrap();

    Materializer::Tar
        .materialize(Cursor::new(archive), temp_dir.path(), "run.tar")
        .unwrap();

    let mode = fs::metadata(temp_dir.path().join("run.sh")).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o755);
}

#[test]
fn zip_slip_entry_is_rejected() {
    let temp_dir = tempfile::tempdir().unwrap();
    let dest = temp_dir.path().join("work");

    let archive = build_zip(&[("../escaped.txt", b"nope")]);
    let result = Materializer::ZipLike.materialize(Cursor::new(archive), &dest, "evil.zip");

    assert!(matches!(result, Err(Error::ZipSlip { .. })));
    assert!(!temp_dir.path().join("escaped.txt").exists());
}

#[cfg(unix)]
fn symlink_header() -> tar::Header {
    let mut header = tar::Header::new_gnu();
    header.set_entry_type(tar::EntryType::Symlink);
    header.set_size(0);
    header.set_mode(0o777);
    header
}

#[cfg(unix)]
#[test]
fn chained_symlinks_cannot_escape_destination() {
    let temp_dir = tempfile::Builder::new()
        .prefix("arcsync-test-chain-")
        .tempdir()
        .unwrap();
    let dest = temp_dir.path().join("work");

    let mut builder = tar::Builder::new(Vec::new());
    for (link, target) in [("l1", "."), ("l1/l2", "..")] {
        let mut header = symlink_header();
        header.set_link_name(target).unwrap();
        builder.append_data(&mut header, link, std::io::empty()).unwrap();
    }
    let mut header = tar::Header::new_gnu();
    header.set_size(4);
    header.set_mode(0o644);
    builder
        .append_data(&mut header, "l1/l2/escape.txt", &b"nope"[..])
        .unwrap();
    let archive = builder.into_inner().unwrap();

    let result = Materializer::Tar.materialize(Cursor::new(archive), &dest, "chain.tar");

    assert!(matches!(result, Err(Error::SymlinkInPath { .. })), "{result:?}");
    assert!(!temp_dir.path().join("escape.txt").exists());
    assert!(!dest.join("escape.txt").exists());
}

#[cfg(unix)]
#[test]
fn symlink_inside_destination_is_kept() {
    let temp_dir = tempfile::tempdir().unwrap();
    let mut builder = tar::Builder::new(Vec::new());
    let mut header = tar::Header::new_gnu();
    header.set_size(2);
    header.set_mode(0o644);
    builder.append_data(&mut header, "lib/tool-1.2", &b"v1"[..]).unwrap();
    let mut header = symlink_header();
    header.set_link_name("lib/tool-1.2").unwrap();
    builder.append_data(&mut header, "tool", std::io::empty()).unwrap();
    let archive = builder.into_inner().unwrap();

    Materializer::Tar
        .materialize(Cursor::new(archive), temp_dir.path(), "tool.tar")
        .unwrap();

    let link = temp_dir.path().join("tool");
    assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
    assert_eq!(fs::read(&link).unwrap(), b"v1");
}

#[test]
fn gz_that_is_not_a_tarball_fails() {
    let temp_dir = tempfile::tempdir().unwrap();
    let archive = gzip(b"plain text, not a tar stream, long enough to be read as a header block");

    let result = Materializer::GzipTar.materialize(Cursor::new(archive), temp_dir.path(), "notes.gz");

    assert!(result.is_err());
}

#[test]
fn destination_is_created_for_every_kind() {
    let temp_dir = tempfile::tempdir().unwrap();

    let dest = temp_dir.path().join("a/b/c");
    Materializer::Tar
        .materialize(Cursor::new(build_tar(&[])), &dest, "empty.tar")
        .expect("empty tar");

    assert!(dest.is_dir());
}
