//! Integration tests: load → dump → load, and installing into a registry.

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use approx::assert_relative_eq;
use gp_core::{Error, Member};
use gp_lhagrid::{Registry, SetWriter};

fn fixture_registry() -> Registry {
    Registry::new(vec![PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../tests/fixtures/sets")])
}

fn tmp_dir(name: &str) -> PathBuf {
    let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
    let mut p = std::env::temp_dir();
    p.push(format!("gp_lhagrid_{}_{}_{}", std::process::id(), nanos, name));
    std::fs::create_dir_all(&p).unwrap();
    p
}

fn assert_members_close(a: &Member, b: &Member) {
    assert_eq!(a.len(), b.len());
    for (x, y) in a.iter().zip(b) {
        assert_eq!(x.xgrid(), y.xgrid());
        assert_eq!(x.q2grid(), y.q2grid());
        assert_eq!(x.pids(), y.pids());
        assert_eq!(x.data().shape(), y.data().shape());
        for (u, v) in x.data().iter().zip(y.data().iter()) {
            assert_relative_eq!(*u, *v, max_relative = 1e-7);
        }
    }
}

#[test]
fn dump_info_keeps_every_field() {
    let out = tmp_dir("dump_info");
    let mut info = fixture_registry().load_info("myCT14llo_NF3").unwrap();
    info.insert("SetDesc", "What ever I like");
    SetWriter::new(&out).dump_info("new_pdf", &info).unwrap();

    let info2 = Registry::new(vec![out.clone()]).load_info("new_pdf").unwrap();
    assert_eq!(info2.get("SetDesc").and_then(|v| v.as_str()), Some("What ever I like"));
    for (k, v) in info.as_mapping() {
        assert_eq!(info2.as_mapping().get(k), Some(v), "key {k:?}");
    }
    let _ = std::fs::remove_dir_all(&out);
}

#[test]
fn dump_blocks_round_trips() {
    let out = tmp_dir("dump_blocks");
    let registry = fixture_registry();
    let info = registry.load_info("myCT14llo_NF3").unwrap();
    let blocks = registry.load_blocks("myCT14llo_NF3", 0).unwrap();

    let mut xgrid = blocks[0].xgrid().to_vec();
    xgrid[0] = 1e-10;
    let moved = vec![blocks[0].with_xgrid(xgrid).unwrap()];
    SetWriter::new(&out).dump_set("new_pdf", &info, std::slice::from_ref(&moved), None).unwrap();

    let reloaded = Registry::new(vec![out.clone()]).load_member("new_pdf", 0).unwrap();
    assert_eq!(reloaded.pdf_type(), Some("central"));
    assert_eq!(reloaded.blocks[0].xgrid()[0], 1e-10);
    assert_members_close(&reloaded.blocks, &moved);
    let _ = std::fs::remove_dir_all(&out);
}

#[test]
fn multi_member_set_round_trips_with_headers() {
    let out = tmp_dir("multi_member");
    let registry = fixture_registry();
    let info = registry.load_info("myMSTW_blocks").unwrap();
    let files: Vec<_> = (0..2).map(|m| registry.load_member("myMSTW_blocks", m).unwrap()).collect();
    let headers: Vec<String> = files.iter().map(|f| f.type_header()).collect();
    let members: Vec<Member> = files.iter().map(|f| f.blocks.clone()).collect();

    SetWriter::new(&out).dump_set("copy", &info, &members, Some(&headers)).unwrap();

    let copy = Registry::new(vec![out.clone()]);
    for (m, original) in members.iter().enumerate() {
        let file = copy.load_member("copy", m).unwrap();
        assert_eq!(file.header, files[m].header);
        assert_members_close(&file.blocks, original);
    }

    // the written text is stable under a second round trip
    let first = std::fs::read_to_string(out.join("copy/copy_0001.dat")).unwrap();
    let again = tmp_dir("multi_member_again");
    let reread: Vec<Member> = (0..2).map(|m| copy.load_blocks("copy", m).unwrap()).collect();
    SetWriter::new(&again).dump_set("copy", &info, &reread, Some(&headers)).unwrap();
    let second = std::fs::read_to_string(again.join("copy/copy_0001.dat")).unwrap();
    assert_eq!(first, second);

    let _ = std::fs::remove_dir_all(&out);
    let _ = std::fs::remove_dir_all(&again);
}

#[test]
fn rewriting_a_set_drops_surplus_members() {
    let out = tmp_dir("rewrite");
    let registry = fixture_registry();
    let info = registry.load_info("myMSTW_blocks").unwrap();
    let members: Vec<Member> =
        (0..2).map(|m| registry.load_blocks("myMSTW_blocks", m).unwrap()).collect();
    let writer = SetWriter::new(&out);

    writer.dump_set("shrink", &info, &members, None).unwrap();
    assert!(out.join("shrink/shrink_0001.dat").is_file());
    std::fs::write(out.join("shrink/notes.txt"), "keep").unwrap();

    writer.dump_set("shrink", &info, &members[..1], None).unwrap();
    assert!(out.join("shrink/shrink_0000.dat").is_file());
    assert!(!out.join("shrink/shrink_0001.dat").exists());
    assert!(out.join("shrink/notes.txt").is_file());
    let _ = std::fs::remove_dir_all(&out);
}

#[test]
fn install_moves_directory_once() {
    let work = tmp_dir("install_work");
    let share = tmp_dir("install_share");
    let registry = Registry::new(vec![share.clone()]);
    let writer = SetWriter::new(&work);
    let blocks = fixture_registry().load_blocks("myCT14llo_NF3", 0).unwrap();
    let info = fixture_registry().load_info("myCT14llo_NF3").unwrap();

    writer.dump_set("debug", &info, &[blocks.clone()], None).unwrap();
    let dest = registry.install(&writer.set_dir("debug")).unwrap();
    assert_eq!(dest, share.join("debug"));
    assert!(!work.join("debug").exists());
    assert!(registry.contains("debug"));

    // a second set with the same name must not overwrite the first
    writer.dump_set("debug", &info, &[blocks], None).unwrap();
    std::fs::write(share.join("debug/marker"), "keep").unwrap();
    let err = registry.install(&writer.set_dir("debug")).unwrap_err();
    assert!(matches!(err, Error::AlreadyInstalled(_)), "{err}");
    assert_eq!(std::fs::read_to_string(share.join("debug/marker")).unwrap(), "keep");
    assert!(work.join("debug").exists());

    let _ = std::fs::remove_dir_all(&work);
    let _ = std::fs::remove_dir_all(&share);
}

#[test]
fn install_requires_source() {
    let share = tmp_dir("install_missing");
    let registry = Registry::new(vec![share.clone()]);
    let err = registry.install(&share.join("foo")).unwrap_err();
    assert!(matches!(err, Error::MissingSet(_)), "{err}");
    let _ = std::fs::remove_dir_all(&share);
}
