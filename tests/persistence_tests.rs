//! Persistence round-trip tests against real files.

use std::fs;

use subst_engine::{load, match_at, save, Automaton, SliceCursor, SubstError, SubstPair};

fn sample() -> Automaton {
    let pairs = vec![
        SubstPair::new(b"\\rightarrow".to_vec(), "\u{2192}".as_bytes().to_vec()),
        SubstPair::new(b"\\Rightarrow".to_vec(), "\u{21D2}".as_bytes().to_vec()),
        SubstPair::new(b"\\dots".to_vec(), b"...".to_vec()),
    ];
    Automaton::build(&pairs).unwrap()
}

#[test]
fn test_save_then_load_round_trips() {
    let automaton = sample();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("subst.sdfa");

    save(&automaton, &path).unwrap();
    let reloaded = load(&path).unwrap();

    assert_eq!(reloaded, automaton);
}

#[test]
fn test_reloaded_automaton_is_usable() {
    let automaton = sample();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("subst.sdfa");

    save(&automaton, &path).unwrap();
    let reloaded = load(&path).unwrap();

    let mut cursor = SliceCursor::new(b"\\dots");
    let outcome = match_at(&reloaded, &mut cursor);
    assert_eq!(outcome.replacement(), Some(&b"..."[..]));
}

#[test]
fn test_save_overwrites_previous_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("subst.sdfa");

    let first = Automaton::build(&[SubstPair::new(b"a".to_vec(), b"1".to_vec())]).unwrap();
    save(&first, &path).unwrap();

    let second = Automaton::build(&[SubstPair::new(b"bb".to_vec(), b"22".to_vec())]).unwrap();
    save(&second, &path).unwrap();

    assert_eq!(load(&path).unwrap(), second);
}

#[test]
fn test_load_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load(dir.path().join("nope.sdfa")).unwrap_err();
    assert!(matches!(err, SubstError::IoError(_)));
}

#[test]
fn test_load_garbage_is_invalid_format_or_io() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("garbage.sdfa");
    fs::write(&path, b"not an automaton").unwrap();

    let err = load(&path).unwrap_err();
    assert!(
        matches!(err, SubstError::InvalidFormat(_) | SubstError::IoError(_)),
        "got: {:?}",
        err
    );
}

#[test]
fn test_load_truncated_file_fails() {
    let automaton = sample();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("subst.sdfa");
    save(&automaton, &path).unwrap();

    let bytes = fs::read(&path).unwrap();
    fs::write(&path, &bytes[..bytes.len() / 2]).unwrap();

    assert!(load(&path).is_err());
}

#[test]
fn test_corrupted_file_does_not_load_silently() {
    let automaton = sample();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("subst.sdfa");
    save(&automaton, &path).unwrap();

    // Flip a byte inside a transition record's state field.
    let mut bytes = fs::read(&path).unwrap();
    bytes[5] ^= 0xFF;
    fs::write(&path, &bytes).unwrap();

    // Either the sortedness check or a downstream dimension check trips;
    // the corrupted table must not come back as a clean automaton.
    match load(&path) {
        Err(_) => {}
        Ok(loaded) => assert_ne!(loaded, automaton),
    }
}

#[test]
fn test_failed_save_leaves_in_memory_automaton_valid() {
    let automaton = sample();
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("no-such-dir").join("subst.sdfa");

    assert!(save(&automaton, &missing).is_err());

    // The in-memory copy is fully constructed before any write begins.
    let mut cursor = SliceCursor::new(b"\\rightarrow");
    assert!(match_at(&automaton, &mut cursor).is_match());
}

#[test]
fn test_deterministic_bytes_on_disk() {
    let automaton = sample();
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("a.sdfa");
    let b = dir.path().join("b.sdfa");

    save(&automaton, &a).unwrap();
    save(&automaton, &b).unwrap();

    assert_eq!(fs::read(&a).unwrap(), fs::read(&b).unwrap());
}
