use super::{sample_body, sample_target};
use ilweave_core::{Editor, Error, Opcode, Pattern};

#[test]
fn attach_then_flush_round_trips_the_sequence() {
    let body = sample_body();
    let mut editor = Editor::new();
    editor.attach(sample_target(), &body).expect("attach");
    let flushed = editor.flush().expect("flush");
    assert_eq!(flushed, body);
}

#[test]
fn attach_clones_and_leaves_the_callers_list_untouched() {
    let body = sample_body();
    let mut editor = Editor::new();
    editor.attach(sample_target(), &body).expect("attach");
    editor
        .find_first(&Pattern::of_ops(&[Opcode::Add]))
        .expect("find")
        .set_opcode(Opcode::Mul)
        .expect("set");

    // The caller's decoded list must be unaffected by session edits.
    assert_eq!(body, sample_body());
    assert_eq!(editor.flush().expect("flush")[5].op, Opcode::Mul);
}

#[test]
fn attaching_an_empty_sequence_is_invalid_input() {
    let mut editor = Editor::new();
    let err = editor.attach(sample_target(), &[]).unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));
    assert!(!editor.is_attached());
}

#[test]
fn operations_before_attach_and_after_flush_fail() {
    let mut editor = Editor::new();
    assert!(matches!(editor.cursor(), Err(Error::NotAttached)));
    assert!(matches!(editor.advance(1), Err(Error::NotAttached)));
    assert!(matches!(editor.flush(), Err(Error::NotAttached)));

    editor.attach(sample_target(), &sample_body()).expect("attach");
    editor.flush().expect("flush");
    assert!(matches!(
        editor.find_first(&Pattern::of_ops(&[Opcode::Ret])),
        Err(Error::NotAttached)
    ));
}

#[test]
fn reattach_discards_prior_state() {
    let mut editor = Editor::new();
    editor.attach(sample_target(), &sample_body()).expect("attach");
    editor.go_to(7).expect("go_to");
    editor
        .copy_range(2, false, false)
        .expect("copy into the side buffer");

    editor.attach(sample_target(), &sample_body()).expect("re-attach");
    assert_eq!(editor.cursor().expect("cursor"), 0);
    assert!(editor.buffer().expect("buffer").is_empty());
}

#[test]
fn slot_index_is_built_once_at_attach() {
    let mut editor = Editor::new();
    editor.attach(sample_target(), &sample_body()).expect("attach");

    let slots = editor.local_slots().expect("slots");
    assert_eq!(slots.len(), 2);

    let zero = editor.local_slot(0).expect("attached").expect("slot 0");
    assert_eq!(zero.loads, 1);
    assert_eq!(zero.stores, 0);
    assert_eq!(zero.first_use, 1);

    let one = editor.local_slot(1).expect("attached").expect("slot 1");
    assert_eq!(one.loads, 2);
    assert_eq!(one.stores, 1);
    assert_eq!(one.first_use, 4);

    assert!(editor.local_slot(9).expect("attached").is_none());
}

#[test]
fn slot_index_is_a_snapshot_not_refreshed_by_mutation() {
    let mut editor = Editor::new();
    editor.attach(sample_target(), &sample_body()).expect("attach");
    editor
        .insert(vec![ilweave_core::Instruction::with_operand(
            Opcode::StoreLocal,
            ilweave_core::Operand::Slot(3),
        )])
        .expect("insert");

    // Slot 3 was introduced after attach; the index does not know it.
    assert!(editor.local_slot(3).expect("attached").is_none());
}
