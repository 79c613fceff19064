use super::{assert_labels_unique, sample_body, sample_target, JOIN};
use ilweave_core::{
    load_const_int, Editor, Error, Instruction, Label, Opcode, Operand, Pattern, Step,
};

fn attach(editor: &mut Editor) {
    editor.attach(sample_target(), &sample_body()).expect("attach");
}

#[test]
fn insert_advances_past_the_block_and_retreat_recovers_the_anchor() {
    let mut editor = Editor::new();
    attach(&mut editor);

    editor.go_to(3).expect("go_to");
    let anchor = editor.opcode().expect("opcode");
    editor
        .insert(vec![load_const_int(7), Instruction::new(Opcode::Mul)])
        .expect("insert");

    assert_eq!(editor.cursor().expect("cursor"), 5);
    editor.retreat(2).expect("retreat");
    assert_eq!(editor.opcode().expect("opcode"), anchor);
}

#[test]
fn insert_renormalizes_every_stacked_checkpoint() {
    let mut editor = Editor::new();
    attach(&mut editor);

    // Checkpoint at the join (6), then navigate back before the edit point.
    editor.go_to(6).expect("checkpoint");
    editor.go_to(3).expect("edit point");
    editor
        .insert(vec![load_const_int(7), Instruction::new(Opcode::Mul)])
        .expect("insert");

    // Rewinding to the checkpoint must still name the join instruction,
    // which the splice shifted from 6 to 8.
    editor.rewind(1).expect("rewind");
    assert_eq!(editor.cursor().expect("cursor"), 8);
    assert_eq!(editor.labels().expect("labels"), vec![JOIN]);
}

#[test]
fn remove_renormalizes_checkpoints_past_and_inside_the_range() {
    let mut editor = Editor::new();
    attach(&mut editor);

    editor.go_to(8).expect("checkpoint past the range");
    editor.go_to(4).expect("checkpoint inside the range");
    editor.go_to(3).expect("edit point");
    editor.remove_at(3).expect("remove 3..=5");

    assert_eq!(editor.cursor().expect("cursor"), 3);
    editor.rewind(1).expect("rewind to swallowed checkpoint");
    assert_eq!(editor.cursor().expect("cursor"), 3);
    editor.rewind(1).expect("rewind to outer checkpoint");
    assert_eq!(editor.cursor().expect("cursor"), 5);
    assert_eq!(editor.opcode().expect("opcode"), Opcode::Call);
}

#[test]
fn append_moves_the_cursor_to_the_start_of_the_appended_block() {
    let mut editor = Editor::new();
    attach(&mut editor);

    editor
        .append(vec![Instruction::new(Opcode::Pop), Instruction::new(Opcode::Ret)])
        .expect("append");
    assert_eq!(editor.cursor().expect("cursor"), 10);
    assert_eq!(editor.len().expect("len"), 12);
    assert_eq!(editor.opcode().expect("opcode"), Opcode::Pop);
}

#[test]
fn append_with_labels_marks_the_first_appended_instruction() {
    let mut editor = Editor::new();
    attach(&mut editor);

    let tail = Label(9);
    editor
        .append_with_labels(vec![tail], vec![Instruction::new(Opcode::Nop)])
        .expect("append_with_labels");
    assert_eq!(editor.labels().expect("labels"), vec![tail]);
    assert_labels_unique(editor.instructions().expect("instructions"));
}

#[test]
fn replace_at_preserves_labels_only_on_request() {
    let mut editor = Editor::new();
    attach(&mut editor);

    editor.find_label(JOIN, false).expect("find_label");
    editor
        .replace_at(Instruction::with_operand(Opcode::StoreArg, Operand::Int(1)), true)
        .expect("replace preserving labels");
    assert_eq!(editor.labels().expect("labels"), vec![JOIN]);

    editor
        .replace_at(Instruction::new(Opcode::Pop), false)
        .expect("replace dropping labels");
    assert!(editor.labels().expect("labels").is_empty());
}

#[test]
fn remove_at_rejects_ranges_past_the_end() {
    let mut editor = Editor::new();
    attach(&mut editor);

    editor.go_to(8).expect("go_to");
    let err = editor.remove_at(3).unwrap_err();
    assert!(matches!(err, Error::OutOfRange { .. }));
    assert_eq!(editor.len().expect("len"), 10);
}

#[test]
fn remove_at_refuses_to_empty_the_sequence() {
    let mut editor = Editor::new();
    attach(&mut editor);
    let err = editor.remove_at(10).unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));
    assert_eq!(editor.len().expect("len"), 10);
}

#[test]
fn remove_until_deletes_through_the_end_of_the_match() {
    let mut editor = Editor::new();
    attach(&mut editor);

    // From index 3, delete through the LOAD_LOCAL/ADD run ending at 5.
    editor.go_to(3).expect("go_to");
    editor
        .remove_until(&Pattern::of_ops(&[Opcode::LoadLocal, Opcode::Add]))
        .expect("remove_until");

    let remaining = editor.flush().expect("flush");
    assert_eq!(remaining.len(), 7);
    assert_eq!(remaining[3].op, Opcode::StoreLocal);
    assert_eq!(remaining[3].labels, vec![JOIN]);
}

#[test]
fn copy_range_fills_the_buffer_without_mutating_the_sequence() {
    let mut editor = Editor::new();
    attach(&mut editor);

    editor.go_to(4).expect("go_to");
    editor.copy_range(2, false, true).expect("copy_range");

    assert_eq!(editor.len().expect("len"), 10);
    assert_eq!(editor.cursor().expect("advanced cursor"), 6);
    let buffer = editor.buffer().expect("buffer");
    assert_eq!(buffer.len(), 2);
    assert_eq!(buffer[0].operand, Some(Operand::Slot(1)));
    assert_eq!(buffer[1].op, Opcode::Add);
}

#[test]
fn copy_strips_labels_so_reinsertion_keeps_targets_unique() {
    let mut editor = Editor::new();
    attach(&mut editor);

    // Copy the labelled join instruction, strip its label, and splice the
    // copy elsewhere; the original label must still mark one instruction.
    editor.find_label(JOIN, false).expect("find_label");
    editor.copy_range(1, true, false).expect("copy_range");
    editor.rewind_to_first().expect("rewind_to_first");
    editor.insert_buffer().expect("insert_buffer");

    let rewritten = editor.flush().expect("flush");
    assert_eq!(rewritten.len(), 11);
    assert_eq!(rewritten[0].op, Opcode::StoreLocal);
    assert!(rewritten[0].labels.is_empty());
    assert_labels_unique(&rewritten);
}

#[test]
fn copy_until_spans_from_the_cursor_through_the_match() {
    let mut editor = Editor::new();
    attach(&mut editor);

    editor.go_to(3).expect("go_to");
    editor
        .copy_until(&Pattern::of_ops(&[Opcode::Add]), false, false)
        .expect("copy_until");
    let buffer = editor.buffer().expect("buffer");
    assert_eq!(buffer.len(), 3);
    assert_eq!(buffer[0].operand, Some(Operand::Int(5)));
    assert_eq!(buffer[2].op, Opcode::Add);
}

#[test]
fn insert_buffer_slice_selects_a_sub_range() {
    let mut editor = Editor::new();
    attach(&mut editor);

    editor.go_to(3).expect("go_to");
    editor.copy_range(3, true, false).expect("copy_range");
    editor.advance_to_last().expect("advance_to_last");
    editor.insert_buffer_slice(1, 2).expect("insert_buffer_slice");

    let rewritten = editor.flush().expect("flush");
    assert_eq!(rewritten.len(), 12);
    assert_eq!(rewritten[9].operand, Some(Operand::Slot(1)));
    assert_eq!(rewritten[10].op, Opcode::Add);

    let mut editor = Editor::new();
    attach(&mut editor);
    assert!(matches!(
        editor.insert_buffer_slice(0, 1),
        Err(Error::InvalidInput(_))
    ));
}

#[test]
fn label_accessors_move_rather_than_duplicate() {
    let mut editor = Editor::new();
    attach(&mut editor);

    editor.find_label(JOIN, false).expect("find_label");
    let moved = editor.strip_labels().expect("strip_labels");
    assert_eq!(moved, vec![JOIN]);
    assert!(editor.labels().expect("labels").is_empty());

    editor.retreat(1).expect("retreat");
    editor.add_labels(&moved).expect("add_labels");
    assert_eq!(editor.labels().expect("labels"), vec![JOIN]);
    assert_labels_unique(editor.instructions().expect("instructions"));

    editor.remove_labels(&moved).expect("remove_labels");
    editor.set_labels(vec![Label(3), Label(4)]).expect("set_labels");
    assert_eq!(editor.labels().expect("labels"), vec![Label(3), Label(4)]);
}

#[test]
fn operand_accessors_rewrite_in_place() {
    let mut editor = Editor::new();
    attach(&mut editor);

    editor
        .find_first(&Pattern::new(vec![Step::with_operand(
            Opcode::LoadConst,
            Operand::Int(5),
        )]))
        .expect("find");
    assert_eq!(editor.operand().expect("operand"), Some(Operand::Int(5)));

    editor.set_operand(Some(Operand::Int(9))).expect("set_operand");
    editor.set_opcode(Opcode::LoadConst).expect("set_opcode");
    let rewritten = editor.flush().expect("flush");
    assert_eq!(rewritten[3].operand, Some(Operand::Int(9)));
}

#[test]
fn rewind_exhaustion_fails_and_leaves_the_stack_unchanged() {
    let mut editor = Editor::new();
    attach(&mut editor);

    editor.go_to(4).expect("go_to");
    editor.advance(2).expect("advance");
    // Depth is 3; popping 3 would leave no current position.
    let err = editor.rewind(3).unwrap_err();
    assert!(matches!(
        err,
        Error::EmptyStack {
            requested: 3,
            depth: 3
        }
    ));
    assert_eq!(editor.cursor().expect("cursor"), 6);
    editor.rewind(2).expect("rewind within depth");
    assert_eq!(editor.cursor().expect("cursor"), 0);
}

#[test]
fn navigation_out_of_range_is_rejected() {
    let mut editor = Editor::new();
    attach(&mut editor);

    assert!(matches!(editor.retreat(1), Err(Error::OutOfRange { index: -1, .. })));
    assert!(matches!(editor.advance(10), Err(Error::OutOfRange { index: 10, .. })));
    assert!(matches!(editor.go_to(10), Err(Error::OutOfRange { .. })));
    editor.go_to(9).expect("last index is valid");
}
