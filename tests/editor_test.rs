//! Tests for the outline keyboard handler

use outliner::application::OutlineEditor;
use outliner::domain::{Key, KeyContext, KeyEvent, KeyOutcome, NodeId, OutlineArena, Siblings};
use outliner::util::testing;
use rstest::rstest;

/// Lines of the last render as (depth, value).
fn outline(editor: &OutlineEditor) -> Vec<(usize, String)> {
    editor
        .view()
        .lines()
        .iter()
        .map(|line| (line.depth, line.value.to_string()))
        .collect()
}

fn lines(expected: &[(usize, &str)]) -> Vec<(usize, String)> {
    expected
        .iter()
        .map(|(depth, value)| (*depth, value.to_string()))
        .collect()
}

/// Editor over `tree`, rendered once, with `focus` focused.
fn editor_on(tree: OutlineArena, focus: NodeId) -> OutlineEditor {
    testing::init_test_setup();
    let mut editor = OutlineEditor::with_tree(tree);
    editor.render();
    editor.focus(focus);
    editor
}

// ============================================================
// Enter
// ============================================================

#[test]
fn given_single_node_when_pressing_enter_then_new_empty_sibling_is_focused() {
    let mut tree = OutlineArena::new();
    let a = tree.push_root("A");
    let mut editor = editor_on(tree, a);

    let outcome = editor.press(Key::Enter);

    assert_eq!(outcome, KeyOutcome::Redraw);
    assert_eq!(outline(&editor), lines(&[(0, "A"), (0, "")]));
    let b = editor.tree().roots()[1];
    assert_eq!(editor.focused(), Some(b));
    assert_eq!(editor.value(b).unwrap(), "");
}

#[test]
fn given_middle_node_when_pressing_enter_then_inserts_right_after_it() {
    let mut tree = OutlineArena::new();
    let a = tree.push_root("A");
    tree.push_root("B");
    let mut editor = editor_on(tree, a);

    editor.press(Key::Enter);

    assert_eq!(outline(&editor), lines(&[(0, "A"), (0, ""), (0, "B")]));
    assert_eq!(editor.tree().len(), 3);
}

#[test]
fn given_child_node_when_pressing_enter_then_sibling_stays_in_same_list() {
    let mut tree = OutlineArena::new();
    let a = tree.push_root("A");
    let b = tree.push_child(a, "B").unwrap();
    tree.push_root("C");
    let mut editor = editor_on(tree, b);

    editor.press(Key::Enter);

    assert_eq!(
        outline(&editor),
        lines(&[(0, "A"), (1, "B"), (1, ""), (0, "C")])
    );
    let created = editor.focused().unwrap();
    assert_eq!(editor.tree().parent(created), Some(a));
}

// ============================================================
// Tab
// ============================================================

#[test]
fn given_second_sibling_when_pressing_tab_then_becomes_child_of_previous() {
    let mut tree = OutlineArena::new();
    let a = tree.push_root("A");
    let b = tree.push_root("B");
    let mut editor = editor_on(tree, b);
    let count = editor.tree().len();

    let outcome = editor.press(Key::Tab);

    assert_eq!(outcome, KeyOutcome::Redraw);
    assert_eq!(outline(&editor), lines(&[(0, "A"), (1, "B")]));
    assert_eq!(editor.tree().len(), count);
    assert_eq!(editor.tree().parent(b), Some(a));
    assert_eq!(editor.focused(), Some(b));
}

#[test]
fn given_previous_sibling_with_children_when_pressing_tab_then_appends_last() {
    let mut tree = OutlineArena::new();
    let a = tree.push_root("A");
    tree.push_child(a, "A1");
    let b = tree.push_root("B");
    let mut editor = editor_on(tree, b);

    editor.press(Key::Tab);

    assert_eq!(outline(&editor), lines(&[(0, "A"), (1, "A1"), (1, "B")]));
}

#[test]
fn given_node_with_subtree_when_pressing_tab_then_subtree_moves_along() {
    let mut tree = OutlineArena::new();
    tree.push_root("A");
    let b = tree.push_root("B");
    tree.push_child(b, "B1");
    let mut editor = editor_on(tree, b);

    editor.press(Key::Tab);

    assert_eq!(outline(&editor), lines(&[(0, "A"), (1, "B"), (2, "B1")]));
}

#[rstest]
#[case::first_root(0)]
#[case::first_child(1)]
fn given_first_sibling_when_pressing_tab_then_tree_is_unchanged(#[case] pick: usize) {
    let mut tree = OutlineArena::new();
    let a = tree.push_root("A");
    let a1 = tree.push_child(a, "A1").unwrap();
    tree.push_root("B");
    let focus = [a, a1][pick];
    let mut editor = editor_on(tree, focus);
    let before = outline(&editor);

    let outcome = editor.press(Key::Tab);

    assert_eq!(outcome, KeyOutcome::Consumed);
    assert_eq!(outline(&editor), before);
    assert_eq!(editor.focused(), Some(focus));
}

// ============================================================
// Backspace
// ============================================================

#[test]
fn given_empty_node_with_previous_sibling_when_backspace_then_focus_moves_after_render() {
    let mut tree = OutlineArena::new();
    let a = tree.push_root("A");
    let b = tree.push_root("");
    tree.push_root("C");
    let mut editor = editor_on(tree, b);

    // Without a render the focus transfer is still pending
    let outcome = editor.key_down(&KeyEvent::new(Key::Backspace));
    assert_eq!(outcome, KeyOutcome::Redraw);
    assert_eq!(editor.focused(), None);
    assert_eq!(editor.tree().len(), 2);

    editor.render();
    assert_eq!(outline(&editor), lines(&[(0, "A"), (0, "C")]));
    assert_eq!(editor.focused(), Some(a));
}

#[test]
fn given_empty_first_node_when_backspace_then_next_sibling_is_focused() {
    let mut tree = OutlineArena::new();
    let a = tree.push_root("");
    let b = tree.push_root("B");
    let mut editor = editor_on(tree, a);

    editor.press(Key::Backspace);

    assert_eq!(outline(&editor), lines(&[(0, "B")]));
    assert_eq!(editor.focused(), Some(b));
}

#[test]
fn given_empty_only_child_when_backspace_then_parent_is_focused() {
    let mut tree = OutlineArena::new();
    let a = tree.push_root("A");
    let a1 = tree.push_child(a, "").unwrap();
    tree.push_root("B");
    let mut editor = editor_on(tree, a1);

    editor.press(Key::Backspace);

    assert_eq!(outline(&editor), lines(&[(0, "A"), (0, "B")]));
    assert_eq!(editor.focused(), Some(a));
}

#[test]
fn given_sole_empty_root_when_backspace_then_outline_is_empty() {
    let mut editor = OutlineEditor::new();
    editor.render();

    let outcome = editor.press(Key::Backspace);

    assert_eq!(outcome, KeyOutcome::Redraw);
    assert!(editor.tree().is_empty());
    assert!(editor.view().is_empty());
    assert_eq!(editor.focused(), None);
}

#[test]
fn given_empty_outline_when_pressing_enter_then_fresh_root_is_focused() {
    let mut editor = OutlineEditor::new();
    editor.render();
    editor.press(Key::Backspace);

    assert_eq!(editor.press(Key::Char('x')), KeyOutcome::Ignored);
    assert_eq!(editor.press(Key::Enter), KeyOutcome::Redraw);

    assert_eq!(outline(&editor), lines(&[(0, "")]));
    assert_eq!(editor.focused(), Some(editor.tree().roots()[0]));
}

#[test]
fn given_empty_node_with_children_when_backspace_then_subtree_is_removed() {
    let mut tree = OutlineArena::new();
    tree.push_root("A");
    let b = tree.push_root("");
    tree.push_child(b, "B1");
    let mut editor = editor_on(tree, b);

    editor.press(Key::Backspace);

    assert_eq!(outline(&editor), lines(&[(0, "A")]));
    assert_eq!(editor.tree().len(), 1);
}

#[test]
fn given_non_empty_node_when_backspace_then_deletes_text_only() {
    let mut tree = OutlineArena::new();
    let a = tree.push_root("AB");
    tree.push_root("C");
    let mut editor = editor_on(tree, a);
    let context = editor.view().context_of(a).unwrap();

    assert_eq!(
        editor.handle_keydown(&KeyEvent::new(Key::Backspace), context),
        KeyOutcome::Ignored
    );

    editor.press(Key::Backspace);
    assert_eq!(outline(&editor), lines(&[(0, "A"), (0, "C")]));
    assert_eq!(editor.tree().len(), 2);
    assert_eq!(editor.focused(), Some(a));
}

#[test]
fn given_deleted_node_when_creating_new_one_then_ids_differ() {
    let mut tree = OutlineArena::new();
    let a = tree.push_root("A");
    let b = tree.push_root("");
    let mut editor = editor_on(tree, b);

    editor.press(Key::Backspace);
    assert_eq!(editor.focused(), Some(a));
    editor.press(Key::Enter);

    let created = editor.focused().unwrap();
    assert_ne!(created, b);
    assert!(editor.value(b).is_err());
}

// ============================================================
// Arrow keys
// ============================================================

// A
// ├── A1
// │   └── A1a
// └── A2
// B
// └── B1
// C
struct Sample {
    editor: OutlineEditor,
    a: NodeId,
    a1: NodeId,
    a1a: NodeId,
    a2: NodeId,
    b: NodeId,
    b1: NodeId,
    c: NodeId,
}

fn sample() -> Sample {
    let mut tree = OutlineArena::new();
    let a = tree.push_root("A");
    let a1 = tree.push_child(a, "A1").unwrap();
    let a1a = tree.push_child(a1, "A1a").unwrap();
    let a2 = tree.push_child(a, "A2").unwrap();
    let b = tree.push_root("B");
    let b1 = tree.push_child(b, "B1").unwrap();
    let c = tree.push_root("C");
    let editor = editor_on(tree, a);
    Sample {
        editor,
        a,
        a1,
        a1a,
        a2,
        b,
        b1,
        c,
    }
}

#[test]
fn given_arrow_up_then_visits_previous_sibling_or_parent() {
    let Sample {
        mut editor,
        a,
        a1,
        a2,
        b,
        ..
    } = sample();

    editor.focus(b);
    assert_eq!(editor.press(Key::ArrowUp), KeyOutcome::Consumed);
    assert_eq!(editor.focused(), Some(a));

    editor.focus(a2);
    editor.press(Key::ArrowUp);
    assert_eq!(editor.focused(), Some(a1));

    editor.press(Key::ArrowUp);
    assert_eq!(editor.focused(), Some(a));
}

#[test]
fn given_first_root_when_arrow_up_then_focus_stays() {
    let Sample { mut editor, a, .. } = sample();

    editor.press(Key::ArrowUp);

    assert_eq!(editor.focused(), Some(a));
}

#[test]
fn given_node_with_children_when_arrow_down_then_first_child_is_focused() {
    let Sample {
        mut editor, a, a1, ..
    } = sample();

    editor.focus(a);
    editor.press(Key::ArrowDown);

    assert_eq!(editor.focused(), Some(a1));
}

#[test]
fn given_leaf_with_next_sibling_when_arrow_down_then_next_sibling_is_focused() {
    let mut tree = OutlineArena::new();
    let x = tree.push_root("X");
    let y = tree.push_root("Y");
    let mut editor = editor_on(tree, x);
    editor.press(Key::ArrowDown);
    assert_eq!(editor.focused(), Some(y));
}

#[test]
fn given_last_grandchild_when_arrow_down_then_parents_next_sibling_is_focused() {
    let Sample {
        mut editor,
        a1a,
        a2,
        ..
    } = sample();

    editor.focus(a1a);
    editor.press(Key::ArrowDown);

    assert_eq!(editor.focused(), Some(a2));
}

#[test]
fn given_last_root_when_arrow_down_then_focus_stays() {
    let Sample {
        mut editor, b, b1, c, ..
    } = sample();

    editor.focus(b);
    editor.press(Key::ArrowDown);
    assert_eq!(editor.focused(), Some(b1));

    editor.focus(c);
    editor.press(Key::ArrowDown);
    assert_eq!(editor.focused(), Some(c));
}

#[rstest]
#[case::last_child_of_first_root(0)]
#[case::last_child_of_second_root(1)]
fn given_last_child_of_root_when_arrow_down_then_focus_stays(#[case] pick: usize) {
    let Sample {
        mut editor, a2, b1, ..
    } = sample();
    let start = [a2, b1][pick];

    editor.focus(start);
    editor.press(Key::ArrowDown);

    // A root has no parent, so there is no uncle list to step into
    assert_eq!(editor.focused(), Some(start));
}

#[test]
fn given_arrow_keys_when_pressed_then_tree_is_not_mutated() {
    let Sample { mut editor, a1, .. } = sample();
    let before = outline(&editor);

    editor.focus(a1);
    editor.press(Key::ArrowDown);
    editor.press(Key::ArrowUp);
    editor.press(Key::ArrowUp);

    assert_eq!(outline(&editor), before);
    assert_eq!(editor.tree().len(), 7);
}

// ============================================================
// Explicit context and text input
// ============================================================

#[test]
fn given_explicit_context_when_handling_key_then_uses_given_binding() {
    let mut tree = OutlineArena::new();
    let a = tree.push_root("A");
    let b = tree.push_root("B");
    let mut editor = editor_on(tree, a);

    let context = KeyContext {
        node: b,
        index: 1,
        siblings: Siblings::Roots,
    };
    let outcome = editor.handle_keydown(&KeyEvent::new(Key::Tab), context);
    assert_eq!(outcome, KeyOutcome::Redraw);
    editor.render();

    assert_eq!(outline(&editor), lines(&[(0, "A"), (1, "B")]));
    assert_eq!(editor.focused(), Some(b));
}

#[rstest]
#[case::enter(Key::Enter)]
#[case::tab(Key::Tab)]
#[case::backspace(Key::Backspace)]
fn given_stale_context_when_pressing_structural_key_then_tree_is_unchanged(#[case] key: Key) {
    let mut tree = OutlineArena::new();
    let a = tree.push_root("");
    tree.push_root("B");
    let mut editor = editor_on(tree, a);

    // Index 1 no longer holds `a`
    let stale = KeyContext {
        node: a,
        index: 1,
        siblings: Siblings::Roots,
    };
    let outcome = editor.handle_keydown(&KeyEvent::new(key), stale);

    assert_eq!(outcome, KeyOutcome::Consumed);
    editor.render();
    assert_eq!(outline(&editor), lines(&[(0, ""), (0, "B")]));
    assert_eq!(editor.tree().len(), 2);
    assert_eq!(editor.focused(), Some(a));
}

#[test]
fn given_focused_node_when_typing_then_value_and_view_update() {
    let mut editor = OutlineEditor::new();
    editor.render();

    for c in "hi".chars() {
        assert_eq!(editor.press(Key::Char(c)), KeyOutcome::Redraw);
    }
    assert_eq!(editor.press(Key::ArrowLeft), KeyOutcome::Consumed);
    editor.press(Key::Char('!'));

    assert_eq!(outline(&editor), lines(&[(0, "h!i")]));
    let (_, caret) = editor.caret().unwrap();
    assert_eq!(caret, 2);
}

#[test]
fn given_value_set_programmatically_when_focused_then_caret_moves_to_end() {
    let mut editor = OutlineEditor::new();
    editor.render();
    let root = editor.focused().unwrap();

    editor.set_value(root, "abc").unwrap();

    assert_eq!(editor.caret(), Some((root, 3)));
    assert_eq!(editor.caret_column(), Some(3));
}
