use flowcanvas::{Editor, NodeTypeTemplate, ResizeDirection, ShapeKind, Vec2};
use proptest::prelude::*;

#[derive(Clone, Debug)]
enum Op {
    Add { kind: u8, x: i16, y: i16 },
    Select { idx: u16, toggle: bool },
    Move { idx: u16, dx: i16, dy: i16 },
    Resize { idx: u16, dir: u8, dx: i16, dy: i16 },
    Rotate { idx: u16 },
    Copy { idx: u16 },
    Delete { idx: u16 },
    Connect { a: u16, b: u16, ha: u8, hb: u8 },
    Undo,
    Redo,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (any::<u8>(), any::<i16>(), any::<i16>()).prop_map(|(kind, x, y)| Op::Add { kind, x, y }),
        (any::<u16>(), any::<bool>()).prop_map(|(idx, toggle)| Op::Select { idx, toggle }),
        (any::<u16>(), any::<i16>(), any::<i16>()).prop_map(|(idx, dx, dy)| Op::Move { idx, dx, dy }),
        (any::<u16>(), 0u8..8, any::<i16>(), any::<i16>()).prop_map(|(idx, dir, dx, dy)| Op::Resize {
            idx,
            dir,
            dx,
            dy,
        }),
        any::<u16>().prop_map(|idx| Op::Rotate { idx }),
        any::<u16>().prop_map(|idx| Op::Copy { idx }),
        any::<u16>().prop_map(|idx| Op::Delete { idx }),
        (any::<u16>(), any::<u16>(), any::<u8>(), any::<u8>()).prop_map(|(a, b, ha, hb)| Op::Connect {
            a,
            b,
            ha,
            hb,
        }),
        Just(Op::Undo),
        Just(Op::Redo),
    ]
}

fn pick(ed: &Editor, idx: u16) -> Option<String> {
    let nodes = ed.nodes();
    if nodes.is_empty() {
        return None;
    }
    Some(nodes[idx as usize % nodes.len()].id.clone())
}

fn apply_op(ed: &mut Editor, op: Op) {
    match op {
        Op::Add { kind, x, y } => {
            let kind = ShapeKind::ALL[kind as usize % ShapeKind::ALL.len()];
            ed.add_node_from_template(&NodeTypeTemplate::for_kind(kind), Vec2::new(x as f32, y as f32));
        }
        Op::Select { idx, toggle } => {
            if let Some(id) = pick(ed, idx) {
                ed.select(&id, toggle);
            }
        }
        Op::Move { idx, dx, dy } => {
            let Some(id) = pick(ed, idx) else { return };
            if ed.pointer_down_on_node(&id, Vec2::new(0.0, 0.0), false) {
                ed.pointer_move(Vec2::new(dx as f32 * 0.5, dy as f32 * 0.5));
                ed.pointer_move(Vec2::new(dx as f32, dy as f32));
                ed.pointer_up(Vec2::new(dx as f32, dy as f32));
            }
        }
        Op::Resize { idx, dir, dx, dy } => {
            let Some(id) = pick(ed, idx) else { return };
            let dir = ResizeDirection::ALL[dir as usize];
            if ed.begin_resize(&id, dir, Vec2::new(0.0, 0.0)) {
                ed.pointer_move(Vec2::new(dx as f32, dy as f32));
                ed.pointer_up(Vec2::new(dx as f32, dy as f32));
            }
        }
        Op::Rotate { idx } => {
            if let Some(id) = pick(ed, idx) {
                ed.rotate(&id);
            }
        }
        Op::Copy { idx } => {
            if let Some(id) = pick(ed, idx) {
                ed.copy(&id);
            }
        }
        Op::Delete { idx } => {
            if let Some(id) = pick(ed, idx) {
                ed.delete(&id);
            }
        }
        Op::Connect { a, b, ha, hb } => {
            let (Some(a), Some(b)) = (pick(ed, a), pick(ed, b)) else { return };
            let sources: Vec<_> = ed.node(&a).map(|n| handles(n.kind, true)).unwrap_or_default();
            let targets: Vec<_> = ed.node(&b).map(|n| handles(n.kind, false)).unwrap_or_default();
            if sources.is_empty() || targets.is_empty() {
                return;
            }
            let sh = sources[ha as usize % sources.len()];
            let th = targets[hb as usize % targets.len()];
            let _ = ed.connect(&a, sh, &b, th);
        }
        Op::Undo => {
            ed.undo();
        }
        Op::Redo => {
            ed.redo();
        }
    }
}

fn handles(kind: ShapeKind, source: bool) -> Vec<flowcanvas::HandleId> {
    let d = kind.definition();
    d.handles(d.default_size.width, d.default_size.height)
        .into_iter()
        .map(|h| h.id)
        .filter(|id| (id.role == flowcanvas::HandleRole::Source) == source)
        .collect()
}

fn assert_invariants(ed: &Editor) {
    for n in ed.nodes() {
        assert!(n.size.width >= 40.0 && n.size.height >= 40.0, "{} is {:?}", n.id, n.size);
        assert!((0.0..360.0).contains(&n.rotation), "{} rotation {}", n.id, n.rotation);
        for c in &n.connections {
            assert!(ed.edges().iter().any(|e| e.id == c.edge_id && e.source_node_id == n.id));
        }
    }
    for e in ed.edges() {
        assert!(ed.node(&e.source_node_id).is_some(), "edge {} dangles", e.id);
        assert!(ed.node(&e.target_node_id).is_some(), "edge {} dangles", e.id);
    }
    for id in ed.selected_ids() {
        assert!(ed.node(&id).is_some(), "selection holds removed {}", id);
    }
}

fn sequence_strategy() -> impl Strategy<Value = Vec<Op>> {
    prop::collection::vec(op_strategy(), 5..40)
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 512, .. ProptestConfig::default() })]

    #[test]
    fn edit_invariants_hold(seq in sequence_strategy()) {
        let mut ed = Editor::default();
        for op in seq {
            apply_op(&mut ed, op);
            assert_invariants(&ed);
        }
    }

    #[test]
    fn undo_then_redo_is_exact(seq in sequence_strategy(), last in op_strategy()) {
        let mut ed = Editor::default();
        for op in seq {
            apply_op(&mut ed, op);
        }
        let before = ed.snapshot();
        let is_history_op = matches!(last, Op::Undo | Op::Redo);
        apply_op(&mut ed, last);
        let after = ed.snapshot();
        if before != after && !is_history_op {
            prop_assert!(ed.undo());
            prop_assert_eq!(ed.snapshot(), before);
            prop_assert!(ed.redo());
            prop_assert_eq!(ed.snapshot(), after);
        }
    }

    #[test]
    fn delete_drops_exactly_the_touching_edges(seq in sequence_strategy(), idx in any::<u16>()) {
        let mut ed = Editor::default();
        for op in seq {
            apply_op(&mut ed, op);
        }
        if let Some(id) = pick(&ed, idx) {
            let touching = ed.edges().iter().filter(|e| e.source_node_id == id || e.target_node_id == id).count();
            let total = ed.edge_count();
            ed.select(&id, false);
            prop_assert!(ed.delete(&id));
            prop_assert_eq!(ed.edge_count(), total - touching);
            prop_assert!(ed.edges().iter().all(|e| e.source_node_id != id && e.target_node_id != id));
        }
    }

    #[test]
    fn rotating_four_times_is_identity(kind in 0usize..21, turns in 0usize..12) {
        let mut ed = Editor::default();
        let id = ed.add_node_from_template(&NodeTypeTemplate::for_kind(ShapeKind::ALL[kind]), Vec2::new(0.0, 0.0));
        for _ in 0..turns {
            ed.rotate(&id);
        }
        let r = ed.node(&id).unwrap().rotation;
        for _ in 0..4 {
            ed.rotate(&id);
        }
        prop_assert_eq!(ed.node(&id).unwrap().rotation, r);
    }
}
