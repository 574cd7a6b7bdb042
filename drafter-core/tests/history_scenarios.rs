//! End-to-end history scenarios against a real entity store.

use drafter_core::{Change, Document, Entity, EntityProps, Point, DEFAULT_LAYER};

fn line_a() -> Entity {
    Entity::line(Point::new(0.0, 0.0), Point::new(10.0, 10.0))
}

#[test]
fn test_create_modify_undo_redo_scenario() {
    let mut doc = Document::new();
    let a = line_a();
    let id = a.id;

    doc.commit(vec![Change::Create(a)]);
    assert_eq!(doc.store.len(), 1);
    assert_eq!(doc.store.index_of(id), Some(0));

    doc.commit(vec![Change::modify(id, EntityProps::default().with_layer("X"))]);
    assert_eq!(doc.store.get_by_id(id).unwrap().layer, "X");

    assert!(doc.undo());
    assert_eq!(doc.store.get_by_id(id).unwrap().layer, DEFAULT_LAYER);

    assert!(doc.undo());
    assert!(doc.store.is_empty());

    assert!(doc.redo());
    assert!(doc.redo());
    assert_eq!(doc.store.len(), 1);
    assert_eq!(doc.store.get_by_id(id).unwrap().layer, "X");
    assert!(!doc.redo());
}

#[test]
fn test_undo_then_redo_restores_every_committed_state() {
    let mut doc = Document::new();
    let a = line_a();
    let b = Entity::circle(Point::new(5.0, 5.0), 2.0);
    let batches = vec![
        vec![Change::Create(a.clone()), Change::Create(b.clone())],
        vec![Change::modify(a.id, EntityProps::default().with_points(vec![
            Point::new(1.0, 1.0),
            Point::new(2.0, 2.0),
        ]))],
        vec![Change::Delete(b.clone())],
        vec![Change::modify(a.id, EntityProps::default().with_layer("L").with_radius(3.0))],
    ];

    for batch in batches {
        doc.commit(batch);
        let after: Vec<Entity> = doc.store.iter().cloned().collect();
        assert!(doc.undo());
        assert!(doc.redo());
        let restored: Vec<Entity> = doc.store.iter().cloned().collect();
        assert_eq!(after, restored);
    }
}

#[test]
fn test_eleven_commits_leave_first_unreachable() {
    let mut doc = Document::with_history_capacity(10);
    let entities: Vec<Entity> = (0..11)
        .map(|i| Entity::line(Point::new(i as f64, 0.0), Point::new(i as f64, 1.0)))
        .collect();
    for e in &entities {
        doc.commit(vec![Change::Create(e.clone())]);
    }
    assert_eq!(doc.history.len(), 10);

    while doc.undo() {}
    assert_eq!(doc.store.len(), 1);
    assert_eq!(doc.store.index_of(entities[0].id), Some(0));
}

#[test]
fn test_deleting_an_entity_outside_history_skips_its_changes() {
    let mut doc = Document::new();
    let a = line_a();
    let id = a.id;
    doc.commit(vec![Change::Create(a)]);
    doc.commit(vec![Change::modify(id, EntityProps::default().with_layer("X"))]);

    // Removed behind the log's back; undoing the modify must not fail.
    let idx = doc.store.index_of(id).unwrap();
    doc.store.remove(idx).unwrap();

    assert!(doc.undo());
    assert!(doc.undo());
    assert!(doc.store.is_empty());
}
