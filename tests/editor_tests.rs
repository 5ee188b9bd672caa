// tests/editor_tests.rs

use macroquad::math::Rect;
use platmap::{
    EditorReconciler, EnemyKind, EnemyType, MapDocument, TileType, Tool, ENEMY_PICK_RADIUS,
};

fn session() -> EditorReconciler {
    EditorReconciler::new(MapDocument::new("edit", 10, 10))
}

#[test]
fn placing_a_tile_updates_grid_and_document_in_lockstep() {
    let mut editor = session();
    editor.select_sprite_variant(Some(2));
    editor.place_tile(5, 5, TileType::Wall);

    assert_eq!(editor.grid().get_tile(5, 5), TileType::Wall);
    assert_eq!(editor.grid().get_variant(5, 5), Some(2));
    let entry = editor.document().tiles.iter().find(|t| t.x == 5 && t.y == 5).unwrap();
    assert_eq!(entry.tile_type, TileType::Wall.code());
    assert_eq!(entry.sprite_variant, Some(2));
}

#[test]
fn replacing_a_tile_keeps_one_document_entry() {
    let mut editor = session();
    editor.place_tile(3, 3, TileType::Ground);
    editor.select_sprite_variant(Some(1));
    editor.place_tile(3, 3, TileType::Platform);

    let entries: Vec<_> = editor.document().tiles.iter().filter(|t| t.x == 3 && t.y == 3).collect();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].tile_type, TileType::Platform.code());
    assert_eq!(entries[0].sprite_variant, Some(1));
}

#[test]
fn out_of_range_placement_is_a_silent_no_op() {
    let mut editor = session();
    editor.place_tile(-1, 4, TileType::Wall);
    editor.place_tile(10, 0, TileType::Wall);
    assert!(editor.document().tiles.is_empty());
}

#[test]
fn place_then_erase_restores_both_representations() {
    let mut editor = session();
    let tiles_before = editor.document().tiles.clone();

    editor.place_tile(5, 5, TileType::Wall);
    editor.erase_tile(5, 5);

    assert_eq!(editor.grid().get_tile(5, 5), TileType::Empty);
    assert_eq!(editor.grid().get_variant(5, 5), None);
    assert_eq!(editor.document().tiles, tiles_before);
}

#[test]
fn erasing_an_empty_cell_is_a_no_op() {
    let mut editor = session();
    editor.erase_tile(2, 2);
    assert!(editor.document().tiles.is_empty());
}

#[test]
fn player_and_portal_are_singletons_by_replacement() {
    let mut editor = session();
    editor.place_player(32.0, 48.0);
    editor.place_player(96.0, 48.0);
    assert_eq!(editor.document().player.start_position.x, 96.0);

    editor.place_portal(128.0, 64.0);
    editor.place_portal(160.0, 64.0);
    assert_eq!(editor.document().portal.position.x, 160.0);
}

#[test]
fn placed_enemies_get_fresh_sequential_ids() {
    let mut editor = session();
    let a = editor.place_enemy(EnemyKind::Stationary, EnemyType::Enemy1, 64.0, 64.0);
    let b = editor.place_enemy(EnemyKind::Patrol, EnemyType::Enemy2, 128.0, 64.0);
    assert_ne!(a, b);
    assert_eq!(editor.document().enemies.len(), 2);
    assert_eq!(editor.document().enemies[1].id, b);
    // Enemy2 carries its beefier defaults.
    assert_eq!(editor.document().enemies[1].properties.health, 50.0);
}

#[test]
fn enemy_removal_picks_nearest_within_radius() {
    let mut editor = session();
    let far = editor.place_enemy(EnemyKind::Stationary, EnemyType::Enemy1, 200.0, 200.0);
    let near = editor.place_enemy(EnemyKind::Stationary, EnemyType::Enemy1, 60.0, 64.0);

    assert_eq!(editor.remove_enemy_near(64.0, 64.0), Some(near));
    // The far one is outside the pick radius.
    assert_eq!(editor.remove_enemy_near(64.0, 64.0), None);
    assert_eq!(editor.document().enemies[0].id, far);
}

#[test]
fn equidistant_enemies_break_ties_in_list_order() {
    let mut editor = session();
    let first = editor.place_enemy(EnemyKind::Stationary, EnemyType::Enemy1, 48.0, 64.0);
    let _second = editor.place_enemy(EnemyKind::Stationary, EnemyType::Enemy1, 80.0, 64.0);
    // Click dead centre: both are 16px away, well inside the radius.
    assert!(ENEMY_PICK_RADIUS >= 16.0);
    assert_eq!(editor.remove_enemy_near(64.0, 64.0), Some(first));
}

#[test]
fn tile_edits_invalidate_and_rebuild_collision_bodies() {
    let mut editor = session();
    let baseline = editor.collision_bodies().to_vec();
    assert_eq!(baseline.len(), 1, "empty map has only the ground band");

    editor.place_tile(4, 2, TileType::Wall);
    let bodies = editor.collision_bodies().to_vec();
    assert_eq!(bodies.len(), 2);
    assert!(bodies.contains(&Rect::new(128.0, 64.0, 32.0, 32.0)));

    editor.erase_tile(4, 2);
    assert_eq!(editor.collision_bodies(), baseline.as_slice());
}

#[test]
fn click_dispatch_follows_the_selected_tool() {
    let mut editor = session();

    editor.select_tool(Tool::PlaceSolid);
    editor.select_tile_type(TileType::Ground);
    editor.handle_click(70.0, 70.0); // tile (2, 2)
    assert_eq!(editor.grid().get_tile(2, 2), TileType::Ground);

    editor.select_tool(Tool::Erase);
    editor.handle_click(70.0, 70.0);
    assert_eq!(editor.grid().get_tile(2, 2), TileType::Empty);

    editor.select_tool(Tool::PlaceEnemy);
    editor.select_enemy(EnemyKind::Moving, EnemyType::Enemy1);
    editor.handle_click(100.0, 100.0);
    assert_eq!(editor.document().enemies.len(), 1);
    assert_eq!(editor.document().enemies[0].kind, EnemyKind::Moving);

    editor.select_tool(Tool::None);
    editor.handle_click(10.0, 10.0);
    assert!(editor.document().tiles.is_empty());
}

#[test]
fn snapshot_refreshes_only_the_timestamp() {
    let mut editor = session();
    editor.place_tile(1, 1, TileType::Ground);
    let snap = editor.snapshot();
    assert_eq!(snap.tiles, editor.document().tiles);
    assert_eq!(snap.world, editor.document().world);
}

#[test]
fn shrinking_the_world_drops_now_out_of_range_tiles() {
    let mut editor = session();
    editor.place_tile(8, 2, TileType::Wall);
    editor.place_tile(2, 2, TileType::Wall);

    editor.resize_world(5, 10);

    assert_eq!(editor.grid().width(), 5);
    assert_eq!(editor.grid().get_tile(2, 2), TileType::Wall);
    assert!(editor.document().tiles.iter().all(|t| t.x < 5));
}
