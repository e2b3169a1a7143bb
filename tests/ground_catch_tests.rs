//! Ground-catch and boundary-predicate properties, exercised through the
//! public physics API.

use tui_dash::core::collision::{generate_collisions, highest_solid_beneath};
use tui_dash::core::level::{Level, LevelObject};
use tui_dash::core::player::{boundary_crossed, Player, SpawnState};
use tui_dash::core::{ObjectCatalog, ObjectType};
use tui_dash::types::{Gamemode, SpeedClass, PLAYER_SIZE, SOLID_TOP};

fn level_with(objects: &[(i64, i64, ObjectType)]) -> Level {
    let mut level = Level::new(50, 14);
    for &(x, y, ty) in objects {
        level.set_object_at(x, y, Some(LevelObject::new(ty)));
    }
    level
}

fn cube_at(x: f64, y: f64) -> Player {
    Player::new(SpawnState {
        x,
        y,
        mode: Gamemode::Cube,
        speed: SpeedClass::Normal,
        gravity_sign: 1.0,
    })
}

#[test]
fn boundary_predicate_truth_table() {
    // floor(old) != floor(new).
    assert!(boundary_crossed(5.2, 4.8));
    assert!(boundary_crossed(0.1, -0.1));
    // Same cell, neither endpoint exact.
    assert!(!boundary_crossed(5.2, 5.9));
    // Exactly one endpoint on a grid line.
    assert!(boundary_crossed(5.0, 5.5));
    assert!(boundary_crossed(5.5, 5.0));
    // Both exact.
    assert!(!boundary_crossed(3.0, 3.0));
    assert!(boundary_crossed(3.0, 4.0));
}

#[test]
fn fast_fall_snaps_to_thin_ground_instead_of_tunneling() {
    // One-row-thick platform under the whole travel window.
    let level = level_with(&[
        (0, 4, ObjectType::Block),
        (1, 4, ObjectType::Block),
        (2, 4, ObjectType::Block),
    ]);
    let catalog = ObjectCatalog::new();
    let mut player = cube_at(0.0, 5.0);
    player.velocity_y = -50.0;

    player.tick(0.1, false, &level, &catalog);

    assert_eq!(player.y, 4.0 + SOLID_TOP);
    assert_eq!(player.velocity_y, 0.0);
    assert!(!player.in_air);
}

#[test]
fn floor_is_unbreakable_for_any_velocity_and_dt() {
    let level = level_with(&[]);
    let catalog = ObjectCatalog::new();
    for &(vy, dt) in &[(-10.0, 0.002), (-60.0, 0.02), (-500.0, 0.1), (-3.0, 0.25)] {
        let mut player = cube_at(0.0, 2.5);
        player.velocity_y = vy;
        for _ in 0..400 {
            player.tick(dt, false, &level, &catalog);
            assert!(player.y >= 0.0, "y sank below 0 with vy={vy} dt={dt}");
        }
    }
}

#[test]
fn reverse_gravity_never_passes_an_underside() {
    // Ceiling spanning the whole stretch the player covers while rising.
    let ceiling: Vec<(i64, i64, ObjectType)> =
        (0..=12).map(|x| (x, 6, ObjectType::Block)).collect();
    let level = level_with(&ceiling);
    let catalog = ObjectCatalog::new();
    let mut player = Player::new(SpawnState {
        x: 0.0,
        y: 2.0,
        mode: Gamemode::Cube,
        speed: SpeedClass::Slow,
        gravity_sign: -1.0,
    });

    for _ in 0..100 {
        player.tick(0.01, false, &level, &catalog);
        assert!(player.y + PLAYER_SIZE <= 6.0 + 1e-9);
    }
    assert_eq!(player.y, 6.0 - PLAYER_SIZE);
}

#[test]
fn collision_scan_is_pure_and_repeatable() {
    let level = level_with(&[
        (4, 2, ObjectType::Block),
        (5, 2, ObjectType::Block),
        (4, 4, ObjectType::Spike),
        (5, 3, ObjectType::YellowOrb),
    ]);
    let catalog = ObjectCatalog::new();

    let a = generate_collisions(&level, &catalog, 4.4, 2.9);
    for _ in 0..10 {
        let b = generate_collisions(&level, &catalog, 4.4, 2.9);
        assert_eq!(a.as_slice(), b.as_slice());
    }

    // One sided record per solid, never more.
    for c in &a {
        let sided = a.iter().filter(|o| (o.x, o.y) == (c.x, c.y) && o.side.is_some()).count();
        assert!(sided <= 1);
    }
}

#[test]
fn bounded_search_misses_far_surfaces_by_design() {
    let level = level_with(&[(3, 0, ObjectType::Block)]);
    let catalog = ObjectCatalog::new();

    // ceil(|v| * dt) rows: a window of 1 row from y = 9 cannot reach row 0.
    assert_eq!(highest_solid_beneath(&level, &catalog, 3.0, 9.0, 1), None);
    assert_eq!(
        highest_solid_beneath(&level, &catalog, 3.0, 9.0, 9),
        Some(SOLID_TOP)
    );
}
