use criterion::{black_box, criterion_group, criterion_main, Criterion};

use tui_dash::core::collision::generate_collisions;
use tui_dash::core::level::{Level, LevelObject};
use tui_dash::core::player::{Player, SpawnState};
use tui_dash::core::{ObjectCatalog, ObjectType};
use tui_dash::types::{Gamemode, SpeedClass};

fn dense_level() -> Level {
    let mut level = Level::new(200, 16);
    for x in 0..200 {
        level.set_object_at(x, 0, Some(LevelObject::new(ObjectType::Block)));
        if x % 7 == 3 {
            level.set_object_at(x, 1, Some(LevelObject::new(ObjectType::Spike)));
        }
        if x % 11 == 5 {
            level.set_object_at(x, 3, Some(LevelObject::new(ObjectType::YellowOrb)));
        }
    }
    level
}

fn spawn() -> SpawnState {
    SpawnState {
        x: 10.0,
        y: 1.5,
        mode: Gamemode::Cube,
        speed: SpeedClass::Normal,
        gravity_sign: 1.0,
    }
}

fn bench_collision_scan(c: &mut Criterion) {
    let level = dense_level();
    let catalog = ObjectCatalog::new();

    c.bench_function("collision_scan", |b| {
        b.iter(|| {
            generate_collisions(&level, &catalog, black_box(10.3), black_box(1.2))
        })
    });
}

fn bench_cube_tick(c: &mut Criterion) {
    let level = dense_level();
    let catalog = ObjectCatalog::new();
    let mut player = Player::new(spawn());

    c.bench_function("cube_tick_4ms", |b| {
        b.iter(|| {
            player.tick(black_box(1.0 / 240.0), false, &level, &catalog);
            if player.x > 150.0 || player.crashed {
                player.reset(spawn());
            }
        })
    });
}

fn bench_fast_fall_catch(c: &mut Criterion) {
    let level = dense_level();
    let catalog = ObjectCatalog::new();

    c.bench_function("ground_catch_fast_fall", |b| {
        b.iter(|| {
            let mut player = Player::new(spawn());
            player.y = 12.0;
            player.velocity_y = -400.0;
            player.tick(black_box(0.05), false, &level, &catalog);
            black_box(player.y)
        })
    });
}

criterion_group!(benches, bench_collision_scan, bench_cube_tick, bench_fast_fall_catch);
criterion_main!(benches);
