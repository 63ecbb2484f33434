use delve_core::dungeon::{DistanceMap, Level, TileKind};
use delve_core::{generate, EngineError, GenerationParams};
use proptest::prelude::*;

fn small_params() -> GenerationParams {
    GenerationParams::new(20, 15)
        .with_room_count(4, 8)
        .with_room_size((3, 3), (6, 6))
}

fn assert_connected(level: &Level) {
    let fill = DistanceMap::from_start(level.grid(), level.entry()).unwrap();
    for (i, room) in level.rooms().iter().enumerate() {
        let (x, y) = room.center();
        assert!(fill.reached(x, y), "room {i} unreachable");
    }
    let walkable = level
        .grid()
        .tiles()
        .iter()
        .filter(|t| t.is_walkable())
        .count();
    assert_eq!(fill.reached_count(), walkable);
}

fn assert_no_overlap(level: &Level) {
    let rooms = level.rooms();
    for (i, a) in rooms.iter().enumerate() {
        for b in &rooms[i + 1..] {
            // Walls included
            assert!(!a.overlaps(b, 1), "{a:?} and {b:?} overlap");
        }
    }
}

#[test]
fn test_small_grid_scenario() {
    let level = generate(42, &small_params()).unwrap();
    assert!(level.rooms().len() >= 4);
    assert_connected(&level);
    assert_no_overlap(&level);

    // The exit should be a long walk from the entry, measured against
    // bounds that do not depend on where the exit went
    let fill = DistanceMap::from_start(level.grid(), level.entry()).unwrap();
    let exit = fill.get(level.exit().0, level.exit().1).unwrap();
    let (_, farthest) = fill.farthest().unwrap();
    assert!(exit * 2 >= farthest, "exit {exit} vs farthest cell {farthest}");
    let diameter = (level.width() + level.height() - 2) as u32;
    assert!(exit * 2 >= diameter, "exit {exit} vs grid diameter {diameter}");
}

#[test]
fn test_same_seed_same_level() {
    let a = generate(1337, &GenerationParams::default()).unwrap();
    let b = generate(1337, &GenerationParams::default()).unwrap();
    assert_eq!(a.grid(), b.grid());
    assert_eq!(a.rooms(), b.rooms());
    assert_eq!(a.corridors(), b.corridors());
    assert_eq!(a.grid().to_string(), b.grid().to_string());
}

#[test]
fn test_different_seeds_differ() {
    let a = generate(1, &GenerationParams::default()).unwrap();
    let b = generate(2, &GenerationParams::default()).unwrap();
    assert_ne!(a.grid(), b.grid());
}

#[test]
fn test_default_level_shape() {
    let level = generate(7, &GenerationParams::default()).unwrap();
    assert_eq!((level.width(), level.height()), (80, 50));
    assert!(level.rooms().len() >= 4 && level.rooms().len() <= 15);
    assert_eq!(level.grid().count_kind(TileKind::StairsUp), 1);
    assert_eq!(level.grid().count_kind(TileKind::StairsDown), 1);
    assert_eq!(level.exploration().count_known(), 0);

    // Border is never carved
    for x in 0..80 {
        assert_eq!(level.tile(x, 0).unwrap().kind, TileKind::Wall);
        assert_eq!(level.tile(x, 49).unwrap().kind, TileKind::Wall);
    }
}

#[test]
fn test_no_doors_when_disabled() {
    let level = generate(7, &GenerationParams::default().with_doors(false)).unwrap();
    assert_eq!(level.grid().count_kind(TileKind::Door), 0);
    assert_connected(&level);
}

#[test]
fn test_impossible_params() {
    let params = GenerationParams::new(20, 15)
        .with_room_count(10, 12)
        .with_room_size((5, 5), (6, 6));
    let err = generate(42, &params).unwrap_err();
    assert!(matches!(err, EngineError::InvalidParams { .. }));
    assert!(err.to_string().starts_with("invalid generation parameters"));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_levels_connected(seed: u64) {
        let level = generate(seed, &small_params()).unwrap();
        prop_assert!(level.rooms().len() >= 4);
        assert_connected(&level);
    }

    #[test]
    fn prop_rooms_never_overlap(seed: u64, width in 30usize..90, height in 20usize..60) {
        let params = GenerationParams::new(width, height).with_room_count(2, 12);
        let level = generate(seed, &params).unwrap();
        assert_no_overlap(&level);
        assert_connected(&level);
    }

    #[test]
    fn prop_generation_deterministic(seed: u64) {
        let a = generate(seed, &small_params()).unwrap();
        let b = generate(seed, &small_params()).unwrap();
        prop_assert_eq!(a.grid(), b.grid());
        prop_assert_eq!(a.entry(), b.entry());
        prop_assert_eq!(a.exit(), b.exit());
    }

    #[test]
    fn prop_out_of_bounds_rejected(seed in 0u64..16, x in -50i32..50, y in -50i32..50) {
        let level = generate(seed, &small_params()).unwrap();
        let inside = (0..20).contains(&x) && (0..15).contains(&y);
        prop_assert_eq!(level.is_walkable(x, y).is_ok(), inside);
        prop_assert_eq!(level.is_opaque(x, y).is_ok(), inside);
        if !inside {
            let is_oob = matches!(level.is_walkable(x, y), Err(EngineError::OutOfBounds { .. }));
            prop_assert!(is_oob);
        }
    }
}
