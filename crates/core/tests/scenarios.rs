use std::collections::BTreeSet;

use delve_core::{
    BinaryPartitionFractor, EntityKind, Fractor, GenerationError, GenerationOptions, MapGenerator,
    PerlinFractor, Point, Size,
};

const STANDARD: Size = Size::new(80, 24);

#[test]
fn partitioned_map_places_anchors_on_distinct_floor() {
    for seed in 0..25 {
        let fractor = BinaryPartitionFractor::new(Size::new(10, 10));
        let mut generator = MapGenerator::new(STANDARD, fractor, seed);
        generator.populate().expect("rooms fit their leaves");

        let walls = generator
            .canvas()
            .bounds()
            .iter_points()
            .filter(|&point| generator.canvas().terrain(point).is_some_and(|d| d.kind().is_wall()))
            .count();
        assert!(walls >= 28, "seed {seed}: expected at least one framed room");

        let floor_before: BTreeSet<Point> = generator.canvas().floor_points().collect();
        let anchors = generator.place_player().expect("rooms contain floor");
        let chosen = [anchors.player, anchors.companion, anchors.item];
        assert_eq!(chosen.iter().collect::<BTreeSet<_>>().len(), 3, "seed {seed}");
        for point in chosen {
            assert!(floor_before.contains(&point), "seed {seed}: {point} was not floor");
        }

        let map = generator.finish().expect("finalizes");
        let player = map.player().expect("player placed");
        assert_eq!(map.find(player), Some(anchors.player));
        let companion = map.creature_at(anchors.companion).map(|e| e.kind());
        assert_eq!(companion, Some(EntityKind::Salamango));
        let items: Vec<EntityKind> = map.items_at(anchors.item).map(|e| e.kind()).collect();
        assert_eq!(items, vec![EntityKind::Armor]);
        assert_eq!(map.find_kind(EntityKind::Player).len(), 1);
        assert_eq!(map.find_kind(EntityKind::Salamango).len(), 1);
        assert_eq!(map.find_kind(EntityKind::Armor).len(), 1);
    }
}

#[test]
fn noise_map_uses_only_walkable_terrain() {
    let walkable = [
        EntityKind::Floor,
        EntityKind::Dirt,
        EntityKind::CutGrass,
        EntityKind::Grass,
        EntityKind::Tree,
    ];
    for seed in 0..10 {
        let mut generator = MapGenerator::new(STANDARD, PerlinFractor::new(), seed);
        generator.populate().expect("region is the canvas");

        let canvas = generator.canvas();
        let kinds: BTreeSet<EntityKind> = canvas
            .bounds()
            .iter_points()
            .map(|point| canvas.terrain(point).expect("in bounds").kind())
            .collect();
        assert!(kinds.iter().all(|kind| walkable.contains(kind)), "seed {seed}: {kinds:?}");
        assert!(kinds.contains(&EntityKind::Floor), "seed {seed}: field never reaches floor");
        assert!(kinds.len() > 1, "seed {seed}: terrain should vary");
    }
}

#[test]
fn down_portal_overwrites_one_floor_point() {
    let mut generator = MapGenerator::new(STANDARD, PerlinFractor::new(), 77);
    generator.populate().expect("region is the canvas");
    let floor_before: BTreeSet<Point> = generator.canvas().floor_points().collect();

    let point = generator.place_portal(EntityKind::StairsDown, "map1").expect("floor exists");
    assert!(floor_before.contains(&point));
    let floor_after: BTreeSet<Point> = generator.canvas().floor_points().collect();
    assert_eq!(floor_before.difference(&floor_after).copied().collect::<Vec<_>>(), vec![point]);

    let map = generator.finish().expect("finalizes");
    let portals = map.portals();
    assert_eq!(portals.len(), 1);
    assert_eq!(portals[0].0, point);
    assert_eq!(portals[0].1.kind(), EntityKind::StairsDown);
    assert_eq!(portals[0].1.destination(), Some("map1"));
}

#[test]
fn full_run_places_player_and_both_portals() {
    let options = GenerationOptions::default().with_player().with_up("map0").with_down("map2");
    let fractor = BinaryPartitionFractor::new(Size::new(10, 10));
    let map = MapGenerator::new(STANDARD, fractor, 3).run(&options).expect("generates");

    assert!(map.player().is_some());
    let mut destinations: Vec<(EntityKind, Option<&str>)> = map
        .portals()
        .into_iter()
        .map(|(_, portal)| (portal.kind(), portal.destination()))
        .collect();
    destinations.sort_by_key(|(kind, _)| kind.code());
    assert_eq!(
        destinations,
        vec![(EntityKind::StairsUp, Some("map0")), (EntityKind::StairsDown, Some("map2"))]
    );
    for point in map.bounds().iter_points() {
        assert!(map.architecture_at(point).is_some(), "{point} has no architecture");
    }
}

#[test]
fn boxed_strategies_drive_the_same_generator() {
    let strategies: Vec<Box<dyn Fractor>> = vec![
        Box::new(PerlinFractor::new()),
        Box::new(BinaryPartitionFractor::new(Size::new(10, 10))),
    ];
    for fractor in strategies {
        let map = MapGenerator::new(STANDARD, fractor, 12)
            .run(&GenerationOptions::default().with_player())
            .expect("generates");
        assert_eq!(map.size(), STANDARD);
        assert!(map.player().is_some());
    }
}

#[test]
fn partition_with_oversized_rooms_aborts_the_run() {
    let fractor = BinaryPartitionFractor::new(Size::new(5, 5)).with_room_size(Size::new(12, 12));
    let err = MapGenerator::new(Size::new(20, 10), fractor, 0)
        .run(&GenerationOptions::default())
        .expect_err("rooms cannot fit");
    assert!(matches!(err, GenerationError::BoundsViolation { .. }));
}
