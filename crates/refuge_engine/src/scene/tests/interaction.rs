//! Pointer picking, selection colors and describe events

use std::cell::RefCell;
use std::rc::Rc;

use super::{registry, spawn_at};
use crate::events::{EventType, SceneEvent};
use crate::foundation::math::Vec3;
use crate::physics::Ray;
use crate::scene::{ColorStates, EntityId, EntityKind, SceneRegistry};

fn down_at(x: f32, z: f32) -> Ray {
    Ray::new(Vec3::new(x, 100.0, z), Vec3::new(0.0, -1.0, 0.0)).unwrap()
}

fn color_of(registry: &SceneRegistry, id: EntityId) -> crate::foundation::math::Color {
    registry.get(id).unwrap().visual.color
}

#[test]
fn test_hit_test_on_empty_scene() {
    let registry = registry();
    assert!(registry.hit_test(&down_at(0.0, 0.0)).is_none());
}

#[test]
fn test_hit_test_picks_nearest() {
    let mut registry = registry();
    let low = spawn_at(&mut registry, EntityKind::Bush, 0.0, 0.0, 0.0);
    let high = spawn_at(&mut registry, EntityKind::Hawk, 0.0, 30.0, 0.0);

    let hit = registry.hit_test(&down_at(0.0, 0.0)).unwrap();
    assert_eq!(hit.entity, high);
    assert_eq!(registry.hit_test_all(&down_at(0.0, 0.0)).len(), 2);
    assert_eq!(registry.hit_test_all(&down_at(0.0, 0.0))[1].entity, low);
}

#[test]
fn test_scenery_is_not_pickable() {
    let mut registry = registry();
    registry.populate_scenery().ok();
    registry.remove_all_of_kind(EntityKind::Grass);

    assert!(registry.hit_test(&down_at(0.0, 0.0)).is_none());
}

#[test]
fn test_toggle_twice_restores_color() {
    let mut registry = registry();
    let tree = spawn_at(&mut registry, EntityKind::Tree, 0.0, 0.0, 0.0);
    let original = color_of(&registry, tree);

    assert_eq!(registry.toggle_selected(tree), Some(true));
    assert_eq!(color_of(&registry, tree), ColorStates::SELECTED);

    assert_eq!(registry.toggle_selected(tree), Some(false));
    assert_eq!(color_of(&registry, tree), original);
}

#[test]
fn test_toggle_non_selectable_is_ignored() {
    let mut registry = registry();
    let ground = spawn_at(&mut registry, EntityKind::Terrain, 0.0, 0.0, 0.0);

    assert_eq!(registry.toggle_selected(ground), None);
    assert!(registry.selection().is_empty());
}

#[test]
fn test_grass_selects_black() {
    let mut registry = registry();
    let grass = spawn_at(&mut registry, EntityKind::Grass, 0.0, 0.5, 0.0);

    registry.toggle_selected(grass);
    assert_eq!(color_of(&registry, grass), crate::foundation::math::Color::BLACK);
}

#[test]
fn test_hover_highlights_and_restores() {
    let mut registry = registry();
    let bush = spawn_at(&mut registry, EntityKind::Bush, 0.0, 0.0, 0.0);
    let original = color_of(&registry, bush);

    assert_eq!(registry.handle_hover(&down_at(0.0, 0.0)), Some(bush));
    assert_eq!(color_of(&registry, bush), ColorStates::HOVER);

    // Pointer moves off into empty ground
    assert_eq!(registry.handle_hover(&down_at(40.0, 40.0)), None);
    assert_eq!(color_of(&registry, bush), original);
}

#[test]
fn test_hover_exit_keeps_selection_color() {
    let mut registry = registry();
    let bush = spawn_at(&mut registry, EntityKind::Bush, 0.0, 0.0, 0.0);
    let other = spawn_at(&mut registry, EntityKind::Bush, 30.0, 0.0, 30.0);

    registry.toggle_selected(bush);
    registry.handle_hover(&down_at(0.0, 0.0));
    assert_eq!(color_of(&registry, bush), ColorStates::HOVER);

    registry.handle_hover(&down_at(30.0, 30.0));

    assert_eq!(color_of(&registry, bush), ColorStates::SELECTED);
    assert_eq!(color_of(&registry, other), ColorStates::HOVER);
}

#[test]
fn test_click_selects_and_describes() {
    let mut registry = registry();
    let hare = spawn_at(&mut registry, EntityKind::Hare, 0.0, 2.0, 0.0);

    let described = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&described);
    registry.events_mut().register_handler(
        EventType::Describe,
        Box::new(move |event: &SceneEvent| {
            if let SceneEvent::Describe { name, .. } = event {
                sink.borrow_mut().push(name.clone());
            }
            true
        }),
    );

    let hit = registry.handle_click(&down_at(0.0, 0.0)).unwrap();

    assert_eq!(hit.entity, hare);
    assert!(registry.selection().contains(hare));
    assert_eq!(described.borrow().as_slice(), ["hare".to_string()]);
}

#[test]
fn test_click_through_several_describes_all() {
    let mut registry = registry();
    spawn_at(&mut registry, EntityKind::Hawk, 0.0, 30.0, 0.0);
    spawn_at(&mut registry, EntityKind::Tree, 0.0, 1.5, 0.0);

    let names = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&names);
    registry.events_mut().register_handler(
        EventType::DescribeMany,
        Box::new(move |event: &SceneEvent| {
            if let SceneEvent::DescribeMany { names } = event {
                sink.borrow_mut().extend(names.iter().cloned());
            }
            true
        }),
    );

    registry.handle_click(&down_at(0.0, 0.0));
    assert_eq!(names.borrow().as_slice(), ["hawk".to_string(), "tree".to_string()]);
}

#[test]
fn test_remove_selected() {
    let mut registry = registry();
    let a = spawn_at(&mut registry, EntityKind::Tree, 0.0, 0.0, 0.0);
    let b = spawn_at(&mut registry, EntityKind::Bush, 30.0, 0.0, 30.0);
    let keep = spawn_at(&mut registry, EntityKind::Bush, -30.0, 0.0, -30.0);
    registry.toggle_selected(a);
    registry.toggle_selected(b);

    assert_eq!(registry.remove_selected(), 2);
    assert!(registry.selection().is_empty());
    assert!(registry.contains(keep));
    assert_eq!(registry.len(), 1);
}
