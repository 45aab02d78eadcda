//! Default constructors for every entity kind

use crate::behavior::{PredatorBehavior, PreyBehavior};
use crate::foundation::math::{Color, Vec3};
use crate::scene::{Capabilities, ColorStates, Entity, EntityKind, Visual};

use super::{EntityConfig, SpawnContext};

/// Static look of a kind
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KindProfile {
    /// Visual name shown in info popups
    pub name: &'static str,

    /// Height above the ground when placed randomly
    pub height: f32,

    /// Picking and contact radius; `None` is not pickable
    pub radius: Option<f32>,

    /// Resting color
    pub color: Color,

    /// Color while selected; `None` when not selectable
    pub selected: Option<Color>,
}

impl KindProfile {
    /// Profile of `kind`
    pub fn of(kind: EntityKind) -> Self {
        match kind {
            EntityKind::Tree => Self {
                name: "tree",
                height: 1.5,
                radius: Some(8.0),
                color: Color::from_rgb(0x00ff_7127),
                selected: Some(ColorStates::SELECTED),
            },
            EntityKind::Bush => Self {
                name: "bush",
                height: 1.5,
                radius: Some(4.0),
                color: Color::from_rgb(0x0066_9900),
                selected: Some(ColorStates::SELECTED),
            },
            EntityKind::Grass => Self {
                name: "grass",
                height: 0.5,
                radius: Some(1.5),
                color: Color::from_rgb(0x0000_c060),
                selected: Some(Color::BLACK),
            },
            EntityKind::Hare => Self {
                name: "hare",
                height: 2.0,
                radius: Some(6.0),
                color: Color::from_rgb(0x00db_7093),
                selected: Some(ColorStates::SELECTED),
            },
            EntityKind::Hawk => Self {
                name: "hawk",
                height: 30.0,
                radius: Some(4.0),
                color: Color::from_rgb(0x00cc_0000),
                selected: Some(ColorStates::SELECTED),
            },
            EntityKind::Terrain => Self {
                name: "ground",
                height: 0.0,
                radius: None,
                color: Color::from_rgb(0x0099_6600),
                selected: None,
            },
            EntityKind::Light => Self {
                name: "light",
                height: 50.0,
                radius: None,
                color: Color::WHITE,
                selected: None,
            },
        }
    }
}

/// Build an entity of `kind` with its default look and behavior
pub(super) fn build(kind: EntityKind, config: &EntityConfig, ctx: &mut SpawnContext<'_>) -> Entity {
    let profile = KindProfile::of(kind);
    let position = config.position.unwrap_or_else(|| {
        let height = match kind {
            EntityKind::Hawk => ctx.config.predator.altitude,
            _ => profile.height,
        };
        match kind {
            // Scenery sits at the center of the ground
            EntityKind::Terrain | EntityKind::Light => Vec3::new(0.0, height, 0.0),
            _ => ctx.randomizer.random_position(&ctx.config.ground, height),
        }
    });
    let color = config.color.unwrap_or(profile.color);

    let mut visual = Visual::new(profile.name).with_position(position).with_color(color);
    if let Some(radius) = profile.radius {
        visual = visual.with_bounds(radius);
    }
    if kind == EntityKind::Terrain {
        visual.transform.scale = Vec3::new(ctx.config.ground.width, 1.0, ctx.config.ground.depth);
    }

    let mut entity = Entity::new(kind, visual, ctx.created_at);
    if let Some(selected) = profile.selected {
        entity = entity.with_colors(ColorStates::with_original(color).with_selected(selected));
    }

    match kind {
        EntityKind::Hare => {
            let behavior = PreyBehavior::new(position, ctx.config.prey, ctx.proximity, ctx.spatial);
            entity.with_behavior(
                Box::new(behavior),
                Capabilities::UPDATABLE | Capabilities::COLLIDABLE,
            )
        }
        EntityKind::Hawk => {
            let behavior = PredatorBehavior::new(position, &ctx.config.predator);
            entity.with_behavior(Box::new(behavior), Capabilities::UPDATABLE)
        }
        _ => entity,
    }
}
