//! Scene entities and their static description
//!
//! An [`Entity`] is a visual, a kind, a capability set and an optional
//! behavior. Capabilities are declared when the entity is built; the
//! registry never queries a behavior to find out what it can do.

use std::fmt;
use std::str::FromStr;

use bitflags::bitflags;
use slotmap::new_key_type;

use crate::behavior::Behavior;
use crate::foundation::math::Color;
use crate::scene::visual::Visual;

new_key_type! {
    /// Generational handle to a live entity
    pub struct EntityId;
}

/// Kind tag used for behavior selection and population reconciliation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKind {
    /// Refuge for fleeing hares
    Tree,
    /// Decorative shrub
    Bush,
    /// Food for hares
    Grass,
    /// Prey
    Hare,
    /// Predator
    Hawk,
    /// Ground plane
    Terrain,
    /// Scene lighting
    Light,
}

impl EntityKind {
    /// Every kind, in declaration order
    pub const ALL: [Self; 7] = [
        Self::Tree,
        Self::Bush,
        Self::Grass,
        Self::Hare,
        Self::Hawk,
        Self::Terrain,
        Self::Light,
    ];

    /// Lowercase tag
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tree => "tree",
            Self::Bush => "bush",
            Self::Grass => "grass",
            Self::Hare => "hare",
            Self::Hawk => "hawk",
            Self::Terrain => "terrain",
            Self::Light => "light",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tag that names no known kind
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown entity kind '{0}'")]
pub struct UnknownKindError(pub String);

impl FromStr for EntityKind {
    type Err = UnknownKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(tag))
            .ok_or_else(|| UnknownKindError(s.to_string()))
    }
}

bitflags! {
    /// What the registry may ask of an entity
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Capabilities: u8 {
        /// Receives `update` every tick
        const UPDATABLE = 1;
        /// Receives `handle_collision` when its bounds overlap others
        const COLLIDABLE = 1 << 1;
        /// Can be hovered and selected with the pointer
        const SELECTABLE = 1 << 2;
    }
}

/// Display colors of a selectable entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorStates {
    /// Resting color
    pub original: Color,

    /// Shown while hovered
    pub highlight: Color,

    /// Shown while selected
    pub selected: Color,
}

impl ColorStates {
    /// Highlight applied to hovered entities
    pub const HOVER: Color = Color::from_rgb(0x00f7_ff6d);

    /// Default selection color
    pub const SELECTED: Color = Color::from_rgb(0x0080_8080);

    /// Colors with the shared hover and selection defaults
    pub fn with_original(original: Color) -> Self {
        Self {
            original,
            highlight: Self::HOVER,
            selected: Self::SELECTED,
        }
    }

    /// Builder: selection color
    pub fn with_selected(mut self, selected: Color) -> Self {
        self.selected = selected;
        self
    }

    /// Color to display for the given interaction state
    ///
    /// Hover wins over selection; leaving hover lands on the selected
    /// color for selected entities and the original otherwise.
    pub fn resolve(&self, selected: bool, hovered: bool) -> Color {
        if hovered {
            self.highlight
        } else if selected {
            self.selected
        } else {
            self.original
        }
    }
}

/// Creation order stamp
///
/// Ordered by simulation time, then by registry sequence number.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Timestamp {
    /// Simulation seconds at creation
    pub elapsed: f32,

    /// Monotonic creation counter
    pub sequence: u64,
}

/// A simulated scene participant
pub struct Entity {
    /// Kind tag
    pub kind: EntityKind,

    /// Renderable state owned by this entity
    pub visual: Visual,

    /// Declared capabilities
    pub capabilities: Capabilities,

    /// Display colors, used when selectable
    pub colors: ColorStates,

    /// When the entity was created
    pub created_at: Timestamp,

    behavior: Option<Box<dyn Behavior>>,
}

impl Entity {
    /// Create an inert entity
    pub fn new(kind: EntityKind, visual: Visual, created_at: Timestamp) -> Self {
        let colors = ColorStates::with_original(visual.color);
        Self {
            kind,
            visual,
            capabilities: Capabilities::empty(),
            colors,
            created_at,
            behavior: None,
        }
    }

    /// Builder: make selectable with the given colors
    pub fn with_colors(mut self, colors: ColorStates) -> Self {
        self.colors = colors;
        self.visual.color = colors.original;
        self.capabilities |= Capabilities::SELECTABLE;
        self
    }

    /// Builder: attach a behavior and declare its capabilities
    pub fn with_behavior(mut self, behavior: Box<dyn Behavior>, capabilities: Capabilities) -> Self {
        self.behavior = Some(behavior);
        self.capabilities |= capabilities;
        self
    }

    /// True when the capability is declared
    pub fn has(&self, capability: Capabilities) -> bool {
        self.capabilities.contains(capability)
    }

    /// Selectable shorthand
    pub fn is_selectable(&self) -> bool {
        self.has(Capabilities::SELECTABLE)
    }

    /// Attached behavior, if any
    pub fn behavior(&self) -> Option<&dyn Behavior> {
        self.behavior.as_deref()
    }

    /// Mutable access to the attached behavior
    pub fn behavior_mut(&mut self) -> Option<&mut (dyn Behavior + 'static)> {
        self.behavior.as_deref_mut()
    }

    /// Downcast the behavior to a concrete type
    pub fn behavior_as<T: Behavior + 'static>(&self) -> Option<&T> {
        self.behavior.as_ref()?.as_any().downcast_ref::<T>()
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("kind", &self.kind)
            .field("name", &self.visual.name)
            .field("position", &self.visual.position())
            .field("capabilities", &self.capabilities)
            .field("created_at", &self.created_at)
            .finish_non_exhaustive()
    }
}
