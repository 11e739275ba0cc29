//! Sprite space to world space transforms.

use crate::layout::SpriteLayout;
use evolvit_core::{Creature, Heading, Organ, Point};

/// World position and resolved heading of one creature for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CreaturePose {
    pub position: Point,
    pub heading: Heading,
}

impl CreaturePose {
    pub fn new(position: Point, heading: Heading) -> Self {
        Self { position, heading }
    }

    /// Resolves the creature's heading trig once
    pub fn of(creature: &Creature) -> Self {
        Self::new(creature.position, creature.heading())
    }

    /// World position of an organ: rotate its offset, then translate
    pub fn place(&self, organ: &Organ) -> Point {
        self.position.add(self.heading.rotate(organ.offset))
    }
}

/// World position of `organ` for a creature at `position` facing `heading`
pub fn transform_organ(organ: &Organ, position: Point, heading: Heading) -> Point {
    CreaturePose::new(position, heading).place(organ)
}

/// A layout placed in the world: the body anchor and every other organ
#[derive(Debug, Clone, PartialEq)]
pub struct Placement<'a> {
    pub anchor: Point,
    pub appendages: Vec<(&'a Organ, Point)>,
}

impl<'a> Placement<'a> {
    pub fn new(layout: &'a SpriteLayout, pose: &CreaturePose) -> Self {
        Self {
            anchor: pose.place(layout.body()),
            appendages: layout
                .appendages()
                .map(|organ| (organ, pose.place(organ)))
                .collect(),
        }
    }
}
