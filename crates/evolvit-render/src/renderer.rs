//! Frame rendering.

use crate::cache::SpriteCache;
use crate::layout::LayoutError;
use crate::surface::Surface;
use crate::transform::{CreaturePose, Placement};
use evolvit_core::{Color, Creature, Error, RenderConfig, Result, Snapshot};
use tracing::{instrument, trace, warn};

/// Counts for one rendered frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub food_drawn: usize,
    pub creatures_drawn: usize,
    pub creatures_skipped: usize,
    pub organs_drawn: usize,
}

/// Draws snapshots onto a [`Surface`]
pub struct FrameRenderer {
    config: RenderConfig,
    cache: SpriteCache,
}

impl FrameRenderer {
    pub fn new(config: RenderConfig) -> Self {
        Self {
            config,
            cache: SpriteCache::new(),
        }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn cache(&self) -> &SpriteCache {
        &self.cache
    }

    /// Clear the surface and draw food, then creatures, then the summary.
    ///
    /// Creatures that cannot be drawn (unknown sprite, layout without a
    /// single body organ) are skipped without touching the surface.
    #[instrument(skip_all, fields(creatures = snapshot.creatures.len(), food = snapshot.food.len()))]
    pub fn render_frame<S: Surface + ?Sized>(&mut self, snapshot: &Snapshot, surface: &mut S) -> FrameStats {
        let mut stats = FrameStats::default();

        surface.clear(self.config.width, self.config.height);

        surface.set_fill(Color::GREEN);
        for food in &snapshot.food {
            surface.fill_circle(food.position, self.config.food_radius);
            stats.food_drawn += 1;
        }

        self.cache.retain_table(&snapshot.sprites);

        for creature in &snapshot.creatures {
            match self.draw_creature(snapshot, creature, surface) {
                Ok(organs) => {
                    stats.creatures_drawn += 1;
                    stats.organs_drawn += organs;
                }
                Err(e) if e.is_per_creature() => {
                    trace!(creature = %creature.label(), "Skipping creature: {}", e);
                    stats.creatures_skipped += 1;
                }
                Err(e) => {
                    warn!(creature = %creature.label(), "Failed to draw creature: {}", e);
                    stats.creatures_skipped += 1;
                }
            }
        }

        surface.set_summary(&snapshot.summary());

        stats
    }

    /// Draw one creature, returning the number of organs painted
    fn draw_creature<S: Surface + ?Sized>(
        &mut self,
        snapshot: &Snapshot,
        creature: &Creature,
        surface: &mut S,
    ) -> Result<usize> {
        let sprite_id = creature.sprite_id;
        let raw = snapshot
            .sprite(sprite_id)
            .ok_or(Error::MissingSprite(sprite_id))?;

        let layout = self.cache.resolve(sprite_id, raw).map_err(|e| match e {
            LayoutError::MissingBodyOrgan => Error::MissingBodyOrgan(sprite_id),
            other => Error::Layout(format!("sprite {}: {}", sprite_id, other)),
        })?;

        let placement = Placement::new(layout, &CreaturePose::of(creature));

        surface.save();
        surface.set_stroke(Color::CONNECTOR);
        surface.set_line_width(self.config.line_width);

        for (organ, position) in &placement.appendages {
            surface.line(placement.anchor, *position);
            surface.set_fill(organ.kind.color());
            surface.fill_circle(*position, organ.size * self.config.organ_scale);
        }

        surface.set_fill(Color::BODY);
        surface.fill_circle(placement.anchor, self.config.body_radius);
        surface.restore();

        Ok(placement.appendages.len() + 1)
    }
}
