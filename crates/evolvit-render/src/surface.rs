//! Drawing surface abstraction.
//!
//! The renderer only issues the immediate-mode primitives of [`Surface`].
//! [`DisplayList`] is an in-memory surface that records them; terminal and
//! headless outputs paint from it.

use evolvit_core::{Color, Point};

/// 2D immediate-mode drawing target
pub trait Surface {
    /// Clear the region `(0, 0)..(width, height)` and start a new frame
    fn clear(&mut self, width: f64, height: f64);
    fn set_fill(&mut self, color: Color);
    fn set_stroke(&mut self, color: Color);
    fn set_line_width(&mut self, width: f64);
    /// Filled circle in the current fill color
    fn fill_circle(&mut self, center: Point, radius: f64);
    /// Line segment in the current stroke color and width
    fn line(&mut self, from: Point, to: Point);
    /// Push the current style state
    fn save(&mut self);
    /// Pop the style state pushed by the matching `save`
    fn restore(&mut self);
    /// Replace the textual summary shown alongside the frame
    fn set_summary(&mut self, text: &str);
}

/// A recorded surface call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear { width: f64, height: f64 },
    SetFill(Color),
    SetStroke(Color),
    SetLineWidth(f64),
    FillCircle { center: Point, radius: f64 },
    Line { from: Point, to: Point },
    Save,
    Restore,
    SetSummary(String),
}

impl DrawCommand {
    /// Whether this command puts pixels on the surface
    pub fn is_paint(&self) -> bool {
        matches!(self, DrawCommand::FillCircle { .. } | DrawCommand::Line { .. })
    }
}

/// A fully styled primitive, ready to paint
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Circle {
        center: Point,
        radius: f64,
        color: Color,
    },
    Line {
        from: Point,
        to: Point,
        color: Color,
        width: f64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Style {
    fill: Color,
    stroke: Color,
    line_width: f64,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            fill: Color::BACKGROUND,
            stroke: Color::BACKGROUND,
            line_width: 1.0,
        }
    }
}

/// In-memory [`Surface`] recording the commands and shapes of the current frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplayList {
    width: f64,
    height: f64,
    commands: Vec<DrawCommand>,
    shapes: Vec<Shape>,
    summary: String,
    style: Style,
    stack: Vec<Style>,
}

impl DisplayList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every surface call since the last clear, in order
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Painted primitives since the last clear, in paint order
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    /// Size of the last cleared region
    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    pub fn paint_count(&self) -> usize {
        self.commands.iter().filter(|c| c.is_paint()).count()
    }

    /// Depth of unmatched `save` calls
    pub fn save_depth(&self) -> usize {
        self.stack.len()
    }
}

impl Surface for DisplayList {
    fn clear(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
        self.commands.clear();
        self.shapes.clear();
        self.commands.push(DrawCommand::Clear { width, height });
    }

    fn set_fill(&mut self, color: Color) {
        self.style.fill = color;
        self.commands.push(DrawCommand::SetFill(color));
    }

    fn set_stroke(&mut self, color: Color) {
        self.style.stroke = color;
        self.commands.push(DrawCommand::SetStroke(color));
    }

    fn set_line_width(&mut self, width: f64) {
        self.style.line_width = width;
        self.commands.push(DrawCommand::SetLineWidth(width));
    }

    fn fill_circle(&mut self, center: Point, radius: f64) {
        self.commands.push(DrawCommand::FillCircle { center, radius });
        self.shapes.push(Shape::Circle {
            center,
            radius,
            color: self.style.fill,
        });
    }

    fn line(&mut self, from: Point, to: Point) {
        self.commands.push(DrawCommand::Line { from, to });
        self.shapes.push(Shape::Line {
            from,
            to,
            color: self.style.stroke,
            width: self.style.line_width,
        });
    }

    fn save(&mut self) {
        self.stack.push(self.style);
        self.commands.push(DrawCommand::Save);
    }

    fn restore(&mut self) {
        // Unbalanced restore is a no-op, as on an HTML canvas
        if let Some(style) = self.stack.pop() {
            self.style = style;
        }
        self.commands.push(DrawCommand::Restore);
    }

    fn set_summary(&mut self, text: &str) {
        self.summary = text.to_string();
        self.commands.push(DrawCommand::SetSummary(text.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shapes_capture_current_style() {
        let mut list = DisplayList::new();
        list.clear(100.0, 50.0);
        list.set_fill(Color::RED);
        list.fill_circle(Point::new(1.0, 2.0), 3.0);
        list.set_stroke(Color::CONNECTOR);
        list.set_line_width(2.0);
        list.line(Point::ORIGIN, Point::new(4.0, 4.0));

        assert_eq!(list.size(), (100.0, 50.0));
        assert_eq!(list.paint_count(), 2);
        assert_eq!(
            list.shapes(),
            &[
                Shape::Circle {
                    center: Point::new(1.0, 2.0),
                    radius: 3.0,
                    color: Color::RED
                },
                Shape::Line {
                    from: Point::ORIGIN,
                    to: Point::new(4.0, 4.0),
                    color: Color::CONNECTOR,
                    width: 2.0
                },
            ]
        );
    }

    #[test]
    fn test_save_restore_style() {
        let mut list = DisplayList::new();
        list.set_fill(Color::GREEN);
        list.save();
        list.set_fill(Color::RED);
        list.restore();
        list.fill_circle(Point::ORIGIN, 1.0);

        assert_eq!(list.save_depth(), 0);
        assert!(matches!(
            list.shapes()[0],
            Shape::Circle { color: Color::GREEN, .. }
        ));

        // Unbalanced restore keeps the current style
        list.restore();
        list.fill_circle(Point::ORIGIN, 1.0);
        assert!(matches!(
            list.shapes()[1],
            Shape::Circle { color: Color::GREEN, .. }
        ));
    }

    #[test]
    fn test_clear_starts_new_frame() {
        let mut list = DisplayList::new();
        list.fill_circle(Point::ORIGIN, 1.0);
        list.set_summary("Creatures: 0 | Food: 0");
        list.clear(10.0, 10.0);

        assert_eq!(list.commands(), &[DrawCommand::Clear { width: 10.0, height: 10.0 }]);
        assert!(list.shapes().is_empty());
        // The summary stays until replaced
        assert_eq!(list.summary(), "Creatures: 0 | Food: 0");
    }
}
