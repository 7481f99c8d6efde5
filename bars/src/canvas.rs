use sfml::graphics::{self, RenderTarget, Shape, Transformable};
use vis_core::display::{Canvas, Color, Rect};

fn sfml_color(c: Color) -> graphics::Color {
    graphics::Color::rgb(c.r, c.g, c.b)
}

/// An SFML window
pub struct SfmlCanvas {
    window: graphics::RenderWindow,
    rectangle: graphics::RectangleShape<'static>,
    circle: graphics::CircleShape<'static>,
}

impl SfmlCanvas {
    pub fn new(width: u32, height: u32) -> SfmlCanvas {
        let context_settings = sfml::window::ContextSettings {
            antialiasing_level: 4,
            ..Default::default()
        };

        let mut window = graphics::RenderWindow::new(
            (width, height),
            "Visualizer",
            sfml::window::Style::CLOSE,
            &context_settings,
        );
        window.set_vertical_sync_enabled(true);
        window.clear(graphics::Color::BLACK);
        window.display();

        SfmlCanvas {
            window,
            rectangle: graphics::RectangleShape::new(),
            circle: graphics::CircleShape::new(1.0, 64),
        }
    }
}

impl Canvas for SfmlCanvas {
    fn poll_close(&mut self) -> bool {
        use sfml::window::{Event, Key};

        let mut close = false;
        while let Some(event) = self.window.poll_event() {
            match event {
                Event::Closed => close = true,
                Event::KeyPressed {
                    code: Key::Escape, ..
                } => close = true,
                _ => (),
            }
        }

        if close {
            self.window.close();
        }
        close
    }

    fn clear(&mut self, color: Color) {
        self.window.clear(sfml_color(color));
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.rectangle.set_size((rect.width, rect.height));
        self.rectangle.set_position((rect.x, rect.y));
        self.rectangle.set_fill_color(sfml_color(color));
        self.window.draw(&self.rectangle);
    }

    fn fill_circle(&mut self, center: [f32; 2], radius: f32, color: Color) {
        self.circle.set_radius(radius);
        self.circle.set_origin((radius, radius));
        self.circle.set_position((center[0], center[1]));
        self.circle.set_fill_color(sfml_color(color));
        self.window.draw(&self.circle);
    }

    fn present(&mut self) {
        self.window.display();
    }
}
