use log::debug;
use image::RgbImage;
use crate::core::film::Film;
use crate::core::renderer::Renderer;
use crate::core::geometry::point::Point2i;

pub const DEFAULT_WINDOW_SIZE: usize = 300;

/// Owns the frame buffer and the renderers drawing into it.
#[derive(Debug, Clone)]
pub struct RenderWindow {
    size        : (usize, usize),
    renderers   : Vec<Renderer>,
    film        : Film
}

impl Default for RenderWindow {
    fn default() -> Self {
        let size = (DEFAULT_WINDOW_SIZE, DEFAULT_WINDOW_SIZE);

        Self {
            size,
            renderers: Vec::new(),
            film: Film::new(&Point2i::new(size.0 as isize, size.1 as isize))
        }
    }
}

impl RenderWindow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn size(&self) -> (usize, usize) { self.size }

    pub fn set_size(&mut self, width: usize, height: usize) {
        let size = (width.max(1), height.max(1));

        if size != self.size {
            self.size = size;
            self.film = Film::new(&Point2i::new(size.0 as isize, size.1 as isize));
        }
    }

    pub fn add_renderer(&mut self, renderer: Renderer) {
        self.renderers.push(renderer);
    }

    pub fn renderers(&self) -> &[Renderer] { &self.renderers }

    pub fn renderers_mut(&mut self) -> &mut [Renderer] { &mut self.renderers }

    /// Draw every renderer into its viewport, in insertion order.
    pub fn render(&mut self) {
        debug!("Rendering window {} X {} with {} renderers",
               self.size.0, self.size.1, self.renderers.len());

        let background = self.renderers
            .first()
            .map(|r| r.background)
            .unwrap_or_default();
        self.film.clear(&background);

        for r in self.renderers.iter_mut() {
            r.render(&mut self.film);
        }
    }

    pub fn film(&self) -> &Film { &self.film }

    /// Current contents of the frame buffer as 8-bit RGB.
    pub fn capture(&self) -> RgbImage {
        self.film.to_rgb8()
    }
}
