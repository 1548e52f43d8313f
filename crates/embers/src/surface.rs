//! Turn a canvas of pixels into a surface of terminal cells, and overlay text on it.

use color_eyre::eyre::ContextCompat as _;
use color_eyre::eyre::Result;
use termwiz::surface::Change as TermwizChange;
use termwiz::surface::Position as TermwizPosition;

/// An RGBA colour
pub(crate) type Colour = (f32, f32, f32, f32);

/// A default pure white.
pub const WHITE: Colour = (1.0, 1.0, 1.0, 1.0);

/// A default pure black.
pub const BLACK: Colour = (0.0, 0.0, 0.0, 1.0);

/// The character that gives each terminal cell 2 pixels: the foreground colour is the upper
/// pixel and the background colour is the lower pixel.
const UPPER_HALF_BLOCK: &str = "▀";

/// `Surface`
pub(crate) struct Surface {
    /// The terminal's width
    pub width: usize,
    /// The terminal's height
    pub height: usize,
    /// A surface of terminal cells
    pub surface: termwiz::surface::Surface,
}

impl Surface {
    /// Create an empty surface
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            surface: termwiz::surface::Surface::new(width, height),
        }
    }

    /// Build a surface with one terminal cell for every pair of vertically stacked pixels.
    ///
    /// When the canvas has an odd number of pixel rows, the lower half of the last row of cells
    /// is left as the terminal's default background.
    pub fn from_canvas(canvas: &embers_simulation::canvas::Canvas) -> Result<Self> {
        let (width, pixel_height) = canvas.pixel_dimensions();
        let height = pixel_height.div_ceil(2);
        let mut surface = Self::new(width, height);

        for row in 0..height {
            let upper_y = row * 2;
            let lower_y = upper_y + 1;
            for col in 0..width {
                let upper = canvas
                    .pixel(col, upper_y)
                    .context(format!("No pixel at ({col}, {upper_y})"))?;
                let lower = canvas.pixel(col, lower_y);
                surface.add_cell(
                    col,
                    row,
                    Self::srgb_to_colour(upper),
                    lower.map(Self::srgb_to_colour),
                )?;
            }
        }

        Ok(surface)
    }

    /// Paint a single cell with an upper and, optionally, a lower pixel.
    pub fn add_cell(
        &mut self,
        col: usize,
        row: usize,
        upper: Colour,
        maybe_lower: Option<Colour>,
    ) -> Result<()> {
        if col >= self.width {
            color_eyre::eyre::bail!("Tried to add pixel to column: {col}")
        }
        if row >= self.height {
            color_eyre::eyre::bail!("Tried to add pixel to row: {row}")
        }

        let bg_colour =
            maybe_lower.map_or_else(Self::make_default_bg_colour, Self::make_bg_colour);
        self.surface.add_changes(vec![
            TermwizChange::CursorPosition {
                x: TermwizPosition::Absolute(col),
                y: TermwizPosition::Absolute(row),
            },
            Self::make_fg_colour(upper),
            bg_colour,
        ]);
        self.surface.add_change(UPPER_HALF_BLOCK);

        Ok(())
    }

    /// Overlay text at a given coord with the given colours.
    pub fn add_text(
        &mut self,
        x: usize,
        y: usize,
        text: String,
        maybe_background_colour: Option<Colour>,
        maybe_foreground_colour: Option<Colour>,
    ) {
        let bg_colour = maybe_background_colour
            .map_or_else(Self::make_default_bg_colour, |colour| {
                Self::make_bg_colour(colour)
            });

        let fg_colour = maybe_foreground_colour
            .map_or_else(|| Self::make_fg_colour(WHITE), Self::make_fg_colour);

        self.surface.add_changes(vec![
            TermwizChange::CursorPosition {
                x: TermwizPosition::Absolute(x),
                y: TermwizPosition::Absolute(y),
            },
            bg_colour,
            fg_colour,
        ]);
        self.surface.add_change(text);
    }

    /// Convert a canvas pixel to our colour tuple.
    const fn srgb_to_colour(colour: palette::Srgb) -> Colour {
        (colour.red, colour.green, colour.blue, 1.0)
    }

    /// Make a Termwiz colour attribute
    #[must_use]
    pub const fn make_colour_attribute(colour: Colour) -> termwiz::color::ColorAttribute {
        termwiz::color::ColorAttribute::TrueColorWithDefaultFallback(termwiz::color::SrgbaTuple(
            colour.0, colour.1, colour.2, colour.3,
        ))
    }

    /// Make a Termwiz background colour
    #[must_use]
    pub const fn make_bg_colour(colour: Colour) -> TermwizChange {
        let colour_attribute = Self::make_colour_attribute(colour);
        TermwizChange::Attribute(termwiz::cell::AttributeChange::Background(colour_attribute))
    }

    /// Make the default Termwiz background colour. This is the non-colour, usually black, that a
    /// terminal displays when nothing else has been set.
    #[must_use]
    pub const fn make_default_bg_colour() -> TermwizChange {
        let colour_attribute = termwiz::color::ColorAttribute::Default;
        TermwizChange::Attribute(termwiz::cell::AttributeChange::Background(colour_attribute))
    }

    /// Make a Termwiz foreground colour
    #[must_use]
    pub const fn make_fg_colour(colour: Colour) -> TermwizChange {
        let colour_attribute = Self::make_colour_attribute(colour);
        TermwizChange::Attribute(termwiz::cell::AttributeChange::Foreground(colour_attribute))
    }
}

#[cfg(test)]
#[expect(
    clippy::indexing_slicing,
    clippy::shadow_unrelated,
    reason = "Tests aren't so strict"
)]
mod test {
    use embers_simulation::canvas::Canvas;
    use embers_simulation::colour::Hsla;
    use embers_simulation::draw::{DrawSurface as _, Fill};
    use glam::Vec2;

    use super::*;

    const WHITE_HSLA: Hsla = Hsla::new(0.0, 0.0, 100.0, 100.0);

    #[test]
    fn every_cell_is_a_pair_of_pixels() {
        let mut canvas = Canvas::new(2, 4, 1.0);
        // Only the top row of pixels is white.
        canvas.fill_rect(Vec2::ZERO, Vec2::new(2.0, 1.0), &Fill::Solid(WHITE_HSLA));
        let mut surface = Surface::from_canvas(&canvas).unwrap();

        assert_eq!((surface.width, surface.height), (2, 2));
        let cells = surface.surface.screen_cells();
        let cell = &cells[0][1];
        assert_eq!(cell.str(), "▀");
        assert_eq!(
            cell.attrs().foreground(),
            Surface::make_colour_attribute(WHITE)
        );
        assert_eq!(
            cell.attrs().background(),
            Surface::make_colour_attribute(BLACK)
        );

        let cell = &cells[1][0];
        assert_eq!(cell.str(), "▀");
        assert_eq!(
            cell.attrs().foreground(),
            Surface::make_colour_attribute(BLACK)
        );
    }

    #[test]
    fn odd_pixel_height_leaves_default_background() {
        let canvas = Canvas::new(1, 3, 1.0);
        let mut surface = Surface::from_canvas(&canvas).unwrap();

        assert_eq!(surface.height, 2);
        let cells = surface.surface.screen_cells();
        assert_eq!(
            cells[1][0].attrs().background(),
            termwiz::color::ColorAttribute::Default
        );
        assert_eq!(
            cells[0][0].attrs().background(),
            Surface::make_colour_attribute(BLACK)
        );
    }

    #[test]
    fn cells_outside_the_surface_are_errors() {
        let mut surface = Surface::new(1, 1);
        let result = surface.add_cell(0, 1, WHITE, None).unwrap_err();
        assert_eq!(
            format!("{}", result.root_cause()),
            "Tried to add pixel to row: 1"
        );
        let result = surface.add_cell(1, 0, WHITE, None).unwrap_err();
        assert_eq!(
            format!("{}", result.root_cause()),
            "Tried to add pixel to column: 1"
        );
    }

    #[test]
    fn text_overlays_cells() {
        let mut surface = Surface::new(4, 1);
        surface.add_cell(0, 0, BLACK, Some(BLACK)).unwrap();
        surface.add_text(0, 0, "hi".into(), None, None);

        let cells = surface.surface.screen_cells();
        assert_eq!(cells[0][0].str(), "h");
        assert_eq!(cells[0][1].str(), "i");
        assert_eq!(
            cells[0][0].attrs().foreground(),
            Surface::make_colour_attribute(WHITE)
        );
    }
}
