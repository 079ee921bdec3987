//! PDF Content Stream Generation
//!
//! Planner pages only paint one full-bleed image each, so the builder
//! covers the graphics-state and XObject operators:
//! - q/Q: save/restore graphics state
//! - cm: concatenate transformation matrix
//! - Do: paint an XObject

use super::objects::format_number;

/// Content stream builder
#[derive(Debug, Default)]
pub struct ContentStream {
    data: Vec<u8>,
}

impl ContentStream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Save the current graphics state (q)
    pub fn save_state(&mut self) -> &mut Self {
        self.write_line("q")
    }

    /// Restore the graphics state (Q)
    pub fn restore_state(&mut self) -> &mut Self {
        self.write_line("Q")
    }

    /// Set the transformation matrix (cm)
    pub fn transform(&mut self, a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> &mut Self {
        let operands = [a, b, c, d, e, f].map(format_number).join(" ");
        self.write_line(&format!("{} cm", operands))
    }

    /// Paint an XObject (Do)
    pub fn draw_xobject(&mut self, name: &str) -> &mut Self {
        self.write_line(&format!("/{} Do", name))
    }

    /// Paint an image XObject into a rectangle given in PDF user space
    pub fn draw_image(&mut self, name: &str, x: f64, y: f64, width: f64, height: f64) -> &mut Self {
        self.save_state()
            .transform(width, 0.0, 0.0, height, x, y)
            .draw_xobject(name)
            .restore_state()
    }

    fn write_line(&mut self, s: &str) -> &mut Self {
        self.data.extend_from_slice(s.as_bytes());
        self.data.push(b'\n');
        self
    }
}
