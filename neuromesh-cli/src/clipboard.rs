//! Sets the terminal's clipboard with an OSC 52 escape sequence.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use neuromesh_core::clipboard::Clipboard;
use std::io::{self, Write};

pub struct Osc52<W: Write> {
    out: W,
}

impl<W: Write> Osc52<W> {
    pub fn new(out: W) -> Self {
        Osc52 { out }
    }
}

pub fn osc52_sequence(text: &str) -> String {
    format!("\x1b]52;c;{}\x07", STANDARD.encode(text))
}

impl<W: Write> Clipboard for Osc52<W> {
    fn write_text(&mut self, text: &str) -> io::Result<()> {
        self.out.write_all(osc52_sequence(text).as_bytes())?;
        self.out.flush()
    }
}
